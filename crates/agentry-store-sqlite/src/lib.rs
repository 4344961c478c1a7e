//! SQLite backend for Agentry.
//!
//! [`SqliteStore`] implements both [`agentry_core::store::PlatformStore`] and
//! [`agentry_core::identity::IdentityProvider`]. It wraps [`tokio_rusqlite`]
//! so all database access runs on a dedicated thread without blocking the
//! async runtime.

mod encode;
mod identity;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
