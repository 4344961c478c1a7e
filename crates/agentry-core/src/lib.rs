//! Core types and trait definitions for Agentry.
//!
//! This crate is deliberately free of HTTP and database dependencies. It owns
//! the access gate, the record types, and the reducers that keep a view's
//! in-memory collections in step with the store.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod agent;
pub mod agents;
pub mod collection;
pub mod dashboard;
pub mod error;
pub mod gate;
pub mod identity;
pub mod profile;
pub mod store;
pub mod user;

pub use error::{Error, Result, ValidationError};

#[cfg(test)]
mod fake;
