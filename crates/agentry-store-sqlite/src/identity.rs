//! The identity-provider half of [`SqliteStore`].
//!
//! Passwords are hashed with argon2id. Bearer tokens are 32 random bytes,
//! URL-safe base64 encoded; only their SHA-256 digest is stored.

use agentry_core::identity::{
  AuthError, IdentityProvider, Registration, Session, SessionToken,
};
use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString,
};
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use rand_core::{OsRng, RngCore as _};
use rusqlite::OptionalExtension as _;
use sha2::{Digest as _, Sha256};
use uuid::Uuid;

use crate::{
  Error, Result, SqliteStore,
  encode::{decode_dt, decode_uuid, encode_dt, encode_uuid, now},
};

/// Shortest password the provider accepts.
pub const MIN_PASSWORD_LEN: usize = 6;

fn normalize_email(email: &str) -> String { email.trim().to_lowercase() }

fn hash_password(password: &str) -> Result<String> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|hash| hash.to_string())
    .map_err(|e| Error::PasswordHash(e.to_string()))
}

fn verify_password(password: &str, phc: &str) -> Result<()> {
  let parsed = PasswordHash::new(phc).map_err(|e| Error::PasswordHash(e.to_string()))?;
  Argon2::default()
    .verify_password(password.as_bytes(), &parsed)
    .map_err(|_| AuthError::InvalidCredentials.into())
}

fn token_digest(token: &SessionToken) -> String {
  hex::encode(Sha256::digest(token.as_str().as_bytes()))
}

fn issue_token() -> SessionToken {
  let mut bytes = [0u8; 32];
  OsRng.fill_bytes(&mut bytes);
  SessionToken::new(URL_SAFE_NO_PAD.encode(bytes))
}

impl SqliteStore {
  async fn register_identity(&self, registration: Registration) -> Result<Session> {
    let email = normalize_email(&registration.email);
    if !email.contains('@') || email.starts_with('@') || email.ends_with('@') {
      return Err(AuthError::InvalidEmail(registration.email).into());
    }
    if registration.password.chars().count() < MIN_PASSWORD_LEN {
      return Err(AuthError::WeakPassword { min: MIN_PASSWORD_LEN }.into());
    }

    let password_hash = hash_password(&registration.password)?;
    let full_name = registration
      .full_name
      .map(|n| n.trim().to_owned())
      .filter(|n| !n.is_empty());
    let session = Session {
      token:     issue_token(),
      user_id:   Uuid::new_v4(),
      email:     email.clone(),
      issued_at: now(),
    };

    let subject_str = encode_uuid(session.user_id);
    let digest      = token_digest(&session.token);
    let at_str      = encode_dt(session.issued_at);
    let email_param = email.clone();

    let inserted = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let taken = tx
          .query_row(
            "SELECT 1 FROM identities WHERE email = ?1",
            rusqlite::params![email_param],
            |_| Ok(()),
          )
          .optional()?
          .is_some();
        if taken {
          return Ok(false);
        }

        // The `provision_user` trigger creates the matching users row.
        tx.execute(
          "INSERT INTO identities (subject_id, email, password_hash, full_name, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![subject_str, email_param, password_hash, full_name, at_str],
        )?;
        tx.execute(
          "INSERT INTO sessions (token_hash, subject_id, issued_at) VALUES (?1, ?2, ?3)",
          rusqlite::params![digest, subject_str, at_str],
        )?;
        tx.commit()?;
        Ok(true)
      })
      .await?;

    if !inserted {
      return Err(AuthError::EmailTaken(email).into());
    }
    tracing::info!(user_id = %session.user_id, "identity registered");
    Ok(session)
  }

  async fn login_identity(&self, email: String, password: String) -> Result<Session> {
    let email = normalize_email(&email);
    let lookup = email.clone();

    let row: Option<(String, String)> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT subject_id, password_hash FROM identities WHERE email = ?1",
              rusqlite::params![lookup],
              |r| Ok((r.get(0)?, r.get(1)?)),
            )
            .optional()?,
        )
      })
      .await?;

    let Some((subject_str, phc)) = row else {
      return Err(AuthError::InvalidCredentials.into());
    };
    verify_password(&password, &phc)?;

    let session = Session {
      token:     issue_token(),
      user_id:   decode_uuid(&subject_str)?,
      email,
      issued_at: now(),
    };
    let digest = token_digest(&session.token);
    let at_str = encode_dt(session.issued_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO sessions (token_hash, subject_id, issued_at) VALUES (?1, ?2, ?3)",
          rusqlite::params![digest, subject_str, at_str],
        )?;
        Ok(())
      })
      .await?;

    tracing::info!(user_id = %session.user_id, "session opened");
    Ok(session)
  }

  async fn revoke_session(&self, token: SessionToken) -> Result<()> {
    let digest = token_digest(&token);
    let removed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM sessions WHERE token_hash = ?1",
          rusqlite::params![digest],
        )?)
      })
      .await?;
    tracing::debug!(removed, "session revoked");
    Ok(())
  }

  async fn lookup_session(&self, token: SessionToken) -> Result<Option<Session>> {
    let digest = token_digest(&token);

    let row: Option<(String, String, String)> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT s.subject_id, i.email, s.issued_at
               FROM sessions s
               JOIN identities i ON i.subject_id = s.subject_id
               WHERE s.token_hash = ?1",
              rusqlite::params![digest],
              |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
            )
            .optional()?,
        )
      })
      .await?;

    row
      .map(|(subject, email, issued_at)| {
        Ok(Session {
          token,
          user_id: decode_uuid(&subject)?,
          email,
          issued_at: decode_dt(&issued_at)?,
        })
      })
      .transpose()
  }
}

impl IdentityProvider for SqliteStore {
  async fn register(&self, registration: Registration) -> Result<Session, AuthError> {
    Ok(self.register_identity(registration).await?)
  }

  async fn login(&self, email: String, password: String) -> Result<Session, AuthError> {
    Ok(self.login_identity(email, password).await?)
  }

  async fn logout(&self, token: SessionToken) -> Result<(), AuthError> {
    Ok(self.revoke_session(token).await?)
  }

  async fn current_session(
    &self,
    token: SessionToken,
  ) -> Result<Option<Session>, AuthError> {
    Ok(self.lookup_session(token).await?)
  }
}
