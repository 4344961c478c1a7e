//! SQL schema for the Agentry SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Identity-provider tables. Nothing outside `identity.rs` reads these.
CREATE TABLE IF NOT EXISTS identities (
    subject_id    TEXT PRIMARY KEY,
    email         TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,       -- argon2 PHC string
    full_name     TEXT,                -- sign-up metadata
    created_at    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS sessions (
    token_hash TEXT PRIMARY KEY,       -- hex SHA-256 of the bearer token
    subject_id TEXT NOT NULL REFERENCES identities(subject_id) ON DELETE CASCADE,
    issued_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS users (
    id         TEXT PRIMARY KEY,       -- equals identities.subject_id
    email      TEXT NOT NULL UNIQUE,
    full_name  TEXT,
    avatar_url TEXT,
    is_admin   INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS ai_agents (
    id            TEXT PRIMARY KEY,
    user_id       TEXT NOT NULL REFERENCES users(id),
    name          TEXT NOT NULL CHECK (name != ''),
    description   TEXT NOT NULL CHECK (description != ''),
    type          TEXT NOT NULL,
    status        TEXT NOT NULL DEFAULT 'inactive'
                  CHECK (status IN ('active', 'inactive', 'paused')),
    configuration TEXT NOT NULL DEFAULT '{}',
    created_at    TEXT NOT NULL,
    updated_at    TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS ai_agents_user_idx    ON ai_agents(user_id);
CREATE INDEX IF NOT EXISTS ai_agents_created_idx ON ai_agents(created_at);
CREATE INDEX IF NOT EXISTS users_created_idx     ON users(created_at);

-- Every new identity gets exactly one user row.
CREATE TRIGGER IF NOT EXISTS provision_user
AFTER INSERT ON identities
BEGIN
    INSERT INTO users (id, email, full_name, avatar_url, is_admin, created_at, updated_at)
    VALUES (NEW.subject_id, NEW.email, NEW.full_name, NULL, 0, NEW.created_at, NEW.created_at);
END;

PRAGMA user_version = 1;
";
