//! SQL schema for the Natter SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE ... IF NOT EXISTS`.
///
/// `AUTOINCREMENT` guarantees row IDs are never reused, so message IDs stay
/// strictly increasing for the life of the database file. Foreign keys are
/// intentionally not declared: messages may reference channels and users that
/// do not exist.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS users (
    id        INTEGER PRIMARY KEY AUTOINCREMENT,
    username  TEXT NOT NULL,
    password  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS channels (
    id    INTEGER PRIMARY KEY AUTOINCREMENT,
    name  TEXT NOT NULL
);

-- Append-only. No UPDATE or DELETE is ever issued against this table.
CREATE TABLE IF NOT EXISTS messages (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    channel_id  INTEGER NOT NULL,
    user_id     INTEGER NOT NULL,
    message     TEXT NOT NULL,
    created_at  TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
);

CREATE INDEX IF NOT EXISTS users_username_idx     ON users(username);
CREATE INDEX IF NOT EXISTS messages_channel_id_idx ON messages(channel_id, id);

PRAGMA user_version = 1;
";
