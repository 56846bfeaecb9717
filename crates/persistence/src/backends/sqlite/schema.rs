//! SQLite schema definitions and migrations.

use rusqlite::Connection;

use crate::error::{BackendError, StorageError, StorageResult};

/// Current schema version.
pub const SCHEMA_VERSION: i32 = 1;

/// Categories inserted on first initialization.
pub const DEFAULT_CATEGORIES: &[&str] = &[
    "Wildlife",
    "Environmental Causes",
    "Animal Rights",
    "Health and Wellness",
    "Education",
    "Human Rights",
    "Technology and Innovation",
    "Arts and Culture",
    "Community Development",
    "Economic Empowerment",
    "Science and Research",
    "Sports and Recreation",
];

/// Initialize the database schema. Safe to call on every startup.
pub fn initialize_schema(conn: &Connection) -> StorageResult<()> {
    let current_version = get_schema_version(conn)?;

    if current_version == 0 {
        create_schema_v1(conn)?;
        seed_categories(conn)?;
        set_schema_version(conn, SCHEMA_VERSION)?;
        tracing::debug!(version = SCHEMA_VERSION, "Created SQLite schema");
    } else if current_version > SCHEMA_VERSION {
        return Err(migration_error(format!(
            "database schema version {} is newer than supported version {}",
            current_version, SCHEMA_VERSION
        )));
    }

    Ok(())
}

/// Get the current schema version.
fn get_schema_version(conn: &Connection) -> StorageResult<i32> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER NOT NULL
        )",
        [],
    )
    .map_err(|e| migration_error(format!("Failed to create schema_version table: {}", e)))?;

    let version: Option<i32> = conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
            row.get(0)
        })
        .ok();

    Ok(version.unwrap_or(0))
}

/// Set the schema version.
fn set_schema_version(conn: &Connection, version: i32) -> StorageResult<()> {
    conn.execute("DELETE FROM schema_version", [])
        .map_err(|e| migration_error(format!("Failed to clear schema_version: {}", e)))?;

    conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])
        .map_err(|e| migration_error(format!("Failed to set schema_version: {}", e)))?;

    Ok(())
}

/// Create the initial schema (version 1).
fn create_schema_v1(conn: &Connection) -> StorageResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE
        );

        CREATE TABLE IF NOT EXISTS user (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            email TEXT NOT NULL UNIQUE,
            first_name TEXT NOT NULL,
            last_name TEXT NOT NULL,
            image_filename TEXT,
            password TEXT NOT NULL,
            auth_token TEXT
        );

        CREATE TABLE IF NOT EXISTS petition (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL UNIQUE,
            description TEXT NOT NULL,
            creation_date TEXT NOT NULL,
            image_filename TEXT,
            owner_id INTEGER NOT NULL REFERENCES user (id),
            category_id INTEGER NOT NULL REFERENCES category (id)
        );

        CREATE TABLE IF NOT EXISTS support_tier (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            petition_id INTEGER NOT NULL REFERENCES petition (id) ON DELETE CASCADE,
            title TEXT NOT NULL,
            description TEXT NOT NULL,
            cost INTEGER NOT NULL CHECK (cost >= 0),
            UNIQUE (petition_id, title)
        );

        CREATE TABLE IF NOT EXISTS supporter (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            petition_id INTEGER NOT NULL REFERENCES petition (id),
            support_tier_id INTEGER NOT NULL REFERENCES support_tier (id),
            user_id INTEGER NOT NULL REFERENCES user (id),
            message TEXT,
            timestamp TEXT NOT NULL,
            UNIQUE (petition_id, support_tier_id, user_id)
        );

        CREATE INDEX IF NOT EXISTS idx_petition_owner ON petition (owner_id);
        CREATE INDEX IF NOT EXISTS idx_petition_category ON petition (category_id);
        CREATE INDEX IF NOT EXISTS idx_support_tier_petition ON support_tier (petition_id);
        CREATE INDEX IF NOT EXISTS idx_supporter_petition ON supporter (petition_id);
        CREATE INDEX IF NOT EXISTS idx_supporter_user ON supporter (user_id);
        CREATE INDEX IF NOT EXISTS idx_user_auth_token ON user (auth_token);",
    )
    .map_err(|e| migration_error(format!("Failed to create tables: {}", e)))?;

    Ok(())
}

fn seed_categories(conn: &Connection) -> StorageResult<()> {
    let mut stmt = conn
        .prepare("INSERT OR IGNORE INTO category (name) VALUES (?1)")
        .map_err(|e| migration_error(format!("Failed to prepare category seed: {}", e)))?;

    for name in DEFAULT_CATEGORIES {
        stmt.execute([name])
            .map_err(|e| migration_error(format!("Failed to seed category {}: {}", name, e)))?;
    }

    Ok(())
}

fn migration_error(message: String) -> StorageError {
    StorageError::Backend(BackendError::MigrationError { message })
}
