/*!
 * Database schema definitions and migrations.
 *
 * This module contains the SQL schema for all database tables
 * and refuses databases written with another schema version.
 */

use anyhow::{Context, Result};
use log::{debug, info};
use rusqlite::Connection;

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// Per-connection settings that SQLite does not persist in the file
pub fn configure_connection(conn: &Connection) -> Result<()> {
    conn.execute_batch("PRAGMA foreign_keys=ON;")
        .context("Failed to enable foreign keys")?;
    Ok(())
}

/// Initialize the database schema
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    let current_version = get_schema_version(conn)?;

    if current_version == 0 {
        info!("Initializing database schema v{}", SCHEMA_VERSION);
        create_all_tables(conn)?;
        set_schema_version(conn, SCHEMA_VERSION)?;
    } else if current_version != SCHEMA_VERSION {
        return Err(anyhow::anyhow!(
            "Unsupported database schema v{} (expected v{})",
            current_version,
            SCHEMA_VERSION
        ));
    } else {
        debug!("Database schema is up to date (v{})", current_version);
    }

    Ok(())
}

/// Get the current schema version from the database
fn get_schema_version(conn: &Connection) -> Result<i32> {
    let table_exists: bool = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='schema_version'",
            [],
            |row| row.get(0),
        )
        .context("Failed to check schema_version table existence")?;

    if !table_exists {
        return Ok(0);
    }

    let version: i32 = conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
            row.get(0)
        })
        .unwrap_or(0);

    Ok(version)
}

/// Set the schema version in the database
fn set_schema_version(conn: &Connection, version: i32) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO schema_version (id, version, updated_at) VALUES (1, ?1, datetime('now'))",
        [version],
    )?;
    Ok(())
}

/// Create all database tables
fn create_all_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            version INTEGER NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#,
    )?;

    // Dictionary headwords; the text key is unique
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS words (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            word TEXT NOT NULL UNIQUE,
            is_favorite INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_words_favorite ON words(is_favorite);
        "#,
    )?;

    // Translations keep caller-provided ids, hence no AUTOINCREMENT
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS translations (
            id INTEGER PRIMARY KEY,
            word_id INTEGER NOT NULL REFERENCES words(id) ON DELETE CASCADE,
            position INTEGER NOT NULL,
            translation TEXT NOT NULL,
            speech_part TEXT NOT NULL,
            transcription TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_translations_word ON translations(word_id);
        "#,
    )?;

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS examples (
            id INTEGER PRIMARY KEY,
            translation_id INTEGER NOT NULL REFERENCES translations(id) ON DELETE CASCADE,
            position INTEGER NOT NULL,
            example TEXT NOT NULL,
            example_translation TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_examples_translation ON examples(translation_id);
        "#,
    )?;

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS history_words (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            word_id INTEGER NOT NULL REFERENCES words(id) ON DELETE CASCADE,
            time_opened TEXT NOT NULL,
            searches_count INTEGER NOT NULL DEFAULT 1
        );

        CREATE INDEX IF NOT EXISTS idx_history_word ON history_words(word_id);
        "#,
    )?;

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS decks (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS flashcards (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            deck_id INTEGER NOT NULL REFERENCES decks(id) ON DELETE CASCADE,
            front_side TEXT NOT NULL,
            back_side TEXT NOT NULL,
            comment TEXT,
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_flashcards_deck ON flashcards(deck_id);
        "#,
    )?;

    // At most one locally cached account
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS account (
            slot INTEGER PRIMARY KEY CHECK (slot = 1),
            user_id INTEGER NOT NULL,
            email TEXT NOT NULL,
            user_name TEXT NOT NULL,
            state TEXT NOT NULL
        );
        "#,
    )?;

    info!("Database schema created successfully");
    Ok(())
}
