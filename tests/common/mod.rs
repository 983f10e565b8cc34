/*!
 * Common test utilities for the lexicard test suite
 */

use std::sync::Arc;

use chrono::{DateTime, Utc};
use lexicard::database::models::{Example, Translation, WordDetail};
use lexicard::database::{DataStore, Repository};
use tempfile::TempDir;

pub mod mock_views;

/// Route test logs through env_logger; safe to call from every test
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

/// Fresh in-memory store
pub fn create_store() -> Arc<Repository> {
    Arc::new(Repository::new_in_memory().expect("Failed to create test repository"))
}

/// Same store behind the injectable interface
pub fn as_data_store(repository: &Arc<Repository>) -> Arc<dyn DataStore> {
    repository.clone()
}

pub fn timestamp(value: &str) -> DateTime<Utc> {
    value.parse().expect("Invalid timestamp")
}

/// Word with one translation and one example
pub fn sample_word(word: &str, translation: &str) -> WordDetail {
    WordDetail::new(
        word,
        vec![Translation {
            id: 1,
            translation: translation.to_string(),
            speech_part: "noun".to_string(),
            transcription: None,
            examples: vec![Example {
                id: 1,
                example: format!("a {}", word),
                translation: Some(format!("a {}", translation)),
            }],
        }],
    )
}

/// Dictionary service payload for `word` with a single sense
pub fn lookup_payload(word: &str, translation: &str) -> String {
    format!(
        r#"{{"def": [{{"text": "{}", "pos": "noun", "ts": "{}", "tr": [{{"text": "{}"}}]}}]}}"#,
        word, word, translation
    )
}

/// Insert a deck with an explicit creation time, bypassing `create_deck`
pub fn insert_deck_at(repository: &Repository, name: &str, created_at: &str) -> i64 {
    repository
        .connection()
        .execute(|conn| {
            conn.execute(
                "INSERT INTO decks (name, created_at) VALUES (?1, ?2)",
                rusqlite::params![name, created_at],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .expect("Failed to insert deck")
}
