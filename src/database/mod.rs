/*!
 * Database module for persistent storage of the vocabulary data.
 *
 * This module provides SQLite-based persistence for:
 * - Dictionary words with translations and usage examples
 * - Lookup history and favorites
 * - Flashcard decks
 * - The locally cached account
 */

pub mod schema;
pub mod connection;
pub mod repository;
pub mod models;

// Re-export main types
pub use connection::{DatabaseConnection, DatabaseStats};
pub use repository::{DataStore, Repository};
