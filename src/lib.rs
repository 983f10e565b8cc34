/*!
 * # lexicard - vocabulary learning with dictionary lookups and flashcards
 *
 * A Rust library backing a vocabulary trainer: look words up, keep a
 * lookup history, mark favorites and learn with flashcard decks.
 *
 * ## Features
 *
 * - Embedded SQLite store with serialized access
 * - Remote dictionary lookups cached in the store
 * - Flashcard decks with reversed cards and moves between decks
 * - Account sign-in, renaming, deletion and logout
 * - Bulk download of popular words with bounded concurrency
 * - ISO 639-1 and ISO 639-3 language code support
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `database`: Persistence gateway over SQLite:
 *   - `database::repository`: the `DataStore` trait and its implementation
 *   - `database::schema`: table definitions and versioning
 *   - `database::models`: domain records
 * - `network`: Network gateway:
 *   - `network::http`: request descriptors
 *   - `network::client`: reqwest transport and `NetworkManager`
 *   - `network::requests`: backend requests and models
 *   - `network::dictionary`: remote dictionary client
 * - `interactors`: Use cases composed from the gateways
 * - `presentation`: Presenters and the view traits they drive
 * - `credentials`: Backend token storage
 * - `validation`: Account form rules
 * - `app_config`: Configuration management
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod credentials;
pub mod database;
pub mod errors;
pub mod interactors;
pub mod language_utils;
pub mod network;
pub mod presentation;
pub mod validation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use credentials::{CredentialStore, FileCredentialStore, MemoryCredentialStore};
pub use database::{DataStore, Repository};
pub use errors::{AppError, CredentialError, NetworkError};
pub use network::{NetworkManager, RequestDescriptor};
pub use validation::{ValidationManager, ValidationMessage, Validator};
