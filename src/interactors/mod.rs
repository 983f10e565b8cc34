/*!
 * Use cases composed from the persistence and network gateways.
 *
 * - `authorization`: sign in and cache the account locally
 * - `account`: settings, renaming, deletion, logout and dictionary download
 * - `dictionary`: search, word detail, history and favorites
 * - `decks`: deck and flashcard management
 *
 * Interactors never surface store failures; network failures are mapped
 * to user-facing outcomes or returned one level up.
 */

pub use self::account::{AccountInteractor, DownloadSummary, Setting};
pub use self::authorization::{AuthorizationInteractor, AuthorizationResult};
pub use self::decks::DecksInteractor;
pub use self::dictionary::DictionaryInteractor;

pub mod account;
pub mod authorization;
pub mod decks;
pub mod dictionary;
