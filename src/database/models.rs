/*!
 * Domain records exchanged with the persistence gateway.
 *
 * These structures map to database rows and are the types that
 * interactors and presenters work with.
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Compact search result for a dictionary headword
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    /// Database ID
    pub id: i64,
    /// Headword text, unique in the store
    pub word: String,
    /// Translation texts in stored order
    pub translations: Vec<String>,
}

/// Full headword with nested translations and examples
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordDetail {
    /// Database ID (0 until stored)
    pub id: i64,
    /// Headword text
    pub word: String,
    /// Whether the user marked the word as favorite
    pub is_favorite: bool,
    /// Ordered translations
    pub translations: Vec<Translation>,
}

impl WordDetail {
    /// Create a word detail that has not been stored yet
    pub fn new(word: impl Into<String>, translations: Vec<Translation>) -> Self {
        Self {
            id: 0,
            word: word.into(),
            is_favorite: false,
            translations,
        }
    }
}

/// One translation of a headword
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translation {
    /// Translation ID; replaced on collision when stored
    pub id: i64,
    /// Translated text, possibly with synonyms
    pub translation: String,
    /// Part of speech ("noun", "verb", ...)
    pub speech_part: String,
    /// Phonetic transcription
    pub transcription: Option<String>,
    /// Ordered usage examples
    pub examples: Vec<Example>,
}

/// Usage example of a translation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Example {
    /// Example ID; replaced on collision when stored
    pub id: i64,
    /// Example phrase
    pub example: String,
    /// Translated gloss
    pub translation: Option<String>,
}

/// Lookup history entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryWord {
    /// Looked-up headword
    pub word: String,
    /// Translation texts of the headword
    pub translations: Vec<String>,
    /// When the lookup happened
    pub date_added: DateTime<Utc>,
    /// Number of lookups of this word up to and including this one
    pub searches_count: i64,
}

/// Flashcard deck
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    /// Database ID
    pub id: i64,
    /// Display name
    pub name: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Cards of the deck, only loaded on request
    pub flashcards: Option<Vec<Flashcard>>,
}

/// Front/back card belonging to exactly one deck
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    /// Database ID
    pub id: i64,
    /// Owning deck
    pub deck_id: i64,
    /// Question side
    pub front_side: String,
    /// Answer side
    pub back_side: String,
    /// Optional free-form note
    pub comment: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// Card to be created in a deck
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewFlashcard {
    /// Question side
    pub front_side: String,
    /// Answer side
    pub back_side: String,
    /// Target deck
    pub deck_id: i64,
    /// Optional note
    pub comment: Option<String>,
    /// Also create a card with the sides swapped
    pub create_reversed: bool,
}

/// Account state of the local user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserState {
    /// Guest without a backend account
    Unauthorized,
    /// Signed in, email not confirmed yet
    Inactive,
    /// Signed in with a confirmed email
    Active,
}

impl fmt::Display for UserState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserState::Unauthorized => write!(f, "unauthorized"),
            UserState::Inactive => write!(f, "inactive"),
            UserState::Active => write!(f, "active"),
        }
    }
}

impl std::str::FromStr for UserState {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "unauthorized" => Ok(UserState::Unauthorized),
            "inactive" => Ok(UserState::Inactive),
            "active" => Ok(UserState::Active),
            _ => Err(anyhow::anyhow!("Invalid user state: {}", s)),
        }
    }
}

/// Locally cached account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Backend user ID
    pub id: i64,
    /// Login email
    pub email: String,
    /// Display name
    pub user_name: String,
    /// Account state
    pub state: UserState,
}
