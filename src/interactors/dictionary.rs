/*!
 * Dictionary use cases: search, word detail, history and favorites.
 */

use chrono::Utc;
use log::{debug, info};
use std::sync::Arc;

use crate::database::models::{HistoryWord, Word, WordDetail};
use crate::database::DataStore;
use crate::errors::NetworkError;
use crate::network::dictionary::DictionaryClient;

pub struct DictionaryInteractor {
    store: Arc<dyn DataStore>,
    /// Remote fallback; `None` keeps lookups local
    dictionary: Option<DictionaryClient>,
}

impl DictionaryInteractor {
    pub fn new(store: Arc<dyn DataStore>, dictionary: Option<DictionaryClient>) -> Self {
        Self { store, dictionary }
    }

    /// Stored words containing `word_part`; no query means no results
    pub fn get_words(&self, word_part: Option<&str>) -> Vec<Word> {
        match word_part.map(str::trim) {
            Some(part) if !part.is_empty() => self.store.search_words(part),
            _ => Vec::new(),
        }
    }

    /// Word detail from the store, falling back to the remote dictionary
    ///
    /// A remote hit is stored before being returned, so the returned ids
    /// are the ones the store assigned.
    pub async fn word_detail(&self, word: &str) -> Result<Option<WordDetail>, NetworkError> {
        let word = word.trim();
        if word.is_empty() {
            return Ok(None);
        }

        if let Some(detail) = self.store.fetch_word_detail(word) {
            return Ok(Some(detail));
        }

        let Some(dictionary) = &self.dictionary else {
            debug!("'{}' is not stored and remote lookups are disabled", word);
            return Ok(None);
        };

        let Some(detail) = dictionary.lookup(word).await? else {
            return Ok(None);
        };

        if self.store.save_word(&detail) {
            info!("Stored '{}' from the dictionary", word);
        }
        Ok(Some(self.store.fetch_word_detail(word).unwrap_or(detail)))
    }

    /// Record that the word was opened now
    pub fn record_lookup(&self, word_id: i64) -> bool {
        self.store.add_history_word(word_id, Utc::now())
    }

    /// Lookup history, most recent first
    pub fn history(&self) -> Vec<HistoryWord> {
        let mut history = self.store.fetch_history();
        history.sort_by(|a, b| b.date_added.cmp(&a.date_added));
        history
    }

    pub fn favorites(&self) -> Vec<Word> {
        self.store.fetch_favorite_words()
    }

    pub fn set_favorite(&self, word_id: i64, is_favorite: bool) -> bool {
        self.store.set_favorite(word_id, is_favorite)
    }
}
