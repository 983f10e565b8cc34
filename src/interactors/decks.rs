/*!
 * Deck and flashcard use cases.
 */

use log::debug;
use std::sync::Arc;

use crate::database::models::{Deck, Flashcard, NewFlashcard};
use crate::database::DataStore;

pub struct DecksInteractor {
    store: Arc<dyn DataStore>,
}

impl DecksInteractor {
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self { store }
    }

    /// All decks, oldest first
    pub fn decks(&self, include_flashcards: bool) -> Vec<Deck> {
        let mut decks = self.store.fetch_decks(include_flashcards);
        decks.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        decks
    }

    /// Create a deck; blank names are refused
    pub fn create_deck(&self, name: &str) -> Option<Deck> {
        let name = name.trim();
        if name.is_empty() {
            debug!("Refusing to create a deck without a name");
            return None;
        }
        self.store.create_deck(name)
    }

    pub fn delete_deck(&self, deck_id: i64) -> bool {
        self.store.delete_deck(deck_id)
    }

    /// Cards of a deck, oldest first; `None` when the deck does not exist
    pub fn flashcards(&self, deck_id: i64) -> Option<Vec<Flashcard>> {
        let mut cards = self.store.fetch_flashcards(deck_id)?;
        cards.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Some(cards)
    }

    pub fn flashcard(&self, flashcard_id: i64) -> Option<Flashcard> {
        self.store.fetch_flashcard(flashcard_id)
    }

    pub fn save_flashcard(&self, flashcard: &NewFlashcard) -> bool {
        self.store.save_new_flashcard(flashcard)
    }

    pub fn delete_flashcard(&self, flashcard_id: i64) -> bool {
        self.store.delete_flashcard(flashcard_id)
    }

    /// Move `flashcard` to `deck_id`, rewriting its sides and comment
    pub fn update_flashcard(&self, flashcard: &Flashcard, deck_id: i64) -> bool {
        self.store.update_flashcard(flashcard, deck_id)
    }
}
