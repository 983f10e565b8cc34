/*!
 * New flashcard form.
 */

use log::warn;
use std::sync::Arc;

use crate::database::models::{Deck, NewFlashcard};
use crate::interactors::DecksInteractor;

/// Raw form contents as entered by the user
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewFlashcardForm {
    pub front_side: Option<String>,
    pub back_side: Option<String>,
    /// Index into the deck list shown by `set_decks`
    pub deck_index: Option<usize>,
    pub comment: Option<String>,
    pub create_reversed: bool,
}

pub trait NewFlashcardView: Send + Sync {
    fn set_decks(&self, names: Vec<String>);
    fn set_current_deck(&self, index: usize);
    fn show_empty_sides_alert(&self);
    fn show_no_deck_chosen_alert(&self);
    fn close(&self);
}

pub struct NewFlashcardPresenter {
    interactor: Arc<DecksInteractor>,
    view: Arc<dyn NewFlashcardView>,
    selected_deck_id: Option<i64>,
    decks: Vec<Deck>,
}

impl NewFlashcardPresenter {
    pub fn new(
        interactor: Arc<DecksInteractor>,
        view: Arc<dyn NewFlashcardView>,
        selected_deck_id: Option<i64>,
    ) -> Self {
        Self {
            interactor,
            view,
            selected_deck_id,
            decks: Vec::new(),
        }
    }

    pub fn view_did_load(&mut self) {
        let decks = self.interactor.decks(false);
        self.view
            .set_decks(decks.iter().map(|deck| deck.name.clone()).collect());

        if let Some(index) = self
            .selected_deck_id
            .and_then(|id| decks.iter().position(|deck| deck.id == id))
        {
            self.view.set_current_deck(index);
        }
        self.decks = decks;
    }

    pub fn did_tap_save(&self, form: NewFlashcardForm) {
        let (Some(front_side), Some(back_side)) = (form.front_side, form.back_side) else {
            self.view.show_empty_sides_alert();
            return;
        };
        if front_side.is_empty() || back_side.is_empty() {
            self.view.show_empty_sides_alert();
            return;
        }

        let Some(deck) = form.deck_index.and_then(|index| self.decks.get(index)) else {
            self.view.show_no_deck_chosen_alert();
            return;
        };

        let flashcard = NewFlashcard {
            front_side,
            back_side,
            deck_id: deck.id,
            comment: form.comment.filter(|comment| !comment.is_empty()),
            create_reversed: form.create_reversed,
        };
        if !self.interactor.save_flashcard(&flashcard) {
            warn!("Flashcard '{}' was not saved", flashcard.front_side);
        }
        self.view.close();
    }
}
