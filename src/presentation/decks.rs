/*!
 * Deck list screen.
 */

use log::warn;
use std::sync::Arc;

use crate::database::models::Deck;
use crate::interactors::DecksInteractor;

pub trait DecksView: Send + Sync {
    fn show_decks(&self, decks: &[Deck]);
    fn append_deck(&self, deck: &Deck);
    /// Enable or disable the confirm button of the new-deck dialog
    fn set_alert_action_enabled(&self, enabled: bool);
    fn show_deck_not_created_alert(&self);
}

pub trait DecksRouter: Send + Sync {
    fn show_deck_detail(&self, deck_id: i64);
}

pub struct DecksPresenter {
    interactor: Arc<DecksInteractor>,
    view: Arc<dyn DecksView>,
    router: Arc<dyn DecksRouter>,
    decks: Vec<Deck>,
}

impl DecksPresenter {
    pub fn new(
        interactor: Arc<DecksInteractor>,
        view: Arc<dyn DecksView>,
        router: Arc<dyn DecksRouter>,
    ) -> Self {
        Self {
            interactor,
            view,
            router,
            decks: Vec::new(),
        }
    }

    /// Decks currently shown, oldest first
    pub fn decks(&self) -> &[Deck] {
        &self.decks
    }

    pub fn view_did_load(&mut self) {
        self.decks = self.interactor.decks(false);
        self.view.show_decks(&self.decks);
    }

    pub fn deck_name_changed(&self, name: &str) {
        self.view.set_alert_action_enabled(!name.trim().is_empty());
    }

    pub fn create_deck(&mut self, name: &str) {
        match self.interactor.create_deck(name) {
            Some(deck) => {
                self.view.append_deck(&deck);
                self.decks.push(deck);
            }
            None => {
                warn!("Deck '{}' was not created", name.trim());
                self.view.show_deck_not_created_alert();
            }
        }
    }

    /// Delete the deck at `index`; the list is reloaded afterwards
    pub fn delete_deck(&mut self, index: usize) -> bool {
        let Some(deck) = self.decks.get(index) else {
            return false;
        };
        let deleted = self.interactor.delete_deck(deck.id);
        self.view_did_load();
        deleted
    }

    pub fn did_select_deck(&self, index: usize) {
        if let Some(deck) = self.decks.get(index) {
            self.router.show_deck_detail(deck.id);
        }
    }
}
