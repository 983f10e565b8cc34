/*!
 * Recording views and routers for presenter tests
 */

use parking_lot::Mutex;

use lexicard::database::models::Deck;
use lexicard::interactors::{DownloadSummary, Setting};
use lexicard::presentation::{
    AccountRouter, AccountView, DecksRouter, DecksView, HistoryRouter, HistorySection,
    HistoryView, NewFlashcardView,
};

/// Display instruction received by a view
#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    Sections(Vec<HistorySection>),
    Decks(Vec<String>),
    AppendDeck(String),
    AlertActionEnabled(bool),
    DeckNotCreated,
    DeckNames(Vec<String>),
    CurrentDeck(usize),
    EmptySidesAlert,
    NoDeckChosenAlert,
    Close,
    Setup(Vec<Setting>, String),
    AskDownload,
    AskExit,
    AskDelete,
    DownloadStarted,
    DownloadProgress(usize, usize),
    DownloadEnded(Option<DownloadSummary>),
    UserNameNotChanged,
    ServerProblems,
}

#[derive(Debug, Default)]
pub struct RecordingView {
    events: Mutex<Vec<ViewEvent>>,
}

impl RecordingView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ViewEvent> {
        self.events.lock().clone()
    }

    pub fn contains(&self, event: &ViewEvent) -> bool {
        self.events.lock().contains(event)
    }

    fn push(&self, event: ViewEvent) {
        self.events.lock().push(event);
    }
}

impl HistoryView for RecordingView {
    fn show_words(&self, sections: Vec<HistorySection>) {
        self.push(ViewEvent::Sections(sections));
    }
}

impl DecksView for RecordingView {
    fn show_decks(&self, decks: &[Deck]) {
        self.push(ViewEvent::Decks(decks.iter().map(|d| d.name.clone()).collect()));
    }

    fn append_deck(&self, deck: &Deck) {
        self.push(ViewEvent::AppendDeck(deck.name.clone()));
    }

    fn set_alert_action_enabled(&self, enabled: bool) {
        self.push(ViewEvent::AlertActionEnabled(enabled));
    }

    fn show_deck_not_created_alert(&self) {
        self.push(ViewEvent::DeckNotCreated);
    }
}

impl NewFlashcardView for RecordingView {
    fn set_decks(&self, names: Vec<String>) {
        self.push(ViewEvent::DeckNames(names));
    }

    fn set_current_deck(&self, index: usize) {
        self.push(ViewEvent::CurrentDeck(index));
    }

    fn show_empty_sides_alert(&self) {
        self.push(ViewEvent::EmptySidesAlert);
    }

    fn show_no_deck_chosen_alert(&self) {
        self.push(ViewEvent::NoDeckChosenAlert);
    }

    fn close(&self) {
        self.push(ViewEvent::Close);
    }
}

impl AccountView for RecordingView {
    fn setup(&self, settings: &[Setting], user_name: &str) {
        self.push(ViewEvent::Setup(settings.to_vec(), user_name.to_string()));
    }

    fn ask_for_downloading_dictionary(&self) {
        self.push(ViewEvent::AskDownload);
    }

    fn ask_for_exit(&self) {
        self.push(ViewEvent::AskExit);
    }

    fn ask_for_deleting_account(&self) {
        self.push(ViewEvent::AskDelete);
    }

    fn show_dictionary_downloading_started(&self) {
        self.push(ViewEvent::DownloadStarted);
    }

    fn show_dictionary_downloading_progress(&self, completed: usize, total: usize) {
        self.push(ViewEvent::DownloadProgress(completed, total));
    }

    fn show_dictionary_downloading_ended(&self, summary: Option<&DownloadSummary>) {
        self.push(ViewEvent::DownloadEnded(summary.cloned()));
    }

    fn show_user_name_not_changed_alert(&self) {
        self.push(ViewEvent::UserNameNotChanged);
    }

    fn show_server_problems_alert(&self) {
        self.push(ViewEvent::ServerProblems);
    }
}

/// Navigation request received by a router
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    WordDetail(String),
    DeckDetail(i64),
    EntranceFlow,
    ConfirmEmail,
    Achievements,
    ChangePassword,
    Registration,
}

#[derive(Debug, Default)]
pub struct RecordingRouter {
    routes: Mutex<Vec<Route>>,
}

impl RecordingRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn routes(&self) -> Vec<Route> {
        self.routes.lock().clone()
    }
}

impl HistoryRouter for RecordingRouter {
    fn show_word_detail(&self, word: &str) {
        self.routes.lock().push(Route::WordDetail(word.to_string()));
    }
}

impl DecksRouter for RecordingRouter {
    fn show_deck_detail(&self, deck_id: i64) {
        self.routes.lock().push(Route::DeckDetail(deck_id));
    }
}

impl AccountRouter for RecordingRouter {
    fn show_entrance_flow(&self) {
        self.routes.lock().push(Route::EntranceFlow);
    }

    fn show_confirm_email(&self) {
        self.routes.lock().push(Route::ConfirmEmail);
    }

    fn show_achievements(&self) {
        self.routes.lock().push(Route::Achievements);
    }

    fn show_change_password(&self) {
        self.routes.lock().push(Route::ChangePassword);
    }

    fn show_registration(&self) {
        self.routes.lock().push(Route::Registration);
    }
}
