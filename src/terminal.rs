/*!
 * Terminal implementations of the presenter views and routers.
 */

use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use parking_lot::Mutex;

use lexicard::database::models::Deck;
use lexicard::interactors::{DownloadSummary, Setting};
use lexicard::presentation::{
    AccountRouter, AccountView, DecksRouter, DecksView, HistoryRouter, HistorySection,
    HistoryView, NewFlashcardView,
};

/// Prints presenter output to stdout
#[derive(Default)]
pub struct TerminalView {
    /// Deck preselected by the new-flashcard presenter
    current_deck: Mutex<Option<usize>>,
    /// Set once the new-flashcard presenter closes the form
    closed: Mutex<bool>,
    progress_bar: Mutex<Option<ProgressBar>>,
}

impl TerminalView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_deck(&self) -> Option<usize> {
        *self.current_deck.lock()
    }

    pub fn is_closed(&self) -> bool {
        *self.closed.lock()
    }

    fn print_deck(deck: &Deck) {
        println!(
            "{:>6}  {}  (created {})",
            deck.id,
            deck.name,
            deck.created_at.format("%Y-%m-%d %H:%M")
        );
    }
}

impl HistoryView for TerminalView {
    fn show_words(&self, sections: Vec<HistorySection>) {
        if sections.is_empty() {
            println!("History is empty");
            return;
        }
        for section in sections {
            println!("{}", section.title);
            for row in section.words {
                println!("  {} ({}x): {}", row.word, row.searches_count, row.translations);
            }
        }
    }
}

impl DecksView for TerminalView {
    fn show_decks(&self, decks: &[Deck]) {
        if decks.is_empty() {
            println!("No decks yet");
        }
        decks.iter().for_each(Self::print_deck);
    }

    fn append_deck(&self, deck: &Deck) {
        Self::print_deck(deck);
    }

    fn set_alert_action_enabled(&self, enabled: bool) {
        if !enabled {
            warn!("Deck name must not be blank");
        }
    }

    fn show_deck_not_created_alert(&self) {
        eprintln!("The deck could not be created");
    }
}

impl NewFlashcardView for TerminalView {
    fn set_decks(&self, _names: Vec<String>) {}

    fn set_current_deck(&self, index: usize) {
        *self.current_deck.lock() = Some(index);
    }

    fn show_empty_sides_alert(&self) {
        eprintln!("Both sides of the card must be filled in");
    }

    fn show_no_deck_chosen_alert(&self) {
        eprintln!("No such deck");
    }

    fn close(&self) {
        *self.closed.lock() = true;
    }
}

impl AccountView for TerminalView {
    fn setup(&self, settings: &[Setting], user_name: &str) {
        if settings.is_empty() {
            println!("Not signed in");
            return;
        }
        if !user_name.is_empty() {
            println!("Signed in as {}", user_name);
        }
        for setting in settings {
            println!("  - {}", setting);
        }
    }

    fn ask_for_downloading_dictionary(&self) {
        println!("Run `lexicard download` to fetch popular words");
    }

    fn ask_for_exit(&self) {
        println!("Run `lexicard logout` to sign out");
    }

    fn ask_for_deleting_account(&self) {
        println!("Run `lexicard account --delete` to delete the account");
    }

    fn show_dictionary_downloading_started(&self) {
        let progress_bar = ProgressBar::new(0);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} words ({percent}%) {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{bar:40}] {pos}/{len}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(style.progress_chars("█▓▒░"));
        *self.progress_bar.lock() = Some(progress_bar);
    }

    fn show_dictionary_downloading_progress(&self, completed: usize, total: usize) {
        if let Some(progress_bar) = self.progress_bar.lock().as_ref() {
            progress_bar.set_length(total as u64);
            progress_bar.set_position(completed as u64);
        }
    }

    fn show_dictionary_downloading_ended(&self, summary: Option<&DownloadSummary>) {
        if let Some(progress_bar) = self.progress_bar.lock().take() {
            progress_bar.finish_and_clear();
        }
        match summary {
            Some(summary) => info!("Downloaded {}", summary),
            None => eprintln!("The dictionary could not be downloaded"),
        }
    }

    fn show_user_name_not_changed_alert(&self) {
        eprintln!("The user name could not be changed");
    }

    fn show_server_problems_alert(&self) {
        eprintln!("The server is unavailable, try again later");
    }
}

/// Turns navigation requests into hints
pub struct TerminalRouter;

impl HistoryRouter for TerminalRouter {
    fn show_word_detail(&self, word: &str) {
        println!("Run `lexicard show {}` for details", word);
    }
}

impl DecksRouter for TerminalRouter {
    fn show_deck_detail(&self, deck_id: i64) {
        println!("Run `lexicard card list {}` to see its cards", deck_id);
    }
}

impl AccountRouter for TerminalRouter {
    fn show_entrance_flow(&self) {
        println!("Signed out. Run `lexicard login` to sign in again");
    }

    fn show_confirm_email(&self) {
        println!("Check your inbox for the confirmation code");
    }

    fn show_achievements(&self) {
        println!("Achievements are not available in the terminal");
    }

    fn show_change_password(&self) {
        println!("Passwords can be changed on the website");
    }

    fn show_registration(&self) {
        println!("Accounts can be created on the website");
    }
}
