/*!
 * Presenters and the view contracts they drive.
 *
 * A presenter keeps the state of one screen, asks its interactor for data
 * and tells the view what to display. Views and routers are traits so any
 * front end (the terminal, tests) can implement them.
 */

pub use self::account::{AccountPresenter, AccountRouter, AccountView};
pub use self::decks::{DecksPresenter, DecksRouter, DecksView};
pub use self::history::{HistoryPresenter, HistoryRouter, HistoryRow, HistorySection, HistoryView};
pub use self::new_flashcard::{NewFlashcardForm, NewFlashcardPresenter, NewFlashcardView};

pub mod account;
pub mod decks;
pub mod history;
pub mod new_flashcard;
