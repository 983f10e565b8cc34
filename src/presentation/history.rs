/*!
 * Lookup history screen.
 *
 * History records are grouped by calendar day in the viewer's time zone,
 * newest day first, with translations flattened into one line.
 */

use chrono::{FixedOffset, Local, NaiveDate, TimeZone};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::database::models::HistoryWord;
use crate::interactors::DictionaryInteractor;

/// Section title format, e.g. "Monday, Jan 3"
const SECTION_TITLE_FORMAT: &str = "%A, %b %-d";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRow {
    pub word: String,
    /// Translations joined with ", "
    pub translations: String,
    pub searches_count: i64,
}

/// History entries of one day
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistorySection {
    pub title: String,
    pub date: NaiveDate,
    pub words: Vec<HistoryRow>,
}

pub trait HistoryView: Send + Sync {
    fn show_words(&self, sections: Vec<HistorySection>);
}

pub trait HistoryRouter: Send + Sync {
    fn show_word_detail(&self, word: &str);
}

/// Group history by day in `tz`, newest day first
///
/// Rows keep the order they have in `history`.
pub fn group_history<Tz: TimeZone>(history: &[HistoryWord], tz: &Tz) -> Vec<HistorySection> {
    let mut days: BTreeMap<NaiveDate, Vec<HistoryRow>> = BTreeMap::new();

    for entry in history {
        let date = entry.date_added.with_timezone(tz).date_naive();
        days.entry(date).or_default().push(HistoryRow {
            word: entry.word.clone(),
            translations: entry.translations.join(", "),
            searches_count: entry.searches_count,
        });
    }

    days.into_iter()
        .rev()
        .map(|(date, words)| HistorySection {
            title: date.format(SECTION_TITLE_FORMAT).to_string(),
            date,
            words,
        })
        .collect()
}

pub struct HistoryPresenter {
    interactor: Arc<DictionaryInteractor>,
    view: Arc<dyn HistoryView>,
    router: Arc<dyn HistoryRouter>,
    /// Fixed offset, or `None` for the local zone with its DST rules
    offset: Option<FixedOffset>,
}

impl HistoryPresenter {
    /// Presenter grouping by the local time zone
    pub fn new(
        interactor: Arc<DictionaryInteractor>,
        view: Arc<dyn HistoryView>,
        router: Arc<dyn HistoryRouter>,
    ) -> Self {
        Self {
            interactor,
            view,
            router,
            offset: None,
        }
    }

    /// Presenter grouping by a fixed UTC offset
    pub fn with_offset(
        interactor: Arc<DictionaryInteractor>,
        view: Arc<dyn HistoryView>,
        router: Arc<dyn HistoryRouter>,
        offset: FixedOffset,
    ) -> Self {
        Self {
            interactor,
            view,
            router,
            offset: Some(offset),
        }
    }

    pub fn view_did_load(&self) {
        let history = self.interactor.history();
        let sections = match &self.offset {
            Some(offset) => group_history(&history, offset),
            None => group_history(&history, &Local),
        };
        self.view.show_words(sections);
    }

    pub fn did_select_word(&self, row: &HistoryRow) {
        self.router.show_word_detail(&row.word);
    }
}
