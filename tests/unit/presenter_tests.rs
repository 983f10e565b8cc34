/*!
 * Tests for presenters driving recording views and routers
 */

use std::sync::Arc;

use chrono::{FixedOffset, Local};

use lexicard::app_config::DownloadConfig;
use lexicard::credentials::{CredentialStore, MemoryCredentialStore};
use lexicard::database::models::{User, UserState};
use lexicard::database::{DataStore, Repository};
use lexicard::interactors::{AccountInteractor, DecksInteractor, DictionaryInteractor, Setting};
use lexicard::network::dictionary::DictionaryClient;
use lexicard::network::http::Method;
use lexicard::presentation::{
    AccountPresenter, DecksPresenter, HistoryPresenter, NewFlashcardForm, NewFlashcardPresenter,
};
use lexicard::validation::ValidationManager;

use crate::common;
use crate::common::mock_transport::MockTransport;
use crate::common::mock_views::{RecordingRouter, RecordingView, Route, ViewEvent};

// ============================================================================
// History
// ============================================================================

#[test]
fn test_historyPresenter_viewDidLoad_shouldShowSectionsByDay() {
    let store = common::create_store();
    store.save_word(&common::sample_word("time", "время"));
    store.save_word(&common::sample_word("cat", "кошка"));
    let time_id = store.fetch_word_detail("time").unwrap().id;
    let cat_id = store.fetch_word_detail("cat").unwrap().id;
    store.add_history_word(cat_id, common::timestamp("2022-01-02T09:00:00Z"));
    store.add_history_word(time_id, common::timestamp("2022-01-03T09:00:00Z"));
    store.add_history_word(time_id, common::timestamp("2022-01-03T18:00:00Z"));

    let interactor = Arc::new(DictionaryInteractor::new(common::as_data_store(&store), None));
    let view = Arc::new(RecordingView::new());
    let router = Arc::new(RecordingRouter::new());
    let utc = FixedOffset::east_opt(0).unwrap();
    let presenter = HistoryPresenter::with_offset(interactor, view.clone(), router.clone(), utc);

    presenter.view_did_load();

    let events = view.events();
    let [ViewEvent::Sections(sections)] = events.as_slice() else {
        panic!("expected one sections event, got {:?}", events);
    };
    assert_eq!(sections.len(), 2);
    assert_eq!(sections[0].title, "Monday, Jan 3");
    assert_eq!(sections[0].words.len(), 2);
    assert_eq!(sections[0].words[0].searches_count, 2);
    assert_eq!(sections[0].words[1].searches_count, 1);
    assert_eq!(sections[1].words[0].word, "cat");
    assert_eq!(sections[1].words[0].translations, "кошка");

    presenter.did_select_word(&sections[1].words[0]);
    assert_eq!(router.routes(), vec![Route::WordDetail("cat".to_string())]);
}

#[test]
fn test_historyPresenter_withLocalZone_shouldGroupAcrossDaylightSaving() {
    let store = common::create_store();
    let lookups = [
        ("winter", "2022-01-15T23:30:00Z"),
        ("spring", "2022-03-27T00:30:00Z"),
        ("summer", "2022-07-15T23:30:00Z"),
        ("autumn", "2022-10-30T00:30:00Z"),
    ];
    for (word, at) in lookups {
        store.save_word(&common::sample_word(word, "слово"));
        let id = store.fetch_word_detail(word).unwrap().id;
        store.add_history_word(id, common::timestamp(at));
    }

    let interactor = Arc::new(DictionaryInteractor::new(common::as_data_store(&store), None));
    let view = Arc::new(RecordingView::new());
    let presenter = HistoryPresenter::new(interactor, view.clone(), Arc::new(RecordingRouter::new()));

    presenter.view_did_load();

    let events = view.events();
    let [ViewEvent::Sections(sections)] = events.as_slice() else {
        panic!("expected one sections event, got {:?}", events);
    };
    for (word, at) in lookups {
        let expected = common::timestamp(at).with_timezone(&Local).date_naive();
        let section = sections
            .iter()
            .find(|section| section.words.iter().any(|row| row.word == word))
            .unwrap();
        assert_eq!(section.date, expected, "{}", word);
    }
}

// ============================================================================
// Decks
// ============================================================================

fn decks_presenter(store: &Arc<Repository>) -> (DecksPresenter, Arc<RecordingView>, Arc<RecordingRouter>) {
    let interactor = Arc::new(DecksInteractor::new(common::as_data_store(store)));
    let view = Arc::new(RecordingView::new());
    let router = Arc::new(RecordingRouter::new());
    let presenter = DecksPresenter::new(interactor, view.clone(), router.clone());
    (presenter, view, router)
}

#[test]
fn test_decksPresenter_viewDidLoad_shouldShowOldestFirst() {
    let store = common::create_store();
    common::insert_deck_at(&store, "B", "2022-02-01T00:00:00Z");
    common::insert_deck_at(&store, "A", "2022-01-01T00:00:00Z");
    let (mut presenter, view, _) = decks_presenter(&store);

    presenter.view_did_load();

    assert_eq!(
        view.events(),
        vec![ViewEvent::Decks(vec!["A".to_string(), "B".to_string()])]
    );
    assert_eq!(presenter.decks().len(), 2);
}

#[test]
fn test_decksPresenter_deckNameChanged_shouldToggleConfirmButton() {
    let store = common::create_store();
    let (presenter, view, _) = decks_presenter(&store);

    presenter.deck_name_changed("");
    presenter.deck_name_changed("   ");
    presenter.deck_name_changed("Verbs");

    assert_eq!(
        view.events(),
        vec![
            ViewEvent::AlertActionEnabled(false),
            ViewEvent::AlertActionEnabled(false),
            ViewEvent::AlertActionEnabled(true),
        ]
    );
}

#[test]
fn test_decksPresenter_createDeck_shouldAppendOrAlert() {
    let store = common::create_store();
    let (mut presenter, view, _) = decks_presenter(&store);
    presenter.view_did_load();

    presenter.create_deck("Verbs");
    presenter.create_deck("  ");

    assert!(view.contains(&ViewEvent::AppendDeck("Verbs".to_string())));
    assert!(view.contains(&ViewEvent::DeckNotCreated));
    assert_eq!(presenter.decks().len(), 1);
}

#[test]
fn test_decksPresenter_deleteAndSelect_shouldUseRowIndex() {
    let store = common::create_store();
    let older = common::insert_deck_at(&store, "Older", "2022-01-01T00:00:00Z");
    let newer = common::insert_deck_at(&store, "Newer", "2022-02-01T00:00:00Z");
    let (mut presenter, view, router) = decks_presenter(&store);
    presenter.view_did_load();

    presenter.did_select_deck(1);
    presenter.did_select_deck(5);
    assert_eq!(router.routes(), vec![Route::DeckDetail(newer)]);

    assert!(presenter.delete_deck(0));
    assert!(!presenter.delete_deck(3));

    assert_eq!(presenter.decks().len(), 1);
    assert_ne!(presenter.decks()[0].id, older);
    assert_eq!(
        view.events().last(),
        Some(&ViewEvent::Decks(vec!["Newer".to_string()]))
    );
}

// ============================================================================
// New flashcard
// ============================================================================

fn form(front: Option<&str>, back: Option<&str>, deck_index: Option<usize>) -> NewFlashcardForm {
    NewFlashcardForm {
        front_side: front.map(str::to_string),
        back_side: back.map(str::to_string),
        deck_index,
        comment: Some(String::new()),
        create_reversed: false,
    }
}

#[test]
fn test_newFlashcardPresenter_viewDidLoad_shouldPreselectDeck() {
    let store = common::create_store();
    common::insert_deck_at(&store, "First", "2022-01-01T00:00:00Z");
    let second = common::insert_deck_at(&store, "Second", "2022-01-02T00:00:00Z");
    let interactor = Arc::new(DecksInteractor::new(common::as_data_store(&store)));
    let view = Arc::new(RecordingView::new());
    let mut presenter = NewFlashcardPresenter::new(interactor, view.clone(), Some(second));

    presenter.view_did_load();

    assert_eq!(
        view.events(),
        vec![
            ViewEvent::DeckNames(vec!["First".to_string(), "Second".to_string()]),
            ViewEvent::CurrentDeck(1),
        ]
    );
}

#[test]
fn test_newFlashcardPresenter_viewDidLoad_shouldListDecksOldestFirst() {
    let store = common::create_store();
    let newer = common::insert_deck_at(&store, "Newer", "2022-05-01T00:00:00Z");
    common::insert_deck_at(&store, "Older", "2021-05-01T00:00:00Z");
    let interactor = Arc::new(DecksInteractor::new(common::as_data_store(&store)));
    let view = Arc::new(RecordingView::new());
    let mut presenter = NewFlashcardPresenter::new(interactor, view.clone(), Some(newer));

    presenter.view_did_load();

    assert_eq!(
        view.events(),
        vec![
            ViewEvent::DeckNames(vec!["Older".to_string(), "Newer".to_string()]),
            ViewEvent::CurrentDeck(1),
        ]
    );
}

#[test]
fn test_newFlashcardPresenter_didTapSave_shouldValidateBeforeSaving() {
    let store = common::create_store();
    let deck_id = common::insert_deck_at(&store, "Only", "2022-01-01T00:00:00Z");
    let interactor = Arc::new(DecksInteractor::new(common::as_data_store(&store)));
    let view = Arc::new(RecordingView::new());
    let mut presenter = NewFlashcardPresenter::new(interactor, view.clone(), None);
    presenter.view_did_load();

    presenter.did_tap_save(form(None, Some("b"), Some(0)));
    presenter.did_tap_save(form(Some(""), Some("b"), Some(0)));
    presenter.did_tap_save(form(Some("a"), Some("b"), None));
    presenter.did_tap_save(form(Some("a"), Some("b"), Some(4)));
    assert!(store.fetch_flashcards(deck_id).unwrap().is_empty());

    presenter.did_tap_save(form(Some("a"), Some("b"), Some(0)));

    assert_eq!(
        view.events()[1..],
        [
            ViewEvent::EmptySidesAlert,
            ViewEvent::EmptySidesAlert,
            ViewEvent::NoDeckChosenAlert,
            ViewEvent::NoDeckChosenAlert,
            ViewEvent::Close,
        ]
    );
    let cards = store.fetch_flashcards(deck_id).unwrap();
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0].comment, None);
}

// ============================================================================
// Account
// ============================================================================

struct AccountFixture {
    presenter: AccountPresenter,
    view: Arc<RecordingView>,
    router: Arc<RecordingRouter>,
    store: Arc<Repository>,
}

fn account_presenter(transport: MockTransport, with_dictionary: bool) -> AccountFixture {
    common::init_logger();
    let store = common::create_store();
    let credentials = Arc::new(MemoryCredentialStore::new());
    store.save_user(&User {
        id: 3,
        email: "trinity@example.com".to_string(),
        user_name: "trinity".to_string(),
        state: UserState::Active,
    });
    credentials.save_token("Bearer xyz").unwrap();

    let (network, _) = transport.into_manager();
    let dictionary = with_dictionary
        .then(|| DictionaryClient::new(network.clone(), "https://dictionary.local/", "k", "en-ru"));
    let interactor = Arc::new(AccountInteractor::new(
        common::as_data_store(&store),
        network,
        dictionary,
        credentials,
        Arc::new(ValidationManager),
        DownloadConfig::default(),
    ));

    let view = Arc::new(RecordingView::new());
    let router = Arc::new(RecordingRouter::new());
    let presenter = AccountPresenter::new(interactor, view.clone(), router.clone());
    AccountFixture {
        presenter,
        view,
        router,
        store,
    }
}

#[test]
fn test_accountPresenter_viewDidLoad_shouldSetupSettings() {
    let f = account_presenter(MockTransport::new(), false);

    f.presenter.view_did_load();

    assert_eq!(
        f.view.events(),
        vec![ViewEvent::Setup(
            Setting::for_state(UserState::Active),
            "trinity".to_string()
        )]
    );
}

#[test]
fn test_accountPresenter_settingsTapped_shouldRouteOrAsk() {
    let f = account_presenter(MockTransport::new(), false);

    f.presenter.settings_tapped(Setting::ConfirmEmail);
    f.presenter.settings_tapped(Setting::ShowAchievements);
    f.presenter.settings_tapped(Setting::ChangePassword);
    f.presenter.settings_tapped(Setting::Registration);
    f.presenter.settings_tapped(Setting::DownloadDictionary);
    f.presenter.settings_tapped(Setting::Exit);
    f.presenter.settings_tapped(Setting::DeleteAccount);

    assert_eq!(
        f.router.routes(),
        vec![
            Route::ConfirmEmail,
            Route::Achievements,
            Route::ChangePassword,
            Route::Registration,
        ]
    );
    assert_eq!(
        f.view.events(),
        vec![ViewEvent::AskDownload, ViewEvent::AskExit, ViewEvent::AskDelete]
    );
}

#[tokio::test]
async fn test_accountPresenter_changeUserName_shouldReloadOrAlert() {
    let f = account_presenter(
        MockTransport::new().respond(Method::Put, "users/3", 200, "{}"),
        false,
    );

    f.presenter.change_user_name("no").await;
    assert_eq!(f.view.events(), vec![ViewEvent::UserNameNotChanged]);

    f.presenter.change_user_name("morpheus").await;
    assert_eq!(
        f.view.events().last(),
        Some(&ViewEvent::Setup(
            Setting::for_state(UserState::Active),
            "morpheus".to_string()
        ))
    );
}

#[tokio::test]
async fn test_accountPresenter_downloadDictionary_shouldReportProgress() {
    let f = account_presenter(
        MockTransport::new()
            .respond(Method::Get, "words/popular", 200, r#"["sun", "moon"]"#)
            .lookup("sun", 200, &common::lookup_payload("sun", "солнце"))
            .lookup("moon", 200, &common::lookup_payload("moon", "луна")),
        true,
    );

    f.presenter.download_dictionary().await;

    let events = f.view.events();
    assert_eq!(events.first(), Some(&ViewEvent::DownloadStarted));
    assert!(events.contains(&ViewEvent::DownloadProgress(2, 2)));
    let Some(ViewEvent::DownloadEnded(Some(summary))) = events.last() else {
        panic!("expected a finished download, got {:?}", events);
    };
    assert_eq!(summary.saved, 2);
    assert!(f.store.fetch_word_detail("moon").is_some());
}

#[tokio::test]
async fn test_accountPresenter_downloadDictionary_withoutKey_shouldEndWithoutSummary() {
    let f = account_presenter(MockTransport::new(), false);

    f.presenter.download_dictionary().await;

    assert_eq!(
        f.view.events(),
        vec![ViewEvent::DownloadStarted, ViewEvent::DownloadEnded(None)]
    );
}

#[test]
fn test_accountPresenter_exit_shouldClearUserAndShowEntrance() {
    let f = account_presenter(MockTransport::new(), false);

    f.presenter.exit();

    assert!(f.store.fetch_user().is_none());
    assert_eq!(f.router.routes(), vec![Route::EntranceFlow]);
}

#[tokio::test]
async fn test_accountPresenter_deleteAccount_shouldRouteOrAlert() {
    let failing = account_presenter(
        MockTransport::new().respond(Method::Delete, "users/3", 503, ""),
        false,
    );
    failing.presenter.delete_account().await;
    assert_eq!(failing.view.events(), vec![ViewEvent::ServerProblems]);
    assert!(failing.router.routes().is_empty());

    let accepted = account_presenter(
        MockTransport::new().respond(Method::Delete, "users/3", 200, ""),
        false,
    );
    accepted.presenter.delete_account().await;
    assert_eq!(accepted.router.routes(), vec![Route::EntranceFlow]);
    assert!(accepted.store.fetch_user().is_none());
}
