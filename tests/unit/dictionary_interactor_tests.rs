/*!
 * Tests for search, word detail, history and favorites
 */

use std::sync::Arc;

use lexicard::database::{DataStore, Repository};
use lexicard::interactors::DictionaryInteractor;
use lexicard::network::dictionary::DictionaryClient;
use lexicard::network::http::Method;

use crate::common;
use crate::common::mock_transport::MockTransport;

fn local_only() -> (DictionaryInteractor, Arc<Repository>) {
    common::init_logger();
    let store = common::create_store();
    let interactor = DictionaryInteractor::new(common::as_data_store(&store), None);
    (interactor, store)
}

#[test]
fn test_getWords_withoutQuery_shouldBeEmpty() {
    let (interactor, store) = local_only();
    assert!(store.save_word(&common::sample_word("time", "время")));

    assert!(interactor.get_words(None).is_empty());
    assert!(interactor.get_words(Some("   ")).is_empty());
}

#[test]
fn test_getWords_shouldTrimAndMatchSubstring() {
    let (interactor, store) = local_only();
    store.save_word(&common::sample_word("time", "время"));
    store.save_word(&common::sample_word("timer", "таймер"));
    store.save_word(&common::sample_word("cat", "кошка"));

    let words = interactor.get_words(Some(" TIM "));

    let mut found: Vec<_> = words.iter().map(|w| w.word.as_str()).collect();
    found.sort();
    assert_eq!(found, vec!["time", "timer"]);
}

#[tokio::test]
async fn test_wordDetail_withStoredWord_shouldNotCallRemote() {
    common::init_logger();
    let store = common::create_store();
    store.save_word(&common::sample_word("cat", "кошка"));
    let (network, tracker) = MockTransport::new().into_manager();
    let client = DictionaryClient::new(network, "https://dictionary.local/", "k", "en-ru");
    let interactor = DictionaryInteractor::new(common::as_data_store(&store), Some(client));

    let detail = interactor.word_detail("cat").await.unwrap().unwrap();

    assert_eq!(detail.translations[0].translation, "кошка");
    assert_eq!(tracker.lock().call_count(), 0);
}

#[tokio::test]
async fn test_wordDetail_withRemoteHit_shouldStoreWord() {
    common::init_logger();
    let store = common::create_store();
    let (network, tracker) = MockTransport::new()
        .lookup("dog", 200, &common::lookup_payload("dog", "собака"))
        .into_manager();
    let client = DictionaryClient::new(network, "https://dictionary.local/", "k", "en-ru");
    let interactor = DictionaryInteractor::new(common::as_data_store(&store), Some(client));

    let detail = interactor.word_detail("dog").await.unwrap().unwrap();

    assert!(detail.id > 0);
    assert_eq!(store.fetch_word_detail("dog"), Some(detail));

    // Second lookup is served from the store
    interactor.word_detail("dog").await.unwrap();
    assert_eq!(tracker.lock().calls_to(Method::Get, "lookup"), 1);
}

#[tokio::test]
async fn test_wordDetail_withRemoteFailure_shouldPropagateError() {
    common::init_logger();
    let store = common::create_store();
    let (network, _) = MockTransport::new().lookup("dog", 503, "").into_manager();
    let client = DictionaryClient::new(network, "https://dictionary.local/", "k", "en-ru");
    let interactor = DictionaryInteractor::new(common::as_data_store(&store), Some(client));

    let error = interactor.word_detail("dog").await.unwrap_err();

    assert!(error.is_server_problem());
    assert!(store.fetch_word_detail("dog").is_none());
}

#[tokio::test]
async fn test_wordDetail_withoutRemote_shouldBeNone() {
    let (interactor, _) = local_only();
    assert_eq!(interactor.word_detail("unknown").await.unwrap(), None);
    assert_eq!(interactor.word_detail("  ").await.unwrap(), None);
}

#[test]
fn test_recordLookup_shouldAppearInHistoryNewestFirst() {
    let (interactor, store) = local_only();
    store.save_word(&common::sample_word("time", "время"));
    store.save_word(&common::sample_word("cat", "кошка"));
    let time_id = store.fetch_word_detail("time").unwrap().id;
    let cat_id = store.fetch_word_detail("cat").unwrap().id;

    assert!(store.add_history_word(cat_id, common::timestamp("2022-01-01T10:00:00Z")));
    assert!(interactor.record_lookup(time_id));
    assert!(!interactor.record_lookup(9999));

    let history = interactor.history();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].word, "time");
    assert_eq!(history[1].word, "cat");
    assert_eq!(history[1].translations, vec!["кошка"]);
}

#[test]
fn test_setFavorite_shouldListFavorites() {
    let (interactor, store) = local_only();
    store.save_word(&common::sample_word("time", "время"));
    store.save_word(&common::sample_word("cat", "кошка"));
    let cat_id = store.fetch_word_detail("cat").unwrap().id;

    assert!(interactor.favorites().is_empty());
    assert!(interactor.set_favorite(cat_id, true));

    let favorites = interactor.favorites();
    assert_eq!(favorites.len(), 1);
    assert_eq!(favorites[0].word, "cat");

    assert!(interactor.set_favorite(cat_id, false));
    assert!(interactor.favorites().is_empty());
}
