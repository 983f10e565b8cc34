/*!
 * End-to-end vocabulary workflow against a file-backed store
 */

use anyhow::Result;
use std::sync::Arc;

use lexicard::database::connection::DatabaseConnection;
use lexicard::database::models::NewFlashcard;
use lexicard::database::{DataStore, Repository};
use lexicard::interactors::{DecksInteractor, DictionaryInteractor};
use lexicard::network::dictionary::DictionaryClient;

use crate::common;
use crate::common::mock_transport::MockTransport;

fn open_store(path: &std::path::Path) -> Result<Arc<Repository>> {
    Ok(Arc::new(Repository::new(DatabaseConnection::new(path)?)))
}

#[tokio::test]
async fn test_lookupThenStudy_shouldPersistAcrossReopen() -> Result<()> {
    common::init_logger();
    let dir = common::create_temp_dir();
    let db_path = dir.path().join("nested").join("lexicard.db");

    {
        let store = open_store(&db_path)?;
        let (network, _) = MockTransport::new()
            .lookup("apple", 200, &common::lookup_payload("apple", "яблоко"))
            .into_manager();
        let client = DictionaryClient::new(network, "https://dictionary.local/", "k", "en-ru");
        let dictionary = DictionaryInteractor::new(common::as_data_store(&store), Some(client));
        let decks = DecksInteractor::new(common::as_data_store(&store));

        let detail = dictionary
            .word_detail("apple")
            .await?
            .expect("apple should be found remotely");
        assert!(dictionary.record_lookup(detail.id));
        assert!(dictionary.set_favorite(detail.id, true));

        let deck = decks.create_deck("Fruit").expect("deck should be created");
        assert!(decks.save_flashcard(&NewFlashcard {
            front_side: detail.word.clone(),
            back_side: detail.translations[0].translation.clone(),
            deck_id: deck.id,
            comment: Some("from lookup".to_string()),
            create_reversed: true,
        }));
    }

    let store = open_store(&db_path)?;
    let dictionary = DictionaryInteractor::new(common::as_data_store(&store), None);
    let decks = DecksInteractor::new(common::as_data_store(&store));

    // Served from disk without a remote dictionary
    let detail = dictionary.word_detail("apple").await?.expect("apple should be stored");
    assert!(detail.is_favorite);
    assert_eq!(dictionary.get_words(Some("app"))[0].translations, vec!["яблоко"]);
    assert_eq!(dictionary.history()[0].searches_count, 1);

    let deck = &decks.decks(true)[0];
    assert_eq!(deck.name, "Fruit");
    assert_eq!(deck.flashcards.as_ref().map(Vec::len), Some(2));

    let stats = store.connection().stats()?;
    assert_eq!(stats.word_count, 1);
    assert_eq!(stats.flashcard_count, 2);
    assert!(stats.file_size_bytes > 0);
    Ok(())
}

#[test]
fn test_sharedStore_withConcurrentWriters_shouldKeepEveryWord() -> Result<()> {
    let dir = common::create_temp_dir();
    let store = open_store(&dir.path().join("shared.db"))?;

    let handles: Vec<_> = (0..4)
        .map(|thread| {
            let store = common::as_data_store(&store);
            std::thread::spawn(move || {
                for index in 0..10 {
                    let word = format!("word{}_{}", thread, index);
                    assert!(store.save_word(&common::sample_word(&word, "слово")));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("writer thread panicked");
    }

    assert_eq!(store.search_words("word").len(), 40);
    assert_eq!(store.connection().stats()?.word_count, 40);
    Ok(())
}
