/*!
 * Repository layer for database operations.
 *
 * This module provides the persistence gateway: a high-level API over the
 * store that abstracts away the SQL details. Store failures never cross
 * this boundary; they are logged and degrade to empty results, `None`
 * or `false`.
 */

use anyhow::Result;
use chrono::{DateTime, SecondsFormat, Utc};
use log::{debug, warn};
use rand::Rng;
use rusqlite::{params, Connection, OptionalExtension};

use super::connection::DatabaseConnection;
use super::models::{
    Deck, Example, Flashcard, HistoryWord, NewFlashcard, Translation, User, UserState, Word,
    WordDetail,
};

/// Upper bound for ids generated when a caller-provided id is taken
pub const MAX_GENERATED_ID: i64 = 1_000_000;

/// Storage interface used by interactors
///
/// Every method blocks until the operation has completed; calls issued in
/// order from one thread complete in that order.
pub trait DataStore: Send + Sync {
    /// Words whose text contains `word_part`, case-insensitively
    fn search_words(&self, word_part: &str) -> Vec<Word>;

    /// Store a word unless its text key exists; returns whether it was inserted
    fn save_word(&self, word: &WordDetail) -> bool;

    /// Full detail of a word by exact text key
    fn fetch_word_detail(&self, word: &str) -> Option<WordDetail>;

    /// Words flagged as favorite
    fn fetch_favorite_words(&self) -> Vec<Word>;

    /// Set or clear the favorite flag; `false` if the word is unknown
    fn set_favorite(&self, word_id: i64, is_favorite: bool) -> bool;

    /// All lookup history records, unsorted
    fn fetch_history(&self) -> Vec<HistoryWord>;

    /// Record a lookup; `false` and no record if the word id is unknown
    fn add_history_word(&self, word_id: i64, time_opened: DateTime<Utc>) -> bool;

    /// All decks, optionally with their flashcards
    fn fetch_decks(&self, include_flashcards: bool) -> Vec<Deck>;

    /// Create an empty deck
    fn create_deck(&self, name: &str) -> Option<Deck>;

    /// Delete a deck and its flashcards
    fn delete_deck(&self, deck_id: i64) -> bool;

    /// Create a flashcard (and its reverse if requested); `false` if the deck is unknown
    fn save_new_flashcard(&self, flashcard: &NewFlashcard) -> bool;

    /// Flashcards of a deck; `None` if the deck is unknown
    fn fetch_flashcards(&self, deck_id: i64) -> Option<Vec<Flashcard>>;

    /// Single flashcard by id
    fn fetch_flashcard(&self, flashcard_id: i64) -> Option<Flashcard>;

    /// Delete a flashcard
    fn delete_flashcard(&self, flashcard_id: i64) -> bool;

    /// Rewrite a flashcard's content and move it to `updated_deck_id`
    fn update_flashcard(&self, flashcard: &Flashcard, updated_deck_id: i64) -> bool;

    /// Replace the locally cached account
    fn save_user(&self, user: &User) -> bool;

    /// Locally cached account
    fn fetch_user(&self) -> Option<User>;

    /// Forget the locally cached account
    fn delete_user(&self) -> bool;
}

/// SQLite-backed persistence gateway
#[derive(Clone)]
pub struct Repository {
    /// Database connection
    db: DatabaseConnection,
}

/// Tables whose ids are checked before reuse
#[derive(Debug, Clone, Copy)]
enum IdTable {
    Translations,
    Examples,
}

impl IdTable {
    fn exists_query(self) -> &'static str {
        match self {
            IdTable::Translations => "SELECT EXISTS(SELECT 1 FROM translations WHERE id = ?1)",
            IdTable::Examples => "SELECT EXISTS(SELECT 1 FROM examples WHERE id = ?1)",
        }
    }
}

fn format_timestamp(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(idx: usize, value: String) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(&value)
        .map(|time| time.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}

/// Log a store failure and fall back to `default`
fn degrade<T>(operation: &str, result: Result<T>, default: T) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            warn!("Store operation '{}' failed: {:#}", operation, e);
            default
        }
    }
}

impl Repository {
    /// Create a new repository with the given database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a repository with the default database location
    pub fn new_default() -> Result<Self> {
        let db = DatabaseConnection::new_default()?;
        Ok(Self::new(db))
    }

    /// Create a repository with an in-memory database (for testing)
    pub fn new_in_memory() -> Result<Self> {
        let db = DatabaseConnection::new_in_memory()?;
        Ok(Self::new(db))
    }

    /// Underlying connection handle
    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    // =========================================================================
    // Word Operations
    // =========================================================================

    fn search_words_sync(conn: &Connection, word_part: &str) -> Result<Vec<Word>> {
        let needle = word_part.to_lowercase();
        if needle.is_empty() {
            return Ok(Vec::new());
        }

        // SQLite's LIKE folds ASCII only, so matching happens here
        let mut stmt = conn.prepare("SELECT id, word FROM words ORDER BY word")?;
        let candidates: Vec<(i64, String)> = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<rusqlite::Result<_>>()?;

        candidates
            .into_iter()
            .filter(|(_, word)| word.to_lowercase().contains(&needle))
            .map(|(id, word)| -> Result<Word> {
                Ok(Word {
                    id,
                    translations: Self::translation_texts(conn, id)?,
                    word,
                })
            })
            .collect()
    }

    fn translation_texts(conn: &Connection, word_id: i64) -> Result<Vec<String>> {
        let mut stmt = conn.prepare(
            "SELECT translation FROM translations WHERE word_id = ?1 ORDER BY position",
        )?;
        let texts = stmt
            .query_map([word_id], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(texts)
    }

    fn id_is_free(conn: &Connection, table: IdTable, id: i64) -> Result<bool> {
        if id <= 0 {
            return Ok(false);
        }
        let exists: bool = conn.query_row(table.exists_query(), [id], |row| row.get(0))?;
        Ok(!exists)
    }

    /// Keep `requested` when unused, otherwise draw random ids until one is free
    fn resolve_id(conn: &Connection, table: IdTable, requested: i64) -> Result<i64> {
        if Self::id_is_free(conn, table, requested)? {
            return Ok(requested);
        }

        let mut rng = rand::rng();
        loop {
            let candidate = rng.random_range(1..=MAX_GENERATED_ID);
            if Self::id_is_free(conn, table, candidate)? {
                debug!(
                    "Id {} already used in {:?}, replaced with {}",
                    requested, table, candidate
                );
                return Ok(candidate);
            }
        }
    }

    fn save_word_sync(conn: &Connection, word: &WordDetail) -> Result<bool> {
        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM words WHERE word = ?1)",
            [&word.word],
            |row| row.get(0),
        )?;
        if exists {
            return Ok(false);
        }

        conn.execute(
            "INSERT INTO words (word, is_favorite, created_at) VALUES (?1, ?2, ?3)",
            params![word.word, word.is_favorite, format_timestamp(&Utc::now())],
        )?;
        let word_id = conn.last_insert_rowid();

        for (position, translation) in word.translations.iter().enumerate() {
            let translation_id = Self::resolve_id(conn, IdTable::Translations, translation.id)?;
            conn.execute(
                r#"
                INSERT INTO translations (id, word_id, position, translation, speech_part, transcription)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
                params![
                    translation_id,
                    word_id,
                    position as i64,
                    translation.translation,
                    translation.speech_part,
                    translation.transcription,
                ],
            )?;

            for (example_position, example) in translation.examples.iter().enumerate() {
                let example_id = Self::resolve_id(conn, IdTable::Examples, example.id)?;
                conn.execute(
                    r#"
                    INSERT INTO examples (id, translation_id, position, example, example_translation)
                    VALUES (?1, ?2, ?3, ?4, ?5)
                    "#,
                    params![
                        example_id,
                        translation_id,
                        example_position as i64,
                        example.example,
                        example.translation,
                    ],
                )?;
            }
        }

        Ok(true)
    }

    fn fetch_word_detail_sync(conn: &Connection, word: &str) -> Result<Option<WordDetail>> {
        let row = conn
            .query_row(
                "SELECT id, word, is_favorite FROM words WHERE word = ?1",
                [word],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, bool>(2)?,
                    ))
                },
            )
            .optional()?;

        let Some((id, word, is_favorite)) = row else {
            return Ok(None);
        };

        let mut stmt = conn.prepare(
            r#"
            SELECT id, translation, speech_part, transcription
            FROM translations WHERE word_id = ?1 ORDER BY position
            "#,
        )?;
        let translations = stmt
            .query_map([id], |row| {
                Ok(Translation {
                    id: row.get(0)?,
                    translation: row.get(1)?,
                    speech_part: row.get(2)?,
                    transcription: row.get(3)?,
                    examples: Vec::new(),
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut example_stmt = conn.prepare(
            r#"
            SELECT id, example, example_translation
            FROM examples WHERE translation_id = ?1 ORDER BY position
            "#,
        )?;
        let translations = translations
            .into_iter()
            .map(|mut translation| -> Result<Translation> {
                translation.examples = example_stmt
                    .query_map([translation.id], |row| {
                        Ok(Example {
                            id: row.get(0)?,
                            example: row.get(1)?,
                            translation: row.get(2)?,
                        })
                    })?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(translation)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Some(WordDetail {
            id,
            word,
            is_favorite,
            translations,
        }))
    }

    fn fetch_favorite_words_sync(conn: &Connection) -> Result<Vec<Word>> {
        let mut stmt =
            conn.prepare("SELECT id, word FROM words WHERE is_favorite = 1 ORDER BY word")?;
        let rows: Vec<(i64, String)> = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<rusqlite::Result<_>>()?;

        rows.into_iter()
            .map(|(id, word)| -> Result<Word> {
                Ok(Word {
                    id,
                    translations: Self::translation_texts(conn, id)?,
                    word,
                })
            })
            .collect()
    }

    // =========================================================================
    // History Operations
    // =========================================================================

    fn fetch_history_sync(conn: &Connection) -> Result<Vec<HistoryWord>> {
        let mut stmt = conn.prepare(
            r#"
            SELECT h.word_id, w.word, h.time_opened, h.searches_count
            FROM history_words h
            JOIN words w ON w.id = h.word_id
            "#,
        )?;
        let rows: Vec<(i64, String, DateTime<Utc>, i64)> = stmt
            .query_map([], |row| {
                Ok((
                    row.get(0)?,
                    row.get(1)?,
                    parse_timestamp(2, row.get(2)?)?,
                    row.get(3)?,
                ))
            })?
            .collect::<rusqlite::Result<_>>()?;

        rows.into_iter()
            .map(|(word_id, word, date_added, searches_count)| -> Result<HistoryWord> {
                Ok(HistoryWord {
                    word,
                    translations: Self::translation_texts(conn, word_id)?,
                    date_added,
                    searches_count,
                })
            })
            .collect()
    }

    fn add_history_word_sync(
        conn: &Connection,
        word_id: i64,
        time_opened: &DateTime<Utc>,
    ) -> Result<bool> {
        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM words WHERE id = ?1)",
            [word_id],
            |row| row.get(0),
        )?;
        if !exists {
            debug!("History not recorded: word {} does not exist", word_id);
            return Ok(false);
        }

        let previous: i64 = conn.query_row(
            "SELECT COUNT(*) FROM history_words WHERE word_id = ?1",
            [word_id],
            |row| row.get(0),
        )?;

        conn.execute(
            "INSERT INTO history_words (word_id, time_opened, searches_count) VALUES (?1, ?2, ?3)",
            params![word_id, format_timestamp(time_opened), previous + 1],
        )?;
        Ok(true)
    }

    // =========================================================================
    // Deck and Flashcard Operations
    // =========================================================================

    fn deck_exists(conn: &Connection, deck_id: i64) -> Result<bool> {
        Ok(conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM decks WHERE id = ?1)",
            [deck_id],
            |row| row.get(0),
        )?)
    }

    fn parse_flashcard_row(row: &rusqlite::Row) -> rusqlite::Result<Flashcard> {
        Ok(Flashcard {
            id: row.get(0)?,
            deck_id: row.get(1)?,
            front_side: row.get(2)?,
            back_side: row.get(3)?,
            comment: row.get(4)?,
            created_at: parse_timestamp(5, row.get(5)?)?,
        })
    }

    fn flashcards_of(conn: &Connection, deck_id: i64) -> Result<Vec<Flashcard>> {
        let mut stmt = conn.prepare(
            r#"
            SELECT id, deck_id, front_side, back_side, comment, created_at
            FROM flashcards WHERE deck_id = ?1 ORDER BY id
            "#,
        )?;
        let cards = stmt
            .query_map([deck_id], Self::parse_flashcard_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(cards)
    }

    fn fetch_decks_sync(conn: &Connection, include_flashcards: bool) -> Result<Vec<Deck>> {
        let mut stmt = conn.prepare("SELECT id, name, created_at FROM decks ORDER BY id")?;
        let decks = stmt
            .query_map([], |row| {
                Ok(Deck {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    created_at: parse_timestamp(2, row.get(2)?)?,
                    flashcards: None,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        if !include_flashcards {
            return Ok(decks);
        }

        decks
            .into_iter()
            .map(|mut deck| -> Result<Deck> {
                deck.flashcards = Some(Self::flashcards_of(conn, deck.id)?);
                Ok(deck)
            })
            .collect()
    }

    fn create_deck_sync(conn: &Connection, name: &str) -> Result<Deck> {
        let created_at = Utc::now();
        conn.execute(
            "INSERT INTO decks (name, created_at) VALUES (?1, ?2)",
            params![name, format_timestamp(&created_at)],
        )?;

        // Re-read so the timestamp carries the stored precision
        let id = conn.last_insert_rowid();
        let stored: String =
            conn.query_row("SELECT created_at FROM decks WHERE id = ?1", [id], |row| {
                row.get(0)
            })?;

        Ok(Deck {
            id,
            name: name.to_string(),
            created_at: parse_timestamp(0, stored)?,
            flashcards: Some(Vec::new()),
        })
    }

    fn insert_flashcard(
        conn: &Connection,
        deck_id: i64,
        front_side: &str,
        back_side: &str,
        comment: Option<&str>,
        created_at: &str,
    ) -> Result<()> {
        conn.execute(
            r#"
            INSERT INTO flashcards (deck_id, front_side, back_side, comment, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![deck_id, front_side, back_side, comment, created_at],
        )?;
        Ok(())
    }

    fn save_new_flashcard_sync(conn: &Connection, flashcard: &NewFlashcard) -> Result<bool> {
        if !Self::deck_exists(conn, flashcard.deck_id)? {
            debug!("Flashcard not saved: deck {} does not exist", flashcard.deck_id);
            return Ok(false);
        }

        let created_at = format_timestamp(&Utc::now());
        let comment = flashcard.comment.as_deref();

        Self::insert_flashcard(
            conn,
            flashcard.deck_id,
            &flashcard.front_side,
            &flashcard.back_side,
            comment,
            &created_at,
        )?;

        if flashcard.create_reversed {
            Self::insert_flashcard(
                conn,
                flashcard.deck_id,
                &flashcard.back_side,
                &flashcard.front_side,
                comment,
                &created_at,
            )?;
        }

        Ok(true)
    }

    fn fetch_flashcards_sync(conn: &Connection, deck_id: i64) -> Result<Option<Vec<Flashcard>>> {
        if !Self::deck_exists(conn, deck_id)? {
            return Ok(None);
        }
        Ok(Some(Self::flashcards_of(conn, deck_id)?))
    }

    fn fetch_flashcard_sync(conn: &Connection, flashcard_id: i64) -> Result<Option<Flashcard>> {
        let card = conn
            .query_row(
                r#"
                SELECT id, deck_id, front_side, back_side, comment, created_at
                FROM flashcards WHERE id = ?1
                "#,
                [flashcard_id],
                Self::parse_flashcard_row,
            )
            .optional()?;
        Ok(card)
    }

    fn update_flashcard_sync(
        conn: &Connection,
        flashcard: &Flashcard,
        updated_deck_id: i64,
    ) -> Result<bool> {
        let Some(current) = Self::fetch_flashcard_sync(conn, flashcard.id)? else {
            debug!("Flashcard {} not updated: it does not exist", flashcard.id);
            return Ok(false);
        };

        // A card must always belong to an existing deck
        if !Self::deck_exists(conn, updated_deck_id)? {
            debug!(
                "Flashcard {} not moved: deck {} does not exist",
                flashcard.id, updated_deck_id
            );
            return Ok(false);
        }

        conn.execute(
            r#"
            UPDATE flashcards
            SET front_side = ?1, back_side = ?2, comment = ?3, deck_id = ?4
            WHERE id = ?5
            "#,
            params![
                flashcard.front_side,
                flashcard.back_side,
                flashcard.comment,
                updated_deck_id,
                current.id,
            ],
        )?;

        if current.deck_id != updated_deck_id {
            debug!(
                "Flashcard {} moved from deck {} to deck {}",
                current.id, current.deck_id, updated_deck_id
            );
        }
        Ok(true)
    }

    // =========================================================================
    // Account Operations
    // =========================================================================

    fn fetch_user_sync(conn: &Connection) -> Result<Option<User>> {
        let user = conn
            .query_row(
                "SELECT user_id, email, user_name, state FROM account WHERE slot = 1",
                [],
                |row| {
                    Ok(User {
                        id: row.get(0)?,
                        email: row.get(1)?,
                        user_name: row.get(2)?,
                        state: row
                            .get::<_, String>(3)?
                            .parse()
                            .unwrap_or(UserState::Unauthorized),
                    })
                },
            )
            .optional()?;
        Ok(user)
    }
}

impl DataStore for Repository {
    fn search_words(&self, word_part: &str) -> Vec<Word> {
        degrade(
            "search_words",
            self.db.execute(|conn| Self::search_words_sync(conn, word_part)),
            Vec::new(),
        )
    }

    fn save_word(&self, word: &WordDetail) -> bool {
        degrade(
            "save_word",
            self.db.transaction(|tx| Self::save_word_sync(tx, word)),
            false,
        )
    }

    fn fetch_word_detail(&self, word: &str) -> Option<WordDetail> {
        degrade(
            "fetch_word_detail",
            self.db.execute(|conn| Self::fetch_word_detail_sync(conn, word)),
            None,
        )
    }

    fn fetch_favorite_words(&self) -> Vec<Word> {
        degrade(
            "fetch_favorite_words",
            self.db.execute(Self::fetch_favorite_words_sync),
            Vec::new(),
        )
    }

    fn set_favorite(&self, word_id: i64, is_favorite: bool) -> bool {
        degrade(
            "set_favorite",
            self.db.execute(|conn| {
                let updated = conn.execute(
                    "UPDATE words SET is_favorite = ?1 WHERE id = ?2",
                    params![is_favorite, word_id],
                )?;
                Ok(updated > 0)
            }),
            false,
        )
    }

    fn fetch_history(&self) -> Vec<HistoryWord> {
        degrade(
            "fetch_history",
            self.db.execute(Self::fetch_history_sync),
            Vec::new(),
        )
    }

    fn add_history_word(&self, word_id: i64, time_opened: DateTime<Utc>) -> bool {
        degrade(
            "add_history_word",
            self.db
                .transaction(|tx| Self::add_history_word_sync(tx, word_id, &time_opened)),
            false,
        )
    }

    fn fetch_decks(&self, include_flashcards: bool) -> Vec<Deck> {
        degrade(
            "fetch_decks",
            self.db
                .execute(|conn| Self::fetch_decks_sync(conn, include_flashcards)),
            Vec::new(),
        )
    }

    fn create_deck(&self, name: &str) -> Option<Deck> {
        degrade(
            "create_deck",
            self.db.transaction(|tx| Self::create_deck_sync(tx, name)).map(Some),
            None,
        )
    }

    fn delete_deck(&self, deck_id: i64) -> bool {
        degrade(
            "delete_deck",
            self.db.execute(|conn| {
                // Flashcards go with the deck through ON DELETE CASCADE
                let deleted = conn.execute("DELETE FROM decks WHERE id = ?1", [deck_id])?;
                Ok(deleted > 0)
            }),
            false,
        )
    }

    fn save_new_flashcard(&self, flashcard: &NewFlashcard) -> bool {
        degrade(
            "save_new_flashcard",
            self.db
                .transaction(|tx| Self::save_new_flashcard_sync(tx, flashcard)),
            false,
        )
    }

    fn fetch_flashcards(&self, deck_id: i64) -> Option<Vec<Flashcard>> {
        degrade(
            "fetch_flashcards",
            self.db.execute(|conn| Self::fetch_flashcards_sync(conn, deck_id)),
            None,
        )
    }

    fn fetch_flashcard(&self, flashcard_id: i64) -> Option<Flashcard> {
        degrade(
            "fetch_flashcard",
            self.db
                .execute(|conn| Self::fetch_flashcard_sync(conn, flashcard_id)),
            None,
        )
    }

    fn delete_flashcard(&self, flashcard_id: i64) -> bool {
        degrade(
            "delete_flashcard",
            self.db.execute(|conn| {
                let deleted =
                    conn.execute("DELETE FROM flashcards WHERE id = ?1", [flashcard_id])?;
                Ok(deleted > 0)
            }),
            false,
        )
    }

    fn update_flashcard(&self, flashcard: &Flashcard, updated_deck_id: i64) -> bool {
        degrade(
            "update_flashcard",
            self.db
                .transaction(|tx| Self::update_flashcard_sync(tx, flashcard, updated_deck_id)),
            false,
        )
    }

    fn save_user(&self, user: &User) -> bool {
        degrade(
            "save_user",
            self.db.execute(|conn| {
                conn.execute(
                    r#"
                    INSERT OR REPLACE INTO account (slot, user_id, email, user_name, state)
                    VALUES (1, ?1, ?2, ?3, ?4)
                    "#,
                    params![user.id, user.email, user.user_name, user.state.to_string()],
                )?;
                Ok(true)
            }),
            false,
        )
    }

    fn fetch_user(&self) -> Option<User> {
        degrade("fetch_user", self.db.execute(Self::fetch_user_sync), None)
    }

    fn delete_user(&self) -> bool {
        degrade(
            "delete_user",
            self.db.execute(|conn| {
                let deleted = conn.execute("DELETE FROM account", [])?;
                Ok(deleted > 0)
            }),
            false,
        )
    }
}
