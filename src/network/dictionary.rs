/*!
 * Remote dictionary lookups.
 *
 * The dictionary service answers `lookup?key=..&lang=..&text=..` with a
 * list of definitions grouped by part of speech. Each definition is turned
 * into one `Translation` per translated sense.
 */

use log::debug;
use serde::Deserialize;
use sha2::{Digest, Sha256};

use super::client::NetworkManager;
use super::http::RequestDescriptor;
use crate::database::models::{Example, Translation, WordDetail};
use crate::database::repository::MAX_GENERATED_ID;
use crate::errors::NetworkError;

/// Lookup response
#[derive(Debug, Clone, Deserialize, Default)]
pub struct LookupResponse {
    #[serde(default)]
    pub def: Vec<Definition>,
}

/// Definition for one part of speech
#[derive(Debug, Clone, Deserialize)]
pub struct Definition {
    pub text: String,
    #[serde(default)]
    pub pos: Option<String>,
    /// Transcription
    #[serde(default)]
    pub ts: Option<String>,
    #[serde(default)]
    pub tr: Vec<DefinitionTranslation>,
}

/// Translated sense
#[derive(Debug, Clone, Deserialize)]
pub struct DefinitionTranslation {
    pub text: String,
    #[serde(default)]
    pub pos: Option<String>,
    #[serde(default)]
    pub syn: Vec<TextItem>,
    #[serde(default)]
    pub ex: Vec<DictionaryExample>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TextItem {
    pub text: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DictionaryExample {
    pub text: String,
    #[serde(default)]
    pub tr: Vec<TextItem>,
}

/// Id in `1..=MAX_GENERATED_ID` derived from the given parts
///
/// The same word always proposes the same ids; the store replaces them if
/// they are already taken.
pub fn stable_id(parts: &[&str]) -> i64 {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part.as_bytes());
        hasher.update([0u8]);
    }
    let digest = hasher.finalize();

    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    (u64::from_be_bytes(prefix) % MAX_GENERATED_ID as u64) as i64 + 1
}

impl LookupResponse {
    /// Convert into a storable word; `None` when the service knows no definition
    pub fn into_word_detail(self, word: &str) -> Option<WordDetail> {
        let mut translations = Vec::new();

        for (def_index, definition) in self.def.into_iter().enumerate() {
            let speech_part = definition.pos.clone().unwrap_or_default();

            for (tr_index, sense) in definition.tr.into_iter().enumerate() {
                let def_key = def_index.to_string();
                let tr_key = tr_index.to_string();
                let translation_id = stable_id(&[word, &def_key, &tr_key]);

                // Synonyms are shown with the main translation
                let translation = std::iter::once(sense.text)
                    .chain(sense.syn.into_iter().map(|s| s.text))
                    .collect::<Vec<_>>()
                    .join(", ");

                let examples = sense
                    .ex
                    .into_iter()
                    .enumerate()
                    .map(|(ex_index, example)| {
                        let ex_key = ex_index.to_string();
                        Example {
                            id: stable_id(&[word, &def_key, &tr_key, &ex_key]),
                            translation: example.tr.into_iter().next().map(|t| t.text),
                            example: example.text,
                        }
                    })
                    .collect();

                translations.push(Translation {
                    id: translation_id,
                    translation,
                    speech_part: sense.pos.unwrap_or_else(|| speech_part.clone()),
                    transcription: definition.ts.clone(),
                    examples,
                });
            }
        }

        if translations.is_empty() {
            return None;
        }
        Some(WordDetail::new(word, translations))
    }
}

/// Client for the dictionary service
#[derive(Debug, Clone)]
pub struct DictionaryClient {
    network: NetworkManager,
    /// Dictionary base URL
    endpoint: String,
    /// Service API key
    api_key: String,
    /// Language pair such as "en-ru"
    lang: String,
}

impl DictionaryClient {
    /// Create a dictionary client
    pub fn new(
        network: NetworkManager,
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        lang: impl Into<String>,
    ) -> Self {
        Self {
            network,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            lang: lang.into(),
        }
    }

    /// Lookup request for `word`
    pub fn lookup_request(&self, word: &str) -> RequestDescriptor {
        RequestDescriptor::get("lookup")
            .base(self.endpoint.clone())
            .query("key", &self.api_key)
            .query("lang", &self.lang)
            .query("text", word)
    }

    /// Look `word` up remotely
    pub async fn lookup(&self, word: &str) -> Result<Option<WordDetail>, NetworkError> {
        let response: LookupResponse = self.network.perform(&self.lookup_request(word)).await?;
        let detail = response.into_word_detail(word);
        if detail.is_none() {
            debug!("Dictionary has no entry for '{}'", word);
        }
        Ok(detail)
    }
}
