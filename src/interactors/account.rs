/*!
 * Account use cases: settings, renaming, deletion, logout and the
 * popular word download.
 */

use futures::stream::{self, StreamExt};
use log::{debug, error, info, warn};
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::app_config::DownloadConfig;
use crate::credentials::CredentialStore;
use crate::database::models::{User, UserState};
use crate::database::DataStore;
use crate::errors::{AppError, NetworkError};
use crate::network::dictionary::DictionaryClient;
use crate::network::requests::{self, UserUpdateRequestModel};
use crate::network::NetworkManager;
use crate::validation::Validator;

/// Entry of the account screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Setting {
    ConfirmEmail,
    ShowAchievements,
    ChangePassword,
    DownloadDictionary,
    Exit,
    DeleteAccount,
    Registration,
}

impl Setting {
    /// Entries offered to a user in `state`, in display order
    pub fn for_state(state: UserState) -> Vec<Setting> {
        match state {
            UserState::Unauthorized => vec![Setting::Registration, Setting::DownloadDictionary],
            UserState::Inactive => vec![
                Setting::ConfirmEmail,
                Setting::ShowAchievements,
                Setting::ChangePassword,
                Setting::DownloadDictionary,
                Setting::Exit,
                Setting::DeleteAccount,
            ],
            UserState::Active => vec![
                Setting::ShowAchievements,
                Setting::ChangePassword,
                Setting::DownloadDictionary,
                Setting::Exit,
                Setting::DeleteAccount,
            ],
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Setting::ConfirmEmail => "Confirm email",
            Setting::ShowAchievements => "Achievements",
            Setting::ChangePassword => "Change password",
            Setting::DownloadDictionary => "Download dictionary",
            Setting::Exit => "Log out",
            Setting::DeleteAccount => "Delete account",
            Setting::Registration => "Sign up",
        }
    }
}

impl fmt::Display for Setting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title())
    }
}

/// Result of downloading one word
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WordOutcome {
    Saved,
    AlreadyStored,
    NotFound,
    Failed,
}

/// Totals of a popular word download
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadSummary {
    /// Words returned by the backend
    pub requested: usize,
    /// Newly stored words
    pub saved: usize,
    /// Words that were already in the store
    pub already_stored: usize,
    /// Words the dictionary has no entry for
    pub not_found: usize,
    /// Lookups or saves that failed
    pub failed: usize,
}

impl DownloadSummary {
    fn record(&mut self, outcome: WordOutcome) {
        match outcome {
            WordOutcome::Saved => self.saved += 1,
            WordOutcome::AlreadyStored => self.already_stored += 1,
            WordOutcome::NotFound => self.not_found += 1,
            WordOutcome::Failed => self.failed += 1,
        }
    }
}

impl fmt::Display for DownloadSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} words: {} saved, {} already stored, {} not found, {} failed",
            self.requested, self.saved, self.already_stored, self.not_found, self.failed
        )
    }
}

pub struct AccountInteractor {
    store: Arc<dyn DataStore>,
    network: NetworkManager,
    dictionary: Option<DictionaryClient>,
    credentials: Arc<dyn CredentialStore>,
    validator: Arc<dyn Validator>,
    download: DownloadConfig,
}

impl AccountInteractor {
    pub fn new(
        store: Arc<dyn DataStore>,
        network: NetworkManager,
        dictionary: Option<DictionaryClient>,
        credentials: Arc<dyn CredentialStore>,
        validator: Arc<dyn Validator>,
        download: DownloadConfig,
    ) -> Self {
        Self {
            store,
            network,
            dictionary,
            credentials,
            validator,
            download,
        }
    }

    /// Settings for the cached user and their display name
    pub fn load_settings(&self) -> (Vec<Setting>, String) {
        match self.store.fetch_user() {
            Some(user) => (Setting::for_state(user.state), user.user_name),
            None => (Vec::new(), String::new()),
        }
    }

    /// Cached user together with the backend token
    fn signed_in_user(&self) -> Option<(User, String)> {
        let user = self.store.fetch_user()?;
        let token = self.credentials.load_token()?;
        Some((user, token))
    }

    /// Delete the backend account; local data is cleared on success
    pub async fn delete_account(&self) -> bool {
        let Some((user, token)) = self.signed_in_user() else {
            warn!("Cannot delete the account without a signed-in user");
            return false;
        };

        match self.network.perform_status(&requests::delete_user(user.id, &token)).await {
            Ok(status) if (200..300).contains(&status) => {
                info!("Account {} deleted", user.email);
                self.delete_user_info();
                true
            }
            Ok(status) => {
                warn!("Account deletion rejected with HTTP {}", status);
                false
            }
            Err(e) => {
                error!("Account deletion failed: {}", e);
                false
            }
        }
    }

    /// Rename the account remotely, then in the local cache
    pub async fn change_user_name(&self, user_name: &str) -> bool {
        let user_name = user_name.trim();
        if !self.validator.is_valid_user_name(user_name) {
            debug!("Rejected user name '{}'", user_name);
            return false;
        }

        let Some((mut user, token)) = self.signed_in_user() else {
            warn!("Cannot rename the account without a signed-in user");
            return false;
        };

        let model = UserUpdateRequestModel::rename(user_name);
        match self.send_update(&model, user.id, &token).await {
            Ok(status) if (200..300).contains(&status) => {
                user.user_name = user_name.to_string();
                self.store.save_user(&user)
            }
            Ok(status) => {
                warn!("Rename rejected with HTTP {}", status);
                false
            }
            Err(e) => {
                error!("Rename failed: {}", e);
                false
            }
        }
    }

    async fn send_update(
        &self,
        model: &UserUpdateRequestModel,
        id: i64,
        token: &str,
    ) -> Result<u16, NetworkError> {
        let request = requests::update_user(model, id, token)?;
        self.network.perform_status(&request).await
    }

    /// Forget the cached account and token
    pub fn delete_user_info(&self) {
        if !self.store.delete_user() {
            debug!("No cached account to remove");
        }
        if let Err(e) = self.credentials.remove_token() {
            error!("Failed to remove backend token: {}", e);
        }
    }

    /// Fetch the popular word list and store every word the dictionary knows
    ///
    /// Lookups run with bounded concurrency. `progress_callback` receives
    /// `(completed, total)` after each word.
    pub async fn download_popular_words(
        &self,
        progress_callback: impl Fn(usize, usize) + Clone + Send + 'static,
    ) -> Result<DownloadSummary, AppError> {
        let dictionary = self
            .dictionary
            .clone()
            .ok_or_else(|| AppError::Config("Dictionary API key is not configured".to_string()))?;

        let words: Vec<String> = self
            .network
            .perform(&requests::popular_words(self.download.limit))
            .await?;

        let total = words.len();
        let concurrency = self.download.concurrent_requests.max(1);
        info!("Downloading {} popular words", total);

        let completed = Arc::new(AtomicUsize::new(0));
        let outcomes = stream::iter(words)
            .map(|word| {
                let dictionary = dictionary.clone();
                let store = self.store.clone();
                let completed = completed.clone();
                let progress_callback = progress_callback.clone();

                async move {
                    let outcome = download_word(&dictionary, store.as_ref(), &word).await;
                    let current = completed.fetch_add(1, Ordering::SeqCst) + 1;
                    progress_callback(current, total);
                    outcome
                }
            })
            .buffer_unordered(concurrency)
            .collect::<Vec<_>>()
            .await;

        let mut summary = DownloadSummary {
            requested: total,
            ..Default::default()
        };
        for outcome in outcomes {
            summary.record(outcome);
        }

        info!("Download finished: {}", summary);
        Ok(summary)
    }
}

async fn download_word(
    dictionary: &DictionaryClient,
    store: &dyn DataStore,
    word: &str,
) -> WordOutcome {
    if store.fetch_word_detail(word).is_some() {
        return WordOutcome::AlreadyStored;
    }

    match dictionary.lookup(word).await {
        Ok(Some(detail)) => {
            if store.save_word(&detail) {
                WordOutcome::Saved
            } else if store.fetch_word_detail(word).is_some() {
                // Duplicate entry in the list, stored by a concurrent lookup
                WordOutcome::AlreadyStored
            } else {
                WordOutcome::Failed
            }
        }
        Ok(None) => WordOutcome::NotFound,
        Err(e) => {
            warn!("Lookup of '{}' failed: {}", word, e);
            WordOutcome::Failed
        }
    }
}
