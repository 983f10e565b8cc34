/*!
 * Account screen.
 */

use log::error;
use std::sync::Arc;

use crate::interactors::{AccountInteractor, DownloadSummary, Setting};

pub trait AccountView: Send + Sync {
    fn setup(&self, settings: &[Setting], user_name: &str);
    fn ask_for_downloading_dictionary(&self);
    fn ask_for_exit(&self);
    fn ask_for_deleting_account(&self);
    fn show_dictionary_downloading_started(&self);
    fn show_dictionary_downloading_progress(&self, completed: usize, total: usize);
    /// `None` when the download could not start
    fn show_dictionary_downloading_ended(&self, summary: Option<&DownloadSummary>);
    fn show_user_name_not_changed_alert(&self);
    fn show_server_problems_alert(&self);
}

pub trait AccountRouter: Send + Sync {
    fn show_entrance_flow(&self);
    fn show_confirm_email(&self);
    fn show_achievements(&self);
    fn show_change_password(&self);
    fn show_registration(&self);
}

pub struct AccountPresenter {
    interactor: Arc<AccountInteractor>,
    view: Arc<dyn AccountView>,
    router: Arc<dyn AccountRouter>,
}

impl AccountPresenter {
    pub fn new(
        interactor: Arc<AccountInteractor>,
        view: Arc<dyn AccountView>,
        router: Arc<dyn AccountRouter>,
    ) -> Self {
        Self {
            interactor,
            view,
            router,
        }
    }

    pub fn view_did_load(&self) {
        let (settings, user_name) = self.interactor.load_settings();
        self.view.setup(&settings, &user_name);
    }

    pub fn settings_tapped(&self, setting: Setting) {
        match setting {
            Setting::ConfirmEmail => self.router.show_confirm_email(),
            Setting::ShowAchievements => self.router.show_achievements(),
            Setting::ChangePassword => self.router.show_change_password(),
            Setting::DownloadDictionary => self.view.ask_for_downloading_dictionary(),
            Setting::Exit => self.view.ask_for_exit(),
            Setting::DeleteAccount => self.view.ask_for_deleting_account(),
            Setting::Registration => self.router.show_registration(),
        }
    }

    pub async fn change_user_name(&self, user_name: &str) {
        if self.interactor.change_user_name(user_name).await {
            self.view_did_load();
        } else {
            self.view.show_user_name_not_changed_alert();
        }
    }

    pub async fn download_dictionary(&self) {
        self.view.show_dictionary_downloading_started();

        let view = self.view.clone();
        let progress = move |completed: usize, total: usize| {
            view.show_dictionary_downloading_progress(completed, total)
        };
        match self.interactor.download_popular_words(progress).await {
            Ok(summary) => self.view.show_dictionary_downloading_ended(Some(&summary)),
            Err(e) => {
                error!("Dictionary download failed: {}", e);
                self.view.show_dictionary_downloading_ended(None);
            }
        }
    }

    pub fn exit(&self) {
        self.interactor.delete_user_info();
        self.router.show_entrance_flow();
    }

    pub async fn delete_account(&self) {
        if self.interactor.delete_account().await {
            self.router.show_entrance_flow();
        } else {
            self.view.show_server_problems_alert();
        }
    }
}
