/*!
 * Sign-in use case.
 */

use log::{error, info, warn};
use std::sync::Arc;

use crate::credentials::CredentialStore;
use crate::database::models::{User, UserState};
use crate::database::DataStore;
use crate::errors::NetworkError;
use crate::network::requests::{
    self, AuthorizationRequestModel, AuthorizationResponseModel, UserResponseModel,
};
use crate::network::NetworkManager;
use crate::validation::{ValidationMessage, Validator};

/// Outcome of a sign-in attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizationResult {
    /// Message to show next to the email field
    EmailField(ValidationMessage),
    /// Message to show next to the password field
    PasswordField(ValidationMessage),
    /// Signed in and cached locally
    Success,
    /// Token issued but the account could not be fetched
    ServerProblem,
    /// Token issued but it could not be kept for later requests
    TokenNotStored,
}

pub struct AuthorizationInteractor {
    validator: Arc<dyn Validator>,
    network: NetworkManager,
    store: Arc<dyn DataStore>,
    credentials: Arc<dyn CredentialStore>,
}

impl AuthorizationInteractor {
    pub fn new(
        validator: Arc<dyn Validator>,
        network: NetworkManager,
        store: Arc<dyn DataStore>,
        credentials: Arc<dyn CredentialStore>,
    ) -> Self {
        Self {
            validator,
            network,
            store,
            credentials,
        }
    }

    /// Validate the form, obtain a token and cache the account
    pub async fn enter(&self, email: &str, password: &str) -> AuthorizationResult {
        if email.is_empty() {
            return AuthorizationResult::EmailField(ValidationMessage::EmptyEmail);
        }
        if !self.validator.is_valid_email(email) {
            return AuthorizationResult::EmailField(ValidationMessage::IncorrectEmail);
        }
        if !self.validator.is_valid_password(password) {
            return AuthorizationResult::PasswordField(ValidationMessage::IncorrectPassword);
        }

        let model = AuthorizationRequestModel {
            email: email.to_string(),
            password: password.to_string(),
        };
        let token = match self.authorize(&model).await {
            Ok(response) => response.header_value(),
            Err(e) => {
                warn!("Authorization of {} failed: {}", email, e);
                return AuthorizationResult::EmailField(ValidationMessage::NotRightData);
            }
        };

        if let Err(e) = self.credentials.save_token(&token) {
            error!("Failed to store backend token: {}", e);
            return AuthorizationResult::TokenNotStored;
        }

        let account_request = requests::user(email, &token);
        let account: UserResponseModel = match self.network.perform(&account_request).await {
            Ok(account) => account,
            Err(e) => {
                error!("Failed to fetch account of {}: {}", email, e);
                return AuthorizationResult::ServerProblem;
            }
        };

        let user = User {
            id: account.id,
            email: email.to_string(),
            user_name: account.username.unwrap_or_default(),
            state: UserState::Inactive,
        };
        if !self.store.save_user(&user) {
            warn!("Signed in as {} but the account could not be cached", email);
        }

        info!("Signed in as {}", email);
        AuthorizationResult::Success
    }

    async fn authorize(
        &self,
        model: &AuthorizationRequestModel,
    ) -> Result<AuthorizationResponseModel, NetworkError> {
        let request = requests::authorization(model)?;
        self.network.perform(&request).await
    }
}
