/*!
 * Input validation for account forms.
 */

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,64}$").expect("Invalid regex")
});

static USER_NAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.-]{3,32}$").expect("Invalid regex"));

/// Minimum password length
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum password length
pub const MAX_PASSWORD_LENGTH: usize = 64;

/// Rules applied to account form fields
pub trait Validator: Send + Sync {
    fn is_valid_email(&self, email: &str) -> bool;
    fn is_valid_password(&self, password: &str) -> bool;
    fn is_valid_user_name(&self, user_name: &str) -> bool;
}

/// Default rule set
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidationManager;

impl Validator for ValidationManager {
    fn is_valid_email(&self, email: &str) -> bool {
        EMAIL_REGEX.is_match(email)
    }

    /// 8 to 64 characters, no whitespace, at least one letter and one digit
    fn is_valid_password(&self, password: &str) -> bool {
        let length = password.chars().count();
        (MIN_PASSWORD_LENGTH..=MAX_PASSWORD_LENGTH).contains(&length)
            && !password.chars().any(char::is_whitespace)
            && password.chars().any(char::is_alphabetic)
            && password.chars().any(|c| c.is_ascii_digit())
    }

    fn is_valid_user_name(&self, user_name: &str) -> bool {
        USER_NAME_REGEX.is_match(user_name)
    }
}

/// User-facing validation outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMessage {
    EmptyEmail,
    IncorrectEmail,
    IncorrectPassword,
    /// Credentials rejected or unreachable auth service
    NotRightData,
    ServerProblem,
}

impl fmt::Display for ValidationMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ValidationMessage::EmptyEmail => "Enter your email",
            ValidationMessage::IncorrectEmail => "The email address is not valid",
            ValidationMessage::IncorrectPassword => {
                "The password needs 8 to 64 characters with letters and digits"
            }
            ValidationMessage::NotRightData => "Wrong email or password",
            ValidationMessage::ServerProblem => "The server is unavailable, try again later",
        };
        write!(f, "{}", text)
    }
}
