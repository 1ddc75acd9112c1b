pub mod token;

use chrono::Duration;

/// Verification settings for bearer tokens, shared with handlers through an `Extension`.
#[derive(Clone)]
pub struct Config {
    pub access_token_key: String,
    pub access_token_duration: Duration,
}

impl From<&common::config::Auth> for Config {
    fn from(value: &common::config::Auth) -> Self {
        Config {
            access_token_key: value.access_token_key.clone(),
            access_token_duration: value.access_token_duration,
        }
    }
}

impl Config {
    pub fn make_access_token(&self, account_id: u64) -> crate::Result<String> {
        token::make_access_token(
            account_id,
            self.access_token_duration,
            &self.access_token_key,
        )
        .map_err(|err| err.wrap_into(crate::error::AuthError::CantMakeAccessToken))
    }
}
