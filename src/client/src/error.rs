use std::collections::BTreeMap;
use std::result;

use thiserror::Error;

pub type Result<T> = result::Result<T, ClientError>;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("http: {0:?}")]
    Http(#[from] reqwest::Error),
    #[error("api error {status}: {message:?}")]
    Api {
        status: u16,
        message: Option<String>,
        fields: BTreeMap<String, String>,
    },
    #[error("serde: {0:?}")]
    Serde(#[from] serde_json::Error),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(err) => err.status().map(|s| s.as_u16()),
            ClientError::Serde(_) => None,
        }
    }
}
