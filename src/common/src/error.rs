use std::result;

use thiserror::Error;

pub type Result<T> = result::Result<T, CommonError>;

#[derive(Error, Debug)]
pub enum CommonError {
    #[error("unknown role {0:?}")]
    UnknownRole(String),
    #[error("unknown resource {0:?}")]
    UnknownResource(String),
    #[error("unknown action {0:?}")]
    UnknownAction(String),
}
