use std::result;

use thiserror::Error;

pub type Result<T> = result::Result<T, MetadataError>;

#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("already exists: {0}")]
    AlreadyExists(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("constraint: {0}")]
    Constraint(String),
    #[error("internal: {0}")]
    Internal(String),
}
