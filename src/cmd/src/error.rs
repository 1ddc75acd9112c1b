use std::result;

use metadata::error::MetadataError;
use metrics_exporter_prometheus::BuildError;
use platform::PlatformError;
use thiserror::Error;

pub type Result<T> = result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("StdIO: {0:?}")]
    StdIO(#[from] std::io::Error),
    #[error("TimeDurationOutOfRange: {0:?}")]
    TimeDurationOutOfRange(#[from] chrono::OutOfRangeError),
    #[error("ParseDuration: {0:?}")]
    ParseDuration(#[from] parse_duration::parse::Error),
    #[error("metrics: {0:?}")]
    Metrics(#[from] BuildError),
    #[error("SetGlobalDefaultError: {0:?}")]
    SetGlobalDefaultError(#[from] tracing::subscriber::SetGlobalDefaultError),
    #[error("serde: {0:?}")]
    Serde(#[from] serde_json::Error),
    #[error("metadata: {0:?}")]
    Metadata(#[from] MetadataError),
    #[error("platform: {0:?}")]
    Platform(#[from] PlatformError),
    #[error("other: {0:?}")]
    Other(#[from] anyhow::Error),
}
