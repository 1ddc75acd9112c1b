use std::collections::BTreeMap;
use std::fmt::Debug;
use std::result;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use common::http::ApiError;
use common::rbac::Requirement;
use metadata::error::MetadataError;
use thiserror::Error;

pub type Result<T> = result::Result<T, PlatformError>;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("can't make access token")]
    CantMakeAccessToken,
    #[error("can't parse bearer header")]
    CantParseBearerHeader,
    #[error("can't parse access token")]
    CantParseAccessToken,
    #[error("unknown account")]
    UnknownAccount,
    #[error("unauthenticated")]
    Unauthenticated,
}

#[derive(Error, Debug)]
pub enum PlatformError {
    #[error("{1:?} error wrapped into {0:?}")]
    Wrapped(Box<PlatformError>, Box<PlatformError>),
    #[error("invalid fields")]
    InvalidFields(BTreeMap<String, String>),
    #[error("bad request: {0:?}")]
    BadRequest(String),
    #[error("permission denied: role {role} lacks {required}")]
    PermissionDenied { role: String, required: Requirement },
    #[error("internal: {0:?}")]
    Internal(String),
    #[error("jsonwebtoken: {0:?}")]
    JSONWebToken(#[from] jsonwebtoken::errors::Error),
    #[error("metadata: {0:?}")]
    Metadata(#[from] MetadataError),
    #[error("auth: {0:?}")]
    Auth(#[from] AuthError),
}

impl PlatformError {
    pub fn wrap_into(self, err: impl Into<PlatformError>) -> PlatformError {
        PlatformError::Wrapped(Box::new(self), Box::new(err.into()))
    }

    pub fn into_api_error(self) -> ApiError {
        match self {
            PlatformError::Metadata(err) => match err {
                MetadataError::AlreadyExists(_) => ApiError::conflict(err.to_string()),
                MetadataError::NotFound(_) => ApiError::not_found(err.to_string()),
                MetadataError::Constraint(_) => ApiError::bad_request(err.to_string()),
                MetadataError::Internal(_) => ApiError::internal(err.to_string()),
            },
            PlatformError::BadRequest(msg) => ApiError::bad_request(msg),
            PlatformError::Internal(msg) => ApiError::internal(msg),
            PlatformError::Auth(err) => match err {
                AuthError::CantMakeAccessToken => ApiError::internal(err),
                AuthError::CantParseBearerHeader => ApiError::unauthorized(err),
                AuthError::CantParseAccessToken => ApiError::unauthorized(err),
                AuthError::UnknownAccount => ApiError::unauthorized(err),
                AuthError::Unauthenticated => ApiError::unauthorized(err),
            },
            PlatformError::PermissionDenied { role, required } => {
                ApiError::forbidden(format!("permission denied: requires {required}"))
                    .with_fields(BTreeMap::from([
                        ("resource".to_string(), required.resources()),
                        ("action".to_string(), required.actions()),
                        ("role".to_string(), role),
                    ]))
            }
            PlatformError::JSONWebToken(err) => ApiError::internal(err.to_string()),
            PlatformError::Wrapped(_, outer) => outer.into_api_error(),
            PlatformError::InvalidFields(fields) => {
                ApiError::new(StatusCode::BAD_REQUEST).with_fields(fields)
            }
        }
    }
}

#[derive(Default)]
pub struct ValidationError {
    fields: BTreeMap<String, String>,
}

impl ValidationError {
    pub fn new() -> Self {
        Self {
            fields: BTreeMap::new(),
        }
    }

    pub fn push(&mut self, field: impl Into<String>, err: impl Into<String>) {
        self.fields.insert(field.into(), err.into());
    }

    pub fn result(self) -> Result<()> {
        if self.fields.is_empty() {
            Ok(())
        } else {
            Err(PlatformError::InvalidFields(self.fields))
        }
    }
}

impl IntoResponse for PlatformError {
    fn into_response(self) -> Response {
        self.into_api_error().into_response()
    }
}
