use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::Display;
use std::fmt::Formatter;
use std::time::Instant;

use async_trait::async_trait;
use axum::extract::rejection::JsonRejection;
use axum::extract::FromRequest;
use axum::http::Method;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum_core::body::Body;
use axum_core::extract::Request;
use axum_core::response::Response;
use bytes::Bytes;
use http_body_util::BodyExt;
use lazy_static::lazy_static;
use log::debug;
use metrics::counter;
use metrics::histogram;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde::Serializer;
use thiserror::Error;

use crate::types::METRIC_HTTP_REQUESTS_TOTAL;
use crate::types::METRIC_HTTP_REQUEST_TIME_SECONDS;

/// Error body returned by every endpoint: `{"error": {"status", "message", "fields"}}`.
#[derive(Error, Serialize, Debug, Clone)]
pub struct ApiError {
    #[serde(serialize_with = "serialize_http_code")]
    pub status: StatusCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, String>,
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message.as_deref().unwrap_or_default())
    }
}

#[derive(Serialize)]
struct ApiErrorWrapper {
    error: ApiError,
}

fn serialize_http_code<S: Serializer>(
    status: &StatusCode,
    ser: S,
) -> std::result::Result<S::Ok, S::Error> {
    ser.serialize_u16(status.as_u16())
}

impl ApiError {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            message: None,
            fields: BTreeMap::new(),
        }
    }

    fn with_status(status: StatusCode, err: impl ToString) -> Self {
        ApiError::new(status).with_message(err.to_string())
    }

    pub fn bad_request(err: impl ToString) -> Self {
        Self::with_status(StatusCode::BAD_REQUEST, err)
    }

    pub fn unauthorized(err: impl ToString) -> Self {
        Self::with_status(StatusCode::UNAUTHORIZED, err)
    }

    pub fn forbidden(err: impl ToString) -> Self {
        Self::with_status(StatusCode::FORBIDDEN, err)
    }

    pub fn not_found(err: impl ToString) -> Self {
        Self::with_status(StatusCode::NOT_FOUND, err)
    }

    pub fn conflict(err: impl ToString) -> Self {
        Self::with_status(StatusCode::CONFLICT, err)
    }

    pub fn internal(err: impl ToString) -> Self {
        Self::with_status(StatusCode::INTERNAL_SERVER_ERROR, err)
    }

    pub fn with_fields(self, fields: BTreeMap<String, String>) -> Self {
        Self { fields, ..self }
    }

    pub fn with_message(self, message: String) -> Self {
        Self {
            message: Some(message),
            ..self
        }
    }

    fn append_inner_message(self, inner: String) -> Self {
        let message = self.message.map(|msg| format!("{msg}: {inner}"));
        Self { message, ..self }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        debug!("ApiError: {:?}", self);
        (self.status, Json(ApiErrorWrapper { error: self })).into_response()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Json<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for Json<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> std::result::Result<Self, Self::Rejection> {
        match axum::Json::<T>::from_request(req, state).await {
            Ok(v) => Ok(Json(v.0)),
            Err(err) => {
                let mut api_err = ApiError::bad_request(err.to_string());

                if let Some(inner) = err.source() {
                    if let Some(inner) = inner.source() {
                        api_err = api_err.append_inner_message(inner.to_string());
                        if let JsonRejection::JsonDataError(_) = err {
                            lazy_static! {
                                static ref FIELD_RX: Regex =
                                    Regex::new(r"(\w+?) field `(.+?)`").unwrap();
                            }
                            if let Some(captures) = FIELD_RX.captures(inner.to_string().as_str())
                            {
                                api_err = api_err.with_fields(BTreeMap::from([(
                                    captures[2].to_string(),
                                    captures[1].to_string(),
                                )]));
                            }
                        }
                    }
                }

                Err(api_err)
            }
        }
    }
}

impl<T> IntoResponse for Json<T>
where T: Serialize
{
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

pub async fn measure_request_response(
    req: Request,
    next: Next,
) -> std::result::Result<impl IntoResponse, (StatusCode, String)> {
    let start = Instant::now();
    let path = req.uri().path().to_string();
    let metrics = req.method() != Method::OPTIONS;
    let res = next.run(req).await;
    if metrics {
        histogram!(METRIC_HTTP_REQUEST_TIME_SECONDS, "path" => path.to_owned(), "status" => res.status().as_u16().to_string())
            .record(start.elapsed().as_secs_f64());
        counter!(METRIC_HTTP_REQUESTS_TOTAL, "path" => path, "status" => res.status().as_u16().to_string())
            .increment(1);
    }
    Ok(res)
}

pub async fn print_request_response(
    req: Request,
    next: Next,
) -> std::result::Result<impl IntoResponse, (StatusCode, String)> {
    tracing::debug!("{} {}", req.method(), req.uri());
    let (parts, body) = req.into_parts();
    let bytes = buffer_and_print("request", body).await?;
    let req = Request::from_parts(parts, Body::from(bytes));

    let res = next.run(req).await;
    tracing::debug!("response status = {}", res.status());

    Ok(res)
}

async fn buffer_and_print<B>(
    direction: &str,
    body: B,
) -> std::result::Result<Bytes, (StatusCode, String)>
where
    B: axum::body::HttpBody<Data = Bytes>,
    B::Error: std::fmt::Display,
{
    let bytes = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(err) => {
            return Err((
                StatusCode::BAD_REQUEST,
                format!("failed to read {direction} body: {err}"),
            ));
        }
    };

    if let Ok(body) = std::str::from_utf8(&bytes) {
        if !body.is_empty() {
            tracing::debug!("{direction} body = {body}");
        }
    }

    Ok(bytes)
}
