use std::collections::BTreeMap;
use std::time::Duration;

use common::rbac::PermissionMatrix;
use common::rbac::PermissionName;
use reqwest::header::AUTHORIZATION;
use reqwest::RequestBuilder;
use reqwest::Response;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;
use tracing::warn;

use crate::error::ClientError;
use crate::error::Result;
use crate::guard::PermissionGuard;

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Me {
    pub account_id: u64,
    pub role: Option<String>,
    pub permissions: Vec<PermissionName>,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CheckMode {
    Any,
    All,
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
struct CheckRequest<'a> {
    mode: CheckMode,
    permissions: &'a [PermissionName],
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CheckResult {
    pub resource: String,
    pub action: String,
    pub allowed: bool,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CheckResponse {
    pub allowed: bool,
    pub results: Vec<CheckResult>,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: ErrorDetails,
}

#[derive(Deserialize)]
struct ErrorDetails {
    status: u16,
    message: Option<String>,
    #[serde(default)]
    fields: BTreeMap<String, String>,
}

/// Minimal client for the permission endpoints.
///
/// `base_url` points at the versioned API root, e.g. `http://localhost:8080/api/v1`.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    token: Option<String>,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
            http,
        })
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => req.header(AUTHORIZATION, format!("Bearer {token}")),
            None => req,
        }
    }

    async fn parse<T: DeserializeOwned>(resp: Response) -> Result<T> {
        let status = resp.status();
        let body = resp.bytes().await?;
        if status.is_success() {
            return Ok(serde_json::from_slice(&body)?);
        }

        Err(match serde_json::from_slice::<ErrorBody>(&body) {
            Ok(ErrorBody { error }) => ClientError::Api {
                status: error.status,
                message: error.message,
                fields: error.fields,
            },
            Err(_) => ClientError::Api {
                status: status.as_u16(),
                message: None,
                fields: BTreeMap::new(),
            },
        })
    }

    /// Fetches the permission matrix. Doesn't need a token.
    pub async fn matrix(&self) -> Result<PermissionMatrix> {
        let resp = self
            .http
            .get(format!("{}/permissions", self.base_url))
            .send()
            .await?;

        Self::parse(resp).await
    }

    pub async fn me(&self) -> Result<Me> {
        let resp = self
            .authorize(self.http.get(format!("{}/permissions/me", self.base_url)))
            .send()
            .await?;

        Self::parse(resp).await
    }

    /// Asks the server to evaluate permissions for the current caller.
    pub async fn check(
        &self,
        mode: CheckMode,
        permissions: &[PermissionName],
    ) -> Result<CheckResponse> {
        let resp = self
            .authorize(self.http.post(format!("{}/permissions/check", self.base_url)))
            .json(&CheckRequest { mode, permissions })
            .send()
            .await?;

        Self::parse(resp).await
    }

    pub async fn guard(&self) -> Result<PermissionGuard> {
        let matrix = self.matrix().await?;
        let me = self.me().await?;
        debug!(account_id = me.account_id, role = ?me.role, "permission guard loaded");

        Ok(PermissionGuard::new(me.role, matrix))
    }

    /// Like [`ApiClient::guard`], but falls back to a guard that denies everything.
    pub async fn guard_or_deny(&self) -> PermissionGuard {
        match self.guard().await {
            Ok(guard) => guard,
            Err(err) => {
                warn!("can't load permissions, denying everything: {err}");
                PermissionGuard::anonymous()
            }
        }
    }
}
