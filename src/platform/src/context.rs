use std::sync::Arc;

use axum::async_trait;
use axum::extract::Extension;
use axum::http::request::Parts;
use axum_core::extract::FromRequestParts;
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::Authorization;
use axum_extra::TypedHeader;
use common::rbac::has_permission;
use common::rbac::Permission;
use common::rbac::Requirement;
use common::rbac::Role;
use common::types::METRIC_RBAC_DENIED_TOTAL;
use metadata::error::MetadataError;
use metrics::counter;
use tracing::debug;
use tracing::info;

use crate::auth;
use crate::auth::token::parse_access_token;
use crate::error::AuthError;
use crate::PlatformError;
use crate::Result;

/// Identity of the caller, resolved from the bearer token on every request.
///
/// The role is read from the stored account, so a role change applies to the next request
/// made with an existing token.
#[derive(Default, Clone, Debug, PartialEq, Eq)]
pub struct Context {
    pub account_id: Option<u64>,
    pub role: Option<Role>,
}

impl Context {
    pub fn new(account_id: u64, role: Role) -> Self {
        Self {
            account_id: Some(account_id),
            role: Some(role),
        }
    }

    pub fn account_id(&self) -> Result<u64> {
        self.account_id
            .ok_or_else(|| AuthError::Unauthenticated.into())
    }

    pub fn can(&self, permission: Permission) -> bool {
        has_permission(self.role, permission)
    }

    pub fn check(&self, required: &Requirement) -> Result<()> {
        if self.role.is_none() {
            return Err(AuthError::Unauthenticated.into());
        }

        if required.is_satisfied_by(self.role) {
            debug!(account_id = ?self.account_id, %required, "permission granted");
            return Ok(());
        }

        let role = self
            .role
            .map(|r| r.to_string())
            .unwrap_or_default();
        info!(account_id = ?self.account_id, role = %role, %required, "permission denied");
        counter!(METRIC_RBAC_DENIED_TOTAL, "role" => role.clone(), "resource" => required.resources())
            .increment(1);

        Err(PlatformError::PermissionDenied {
            role,
            required: required.to_owned(),
        })
    }

    pub fn check_permission(&self, permission: Permission) -> Result<()> {
        self.check(&Requirement::One(permission))
    }

    pub fn check_any_permission(
        &self,
        permissions: impl IntoIterator<Item = Permission>,
    ) -> Result<()> {
        self.check(&Requirement::any(permissions))
    }

    pub fn check_all_permissions(
        &self,
        permissions: impl IntoIterator<Item = Permission>,
    ) -> Result<()> {
        self.check(&Requirement::all(permissions))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Context
where S: Send + Sync
{
    type Rejection = PlatformError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> core::result::Result<Self, Self::Rejection> {
        // already resolved by the permission layer
        if let Some(ctx) = parts.extensions.get::<Context>() {
            return Ok(ctx.clone());
        }

        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_err| AuthError::CantParseBearerHeader)?;

        let Extension(auth_cfg) = Extension::<auth::Config>::from_request_parts(parts, state)
            .await
            .map_err(|err| PlatformError::Internal(err.to_string()))?;

        let claims = parse_access_token(bearer.token(), &auth_cfg.access_token_key)
            .map_err(|err| err.wrap_into(AuthError::CantParseAccessToken))?;
        let Extension(md_acc_prov) =
            Extension::<Arc<metadata::accounts::Accounts>>::from_request_parts(parts, state)
                .await
                .map_err(|err| PlatformError::Internal(err.to_string()))?;

        let acc = md_acc_prov
            .get_by_id(claims.account_id)
            .map_err(|err| match err {
                MetadataError::NotFound(_) => AuthError::UnknownAccount.into(),
                other => PlatformError::from(other),
            })?;

        Ok(Context::new(acc.id, acc.role))
    }
}
