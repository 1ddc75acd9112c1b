use common::rbac::check_permission;
use common::rbac::permissions_of;
use common::rbac::PermissionMatrix;
use common::rbac::PermissionName;
use common::rbac::Role;
use serde::Deserialize;
use serde::Serialize;

use crate::Context;
use crate::Result;

/// Read-only view of the permission matrix and of the caller's grants.
#[derive(Default)]
pub struct Permissions {}

impl Permissions {
    pub fn new() -> Self {
        Self {}
    }

    pub fn matrix(&self) -> PermissionMatrix {
        PermissionMatrix::current()
    }

    pub async fn me(&self, ctx: Context) -> Result<Me> {
        let account_id = ctx.account_id()?;
        let role = ctx.role;

        Ok(Me {
            account_id,
            role,
            permissions: role
                .map(|r| permissions_of(r).iter().map(|p| (*p).into()).collect())
                .unwrap_or_default(),
        })
    }

    /// Evaluates free-form permission names for the caller. Names that don't exist are denied
    /// instead of rejected.
    pub async fn check(&self, ctx: Context, req: CheckRequest) -> Result<CheckResponse> {
        ctx.account_id()?;
        let role = ctx.role.map(|r| r.as_str());

        let results: Vec<CheckResult> = req
            .permissions
            .into_iter()
            .map(|p| {
                let allowed = check_permission(role, &p.resource, &p.action);
                CheckResult {
                    resource: p.resource,
                    action: p.action,
                    allowed,
                }
            })
            .collect();

        let allowed = match req.mode {
            CheckMode::Any => results.iter().any(|r| r.allowed),
            CheckMode::All => results.iter().all(|r| r.allowed),
        };

        Ok(CheckResponse { allowed, results })
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Me {
    pub account_id: u64,
    pub role: Option<Role>,
    pub permissions: Vec<PermissionName>,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum CheckMode {
    Any,
    #[default]
    All,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CheckRequest {
    #[serde(default)]
    pub mode: CheckMode,
    pub permissions: Vec<PermissionName>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CheckResult {
    pub resource: String,
    pub action: String,
    pub allowed: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CheckResponse {
    pub allowed: bool,
    pub results: Vec<CheckResult>,
}
