use std::sync::Arc;

use chrono::DateTime;
use chrono::Utc;
use common::rbac::Role;
use common::rbac::UserAction;
use common::rbac::Permission;
use common::types::OptionalProperty;
use metadata::accounts::Accounts as MDAccounts;
use serde::Deserialize;
use serde::Serialize;

use crate::error::ValidationError;
use crate::Context;
use crate::ListResponse;
use crate::PlatformError;
use crate::Result;

fn validate_email(err: &mut ValidationError, email: &str) {
    let valid = match email.split_once('@') {
        Some((user, domain)) => !user.is_empty() && domain.contains('.'),
        None => false,
    };
    if !valid {
        err.push("email", "invalid email");
    }
}

pub struct Accounts {
    prov: Arc<MDAccounts>,
}

impl Accounts {
    pub fn new(prov: Arc<MDAccounts>) -> Self {
        Self { prov }
    }

    pub async fn create(&self, ctx: Context, req: CreateAccountRequest) -> Result<Account> {
        ctx.check_permission(Permission::Users(UserAction::Create))?;

        let mut err = ValidationError::new();
        validate_email(&mut err, &req.email);
        err.result()?;

        let account = self.prov.create(metadata::accounts::CreateAccountRequest {
            created_by: Some(ctx.account_id()?),
            email: req.email,
            name: req.name,
            role: req.role.unwrap_or(Role::User),
        })?;

        Ok(account.into())
    }

    pub async fn get_by_id(&self, ctx: Context, id: u64) -> Result<Account> {
        ctx.check_permission(Permission::Users(UserAction::Read))?;

        Ok(self.prov.get_by_id(id)?.into())
    }

    pub async fn list(&self, ctx: Context) -> Result<ListResponse<Account>> {
        ctx.check_permission(Permission::Users(UserAction::Read))?;

        Ok(self.prov.list()?.into())
    }

    pub async fn update(
        &self,
        ctx: Context,
        account_id: u64,
        req: UpdateAccountRequest,
    ) -> Result<Account> {
        ctx.check_permission(Permission::Users(UserAction::Update))?;

        let mut err = ValidationError::new();
        if let OptionalProperty::Some(email) = &req.email {
            validate_email(&mut err, email);
        }
        err.result()?;

        let md_req = metadata::accounts::UpdateAccountRequest {
            updated_by: ctx.account_id()?,
            email: req.email,
            name: req.name,
            ..Default::default()
        };

        Ok(self.prov.update(account_id, md_req)?.into())
    }

    pub async fn change_role(
        &self,
        ctx: Context,
        account_id: u64,
        req: ChangeRoleRequest,
    ) -> Result<Account> {
        ctx.check_permission(Permission::Users(UserAction::ChangeRole))?;

        if account_id == ctx.account_id()? && req.role != Role::Admin {
            return Err(PlatformError::BadRequest(
                "can't revoke own admin role".to_string(),
            ));
        }

        let md_req = metadata::accounts::UpdateAccountRequest {
            updated_by: ctx.account_id()?,
            role: OptionalProperty::Some(req.role),
            ..Default::default()
        };

        Ok(self.prov.update(account_id, md_req)?.into())
    }

    pub async fn delete(&self, ctx: Context, account_id: u64) -> Result<Account> {
        ctx.check_permission(Permission::Users(UserAction::Delete))?;

        if account_id == ctx.account_id()? {
            return Err(PlatformError::BadRequest(
                "can't delete own account".to_string(),
            ));
        }

        Ok(self.prov.delete(account_id)?.into())
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: u64,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<u64>,
    pub updated_at: Option<DateTime<Utc>>,
    pub updated_by: Option<u64>,
    pub email: String,
    pub name: Option<String>,
    pub role: Role,
}

impl From<metadata::accounts::Account> for Account {
    fn from(value: metadata::accounts::Account) -> Self {
        Account {
            id: value.id,
            created_at: value.created_at,
            created_by: value.created_by,
            updated_at: value.updated_at,
            updated_by: value.updated_by,
            email: value.email,
            name: value.name,
            role: value.role,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountRequest {
    pub email: String,
    pub name: Option<String>,
    pub role: Option<Role>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccountRequest {
    #[serde(default, skip_serializing_if = "OptionalProperty::is_none")]
    pub email: OptionalProperty<String>,
    #[serde(default, skip_serializing_if = "OptionalProperty::is_none")]
    pub name: OptionalProperty<Option<String>>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChangeRoleRequest {
    pub role: Role,
}
