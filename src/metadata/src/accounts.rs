use chrono::DateTime;
use chrono::Utc;
use common::rbac::Role;
use common::types::OptionalProperty;
use serde::Deserialize;
use serde::Serialize;

use crate::error::MetadataError;
use crate::metadata::ListResponse;
use crate::store::Table;
use crate::Result;

fn same_email(a: &Account, b: &Account) -> bool {
    a.email.eq_ignore_ascii_case(&b.email)
}

pub struct Accounts {
    table: Table<Account>,
}

impl Default for Accounts {
    fn default() -> Self {
        Self::new()
    }
}

impl Accounts {
    pub fn new() -> Self {
        Accounts {
            table: Table::new("account"),
        }
    }

    pub fn create(&self, req: CreateAccountRequest) -> Result<Account> {
        let created_at = Utc::now();
        self.table
            .insert(|id| req.into_account(id, created_at), same_email)
            .map_err(|err| match err {
                MetadataError::AlreadyExists(_) => {
                    MetadataError::AlreadyExists("account with this email already exists".into())
                }
                other => other,
            })
    }

    pub fn get_by_id(&self, id: u64) -> Result<Account> {
        self.table.get(id)
    }

    pub fn get_by_email(&self, email: &str) -> Result<Account> {
        self.table
            .find(|acc| acc.email.eq_ignore_ascii_case(email))?
            .ok_or_else(|| MetadataError::NotFound(format!("account with email \"{email}\" not found")))
    }

    pub fn list(&self) -> Result<ListResponse<Account>> {
        Ok(ListResponse::new(self.table.list()?))
    }

    pub fn update(&self, account_id: u64, req: UpdateAccountRequest) -> Result<Account> {
        self.table
            .update(
                account_id,
                |account| {
                    account.updated_at = Some(Utc::now());
                    account.updated_by = Some(req.updated_by);
                    if let OptionalProperty::Some(email) = req.email {
                        account.email = email;
                    }
                    if let OptionalProperty::Some(name) = req.name {
                        account.name = name;
                    }
                    if let OptionalProperty::Some(role) = req.role {
                        account.role = role;
                    }
                    Ok(())
                },
                same_email,
            )
            .map_err(|err| match err {
                MetadataError::AlreadyExists(_) => {
                    MetadataError::AlreadyExists("account with this email already exists".into())
                }
                other => other,
            })
    }

    pub fn delete(&self, id: u64) -> Result<Account> {
        self.table.delete(id)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
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

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct CreateAccountRequest {
    pub created_by: Option<u64>,
    pub email: String,
    pub name: Option<String>,
    pub role: Role,
}

impl CreateAccountRequest {
    pub fn into_account(self, id: u64, created_at: DateTime<Utc>) -> Account {
        Account {
            id,
            created_at,
            created_by: self.created_by,
            updated_at: None,
            updated_by: None,
            email: self.email,
            name: self.name,
            role: self.role,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct UpdateAccountRequest {
    pub updated_by: u64,
    pub email: OptionalProperty<String>,
    pub name: OptionalProperty<Option<String>>,
    pub role: OptionalProperty<Role>,
}
