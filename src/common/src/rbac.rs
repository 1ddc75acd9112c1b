//! Role based access control.
//!
//! The permission matrix is declared once in [`PERMISSIONS`] and shared by the server side
//! enforcement layer and by the advisory client guard. Every lookup is fail-closed: an absent
//! role, an unknown resource or an action that isn't listed for the role is a denial.

use std::collections::BTreeMap;
use std::fmt::Display;
use std::fmt::Formatter;
use std::str::FromStr;

use lazy_static::lazy_static;
use serde::Deserialize;
use serde::Serialize;

use crate::error::CommonError;
use crate::error::Result;

macro_rules! named_enum {
    ($(#[$meta:meta])* $name:ident, $err:path { $($variant:ident => $wire:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $(
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant,)+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }
        }

        impl FromStr for $name {
            type Err = CommonError;

            fn from_str(s: &str) -> Result<Self> {
                match s {
                    $($wire => Ok($name::$variant),)+
                    other => Err($err(other.to_string())),
                }
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

named_enum!(
    /// Exactly one role is assigned to every account.
    Role, CommonError::UnknownRole {
        Admin => "admin",
        Manager => "manager",
        User => "user",
    }
);

named_enum!(
    Resource, CommonError::UnknownResource {
        Projects => "projects",
        Tasks => "tasks",
        Users => "users",
        Analytics => "analytics",
        Comments => "comments",
    }
);

named_enum!(
    ProjectAction, CommonError::UnknownAction {
        Create => "create",
        Read => "read",
        Update => "update",
        Delete => "delete",
        ManageMembers => "manage_members",
    }
);

named_enum!(
    TaskAction, CommonError::UnknownAction {
        Create => "create",
        Read => "read",
        Update => "update",
        Delete => "delete",
        Assign => "assign",
        UpdateStatus => "update_status",
    }
);

named_enum!(
    UserAction, CommonError::UnknownAction {
        Create => "create",
        Read => "read",
        Update => "update",
        Delete => "delete",
        ChangeRole => "change_role",
    }
);

named_enum!(
    AnalyticsAction, CommonError::UnknownAction {
        ViewAll => "view_all",
        ViewTeam => "view_team",
        ViewOwn => "view_own",
    }
);

named_enum!(
    /// `UpdateOwn` and `DeleteOwn` are grants of their own, unrelated to `Update` and `Delete`.
    CommentAction, CommonError::UnknownAction {
        Create => "create",
        Read => "read",
        Update => "update",
        Delete => "delete",
        UpdateOwn => "update_own",
        DeleteOwn => "delete_own",
    }
);

/// An action scoped to its resource. Combinations that don't exist can't be built.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "PermissionName", into = "PermissionName")]
pub enum Permission {
    Projects(ProjectAction),
    Tasks(TaskAction),
    Users(UserAction),
    Analytics(AnalyticsAction),
    Comments(CommentAction),
}

impl Permission {
    pub fn resource(&self) -> Resource {
        match self {
            Permission::Projects(_) => Resource::Projects,
            Permission::Tasks(_) => Resource::Tasks,
            Permission::Users(_) => Resource::Users,
            Permission::Analytics(_) => Resource::Analytics,
            Permission::Comments(_) => Resource::Comments,
        }
    }

    pub fn action(&self) -> &'static str {
        match self {
            Permission::Projects(a) => a.as_str(),
            Permission::Tasks(a) => a.as_str(),
            Permission::Users(a) => a.as_str(),
            Permission::Analytics(a) => a.as_str(),
            Permission::Comments(a) => a.as_str(),
        }
    }

    pub fn parse(resource: &str, action: &str) -> Result<Permission> {
        Ok(match resource.parse::<Resource>()? {
            Resource::Projects => Permission::Projects(action.parse()?),
            Resource::Tasks => Permission::Tasks(action.parse()?),
            Resource::Users => Permission::Users(action.parse()?),
            Resource::Analytics => Permission::Analytics(action.parse()?),
            Resource::Comments => Permission::Comments(action.parse()?),
        })
    }

    /// Every permission that can be expressed, granted to someone or not.
    pub fn all() -> Vec<Permission> {
        let mut all = Vec::new();
        all.extend(ProjectAction::ALL.iter().map(|a| Permission::Projects(*a)));
        all.extend(TaskAction::ALL.iter().map(|a| Permission::Tasks(*a)));
        all.extend(UserAction::ALL.iter().map(|a| Permission::Users(*a)));
        all.extend(AnalyticsAction::ALL.iter().map(|a| Permission::Analytics(*a)));
        all.extend(CommentAction::ALL.iter().map(|a| Permission::Comments(*a)));
        all
    }
}

impl Display for Permission {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.resource(), self.action())
    }
}

/// Untyped (resource, action) pair as it travels over the wire.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct PermissionName {
    pub resource: String,
    pub action: String,
}

impl PermissionName {
    pub fn new(resource: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            action: action.into(),
        }
    }
}

impl From<Permission> for PermissionName {
    fn from(value: Permission) -> Self {
        PermissionName::new(value.resource().as_str(), value.action())
    }
}

impl TryFrom<PermissionName> for Permission {
    type Error = CommonError;

    fn try_from(value: PermissionName) -> Result<Self> {
        Permission::parse(&value.resource, &value.action)
    }
}

lazy_static! {
    pub static ref PERMISSIONS: Vec<(Role, Vec<Permission>)> = vec![
        (Role::Admin, vec![
            Permission::Projects(ProjectAction::Create),
            Permission::Projects(ProjectAction::Read),
            Permission::Projects(ProjectAction::Update),
            Permission::Projects(ProjectAction::Delete),
            Permission::Projects(ProjectAction::ManageMembers),
            Permission::Tasks(TaskAction::Create),
            Permission::Tasks(TaskAction::Read),
            Permission::Tasks(TaskAction::Update),
            Permission::Tasks(TaskAction::Delete),
            Permission::Tasks(TaskAction::Assign),
            Permission::Users(UserAction::Create),
            Permission::Users(UserAction::Read),
            Permission::Users(UserAction::Update),
            Permission::Users(UserAction::Delete),
            Permission::Users(UserAction::ChangeRole),
            Permission::Analytics(AnalyticsAction::ViewAll),
            Permission::Comments(CommentAction::Create),
            Permission::Comments(CommentAction::Read),
            Permission::Comments(CommentAction::Update),
            Permission::Comments(CommentAction::Delete),
        ]),
        (Role::Manager, vec![
            Permission::Projects(ProjectAction::Create),
            Permission::Projects(ProjectAction::Read),
            Permission::Projects(ProjectAction::Update),
            Permission::Projects(ProjectAction::ManageMembers),
            Permission::Tasks(TaskAction::Create),
            Permission::Tasks(TaskAction::Read),
            Permission::Tasks(TaskAction::Update),
            Permission::Tasks(TaskAction::Assign),
            Permission::Users(UserAction::Read),
            Permission::Analytics(AnalyticsAction::ViewTeam),
            Permission::Comments(CommentAction::Create),
            Permission::Comments(CommentAction::Read),
            Permission::Comments(CommentAction::Update),
            Permission::Comments(CommentAction::Delete),
        ]),
        (Role::User, vec![
            Permission::Projects(ProjectAction::Read),
            Permission::Tasks(TaskAction::Read),
            Permission::Tasks(TaskAction::UpdateStatus),
            Permission::Analytics(AnalyticsAction::ViewOwn),
            Permission::Comments(CommentAction::Create),
            Permission::Comments(CommentAction::Read),
            Permission::Comments(CommentAction::UpdateOwn),
            Permission::Comments(CommentAction::DeleteOwn),
        ]),
    ];
}

pub fn permissions_of(role: Role) -> &'static [Permission] {
    PERMISSIONS
        .iter()
        .find(|(r, _)| *r == role)
        .map(|(_, permissions)| permissions.as_slice())
        .unwrap_or(&[])
}

pub fn has_permission(role: Option<Role>, permission: Permission) -> bool {
    match role {
        None => false,
        Some(role) => permissions_of(role).contains(&permission),
    }
}

pub fn has_all_permissions(role: Option<Role>, permissions: &[Permission]) -> bool {
    permissions.iter().all(|p| has_permission(role, *p))
}

pub fn has_any_permission(role: Option<Role>, permissions: &[Permission]) -> bool {
    permissions.iter().any(|p| has_permission(role, *p))
}

/// Entry point for free-form input. Anything that doesn't parse is denied.
pub fn check_permission(role: Option<&str>, resource: &str, action: &str) -> bool {
    let Some(role) = role.and_then(|r| r.parse::<Role>().ok()) else {
        return false;
    };

    match Permission::parse(resource, action) {
        Ok(permission) => has_permission(Some(role), permission),
        Err(_) => false,
    }
}

/// What a route demands from the caller.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "mode", content = "permissions", rename_all = "snake_case")]
pub enum Requirement {
    One(Permission),
    Any(Vec<Permission>),
    All(Vec<Permission>),
}

impl Requirement {
    pub fn any(permissions: impl IntoIterator<Item = Permission>) -> Self {
        Requirement::Any(permissions.into_iter().collect())
    }

    pub fn all(permissions: impl IntoIterator<Item = Permission>) -> Self {
        Requirement::All(permissions.into_iter().collect())
    }

    pub fn permissions(&self) -> &[Permission] {
        match self {
            Requirement::One(p) => std::slice::from_ref(p),
            Requirement::Any(ps) | Requirement::All(ps) => ps.as_slice(),
        }
    }

    /// An unauthenticated caller never satisfies a requirement, even an empty one.
    pub fn is_satisfied_by(&self, role: Option<Role>) -> bool {
        if role.is_none() {
            return false;
        }

        match self {
            Requirement::One(p) => has_permission(role, *p),
            Requirement::Any(ps) => has_any_permission(role, ps),
            Requirement::All(ps) => has_all_permissions(role, ps),
        }
    }

    pub fn resources(&self) -> String {
        let mut resources: Vec<&str> = Vec::new();
        for p in self.permissions() {
            let name = p.resource().as_str();
            if !resources.contains(&name) {
                resources.push(name);
            }
        }

        resources.join(",")
    }

    pub fn actions(&self) -> String {
        self.permissions()
            .iter()
            .map(|p| p.action())
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl From<Permission> for Requirement {
    fn from(value: Permission) -> Self {
        Requirement::One(value)
    }
}

impl Display for Requirement {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let join = |ps: &[Permission]| {
            ps.iter()
                .map(|p| p.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        };

        match self {
            Requirement::One(p) => write!(f, "{p}"),
            Requirement::Any(ps) => write!(f, "any of {}", join(ps)),
            Requirement::All(ps) => write!(f, "all of {}", join(ps)),
        }
    }
}

/// Serialized `role -> resource -> [action]` view of [`PERMISSIONS`].
///
/// Clients that receive the matrix over the wire evaluate it with plain strings, so an
/// unknown role, resource or action is simply a missing key.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(transparent)]
pub struct PermissionMatrix(BTreeMap<String, BTreeMap<String, Vec<String>>>);

impl PermissionMatrix {
    pub fn current() -> Self {
        let mut matrix = BTreeMap::new();
        for role in Role::ALL {
            let mut resources: BTreeMap<String, Vec<String>> = Resource::ALL
                .iter()
                .map(|r| (r.as_str().to_string(), Vec::new()))
                .collect();
            for p in permissions_of(*role) {
                resources
                    .entry(p.resource().as_str().to_string())
                    .or_default()
                    .push(p.action().to_string());
            }
            matrix.insert(role.as_str().to_string(), resources);
        }

        PermissionMatrix(matrix)
    }

    pub fn roles(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(|k| k.as_str())
    }

    pub fn actions(&self, role: &str, resource: &str) -> &[String] {
        self.0
            .get(role)
            .and_then(|resources| resources.get(resource))
            .map(|actions| actions.as_slice())
            .unwrap_or(&[])
    }

    pub fn has_permission(&self, role: Option<&str>, resource: &str, action: &str) -> bool {
        match role {
            None => false,
            Some(role) => self.actions(role, resource).iter().any(|a| a == action),
        }
    }

    pub fn has_all_permissions(&self, role: Option<&str>, permissions: &[(&str, &str)]) -> bool {
        permissions
            .iter()
            .all(|(resource, action)| self.has_permission(role, resource, action))
    }

    pub fn has_any_permission(&self, role: Option<&str>, permissions: &[(&str, &str)]) -> bool {
        permissions
            .iter()
            .any(|(resource, action)| self.has_permission(role, resource, action))
    }
}

impl Default for PermissionMatrix {
    fn default() -> Self {
        PermissionMatrix::current()
    }
}
