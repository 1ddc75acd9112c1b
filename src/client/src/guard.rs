//! Advisory permission checks for presentation code.
//!
//! A [`PermissionGuard`] answers "should this control be shown or enabled" from a local copy of
//! the caller's role and of the permission matrix. It never errors and never grants anything
//! the matrix doesn't list, but it isn't a security boundary: every request it lets through is
//! checked again by the server.

use common::rbac::PermissionMatrix;
use common::rbac::Requirement;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    Hidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    Enabled,
    Disabled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionGuard {
    role: Option<String>,
    matrix: PermissionMatrix,
}

impl PermissionGuard {
    pub fn new(role: Option<String>, matrix: PermissionMatrix) -> Self {
        Self { role, matrix }
    }

    /// Guard backed by the matrix compiled into this build.
    pub fn with_current_matrix(role: Option<String>) -> Self {
        Self::new(role, PermissionMatrix::current())
    }

    /// Guard for a caller whose role is unknown. Denies everything.
    pub fn anonymous() -> Self {
        Self::with_current_matrix(None)
    }

    pub fn role(&self) -> Option<&str> {
        self.role.as_deref()
    }

    pub fn matrix(&self) -> &PermissionMatrix {
        &self.matrix
    }

    fn known_role(&self) -> Option<&str> {
        let role = self.role.as_deref()?;
        self.matrix.roles().find(|r| *r == role)
    }

    pub fn can(&self, resource: &str, action: &str) -> bool {
        self.matrix
            .has_permission(self.known_role(), resource, action)
    }

    pub fn can_any(&self, permissions: &[(&str, &str)]) -> bool {
        self.matrix
            .has_any_permission(self.known_role(), permissions)
    }

    pub fn can_all(&self, permissions: &[(&str, &str)]) -> bool {
        self.known_role().is_some()
            && self
                .matrix
                .has_all_permissions(self.known_role(), permissions)
    }

    /// Evaluates a typed requirement the same way the server does.
    pub fn allows(&self, required: &Requirement) -> bool {
        if self.known_role().is_none() {
            return false;
        }

        let mut granted = required
            .permissions()
            .iter()
            .map(|p| self.can(p.resource().as_str(), p.action()));
        match required {
            Requirement::One(_) => granted.all(|v| v),
            Requirement::Any(_) => granted.any(|v| v),
            Requirement::All(_) => granted.all(|v| v),
        }
    }

    pub fn show_if(&self, resource: &str, action: &str) -> Visibility {
        if self.can(resource, action) {
            Visibility::Visible
        } else {
            Visibility::Hidden
        }
    }

    pub fn enable_if(&self, resource: &str, action: &str) -> Availability {
        if self.can(resource, action) {
            Availability::Enabled
        } else {
            Availability::Disabled
        }
    }
}
