use std::sync::Arc;

use chrono::DateTime;
use chrono::Utc;
use common::rbac::Permission;
use common::rbac::ProjectAction;
use common::types::OptionalProperty;
use metadata::projects::ProjectStatus;
use metadata::MetadataProvider;
use serde::Deserialize;
use serde::Serialize;
use tracing::info;

use crate::error::ValidationError;
use crate::Context;
use crate::ListResponse;
use crate::Result;

pub struct Projects {
    md: Arc<MetadataProvider>,
}

impl Projects {
    pub fn new(md: Arc<MetadataProvider>) -> Self {
        Self { md }
    }

    fn validate_members(&self, err: &mut ValidationError, members: &[u64]) {
        for id in members {
            if self.md.accounts.get_by_id(*id).is_err() {
                err.push("members", format!("account {id} not found"));
                return;
            }
        }
    }

    pub async fn create(&self, ctx: Context, req: CreateProjectRequest) -> Result<Project> {
        ctx.check_permission(Permission::Projects(ProjectAction::Create))?;

        let mut err = ValidationError::new();
        if req.name.trim().is_empty() {
            err.push("name", "empty name");
        }
        err.result()?;

        let project = self
            .md
            .projects
            .create(metadata::projects::CreateProjectRequest {
                created_by: ctx.account_id()?,
                name: req.name,
                description: req.description,
                members: vec![],
            })?;

        Ok(project.into())
    }

    pub async fn get_by_id(&self, ctx: Context, id: u64) -> Result<Project> {
        ctx.check_permission(Permission::Projects(ProjectAction::Read))?;

        Ok(self.md.projects.get_by_id(id)?.into())
    }

    pub async fn list(&self, ctx: Context) -> Result<ListResponse<Project>> {
        ctx.check_permission(Permission::Projects(ProjectAction::Read))?;

        Ok(self.md.projects.list()?.into())
    }

    pub async fn update(
        &self,
        ctx: Context,
        project_id: u64,
        req: UpdateProjectRequest,
    ) -> Result<Project> {
        ctx.check_permission(Permission::Projects(ProjectAction::Update))?;

        let mut err = ValidationError::new();
        if let OptionalProperty::Some(name) = &req.name {
            if name.trim().is_empty() {
                err.push("name", "empty name");
            }
        }
        err.result()?;

        let md_req = metadata::projects::UpdateProjectRequest {
            updated_by: ctx.account_id()?,
            name: req.name,
            description: req.description,
            status: req.status,
            members: OptionalProperty::None,
        };

        Ok(self.md.projects.update(project_id, md_req)?.into())
    }

    pub async fn set_members(
        &self,
        ctx: Context,
        project_id: u64,
        req: SetMembersRequest,
    ) -> Result<Project> {
        ctx.check_permission(Permission::Projects(ProjectAction::ManageMembers))?;

        let mut err = ValidationError::new();
        self.validate_members(&mut err, &req.members);
        err.result()?;

        let md_req = metadata::projects::UpdateProjectRequest {
            updated_by: ctx.account_id()?,
            members: OptionalProperty::Some(req.members),
            ..Default::default()
        };

        Ok(self.md.projects.update(project_id, md_req)?.into())
    }

    /// Deletes the project with its tasks and their comments.
    pub async fn delete(&self, ctx: Context, project_id: u64) -> Result<Project> {
        ctx.check_permission(Permission::Projects(ProjectAction::Delete))?;

        let (project, cascade) = self.md.delete_project(project_id)?;
        info!(
            project_id,
            tasks = cascade.tasks.len(),
            comments = cascade.comments,
            "project deleted"
        );

        Ok(project.into())
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: u64,
    pub created_at: DateTime<Utc>,
    pub created_by: u64,
    pub updated_at: Option<DateTime<Utc>>,
    pub updated_by: Option<u64>,
    pub name: String,
    pub description: Option<String>,
    pub status: ProjectStatus,
    pub members: Vec<u64>,
}

impl From<metadata::projects::Project> for Project {
    fn from(value: metadata::projects::Project) -> Self {
        Project {
            id: value.id,
            created_at: value.created_at,
            created_by: value.created_by,
            updated_at: value.updated_at,
            updated_by: value.updated_by,
            name: value.name,
            description: value.description,
            status: value.status,
            members: value.members,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectRequest {
    #[serde(default, skip_serializing_if = "OptionalProperty::is_none")]
    pub name: OptionalProperty<String>,
    #[serde(default, skip_serializing_if = "OptionalProperty::is_none")]
    pub description: OptionalProperty<Option<String>>,
    #[serde(default, skip_serializing_if = "OptionalProperty::is_none")]
    pub status: OptionalProperty<ProjectStatus>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SetMembersRequest {
    pub members: Vec<u64>,
}
