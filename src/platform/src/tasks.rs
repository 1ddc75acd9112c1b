use std::sync::Arc;

use chrono::DateTime;
use chrono::NaiveDate;
use chrono::Utc;
use common::rbac::Permission;
use common::rbac::TaskAction;
use common::types::OptionalProperty;
use metadata::projects::ProjectStatus;
use metadata::tasks::Progress;
use metadata::tasks::TaskPriority;
use metadata::tasks::TaskStatus;
use metadata::MetadataProvider;
use serde::Deserialize;
use serde::Serialize;
use tracing::info;

use crate::error::ValidationError;
use crate::Context;
use crate::ListResponse;
use crate::PlatformError;
use crate::Result;

pub struct Tasks {
    md: Arc<MetadataProvider>,
}

impl Tasks {
    pub fn new(md: Arc<MetadataProvider>) -> Self {
        Self { md }
    }

    fn validate_assignee(&self, err: &mut ValidationError, assignee_id: Option<u64>) {
        if let Some(id) = assignee_id {
            if self.md.accounts.get_by_id(id).is_err() {
                err.push("assigneeId", format!("account {id} not found"));
            }
        }
    }

    pub async fn create(
        &self,
        ctx: Context,
        project_id: u64,
        req: CreateTaskRequest,
    ) -> Result<Task> {
        ctx.check_permission(Permission::Tasks(TaskAction::Create))?;
        if req.assignee_id.is_some() {
            ctx.check_permission(Permission::Tasks(TaskAction::Assign))?;
        }

        let project = self.md.projects.get_by_id(project_id)?;
        if project.status == ProjectStatus::Archived {
            return Err(PlatformError::BadRequest(format!(
                "project {project_id} is archived"
            )));
        }

        let mut err = ValidationError::new();
        if req.title.trim().is_empty() {
            err.push("title", "empty title");
        }
        self.validate_assignee(&mut err, req.assignee_id);
        err.result()?;

        let task = self.md.create_task(metadata::tasks::CreateTaskRequest {
            created_by: ctx.account_id()?,
            project_id,
            parent_id: req.parent_id,
            title: req.title,
            description: req.description,
            status: req.status.unwrap_or_default(),
            priority: req.priority.unwrap_or_default(),
            assignee_id: req.assignee_id,
            due_date: req.due_date,
        })?;

        Ok(task.into())
    }

    pub async fn get_by_id(&self, ctx: Context, id: u64) -> Result<Task> {
        ctx.check_permission(Permission::Tasks(TaskAction::Read))?;

        Ok(self.md.tasks.get_by_id(id)?.into())
    }

    pub async fn list(&self, ctx: Context, project_id: u64) -> Result<ListResponse<Task>> {
        ctx.check_permission(Permission::Tasks(TaskAction::Read))?;
        self.md.projects.get_by_id(project_id)?;

        Ok(self.md.tasks.list_by_project(project_id)?.into())
    }

    pub async fn subtasks(&self, ctx: Context, task_id: u64) -> Result<ListResponse<Task>> {
        ctx.check_permission(Permission::Tasks(TaskAction::Read))?;
        self.md.tasks.get_by_id(task_id)?;

        Ok(self.md.tasks.list_subtasks(task_id)?.into())
    }

    pub async fn progress(&self, ctx: Context, task_id: u64) -> Result<Progress> {
        ctx.check_permission(Permission::Tasks(TaskAction::Read))?;

        Ok(self.md.tasks.progress(task_id)?)
    }

    pub async fn update(&self, ctx: Context, task_id: u64, req: UpdateTaskRequest) -> Result<Task> {
        ctx.check_permission(Permission::Tasks(TaskAction::Update))?;

        let mut err = ValidationError::new();
        if let OptionalProperty::Some(title) = &req.title {
            if title.trim().is_empty() {
                err.push("title", "empty title");
            }
        }
        err.result()?;

        let md_req = metadata::tasks::UpdateTaskRequest {
            updated_by: ctx.account_id()?,
            title: req.title,
            description: req.description,
            status: req.status,
            priority: req.priority,
            due_date: req.due_date,
            ..Default::default()
        };

        Ok(self.md.tasks.update(task_id, md_req)?.into())
    }

    pub async fn update_status(
        &self,
        ctx: Context,
        task_id: u64,
        req: UpdateStatusRequest,
    ) -> Result<Task> {
        ctx.check_any_permission([
            Permission::Tasks(TaskAction::Update),
            Permission::Tasks(TaskAction::UpdateStatus),
        ])?;

        let md_req = metadata::tasks::UpdateTaskRequest {
            updated_by: ctx.account_id()?,
            status: OptionalProperty::Some(req.status),
            ..Default::default()
        };

        Ok(self.md.tasks.update(task_id, md_req)?.into())
    }

    pub async fn assign(&self, ctx: Context, task_id: u64, req: AssignRequest) -> Result<Task> {
        ctx.check_permission(Permission::Tasks(TaskAction::Assign))?;

        let mut err = ValidationError::new();
        self.validate_assignee(&mut err, req.assignee_id);
        err.result()?;

        let md_req = metadata::tasks::UpdateTaskRequest {
            updated_by: ctx.account_id()?,
            assignee_id: OptionalProperty::Some(req.assignee_id),
            ..Default::default()
        };

        Ok(self.md.tasks.update(task_id, md_req)?.into())
    }

    /// Deletes the task with its subtasks and all of their comments.
    pub async fn delete(&self, ctx: Context, task_id: u64) -> Result<Task> {
        ctx.check_permission(Permission::Tasks(TaskAction::Delete))?;

        let (task, cascade) = self.md.delete_task(task_id)?;
        info!(
            task_id,
            subtasks = cascade.tasks.len(),
            comments = cascade.comments,
            "task deleted"
        );

        Ok(task.into())
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: u64,
    pub created_at: DateTime<Utc>,
    pub created_by: u64,
    pub updated_at: Option<DateTime<Utc>>,
    pub updated_by: Option<u64>,
    pub project_id: u64,
    pub parent_id: Option<u64>,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub assignee_id: Option<u64>,
    pub due_date: Option<NaiveDate>,
}

impl From<metadata::tasks::Task> for Task {
    fn from(value: metadata::tasks::Task) -> Self {
        Task {
            id: value.id,
            created_at: value.created_at,
            created_by: value.created_by,
            updated_at: value.updated_at,
            updated_by: value.updated_by,
            project_id: value.project_id,
            parent_id: value.parent_id,
            title: value.title,
            description: value.description,
            status: value.status,
            priority: value.priority,
            assignee_id: value.assignee_id,
            due_date: value.due_date,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub title: String,
    pub description: Option<String>,
    pub parent_id: Option<u64>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub assignee_id: Option<u64>,
    pub due_date: Option<NaiveDate>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    #[serde(default, skip_serializing_if = "OptionalProperty::is_none")]
    pub title: OptionalProperty<String>,
    #[serde(default, skip_serializing_if = "OptionalProperty::is_none")]
    pub description: OptionalProperty<Option<String>>,
    #[serde(default, skip_serializing_if = "OptionalProperty::is_none")]
    pub status: OptionalProperty<TaskStatus>,
    #[serde(default, skip_serializing_if = "OptionalProperty::is_none")]
    pub priority: OptionalProperty<TaskPriority>,
    #[serde(default, skip_serializing_if = "OptionalProperty::is_none")]
    pub due_date: OptionalProperty<Option<NaiveDate>>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    pub status: TaskStatus,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AssignRequest {
    pub assignee_id: Option<u64>,
}
