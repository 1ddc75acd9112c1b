use chrono::DateTime;
use chrono::NaiveDate;
use chrono::Utc;
use common::types::OptionalProperty;
use serde::Deserialize;
use serde::Serialize;

use crate::error::MetadataError;
use crate::metadata::ListResponse;
use crate::store::no_conflicts;
use crate::store::Table;
use crate::Result;

pub struct Tasks {
    table: Table<Task>,
}

impl Default for Tasks {
    fn default() -> Self {
        Self::new()
    }
}

impl Tasks {
    pub fn new() -> Self {
        Tasks {
            table: Table::new("task"),
        }
    }

    /// Creates a task. When `parent_id` is set the parent must exist and belong to the same
    /// project; the check runs under the insert lock. The project itself isn't checked here,
    /// see [`crate::MetadataProvider::create_task`].
    pub fn create(&self, req: CreateTaskRequest) -> Result<Task> {
        let created_at = Utc::now();
        let (parent_id, project_id) = (req.parent_id, req.project_id);
        self.table.insert_checked(
            |rows| {
                let Some(parent_id) = parent_id else {
                    return Ok(());
                };
                match rows.get(&parent_id) {
                    None => Err(MetadataError::NotFound(format!(
                        "task {parent_id} not found"
                    ))),
                    Some(parent) if parent.project_id != project_id => {
                        Err(MetadataError::Constraint(format!(
                            "parent task {parent_id} belongs to another project"
                        )))
                    }
                    Some(_) => Ok(()),
                }
            },
            |id| req.into_task(id, created_at),
            no_conflicts,
        )
    }

    pub fn get_by_id(&self, id: u64) -> Result<Task> {
        self.table.get(id)
    }

    pub fn list(&self) -> Result<ListResponse<Task>> {
        Ok(ListResponse::new(self.table.list()?))
    }

    pub fn list_by_project(&self, project_id: u64) -> Result<ListResponse<Task>> {
        Ok(ListResponse::new(
            self.table.filter(|task| task.project_id == project_id)?,
        ))
    }

    pub fn list_subtasks(&self, task_id: u64) -> Result<ListResponse<Task>> {
        Ok(ListResponse::new(
            self.table.filter(|task| task.parent_id == Some(task_id))?,
        ))
    }

    /// Tasks assigned to or created by the account.
    pub fn list_for_account(&self, account_id: u64) -> Result<ListResponse<Task>> {
        Ok(ListResponse::new(self.table.filter(|task| {
            task.assignee_id == Some(account_id) || task.created_by == account_id
        })?))
    }

    pub fn progress(&self, task_id: u64) -> Result<Progress> {
        self.table.get(task_id)?;
        let subtasks = self.table.filter(|task| task.parent_id == Some(task_id))?;

        Ok(Progress::new(
            subtasks.len(),
            subtasks
                .iter()
                .filter(|task| task.status == TaskStatus::Done)
                .count(),
        ))
    }

    pub fn update(&self, task_id: u64, req: UpdateTaskRequest) -> Result<Task> {
        self.table.update(
            task_id,
            |task| {
                task.updated_at = Some(Utc::now());
                task.updated_by = Some(req.updated_by);
                if let OptionalProperty::Some(title) = req.title {
                    task.title = title;
                }
                if let OptionalProperty::Some(description) = req.description {
                    task.description = description;
                }
                if let OptionalProperty::Some(status) = req.status {
                    task.status = status;
                }
                if let OptionalProperty::Some(priority) = req.priority {
                    task.priority = priority;
                }
                if let OptionalProperty::Some(assignee_id) = req.assignee_id {
                    task.assignee_id = assignee_id;
                }
                if let OptionalProperty::Some(due_date) = req.due_date {
                    task.due_date = due_date;
                }
                Ok(())
            },
            no_conflicts,
        )
    }

    /// Deletes the task and all of its descendants. Returns the ids of every removed task.
    pub fn delete(&self, id: u64) -> Result<Vec<u64>> {
        Ok(self
            .table
            .delete_tree(id, |task| task.parent_id)?
            .into_iter()
            .map(|task| task.id)
            .collect())
    }

    pub fn delete_by_project(&self, project_id: u64) -> Result<Vec<u64>> {
        Ok(self
            .table
            .delete_where(|task| task.project_id == project_id)?
            .into_iter()
            .map(|task| task.id)
            .collect())
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Review,
    Done,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
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

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct CreateTaskRequest {
    pub created_by: u64,
    pub project_id: u64,
    pub parent_id: Option<u64>,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub assignee_id: Option<u64>,
    pub due_date: Option<NaiveDate>,
}

impl CreateTaskRequest {
    pub fn into_task(self, id: u64, created_at: DateTime<Utc>) -> Task {
        Task {
            id,
            created_at,
            created_by: self.created_by,
            updated_at: None,
            updated_by: None,
            project_id: self.project_id,
            parent_id: self.parent_id,
            title: self.title,
            description: self.description,
            status: self.status,
            priority: self.priority,
            assignee_id: self.assignee_id,
            due_date: self.due_date,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct UpdateTaskRequest {
    pub updated_by: u64,
    pub title: OptionalProperty<String>,
    pub description: OptionalProperty<Option<String>>,
    pub status: OptionalProperty<TaskStatus>,
    pub priority: OptionalProperty<TaskPriority>,
    pub assignee_id: OptionalProperty<Option<u64>>,
    pub due_date: OptionalProperty<Option<NaiveDate>>,
}

/// Completion of a task's direct subtasks.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Progress {
    pub total: usize,
    pub done: usize,
    pub percent: f64,
}

impl Progress {
    pub fn new(total: usize, done: usize) -> Self {
        let percent = if total == 0 {
            0.0
        } else {
            (done as f64 / total as f64 * 10000.0).round() / 100.0
        };

        Self {
            total,
            done,
            percent,
        }
    }
}
