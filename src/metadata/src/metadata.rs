use std::sync::Arc;
use std::sync::RwLock;
use std::sync::RwLockReadGuard;
use std::sync::RwLockWriteGuard;

use serde::Deserialize;
use serde::Serialize;

use crate::accounts::Accounts;
use crate::comments::Comment;
use crate::comments::Comments;
use crate::comments::CreateCommentRequest;
use crate::error::MetadataError;
use crate::projects::Project;
use crate::projects::Projects;
use crate::tasks::CreateTaskRequest;
use crate::tasks::Task;
use crate::tasks::Tasks;
use crate::Result;

/// Entity stores plus the operations that span more than one of them.
///
/// Cross-store creates hold `graph` for reading and cascading deletes hold it for writing,
/// so a child is never inserted under a parent that a concurrent cascade is removing.
#[derive(Clone, Default)]
pub struct MetadataProvider {
    pub accounts: Arc<Accounts>,
    pub projects: Arc<Projects>,
    pub tasks: Arc<Tasks>,
    pub comments: Arc<Comments>,
    graph: Arc<RwLock<()>>,
}

/// What a cascading delete removed along with its root.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Cascade {
    pub tasks: Vec<u64>,
    pub comments: usize,
}

impl MetadataProvider {
    pub fn new() -> Self {
        Self::default()
    }

    fn read_graph(&self) -> Result<RwLockReadGuard<'_, ()>> {
        self.graph
            .read()
            .map_err(|err| MetadataError::Internal(format!("graph lock poisoned: {err}")))
    }

    fn write_graph(&self) -> Result<RwLockWriteGuard<'_, ()>> {
        self.graph
            .write()
            .map_err(|err| MetadataError::Internal(format!("graph lock poisoned: {err}")))
    }

    /// Creates a task in an existing project.
    pub fn create_task(&self, req: CreateTaskRequest) -> Result<Task> {
        let _graph = self.read_graph()?;
        self.projects.get_by_id(req.project_id)?;

        self.tasks.create(req)
    }

    /// Creates a comment on an existing task.
    pub fn create_comment(&self, req: CreateCommentRequest) -> Result<Comment> {
        let _graph = self.read_graph()?;
        self.tasks.get_by_id(req.task_id)?;

        self.comments.create(req)
    }

    /// Deletes the task, its subtasks and the comments of all of them.
    pub fn delete_task(&self, task_id: u64) -> Result<(Task, Cascade)> {
        let _graph = self.write_graph()?;
        let task = self.tasks.get_by_id(task_id)?;
        let mut tasks = self.tasks.delete(task_id)?;
        let comments = self.comments.delete_by_tasks(&tasks)?;
        tasks.retain(|id| *id != task_id);

        Ok((task, Cascade { tasks, comments }))
    }

    /// Deletes the project with its tasks and their comments.
    pub fn delete_project(&self, project_id: u64) -> Result<(Project, Cascade)> {
        let _graph = self.write_graph()?;
        let project = self.projects.delete(project_id)?;
        let tasks = self.tasks.delete_by_project(project_id)?;
        let comments = self.comments.delete_by_tasks(&tasks)?;

        Ok((project, Cascade { tasks, comments }))
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct ResponseMetadata {
    pub next: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ListResponse<T> {
    pub data: Vec<T>,
    pub meta: ResponseMetadata,
}

impl<T> ListResponse<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self {
            data,
            meta: ResponseMetadata::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl<T> IntoIterator for ListResponse<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.into_iter()
    }
}
