use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::Utc;
use common::rbac::AnalyticsAction;
use common::rbac::Permission;
use metadata::tasks::Task;
use metadata::tasks::TaskStatus;
use metadata::MetadataProvider;
use serde::Deserialize;
use serde::Serialize;

use crate::Context;
use crate::PlatformError;
use crate::Result;

/// Which slice of the data a summary covers.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    All,
    Team,
    Own,
}

impl Scope {
    /// The widest scope the caller's grants allow, strongest first.
    pub fn for_context(ctx: &Context) -> Option<Scope> {
        [
            (AnalyticsAction::ViewAll, Scope::All),
            (AnalyticsAction::ViewTeam, Scope::Team),
            (AnalyticsAction::ViewOwn, Scope::Own),
        ]
        .into_iter()
        .find(|(action, _)| ctx.can(Permission::Analytics(*action)))
        .map(|(_, scope)| scope)
    }
}

pub struct Analytics {
    md: Arc<MetadataProvider>,
}

impl Analytics {
    pub fn new(md: Arc<MetadataProvider>) -> Self {
        Self { md }
    }

    pub async fn summary(&self, ctx: Context) -> Result<Summary> {
        ctx.check_any_permission(AnalyticsAction::ALL.iter().map(|a| Permission::Analytics(*a)))?;
        let account_id = ctx.account_id()?;

        // every analytics action maps to a scope
        let scope = Scope::for_context(&ctx)
            .ok_or_else(|| PlatformError::Internal("analytics grant without a scope".to_string()))?;

        let (projects, tasks) = match scope {
            Scope::All => (
                self.md.projects.list()?.len(),
                self.md.tasks.list()?.data,
            ),
            Scope::Team => {
                let projects: BTreeSet<u64> = self
                    .md
                    .projects
                    .list_for_account(account_id)?
                    .data
                    .iter()
                    .map(|p| p.id)
                    .collect();
                let tasks = self
                    .md
                    .tasks
                    .list()?
                    .data
                    .into_iter()
                    .filter(|t| projects.contains(&t.project_id))
                    .collect();
                (projects.len(), tasks)
            }
            Scope::Own => {
                let tasks = self.md.tasks.list_for_account(account_id)?.data;
                let projects: BTreeSet<u64> = tasks.iter().map(|t| t.project_id).collect();
                (projects.len(), tasks)
            }
        };

        Ok(Summary::new(scope, projects, &tasks))
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct TasksByStatus {
    pub todo: usize,
    pub in_progress: usize,
    pub review: usize,
    pub done: usize,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub scope: Scope,
    pub projects: usize,
    pub tasks: usize,
    pub by_status: TasksByStatus,
    pub overdue: usize,
    pub completion_percent: f64,
}

impl Summary {
    pub fn new(scope: Scope, projects: usize, tasks: &[Task]) -> Self {
        let today = Utc::now().date_naive();
        let mut by_status = TasksByStatus::default();
        let mut overdue = 0;
        for task in tasks {
            match task.status {
                TaskStatus::Todo => by_status.todo += 1,
                TaskStatus::InProgress => by_status.in_progress += 1,
                TaskStatus::Review => by_status.review += 1,
                TaskStatus::Done => by_status.done += 1,
            }
            if task.status != TaskStatus::Done && task.due_date.is_some_and(|d| d < today) {
                overdue += 1;
            }
        }

        let completion_percent = if tasks.is_empty() {
            0.0
        } else {
            (by_status.done as f64 / tasks.len() as f64 * 10000.0).round() / 100.0
        };

        Summary {
            scope,
            projects,
            tasks: tasks.len(),
            by_status,
            overdue,
            completion_percent,
        }
    }
}
