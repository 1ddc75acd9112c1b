use chrono::DateTime;
use chrono::Utc;
use common::types::OptionalProperty;
use serde::Deserialize;
use serde::Serialize;

use crate::metadata::ListResponse;
use crate::store::Table;
use crate::Result;

fn same_name(a: &Project, b: &Project) -> bool {
    a.name == b.name
}

pub struct Projects {
    table: Table<Project>,
}

impl Default for Projects {
    fn default() -> Self {
        Self::new()
    }
}

impl Projects {
    pub fn new() -> Self {
        Projects {
            table: Table::new("project"),
        }
    }

    pub fn create(&self, req: CreateProjectRequest) -> Result<Project> {
        let created_at = Utc::now();
        self.table
            .insert(|id| req.into_project(id, created_at), same_name)
    }

    pub fn get_by_id(&self, id: u64) -> Result<Project> {
        self.table.get(id)
    }

    pub fn list(&self) -> Result<ListResponse<Project>> {
        Ok(ListResponse::new(self.table.list()?))
    }

    /// Projects the account created or is a member of.
    pub fn list_for_account(&self, account_id: u64) -> Result<ListResponse<Project>> {
        Ok(ListResponse::new(self.table.filter(|project| {
            project.created_by == account_id || project.members.contains(&account_id)
        })?))
    }

    pub fn update(&self, project_id: u64, req: UpdateProjectRequest) -> Result<Project> {
        self.table.update(
            project_id,
            |project| {
                project.updated_at = Some(Utc::now());
                project.updated_by = Some(req.updated_by);
                if let OptionalProperty::Some(name) = req.name {
                    project.name = name;
                }
                if let OptionalProperty::Some(description) = req.description {
                    project.description = description;
                }
                if let OptionalProperty::Some(status) = req.status {
                    project.status = status;
                }
                if let OptionalProperty::Some(mut members) = req.members {
                    members.sort_unstable();
                    members.dedup();
                    project.members = members;
                }
                Ok(())
            },
            same_name,
        )
    }

    pub fn delete(&self, id: u64) -> Result<Project> {
        self.table.delete(id)
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    #[default]
    Active,
    Archived,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
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

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct CreateProjectRequest {
    pub created_by: u64,
    pub name: String,
    pub description: Option<String>,
    pub members: Vec<u64>,
}

impl CreateProjectRequest {
    pub fn into_project(self, id: u64, created_at: DateTime<Utc>) -> Project {
        let mut members = self.members;
        members.sort_unstable();
        members.dedup();

        Project {
            id,
            created_at,
            created_by: self.created_by,
            updated_at: None,
            updated_by: None,
            name: self.name,
            description: self.description,
            status: ProjectStatus::Active,
            members,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct UpdateProjectRequest {
    pub updated_by: u64,
    pub name: OptionalProperty<String>,
    pub description: OptionalProperty<Option<String>>,
    pub status: OptionalProperty<ProjectStatus>,
    pub members: OptionalProperty<Vec<u64>>,
}
