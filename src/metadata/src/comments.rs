use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::metadata::ListResponse;
use crate::store::no_conflicts;
use crate::store::Table;
use crate::Result;

pub struct Comments {
    table: Table<Comment>,
}

impl Default for Comments {
    fn default() -> Self {
        Self::new()
    }
}

impl Comments {
    pub fn new() -> Self {
        Comments {
            table: Table::new("comment"),
        }
    }

    pub fn create(&self, req: CreateCommentRequest) -> Result<Comment> {
        let created_at = Utc::now();
        self.table
            .insert(|id| req.into_comment(id, created_at), no_conflicts)
    }

    pub fn get_by_id(&self, id: u64) -> Result<Comment> {
        self.table.get(id)
    }

    pub fn list(&self) -> Result<ListResponse<Comment>> {
        Ok(ListResponse::new(self.table.list()?))
    }

    pub fn list_by_task(&self, task_id: u64) -> Result<ListResponse<Comment>> {
        Ok(ListResponse::new(
            self.table.filter(|comment| comment.task_id == task_id)?,
        ))
    }

    pub fn update(&self, comment_id: u64, req: UpdateCommentRequest) -> Result<Comment> {
        self.table.update(
            comment_id,
            |comment| {
                comment.updated_at = Some(Utc::now());
                comment.updated_by = Some(req.updated_by);
                comment.body = req.body;
                Ok(())
            },
            no_conflicts,
        )
    }

    pub fn delete(&self, id: u64) -> Result<Comment> {
        self.table.delete(id)
    }

    pub fn delete_by_tasks(&self, task_ids: &[u64]) -> Result<usize> {
        Ok(self
            .table
            .delete_where(|comment| task_ids.contains(&comment.task_id))?
            .len())
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Comment {
    pub id: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub updated_by: Option<u64>,
    pub task_id: u64,
    pub author_id: u64,
    pub body: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct CreateCommentRequest {
    pub task_id: u64,
    pub author_id: u64,
    pub body: String,
}

impl CreateCommentRequest {
    pub fn into_comment(self, id: u64, created_at: DateTime<Utc>) -> Comment {
        Comment {
            id,
            created_at,
            updated_at: None,
            updated_by: None,
            task_id: self.task_id,
            author_id: self.author_id,
            body: self.body,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpdateCommentRequest {
    pub updated_by: u64,
    pub body: String,
}
