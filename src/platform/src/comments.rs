use std::sync::Arc;

use chrono::DateTime;
use chrono::Utc;
use common::rbac::CommentAction;
use common::rbac::Permission;
use common::rbac::Requirement;
use metadata::MetadataProvider;
use serde::Deserialize;
use serde::Serialize;

use crate::error::ValidationError;
use crate::Context;
use crate::ListResponse;
use crate::PlatformError;
use crate::Result;

fn validate_body(body: &str) -> Result<()> {
    let mut err = ValidationError::new();
    if body.trim().is_empty() {
        err.push("body", "empty body");
    }
    err.result()
}

pub struct Comments {
    md: Arc<MetadataProvider>,
}

impl Comments {
    pub fn new(md: Arc<MetadataProvider>) -> Self {
        Self { md }
    }

    /// Callers holding `any` act on every comment, callers holding only `own` act on the
    /// comments they authored.
    fn check_ownership(
        &self,
        ctx: &Context,
        comment_id: u64,
        any: CommentAction,
        own: CommentAction,
    ) -> Result<()> {
        ctx.check_any_permission([Permission::Comments(any), Permission::Comments(own)])?;
        if ctx.can(Permission::Comments(any)) {
            return Ok(());
        }

        let comment = self.md.comments.get_by_id(comment_id)?;
        if comment.author_id == ctx.account_id()? {
            return Ok(());
        }

        tracing::info!(
            account_id = ?ctx.account_id,
            comment_id,
            author_id = comment.author_id,
            "not the comment author"
        );
        Err(PlatformError::PermissionDenied {
            role: ctx.role.map(|r| r.to_string()).unwrap_or_default(),
            required: Requirement::One(Permission::Comments(any)),
        })
    }

    pub async fn create(
        &self,
        ctx: Context,
        task_id: u64,
        req: CreateCommentRequest,
    ) -> Result<Comment> {
        ctx.check_permission(Permission::Comments(CommentAction::Create))?;
        validate_body(&req.body)?;

        let comment = self
            .md
            .create_comment(metadata::comments::CreateCommentRequest {
                task_id,
                author_id: ctx.account_id()?,
                body: req.body,
            })?;

        Ok(comment.into())
    }

    pub async fn list(&self, ctx: Context, task_id: u64) -> Result<ListResponse<Comment>> {
        ctx.check_permission(Permission::Comments(CommentAction::Read))?;
        self.md.tasks.get_by_id(task_id)?;

        Ok(self.md.comments.list_by_task(task_id)?.into())
    }

    pub async fn update(
        &self,
        ctx: Context,
        comment_id: u64,
        req: UpdateCommentRequest,
    ) -> Result<Comment> {
        self.check_ownership(
            &ctx,
            comment_id,
            CommentAction::Update,
            CommentAction::UpdateOwn,
        )?;
        validate_body(&req.body)?;

        let comment = self.md.comments.update(
            comment_id,
            metadata::comments::UpdateCommentRequest {
                updated_by: ctx.account_id()?,
                body: req.body,
            },
        )?;

        Ok(comment.into())
    }

    pub async fn delete(&self, ctx: Context, comment_id: u64) -> Result<Comment> {
        self.check_ownership(
            &ctx,
            comment_id,
            CommentAction::Delete,
            CommentAction::DeleteOwn,
        )?;

        Ok(self.md.comments.delete(comment_id)?.into())
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub task_id: u64,
    pub author_id: u64,
    pub body: String,
}

impl From<metadata::comments::Comment> for Comment {
    fn from(value: metadata::comments::Comment) -> Self {
        Comment {
            id: value.id,
            created_at: value.created_at,
            updated_at: value.updated_at,
            task_id: value.task_id,
            author_id: value.author_id,
            body: value.body,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    pub body: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCommentRequest {
    pub body: String,
}
