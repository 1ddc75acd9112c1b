use std::sync::Arc;

use axum::extract::Extension;
use axum::extract::Path;
use axum::http::StatusCode;
use axum::routing;
use axum::Router;
use common::http::Json;
use common::rbac::CommentAction;
use common::rbac::Permission;

use crate::comments::Comment;
use crate::comments::Comments;
use crate::comments::CreateCommentRequest;
use crate::comments::UpdateCommentRequest;
use crate::Context;
use crate::ListResponse;
use crate::RequirePermission;
use crate::Result;

async fn create(
    ctx: Context,
    Extension(provider): Extension<Arc<Comments>>,
    Path(task_id): Path<u64>,
    Json(request): Json<CreateCommentRequest>,
) -> Result<(StatusCode, Json<Comment>)> {
    Ok((
        StatusCode::CREATED,
        Json(provider.create(ctx, task_id, request).await?),
    ))
}

async fn list(
    ctx: Context,
    Extension(provider): Extension<Arc<Comments>>,
    Path(task_id): Path<u64>,
) -> Result<Json<ListResponse<Comment>>> {
    Ok(Json(provider.list(ctx, task_id).await?))
}

async fn update(
    ctx: Context,
    Extension(provider): Extension<Arc<Comments>>,
    Path(comment_id): Path<u64>,
    Json(request): Json<UpdateCommentRequest>,
) -> Result<Json<Comment>> {
    Ok(Json(provider.update(ctx, comment_id, request).await?))
}

async fn delete(
    ctx: Context,
    Extension(provider): Extension<Arc<Comments>>,
    Path(comment_id): Path<u64>,
) -> Result<Json<Comment>> {
    Ok(Json(provider.delete(ctx, comment_id).await?))
}

fn require_any(actions: [CommentAction; 2]) -> RequirePermission {
    RequirePermission::any(actions.map(Permission::Comments))
}

pub fn attach_routes(router: Router) -> Router {
    router
        .route(
            "/tasks/:task_id/comments",
            routing::post(create)
                .route_layer(RequirePermission::new(Permission::Comments(CommentAction::Create))),
        )
        .route(
            "/tasks/:task_id/comments",
            routing::get(list)
                .route_layer(RequirePermission::new(Permission::Comments(CommentAction::Read))),
        )
        .route(
            "/comments/:comment_id",
            routing::put(update)
                .route_layer(require_any([CommentAction::Update, CommentAction::UpdateOwn])),
        )
        .route(
            "/comments/:comment_id",
            routing::delete(delete)
                .route_layer(require_any([CommentAction::Delete, CommentAction::DeleteOwn])),
        )
}
