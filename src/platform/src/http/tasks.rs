use std::sync::Arc;

use axum::extract::Extension;
use axum::extract::Path;
use axum::http::StatusCode;
use axum::routing;
use axum::Router;
use common::http::Json;
use common::rbac::Permission;
use common::rbac::TaskAction;
use metadata::tasks::Progress;

use crate::tasks::AssignRequest;
use crate::tasks::CreateTaskRequest;
use crate::tasks::Task;
use crate::tasks::Tasks;
use crate::tasks::UpdateStatusRequest;
use crate::tasks::UpdateTaskRequest;
use crate::Context;
use crate::ListResponse;
use crate::RequirePermission;
use crate::Result;

async fn create(
    ctx: Context,
    Extension(provider): Extension<Arc<Tasks>>,
    Path(project_id): Path<u64>,
    Json(request): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<Task>)> {
    Ok((
        StatusCode::CREATED,
        Json(provider.create(ctx, project_id, request).await?),
    ))
}

async fn list(
    ctx: Context,
    Extension(provider): Extension<Arc<Tasks>>,
    Path(project_id): Path<u64>,
) -> Result<Json<ListResponse<Task>>> {
    Ok(Json(provider.list(ctx, project_id).await?))
}

async fn get_by_id(
    ctx: Context,
    Extension(provider): Extension<Arc<Tasks>>,
    Path(task_id): Path<u64>,
) -> Result<Json<Task>> {
    Ok(Json(provider.get_by_id(ctx, task_id).await?))
}

async fn subtasks(
    ctx: Context,
    Extension(provider): Extension<Arc<Tasks>>,
    Path(task_id): Path<u64>,
) -> Result<Json<ListResponse<Task>>> {
    Ok(Json(provider.subtasks(ctx, task_id).await?))
}

async fn progress(
    ctx: Context,
    Extension(provider): Extension<Arc<Tasks>>,
    Path(task_id): Path<u64>,
) -> Result<Json<Progress>> {
    Ok(Json(provider.progress(ctx, task_id).await?))
}

async fn update(
    ctx: Context,
    Extension(provider): Extension<Arc<Tasks>>,
    Path(task_id): Path<u64>,
    Json(request): Json<UpdateTaskRequest>,
) -> Result<Json<Task>> {
    Ok(Json(provider.update(ctx, task_id, request).await?))
}

async fn update_status(
    ctx: Context,
    Extension(provider): Extension<Arc<Tasks>>,
    Path(task_id): Path<u64>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<Task>> {
    Ok(Json(provider.update_status(ctx, task_id, request).await?))
}

async fn assign(
    ctx: Context,
    Extension(provider): Extension<Arc<Tasks>>,
    Path(task_id): Path<u64>,
    Json(request): Json<AssignRequest>,
) -> Result<Json<Task>> {
    Ok(Json(provider.assign(ctx, task_id, request).await?))
}

async fn delete(
    ctx: Context,
    Extension(provider): Extension<Arc<Tasks>>,
    Path(task_id): Path<u64>,
) -> Result<Json<Task>> {
    Ok(Json(provider.delete(ctx, task_id).await?))
}

fn require(action: TaskAction) -> RequirePermission {
    RequirePermission::new(Permission::Tasks(action))
}

pub fn attach_routes(router: Router) -> Router {
    router
        .route(
            "/projects/:project_id/tasks",
            routing::post(create).route_layer(require(TaskAction::Create)),
        )
        .route(
            "/projects/:project_id/tasks",
            routing::get(list).route_layer(require(TaskAction::Read)),
        )
        .route(
            "/tasks/:task_id",
            routing::get(get_by_id).route_layer(require(TaskAction::Read)),
        )
        .route(
            "/tasks/:task_id",
            routing::put(update).route_layer(require(TaskAction::Update)),
        )
        .route(
            "/tasks/:task_id",
            routing::delete(delete).route_layer(require(TaskAction::Delete)),
        )
        .route(
            "/tasks/:task_id/subtasks",
            routing::get(subtasks).route_layer(require(TaskAction::Read)),
        )
        .route(
            "/tasks/:task_id/progress",
            routing::get(progress).route_layer(require(TaskAction::Read)),
        )
        .route(
            "/tasks/:task_id/status",
            routing::put(update_status).route_layer(RequirePermission::any([
                Permission::Tasks(TaskAction::Update),
                Permission::Tasks(TaskAction::UpdateStatus),
            ])),
        )
        .route(
            "/tasks/:task_id/assignee",
            routing::put(assign).route_layer(require(TaskAction::Assign)),
        )
}
