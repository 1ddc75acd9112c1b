use std::sync::Arc;

use axum::extract::Extension;
use axum::extract::Path;
use axum::http::StatusCode;
use axum::routing;
use axum::Router;
use common::http::Json;
use common::rbac::Permission;
use common::rbac::ProjectAction;

use crate::projects::CreateProjectRequest;
use crate::projects::Project;
use crate::projects::Projects;
use crate::projects::SetMembersRequest;
use crate::projects::UpdateProjectRequest;
use crate::Context;
use crate::ListResponse;
use crate::RequirePermission;
use crate::Result;

async fn create(
    ctx: Context,
    Extension(provider): Extension<Arc<Projects>>,
    Json(request): Json<CreateProjectRequest>,
) -> Result<(StatusCode, Json<Project>)> {
    Ok((
        StatusCode::CREATED,
        Json(provider.create(ctx, request).await?),
    ))
}

async fn get_by_id(
    ctx: Context,
    Extension(provider): Extension<Arc<Projects>>,
    Path(project_id): Path<u64>,
) -> Result<Json<Project>> {
    Ok(Json(provider.get_by_id(ctx, project_id).await?))
}

async fn list(
    ctx: Context,
    Extension(provider): Extension<Arc<Projects>>,
) -> Result<Json<ListResponse<Project>>> {
    Ok(Json(provider.list(ctx).await?))
}

async fn update(
    ctx: Context,
    Extension(provider): Extension<Arc<Projects>>,
    Path(project_id): Path<u64>,
    Json(request): Json<UpdateProjectRequest>,
) -> Result<Json<Project>> {
    Ok(Json(provider.update(ctx, project_id, request).await?))
}

async fn set_members(
    ctx: Context,
    Extension(provider): Extension<Arc<Projects>>,
    Path(project_id): Path<u64>,
    Json(request): Json<SetMembersRequest>,
) -> Result<Json<Project>> {
    Ok(Json(provider.set_members(ctx, project_id, request).await?))
}

async fn delete(
    ctx: Context,
    Extension(provider): Extension<Arc<Projects>>,
    Path(project_id): Path<u64>,
) -> Result<Json<Project>> {
    Ok(Json(provider.delete(ctx, project_id).await?))
}

fn require(action: ProjectAction) -> RequirePermission {
    RequirePermission::new(Permission::Projects(action))
}

pub fn attach_routes(router: Router) -> Router {
    router
        .route(
            "/projects",
            routing::post(create).route_layer(require(ProjectAction::Create)),
        )
        .route(
            "/projects",
            routing::get(list).route_layer(require(ProjectAction::Read)),
        )
        .route(
            "/projects/:project_id",
            routing::get(get_by_id).route_layer(require(ProjectAction::Read)),
        )
        .route(
            "/projects/:project_id",
            routing::put(update).route_layer(require(ProjectAction::Update)),
        )
        .route(
            "/projects/:project_id",
            routing::delete(delete).route_layer(require(ProjectAction::Delete)),
        )
        .route(
            "/projects/:project_id/members",
            routing::put(set_members).route_layer(require(ProjectAction::ManageMembers)),
        )
}
