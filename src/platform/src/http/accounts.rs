use std::sync::Arc;

use axum::extract::Extension;
use axum::extract::Path;
use axum::http::StatusCode;
use axum::routing;
use axum::Router;
use common::http::Json;
use common::rbac::Permission;
use common::rbac::UserAction;

use crate::accounts::Account;
use crate::accounts::Accounts;
use crate::accounts::ChangeRoleRequest;
use crate::accounts::CreateAccountRequest;
use crate::accounts::UpdateAccountRequest;
use crate::Context;
use crate::ListResponse;
use crate::RequirePermission;
use crate::Result;

async fn create(
    ctx: Context,
    Extension(provider): Extension<Arc<Accounts>>,
    Json(req): Json<CreateAccountRequest>,
) -> Result<(StatusCode, Json<Account>)> {
    Ok((StatusCode::CREATED, Json(provider.create(ctx, req).await?)))
}

async fn get_by_id(
    ctx: Context,
    Extension(provider): Extension<Arc<Accounts>>,
    Path(id): Path<u64>,
) -> Result<Json<Account>> {
    Ok(Json(provider.get_by_id(ctx, id).await?))
}

async fn list(
    ctx: Context,
    Extension(provider): Extension<Arc<Accounts>>,
) -> Result<Json<ListResponse<Account>>> {
    Ok(Json(provider.list(ctx).await?))
}

async fn update(
    ctx: Context,
    Extension(provider): Extension<Arc<Accounts>>,
    Path(id): Path<u64>,
    Json(request): Json<UpdateAccountRequest>,
) -> Result<Json<Account>> {
    Ok(Json(provider.update(ctx, id, request).await?))
}

async fn change_role(
    ctx: Context,
    Extension(provider): Extension<Arc<Accounts>>,
    Path(id): Path<u64>,
    Json(request): Json<ChangeRoleRequest>,
) -> Result<Json<Account>> {
    Ok(Json(provider.change_role(ctx, id, request).await?))
}

async fn delete(
    ctx: Context,
    Extension(provider): Extension<Arc<Accounts>>,
    Path(id): Path<u64>,
) -> Result<Json<Account>> {
    Ok(Json(provider.delete(ctx, id).await?))
}

fn require(action: UserAction) -> RequirePermission {
    RequirePermission::new(Permission::Users(action))
}

pub fn attach_routes(router: Router) -> Router {
    router
        .route(
            "/users",
            routing::post(create).route_layer(require(UserAction::Create)),
        )
        .route(
            "/users",
            routing::get(list).route_layer(require(UserAction::Read)),
        )
        .route(
            "/users/:id",
            routing::get(get_by_id).route_layer(require(UserAction::Read)),
        )
        .route(
            "/users/:id",
            routing::put(update).route_layer(require(UserAction::Update)),
        )
        .route(
            "/users/:id",
            routing::delete(delete).route_layer(require(UserAction::Delete)),
        )
        .route(
            "/users/:id/role",
            routing::put(change_role).route_layer(require(UserAction::ChangeRole)),
        )
}
