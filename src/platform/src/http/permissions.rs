use std::sync::Arc;

use axum::extract::Extension;
use axum::routing;
use axum::Router;
use common::http::Json;
use common::rbac::PermissionMatrix;

use crate::permissions::CheckRequest;
use crate::permissions::CheckResponse;
use crate::permissions::Me;
use crate::permissions::Permissions;
use crate::Context;
use crate::Result;

async fn matrix(Extension(provider): Extension<Arc<Permissions>>) -> Json<PermissionMatrix> {
    Json(provider.matrix())
}

async fn me(ctx: Context, Extension(provider): Extension<Arc<Permissions>>) -> Result<Json<Me>> {
    Ok(Json(provider.me(ctx).await?))
}

async fn check(
    ctx: Context,
    Extension(provider): Extension<Arc<Permissions>>,
    Json(request): Json<CheckRequest>,
) -> Result<Json<CheckResponse>> {
    Ok(Json(provider.check(ctx, request).await?))
}

pub fn attach_routes(router: Router) -> Router {
    router
        .route("/permissions", routing::get(matrix))
        .route("/permissions/me", routing::get(me))
        .route("/permissions/check", routing::post(check))
}
