use std::sync::Arc;

use axum::extract::Extension;
use axum::routing;
use axum::Router;
use common::http::Json;
use common::rbac::AnalyticsAction;
use common::rbac::Permission;

use crate::analytics::Analytics;
use crate::analytics::Summary;
use crate::Context;
use crate::RequirePermission;
use crate::Result;

async fn summary(
    ctx: Context,
    Extension(provider): Extension<Arc<Analytics>>,
) -> Result<Json<Summary>> {
    Ok(Json(provider.summary(ctx).await?))
}

pub fn attach_routes(router: Router) -> Router {
    router.route(
        "/analytics/summary",
        routing::get(summary).route_layer(RequirePermission::any(
            AnalyticsAction::ALL.iter().map(|a| Permission::Analytics(*a)),
        )),
    )
}
