//! Per-route permission enforcement.
//!
//! [`RequirePermission`] is attached to a route with `route_layer`. It resolves the caller's
//! [`Context`], evaluates the route's [`Requirement`] and either forwards the request with the
//! context stored in its extensions or answers `401`/`403` before the handler runs.

use std::task::Context as TaskContext;
use std::task::Poll;

use axum::extract::Request;
use axum::response::IntoResponse;
use axum::response::Response;
use axum_core::extract::FromRequestParts;
use common::rbac::Permission;
use common::rbac::Requirement;
use futures::future::BoxFuture;
use tower::Layer;
use tower::Service;

use crate::Context;

#[derive(Clone, Debug)]
pub struct RequirePermission {
    required: Requirement,
}

impl RequirePermission {
    pub fn new(required: impl Into<Requirement>) -> Self {
        Self {
            required: required.into(),
        }
    }

    pub fn any(permissions: impl IntoIterator<Item = Permission>) -> Self {
        Self::new(Requirement::any(permissions))
    }

    pub fn all(permissions: impl IntoIterator<Item = Permission>) -> Self {
        Self::new(Requirement::all(permissions))
    }

    pub fn required(&self) -> &Requirement {
        &self.required
    }
}

impl<S> Layer<S> for RequirePermission {
    type Service = RequirePermissionService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequirePermissionService {
            inner,
            required: self.required.clone(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct RequirePermissionService<S> {
    inner: S,
    required: Requirement,
}

impl<S> Service<Request> for RequirePermissionService<S>
where
    S: Service<Request, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, std::result::Result<Response, S::Error>>;

    fn poll_ready(&mut self, cx: &mut TaskContext<'_>) -> Poll<std::result::Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request) -> Self::Future {
        // the clone may not be ready, keep the one that was polled
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let required = self.required.clone();

        Box::pin(async move {
            let (mut parts, body) = req.into_parts();
            let ctx = match Context::from_request_parts(&mut parts, &()).await {
                Ok(ctx) => ctx,
                Err(err) => {
                    tracing::debug!(%required, "unauthenticated request rejected");
                    return Ok(err.into_response());
                }
            };

            if let Err(err) = ctx.check(&required) {
                return Ok(err.into_response());
            }

            parts.extensions.insert(ctx);
            inner.call(Request::from_parts(parts, body)).await
        })
    }
}
