use std::sync::Arc;

use axum::Router;
use common::config::Config;
use common::rbac::Role;
use metadata::accounts::Account;
use metadata::accounts::CreateAccountRequest;
use metadata::error::MetadataError;
use metadata::MetadataProvider;
use platform::auth;
use platform::http::attach_routes;
use platform::PlatformProvider;
use tokio::net::TcpListener;
use tokio::select;
use tokio::signal::unix::signal;
use tokio::signal::unix::SignalKind;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::error::Result;
use crate::init_metrics;

/// Returns the bootstrap admin, creating it on an empty store.
fn init_admin(md: &MetadataProvider, email: &str) -> Result<Account> {
    match md.accounts.get_by_email(email) {
        Ok(acc) => {
            if acc.role != Role::Admin {
                warn!("bootstrap account {email} is not an admin");
            }
            Ok(acc)
        }
        Err(MetadataError::NotFound(_)) => {
            info!("creating admin account...");
            Ok(md.accounts.create(CreateAccountRequest {
                created_by: None,
                email: email.to_string(),
                name: Some("admin".to_string()),
                role: Role::Admin,
            })?)
        }
        Err(err) => Err(err.into()),
    }
}

pub async fn start(cfg: Config) -> Result<()> {
    info!("metrics initialization...");
    init_metrics()?;

    let md = Arc::new(MetadataProvider::new());
    let admin = init_admin(&md, &cfg.bootstrap.admin_email)?;

    info!("initializing platform...");
    let platform = Arc::new(PlatformProvider::new(
        md.clone(),
        auth::Config::from(&cfg.auth),
    ));
    let token = platform.auth.make_access_token(admin.id)?;
    let router = attach_routes(Router::new(), &md, &platform);

    let mut sig_int = signal(SignalKind::interrupt())?;
    let mut sig_term = signal(SignalKind::terminate())?;
    let shutdown = async move {
        select! {
            _=sig_int.recv()=>info!("SIGINT received"),
            _=sig_term.recv()=>info!("SIGTERM received"),
        }
    };

    debug!("access token duration: {}", cfg.auth.access_token_duration);
    info!("listening on http://{}", cfg.server.host);
    info!("admin: {}, access token: {token}", admin.email);

    Ok(axum::serve(TcpListener::bind(&cfg.server.host).await?, router)
        .with_graceful_shutdown(shutdown)
        .await?)
}
