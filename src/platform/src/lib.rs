pub mod accounts;
pub mod analytics;
pub mod auth;
pub mod comments;
pub mod context;
pub mod error;
pub mod http;
pub mod permissions;
pub mod projects;
pub mod provider;
pub mod rbac;
pub mod tasks;
pub mod types;

pub use context::Context;
pub use error::PlatformError;
pub use error::Result;
pub use provider::PlatformProvider;
pub use rbac::RequirePermission;
pub use types::ListResponse;
