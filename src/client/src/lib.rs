//! Client side of the permission model.
//!
//! Everything here is advisory: the guard decides what a UI shows or enables, the server
//! decides what actually happens.

pub mod client;
pub mod error;
pub mod guard;

pub use client::ApiClient;
pub use error::ClientError;
pub use error::Result;
pub use guard::PermissionGuard;
