pub mod accounts;
pub mod comments;
pub mod error;
pub mod metadata;
pub mod projects;
pub mod store;
pub mod tasks;

pub use error::Result;

pub use crate::metadata::MetadataProvider;
