use std::sync::Arc;

use metadata::MetadataProvider;

use crate::accounts::Accounts;
use crate::analytics::Analytics;
use crate::auth;
use crate::comments::Comments;
use crate::permissions::Permissions;
use crate::projects::Projects;
use crate::tasks::Tasks;

pub struct PlatformProvider {
    pub accounts: Arc<Accounts>,
    pub projects: Arc<Projects>,
    pub tasks: Arc<Tasks>,
    pub comments: Arc<Comments>,
    pub analytics: Arc<Analytics>,
    pub permissions: Arc<Permissions>,
    pub auth: auth::Config,
}

impl PlatformProvider {
    pub fn new(md: Arc<MetadataProvider>, auth: auth::Config) -> Self {
        Self {
            accounts: Arc::new(Accounts::new(md.accounts.clone())),
            projects: Arc::new(Projects::new(md.clone())),
            tasks: Arc::new(Tasks::new(md.clone())),
            comments: Arc::new(Comments::new(md.clone())),
            analytics: Arc::new(Analytics::new(md)),
            permissions: Arc::new(Permissions::new()),
            auth,
        }
    }
}
