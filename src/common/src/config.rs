use std::net::SocketAddr;

use chrono::Duration;
use tracing::level_filters::LevelFilter;

#[derive(Debug, Clone)]
pub struct Server {
    pub host: SocketAddr,
}

#[derive(Debug, Clone)]
pub struct Auth {
    pub access_token_key: String,
    pub access_token_duration: Duration,
}

#[derive(Debug, Clone)]
pub struct Bootstrap {
    pub admin_email: String,
}

#[derive(Debug, Clone)]
pub struct Log {
    pub level: LevelFilter,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server: Server,
    pub auth: Auth,
    pub bootstrap: Bootstrap,
    pub log: Log,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: Server {
                host: SocketAddr::from(([0, 0, 0, 0], 8080)),
            },
            auth: Auth {
                access_token_key: Default::default(),
                access_token_duration: Duration::days(1),
            },
            bootstrap: Bootstrap {
                admin_email: "admin@taskboard.io".to_string(),
            },
            log: Log {
                level: LevelFilter::INFO,
            },
        }
    }
}
