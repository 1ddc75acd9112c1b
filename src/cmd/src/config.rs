use std::net::SocketAddr;
use std::path::Path;

use clap::ValueEnum;
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing::Level;

use crate::error::Error;

#[derive(Debug, Deserialize, PartialEq, Eq)]
pub struct Server {
    pub host: SocketAddr,
}

#[derive(Debug, Deserialize, PartialEq, Eq)]
pub struct Auth {
    pub access_token_key: String,
    pub access_token_duration: String,
}

#[derive(Debug, Deserialize, PartialEq, Eq)]
pub struct Bootstrap {
    pub admin_email: String,
}

#[derive(Debug, Deserialize, PartialEq, Eq)]
pub struct Log {
    pub level: LogLevel,
}

#[derive(Debug, Deserialize, PartialEq, Eq)]
pub struct Config {
    pub server: Server,
    pub auth: Auth,
    pub bootstrap: Bootstrap,
    pub log: Log,
}

impl Config {
    pub fn load(path: &Path) -> std::result::Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::from(path))
            .build()?
            .try_deserialize()
    }
}

fn parse_duration(s: &str) -> crate::error::Result<chrono::Duration> {
    Ok(chrono::Duration::from_std(parse_duration::parse(s)?)?)
}

impl TryInto<common::config::Config> for Config {
    type Error = Error;

    fn try_into(self) -> Result<common::config::Config, Self::Error> {
        if self.auth.access_token_key.is_empty() {
            return Err(Error::BadRequest(
                "auth.access_token_key must not be empty".to_string(),
            ));
        }

        Ok(common::config::Config {
            server: common::config::Server {
                host: self.server.host,
            },
            auth: common::config::Auth {
                access_token_key: self.auth.access_token_key,
                access_token_duration: parse_duration(self.auth.access_token_duration.as_str())?,
            },
            bootstrap: common::config::Bootstrap {
                admin_email: self.bootstrap.admin_email,
            },
            log: common::config::Log {
                level: self.log.level.into(),
            },
        })
    }
}

#[derive(Deserialize, Copy, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum LogLevel {
    #[serde(rename = "trace")]
    Trace,
    #[serde(rename = "debug")]
    Debug,
    #[serde(rename = "info")]
    Info,
    #[serde(rename = "warn")]
    Warn,
    #[serde(rename = "error")]
    Error,
}

impl From<LogLevel> for LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
        .into()
    }
}
