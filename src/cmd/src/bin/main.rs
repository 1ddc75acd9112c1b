use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use clap::Subcommand;
use cmd::config::Config;
use cmd::error::Error;
use cmd::error::Result;
use cmd::server;
use common::rbac::PermissionMatrix;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Clone)]
pub struct Cfg {
    #[arg(long)]
    config: PathBuf,
}

#[derive(Subcommand, Clone)]
enum Commands {
    /// Run server
    Server(Cfg),
    /// Print the permission matrix as JSON
    Matrix,
}

#[derive(Parser)]
#[command(propagate_version = true)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    let Some(command) = args.command else {
        return Err(Error::BadRequest("no command specified".to_string()));
    };

    match command {
        Commands::Server(args) => {
            let cfg = Config::load(&args.config)
                .with_context(|| format!("can't load config {:?}", args.config))?;

            let subscriber = FmtSubscriber::builder()
                .with_max_level(cfg.log.level)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;

            let version = env!("CARGO_PKG_VERSION");
            info!("Taskboard v{version}");

            server::start(cfg.try_into()?).await?;
        }
        Commands::Matrix => {
            println!(
                "{}",
                serde_json::to_string_pretty(&PermissionMatrix::current())?
            );
        }
    }

    Ok(())
}
