mod track;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "lipulse-cli")]
#[command(about = "Register LinkedIn accounts and posts and harvest their analytics")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Register an owned account for tracking
    AddUser { username: String },
    /// Register a post under an already registered account
    AddPost {
        username: String,
        post_id: String,
        /// Publication time (RFC 3339); defaults to now
        #[arg(long)]
        created_at: Option<DateTime<Utc>>,
    },
    /// Run the refresh loop for an account in the foreground
    Analyze { username: String },
    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    Ping,
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("lipulse-cli: no command given; see --help");
        return Ok(());
    };

    let config = lipulse_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = lipulse_db::PoolConfig::from_app_config(&config);
    let pool = lipulse_db::connect_pool(&config.database_url, pool_config).await?;

    match command {
        Commands::AddUser { username } => track::add_user(&pool, &username).await,
        Commands::AddPost {
            username,
            post_id,
            created_at,
        } => {
            let created_at = created_at.unwrap_or_else(Utc::now);
            track::add_post(&pool, &username, &post_id, created_at).await
        }
        Commands::Analyze { username } => track::analyze(pool, &config, &username).await,
        Commands::Db { command } => match command {
            DbCommands::Ping => {
                lipulse_db::health_check(&pool).await?;
                println!("database reachable");
                Ok(())
            }
            DbCommands::Migrate => {
                let applied = lipulse_db::run_migrations(&pool).await?;
                println!("applied {applied} migration(s)");
                Ok(())
            }
        },
    }
}

#[cfg(test)]
mod tests;
