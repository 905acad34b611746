use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod display;
mod search;

#[derive(Debug, Parser)]
#[command(name = "welp")]
#[command(about = "Find restaurants that fit a per-person budget")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, clap::Args)]
struct Credentials {
    /// Account email; searches are saved to its history
    #[arg(long)]
    email: Option<String>,
    /// Account password
    #[arg(long, env = "WELP_PASSWORD", hide_env_values = true)]
    password: Option<String>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search for restaurants near a city and zip code
    Search {
        /// Budget per person in dollars (e.g. 15 or $12.50)
        #[arg(long)]
        budget: String,
        /// City name
        #[arg(long)]
        city: String,
        /// 5-digit zip code
        #[arg(long)]
        zip: String,
        #[command(flatten)]
        credentials: Credentials,
        /// Open the info popup for result N (1-based)
        #[arg(long)]
        select: Option<usize>,
    },
    /// List recent searches, optionally running one again
    History {
        #[command(flatten)]
        credentials: Credentials,
        /// Replay recent search N (1-based)
        #[arg(long)]
        replay: Option<usize>,
    },
    /// Sign in, creating the account if it does not exist
    Login {
        #[command(flatten)]
        credentials: Credentials,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // `.env` goes first so clap's `env` fallbacks (WELP_PASSWORD) can see it.
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = welp_core::load_app_config_from_env()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(env = %config.env, data_dir = %config.data_dir.display(), "configuration loaded");

    match cli.command {
        Commands::Search {
            budget,
            city,
            zip,
            credentials,
            select,
        } => {
            search::run_search(
                &config,
                &search::SearchArgs {
                    budget: &budget,
                    city: &city,
                    zip: &zip,
                    email: credentials.email.as_deref(),
                    password: credentials.password.as_deref(),
                    select,
                },
            )
            .await?;
        }
        Commands::History {
            credentials,
            replay,
        } => {
            let (email, password) = require_credentials(&credentials)?;
            search::run_history(&config, email, password, replay).await?;
        }
        Commands::Login { credentials } => {
            let (email, password) = require_credentials(&credentials)?;
            search::run_login(&config, email, password).await?;
        }
    }

    Ok(())
}

fn require_credentials(credentials: &Credentials) -> anyhow::Result<(&str, &str)> {
    match (credentials.email.as_deref(), credentials.password.as_deref()) {
        (Some(email), Some(password)) => Ok((email, password)),
        _ => anyhow::bail!("both --email and --password are required"),
    }
}

#[cfg(test)]
mod tests;
