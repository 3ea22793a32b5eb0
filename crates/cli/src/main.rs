use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use posters_app::StoreBackend;
use posters_auth::{mint_token, parse_duration, JwtConfig};
use posters_kernel::settings::Settings;

/// Movie poster catalogue tooling
#[derive(Debug, Parser)]
#[command(name = "posters", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Drop `posters_db.posters` and reload the fixed poster list
    Seed,
    /// Serve the poster API
    Serve {
        /// Serve from an in-memory store pre-loaded with the seed posters
        #[arg(long)]
        memory: bool,
    },
    /// Print a signed development token
    Token {
        /// Value of the `sub` claim
        #[arg(long, default_value = "dev")]
        subject: String,
        /// Lifetime such as `30m` or `12h`; omit to rely on the server's expiration
        #[arg(long, value_parser = parse_ttl)]
        ttl: Option<Duration>,
    },
}

fn parse_ttl(raw: &str) -> Result<Duration, String> {
    parse_duration(raw).map_err(|err| err.to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load().with_context(|| "failed to load posters settings")?;
    posters_telemetry::init(&settings.telemetry);

    match cli.command {
        Command::Seed => {
            tracing::info!(
                uri = %posters_db::redact_uri(&settings.database.uri),
                "seeding posters"
            );
            posters_db::run_seeder(&settings.database.uri).await?;
        }
        Command::Serve { memory } => {
            let backend = if memory {
                StoreBackend::Memory
            } else {
                StoreBackend::Mongo
            };
            posters_app::serve(&settings, backend).await?;
        }
        Command::Token { subject, ttl } => {
            let config = JwtConfig::from_settings(&settings.auth).context("invalid auth settings")?;
            let token = mint_token(&config, &subject, ttl)?;
            println!("{token}");
        }
    }

    Ok(())
}
