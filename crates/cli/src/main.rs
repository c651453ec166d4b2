//! Clearpath CLI - session store management for the portal.
//!
//! # Usage
//!
//! ```bash
//! # Create the portal session schema and table
//! cp-cli migrate sessions
//!
//! # Delete expired sessions once
//! cp-cli sessions purge
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "cp-cli")]
#[command(author, version, about = "Clearpath portal CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate {
        #[command(subcommand)]
        target: MigrateTarget,
    },
    /// Maintain stored sessions
    Sessions {
        #[command(subcommand)]
        action: SessionAction,
    },
}

#[derive(Subcommand)]
enum MigrateTarget {
    /// Create the `portal.session` table used by the session store
    Sessions,
}

#[derive(Subcommand)]
enum SessionAction {
    /// Delete sessions whose expiry has passed
    Purge,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    match cli.command {
        Commands::Migrate { target } => match target {
            MigrateTarget::Sessions => commands::migrate::sessions().await?,
        },
        Commands::Sessions { action } => match action {
            SessionAction::Purge => commands::sessions::purge().await?,
        },
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_migrate_sessions() {
        let cli = Cli::try_parse_from(["cp-cli", "migrate", "sessions"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Migrate {
                target: MigrateTarget::Sessions
            }
        ));
    }

    #[test]
    fn test_rejects_unknown_target() {
        assert!(Cli::try_parse_from(["cp-cli", "migrate", "courses"]).is_err());
    }
}
