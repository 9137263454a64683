//! Bazaar CLI - account commands against the remote API.
//!
//! # Usage
//!
//! ```bash
//! # Log in (password may also come from BAZAAR_PASSWORD)
//! bazaar login -e ada@example.com -p 'correct horse'
//!
//! # Show the stored session
//! bazaar whoami
//!
//! # Update profile fields; blank or omitted fields are left alone
//! bazaar profile --name "Ada L." --city London
//!
//! # Log out and remove the stored session
//! bazaar logout
//! ```
//!
//! The session is kept in `<config dir>/bazaar/session.json` unless
//! `--session-file` is given. The API root comes from `API_BASE_URL`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use bazaar_core::Email;
use clap::{Parser, Subcommand};
use secrecy::SecretString;

mod commands;
mod file_store;

use commands::CliError;
use file_store::FileSessionStore;

#[derive(Parser)]
#[command(name = "bazaar")]
#[command(author, version, about = "Bazaar account tools")]
struct Cli {
    /// Session file (defaults to the user config directory)
    #[arg(long, global = true, env = "BAZAAR_SESSION_FILE")]
    session_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and store the session
    Login {
        /// Account email address
        #[arg(short, long, value_parser = Email::parse_trimmed)]
        email: Email,

        /// Account password
        #[arg(short, long, env = "BAZAAR_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Log out and remove the stored session
    Logout,
    /// Show who is logged in
    Whoami,
    /// Update profile fields
    Profile(commands::profile::ProfileArgs),
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let store = match cli.session_file {
        Some(path) => FileSessionStore::new(path),
        None => FileSessionStore::default_location()?,
    };
    let api = commands::api_client()?;

    match cli.command {
        Commands::Login { email, password } => {
            let password = SecretString::from(password);
            commands::auth::login(&api, &store, email, &password).await?;
            tracing::info!("Session stored in {}", store.path().display());
        }
        Commands::Logout => commands::auth::logout(&api, &store).await?,
        Commands::Whoami => commands::auth::whoami(&store).await?,
        Commands::Profile(args) => commands::profile::update(&api, &store, args).await?,
    }
    Ok(())
}
