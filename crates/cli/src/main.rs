//! Under the Hoodies CLI - Catalog seeding and role management.
//!
//! # Usage
//!
//! ```bash
//! # Seed the catalog with demo products
//! hoodies-cli seed
//!
//! # Grant the admin role to a profile
//! hoodies-cli role grant -e admin@example.com
//!
//! # Revoke the admin role
//! hoodies-cli role revoke -e admin@example.com
//! ```
//!
//! All commands talk to the hosted backend configured through the same
//! environment variables as the storefront binary.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "hoodies-cli")]
#[command(author, version, about = "Under the Hoodies CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Seed the catalog with demo products
    Seed,
    /// Manage profile roles
    Role {
        #[command(subcommand)]
        action: RoleAction,
    },
}

#[derive(Subcommand)]
enum RoleAction {
    /// Grant the admin role to a profile
    Grant {
        /// Profile email address
        #[arg(short, long)]
        email: String,
    },
    /// Revoke the admin role from a profile
    Revoke {
        /// Profile email address
        #[arg(short, long)]
        email: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Seed => commands::seed::run().await?,
        Commands::Role { action } => match action {
            RoleAction::Grant { email } => commands::role::grant(&email).await?,
            RoleAction::Revoke { email } => commands::role::revoke(&email).await?,
        },
    }
    Ok(())
}
