//! Rollcall CLI - Database migrations and user management.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! rollcall migrate
//!
//! # Create a user
//! rollcall user create -e officer@example.com -n "Jane Doe" -r officer
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `user create` - Create a user without going through the HTTP API

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "rollcall")]
#[command(author, version, about = "Rollcall CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage users
    User {
        #[command(subcommand)]
        action: UserAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a new user
    Create {
        /// User email address
        #[arg(short, long)]
        email: String,

        /// User display name
        #[arg(short, long)]
        name: String,

        /// User role (`admin`, `officer`); defaults to officer
        #[arg(short, long)]
        role: Option<String>,

        /// User password
        #[arg(short, long, env = "ROLLCALL_USER_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    // Load .env before parsing so env-backed arguments see it
    let _ = dotenvy::dotenv();

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
        Commands::Migrate => commands::migrate::run().await?,
        Commands::User { action } => match action {
            UserAction::Create {
                email,
                name,
                role,
                password,
            } => {
                let user = commands::user::create(email, name, role, password).await?;
                #[allow(clippy::print_stdout)]
                {
                    println!("{}", user.id);
                }
            }
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_user_create() {
        let cli = Cli::try_parse_from([
            "rollcall", "user", "create", "-e", "a@x.com", "-n", "A", "-r", "admin", "-p",
            "secret1",
        ])
        .unwrap_or_else(|e| panic!("{e}"));

        let Commands::User {
            action:
                UserAction::Create {
                    email,
                    role,
                    password,
                    ..
                },
        } = cli.command
        else {
            panic!("expected user create");
        };
        assert_eq!(email, "a@x.com");
        assert_eq!(role.as_deref(), Some("admin"));
        assert_eq!(password.as_deref(), Some("secret1"));
    }
}
