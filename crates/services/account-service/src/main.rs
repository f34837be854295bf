//! Account Service - administrative CLI for account provisioning.

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use account_service_lib::config::AccountServiceConfig;
use account_service_lib::service::AccountProvisioner;
use account_service_lib::MigrateAction;
use common::AppResult;
use domain::AccountSummary;

#[derive(Parser)]
#[command(name = "account-service")]
#[command(about = "Account provisioning and administration")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Database migration commands
    Migrate {
        #[command(subcommand)]
        action: MigrateCommands,
    },
    /// Create a regular account
    CreateAccount {
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long)]
        name: String,
        /// Omit to create the account without a usable password
        #[arg(long)]
        password: Option<String>,
    },
    /// Create an account with staff and superuser rights
    CreateSuperuser {
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long)]
        name: String,
        #[arg(long, env = "ACCOUNT_SUPERUSER_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Grant staff and superuser rights to an existing account
    GrantSuperuser {
        #[arg(long)]
        email: String,
    },
    /// Replace an account's password
    ChangePassword {
        #[arg(long)]
        email: String,
        /// Omit to make the password unusable
        #[arg(long)]
        password: Option<String>,
    },
    /// Delete an account
    Delete {
        #[arg(long)]
        email: String,
    },
    /// List accounts
    List {
        /// Print JSON summaries instead of identities
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum MigrateCommands {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Reset database and run all migrations
    Fresh,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();
    let config = AccountServiceConfig::from_env();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_level.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let command = match cli.command {
        Commands::Migrate { action } => {
            let migrate_action = match action {
                MigrateCommands::Up => MigrateAction::Up,
                MigrateCommands::Down => MigrateAction::Down,
                MigrateCommands::Status => MigrateAction::Status,
                MigrateCommands::Fresh => MigrateAction::Fresh,
            };
            return account_service_lib::run_migrations(&config, migrate_action).await;
        }
        command => command,
    };

    let provisioner = account_service_lib::connect_provisioner(&config).await?;

    if let Err(err) = run(&provisioner, command).await {
        eprintln!("error[{}]: {}", err.code(), err.user_message());
        std::process::exit(1);
    }

    Ok(())
}

async fn run(provisioner: &AccountProvisioner, command: Commands) -> AppResult<()> {
    match command {
        Commands::CreateAccount {
            email,
            name,
            password,
        } => {
            let account = provisioner
                .create_account(&email, &name, password.as_deref())
                .await?;
            println!("Created account {}", account);
        }
        Commands::CreateSuperuser {
            email,
            name,
            password,
        } => {
            let account = provisioner.create_superuser(&email, &name, &password).await?;
            println!("Created superuser {}", account);
        }
        Commands::GrantSuperuser { email } => {
            let account = provisioner.grant_superuser(&email).await?;
            println!("{} is now a superuser", account);
        }
        Commands::ChangePassword { email, password } => {
            let account = provisioner
                .change_secret(&email, password.as_deref())
                .await?;
            println!("Password changed for {}", account);
        }
        Commands::Delete { email } => {
            provisioner.delete_account(&email).await?;
            println!("Deleted account {}", email);
        }
        Commands::List { json } => {
            let accounts = provisioner.list_accounts().await?;
            if json {
                let summaries: Vec<AccountSummary> =
                    accounts.iter().map(AccountSummary::from).collect();
                let out = serde_json::to_string_pretty(&summaries)
                    .map_err(|e| common::AppError::internal(e.to_string()))?;
                println!("{}", out);
            } else {
                for account in &accounts {
                    println!("{}", account);
                }
            }
        }
        Commands::Migrate { .. } => {}
    }

    Ok(())
}
