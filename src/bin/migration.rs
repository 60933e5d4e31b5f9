//! Schema management and admin bootstrap.
//!
//! ```text
//! migration up
//! migration down --steps 1
//! migration status
//! migration fresh
//! migration seed-admin --email owner@example.com --password '...'
//! ```

use std::sync::Arc;

use clap::{Parser, Subcommand};
use sea_orm_migration::MigratorTrait;
use tracing::info;

use caroption_catalog::{
    config, db,
    migrator::Migrator,
    notifications::LogMailer,
    services::users::Credentials,
    AppState,
};

#[derive(Debug, Parser)]
#[command(name = "migration", about = "Manage the catalog database schema")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Apply all pending migrations
    Up,
    /// Roll back the most recent migrations
    Down {
        #[arg(long, default_value_t = 1)]
        steps: u32,
    },
    /// Show applied and pending migrations
    Status,
    /// Drop every table and re-apply all migrations
    Fresh,
    /// Create an admin account
    SeedAdmin {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config()?;
    config::init_tracing(cfg.log_level(), cfg.log_json);

    let conn = db::establish_connection_from_app_config(&cfg).await?;

    match cli.command {
        Command::Up => {
            Migrator::up(&conn, None).await?;
            info!("migrations applied");
        }
        Command::Down { steps } => {
            Migrator::down(&conn, Some(steps)).await?;
            info!(steps, "migrations rolled back");
        }
        Command::Status => Migrator::status(&conn).await?,
        Command::Fresh => {
            Migrator::fresh(&conn).await?;
            info!("schema recreated");
        }
        Command::SeedAdmin { email, password } => {
            Migrator::up(&conn, None).await?;
            let state = AppState::new(Arc::new(conn), cfg, Arc::new(LogMailer));
            let admin = state
                .services
                .users
                .create_account(Credentials { email, password }, true)
                .await?;
            info!(user_id = %admin.id, email = %admin.email, "admin account created");
        }
    }

    Ok(())
}
