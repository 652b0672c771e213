//! `blackbook` server binary.
//!
//! # Responsibility
//! - Load configuration, start logging and open the database.
//! - Serve the HTTP API, or provision users and print their API tokens.

mod config;

use anyhow::{anyhow, Context, Result};
use blackbook_api::{router, AppState};
use blackbook_core::service::user_service::UserService;
use blackbook_core::{init_console_logging, init_logging, open_db, NewUser};
use clap::{Parser, Subcommand};
use config::Config;
use log::info;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "blackbook")]
#[command(version, about = "Worldbuilding wiki server", long_about = None)]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "blackbook.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the HTTP API.
    Serve,
    /// Create a user and print its API token.
    CreateUser {
        #[arg(long)]
        display_name: String,
        #[arg(long)]
        email: String,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = Config::load(&args.config)?;
    start_logging(&config)?;

    match args.command {
        Command::Serve => serve(config),
        Command::CreateUser {
            display_name,
            email,
        } => create_user(&config, NewUser::new(display_name, email)),
    }
}

fn start_logging(config: &Config) -> Result<()> {
    let started = match &config.log_dir {
        Some(dir) => {
            let dir = dir
                .to_str()
                .ok_or_else(|| anyhow!("log_dir `{}` is not valid UTF-8", dir.display()))?;
            init_logging(&config.log_level, dir)
        }
        None => init_console_logging(&config.log_level),
    };
    started.map_err(|err| anyhow!("failed to initialize logging: {err}"))
}

fn create_user(config: &Config, user: NewUser) -> Result<()> {
    let conn = open_db(&config.database_path).context("failed to open database")?;
    let user = UserService::sqlite(&conn)
        .register(&user)
        .map_err(|err| anyhow!("failed to create user: {}", err.messages().join("; ")))?;
    println!("user_id={}", user.id);
    println!("api_token={}", user.api_token);
    Ok(())
}

#[tokio::main]
async fn serve(config: Config) -> Result<()> {
    let conn = open_db(&config.database_path).context("failed to open database")?;
    let app = router(AppState::new(conn));

    let listener = tokio::net::TcpListener::bind(&config.bind_address)
        .await
        .with_context(|| format!("failed to bind `{}`", config.bind_address))?;
    info!(
        "event=server_start module=cli status=ok bind_address={} database_path={}",
        config.bind_address,
        config.database_path.display()
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    info!("event=server_stop module=cli status=ok");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        log::error!("event=signal module=cli status=error detail={err}");
    }
}
