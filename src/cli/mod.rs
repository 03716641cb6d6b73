use clap::{Parser, Subcommand};

use crate::app::{app, AppState};
use crate::auth::{hash_password, verify_password, Role, TokenService};
use crate::config::AppConfig;

#[derive(Parser)]
#[command(name = "storefront-api")]
#[command(about = "Storefront REST API server and operator tools")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve {
        #[arg(long, help = "Apply the bundled schema before serving")]
        migrate: bool,
    },

    #[command(about = "Apply the bundled schema and exit")]
    Migrate,

    #[command(about = "Print the bcrypt hash of a password")]
    HashPassword { password: String },

    #[command(about = "Check a password against a bcrypt hash")]
    VerifyPassword { password: String, hash: String },

    #[command(about = "Sign an access token for a user id")]
    SignToken {
        #[arg(long)]
        sub: i64,
        #[arg(long, default_value = "customer")]
        role: Role,
    },

    #[command(about = "Decode and verify an access token")]
    VerifyToken { token: String },
}

pub async fn run(cli: Cli, config: AppConfig) -> anyhow::Result<()> {
    match cli.command.unwrap_or(Commands::Serve { migrate: false }) {
        Commands::Serve { migrate } => serve(config, migrate).await,
        Commands::Migrate => {
            let state = AppState::from_config(config)?;
            state.db.migrate().await?;
            state.db.close().await;
            Ok(())
        }
        Commands::HashPassword { password } => {
            println!("{}", hash_password(password, config.security.bcrypt_cost).await?);
            Ok(())
        }
        Commands::VerifyPassword { password, hash } => {
            let valid = verify_password(password, hash).await?;
            println!("{}", if valid { "valid" } else { "invalid" });
            if !valid {
                anyhow::bail!("password does not match");
            }
            Ok(())
        }
        Commands::SignToken { sub, role } => {
            println!("{}", TokenService::from_config(&config.security).sign(sub, role)?);
            Ok(())
        }
        Commands::VerifyToken { token } => {
            let claims = TokenService::from_config(&config.security).verify(&token)?;
            println!("{}", serde_json::to_string_pretty(&claims)?);
            Ok(())
        }
    }
}

async fn serve(config: AppConfig, migrate: bool) -> anyhow::Result<()> {
    let port = config.server.port;
    tracing::info!("Starting storefront API in {:?} mode", config.environment);

    let state = AppState::from_config(config)?;
    if migrate {
        state.db.migrate().await?;
    }

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Listening on http://{}", bind_addr);

    axum::serve(listener, app(state.clone()))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.db.close().await;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for ctrl-c: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => tracing::error!("Failed to listen for SIGTERM: {}", e),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}
