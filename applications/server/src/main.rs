/// Roster Server - user directory REST backend
use clap::{Parser, Subcommand};
use roster_core::UserRepository;
use roster_server::{create_router, AppState, AvatarStorage, ServerConfig};
use roster_storage::{seed, SqliteUserRepository};
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "roster-server")]
#[command(about = "User directory REST server", long_about = None)]
struct Cli {
    /// Configuration file path (defaults to ./roster.toml when present)
    #[arg(short, long, global = true, env = "ROSTER_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Insert sample users if the directory is empty
    Seed,
    /// Delete all users
    Clear,
    /// Delete all users, then insert the sample users
    Reset,
    /// List all users
    ListUsers,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "roster_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    // Load configuration
    let config = ServerConfig::load(cli.config.as_deref())?;
    config.validate()?;

    match cli.command {
        Commands::Serve => serve(config).await?,
        Commands::Seed => {
            let repo = open_repository(&config).await?;
            let report = seed::seed_if_empty(&repo).await?;
            if report.skipped() {
                println!("Database already has {} users, skipping seed", report.existing);
            } else {
                println!(
                    "Seeded {} users ({} failed)",
                    report.created, report.failed
                );
            }
        }
        Commands::Clear => {
            let repo = open_repository(&config).await?;
            let removed = repo.clear().await?;
            println!("Removed {removed} users");
        }
        Commands::Reset => {
            let repo = open_repository(&config).await?;
            let report = seed::reset(&repo).await?;
            println!(
                "Database reset: {} users created ({} failed)",
                report.created, report.failed
            );
        }
        Commands::ListUsers => {
            let repo = open_repository(&config).await?;
            list_users(&repo).await?;
        }
    }

    Ok(())
}

async fn open_repository(config: &ServerConfig) -> anyhow::Result<SqliteUserRepository> {
    ensure_database_dir(&config.storage.database_url).await?;
    let repo = SqliteUserRepository::connect(&config.storage.database_url).await?;
    Ok(repo)
}

/// Create the parent directory of a file-backed database
async fn ensure_database_dir(database_url: &str) -> anyhow::Result<()> {
    if database_url.contains(":memory:") {
        return Ok(());
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:");
    let path = path.split('?').next().unwrap_or(path);

    if let Some(parent) = std::path::Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    Ok(())
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    tracing::info!("Starting Roster Server");
    tracing::info!("Host: {}", config.server.host);
    tracing::info!("Port: {}", config.server.port);
    tracing::info!("Environment: {}", config.server.environment);

    // Initialize database
    let repo = open_repository(&config).await?;
    let users: Arc<dyn UserRepository> = Arc::new(repo);
    tracing::info!("Database connected");

    // Initialize avatar storage
    let avatars = AvatarStorage::new(config.storage.upload_dir.clone());
    avatars.initialize().await?;
    tracing::info!("Avatar storage initialized at {}", avatars.base_path().display());

    // Build application state
    let app_state = AppState::new(users, Arc::new(avatars), config.server.environment);

    // Build router
    let app = create_router(app_state, &config.cors.allowed_origins);

    // Create server address
    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    tracing::info!("Server listening on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn list_users(repo: &SqliteUserRepository) -> anyhow::Result<()> {
    let users = repo.find_all().await?;

    println!("Users:");
    for user in users {
        println!("  {} - {} <{}>", user.id, user.full_name(), user.email);
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
