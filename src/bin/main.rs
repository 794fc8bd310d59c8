use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{Level, info};
use tracing_subscriber::EnvFilter;

use marque::{DatabaseConfig, create_connection, create_router, ensure_schema};

#[derive(Parser)]
#[command(name = "marque")]
#[command(about = "Bearer-token bookmarking service")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server
    Serve {
        /// Bind address for the public API
        #[arg(long, default_value = "0.0.0.0:8080", env = "MARQUE_BIND")]
        bind: String,
        #[arg(long, default_value = "memory", env = "MARQUE_DATABASE_URL")]
        db_url: String,
    },
    /// Initialize the database schema and exit
    Init {
        #[arg(long, default_value = "memory", env = "MARQUE_DATABASE_URL")]
        db_url: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("marque=info".parse()?))
        .with_max_level(Level::INFO)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { bind, db_url } => {
            let db_config = DatabaseConfig {
                url: db_url,
                ..Default::default()
            };
            info!("Using database url: {}", db_config.url);

            let db = create_connection(db_config).await?;
            ensure_schema(&db).await?;

            let app = create_router(db);
            let listener = tokio::net::TcpListener::bind(&bind).await?;
            info!("Listening on http://{}", bind);

            axum::serve(listener, app).await?;
        }
        Commands::Init { db_url } => {
            let db_config = DatabaseConfig {
                url: db_url,
                ..Default::default()
            };
            info!("Using database url for initialization: {}", db_config.url);

            info!("Initializing database...");
            let db = create_connection(db_config).await?;
            ensure_schema(&db).await?;
            info!("Database initialized successfully");
        }
    }

    Ok(())
}
