use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use taskhub::config::AppConfig;
use taskhub::database::connection::{ensure_schema, establish_connection};
use taskhub::database::seed_data::create_host_administrator;
use taskhub::services::UserManager;

#[derive(Parser)]
#[clap(author, version, about)]
struct Cli {
    #[clap(short, long, global = true)]
    log_level: Option<String>,
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the GraphQL schema definition
    #[cfg(feature = "graphql")]
    Schema,
    /// Create any missing tables
    InitDb {
        #[clap(short, long)]
        database: Option<String>,
    },
    /// Seed a host administrator
    CreateAdmin {
        #[clap(short, long)]
        database: Option<String>,
        #[clap(short, long)]
        user_name: String,
        #[clap(short, long)]
        password: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(&cli.log_level);

    match cli.command {
        #[cfg(feature = "graphql")]
        Command::Schema => {
            println!("{}", taskhub::graphql::schema::sdl());
        }
        Command::InitDb { database } => {
            let config = AppConfig::from_env()?.with_database_path(database.as_deref());
            let db = establish_connection(&config.database_url).await?;
            ensure_schema(&db).await?;
            info!("Database schema ready at {}", config.database_url);
        }
        Command::CreateAdmin {
            database,
            user_name,
            password,
        } => {
            let config = AppConfig::from_env()?.with_database_path(database.as_deref());
            let db = establish_connection(&config.database_url).await?;
            ensure_schema(&db).await?;

            let user_manager = UserManager::new(&config);
            let user = create_host_administrator(&db, &user_manager, &user_name, &password).await?;
            println!("Host administrator '{}' has id {}", user.user_name, user.id);
        }
    }

    Ok(())
}

fn setup_logging(log_level: &Option<String>) {
    let log_level = match log_level
        .as_ref()
        .unwrap_or(&"info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(format!("sqlx=warn,{}", log_level)))
        .without_time()
        .init();
}
