//! E-Shop Pro CLI - Terminal storefront and account tools.
//!
//! # Usage
//!
//! ```bash
//! # Create an account and sign in as it
//! eshop signup -e a@x.com -p pw
//!
//! # Browse the catalog
//! eshop products --category Audio --search speaker
//!
//! # Interactive storefront
//! eshop shop
//! ```
//!
//! # Commands
//!
//! - `signup` / `login` / `logout` / `whoami` - Account and session
//! - `products` / `categories` - Catalog
//! - `shop` - Interactive storefront session
//!
//! State (accounts and the session token) is kept in a JSON file, by default
//! `.eshop/storage.json`, or wherever `ESHOP_STORAGE_PATH` points.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use eshop_pro_storefront::config::StorefrontConfig;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod render;

const DEFAULT_STORAGE_PATH: &str = ".eshop/storage.json";

#[derive(Parser)]
#[command(name = "eshop")]
#[command(author, version, about = "E-Shop Pro storefront")]
struct Cli {
    /// Storage file (overrides `ESHOP_STORAGE_PATH`)
    #[arg(long, global = true)]
    storage: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account and sign in as it
    Signup {
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,
    },
    /// Sign in to an existing account
    Login {
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,
    },
    /// Sign out and discard the session token
    Logout,
    /// Show the signed-in account
    Whoami,
    /// List products
    Products {
        /// Only products in this category
        #[arg(short, long, default_value = "All")]
        category: String,

        /// Only products whose name or description contains this text
        #[arg(short, long, default_value = "")]
        search: String,
    },
    /// List product categories
    Categories,
    /// Start an interactive storefront session
    Shop,
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR => sentry_tracing::EventFilter::Event,
        tracing::Level::WARN | tracing::Level::INFO => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let mut config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing_subscriber::fmt::init();
            tracing::error!("Invalid configuration: {e}");
            std::process::exit(2);
        }
    };
    if let Some(path) = cli.storage.clone() {
        config.storage_path = Some(path);
    }
    config
        .storage_path
        .get_or_insert_with(|| PathBuf::from(DEFAULT_STORAGE_PATH));

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "eshop_pro_storefront=info,eshop_pro_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli.command, &config).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(command: Commands, config: &StorefrontConfig) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Signup { email, password } => commands::account::signup(config, email, password)?,
        Commands::Login { email, password } => commands::account::login(config, email, password)?,
        Commands::Logout => commands::account::logout(config)?,
        Commands::Whoami => commands::account::whoami(config)?,
        Commands::Products { category, search } => {
            commands::catalog::products(config, category, search)?;
        }
        Commands::Categories => commands::catalog::categories(config)?,
        Commands::Shop => commands::shop::run(config).await?,
    }
    Ok(())
}
