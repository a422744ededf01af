//! ShopMall CLI - Terminal front end for the ShopMall store.
//!
//! # Usage
//!
//! ```bash
//! # List the catalog (falls back to the bundled products when offline)
//! shopmall catalog
//! shopmall catalog --category electronics
//!
//! # Show one product
//! shopmall product 4
//!
//! # Sign in or create an account against the demo identity provider
//! shopmall sign-in -e admin@gmail.com -p 0000
//! shopmall sign-up -e new@shop.dev -p hunter22
//!
//! # Walk through browse, add to cart, sign in and checkout
//! shopmall demo
//! ```
//!
//! # Commands
//!
//! - `catalog` - Load and list products, optionally filtered by category
//! - `product` - Fetch a single product
//! - `sign-in` / `sign-up` - Run a credential operation and show the session
//! - `demo` - Scripted end-to-end session

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use shopmall_store::StoreConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "shopmall")]
#[command(author, version, about = "ShopMall store in the terminal")]
struct Cli {
    /// Skip the catalog service and use the bundled products only
    #[arg(long, global = true)]
    offline: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load and list products
    Catalog {
        /// Category label to filter by (`all` for everything)
        #[arg(short, long, default_value = "all")]
        category: String,
    },
    /// Show one product
    Product {
        /// Product id
        id: i32,
    },
    /// Sign in to an existing account
    SignIn {
        #[command(flatten)]
        credentials: commands::session::Credentials,
    },
    /// Create an account and sign in
    SignUp {
        #[command(flatten)]
        credentials: commands::session::Credentials,
    },
    /// Scripted browse, cart, sign-in and checkout session
    Demo {
        /// Category to shop from
        #[arg(short, long, default_value = "all")]
        category: String,

        /// Number of distinct products to put in the cart
        #[arg(short, long, default_value_t = 2)]
        items: usize,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StoreConfig) -> Option<sentry::ClientInitGuard> {
    use secrecy::ExposeSecret;

    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.expose_secret(),
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
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load configuration from environment (needed for Sentry init)
    let config = match StoreConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            #[allow(clippy::print_stderr)]
            {
                eprintln!("Failed to load configuration: {e}");
            }
            std::process::exit(2);
        }
    };

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "shopmall_store=info,shopmall_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    if let Err(e) = run(cli, &config).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: &StoreConfig) -> Result<(), commands::CommandError> {
    let ctx = commands::Context::new(config, cli.offline)?;

    match cli.command {
        Commands::Catalog { category } => commands::catalog::list(&ctx, &category).await,
        Commands::Product { id } => commands::catalog::show(&ctx, id).await,
        Commands::SignIn { credentials } => commands::session::sign_in(&ctx, &credentials).await,
        Commands::SignUp { credentials } => commands::session::sign_up(&ctx, &credentials).await,
        Commands::Demo { category, items } => commands::demo::run(&ctx, &category, items).await,
    }
}
