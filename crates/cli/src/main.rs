//! yRush CLI - drive the campus stationery desk from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! yrush catalog
//! yrush catalog --category Xerox
//!
//! # Fill the cart
//! yrush cart add DRAW-SHEET-001 --qty 3
//! yrush cart set XEROX-30-100 40
//! yrush cart show
//!
//! # Sign in and check out
//! yrush login student@yrush.local --password student123
//! yrush checkout --delivery --class CSE-B --roll 42 --time "12:30 PM" --payment upi
//! yrush orders --mine
//!
//! # Owner dashboard
//! yrush orders summary
//! ```
//!
//! State lives under `YRUSH_DATA_DIR` (default `.yrush`). Both scopes are
//! files, so a sign-in carries over to the next command until `logout`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use yrush_core::PaymentMethod;
use yrush_storefront::config::StorefrontConfig;
use yrush_storefront::models::Fulfillment;
use yrush_storefront::{AppError, Storefront};

mod commands;

#[derive(Parser)]
#[command(name = "yrush")]
#[command(author, version, about = "yRush campus stationery desk")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List products
    Catalog {
        /// Only show this category
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Create the demo accounts if none exist
    Seed,
    /// Sign in
    Login {
        /// Account email
        email: String,

        /// Password (prefer the environment variable)
        #[arg(short, long, env = "YRUSH_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Show the signed-in account
    Whoami,
    /// Sign out
    Logout,
    /// Place an order for the cart
    Checkout {
        /// Deliver instead of collecting at the counter
        #[arg(long)]
        delivery: bool,

        /// Class or section to deliver to
        #[arg(long, requires = "delivery")]
        class: Option<String>,

        /// Roll number
        #[arg(long, requires = "delivery")]
        roll: Option<String>,

        /// Preferred time (e.g. "12:30 PM", "After 3rd period")
        #[arg(long, requires = "delivery")]
        time: Option<String>,

        /// Payment method (`cash` or `upi`)
        #[arg(long, default_value = "cash")]
        payment: PaymentMethod,
    },
    /// List orders
    Orders {
        /// Only orders placed by the signed-in account
        #[arg(long)]
        mine: bool,

        #[command(subcommand)]
        action: Option<OrdersAction>,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Add a product
    Add {
        /// Product id
        id: String,

        /// Quantity to add (may be negative)
        #[arg(short, long, default_value_t = 1, allow_hyphen_values = true)]
        qty: i64,
    },
    /// Set a product's quantity (0 removes it)
    Set {
        /// Product id
        id: String,

        /// New quantity
        #[arg(allow_hyphen_values = true)]
        qty: i64,
    },
    /// Show the priced cart
    Show,
    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
enum OrdersAction {
    /// Order counts and revenue (owner only)
    Summary,
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    Some(guard)
}

/// Warnings and errors become Sentry events; info and debug become breadcrumbs.
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

    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing_subscriber::fmt::init();
            tracing::error!("Invalid configuration: {e}");
            std::process::exit(2);
        }
    };

    let _sentry_guard = init_sentry(&config);

    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "yrush_cli=info,yrush_storefront=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().without_time().with_target(false))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    if let Err(e) = run(cli, config).await {
        e.report();
        tracing::error!("{}", e.user_message());
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: StorefrontConfig) -> Result<(), AppError> {
    let shop = Storefront::with_file_session(config)?;

    match cli.command {
        Commands::Catalog { category } => commands::catalog::list(&shop, category.as_deref()),
        Commands::Cart { action } => match action {
            CartAction::Add { id, qty } => commands::cart::add(&shop, &id, qty)?,
            CartAction::Set { id, qty } => commands::cart::set(&shop, &id, qty)?,
            CartAction::Show => commands::cart::show(&shop),
            CartAction::Clear => commands::cart::clear(&shop),
        },
        Commands::Seed => commands::account::seed(&shop).await?,
        Commands::Login { email, password } => {
            commands::account::login(&shop, &email, password.into()).await?;
        }
        Commands::Whoami => commands::account::whoami(&shop)?,
        Commands::Logout => commands::account::logout(&shop),
        Commands::Checkout {
            delivery,
            class,
            roll,
            time,
            payment,
        } => {
            let fulfillment = if delivery {
                commands::orders::DeliveryArgs { class, roll, time }.into_fulfillment()?
            } else {
                Fulfillment::Pickup
            };
            commands::orders::checkout(&shop, fulfillment, payment)?;
        }
        Commands::Orders { mine, action } => match action {
            Some(OrdersAction::Summary) => commands::orders::summary(&shop)?,
            None => commands::orders::list(&shop, mine)?,
        },
    }
    Ok(())
}
