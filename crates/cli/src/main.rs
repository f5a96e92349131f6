//! E-Store storefront CLI - browse the catalog and manage the cart, wishlist
//! and account from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Browse and search the catalog
//! sf-cli home
//! sf-cli products
//! sf-cli products --search headphones --max 20000 --in-stock
//! sf-cli product 3
//! sf-cli review 3 5 "Sturdy and warm"
//!
//! # Cart
//! sf-cli cart add 3
//! sf-cli cart set 3 4
//! sf-cli cart show
//!
//! # Wishlist
//! sf-cli wishlist toggle 5
//! sf-cli wishlist move 5
//!
//! # Account
//! sf-cli login ananya secret
//! sf-cli whoami
//! ```
//!
//! State is kept in `STOREFRONT_DATA_DIR` between runs. Every run prints the
//! notifications raised by the command.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shopfront_storefront::config::StorefrontConfig;
use shopfront_storefront::{Result, Storefront};

mod commands;

#[derive(Parser)]
#[command(name = "sf-cli")]
#[command(author, version, about = "E-Store storefront CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show featured products and categories
    Home,
    /// List catalog products
    Products {
        /// Match against name, description and category
        #[arg(short, long)]
        search: Option<String>,

        /// Only show this category
        #[arg(short, long)]
        category: Option<String>,

        /// Minimum price in rupees
        #[arg(long)]
        min: Option<Decimal>,

        /// Maximum price in rupees
        #[arg(long)]
        max: Option<Decimal>,

        /// Hide out-of-stock products
        #[arg(long)]
        in_stock: bool,
    },
    /// Show one product with its reviews
    Product {
        /// Product ID
        id: String,
    },
    /// Review a product as the signed-in user
    Review {
        /// Product ID
        id: String,
        /// Stars, 1 to 5
        rating: u8,
        /// Review text
        comment: String,
    },
    /// Manage the shopping cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Manage the wishlist
    Wishlist {
        #[command(subcommand)]
        action: WishlistAction,
    },
    /// Sign in with any username and password
    Login { username: String, password: String },
    /// Create an account and sign in
    Register {
        username: String,
        email: String,
        password: String,
    },
    /// Sign out
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Show the checkout summary
    Summary,
}

#[derive(Subcommand)]
enum CartAction {
    /// List cart lines and totals
    Show,
    /// Add one unit of a product
    Add { id: String },
    /// Remove a product line
    Remove { id: String },
    /// Set a line's quantity (zero or less removes it)
    Set {
        id: String,
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
enum WishlistAction {
    /// List saved products
    Show,
    /// Save a product
    Add { id: String },
    /// Remove a saved product
    Remove { id: String },
    /// Save or unsave a product
    Toggle { id: String },
    /// Move a saved product into the cart
    Move { id: String },
    /// Remove every saved product
    Clear,
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
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
#[allow(clippy::print_stderr)]
async fn main() {
    let cli = Cli::parse();

    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            // Tracing is not initialized yet
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    // Sentry must be initialized before the tracing subscriber
    let _sentry_guard = init_sentry(&config);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "shopfront_storefront=info,sf_cli=info".into());

    // Logs go to stderr so command output stays clean
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    if let Err(e) = run(cli, &config) {
        e.report();
        std::process::exit(1);
    }
}

fn run(cli: Cli, config: &StorefrontConfig) -> Result<()> {
    let mut shop = Storefront::from_config(config)?;

    let result = dispatch(cli.command, &mut shop);
    commands::print_notifications(&shop);
    result
}

fn dispatch(command: Commands, shop: &mut Storefront) -> Result<()> {
    match command {
        Commands::Home => commands::products::home(shop),
        Commands::Products {
            search,
            category,
            min,
            max,
            in_stock,
        } => {
            let filter = commands::products::Filter {
                search,
                category,
                min,
                max,
                in_stock,
            };
            commands::products::list(shop, &filter)?;
        }
        Commands::Product { id } => commands::products::show(shop, &id.into())?,
        Commands::Review {
            id,
            rating,
            comment,
        } => commands::products::review(shop, &id.into(), rating, &comment)?,
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(shop),
            CartAction::Add { id } => commands::cart::add(shop, &id.into())?,
            CartAction::Remove { id } => commands::cart::remove(shop, &id.into()),
            CartAction::Set { id, quantity } => commands::cart::set(shop, &id.into(), quantity),
            CartAction::Clear => commands::cart::clear(shop),
        },
        Commands::Wishlist { action } => match action {
            WishlistAction::Show => commands::wishlist::show(shop),
            WishlistAction::Add { id } => commands::wishlist::add(shop, &id.into())?,
            WishlistAction::Remove { id } => commands::wishlist::remove(shop, &id.into()),
            WishlistAction::Toggle { id } => commands::wishlist::toggle(shop, &id.into())?,
            WishlistAction::Move { id } => commands::wishlist::move_to_cart(shop, &id.into())?,
            WishlistAction::Clear => commands::wishlist::clear(shop),
        },
        Commands::Login { username, password } => {
            commands::account::login(shop, &username, password)?;
        }
        Commands::Register {
            username,
            email,
            password,
        } => commands::account::register(shop, &username, &email, password)?,
        Commands::Logout => commands::account::logout(shop),
        Commands::Whoami => commands::account::whoami(shop),
        Commands::Summary => commands::cart::summary(shop),
    }
    Ok(())
}
