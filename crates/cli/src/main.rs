//! Relab CLI - browse the catalog and manage the cart from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Log in; the session is kept in ~/.relab/session.json
//! relab login -e maria@relab.com.br -p 's3nha'
//!
//! # Browse
//! relab products list --category 2 --search fone
//! relab categories list
//!
//! # Cart
//! relab cart add 3 -q 2
//! relab cart dec 15
//! relab cart show
//! ```
//!
//! # Commands
//!
//! - `login`, `register`, `logout`, `whoami` - Account
//! - `products`, `categories` - Catalog
//! - `cart` - Cart of the logged-in user
//!
//! Configuration comes from the `RELAB_*` environment variables (or `.env`).
//! Logs go to stderr; set `RUST_LOG` to see them.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Args, Parser, Subcommand};
use relab_core::{CartItemId, CategoryId, ProductId};
use relab_storefront::config::StorefrontConfig;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::App;

#[derive(Parser)]
#[command(name = "relab")]
#[command(author, version, about = "Relab storefront from the command line")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and keep the session
    Login {
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,
    },
    /// Create an account (does not log in)
    Register(RegisterArgs),
    /// Forget the stored session
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Browse products
    Products {
        #[command(subcommand)]
        action: ProductAction,
    },
    /// Browse categories
    Categories {
        #[command(subcommand)]
        action: CategoryAction,
    },
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
}

#[derive(Args)]
struct RegisterArgs {
    #[arg(long)]
    username: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    first_name: String,
    #[arg(long)]
    last_name: String,
    /// CPF; punctuation is ignored
    #[arg(long)]
    cpf: String,
    /// Phone number; punctuation is ignored
    #[arg(long)]
    phone: String,
    #[arg(long)]
    password: String,
    #[arg(long)]
    password_confirm: String,
}

#[derive(Subcommand)]
enum ProductAction {
    /// List products
    List {
        /// Only this category
        #[arg(long)]
        category: Option<CategoryId>,

        /// Name contains this text (case-insensitive)
        #[arg(long)]
        search: Option<String>,

        /// Only products on promotion
        #[arg(long, conflicts_with = "featured")]
        promotions: bool,

        /// Only featured products
        #[arg(long)]
        featured: bool,
    },
    /// Show one product
    Show { id: ProductId },
}

#[derive(Subcommand)]
enum CategoryAction {
    /// List categories
    List,
    /// Show one category
    Show { id: CategoryId },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart
    Show,
    /// Add a product
    Add {
        product: ProductId,

        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Raise a line's quantity by one
    Inc { item: CartItemId },
    /// Lower a line's quantity by one (never below 1)
    Dec { item: CartItemId },
    /// Set a line's quantity (0 removes it)
    Set { item: CartItemId, quantity: u32 },
    /// Remove a line
    Remove { item: CartItemId },
    /// Remove every line
    Clear,
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

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Map tracing levels to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR => sentry_tracing::EventFilter::Event,
        tracing::Level::WARN | tracing::Level::INFO => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => exit_with(&e),
    };

    let _sentry_guard = init_sentry(&config);

    // Quiet by default; RUST_LOG=relab_storefront=debug for request traces
    let env_filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let cli = Cli::parse();

    let result = match App::new(config) {
        Ok(app) => run(&app, cli.command).await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "Command failed");
        exit_with(&e);
    }
}

async fn run(app: &App, command: Commands) -> relab_storefront::Result<()> {
    match command {
        Commands::Login { email, password } => commands::account::login(app, email, password).await,
        Commands::Register(args) => {
            commands::account::register(
                app,
                commands::account::Registration {
                    username: args.username,
                    email: args.email,
                    first_name: args.first_name,
                    last_name: args.last_name,
                    cpf: args.cpf,
                    phone: args.phone,
                    password: args.password,
                    password_confirm: args.password_confirm,
                },
            )
            .await
        }
        Commands::Logout => commands::account::logout(app),
        Commands::Whoami => {
            commands::account::whoami(app);
            Ok(())
        }
        Commands::Products { action } => match action {
            ProductAction::List {
                category,
                search,
                promotions,
                featured,
            } => {
                let shelf = if promotions {
                    commands::catalog::Shelf::Promotions
                } else if featured {
                    commands::catalog::Shelf::Featured
                } else {
                    commands::catalog::Shelf::All(category)
                };
                commands::catalog::list_products(app, shelf, search).await
            }
            ProductAction::Show { id } => commands::catalog::show_product(app, id).await,
        },
        Commands::Categories { action } => match action {
            CategoryAction::List => commands::catalog::list_categories(app).await,
            CategoryAction::Show { id } => commands::catalog::show_category(app, id).await,
        },
        Commands::Cart { action } => {
            let action = match action {
                CartAction::Show => commands::cart::Action::Show,
                CartAction::Add { product, quantity } => {
                    commands::cart::Action::Add { product, quantity }
                }
                CartAction::Inc { item } => commands::cart::Action::Increment(item),
                CartAction::Dec { item } => commands::cart::Action::Decrement(item),
                CartAction::Set { item, quantity } => {
                    commands::cart::Action::SetQuantity(item, quantity)
                }
                CartAction::Remove { item } => commands::cart::Action::Remove(item),
                CartAction::Clear => commands::cart::Action::Clear,
            };
            commands::cart::run(app, action).await
        }
    }
}

#[allow(clippy::print_stderr)]
fn exit_with(error: &dyn std::error::Error) -> ! {
    eprintln!("{error}");
    std::process::exit(1);
}
