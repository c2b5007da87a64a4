mod admin;
mod auth;
mod cart;
mod catalogue;
mod context;
mod report;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::context::AppContext;

#[derive(Debug, Parser)]
#[command(name = "bazar")]
#[command(about = "Bazar storefront command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Browse the catalogue with filters, sorting and paging
    Catalogue(catalogue::CatalogueArgs),
    /// Show a single product
    Product {
        /// Product id
        id: String,
    },
    /// Manage the local shopping cart
    Cart {
        #[command(subcommand)]
        command: cart::CartCommands,
    },
    /// Log in to the back office and store the session token
    Login {
        username: String,
        /// Password; read from `BAZAR_PASSWORD` when not given
        #[arg(long, env = "BAZAR_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the stored session token
    Logout,
    /// Check the stored session token with the server
    Verify,
    /// Inventory report over the catalogue
    Report(report::ReportArgs),
    /// Back-office catalogue management (requires login)
    Admin {
        #[command(subcommand)]
        command: admin::AdminCommands,
    },
}

impl Commands {
    /// The storefront route this command stands for, used to avoid
    /// redirect loops when the server rejects the session.
    fn route(&self) -> &'static str {
        match self {
            Self::Login { .. } => "/login",
            Self::Admin { .. } | Self::Report(_) | Self::Verify => "/admin",
            Self::Cart { .. } => "/cart",
            Self::Catalogue(_) | Self::Product { .. } | Self::Logout => "/",
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // `.env` first so clap's `env` fallbacks see it too.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("bazar ready; run `bazar --help` to list commands");
        return Ok(());
    };

    let config = bazar_core::load_app_config_from_env()?;
    init_tracing(&config.log_level);
    tracing::debug!(?config, "configuration loaded");

    let ctx = AppContext::open(config, command.route())?;
    match command {
        Commands::Catalogue(args) => catalogue::run_catalogue(&ctx, &args).await,
        Commands::Product { id } => catalogue::run_product_show(&ctx, &id).await,
        Commands::Cart { command } => cart::run_cart(&ctx, command).await,
        Commands::Login { username, password } => {
            auth::run_login(&ctx, &username, &password).await
        }
        Commands::Logout => {
            auth::run_logout(&ctx);
            Ok(())
        }
        Commands::Verify => auth::run_verify(&ctx).await,
        Commands::Report(args) => report::run_report(&ctx, &args).await,
        Commands::Admin { command } => admin::run_admin(&ctx, command).await,
    }
}

/// `RUST_LOG` wins over the configured level when set.
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
