//! Back-office command handlers. Every command requires a stored session.

mod products;
mod taxonomy;

use std::path::PathBuf;

use clap::Subcommand;
use rust_decimal::Decimal;

use crate::context::{require_login, AppContext};

/// Sub-commands available under `admin`.
#[derive(Debug, Subcommand)]
pub enum AdminCommands {
    /// Manage categories
    Category {
        #[command(subcommand)]
        command: CategoryCommands,
    },
    /// Manage subcategories
    Subcategory {
        #[command(subcommand)]
        command: SubcategoryCommands,
    },
    /// Manage products
    Product {
        #[command(subcommand)]
        command: ProductCommands,
    },
}

#[derive(Debug, Subcommand)]
pub enum CategoryCommands {
    /// List categories with their subcategory counts
    List,
    /// Create a category
    Create { name: String },
    /// Rename a category
    Rename { id: String, name: String },
    /// Delete a category
    Delete { id: String },
}

#[derive(Debug, Subcommand)]
pub enum SubcategoryCommands {
    /// List subcategories with their parent category
    List,
    /// Create a subcategory under a category
    Create {
        name: String,
        #[arg(long)]
        category: String,
    },
    /// Rename a subcategory or move it to another category
    Update {
        id: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        category: String,
    },
    /// Delete a subcategory
    Delete { id: String },
}

#[derive(Debug, Subcommand)]
pub enum ProductCommands {
    /// List products as stored on the server
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 50)]
        limit: u32,
    },
    /// Create a product; an image file is required
    Create {
        #[arg(long)]
        code: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        category: String,
        #[arg(long)]
        subcategory: String,
        #[arg(long)]
        price: Decimal,
        #[arg(long, default_value_t = 0)]
        stock: i64,
        /// Discount percentage, 0 to 100
        #[arg(long, default_value = "0")]
        discount: Decimal,
        #[arg(long)]
        featured: bool,
        /// Video link (YouTube links are embedded on the product page)
        #[arg(long)]
        video: Option<String>,
        /// Image file to upload (at most 5 MB)
        #[arg(long)]
        image: PathBuf,
    },
    /// Update selected fields of a product
    Update {
        id: String,
        #[arg(long)]
        code: Option<String>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        subcategory: Option<String>,
        #[arg(long)]
        price: Option<Decimal>,
        #[arg(long)]
        stock: Option<u32>,
        #[arg(long)]
        discount: Option<Decimal>,
        #[arg(long)]
        featured: Option<bool>,
        #[arg(long)]
        video: Option<String>,
        /// Replacement image; switches the update to a multipart upload
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Delete one or more products
    Delete {
        #[arg(required = true)]
        ids: Vec<String>,
    },
}

/// Dispatch an `admin` sub-command.
///
/// # Errors
///
/// Returns an error if there is no session or the command fails.
pub(crate) async fn run_admin(ctx: &AppContext, command: AdminCommands) -> anyhow::Result<()> {
    require_login(ctx)?;
    match command {
        AdminCommands::Category { command } => taxonomy::run_category(ctx, command).await,
        AdminCommands::Subcategory { command } => taxonomy::run_subcategory(ctx, command).await,
        AdminCommands::Product { command } => products::run_product(ctx, command).await,
    }
}

/// Turns a client error into the message the user sees.
fn user_error(e: &bazar_client::ClientError) -> anyhow::Error {
    match e {
        bazar_client::ClientError::Core(core) => anyhow::anyhow!("{core}"),
        other => anyhow::anyhow!("{}", other.user_message()),
    }
}
