//! Storefront browsing commands.

use bazar_client::youtube_embed_url;
use bazar_core::catalogue::{price_range, DEFAULT_PER_PAGE};
use bazar_core::{CatalogueState, CategoryNode, EntityId, Product, SortKey};
use clap::Args;
use rust_decimal::Decimal;

use crate::context::{or_dash, AppContext};

#[derive(Debug, Args)]
pub struct CatalogueArgs {
    /// Case-insensitive text search over name, description, brand and SKU
    #[arg(long)]
    pub search: Option<String>,
    /// Category id
    #[arg(long)]
    pub category: Option<String>,
    /// Subcategory id; ignored unless it belongs to --category
    #[arg(long)]
    pub subcategory: Option<String>,
    #[arg(long)]
    pub min_price: Option<Decimal>,
    #[arg(long)]
    pub max_price: Option<Decimal>,
    /// Only products with a discount
    #[arg(long)]
    pub discounted: bool,
    /// Only products with stock
    #[arg(long)]
    pub in_stock: bool,
    /// relevance, price-asc, price-desc, name-asc or discount-desc
    #[arg(long, default_value = "relevance")]
    pub sort: SortKey,
    #[arg(long, default_value_t = 1)]
    pub page: usize,
    #[arg(long, default_value_t = DEFAULT_PER_PAGE)]
    pub per_page: usize,
    /// Print the category tree instead of products
    #[arg(long)]
    pub tree: bool,
}

impl CatalogueArgs {
    /// Applies the arguments in the order the storefront applies facet
    /// changes, ending with the page so it is not reset.
    pub(crate) fn to_state(&self, tree: &[CategoryNode]) -> CatalogueState {
        let mut state = CatalogueState::new();
        state.set_per_page(self.per_page);
        if let Some(search) = &self.search {
            state.set_search(search.as_str());
        }
        state.select_category(self.category.as_deref().map(EntityId::new), tree);
        state.select_subcategory(self.subcategory.as_deref().map(EntityId::new), tree);
        state.set_price_bounds(self.min_price, self.max_price);
        state.set_only_discounted(self.discounted);
        state.set_only_in_stock(self.in_stock);
        state.set_sort(self.sort);
        state.set_page(self.page);
        state
    }
}

/// List one page of the filtered catalogue.
///
/// # Errors
///
/// Returns an error if the product listing cannot be fetched.
pub(crate) async fn run_catalogue(ctx: &AppContext, args: &CatalogueArgs) -> anyhow::Result<()> {
    let data = ctx.load_catalogue().await?;

    if args.tree {
        print_tree(&data.tree);
        return Ok(());
    }

    let state = args.to_state(&data.tree);
    let page = state.view(&data.products, &data.tree);
    let (low, high) = price_range(&data.products);

    if page.total == 0 {
        println!("no products match the current filters");
        return Ok(());
    }

    println!(
        "{} products (page {}/{}, prices {low:.2} to {high:.2})",
        page.total, page.page, page.total_pages
    );
    println!("{:<8}{:<36}{:>10}{:>7}{:>10}  SKU", "ID", "NAME", "PRICE", "OFF", "FINAL");
    for product in &page.items {
        print_row(product);
    }
    if state.filters().has_active_filters() {
        println!("(filters active)");
    }
    Ok(())
}

fn print_row(p: &Product) {
    let name: String = p.name.chars().take(34).collect();
    let off = if p.is_discounted() {
        format!("{}%", p.discount_pct.normalize())
    } else {
        String::new()
    };
    println!(
        "{:<8}{:<36}{:>10.2}{:>7}{:>10.2}  {}",
        p.id.as_str(),
        name,
        p.price,
        off,
        p.final_price(),
        or_dash(p.sku.as_deref())
    );
}

fn print_tree(tree: &[CategoryNode]) {
    if tree.is_empty() {
        println!("no categories");
        return;
    }
    for node in tree {
        println!("{:<6}{}", node.category.id.as_str(), node.category.name);
        for sub in &node.subcategories {
            println!("  {:<6}{}", sub.id.as_str(), sub.name);
        }
    }
}

/// Show a single product.
///
/// # Errors
///
/// Returns an error if the product cannot be fetched.
pub(crate) async fn run_product_show(ctx: &AppContext, id: &str) -> anyhow::Result<()> {
    let product = ctx.client.get_product(&EntityId::new(id)).await?;

    println!("{} ({})", product.name, product.id);
    println!("SKU:         {}", or_dash(product.sku.as_deref()));
    println!("Brand:       {}", or_dash(product.brand.as_deref()));
    println!(
        "Category:    {} / {}",
        or_dash(product.category_name.as_deref()),
        or_dash(product.subcategory_name.as_deref())
    );
    if product.is_discounted() {
        println!(
            "Price:       {:.2} -{}% = {:.2}",
            product.price,
            product.discount_pct.normalize(),
            product.final_price()
        );
    } else {
        println!("Price:       {:.2}", product.price);
    }
    let stock = product
        .stock
        .map_or_else(|| "\u{2014}".to_string(), |s| s.to_string());
    println!("Stock:       {stock} (max per order {})", product.max_qty());
    println!("Warranty:    {}", or_dash(product.warranty.as_deref()));
    println!("Image:       {}", or_dash(product.image_url.as_deref()));
    let video = product.video_url.as_deref().and_then(youtube_embed_url);
    println!("Video:       {}", or_dash(video.as_deref()));
    if !product.description.is_empty() {
        println!();
        println!("{}", product.description);
    }
    Ok(())
}
