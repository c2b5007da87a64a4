//! Inventory report command.

use bazar_core::reports::{export_rows, filter_by_date};
use bazar_core::{CategoryIndex, DateRange, InventoryReport};
use chrono::NaiveDate;
use clap::Args;

use crate::context::{or_dash, AppContext};

#[derive(Debug, Args)]
pub struct ReportArgs {
    /// First creation date to include (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<NaiveDate>,
    /// Last creation date to include (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<NaiveDate>,
    /// Reorder threshold; defaults to `BAZAR_LOW_STOCK_THRESHOLD`
    #[arg(long)]
    pub threshold: Option<u32>,
    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
    /// Print the flat per-product export as JSON instead of the report
    #[arg(long, conflicts_with = "json")]
    pub export: bool,
}

/// Build and print the inventory report.
///
/// # Errors
///
/// Returns an error if the date range is inverted, the catalogue cannot be
/// fetched, or JSON serialization fails.
pub(crate) async fn run_report(ctx: &AppContext, args: &ReportArgs) -> anyhow::Result<()> {
    if let (Some(from), Some(to)) = (args.from, args.to) {
        anyhow::ensure!(from <= to, "--from {from} is after --to {to}");
    }
    let range = DateRange {
        from: args.from,
        to: args.to,
    };
    let threshold = args.threshold.unwrap_or(ctx.config.low_stock_threshold);

    let data = ctx.load_catalogue().await?;
    let index = CategoryIndex::new(&data.categories, &data.subcategories);

    if args.export {
        let rows = export_rows(&filter_by_date(&data.products, range), &index);
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    let report = InventoryReport::build(&data.products, &index, range, threshold);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }
    print_report(&report, threshold);
    Ok(())
}

fn print_report(report: &InventoryReport, threshold: u32) {
    let k = &report.kpis;
    println!("Products:          {}", k.total_products);
    println!("Categories:        {}", k.distinct_categories);
    println!("Units in stock:    {}", k.total_stock);
    println!("Inventory value:   {:.2}", k.inventory_value);
    let last = k.last_added.map(|d| d.format("%Y-%m-%d").to_string());
    println!("Last added:        {}", or_dash(last.as_deref()));

    if !report.monthly.is_empty() {
        println!();
        println!("{:<10}ADDED", "MONTH");
        for month in &report.monthly {
            println!("{:<10}{}", month.key(), month.count);
        }
    }

    if !report.categories.is_empty() {
        println!();
        println!("{:<24}{:>9}{:>9}{:>14}", "CATEGORY", "PRODUCTS", "UNITS", "VALUE");
        for cat in &report.categories {
            let name: String = cat.category_name.chars().take(22).collect();
            println!(
                "{:<24}{:>9}{:>9}{:>14.2}",
                name, cat.product_count, cat.stock, cat.inventory_value
            );
        }
    }

    if !report.low_stock.is_empty() {
        println!();
        println!("Lowest stock (reorder at {threshold} or less):");
        println!("{:<8}{:<30}{:>7}  CATEGORY", "ID", "PRODUCT", "STOCK");
        for entry in &report.low_stock {
            let name: String = entry.name.chars().take(28).collect();
            let flag = if entry.needs_reorder { " !" } else { "" };
            println!(
                "{:<8}{:<30}{:>7}  {}{flag}",
                entry.id.as_str(),
                name,
                entry.stock,
                or_dash(Some(entry.category.as_str()))
            );
        }
    }
}
