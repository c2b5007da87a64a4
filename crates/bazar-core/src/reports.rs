//! Inventory report aggregation for the back-office.
//!
//! All functions are pure group-and-sum passes over a product list. Monetary
//! sums use [`Product::final_price`] and are never rounded here; rounding is a
//! display concern.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::products::{Category, EntityId, Product, Subcategory};

/// Number of entries in the lowest-stock listing.
pub const LOW_STOCK_LIMIT: usize = 10;

/// Lookup tables for resolving a product's category and display names.
#[derive(Debug, Clone, Default)]
pub struct CategoryIndex {
    sub_to_category: HashMap<EntityId, EntityId>,
    category_names: HashMap<EntityId, String>,
    subcategory_names: HashMap<EntityId, String>,
}

impl CategoryIndex {
    #[must_use]
    pub fn new(categories: &[Category], subcategories: &[Subcategory]) -> Self {
        Self {
            sub_to_category: subcategories
                .iter()
                .filter_map(|s| s.category_id.clone().map(|cid| (s.id.clone(), cid)))
                .collect(),
            category_names: categories
                .iter()
                .map(|c| (c.id.clone(), c.name.clone()))
                .collect(),
            subcategory_names: subcategories
                .iter()
                .map(|s| (s.id.clone(), s.name.clone()))
                .collect(),
        }
    }

    /// The product's own category id, else the category owning its
    /// subcategory, else `None`.
    #[must_use]
    pub fn resolve_category(&self, product: &Product) -> Option<EntityId> {
        if let Some(direct) = product.category_id.as_ref().filter(|c| !c.is_empty()) {
            return Some(direct.clone());
        }
        product
            .subcategory_id
            .as_ref()
            .and_then(|sid| self.sub_to_category.get(sid))
            .cloned()
    }

    #[must_use]
    pub fn category_label(&self, id: &EntityId) -> String {
        self.category_names
            .get(id)
            .cloned()
            .unwrap_or_else(|| format!("Category {id}"))
    }

    #[must_use]
    pub fn subcategory_label(&self, id: &EntityId) -> String {
        self.subcategory_names
            .get(id)
            .cloned()
            .unwrap_or_else(|| format!("Subcategory {id}"))
    }
}

/// Inclusive creation-date window. An unset bound is open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    #[must_use]
    pub fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    /// Whether a product created at `created_at` falls in the window. Without
    /// a timestamp a product only matches an unbounded range.
    #[must_use]
    pub fn contains(&self, created_at: Option<DateTime<Utc>>) -> bool {
        if self.is_unbounded() {
            return true;
        }
        let Some(day) = created_at.map(|c| c.date_naive()) else {
            return false;
        };
        self.from.is_none_or(|from| day >= from) && self.to.is_none_or(|to| day <= to)
    }
}

#[must_use]
pub fn filter_by_date(products: &[Product], range: DateRange) -> Vec<Product> {
    products
        .iter()
        .filter(|p| range.contains(p.created_at))
        .cloned()
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthCount {
    pub year: i32,
    pub month: u32,
    pub count: usize,
}

impl MonthCount {
    /// `YYYY-MM`.
    #[must_use]
    pub fn key(&self) -> String {
        format!("{}-{:02}", self.year, self.month)
    }
}

/// Products created per calendar month, oldest first.
#[must_use]
pub fn monthly_counts(products: &[Product]) -> Vec<MonthCount> {
    let mut months: BTreeMap<(i32, u32), usize> = BTreeMap::new();
    for created in products.iter().filter_map(|p| p.created_at) {
        *months.entry((created.year(), created.month())).or_default() += 1;
    }
    months
        .into_iter()
        .map(|((year, month), count)| MonthCount { year, month, count })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryAggregate {
    pub category_id: EntityId,
    pub category_name: String,
    pub product_count: usize,
    pub stock: u64,
    /// Sum of `stock * final_price` over the category's products.
    pub inventory_value: Decimal,
}

/// Count, stock, and inventory value per resolved category. Products whose
/// category cannot be resolved are left out. Sorted by product count
/// descending, then id.
#[must_use]
pub fn category_breakdown(products: &[Product], index: &CategoryIndex) -> Vec<CategoryAggregate> {
    let mut groups: BTreeMap<EntityId, CategoryAggregate> = BTreeMap::new();
    for p in products {
        let Some(cid) = index.resolve_category(p) else {
            continue;
        };
        let entry = groups
            .entry(cid.clone())
            .or_insert_with(|| CategoryAggregate {
                category_name: index.category_label(&cid),
                category_id: cid,
                product_count: 0,
                stock: 0,
                inventory_value: Decimal::ZERO,
            });
        entry.product_count += 1;
        entry.stock += u64::from(p.stock_units());
        entry.inventory_value += p.inventory_value();
    }
    let mut out: Vec<_> = groups.into_values().collect();
    out.sort_by(|a, b| b.product_count.cmp(&a.product_count));
    out
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LowStockEntry {
    pub id: EntityId,
    pub name: String,
    pub sku: String,
    pub stock: u32,
    pub category: String,
    /// Stock is at or below the reorder threshold.
    pub needs_reorder: bool,
}

/// The `limit` products with the least stock, ascending.
#[must_use]
pub fn low_stock(
    products: &[Product],
    index: &CategoryIndex,
    limit: usize,
    threshold: u32,
) -> Vec<LowStockEntry> {
    let mut sorted: Vec<&Product> = products.iter().collect();
    sorted.sort_by_key(|p| p.stock_units());
    sorted
        .into_iter()
        .take(limit)
        .map(|p| LowStockEntry {
            id: p.id.clone(),
            name: p.name.clone(),
            sku: p.sku.clone().unwrap_or_default(),
            stock: p.stock_units(),
            category: index
                .resolve_category(p)
                .map(|cid| index.category_label(&cid))
                .unwrap_or_default(),
            needs_reorder: p.stock_units() <= threshold,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Kpis {
    pub total_products: usize,
    /// Distinct resolved categories among the products.
    pub distinct_categories: usize,
    pub total_stock: u64,
    pub inventory_value: Decimal,
    pub last_added: Option<DateTime<Utc>>,
}

#[must_use]
pub fn kpis(products: &[Product], index: &CategoryIndex) -> Kpis {
    let categories: HashSet<EntityId> = products
        .iter()
        .filter_map(|p| index.resolve_category(p))
        .collect();
    Kpis {
        total_products: products.len(),
        distinct_categories: categories.len(),
        total_stock: products.iter().map(|p| u64::from(p.stock_units())).sum(),
        inventory_value: products.iter().map(Product::inventory_value).sum(),
        last_added: products.iter().filter_map(|p| p.created_at).max(),
    }
}

/// One row of the flat product export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductExportRow {
    pub position: usize,
    pub sku: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub subcategory: String,
    pub price: Decimal,
    pub discount_pct: Decimal,
    pub final_price: Decimal,
    pub stock: u32,
    pub line_value: Decimal,
    pub featured: bool,
    pub image_url: String,
    pub video_url: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[must_use]
pub fn export_rows(products: &[Product], index: &CategoryIndex) -> Vec<ProductExportRow> {
    products
        .iter()
        .enumerate()
        .map(|(i, p)| ProductExportRow {
            position: i + 1,
            sku: p.sku.clone().unwrap_or_default(),
            name: p.name.clone(),
            description: p.description.clone(),
            category: index
                .resolve_category(p)
                .map(|cid| index.category_label(&cid))
                .unwrap_or_default(),
            subcategory: p
                .subcategory_id
                .as_ref()
                .map(|sid| index.subcategory_label(sid))
                .unwrap_or_default(),
            price: p.price,
            discount_pct: p.discount_pct,
            final_price: p.final_price(),
            stock: p.stock_units(),
            line_value: p.inventory_value(),
            featured: p.featured,
            image_url: p.image_url.clone().unwrap_or_default(),
            video_url: p.video_url.clone().unwrap_or_default(),
            created_at: p.created_at,
            updated_at: p.updated_at,
        })
        .collect()
}

/// Every report section over one date-filtered product set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventoryReport {
    pub range: DateRange,
    pub kpis: Kpis,
    pub monthly: Vec<MonthCount>,
    pub categories: Vec<CategoryAggregate>,
    pub low_stock: Vec<LowStockEntry>,
}

impl InventoryReport {
    #[must_use]
    pub fn build(
        products: &[Product],
        index: &CategoryIndex,
        range: DateRange,
        low_stock_threshold: u32,
    ) -> Self {
        let scoped = filter_by_date(products, range);
        Self {
            range,
            kpis: kpis(&scoped, index),
            monthly: monthly_counts(&scoped),
            categories: category_breakdown(&scoped, index),
            low_stock: low_stock(&scoped, index, LOW_STOCK_LIMIT, low_stock_threshold),
        }
    }
}

#[cfg(test)]
#[path = "reports_test.rs"]
mod tests;
