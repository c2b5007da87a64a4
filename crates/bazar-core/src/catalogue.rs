//! Catalogue facet filtering, sorting, and pagination.
//!
//! Everything here is a pure derivation over an in-memory product list. The
//! pipeline order is fixed: scope (subcategory, else category), search, price
//! bounds, discount/stock flags, sort, paginate.

use std::cmp::Ordering;
use std::collections::HashSet;

use rust_decimal::Decimal;

use crate::products::{Category, CategoryNode, EntityId, Product, Subcategory};

pub const DEFAULT_PER_PAGE: usize = 12;

/// Catalogue ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Keep the server order.
    #[default]
    Relevance,
    PriceAsc,
    PriceDesc,
    NameAsc,
    DiscountDesc,
}

impl std::str::FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "relevance" => Ok(Self::Relevance),
            "priceAsc" | "price-asc" => Ok(Self::PriceAsc),
            "priceDesc" | "price-desc" => Ok(Self::PriceDesc),
            "name" | "name-asc" => Ok(Self::NameAsc),
            "discount" | "discount-desc" => Ok(Self::DiscountDesc),
            other => Err(format!("unknown sort key \"{other}\"")),
        }
    }
}

/// The independent filter dimensions applied to the catalogue.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogueFilters {
    pub search: String,
    pub category: Option<EntityId>,
    /// Must be a child of `category` when both are set.
    pub subcategory: Option<EntityId>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub only_discounted: bool,
    pub only_in_stock: bool,
    pub sort: SortKey,
}

impl CatalogueFilters {
    /// `true` when any facet differs from its neutral value.
    #[must_use]
    pub fn has_active_filters(&self) -> bool {
        !self.search.trim().is_empty()
            || self.category.is_some()
            || self.subcategory.is_some()
            || self.min_price.is_some()
            || self.max_price.is_some()
            || self.only_discounted
            || self.only_in_stock
            || self.sort != SortKey::Relevance
    }
}

/// One page of a filtered result.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Matching items across all pages.
    pub total: usize,
    /// `ceil(total / per_page)`, never below 1.
    pub total_pages: usize,
    pub page: usize,
    pub per_page: usize,
}

/// Uses the server-provided tree when it has entries, otherwise groups the
/// flat subcategory list under the flat category list.
#[must_use]
pub fn effective_tree(
    tree: &[CategoryNode],
    categories: &[Category],
    subcategories: &[Subcategory],
) -> Vec<CategoryNode> {
    if !tree.is_empty() {
        return tree.to_vec();
    }
    categories
        .iter()
        .map(|c| CategoryNode {
            category: c.clone(),
            subcategories: subcategories
                .iter()
                .filter(|s| s.category_id.as_ref() == Some(&c.id))
                .cloned()
                .collect(),
        })
        .collect()
}

fn subcategories_of<'a>(tree: &'a [CategoryNode], category: &EntityId) -> &'a [Subcategory] {
    tree.iter()
        .find(|n| &n.category.id == category)
        .map(|n| n.subcategories.as_slice())
        .unwrap_or_default()
}

fn search_blob(p: &Product) -> String {
    format!(
        "{} {} {} {}",
        p.name,
        p.description,
        p.brand.as_deref().unwrap_or_default(),
        p.sku.as_deref().unwrap_or_default()
    )
    .to_lowercase()
}

/// Applies the scope, search, price, and flag facets, preserving input order.
#[must_use]
pub fn apply_filters(
    products: &[Product],
    filters: &CatalogueFilters,
    tree: &[CategoryNode],
) -> Vec<Product> {
    let sub_ids: HashSet<&EntityId> = filters
        .category
        .as_ref()
        .map(|c| subcategories_of(tree, c).iter().map(|s| &s.id).collect())
        .unwrap_or_default();
    let term = filters.search.trim().to_lowercase();

    products
        .iter()
        .filter(|p| match (&filters.subcategory, &filters.category) {
            (Some(sub), _) => p.subcategory_id.as_ref() == Some(sub),
            (None, Some(cat)) => match &p.category_id {
                Some(direct) => direct == cat,
                None => p
                    .subcategory_id
                    .as_ref()
                    .is_some_and(|sid| sub_ids.contains(sid)),
            },
            (None, None) => true,
        })
        .filter(|p| term.is_empty() || search_blob(p).contains(&term))
        .filter(|p| filters.min_price.is_none_or(|min| p.price >= min))
        .filter(|p| filters.max_price.is_none_or(|max| p.price <= max))
        .filter(|p| !filters.only_discounted || p.is_discounted())
        .filter(|p| !filters.only_in_stock || p.in_stock())
        .cloned()
        .collect()
}

/// Stable in-place sort; [`SortKey::Relevance`] leaves the order untouched.
pub fn sort_products(products: &mut [Product], key: SortKey) {
    let cmp: fn(&Product, &Product) -> Ordering = match key {
        SortKey::Relevance => return,
        SortKey::PriceAsc => |a, b| a.price.cmp(&b.price),
        SortKey::PriceDesc => |a, b| b.price.cmp(&a.price),
        SortKey::NameAsc => |a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.name.cmp(&b.name))
        },
        SortKey::DiscountDesc => |a, b| b.discount_pct.cmp(&a.discount_pct),
    };
    products.sort_by(cmp);
}

/// Slices out page `page` (1-based). Out-of-range pages yield no items; the
/// caller is responsible for clamping.
#[must_use]
pub fn paginate<T: Clone>(items: &[T], page: usize, per_page: usize) -> Page<T> {
    let per_page = per_page.max(1);
    let total = items.len();
    let total_pages = total.div_ceil(per_page).max(1);
    let start = page.saturating_sub(1).saturating_mul(per_page);
    let slice = items
        .get(start..)
        .map(|rest| rest.iter().take(per_page).cloned().collect())
        .unwrap_or_default();
    Page {
        items: slice,
        total,
        total_pages,
        page,
        per_page,
    }
}

/// Runs the full pipeline: filter, sort, paginate.
#[must_use]
pub fn query(
    products: &[Product],
    filters: &CatalogueFilters,
    tree: &[CategoryNode],
    page: usize,
    per_page: usize,
) -> Page<Product> {
    let mut filtered = apply_filters(products, filters, tree);
    sort_products(&mut filtered, filters.sort);
    paginate(&filtered, page, per_page)
}

/// Lowest and highest base price in `products`, or `(0, 0)` when empty.
#[must_use]
pub fn price_range(products: &[Product]) -> (Decimal, Decimal) {
    let min = products.iter().map(|p| p.price).min();
    let max = products.iter().map(|p| p.price).max();
    (min.unwrap_or_default(), max.unwrap_or_default())
}

/// Facet selection plus paging, with the transition rules the storefront
/// relies on: every facet change resets to page 1, and a subcategory that does
/// not belong to the selected category is dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogueState {
    filters: CatalogueFilters,
    page: usize,
    per_page: usize,
}

impl Default for CatalogueState {
    fn default() -> Self {
        Self {
            filters: CatalogueFilters::default(),
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl CatalogueState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn filters(&self) -> &CatalogueFilters {
        &self.filters
    }

    #[must_use]
    pub fn page(&self) -> usize {
        self.page
    }

    #[must_use]
    pub fn per_page(&self) -> usize {
        self.per_page
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.filters.search = term.into();
        self.page = 1;
    }

    /// Selects `category` (or all categories with `None`). A current
    /// subcategory survives only if it is a child of the new category.
    pub fn select_category(&mut self, category: Option<EntityId>, tree: &[CategoryNode]) {
        self.filters.category = category;
        self.retain_valid_subcategory(tree);
        self.page = 1;
    }

    /// Selects `subcategory`; it is cleared again if it does not belong to the
    /// selected category.
    pub fn select_subcategory(&mut self, subcategory: Option<EntityId>, tree: &[CategoryNode]) {
        self.filters.subcategory = subcategory;
        self.retain_valid_subcategory(tree);
        self.page = 1;
    }

    fn retain_valid_subcategory(&mut self, tree: &[CategoryNode]) {
        let (Some(cat), Some(sub)) = (&self.filters.category, &self.filters.subcategory) else {
            return;
        };
        if !subcategories_of(tree, cat).iter().any(|s| &s.id == sub) {
            tracing::debug!(category = %cat, subcategory = %sub, "clearing subcategory outside selected category");
            self.filters.subcategory = None;
        }
    }

    pub fn set_price_bounds(&mut self, min: Option<Decimal>, max: Option<Decimal>) {
        self.filters.min_price = min;
        self.filters.max_price = max;
        self.page = 1;
    }

    pub fn set_only_discounted(&mut self, on: bool) {
        self.filters.only_discounted = on;
        self.page = 1;
    }

    pub fn set_only_in_stock(&mut self, on: bool) {
        self.filters.only_in_stock = on;
        self.page = 1;
    }

    pub fn set_sort(&mut self, sort: SortKey) {
        self.filters.sort = sort;
        self.page = 1;
    }

    pub fn set_per_page(&mut self, per_page: usize) {
        self.per_page = per_page.max(1);
        self.page = 1;
    }

    /// Moves to `page` without touching any facet.
    pub fn set_page(&mut self, page: usize) {
        self.page = page;
    }

    /// Resets every facet and the page size.
    pub fn clear_all(&mut self) {
        *self = Self::default();
    }

    /// Runs [`query`] with the current facets and page.
    #[must_use]
    pub fn view(&self, products: &[Product], tree: &[CategoryNode]) -> Page<Product> {
        query(products, &self.filters, tree, self.page, self.per_page)
    }
}

#[cfg(test)]
#[path = "catalogue_test.rs"]
mod tests;
