use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Display label for a subcategory whose parent category no longer exists.
pub const ORPHAN_LABEL: &str = "\u{2014}";

/// Cart ceiling used when a product carries neither a stock count nor an
/// explicit override.
pub const DEFAULT_MAX_QTY: u32 = 999;

/// Opaque identifier for products, categories, and subcategories.
///
/// The backend sends ids as JSON numbers or strings depending on the endpoint;
/// both collapse to the same string form so that `7` and `"7"` compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into().trim().to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for EntityId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<i64> for EntityId {
    fn from(value: i64) -> Self {
        Self(value.to_string())
    }
}

/// Computes the discounted unit price: `price * (1 - discount_pct / 100)`,
/// floored at zero. A non-positive discount leaves the price untouched.
#[must_use]
pub fn final_price(price: Decimal, discount_pct: Decimal) -> Decimal {
    if discount_pct <= Decimal::ZERO {
        return price.max(Decimal::ZERO);
    }
    let factor = Decimal::ONE - discount_pct / Decimal::ONE_HUNDRED;
    (price * factor).max(Decimal::ZERO)
}

/// A catalogue product in the single client-side shape every engine works on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    /// Units on hand. `None` when the backend did not report stock.
    #[serde(default)]
    pub stock: Option<u32>,
    /// Explicit cart ceiling; wins over `stock` when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_qty: Option<u32>,
    #[serde(default)]
    pub discount_pct: Decimal,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    /// Merchant code, shown as the SKU.
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub warranty: Option<String>,
    #[serde(default)]
    pub category_id: Option<EntityId>,
    #[serde(default)]
    pub subcategory_id: Option<EntityId>,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub subcategory_name: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Minimal product used as a starting point by builders and tests.
    #[must_use]
    pub fn new(id: impl Into<EntityId>, name: impl Into<String>, price: Decimal) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            price,
            stock: None,
            max_qty: None,
            discount_pct: Decimal::ZERO,
            featured: false,
            image_url: None,
            video_url: None,
            brand: None,
            sku: None,
            warranty: None,
            category_id: None,
            subcategory_id: None,
            category_name: None,
            subcategory_name: None,
            created_at: None,
            updated_at: None,
        }
    }

    /// Unit price after discount.
    #[must_use]
    pub fn final_price(&self) -> Decimal {
        final_price(self.price, self.discount_pct)
    }

    /// Stock for aggregation purposes; unknown stock counts as zero.
    #[must_use]
    pub fn stock_units(&self) -> u32 {
        self.stock.unwrap_or(0)
    }

    /// Upper bound for this product's cart quantity, never below 1.
    #[must_use]
    pub fn max_qty(&self) -> u32 {
        self.max_qty
            .or(self.stock)
            .map_or(DEFAULT_MAX_QTY, |n| n.max(1))
    }

    #[must_use]
    pub fn is_discounted(&self) -> bool {
        self.discount_pct > Decimal::ZERO
    }

    #[must_use]
    pub fn in_stock(&self) -> bool {
        self.stock_units() > 0
    }

    /// Inventory value of this product line: `stock * final_price`.
    #[must_use]
    pub fn inventory_value(&self) -> Decimal {
        Decimal::from(self.stock_units()) * self.final_price()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: EntityId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subcategory {
    pub id: EntityId,
    pub name: String,
    /// Owning category. `None` only for malformed server data.
    #[serde(default)]
    pub category_id: Option<EntityId>,
}

impl Subcategory {
    /// Name of the owning category, or [`ORPHAN_LABEL`] when the parent is
    /// missing from `categories`.
    #[must_use]
    pub fn parent_label<'a>(&self, categories: &'a [Category]) -> &'a str {
        self.category_id
            .as_ref()
            .and_then(|cid| categories.iter().find(|c| &c.id == cid))
            .map_or(ORPHAN_LABEL, |c| c.name.as_str())
    }
}

/// A category together with its subcategories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryNode {
    #[serde(flatten)]
    pub category: Category,
    #[serde(default)]
    pub subcategories: Vec<Subcategory>,
}

impl CategoryNode {
    #[must_use]
    pub fn contains_subcategory(&self, id: &EntityId) -> bool {
        self.subcategories.iter().any(|s| &s.id == id)
    }
}

/// Authenticated back-office user as reported by the verification endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: Option<EntityId>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}
