//! Client-side form validation and business-limit guards.
//!
//! These checks run before any request is sent. The server stays the
//! authority and may still reject what passes here.

use rust_decimal::Decimal;

use crate::error::CoreError;
use crate::products::EntityId;

/// Maximum number of categories the back-office lets you create.
pub const MAX_CATEGORIES: usize = 5;
/// Maximum number of products the back-office lets you create.
pub const MAX_PRODUCTS: usize = 50;
/// Largest accepted product image upload, in bytes.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Product form input, as typed by an administrator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductDraft {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub category_id: Option<EntityId>,
    pub subcategory_id: Option<EntityId>,
    pub price: Decimal,
    pub stock: i64,
    pub discount_pct: Decimal,
    pub featured: bool,
    pub video_url: Option<String>,
    pub image_url: Option<String>,
    /// Size of the image picked for upload, if any.
    pub image_size: Option<usize>,
}

fn is_http_url(raw: &str) -> bool {
    let rest = raw
        .strip_prefix("https://")
        .or_else(|| raw.strip_prefix("http://"));
    rest.is_some_and(|r| !r.is_empty() && !r.starts_with('/') && !r.contains(char::is_whitespace))
}

impl ProductDraft {
    /// Validates every field and reports all failures at once.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] listing each failing field.
    pub fn validate(&self) -> Result<(), CoreError> {
        let mut errors: Vec<(String, String)> = Vec::new();
        let mut fail = |field: &str, msg: &str| errors.push((field.to_string(), msg.to_string()));

        if self.code.trim().is_empty() {
            fail("code", "required");
        }
        if self.name.trim().chars().count() < 2 {
            fail("name", "at least 2 characters");
        }
        if self.category_id.as_ref().is_none_or(EntityId::is_empty) {
            fail("category_id", "select a category");
        }
        if self.subcategory_id.as_ref().is_none_or(EntityId::is_empty) {
            fail("subcategory_id", "select a subcategory");
        }
        if self.price < Decimal::ZERO {
            fail("price", "must be >= 0");
        }
        if self.stock < 0 {
            fail("stock", "must be >= 0");
        }
        if self.discount_pct < Decimal::ZERO || self.discount_pct > Decimal::ONE_HUNDRED {
            fail("discount_pct", "must be between 0 and 100");
        }
        for (field, url) in [("image_url", &self.image_url), ("video_url", &self.video_url)] {
            if let Some(url) = url.as_deref().filter(|u| !u.is_empty()) {
                if !is_http_url(url) {
                    fail(field, "invalid URL");
                }
            }
        }
        if self.image_size.is_some_and(|n| n > MAX_IMAGE_BYTES) {
            fail("image", "max 5 MB");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(CoreError::Validation(errors))
        }
    }

    /// Final price preview shown next to the form.
    #[must_use]
    pub fn final_price(&self) -> Decimal {
        crate::products::final_price(self.price, self.discount_pct)
    }
}

/// Blocks creating a category once [`MAX_CATEGORIES`] exist.
///
/// # Errors
///
/// Returns [`CoreError::LimitReached`] when the limit is already met.
pub fn ensure_can_create_category(existing: usize) -> Result<(), CoreError> {
    if existing >= MAX_CATEGORIES {
        return Err(CoreError::LimitReached {
            what: "categories",
            max: MAX_CATEGORIES,
        });
    }
    Ok(())
}

/// Blocks creating a product once [`MAX_PRODUCTS`] exist.
///
/// # Errors
///
/// Returns [`CoreError::LimitReached`] when the limit is already met.
pub fn ensure_can_create_product(existing: usize) -> Result<(), CoreError> {
    if existing >= MAX_PRODUCTS {
        return Err(CoreError::LimitReached {
            what: "products",
            max: MAX_PRODUCTS,
        });
    }
    Ok(())
}
