//! Shopping cart state and its persisted store.
//!
//! [`Cart`] is the pure state machine: lines keyed by product id with
//! quantities clamped to `1..=product.max_qty()`. [`CartStore`] wraps it and
//! writes every mutation through to a [`KeyValueStore`] so the basket survives
//! restarts.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use crate::products::{EntityId, Product};
use crate::storage::KeyValueStore;

/// Storage key for the serialized cart lines.
pub const CART_STORAGE_KEY: &str = "cart-storage";

/// How [`Cart::add`] interprets its `amount`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddMode {
    /// Add `amount` (possibly negative) to the current quantity.
    #[default]
    Delta,
    /// Replace the current quantity with `amount`.
    Set,
}

/// Non-blocking notice raised by a cart mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartNotice {
    /// The requested quantity hit the product's ceiling and was clamped.
    MaxReached { product_name: String, max: u32 },
}

impl std::fmt::Display for CartNotice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MaxReached { product_name, max } => write!(
                f,
                "quantity for \"{product_name}\" adjusted to the available maximum ({max})"
            ),
        }
    }
}

/// Result of [`Cart::add`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddOutcome {
    /// Quantity of the line after the mutation.
    pub qty: u32,
    pub notice: Option<CartNotice>,
}

/// One product snapshot plus its quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub product: Product,
    pub qty: u32,
}

impl CartLine {
    /// `qty * final_price`, unrounded.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        Decimal::from(self.qty) * self.product.final_price()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    lines: Vec<CartLine>,
}

fn clamp_qty(requested: i64, max: u32) -> u32 {
    let clamped = requested.clamp(1, i64::from(max));
    u32::try_from(clamped).unwrap_or(max)
}

impl Cart {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_lines(lines: Vec<CartLine>) -> Self {
        Self { lines }
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn get(&self, id: &EntityId) -> Option<&CartLine> {
        self.lines.iter().find(|l| &l.product.id == id)
    }

    /// Sum of all quantities.
    #[must_use]
    pub fn total_units(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.qty)).sum()
    }

    /// Sum of every line's `qty * final_price`.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Adds or updates the line for `product`.
    ///
    /// The resulting quantity is clamped to `1..=product.max_qty()`; the
    /// ceiling is taken from the product passed in, so callers re-adding a
    /// fresher snapshot re-sync the limit. The stored snapshot itself is kept
    /// as first added. Returns `None` when the product has no id.
    pub fn add(&mut self, product: &Product, amount: i64, mode: AddMode) -> Option<AddOutcome> {
        if product.id.is_empty() {
            return None;
        }

        let max = product.max_qty();
        let existing = self.lines.iter().position(|l| l.product.id == product.id);

        let requested = match (mode, existing) {
            (AddMode::Delta, Some(idx)) => i64::from(self.lines[idx].qty).saturating_add(amount),
            (AddMode::Delta | AddMode::Set, _) => amount,
        };
        let qty = clamp_qty(requested, max);

        match existing {
            Some(idx) => self.lines[idx].qty = qty,
            None => self.lines.push(CartLine {
                product: product.clone(),
                qty,
            }),
        }

        let notice = (requested >= i64::from(max)).then(|| CartNotice::MaxReached {
            product_name: product.name.clone(),
            max,
        });
        if let Some(n) = &notice {
            tracing::info!(product_id = %product.id, max, "{n}");
        }

        Some(AddOutcome { qty, notice })
    }

    /// Deletes the line for `id`. Returns whether a line was removed.
    pub fn remove(&mut self, id: &EntityId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|l| &l.product.id != id);
        self.lines.len() != before
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

/// A [`Cart`] persisted under [`CART_STORAGE_KEY`] in a [`KeyValueStore`].
pub struct CartStore<S: KeyValueStore> {
    cart: Cart,
    storage: S,
}

impl<S: KeyValueStore> CartStore<S> {
    /// Restores the cart from `storage`.
    ///
    /// A stored value that no longer parses is logged and discarded so a
    /// schema change never locks the user out of their basket.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the storage medium cannot be read.
    pub fn load(storage: S) -> Result<Self, StorageError> {
        let cart = match storage.get(CART_STORAGE_KEY)? {
            Some(raw) => serde_json::from_str::<Cart>(&raw).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "discarding unreadable stored cart");
                Cart::new()
            }),
            None => Cart::new(),
        };
        tracing::debug!(lines = cart.len(), "cart restored");
        Ok(Self { cart, storage })
    }

    #[must_use]
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// See [`Cart::add`]. Persists after every successful mutation.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the updated cart cannot be written.
    pub fn add(
        &mut self,
        product: &Product,
        amount: i64,
        mode: AddMode,
    ) -> Result<Option<AddOutcome>, StorageError> {
        let outcome = self.cart.add(product, amount, mode);
        if outcome.is_some() {
            self.persist()?;
        }
        Ok(outcome)
    }

    /// # Errors
    ///
    /// Returns [`StorageError`] if the updated cart cannot be written.
    pub fn remove(&mut self, id: &EntityId) -> Result<bool, StorageError> {
        let removed = self.cart.remove(id);
        if removed {
            self.persist()?;
        }
        Ok(removed)
    }

    /// # Errors
    ///
    /// Returns [`StorageError`] if the emptied cart cannot be written.
    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.cart.clear();
        self.persist()
    }

    fn persist(&self) -> Result<(), StorageError> {
        let raw = serde_json::to_string(&self.cart).map_err(|source| StorageError::Serde {
            key: CART_STORAGE_KEY.to_string(),
            source,
        })?;
        self.storage.set(CART_STORAGE_KEY, &raw)
    }
}

#[cfg(test)]
#[path = "cart_test.rs"]
mod tests;
