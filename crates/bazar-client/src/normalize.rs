//! Normalization from raw backend records to [`bazar_core`] domain types.
//!
//! This is the only place that knows about the backend's duplicate field
//! names. Precedence within each alias group follows the order listed in
//! [`crate::types`].

use std::str::FromStr;

use bazar_core::{Category, CategoryNode, EntityId, Product, Subcategory, User};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ClientError;
use crate::types::{RawCategory, RawProduct, RawRef, RawSubcategory, RawUser, Scalar};

const DEFAULT_PRODUCT_NAME: &str = "Producto";

/// Normalizes a raw product record.
///
/// # Errors
///
/// Returns [`ClientError::Normalization`] if the record has no usable id.
pub fn normalize_product(raw: RawProduct) -> Result<Product, ClientError> {
    let id = raw
        .id
        .as_ref()
        .and_then(scalar_id)
        .ok_or_else(|| ClientError::Normalization {
            entity: "product",
            reason: "missing id".into(),
        })?;

    let name = first_text([raw.nombre, raw.name]).unwrap_or_else(|| DEFAULT_PRODUCT_NAME.into());
    let price = first_some([raw.precio.as_ref(), raw.price.as_ref()], scalar_decimal)
        .unwrap_or(Decimal::ZERO);

    let mut product = Product::new(id, name, price);
    product.description =
        first_text([raw.descripcion_detallada, raw.descripcion, raw.description])
            .unwrap_or_default();
    product.stock = raw.stock.as_ref().and_then(scalar_u32);
    product.max_qty = raw.max_qty.as_ref().and_then(scalar_u32);
    product.discount_pct = first_some(
        [raw.discount_pct.as_ref(), raw.discount_pct_camel.as_ref()],
        scalar_decimal,
    )
    .unwrap_or(Decimal::ZERO);
    product.featured = first_some(
        [
            raw.feature.as_ref(),
            raw.destacado.as_ref(),
            raw.featured.as_ref(),
        ],
        scalar_bool,
    )
    .unwrap_or(false);
    product.image_url = first_text([raw.url_imagen, raw.image_url_snake, raw.image_url]);
    product.video_url = first_text([raw.url_video, raw.video_url_snake, raw.video_url]);
    product.brand = first_text([raw.marca, raw.brand]);
    product.sku = first_some([raw.code.as_ref(), raw.sku.as_ref()], scalar_text);
    product.warranty = first_text([raw.garantia, raw.warranty]);

    product.category_id = first_some(
        [
            raw.category_id.as_ref(),
            raw.category_id_camel.as_ref(),
            raw.categoria_id.as_ref(),
            ref_id(raw.category.as_ref()),
            ref_id(raw.categoria.as_ref()),
        ],
        scalar_id,
    );
    product.category_name = first_text([
        ref_name(raw.category.as_ref()),
        ref_name(raw.categoria.as_ref()),
        raw.categoria_nombre,
        raw.category_name,
    ]);

    product.subcategory_id = first_some(
        [
            raw.subcategoria_id.as_ref(),
            raw.subcategory_id.as_ref(),
            raw.sub_category_id_camel.as_ref(),
            raw.subcategory_id_camel.as_ref(),
            ref_id(raw.subcategory.as_ref()),
            ref_id(raw.subcategoria.as_ref()),
        ],
        scalar_id,
    );
    product.subcategory_name = first_text([
        ref_name(raw.subcategory.as_ref()),
        ref_name(raw.subcategoria.as_ref()),
        raw.subcategoria_nombre,
        raw.subcategory_name,
    ]);

    product.created_at = raw.created_at.as_ref().and_then(scalar_datetime);
    product.updated_at = raw.updated_at.as_ref().and_then(scalar_datetime);

    Ok(product)
}

/// Normalizes a raw category record, ignoring any embedded subcategories.
///
/// # Errors
///
/// Returns [`ClientError::Normalization`] if the record has no usable id.
pub fn normalize_category(raw: &RawCategory) -> Result<Category, ClientError> {
    let id = raw
        .id
        .as_ref()
        .and_then(scalar_id)
        .ok_or_else(|| ClientError::Normalization {
            entity: "category",
            reason: "missing id".into(),
        })?;
    let name = first_text([raw.name.clone(), raw.nombre.clone()]).unwrap_or_default();
    Ok(Category { id, name })
}

/// Normalizes a raw subcategory record.
///
/// `parent` is used when the record itself carries no category id, as
/// happens inside the tree endpoint.
///
/// # Errors
///
/// Returns [`ClientError::Normalization`] if the record has no usable id.
pub fn normalize_subcategory(
    raw: RawSubcategory,
    parent: Option<&EntityId>,
) -> Result<Subcategory, ClientError> {
    let id = raw
        .id
        .as_ref()
        .and_then(scalar_id)
        .ok_or_else(|| ClientError::Normalization {
            entity: "subcategory",
            reason: "missing id".into(),
        })?;
    let category_id = first_some(
        [
            raw.category_id.as_ref(),
            raw.category_id_camel.as_ref(),
            raw.categoria_id.as_ref(),
        ],
        scalar_id,
    )
    .or_else(|| parent.cloned());
    Ok(Subcategory {
        id,
        name: first_text([raw.name, raw.nombre]).unwrap_or_default(),
        category_id,
    })
}

/// Normalizes one node of the category tree.
///
/// # Errors
///
/// Returns [`ClientError::Normalization`] if the category has no usable id.
/// Subcategories without an id are skipped with a warning.
pub fn normalize_tree_node(raw: RawCategory) -> Result<CategoryNode, ClientError> {
    let category = normalize_category(&raw)?;
    let children = raw
        .sub_categories
        .or(raw.subcategories)
        .or(raw.sub_cats)
        .unwrap_or_default();
    let subcategories = children
        .into_iter()
        .filter_map(
            |child| match normalize_subcategory(child, Some(&category.id)) {
                Ok(sub) => Some(sub),
                Err(e) => {
                    tracing::warn!(category = %category.id, error = %e, "skipping subcategory");
                    None
                }
            },
        )
        .collect();
    Ok(CategoryNode {
        category,
        subcategories,
    })
}

#[must_use]
pub fn normalize_user(raw: RawUser) -> User {
    User {
        id: raw.id.as_ref().and_then(scalar_id),
        username: raw.username.filter(|s| !s.trim().is_empty()),
        role: raw.role.filter(|s| !s.trim().is_empty()),
    }
}

/// Decodes each element of `items` as `R` and normalizes it with `f`.
///
/// Elements that fail either step are skipped with a warning, so a single
/// malformed record never hides the rest of a listing.
pub fn normalize_list<R, T>(
    items: &[Value],
    entity: &'static str,
    f: impl Fn(R) -> Result<T, ClientError>,
) -> Vec<T>
where
    R: DeserializeOwned,
{
    items
        .iter()
        .enumerate()
        .filter_map(|(idx, item)| {
            let raw = match serde_json::from_value::<R>(item.clone()) {
                Ok(raw) => raw,
                Err(e) => {
                    tracing::warn!(entity, idx, error = %e, "skipping undecodable record");
                    return None;
                }
            };
            match f(raw) {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::warn!(entity, idx, error = %e, "skipping record");
                    None
                }
            }
        })
        .collect()
}

/// Decodes a single record, mapping serde failures to [`ClientError::Deserialize`].
///
/// # Errors
///
/// Returns [`ClientError::Deserialize`] if `value` does not fit `R`.
pub fn decode<R: DeserializeOwned>(value: &Value, context: &str) -> Result<R, ClientError> {
    serde_json::from_value(value.clone()).map_err(|e| ClientError::Deserialize {
        context: context.to_string(),
        source: e,
    })
}

fn first_text<const N: usize>(candidates: [Option<String>; N]) -> Option<String> {
    candidates
        .into_iter()
        .flatten()
        .map(|s| s.trim().to_string())
        .find(|s| !s.is_empty())
}

fn first_some<'a, T, const N: usize>(
    candidates: [Option<&'a Scalar>; N],
    parse: impl Fn(&'a Scalar) -> Option<T>,
) -> Option<T> {
    candidates.into_iter().flatten().find_map(parse)
}

fn ref_id(r: Option<&RawRef>) -> Option<&Scalar> {
    r.and_then(|r| r.id.as_ref())
}

fn ref_name(r: Option<&RawRef>) -> Option<String> {
    r.and_then(|r| r.name.clone().or_else(|| r.nombre.clone()))
}

fn scalar_text(s: &Scalar) -> Option<String> {
    let text = match s {
        Scalar::Str(v) => v.trim().to_string(),
        Scalar::Int(v) => v.to_string(),
        Scalar::Float(v) => v.to_string(),
        Scalar::Bool(_) | Scalar::Other(_) => return None,
    };
    (!text.is_empty()).then_some(text)
}

fn scalar_id(s: &Scalar) -> Option<EntityId> {
    scalar_text(s).map(EntityId::new)
}

pub(crate) fn scalar_decimal(s: &Scalar) -> Option<Decimal> {
    match s {
        Scalar::Int(v) => Some(Decimal::from(*v)),
        Scalar::Float(v) => Decimal::try_from(*v).ok(),
        Scalar::Str(v) => Decimal::from_str(v.trim()).ok(),
        Scalar::Bool(_) | Scalar::Other(_) => None,
    }
}

fn scalar_u32(s: &Scalar) -> Option<u32> {
    match s {
        Scalar::Int(v) => u32::try_from((*v).max(0)).ok(),
        Scalar::Float(_) | Scalar::Str(_) => {
            let d = scalar_decimal(s)?;
            if d.is_sign_negative() {
                return Some(0);
            }
            d.trunc().to_u32()
        }
        Scalar::Bool(_) | Scalar::Other(_) => None,
    }
}

fn scalar_bool(s: &Scalar) -> Option<bool> {
    match s {
        Scalar::Bool(v) => Some(*v),
        Scalar::Int(v) => Some(*v != 0),
        Scalar::Float(v) => Some(*v != 0.0),
        Scalar::Str(v) => match v.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "si" | "sí" => Some(true),
            "false" | "0" | "no" | "" => Some(false),
            _ => None,
        },
        Scalar::Other(_) => None,
    }
}

/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS`, bare dates and epoch milliseconds.
fn scalar_datetime(s: &Scalar) -> Option<DateTime<Utc>> {
    match s {
        Scalar::Int(ms) => Utc.timestamp_millis_opt(*ms).single(),
        Scalar::Str(v) => {
            let v = v.trim();
            if let Ok(dt) = DateTime::parse_from_rfc3339(v) {
                return Some(dt.with_timezone(&Utc));
            }
            if let Ok(naive) = NaiveDateTime::parse_from_str(v, "%Y-%m-%d %H:%M:%S") {
                return Some(naive.and_utc());
            }
            NaiveDate::parse_from_str(v, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|naive| naive.and_utc())
        }
        Scalar::Bool(_) | Scalar::Float(_) | Scalar::Other(_) => None,
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
