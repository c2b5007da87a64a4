use std::path::Path;

use bazar_core::validation::ensure_can_create_product;
use bazar_core::{EntityId, Product, ProductDraft, MAX_PRODUCTS};
use futures::future::try_join_all;
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;

use super::ApiClient;
use crate::envelope::{first_array, first_value, ApiEnvelope};
use crate::error::ClientError;
use crate::normalize::{decode, normalize_list, normalize_product};
use crate::types::{Pagination, RawProduct};

/// One page of products plus the server's pagination block, if it sent one.
#[derive(Debug, Clone)]
pub struct ProductPage {
    pub products: Vec<Product>,
    pub pagination: Option<Pagination>,
}

impl ProductPage {
    /// Total product count: the server's figure when present, else the page length.
    #[must_use]
    pub fn total(&self) -> usize {
        let listed = self.products.len();
        self.pagination
            .as_ref()
            .and_then(|p| usize::try_from(p.total).ok())
            .map_or(listed, |total| total.max(listed))
    }
}

/// An image file attached to a product create or update.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub content_type: String,
}

impl ImageUpload {
    /// Reads an image from disk, guessing the content type from its extension.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Upload`] if the file cannot be read.
    pub fn from_path(path: &Path) -> Result<Self, ClientError> {
        let bytes = std::fs::read(path).map_err(|e| ClientError::Upload {
            path: path.display().to_string(),
            source: e,
        })?;
        let file_name = path
            .file_name()
            .map_or_else(|| "image".to_string(), |n| n.to_string_lossy().into_owned());
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        let content_type = match ext.as_str() {
            "jpg" | "jpeg" => "image/jpeg",
            "png" => "image/png",
            "webp" => "image/webp",
            "gif" => "image/gif",
            _ => "application/octet-stream",
        };
        Ok(Self {
            file_name,
            bytes,
            content_type: content_type.to_string(),
        })
    }

    fn into_part(self) -> Result<Part, ClientError> {
        Ok(Part::bytes(self.bytes)
            .file_name(self.file_name)
            .mime_str(&self.content_type)?)
    }
}

/// Partial product update. `None` fields are left untouched on the server.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProductUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(rename = "nombre", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "descripcion", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        rename = "precio",
        with = "rust_decimal::serde::str_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
    #[serde(
        with = "rust_decimal::serde::str_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub discount_pct: Option<Decimal>,
    #[serde(rename = "feature", skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<EntityId>,
    #[serde(rename = "subcategoria_id", skip_serializing_if = "Option::is_none")]
    pub subcategory_id: Option<EntityId>,
    #[serde(rename = "urlVideo", skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
}

impl ProductUpdate {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        serde_json::to_value(self)
            .ok()
            .and_then(|v| v.as_object().map(serde_json::Map::is_empty))
            .unwrap_or(true)
    }

    /// The same fields as multipart text parts.
    fn into_form(self) -> Form {
        let fields = serde_json::to_value(&self).unwrap_or(Value::Null);
        let mut form = Form::new();
        if let Some(map) = fields.as_object() {
            for (key, value) in map {
                let text = match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                form = form.text(key.clone(), text);
            }
        }
        form
    }
}

impl ApiClient {
    /// Lists one page of products.
    ///
    /// # Errors
    ///
    /// Propagates transport and API errors from the request. Individual
    /// records that cannot be normalized are skipped.
    pub async fn list_products(&self, page: u32, limit: u32) -> Result<ProductPage, ClientError> {
        let env = self
            .get(
                "products",
                &[("page", page.to_string()), ("limit", limit.to_string())],
            )
            .await?;
        Ok(product_page(&env))
    }

    /// Fetches one product, trying `/products/id/{id}` then `/product/id/{id}`.
    ///
    /// # Errors
    ///
    /// Returns the error of the second attempt when both fail. A 401/403 on
    /// the first attempt is returned immediately.
    pub async fn get_product(&self, id: &EntityId) -> Result<Product, ClientError> {
        let env = match self.get(&format!("products/id/{id}"), &[]).await {
            Ok(env) => env,
            Err(e) if e.is_unauthorized() => return Err(e),
            Err(e) => {
                tracing::debug!(%id, error = %e, "primary product lookup failed, trying legacy path");
                self.get(&format!("product/id/{id}"), &[]).await?
            }
        };
        let raw: RawProduct = decode(single_product(&env), &format!("product {id}"))?;
        normalize_product(raw)
    }

    /// Creates a product with its image as a multipart upload.
    ///
    /// The draft is validated and the product limit checked before anything
    /// is sent. Returns the created product when the server echoes it back.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Core`] on validation or limit failures, and
    /// transport or API errors otherwise.
    pub async fn create_product(
        &self,
        draft: &ProductDraft,
        image: ImageUpload,
    ) -> Result<Option<Product>, ClientError> {
        let mut checked = draft.clone();
        checked.image_size = Some(image.bytes.len());
        checked.validate()?;

        let existing = self.list_products(1, guard_page_limit()).await?.total();
        ensure_can_create_product(existing)?;

        let form = draft_form(draft).part("image", image.into_part()?);
        let env = self.send_multipart(Method::POST, "products", form).await?;
        tracing::info!(code = %draft.code, "product created");
        Ok(echoed_product(&env))
    }

    /// Updates a product. With an image the update goes out as multipart,
    /// otherwise as JSON.
    ///
    /// # Errors
    ///
    /// Propagates transport and API errors from the request.
    pub async fn update_product(
        &self,
        id: &EntityId,
        update: ProductUpdate,
        image: Option<ImageUpload>,
    ) -> Result<Option<Product>, ClientError> {
        let path = format!("products/{id}");
        let env = match image {
            Some(image) => {
                let form = update.into_form().part("image", image.into_part()?);
                self.send_multipart(Method::PUT, &path, form).await?
            }
            None => self.send_json(Method::PUT, &path, &update).await?,
        };
        Ok(echoed_product(&env))
    }

    /// Deletes one product.
    ///
    /// # Errors
    ///
    /// Propagates transport and API errors from the request.
    pub async fn delete_product(&self, id: &EntityId) -> Result<(), ClientError> {
        self.delete(&format!("products/{id}")).await?;
        tracing::info!(%id, "product deleted");
        Ok(())
    }

    /// Deletes several products concurrently. The first failure aborts the
    /// batch result, though requests already in flight may still complete.
    ///
    /// # Errors
    ///
    /// Returns the first error encountered.
    pub async fn delete_products(&self, ids: &[EntityId]) -> Result<(), ClientError> {
        try_join_all(ids.iter().map(|id| self.delete_product(id))).await?;
        Ok(())
    }
}

fn guard_page_limit() -> u32 {
    u32::try_from(MAX_PRODUCTS + 1).unwrap_or(u32::MAX)
}

fn product_page(env: &ApiEnvelope) -> ProductPage {
    let items = first_array(&env.data, &["products", "data.products", ""])
        .or_else(|| first_array(&env.raw, &["products"]))
        .map(Vec::as_slice)
        .unwrap_or_default();
    let products = normalize_list(items, "product", normalize_product);
    let pagination = first_value(&env.data, &["pagination", "data.pagination"])
        .or(env.meta.as_ref())
        .and_then(|p| match serde_json::from_value::<Pagination>(p.clone()) {
            Ok(p) => Some(p),
            Err(e) => {
                tracing::warn!(error = %e, "ignoring malformed pagination block");
                None
            }
        });
    ProductPage {
        products,
        pagination,
    }
}

/// `{product: {...}}` inside the (possibly double-wrapped) payload, or the payload itself.
fn single_product(env: &ApiEnvelope) -> &Value {
    let payload = env.payload();
    payload
        .get("product")
        .filter(|p| !p.is_null())
        .unwrap_or(payload)
}

fn echoed_product(env: &ApiEnvelope) -> Option<Product> {
    let value = single_product(env);
    if !value.is_object() {
        return None;
    }
    serde_json::from_value::<RawProduct>(value.clone())
        .ok()
        .and_then(|raw| normalize_product(raw).ok())
}

fn draft_form(draft: &ProductDraft) -> Form {
    let id_text = |id: &Option<EntityId>| id.as_ref().map(ToString::to_string).unwrap_or_default();
    Form::new()
        .text("code", draft.code.trim().to_string())
        .text("nombre", draft.name.trim().to_string())
        .text("descripcion", draft.description.clone().unwrap_or_default())
        .text("precio", draft.price.to_string())
        .text("stock", draft.stock.max(0).to_string())
        .text("discount_pct", draft.discount_pct.to_string())
        .text("feature", draft.featured.to_string())
        .text("category_id", id_text(&draft.category_id))
        .text("subcategoria_id", id_text(&draft.subcategory_id))
        .text("urlVideo", draft.video_url.clone().unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn product_page_reads_products_and_pagination() {
        let env = ApiEnvelope::from_body(json!({
            "status": "success",
            "data": {
                "products": [{"id": 1, "nombre": "A"}, {"id": 2, "nombre": "B"}],
                "pagination": {"page": 2, "limit": 2, "total": 9, "pages": 5, "hasNext": true, "hasPrev": true}
            }
        }));
        let page = product_page(&env);
        assert_eq!(page.products.len(), 2);
        let pagination = page.pagination.unwrap();
        assert_eq!(pagination.page, 2);
        assert_eq!(pagination.total, 9);
        assert!(pagination.has_next);
    }

    #[test]
    fn product_page_total_prefers_server_count() {
        let page = ProductPage {
            products: vec![Product::new("1", "A", Decimal::ONE)],
            pagination: Some(Pagination {
                page: 1,
                limit: 1,
                total: 40,
                pages: 40,
                has_next: true,
                has_prev: false,
            }),
        };
        assert_eq!(page.total(), 40);

        let bare = ProductPage {
            products: page.products.clone(),
            pagination: None,
        };
        assert_eq!(bare.total(), 1);
    }

    #[test]
    fn single_product_unwraps_all_shapes() {
        for body in [
            json!({"data": {"data": {"product": {"id": 5}}}}),
            json!({"data": {"product": {"id": 5}}}),
            json!({"data": {"id": 5}}),
        ] {
            let env = ApiEnvelope::from_body(body);
            assert_eq!(single_product(&env)["id"], 5);
        }
    }

    #[test]
    fn update_serializes_server_keys_only_for_set_fields() {
        let update = ProductUpdate {
            name: Some("Nuevo".into()),
            price: Some(Decimal::new(1050, 2)),
            featured: Some(false),
            ..ProductUpdate::default()
        };
        let value = serde_json::to_value(&update).unwrap();
        assert_eq!(
            value,
            json!({"nombre": "Nuevo", "precio": "10.50", "feature": false})
        );
        assert!(!update.is_empty());
        assert!(ProductUpdate::default().is_empty());
    }
}
