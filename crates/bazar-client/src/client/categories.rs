use bazar_core::validation::ensure_can_create_category;
use bazar_core::{Category, CategoryNode, EntityId};
use reqwest::Method;
use serde_json::json;

use super::ApiClient;
use crate::envelope::{first_array, first_value};
use crate::error::ClientError;
use crate::normalize::{normalize_category, normalize_list, normalize_tree_node};
use crate::types::RawCategory;

impl ApiClient {
    /// Lists all categories.
    ///
    /// # Errors
    ///
    /// Propagates transport and API errors from the request.
    pub async fn list_categories(&self) -> Result<Vec<Category>, ClientError> {
        let env = self.get("category", &[]).await?;
        let items = first_array(&env.data, &["data.category", "category", "data", ""])
            .map(Vec::as_slice)
            .unwrap_or_default();
        Ok(normalize_list(items, "category", |raw: RawCategory| {
            normalize_category(&raw)
        }))
    }

    /// Fetches categories with their subcategories.
    ///
    /// # Errors
    ///
    /// Propagates transport and API errors from the request.
    pub async fn category_tree(&self) -> Result<Vec<CategoryNode>, ClientError> {
        let env = self.get("category/tree/", &[]).await?;
        let items = first_array(&env.data, &["", "categories", "category", "data"])
            .or_else(|| first_array(&env.raw, &["categories", "category"]))
            .map(Vec::as_slice)
            .unwrap_or_default();
        Ok(normalize_list(items, "category", normalize_tree_node))
    }

    /// Creates a category after checking the category limit.
    ///
    /// Returns the created category when the server echoes it back.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Core`] when the name is blank or the limit is
    /// reached, and transport or API errors otherwise.
    pub async fn create_category(&self, name: &str) -> Result<Option<Category>, ClientError> {
        let name = required_name(name)?;
        let existing = self.list_categories().await?.len();
        ensure_can_create_category(existing)?;

        let env = self
            .send_json(Method::POST, "category", &json!({ "name": name }))
            .await?;
        tracing::info!(name, "category created");
        Ok(
            first_value(&env.data, &["category", "data.category"]).and_then(|v| {
                serde_json::from_value::<RawCategory>(v.clone())
                    .ok()
                    .and_then(|raw| normalize_category(&raw).ok())
            }),
        )
    }

    /// Renames a category.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Core`] when the name is blank, and transport or
    /// API errors otherwise.
    pub async fn rename_category(&self, id: &EntityId, name: &str) -> Result<(), ClientError> {
        let name = required_name(name)?;
        self.send_json(
            Method::PUT,
            &format!("category/{id}"),
            &json!({ "name": name }),
        )
        .await?;
        Ok(())
    }

    /// Deletes a category.
    ///
    /// # Errors
    ///
    /// Propagates transport and API errors from the request.
    pub async fn delete_category(&self, id: &EntityId) -> Result<(), ClientError> {
        self.delete(&format!("category/{id}")).await?;
        tracing::info!(%id, "category deleted");
        Ok(())
    }
}

/// Trims `name` and rejects it when empty.
pub(crate) fn required_name(name: &str) -> Result<&str, ClientError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(bazar_core::CoreError::Validation(vec![(
            "name".to_string(),
            "required".to_string(),
        )])
        .into());
    }
    Ok(trimmed)
}
