use bazar_core::{EntityId, Subcategory};
use reqwest::Method;
use serde_json::json;

use super::categories::required_name;
use super::ApiClient;
use crate::envelope::{first_array, first_value};
use crate::error::ClientError;
use crate::normalize::{normalize_list, normalize_subcategory};
use crate::types::RawSubcategory;

impl ApiClient {
    /// Lists all subcategories.
    ///
    /// # Errors
    ///
    /// Propagates transport and API errors from the request.
    pub async fn list_subcategories(&self) -> Result<Vec<Subcategory>, ClientError> {
        let env = self.get("subcategory", &[]).await?;
        let items = first_array(
            &env.data,
            &[
                "data.subCategory",
                "subCategory",
                "subcategories",
                "data",
                "",
            ],
        )
        .map(Vec::as_slice)
        .unwrap_or_default();
        Ok(normalize_list(items, "subcategory", |raw: RawSubcategory| {
            normalize_subcategory(raw, None)
        }))
    }

    /// Creates a subcategory under `category_id`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Core`] when the name is blank, and transport or
    /// API errors otherwise.
    pub async fn create_subcategory(
        &self,
        name: &str,
        category_id: &EntityId,
    ) -> Result<Option<Subcategory>, ClientError> {
        let name = required_name(name)?;
        let env = self
            .send_json(
                Method::POST,
                "subcategory",
                &json!({ "name": name, "category_id": category_id }),
            )
            .await?;
        tracing::info!(name, category = %category_id, "subcategory created");
        Ok(
            first_value(&env.data, &["subCategory", "subcategory", "data.subCategory"]).and_then(
                |v| {
                    serde_json::from_value::<RawSubcategory>(v.clone())
                        .ok()
                        .and_then(|raw| normalize_subcategory(raw, Some(category_id)).ok())
                },
            ),
        )
    }

    /// Renames a subcategory and/or moves it to another category.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Core`] when the name is blank, and transport or
    /// API errors otherwise.
    pub async fn update_subcategory(
        &self,
        id: &EntityId,
        name: &str,
        category_id: &EntityId,
    ) -> Result<(), ClientError> {
        let name = required_name(name)?;
        self.send_json(
            Method::PUT,
            &format!("subcategory/{id}"),
            &json!({ "name": name, "category_id": category_id }),
        )
        .await?;
        Ok(())
    }

    /// Deletes a subcategory.
    ///
    /// # Errors
    ///
    /// Propagates transport and API errors from the request.
    pub async fn delete_subcategory(&self, id: &EntityId) -> Result<(), ClientError> {
        self.delete(&format!("subcategory/{id}")).await?;
        tracing::info!(%id, "subcategory deleted");
        Ok(())
    }
}
