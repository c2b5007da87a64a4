use bazar_client::{ImageUpload, ProductUpdate};
use bazar_core::{EntityId, ProductDraft, MAX_PRODUCTS};

use super::{user_error, ProductCommands};
use crate::context::{or_dash, AppContext};

/// # Errors
///
/// Returns an error if validation, the product limit, or the request fails.
#[allow(clippy::too_many_lines)]
pub(crate) async fn run_product(ctx: &AppContext, command: ProductCommands) -> anyhow::Result<()> {
    let client = &ctx.client;
    match command {
        ProductCommands::List { page, limit } => {
            let listing = client
                .list_products(page, limit)
                .await
                .map_err(|e| user_error(&e))?;
            println!("{} of {MAX_PRODUCTS} products", listing.total());
            println!("{:<8}{:<14}{:<32}{:>10}{:>7}", "ID", "SKU", "NAME", "PRICE", "STOCK");
            for p in &listing.products {
                let name: String = p.name.chars().take(30).collect();
                let stock = p.stock.map_or_else(String::new, |s| s.to_string());
                println!(
                    "{:<8}{:<14}{:<32}{:>10.2}{:>7}",
                    p.id.as_str(),
                    or_dash(p.sku.as_deref()),
                    name,
                    p.price,
                    stock
                );
            }
            if let Some(pagination) = &listing.pagination {
                println!("page {} of {}", pagination.page, pagination.pages.max(1));
            }
        }
        ProductCommands::Create {
            code,
            name,
            description,
            category,
            subcategory,
            price,
            stock,
            discount,
            featured,
            video,
            image,
        } => {
            let upload = ImageUpload::from_path(&image).map_err(|e| user_error(&e))?;
            let draft = ProductDraft {
                code,
                name,
                description,
                category_id: Some(EntityId::new(category)),
                subcategory_id: Some(EntityId::new(subcategory)),
                price,
                stock,
                discount_pct: discount,
                featured,
                video_url: video,
                image_url: None,
                image_size: Some(upload.bytes.len()),
            };
            println!("final price {:.2}", draft.final_price());
            let created = client
                .create_product(&draft, upload)
                .await
                .map_err(|e| user_error(&e))?;
            match created {
                Some(product) => println!("created product {} ({})", product.name, product.id),
                None => println!("created product {}", draft.name.trim()),
            }
        }
        ProductCommands::Update {
            id,
            code,
            name,
            description,
            category,
            subcategory,
            price,
            stock,
            discount,
            featured,
            video,
            image,
        } => {
            let update = ProductUpdate {
                code,
                name,
                description,
                price,
                stock,
                discount_pct: discount,
                featured,
                category_id: category.map(EntityId::new),
                subcategory_id: subcategory.map(EntityId::new),
                video_url: video,
            };
            let image = image
                .as_deref()
                .map(ImageUpload::from_path)
                .transpose()
                .map_err(|e| user_error(&e))?;
            if update.is_empty() && image.is_none() {
                anyhow::bail!("nothing to update; pass at least one field");
            }
            client
                .update_product(&EntityId::new(id.as_str()), update, image)
                .await
                .map_err(|e| user_error(&e))?;
            println!("updated product {id}");
        }
        ProductCommands::Delete { ids } => {
            let ids: Vec<EntityId> = ids.into_iter().map(EntityId::new).collect();
            client
                .delete_products(&ids)
                .await
                .map_err(|e| user_error(&e))?;
            println!("deleted {} product(s)", ids.len());
        }
    }
    Ok(())
}
