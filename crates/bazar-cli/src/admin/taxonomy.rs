use bazar_core::{EntityId, MAX_CATEGORIES};

use super::{user_error, CategoryCommands, SubcategoryCommands};
use crate::context::AppContext;

/// # Errors
///
/// Returns an error if the request fails or the category limit is reached.
pub(crate) async fn run_category(ctx: &AppContext, command: CategoryCommands) -> anyhow::Result<()> {
    let client = &ctx.client;
    match command {
        CategoryCommands::List => {
            let tree = client.category_tree().await.map_err(|e| user_error(&e))?;
            println!("{} of {MAX_CATEGORIES} categories", tree.len());
            println!("{:<8}{:<30}SUBCATEGORIES", "ID", "NAME");
            for node in &tree {
                println!(
                    "{:<8}{:<30}{}",
                    node.category.id.as_str(),
                    node.category.name,
                    node.subcategories.len()
                );
            }
        }
        CategoryCommands::Create { name } => {
            let created = client
                .create_category(&name)
                .await
                .map_err(|e| user_error(&e))?;
            match created {
                Some(category) => println!("created category {} ({})", category.name, category.id),
                None => println!("created category {}", name.trim()),
            }
        }
        CategoryCommands::Rename { id, name } => {
            client
                .rename_category(&EntityId::new(id.as_str()), &name)
                .await
                .map_err(|e| user_error(&e))?;
            println!("renamed category {id}");
        }
        CategoryCommands::Delete { id } => {
            client
                .delete_category(&EntityId::new(id.as_str()))
                .await
                .map_err(|e| user_error(&e))?;
            println!("deleted category {id}");
        }
    }
    Ok(())
}

/// # Errors
///
/// Returns an error if the request fails.
pub(crate) async fn run_subcategory(
    ctx: &AppContext,
    command: SubcategoryCommands,
) -> anyhow::Result<()> {
    let client = &ctx.client;
    match command {
        SubcategoryCommands::List => {
            let (subcategories, categories) =
                tokio::try_join!(client.list_subcategories(), client.list_categories())
                    .map_err(|e| user_error(&e))?;
            println!("{:<8}{:<30}CATEGORY", "ID", "NAME");
            for sub in &subcategories {
                println!(
                    "{:<8}{:<30}{}",
                    sub.id.as_str(),
                    sub.name,
                    sub.parent_label(&categories)
                );
            }
        }
        SubcategoryCommands::Create { name, category } => {
            let created = client
                .create_subcategory(&name, &EntityId::new(category.as_str()))
                .await
                .map_err(|e| user_error(&e))?;
            match created {
                Some(sub) => println!("created subcategory {} ({})", sub.name, sub.id),
                None => println!("created subcategory {}", name.trim()),
            }
        }
        SubcategoryCommands::Update { id, name, category } => {
            client
                .update_subcategory(
                    &EntityId::new(id.as_str()),
                    &name,
                    &EntityId::new(category.as_str()),
                )
                .await
                .map_err(|e| user_error(&e))?;
            println!("updated subcategory {id}");
        }
        SubcategoryCommands::Delete { id } => {
            client
                .delete_subcategory(&EntityId::new(id.as_str()))
                .await
                .map_err(|e| user_error(&e))?;
            println!("deleted subcategory {id}");
        }
    }
    Ok(())
}
