//! Local cart commands and the WhatsApp checkout hand-off.

use bazar_core::checkout::{checkout_message, whatsapp_links, CheckoutExtras};
use bazar_core::{AddMode, EntityId};
use clap::Subcommand;

use crate::context::AppContext;

/// Sub-commands available under `cart`.
#[derive(Debug, Subcommand)]
pub enum CartCommands {
    /// List cart lines and the subtotal
    Show,
    /// Add a product, or change its quantity
    Add {
        /// Product id
        id: String,
        /// Units to add (negative to remove units)
        #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
        qty: i64,
        /// Replace the line quantity instead of adding to it
        #[arg(long)]
        set: bool,
    },
    /// Remove a product from the cart
    Remove {
        /// Product id
        id: String,
    },
    /// Empty the cart
    Clear,
    /// Print the WhatsApp link that hands the order to the seller
    Checkout {
        /// Payment note appended to the message
        #[arg(long)]
        payment: Option<String>,
        /// Delivery note appended to the message
        #[arg(long)]
        delivery: Option<String>,
        /// Send only the lines and total, without payment or delivery notes
        #[arg(long, conflicts_with_all = ["payment", "delivery"])]
        bare: bool,
    },
}

/// Dispatch a `cart` sub-command.
///
/// # Errors
///
/// Returns an error if the cart cannot be read or written, or a product
/// lookup fails.
pub(crate) async fn run_cart(ctx: &AppContext, command: CartCommands) -> anyhow::Result<()> {
    let mut store = ctx.cart_store()?;
    match command {
        CartCommands::Show => {
            let cart = store.cart();
            if cart.is_empty() {
                println!("cart is empty");
                return Ok(());
            }
            println!("{:<8}{:<34}{:>6}{:>12}", "ID", "PRODUCT", "QTY", "LINE");
            for line in cart.lines() {
                let name: String = line.product.name.chars().take(32).collect();
                println!(
                    "{:<8}{:<34}{:>6}{:>12.2}",
                    line.product.id.as_str(),
                    name,
                    line.qty,
                    line.line_total()
                );
            }
            println!(
                "{} units, subtotal {:.2}",
                cart.total_units(),
                cart.subtotal()
            );
        }
        CartCommands::Add { id, qty, set } => {
            let id = EntityId::new(id);
            let current = store.cart().get(&id).map(|line| line.qty);
            if decrement_empties_line(current, qty, set) {
                store.remove(&id)?;
                println!("removed {}", id.as_str());
                return Ok(());
            }
            let product = ctx.client.get_product(&id).await?;
            let mode = if set { AddMode::Set } else { AddMode::Delta };
            match store.add(&product, qty, mode)? {
                Some(outcome) => {
                    println!("{} x{}", product.name, outcome.qty);
                    if let Some(notice) = outcome.notice {
                        println!("{notice}");
                    }
                }
                None => println!("product has no id; nothing added"),
            }
        }
        CartCommands::Remove { id } => {
            if store.remove(&EntityId::new(id.as_str()))? {
                println!("removed {id}");
            } else {
                println!("{id} is not in the cart");
            }
        }
        CartCommands::Clear => {
            store.clear()?;
            println!("cart cleared");
        }
        CartCommands::Checkout {
            payment,
            delivery,
            bare,
        } => {
            let cart = store.cart();
            if cart.is_empty() {
                anyhow::bail!("cart is empty; add products before checking out");
            }
            let extras = checkout_extras(payment, delivery, bare);
            let message = checkout_message(cart.lines(), &extras);
            let links = whatsapp_links(&ctx.config.whatsapp_phone, &message);
            println!("{message}");
            println!();
            println!("Open: {}", links.primary);
            println!("Alt:  {}", links.fallback);
            tracing::info!(lines = cart.len(), "checkout link generated");
        }
    }
    Ok(())
}

/// A relative change that takes an existing line to zero or below drops
/// the line; the cart itself never goes under one unit.
pub(crate) fn decrement_empties_line(current: Option<u32>, delta: i64, set: bool) -> bool {
    match current {
        Some(qty) if !set => i64::from(qty) + delta <= 0,
        _ => false,
    }
}

/// Explicit notes override the storefront defaults one by one.
pub(crate) fn checkout_extras(
    payment: Option<String>,
    delivery: Option<String>,
    bare: bool,
) -> CheckoutExtras {
    if bare {
        return CheckoutExtras::default();
    }
    let defaults = CheckoutExtras::storefront_defaults();
    CheckoutExtras {
        payment: payment.or(defaults.payment),
        delivery: delivery.or(defaults.delivery),
    }
}
