//! WhatsApp checkout hand-off.
//!
//! Orders are not placed through the API: the cart is rendered into a
//! pre-filled WhatsApp message and the customer confirms the purchase in chat.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::cart::CartLine;

/// Characters `encodeURIComponent` leaves untouched.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Optional notes appended after the total.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutExtras {
    pub payment: Option<String>,
    pub delivery: Option<String>,
}

impl CheckoutExtras {
    /// The notes the storefront attaches by default.
    #[must_use]
    pub fn storefront_defaults() -> Self {
        Self {
            payment: Some("Efectivo/Transferencia".to_string()),
            delivery: Some("A coordinar".to_string()),
        }
    }
}

/// Both link flavours for one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhatsAppLinks {
    /// `api.whatsapp.com` form; keeps the text on desktop clients.
    pub primary: String,
    /// `wa.me` short form.
    pub fallback: String,
}

/// Strips everything but ASCII digits.
#[must_use]
pub fn normalize_phone(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

fn money(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{rounded:.2}")
}

#[must_use]
pub fn whatsapp_links(phone: &str, text: &str) -> WhatsAppLinks {
    let phone = normalize_phone(phone);
    let encoded = utf8_percent_encode(text, URI_COMPONENT).to_string();
    WhatsAppLinks {
        primary: format!("https://api.whatsapp.com/send?phone={phone}&text={encoded}"),
        fallback: format!("https://wa.me/{phone}?text={encoded}"),
    }
}

#[must_use]
pub fn whatsapp_link(phone: &str, text: &str) -> String {
    whatsapp_links(phone, text).primary
}

/// Renders the order confirmation message for `lines`.
///
/// Each line reads `• name [sku] xqty = $lineTotal`, priced at the product's
/// final price, followed by the total and any extras.
#[must_use]
pub fn checkout_message(lines: &[CartLine], extras: &CheckoutExtras) -> String {
    let total: Decimal = lines.iter().map(CartLine::line_total).sum();

    let mut text = String::from("Hola! Quiero confirmar compra:\n");
    for line in lines {
        let sku = line
            .product
            .sku
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(|s| format!(" [{s}]"))
            .unwrap_or_default();
        text.push_str(&format!(
            "\u{2022} {}{sku} x{} = ${}\n",
            line.product.name,
            line.qty,
            money(line.line_total())
        ));
    }
    text.push_str(&format!("Total: ${}", money(total)));

    if let Some(payment) = extras.payment.as_deref().filter(|s| !s.is_empty()) {
        text.push_str(&format!("\nPago: {payment}"));
    }
    if let Some(delivery) = extras.delivery.as_deref().filter(|s| !s.is_empty()) {
        text.push_str(&format!("\nEnvío: {delivery}"));
    }
    text
}

/// Deep link that opens WhatsApp with the checkout message for `lines`.
#[must_use]
pub fn cart_checkout_url(phone: &str, lines: &[CartLine], extras: &CheckoutExtras) -> String {
    whatsapp_link(phone, &checkout_message(lines, extras))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::products::Product;

    fn line(name: &str, sku: Option<&str>, price: Decimal, qty: u32) -> CartLine {
        let mut product = Product::new(name.to_lowercase(), name, price);
        product.sku = sku.map(str::to_string);
        CartLine { product, qty }
    }

    #[test]
    fn normalize_phone_keeps_digits_only() {
        assert_eq!(normalize_phone("+593 98-703 9983"), "593987039983");
        assert_eq!(normalize_phone(""), "");
    }

    #[test]
    fn message_lists_lines_total_and_extras() {
        let lines = vec![
            line("Taladro", Some("TAL-1"), Decimal::new(1050, 2), 2),
            line("Brocas", None, Decimal::new(3, 0), 1),
        ];
        let msg = checkout_message(&lines, &CheckoutExtras::storefront_defaults());
        assert_eq!(
            msg,
            "Hola! Quiero confirmar compra:\n\
             \u{2022} Taladro [TAL-1] x2 = $21.00\n\
             \u{2022} Brocas x1 = $3.00\n\
             Total: $24.00\n\
             Pago: Efectivo/Transferencia\n\
             Envío: A coordinar"
        );
    }

    #[test]
    fn message_uses_discounted_price() {
        let mut l = line("Sierra", None, Decimal::new(20, 0), 3);
        l.product.discount_pct = Decimal::new(25, 0);
        let msg = checkout_message(&[l], &CheckoutExtras::default());
        assert!(msg.contains("x3 = $45.00"));
        assert!(msg.ends_with("Total: $45.00"));
    }

    #[test]
    fn links_encode_like_uri_component() {
        let links = whatsapp_links("+593 987", "Hola! (a) b&c\n");
        assert_eq!(
            links.primary,
            "https://api.whatsapp.com/send?phone=593987&text=Hola!%20(a)%20b%26c%0A"
        );
        assert_eq!(links.fallback, "https://wa.me/593987?text=Hola!%20(a)%20b%26c%0A");
    }

    #[test]
    fn checkout_url_targets_configured_phone() {
        let url = cart_checkout_url(
            "593987039983",
            &[line("Taladro", None, Decimal::new(10, 0), 1)],
            &CheckoutExtras::default(),
        );
        assert!(url.starts_with("https://api.whatsapp.com/send?phone=593987039983&text=Hola!%20Quiero"));
        assert!(url.contains("Total%3A%20%2410.00"));
    }
}
