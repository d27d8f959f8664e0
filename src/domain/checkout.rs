//! Checkout: validates the order form and builds the WhatsApp link.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Deserialize;
use thiserror::Error;
use validator::Validate;

use crate::domain::cart::Cart;
use crate::domain::directory::ProductDirectory;
use crate::domain::value_objects::Money;

/// Shipping label whose selection skips the address step.
pub const STORE_PICKUP: &str = "Retiro en el local";

/// Characters `encodeURIComponent` leaves verbatim; everything else is
/// percent-encoded.
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

/// The checkout form in one piece. A missing required field rejects the
/// whole request, so no partial order ever reaches the message builder.
#[derive(Clone, Debug, Default, Deserialize, Validate)]
pub struct CheckoutRequest {
    #[serde(default)]
    pub shipping_option: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Falta el nombre del cliente."))]
    pub customer_name: String,
    /// Street and number; required unless picking up at the store.
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub locality: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    #[error("El carrito está vacío.")]
    EmptyCart,
    #[error("Seleccioná una opción de envío en el carrito antes de iniciar la compra.")]
    MissingShipping,
    #[error("Falta el nombre del cliente.")]
    MissingName,
    #[error("Faltan los datos de dirección del cliente.")]
    MissingAddress,
}

/// A validated order, ready to serialize into the WhatsApp message. Building
/// one reads the cart and directory but never mutates either.
#[derive(Clone, Debug)]
pub struct CheckoutOrder {
    customer_name: String,
    shipping_option: String,
    address: Option<String>,
    lines: Vec<OrderLine>,
    total: Money,
}

#[derive(Clone, Debug)]
struct OrderLine {
    quantity: u32,
    name: String,
    subtotal: Money,
}

impl CheckoutOrder {
    pub fn build(
        cart: &Cart,
        directory: &ProductDirectory,
        request: &CheckoutRequest,
    ) -> Result<Self, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let shipping_option = request.shipping_option.trim();
        if shipping_option.is_empty() {
            return Err(CheckoutError::MissingShipping);
        }

        let customer_name = request.customer_name.trim();
        if customer_name.is_empty() {
            return Err(CheckoutError::MissingName);
        }

        let address = if shipping_option == STORE_PICKUP {
            None
        } else {
            let street = request.street.as_deref().map_or("", str::trim);
            let locality = request.locality.as_deref().map_or("", str::trim);
            if street.is_empty() || locality.is_empty() {
                return Err(CheckoutError::MissingAddress);
            }
            Some(format!("{street} - {locality}"))
        };

        let lines = cart
            .lines()
            .iter()
            .filter_map(|line| {
                directory.find_by_id(&line.id).map(|product| OrderLine {
                    quantity: line.quantity,
                    name: product.name.clone(),
                    subtotal: product.unit_price().multiply(line.quantity),
                })
            })
            .collect();

        Ok(Self {
            customer_name: customer_name.to_string(),
            shipping_option: shipping_option.to_string(),
            address,
            lines,
            total: cart.total(directory),
        })
    }

    /// The newline-delimited order message. The address line is omitted
    /// entirely for store pickup.
    pub fn message(&self) -> String {
        let mut text = String::from("Hola, quiero hacer este pedido:\n");
        for line in &self.lines {
            text.push_str(&format!(
                "- {} x {} = {}\n",
                line.quantity,
                line.name,
                line.subtotal.format_ars()
            ));
        }
        text.push_str(&format!("\nTotal: {}\n", self.total.format_ars()));
        text.push_str(&format!("Opción de envío: {}\n\n", self.shipping_option));
        text.push_str("Datos del cliente:\n");
        text.push_str(&format!("Nombre: {}\n", self.customer_name));
        if let Some(address) = &self.address {
            text.push_str(&format!("Dirección: {address}\n"));
        }
        text
    }

    /// `https://wa.me/<number>?text=<encoded message>`.
    pub fn whatsapp_url(&self, phone_number: &str) -> String {
        format!(
            "https://wa.me/{}?text={}",
            phone_number,
            utf8_percent_encode(&self.message(), URI_COMPONENT)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::product::Product;
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn product(id: &str, name: &str, price: i64, stock: u32) -> Product {
        Product {
            id: id.to_string(),
            name: name.to_string(),
            brand: String::new(),
            price: Decimal::new(price, 0),
            stock,
            category: String::new(),
            wireless: false,
            image: String::new(),
            images: vec![],
            description: String::new(),
            shipping_options: vec![
                "Envío a domicilio".to_string(),
                STORE_PICKUP.to_string(),
            ],
            details: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn directory() -> ProductDirectory {
        ProductDirectory::with_products(vec![
            product("p1", "Taladro", 85_000, 5),
            product("p2", "Mecha 8mm", 1_500, 10),
        ])
    }

    fn loaded_cart(directory: &ProductDirectory) -> Cart {
        let mut cart = Cart::new();
        cart.add(directory, "p1").unwrap();
        cart.add(directory, "p2").unwrap();
        cart.add(directory, "p2").unwrap();
        cart
    }

    fn delivery_request() -> CheckoutRequest {
        CheckoutRequest {
            shipping_option: "Envío a domicilio".to_string(),
            customer_name: "Juana Pérez".to_string(),
            street: Some("Av. Rivadavia 1234".to_string()),
            locality: Some("Morón".to_string()),
        }
    }

    #[test]
    fn test_message_lists_lines_total_shipping_and_customer() {
        let directory = directory();
        let cart = loaded_cart(&directory);
        let order = CheckoutOrder::build(&cart, &directory, &delivery_request()).unwrap();

        let expected = "Hola, quiero hacer este pedido:\n\
                        - 1 x Taladro = $ 85.000\n\
                        - 2 x Mecha 8mm = $ 3.000\n\
                        \n\
                        Total: $ 88.000\n\
                        Opción de envío: Envío a domicilio\n\
                        \n\
                        Datos del cliente:\n\
                        Nombre: Juana Pérez\n\
                        Dirección: Av. Rivadavia 1234 - Morón\n";
        assert_eq!(order.message(), expected);
    }

    #[test]
    fn test_store_pickup_omits_the_address_line() {
        let directory = directory();
        let cart = loaded_cart(&directory);
        let request = CheckoutRequest {
            shipping_option: STORE_PICKUP.to_string(),
            customer_name: "Juana Pérez".to_string(),
            street: None,
            locality: None,
        };
        let order = CheckoutOrder::build(&cart, &directory, &request).unwrap();
        let message = order.message();
        assert!(!message.contains("Dirección:"));
        assert!(message.contains("Opción de envío: Retiro en el local\n"));
    }

    #[test]
    fn test_empty_cart_and_missing_shipping_are_rejected() {
        let directory = directory();
        assert_eq!(
            CheckoutOrder::build(&Cart::new(), &directory, &delivery_request()).unwrap_err(),
            CheckoutError::EmptyCart
        );

        let cart = loaded_cart(&directory);
        let request = CheckoutRequest {
            shipping_option: "  ".to_string(),
            ..delivery_request()
        };
        assert_eq!(
            CheckoutOrder::build(&cart, &directory, &request).unwrap_err(),
            CheckoutError::MissingShipping
        );
    }

    #[test]
    fn test_partial_address_aborts_the_whole_checkout() {
        let directory = directory();
        let cart = loaded_cart(&directory);

        let request = CheckoutRequest {
            locality: None,
            ..delivery_request()
        };
        assert_eq!(
            CheckoutOrder::build(&cart, &directory, &request).unwrap_err(),
            CheckoutError::MissingAddress
        );

        let request = CheckoutRequest {
            street: Some("   ".to_string()),
            ..delivery_request()
        };
        assert_eq!(
            CheckoutOrder::build(&cart, &directory, &request).unwrap_err(),
            CheckoutError::MissingAddress
        );
    }

    #[test]
    fn test_whatsapp_url_percent_encodes_the_message() {
        let directory = directory();
        let cart = loaded_cart(&directory);
        let order = CheckoutOrder::build(&cart, &directory, &delivery_request()).unwrap();

        let url = order.whatsapp_url("5491156465544");
        assert!(url.starts_with("https://wa.me/5491156465544?text=Hola%2C%20quiero%20hacer%20este%20pedido%3A%0A"));
        assert!(!url.contains(' '));
        assert!(!url.contains('\n'));
    }

    #[test]
    fn test_building_does_not_mutate_the_cart() {
        let directory = directory();
        let cart = loaded_cart(&directory);
        let before = cart.lines().to_vec();
        let _ = CheckoutOrder::build(&cart, &directory, &delivery_request()).unwrap();
        assert_eq!(cart.lines(), before.as_slice());
    }
}
