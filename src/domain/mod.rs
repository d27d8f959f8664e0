//! Storefront domain model: pure state and transition functions, kept
//! independent of the HTTP and storage layers so they can be tested on
//! their own.

pub mod cart;
pub mod checkout;
pub mod deeplink;
pub mod directory;
pub mod events;
pub mod filter;
pub mod product;
pub mod stats;
pub mod value_objects;

pub use cart::{Cart, CartError, CartLine};
pub use checkout::{CheckoutError, CheckoutOrder, CheckoutRequest, STORE_PICKUP};
pub use deeplink::{DeepLinkRouter, DetailView, Navigation, PRODUCT_PARAM};
pub use directory::ProductDirectory;
pub use events::{CatalogEvent, CATALOG_SUBJECT};
pub use filter::{admin_matches, ProductFilter, SortOrder, WirelessFilter};
pub use product::{DraftError, Product, ProductDraft, ProductFields, PLACEHOLDER_IMAGE};
pub use stats::CatalogStats;
pub use value_objects::Money;
