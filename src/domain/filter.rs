//! Storefront filter and sort engine, plus the admin live text filter.

use crate::domain::product::Product;

/// Brand filter value that matches every brand.
pub const ALL_BRANDS: &str = "todas";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WirelessFilter {
    #[default]
    All,
    Wireless,
    Wired,
}

impl WirelessFilter {
    /// `"si"` and `"no"` select; anything else (including `"todos"`) matches
    /// all.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "si" => WirelessFilter::Wireless,
            "no" => WirelessFilter::Wired,
            _ => WirelessFilter::All,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Keep the directory's load order.
    #[default]
    LoadOrder,
    PriceAsc,
    PriceDesc,
}

impl SortOrder {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "precio-asc" => SortOrder::PriceAsc,
            "precio-desc" => SortOrder::PriceDesc,
            _ => SortOrder::LoadOrder,
        }
    }
}

/// One storefront filter pass. Held by view controls, recomputed on every
/// change; nothing here is persisted.
#[derive(Clone, Debug, Default)]
pub struct ProductFilter {
    /// Free-text query matched against name and description.
    pub query: String,
    /// `None`, empty or [`ALL_BRANDS`] matches every brand.
    pub brand: Option<String>,
    pub wireless: WirelessFilter,
    pub sort: SortOrder,
}

impl ProductFilter {
    pub fn matches(&self, product: &Product) -> bool {
        let query = self.query.to_lowercase();
        let matches_text = query.is_empty()
            || product.name.to_lowercase().contains(&query)
            || product.description.to_lowercase().contains(&query);

        let matches_brand = match self.brand.as_deref() {
            Some(brand) if !brand.is_empty() && brand != ALL_BRANDS => product.brand == brand,
            _ => true,
        };

        let matches_wireless = match self.wireless {
            WirelessFilter::All => true,
            WirelessFilter::Wireless => product.wireless,
            WirelessFilter::Wired => !product.wireless,
        };

        matches_text && matches_brand && matches_wireless
    }

    /// Filters and sorts into a fresh list; the source slice is never
    /// reordered.
    pub fn apply<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        let mut selected: Vec<&Product> =
            products.iter().filter(|product| self.matches(product)).collect();
        match self.sort {
            SortOrder::LoadOrder => {}
            SortOrder::PriceAsc => selected.sort_by(|a, b| a.price.cmp(&b.price)),
            SortOrder::PriceDesc => selected.sort_by(|a, b| b.price.cmp(&a.price)),
        }
        selected
    }
}

/// Admin live search, scoped to name, brand and description.
pub fn admin_matches(product: &Product, filter: &str) -> bool {
    let needle = filter.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    product.name.to_lowercase().contains(&needle)
        || product.brand.to_lowercase().contains(&needle)
        || product.description.to_lowercase().contains(&needle)
}
