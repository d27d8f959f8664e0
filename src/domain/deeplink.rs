//! Deep-link routing and the product detail view.
//!
//! The router owns the history stack; the open product id is always derived
//! from the current entry, so the detail panel and back/forward navigation
//! can never disagree about what is open.

use serde::Serialize;

use crate::domain::directory::ProductDirectory;
use crate::domain::product::Product;

/// Query parameter carrying the open product id.
pub const PRODUCT_PARAM: &str = "producto";

/// History of navigation entries; each entry is either an open product id or
/// the closed state. Pushing drops the forward stack the way a browser does.
#[derive(Clone, Debug)]
pub struct DeepLinkRouter {
    entries: Vec<Option<String>>,
    cursor: usize,
}

impl Default for DeepLinkRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl DeepLinkRouter {
    pub fn new() -> Self {
        Self {
            entries: vec![None],
            cursor: 0,
        }
    }

    /// Restores the router from the query string of a landing URL.
    pub fn from_query(query: &str) -> Self {
        Self {
            entries: vec![parse_product_param(query)],
            cursor: 0,
        }
    }

    /// The single source of truth for "which product is open".
    pub fn current(&self) -> Option<&str> {
        self.entries[self.cursor].as_deref()
    }

    pub fn push_open(&mut self, id: &str) {
        if self.current() == Some(id) {
            return;
        }
        self.push(Some(id.to_string()));
    }

    pub fn push_close(&mut self) {
        if self.current().is_none() {
            return;
        }
        self.push(None);
    }

    pub fn back(&mut self) -> Option<&str> {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
        self.current()
    }

    pub fn forward(&mut self) -> Option<&str> {
        if self.cursor + 1 < self.entries.len() {
            self.cursor += 1;
        }
        self.current()
    }

    /// URL of the current entry.
    pub fn current_url(&self, base: &str) -> String {
        match self.current() {
            Some(id) => share_url(base, id),
            None => format!("{}/", base.trim_end_matches('/')),
        }
    }

    fn push(&mut self, entry: Option<String>) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(entry);
        self.cursor = self.entries.len() - 1;
    }
}

/// Canonical shareable URL for a product.
pub fn share_url(base: &str, id: &str) -> String {
    format!("{}/?{}={}", base.trim_end_matches('/'), PRODUCT_PARAM, id)
}

fn parse_product_param(query: &str) -> Option<String> {
    query
        .trim_start_matches('?')
        .split('&')
        .find_map(|pair| {
            let (key, value) = pair.split_once('=')?;
            (key == PRODUCT_PARAM && !value.is_empty()).then(|| value.to_string())
        })
}

/// Detail panel state for one open product.
#[derive(Clone, Debug, Serialize)]
pub struct DetailView {
    pub product_id: String,
    pub images: Vec<String>,
    pub index: usize,
}

impl DetailView {
    pub fn new(product: &Product) -> Self {
        Self {
            product_id: product.id.clone(),
            // carousel_images never returns an empty list
            images: product.carousel_images(),
            index: 0,
        }
    }

    pub fn current_image(&self) -> &str {
        &self.images[self.index]
    }

    pub fn next_image(&mut self) {
        self.index = (self.index + 1) % self.images.len();
    }

    pub fn previous_image(&mut self) {
        self.index = (self.index + self.images.len() - 1) % self.images.len();
    }
}

/// Storefront navigation state: the detail panel plus its deep-link sync.
#[derive(Clone, Debug, Default)]
pub struct Navigation {
    router: DeepLinkRouter,
    detail: Option<DetailView>,
}

impl Navigation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entry-point sync: derive the detail panel from the landing URL's
    /// query string. Stale ids resolve to the closed state.
    pub fn from_query(directory: &ProductDirectory, query: &str) -> Self {
        let mut navigation = Self {
            router: DeepLinkRouter::from_query(query),
            detail: None,
        };
        navigation.sync(directory);
        navigation
    }

    pub fn detail(&self) -> Option<&DetailView> {
        self.detail.as_ref()
    }

    pub fn detail_mut(&mut self) -> Option<&mut DetailView> {
        self.detail.as_mut()
    }

    pub fn open_product_id(&self) -> Option<&str> {
        self.router.current()
    }

    /// Opens the detail panel and pushes the deep link. Unknown ids are
    /// skipped without touching the current state.
    pub fn open(&mut self, directory: &ProductDirectory, id: &str) {
        let Some(product) = directory.find_by_id(id) else {
            return;
        };
        self.detail = Some(DetailView::new(product));
        self.router.push_open(&product.id);
    }

    pub fn close(&mut self) {
        self.detail = None;
        self.router.push_close();
    }

    /// Browser-style back; the panel is re-derived from the new entry.
    pub fn back(&mut self, directory: &ProductDirectory) {
        self.router.back();
        self.sync(directory);
    }

    pub fn forward(&mut self, directory: &ProductDirectory) {
        self.router.forward();
        self.sync(directory);
    }

    pub fn share_url(&self, base: &str) -> Option<String> {
        self.open_product_id().map(|id| share_url(base, id))
    }

    fn sync(&mut self, directory: &ProductDirectory) {
        self.detail = self
            .router
            .current()
            .and_then(|id| directory.find_by_id(id))
            .map(DetailView::new);
    }
}
