//! Route-driven product listing: all products or one category's products.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use tracing::{debug, error, info, instrument, warn};

use crate::clients::CatalogueClient;
use crate::domain::{CategoryId, CategoryRef, ProductId, ProductPhoto, ProductRecord};
use crate::error::CatalogueError;
use crate::notify::Notifier;

/// Listing selected by the router.
///
/// `/products/1` shows every product, `/products/2/<categoryId>` shows the
/// products of one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    All,
    Category(CategoryId),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("Not a products route: {0}")]
    Unknown(String),
    #[error("Invalid category id in route: {0}")]
    InvalidCategory(String),
}

impl Route {
    pub fn parse(path: &str) -> Result<Self, RouteError> {
        let segments: Vec<&str> = path
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        match segments.as_slice() {
            ["products", "1"] => Ok(Route::All),
            ["products", "2", id] => id
                .parse()
                .map(Route::Category)
                .map_err(|_| RouteError::InvalidCategory(id.to_string())),
            _ => Err(RouteError::Unknown(path.to_string())),
        }
    }
}

impl FromStr for Route {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Route::parse(s)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::All => write!(f, "/products/1"),
            Route::Category(id) => write!(f, "/products/2/{}", id),
        }
    }
}

/// Keeps the displayed product subset and the category selector in step
/// with the current route. Thumbnails are cached per product id and outlive
/// route changes.
pub struct ProductBrowser {
    catalogue: CatalogueClient,
    notifier: Notifier,
    route: Route,
    categories: Vec<CategoryRef>,
    current_category: Option<CategoryRef>,
    products: Vec<ProductRecord>,
    thumbnails: HashMap<ProductId, ProductPhoto>,
}

impl ProductBrowser {
    pub fn new(catalogue: CatalogueClient, notifier: Notifier) -> Self {
        Self {
            catalogue,
            notifier,
            route: Route::All,
            categories: Vec::new(),
            current_category: None,
            products: Vec::new(),
            thumbnails: HashMap::new(),
        }
    }

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn categories(&self) -> &[CategoryRef] {
        &self.categories
    }

    pub fn current_category(&self) -> Option<&CategoryRef> {
        self.current_category.as_ref()
    }

    pub fn products(&self) -> &[ProductRecord] {
        &self.products
    }

    pub fn thumbnail(&self, id: ProductId) -> Option<&ProductPhoto> {
        self.thumbnails.get(&id)
    }

    /// Ids with a cached thumbnail, ascending.
    pub fn thumbnail_ids(&self) -> Vec<ProductId> {
        let mut ids: Vec<ProductId> = self.thumbnails.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub(crate) fn cache_thumbnail(&mut self, id: ProductId, photo: ProductPhoto) {
        self.thumbnails.insert(id, photo);
    }

    pub(crate) fn evict_thumbnail(&mut self, id: ProductId) {
        self.thumbnails.remove(&id);
    }

    /// One page of the current listing; empty past the end.
    pub fn page(&self, index: usize, size: usize) -> &[ProductRecord] {
        if size == 0 {
            return &[];
        }
        let start = index.saturating_mul(size).min(self.products.len());
        let end = start.saturating_add(size).min(self.products.len());
        &self.products[start..end]
    }

    pub fn page_count(&self, size: usize) -> usize {
        if size == 0 {
            0
        } else {
            self.products.len().div_ceil(size)
        }
    }

    #[instrument(skip(self))]
    pub async fn load_categories(&mut self) -> Result<(), CatalogueError> {
        let categories = self
            .catalogue
            .fetch_categories()
            .await
            .inspect_err(|e| self.report("Could not load categories", e))?;
        self.categories = categories.iter().map(|c| c.to_ref()).collect();
        info!(category_count = self.categories.len(), "Categories loaded");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn navigate(&mut self, route: Route) -> Result<(), CatalogueError> {
        self.route = route;
        self.reload().await
    }

    /// Re-runs the fetch behind the current route.
    pub async fn reload(&mut self) -> Result<(), CatalogueError> {
        match self.route {
            Route::All => self.show_all().await,
            Route::Category(id) => self.show_category(id).await,
        }
    }

    async fn show_all(&mut self) -> Result<(), CatalogueError> {
        let products = self
            .catalogue
            .fetch_products()
            .await
            .inspect_err(|e| self.report("Could not load products", e))?;
        self.current_category = None;
        self.products = products;
        info!(product_count = self.products.len(), "Product list loaded");
        Ok(())
    }

    async fn show_category(&mut self, id: CategoryId) -> Result<(), CatalogueError> {
        let categories = self
            .catalogue
            .fetch_categories()
            .await
            .inspect_err(|e| self.report("Could not load category", e))?;
        self.categories = categories.iter().map(|c| c.to_ref()).collect();

        match categories.into_iter().find(|c| c.id == id) {
            Some(category) => {
                self.current_category = Some(category.to_ref());
                self.products = category.products;
                info!(category_id = id, product_count = self.products.len(), "Category listing loaded");
            }
            None => {
                warn!(category_id = id, "Unknown category in route");
                self.notifier.warning("Category not found", "Warning");
                self.current_category = None;
                self.products.clear();
            }
        }
        Ok(())
    }

    /// Fetches thumbnails for listed products that have a photo and no cache
    /// entry yet. Returns how many were added; a failed fetch only skips
    /// that product.
    #[instrument(skip(self))]
    pub async fn load_thumbnails(&mut self) -> usize {
        let missing: Vec<ProductId> = self
            .products
            .iter()
            .filter(|p| p.photo_name.is_some() && !self.thumbnails.contains_key(&p.id))
            .map(|p| p.id)
            .collect();

        let mut loaded = 0;
        for id in missing {
            match self.catalogue.fetch_photo(id).await {
                Ok(photo) => {
                    self.thumbnails.insert(id, photo);
                    loaded += 1;
                }
                Err(CatalogueError::PhotoNotFound(_)) => debug!(product_id = id, "No photo stored"),
                Err(e) => warn!(error = %e, product_id = id, "Thumbnail fetch failed"),
            }
        }
        info!(loaded, cached = self.thumbnails.len(), "Thumbnails loaded");
        loaded
    }

    fn report(&self, message: &str, e: &CatalogueError) {
        error!(error = %e, "{}", message);
        self.notifier.error(message, "Error");
    }
}
