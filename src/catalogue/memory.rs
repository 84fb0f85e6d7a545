use std::collections::{BTreeMap, HashMap};

use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument};

use crate::clients::CatalogueClient;
use crate::domain::{Category, CategoryId, PhotoFile, ProductDraft, ProductId, ProductPhoto, ProductRecord};
use crate::error::CatalogueError;
use crate::messages::{CatalogueRequest, ServiceResponse};

/// Catalogue actor keeping everything in memory.
///
/// Used by the demo binary and by tests that want real catalogue semantics
/// rather than a scripted mock.
pub struct InMemoryCatalogue {
    receiver: mpsc::Receiver<CatalogueRequest>,
    categories: BTreeMap<CategoryId, String>,
    products: BTreeMap<ProductId, ProductRecord>,
    photos: HashMap<ProductId, ProductPhoto>,
    next_id: ProductId,
}

impl InMemoryCatalogue {
    pub fn new(buffer_size: usize) -> (Self, CatalogueClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let service = Self {
            receiver,
            categories: BTreeMap::new(),
            products: BTreeMap::new(),
            photos: HashMap::new(),
            next_id: 1,
        };
        (service, CatalogueClient::new(sender))
    }

    pub fn with_category(mut self, id: CategoryId, name: impl Into<String>) -> Self {
        self.categories.insert(id, name.into());
        self
    }

    /// Seeds a product; later `create` calls get ids above every seeded one.
    pub fn with_product(mut self, product: ProductRecord) -> Self {
        self.next_id = self.next_id.max(product.id + 1);
        self.products.insert(product.id, product);
        self
    }

    #[instrument(name = "in_memory_catalogue", skip(self))]
    pub async fn run(mut self) {
        info!("InMemoryCatalogue starting");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                CatalogueRequest::FetchCategories { respond_to } => {
                    self.handle_fetch_categories(respond_to);
                }
                CatalogueRequest::FetchProducts { respond_to } => {
                    self.handle_fetch_products(respond_to);
                }
                CatalogueRequest::Create { draft, respond_to } => {
                    self.handle_create(draft, respond_to);
                }
                CatalogueRequest::Update { draft, respond_to } => {
                    self.handle_update(draft, respond_to);
                }
                CatalogueRequest::FetchPhoto { id, respond_to } => {
                    self.handle_fetch_photo(id, respond_to);
                }
                CatalogueRequest::UploadPhoto {
                    file,
                    product_id,
                    category_id,
                    respond_to,
                } => {
                    self.handle_upload_photo(file, product_id, category_id, respond_to);
                }
                CatalogueRequest::Shutdown => {
                    info!("InMemoryCatalogue shutting down");
                    break;
                }
            }
        }

        info!("InMemoryCatalogue stopped");
    }

    fn handle_fetch_categories(&self, respond_to: ServiceResponse<Vec<Category>, CatalogueError>) {
        debug!("Processing fetch_categories request");

        let categories: Vec<Category> = self
            .categories
            .iter()
            .map(|(id, name)| Category {
                id: *id,
                name: name.clone(),
                products: self
                    .products
                    .values()
                    .filter(|p| p.category_id == *id)
                    .cloned()
                    .collect(),
            })
            .collect();

        info!(category_count = categories.len(), "Listed categories");
        let _ = respond_to.send(Ok(categories));
    }

    fn handle_fetch_products(&self, respond_to: ServiceResponse<Vec<ProductRecord>, CatalogueError>) {
        debug!("Processing fetch_products request");

        let products: Vec<ProductRecord> = self.products.values().cloned().collect();
        info!(product_count = products.len(), "Listed products");
        let _ = respond_to.send(Ok(products));
    }

    #[instrument(fields(product_name = %draft.name, category_id = draft.category_id), skip(self, draft, respond_to))]
    fn handle_create(&mut self, draft: ProductDraft, respond_to: ServiceResponse<ProductRecord, CatalogueError>) {
        debug!("Processing create request");

        let result = if !self.categories.contains_key(&draft.category_id) {
            error!("Unknown category");
            Err(CatalogueError::CategoryNotFound(draft.category_id))
        } else {
            let id = self.next_id;
            self.next_id += 1;
            let record = draft.into_record(id);
            self.products.insert(id, record.clone());
            info!(product_id = id, "Product created");
            Ok(record)
        };

        let _ = respond_to.send(result);
    }

    #[instrument(fields(product_id = ?draft.id), skip(self, draft, respond_to))]
    fn handle_update(&mut self, draft: ProductDraft, respond_to: ServiceResponse<ProductRecord, CatalogueError>) {
        debug!("Processing update request");

        let result = match draft.id {
            None => Err(CatalogueError::Rejected("update without product id".to_string())),
            Some(_) if !self.categories.contains_key(&draft.category_id) => {
                Err(CatalogueError::CategoryNotFound(draft.category_id))
            }
            Some(id) => match self.products.get_mut(&id) {
                None => Err(CatalogueError::ProductNotFound(id)),
                Some(existing) => {
                    let photo_name = draft.photo_name.clone().or_else(|| existing.photo_name.clone());
                    let mut record = draft.into_record(id);
                    record.photo_name = photo_name;
                    *existing = record.clone();
                    info!("Product updated");
                    Ok(record)
                }
            },
        };

        if let Err(e) = &result {
            error!(error = %e, "Update failed");
        }
        let _ = respond_to.send(result);
    }

    #[instrument(skip(self, respond_to))]
    fn handle_fetch_photo(&self, id: ProductId, respond_to: ServiceResponse<ProductPhoto, CatalogueError>) {
        debug!("Processing fetch_photo request");

        let result = self
            .photos
            .get(&id)
            .cloned()
            .ok_or(CatalogueError::PhotoNotFound(id));
        let _ = respond_to.send(result);
    }

    #[instrument(fields(file_name = %file.file_name), skip(self, file, respond_to))]
    fn handle_upload_photo(
        &mut self,
        file: PhotoFile,
        product_id: ProductId,
        category_id: CategoryId,
        respond_to: ServiceResponse<(), CatalogueError>,
    ) {
        debug!("Processing upload_photo request");

        let result = if !self.categories.contains_key(&category_id) {
            Err(CatalogueError::CategoryNotFound(category_id))
        } else if let Some(product) = self.products.get_mut(&product_id) {
            product.photo_name = Some(file.file_name.clone());
            self.photos
                .insert(product_id, ProductPhoto::new(file.content_type, file.bytes));
            info!("Photo stored");
            Ok(())
        } else {
            Err(CatalogueError::ProductNotFound(product_id))
        };

        if let Err(e) = &result {
            error!(error = %e, "Upload failed");
        }
        let _ = respond_to.send(result);
    }
}
