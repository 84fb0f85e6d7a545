use tokio::sync::mpsc;
use tracing::{debug, instrument};

use crate::domain::{Category, CategoryId, PhotoFile, ProductDraft, ProductId, ProductPhoto, ProductRecord};
use crate::error::CatalogueError;
use crate::messages::CatalogueRequest;

/// Handle to a catalogue backend actor (in-memory or HTTP).
#[derive(Clone)]
pub struct CatalogueClient {
    sender: mpsc::Sender<CatalogueRequest>,
}

impl CatalogueClient {
    pub fn new(sender: mpsc::Sender<CatalogueRequest>) -> Self {
        Self { sender }
    }

    /// Manual method, no response needed
    #[instrument(skip(self))]
    pub async fn shutdown(&self) -> Result<(), CatalogueError> {
        debug!("Sending shutdown request");
        self.sender
            .send(CatalogueRequest::Shutdown)
            .await
            .map_err(|e| CatalogueError::ActorCommunicationError(e.to_string()))
    }
}

client_method!(CatalogueClient => fn fetch_categories() -> Vec<Category> as CatalogueRequest::FetchCategories, Error = CatalogueError);
client_method!(CatalogueClient => fn fetch_products() -> Vec<ProductRecord> as CatalogueRequest::FetchProducts, Error = CatalogueError);
client_method!(CatalogueClient => fn create(draft: ProductDraft) -> ProductRecord as CatalogueRequest::Create, Error = CatalogueError);
client_method!(CatalogueClient => fn update(draft: ProductDraft) -> ProductRecord as CatalogueRequest::Update, Error = CatalogueError);
client_method!(CatalogueClient => fn fetch_photo(id: ProductId) -> ProductPhoto as CatalogueRequest::FetchPhoto, Error = CatalogueError);
client_method!(CatalogueClient => fn upload_photo(file: PhotoFile, product_id: ProductId, category_id: CategoryId) -> () as CatalogueRequest::UploadPhoto, Error = CatalogueError);
