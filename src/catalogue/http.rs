//! Catalogue backend talking to the REST catalogue service.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{multipart, Client, StatusCode};
use serde::de::DeserializeOwned;
use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument};

use super::wire::{CategoryListing, ProductEnvelope, ProductListing};
use crate::clients::CatalogueClient;
use crate::domain::{Category, CategoryId, PhotoFile, ProductDraft, ProductId, ProductPhoto, ProductRecord};
use crate::error::CatalogueError;
use crate::messages::CatalogueRequest;

/// Actor forwarding catalogue requests over HTTP.
///
/// Every request runs in its own task and the task owns the responder, so a
/// slow photo download never holds up a save.
pub struct HttpCatalogue {
    receiver: mpsc::Receiver<CatalogueRequest>,
    api: Arc<CatalogueApi>,
}

impl HttpCatalogue {
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        buffer_size: usize,
    ) -> Result<(Self, CatalogueClient), CatalogueError> {
        let http = Client::builder().timeout(timeout).build()?;
        let (sender, receiver) = mpsc::channel(buffer_size);
        let service = Self {
            receiver,
            api: Arc::new(CatalogueApi {
                http,
                base_url: base_url.into(),
            }),
        };
        Ok((service, CatalogueClient::new(sender)))
    }

    #[instrument(name = "http_catalogue", skip(self), fields(base_url = %self.api.base_url))]
    pub async fn run(mut self) {
        info!("HttpCatalogue starting");

        while let Some(msg) = self.receiver.recv().await {
            let api = Arc::clone(&self.api);
            match msg {
                CatalogueRequest::FetchCategories { respond_to } => {
                    tokio::spawn(async move {
                        let _ = respond_to.send(api.fetch_categories().await);
                    });
                }
                CatalogueRequest::FetchProducts { respond_to } => {
                    tokio::spawn(async move {
                        let _ = respond_to.send(api.fetch_products().await);
                    });
                }
                CatalogueRequest::Create { draft, respond_to } => {
                    tokio::spawn(async move {
                        let _ = respond_to.send(api.create(draft).await);
                    });
                }
                CatalogueRequest::Update { draft, respond_to } => {
                    tokio::spawn(async move {
                        let _ = respond_to.send(api.update(draft).await);
                    });
                }
                CatalogueRequest::FetchPhoto { id, respond_to } => {
                    tokio::spawn(async move {
                        let _ = respond_to.send(api.fetch_photo(id).await);
                    });
                }
                CatalogueRequest::UploadPhoto {
                    file,
                    product_id,
                    category_id,
                    respond_to,
                } => {
                    tokio::spawn(async move {
                        let _ = respond_to.send(api.upload_photo(file, product_id, category_id).await);
                    });
                }
                CatalogueRequest::Shutdown => {
                    info!("HttpCatalogue shutting down");
                    break;
                }
            }
        }

        info!("HttpCatalogue stopped");
    }
}

struct CatalogueApi {
    http: Client,
    base_url: String,
}

impl CatalogueApi {
    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path.trim_start_matches('/'))
    }

    #[instrument(skip(self))]
    async fn fetch_categories(&self) -> Result<Vec<Category>, CatalogueError> {
        debug!("GET categories");
        let response = self.http.get(self.url("categories")).send().await?;
        let listing: CategoryListing = Self::handle_response(response).await?;
        Ok(listing.listcat)
    }

    #[instrument(skip(self))]
    async fn fetch_products(&self) -> Result<Vec<ProductRecord>, CatalogueError> {
        debug!("GET products");
        let response = self.http.get(self.url("products")).send().await?;
        let listing: ProductListing = Self::handle_response(response).await?;
        Ok(listing.ldto)
    }

    #[instrument(skip(self, draft), fields(product_name = %draft.name))]
    async fn create(&self, draft: ProductDraft) -> Result<ProductRecord, CatalogueError> {
        debug!("POST products");
        let response = self.http.post(self.url("products")).json(&draft).send().await?;
        let envelope: ProductEnvelope = Self::handle_response(response).await?;
        Ok(envelope.product)
    }

    #[instrument(skip(self, draft), fields(product_id = ?draft.id))]
    async fn update(&self, draft: ProductDraft) -> Result<ProductRecord, CatalogueError> {
        debug!("PUT products");
        let response = self.http.put(self.url("products")).json(&draft).send().await?;
        let envelope: ProductEnvelope = Self::handle_response(response).await?;
        Ok(envelope.product)
    }

    #[instrument(skip(self))]
    async fn fetch_photo(&self, id: ProductId) -> Result<ProductPhoto, CatalogueError> {
        debug!("GET photo");
        let response = self
            .http
            .get(self.url(&format!("products/{}/photo", id)))
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => return Err(CatalogueError::PhotoNotFound(id)),
            status if !status.is_success() => {
                let text = response.text().await?;
                return Err(CatalogueError::Rejected(format!("{}: {}", status, text)));
            }
            _ => {}
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = response.bytes().await?;
        Ok(ProductPhoto::new(content_type, bytes.to_vec()))
    }

    #[instrument(skip(self, file), fields(file_name = %file.file_name))]
    async fn upload_photo(
        &self,
        file: PhotoFile,
        product_id: ProductId,
        category_id: CategoryId,
    ) -> Result<(), CatalogueError> {
        debug!("POST photo");
        let part = multipart::Part::bytes(file.bytes)
            .file_name(file.file_name)
            .mime_str(&file.content_type)?;
        let form = multipart::Form::new()
            .part("file", part)
            .text("idCat", category_id.to_string());

        let response = self
            .http
            .post(self.url(&format!("products/{}/photo", product_id)))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await?;
            error!(%status, "Upload rejected");
            return Err(CatalogueError::Rejected(format!("{}: {}", status, text)));
        }
        Ok(())
    }

    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, CatalogueError> {
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await?;
            error!(%status, "Catalogue request rejected");
            return Err(CatalogueError::Rejected(format!("{}: {}", status, text)));
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| CatalogueError::InvalidResponse(e.to_string()))
    }
}
