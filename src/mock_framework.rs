//! # Mock Framework
//!
//! Utilities for testing the session without a running catalogue.
//!
//! Use [`create_mock_catalogue`] to get a client and a receiver.
//! Then use helpers like [`expect_create`] or [`expect_upload_photo`] to assert
//! what the session asked for and to answer it.

use tokio::sync::mpsc;

use crate::clients::CatalogueClient;
use crate::domain::{Category, CategoryId, PhotoFile, ProductDraft, ProductId, ProductPhoto, ProductRecord};
use crate::error::CatalogueError;
use crate::messages::{CatalogueRequest, ServiceResponse};

/// Creates a mock catalogue client and a receiver for asserting requests.
///
/// Requests the code under test sends arrive on `receiver`; the test decides
/// how each one is answered (success, failure, or never).
pub fn create_mock_catalogue(buffer_size: usize) -> (CatalogueClient, mpsc::Receiver<CatalogueRequest>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (CatalogueClient::new(sender), receiver)
}

/// Helper to verify that the next message is a FetchCategories request
pub async fn expect_fetch_categories(
    receiver: &mut mpsc::Receiver<CatalogueRequest>,
) -> Option<ServiceResponse<Vec<Category>, CatalogueError>> {
    match receiver.recv().await {
        Some(CatalogueRequest::FetchCategories { respond_to }) => Some(respond_to),
        _ => None,
    }
}

/// Helper to verify that the next message is a FetchProducts request
pub async fn expect_fetch_products(
    receiver: &mut mpsc::Receiver<CatalogueRequest>,
) -> Option<ServiceResponse<Vec<ProductRecord>, CatalogueError>> {
    match receiver.recv().await {
        Some(CatalogueRequest::FetchProducts { respond_to }) => Some(respond_to),
        _ => None,
    }
}

/// Helper to verify that the next message is a Create request
pub async fn expect_create(
    receiver: &mut mpsc::Receiver<CatalogueRequest>,
) -> Option<(ProductDraft, ServiceResponse<ProductRecord, CatalogueError>)> {
    match receiver.recv().await {
        Some(CatalogueRequest::Create { draft, respond_to }) => Some((draft, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is an Update request
pub async fn expect_update(
    receiver: &mut mpsc::Receiver<CatalogueRequest>,
) -> Option<(ProductDraft, ServiceResponse<ProductRecord, CatalogueError>)> {
    match receiver.recv().await {
        Some(CatalogueRequest::Update { draft, respond_to }) => Some((draft, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a FetchPhoto request
pub async fn expect_fetch_photo(
    receiver: &mut mpsc::Receiver<CatalogueRequest>,
) -> Option<(ProductId, ServiceResponse<ProductPhoto, CatalogueError>)> {
    match receiver.recv().await {
        Some(CatalogueRequest::FetchPhoto { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is an UploadPhoto request
pub async fn expect_upload_photo(
    receiver: &mut mpsc::Receiver<CatalogueRequest>,
) -> Option<(PhotoFile, ProductId, CategoryId, ServiceResponse<(), CatalogueError>)> {
    match receiver.recv().await {
        Some(CatalogueRequest::UploadPhoto {
            file,
            product_id,
            category_id,
            respond_to,
        }) => Some((file, product_id, category_id, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_catalogue() {
        let (client, mut receiver) = create_mock_catalogue(10);

        let fetch_task = tokio::spawn(async move { client.fetch_photo(5).await });

        let (id, responder) = expect_fetch_photo(&mut receiver).await.expect("Expected FetchPhoto request");
        assert_eq!(id, 5);
        responder.send(Err(CatalogueError::PhotoNotFound(5))).unwrap();

        let result = fetch_task.await.unwrap();
        assert_eq!(result, Err(CatalogueError::PhotoNotFound(5)));
    }

    #[tokio::test]
    async fn test_wrong_request_kind_yields_none() {
        let (client, mut receiver) = create_mock_catalogue(10);
        let _task = tokio::spawn(async move { client.fetch_products().await });

        assert!(expect_fetch_categories(&mut receiver).await.is_none());
    }
}
