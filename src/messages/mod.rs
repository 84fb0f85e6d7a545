use tokio::sync::oneshot;

use crate::browse::Route;
use crate::domain::{Category, CategoryId, PhotoFile, ProductDraft, ProductId, ProductPhoto, ProductRecord};
use crate::error::{CatalogueError, SessionError};
use crate::session::SessionSnapshot;
use crate::validation::FormEdit;

/// Generic type aliases for service communication
pub type ServiceResult<T, E> = std::result::Result<T, E>;
pub type ServiceResponse<T, E> = oneshot::Sender<ServiceResult<T, E>>;

/// Requests understood by every catalogue backend. Each variant carries its
/// parameters and a oneshot channel for the response.
#[derive(Debug)]
pub enum CatalogueRequest {
    FetchCategories {
        respond_to: ServiceResponse<Vec<Category>, CatalogueError>,
    },
    FetchProducts {
        respond_to: ServiceResponse<Vec<ProductRecord>, CatalogueError>,
    },
    Create {
        draft: ProductDraft,
        respond_to: ServiceResponse<ProductRecord, CatalogueError>,
    },
    Update {
        draft: ProductDraft,
        respond_to: ServiceResponse<ProductRecord, CatalogueError>,
    },
    FetchPhoto {
        id: ProductId,
        respond_to: ServiceResponse<ProductPhoto, CatalogueError>,
    },
    UploadPhoto {
        file: PhotoFile,
        product_id: ProductId,
        category_id: CategoryId,
        respond_to: ServiceResponse<(), CatalogueError>,
    },
    Shutdown,
}

/// Requests served by a `SessionActor`, one per controller operation.
#[derive(Debug)]
pub enum SessionRequest {
    Load {
        respond_to: ServiceResponse<(), SessionError>,
    },
    Navigate {
        route: Route,
        respond_to: ServiceResponse<(), SessionError>,
    },
    StartCreate {
        respond_to: ServiceResponse<(), SessionError>,
    },
    StartEdit {
        product: ProductRecord,
        respond_to: ServiceResponse<(), SessionError>,
    },
    StartPhotoEdit {
        product: ProductRecord,
        respond_to: ServiceResponse<(), SessionError>,
    },
    LoadThumbnails {
        respond_to: ServiceResponse<usize, SessionError>,
    },
    EditForm {
        edit: FormEdit,
        respond_to: ServiceResponse<(), SessionError>,
    },
    SelectCategory {
        category_id: CategoryId,
        respond_to: ServiceResponse<(), SessionError>,
    },
    Submit {
        respond_to: ServiceResponse<ProductRecord, SessionError>,
    },
    SelectPhoto {
        file: PhotoFile,
        respond_to: ServiceResponse<(), SessionError>,
    },
    AttachPhoto {
        file: PhotoFile,
        respond_to: ServiceResponse<(), SessionError>,
    },
    UploadPending {
        respond_to: ServiceResponse<(), SessionError>,
    },
    Cancel {
        respond_to: ServiceResponse<(), SessionError>,
    },
    Dismiss {
        respond_to: ServiceResponse<(), SessionError>,
    },
    Snapshot {
        respond_to: ServiceResponse<SessionSnapshot, SessionError>,
    },
    Shutdown,
}
