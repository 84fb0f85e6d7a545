use tokio::sync::mpsc;
use tracing::{debug, instrument};

use crate::browse::Route;
use crate::domain::{CategoryId, PhotoFile, ProductRecord};
use crate::error::SessionError;
use crate::messages::SessionRequest;
use crate::session::SessionSnapshot;
use crate::validation::FormEdit;

/// Cloneable handle the UI event loop uses to drive a `SessionActor`.
#[derive(Clone)]
pub struct SessionClient {
    sender: mpsc::Sender<SessionRequest>,
}

impl SessionClient {
    pub fn new(sender: mpsc::Sender<SessionRequest>) -> Self {
        Self { sender }
    }

    #[instrument(skip(self))]
    pub async fn shutdown(&self) -> Result<(), SessionError> {
        debug!("Sending shutdown request");
        self.sender
            .send(SessionRequest::Shutdown)
            .await
            .map_err(|e| SessionError::ActorCommunicationError(e.to_string()))
    }
}

client_method!(SessionClient => fn load() -> () as SessionRequest::Load, Error = SessionError);
client_method!(SessionClient => fn navigate(route: Route) -> () as SessionRequest::Navigate, Error = SessionError);
client_method!(SessionClient => fn start_create() -> () as SessionRequest::StartCreate, Error = SessionError);
client_method!(SessionClient => fn start_edit(product: ProductRecord) -> () as SessionRequest::StartEdit, Error = SessionError);
client_method!(SessionClient => fn start_photo_edit(product: ProductRecord) -> () as SessionRequest::StartPhotoEdit, Error = SessionError);
client_method!(SessionClient => fn load_thumbnails() -> usize as SessionRequest::LoadThumbnails, Error = SessionError);
client_method!(SessionClient => fn edit_form(edit: FormEdit) -> () as SessionRequest::EditForm, Error = SessionError);
client_method!(SessionClient => fn select_category(category_id: CategoryId) -> () as SessionRequest::SelectCategory, Error = SessionError);
client_method!(SessionClient => fn submit() -> ProductRecord as SessionRequest::Submit, Error = SessionError);
client_method!(SessionClient => fn select_photo(file: PhotoFile) -> () as SessionRequest::SelectPhoto, Error = SessionError);
client_method!(SessionClient => fn attach_photo(file: PhotoFile) -> () as SessionRequest::AttachPhoto, Error = SessionError);
client_method!(SessionClient => fn upload_pending() -> () as SessionRequest::UploadPending, Error = SessionError);
client_method!(SessionClient => fn cancel() -> () as SessionRequest::Cancel, Error = SessionError);
client_method!(SessionClient => fn dismiss() -> () as SessionRequest::Dismiss, Error = SessionError);
client_method!(SessionClient => fn snapshot() -> SessionSnapshot as SessionRequest::Snapshot, Error = SessionError);
