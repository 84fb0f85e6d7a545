use tokio::sync::mpsc;
use tracing::{debug, info, instrument};

use super::controller::ProductEditController;
use crate::clients::SessionClient;
use crate::messages::SessionRequest;

/// Mailbox front-end for one `ProductEditController`.
///
/// Requests are served strictly in arrival order, so a second submit sent
/// while the first is in flight waits for it instead of racing it.
/// Background photo results are applied between requests.
pub struct SessionActor {
    receiver: mpsc::Receiver<SessionRequest>,
    controller: ProductEditController,
}

impl SessionActor {
    pub fn new(buffer_size: usize, controller: ProductEditController) -> (Self, SessionClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            controller,
        };
        (actor, SessionClient::new(sender))
    }

    #[instrument(name = "session_actor", skip(self))]
    pub async fn run(mut self) {
        info!("SessionActor starting");

        loop {
            tokio::select! {
                msg = self.receiver.recv() => {
                    match msg {
                        Some(SessionRequest::Shutdown) | None => break,
                        Some(msg) => self.handle(msg).await,
                    }
                }
                Some(loaded) = self.controller.next_photo_update() => {
                    let applied = self.controller.apply_photo(loaded);
                    debug!(applied, "Photo result processed");
                }
            }
        }

        info!("SessionActor stopped");
    }

    async fn handle(&mut self, msg: SessionRequest) {
        let c = &mut self.controller;
        match msg {
            SessionRequest::Load { respond_to } => {
                let _ = respond_to.send(c.load().await);
            }
            SessionRequest::Navigate { route, respond_to } => {
                let _ = respond_to.send(c.navigate(route).await);
            }
            SessionRequest::StartCreate { respond_to } => {
                c.start_create();
                let _ = respond_to.send(Ok(()));
            }
            SessionRequest::StartEdit { product, respond_to } => {
                c.start_edit(product);
                let _ = respond_to.send(Ok(()));
            }
            SessionRequest::StartPhotoEdit { product, respond_to } => {
                c.start_photo_edit(product);
                let _ = respond_to.send(Ok(()));
            }
            SessionRequest::LoadThumbnails { respond_to } => {
                let _ = respond_to.send(c.load_thumbnails().await);
            }
            SessionRequest::EditForm { edit, respond_to } => {
                let _ = respond_to.send(c.edit_form(edit));
            }
            SessionRequest::SelectCategory {
                category_id,
                respond_to,
            } => {
                let _ = respond_to.send(c.select_category(category_id));
            }
            SessionRequest::Submit { respond_to } => {
                let _ = respond_to.send(c.submit().await);
            }
            SessionRequest::SelectPhoto { file, respond_to } => {
                let _ = respond_to.send(c.select_photo(file));
            }
            SessionRequest::AttachPhoto { file, respond_to } => {
                let _ = respond_to.send(c.attach_photo(file).await);
            }
            SessionRequest::UploadPending { respond_to } => {
                let _ = respond_to.send(c.upload_pending().await);
            }
            SessionRequest::Cancel { respond_to } => {
                let _ = respond_to.send(c.cancel().await);
            }
            SessionRequest::Dismiss { respond_to } => {
                let _ = respond_to.send(c.dismiss().await);
            }
            SessionRequest::Snapshot { respond_to } => {
                c.apply_photo_updates();
                let _ = respond_to.send(Ok(c.snapshot()));
            }
            SessionRequest::Shutdown => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browse::Route;
    use crate::catalogue::InMemoryCatalogue;
    use crate::domain::{PhotoFile, ProductRecord};
    use crate::error::{SessionError, ValidationError};
    use crate::notify::Notifier;
    use crate::session::Phase;
    use crate::validation::FormEdit;

    fn start() -> SessionClient {
        let (catalogue, catalogue_client) = InMemoryCatalogue::new(10);
        tokio::spawn(
            catalogue
                .with_category(3, "Tools")
                .with_product(ProductRecord::new(1, "Hammer", 12.0, 3))
                .run(),
        );
        let (notifier, _notifications) = Notifier::channel();
        let controller = ProductEditController::new(catalogue_client, notifier);
        let (actor, client) = SessionActor::new(10, controller);
        tokio::spawn(actor.run());
        client
    }

    #[tokio::test]
    async fn test_overlapping_submits_are_serialised() {
        let client = start();
        client.load().await.unwrap();
        client.edit_form(FormEdit::Name("Widget".into())).await.unwrap();
        client.edit_form(FormEdit::CurrentPrice(Some(9.99))).await.unwrap();
        client.select_category(3).await.unwrap();

        let (first, second) = tokio::join!(client.submit(), client.submit());
        let first = first.unwrap();
        let second = second.unwrap();

        // The second submit saw the saved record and updated it.
        assert_eq!(first.id, second.id);
        let snapshot = client.snapshot().await.unwrap();
        assert_eq!(snapshot.phase, Phase::Updated);

        client.dismiss().await.unwrap();
        let snapshot = client.snapshot().await.unwrap();
        assert_eq!(snapshot.phase, Phase::Idle);
        assert_eq!(snapshot.products.len(), 2);
    }

    #[tokio::test]
    async fn test_pending_photo_uploaded_through_client() {
        let client = start();
        client.load().await.unwrap();
        client
            .start_edit(ProductRecord::new(1, "Hammer", 12.0, 3))
            .await
            .unwrap();

        client
            .select_photo(PhotoFile::new("hammer.png", vec![7, 7]))
            .await
            .unwrap();
        let snapshot = client.snapshot().await.unwrap();
        assert_eq!(snapshot.phase, Phase::PhotoPending);
        assert_eq!(snapshot.pending_photo.as_deref(), Some("hammer.png"));

        client.upload_pending().await.unwrap();
        let snapshot = client.snapshot().await.unwrap();
        assert_eq!(snapshot.phase, Phase::Editing);
        assert!(snapshot.pending_photo.is_none());

        // the listing now reports the stored photo and can cache it
        client.navigate(Route::All).await.unwrap();
        let snapshot = client.snapshot().await.unwrap();
        assert_eq!(snapshot.products[0].photo_name.as_deref(), Some("hammer.png"));
        client.load_thumbnails().await.unwrap();
        let snapshot = client.snapshot().await.unwrap();
        assert_eq!(snapshot.thumbnails, vec![1]);

        client
            .start_photo_edit(snapshot.products[0].clone())
            .await
            .unwrap();
        let snapshot = client.snapshot().await.unwrap();
        assert_eq!(snapshot.photo.map(|p| p.bytes), Some(vec![7, 7]));
    }

    #[tokio::test]
    async fn test_errors_are_returned_through_client() {
        let client = start();
        assert_eq!(
            client.submit().await,
            Err(SessionError::Validation(ValidationError::NoActiveSession))
        );
    }

    #[tokio::test]
    async fn test_shutdown_stops_actor() {
        let client = start();
        client.shutdown().await.unwrap();
        assert!(matches!(
            client.snapshot().await,
            Err(SessionError::ActorCommunicationError(_))
        ));
    }
}
