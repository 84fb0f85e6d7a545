use std::mem;

use tokio::sync::mpsc;
use tracing::{debug, error, info, info_span, instrument, warn, Instrument};

use super::state::{EditSession, Phase, SessionState};
use crate::browse::{ProductBrowser, Route};
use crate::clients::CatalogueClient;
use crate::domain::{CategoryId, PhotoFile, ProductId, ProductPhoto, ProductRecord};
use crate::error::{CatalogueError, SessionError, ValidationError};
use crate::notify::Notifier;
use crate::validation::{FormEdit, FormMode};

/// Completion of a background photo fetch.
#[derive(Debug)]
pub struct PhotoLoaded {
    pub generation: u64,
    pub product_id: ProductId,
    pub result: Result<ProductPhoto, CatalogueError>,
}

/// Read-only view of the controller handed out by the session actor.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub phase: Phase,
    pub mode: Option<FormMode>,
    pub product: Option<ProductRecord>,
    pub category_id: Option<CategoryId>,
    pub form_valid: bool,
    pub pending_photo: Option<String>,
    pub photo: Option<ProductPhoto>,
    pub route: Route,
    pub products: Vec<ProductRecord>,
    pub thumbnails: Vec<ProductId>,
}

/// Drives the create/edit/upload workflow for the products page.
///
/// Every catalogue failure is reported through the notifier and returned to
/// the caller; the controller stays usable afterwards.
pub struct ProductEditController {
    catalogue: CatalogueClient,
    notifier: Notifier,
    browser: ProductBrowser,
    state: SessionState,
    generation: u64,
    photo_tx: mpsc::UnboundedSender<PhotoLoaded>,
    photo_rx: mpsc::UnboundedReceiver<PhotoLoaded>,
}

impl ProductEditController {
    pub fn new(catalogue: CatalogueClient, notifier: Notifier) -> Self {
        let (photo_tx, photo_rx) = mpsc::unbounded_channel();
        Self {
            browser: ProductBrowser::new(catalogue.clone(), notifier.clone()),
            catalogue,
            notifier,
            state: SessionState::Idle,
            generation: 0,
            photo_tx,
            photo_rx,
        }
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn session(&self) -> Option<&EditSession> {
        self.state.session()
    }

    pub fn browser(&self) -> &ProductBrowser {
        &self.browser
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let session = self.state.session();
        SessionSnapshot {
            phase: self.phase(),
            mode: session.map(|s| s.mode()),
            product: session.and_then(|s| s.product().cloned()),
            category_id: session.and_then(|s| s.category_id()),
            form_valid: session.is_some_and(|s| s.form().is_valid()),
            pending_photo: session.and_then(|s| s.pending_photo().map(|f| f.file_name.clone())),
            photo: session.and_then(|s| s.photo().cloned()),
            route: self.browser.route(),
            products: self.browser.products().to_vec(),
            thumbnails: self.browser.thumbnail_ids(),
        }
    }

    /// Page start-up: category selector, product list, then an empty create form.
    #[instrument(skip(self))]
    pub async fn load(&mut self) -> Result<(), SessionError> {
        let categories = self.browser.load_categories().await;
        let products = self.browser.reload().await;
        self.start_create();
        categories.and(products).map_err(SessionError::from)
    }

    #[instrument(skip(self))]
    pub async fn navigate(&mut self, route: Route) -> Result<(), SessionError> {
        self.browser.navigate(route).await.map_err(SessionError::from)
    }

    /// Resets to an empty create form. Never fails.
    #[instrument(skip(self))]
    pub fn start_create(&mut self) {
        let generation = self.next_generation();
        self.state = SessionState::Creating(EditSession::create(generation));
        debug!(generation, "Create session started");
    }

    /// Opens `product` for editing and starts loading its photo in the background.
    #[instrument(skip(self, product), fields(product_id = product.id, category_id = product.category_id))]
    pub fn start_edit(&mut self, product: ProductRecord) {
        let generation = self.next_generation();
        let product_id = product.id;
        let mut session = EditSession::edit(generation, product);
        session.photo_loading = true;
        self.state = SessionState::Editing(session);
        self.spawn_photo_fetch(generation, product_id);
        debug!(generation, "Edit session started");
    }

    /// Opens the photo upload for a listed product. A cached thumbnail is
    /// shown straight away; without one the photo is fetched as in `start_edit`.
    #[instrument(skip(self, product), fields(product_id = product.id, category_id = product.category_id))]
    pub fn start_photo_edit(&mut self, product: ProductRecord) {
        let generation = self.next_generation();
        let product_id = product.id;
        let mut session = EditSession::edit(generation, product);
        match self.browser.thumbnail(product_id) {
            Some(photo) => session.photo = Some(photo.clone()),
            None => {
                session.photo_loading = true;
                self.spawn_photo_fetch(generation, product_id);
            }
        }
        self.state = SessionState::Editing(session);
        debug!(generation, "Photo edit session started");
    }

    pub async fn load_thumbnails(&mut self) -> Result<usize, SessionError> {
        Ok(self.browser.load_thumbnails().await)
    }

    pub fn edit_form(&mut self, edit: FormEdit) -> Result<(), SessionError> {
        self.require_session()?.form.apply(edit);
        self.settle();
        Ok(())
    }

    /// Category dropdown change.
    #[instrument(skip(self))]
    pub fn select_category(&mut self, category_id: CategoryId) -> Result<(), SessionError> {
        self.require_session()?
            .form
            .apply(FormEdit::Category(Some(category_id)));
        self.settle();
        self.notifier.info("Category changed", "Info");
        Ok(())
    }

    /// Sends the working copy to `create` or `update`, depending on the form mode.
    #[instrument(skip(self))]
    pub async fn submit(&mut self) -> Result<ProductRecord, SessionError> {
        let session = self.require_session()?;
        let form_mode = session.form().mode();
        let draft = match session.form().value() {
            Ok(draft) => draft,
            Err(errors) => {
                warn!(?errors, "Submit blocked by invalid form");
                self.notifier.warning("Form not valid", "Warning");
                return Err(ValidationError::InvalidForm(errors).into());
            }
        };

        let result = match form_mode {
            FormMode::Create => self.catalogue.create(draft).await,
            FormMode::Edit => self.catalogue.update(draft).await,
        };

        let record = match result {
            Ok(record) => record,
            Err(e) => {
                error!(error = %e, "Submit failed");
                self.notifier.error(e.to_string(), "Error");
                return Err(e.into());
            }
        };

        let created = form_mode == FormMode::Create;
        if let Some(mut session) = self.state.take() {
            session.adopt(record.clone());
            self.state = SessionState::submitted(session, created);
        }

        info!(product_id = record.id, created, "Product submitted");
        if created {
            self.notifier.success("Product saved", "Success");
        } else {
            self.notifier.success("Product updated", "Success");
        }
        Ok(record)
    }

    /// Records the file chosen in the picker without uploading it.
    #[instrument(skip(self))]
    pub fn select_photo(&mut self, file: PhotoFile) -> Result<(), SessionError> {
        self.require_session()?.pending_photo = Some(file);
        self.settle();
        Ok(())
    }

    /// Uploads the previously selected file.
    pub async fn upload_pending(&mut self) -> Result<(), SessionError> {
        let pending = self.require_session()?.pending_photo.clone();
        match pending {
            Some(file) => self.attach_photo(file).await,
            None => Err(self.reject(ValidationError::MissingPhoto)),
        }
    }

    /// Uploads `file` for the current product and category, then refreshes
    /// the displayed photo. On failure the file stays pending for a retry.
    #[instrument(skip(self))]
    pub async fn attach_photo(&mut self, file: PhotoFile) -> Result<(), SessionError> {
        let session = self.require_session()?;
        let Some(category_id) = session.category_id() else {
            return Err(self.reject(ValidationError::MissingCategory));
        };
        let Some(product_id) = session.product_id() else {
            return Err(self.reject(ValidationError::MissingProduct));
        };
        let generation = session.generation();

        let result = self
            .catalogue
            .upload_photo(file.clone(), product_id, category_id)
            .await;

        let Some(mut session) = self.state.take() else {
            return Err(ValidationError::NoActiveSession.into());
        };
        let outcome = match result {
            Ok(()) => {
                info!(product_id, category_id, "Photo uploaded");
                session.pending_photo = None;
                session.photo_loading = true;
                self.browser.evict_thumbnail(product_id);
                self.notifier.success("File uploaded", "Success");
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Photo upload failed");
                session.pending_photo = Some(file);
                self.notifier.error(e.to_string(), "Error");
                Err(e.into())
            }
        };
        self.state = SessionState::resting(session);

        if outcome.is_ok() {
            self.spawn_photo_fetch(generation, product_id);
        }
        outcome
    }

    /// Abandons the session and reloads the listing.
    #[instrument(skip(self))]
    pub async fn cancel(&mut self) -> Result<(), SessionError> {
        self.close().await
    }

    /// Closes the post-save dialog and reloads the listing.
    #[instrument(skip(self))]
    pub async fn dismiss(&mut self) -> Result<(), SessionError> {
        self.close().await
    }

    /// Applies every photo result that has already arrived; returns how many
    /// were applied to the live session.
    pub fn apply_photo_updates(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(loaded) = self.photo_rx.try_recv() {
            if self.apply_photo(loaded) {
                applied += 1;
            }
        }
        applied
    }

    /// Waits for the next background photo result.
    pub async fn next_photo_update(&mut self) -> Option<PhotoLoaded> {
        self.photo_rx.recv().await
    }

    /// Applies one photo result if it belongs to the live session. Results
    /// from an earlier session are dropped.
    pub fn apply_photo(&mut self, loaded: PhotoLoaded) -> bool {
        let notifier = &self.notifier;
        let Some(session) = self.state.session_mut() else {
            debug!(generation = loaded.generation, "Photo arrived after session closed");
            return false;
        };
        if session.generation() != loaded.generation || session.product_id() != Some(loaded.product_id) {
            debug!(
                generation = loaded.generation,
                live = session.generation(),
                "Dropping stale photo"
            );
            return false;
        }

        session.photo_loading = false;
        match loaded.result {
            Ok(photo) => {
                self.browser.cache_thumbnail(loaded.product_id, photo.clone());
                session.photo = Some(photo);
            }
            Err(CatalogueError::PhotoNotFound(_)) => session.photo = None,
            Err(e) => {
                warn!(error = %e, product_id = loaded.product_id, "Photo fetch failed");
                notifier.warning("Could not load photo", "Warning");
            }
        }
        true
    }

    async fn close(&mut self) -> Result<(), SessionError> {
        self.state = SessionState::Idle;
        debug!("Session closed");
        self.browser.reload().await.map_err(SessionError::from)
    }

    /// Re-derives the state after an in-place change to the session.
    fn settle(&mut self) {
        self.state = mem::take(&mut self.state).reconcile();
    }

    fn next_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    fn require_session(&mut self) -> Result<&mut EditSession, SessionError> {
        if self.state.session().is_none() {
            return Err(self.reject(ValidationError::NoActiveSession));
        }
        self.state
            .session_mut()
            .ok_or_else(|| ValidationError::NoActiveSession.into())
    }

    fn reject(&self, e: ValidationError) -> SessionError {
        warn!(error = %e, "Action blocked");
        let message = match &e {
            ValidationError::MissingCategory => "Category id not valid",
            ValidationError::MissingProduct => "Save the product before adding a photo",
            ValidationError::MissingPhoto => "Select a photo first",
            ValidationError::NoActiveSession => "No product is being edited",
            ValidationError::InvalidForm(_) => "Form not valid",
        };
        self.notifier.warning(message, "Warning");
        e.into()
    }

    fn spawn_photo_fetch(&self, generation: u64, product_id: ProductId) {
        let catalogue = self.catalogue.clone();
        let photo_tx = self.photo_tx.clone();
        let span = info_span!("photo_fetch", product_id, generation);
        tokio::spawn(
            async move {
                let result = catalogue.fetch_photo(product_id).await;
                let _ = photo_tx.send(PhotoLoaded {
                    generation,
                    product_id,
                    result,
                });
            }
            .instrument(span),
        );
    }
}
