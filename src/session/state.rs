use std::mem;

use crate::domain::{CategoryId, PhotoFile, ProductId, ProductPhoto, ProductRecord};
use crate::validation::{FormMode, ProductForm};

/// One editing interaction: the working copy plus everything the upload
/// sub-flow needs. Built fresh by `start_create`/`start_edit`, never reused.
#[derive(Debug, Clone, PartialEq)]
pub struct EditSession {
    generation: u64,
    mode: FormMode,
    product: Option<ProductRecord>,
    pub(crate) form: ProductForm,
    pub(crate) pending_photo: Option<PhotoFile>,
    pub(crate) photo: Option<ProductPhoto>,
    pub(crate) photo_loading: bool,
}

impl EditSession {
    pub fn create(generation: u64) -> Self {
        Self {
            generation,
            mode: FormMode::Create,
            product: None,
            form: ProductForm::build(None, FormMode::Create),
            pending_photo: None,
            photo: None,
            photo_loading: false,
        }
    }

    pub fn edit(generation: u64, product: ProductRecord) -> Self {
        Self {
            generation,
            mode: FormMode::Edit,
            form: ProductForm::build(Some(&product), FormMode::Edit),
            product: Some(product),
            pending_photo: None,
            photo: None,
            photo_loading: false,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// How the session was started. Unlike `form().mode()` this stays
    /// `Create` after the first save.
    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn product(&self) -> Option<&ProductRecord> {
        self.product.as_ref()
    }

    pub fn product_id(&self) -> Option<ProductId> {
        self.product.as_ref().map(|p| p.id)
    }

    pub fn category_id(&self) -> Option<CategoryId> {
        self.form.category_id
    }

    pub fn form(&self) -> &ProductForm {
        &self.form
    }

    pub fn pending_photo(&self) -> Option<&PhotoFile> {
        self.pending_photo.as_ref()
    }

    pub fn photo(&self) -> Option<&ProductPhoto> {
        self.photo.as_ref()
    }

    pub fn is_photo_loading(&self) -> bool {
        self.photo_loading
    }

    /// A photo can only be bound to a persisted product in a known category.
    pub fn can_upload(&self) -> bool {
        self.product.is_some() && self.category_id().is_some()
    }

    /// Adopts the record returned by the catalogue. The form switches to edit
    /// mode so a further submit updates instead of creating a duplicate.
    pub(crate) fn adopt(&mut self, record: ProductRecord) {
        self.form = ProductForm::build(Some(&record), FormMode::Edit);
        self.product = Some(record);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Creating,
    Editing,
    Saved,
    Updated,
    PhotoPending,
}

/// Workflow state. Every non-idle state owns the session, so there is no way
/// to hold a working copy while idle or to be creating and editing at once.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Creating(EditSession),
    Editing(EditSession),
    Saved(EditSession),
    Updated(EditSession),
    PhotoPending(EditSession),
}

impl SessionState {
    pub fn phase(&self) -> Phase {
        match self {
            SessionState::Idle => Phase::Idle,
            SessionState::Creating(_) => Phase::Creating,
            SessionState::Editing(_) => Phase::Editing,
            SessionState::Saved(_) => Phase::Saved,
            SessionState::Updated(_) => Phase::Updated,
            SessionState::PhotoPending(_) => Phase::PhotoPending,
        }
    }

    pub fn session(&self) -> Option<&EditSession> {
        match self {
            SessionState::Idle => None,
            SessionState::Creating(s)
            | SessionState::Editing(s)
            | SessionState::Saved(s)
            | SessionState::Updated(s)
            | SessionState::PhotoPending(s) => Some(s),
        }
    }

    pub fn session_mut(&mut self) -> Option<&mut EditSession> {
        match self {
            SessionState::Idle => None,
            SessionState::Creating(s)
            | SessionState::Editing(s)
            | SessionState::Saved(s)
            | SessionState::Updated(s)
            | SessionState::PhotoPending(s) => Some(s),
        }
    }

    /// Moves the session out, leaving `Idle` behind.
    pub fn take(&mut self) -> Option<EditSession> {
        match mem::take(self) {
            SessionState::Idle => None,
            SessionState::Creating(s)
            | SessionState::Editing(s)
            | SessionState::Saved(s)
            | SessionState::Updated(s)
            | SessionState::PhotoPending(s) => Some(s),
        }
    }

    /// The state a session rests in when no call is outstanding.
    pub fn resting(session: EditSession) -> Self {
        if session.pending_photo.is_some() && session.can_upload() {
            return SessionState::PhotoPending(session);
        }
        match (session.product.is_some(), session.mode) {
            (false, _) => SessionState::Creating(session),
            (true, FormMode::Create) => SessionState::Saved(session),
            (true, FormMode::Edit) => SessionState::Editing(session),
        }
    }

    /// Re-derives the state after the working copy changed in place.
    /// `Saved` and `Updated` survive; only `PhotoPending` is entered or left.
    pub fn reconcile(self) -> Self {
        let ready = self
            .session()
            .is_some_and(|s| s.pending_photo.is_some() && s.can_upload());
        match self {
            SessionState::PhotoPending(s) if !ready => SessionState::resting(s),
            SessionState::Editing(s) | SessionState::Saved(s) | SessionState::Updated(s) if ready => {
                SessionState::PhotoPending(s)
            }
            other => other,
        }
    }

    /// State after a successful submit.
    pub fn submitted(session: EditSession, created: bool) -> Self {
        if session.pending_photo.is_some() && session.can_upload() {
            SessionState::PhotoPending(session)
        } else if created {
            SessionState::Saved(session)
        } else {
            SessionState::Updated(session)
        }
    }
}
