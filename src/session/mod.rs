//! The product edit/create/upload workflow.

pub mod actor;
pub mod controller;
pub mod state;

pub use actor::SessionActor;
pub use controller::{ProductEditController, SessionSnapshot};
pub use state::Phase;
