#[macro_use]
mod macros;

pub mod catalogue_client;
pub mod session_client;

pub use catalogue_client::*;
pub use session_client::*;
