//! Catalogue backends. Each one is an actor serving `CatalogueRequest`s and
//! handing out a `CatalogueClient`.

pub mod http;
pub mod memory;
pub mod wire;

pub use http::HttpCatalogue;
pub use memory::InMemoryCatalogue;
