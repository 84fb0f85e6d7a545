pub mod product;
pub mod category;
pub mod photo;

pub use product::*;
pub use category::*;
pub use photo::*;
