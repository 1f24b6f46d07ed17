pub mod memory;
pub mod store;

mod error;

pub use error::Error;
pub use memory::InMemoryCatalog;
pub use store::{BoxFuture, CatalogStore};

pub type Result<T, E = Error> = std::result::Result<T, E>;
