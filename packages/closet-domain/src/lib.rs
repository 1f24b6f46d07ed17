pub mod attributes;
pub mod filters;
pub mod ids;
pub mod price;
pub mod product;

pub use attributes::AttributeSet;
pub use filters::SearchFilters;
pub use ids::{IdGenerator, SequentialIds, UuidIds};
pub use product::Product;
