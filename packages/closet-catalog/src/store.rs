use std::{future::Future, pin::Pin};

use closet_domain::{Product, SearchFilters};

use crate::Result;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Product listings as seen by search and browse.
///
/// Reads never mutate records. `insert` exists for the listing flow only.
pub trait CatalogStore
where
	Self: Send + Sync,
{
	fn list_all(&self) -> BoxFuture<'_, Result<Vec<Product>>>;

	fn query<'a>(&'a self, filters: &'a SearchFilters) -> BoxFuture<'a, Result<Vec<Product>>>;

	fn get<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<Option<Product>>>;

	fn insert(&self, product: Product) -> BoxFuture<'_, Result<Product>>;
}
