use std::collections::HashSet;

use tokio::sync::RwLock;

use closet_domain::{Product, SearchFilters};

use crate::{BoxFuture, CatalogStore, Error, Result};

/// Catalog held in process memory, in insertion order.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
	products: RwLock<Vec<Product>>,
}
impl InMemoryCatalog {
	/// Builds a catalog, keeping the first record for each id.
	pub fn from_products(products: Vec<Product>) -> Self {
		let total = products.len();
		let mut seen = HashSet::new();
		let products = products
			.into_iter()
			.filter(|product| seen.insert(product.id.clone()))
			.collect::<Vec<_>>();

		if products.len() < total {
			tracing::warn!(
				dropped = total - products.len(),
				"Dropped catalog records with duplicate ids."
			);
		}

		Self { products: RwLock::new(products) }
	}

	pub async fn len(&self) -> usize {
		self.products.read().await.len()
	}

	pub async fn is_empty(&self) -> bool {
		self.products.read().await.is_empty()
	}
}
impl CatalogStore for InMemoryCatalog {
	fn list_all(&self) -> BoxFuture<'_, Result<Vec<Product>>> {
		Box::pin(async move { Ok(self.products.read().await.clone()) })
	}

	fn query<'a>(&'a self, filters: &'a SearchFilters) -> BoxFuture<'a, Result<Vec<Product>>> {
		Box::pin(async move {
			let products = self.products.read().await;

			Ok(products.iter().filter(|product| filters.matches(product)).cloned().collect())
		})
	}

	fn get<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<Option<Product>>> {
		Box::pin(async move {
			let products = self.products.read().await;

			Ok(products.iter().find(|product| product.id == id).cloned())
		})
	}

	fn insert(&self, product: Product) -> BoxFuture<'_, Result<Product>> {
		Box::pin(async move {
			if !product.is_rankable() {
				return Err(Error::InvalidArgument(format!(
					"Listing {} is missing a required field.",
					product.id
				)));
			}

			let mut products = self.products.write().await;

			if products.iter().any(|existing| existing.id == product.id) {
				return Err(Error::Conflict(format!("Listing {} already exists.", product.id)));
			}

			products.push(product.clone());

			Ok(product)
		})
	}
}
