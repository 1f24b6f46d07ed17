use std::{fs, path::Path, sync::Arc};

use color_eyre::eyre::{self, WrapErr};

use closet_catalog::InMemoryCatalog;
use closet_config::Config;
use closet_domain::Product;
use closet_service::{ClosetService, parse};

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<ClosetService>,
}
impl AppState {
	pub fn new(config: Config) -> color_eyre::Result<Self> {
		let products = match config.catalog.seed_path.as_deref() {
			Some(path) => load_seed(path)?,
			None => Vec::new(),
		};
		let catalog = Arc::new(InMemoryCatalog::from_products(products));

		Ok(Self::with_service(ClosetService::new(config, catalog)))
	}

	pub fn with_service(service: ClosetService) -> Self {
		Self { service: Arc::new(service) }
	}
}

/// Reads catalog listings from a JSON file, salvaging whatever records are usable.
pub fn load_seed(path: &Path) -> color_eyre::Result<Vec<Product>> {
	let raw = fs::read_to_string(path)
		.wrap_err_with(|| format!("Failed to read catalog seed {}.", path.display()))?;
	let products = parse::parse_products(&raw)
		.ok_or_else(|| eyre::eyre!("Catalog seed {} holds no JSON records.", path.display()))?;

	tracing::info!(count = products.len(), path = %path.display(), "Catalog seed loaded.");

	Ok(products)
}
