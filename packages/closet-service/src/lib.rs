pub mod browse;
pub mod extract;
pub mod fallback;
pub mod listings;
pub mod parse;
pub mod rank;
pub mod search;

mod error;

pub use browse::{BrowseRequest, BrowseResponse};
pub use error::{Error, Result};
pub use extract::{ExtractInput, ExtractOutcome, FailureReason};
pub use fallback::FallbackCatalog;
pub use listings::{ListingDraft, ListingStatus, ListingsResponse, SavedListing};
pub use parse::JsonPayload;
pub use rank::RankedProduct;
pub use search::{ImageSearchRequest, ResultSource, SearchRequest, SearchResponse};

use std::sync::Arc;

use tokio::sync::RwLock;

use closet_catalog::{BoxFuture, CatalogStore};
use closet_config::{Config, GenerativeProviderConfig};
use closet_domain::{IdGenerator, SequentialIds};
use closet_providers::generative::{self, InlineImage};

/// Model that turns a prompt, and optionally an image, into text.
pub trait GenerativeProvider
where
	Self: Send + Sync,
{
	fn generate<'a>(
		&'a self,
		cfg: &'a GenerativeProviderConfig,
		prompt: &'a str,
		image: Option<InlineImage<'a>>,
	) -> BoxFuture<'a, closet_providers::Result<String>>;
}

#[derive(Clone)]
pub struct Providers {
	pub generative: Arc<dyn GenerativeProvider>,
}
impl Providers {
	pub fn new(generative: Arc<dyn GenerativeProvider>) -> Self {
		Self { generative }
	}
}
impl Default for Providers {
	fn default() -> Self {
		Self { generative: Arc::new(DefaultProviders) }
	}
}

pub struct ClosetService {
	pub cfg: Config,
	pub catalog: Arc<dyn CatalogStore>,
	pub providers: Providers,
	pub fallback: FallbackCatalog,
	pub listing_ids: Arc<dyn IdGenerator>,
	listings: RwLock<Vec<SavedListing>>,
}
impl ClosetService {
	pub fn new(cfg: Config, catalog: Arc<dyn CatalogStore>) -> Self {
		Self::with_providers(cfg, catalog, Providers::default())
	}

	pub fn with_providers(
		cfg: Config,
		catalog: Arc<dyn CatalogStore>,
		providers: Providers,
	) -> Self {
		let fallback = FallbackCatalog::new(&SequentialIds::new("", 1));
		let listing_ids =
			Arc::new(SequentialIds::new(cfg.listings.id_prefix.clone(), cfg.listings.id_start));

		Self { cfg, catalog, providers, fallback, listing_ids, listings: RwLock::default() }
	}

	/// Replaces the generator used for saved listing ids.
	pub fn with_listing_ids(mut self, ids: Arc<dyn IdGenerator>) -> Self {
		self.listing_ids = ids;

		self
	}

	/// Rebuilds the fallback catalog with ids drawn from `ids`.
	pub fn with_fallback_ids(mut self, ids: &dyn IdGenerator) -> Self {
		self.fallback = FallbackCatalog::new(ids);

		self
	}

	/// Resolves a requested result count against the configured default and maximum.
	pub(crate) fn resolve_limit(&self, requested: Option<u32>) -> Result<usize> {
		let limit = match requested {
			Some(0) => {
				return Err(Error::InvalidRequest {
					message: "limit must be greater than zero.".to_string(),
				});
			},
			Some(limit) => limit.min(self.cfg.search.max_limit),
			None => self.cfg.search.default_limit,
		};

		Ok(limit as usize)
	}

	/// Rejects images the extractor must never see.
	pub(crate) fn validate_image(&self, image: &[u8], mime_type: &str) -> Result<()> {
		if image.is_empty() {
			return Err(Error::InvalidRequest { message: "image must not be empty.".to_string() });
		}
		if !mime_type.trim().to_ascii_lowercase().starts_with("image/") {
			return Err(Error::InvalidRequest {
				message: format!("mime_type {mime_type:?} is not an image type."),
			});
		}
		if image.len() as u64 > self.cfg.search.max_image_bytes {
			return Err(Error::InvalidRequest {
				message: format!(
					"image is {} bytes; the maximum is {} bytes.",
					image.len(),
					self.cfg.search.max_image_bytes
				),
			});
		}

		Ok(())
	}
}

struct DefaultProviders;
impl GenerativeProvider for DefaultProviders {
	fn generate<'a>(
		&'a self,
		cfg: &'a GenerativeProviderConfig,
		prompt: &'a str,
		image: Option<InlineImage<'a>>,
	) -> BoxFuture<'a, closet_providers::Result<String>> {
		Box::pin(generative::generate(cfg, prompt, image))
	}
}
