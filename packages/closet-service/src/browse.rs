use serde::{Deserialize, Serialize};

use crate::{ClosetService, Error, Result};
use closet_domain::{Product, SearchFilters, filters};

/// Plain catalog listing, with filters spelled out as flat fields for query strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BrowseRequest {
	#[serde(default)]
	pub query: Option<String>,
	#[serde(default)]
	pub city: Option<String>,
	#[serde(default)]
	pub product_type: Option<String>,
	#[serde(default)]
	pub condition: Option<String>,
	#[serde(default)]
	pub min_price: Option<f64>,
	#[serde(default)]
	pub max_price: Option<f64>,
	#[serde(default)]
	pub limit: Option<u32>,
}
impl BrowseRequest {
	pub fn filters(&self) -> SearchFilters {
		SearchFilters {
			city: self.city.clone(),
			product_type: self.product_type.clone(),
			condition: self.condition.clone(),
			min_price: self.min_price,
			max_price: self.max_price,
		}
	}
}

#[derive(Debug, Clone, Serialize)]
pub struct BrowseResponse {
	pub items: Vec<Product>,
	pub total: usize,
}

impl ClosetService {
	/// Lists catalog products passing the filters and free-text query, in catalog order.
	pub async fn browse(&self, req: BrowseRequest) -> Result<BrowseResponse> {
		let limit = self.resolve_limit(req.limit)?;

		if let (Some(min), Some(max)) = (req.min_price, req.max_price)
			&& min > max
		{
			return Err(Error::InvalidRequest {
				message: "min_price must not exceed max_price.".to_string(),
			});
		}

		let query = req.query.as_deref().unwrap_or_default();
		let matched = self
			.catalog
			.query(&req.filters())
			.await?
			.into_iter()
			.filter(|product| filters::matches_query(product, query))
			.collect::<Vec<_>>();
		let total = matched.len();
		let items = matched.into_iter().take(limit).collect();

		Ok(BrowseResponse { items, total })
	}

	/// Lists products flagged as featured, in catalog order.
	pub async fn featured_products(&self, limit: Option<u32>) -> Result<BrowseResponse> {
		let limit = self.resolve_limit(limit)?;
		let featured = self
			.catalog
			.list_all()
			.await?
			.into_iter()
			.filter(|product| product.featured)
			.collect::<Vec<_>>();
		let total = featured.len();
		let items = featured.into_iter().take(limit).collect();

		Ok(BrowseResponse { items, total })
	}

	pub async fn get_product(&self, id: &str) -> Result<Product> {
		let id = id.trim();

		if id.is_empty() {
			return Err(Error::InvalidRequest { message: "id must not be empty.".to_string() });
		}

		self.catalog
			.get(id)
			.await?
			.ok_or_else(|| Error::NotFound { message: format!("Product {id} does not exist.") })
	}
}
