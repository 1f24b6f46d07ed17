use serde::{Deserialize, Serialize, Serializer};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::{
	ClosetService, Error, Result,
	extract::{self, ExtractInput, ExtractOutcome},
	parse,
};
use closet_domain::{AttributeSet, Product, attributes, price, product::UNKNOWN_BRAND};
use closet_providers::generative::InlineImage;

/// Seller-submitted listing before it receives an id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListingDraft {
	pub title: String,
	#[serde(default)]
	pub description: String,
	pub price: f64,
	pub location: String,
	pub condition: String,
	#[serde(default)]
	pub category: String,
	#[serde(default, alias = "subCategory")]
	pub sub_category: String,
	#[serde(default)]
	pub brand: Option<String>,
	#[serde(default)]
	pub tags: Vec<String>,
	#[serde(default, alias = "imageUrl")]
	pub image_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingStatus {
	Pending,
}

#[derive(Debug, Clone, Serialize)]
pub struct SavedListing {
	#[serde(flatten)]
	pub product: Product,
	pub status: ListingStatus,
	#[serde(serialize_with = "rfc3339")]
	pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListingsResponse {
	pub items: Vec<SavedListing>,
	pub total: usize,
}

impl ClosetService {
	/// Validates a draft, assigns it an id and adds it to the catalog.
	///
	/// Only drafts that pass validation draw an id. A draft the catalog then refuses, for example
	/// on an id conflict, still consumes its id and leaves a gap in the sequence.
	pub async fn save_listing(&self, draft: ListingDraft) -> Result<SavedListing> {
		let mut product = draft_to_product(draft)?;
		let mut saved = self.listings.write().await;

		product.id = self.listing_ids.next_id();

		let product = self.catalog.insert(product).await?;
		let listing = SavedListing {
			product,
			status: ListingStatus::Pending,
			created_at: OffsetDateTime::now_utc(),
		};

		saved.push(listing.clone());

		tracing::info!(listing_id = %listing.product.id, "Listing saved.");

		Ok(listing)
	}

	/// Returns every listing saved through this service, oldest first.
	pub async fn list_listings(&self) -> Result<ListingsResponse> {
		let items = self.listings.read().await.clone();
		let total = items.len();

		Ok(ListingsResponse { items, total })
	}

	/// Describes a listing photo so the seller can pre-fill the form.
	///
	/// Unlike search, a model failure is reported to the caller.
	pub async fn analyze_listing_image(
		&self,
		image: &[u8],
		mime_type: &str,
	) -> Result<AttributeSet> {
		self.validate_image(image, mime_type)?;

		let input = ExtractInput::Image(InlineImage { mime_type: mime_type.trim(), data: image });
		let cfg = &self.cfg.providers.generative;
		let raw = match extract::extract(self.providers.generative.as_ref(), cfg, input).await {
			ExtractOutcome::Raw(raw) => raw,
			ExtractOutcome::Failed(reason) => {
				return Err(Error::Provider {
					message: format!("Image analysis failed: {}.", reason.as_str()),
				});
			},
		};

		parse::parse_attributes(&raw).ok_or_else(|| Error::Provider {
			message: "Image analysis returned no attribute object.".to_string(),
		})
	}
}

fn draft_to_product(draft: ListingDraft) -> Result<Product> {
	let title = required(&draft.title, "title")?;
	let location = required(&draft.location, "location")?;
	let condition = required(&draft.condition, "condition")?;

	if !price::is_valid_price(draft.price) {
		return Err(Error::InvalidRequest {
			message: "price must be a finite, non-negative number.".to_string(),
		});
	}

	let image_url = draft
		.image_url
		.map(|url| url.trim().to_string())
		.filter(|url| !url.is_empty());

	if let Some(url) = image_url.as_deref()
		&& !(url.starts_with("http://") || url.starts_with("https://"))
	{
		return Err(Error::InvalidRequest {
			message: "image_url must be an http(s) URL.".to_string(),
		});
	}

	let brand = draft
		.brand
		.map(|brand| brand.trim().to_string())
		.filter(|brand| !brand.is_empty())
		.unwrap_or_else(|| UNKNOWN_BRAND.to_string());
	let mut seen = std::collections::HashSet::new();
	let tags = draft
		.tags
		.iter()
		.map(|tag| tag.trim())
		.filter(|tag| {
			attributes::normalize_term(tag).is_some_and(|normalized| seen.insert(normalized))
		})
		.map(str::to_string)
		.collect();

	Ok(Product {
		id: String::new(),
		name: title,
		price: draft.price,
		location,
		condition,
		category: draft.category.trim().to_string(),
		sub_category: draft.sub_category.trim().to_string(),
		description: draft.description.trim().to_string(),
		brand,
		tags,
		image_url,
		featured: false,
	})
}

fn required(value: &str, field: &str) -> Result<String> {
	let trimmed = value.trim();

	if trimmed.is_empty() {
		return Err(Error::InvalidRequest { message: format!("{field} is required.") });
	}

	Ok(trimmed.to_string())
}

fn rfc3339<S>(value: &OffsetDateTime, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
	S: Serializer,
{
	let formatted = value.format(&Rfc3339).map_err(serde::ser::Error::custom)?;

	serializer.serialize_str(&formatted)
}
