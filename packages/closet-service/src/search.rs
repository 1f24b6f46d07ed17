use serde::{Deserialize, Serialize};
use tracing::Instrument;
use uuid::Uuid;

use crate::{
	ClosetService, Result,
	extract::{self, ExtractInput, ExtractOutcome, FailureReason},
	parse, rank,
};
use closet_domain::{AttributeSet, Product, SearchFilters};
use closet_providers::generative::InlineImage;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchRequest {
	#[serde(default)]
	pub query: String,
	#[serde(default)]
	pub filters: SearchFilters,
	#[serde(default)]
	pub limit: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct ImageSearchRequest {
	pub image: Vec<u8>,
	pub mime_type: String,
	pub limit: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultSource {
	Model,
	Fallback,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
	pub items: Vec<Product>,
	pub source: ResultSource,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub attributes: Option<AttributeSet>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub fallback_reason: Option<FailureReason>,
}
impl SearchResponse {
	fn model(items: Vec<Product>, attributes: AttributeSet) -> Self {
		Self {
			items,
			source: ResultSource::Model,
			attributes: Some(attributes),
			fallback_reason: None,
		}
	}

	fn fallback(items: Vec<Product>, reason: FailureReason) -> Self {
		Self {
			items,
			source: ResultSource::Fallback,
			attributes: None,
			fallback_reason: Some(reason),
		}
	}

	pub fn is_fallback(&self) -> bool {
		self.source == ResultSource::Fallback
	}
}

impl ClosetService {
	/// Finds catalog products matching a free-text request.
	///
	/// Model and catalog failures are answered from the fallback catalog. Only a zero `limit` is
	/// an error.
	pub async fn match_by_text(&self, req: SearchRequest) -> Result<SearchResponse> {
		let limit = self.resolve_limit(req.limit)?;
		let request_id = Uuid::new_v4();
		let input = ExtractInput::Text { query: &req.query, filters: &req.filters };
		let span = tracing::info_span!("match_by_text", %request_id);
		let outcome = self.run_pipeline(input, &req.filters, limit).instrument(span).await;
		let res = match outcome {
			Ok((items, attributes)) => SearchResponse::model(items, attributes),
			Err(reason) => SearchResponse::fallback(
				self.fallback.generate(&req.query, &req.filters, limit),
				reason,
			),
		};

		log_outcome(request_id, "text", &res);

		Ok(res)
	}

	/// Finds catalog products resembling the item in a photo.
	///
	/// Empty, oversized or non-image uploads are rejected before any model call.
	pub async fn match_by_image(&self, req: ImageSearchRequest) -> Result<SearchResponse> {
		let limit = self.resolve_limit(req.limit)?;

		self.validate_image(&req.image, &req.mime_type)?;

		let request_id = Uuid::new_v4();
		let input =
			ExtractInput::Image(InlineImage { mime_type: req.mime_type.trim(), data: &req.image });
		let filters = SearchFilters::default();
		let span = tracing::info_span!("match_by_image", %request_id);
		let outcome = self.run_pipeline(input, &filters, limit).instrument(span).await;
		let res = match outcome {
			Ok((items, attributes)) => SearchResponse::model(items, attributes),
			Err(reason) => {
				SearchResponse::fallback(self.fallback.generate_for_image(limit), reason)
			},
		};

		log_outcome(request_id, "image", &res);

		Ok(res)
	}

	async fn run_pipeline(
		&self,
		input: ExtractInput<'_>,
		filters: &SearchFilters,
		limit: usize,
	) -> std::result::Result<(Vec<Product>, AttributeSet), FailureReason> {
		let cfg = &self.cfg.providers.generative;
		let raw = match extract::extract(self.providers.generative.as_ref(), cfg, input).await {
			ExtractOutcome::Raw(raw) => raw,
			ExtractOutcome::Failed(reason) => return Err(reason),
		};
		let Some(attributes) = parse::parse_attributes(&raw) else {
			tracing::warn!(raw_len = raw.len(), "Model output contained no attribute object.");

			return Err(FailureReason::UnparsableOutput);
		};
		let products = self.catalog.query(filters).await.map_err(|err| {
			tracing::warn!(error = %err, "Catalog query failed.");

			FailureReason::CatalogUnavailable
		})?;
		let items = rank::rank(products, &attributes)
			.into_iter()
			.take(limit)
			.map(|ranked| ranked.product)
			.collect();

		Ok((items, attributes))
	}
}

fn log_outcome(request_id: Uuid, kind: &str, res: &SearchResponse) {
	match res.fallback_reason {
		Some(reason) => tracing::warn!(
			%request_id,
			kind,
			reason = reason.as_str(),
			count = res.items.len(),
			"Serving offline search results."
		),
		None => tracing::info!(
			%request_id,
			kind,
			terms = res.attributes.as_ref().map(AttributeSet::term_count).unwrap_or_default(),
			count = res.items.len(),
			"Search completed."
		),
	}
}
