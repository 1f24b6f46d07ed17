use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::GenerativeProvider;
use closet_config::GenerativeProviderConfig;
use closet_domain::SearchFilters;
use closet_providers::generative::InlineImage;

const ATTRIBUTE_SCHEMA: &str = r#"{
  "category": "string",
  "sub_category": "string",
  "colors": ["string"],
  "materials": ["string"],
  "style": "string",
  "pattern": "string",
  "condition": "string",
  "specific_features": ["string"],
  "tags": ["string"]
}"#;
const IMAGE_INSTRUCTION: &str = "You are a fashion resale assistant. Look at the attached photo \
and describe the item so it can be matched against second-hand listings. Only classify wearable \
fashion: clothing, footwear, accessories and bags. If the photo shows anything else, respond \
with {} and nothing more. Infer category, sub_category, colors, materials, style, pattern, \
specific_features, condition and tags from what is visible.";

/// What the extractor is asked to describe.
#[derive(Debug, Clone, Copy)]
pub enum ExtractInput<'a> {
	Text { query: &'a str, filters: &'a SearchFilters },
	Image(InlineImage<'a>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractOutcome {
	Raw(String),
	Failed(FailureReason),
}

/// Why a model-backed search fell back to offline results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
	Timeout,
	HttpStatus,
	Transport,
	MalformedResponse,
	UnparsableOutput,
	CatalogUnavailable,
}
impl FailureReason {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Timeout => "timeout",
			Self::HttpStatus => "http_status",
			Self::Transport => "transport",
			Self::MalformedResponse => "malformed_response",
			Self::UnparsableOutput => "unparsable_output",
			Self::CatalogUnavailable => "catalog_unavailable",
		}
	}
}

impl From<&closet_providers::Error> for FailureReason {
	fn from(err: &closet_providers::Error) -> Self {
		use closet_providers::Error;

		match err {
			Error::Timeout { .. } => Self::Timeout,
			Error::Status { .. } => Self::HttpStatus,
			Error::Reqwest(err) if err.is_timeout() => Self::Timeout,
			Error::Reqwest(_)
			| Error::InvalidConfig { .. }
			| Error::InvalidHeaderName(_)
			| Error::InvalidHeaderValue(_) => Self::Transport,
			Error::SerdeJson(_) | Error::InvalidResponse { .. } => Self::MalformedResponse,
		}
	}
}

/// Makes exactly one model call and returns its raw text.
///
/// The call is bounded by `timeout_ms` even when the provider ignores it.
pub async fn extract(
	provider: &dyn GenerativeProvider,
	cfg: &GenerativeProviderConfig,
	input: ExtractInput<'_>,
) -> ExtractOutcome {
	let (prompt, image) = match input {
		ExtractInput::Text { query, filters } => (text_prompt(query, filters), None),
		ExtractInput::Image(image) => (image_prompt(), Some(image)),
	};
	let budget = Duration::from_millis(cfg.timeout_ms);

	match tokio::time::timeout(budget, provider.generate(cfg, &prompt, image)).await {
		Ok(Ok(raw)) => ExtractOutcome::Raw(raw),
		Ok(Err(err)) => {
			tracing::warn!(
				error = %err,
				provider_id = %cfg.provider_id,
				"Attribute extraction failed."
			);

			ExtractOutcome::Failed(FailureReason::from(&err))
		},
		Err(_) => {
			tracing::warn!(
				timeout_ms = cfg.timeout_ms,
				provider_id = %cfg.provider_id,
				"Attribute extraction timed out."
			);

			ExtractOutcome::Failed(FailureReason::Timeout)
		},
	}
}

pub fn text_prompt(query: &str, filters: &SearchFilters) -> String {
	let query = serde_json::to_string(query.trim()).unwrap_or_default();
	let mut prompt = format!(
		"You are a fashion resale search assistant. Turn the shopper's request into structured \
		 search attributes.\nShopper request: {query}\n"
	);
	let constraints = filter_constraints(filters);

	if !constraints.is_empty() {
		prompt.push_str("Shopper filters: ");
		prompt.push_str(&constraints.join("; "));
		prompt.push('\n');
	}

	prompt.push_str(
		"Respond with exactly one JSON object and no other text. Use this schema, lowercase \
		 every value and leave out fields you cannot infer:\n",
	);
	prompt.push_str(ATTRIBUTE_SCHEMA);

	prompt
}

pub fn image_prompt() -> String {
	format!(
		"{IMAGE_INSTRUCTION}\nRespond with exactly one JSON object and no other text, using this \
		 schema with lowercase values:\n{ATTRIBUTE_SCHEMA}"
	)
}

fn filter_constraints(filters: &SearchFilters) -> Vec<String> {
	let mut constraints = Vec::new();

	if let Some(city) = non_blank(&filters.city) {
		constraints.push(format!("located in {city}"));
	}
	if let Some(product_type) = non_blank(&filters.product_type) {
		constraints.push(format!("product type {product_type}"));
	}
	if let Some(condition) = non_blank(&filters.condition) {
		constraints.push(format!("condition {condition}"));
	}

	match (filters.min_price, filters.max_price) {
		(Some(min), Some(max)) => constraints.push(format!("priced between ${min} and ${max}")),
		(Some(min), None) => constraints.push(format!("priced above ${min}")),
		(None, Some(max)) => constraints.push(format!("priced below ${max}")),
		(None, None) => {},
	}

	constraints
}

fn non_blank(value: &Option<String>) -> Option<&str> {
	value.as_deref().map(str::trim).filter(|value| !value.is_empty())
}
