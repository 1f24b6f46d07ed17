use axum::{
	Json, Router,
	extract::{DefaultBodyLimit, Path, Query, State, rejection::JsonRejection},
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, post},
};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};

use crate::state::AppState;
use closet_domain::{AttributeSet, Product};
use closet_service::{
	BrowseRequest, BrowseResponse, Error, ImageSearchRequest, ListingDraft, ListingsResponse,
	SavedListing, SearchRequest, SearchResponse,
};

/// Room left in a request body for the JSON fields around the encoded image.
const ENVELOPE_BYTES: u64 = 64 * 1024;

#[derive(Debug, Default, Deserialize)]
pub struct FeaturedQuery {
	#[serde(default)]
	pub limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct ImageSearchBody {
	pub image_base64: String,
	pub mime_type: String,
	#[serde(default)]
	pub limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeImageBody {
	pub image_base64: String,
	pub mime_type: String,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
	fields: Option<Vec<String>>,
}
impl ApiError {
	fn new(
		status: StatusCode,
		error_code: impl Into<String>,
		message: impl Into<String>,
		fields: Option<Vec<String>>,
	) -> Self {
		Self { status, error_code: error_code.into(), message: message.into(), fields }
	}
}
impl From<Error> for ApiError {
	fn from(err: Error) -> Self {
		match err {
			Error::InvalidRequest { message } =>
				json_error(StatusCode::BAD_REQUEST, "INVALID_REQUEST", message, None),
			Error::NotFound { message } =>
				json_error(StatusCode::NOT_FOUND, "NOT_FOUND", message, None),
			Error::Conflict { message } =>
				json_error(StatusCode::CONFLICT, "CONFLICT", message, None),
			Error::Provider { message } =>
				json_error(StatusCode::BAD_GATEWAY, "PROVIDER_ERROR", message, None),
			Error::Catalog { message } => {
				tracing::error!(error = %message, "Catalog request failed.");

				json_error(StatusCode::INTERNAL_SERVER_ERROR, "CATALOG_ERROR", message, None)
			},
		}
	}
}
impl From<JsonRejection> for ApiError {
	fn from(rejection: JsonRejection) -> Self {
		let status = rejection.status();
		let code = if status == StatusCode::PAYLOAD_TOO_LARGE {
			"PAYLOAD_TOO_LARGE"
		} else {
			"INVALID_REQUEST"
		};

		json_error(status, code, rejection.body_text(), None)
	}
}
impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body =
			ErrorBody { error_code: self.error_code, message: self.message, fields: self.fields };

		(self.status, Json(body)).into_response()
	}
}

pub fn router(state: AppState) -> Router {
	let body_limit = body_limit(state.service.cfg.search.max_image_bytes);

	Router::new()
		.route("/health", get(health))
		.route("/v1/search/text", post(search_text))
		.route("/v1/search/image", post(search_image))
		.route("/v1/products", get(browse))
		.route("/v1/products/featured", get(featured_products))
		.route("/v1/products/{id}", get(get_product))
		.route("/v1/listings", get(list_listings).post(save_listing))
		.route("/v1/listings/analyze", post(analyze_listing_image))
		.layer(DefaultBodyLimit::max(body_limit))
		.with_state(state)
}

/// Largest accepted request body: a base64 image of `max_image_bytes` plus its JSON envelope.
fn body_limit(max_image_bytes: u64) -> usize {
	let encoded = max_image_bytes.div_ceil(3).saturating_mul(4);

	usize::try_from(encoded.saturating_add(ENVELOPE_BYTES)).unwrap_or(usize::MAX)
}

pub fn json_error(
	status: StatusCode,
	code: &str,
	message: impl Into<String>,
	fields: Option<Vec<String>>,
) -> ApiError {
	ApiError::new(status, code, message, fields)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn search_text(
	State(state): State<AppState>,
	payload: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<SearchResponse>, ApiError> {
	let Json(payload) = payload?;
	let response = state.service.match_by_text(payload).await?;

	Ok(Json(response))
}

async fn search_image(
	State(state): State<AppState>,
	payload: Result<Json<ImageSearchBody>, JsonRejection>,
) -> Result<Json<SearchResponse>, ApiError> {
	let Json(payload) = payload?;
	let image = decode_image(&payload.image_base64)?;
	let req = ImageSearchRequest { image, mime_type: payload.mime_type, limit: payload.limit };
	let response = state.service.match_by_image(req).await?;

	Ok(Json(response))
}

async fn browse(
	State(state): State<AppState>,
	Query(query): Query<BrowseRequest>,
) -> Result<Json<BrowseResponse>, ApiError> {
	let response = state.service.browse(query).await?;

	Ok(Json(response))
}

async fn featured_products(
	State(state): State<AppState>,
	Query(query): Query<FeaturedQuery>,
) -> Result<Json<BrowseResponse>, ApiError> {
	let response = state.service.featured_products(query.limit).await?;

	Ok(Json(response))
}

async fn get_product(
	State(state): State<AppState>,
	Path(id): Path<String>,
) -> Result<Json<Product>, ApiError> {
	let response = state.service.get_product(&id).await?;

	Ok(Json(response))
}

async fn save_listing(
	State(state): State<AppState>,
	payload: Result<Json<ListingDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<SavedListing>), ApiError> {
	let Json(payload) = payload?;
	let response = state.service.save_listing(payload).await?;

	Ok((StatusCode::CREATED, Json(response)))
}

async fn list_listings(
	State(state): State<AppState>,
) -> Result<Json<ListingsResponse>, ApiError> {
	let response = state.service.list_listings().await?;

	Ok(Json(response))
}

async fn analyze_listing_image(
	State(state): State<AppState>,
	payload: Result<Json<AnalyzeImageBody>, JsonRejection>,
) -> Result<Json<AttributeSet>, ApiError> {
	let Json(payload) = payload?;
	let image = decode_image(&payload.image_base64)?;
	let response = state.service.analyze_listing_image(&image, &payload.mime_type).await?;

	Ok(Json(response))
}

/// Decodes standard base64, accepting a `data:` URL prefix.
fn decode_image(encoded: &str) -> Result<Vec<u8>, ApiError> {
	let encoded = encoded.trim();
	let encoded = match encoded.strip_prefix("data:") {
		Some(rest) => rest.split_once(',').map(|(_, data)| data).unwrap_or_default(),
		None => encoded,
	};

	STANDARD.decode(encoded).map_err(|err| {
		json_error(
			StatusCode::BAD_REQUEST,
			"INVALID_REQUEST",
			format!("image_base64 is not valid base64: {err}."),
			Some(vec!["$.image_base64".to_string()]),
		)
	})
}
