use std::{env, fs, path::PathBuf, sync::Arc};

use axum::{
	Router,
	body::{self, Body},
	http::{Request, StatusCode},
};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde_json::{Map, Value};
use tower::util::ServiceExt;

use closet_api::{routes, state::AppState};
use closet_catalog::{BoxFuture, InMemoryCatalog};
use closet_config::{
	Catalog, Config, GenerativeProviderConfig, Listings, Providers, Search, Service,
};
use closet_domain::Product;
use closet_providers::generative::InlineImage;
use closet_service::{ClosetService, GenerativeProvider};

struct StubProvider(Result<&'static str, u16>);
impl GenerativeProvider for StubProvider {
	fn generate<'a>(
		&'a self,
		_: &'a GenerativeProviderConfig,
		_: &'a str,
		_: Option<InlineImage<'a>>,
	) -> BoxFuture<'a, closet_providers::Result<String>> {
		let reply = match self.0 {
			Ok(text) => Ok(text.to_string()),
			Err(status) => Err(closet_providers::Error::Status { status }),
		};

		Box::pin(async move { reply })
	}
}

fn test_config(seed_path: Option<PathBuf>) -> Config {
	Config {
		service: Service { http_bind: "127.0.0.1:0".to_string(), log_level: "info".to_string() },
		providers: Providers {
			generative: GenerativeProviderConfig {
				provider_id: "test".to_string(),
				api_base: "http://127.0.0.1:1".to_string(),
				api_key: "test-key".to_string(),
				model: "test".to_string(),
				temperature: 0.2,
				top_p: 0.8,
				top_k: 40,
				max_output_tokens: 256,
				timeout_ms: 1_000,
				default_headers: Map::new(),
			},
		},
		catalog: Catalog { seed_path },
		search: Search::default(),
		listings: Listings::default(),
	}
}

fn catalog() -> Arc<InMemoryCatalog> {
	let product = Product {
		id: "P1".to_string(),
		name: "Vintage Denim Jacket".to_string(),
		price: 45.0,
		location: "Portland, OR".to_string(),
		condition: "Good".to_string(),
		category: "Clothing".to_string(),
		sub_category: "Jacket".to_string(),
		description: "Faded blue denim.".to_string(),
		brand: "Levi's".to_string(),
		tags: vec!["denim".to_string()],
		image_url: None,
		featured: false,
	};
	let featured = Product {
		id: "P2".to_string(),
		name: "Silk Scarf".to_string(),
		price: 30.0,
		location: "Chicago, IL".to_string(),
		condition: "Like New".to_string(),
		category: "Accessory".to_string(),
		sub_category: "Scarf".to_string(),
		description: String::new(),
		brand: "Hermes".to_string(),
		tags: vec!["silk".to_string()],
		image_url: None,
		featured: true,
	};

	Arc::new(InMemoryCatalog::from_products(vec![product, featured]))
}

fn app_with(reply: Result<&'static str, u16>) -> Router {
	let service = ClosetService::with_providers(
		test_config(None),
		catalog(),
		closet_service::Providers::new(Arc::new(StubProvider(reply))),
	);

	routes::router(AppState::with_service(service))
}

async fn call(
	app: Router,
	method: &str,
	uri: &str,
	payload: Option<Value>,
) -> (StatusCode, Value) {
	let mut builder = Request::builder().method(method).uri(uri);
	let body = match payload {
		Some(payload) => {
			builder = builder.header("content-type", "application/json");

			Body::from(payload.to_string())
		},
		None => Body::empty(),
	};
	let response = app
		.oneshot(builder.body(body).expect("Failed to build request."))
		.await
		.expect("Failed to call router.");
	let status = response.status();
	let bytes = body::to_bytes(response.into_body(), usize::MAX)
		.await
		.expect("Failed to read response body.");
	let json = if bytes.is_empty() {
		Value::Null
	} else {
		serde_json::from_slice(&bytes).expect("Failed to parse response.")
	};

	(status, json)
}

#[tokio::test]
async fn health_ok() {
	let (status, _) = call(app_with(Ok("{}")), "GET", "/health", None).await;

	assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn text_search_returns_ranked_model_results() {
	let payload = serde_json::json!({ "query": "denim jacket", "filters": { "city": "Portland" } });
	let (status, json) =
		call(app_with(Ok("{\"tags\":[\"denim\"]}")), "POST", "/v1/search/text", Some(payload))
			.await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(json["source"], "model");
	assert_eq!(json["items"][0]["id"], "P1");
	assert_eq!(json["attributes"]["tags"][0], "denim");
}

#[tokio::test]
async fn unreachable_model_falls_back_over_http() {
	let state = AppState::new(test_config(None)).expect("Failed to initialize app state.");
	let payload = serde_json::json!({ "query": "vintage denim jacket" });
	let (status, json) =
		call(routes::router(state), "POST", "/v1/search/text", Some(payload)).await;
	let items = json["items"].as_array().expect("Items must be an array.");

	assert_eq!(status, StatusCode::OK);
	assert_eq!(json["source"], "fallback");
	assert_eq!(json["fallback_reason"], "transport");
	assert!(!items.is_empty() && items.len() <= 24);
}

#[tokio::test]
async fn image_search_rejects_invalid_base64() {
	let payload = serde_json::json!({ "image_base64": "not base64!", "mime_type": "image/png" });
	let (status, json) = call(app_with(Ok("{}")), "POST", "/v1/search/image", Some(payload)).await;

	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(json["error_code"], "INVALID_REQUEST");
	assert_eq!(json["fields"][0], "$.image_base64");
}

#[tokio::test]
async fn image_search_rejects_non_image_mime_type() {
	let payload = serde_json::json!({ "image_base64": "aGVsbG8=", "mime_type": "text/plain" });
	let (status, json) = call(app_with(Ok("{}")), "POST", "/v1/search/image", Some(payload)).await;

	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(json["error_code"], "INVALID_REQUEST");
}

#[tokio::test]
async fn image_search_accepts_data_urls() {
	let payload = serde_json::json!({
		"image_base64": "data:image/png;base64,iVBORw0KGgo=",
		"mime_type": "image/png",
		"limit": 1
	});
	let (status, json) = call(
		app_with(Ok("{\"sub_category\":\"jacket\"}")),
		"POST",
		"/v1/search/image",
		Some(payload),
	)
	.await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(json["source"], "model");
	assert_eq!(json["items"].as_array().map(Vec::len), Some(1));
}

fn image_payload(bytes: usize) -> Value {
	serde_json::json!({
		"image_base64": STANDARD.encode(vec![0xAB_u8; bytes]),
		"mime_type": "image/jpeg"
	})
}

#[tokio::test]
async fn accepts_images_larger_than_the_default_body_limit() {
	let payload = image_payload(3 * 1024 * 1024);
	let (status, json) = call(
		app_with(Ok("{\"sub_category\":\"jacket\"}")),
		"POST",
		"/v1/search/image",
		Some(payload.clone()),
	)
	.await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(json["source"], "model");

	let (status, json) = call(
		app_with(Ok("{\"colors\":[\"Blue\"]}")),
		"POST",
		"/v1/listings/analyze",
		Some(payload),
	)
	.await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(json["colors"][0], "blue");
}

#[tokio::test]
async fn oversized_images_get_json_errors() {
	let max_image_bytes = Search::default().max_image_bytes as usize;
	let (status, json) = call(
		app_with(Ok("{}")),
		"POST",
		"/v1/search/image",
		Some(image_payload(max_image_bytes + 1)),
	)
	.await;

	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(json["error_code"], "INVALID_REQUEST");

	let (status, json) = call(
		app_with(Ok("{}")),
		"POST",
		"/v1/listings/analyze",
		Some(image_payload(max_image_bytes * 2)),
	)
	.await;

	assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
	assert_eq!(json["error_code"], "PAYLOAD_TOO_LARGE");
}

#[tokio::test]
async fn malformed_json_bodies_get_json_errors() {
	let request = Request::builder()
		.method("POST")
		.uri("/v1/search/text")
		.header("content-type", "application/json")
		.body(Body::from("{\"query\":"))
		.expect("Failed to build request.");
	let response =
		app_with(Ok("{}")).oneshot(request).await.expect("Failed to call router.");
	let status = response.status();
	let bytes = body::to_bytes(response.into_body(), usize::MAX)
		.await
		.expect("Failed to read response body.");
	let json: Value = serde_json::from_slice(&bytes).expect("Error body must be JSON.");

	assert!(status.is_client_error());
	assert_eq!(json["error_code"], "INVALID_REQUEST");
}

#[tokio::test]
async fn featured_products_only_lists_flagged_items() {
	let (status, json) = call(app_with(Ok("{}")), "GET", "/v1/products/featured", None).await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(json["total"], 1);
	assert_eq!(json["items"][0]["id"], "P2");
	assert_eq!(json["items"][0]["featured"], true);

	let (status, json) =
		call(app_with(Ok("{}")), "GET", "/v1/products/featured?limit=0", None).await;

	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(json["error_code"], "INVALID_REQUEST");
}

#[tokio::test]
async fn browse_and_product_lookup() {
	let (status, json) = call(
		app_with(Ok("{}")),
		"GET",
		"/v1/products?city=portland&max_price=50&query=denim",
		None,
	)
	.await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(json["total"], 1);
	assert_eq!(json["items"][0]["id"], "P1");

	let (status, json) = call(app_with(Ok("{}")), "GET", "/v1/products/P1", None).await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(json["name"], "Vintage Denim Jacket");

	let (status, json) = call(app_with(Ok("{}")), "GET", "/v1/products/missing", None).await;

	assert_eq!(status, StatusCode::NOT_FOUND);
	assert_eq!(json["error_code"], "NOT_FOUND");
}

#[tokio::test]
async fn saves_listings_and_serves_them() {
	let app = app_with(Ok("{}"));
	let payload = serde_json::json!({
		"title": "Corduroy Pants",
		"price": 18.5,
		"location": "Austin, TX",
		"condition": "Like New",
		"tags": ["corduroy"]
	});
	let (status, json) = call(app.clone(), "POST", "/v1/listings", Some(payload)).await;

	assert_eq!(status, StatusCode::CREATED);
	assert_eq!(json["id"], "LST1001");
	assert_eq!(json["status"], "pending");
	assert!(json["created_at"].as_str().is_some_and(|value| value.contains('T')));

	let (status, json) = call(app.clone(), "GET", "/v1/products/LST1001", None).await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(json["brand"], "Unknown");

	let (status, json) = call(app, "GET", "/v1/listings", None).await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(json["total"], 1);
	assert_eq!(json["items"][0]["id"], "LST1001");
	assert_eq!(json["items"][0]["status"], "pending");
}

#[tokio::test]
async fn rejects_invalid_listings() {
	let payload = serde_json::json!({
		"title": "",
		"price": 10.0,
		"location": "Austin, TX",
		"condition": "Good"
	});
	let (status, json) = call(app_with(Ok("{}")), "POST", "/v1/listings", Some(payload)).await;

	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(json["error_code"], "INVALID_REQUEST");
}

#[tokio::test]
async fn listing_analysis_maps_provider_failures() {
	let payload = serde_json::json!({ "image_base64": "aGVsbG8=", "mime_type": "image/jpeg" });
	let (status, json) = call(
		app_with(Ok("{\"colors\":[\"Red\"]}")),
		"POST",
		"/v1/listings/analyze",
		Some(payload.clone()),
	)
	.await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(json["colors"][0], "red");

	let (status, json) =
		call(app_with(Err(503)), "POST", "/v1/listings/analyze", Some(payload)).await;

	assert_eq!(status, StatusCode::BAD_GATEWAY);
	assert_eq!(json["error_code"], "PROVIDER_ERROR");
}

#[tokio::test]
async fn loads_catalog_seed_file() {
	let path = env::temp_dir().join(format!("closet-seed-{}.json", std::process::id()));

	fs::write(
		&path,
		"Catalog export:\n[{\"id\":\"S1\",\"name\":\"Wool Scarf\",\"price\":\"$12.00\",\
		 \"location\":\"Boston, MA\"},{\"name\":\"No Location\"}]",
	)
	.expect("Failed to write seed file.");

	let state = AppState::new(test_config(Some(path.clone()))).expect("Seed must load.");
	let (status, json) = call(routes::router(state), "GET", "/v1/products/S1", None).await;

	let _ = fs::remove_file(&path);

	assert_eq!(status, StatusCode::OK);
	assert_eq!(json["price"], 12.0);
	assert_eq!(json["condition"], "Good");
}
