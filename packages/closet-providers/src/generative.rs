use std::time::Duration;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use reqwest::Client;
use serde_json::Value;

use crate::{Error, Result};
use closet_config::GenerativeProviderConfig;

/// Image attached to a prompt as inline data.
#[derive(Debug, Clone, Copy)]
pub struct InlineImage<'a> {
	pub mime_type: &'a str,
	pub data: &'a [u8],
}

/// Sends one prompt (optionally with an image) and returns the concatenated candidate text.
pub async fn generate(
	cfg: &GenerativeProviderConfig,
	prompt: &str,
	image: Option<InlineImage<'_>>,
) -> Result<String> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let body = request_body(cfg, prompt, image);
	let res = client
		.post(endpoint_url(cfg))
		.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
		.json(&body)
		.send()
		.await
		.map_err(|err| classify(err, cfg.timeout_ms))?;
	let status = res.status();

	if !status.is_success() {
		tracing::warn!(
			status = status.as_u16(),
			provider_id = %cfg.provider_id,
			"Generative provider returned an error status."
		);

		return Err(Error::Status { status: status.as_u16() });
	}

	let json: Value = res.json().await.map_err(|err| classify(err, cfg.timeout_ms))?;

	candidate_text(&json)
}

pub fn endpoint_url(cfg: &GenerativeProviderConfig) -> String {
	format!("{}/models/{}:generateContent", cfg.api_base, cfg.model)
}

pub fn request_body(
	cfg: &GenerativeProviderConfig,
	prompt: &str,
	image: Option<InlineImage<'_>>,
) -> Value {
	let mut parts = vec![serde_json::json!({ "text": prompt })];

	if let Some(image) = image {
		parts.push(serde_json::json!({
			"inline_data": {
				"mime_type": image.mime_type,
				"data": STANDARD.encode(image.data),
			}
		}));
	}

	serde_json::json!({
		"contents": [{ "parts": parts }],
		"generationConfig": {
			"temperature": cfg.temperature,
			"topP": cfg.top_p,
			"topK": cfg.top_k,
			"maxOutputTokens": cfg.max_output_tokens,
		}
	})
}

/// Joins the text parts of the first candidate.
pub fn candidate_text(json: &Value) -> Result<String> {
	let parts = json
		.get("candidates")
		.and_then(|v| v.as_array())
		.and_then(|arr| arr.first())
		.and_then(|candidate| candidate.get("content"))
		.and_then(|content| content.get("parts"))
		.and_then(|parts| parts.as_array())
		.ok_or_else(|| Error::InvalidResponse {
			message: "Generative response is missing candidate content.".to_string(),
		})?;
	let text = parts
		.iter()
		.filter_map(|part| part.get("text").and_then(|text| text.as_str()))
		.collect::<Vec<_>>()
		.join("");

	if text.trim().is_empty() {
		return Err(Error::InvalidResponse {
			message: "Generative response candidate has no text.".to_string(),
		});
	}

	Ok(text)
}

fn classify(err: reqwest::Error, timeout_ms: u64) -> Error {
	if err.is_timeout() { Error::Timeout { timeout_ms } } else { Error::Reqwest(err) }
}
