use std::path::PathBuf;

use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	pub service: Service,
	pub providers: Providers,
	#[serde(default)]
	pub catalog: Catalog,
	#[serde(default)]
	pub search: Search,
	#[serde(default)]
	pub listings: Listings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Providers {
	pub generative: GenerativeProviderConfig,
}

/// Settings for the text-and-image completion endpoint used for attribute extraction.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerativeProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub model: String,
	pub temperature: f32,
	pub top_p: f32,
	pub top_k: u32,
	pub max_output_tokens: u32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Catalog {
	/// Optional. JSON file holding the listings loaded into the in-memory catalog at startup.
	pub seed_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Search {
	#[serde(default = "default_limit")]
	pub default_limit: u32,
	#[serde(default = "default_max_limit")]
	pub max_limit: u32,
	#[serde(default = "default_max_image_bytes")]
	pub max_image_bytes: u64,
}
impl Default for Search {
	fn default() -> Self {
		Self {
			default_limit: default_limit(),
			max_limit: default_max_limit(),
			max_image_bytes: default_max_image_bytes(),
		}
	}
}

#[derive(Debug, Clone, Deserialize)]
pub struct Listings {
	#[serde(default = "default_id_prefix")]
	pub id_prefix: String,
	#[serde(default = "default_id_start")]
	pub id_start: u64,
}
impl Default for Listings {
	fn default() -> Self {
		Self { id_prefix: default_id_prefix(), id_start: default_id_start() }
	}
}

fn default_limit() -> u32 {
	24
}

fn default_max_limit() -> u32 {
	100
}

fn default_max_image_bytes() -> u64 {
	5 * 1_024 * 1_024
}

fn default_id_prefix() -> String {
	"LST".to_string()
}

fn default_id_start() -> u64 {
	1_001
}
