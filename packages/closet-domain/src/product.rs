use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::price;

pub const DEFAULT_CONDITION: &str = "Good";
pub const DEFAULT_PRICE: f64 = 25.0;
pub const UNKNOWN_BRAND: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
	pub id: String,
	pub name: String,
	pub price: f64,
	pub location: String,
	pub condition: String,
	#[serde(default)]
	pub category: String,
	#[serde(default, alias = "subCategory")]
	pub sub_category: String,
	#[serde(default)]
	pub description: String,
	#[serde(default = "unknown_brand")]
	pub brand: String,
	#[serde(default)]
	pub tags: Vec<String>,
	#[serde(default, alias = "imageUrl", skip_serializing_if = "Option::is_none")]
	pub image_url: Option<String>,
	#[serde(default)]
	pub featured: bool,
}
impl Product {
	/// Whether the record carries every field the ranker relies on.
	pub fn is_rankable(&self) -> bool {
		!self.id.trim().is_empty()
			&& !self.name.trim().is_empty()
			&& !self.location.trim().is_empty()
			&& !self.condition.trim().is_empty()
			&& price::is_valid_price(self.price)
	}

	/// Lowercased tags with case-insensitive duplicates removed, in first-seen order.
	pub fn distinct_tags(&self) -> Vec<String> {
		let mut seen = HashSet::new();
		let mut out = Vec::with_capacity(self.tags.len());

		for tag in &self.tags {
			let normalized = tag.trim().to_lowercase();

			if normalized.is_empty() {
				continue;
			}
			if seen.insert(normalized.clone()) {
				out.push(normalized);
			}
		}

		out
	}

	/// Builds a product from loosely shaped JSON, filling defaults field by field.
	///
	/// Returns `None` only when `name` or `location` is missing, since neither has a safe
	/// default. `position` seeds the id when the record has none.
	pub fn repair(value: &Value, position: usize) -> Option<Self> {
		let object = value.as_object()?;
		let name = text_field(object, &["name", "title"])?;
		let location = text_field(object, &["location", "city"])?;
		let id = object
			.get("id")
			.and_then(id_text)
			.unwrap_or_else(|| format!("item-{}", position + 1));
		let price = object.get("price").and_then(price::coerce_price).unwrap_or(DEFAULT_PRICE);
		let condition =
			text_field(object, &["condition"]).unwrap_or_else(|| DEFAULT_CONDITION.to_string());
		let brand = text_field(object, &["brand"]).unwrap_or_else(unknown_brand);
		let image_url = text_field(object, &["image_url", "imageUrl"])
			.filter(|url| url.starts_with("http://") || url.starts_with("https://"));

		Some(Self {
			id,
			name,
			price,
			location,
			condition,
			category: text_field(object, &["category"]).unwrap_or_default(),
			sub_category: text_field(object, &["sub_category", "subCategory", "type"])
				.unwrap_or_default(),
			description: text_field(object, &["description"]).unwrap_or_default(),
			brand,
			tags: object.get("tags").map(string_list).unwrap_or_default(),
			image_url,
			featured: object.get("featured").and_then(Value::as_bool).unwrap_or(false),
		})
	}
}

/// Reads a list of strings from a JSON array or a comma separated string.
pub fn string_list(value: &Value) -> Vec<String> {
	match value {
		Value::Array(items) => items
			.iter()
			.filter_map(|item| item.as_str())
			.map(str::trim)
			.filter(|item| !item.is_empty())
			.map(str::to_string)
			.collect(),
		Value::String(text) => text
			.split(',')
			.map(str::trim)
			.filter(|item| !item.is_empty())
			.map(str::to_string)
			.collect(),
		_ => Vec::new(),
	}
}

fn text_field(object: &Map<String, Value>, keys: &[&str]) -> Option<String> {
	keys.iter()
		.filter_map(|key| object.get(*key))
		.filter_map(Value::as_str)
		.map(str::trim)
		.find(|text| !text.is_empty())
		.map(str::to_string)
}

fn id_text(value: &Value) -> Option<String> {
	match value {
		Value::String(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
		Value::Number(number) => Some(number.to_string()),
		_ => None,
	}
}

fn unknown_brand() -> String {
	UNKNOWN_BRAND.to_string()
}
