use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::product;

/// Structured description of the product a shopper is looking for.
///
/// Every value is stored trimmed and lowercased. Set fields are ordered so that prompts, logs and
/// responses built from them are stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeSet {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub category: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub sub_category: Option<String>,
	#[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
	pub colors: BTreeSet<String>,
	#[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
	pub materials: BTreeSet<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub style: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub pattern: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub condition: Option<String>,
	#[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
	pub specific_features: BTreeSet<String>,
	#[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
	pub tags: BTreeSet<String>,
}
impl AttributeSet {
	pub fn is_empty(&self) -> bool {
		self.category.is_none()
			&& self.sub_category.is_none()
			&& self.colors.is_empty()
			&& self.materials.is_empty()
			&& self.style.is_none()
			&& self.pattern.is_none()
			&& self.condition.is_none()
			&& self.specific_features.is_empty()
			&& self.tags.is_empty()
	}

	/// Reads an attribute object as produced by a generative model.
	///
	/// Accepts either a string or an array for set fields and the common synonyms
	/// (`subCategory`, `type`, `material`, `features`).
	pub fn from_object(object: &Map<String, Value>) -> Self {
		Self {
			category: single(object, &["category"]),
			sub_category: single(object, &["sub_category", "subCategory", "type"]),
			colors: many(object, &["colors", "color"]),
			materials: many(object, &["materials", "material"]),
			style: single(object, &["style"]),
			pattern: single(object, &["pattern"]),
			condition: single(object, &["condition"]),
			specific_features: many(object, &["specific_features", "features"]),
			tags: many(object, &["tags"]),
		}
	}

	/// Number of populated terms.
	pub fn term_count(&self) -> usize {
		let singles =
			[&self.category, &self.sub_category, &self.style, &self.pattern, &self.condition]
				.iter()
				.filter(|value| value.is_some())
				.count();

		singles
			+ self.colors.len()
			+ self.materials.len()
			+ self.specific_features.len()
			+ self.tags.len()
	}
}

/// Normalizes a single term: trimmed, lowercased, `None` when blank.
pub fn normalize_term(raw: &str) -> Option<String> {
	let trimmed = raw.trim();

	if trimmed.is_empty() {
		return None;
	}

	Some(trimmed.to_lowercase())
}

pub fn term_set<I, S>(items: I) -> BTreeSet<String>
where
	I: IntoIterator<Item = S>,
	S: AsRef<str>,
{
	items.into_iter().filter_map(|item| normalize_term(item.as_ref())).collect()
}

fn single(object: &Map<String, Value>, keys: &[&str]) -> Option<String> {
	keys.iter().filter_map(|key| object.get(*key)).find_map(|value| match value {
		Value::String(text) => normalize_term(text),
		Value::Array(items) => items.iter().filter_map(Value::as_str).find_map(normalize_term),
		_ => None,
	})
}

fn many(object: &Map<String, Value>, keys: &[&str]) -> BTreeSet<String> {
	keys.iter()
		.filter_map(|key| object.get(*key))
		.flat_map(product::string_list)
		.filter_map(|item| normalize_term(&item))
		.collect()
}
