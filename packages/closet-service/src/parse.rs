//! Tolerant recovery of JSON from free-form model output.

use serde_json::Value;

use closet_domain::{AttributeSet, Product};

/// JSON content found in a model response.
#[derive(Debug, Clone, PartialEq)]
pub enum JsonPayload {
	/// A complete JSON array.
	Array(Vec<Value>),
	/// Standalone objects, in the order they appeared.
	Objects(Vec<Value>),
	None,
}
impl JsonPayload {
	pub fn into_values(self) -> Option<Vec<Value>> {
		match self {
			Self::Array(values) | Self::Objects(values) => Some(values),
			Self::None => None,
		}
	}
}

/// Finds JSON in `raw`, trying the whole text, then the first well-formed array holding objects,
/// then every balanced object.
pub fn locate_json(raw: &str) -> JsonPayload {
	let text = strip_code_fence(raw.trim());

	match serde_json::from_str::<Value>(text) {
		Ok(Value::Array(values)) => return JsonPayload::Array(values),
		Ok(value @ Value::Object(_)) => return JsonPayload::Objects(vec![value]),
		_ => {},
	}

	if let Some(values) = first_array(text) {
		return JsonPayload::Array(values);
	}

	let objects = balanced_objects(text);

	if objects.is_empty() { JsonPayload::None } else { JsonPayload::Objects(objects) }
}

/// Reads the first JSON object in `raw` as an attribute set.
///
/// Balanced objects are tried before arrays, so an array nested in the attribute object is never
/// mistaken for the payload.
pub fn parse_attributes(raw: &str) -> Option<AttributeSet> {
	let text = strip_code_fence(raw.trim());
	let object = match serde_json::from_str::<Value>(text) {
		Ok(value @ Value::Object(_)) => Some(value),
		Ok(Value::Array(values)) => values.into_iter().find(Value::is_object),
		_ => balanced_objects(text).into_iter().next(),
	}?;

	object.as_object().map(AttributeSet::from_object)
}

/// Salvages product records from `raw`, repairing each one independently.
///
/// Returns `None` only when no JSON content is found. Records without a name or location are
/// dropped.
pub fn parse_products(raw: &str) -> Option<Vec<Product>> {
	let values = locate_json(raw).into_values()?;
	let total = values.len();
	let products = values
		.iter()
		.enumerate()
		.filter_map(|(position, value)| Product::repair(value, position))
		.collect::<Vec<_>>();

	if products.len() < total {
		tracing::warn!(
			dropped = total - products.len(),
			kept = products.len(),
			"Dropped product records that could not be repaired."
		);
	}

	Some(products)
}

fn strip_code_fence(text: &str) -> &str {
	let Some(rest) = text.strip_prefix("```") else {
		return text;
	};
	// Drops the info string, such as `json`.
	let body = rest.split_once('\n').map(|(_, body)| body).unwrap_or(rest);

	body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

fn first_array(text: &str) -> Option<Vec<Value>> {
	text.match_indices('[').find_map(|(start, _)| {
		let end = matching_close(text.as_bytes(), start)?;

		match serde_json::from_str::<Value>(&text[start..=end]) {
			Ok(Value::Array(values)) if values.iter().any(Value::is_object) => Some(values),
			_ => None,
		}
	})
}

fn balanced_objects(text: &str) -> Vec<Value> {
	let bytes = text.as_bytes();
	let mut objects = Vec::new();
	let mut cursor = 0;

	while let Some(offset) = text[cursor..].find('{') {
		let start = cursor + offset;

		cursor = start + 1;

		let Some(end) = matching_close(bytes, start) else {
			continue;
		};

		if let Ok(value @ Value::Object(_)) = serde_json::from_str::<Value>(&text[start..=end]) {
			objects.push(value);

			cursor = end + 1;
		}
	}

	objects
}

/// Index of the bracket closing the one at `start`, skipping string literals.
fn matching_close(bytes: &[u8], start: usize) -> Option<usize> {
	let mut depth = 0_usize;
	let mut in_string = false;
	let mut escaped = false;

	for (index, byte) in bytes.iter().enumerate().skip(start) {
		if in_string {
			if escaped {
				escaped = false;
			} else if *byte == b'\\' {
				escaped = true;
			} else if *byte == b'"' {
				in_string = false;
			}

			continue;
		}

		match byte {
			b'"' => in_string = true,
			b'[' | b'{' => depth += 1,
			b']' | b'}' => {
				depth = depth.checked_sub(1)?;

				if depth == 0 {
					return Some(index);
				}
			},
			_ => {},
		}
	}

	None
}
