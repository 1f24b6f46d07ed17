use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

static PRICE_NUMBER: LazyLock<Option<Regex>> =
	LazyLock::new(|| Regex::new(r"\d+(?:\.\d+)?").ok());

/// Reads a price from a JSON number or from text such as `"25"`, `"$1,250.00"` or `"25 USD"`.
pub fn coerce_price(value: &Value) -> Option<f64> {
	let price = match value {
		Value::Number(number) => number.as_f64()?,
		Value::String(text) => parse_price_text(text)?,
		_ => return None,
	};

	is_valid_price(price).then_some(price)
}

pub fn is_valid_price(price: f64) -> bool {
	price.is_finite() && price >= 0.0
}

fn parse_price_text(text: &str) -> Option<f64> {
	let without_separators = text.replace(',', "");
	let trimmed = without_separators.trim();

	if let Ok(price) = trimmed.parse::<f64>() {
		return Some(price);
	}

	let regex = PRICE_NUMBER.as_ref()?;

	regex.find(trimmed)?.as_str().parse().ok()
}
