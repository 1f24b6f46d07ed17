use serde::{Deserialize, Serialize};

use crate::product::Product;

/// Keywords a broad product type expands to when matching names and categories.
const PRODUCT_TYPE_KEYWORDS: &[(&str, &[&str])] = &[
	("clothing", &["jacket", "dress", "t-shirt", "jeans", "sweater", "skirt", "blouse"]),
	("accessories", &["bag", "handbag", "watch", "jewelry", "scarf"]),
	("shoes", &["boots", "sneakers", "shoes", "heels", "footwear"]),
	("furniture", &["chair", "table", "desk", "sofa"]),
	("electronics", &["radio", "stereo", "walkman", "camera"]),
	("books", &["book", "novel", "magazine"]),
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchFilters {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub city: Option<String>,
	#[serde(default, alias = "productType", skip_serializing_if = "Option::is_none")]
	pub product_type: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub condition: Option<String>,
	#[serde(default, alias = "minPrice", skip_serializing_if = "Option::is_none")]
	pub min_price: Option<f64>,
	#[serde(default, alias = "maxPrice", skip_serializing_if = "Option::is_none")]
	pub max_price: Option<f64>,
}
impl SearchFilters {
	pub fn is_empty(&self) -> bool {
		non_blank(self.city.as_deref()).is_none()
			&& non_blank(self.product_type.as_deref()).is_none()
			&& non_blank(self.condition.as_deref()).is_none()
			&& self.min_price.is_none()
			&& self.max_price.is_none()
	}

	/// Applies every populated filter. Blank strings count as unset.
	pub fn matches(&self, product: &Product) -> bool {
		if let Some(city) = non_blank(self.city.as_deref())
			&& !contains_ci(&product.location, &city)
		{
			return false;
		}
		if let Some(product_type) = non_blank(self.product_type.as_deref())
			&& !matches_product_type(product, &product_type)
		{
			return false;
		}
		if let Some(condition) = non_blank(self.condition.as_deref())
			&& !contains_ci(&product.condition, &condition)
		{
			return false;
		}
		if let Some(min) = self.min_price
			&& product.price < min
		{
			return false;
		}
		if let Some(max) = self.max_price
			&& product.price > max
		{
			return false;
		}

		true
	}
}

/// Free-text match across the descriptive fields of a product. A blank query matches everything.
pub fn matches_query(product: &Product, query: &str) -> bool {
	let Some(needle) = non_blank(Some(query)) else { return true };

	[
		&product.name,
		&product.description,
		&product.category,
		&product.sub_category,
		&product.brand,
		&product.condition,
		&product.location,
	]
	.into_iter()
	.any(|field| contains_ci(field, &needle))
		|| product.tags.iter().any(|tag| contains_ci(tag, &needle))
}

/// The lowercased product type followed by the keywords it expands to.
pub fn product_type_keywords(product_type: &str) -> Vec<String> {
	let Some(normalized) = non_blank(Some(product_type)) else { return Vec::new() };
	let mut keywords = vec![normalized.clone()];

	if let Some((_, expanded)) = PRODUCT_TYPE_KEYWORDS.iter().find(|(key, _)| *key == normalized)
	{
		keywords.extend(expanded.iter().map(|keyword| keyword.to_string()));
	}

	keywords
}

fn matches_product_type(product: &Product, product_type: &str) -> bool {
	product_type_keywords(product_type).iter().any(|keyword| {
		contains_ci(&product.category, keyword)
			|| contains_ci(&product.sub_category, keyword)
			|| contains_ci(&product.name, keyword)
	})
}

/// Case-insensitive containment. `needle` must already be lowercased.
fn contains_ci(haystack: &str, needle: &str) -> bool {
	haystack.to_lowercase().contains(needle)
}

fn non_blank(value: Option<&str>) -> Option<String> {
	value.map(str::trim).filter(|value| !value.is_empty()).map(str::to_lowercase)
}
