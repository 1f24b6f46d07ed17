//! Offline results served when the model-backed path cannot answer.

use closet_domain::{IdGenerator, Product, SearchFilters, filters};

pub const FALLBACK_ID_PREFIX: &str = "fallback-";
/// Items returned when no seed item passes the filters.
pub const DEFAULT_SUBSET: usize = 4;

struct Seed {
	name: &'static str,
	price: f64,
	location: &'static str,
	condition: &'static str,
	category: &'static str,
	sub_category: &'static str,
	description: &'static str,
	brand: &'static str,
	tags: &'static [&'static str],
	image_url: &'static str,
}

const TEXT_SEEDS: &[Seed] = &[
	Seed {
		name: "Vintage Levi's Denim Jacket",
		price: 45.99,
		location: "Portland, OR",
		condition: "Good",
		category: "Clothing",
		sub_category: "Jacket",
		description: "Classic blue denim trucker jacket with light fading.",
		brand: "Levi's",
		tags: &["denim", "vintage", "jacket", "blue"],
		image_url: "https://i.imgur.com/IvQWvHp.jpg",
	},
	Seed {
		name: "Retro Floral Print Dress",
		price: 28.50,
		location: "Seattle, WA",
		condition: "Like New",
		category: "Clothing",
		sub_category: "Dress",
		description: "Knee length dress with a bold floral print.",
		brand: "Unknown",
		tags: &["retro", "floral", "dress"],
		image_url: "https://i.imgur.com/9qbQTUr.jpg",
	},
	Seed {
		name: "Leather Messenger Bag",
		price: 34.99,
		location: "Austin, TX",
		condition: "Excellent",
		category: "Accessories",
		sub_category: "Bag",
		description: "Brown leather messenger bag with an adjustable strap.",
		brand: "Fossil",
		tags: &["leather", "bag", "brown"],
		image_url: "https://i.imgur.com/wzSNCpV.jpg",
	},
	Seed {
		name: "Vintage Band T-Shirt",
		price: 22.00,
		location: "Los Angeles, CA",
		condition: "Good",
		category: "Clothing",
		sub_category: "T-Shirt",
		description: "Soft cotton tour shirt with a cracked print.",
		brand: "Unknown",
		tags: &["vintage", "band", "cotton", "black"],
		image_url: "https://i.imgur.com/YXaMOg6.jpg",
	},
	Seed {
		name: "High-Waisted Mom Jeans",
		price: 32.50,
		location: "Chicago, IL",
		condition: "Very Good",
		category: "Clothing",
		sub_category: "Jeans",
		description: "Light wash high-waisted jeans with a tapered leg.",
		brand: "Levi's",
		tags: &["denim", "high-waisted", "jeans"],
		image_url: "https://i.imgur.com/3BkNItU.jpg",
	},
	Seed {
		name: "Vintage Wool Sweater",
		price: 24.99,
		location: "Boston, MA",
		condition: "Good",
		category: "Clothing",
		sub_category: "Sweater",
		description: "Chunky cream knit wool sweater.",
		brand: "Unknown",
		tags: &["wool", "knit", "vintage", "cream"],
		image_url: "https://i.imgur.com/uJq0Kd3.jpg",
	},
	Seed {
		name: "Classic Leather Boots",
		price: 65.00,
		location: "Denver, CO",
		condition: "Fair",
		category: "Footwear",
		sub_category: "Boots",
		description: "Lace-up brown leather work boots, resoled.",
		brand: "Red Wing",
		tags: &["leather", "boots", "brown"],
		image_url: "https://i.imgur.com/w6JZ2Wd.jpg",
	},
	Seed {
		name: "Vintage Designer Handbag",
		price: 89.99,
		location: "New York, NY",
		condition: "Good",
		category: "Accessories",
		sub_category: "Handbag",
		description: "Structured black leather handbag with gold hardware.",
		brand: "Coach",
		tags: &["designer", "handbag", "leather", "black"],
		image_url: "https://i.imgur.com/Pj3gM5r.jpg",
	},
];
const IMAGE_SEEDS: &[Seed] = &[
	Seed {
		name: "Similar Style Vintage Dress",
		price: 38.50,
		location: "San Francisco, CA",
		condition: "Excellent",
		category: "Clothing",
		sub_category: "Dress",
		description: "Fitted vintage dress with a flared skirt.",
		brand: "Unknown",
		tags: &["vintage", "dress"],
		image_url: "https://i.imgur.com/ZCBtpem.jpg",
	},
	Seed {
		name: "Matching Pattern Skirt",
		price: 24.99,
		location: "Miami, FL",
		condition: "Like New",
		category: "Clothing",
		sub_category: "Skirt",
		description: "Patterned midi skirt with an elastic waist.",
		brand: "Unknown",
		tags: &["patterned", "skirt"],
		image_url: "https://i.imgur.com/KJjt9MG.jpg",
	},
	Seed {
		name: "Complementary Blouse",
		price: 19.95,
		location: "Nashville, TN",
		condition: "Very Good",
		category: "Clothing",
		sub_category: "Blouse",
		description: "Lightweight button-up blouse.",
		brand: "Unknown",
		tags: &["blouse", "lightweight"],
		image_url: "https://i.imgur.com/a2QPPOq.jpg",
	},
	Seed {
		name: "Similar Color Sweater",
		price: 29.99,
		location: "Philadelphia, PA",
		condition: "Good",
		category: "Clothing",
		sub_category: "Sweater",
		description: "Crew neck knit sweater.",
		brand: "Unknown",
		tags: &["knit", "sweater"],
		image_url: "https://i.imgur.com/vWWKKBb.jpg",
	},
	Seed {
		name: "Matching Style Jacket",
		price: 45.00,
		location: "Atlanta, GA",
		condition: "Good",
		category: "Clothing",
		sub_category: "Jacket",
		description: "Cropped jacket with snap buttons.",
		brand: "Unknown",
		tags: &["jacket", "cropped"],
		image_url: "https://i.imgur.com/GPb0TDk.jpg",
	},
];

/// Fixed seed catalog for offline results.
///
/// Ids are drawn once at construction and carry [`FALLBACK_ID_PREFIX`].
#[derive(Debug, Clone)]
pub struct FallbackCatalog {
	text_items: Vec<Product>,
	image_items: Vec<Product>,
}
impl FallbackCatalog {
	pub fn new(ids: &dyn IdGenerator) -> Self {
		let text_items = TEXT_SEEDS.iter().map(|seed| seed.to_product(ids)).collect();
		let image_items = IMAGE_SEEDS.iter().map(|seed| seed.to_product(ids)).collect();

		Self { text_items, image_items }
	}

	pub fn text_items(&self) -> &[Product] {
		&self.text_items
	}

	pub fn image_items(&self) -> &[Product] {
		&self.image_items
	}

	/// Seed items passing the query and filters, or the default subset when none do.
	///
	/// Never empty: a `limit` of zero is treated as one.
	pub fn generate(&self, query: &str, filters: &SearchFilters, limit: usize) -> Vec<Product> {
		let limit = limit.max(1);
		let matched = self
			.text_items
			.iter()
			.filter(|product| filters.matches(product) && filters::matches_query(product, query))
			.take(limit)
			.cloned()
			.collect::<Vec<_>>();

		if !matched.is_empty() {
			return matched;
		}

		self.text_items.iter().take(DEFAULT_SUBSET.min(limit)).cloned().collect()
	}

	/// Image-flavoured seed items in a fixed order.
	pub fn generate_for_image(&self, limit: usize) -> Vec<Product> {
		self.image_items.iter().take(limit.max(1)).cloned().collect()
	}
}

pub fn is_fallback_id(id: &str) -> bool {
	id.starts_with(FALLBACK_ID_PREFIX)
}

impl Seed {
	fn to_product(&self, ids: &dyn IdGenerator) -> Product {
		Product {
			id: format!("{FALLBACK_ID_PREFIX}{}", ids.next_id()),
			name: self.name.to_string(),
			price: self.price,
			location: self.location.to_string(),
			condition: self.condition.to_string(),
			category: self.category.to_string(),
			sub_category: self.sub_category.to_string(),
			description: self.description.to_string(),
			brand: self.brand.to_string(),
			tags: self.tags.iter().map(|tag| tag.to_string()).collect(),
			image_url: Some(self.image_url.to_string()),
			featured: false,
		}
	}
}
