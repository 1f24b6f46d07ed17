//! Attribute-to-product relevance scoring.

use serde::Serialize;

use closet_domain::{AttributeSet, Product, attributes};

/// Attribute dimension a rule reads its terms from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
	Category,
	SubCategory,
	Tag,
	Color,
	Material,
	Feature,
	Style,
	Pattern,
	Condition,
}

/// Product fields a rule is evaluated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
	/// Category, sub category and name.
	Classification,
	Tags,
	Description,
	Name,
	Condition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
	/// The term contains a field or a field contains the term. Counts once per term.
	Overlap,
	/// A field contains the term. Counts once per term.
	Substring,
	/// Counts every distinct field equal to the term.
	Exact,
	/// Counts every distinct field overlapping the term without being equal to it.
	Partial,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
	pub dimension: Dimension,
	pub target: Target,
	pub kind: MatchKind,
	pub points: u32,
}

/// Scoring table. Tags weigh most, then classification, then descriptive terms, then condition.
pub const RULES: &[Rule] = &[
	rule(Dimension::Category, Target::Classification, MatchKind::Overlap, 5),
	rule(Dimension::SubCategory, Target::Classification, MatchKind::Overlap, 6),
	rule(Dimension::Tag, Target::Tags, MatchKind::Exact, 4),
	rule(Dimension::Tag, Target::Tags, MatchKind::Partial, 2),
	rule(Dimension::Color, Target::Description, MatchKind::Substring, 2),
	rule(Dimension::Color, Target::Tags, MatchKind::Substring, 3),
	rule(Dimension::Color, Target::Name, MatchKind::Substring, 3),
	rule(Dimension::Material, Target::Description, MatchKind::Substring, 2),
	rule(Dimension::Material, Target::Tags, MatchKind::Substring, 3),
	rule(Dimension::Material, Target::Name, MatchKind::Substring, 3),
	rule(Dimension::Feature, Target::Description, MatchKind::Substring, 2),
	rule(Dimension::Feature, Target::Tags, MatchKind::Substring, 3),
	rule(Dimension::Feature, Target::Name, MatchKind::Substring, 3),
	rule(Dimension::Style, Target::Description, MatchKind::Substring, 2),
	rule(Dimension::Style, Target::Tags, MatchKind::Substring, 3),
	rule(Dimension::Style, Target::Name, MatchKind::Substring, 3),
	rule(Dimension::Pattern, Target::Description, MatchKind::Substring, 2),
	rule(Dimension::Pattern, Target::Tags, MatchKind::Substring, 3),
	rule(Dimension::Pattern, Target::Name, MatchKind::Substring, 3),
	rule(Dimension::Condition, Target::Condition, MatchKind::Substring, 3),
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedProduct {
	pub product: Product,
	pub score: u32,
}

/// Lowercased product fields, computed once per product.
struct ProductView {
	name: String,
	category: String,
	sub_category: String,
	description: String,
	condition: String,
	tags: Vec<String>,
}
impl ProductView {
	fn new(product: &Product) -> Self {
		Self {
			name: product.name.trim().to_lowercase(),
			category: product.category.trim().to_lowercase(),
			sub_category: product.sub_category.trim().to_lowercase(),
			description: product.description.trim().to_lowercase(),
			condition: product.condition.trim().to_lowercase(),
			tags: product.distinct_tags(),
		}
	}

	fn fields(&self, target: Target) -> Vec<&str> {
		let fields = match target {
			Target::Classification => {
				vec![self.category.as_str(), self.sub_category.as_str(), self.name.as_str()]
			},
			Target::Tags => self.tags.iter().map(String::as_str).collect(),
			Target::Description => vec![self.description.as_str()],
			Target::Name => vec![self.name.as_str()],
			Target::Condition => vec![self.condition.as_str()],
		};

		fields.into_iter().filter(|field| !field.is_empty()).collect()
	}
}

/// Relevance of one product to the attribute set. Zero when nothing matches.
pub fn score(product: &Product, attrs: &AttributeSet) -> u32 {
	let view = ProductView::new(product);

	RULES
		.iter()
		.map(|rule| {
			let fields = view.fields(rule.target);

			terms(attrs, rule.dimension)
				.iter()
				.map(|term| matches(rule.kind, term, &fields) * rule.points)
				.sum::<u32>()
		})
		.sum()
}

/// Scores every rankable product and orders them by descending score.
///
/// Records missing a required field are dropped. Equal scores keep their input order.
pub fn rank(products: Vec<Product>, attrs: &AttributeSet) -> Vec<RankedProduct> {
	let total = products.len();
	let mut ranked = products
		.into_iter()
		.filter(Product::is_rankable)
		.map(|product| {
			let score = score(&product, attrs);

			RankedProduct { product, score }
		})
		.collect::<Vec<_>>();

	if ranked.len() < total {
		tracing::debug!(dropped = total - ranked.len(), "Skipped products that cannot be ranked.");
	}

	// `sort_by` is stable.
	ranked.sort_by(|a, b| b.score.cmp(&a.score));

	ranked
}

const fn rule(dimension: Dimension, target: Target, kind: MatchKind, points: u32) -> Rule {
	Rule { dimension, target, kind, points }
}

fn terms(attrs: &AttributeSet, dimension: Dimension) -> Vec<String> {
	let raw: Vec<&String> = match dimension {
		Dimension::Category => attrs.category.iter().collect(),
		Dimension::SubCategory => attrs.sub_category.iter().collect(),
		Dimension::Tag => attrs.tags.iter().collect(),
		Dimension::Color => attrs.colors.iter().collect(),
		Dimension::Material => attrs.materials.iter().collect(),
		Dimension::Feature => attrs.specific_features.iter().collect(),
		Dimension::Style => attrs.style.iter().collect(),
		Dimension::Pattern => attrs.pattern.iter().collect(),
		Dimension::Condition => attrs.condition.iter().collect(),
	};

	attributes::term_set(raw).into_iter().collect()
}

fn matches(kind: MatchKind, term: &str, fields: &[&str]) -> u32 {
	match kind {
		MatchKind::Overlap => {
			u32::from(fields.iter().any(|field| field.contains(term) || term.contains(field)))
		},
		MatchKind::Substring => u32::from(fields.iter().any(|field| field.contains(term))),
		MatchKind::Exact => count(fields.iter().filter(|field| **field == term)),
		MatchKind::Partial => count(fields.iter().filter(|field| {
			**field != term && (field.contains(term) || term.contains(**field))
		})),
	}
}

fn count<I>(iter: I) -> u32
where
	I: Iterator,
{
	u32::try_from(iter.count()).unwrap_or(u32::MAX)
}
