use std::sync::atomic::{AtomicU64, Ordering};

use uuid::Uuid;

/// Source of identifiers for generated records.
pub trait IdGenerator
where
	Self: Send + Sync,
{
	fn next_id(&self) -> String;
}

/// `{prefix}{n}` with `n` counting up from `start`.
#[derive(Debug)]
pub struct SequentialIds {
	prefix: String,
	next: AtomicU64,
}
impl SequentialIds {
	pub fn new(prefix: impl Into<String>, start: u64) -> Self {
		Self { prefix: prefix.into(), next: AtomicU64::new(start) }
	}
}
impl IdGenerator for SequentialIds {
	fn next_id(&self) -> String {
		let value = self.next.fetch_add(1, Ordering::Relaxed);

		format!("{}{value}", self.prefix)
	}
}

#[derive(Debug, Default)]
pub struct UuidIds;
impl IdGenerator for UuidIds {
	fn next_id(&self) -> String {
		Uuid::new_v4().to_string()
	}
}
