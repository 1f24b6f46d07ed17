#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Conflict: {0}")]
	Conflict(String),
	#[error("Invalid argument: {0}")]
	InvalidArgument(String),
	#[error("Catalog unavailable: {0}")]
	Unavailable(String),
}
