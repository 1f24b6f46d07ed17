pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Not found: {message}")]
	NotFound { message: String },
	#[error("Conflict: {message}")]
	Conflict { message: String },
	#[error("Provider error: {message}")]
	Provider { message: String },
	#[error("Catalog error: {message}")]
	Catalog { message: String },
}
impl From<closet_catalog::Error> for Error {
	fn from(err: closet_catalog::Error) -> Self {
		match err {
			closet_catalog::Error::Conflict(message) => Self::Conflict { message },
			closet_catalog::Error::InvalidArgument(message) => Self::InvalidRequest { message },
			closet_catalog::Error::Unavailable(message) => Self::Catalog { message },
		}
	}
}

impl From<closet_providers::Error> for Error {
	fn from(err: closet_providers::Error) -> Self {
		Self::Provider { message: err.to_string() }
	}
}
