mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Catalog, Config, GenerativeProviderConfig, Listings, Providers, Search, Service};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	parse(&raw).map_err(|err| match err {
		Error::ParseConfig { source, .. } => {
			Error::ParseConfig { path: path.to_path_buf(), source }
		},
		other => other,
	})
}

/// Parses, normalizes and validates a config held in memory.
pub fn parse(raw: &str) -> Result<Config> {
	let mut cfg: Config = toml::from_str(raw)
		.map_err(|err| Error::ParseConfig { path: Default::default(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}

	let generative = &cfg.providers.generative;

	for (label, value) in [
		("providers.generative.api_base", &generative.api_base),
		("providers.generative.api_key", &generative.api_key),
		("providers.generative.model", &generative.model),
	] {
		if value.trim().is_empty() {
			return Err(Error::Validation { message: format!("{label} must be non-empty.") });
		}
	}

	if !generative.temperature.is_finite() || !(0.0..=2.0).contains(&generative.temperature) {
		return Err(Error::Validation {
			message: "providers.generative.temperature must be in the range 0.0-2.0.".to_string(),
		});
	}
	if !generative.top_p.is_finite() || !(0.0..=1.0).contains(&generative.top_p) {
		return Err(Error::Validation {
			message: "providers.generative.top_p must be in the range 0.0-1.0.".to_string(),
		});
	}
	if generative.top_k == 0 {
		return Err(Error::Validation {
			message: "providers.generative.top_k must be greater than zero.".to_string(),
		});
	}
	if generative.max_output_tokens == 0 {
		return Err(Error::Validation {
			message: "providers.generative.max_output_tokens must be greater than zero."
				.to_string(),
		});
	}
	if generative.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "providers.generative.timeout_ms must be greater than zero.".to_string(),
		});
	}
	if generative.default_headers.values().any(|value| !value.is_string()) {
		return Err(Error::Validation {
			message: "providers.generative.default_headers values must be strings.".to_string(),
		});
	}
	if cfg.search.default_limit == 0 {
		return Err(Error::Validation {
			message: "search.default_limit must be greater than zero.".to_string(),
		});
	}
	if cfg.search.max_limit == 0 {
		return Err(Error::Validation {
			message: "search.max_limit must be greater than zero.".to_string(),
		});
	}
	if cfg.search.default_limit > cfg.search.max_limit {
		return Err(Error::Validation {
			message: "search.default_limit must not exceed search.max_limit.".to_string(),
		});
	}
	if cfg.search.max_image_bytes == 0 {
		return Err(Error::Validation {
			message: "search.max_image_bytes must be greater than zero.".to_string(),
		});
	}
	if cfg.listings.id_prefix.trim().is_empty() {
		return Err(Error::Validation {
			message: "listings.id_prefix must be non-empty.".to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	if cfg
		.catalog
		.seed_path
		.as_deref()
		.map(|path| path.as_os_str().to_string_lossy().trim().is_empty())
		.unwrap_or(false)
	{
		cfg.catalog.seed_path = None;
	}

	cfg.providers.generative.api_base =
		cfg.providers.generative.api_base.trim().trim_end_matches('/').to_string();
	cfg.listings.id_prefix = cfg.listings.id_prefix.trim().to_string();
}
