mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	AutoComplete, Config, GazetteerProviderConfig, Postgres, Providers, Search, Service, Storage,
};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

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
	if cfg.storage.postgres.dsn.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.postgres.dsn must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.pool_max_conns must be greater than zero.".to_string(),
		});
	}
	if cfg.search.max_media_result == 0 {
		return Err(Error::Validation {
			message: "search.max_media_result must be greater than zero.".to_string(),
		});
	}
	if cfg.search.max_some_of_combinations == 0 {
		return Err(Error::Validation {
			message: "search.max_some_of_combinations must be greater than zero.".to_string(),
		});
	}
	if cfg.search.autocomplete.max_items_per_category == 0 {
		return Err(Error::Validation {
			message: "search.autocomplete.max_items_per_category must be greater than zero."
				.to_string(),
		});
	}

	let gazetteer = &cfg.providers.gazetteer;

	if gazetteer.provider_id.trim().is_empty() {
		return Err(Error::Validation {
			message: "providers.gazetteer.provider_id must be non-empty.".to_string(),
		});
	}
	if !(gazetteer.api_base.starts_with("http://") || gazetteer.api_base.starts_with("https://"))
	{
		return Err(Error::Validation {
			message: "providers.gazetteer.api_base must be an http or https URL.".to_string(),
		});
	}
	if gazetteer.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "providers.gazetteer.timeout_ms must be greater than zero.".to_string(),
		});
	}

	for (key, value) in &gazetteer.default_headers {
		if !value.is_string() {
			return Err(Error::Validation {
				message: format!("providers.gazetteer.default_headers.{key} must be a string."),
			});
		}
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	if cfg.service.log_level.trim().is_empty() {
		cfg.service.log_level = "info".to_string();
	}
	if cfg
		.providers
		.gazetteer
		.user_agent
		.as_deref()
		.map(|agent| agent.trim().is_empty())
		.unwrap_or(false)
	{
		cfg.providers.gazetteer.user_agent = None;
	}

	while cfg.providers.gazetteer.api_base.ends_with('/') {
		cfg.providers.gazetteer.api_base.pop();
	}
}
