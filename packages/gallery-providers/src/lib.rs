pub mod gazetteer;

mod error;

pub use error::{Error, Result};

use reqwest::header::{HeaderMap, HeaderName, USER_AGENT};
use serde_json::{Map, Value};

/// Builds request headers from an optional user agent plus configured extras.
pub fn request_headers(
	user_agent: Option<&str>,
	default_headers: &Map<String, Value>,
) -> Result<HeaderMap> {
	let mut headers = HeaderMap::new();

	if let Some(user_agent) = user_agent {
		headers.insert(USER_AGENT, user_agent.parse()?);
	}

	for (key, value) in default_headers {
		let Some(raw) = value.as_str() else {
			return Err(Error::InvalidConfig {
				message: format!("Default header {key} must be a string."),
			});
		};

		headers.insert(HeaderName::from_bytes(key.as_bytes())?, raw.parse()?);
	}

	Ok(headers)
}
