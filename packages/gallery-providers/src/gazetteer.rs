//! Place-name lookup against a Nominatim-compatible search endpoint.

use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use gallery_domain::geo::Coordinates;

use crate::{Error, Result};

/// Resolves `text` to the coordinates of the best match, or `None` when nothing matches.
pub async fn resolve(
	cfg: &gallery_config::GazetteerProviderConfig,
	text: &str,
) -> Result<Option<Coordinates>> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let res = client
		.get(url)
		.headers(crate::request_headers(cfg.user_agent.as_deref(), &cfg.default_headers)?)
		.query(&[("q", text), ("format", "json"), ("limit", "1")])
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	parse_search_response(&json)
}

fn parse_search_response(json: &Value) -> Result<Option<Coordinates>> {
	let places = json.as_array().ok_or_else(|| Error::InvalidResponse {
		message: "Gazetteer response must be a JSON array.".to_string(),
	})?;
	let Some(place) = places.first() else {
		return Ok(None);
	};
	let latitude = coordinate(place, "lat")?;
	let longitude = coordinate(place, "lon")?;

	Ok(Some(Coordinates { latitude, longitude }))
}

// Nominatim encodes coordinates as decimal strings; plain numbers are accepted as well.
fn coordinate(place: &Value, key: &str) -> Result<f64> {
	let value = place.get(key).ok_or_else(|| Error::InvalidResponse {
		message: format!("Gazetteer result is missing {key}."),
	})?;
	let parsed = match value {
		Value::String(raw) => raw.trim().parse::<f64>().ok(),
		Value::Number(number) => number.as_f64(),
		_ => None,
	};

	parsed.filter(|number| number.is_finite()).ok_or_else(|| Error::InvalidResponse {
		message: format!("Gazetteer {key} must be a decimal number."),
	})
}
