use reqwest::header::USER_AGENT;
use serde_json::{Map, Value};

#[test]
fn builds_user_agent_and_extra_headers() {
	let mut extra = Map::new();

	extra.insert("Accept-Language".to_string(), Value::String("en".to_string()));

	let headers = gallery_providers::request_headers(Some("gallery-search/0.1"), &extra)
		.expect("Failed to build headers.");

	assert_eq!(headers.get(USER_AGENT).expect("Missing user agent."), "gallery-search/0.1");
	assert_eq!(headers.get("accept-language").expect("Missing extra header."), "en");
}

#[test]
fn rejects_non_string_header_values() {
	let mut extra = Map::new();

	extra.insert("X-Retries".to_string(), Value::from(3));

	let err = gallery_providers::request_headers(None, &extra).expect_err("numeric header");

	assert!(err.to_string().contains("X-Retries"));
}
