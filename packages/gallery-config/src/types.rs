use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub search: Search,
	pub providers: Providers,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	#[serde(default = "default_log_level")]
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
}

#[derive(Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

#[derive(Debug, Deserialize)]
pub struct Search {
	/// Media returned by one search before the result is flagged as overflowing.
	pub max_media_result: u32,
	/// Upper bound on the AND-branches a single SOME_OF node may expand into.
	#[serde(default = "default_max_some_of_combinations")]
	pub max_some_of_combinations: u32,
	pub autocomplete: AutoComplete,
}

#[derive(Debug, Deserialize)]
pub struct AutoComplete {
	pub max_items_per_category: u32,
}

#[derive(Debug, Deserialize)]
pub struct Providers {
	pub gazetteer: GazetteerProviderConfig,
}

#[derive(Debug, Deserialize)]
pub struct GazetteerProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub path: String,
	pub timeout_ms: u64,
	pub user_agent: Option<String>,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

fn default_log_level() -> String {
	"info".to_string()
}

fn default_max_some_of_combinations() -> u32 {
	256
}
