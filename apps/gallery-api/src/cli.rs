use std::path::PathBuf;

use clap::{
	Parser,
	builder::{
		Styles,
		styling::{AnsiColor, Effects},
	},
};

pub const VERSION: &str = concat!(
	env!("CARGO_PKG_VERSION"),
	" (",
	env!("VERGEN_GIT_SHA"),
	", ",
	env!("VERGEN_CARGO_TARGET_TRIPLE"),
	")",
);

/// Structured media search over HTTP.
#[derive(Debug, Parser)]
#[command(version = VERSION, rename_all = "kebab", styles = styles())]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
	/// Listen address, overriding `service.http_bind`.
	#[arg(long, value_name = "ADDR")]
	pub http_bind: Option<String>,
	/// Tracing filter, overriding `service.log_level`.
	#[arg(long, value_name = "FILTER")]
	pub log_level: Option<String>,
}
impl Args {
	/// Loads the config file and applies command-line overrides before validating.
	pub fn load_config(&self) -> gallery_config::Result<gallery_config::Config> {
		let mut config = gallery_config::load(&self.config)?;

		self.apply_overrides(&mut config);
		gallery_config::validate(&config)?;

		Ok(config)
	}

	pub fn apply_overrides(&self, config: &mut gallery_config::Config) {
		if let Some(http_bind) = &self.http_bind {
			config.service.http_bind = http_bind.trim().to_string();
		}
		if let Some(log_level) = &self.log_level {
			config.service.log_level = log_level.trim().to_string();
		}
	}
}

fn styles() -> Styles {
	Styles::styled()
		.header(AnsiColor::Yellow.on_default() | Effects::BOLD | Effects::UNDERLINE)
		.usage(AnsiColor::Yellow.on_default() | Effects::BOLD)
		.literal(AnsiColor::Cyan.on_default())
		.placeholder(AnsiColor::BrightBlack.on_default())
		.error(AnsiColor::Red.on_default() | Effects::BOLD)
		.valid(AnsiColor::Green.on_default())
		.invalid(AnsiColor::Red.on_default())
}
