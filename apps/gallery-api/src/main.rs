use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = gallery_api::Args::parse();

	gallery_api::run(args).await
}
