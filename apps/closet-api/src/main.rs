use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = closet_api::Args::parse();

	closet_api::run(args).await
}
