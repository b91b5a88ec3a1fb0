use anyhow::Result;
use clap::Parser;
use walkback_nn::cli::Cli;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("walkback_nn=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    cli.run()
}
