use clap::Parser;
use gridbot_term::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    gridbot_term::init_tracing(&cli.log);

    let config = cli.into_config();
    tracing::info!(base_url = %config.base_url, "starting gridbot client");
    gridbot_term::run(config).await
}
