use anyhow::Context;
use clap::Parser;
use vtx_config::VtxConfig;

mod cli;
mod commands;
mod output;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("vtx error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    let flags = cli.global_flags();

    let config = VtxConfig::load_with_dotenv().context("failed to load vtx configuration")?;
    init_tracing(&flags, &config.general.log_level)?;

    match cli.command {
        cli::Commands::Lookup(args) => commands::lookup::handle(&args, &flags, config).await,
        cli::Commands::Validate => commands::validate::handle(&flags, &config),
    }
}

fn init_tracing(flags: &cli::GlobalFlags, configured: &str) -> anyhow::Result<()> {
    let level = if flags.quiet {
        "error"
    } else if flags.verbose {
        "debug"
    } else {
        configured
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("VTX_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();

    vtx_lookup::startup(subscriber).context("failed to initialize tracing subscriber")
}
