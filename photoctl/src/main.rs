use clap::Parser;
use photoctl::config::DEFAULT_CONFIG_FILE;
use photoctl::{telemetry, Args, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Install rustls crypto provider before anything else that might build a TLS client
    rustls::crypto::aws_lc_rs::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    // Parse CLI args
    let args = Args::parse();

    // If --validate flag is set, exit successfully after config validation
    if args.validate {
        let path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_FILE);
        Config::load(path)?;
        println!("Configuration is valid.");
        return Ok(());
    }

    // Initialize telemetry
    telemetry::init_telemetry()?;

    tracing::debug!("{:?}", args);

    photoctl::run(args.config).await
}
