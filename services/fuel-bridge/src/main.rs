use fuel_bridge::handlers::SERVICE_NAME;
use fuel_bridge::{BridgeConfig, CliArgs, Supervisor};
use fuelbridge_core::logging;
use serde::Serialize;
use tracing::info;

#[derive(Debug, Serialize)]
struct VersionHandshake {
    version: &'static str,
    service: &'static str,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let cli = CliArgs::parse(&args)?;

    if cli.version_json {
        let handshake = VersionHandshake {
            version: env!("CARGO_PKG_VERSION"),
            service: SERVICE_NAME,
        };
        println!("{}", serde_json::to_string(&handshake)?);
        return Ok(());
    }

    let config = BridgeConfig::load(cli.config_path.as_deref())?;
    logging::init_with(config.log_format);

    info!(
        redis_url = %config.redis_url,
        topic = %config.topic,
        bind = %config.bind_addr(),
        "Starting fuel bridge"
    );

    Supervisor::new(config).run().await?;
    Ok(())
}
