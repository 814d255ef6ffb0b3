use airkorea::{
    AccessoryConfig, AirKoreaClient, AirKoreaError, AirQualityMonitor, LoggingObserver,
    PollingMode,
};
use clap::Parser;
use std::path::PathBuf;

/// Reports the air quality of one AirKorea station.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct AirKoreaArguments {
    /// JSON file holding the accessory configuration
    #[arg(short, long)]
    config: PathBuf,

    /// refresh once and print the conditions, even when polling is enabled
    #[arg(long)]
    once: bool,
}

async fn run(args: AirKoreaArguments) -> Result<(), AirKoreaError> {
    let settings = AccessoryConfig::from_path(&args.config).await?.validate()?;
    let info = settings.accessory_info();
    log::info!(
        "{} ({}, serial {}, firmware {})",
        info.name,
        info.model,
        info.serial_number,
        info.firmware_revision
    );

    let client = AirKoreaClient::from_settings(&settings)?;
    let mut settings = settings;
    if args.once {
        settings.polling = false;
    }
    let mode = settings.mode();
    let monitor = AirQualityMonitor::builder()
        .observer(LoggingObserver::new(settings.station.clone()))
        .settings(settings)
        .fetcher(client)
        .build()?;

    match mode {
        PollingMode::Pull => {
            let conditions = monitor.refresh().await;
            match serde_json::to_string_pretty(&conditions) {
                Ok(json) => println!("{json}"),
                Err(e) => log::error!("failed to render conditions: {e}"),
            }
        }
        PollingMode::Push { interval } => {
            log::info!("polling every {} minutes, press ctrl-c to stop", interval.as_secs() / 60);
            if let Err(e) = tokio::signal::ctrl_c().await {
                log::error!("failed to listen for ctrl-c: {e}");
            }
            monitor.shutdown().await?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = AirKoreaArguments::parse();
    match run(args).await {
        Ok(_) => log::info!("finished."),
        Err(e) => {
            log::error!("failed running airkorea: {e}");
            std::process::exit(1);
        }
    }
}
