use anyhow::Context;
use clap::Parser;
use kiosk_displayd::{
    identity, report_monitors, ConfiguratorOptions, ControlPlane, DisplayConfigurator,
    HttpControlPlane, Settings, SwayDisplayManager, Synchronizer, SystemSupervisor,
};
use log::{error, info, LevelFilter};
use std::{path::PathBuf, process::ExitCode};
use tokio::signal::unix::{signal, SignalKind};

/// Keeps this kiosk's sway layout in sync with the control server.
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    /// Path to the TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Override the control server base URL
    #[arg(long)]
    server_url: Option<String>,
    /// Network interface whose MAC address identifies this device
    #[arg(long)]
    interface: Option<String>,
    /// Seconds between config polls
    #[arg(long)]
    interval: Option<u64>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let mut builder = pretty_env_logger::formatted_builder();
    builder.filter_level(LevelFilter::Info);
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    builder.init();

    match run(Args::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let mut settings = Settings::load(args.config.as_deref())?;
    if let Some(url) = args.server_url {
        settings.server_url = url;
    }
    if let Some(interface) = args.interface {
        settings.interface = Some(interface);
    }
    if let Some(interval) = args.interval {
        settings.poll_interval_secs = interval;
    }
    settings.validate()?;

    let device = identity::resolve(settings.interface.as_deref())
        .context("unable to determine device identity")?;
    info!("starting display agent for device {device} against {}", settings.server_url);

    let control = HttpControlPlane::new(&settings.server_url, settings.request_timeout())
        .context("unable to build http client")?;
    let mut display = SwayDisplayManager::new();

    tokio::join!(
        control.register(&device),
        report_monitors(&control, &device, &mut display),
    );

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;
    let shutdown = async move {
        tokio::select! {
            _ = sigterm.recv() => {}
            _ = sigint.recv() => {}
        }
    };

    let configurator = DisplayConfigurator::new(
        display,
        SystemSupervisor,
        ConfiguratorOptions::from(&settings),
    );
    let mut synchronizer = Synchronizer::new(device, control, configurator);
    synchronizer.run(settings.poll_interval(), shutdown).await;
    Ok(())
}
