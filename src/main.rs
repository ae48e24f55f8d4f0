use anyhow::Result;
use sitac_app::adapters::inbound::{FileEnvelopeSource, WebSocketEnvelopeSource};
use sitac_app::adapters::outbound::{init_buffered_notifier, init_combined_notifier};
use sitac_app::application::{run_event_loop, SitacService};
use sitac_app::common::EnvelopeSource;
use sitac_app::domains::mobile::ConfigNotification;
use sitac_app::AppConfig;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting SITAC app");

    let config_path = std::env::var("SITAC_CONFIG").unwrap_or_else(|_| "config.toml".to_string());
    let config = AppConfig::load(&config_path)?;
    info!("Configuration loaded from {}", config_path);

    let notifier = init_buffered_notifier(init_combined_notifier(), 64);
    let mut service = SitacService::new(&config.display, notifier);

    let run_id = service.store().run_id();
    service.subscriptions_mut().on_config(move |notification, store| match notification {
        ConfigNotification::Snapshot(snapshot) => info!(
            "Run {}: simulation {} with {} mobiles",
            run_id,
            if snapshot.is_simulation_running { "running" } else { "stopped" },
            store.len()
        ),
        ConfigNotification::Refresh => info!("Run {}: {} mobiles", run_id, store.len()),
    });

    let mut source: Box<dyn EnvelopeSource> = match &config.channel.replay_file {
        Some(path) => {
            info!("Replaying envelopes from {}", path);
            Box::new(FileEnvelopeSource::open(path).await.map_err(anyhow::Error::msg)?)
        }
        None => Box::new(
            WebSocketEnvelopeSource::connect(&config.channel.socket_url)
                .await
                .map_err(anyhow::Error::msg)?,
        ),
    };

    tokio::select! {
        result = run_event_loop(source.as_mut(), &mut service) => match result {
            Ok(applied) => info!("Applied {} envelope(s)", applied),
            Err(e) => error!("Event loop stopped: {}", e),
        },
        _ = tokio::signal::ctrl_c() => info!("Shutting down SITAC app"),
    }

    Ok(())
}
