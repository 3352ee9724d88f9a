use autopulse::application::{CallDispatcher, CallStore, PollerConfig, StatusPoller};
use autopulse::config::Config;
use autopulse::domain::call::CallBackend;
use autopulse::domain::shared::value_objects::RecordId;
use autopulse::infrastructure::http::{HttpBackendConfig, HttpCallBackend};
use autopulse::infrastructure::notify::TracingNotifier;
use autopulse::interface::ConsoleRenderer;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let (config_path, requested) = parse_args();
    let config = Config::load(config_path.as_deref())?;
    info!(backend = %config.backend.base_url, "Starting AutoPulse dialer");

    let backend = Arc::new(HttpCallBackend::new(HttpBackendConfig {
        base_url: config.backend.base_url.clone(),
        api_key: config.backend.api_key.clone(),
        request_timeout: config.backend.request_timeout(),
    })?);
    let store = Arc::new(CallStore::new(64));
    let notifier = Arc::new(TracingNotifier::new());

    let poller = StatusPoller::new(
        backend.clone(),
        store.clone(),
        notifier.clone(),
        PollerConfig {
            interval: config.poller.interval(),
            max_transient_failures: config.poller.max_transient_failures,
        },
    );
    let dispatcher = CallDispatcher::new(backend.clone(), store.clone(), poller.clone(), notifier);

    let renderer = ConsoleRenderer::new(store.clone());
    let _render_task = renderer.spawn();

    // State is transient; rebuild it from the backend on startup
    let records = backend.list_records().await?;
    store.load(records);
    info!(
        records = store.len(),
        eligible = store.eligible_records().len(),
        "Loaded call records"
    );

    let selected = if requested.is_empty() {
        dispatcher.select_all()
    } else {
        requested
            .iter()
            .filter(|id| dispatcher.select(&RecordId::from(id.as_str())))
            .count()
    };

    if selected == 0 {
        info!("No records ready for calling");
        return Ok(());
    }

    let outcome = dispatcher.dispatch_batch().await;
    info!(
        dispatched = outcome.dispatched_count(),
        rejected = outcome.rejected_count(),
        "Batch dispatched"
    );

    // Stay up until every dispatched call reaches a terminal status
    while poller.polling_count() > 0 {
        tokio::time::sleep(config.poller.interval()).await;
    }
    poller.shutdown();

    info!("All calls finished");
    Ok(())
}

/// `autopulse [--config <path>] [record-id ...]`
///
/// With no record ids, every eligible record is selected.
fn parse_args() -> (Option<String>, Vec<String>) {
    let mut config_path = None;
    let mut records = Vec::new();

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" | "-c" => config_path = args.next(),
            other => records.push(other.to_string()),
        }
    }

    (config_path, records)
}
