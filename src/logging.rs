use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;
use tracing_subscriber::{EnvFilter, Registry, fmt, reload};

/// Handle for swapping the active filter once the config is loaded.
pub type LevelHandle = reload::Handle<EnvFilter, Registry>;

/// Filter used before the config file has been read: `RUST_LOG`, then
/// `LOG_LEVEL`, then `info`.
pub fn startup_directive(lookup: impl Fn(&str) -> Option<String>) -> String {
    ["RUST_LOG", "LOG_LEVEL"]
        .into_iter()
        .find_map(|key| lookup(key).filter(|v| !v.trim().is_empty()))
        .unwrap_or_else(|| "info".to_string())
}

/// Build the fmt subscriber behind a reloadable filter.
pub fn subscriber<W>(
    directive: &str,
    writer: W,
) -> (impl Subscriber + Send + Sync + use<W>, LevelHandle)
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let (filter, handle) = reload::Layer::new(EnvFilter::new(directive));
    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(writer).with_ansi(false));
    (subscriber, handle)
}

/// Install the global subscriber on stderr; stdout carries MCP JSON-RPC.
pub fn init(lookup: impl Fn(&str) -> Option<String>) -> LevelHandle {
    let (subscriber, handle) = subscriber(&startup_directive(lookup), std::io::stderr);
    subscriber.init();
    handle
}

/// Switch to the configured `log_level` unless `RUST_LOG` pins the filter.
pub fn apply_config_level(
    handle: &LevelHandle,
    lookup: impl Fn(&str) -> Option<String>,
    log_level: &str,
) {
    if lookup("RUST_LOG").is_some_and(|v| !v.trim().is_empty()) {
        return;
    }
    if let Err(e) = handle.reload(EnvFilter::new(log_level)) {
        tracing::warn!(error = %e, log_level, "Failed to apply configured log level");
    }
}
