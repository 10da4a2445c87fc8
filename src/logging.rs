//! Logging initialization and configuration.

use tracing_subscriber::{
    layer::SubscriberExt, registry::LookupSpan, util::SubscriberInitExt, EnvFilter, Layer,
};

const DEFAULT_FILTER: &str = "memsession=info";

/// Compact formatter on stderr, keeping stdout free for console replies.
fn fmt_layer<S>() -> impl Layer<S>
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    tracing_subscriber::fmt::layer()
        .compact()
        .with_writer(std::io::stderr)
}

fn default_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Initialize the logging system.
///
/// Uses the `RUST_LOG` environment variable for filtering. If not set,
/// defaults to `memsession=info`.
///
/// # Panics
///
/// Panics if called more than once, or if another tracing subscriber
/// has already been set.
pub fn init() {
    tracing_subscriber::registry()
        .with(default_filter())
        .with(fmt_layer())
        .init();
}

/// Try to initialize the logging system.
///
/// Returns `Ok(())` if successful, or `Err` if logging has already been
/// initialized.
pub fn try_init() -> Result<(), tracing_subscriber::util::TryInitError> {
    tracing_subscriber::registry()
        .with(default_filter())
        .with(fmt_layer())
        .try_init()
}

/// Try to initialize logging with an explicit filter.
///
/// A bare level such as `debug` is scoped to this crate; anything else is
/// treated as a full `EnvFilter` directive string. Invalid directives fall
/// back to the default filter.
pub fn init_with_filter(filter: &str) -> Result<(), tracing_subscriber::util::TryInitError> {
    let directive = filter_directive(filter);
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer())
        .try_init()
}

fn filter_directive(filter: &str) -> String {
    let filter = filter.trim();
    match filter.to_ascii_lowercase().as_str() {
        "error" | "warn" | "info" | "debug" | "trace" | "off" => {
            format!("memsession={}", filter.to_ascii_lowercase())
        }
        "" => DEFAULT_FILTER.to_string(),
        _ => filter.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_init_idempotent() {
        // First call may or may not succeed depending on test order
        let _ = try_init();
        // Either way, a second call must not panic
        let _ = try_init();
        let _ = init_with_filter("debug");
    }

    #[test]
    fn test_logging_works() {
        let _ = try_init();

        tracing::info!("test info message");
        tracing::debug!("test debug message");
        tracing::warn!("test warn message");
    }

    #[test]
    fn test_all_initializers_share_stderr_layer() {
        // Scoped subscriber, so this works regardless of global init order
        let subscriber = tracing_subscriber::registry()
            .with(EnvFilter::new("memsession=debug"))
            .with(fmt_layer());

        tracing::subscriber::with_default(subscriber, || {
            tracing::debug!("routed to stderr");
        });
    }

    #[test]
    fn test_filter_directive() {
        assert_eq!(filter_directive("debug"), "memsession=debug");
        assert_eq!(filter_directive("WARN"), "memsession=warn");
        assert_eq!(filter_directive(""), "memsession=info");
        assert_eq!(
            filter_directive("memsession=trace,hyper=off"),
            "memsession=trace,hyper=off"
        );
    }
}
