use tracing::Dispatch;
use tracing_subscriber::EnvFilter;

/// Builds the log pipeline for one run: `<timestamp> <LEVEL> <message>` lines
/// on stdout, filtered by `RUST_LOG` or else by `directive`.
///
/// Nothing is installed globally; callers scope it with
/// [`tracing::dispatcher::with_default`].
pub fn dispatch(directive: &str) -> Dispatch {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(directive))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stdout)
        .finish();
    Dispatch::new(subscriber)
}
