use crate::Error;
use tracing_subscriber::EnvFilter;

const TRACE_FILTER: &str = "apu=trace,ceres_apu_std=debug";
const DEFAULT_FILTER: &str = "warn";

/// Installs a stderr subscriber. `RUST_LOG` takes precedence over the default
/// filter picked by `trace`.
///
/// # Errors
///
/// Returns an error if a global subscriber is already set.
#[inline]
pub fn init(trace: bool) -> Result<(), Error> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if trace { TRACE_FILTER } else { DEFAULT_FILTER }));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(Error::Tracing)
}
