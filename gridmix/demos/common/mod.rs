use std::sync::Arc;

use gridmix_core::{GridmixError, SeriesSource};
use tracing_subscriber::fmt::format::FmtSpan;

/// Live ENTSO-E source, or the deterministic mock when
/// `GRIDMIX_DEMOS_USE_MOCK` is set.
///
/// # Errors
/// Returns `Config` when the live source is selected and `ENTSOE_API_KEY` is unset.
pub fn get_source() -> Result<Arc<dyn SeriesSource>, GridmixError> {
    if std::env::var("GRIDMIX_DEMOS_USE_MOCK").is_ok() {
        println!("--- (Using Mock Source for CI) ---");
        Ok(Arc::new(gridmix_mock::MockSource::new()))
    } else {
        Ok(Arc::new(gridmix_entsoe::EntsoeConnector::from_env()?))
    }
}

/// Human-friendly subscriber filtered by `RUST_LOG`.
///
/// Suggested: `RUST_LOG=info,gridmix=debug,gridmix_cache=debug` with the
/// `tracing` feature enabled.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .with_span_events(FmtSpan::CLOSE)
        .try_init();
}
