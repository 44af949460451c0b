mod common;
use chrono::{DurationRound, TimeDelta, Utc};
use gridmix::{Gridmix, TimeWindow};
use common::{get_source, init_tracing};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    // 1. Source: ENTSO-E, or the mock when GRIDMIX_DEMOS_USE_MOCK is set.
    let source = get_source()?;

    // 2. Orchestrator with a cache next to the working directory.
    let gm = Gridmix::builder()
        .with_source(source)
        .cache_dir(".data_cache")
        .build()?;

    // 3. The last full week up to the current hour.
    let end = Utc::now().duration_trunc(TimeDelta::hours(1))?;
    let week = TimeWindow::new(end - TimeDelta::days(7), end)?;

    // 4. Attribute Portugal's mix with imports from Spain and France.
    let report = gm.compute_mix(week, true).await?;

    println!("Mix of Portugal over {} ({:?})", report.window, report.strategy);
    for share in &report.summary {
        println!("  {:<28} {:>10.1} MW  {:>5.1}%", share.source, share.mean_mw, share.percent);
    }
    for warning in &report.warnings {
        println!("warning: {warning}");
    }

    // Second run is served from the cache.
    let again = gm.compute_mix(week, true).await?;
    assert_eq!(again.power, report.power);

    Ok(())
}
