mod common;
use chrono::{TimeDelta, Utc};
use gridmix::{Gridmix, SeriesKey, TimeWindow};
use common::{get_source, init_tracing};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    // A short records horizon keeps the initial download small.
    let gm = Gridmix::builder()
        .with_source(get_source()?)
        .cache_dir(".data_cache_demo")
        .records_start(
            chrono::DurationRound::duration_trunc(Utc::now(), TimeDelta::days(1))?
                - TimeDelta::days(3),
        )
        .build()?;

    gm.initialize_cache().await?;

    for key in SeriesKey::BUNDLE {
        let coverage = gm.cached_coverage(key).await?;
        let Some(cov) = coverage else {
            println!("{:<16} not cached", key.cache_name());
            continue;
        };
        let check = TimeWindow::new(cov.start, gm.max_end())?;
        let gaps = gm.gap_report(key, check).await?;
        println!(
            "{:<16} {cov}  {:>5.1}% complete, {} gap(s)",
            key.cache_name(),
            gaps.coverage_percent,
            gaps.gaps.len()
        );
    }

    gm.reset_cache().await?;
    println!("cache cleared");
    Ok(())
}
