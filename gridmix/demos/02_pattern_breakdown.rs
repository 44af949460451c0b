mod common;
use gridmix::{AttributionStrategy, Gridmix, Granularity, TimePattern};
use common::{get_source, init_tracing};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let gm = Gridmix::builder()
        .with_source(get_source()?)
        .cache_dir(".data_cache")
        .strategy(AttributionStrategy::Discriminated)
        .granularity(Granularity::Monthly)
        .timezone(chrono_tz::Europe::Lisbon)
        .build()?;

    // Summer evenings of 2023.
    let evenings = TimePattern::new("2023", "6-8", "", "18-22");
    let report = gm.compute_mix(evenings, true).await?;

    println!("Monthly mix (percent):");
    for (ts, row) in report.percentages.index.iter().zip(&report.percentages.rows) {
        let cells: Vec<String> = report
            .percentages
            .columns
            .iter()
            .zip(row)
            .map(|(c, v)| format!("{}={v:.1}", gridmix_core::label_for(c)))
            .collect();
        println!("  {}  {}", ts.format("%Y-%m"), cells.join(" "));
    }

    println!("\nWhere Portugal's evening power came from:");
    for row in &report.breakdown {
        println!(
            "  {:<9} {:<28} {:>8.1} MW  {:>5.1}% national  {:>5.1}% global  {}",
            row.origin.iso_code(),
            row.source,
            row.power_mw,
            row.national_percent,
            row.global_percent,
            row.energy
        );
    }

    // Reports serialize as-is for downstream tooling.
    println!("\n{}", serde_json::to_string_pretty(&report.summary)?);

    Ok(())
}
