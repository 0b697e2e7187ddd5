use anyhow::{Context, Result};
use energymix::{
    chart::{render_bar_chart, retrieved_date, Footer},
    config::{Settings, EIA_FIGURE7},
    fetch::{resolve_source, HttpTransport},
    locate::{Locator, Workbook},
    logging,
    series::{Snapshot, CAPACITY_ORDER, CAPACITY_YEAR},
};
use tracing::{info, warn};

const OUTPUT_FILE: &str = "china_installed_generation_capacity_2024.svg";
const TITLE: &str = "China Installed Generation Capacity by Source (2024)";

fn main() -> Result<()> {
    // ─── 1) logging & settings ───────────────────────────────────────
    logging::init();
    let settings = Settings::from_env();

    // ─── 2) fetch or reuse figure 7 ──────────────────────────────────
    let transport = HttpTransport::new(settings.http_timeout)?;
    let xlsx = resolve_source(&settings, &EIA_FIGURE7, &transport)?;
    info!("Reading: {}", xlsx.display());

    // ─── 3) locate the capacity table, pick the 2024 row ─────────────
    let workbook = Workbook::open(&xlsx)?;
    let located = Locator::capacity()
        .locate(&workbook)
        .context("unable to parse EIA figure7 workbook into a usable table")?;
    let snapshot = Snapshot::from_located(&located, &CAPACITY_ORDER, CAPACITY_YEAR)?;
    match snapshot.year {
        Some(year) if year != CAPACITY_YEAR => {
            warn!(year, "no {CAPACITY_YEAR} row, plotting the latest row instead")
        }
        Some(_) => {}
        None => warn!("table has no year column, plotting its last row"),
    }
    info!(
        sources = snapshot.values.len(),
        total_gw = snapshot.total(),
        "capacity snapshot"
    );

    // ─── 4) render ───────────────────────────────────────────────────
    let out = settings.output_path(OUTPUT_FILE);
    let footer = Footer::eia(EIA_FIGURE7.file_name, EIA_FIGURE7.url, retrieved_date(&xlsx));
    render_bar_chart(&out, TITLE, "Capacity (GW)", &snapshot, &footer)?;
    info!("Saved capacity chart to: {}", out.display());
    Ok(())
}
