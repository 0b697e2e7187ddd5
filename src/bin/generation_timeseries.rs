use anyhow::{Context, Result};
use energymix::{
    chart::{render_line_chart, retrieved_date, Footer},
    config::{Settings, EIA_FIGURE6},
    fetch::{resolve_source, HttpTransport},
    locate::{Locator, Workbook},
    logging,
    series::{TimeSeries, GENERATION_ORDER},
};
use tracing::info;

const OUTPUT_FILE: &str = "china_electricity_generation_timeseries_2014_2023.svg";
const TITLE: &str = "China Electricity Generation by Source (2014-2023)";

fn main() -> Result<()> {
    // ─── 1) logging & settings ───────────────────────────────────────
    logging::init();
    let settings = Settings::from_env();

    // ─── 2) fetch or reuse figure 6 ──────────────────────────────────
    let transport = HttpTransport::new(settings.http_timeout)?;
    let xlsx = resolve_source(&settings, &EIA_FIGURE6, &transport)?;
    info!("Reading: {}", xlsx.display());

    // ─── 3) locate the generation table ──────────────────────────────
    let workbook = Workbook::open(&xlsx)?;
    let located = Locator::generation()
        .locate(&workbook)
        .context("unable to parse EIA figure6 workbook into a usable table")?;
    let series = TimeSeries::from_located(&located, &GENERATION_ORDER)?;

    // ─── 4) render ───────────────────────────────────────────────────
    let out = settings.output_path(OUTPUT_FILE);
    let footer = Footer::eia(EIA_FIGURE6.file_name, EIA_FIGURE6.url, retrieved_date(&xlsx));
    render_line_chart(&out, TITLE, "Generation (TWh)", &series, &footer)?;
    info!("Saved timeseries chart to: {}", out.display());
    Ok(())
}
