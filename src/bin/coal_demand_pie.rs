use anyhow::Result;
use energymix::{
    chart::{render_pie_chart, Footer, PieSlice},
    config::Settings,
    logging,
};
use plotters::style::RGBColor;
use tracing::info;

const OUTPUT_FILE: &str = "coal_demand_sources_cn.svg";
const TITLE: &str = "中国煤炭需求分布 (2023年)";
const SOURCE_NOTE: &str = "数据来源：美国能源信息署(EIA)，行业分析";

/// Share of coal demand by consuming sector, percent (EIA data and industry analysis).
const COAL_DEMAND_2023: [(&str, f64, RGBColor); 4] = [
    ("电力生产", 62.0, RGBColor(0x1f, 0x77, 0xb4)),
    ("钢铁工业", 18.0, RGBColor(0xff, 0x7f, 0x0e)),
    ("化学工业", 12.0, RGBColor(0x2c, 0xa0, 0x2c)),
    ("其他", 8.0, RGBColor(0xd6, 0x27, 0x28)),
];

fn main() -> Result<()> {
    logging::init();
    let settings = Settings::from_env();

    let slices: Vec<PieSlice> = COAL_DEMAND_2023
        .iter()
        .map(|&(label, share, color)| PieSlice::new(label, share, color))
        .collect();

    let out = settings.output_path(OUTPUT_FILE);
    render_pie_chart(&out, TITLE, &slices, &Footer::new([SOURCE_NOTE]))?;
    info!("中文图表已保存到: {}", out.display());
    Ok(())
}
