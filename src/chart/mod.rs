use anyhow::{Context, Result};
use chrono::{DateTime, Local, NaiveDate};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::{fs, path::Path};
use tracing::debug;

pub mod bar;
pub mod line;
pub mod pie;

pub use bar::render_bar_chart;
pub use line::render_line_chart;
pub use pie::{render_pie_chart, PieSlice};

pub const FONT: &str = "sans-serif";

/// Height of the band under the plot holding the source note.
pub const FOOTER_HEIGHT: u32 = 56;

const FOOTER_GREY: RGBColor = RGBColor(0x55, 0x55, 0x55);
const FALLBACK: RGBColor = RGBColor(0x95, 0xA5, 0xA6);

/// Display name and color of one canonical series key.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesStyle {
    pub label: &'static str,
    pub color: RGBColor,
}

const fn style(label: &'static str, hex: u32) -> SeriesStyle {
    SeriesStyle {
        label,
        color: RGBColor((hex >> 16) as u8, (hex >> 8) as u8, hex as u8),
    }
}

pub fn generation_style(key: &str) -> SeriesStyle {
    match key {
        "coal" => style("Coal", 0x2C3E50),
        "natural_gas" => style("Natural Gas", 0xC0392B),
        "nuclear" => style("Nuclear", 0xF1C40F),
        "hydro" => style("Hydropower", 0x2980B9),
        "non_hydro_renewables" => style("Non-hydro Renewables", 0x27AE60),
        "petroleum" => style("Petroleum & Other Liquids", 0x7F8C8D),
        _ => SeriesStyle {
            label: "Other",
            color: FALLBACK,
        },
    }
}

pub fn capacity_style(key: &str) -> SeriesStyle {
    match key {
        "coal" => style("Coal", 0x2C3E50),
        "natural_gas" => style("Natural Gas", 0xC0392B),
        "nuclear" => style("Nuclear", 0xF1C40F),
        "hydro" => style("Hydropower", 0x2980B9),
        "wind" => style("Wind", 0x16A085),
        "solar" => style("Solar", 0xF39C12),
        "storage" => style("Storage", 0x8E44AD),
        "oil" => style("Oil/Petroleum", 0x7F8C8D),
        _ => style("Other", 0x95A5A6),
    }
}

/// Source note printed centered under a chart, one entry per line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Footer {
    pub lines: Vec<String>,
}

impl Footer {
    pub fn new(lines: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    /// "Data source: U.S. EIA - <file> (retrieved <date>)" over the workbook URL.
    pub fn eia(file_name: &str, url: &str, retrieved: Option<NaiveDate>) -> Self {
        let when = match retrieved {
            Some(date) => format!("retrieved {}", date.format("%Y-%m-%d")),
            None => "retrieved".to_string(),
        };
        Self::new([
            format!("Data source: U.S. EIA - {file_name} ({when})"),
            url.to_string(),
        ])
    }

    fn draw(&self, area: &Area<'_>) -> Result<()> {
        let (width, _) = area.dim_in_pixel();
        let text = TextStyle::from((FONT, 13).into_font())
            .color(&FOOTER_GREY)
            .pos(Pos::new(HPos::Center, VPos::Top));
        for (i, line) in self.lines.iter().enumerate() {
            let y = 8 + 18 * i as i32;
            area.draw(&Text::new(line.as_str(), (width as i32 / 2, y), text.clone()))?;
        }
        Ok(())
    }
}

/// Date a cached workbook was last written, shown as its retrieval date.
pub fn retrieved_date(path: &Path) -> Option<NaiveDate> {
    let modified = fs::metadata(path).and_then(|m| m.modified()).ok()?;
    Some(DateTime::<Local>::from(modified).date_naive())
}

type Area<'a> = DrawingArea<SVGBackend<'a>, Shift>;

/// Create the output directory and a white SVG canvas, split into plot and footer.
fn canvas<'a>(path: &'a Path, size: (u32, u32)) -> Result<(Area<'a>, Area<'a>, Area<'a>)> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating output directory {}", parent.display()))?;
    }
    debug!(path = %path.display(), width = size.0, height = size.1, "new svg canvas");

    let root = SVGBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;
    let (plot, footer) = root.split_vertically((size.1 - FOOTER_HEIGHT) as i32);
    Ok((root, plot, footer))
}
