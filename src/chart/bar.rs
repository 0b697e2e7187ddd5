use anyhow::{bail, Result};
use plotters::prelude::*;
use plotters::style::full_palette::GREY_300;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::Path;
use tracing::info;

use super::{canvas, capacity_style, Footer, FONT};
use crate::series::Snapshot;

pub const BAR_SIZE: (u32, u32) = (1000, 600);

/// One bar per source in snapshot order, each labelled with its rounded value.
pub fn render_bar_chart(
    path: &Path,
    title: &str,
    y_desc: &str,
    snapshot: &Snapshot,
    footer: &Footer,
) -> Result<()> {
    if snapshot.values.is_empty() {
        bail!("nothing to plot for {title}");
    }
    let (root, plot, foot) = canvas(path, BAR_SIZE)?;

    let labels: Vec<&str> = snapshot
        .values
        .iter()
        .map(|(key, _)| capacity_style(key).label)
        .collect();
    let top = snapshot.values.iter().map(|(_, v)| *v).fold(0.0, f64::max);
    let y1 = (top * 1.12).max(1.0);

    let mut chart = ChartBuilder::on(&plot)
        .caption(title, (FONT, 22))
        .margin(16)
        .x_label_area_size(44)
        .y_label_area_size(72)
        .build_cartesian_2d((0..labels.len()).into_segmented(), 0.0..y1)?;

    let name_of = |v: &SegmentValue<usize>| match v {
        SegmentValue::CenterOf(i) => labels.get(*i).map(|l| l.to_string()).unwrap_or_default(),
        _ => String::new(),
    };
    chart
        .configure_mesh()
        .disable_x_mesh()
        .y_desc(y_desc)
        .x_labels(labels.len())
        .x_label_formatter(&name_of)
        .y_label_formatter(&|y| format!("{y:.0}"))
        .bold_line_style(GREY_300)
        .light_line_style(WHITE)
        .draw()?;

    chart.draw_series(snapshot.values.iter().enumerate().map(|(i, (key, value))| {
        let mut bar = Rectangle::new(
            [
                (SegmentValue::Exact(i), 0.0),
                (SegmentValue::Exact(i + 1), *value),
            ],
            capacity_style(key).color.filled(),
        );
        bar.set_margin(0, 0, 12, 12);
        bar
    }))?;

    let value_text =
        TextStyle::from((FONT, 13).into_font()).pos(Pos::new(HPos::Center, VPos::Bottom));
    chart.draw_series(snapshot.values.iter().enumerate().map(|(i, (_, value))| {
        Text::new(
            format!("{value:.0}"),
            (SegmentValue::CenterOf(i), *value),
            value_text.clone(),
        )
    }))?;

    footer.draw(&foot)?;
    root.present()?;
    info!(path = %path.display(), bars = labels.len(), "rendered bar chart");
    Ok(())
}
