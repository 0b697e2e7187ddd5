use anyhow::{bail, Result};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::Path;
use tracing::info;

use super::{canvas, Footer, FONT};

pub const PIE_SIZE: (u32, u32) = (1000, 800);

const START_ANGLE: f64 = 90.0;
const RADIUS: f64 = 250.0;
/// Label and percentage distances, as fractions of the radius.
const LABEL_DISTANCE: f64 = 1.1;
const PCT_DISTANCE: f64 = 0.8;

#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub label: String,
    pub value: f64,
    pub color: RGBColor,
}

impl PieSlice {
    pub fn new(label: impl Into<String>, value: f64, color: RGBColor) -> Self {
        Self {
            label: label.into(),
            value,
            color,
        }
    }
}

/// Start and end angle in degrees of each wedge, counter-clockwise from 90.
pub fn wedge_angles(values: &[f64]) -> Vec<(f64, f64)> {
    let total: f64 = values.iter().sum();
    let mut start = START_ANGLE;
    values
        .iter()
        .map(|v| {
            let end = start + 360.0 * v / total;
            let wedge = (start, end);
            start = end;
            wedge
        })
        .collect()
}

/// Screen position at `angle` degrees and `distance` pixels from `center`; y grows downward.
fn polar(center: (i32, i32), angle: f64, distance: f64) -> (i32, i32) {
    let rad = angle.to_radians();
    (
        center.0 + (distance * rad.cos()).round() as i32,
        center.1 - (distance * rad.sin()).round() as i32,
    )
}

/// Wedges from 90 degrees counter-clockwise, names outside, white percentages inside.
pub fn render_pie_chart(
    path: &Path,
    title: &str,
    slices: &[PieSlice],
    footer: &Footer,
) -> Result<()> {
    let values: Vec<f64> = slices.iter().map(|s| s.value).collect();
    let total: f64 = values.iter().sum();
    if slices.is_empty() || total <= 0.0 || values.iter().any(|v| *v < 0.0) {
        bail!("pie chart {title} needs positive values");
    }
    let (root, plot, foot) = canvas(path, PIE_SIZE)?;
    let (width, height) = plot.dim_in_pixel();
    let center = (width as i32 / 2, height as i32 / 2 + 24);

    let title_style = TextStyle::from((FONT, 24).into_font().style(FontStyle::Bold))
        .pos(Pos::new(HPos::Center, VPos::Top));
    plot.draw(&Text::new(title, (width as i32 / 2, 20), title_style))?;

    for (slice, (start, end)) in slices.iter().zip(wedge_angles(&values)) {
        let mut points = vec![center];
        let steps = ((end - start).ceil() as usize).max(1);
        for k in 0..=steps {
            let angle = start + (end - start) * k as f64 / steps as f64;
            points.push(polar(center, angle, RADIUS));
        }
        plot.draw(&Polygon::new(points, slice.color.filled()))?;

        let mid = (start + end) / 2.0;
        let side = if mid.to_radians().cos() >= 0.0 {
            HPos::Left
        } else {
            HPos::Right
        };
        let label_style =
            TextStyle::from((FONT, 16).into_font()).pos(Pos::new(side, VPos::Center));
        plot.draw(&Text::new(
            slice.label.as_str(),
            polar(center, mid, RADIUS * LABEL_DISTANCE),
            label_style,
        ))?;

        let pct_style = (FONT, 15)
            .into_font()
            .style(FontStyle::Bold)
            .color(&WHITE)
            .pos(Pos::new(HPos::Center, VPos::Center));
        plot.draw(&Text::new(
            format!("{:.1}%", 100.0 * slice.value / total),
            polar(center, mid, RADIUS * PCT_DISTANCE),
            pct_style,
        ))?;
    }

    footer.draw(&foot)?;
    root.present()?;
    info!(path = %path.display(), slices = slices.len(), "rendered pie chart");
    Ok(())
}
