use anyhow::Result;
use plotters::prelude::*;
use plotters::style::full_palette::GREY_300;
use std::path::Path;
use tracing::info;

use super::{canvas, generation_style, Footer, FONT};
use crate::series::TimeSeries;

pub const LINE_SIZE: (u32, u32) = (1000, 600);

/// One line per series over the year axis, legend in the upper left.
pub fn render_line_chart(
    path: &Path,
    title: &str,
    y_desc: &str,
    series: &TimeSeries,
    footer: &Footer,
) -> Result<()> {
    let (root, plot, foot) = canvas(path, LINE_SIZE)?;

    let (x0, mut x1) = series.year_span();
    if x1 <= x0 {
        x1 = x0 + 1.0;
    }
    let y1 = (series.max_value() * 1.08).max(1.0);

    let mut chart = ChartBuilder::on(&plot)
        .caption(title, (FONT, 22))
        .margin(16)
        .x_label_area_size(40)
        .y_label_area_size(72)
        .build_cartesian_2d(x0..x1, 0.0..y1)?;

    chart
        .configure_mesh()
        .x_desc("Year")
        .y_desc(y_desc)
        .x_labels((x1 - x0) as usize + 1)
        .x_label_formatter(&|x| format!("{x:.0}"))
        .y_label_formatter(&|y| format!("{y:.0}"))
        .bold_line_style(GREY_300)
        .light_line_style(WHITE)
        .draw()?;

    for line in &series.lines {
        let style = generation_style(line.key);
        let color = style.color;
        chart
            .draw_series(LineSeries::new(
                line.points.iter().copied(),
                color.stroke_width(2),
            ))?
            .label(style.label)
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
            });
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.85))
        .border_style(WHITE)
        .label_font((FONT, 14))
        .draw()?;

    footer.draw(&foot)?;
    root.present()?;
    info!(path = %path.display(), lines = series.lines.len(), "rendered line chart");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::Line;
    use std::fs;

    #[test]
    fn writes_svg_with_title_and_legend() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("images").join("gen.svg");
        let series = TimeSeries {
            lines: vec![
                Line {
                    key: "coal",
                    points: vec![(2014.0, 4000.0), (2015.0, 3900.0), (2016.0, 4100.0)],
                },
                Line {
                    key: "hydro",
                    points: vec![(2014.0, 1000.0), (2016.0, 1150.0)],
                },
            ],
        };

        render_line_chart(
            &path,
            "China Electricity Generation by Source",
            "Generation (TWh)",
            &series,
            &Footer::new(["Data source: test"]),
        )
        .unwrap();

        let svg = fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("China Electricity Generation by Source"));
        assert!(svg.contains("Hydropower"));
        assert!(svg.contains("Data source: test"));
    }
}
