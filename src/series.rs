use std::fmt;
use tracing::debug;

use crate::locate::table::{cell_number, row_is_empty};
use crate::locate::Located;

/// Generation series in plotting order.
pub const GENERATION_ORDER: [&str; 6] = [
    "coal",
    "natural_gas",
    "nuclear",
    "hydro",
    "non_hydro_renewables",
    "petroleum",
];

/// Capacity sources in bar order.
pub const CAPACITY_ORDER: [&str; 9] = [
    "coal",
    "natural_gas",
    "nuclear",
    "hydro",
    "wind",
    "solar",
    "storage",
    "oil",
    "other",
];

/// Year the capacity snapshot prefers.
pub const CAPACITY_YEAR: f64 = 2024.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeriesError {
    /// The located table has no year column to index by.
    NoYearColumn,
    /// None of the requested keys produced a single numeric value.
    NoValues,
}

impl fmt::Display for SeriesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoYearColumn => f.write_str("located table has no year column"),
            Self::NoValues => f.write_str("located table has no numeric values for any series"),
        }
    }
}

impl std::error::Error for SeriesError {}

/// One named line of a timeseries.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub key: &'static str,
    pub points: Vec<(f64, f64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    pub lines: Vec<Line>,
}

impl TimeSeries {
    /// Points `(year, value)` for each of `keys` the mapping resolved, in `keys` order.
    /// Rows where either cell is not numeric are skipped.
    pub fn from_located(located: &Located, keys: &[&'static str]) -> Result<Self, SeriesError> {
        let year = located
            .mapping
            .year
            .as_ref()
            .ok_or(SeriesError::NoYearColumn)?;

        let mut lines = Vec::new();
        for &key in keys {
            let Some(col) = located.mapping.get(key) else {
                continue;
            };
            let points: Vec<(f64, f64)> = located
                .table
                .rows
                .iter()
                .filter_map(|row| {
                    let x = cell_number(&row[year.index])?;
                    Some((x, cell_number(&row[col.index])?))
                })
                .collect();
            debug!(key, points = points.len(), "series extracted");
            if !points.is_empty() {
                lines.push(Line { key, points });
            }
        }

        if lines.is_empty() {
            return Err(SeriesError::NoValues);
        }
        Ok(Self { lines })
    }

    pub fn year_span(&self) -> (f64, f64) {
        self.points()
            .map(|(x, _)| x)
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), x| (lo.min(x), hi.max(x)))
    }

    pub fn max_value(&self) -> f64 {
        self.points().map(|(_, y)| y).fold(0.0, f64::max)
    }

    fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.lines.iter().flat_map(|l| l.points.iter().copied())
    }
}

/// One row of a located table, read as a value per source.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// Year of the chosen row, when the table has a numeric one.
    pub year: Option<f64>,
    pub values: Vec<(&'static str, f64)>,
}

impl Snapshot {
    /// The first row whose year equals `target_year`, else the last non-empty row; then each
    /// of `keys` the mapping resolved, keeping numeric cells only.
    pub fn from_located(
        located: &Located,
        keys: &[&'static str],
        target_year: f64,
    ) -> Result<Self, SeriesError> {
        let rows: Vec<&Vec<_>> = located
            .table
            .rows
            .iter()
            .filter(|row| !row_is_empty(row))
            .collect();
        let year_idx = located.mapping.year.as_ref().map(|c| c.index);

        let by_year = year_idx.and_then(|idx| {
            rows.iter()
                .find(|row| cell_number(&row[idx]) == Some(target_year))
        });
        let Some(row) = by_year.or_else(|| rows.last()) else {
            return Err(SeriesError::NoValues);
        };
        if by_year.is_none() {
            debug!(target_year, "no row for target year, using the last row");
        }

        let values: Vec<(&'static str, f64)> = keys
            .iter()
            .filter_map(|&key| {
                let col = located.mapping.get(key)?;
                Some((key, cell_number(&row[col.index])?))
            })
            .collect();
        if values.is_empty() {
            return Err(SeriesError::NoValues);
        }

        Ok(Self {
            year: year_idx.and_then(|idx| cell_number(&row[idx])),
            values,
        })
    }

    pub fn total(&self) -> f64 {
        self.values.iter().map(|(_, v)| v).sum()
    }
}
