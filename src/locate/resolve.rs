use serde::Serialize;
use std::{collections::BTreeMap, fmt};
use tracing::trace;

use super::aliases::AliasSet;
use super::normalize::normalize_header;
use super::table::{cell_number, Table};

/// Fixed plausibility window for year values.
pub const YEAR_RANGE: std::ops::RangeInclusive<f64> = 2000.0..=2035.0;

/// Share of a column's numeric values that must be plausible years.
const YEAR_SHARE: f64 = 0.6;

/// A column of a [`Table`], by position and header text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    pub index: usize,
    pub header: String,
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.header.is_empty() {
            write!(f, "#{}", self.index)
        } else {
            f.write_str(&self.header)
        }
    }
}

/// Canonical series keys (and the reserved year) resolved to table columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolvedMapping {
    pub year: Option<Column>,
    /// Keyed by canonical series key; iteration is alphabetical, not alias order.
    pub series: BTreeMap<&'static str, Column>,
}

impl ResolvedMapping {
    pub fn get(&self, key: &str) -> Option<&Column> {
        self.series.get(key)
    }

    pub fn series_count(&self) -> usize {
        self.series.len()
    }
}

/// When a resolved mapping is good enough to stop searching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Acceptance {
    pub min_series: usize,
    pub require_year: bool,
}

impl Acceptance {
    /// Multi-year series: a year column and at least three sources.
    pub const TIMESERIES: Self = Self {
        min_series: 3,
        require_year: true,
    };

    /// Single-row capacity snapshot: four sources, the year is only used to pick the row.
    pub const SNAPSHOT: Self = Self {
        min_series: 4,
        require_year: false,
    };

    pub fn accepts(&self, mapping: &ResolvedMapping) -> bool {
        (!self.require_year || mapping.year.is_some()) && mapping.series_count() >= self.min_series
    }
}

/// Year column: by header name first, then by values.
///
/// Never falls back to an arbitrary column; `None` means no year column exists.
pub fn find_year_column(table: &Table) -> Option<Column> {
    let by_name = table
        .headers
        .iter()
        .position(|h| matches!(normalize_header(h).as_str(), "year" | "years"));

    by_name
        .or_else(|| (0..table.width()).find(|&idx| looks_like_years(table, idx)))
        .map(|index| Column {
            index,
            header: table.headers[index].clone(),
        })
}

fn looks_like_years(table: &Table, idx: usize) -> bool {
    let values: Vec<f64> = table.column(idx).filter_map(cell_number).collect();
    if values.is_empty() {
        return false;
    }
    let plausible = values.iter().filter(|v| YEAR_RANGE.contains(*v)).count();
    plausible as f64 / values.len() as f64 > YEAR_SHARE
}

/// Resolve the year column and every alias key of `aliases` against `table` headers.
///
/// Per key the aliases are tried in order and, per alias, columns left to right; the first
/// exact normalized match wins.
pub fn resolve_columns(table: &Table, aliases: &AliasSet) -> ResolvedMapping {
    let normalized: Vec<String> = table.headers.iter().map(|h| normalize_header(h)).collect();
    let mut mapping = ResolvedMapping {
        year: find_year_column(table),
        series: BTreeMap::new(),
    };

    for (key, candidates) in aliases.iter() {
        let hit = candidates.iter().find_map(|alias| {
            let alias = normalize_header(alias);
            normalized.iter().position(|h| !h.is_empty() && *h == alias)
        });
        if let Some(index) = hit {
            trace!(key, header = %table.headers[index], "resolved series");
            mapping.series.insert(
                key,
                Column {
                    index,
                    header: table.headers[index].clone(),
                },
            );
        }
    }
    mapping
}
