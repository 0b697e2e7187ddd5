use calamine::Data;
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, trace};

use super::aliases::{AliasSet, NON_HYDRO_COMPONENTS, NON_HYDRO_RENEWABLES, PIVOT_ROW_LABELS};
use super::resolve::{resolve_columns, Acceptance, YEAR_RANGE};
use super::table::{cell_is_empty, cell_number, cell_text, row_is_empty, Table};
use super::workbook::{Sheet, Workbook};
use super::Located;

/// What a strategy found: a table, or how many candidate tables it rejected.
#[derive(Debug)]
pub enum Outcome {
    Found(Located),
    Exhausted { candidates: usize },
}

/// One way of discovering the data table inside a workbook.
pub trait Strategy {
    fn name(&self) -> &'static str;

    fn search(&self, workbook: &Workbook, aliases: &AliasSet, acceptance: Acceptance) -> Outcome;
}

/// Resolve `table` and wrap it if it passes `acceptance`.
fn try_candidate(
    strategy: &'static str,
    sheet: &str,
    header_row: usize,
    table: Table,
    aliases: &AliasSet,
    acceptance: Acceptance,
) -> Option<Located> {
    let mapping = resolve_columns(&table, aliases);
    debug!(
        strategy,
        sheet,
        header_row,
        year = mapping.year.is_some(),
        series = mapping.series_count(),
        "candidate"
    );
    acceptance.accepts(&mapping).then(|| Located {
        strategy,
        sheet: sheet.to_string(),
        header_row,
        table,
        mapping,
    })
}

/// Each sheet with header rows at offsets `0..=max_offset`, counted over non-blank rows.
#[derive(Debug, Clone, Copy)]
pub struct HeaderScan {
    pub max_offset: usize,
}

impl Default for HeaderScan {
    fn default() -> Self {
        Self { max_offset: 5 }
    }
}

impl Strategy for HeaderScan {
    fn name(&self) -> &'static str {
        "header-scan"
    }

    fn search(&self, workbook: &Workbook, aliases: &AliasSet, acceptance: Acceptance) -> Outcome {
        let mut candidates = 0;
        for sheet in &workbook.sheets {
            // offsets count non-blank rows; `raw_index` maps back to sheet rows
            let (raw_index, lines): (Vec<usize>, Vec<Vec<Data>>) = sheet
                .rows
                .iter()
                .enumerate()
                .filter(|(_, row)| !row_is_empty(row))
                .map(|(i, row)| (i, row.clone()))
                .unzip();

            for offset in 0..=self.max_offset {
                let Some(table) = Table::from_header_row(&lines, offset) else {
                    break;
                };
                if table.is_empty() {
                    continue;
                }
                candidates += 1;
                let header_row = raw_index[offset];
                if let Some(found) =
                    try_candidate(self.name(), &sheet.name, header_row, table, aliases, acceptance)
                {
                    return Outcome::Found(found);
                }
            }
        }
        Outcome::Exhausted { candidates }
    }
}

/// Each sheet read headerless: the first `max_rows` raw rows that name enough known series
/// are tried as the header.
#[derive(Debug, Clone, Copy)]
pub struct HeaderlessScan {
    pub max_rows: usize,
}

impl Default for HeaderlessScan {
    fn default() -> Self {
        Self { max_rows: 15 }
    }
}

/// Distinct alias keys named by the cells of `row`.
pub fn series_name_hits(row: &[Data], aliases: &AliasSet) -> usize {
    row.iter()
        .filter_map(|cell| aliases.key_for(&cell_text(cell)))
        .collect::<BTreeSet<_>>()
        .len()
}

impl Strategy for HeaderlessScan {
    fn name(&self) -> &'static str {
        "headerless-scan"
    }

    fn search(&self, workbook: &Workbook, aliases: &AliasSet, acceptance: Acceptance) -> Outcome {
        let mut candidates = 0;
        for sheet in &workbook.sheets {
            for idx in 0..sheet.rows.len().min(self.max_rows) {
                let hits = series_name_hits(&sheet.rows[idx], aliases);
                if hits < acceptance.min_series {
                    continue;
                }
                trace!(sheet = %sheet.name, row = idx, hits, "header row candidate");
                let Some(table) = Table::from_header_row(&sheet.rows, idx) else {
                    continue;
                };
                if table.is_empty() {
                    continue;
                }
                candidates += 1;
                if let Some(found) =
                    try_candidate(self.name(), &sheet.name, idx, table, aliases, acceptance)
                {
                    return Outcome::Found(found);
                }
            }
        }
        Outcome::Exhausted { candidates }
    }
}

/// A named sheet laid out with years across one row and one series per row below it,
/// pivoted into a tidy year-per-row table.
#[derive(Debug, Clone)]
pub struct NumericAxisPivot {
    pub sheet: String,
    pub max_rows: usize,
    pub min_years: usize,
}

impl NumericAxisPivot {
    pub fn new(sheet: impl Into<String>) -> Self {
        Self {
            sheet: sheet.into(),
            max_rows: 30,
            min_years: 5,
        }
    }

    /// Build the tidy table, with the row index of the year axis.
    pub fn pivot(&self, sheet: &Sheet) -> Option<(usize, Table)> {
        let grid = drop_empty_columns(&sheet.rows);

        let (axis_row, axis) = grid
            .iter()
            .take(self.max_rows)
            .enumerate()
            .find_map(|(i, row)| {
                let axis: Vec<(usize, i64)> = row
                    .iter()
                    .enumerate()
                    .filter_map(|(j, cell)| {
                        cell_number(cell)
                            .filter(|v| YEAR_RANGE.contains(v))
                            .map(|v| (j, v as i64))
                    })
                    .collect();
                (axis.len() >= self.min_years).then_some((i, axis))
            })?;
        debug!(sheet = %sheet.name, row = axis_row, years = axis.len(), "found year axis");

        let mut labelled: HashMap<String, Vec<Option<f64>>> = HashMap::new();
        for row in &grid[axis_row + 1..] {
            let label = row.first().map(cell_text).unwrap_or_default();
            let label = label.trim().to_lowercase();
            if label.is_empty() || label == "nan" {
                continue;
            }
            let values = axis
                .iter()
                .map(|&(j, _)| row.get(j).and_then(cell_number))
                .collect();
            labelled.insert(label, values);
        }
        if labelled.is_empty() {
            return None;
        }

        let mut columns: Vec<(String, Vec<Option<f64>>)> = Vec::new();
        for (column, candidates) in PIVOT_ROW_LABELS {
            let values = candidates
                .iter()
                .find_map(|c| labelled.get(&c.trim().to_lowercase()));
            if let Some(values) = values {
                columns.push((column.to_string(), values.clone()));
            }
        }

        let components: Vec<&Vec<Option<f64>>> = NON_HYDRO_COMPONENTS
            .iter()
            .filter_map(|c| columns.iter().find(|(name, _)| name == c).map(|(_, v)| v))
            .collect();
        if components.len() == NON_HYDRO_COMPONENTS.len() {
            let sum = (0..axis.len())
                .map(|i| components.iter().map(|v| v[i]).sum::<Option<f64>>())
                .collect();
            columns.push((NON_HYDRO_RENEWABLES.to_string(), sum));
        }

        let mut headers = vec!["year".to_string()];
        headers.extend(columns.iter().map(|(name, _)| name.clone()));
        let rows = axis
            .iter()
            .enumerate()
            .map(|(i, &(_, year))| {
                let mut row = vec![Data::Float(year as f64)];
                row.extend(
                    columns
                        .iter()
                        .map(|(_, values)| values[i].map_or(Data::Empty, Data::Float)),
                );
                row
            })
            .collect();

        Some((axis_row, Table::new(headers, rows)))
    }
}

fn drop_empty_columns(rows: &[Vec<Data>]) -> Vec<Vec<Data>> {
    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    let keep: Vec<usize> = (0..width)
        .filter(|&c| rows.iter().any(|row| row.get(c).is_some_and(|d| !cell_is_empty(d))))
        .collect();
    rows.iter()
        .map(|row| {
            keep.iter()
                .map(|&c| row.get(c).cloned().unwrap_or(Data::Empty))
                .collect()
        })
        .collect()
}

impl Strategy for NumericAxisPivot {
    fn name(&self) -> &'static str {
        "numeric-axis-pivot"
    }

    fn search(&self, workbook: &Workbook, aliases: &AliasSet, acceptance: Acceptance) -> Outcome {
        let Some(sheet) = workbook.sheet(&self.sheet) else {
            debug!(sheet = %self.sheet, "pivot sheet not present");
            return Outcome::Exhausted { candidates: 0 };
        };
        let Some((axis_row, table)) = self.pivot(sheet) else {
            return Outcome::Exhausted { candidates: 0 };
        };
        match try_candidate(self.name(), &sheet.name, axis_row, table, aliases, acceptance) {
            Some(found) => Outcome::Found(found),
            None => Outcome::Exhausted { candidates: 1 },
        }
    }
}
