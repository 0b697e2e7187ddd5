use std::fmt;
use tracing::{debug, info, instrument, warn};

pub mod aliases;
pub mod normalize;
pub mod resolve;
pub mod strategy;
pub mod table;
pub mod workbook;

pub use aliases::{AliasSet, CAPACITY_SERIES, GENERATION_SERIES};
pub use resolve::{find_year_column, resolve_columns, Acceptance, Column, ResolvedMapping};
pub use strategy::{HeaderScan, HeaderlessScan, NumericAxisPivot, Outcome, Strategy};
pub use table::Table;
pub use workbook::{Sheet, Workbook, WorkbookError};

/// Name of the sheet the generation workbook lays out year-across.
pub const GENERATION_SHEET: &str = "Generation";

/// Substrings that mark a header cell in [`keyword_header_row`].
const HEADER_KEYWORDS: [&str; 7] = [
    "year",
    "coal",
    "natural gas",
    "nuclear",
    "hydro",
    "non-hydro renewables",
    "petroleum",
];

/// First of the leading `limit` raw rows with a cell containing "year" and at least three
/// cells containing a known series name. Loose substring matching, for diagnostics only.
pub fn keyword_header_row(sheet: &Sheet, limit: usize) -> Option<usize> {
    sheet.rows.iter().take(limit).position(|row| {
        let cells: Vec<String> = row
            .iter()
            .filter(|c| !table::cell_is_empty(c))
            .map(|c| table::cell_text(c).trim().to_lowercase())
            .collect();
        let hits = cells
            .iter()
            .filter(|c| HEADER_KEYWORDS.iter().any(|k| c.contains(k)))
            .count();
        cells.iter().any(|c| c.contains("year")) && hits >= 3
    })
}

/// A table found in a workbook, with its columns resolved.
#[derive(Debug, Clone)]
pub struct Located {
    pub strategy: &'static str,
    pub sheet: String,
    /// Zero-based sheet row of the header (or of the year axis, for the pivot), blank rows
    /// included.
    pub header_row: usize,
    pub table: Table,
    pub mapping: ResolvedMapping,
}

/// One strategy that ran without producing an acceptable table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    pub strategy: &'static str,
    pub candidates: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocateError {
    pub attempts: Vec<Attempt>,
}

impl fmt::Display for LocateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("no table with a year column and enough known series")?;
        if self.attempts.is_empty() {
            return f.write_str(" (no strategies configured)");
        }
        f.write_str(" (tried ")?;
        for (i, a) in self.attempts.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {} candidates", a.strategy, a.candidates)?;
        }
        f.write_str(")")
    }
}

impl std::error::Error for LocateError {}

/// An ordered chain of strategies, tried until one yields an acceptable table.
pub struct Locator {
    aliases: AliasSet,
    acceptance: Acceptance,
    strategies: Vec<Box<dyn Strategy>>,
}

impl Locator {
    pub fn new(aliases: AliasSet, acceptance: Acceptance) -> Self {
        Self {
            aliases,
            acceptance,
            strategies: Vec::new(),
        }
    }

    pub fn with(mut self, strategy: impl Strategy + 'static) -> Self {
        self.strategies.push(Box::new(strategy));
        self
    }

    /// Figure 6: header scan, headerless scan, then the `Generation` pivot.
    pub fn generation() -> Self {
        Self::new(GENERATION_SERIES, Acceptance::TIMESERIES)
            .with(HeaderScan::default())
            .with(HeaderlessScan::default())
            .with(NumericAxisPivot::new(GENERATION_SHEET))
    }

    /// Figure 7: header scan, then headerless scan.
    pub fn capacity() -> Self {
        Self::new(CAPACITY_SERIES, Acceptance::SNAPSHOT)
            .with(HeaderScan::default())
            .with(HeaderlessScan::default())
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    #[instrument(level = "info", skip_all, fields(sheets = workbook.sheets.len()))]
    pub fn locate(&self, workbook: &Workbook) -> Result<Located, LocateError> {
        let mut attempts = Vec::with_capacity(self.strategies.len());
        for strategy in &self.strategies {
            match strategy.search(workbook, &self.aliases, self.acceptance) {
                Outcome::Found(located) => {
                    info!(
                        strategy = located.strategy,
                        sheet = %located.sheet,
                        header_row = located.header_row,
                        series = located.mapping.series_count(),
                        "located table"
                    );
                    return Ok(located);
                }
                Outcome::Exhausted { candidates } => {
                    debug!(strategy = strategy.name(), candidates, "strategy exhausted");
                    attempts.push(Attempt {
                        strategy: strategy.name(),
                        candidates,
                    });
                }
            }
        }
        let err = LocateError { attempts };
        warn!(%err, "locator gave up");
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::Data;

    #[test]
    fn chains_are_ordered() {
        assert_eq!(
            Locator::generation().strategy_names(),
            vec!["header-scan", "headerless-scan", "numeric-axis-pivot"]
        );
        assert_eq!(
            Locator::capacity().strategy_names(),
            vec!["header-scan", "headerless-scan"]
        );
    }

    #[test]
    fn failure_lists_every_attempt() {
        let wb = Workbook::from_sheets(vec![Sheet::new(
            "Notes",
            vec![vec![Data::String("nothing here".into())]],
        )]);

        let err = Locator::generation().locate(&wb).unwrap_err();

        let names: Vec<_> = err.attempts.iter().map(|a| a.strategy).collect();
        assert_eq!(names, vec!["header-scan", "headerless-scan", "numeric-axis-pivot"]);
        assert!(err.to_string().contains("numeric-axis-pivot: 0 candidates"));
    }

    #[test]
    fn capacity_accepts_a_yearless_snapshot() {
        let s = |v: &str| Data::String(v.into());
        let wb = Workbook::from_sheets(vec![Sheet::new(
            "Capacity",
            vec![
                vec![s("Source"), s("Coal"), s("Gas"), s("Hydro"), s("Wind"), s("Solar")],
                vec![
                    s("GW"),
                    Data::Float(1190.0),
                    Data::Float(140.0),
                    Data::Float(420.0),
                    Data::Float(520.0),
                    Data::Float(880.0),
                ],
            ],
        )]);

        let located = Locator::capacity().locate(&wb).unwrap();
        assert!(located.mapping.year.is_none());
        assert_eq!(located.mapping.series_count(), 5);

        // the same table lacks a year for the timeseries chain
        assert!(Locator::generation().locate(&wb).is_err());
    }

    #[test]
    fn keyword_row_needs_year_and_three_names() {
        let s = |v: &str| Data::String(v.into());
        let sheet = Sheet::new(
            "Generation",
            vec![
                vec![s("Coal"), s("Nuclear"), s("Hydro")],
                vec![s("Year"), s("Coal")],
                vec![],
                vec![s("Calendar year"), s("Coal-fired"), s("Hydropower"), s("Solar")],
            ],
        );

        assert_eq!(keyword_header_row(&sheet, 50), Some(3));
        assert_eq!(keyword_header_row(&sheet, 3), None);
    }

    #[test]
    fn empty_chain_fails_cleanly() {
        let err = Locator::new(GENERATION_SERIES, Acceptance::TIMESERIES)
            .locate(&Workbook::default())
            .unwrap_err();
        assert!(err.attempts.is_empty());
        assert!(err.to_string().contains("no strategies"));
    }
}
