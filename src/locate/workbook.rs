use calamine::{open_workbook_auto, Data, Range, Reader};
use std::{
    fmt,
    path::{Path, PathBuf},
};
use tracing::{debug, instrument};

/// One worksheet as an absolute grid: `rows[0][0]` is cell A1.
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Vec<Data>>,
}

impl Sheet {
    pub fn new(name: impl Into<String>, rows: Vec<Vec<Data>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    /// Re-anchor a calamine used range at A1 so row and column indices match the sheet.
    pub fn from_range(name: impl Into<String>, range: &Range<Data>) -> Self {
        if range.is_empty() {
            return Self::new(name, Vec::new());
        }
        let (row0, col0) = range.start().unwrap_or((0, 0));
        let width = col0 as usize + range.width();

        let mut rows = vec![vec![Data::Empty; width]; row0 as usize];
        for cells in range.rows() {
            let mut row = vec![Data::Empty; col0 as usize];
            row.extend(cells.iter().cloned());
            rows.push(row);
        }
        Self::new(name, rows)
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }
}

#[derive(Debug)]
pub enum WorkbookError {
    Open {
        path: PathBuf,
        source: calamine::Error,
    },
    Sheet {
        name: String,
        source: calamine::Error,
    },
}

impl fmt::Display for WorkbookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open { path, source } => {
                write!(f, "failed to open workbook {}: {source}", path.display())
            }
            Self::Sheet { name, source } => write!(f, "failed to read sheet {name:?}: {source}"),
        }
    }
}

impl std::error::Error for WorkbookError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Open { source, .. } | Self::Sheet { source, .. } => Some(source),
        }
    }
}

/// Every sheet of a spreadsheet, in workbook order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn from_sheets(sheets: Vec<Sheet>) -> Self {
        Self { sheets }
    }

    #[instrument(level = "debug", skip(path), fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self, WorkbookError> {
        let path = path.as_ref();
        let mut wb = open_workbook_auto(path).map_err(|source| WorkbookError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let mut sheets = Vec::new();
        for name in wb.sheet_names() {
            let range = wb
                .worksheet_range(&name)
                .map_err(|source| WorkbookError::Sheet {
                    name: name.clone(),
                    source,
                })?;
            let sheet = Sheet::from_range(name, &range);
            debug!(
                sheet = %sheet.name,
                rows = sheet.height(),
                cols = sheet.width(),
                "loaded sheet"
            );
            sheets.push(sheet);
        }
        Ok(Self { sheets })
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }
}
