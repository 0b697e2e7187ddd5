use calamine::Data;

/// Text of a cell as a header would read it. Whole floats lose their `.0`.
pub fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        other => other.to_string(),
    }
}

/// Numeric value of a cell; text is parsed after trimming.
pub fn cell_number(cell: &Data) -> Option<f64> {
    match cell {
        Data::Float(f) if f.is_finite() => Some(*f),
        Data::Int(i) => Some(*i as f64),
        Data::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

pub fn cell_is_empty(cell: &Data) -> bool {
    match cell {
        Data::Empty => true,
        Data::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

pub fn row_is_empty(row: &[Data]) -> bool {
    row.iter().all(cell_is_empty)
}

/// A rectangular table: one header per column, every row padded to the header width.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Data>>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Data>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, Data::Empty);
                row
            })
            .collect();
        Self { headers, rows }
    }

    /// Use `grid[header_idx]` as headers and everything below it as data, then drop
    /// empty columns and rows. `None` when the header row does not exist.
    pub fn from_header_row(grid: &[Vec<Data>], header_idx: usize) -> Option<Self> {
        let header_row = grid.get(header_idx)?;
        let width = grid.iter().map(Vec::len).max().unwrap_or(0);
        let mut headers: Vec<String> = header_row.iter().map(cell_text).collect();
        headers.resize(width, String::new());
        let rows = grid[header_idx + 1..].to_vec();
        Some(Self::new(headers, rows).compact())
    }

    /// Drop columns whose data cells are all empty (the header does not count), then rows
    /// that are entirely empty.
    pub fn compact(self) -> Self {
        let keep: Vec<usize> = (0..self.width())
            .filter(|&c| self.rows.iter().any(|row| !cell_is_empty(&row[c])))
            .collect();

        let headers = keep.iter().map(|&c| self.headers[c].clone()).collect();
        let rows = self
            .rows
            .into_iter()
            .map(|row| keep.iter().map(|&c| row[c].clone()).collect::<Vec<_>>())
            .filter(|row| !row_is_empty(row))
            .collect();
        Self { headers, rows }
    }

    pub fn width(&self) -> usize {
        self.headers.len()
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    pub fn column(&self, idx: usize) -> impl Iterator<Item = &Data> + '_ {
        self.rows.iter().map(move |row| &row[idx])
    }

    pub fn column_index(&self, header: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == header)
    }
}
