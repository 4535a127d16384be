//! In-memory spreadsheet grid and workbook loading.
//!
//! A [`Grid`] uses absolute coordinates: row 0 / column 0 is cell A1 even
//! when the workbook's used range starts further down or right.

use std::borrow::Cow;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader};
use grades_core::error::{GradesError, Result};

// ── Cell / Grid ───────────────────────────────────────────────────────────────

/// One spreadsheet cell value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl Cell {
    /// Textual form used for label matching. Empty cells yield `""`.
    pub fn text(&self) -> Cow<'_, str> {
        match self {
            Cell::Empty => Cow::Borrowed(""),
            Cell::Text(s) => Cow::Borrowed(s.as_str()),
            Cell::Number(n) => Cow::Owned(n.to_string()),
            Cell::Bool(b) => Cow::Owned(b.to_string()),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

static EMPTY: Cell = Cell::Empty;

/// Rectangular view over a worksheet. Short rows read as empty cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grid {
    rows: Vec<Vec<Cell>>,
    width: usize,
}

impl Grid {
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        Self { rows, width }
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns of the widest row.
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY)
    }

    /// Cells of column `col`, top to bottom, one per row.
    pub fn column(&self, col: usize) -> impl Iterator<Item = &Cell> + '_ {
        (0..self.height()).map(move |row| self.cell(row, col))
    }
}

// ── Loading ───────────────────────────────────────────────────────────────────

/// Source of sheet grids for input files.
pub trait SheetLoader {
    /// Load the first worksheet of the file at `path`.
    fn load(&self, path: &Path) -> Result<Grid>;
}

/// [`SheetLoader`] backed by `calamine` (`.xls`, `.xlsx`, `.ods`).
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkbookLoader;

impl SheetLoader for WorkbookLoader {
    fn load(&self, path: &Path) -> Result<Grid> {
        let read_error = |reason: String| GradesError::SpreadsheetRead {
            path: path.to_path_buf(),
            reason,
        };

        let mut workbook = open_workbook_auto(path).map_err(|e| read_error(e.to_string()))?;
        let range = match workbook.worksheet_range_at(0) {
            Some(range) => range.map_err(|e| read_error(e.to_string()))?,
            None => {
                tracing::debug!("{} has no worksheets", path.display());
                return Ok(Grid::default());
            }
        };
        Ok(grid_from_range(&range))
    }
}

/// Convert a calamine range into an A1-anchored grid.
fn grid_from_range(range: &Range<Data>) -> Grid {
    let Some((first_row, first_col)) = range.start() else {
        return Grid::default();
    };
    let (first_row, first_col) = (first_row as usize, first_col as usize);

    let mut rows: Vec<Vec<Cell>> = vec![Vec::new(); first_row];
    for source in range.rows() {
        let mut row = vec![Cell::Empty; first_col];
        row.extend(source.iter().map(cell_from_data));
        rows.push(row);
    }
    Grid::from_rows(rows)
}

fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Bool(*b),
        other => Cell::Text(other.to_string()),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_grid_width_is_widest_row() {
        let grid = Grid::from_rows(vec![
            vec![Cell::from("a")],
            vec![Cell::Empty, Cell::Empty, Cell::from("c")],
        ]);
        assert_eq!(grid.height(), 2);
        assert_eq!(grid.width(), 3);
    }

    #[test]
    fn test_cell_out_of_range_is_empty() {
        let grid = Grid::from_rows(vec![vec![Cell::from("a")]]);
        assert_eq!(grid.cell(0, 5), &Cell::Empty);
        assert_eq!(grid.cell(9, 0), &Cell::Empty);
    }

    #[test]
    fn test_column_yields_one_cell_per_row() {
        let grid = Grid::from_rows(vec![
            vec![Cell::Empty, Cell::from("x")],
            vec![Cell::from("only first")],
            vec![Cell::Empty, Cell::Number(3.0)],
        ]);
        let column: Vec<&Cell> = grid.column(1).collect();
        assert_eq!(
            column,
            vec![&Cell::from("x"), &Cell::Empty, &Cell::Number(3.0)]
        );
    }

    #[test]
    fn test_cell_text() {
        assert_eq!(Cell::Empty.text(), "");
        assert_eq!(Cell::from("Aprovat").text(), "Aprovat");
        assert_eq!(Cell::Number(7.5).text(), "7.5");
        assert_eq!(Cell::Bool(true).text(), "true");
    }

    #[test]
    fn test_grid_from_range_is_anchored_at_a1() {
        let mut range: Range<Data> = Range::new((2, 3), (3, 4));
        range.set_value((2, 3), Data::String("DSP_NOMID1".to_string()));
        range.set_value((3, 4), Data::Float(6.5));

        let grid = grid_from_range(&range);
        assert_eq!(grid.height(), 4);
        assert_eq!(grid.width(), 5);
        assert_eq!(grid.cell(2, 3), &Cell::from("DSP_NOMID1"));
        assert_eq!(grid.cell(3, 4), &Cell::Number(6.5));
        assert_eq!(grid.cell(0, 0), &Cell::Empty);
    }

    #[test]
    fn test_workbook_loader_reports_unreadable_file() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp.path().join("34154_A_1Q1.xls");
        std::fs::write(&path, b"not a workbook").expect("write");

        let err = WorkbookLoader.load(&path).unwrap_err();
        assert!(matches!(err, GradesError::SpreadsheetRead { .. }));
        assert!(err.to_string().contains("34154_A_1Q1.xls"));
    }
}
