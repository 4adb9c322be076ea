use ahash::AHashMap;
use neru_geometry::Rect;

use crate::cell::Cell;

/// A screen partition (§3). Cell count = rows × cols; every pixel in
/// `bounds` lies in exactly one cell. Immutable after construction.
#[derive(Debug, Clone)]
pub struct Grid {
    characters: String,
    row_labels: Option<String>,
    col_labels: Option<String>,
    bounds: Rect,
    cols: usize,
    rows: usize,
    cells: Vec<Cell>,
    index: AHashMap<String, usize>,
}

impl Grid {
    pub(crate) fn new(
        characters: String,
        row_labels: Option<String>,
        col_labels: Option<String>,
        bounds: Rect,
        cols: usize,
        rows: usize,
        cells: Vec<Cell>,
    ) -> Self {
        let index = cells
            .iter()
            .enumerate()
            .map(|(i, c)| (c.coordinate().to_string(), i))
            .collect();
        Self {
            characters,
            row_labels,
            col_labels,
            bounds,
            cols,
            rows,
            cells,
            index,
        }
    }

    pub fn characters(&self) -> &str {
        &self.characters
    }

    pub fn row_labels(&self) -> Option<&str> {
        self.row_labels.as_deref()
    }

    pub fn col_labels(&self) -> Option<&str> {
        self.col_labels.as_deref()
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cell(&self, coordinate: &str) -> Option<&Cell> {
        let upper = coordinate.to_ascii_uppercase();
        self.index.get(&upper).map(|&i| &self.cells[i])
    }

    pub fn label_len(&self) -> usize {
        self.cells.first().map(|c| c.coordinate().len()).unwrap_or(0)
    }

    /// True if `c` (case-insensitive) is drawn from any of the region, column
    /// or row charsets this grid was built with (§4.5: "not in the Grid's
    /// valid-characters set").
    pub fn is_valid_char(&self, c: char) -> bool {
        let upper = c.to_ascii_uppercase();
        self.characters.chars().any(|x| x.to_ascii_uppercase() == upper)
            || self.col_labels.as_deref().unwrap_or_default().chars().any(|x| x.to_ascii_uppercase() == upper)
            || self.row_labels.as_deref().unwrap_or_default().chars().any(|x| x.to_ascii_uppercase() == upper)
    }
}
