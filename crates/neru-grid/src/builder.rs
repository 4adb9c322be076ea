//! Adaptive grid partitioning (§4.4): cell-size selection, region-keyed
//! multi-level labeling, and exact remainder distribution.

use neru_events::NeruError;
use neru_geometry::{Point, Rect};

use crate::cell::Cell;
use crate::grid::Grid;

/// Scoring normalizer for the cell-size candidate search (§4.4's `maxCells`
/// term biases candidates toward higher cell counts at a fixed weight of
/// 0.1); not itself a spec-mandated constant, chosen to keep the bias small
/// relative to the aspect-ratio term.
const SCORE_MAX_CELLS: f64 = 2500.0;

fn size_bounds(width: i32, height: i32) -> (i32, i32) {
    let area_mpx = (width as f64 * height as f64) / 1_000_000.0;
    let (mut min_cell, mut max_cell) = if area_mpx < 1.5 {
        (30, 60)
    } else if area_mpx < 2.5 {
        (30, 80)
    } else if area_mpx < 4.0 {
        (40, 100)
    } else {
        (50, 120)
    };
    let aspect = width as f64 / height as f64;
    if !(0.4..=2.5).contains(&aspect) {
        max_cell = ((max_cell as f64) * 1.2).round() as i32;
    }
    min_cell = min_cell.min(max_cell);
    (min_cell, max_cell)
}

fn candidates_for(dimension: i32, min_cell: i32, max_cell: i32) -> Vec<i32> {
    let lo = ((dimension / max_cell) - 1).max(1);
    let hi = (dimension / min_cell) + 1;
    (lo..=hi.max(lo))
        .filter(|&n| {
            let cell = dimension as f64 / n as f64;
            cell >= min_cell as f64 - 0.5 && cell <= max_cell as f64 + 0.5
        })
        .collect()
}

fn simple_best_fit(width: i32, height: i32, min_cell: i32, max_cell: i32) -> (i32, i32) {
    let target = ((min_cell + max_cell) / 2).max(1);
    let cols = (width / target).max(2);
    let rows = (height / target).max(2);
    (cols, rows)
}

/// Pick `(cols, rows)` minimizing `|cellW/cellH - 1| + (maxCells - cols*rows)/maxCells * 0.1`.
fn choose_grid_shape(width: i32, height: i32) -> (i32, i32) {
    let (min_cell, max_cell) = size_bounds(width, height);
    let col_candidates = candidates_for(width, min_cell, max_cell);
    let row_candidates = candidates_for(height, min_cell, max_cell);

    let mut best: Option<((i32, i32), f64)> = None;
    for &cols in &col_candidates {
        for &rows in &row_candidates {
            if cols < 2 || rows < 2 {
                continue;
            }
            let cell_w = width as f64 / cols as f64;
            let cell_h = height as f64 / rows as f64;
            let aspect_penalty = (cell_w / cell_h - 1.0).abs();
            let fill_penalty = (SCORE_MAX_CELLS - (cols * rows) as f64) / SCORE_MAX_CELLS * 0.1;
            let score = aspect_penalty + fill_penalty;
            match &best {
                Some((_, best_score)) if *best_score <= score => {}
                _ => best = Some(((cols, rows), score)),
            }
        }
    }

    match best {
        Some(((cols, rows), _)) => (cols, rows),
        None => {
            let (cols, rows) = simple_best_fit(width, height, min_cell, max_cell);
            (cols.max(2), rows.max(2))
        }
    }
}

fn nth_char(chars: &[char], mut index: usize, digits: usize) -> String {
    let base = chars.len();
    let mut out = vec!['A'; digits];
    for slot in (0..digits).rev() {
        out[slot] = chars[index % base];
        index /= base;
    }
    out.into_iter().collect()
}

/// `(label_len, region_digits)` candidates in ascending order of address
/// space. `region_digits` is how many characters of `region_chars` are used
/// to encode `region_idx`; the remaining `label_len - region_digits`
/// characters are the local column (and row, once `label_len >= 3`).
const LABEL_PLANS: [(usize, usize); 3] = [(2, 1), (3, 1), (4, 2)];

/// For a candidate `(label_len, region_digits)`, the number of distinct
/// region bands this grid actually needs once cells are grouped into
/// `block_cols x block_rows` blocks (§4.4's region/col/row scheme). Returns
/// `None` if `region_base` can't address that many regions with
/// `region_digits` characters — the caller must either escalate to a wider
/// label or shrink the grid.
fn region_plan(cols: i32, rows: i32, label_len: usize, region_digits: usize, region_base: usize, block_cols: usize, row_chars_len: usize) -> Option<(usize, usize)> {
    let block_rows = if label_len >= 3 { row_chars_len } else { 1 };
    let region_cols = (cols as usize).div_ceil(block_cols).max(1);
    let region_rows = (rows as usize).div_ceil(block_rows).max(1);
    let capacity = region_base.pow(region_digits as u32);
    if region_cols * region_rows <= capacity {
        Some((region_cols, region_rows))
    } else {
        None
    }
}

struct Axis {
    breaks: Vec<i32>,
}

impl Axis {
    fn distribute(total: i32, parts: usize, start: i32) -> Self {
        let parts_i = parts as i32;
        let base = total / parts_i;
        let remainder = total % parts_i;
        let mut breaks = Vec::with_capacity(parts + 1);
        breaks.push(start);
        let mut cursor = start;
        for i in 0..parts {
            let extra = if (i as i32) < remainder { 1 } else { 0 };
            cursor += base + extra;
            breaks.push(cursor);
        }
        Self { breaks }
    }

    fn span(&self, i: usize) -> (i32, i32) {
        (self.breaks[i], self.breaks[i + 1])
    }
}

/// Builds a `Grid` partitioning `bounds` into `cols × rows` cells labeled
/// with 2–4 uppercase characters (§4.4).
pub struct GridBuilder;

impl GridBuilder {
    pub fn build(
        characters: &str,
        row_labels: Option<&str>,
        col_labels: Option<&str>,
        bounds: Rect,
    ) -> Result<Grid, NeruError> {
        let region_chars: Vec<char> = characters.chars().map(|c| c.to_ascii_uppercase()).collect();
        if region_chars.len() < 2 {
            return Err(NeruError::InvalidInput(
                "grid character set must have at least 2 characters".into(),
            ));
        }
        let col_chars: Vec<char> = col_labels
            .unwrap_or(characters)
            .chars()
            .map(|c| c.to_ascii_uppercase())
            .collect();
        let row_chars: Vec<char> = row_labels
            .unwrap_or(characters)
            .chars()
            .map(|c| c.to_ascii_uppercase())
            .collect();

        let width = bounds.width();
        let height = bounds.height();
        let (mut cols, mut rows) = choose_grid_shape(width, height);

        let block_cols = col_chars.len();

        // Find the narrowest label that can address every region band this
        // grid's (cols, rows) actually split into; shrink the grid and retry
        // if even a 4-character label can't (region count, not raw cell
        // count, is what the label has to cover — see `region_plan`).
        let (label_len, region_cols) = loop {
            let mut found = None;
            for &(label_len, region_digits) in &LABEL_PLANS {
                if let Some((region_cols, _region_rows)) =
                    region_plan(cols, rows, label_len, region_digits, region_chars.len(), block_cols, row_chars.len())
                {
                    found = Some((label_len, region_cols));
                    break;
                }
            }
            if let Some(plan) = found {
                break plan;
            }
            let new_cols = ((cols as f64 * 0.9).floor() as i32).max(2);
            let new_rows = ((rows as f64 * 0.9).floor() as i32).max(2);
            tracing::warn!(
                target: "grid.build",
                cols, rows, new_cols, new_rows,
                "shrinking grid: region count exceeds every label plan's address space"
            );
            if new_cols == cols && new_rows == rows {
                // cols == rows == 2 is always representable (region count <= 4
                // fits even the narrowest plan), so this is unreachable.
                break (4, cols.div_ceil(block_cols as i32).max(1) as usize);
            }
            cols = new_cols;
            rows = new_rows;
        };

        let block_rows = if label_len >= 3 { row_chars.len() } else { 1 };
        let total_cells = (cols * rows) as usize;

        let x_axis = Axis::distribute(width, cols as usize, bounds.min.x);
        let y_axis = Axis::distribute(height, rows as usize, bounds.min.y);

        let mut cells = Vec::with_capacity(total_cells);
        for ri in 0..rows as usize {
            for ci in 0..cols as usize {
                let (x0, x1) = x_axis.span(ci);
                let (y0, y1) = y_axis.span(ri);
                let cell_bounds = Rect::new(Point::new(x0, y0), Point::new(x1, y1))
                    .map_err(|e| NeruError::InvalidInput(e.to_string()))?;

                let local_col = ci % block_cols;
                let local_row = ri % block_rows;
                let region_col_idx = ci / block_cols;
                let region_row_idx = ri / block_rows;
                let region_idx = region_row_idx * region_cols + region_col_idx;

                let coordinate = match label_len {
                    2 => format!(
                        "{}{}",
                        nth_char(&region_chars, region_idx, 1),
                        col_chars[local_col]
                    ),
                    3 => format!(
                        "{}{}{}",
                        nth_char(&region_chars, region_idx, 1),
                        col_chars[local_col],
                        row_chars[local_row]
                    ),
                    _ => format!(
                        "{}{}{}",
                        nth_char(&region_chars, region_idx, 2),
                        col_chars[local_col],
                        row_chars[local_row]
                    ),
                };
                cells.push(Cell::new(coordinate, cell_bounds));
            }
        }

        debug_assert_eq!(cells.last().unwrap().bounds().max.x, bounds.max.x);
        debug_assert_eq!(cells.last().unwrap().bounds().max.y, bounds.max.y);

        tracing::debug!(
            target: "grid.build",
            cols, rows, label_len,
            "built grid"
        );

        Ok(Grid::new(
            characters.to_string(),
            row_labels.map(str::to_string),
            col_labels.map(str::to_string),
            bounds,
            cols as usize,
            rows as usize,
            cells,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use neru_geometry::tiles_exactly;
    use pretty_assertions::assert_eq;

    #[test]
    fn grid_tiling_exactness_scenario() {
        let bounds = Rect::from_xywh(0, 0, 300, 301).unwrap();
        let grid = GridBuilder::build("ABC", None, None, bounds).unwrap();
        let rects: Vec<Rect> = grid.cells().iter().map(Cell::bounds).collect();
        assert!(tiles_exactly(bounds, &rects));
        let last_col = grid.cells().iter().map(|c| c.bounds().max.x).max().unwrap();
        let last_row = grid.cells().iter().map(|c| c.bounds().max.y).max().unwrap();
        assert_eq!(last_col, 300);
        assert_eq!(last_row, 301);
    }

    #[test]
    fn every_coordinate_is_unique() {
        let bounds = Rect::from_xywh(0, 0, 1920, 1080).unwrap();
        let grid = GridBuilder::build("ABCDEFGH", None, None, bounds).unwrap();
        let mut coords: Vec<&str> = grid.cells().iter().map(Cell::coordinate).collect();
        let before = coords.len();
        coords.sort_unstable();
        coords.dedup();
        assert_eq!(coords.len(), before);
    }

    #[test]
    fn every_coordinate_is_unique_at_default_charset_and_full_hd() {
        let bounds = Rect::from_xywh(0, 0, 1920, 1080).unwrap();
        let grid = GridBuilder::build("ASDFJKL", None, None, bounds).unwrap();
        let mut coords: Vec<&str> = grid.cells().iter().map(Cell::coordinate).collect();
        let before = coords.len();
        coords.sort_unstable();
        coords.dedup();
        assert_eq!(coords.len(), before);
    }

    #[test]
    fn enforces_minimum_two_cols_and_rows() {
        let bounds = Rect::from_xywh(0, 0, 1920, 1080).unwrap();
        let grid = GridBuilder::build("ABCDEFGH", None, None, bounds).unwrap();
        assert!(grid.cols() >= 2);
        assert!(grid.rows() >= 2);
    }

    #[test]
    fn rejects_single_character_alphabet() {
        let bounds = Rect::from_xywh(0, 0, 300, 301).unwrap();
        assert!(GridBuilder::build("A", None, None, bounds).is_err());
    }

    proptest::proptest! {
        #![proptest_config(proptest::prelude::ProptestConfig::with_cases(32))]
        #[test]
        fn arbitrary_bounds_tile_exactly(w in 300i32..1200, h in 300i32..900) {
            let bounds = Rect::from_xywh(0, 0, w, h).unwrap();
            let grid = GridBuilder::build("ABCD", None, None, bounds).unwrap();
            let rects: Vec<Rect> = grid.cells().iter().map(Cell::bounds).collect();
            proptest::prop_assert!(tiles_exactly(bounds, &rects));
        }
    }
}
