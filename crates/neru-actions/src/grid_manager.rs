use std::sync::{Arc, Mutex};

use neru_events::{KeyToken, NeruError};
use neru_geometry::Point;
use neru_grid::{subdivide, Cell, Grid};

const DEFAULT_SUB_DIM: usize = 3;
const DEFAULT_SUB_KEYS: &str = "123456789";

struct Inner {
    current_input: String,
    main_grid_input: String,
    in_subgrid: bool,
    selected_cell: Option<Cell>,
}

/// Two-level coordinate entry over a `Grid` plus a fixed `sub_rows x
/// sub_cols` subgrid inside the selected `Cell` (§4.5).
pub struct GridManager {
    grid: Arc<Grid>,
    sub_cols: usize,
    sub_rows: usize,
    sub_keys: Vec<char>,
    inner: Mutex<Inner>,
    on_show_subgrid: Option<Arc<dyn Fn(&Cell) + Send + Sync>>,
}

impl GridManager {
    pub fn new(grid: Arc<Grid>, on_show_subgrid: Option<Arc<dyn Fn(&Cell) + Send + Sync>>) -> Self {
        Self::with_subgrid(grid, DEFAULT_SUB_DIM, DEFAULT_SUB_DIM, DEFAULT_SUB_KEYS, on_show_subgrid)
    }

    pub fn with_subgrid(
        grid: Arc<Grid>,
        sub_cols: usize,
        sub_rows: usize,
        sub_keys: &str,
        on_show_subgrid: Option<Arc<dyn Fn(&Cell) + Send + Sync>>,
    ) -> Self {
        Self {
            grid,
            sub_cols,
            sub_rows,
            sub_keys: sub_keys.chars().collect(),
            inner: Mutex::new(Inner {
                current_input: String::new(),
                main_grid_input: String::new(),
                in_subgrid: false,
                selected_cell: None,
            }),
            on_show_subgrid,
        }
    }

    pub fn reset(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.current_input.clear();
        inner.main_grid_input.clear();
        inner.in_subgrid = false;
        inner.selected_cell = None;
    }

    /// `(point?, completed)` per §4.5's input contract.
    pub fn handle_key(&self, token: &KeyToken) -> Result<(Option<Point>, bool), NeruError> {
        if token.is_grid_reset() {
            self.reset();
            return Ok((None, false));
        }

        let mut inner = self.inner.lock().unwrap();

        if token.is_backspace_synonym() {
            if !inner.current_input.is_empty() {
                inner.current_input.pop();
                return Ok((None, false));
            }
            if inner.in_subgrid {
                inner.in_subgrid = false;
                let mut restored = inner.main_grid_input.clone();
                restored.pop();
                inner.current_input = restored;
                inner.main_grid_input.clear();
                inner.selected_cell = None;
                return Ok((None, false));
            }
            return Ok((None, false));
        }

        let Some(c) = token.as_plain_char() else {
            return Ok((None, false));
        };

        if inner.in_subgrid {
            let upper = c.to_ascii_uppercase();
            let Some(idx) = self.sub_keys.iter().position(|k| k.to_ascii_uppercase() == upper) else {
                return Ok((None, false));
            };
            let bounds = inner
                .selected_cell
                .as_ref()
                .expect("selected_cell set whenever in_subgrid is true")
                .bounds();
            let subcells = subdivide(bounds, self.sub_cols, self.sub_rows);
            let Some(rect) = subcells.get(idx) else {
                return Ok((None, false));
            };
            let point = rect.center();
            drop(inner);
            self.reset();
            return Ok((Some(point), true));
        }

        if !self.grid.is_valid_char(c) {
            return Ok((None, false));
        }

        inner.current_input.push(c.to_ascii_uppercase());
        if inner.current_input.len() == self.grid.label_len() {
            let coordinate = inner.current_input.clone();
            match self.grid.cell(&coordinate).cloned() {
                Some(cell) => {
                    inner.in_subgrid = true;
                    inner.main_grid_input = coordinate;
                    inner.current_input.clear();
                    inner.selected_cell = Some(cell.clone());
                    if let Some(callback) = &self.on_show_subgrid {
                        callback(&cell);
                    }
                }
                None => {
                    inner.current_input.clear();
                }
            }
        }

        Ok((None, false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use neru_geometry::Rect;
    use neru_grid::GridBuilder;

    fn grid() -> Arc<Grid> {
        Arc::new(GridBuilder::build("ABC", None, None, Rect::from_xywh(0, 0, 300, 300).unwrap()).unwrap())
    }

    #[test]
    fn typing_a_full_coordinate_enters_subgrid() {
        let g = grid();
        let label = g.cells()[0].coordinate().to_string();
        let manager = GridManager::new(Arc::clone(&g), None);
        let mut result = (None, false);
        for c in label.chars() {
            result = manager.handle_key(&KeyToken::Char(c)).unwrap();
        }
        assert_eq!(result, (None, false));

        let point = manager.handle_key(&KeyToken::Char('5')).unwrap();
        assert!(point.1);
        assert_eq!(point.0.unwrap(), g.cells()[0].center());
    }

    #[test]
    fn unknown_coordinate_resets_current_input() {
        let g = grid();
        let manager = GridManager::new(g, None);
        manager.handle_key(&KeyToken::Char('Z')).unwrap();
        manager.handle_key(&KeyToken::Char('Z')).unwrap();
        // Neither char is a valid grid character, so input stays empty and no cell is entered.
        let result = manager.handle_key(&KeyToken::Named(neru_events::NamedKey::Backspace)).unwrap();
        assert_eq!(result, (None, false));
    }

    #[test]
    fn reset_key_clears_state_and_is_idempotent() {
        let g = grid();
        let label = g.cells()[0].coordinate().to_string();
        let manager = GridManager::new(g, None);
        manager.handle_key(&KeyToken::Char(label.chars().next().unwrap())).unwrap();
        manager.handle_key(&KeyToken::Char('<')).unwrap();
        manager.handle_key(&KeyToken::Char('<')).unwrap();
        assert_eq!(manager.inner.lock().unwrap().current_input, "");
    }

    #[test]
    fn backspace_out_of_subgrid_restores_truncated_input() {
        let g = grid();
        let label = g.cells()[0].coordinate().to_string();
        let manager = GridManager::new(Arc::clone(&g), None);
        for c in label.chars() {
            manager.handle_key(&KeyToken::Char(c)).unwrap();
        }
        assert!(manager.inner.lock().unwrap().in_subgrid);

        manager.handle_key(&KeyToken::Named(neru_events::NamedKey::Backspace)).unwrap();
        let inner = manager.inner.lock().unwrap();
        assert!(!inner.in_subgrid);
        assert_eq!(inner.current_input, &label[..label.len() - 1]);
    }
}
