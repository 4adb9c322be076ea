use std::sync::Mutex;

use neru_events::NeruError;
use neru_geometry::{Point, Rect};
use neru_grid::subdivide;

/// Repeated `cols x rows` subdivision of a bounds rectangle, one keystroke
/// narrowing it further until it shrinks below a floor or the user commits
/// (§4.6).
pub struct RecursiveGridController {
    cols: usize,
    rows: usize,
    keys: Vec<char>,
    commit_key: char,
    floor: i32,
    bounds: Mutex<Rect>,
}

impl RecursiveGridController {
    pub fn new(
        initial_bounds: Rect,
        cols: usize,
        rows: usize,
        keys: &str,
        commit_key: char,
        floor: i32,
    ) -> Result<Self, NeruError> {
        if cols < 2 || rows < 2 {
            return Err(NeruError::InvalidInput("recursive grid requires cols >= 2 and rows >= 2".into()));
        }
        let keys: Vec<char> = keys.chars().collect();
        if keys.len() != cols * rows {
            tracing::warn!(
                target: "grid.recursive",
                cols,
                rows,
                supplied = keys.len(),
                "recursive-grid keys length does not match cols*rows; excess cells render with empty labels"
            );
        }
        Ok(Self {
            cols,
            rows,
            keys,
            commit_key,
            floor,
            bounds: Mutex::new(initial_bounds),
        })
    }

    pub fn bounds(&self) -> Rect {
        *self.bounds.lock().unwrap()
    }

    /// `(point?, completed)`. Any key outside `keys` and not the commit key
    /// is ignored (still a valid keystroke to accept per §4.6: "still accept
    /// valid keys" for cells present even if some slots render unlabeled).
    pub fn handle_key(&self, c: char) -> (Option<Point>, bool) {
        let upper = c.to_ascii_uppercase();
        if upper == self.commit_key.to_ascii_uppercase() {
            return (Some(self.bounds().center()), true);
        }

        let Some(idx) = self.keys.iter().position(|k| k.to_ascii_uppercase() == upper) else {
            return (None, false);
        };

        let mut bounds = self.bounds.lock().unwrap();
        let subcells = subdivide(*bounds, self.cols, self.rows);
        let Some(next) = subcells.get(idx) else {
            return (None, false);
        };
        *bounds = *next;

        if bounds.width() < self.floor || bounds.height() < self.floor {
            return (Some(bounds.center()), true);
        }
        (None, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_sub_2x2_shapes() {
        let bounds = Rect::from_xywh(0, 0, 100, 100).unwrap();
        assert!(RecursiveGridController::new(bounds, 1, 2, "UI", '\n', 10).is_err());
    }

    #[test]
    fn commit_key_returns_current_bounds_center() {
        let bounds = Rect::from_xywh(0, 0, 100, 100).unwrap();
        let controller = RecursiveGridController::new(bounds, 2, 2, "UIJK", '\n', 10).unwrap();
        let (point, completed) = controller.handle_key('\n');
        assert!(completed);
        assert_eq!(point.unwrap(), bounds.center());
    }

    #[test]
    fn repeated_narrowing_completes_below_the_floor() {
        let bounds = Rect::from_xywh(0, 0, 64, 64).unwrap();
        let controller = RecursiveGridController::new(bounds, 2, 2, "UIJK", '\n', 10).unwrap();
        let (point1, completed1) = controller.handle_key('U');
        assert!(!completed1);
        assert!(point1.is_none());
        assert_eq!(controller.bounds(), Rect::from_xywh(0, 0, 32, 32).unwrap());

        let (_point2, completed2) = controller.handle_key('U');
        assert!(!completed2);
        assert_eq!(controller.bounds(), Rect::from_xywh(0, 0, 16, 16).unwrap());

        let (point3, completed3) = controller.handle_key('U');
        assert!(completed3, "bounds shrink below the floor (10px) and narrowing completes");
        assert!(point3.is_some());
    }

    #[test]
    fn unrecognized_key_is_ignored() {
        let bounds = Rect::from_xywh(0, 0, 100, 100).unwrap();
        let controller = RecursiveGridController::new(bounds, 2, 2, "UIJK", '\n', 10).unwrap();
        let (point, completed) = controller.handle_key('Q');
        assert!(point.is_none());
        assert!(!completed);
        assert_eq!(controller.bounds(), bounds);
    }

    #[test]
    fn mismatched_key_count_still_constructs_with_a_warning() {
        let bounds = Rect::from_xywh(0, 0, 100, 100).unwrap();
        assert!(RecursiveGridController::new(bounds, 2, 2, "UIJ", '\n', 10).is_ok());
    }
}
