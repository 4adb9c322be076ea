//! Subgrid / recursive-grid breakpoint computation (§4.5, §4.6).
//!
//! Shared by the grid manager's 3×3 subgrid and the recursive-grid
//! controller's repeated `cols × rows` subdivision — both need "split this
//! rect into an N×M grid with exact outer edges, rounded interior
//! breakpoints".

use neru_geometry::{Point, Rect};

fn breakpoints(start: i32, end: i32, n: usize) -> Vec<i32> {
    let mut out = Vec::with_capacity(n + 1);
    for i in 0..=n {
        let value = if i == 0 {
            start
        } else if i == n {
            end
        } else {
            let frac = i as f64 * (end - start) as f64 / n as f64;
            (start as f64 + frac).round() as i32
        };
        out.push(value);
    }
    out
}

/// Split `bounds` into `cols × rows` subcells in row-major order (index `i`
/// maps to `row = i / cols`, `col = i % cols`, per §4.5).
pub fn subdivide(bounds: Rect, cols: usize, rows: usize) -> Vec<Rect> {
    let x_breaks = breakpoints(bounds.min.x, bounds.max.x, cols);
    let y_breaks = breakpoints(bounds.min.y, bounds.max.y, rows);

    let mut out = Vec::with_capacity(cols * rows);
    for r in 0..rows {
        for c in 0..cols {
            let rect = Rect::new(
                Point::new(x_breaks[c], y_breaks[r]),
                Point::new(x_breaks[c + 1], y_breaks[r + 1]),
            );
            match rect {
                Ok(r) => out.push(r),
                Err(_) => {
                    // A breakpoint collision (degenerate subcell) can only happen when
                    // `bounds` is smaller than `cols`/`rows` pixels; clamp to a 1px cell
                    // rather than panic so callers never lose a subcell slot.
                    let x0 = x_breaks[c];
                    let y0 = y_breaks[r];
                    out.push(Rect::from_xywh(x0, y0, 1, 1).expect("1x1 rect is always valid"));
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use neru_geometry::tiles_exactly;

    #[test]
    fn subgrid_center_scenario() {
        let bounds = Rect::from_xywh(100, 100, 30, 30).unwrap();
        let subcells = subdivide(bounds, 3, 3);
        let index = 4usize; // key "5" in subKeys "123456789"
        let cell = subcells[index];
        assert_eq!(cell.center(), Point::new(115, 115));
    }

    #[test]
    fn subdivide_tiles_bounds_exactly() {
        let bounds = Rect::from_xywh(0, 0, 301, 199).unwrap();
        let subcells = subdivide(bounds, 3, 3);
        assert!(tiles_exactly(bounds, &subcells));
    }

    #[test]
    fn outer_edges_are_exact_not_rounded() {
        let bounds = Rect::from_xywh(10, 20, 100, 70).unwrap();
        let subcells = subdivide(bounds, 3, 3);
        assert_eq!(subcells[0].min.x, 10);
        assert_eq!(subcells[0].min.y, 20);
        assert_eq!(subcells[8].max.x, 110);
        assert_eq!(subcells[8].max.y, 90);
    }
}
