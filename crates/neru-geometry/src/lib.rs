//! Screen-pixel geometry primitives shared by the label, grid, and render layers.
//!
//! Kept deliberately small and dependency-free: every other crate in the
//! workspace takes `neru-geometry` as its first path dependency, so pulling
//! in anything heavier here would ripple through the whole build graph.

use std::fmt;

/// A point in screen-pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// An axis-aligned, half-open rectangle `[min, max)` in screen-pixel space.
///
/// Half-open bounds make exact tiling checks (§8: "cells tile bounds exactly")
/// simple: two rectangles that share an edge never report as overlapping, and
/// summing cell areas equals the parent area iff the tiling has no gaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rect {
    pub min: Point,
    pub max: Point,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RectError {
    #[error("rect must be non-empty: min={min}, max={max}")]
    Empty { min: Point, max: Point },
}

impl Rect {
    /// Construct a rect, rejecting non-positive width/height (§3: "bounds are non-empty").
    pub fn new(min: Point, max: Point) -> Result<Self, RectError> {
        if max.x <= min.x || max.y <= min.y {
            return Err(RectError::Empty { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn from_xywh(x: i32, y: i32, w: i32, h: i32) -> Result<Self, RectError> {
        Self::new(Point::new(x, y), Point::new(x + w, y + h))
    }

    pub fn width(&self) -> i32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> i32 {
        self.max.y - self.min.y
    }

    pub fn area(&self) -> i64 {
        i64::from(self.width()) * i64::from(self.height())
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.min.x + self.width() / 2,
            self.min.y + self.height() / 2,
        )
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min.x && p.x < self.max.x && p.y >= self.min.y && p.y < self.max.y
    }

    /// True if `self` and `other` share interior area (touching edges do not count).
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }

    /// Smallest rect covering both inputs.
    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            min: Point::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Point::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }

    pub const fn aspect_ratio(&self) -> f64 {
        self.width() as f64 / self.height() as f64
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}) x [{}, {})",
            self.min.x, self.max.x, self.min.y, self.max.y
        )
    }
}

/// Verify a set of rects exactly tiles `bounds`: every pair of interiors is
/// disjoint, every rect lies within bounds, and the union of areas equals
/// the bounds area (no gaps). Used by grid-builder tests (§8 scenario 3).
pub fn tiles_exactly(bounds: Rect, rects: &[Rect]) -> bool {
    let total_area: i64 = rects.iter().map(Rect::area).sum();
    if total_area != bounds.area() {
        return false;
    }
    for r in rects {
        if r.min.x < bounds.min.x || r.min.y < bounds.min.y || r.max.x > bounds.max.x || r.max.y > bounds.max.y {
            return false;
        }
    }
    for i in 0..rects.len() {
        for j in (i + 1)..rects.len() {
            if rects[i].overlaps(&rects[j]) {
                return false;
            }
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_rect() {
        assert!(Rect::new(Point::new(0, 0), Point::new(0, 5)).is_err());
        assert!(Rect::new(Point::new(0, 0), Point::new(5, 0)).is_err());
    }

    #[test]
    fn center_is_inside_bounds() {
        let r = Rect::from_xywh(10, 10, 40, 40).unwrap();
        assert!(r.contains(r.center()));
    }

    #[test]
    fn touching_edges_do_not_overlap() {
        let a = Rect::from_xywh(0, 0, 10, 10).unwrap();
        let b = Rect::from_xywh(10, 0, 10, 10).unwrap();
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn overlapping_interiors_detected() {
        let a = Rect::from_xywh(0, 0, 10, 10).unwrap();
        let b = Rect::from_xywh(5, 5, 10, 10).unwrap();
        assert!(a.overlaps(&b));
    }

    #[test]
    fn tiling_detects_gap() {
        let bounds = Rect::from_xywh(0, 0, 10, 10).unwrap();
        let half = Rect::from_xywh(0, 0, 5, 10).unwrap();
        assert!(!tiles_exactly(bounds, &[half]));
    }

    #[test]
    fn tiling_accepts_exact_split() {
        let bounds = Rect::from_xywh(0, 0, 10, 10).unwrap();
        let left = Rect::from_xywh(0, 0, 5, 10).unwrap();
        let right = Rect::from_xywh(5, 0, 5, 10).unwrap();
        assert!(tiles_exactly(bounds, &[left, right]));
    }

    proptest::proptest! {
        #[test]
        fn union_always_contains_both(ax in -1000i32..1000, ay in -1000i32..1000, aw in 1i32..500, ah in 1i32..500,
                                        bx in -1000i32..1000, by in -1000i32..1000, bw in 1i32..500, bh in 1i32..500) {
            let a = Rect::from_xywh(ax, ay, aw, ah).unwrap();
            let b = Rect::from_xywh(bx, by, bw, bh).unwrap();
            let u = a.union(&b);
            proptest::prop_assert!(u.min.x <= a.min.x && u.min.x <= b.min.x);
            proptest::prop_assert!(u.max.x >= a.max.x && u.max.x >= b.max.x);
        }
    }
}
