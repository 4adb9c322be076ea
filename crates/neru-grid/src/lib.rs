//! Spatial grid decomposition: adaptive sizing, multi-level region labeling,
//! and a process-wide memoized cache (§4.4).

mod builder;
mod cache;
mod cell;
mod grid;
mod subdivide;

pub use builder::GridBuilder;
pub use cache::GridCache;
pub use cell::Cell;
pub use grid::Grid;
pub use subdivide::subdivide;
