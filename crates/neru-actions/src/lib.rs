//! Hint/grid/recursive-grid managers and the per-mode router (§4.3–§4.7),
//! grounded on the teacher's `core-actions::dispatcher` (`mode.rs`,
//! `dispatch`): mode-scoped handlers each returning a small result struct,
//! wired together by an outer router rather than a monolithic match.

mod debounce;
mod grid_manager;
mod hint_manager;
mod recursive_grid;
mod router;

pub use debounce::Debouncer;
pub use grid_manager::GridManager;
pub use hint_manager::HintManager;
pub use recursive_grid::RecursiveGridController;
pub use router::{direct_action_for, hotkey_mode_for, route, DirectAction, RouteOutcome};
