//! External collaborator traits for the OS accessibility API, the native
//! overlay window, and the global key tap (§6), plus in-memory test doubles
//! grounded on the teacher's terminal-backend seam (`TerminalBackend` /
//! `CrosstermBackend`): a trait the rest of the workspace programs against,
//! with a real implementation out of scope here and a fake standing in for
//! tests.

mod accessibility;
mod action;
mod event_tap;
mod mock;
mod overlay;
mod style;

pub use accessibility::{AccessibilityPort, ElementFilter};
pub use action::{ActionType, MoveMouseRelative};
pub use event_tap::EventTap;
pub use mock::{DrawCall, MockAccessibilityPort, MockEventTap, MockOverlayBackend};
pub use overlay::{NativeCellRecord, OverlayBackend};
pub use style::Style;
