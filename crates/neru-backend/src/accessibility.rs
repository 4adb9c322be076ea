use neru_events::NeruResult;
use neru_geometry::{Point, Rect};
use neru_model::{Element, Role};

use crate::action::ActionType;

/// Filters applied when enumerating clickable elements (§6). Mirrors the
/// exclusion knobs called out for menu bars, the dock, and notification
/// center, plus an escape hatch for apps that opt into menu-bar scanning
/// despite the default exclusion.
#[derive(Debug, Clone)]
pub struct ElementFilter {
    pub roles: Vec<Role>,
    pub exclude_roles: Vec<Role>,
    pub include_offscreen: bool,
    pub min_size: Option<(i32, i32)>,
    pub include_menu_bar: bool,
    pub include_dock: bool,
    pub include_notification_center: bool,
    pub additional_menu_bar_bundle_ids: Vec<String>,
}

impl Default for ElementFilter {
    fn default() -> Self {
        Self {
            roles: Vec::new(),
            exclude_roles: Vec::new(),
            include_offscreen: false,
            min_size: None,
            include_menu_bar: false,
            include_dock: false,
            include_notification_center: false,
            additional_menu_bar_bundle_ids: Vec::new(),
        }
    }
}

/// The OS accessibility surface (§6). A real implementation wraps a native
/// accessibility API; the trait is the seam the rest of the workspace builds
/// against, and `MockAccessibilityPort` stands in for tests.
pub trait AccessibilityPort: Send + Sync {
    fn clickable_elements(&self, filter: &ElementFilter) -> NeruResult<Vec<Element>>;
    fn perform_action_at_point(&self, action: ActionType, point: Point) -> NeruResult<()>;
    fn perform_action(&self, element: &Element, action: ActionType) -> NeruResult<()>;
    fn screen_bounds(&self) -> NeruResult<Rect>;
    fn cursor_position(&self) -> NeruResult<Point>;
    fn move_cursor_to(&self, point: Point, bypass_smoothing: bool) -> NeruResult<()>;
    fn focused_app_bundle_id(&self) -> NeruResult<Option<String>>;
    fn is_app_excluded(&self, bundle_id: &str) -> bool;
}
