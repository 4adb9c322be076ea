use neru_events::NeruResult;
use neru_geometry::Rect;

use crate::style::Style;

/// One hint or grid-cell quad to draw (§6). `neru-render` is responsible for
/// batching these and for interning labels into native strings; this struct
/// is the plain-data record handed across the seam.
#[derive(Debug, Clone, PartialEq)]
pub struct NativeCellRecord {
    pub label: String,
    pub bounds: Rect,
    pub matched_prefix_len: u32,
}

impl NativeCellRecord {
    pub fn new(label: impl Into<String>, bounds: Rect, matched_prefix_len: u32) -> Self {
        Self {
            label: label.into(),
            bounds,
            matched_prefix_len,
        }
    }
}

/// The native overlay window surface (§6). Owns window lifecycle, batched
/// and incremental draw calls, and match-prefix highlighting; `neru-render`
/// drives it.
pub trait OverlayBackend: Send + Sync {
    fn create_window(&self) -> NeruResult<()>;
    fn destroy_window(&self) -> NeruResult<()>;
    fn show(&self) -> NeruResult<()>;
    fn hide(&self) -> NeruResult<()>;
    fn clear(&self) -> NeruResult<()>;
    /// `hidden` excludes the overlay from screen captures / screen sharing.
    fn set_sharing_type(&self, hidden: bool) -> NeruResult<()>;

    fn draw_hint_batch(&self, hints: &[NativeCellRecord], style: &Style) -> NeruResult<()>;
    fn draw_grid_batch(&self, cells: &[NativeCellRecord], style: &Style) -> NeruResult<()>;

    fn draw_hint_increment(
        &self,
        added: &[NativeCellRecord],
        removed: &[NativeCellRecord],
    ) -> NeruResult<()>;
    fn draw_grid_increment(
        &self,
        added: &[NativeCellRecord],
        removed: &[NativeCellRecord],
    ) -> NeruResult<()>;

    fn update_matches(&self, prefix: &str) -> NeruResult<()>;

    fn resize_to_active_screen(&self) -> NeruResult<()>;
    fn resize_to_active_screen_async(
        &self,
        callback: Box<dyn FnOnce(NeruResult<()>) + Send>,
    ) -> NeruResult<()>;
}
