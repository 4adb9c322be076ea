use std::sync::{Arc, Mutex};

use neru_events::{KeyEventExt, NeruError, NeruResult};
use neru_geometry::{Point, Rect};
use neru_model::Element;

use crate::accessibility::{AccessibilityPort, ElementFilter};
use crate::action::ActionType;
use crate::event_tap::EventTap;
use crate::overlay::{NativeCellRecord, OverlayBackend};
use crate::style::Style;

/// In-memory `AccessibilityPort` stand-in (§6: "we add the mock because we
/// have no real OS backend to link against"). Holds a fixed element list and
/// records every action performed against it.
#[derive(Debug, Default)]
pub struct MockAccessibilityPort {
    elements: Mutex<Vec<Element>>,
    screen: Mutex<Option<Rect>>,
    cursor: Mutex<Point>,
    excluded_bundle_ids: Mutex<Vec<String>>,
    focused_bundle_id: Mutex<Option<String>>,
    pub actions_performed: Mutex<Vec<(ActionType, Option<Point>)>>,
}

impl MockAccessibilityPort {
    pub fn new(elements: Vec<Element>, screen: Rect) -> Self {
        Self {
            elements: Mutex::new(elements),
            screen: Mutex::new(Some(screen)),
            cursor: Mutex::new(Point::new(0, 0)),
            excluded_bundle_ids: Mutex::new(Vec::new()),
            focused_bundle_id: Mutex::new(None),
            actions_performed: Mutex::new(Vec::new()),
        }
    }

    pub fn set_focused_app_bundle_id(&self, id: Option<String>) {
        *self.focused_bundle_id.lock().unwrap() = id;
    }

    pub fn exclude_bundle_id(&self, id: impl Into<String>) {
        self.excluded_bundle_ids.lock().unwrap().push(id.into());
    }
}

impl AccessibilityPort for MockAccessibilityPort {
    fn clickable_elements(&self, filter: &ElementFilter) -> NeruResult<Vec<Element>> {
        let elements = self.elements.lock().unwrap();
        Ok(elements
            .iter()
            .filter(|e| filter.roles.is_empty() || filter.roles.contains(&e.role()))
            .filter(|e| !filter.exclude_roles.contains(&e.role()))
            .filter(|e| {
                filter.min_size.is_none_or(|(w, h)| {
                    e.bounds().width() >= w && e.bounds().height() >= h
                })
            })
            .cloned()
            .collect())
    }

    fn perform_action_at_point(&self, action: ActionType, point: Point) -> NeruResult<()> {
        self.actions_performed.lock().unwrap().push((action, Some(point)));
        Ok(())
    }

    fn perform_action(&self, _element: &Element, action: ActionType) -> NeruResult<()> {
        self.actions_performed.lock().unwrap().push((action, None));
        Ok(())
    }

    fn screen_bounds(&self) -> NeruResult<Rect> {
        self.screen
            .lock()
            .unwrap()
            .ok_or_else(|| NeruError::AccessibilityFailed("no screen configured".into()))
    }

    fn cursor_position(&self) -> NeruResult<Point> {
        Ok(*self.cursor.lock().unwrap())
    }

    fn move_cursor_to(&self, point: Point, _bypass_smoothing: bool) -> NeruResult<()> {
        *self.cursor.lock().unwrap() = point;
        Ok(())
    }

    fn focused_app_bundle_id(&self) -> NeruResult<Option<String>> {
        Ok(self.focused_bundle_id.lock().unwrap().clone())
    }

    fn is_app_excluded(&self, bundle_id: &str) -> bool {
        self.excluded_bundle_ids.lock().unwrap().iter().any(|id| id == bundle_id)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    CreateWindow,
    DestroyWindow,
    Show,
    Hide,
    Clear,
    SetSharingType(bool),
    DrawHintBatch(Vec<NativeCellRecord>),
    DrawGridBatch(Vec<NativeCellRecord>),
    DrawHintIncrement { added: Vec<NativeCellRecord>, removed: Vec<NativeCellRecord> },
    DrawGridIncrement { added: Vec<NativeCellRecord>, removed: Vec<NativeCellRecord> },
    UpdateMatches(String),
    ResizeToActiveScreen,
}

/// In-memory `OverlayBackend` recording every call it receives, for
/// asserting on what `neru-render` would have drawn without a real window.
#[derive(Debug, Default)]
pub struct MockOverlayBackend {
    pub calls: Mutex<Vec<DrawCall>>,
    pub visible: Mutex<bool>,
}

impl OverlayBackend for MockOverlayBackend {
    fn create_window(&self) -> NeruResult<()> {
        self.calls.lock().unwrap().push(DrawCall::CreateWindow);
        Ok(())
    }

    fn destroy_window(&self) -> NeruResult<()> {
        self.calls.lock().unwrap().push(DrawCall::DestroyWindow);
        Ok(())
    }

    fn show(&self) -> NeruResult<()> {
        *self.visible.lock().unwrap() = true;
        self.calls.lock().unwrap().push(DrawCall::Show);
        Ok(())
    }

    fn hide(&self) -> NeruResult<()> {
        *self.visible.lock().unwrap() = false;
        self.calls.lock().unwrap().push(DrawCall::Hide);
        Ok(())
    }

    fn clear(&self) -> NeruResult<()> {
        self.calls.lock().unwrap().push(DrawCall::Clear);
        Ok(())
    }

    fn set_sharing_type(&self, hidden: bool) -> NeruResult<()> {
        self.calls.lock().unwrap().push(DrawCall::SetSharingType(hidden));
        Ok(())
    }

    fn draw_hint_batch(&self, hints: &[NativeCellRecord], _style: &Style) -> NeruResult<()> {
        self.calls.lock().unwrap().push(DrawCall::DrawHintBatch(hints.to_vec()));
        Ok(())
    }

    fn draw_grid_batch(&self, cells: &[NativeCellRecord], _style: &Style) -> NeruResult<()> {
        self.calls.lock().unwrap().push(DrawCall::DrawGridBatch(cells.to_vec()));
        Ok(())
    }

    fn draw_hint_increment(
        &self,
        added: &[NativeCellRecord],
        removed: &[NativeCellRecord],
    ) -> NeruResult<()> {
        self.calls.lock().unwrap().push(DrawCall::DrawHintIncrement {
            added: added.to_vec(),
            removed: removed.to_vec(),
        });
        Ok(())
    }

    fn draw_grid_increment(
        &self,
        added: &[NativeCellRecord],
        removed: &[NativeCellRecord],
    ) -> NeruResult<()> {
        self.calls.lock().unwrap().push(DrawCall::DrawGridIncrement {
            added: added.to_vec(),
            removed: removed.to_vec(),
        });
        Ok(())
    }

    fn update_matches(&self, prefix: &str) -> NeruResult<()> {
        self.calls.lock().unwrap().push(DrawCall::UpdateMatches(prefix.to_string()));
        Ok(())
    }

    fn resize_to_active_screen(&self) -> NeruResult<()> {
        self.calls.lock().unwrap().push(DrawCall::ResizeToActiveScreen);
        Ok(())
    }

    fn resize_to_active_screen_async(
        &self,
        callback: Box<dyn FnOnce(NeruResult<()>) + Send>,
    ) -> NeruResult<()> {
        self.calls.lock().unwrap().push(DrawCall::ResizeToActiveScreen);
        callback(Ok(()));
        Ok(())
    }
}

/// In-memory `EventTap`. `set_handler` stores the callback so tests can push
/// synthetic key events through it with `dispatch`.
#[derive(Default)]
pub struct MockEventTap {
    enabled: Mutex<bool>,
    hotkeys: Mutex<Vec<String>>,
    handler: Mutex<Option<Arc<dyn Fn(KeyEventExt) + Send + Sync>>>,
}

impl MockEventTap {
    pub fn dispatch(&self, event: KeyEventExt) {
        if let Some(handler) = self.handler.lock().unwrap().clone() {
            handler(event);
        }
    }

    pub fn hotkeys(&self) -> Vec<String> {
        self.hotkeys.lock().unwrap().clone()
    }
}

impl EventTap for MockEventTap {
    fn enable(&self) {
        *self.enabled.lock().unwrap() = true;
    }

    fn disable(&self) {
        *self.enabled.lock().unwrap() = false;
    }

    fn is_enabled(&self) -> bool {
        *self.enabled.lock().unwrap()
    }

    fn set_hotkeys(&self, hotkeys: &[String]) {
        *self.hotkeys.lock().unwrap() = hotkeys.to_vec();
    }

    fn set_handler(&self, handler: Box<dyn Fn(KeyEventExt) + Send + Sync>) {
        *self.handler.lock().unwrap() = Some(Arc::from(handler));
    }
}
