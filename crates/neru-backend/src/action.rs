use std::str::FromStr;

use neru_events::NeruError;
use neru_geometry::{Point, Rect};

/// Actions an [`AccessibilityPort`](crate::AccessibilityPort) can perform at a
/// point or against an element (§6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionType {
    LeftClick,
    RightClick,
    MiddleClick,
    MouseDown,
    MouseUp,
    MoveMouse,
    Scroll,
}

impl ActionType {
    pub fn as_str(self) -> &'static str {
        match self {
            ActionType::LeftClick => "left_click",
            ActionType::RightClick => "right_click",
            ActionType::MiddleClick => "middle_click",
            ActionType::MouseDown => "mouse_down",
            ActionType::MouseUp => "mouse_up",
            ActionType::MoveMouse => "move_mouse",
            ActionType::Scroll => "scroll",
        }
    }
}

impl std::fmt::Display for ActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionType {
    type Err = NeruError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left_click" => Ok(ActionType::LeftClick),
            "right_click" => Ok(ActionType::RightClick),
            "middle_click" => Ok(ActionType::MiddleClick),
            "mouse_down" => Ok(ActionType::MouseDown),
            "mouse_up" => Ok(ActionType::MouseUp),
            "move_mouse" => Ok(ActionType::MoveMouse),
            "scroll" => Ok(ActionType::Scroll),
            other => Err(NeruError::InvalidInput(format!("unknown action type: {other}"))),
        }
    }
}

/// A relative cursor move, clamped to the active screen's bounds rather than
/// wrapping (§6 move-mouse scenario).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveMouseRelative {
    pub dx: i32,
    pub dy: i32,
}

impl MoveMouseRelative {
    pub fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }

    /// Resolve against `current` and `screen`, clamping to the screen's
    /// corners inclusive. Cursor positions are points, not pixel spans, so
    /// the upper clamp is `screen.max` itself rather than `screen.max - 1`.
    pub fn resolve(self, current: Point, screen: Rect) -> Point {
        let x = (current.x + self.dx).clamp(screen.min.x, screen.max.x);
        let y = (current.y + self.dy).clamp(screen.min.y, screen.max.y);
        Point::new(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_type_round_trips_through_its_string_form() {
        let all = [
            ActionType::LeftClick,
            ActionType::RightClick,
            ActionType::MiddleClick,
            ActionType::MouseDown,
            ActionType::MouseUp,
            ActionType::MoveMouse,
            ActionType::Scroll,
        ];
        for action in all {
            assert_eq!(ActionType::from_str(action.as_str()).unwrap(), action);
        }
    }

    #[test]
    fn unknown_action_name_is_rejected() {
        assert!(ActionType::from_str("teleport").is_err());
    }

    #[test]
    fn move_mouse_relative_clamps_to_screen_corner_rather_than_wrapping() {
        let screen = Rect::from_xywh(0, 0, 1920, 1080).unwrap();
        let current = Point::new(1910, 1070);
        let moved = MoveMouseRelative::new(100, 100).resolve(current, screen);
        assert_eq!(moved, Point::new(1920, 1080));
    }

    #[test]
    fn move_mouse_relative_clamps_negative_overshoot_to_origin() {
        let screen = Rect::from_xywh(0, 0, 1920, 1080).unwrap();
        let current = Point::new(5, 5);
        let moved = MoveMouseRelative::new(-100, -100).resolve(current, screen);
        assert_eq!(moved, Point::new(0, 0));
    }
}
