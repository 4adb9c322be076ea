use neru_events::KeyEventExt;

/// Global low-level key tap (§6). Enabled only outside `Mode::Idle`
/// (`neru-state::Mode::wants_event_tap`); `set_hotkeys` lets the activation
/// shortcut keep working while the tap is otherwise disabled.
pub trait EventTap: Send + Sync {
    fn enable(&self);
    fn disable(&self);
    fn is_enabled(&self) -> bool;
    fn set_hotkeys(&self, hotkeys: &[String]);
    fn set_handler(&self, handler: Box<dyn Fn(KeyEventExt) + Send + Sync>);
}
