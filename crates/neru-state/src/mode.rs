/// The navigation core's single process-wide mode (§3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Idle,
    Hints,
    Grid,
    RecursiveGrid,
    Scroll,
    Action,
}

impl Mode {
    /// The event tap is enabled iff the mode is not `Idle` (§4.8).
    pub fn wants_event_tap(self) -> bool {
        self != Mode::Idle
    }
}
