use neru_backend::ActionType;
use neru_events::{parse_named, KeyToken, NamedKey};
use neru_state::Mode;

/// Outcome of routing one raw keystroke (§4.7).
#[derive(Debug, Clone, PartialEq)]
pub struct RouteOutcome {
    pub exit: bool,
    /// `Some` when the keystroke should be passed through to the active
    /// mode's manager.
    pub token: Option<KeyToken>,
}

/// An action-mode direct key, bypassing the hint/grid managers entirely
/// (§4.7: "direct keys invoke click variants"). Bindings are this
/// implementation's own choice (unspecified by the contract): arrows step
/// the cursor, `f`/`F`/`d` fire the three click variants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DirectAction {
    Move { dx: i32, dy: i32 },
    Click(ActionType),
}

/// Normalize `token` against `exit_keys` (case-insensitive, modifier-aware):
/// set `exit = true` on a match, otherwise pass the token through (§4.7).
pub fn route(token: KeyToken, exit_keys: &[String]) -> RouteOutcome {
    if matches_any_exit_key(&token, exit_keys) {
        return RouteOutcome { exit: true, token: None };
    }
    RouteOutcome { exit: false, token: Some(token) }
}

fn matches_any_exit_key(token: &KeyToken, exit_keys: &[String]) -> bool {
    let base = token.base();
    exit_keys.iter().any(|name| key_matches_name(base, name))
}

fn key_matches_name(token: &KeyToken, name: &str) -> bool {
    if let Some(named) = parse_named(name) {
        return matches!(token, KeyToken::Named(n) if *n == named);
    }
    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => matches!(token, KeyToken::Char(tc) if tc.eq_ignore_ascii_case(&c)),
        _ => false,
    }
}

/// Maps a raw keystroke received in `Mode::Idle` to the mode it activates
/// (spec line 41: "event tap → mode state machine"; line 223: "keys
/// configured as hotkeys are swallowed"). Bindings mirror the fixed f/g/r
/// hotkey set registered on the event tap; not configurable, same as the
/// grid manager's fixed subgrid-reset key.
pub fn hotkey_mode_for(token: &KeyToken) -> Option<Mode> {
    match token.base() {
        KeyToken::Char(c) if c.eq_ignore_ascii_case(&'f') => Some(Mode::Hints),
        KeyToken::Char(c) if c.eq_ignore_ascii_case(&'g') => Some(Mode::Grid),
        KeyToken::Char(c) if c.eq_ignore_ascii_case(&'r') => Some(Mode::RecursiveGrid),
        _ => None,
    }
}

/// Action-mode direct keys only (§4.7). `step` is the configured
/// move-mouse delta in pixels.
pub fn direct_action_for(token: &KeyToken, step: i32) -> Option<DirectAction> {
    match token.base() {
        KeyToken::Named(NamedKey::Up) => Some(DirectAction::Move { dx: 0, dy: -step }),
        KeyToken::Named(NamedKey::Down) => Some(DirectAction::Move { dx: 0, dy: step }),
        KeyToken::Named(NamedKey::Left) => Some(DirectAction::Move { dx: -step, dy: 0 }),
        KeyToken::Named(NamedKey::Right) => Some(DirectAction::Move { dx: step, dy: 0 }),
        KeyToken::Char('f') => Some(DirectAction::Click(ActionType::LeftClick)),
        KeyToken::Char('F') => Some(DirectAction::Click(ActionType::RightClick)),
        KeyToken::Char('d') => Some(DirectAction::Click(ActionType::MiddleClick)),
        _ => None,
    }
}
