//! Variant-rich keystroke representation (§9: "represent keys as a tagged
//! value `{Char(c), Special(enum), WithModifiers(mods, base)}`, not a
//! free-form string; router does the normalization once").

use std::time::Instant;

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct ModMask: u8 {
        const SHIFT = 0b0001;
        const CTRL  = 0b0010;
        const ALT   = 0b0100;
        const SUPER = 0b1000;
    }
}

/// Non-printable keys the router and managers reason about by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedKey {
    Escape,
    Enter,
    Tab,
    Backspace,
    Delete,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    F(u8),
}

/// A single normalized keystroke, already decoded from whatever the
/// `EventTap` collaborator delivered (§9).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyToken {
    Char(char),
    Named(NamedKey),
    Chord { base: Box<KeyToken>, mods: ModMask },
}

impl KeyToken {
    /// The base token with any modifier wrapper stripped.
    pub fn base(&self) -> &KeyToken {
        match self {
            KeyToken::Chord { base, .. } => base.base(),
            other => other,
        }
    }

    pub fn mods(&self) -> ModMask {
        match self {
            KeyToken::Chord { mods, .. } => *mods,
            _ => ModMask::empty(),
        }
    }

    /// Case-insensitive match against one of the `{"\x7f", "delete", "backspace"}`
    /// synonyms recognized by every mode's router (§4.7).
    pub fn is_backspace_synonym(&self) -> bool {
        matches!(
            self.base(),
            KeyToken::Named(NamedKey::Backspace) | KeyToken::Named(NamedKey::Delete) | KeyToken::Char('\u{7f}')
        )
    }

    /// Grid's fixed reset key `<` (§4.5, §9 open question: configurability unresolved).
    pub fn is_grid_reset(&self) -> bool {
        matches!(self.base(), KeyToken::Char('<'))
    }

    /// The uppercase char this token contributes to `InputState`, if it is a
    /// plain unmodified printable character.
    pub fn as_plain_char(&self) -> Option<char> {
        match self {
            KeyToken::Char(c) => Some(*c),
            _ => None,
        }
    }
}

/// A keystroke with the instant it was observed, used by the hint/grid
/// managers and the async event tap pump (§5 ordering guarantees rely on the
/// channel preserving arrival order, not on this timestamp, but it is useful
/// for debounce and telemetry).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyEventExt {
    pub token: KeyToken,
    pub timestamp_micros: u64,
}

impl KeyEventExt {
    pub fn new(token: KeyToken, observed_at: Instant, epoch: Instant) -> Self {
        Self {
            token,
            timestamp_micros: observed_at.saturating_duration_since(epoch).as_micros() as u64,
        }
    }
}

/// Parse a logical key string already normalized by the router (§4.3: "`k` is
/// a logical key string already normalized by the router") into a `KeyToken`.
/// Exposed for callers (e.g. config-driven key synonyms) that only have the
/// string form available.
pub fn parse_named(s: &str) -> Option<NamedKey> {
    match s.to_ascii_lowercase().as_str() {
        "escape" | "esc" => Some(NamedKey::Escape),
        "enter" | "return" => Some(NamedKey::Enter),
        "tab" => Some(NamedKey::Tab),
        "backspace" => Some(NamedKey::Backspace),
        "delete" => Some(NamedKey::Delete),
        "up" => Some(NamedKey::Up),
        "down" => Some(NamedKey::Down),
        "left" => Some(NamedKey::Left),
        "right" => Some(NamedKey::Right),
        "home" => Some(NamedKey::Home),
        "end" => Some(NamedKey::End),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backspace_synonyms_match_across_representations() {
        assert!(KeyToken::Named(NamedKey::Backspace).is_backspace_synonym());
        assert!(KeyToken::Named(NamedKey::Delete).is_backspace_synonym());
        assert!(KeyToken::Char('\u{7f}').is_backspace_synonym());
        assert!(!KeyToken::Char('a').is_backspace_synonym());
    }

    #[test]
    fn chord_base_and_mods_unwrap_one_level() {
        let chord = KeyToken::Chord {
            base: Box::new(KeyToken::Char('d')),
            mods: ModMask::CTRL,
        };
        assert_eq!(chord.base(), &KeyToken::Char('d'));
        assert_eq!(chord.mods(), ModMask::CTRL);
    }

    #[test]
    fn grid_reset_key_is_literal_angle_bracket() {
        assert!(KeyToken::Char('<').is_grid_reset());
        assert!(!KeyToken::Char('>').is_grid_reset());
    }

    #[test]
    fn parse_named_is_case_insensitive() {
        assert_eq!(parse_named("ESCAPE"), Some(NamedKey::Escape));
        assert_eq!(parse_named("Backspace"), Some(NamedKey::Backspace));
        assert_eq!(parse_named("not-a-key"), None);
    }
}
