use std::sync::Arc;

use neru_events::NeruError;
use neru_geometry::Point;

use crate::element::Element;

/// A labeled reference to an `Element` (§3). `matched_prefix` updates
/// produce a new `Hint` that shares the underlying `Element` by reference
/// (an `Arc` clone), never a deep copy.
#[derive(Debug, Clone, PartialEq)]
pub struct Hint {
    label: String,
    element: Arc<Element>,
    anchor: Point,
    matched_prefix: Option<String>,
}

impl Hint {
    /// `charset` is the alphabet `label` must be drawn from (§3:
    /// `/[A-Z<configured-charset>]+/`); validated here once so every other
    /// layer can treat `label` as already-checked.
    pub fn new(label: impl Into<String>, element: Arc<Element>, charset: &str) -> Result<Self, NeruError> {
        let label = label.into();
        if label.is_empty() {
            return Err(NeruError::InvalidInput("hint label must be non-empty".into()));
        }
        let charset_upper: String = charset.chars().map(|c| c.to_ascii_uppercase()).collect();
        if !label.chars().all(|c| c.is_ascii_uppercase() && charset_upper.contains(c)) {
            return Err(NeruError::InvalidInput(format!(
                "hint label '{label}' contains characters outside charset '{charset}'"
            )));
        }
        let anchor = element.bounds().center();
        Ok(Self {
            label,
            element,
            anchor,
            matched_prefix: None,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn element(&self) -> &Element {
        &self.element
    }

    pub fn anchor(&self) -> Point {
        self.anchor
    }

    pub fn matched_prefix(&self) -> Option<&str> {
        self.matched_prefix.as_deref()
    }

    /// Cheap re-tag: clones the `Arc<Element>` handle, not the element itself.
    pub fn with_matched_prefix(&self, prefix: Option<String>) -> Self {
        Self {
            label: self.label.clone(),
            element: Arc::clone(&self.element),
            anchor: self.anchor,
            matched_prefix: prefix,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use neru_geometry::Rect;
    use crate::element::Role;

    fn element() -> Arc<Element> {
        let bounds = Rect::from_xywh(10, 10, 40, 40).unwrap();
        Arc::new(Element::new("btn-1", bounds, Role::Button, None, None, true).unwrap())
    }

    #[test]
    fn rejects_labels_with_characters_outside_charset() {
        let err = Hint::new("AZ", element(), "ASDF").unwrap_err();
        assert!(matches!(err, NeruError::InvalidInput(_)));
    }

    #[test]
    fn anchor_is_element_bounds_center() {
        let hint = Hint::new("AA", element(), "ASDF").unwrap();
        assert_eq!(hint.anchor(), element().bounds().center());
    }

    #[test]
    fn retagging_shares_the_same_element_allocation() {
        let hint = Hint::new("AA", element(), "ASDF").unwrap();
        let retagged = hint.with_matched_prefix(Some("A".into()));
        assert!(std::ptr::eq(hint.element(), retagged.element()));
        assert_eq!(retagged.matched_prefix(), Some("A"));
        assert_eq!(hint.matched_prefix(), None);
    }
}
