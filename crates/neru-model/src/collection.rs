use std::collections::HashMap;
use std::sync::Arc;

use neru_events::NeruError;
use neru_labels::{LabelCache, LabelTrie};

use crate::element::Element;
use crate::hint::Hint;

/// Ordered sequence of `Hint`s plus an exact-label index and a prefix trie
/// (§3, §4.2). Created once per mode activation from a batch of `Element`s;
/// never mutated afterward.
pub struct HintCollection {
    hints: Vec<Hint>,
    exact: HashMap<String, usize>,
    trie: LabelTrie,
}

impl HintCollection {
    /// Sorts `elements` top-to-bottom then left-to-right (§4.1: "Elements are
    /// sorted ... so shorter labels fall on elements nearer the top-left")
    /// before zipping them with generated labels in emission order.
    pub fn build(
        mut elements: Vec<Arc<Element>>,
        label_cache: &LabelCache,
        charset: &str,
    ) -> Result<Self, NeruError> {
        elements.sort_by_key(|e| {
            let b = e.bounds();
            (b.min.y, b.min.x)
        });

        let labels = label_cache.get_or_generate(charset, elements.len())?;

        let mut hints = Vec::with_capacity(elements.len());
        let mut exact = HashMap::with_capacity(elements.len());
        let mut trie = LabelTrie::new();

        for (i, (element, label)) in elements.into_iter().zip(labels.iter()).enumerate() {
            let hint = Hint::new(label.clone(), element, charset)?;
            exact.insert(hint.label().to_string(), i);
            trie.insert(hint.label(), i);
            hints.push(hint);
        }

        tracing::debug!(target: "hints.collection", count = hints.len(), "built hint collection");
        Ok(Self { hints, exact, trie })
    }

    pub fn find_by_label(&self, label: &str) -> Option<&Hint> {
        let upper = label.to_ascii_uppercase();
        self.exact.get(&upper).map(|&i| &self.hints[i])
    }

    /// Empty prefix returns every hint (§4.2), untagged — identical to `all()`.
    pub fn filter_by_prefix(&self, prefix: &str) -> Vec<Hint> {
        let upper = prefix.to_ascii_uppercase();
        let mut indices = self.trie.filter_by_prefix(&upper);
        indices.sort_unstable();
        let tag = if upper.is_empty() { None } else { Some(upper) };
        indices
            .into_iter()
            .map(|i| self.hints[i].with_matched_prefix(tag.clone()))
            .collect()
    }

    pub fn all(&self) -> Vec<Hint> {
        self.filter_by_prefix("")
    }

    pub fn len(&self) -> usize {
        self.hints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hints.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Role;
    use neru_geometry::Rect;

    fn elements(coords: &[(i32, i32, i32, i32)]) -> Vec<Arc<Element>> {
        coords
            .iter()
            .enumerate()
            .map(|(i, &(x, y, w, h))| {
                Arc::new(
                    Element::new(
                        format!("el-{i}"),
                        Rect::from_xywh(x, y, w, h).unwrap(),
                        Role::Button,
                        None,
                        None,
                        true,
                    )
                    .unwrap(),
                )
            })
            .collect()
    }

    #[test]
    fn two_char_label_ergonomics_scenario() {
        let els = elements(&[(10, 10, 40, 40), (60, 10, 40, 40), (10, 60, 40, 40)]);
        let cache = LabelCache::new();
        let collection = HintCollection::build(els, &cache, "ASDF").unwrap();
        assert_eq!(collection.len(), 3);

        let first_label = collection.all()[0].label().to_string();
        let hit = collection.find_by_label(&first_label).unwrap();
        assert_eq!(hit.label(), first_label);

        let a_filtered = collection.filter_by_prefix("A");
        for h in &a_filtered {
            assert!(h.label().starts_with('A'));
            assert_eq!(h.matched_prefix(), Some("A"));
        }
    }

    #[test]
    fn filter_by_prefix_empty_equals_all() {
        let els = elements(&[(0, 0, 10, 10), (20, 0, 10, 10)]);
        let cache = LabelCache::new();
        let collection = HintCollection::build(els, &cache, "ASDF").unwrap();
        let via_filter: Vec<_> = collection.filter_by_prefix("").iter().map(|h| h.label().to_string()).collect();
        let via_all: Vec<_> = collection.all().iter().map(|h| h.label().to_string()).collect();
        assert_eq!(via_filter, via_all);
    }

    #[test]
    fn filter_by_prefix_matches_starts_with_set() {
        let els = elements(&[(0, 0, 10, 10); 6]);
        let cache = LabelCache::new();
        let collection = HintCollection::build(els, &cache, "AS").unwrap();
        let expected: Vec<String> = collection
            .all()
            .iter()
            .map(|h| h.label().to_string())
            .filter(|l| l.starts_with('A'))
            .collect();
        let got: Vec<String> = collection
            .filter_by_prefix("A")
            .iter()
            .map(|h| h.label().to_string())
            .collect();
        assert_eq!(expected.len(), got.len());
        for l in &got {
            assert!(l.starts_with('A'));
        }
    }

    #[test]
    fn elements_are_sorted_top_left_before_label_assignment() {
        let els = elements(&[(100, 100, 10, 10), (0, 0, 10, 10), (0, 50, 10, 10)]);
        let cache = LabelCache::new();
        let collection = HintCollection::build(els, &cache, "ASDF").unwrap();
        let hints = collection.all();
        assert_eq!(hints[0].anchor().y, 5);
        assert_eq!(hints[1].anchor().y, 55);
        assert_eq!(hints[2].anchor().y, 105);
    }
}
