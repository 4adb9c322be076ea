use std::collections::{HashMap, HashSet};

use neru_backend::{NativeCellRecord, Style};

/// What a renderer should do after comparing the next frame to its previous
/// snapshot (§4.9 incremental-diff algorithm).
#[derive(Debug, Clone, PartialEq)]
pub enum DiffAction {
    NoOp,
    UpdateMatches(String),
    FullRedraw(Vec<NativeCellRecord>),
    Incremental { added: Vec<NativeCellRecord>, removed: Vec<NativeCellRecord> },
}

/// A prior frame's records (keyed by coordinate or label) plus the input
/// string and `Style` that produced it, used to detect "only the match
/// highlighting changed" (step 3 of the algorithm) and to force a redraw on
/// a style-only change (step 1: "...and the Style is equal").
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    records: HashMap<String, NativeCellRecord>,
    input: String,
    style: Style,
}

impl Snapshot {
    pub fn new(records: &[NativeCellRecord], input: &str, style: Style) -> Self {
        Self {
            records: records.iter().map(|r| (r.label.clone(), r.clone())).collect(),
            input: input.to_string(),
            style,
        }
    }
}

/// Steps 1-4 of §4.9's incremental-diff algorithm. `prev` is `None` on the
/// very first frame (always a full redraw).
pub fn diff(prev: Option<&Snapshot>, new_records: &[NativeCellRecord], new_input: &str, new_style: &Style) -> DiffAction {
    let Some(prev) = prev else {
        return DiffAction::FullRedraw(new_records.to_vec());
    };

    let records_match = prev.records.len() == new_records.len()
        && new_records
            .iter()
            .all(|r| prev.records.get(&r.label).is_some_and(|p| p.bounds == r.bounds));

    if records_match && prev.style != *new_style {
        // Geometry is unchanged but every retained string/color needs
        // re-emitting under the new style, so an incremental add/remove
        // (which would compute to nothing here) can't carry it.
        return DiffAction::FullRedraw(new_records.to_vec());
    }

    if records_match {
        if prev.input == new_input {
            // Both empty and unchanged is ambiguous (the overlay may have
            // been cleared externally): force a full redraw to be safe.
            if prev.input.is_empty() && new_input.is_empty() {
                return DiffAction::FullRedraw(new_records.to_vec());
            }
            return DiffAction::NoOp;
        }
        return DiffAction::UpdateMatches(new_input.to_string());
    }

    let new_keys: HashSet<&str> = new_records.iter().map(|r| r.label.as_str()).collect();
    let removed: Vec<NativeCellRecord> = prev
        .records
        .values()
        .filter(|p| !new_keys.contains(p.label.as_str()))
        .cloned()
        .collect();
    let added: Vec<NativeCellRecord> = new_records
        .iter()
        .filter(|r| !prev.records.contains_key(&r.label))
        .cloned()
        .collect();

    // Pure add or pure remove is strictly more efficient as a full redraw.
    if added.len() == new_records.len() && removed.len() == prev.records.len() {
        return DiffAction::FullRedraw(new_records.to_vec());
    }

    DiffAction::Incremental { added, removed }
}
