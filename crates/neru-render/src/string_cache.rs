use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Stands in for a once-allocated, UTF-8 null-terminated native string handed
/// to the `OverlayBackend` (§4.9). A real binding would store a raw pointer
/// here; this workspace never calls into native code, so an `Arc<str>` plays
/// the same "allocate once, retain, share" role without `unsafe`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedNativeString(Arc<str>);

impl CachedNativeString {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Interns labels and style colors exactly once (§4.9: "every label and
/// style color is allocated as a native string exactly once and retained").
/// Draw paths hold the reader lock for the full span of a lookup through the
/// (simulated) draw call; invalidation takes the writer lock.
#[derive(Debug, Default)]
pub struct NativeStringCache {
    entries: RwLock<HashMap<String, CachedNativeString>>,
}

impl NativeStringCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_intern(&self, value: &str) -> CachedNativeString {
        if let Some(existing) = self.entries.read().unwrap().get(value) {
            return existing.clone();
        }
        let mut entries = self.entries.write().unwrap();
        entries
            .entry(value.to_string())
            .or_insert_with(|| CachedNativeString(Arc::from(value)))
            .clone()
    }

    /// Invalidate every interned string (style change or `destroy`).
    pub fn invalidate_all(&self) {
        self.entries.write().unwrap().clear();
    }

    /// Runs `f` with the reader lock held for its full duration (§4.9:
    /// "reader lock for the full span... through backend has finished the
    /// draw call"). `f` only sees a borrow of the map, so nothing it
    /// returns can keep that borrow alive past the lock being dropped.
    pub fn with_locked_strings<T>(&self, f: impl FnOnce(&HashMap<String, CachedNativeString>) -> T) -> T {
        let entries = self.entries.read().unwrap();
        f(&entries)
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
