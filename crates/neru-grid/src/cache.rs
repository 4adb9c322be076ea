//! Process-wide, thread-safe grid cache: mutex-guarded LRU of capacity 8
//! with a 1-hour TTL (§4.4, §5).

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use ahash::AHashMap;
use neru_events::NeruError;
use neru_geometry::Rect;

use crate::builder::GridBuilder;
use crate::grid::Grid;

const DEFAULT_CAPACITY: usize = 8;
const DEFAULT_TTL: Duration = Duration::from_secs(3600);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct GridKey {
    characters: String,
    row_labels: Option<String>,
    col_labels: Option<String>,
    width: i32,
    height: i32,
}

struct Entry {
    grid: Arc<Grid>,
    inserted_at: Instant,
}

struct Inner {
    order: VecDeque<GridKey>,
    map: AHashMap<GridKey, Entry>,
}

pub struct GridCache {
    capacity: usize,
    ttl: Duration,
    inner: Mutex<Inner>,
}

impl Default for GridCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY, DEFAULT_TTL)
    }
}

impl GridCache {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            capacity: capacity.max(1),
            ttl,
            inner: Mutex::new(Inner {
                order: VecDeque::new(),
                map: AHashMap::new(),
            }),
        }
    }

    pub fn get_or_build(
        &self,
        characters: &str,
        row_labels: Option<&str>,
        col_labels: Option<&str>,
        bounds: Rect,
    ) -> Result<Arc<Grid>, NeruError> {
        let key = GridKey {
            characters: characters.to_ascii_uppercase(),
            row_labels: row_labels.map(|s| s.to_ascii_uppercase()),
            col_labels: col_labels.map(|s| s.to_ascii_uppercase()),
            width: bounds.width(),
            height: bounds.height(),
        };

        {
            let mut inner = self.inner.lock().unwrap();
            if let Some(entry) = inner.map.get(&key) {
                if entry.inserted_at.elapsed() < self.ttl {
                    let grid = Arc::clone(&entry.grid);
                    Self::touch(&mut inner, &key);
                    return Ok(grid);
                }
                inner.map.remove(&key);
                inner.order.retain(|k| k != &key);
            }
        }

        let grid = Arc::new(GridBuilder::build(characters, row_labels, col_labels, bounds)?);
        self.insert(key, Arc::clone(&grid));
        Ok(grid)
    }

    /// Build grids off the hot path for a set of common screen sizes (§4.4).
    pub fn prewarm(
        &self,
        characters: &str,
        row_labels: Option<&str>,
        col_labels: Option<&str>,
        screen_sizes: &[(i32, i32)],
    ) -> Result<(), NeruError> {
        for &(w, h) in screen_sizes {
            let bounds = Rect::from_xywh(0, 0, w, h).map_err(|e| NeruError::InvalidInput(e.to_string()))?;
            self.get_or_build(characters, row_labels, col_labels, bounds)?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn touch(inner: &mut Inner, key: &GridKey) {
        inner.order.retain(|k| k != key);
        inner.order.push_back(key.clone());
    }

    fn insert(&self, key: GridKey, grid: Arc<Grid>) {
        let mut inner = self.inner.lock().unwrap();
        if inner.map.contains_key(&key) {
            inner.map.insert(
                key.clone(),
                Entry {
                    grid,
                    inserted_at: Instant::now(),
                },
            );
            Self::touch(&mut inner, &key);
            return;
        }
        while inner.map.len() >= self.capacity {
            if let Some(oldest) = inner.order.pop_front() {
                inner.map.remove(&oldest);
            } else {
                break;
            }
        }
        inner.order.push_back(key.clone());
        inner.map.insert(
            key,
            Entry {
                grid,
                inserted_at: Instant::now(),
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_builds_share_the_same_allocation() {
        let cache = GridCache::default();
        let bounds = Rect::from_xywh(0, 0, 1920, 1080).unwrap();
        let a = cache.get_or_build("ABCD", None, None, bounds).unwrap();
        let b = cache.get_or_build("ABCD", None, None, bounds).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn capacity_evicts_oldest_entry() {
        let cache = GridCache::new(2, Duration::from_secs(3600));
        for w in [800, 1024, 1280] {
            let bounds = Rect::from_xywh(0, 0, w, 800).unwrap();
            cache.get_or_build("ABCD", None, None, bounds).unwrap();
        }
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn expired_entries_are_rebuilt_not_reused() {
        let cache = GridCache::new(8, Duration::from_millis(1));
        let bounds = Rect::from_xywh(0, 0, 1024, 768).unwrap();
        let a = cache.get_or_build("ABCD", None, None, bounds).unwrap();
        std::thread::sleep(Duration::from_millis(5));
        let b = cache.get_or_build("ABCD", None, None, bounds).unwrap();
        assert!(!Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn prewarm_populates_cache_for_every_size() {
        let cache = GridCache::default();
        cache
            .prewarm("ABCD", None, None, &[(1920, 1080), (1366, 768)])
            .unwrap();
        assert_eq!(cache.len(), 2);
    }
}
