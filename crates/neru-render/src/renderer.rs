use std::sync::{Arc, Mutex};

use neru_backend::{NativeCellRecord, OverlayBackend, Style};
use neru_events::{NeruError, NeruResult};
use neru_geometry::Rect;
use neru_grid::{subdivide, Cell, Grid};
use neru_model::Hint;

use crate::diff::{diff, DiffAction, Snapshot};
use crate::pool::BufferPool;
use crate::resize_slots::ResizeCallbackSlotPool;
use crate::string_cache::NativeStringCache;

/// Drives an `OverlayBackend` through the batched/incremental draw contract
/// of §4.9, applying the viewport filter, the native-string cache discipline
/// and the incremental-diff algorithm on every `draw_grid`/`draw_hints`.
pub struct OverlayRenderer<B: OverlayBackend> {
    backend: Arc<B>,
    style: Mutex<Style>,
    string_cache: NativeStringCache,
    grid_snapshot: Mutex<Option<Snapshot>>,
    hints_snapshot: Mutex<Option<Snapshot>>,
    viewport: Mutex<Option<Rect>>,
    max_cells: Mutex<usize>,
    hide_unmatched: Mutex<bool>,
    cell_pool: BufferPool<NativeCellRecord>,
    resize_slots: Arc<ResizeCallbackSlotPool>,
}

impl<B: OverlayBackend> OverlayRenderer<B> {
    pub fn new(backend: Arc<B>, style: Style) -> Self {
        Self {
            backend,
            style: Mutex::new(style),
            string_cache: NativeStringCache::new(),
            grid_snapshot: Mutex::new(None),
            hints_snapshot: Mutex::new(None),
            viewport: Mutex::new(None),
            max_cells: Mutex::new(0),
            hide_unmatched: Mutex::new(false),
            cell_pool: BufferPool::new(),
            resize_slots: Arc::new(ResizeCallbackSlotPool::default()),
        }
    }

    pub fn set_viewport(&self, viewport: Option<Rect>) {
        *self.viewport.lock().unwrap() = viewport;
    }

    pub fn set_max_cells(&self, n: usize) {
        *self.max_cells.lock().unwrap() = n;
    }

    pub fn set_hide_unmatched(&self, hide: bool) {
        *self.hide_unmatched.lock().unwrap() = hide;
    }

    /// Replaces the active `Style` and invalidates both snapshots, so the
    /// next `draw_grid`/`draw_hints` sees a style mismatch and issues a full
    /// redraw (§4.9 step 1) instead of a stale `NoOp`/`UpdateMatches`. Style
    /// colors are cached native strings too, so the string cache is
    /// invalidated along with the snapshots (§4.9: "on style change or
    /// destroy").
    pub fn set_style(&self, style: Style) {
        *self.style.lock().unwrap() = style;
        *self.grid_snapshot.lock().unwrap() = None;
        *self.hints_snapshot.lock().unwrap() = None;
        self.string_cache.invalidate_all();
    }

    pub fn set_sharing_type(&self, hidden: bool) -> NeruResult<()> {
        self.backend.set_sharing_type(hidden)
    }

    pub fn show(&self) -> NeruResult<()> {
        self.backend.show()
    }

    pub fn hide(&self) -> NeruResult<()> {
        self.backend.hide()
    }

    pub fn clear(&self) -> NeruResult<()> {
        *self.grid_snapshot.lock().unwrap() = None;
        *self.hints_snapshot.lock().unwrap() = None;
        self.backend.clear()
    }

    pub fn destroy(&self) -> NeruResult<()> {
        self.string_cache.invalidate_all();
        *self.grid_snapshot.lock().unwrap() = None;
        *self.hints_snapshot.lock().unwrap() = None;
        self.backend.destroy_window()
    }

    /// Applies the viewport-overlap filter then the `max_cells` cap (§4.9).
    fn filter_records(&self, mut records: Vec<NativeCellRecord>) -> Vec<NativeCellRecord> {
        if let Some(viewport) = *self.viewport.lock().unwrap() {
            records.retain(|r| r.bounds.overlaps(&viewport));
        }
        let max_cells = *self.max_cells.lock().unwrap();
        if max_cells > 0 && records.len() > max_cells {
            records.truncate(max_cells);
        }
        records
    }

    fn apply_diff(
        &self,
        snapshot_slot: &Mutex<Option<Snapshot>>,
        records: Vec<NativeCellRecord>,
        input: &str,
        is_grid: bool,
    ) -> NeruResult<()> {
        for record in &records {
            self.string_cache.get_or_intern(&record.label);
        }

        let style = self.style.lock().unwrap().clone();
        let mut snapshot = snapshot_slot.lock().unwrap();
        let action = diff(snapshot.as_ref(), &records, input, &style);

        // Hold the cache's reader lock for the full span from string lookup
        // through the (simulated) backend draw call, so an invalidation
        // racing this draw can't free a pointer the backend is still using
        // (§4.9's native-string-lifetime invariant).
        self.string_cache.with_locked_strings(|_strings| -> NeruResult<()> {
            match &action {
                DiffAction::NoOp => {}
                DiffAction::UpdateMatches(prefix) => self.backend.update_matches(prefix)?,
                DiffAction::FullRedraw(all) => {
                    if is_grid {
                        self.backend.draw_grid_batch(all, &style)?;
                    } else {
                        self.backend.draw_hint_batch(all, &style)?;
                    }
                }
                DiffAction::Incremental { added, removed } => {
                    if is_grid {
                        self.backend.draw_grid_increment(added, removed)?;
                    } else {
                        self.backend.draw_hint_increment(added, removed)?;
                    }
                }
            }
            Ok(())
        })?;

        *snapshot = Some(Snapshot::new(&records, input, style));
        self.release_scratch(records);
        Ok(())
    }

    fn release_scratch(&self, records: Vec<NativeCellRecord>) {
        self.cell_pool.release(records);
    }

    pub fn draw_grid(&self, grid: &Grid, input: &str) -> NeruResult<()> {
        let hide_unmatched = *self.hide_unmatched.lock().unwrap();
        let mut records = self.cell_pool.acquire();
        records.extend(grid.cells().iter().filter_map(|cell| {
            if hide_unmatched && !input.is_empty() && !cell.coordinate().starts_with(input) {
                return None;
            }
            let matched_len = if cell.coordinate().starts_with(input) { input.len() as u32 } else { 0 };
            Some(NativeCellRecord::new(cell.coordinate(), cell.bounds(), matched_len))
        }));
        let records = self.filter_records(records);
        self.apply_diff(&self.grid_snapshot, records, input, true)
    }

    pub fn draw_hints(&self, hints: &[Hint], input: &str) -> NeruResult<()> {
        let mut records = self.cell_pool.acquire();
        records.extend(hints.iter().map(|h| {
            let matched_len = h.matched_prefix().map(str::len).unwrap_or(0) as u32;
            let bounds = Rect::from_xywh(h.anchor().x, h.anchor().y, 1, 1)
                .expect("a 1x1 rect anchored at any point is always valid");
            NativeCellRecord::new(h.label(), bounds, matched_len)
        }));
        let records = self.filter_records(records);
        self.apply_diff(&self.hints_snapshot, records, input, false)
    }

    /// Draws the fixed subgrid guide over a selected `Cell` (§4.5). Always a
    /// full redraw: it's a distinct nested surface, not diffed against the
    /// outer grid's snapshot.
    pub fn show_subgrid(&self, cell: &Cell, sub_cols: usize, sub_rows: usize, sub_keys: &str) -> NeruResult<()> {
        let keys: Vec<char> = sub_keys.chars().collect();
        let subcells = subdivide(cell.bounds(), sub_cols, sub_rows);
        let style = self.style.lock().unwrap().clone();
        let records: Vec<NativeCellRecord> = subcells
            .iter()
            .enumerate()
            .map(|(i, bounds)| {
                let label = keys.get(i).map(|c| c.to_string()).unwrap_or_default();
                NativeCellRecord::new(label, *bounds, 0)
            })
            .collect();
        self.backend.draw_grid_batch(&records, &style)
    }

    pub fn update_matches(&self, prefix: &str) -> NeruResult<()> {
        self.backend.update_matches(prefix)
    }

    pub fn resize_to_active_screen(&self) -> NeruResult<()> {
        self.backend.resize_to_active_screen()
    }

    /// `resize_to_active_screen` with the slot-pool/timeout discipline of
    /// §4.9. Falls back to the synchronous call if the pool is exhausted.
    pub async fn resize_to_active_screen_async(&self) -> NeruResult<()> {
        let Some((id, generation, rx)) = self.resize_slots.reserve() else {
            tracing::warn!(target: "render.resize", "resize callback slot pool exhausted, falling back to sync resize");
            return self.resize_to_active_screen();
        };

        let backend = Arc::clone(&self.backend);
        let timeout = self.resize_slots.timeout();
        let slots = Arc::clone(&self.resize_slots);
        backend.resize_to_active_screen_async(Box::new(move |result| {
            slots.complete(id, generation, result);
        }))?;

        match tokio::time::timeout(timeout, rx).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(NeruError::OverlayFailed("resize callback sender dropped".into())),
            Err(_) => {
                tracing::warn!(target: "render.resize", id, generation, "resize callback timed out, slot reclaimed");
                self.resize_slots.reclaim(id);
                Err(NeruError::OverlayFailed("resize callback timed out".into()))
            }
        }
    }
}
