use std::sync::Mutex;
use std::time::Duration;

use neru_events::NeruResult;
use tokio::sync::oneshot;

const DEFAULT_SLOTS: usize = 8;
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

struct Slot {
    generation: u64,
    occupied: bool,
    waiter: Option<oneshot::Sender<NeruResult<()>>>,
}

/// Tracks in-flight `resize_to_active_screen_async` calls (§4.9). Reserving a
/// slot yields an `(id, generation)` pair passed as the opaque callback
/// context; the completion callback looks the pair up before signaling the
/// waiter, so a stale or duplicate completion after the slot was recycled is
/// a no-op rather than waking the wrong caller.
pub struct ResizeCallbackSlotPool {
    slots: Mutex<Vec<Slot>>,
    timeout: Duration,
}

impl Default for ResizeCallbackSlotPool {
    fn default() -> Self {
        Self::new(DEFAULT_SLOTS, DEFAULT_TIMEOUT)
    }
}

impl ResizeCallbackSlotPool {
    pub fn new(capacity: usize, timeout: Duration) -> Self {
        let slots = (0..capacity)
            .map(|_| Slot { generation: 0, occupied: false, waiter: None })
            .collect();
        Self { slots: Mutex::new(slots), timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// `None` if every slot is occupied; the renderer falls back to a
    /// synchronous resize in that case.
    pub fn reserve(&self) -> Option<(usize, u64, oneshot::Receiver<NeruResult<()>>)> {
        let mut slots = self.slots.lock().unwrap();
        let idx = slots.iter().position(|s| !s.occupied)?;
        let (tx, rx) = oneshot::channel();
        slots[idx].occupied = true;
        slots[idx].generation += 1;
        slots[idx].waiter = Some(tx);
        Some((idx, slots[idx].generation, rx))
    }

    /// Invoked from the (simulated) native completion callback.
    pub fn complete(&self, id: usize, generation: u64, result: NeruResult<()>) {
        let mut slots = self.slots.lock().unwrap();
        let Some(slot) = slots.get_mut(id) else { return };
        if !slot.occupied || slot.generation != generation {
            return;
        }
        if let Some(tx) = slot.waiter.take() {
            let _ = tx.send(result);
        }
        slot.occupied = false;
    }

    /// Reclaim a slot whose waiter timed out (§4.9: "logged").
    pub fn reclaim(&self, id: usize) {
        let mut slots = self.slots.lock().unwrap();
        if let Some(slot) = slots.get_mut(id) {
            slot.waiter = None;
            slot.occupied = false;
        }
    }
}
