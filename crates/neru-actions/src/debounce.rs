use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Single-shot, cancel-on-reschedule debounce timer (§4.3: "a new update
/// cancels the pending timer"). Cancellation is by generation counter rather
/// than an abort handle: a superseded timer still fires but finds its
/// generation stale and no-ops.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    generation: Arc<AtomicU64>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Run `callback` after the debounce delay unless another `schedule` or
    /// `fire_now` call supersedes it first.
    pub fn schedule(&self, callback: impl FnOnce() + Send + 'static) {
        let my_generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let generation = Arc::clone(&self.generation);
        let delay = self.delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if generation.load(Ordering::SeqCst) == my_generation {
                callback();
            }
        });
    }

    /// Run `callback` immediately, invalidating any pending scheduled call
    /// (§4.3: "the first `set_hints` after mode entry is not debounced").
    pub fn fire_now(&self, callback: impl FnOnce()) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        callback();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[tokio::test(flavor = "multi_thread")]
    async fn superseded_schedule_never_fires() {
        let debouncer = Debouncer::new(Duration::from_millis(20));
        let seen = Arc::new(Mutex::new(Vec::new()));

        let seen1 = Arc::clone(&seen);
        debouncer.schedule(move || seen1.lock().unwrap().push(1));
        let seen2 = Arc::clone(&seen);
        debouncer.schedule(move || seen2.lock().unwrap().push(2));

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(*seen.lock().unwrap(), vec![2]);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn fire_now_runs_synchronously_and_cancels_pending() {
        let debouncer = Debouncer::new(Duration::from_millis(20));
        let seen = Arc::new(Mutex::new(Vec::new()));

        let seen1 = Arc::clone(&seen);
        debouncer.schedule(move || seen1.lock().unwrap().push(1));
        debouncer.fire_now(|| {});

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert!(seen.lock().unwrap().is_empty());
    }
}
