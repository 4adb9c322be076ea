use std::sync::{Arc, Mutex};
use std::time::Duration;

use neru_events::KeyToken;
use neru_model::{Hint, HintCollection};

use crate::debounce::Debouncer;

const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(50);

/// Drives hint-mode keystroke accumulation and prefix filtering over a fixed
/// `HintCollection` (§4.3).
pub struct HintManager {
    collection: HintCollection,
    input: Mutex<String>,
    debouncer: Debouncer,
    sent_first_update: std::sync::atomic::AtomicBool,
    subscriber: Arc<dyn Fn(Vec<Hint>) + Send + Sync>,
    /// Acquired before invoking `subscriber` so the callback may safely touch
    /// renderer state also touched by the worker thread (§5).
    external_lock: Option<Arc<Mutex<()>>>,
}

impl HintManager {
    pub fn new(
        collection: HintCollection,
        subscriber: impl Fn(Vec<Hint>) + Send + Sync + 'static,
        external_lock: Option<Arc<Mutex<()>>>,
    ) -> Self {
        Self {
            collection,
            input: Mutex::new(String::new()),
            debouncer: Debouncer::new(DEFAULT_DEBOUNCE),
            sent_first_update: std::sync::atomic::AtomicBool::new(false),
            subscriber,
            external_lock,
        }
    }

    pub fn collection(&self) -> &HintCollection {
        &self.collection
    }

    /// `(hint?, completed)` per §4.3's input contract.
    pub fn handle_key(&self, token: &KeyToken) -> (Option<Hint>, bool) {
        if token.is_backspace_synonym() {
            let mut input = self.input.lock().unwrap();
            input.pop();
            if input.is_empty() {
                drop(input);
                self.push_update(self.collection.all(), true);
            } else {
                let filtered = self.collection.filter_by_prefix(&input);
                drop(input);
                self.push_update(filtered, false);
            }
            return (None, false);
        }

        if let Some(c) = token.as_plain_char() {
            let mut input = self.input.lock().unwrap();
            input.push(c.to_ascii_uppercase());
            let filtered = self.collection.filter_by_prefix(&input);

            if filtered.is_empty() {
                input.clear();
                drop(input);
                self.push_update(self.collection.all(), true);
                return (None, false);
            }

            if filtered.len() == 1 && filtered[0].label() == input.as_str() {
                let hint = filtered[0].clone();
                drop(input);
                return (Some(hint), true);
            }

            drop(input);
            self.push_update(filtered, false);
            return (None, false);
        }

        (None, false)
    }

    fn push_update(&self, hints: Vec<Hint>, force_immediate: bool) {
        let lock = self.external_lock.clone();
        let subscriber = Arc::clone(&self.subscriber);
        let invoke = move |hints: Vec<Hint>| {
            let _guard = lock.as_ref().map(|l| l.lock().unwrap());
            subscriber(hints);
        };

        let first = !self.sent_first_update.swap(true, std::sync::atomic::Ordering::SeqCst);
        if force_immediate || first {
            self.debouncer.fire_now(move || invoke(hints));
        } else {
            self.debouncer.schedule(move || invoke(hints));
        }
    }
}
