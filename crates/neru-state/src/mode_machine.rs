use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::mode::Mode;

type Subscriber = Arc<dyn Fn(Mode, Mode) + Send + Sync>;

struct Inner {
    mode: Mode,
    subscribers: Vec<Subscriber>,
}

/// Serializes mode transitions and notifies subscribers (§4.8). A single
/// mutex protects both the mode field and the subscriber list, matching the
/// concurrency model in §5 ("the mode state machine's internal lock protects
/// the mode field and subscriber map").
///
/// Not a global singleton (§9): callers construct one and pass it by
/// reference wherever a mode transition might be needed.
pub struct ModeStateMachine {
    inner: Mutex<Inner>,
    in_transition: AtomicBool,
}

impl Default for ModeStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl ModeStateMachine {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                mode: Mode::Idle,
                subscribers: Vec::new(),
            }),
            in_transition: AtomicBool::new(false),
        }
    }

    pub fn current(&self) -> Mode {
        self.inner.lock().unwrap().mode
    }

    pub fn subscribe(&self, callback: impl Fn(Mode, Mode) + Send + Sync + 'static) {
        self.inner.lock().unwrap().subscribers.push(Arc::new(callback));
    }

    /// 1. Take the lock. 2. No-op if `prev == next`. 3. Write `mode` and copy
    /// the subscriber list. 4. Release the lock. 5. Invoke subscribers with
    /// `(prev, next)` (§4.8). A subscriber calling `switch_to` synchronously
    /// is a caller bug (§4.8); detected and logged rather than deadlocking.
    pub fn switch_to(&self, next: Mode) {
        if self.in_transition.load(Ordering::SeqCst) {
            tracing::error!(
                target: "mode.switch",
                attempted = ?next,
                "re-entrant switch_to call ignored: a subscriber must not transition synchronously"
            );
            return;
        }

        let (prev, subscribers) = {
            let mut inner = self.inner.lock().unwrap();
            if inner.mode == next {
                return;
            }
            let prev = inner.mode;
            inner.mode = next;
            (prev, inner.subscribers.clone())
        };

        self.in_transition.store(true, Ordering::SeqCst);
        for subscriber in &subscribers {
            subscriber(prev, next);
        }
        self.in_transition.store(false, Ordering::SeqCst);

        tracing::info!(target: "mode.switch", ?prev, ?next, "mode transition");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn subscribers_observe_prev_and_next() {
        let machine = ModeStateMachine::new();
        let seen: Arc<Mutex<Vec<(Mode, Mode)>>> = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = Arc::clone(&seen);
        machine.subscribe(move |prev, next| seen_clone.lock().unwrap().push((prev, next)));

        machine.switch_to(Mode::Hints);
        machine.switch_to(Mode::Idle);

        assert_eq!(
            *seen.lock().unwrap(),
            vec![(Mode::Idle, Mode::Hints), (Mode::Hints, Mode::Idle)]
        );
    }

    #[test]
    fn same_mode_transition_is_a_no_op() {
        let machine = ModeStateMachine::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = Arc::clone(&calls);
        machine.subscribe(move |_, _| {
            calls_clone.fetch_add(1, Ordering::SeqCst);
        });
        machine.switch_to(Mode::Idle);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn reentrant_switch_to_from_a_subscriber_is_ignored() {
        let machine = Arc::new(ModeStateMachine::new());
        let inner_attempted = Arc::new(AtomicUsize::new(0));
        let machine_clone = Arc::clone(&machine);
        let inner_attempted_clone = Arc::clone(&inner_attempted);
        machine.subscribe(move |_prev, next| {
            if next == Mode::Hints {
                machine_clone.switch_to(Mode::Grid);
                inner_attempted_clone.fetch_add(1, Ordering::SeqCst);
            }
        });

        machine.switch_to(Mode::Hints);

        assert_eq!(inner_attempted.load(Ordering::SeqCst), 1);
        assert_eq!(machine.current(), Mode::Hints, "re-entrant call must not have taken effect");
    }

    #[test]
    fn event_tap_should_be_enabled_outside_idle() {
        assert!(!Mode::Idle.wants_event_tap());
        assert!(Mode::Hints.wants_event_tap());
        assert!(Mode::Grid.wants_event_tap());
    }
}
