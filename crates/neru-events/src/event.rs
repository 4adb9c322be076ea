//! Event types carried from the `EventTap` collaborator (§6) into the worker.

use crate::key::KeyEventExt;

/// What the event tap pump (`neru-input`) delivers onto the worker channel.
///
/// Overlay mutation never happens on the OS event thread (§5): the tap
/// callback only constructs one of these and enqueues it.
#[derive(Debug, Clone)]
pub enum TapEvent {
    /// A keystroke observed while the tap is enabled.
    Key(KeyEventExt),
    /// The tap's hotkey registration changed (mode entry/exit toggles it).
    HotkeysChanged,
    /// Requested shutdown of the worker loop.
    Shutdown,
}

/// Hooks observing every dispatched event, mirroring the no-op-by-default
/// pattern used for metrics: a caller who wants tracing or test assertions
/// can implement this without the worker loop taking on a dependency.
pub trait EventHooks: Send + Sync + 'static {
    fn pre_dispatch(&self, _event: &TapEvent) {}
    fn post_dispatch(&self, _event: &TapEvent) {}
}

pub struct NoopEventHooks;

impl EventHooks for NoopEventHooks {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::{KeyToken, NamedKey};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Instant;

    struct CountingHooks {
        pre: AtomicUsize,
        post: AtomicUsize,
    }

    impl EventHooks for CountingHooks {
        fn pre_dispatch(&self, _event: &TapEvent) {
            self.pre.fetch_add(1, Ordering::Relaxed);
        }
        fn post_dispatch(&self, _event: &TapEvent) {
            self.post.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[test]
    fn hooks_observe_both_phases() {
        let hooks = CountingHooks {
            pre: AtomicUsize::new(0),
            post: AtomicUsize::new(0),
        };
        let epoch = Instant::now();
        let event = TapEvent::Key(KeyEventExt::new(KeyToken::Named(NamedKey::Escape), epoch, epoch));
        hooks.pre_dispatch(&event);
        hooks.post_dispatch(&event);
        assert_eq!(hooks.pre.load(Ordering::Relaxed), 1);
        assert_eq!(hooks.post.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn noop_hooks_accept_all_events() {
        let hooks = NoopEventHooks;
        hooks.pre_dispatch(&TapEvent::Shutdown);
        hooks.post_dispatch(&TapEvent::HotkeysChanged);
    }
}
