//! Bridges the synchronous `EventTap` callback (invoked on the OS key-tap
//! thread, per §6) into the async `TapEvent` channel the worker loop
//! consumes, preserving arrival order (§5, §9: "channel-based delivery from
//! the event-tap thread into the worker").

use std::sync::Arc;

use neru_backend::EventTap;
use neru_events::{KeyEventExt, MetricsSink, TapEvent};
use tokio::sync::mpsc::Sender;

/// Owns the registered tap handler and the worker-bound sender, so shutdown
/// can disable the tap and enqueue `TapEvent::Shutdown` from one place.
pub struct EventTapPump {
    tap: Arc<dyn EventTap>,
    sender: Sender<TapEvent>,
}

impl EventTapPump {
    pub fn enable(&self) {
        self.tap.enable();
    }

    pub fn disable(&self) {
        self.tap.disable();
    }

    pub fn set_hotkeys(&self, hotkeys: &[String]) {
        self.tap.set_hotkeys(hotkeys);
    }

    /// Disables the tap and enqueues `TapEvent::Shutdown` so the worker loop
    /// drains any events already in flight before exiting.
    pub fn shutdown(&self) {
        self.tap.disable();
        if self.sender.try_send(TapEvent::Shutdown).is_err() {
            tracing::warn!(
                target: "input.tap",
                "shutdown event dropped, worker channel full or closed"
            );
        }
    }
}

/// Registers `tap`'s key handler so every keystroke becomes a
/// `TapEvent::Key` delivered onto `sender`. The handler runs on whatever
/// thread the tap invokes it from and blocks that thread until the channel
/// has room — the teacher's `core-input` pump makes the same trade-off
/// (`Sender::send(...).await` inside its own task) to guarantee delivery
/// order over throughput.
pub fn spawn_event_tap_pump(
    tap: Arc<dyn EventTap>,
    sender: Sender<TapEvent>,
    metrics: Arc<dyn MetricsSink>,
) -> EventTapPump {
    let handler_sender = sender.clone();
    let handler_tap = Arc::clone(&tap);
    handler_tap.set_handler(Box::new(move |event: KeyEventExt| {
        match handler_sender.blocking_send(TapEvent::Key(event)) {
            Ok(()) => metrics.counter("input.tap.delivered", 1),
            Err(_) => {
                metrics.counter("input.tap.dropped", 1);
                tracing::warn!(target: "input.tap", "worker channel closed, dropping keystroke");
            }
        }
    }));

    EventTapPump { tap, sender }
}

#[cfg(test)]
mod tests {
    use super::*;
    use neru_backend::MockEventTap;
    use neru_events::{KeyToken, NoopMetricsSink};
    use std::time::Instant;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn keystrokes_are_delivered_in_arrival_order() {
        let tap = Arc::new(MockEventTap::default());
        let (tx, mut rx) = mpsc::channel(8);
        let _pump = spawn_event_tap_pump(tap.clone(), tx, Arc::new(NoopMetricsSink));

        let dispatcher = tap.clone();
        let now = Instant::now();
        std::thread::spawn(move || {
            dispatcher.dispatch(KeyEventExt::new(KeyToken::Char('a'), now, now));
            dispatcher.dispatch(KeyEventExt::new(KeyToken::Char('b'), now, now));
        })
        .join()
        .unwrap();

        let first = rx.recv().await.unwrap();
        let second = rx.recv().await.unwrap();
        assert!(matches!(first, TapEvent::Key(k) if k.token == KeyToken::Char('a')));
        assert!(matches!(second, TapEvent::Key(k) if k.token == KeyToken::Char('b')));
    }

    #[tokio::test]
    async fn shutdown_disables_the_tap_and_enqueues_a_shutdown_event() {
        let tap = Arc::new(MockEventTap::default());
        tap.enable();
        let (tx, mut rx) = mpsc::channel(8);
        let pump = spawn_event_tap_pump(tap.clone(), tx, Arc::new(NoopMetricsSink));

        pump.shutdown();

        assert!(!tap.is_enabled());
        assert!(matches!(rx.recv().await.unwrap(), TapEvent::Shutdown));
    }
}
