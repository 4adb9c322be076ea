//! Async event-tap pump (§5, §6): bridges the synchronous `EventTap`
//! callback into the worker's `TapEvent` channel.

mod pump;

pub use pump::{spawn_event_tap_pump, EventTapPump};
