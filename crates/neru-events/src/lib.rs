//! Shared event, key, error, and metrics types for the navigation core.

mod error;
mod event;
mod key;
mod metrics;

pub use error::{CancelToken, NeruError, NeruResult};
pub use event::{EventHooks, NoopEventHooks, TapEvent};
pub use key::{parse_named, KeyEventExt, KeyToken, ModMask, NamedKey};
pub use metrics::{MetricsSink, NoopMetricsSink};
