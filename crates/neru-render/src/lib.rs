//! Overlay render pipeline (§4.9): native-string interning, pooled draw-call
//! buffers, the resize-completion slot pool, and the incremental-diff engine
//! that `OverlayRenderer` drives against an `OverlayBackend`.

mod diff;
mod pool;
mod renderer;
mod resize_slots;
mod string_cache;

pub use diff::{diff, DiffAction, Snapshot};
pub use pool::BufferPool;
pub use renderer::OverlayRenderer;
pub use resize_slots::ResizeCallbackSlotPool;
pub use string_cache::{CachedNativeString, NativeStringCache};
