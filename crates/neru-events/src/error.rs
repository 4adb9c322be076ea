use std::fmt;

/// Error kinds shared by every navigation-core crate (§7).
///
/// Kept as distinguishable variants rather than a single opaque `anyhow::Error`
/// so callers can `matches!` on the kind: the mode state machine treats most
/// variants as non-fatal (log, then `switch_to(Mode::Idle)`), while
/// `Permission` is fatal and maps to a specific process exit code at the
/// `neru-bin` boundary.
#[derive(Debug, thiserror::Error)]
pub enum NeruError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("capacity exceeded: requested {requested}, capacity {capacity}")]
    CapacityExceeded { requested: usize, capacity: usize },

    #[error("accessibility call failed: {0}")]
    AccessibilityFailed(String),

    #[error("overlay backend call failed: {0}")]
    OverlayFailed(String),

    #[error("operation canceled")]
    Canceled,

    #[error("accessibility permission not granted: {0}")]
    Permission(String),
}

impl NeruError {
    /// Process exit code this error kind maps to when it escapes to `neru-bin` (§6).
    pub fn exit_code(&self) -> i32 {
        match self {
            NeruError::Permission(_) => 2,
            NeruError::AccessibilityFailed(_) | NeruError::OverlayFailed(_) => 3,
            NeruError::InvalidInput(_) | NeruError::CapacityExceeded { .. } => 1,
            NeruError::Canceled => 0,
        }
    }

    /// True for kinds the mode state machine should swallow by returning to `Idle`
    /// rather than propagating further (§7 propagation policy).
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, NeruError::Permission(_))
    }
}

pub type NeruResult<T> = Result<T, NeruError>;

/// A cancellation flag checked at the entry of any cancelable operation (§5).
///
/// Cheap to clone (wraps an `Arc<AtomicBool>`); cloning shares the same
/// underlying flag so a single `cancel()` call reaches every holder.
#[derive(Clone, Default)]
pub struct CancelToken(std::sync::Arc<std::sync::atomic::AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, std::sync::atomic::Ordering::SeqCst);
    }

    pub fn is_canceled(&self) -> bool {
        self.0.load(std::sync::atomic::Ordering::SeqCst)
    }

    /// Entry check used by every cancelable operation: fails fast if already canceled.
    pub fn check(&self) -> NeruResult<()> {
        if self.is_canceled() {
            Err(NeruError::Canceled)
        } else {
            Ok(())
        }
    }
}

impl fmt::Debug for CancelToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancelToken")
            .field("canceled", &self.is_canceled())
            .finish()
    }
}
