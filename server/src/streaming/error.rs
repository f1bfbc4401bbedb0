use thiserror::Error;

use confproto_shared::GlobalId;

/// Errors that can occur while tracking streaming subscriptions
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StreamingError {
    /// Connection bookkeeping requested for a signal that was never registered
    #[error("Signal {0} is not registered for streaming")]
    SignalNotRegistered(GlobalId),
}
