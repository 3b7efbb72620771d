//! Errors reported when a transmission cannot start

use thiserror::Error;

/// Why a `start` request was rejected. State is unchanged in every case.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StartError {
    /// The message was empty or only whitespace
    #[error("please enter a message to send")]
    EmptyMessage,

    /// A transmission is already in flight
    #[error("a transmission is already running")]
    AlreadyRunning,
}
