//! Errors surfaced to callers of the accessory side

use iap_core::{ProtocolError, TransportError};
use thiserror::Error;

/// Result type for command exchanges
pub type CommandResult<T> = Result<T, CommandError>;

/// Errors raised by a command exchange
///
/// All are terminal for the call that raised them; nothing is retried
/// internally.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Peer explicitly rejected the command id
    #[error("Command 0x{command:04X} not understood by peer")]
    NotUnderstood { command: u32 },

    /// Peer reported failure
    #[error("Command 0x{command:04X} failed")]
    Failed { command: u32 },

    /// Peer reported failure: parameter length exceeded
    #[error("Command 0x{command:04X} failed: parameter length exceeded")]
    LengthExceeded { command: u32 },

    /// Peer reported failure: a response id was sent as a command
    #[error("Command 0x{command:04X} failed: response given for command")]
    IsResponse { command: u32 },

    /// No classifiable reply before the deadline
    #[error("Timeout: received {received} of {expected} expected replies")]
    Timeout { received: usize, expected: usize },

    /// Reply carried parameters of the wrong shape
    #[error("Unexpected {kind} reply to command 0x{command:04X}")]
    UnexpectedReply { command: u32, kind: &'static str },

    #[error("Not supported: {0}")]
    Unsupported(String),

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}

impl CommandError {
    /// Whether the peer reported failure (including the refined failures)
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            CommandError::Failed { .. }
                | CommandError::LengthExceeded { .. }
                | CommandError::IsResponse { .. }
        )
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, CommandError::Timeout { .. })
    }
}
