//! Player-side errors

use iap_core::{Mode, TransportError};
use thiserror::Error;

/// Errors raised while dispatching an inbound packet
///
/// These stay local to dispatch; none is turned into a wire-level reply.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EmulatorError {
    /// Id has no entry in a table that enforces exhaustiveness
    #[error("Invalid command 0x{id:04X} for {mode} mode")]
    InvalidCommand { mode: Mode, id: u32 },

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}
