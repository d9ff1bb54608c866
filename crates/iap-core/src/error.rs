//! Errors raised while interpreting decoded protocol values

use thiserror::Error;

/// A decoded value that has no meaning in the shared vocabulary
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Raw value outside the enumeration it was converted into
    #[error("Unknown {kind} value: 0x{value:X}")]
    UnknownValue { kind: &'static str, value: u32 },

    /// A lane that is not an operating mode (e.g. the mode-status lane)
    #[error("Mode {0} is a lane, not an operating mode")]
    NotOperatingMode(u8),
}
