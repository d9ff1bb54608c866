//! Typed command parameters

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use super::{AirCommand, PlaybackStatus, ResultCode};
use crate::error::ProtocolError;

/// Decoded parameters of a command
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Parameters {
    /// No payload
    #[default]
    None,
    /// Single integer (counts, indexes, codes, flags)
    Int(u32),
    /// UTF-8 text field
    Text(String),
    ItemRange(ItemRange),
    Item(ItemSelection),
    ItemName(ItemName),
    TimeStatus(TimeStatus),
    ScreenSize(ScreenSize),
    Feedback(Feedback),
    /// Opaque fixed-pattern payload of an undocumented command
    Raw(Bytes),
}

impl Parameters {
    pub fn as_int(&self) -> Option<u32> {
        match self {
            Parameters::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Parameters::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Short name of the variant, for diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Parameters::None => "none",
            Parameters::Int(_) => "int",
            Parameters::Text(_) => "text",
            Parameters::ItemRange(_) => "item-range",
            Parameters::Item(_) => "item",
            Parameters::ItemName(_) => "item-name",
            Parameters::TimeStatus(_) => "time-status",
            Parameters::ScreenSize(_) => "screen-size",
            Parameters::Feedback(_) => "feedback",
            Parameters::Raw(_) => "raw",
        }
    }
}

/// Range request for paged item-name retrieval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRange {
    /// Raw item type; see [`ItemType`](super::ItemType)
    pub item_type: u8,
    pub start: u32,
    pub length: u32,
}

/// Item selection for switching the active item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSelection {
    /// Raw item type; see [`ItemType`](super::ItemType)
    pub item_type: u8,
    pub number: u32,
}

/// One reply of a paged item-name retrieval
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemName {
    /// Absolute index of the item, used to reorder replies
    pub offset: u32,
    pub name: String,
}

/// Now-playing time and status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeStatus {
    /// Track length in milliseconds
    pub length_ms: u32,
    /// Elapsed time in milliseconds
    pub elapsed_ms: u32,
    pub status: PlaybackStatus,
}

/// Screen dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenSize {
    pub width: u16,
    pub height: u16,
}

/// Generic feedback record
///
/// Also used as the payload of [`AirCommand::NotUnderstood`], where only
/// `command` is meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    /// Id of the command this record answers
    pub command: u16,
    /// Raw result code; see [`ResultCode`]
    pub result: u8,
}

impl Feedback {
    pub fn new(command: AirCommand, result: ResultCode) -> Self {
        Self {
            command: command.into(),
            result: result.into(),
        }
    }

    pub fn result_code(&self) -> Result<ResultCode, ProtocolError> {
        ResultCode::try_from(self.result)
    }

    /// Whether this record references the given command id
    pub fn refers_to(&self, command: AirCommand) -> bool {
        self.command == u16::from(command)
    }
}
