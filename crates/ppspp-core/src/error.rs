//! Error taxonomy for the wire codec (spec §7, kinds C1-C5 raise).

use thiserror::Error;

/// Everything that can go wrong while decoding or encoding PPSPP wire data.
///
/// Every variant maps to exactly one "kind" in the spec's error taxonomy;
/// callers that need to distinguish kinds programmatically should match on
/// the variant rather than on the message text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// A fixed-width read ran out of input before completing.
    #[error("short read: needed {needed} bytes, only {available} remained")]
    ShortRead { needed: usize, available: usize },

    /// A protocol-option code byte is not in the registry (not 0-9, not 0xFF).
    #[error("unknown protocol option code: {0}")]
    UnknownOption(u8),

    /// The same protocol-option code appeared twice in one record.
    #[error("duplicate protocol option: {0}")]
    DuplicateOption(u8),

    /// Live Discard Window (code 7) appeared before Chunk Addressing Method (code 6).
    #[error("live discard window option appeared before chunk addressing method")]
    OrderViolation,

    /// An enum-valued option byte fell outside its assigned value set.
    #[error("invalid enum value {value} for option {option}")]
    InvalidEnum { option: &'static str, value: u8 },

    /// A message tag byte has no registered handler.
    #[error("unknown message type tag: {0}")]
    UnknownMessageType(u8),
}

pub type Result<T> = std::result::Result<T, CodecError>;
