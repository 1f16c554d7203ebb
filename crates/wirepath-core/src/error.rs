//! Error types for the wirepath-core library.
//!
//! This module provides error handling using the `thiserror` crate, with
//! detailed error variants for the different ways wire-format input can be
//! malformed.

use thiserror::Error;

use crate::wire::MAX_FIELD_NUMBER;

/// Result type alias for wirepath operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for wire-format scanning and path resolution
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// A payload length ran past the end of the buffer, or a primitive
    /// decoder hit truncated input
    #[error("invalid length at offset {offset}: {details}")]
    InvalidLength {
        /// Bytes consumed before the error occurred
        offset: usize,
        /// Detailed description of the issue
        details: String,
    },

    /// A tag carried a wire type outside the range known to the format
    #[error("unknown wire type: {wire_type}")]
    UnknownWireType {
        /// The faulty wire-type value
        wire_type: u8,
    },

    /// A group was opened but the buffer ended before its closing tag
    #[error("end group not found for field {number} opened at offset {offset}")]
    EndGroupNotFound {
        /// Field number of the unterminated group
        number: u32,
        /// Bytes consumed when the group was opened
        offset: usize,
    },

    /// Failed to decode a varint
    #[error("failed to decode varint at offset {offset}: buffer too small or invalid encoding")]
    VarintDecode {
        /// Byte offset where the error occurred
        offset: usize,
    },

    /// Invalid field number in a tag
    #[error("invalid field number {number}: must be between 1 and {max}")]
    InvalidFieldNumber {
        /// The invalid field number
        number: u64,
        /// Maximum valid field number
        max: u32,
    },
}

impl Error {
    /// Creates a new invalid length error
    pub fn invalid_length(offset: usize, details: impl Into<String>) -> Self {
        Self::InvalidLength {
            offset,
            details: details.into(),
        }
    }

    /// Creates a new unknown wire type error
    pub fn unknown_wire_type(wire_type: u8) -> Self {
        Self::UnknownWireType { wire_type }
    }

    /// Creates a new unterminated group error
    pub fn end_group_not_found(number: u32, offset: usize) -> Self {
        Self::EndGroupNotFound { number, offset }
    }

    /// Creates a new varint decode error
    pub fn varint_decode(offset: usize) -> Self {
        Self::VarintDecode { offset }
    }

    /// Creates a new field number error
    pub fn invalid_field_number(number: u64) -> Self {
        Self::InvalidFieldNumber {
            number,
            max: MAX_FIELD_NUMBER,
        }
    }

    /// Returns the byte offset attached to the error, if it carries one
    pub fn offset(&self) -> Option<usize> {
        match self {
            Self::InvalidLength { offset, .. }
            | Self::EndGroupNotFound { offset, .. }
            | Self::VarintDecode { offset } => Some(*offset),
            Self::UnknownWireType { .. } | Self::InvalidFieldNumber { .. } => None,
        }
    }
}
