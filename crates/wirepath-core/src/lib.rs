//! # wirepath-core
//!
//! A schema-less reader for the Protocol Buffers wire format.
//!
//! Given a byte buffer holding a serialized message and a path of field
//! numbers, this crate locates one, many, or all matching occurrences and
//! exposes each as a typed scalar or as a raw byte slice for further
//! descent. No message descriptor is needed, no intermediate tree is built,
//! and the single-result lookup allocates nothing.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`wire`]: tag and primitive decoding (varint, fixed32/64, zigzag)
//! - [`scanner`]: the field-by-field scanner and the depth-first path
//!   resolver
//! - [`field`]: the [`Field`] view, its typed accessors, and the packed
//!   unpacker
//! - [`error`]: error types and handling
//!
//! ## Example
//!
//! ```
//! use wirepath_core::get_one;
//!
//! // field 1, varint, value 150
//! let pb = [0x08, 0x96, 0x01];
//! assert_eq!(get_one(&pb, &[1]).as_int32(), 150);
//! assert!(!get_one(&pb, &[2]).exists());
//! ```
//!
//! Nested fields are addressed by listing the field numbers along the way
//! down, and repeated fields come back from [`get_all`] in byte order:
//!
//! ```
//! use wirepath_core::{get_all, get_one};
//!
//! // field 3 wraps a message holding field 1, varint, 42
//! let pb = [0x1A, 0x02, 0x08, 0x2A];
//! assert_eq!(get_one(&pb, &[3, 1]).as_int32(), 42);
//!
//! let values: Vec<i32> = get_all(&pb, &[3, 1])
//!     .unwrap()
//!     .iter()
//!     .map(|field| field.as_int32())
//!     .collect();
//! assert_eq!(values, [42]);
//! ```
//!
//! ## Caveats
//!
//! Without a schema the reader cannot tell which varint flavor a field was
//! written with, whether a length-delimited payload is a string, bytes, or a
//! sub-message, or whether two occurrences of a number were meant to agree:
//! the caller picks the accessor, and a mismatched wire type reads as the
//! zero value.

#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unreachable_pub)]

pub mod error;
pub mod field;
pub mod scanner;
pub mod wire;

// Re-export primary types for convenience
pub use error::{Error, Result};
pub use field::Field;
pub use scanner::{get_all, get_iter, get_one, scan_fields};
pub use wire::{WireType, MAX_FIELD_NUMBER};

/// Crate version for programmatic access
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
