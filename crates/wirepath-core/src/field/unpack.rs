//! Splitting packed repeated scalars into individual fields.
//!
//! In proto2, repeated fields of primitive numeric types can be declared
//! packed; in proto3 they are packed by default. A packed field arrives as a
//! single length-delimited payload holding the concatenation of the scalars'
//! native encodings, and the wire carries no marker saying which encoding
//! that is: the caller picks the item type from its own knowledge of the
//! schema.

use super::Field;
use crate::wire::{self, WireType};

impl<'a> Field<'a> {
    /// Splits a packed repeated field into one synthetic [`Field`] per item.
    ///
    /// The field must be length-delimited and `item_type` must be one of
    /// [`WireType::Varint`], [`WireType::Fixed32`] or [`WireType::Fixed64`];
    /// anything else yields an empty vector.
    pub fn unpack(&self, item_type: WireType) -> Vec<Field<'a>> {
        match item_type {
            WireType::Varint => self.unpack_varint(),
            WireType::Fixed32 => self.unpack_fixed32(),
            WireType::Fixed64 => self.unpack_fixed64(),
            _ => Vec::new(),
        }
    }

    /// Unpacks a length-delimited payload of concatenated varints.
    ///
    /// A truncated varint at the tail ends the unpack; the items decoded up
    /// to that point are returned.
    pub fn unpack_varint(&self) -> Vec<Field<'a>> {
        if self.wire_type != WireType::Len {
            return Vec::new();
        }
        let mut buf = self.raw;
        let mut results = Vec::with_capacity(buf.len());
        while !buf.is_empty() {
            let Ok((value, n)) = wire::decode_varint(buf) else {
                break;
            };
            results.push(Field::new(WireType::Varint, value, &buf[..n]));
            buf = &buf[n..];
        }
        results
    }

    /// Unpacks a length-delimited payload of concatenated fixed 32-bit
    /// values. Trailing bytes that do not fill a full item are ignored.
    pub fn unpack_fixed32(&self) -> Vec<Field<'a>> {
        if self.wire_type != WireType::Len {
            return Vec::new();
        }
        let mut buf = self.raw;
        let mut results = Vec::with_capacity(buf.len() / 4);
        while buf.len() >= 4 {
            results.push(Field::new(WireType::Fixed32, 0, &buf[..4]));
            buf = &buf[4..];
        }
        results
    }

    /// Unpacks a length-delimited payload of concatenated fixed 64-bit
    /// values. Trailing bytes that do not fill a full item are ignored.
    pub fn unpack_fixed64(&self) -> Vec<Field<'a>> {
        if self.wire_type != WireType::Len {
            return Vec::new();
        }
        let mut buf = self.raw;
        let mut results = Vec::with_capacity(buf.len() / 8);
        while buf.len() >= 8 {
            results.push(Field::new(WireType::Fixed64, 0, &buf[..8]));
            buf = &buf[8..];
        }
        results
    }
}
