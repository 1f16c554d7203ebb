//! Decoded field views and typed accessors.
//!
//! A [`Field`] is a borrowed view of one field occurrence inside a serialized
//! message: the wire type, the raw payload slice, and (for varints) the
//! decoded 64-bit value. Typed accessors reinterpret the view as one of the
//! protobuf scalar types; each returns the zero value of its target type when
//! the wire type does not match, mirroring the behavior of a missing scalar
//! field.
//!
//! Fields are produced by the scanner and stay valid for as long as the
//! buffer they were scanned from.

mod unpack;

use std::borrow::Cow;

use crate::error::Result;
use crate::scanner;
use crate::wire::{self, WireType};

/// A decoded view of one field occurrence.
///
/// Borrows from the scanned buffer; cheap to copy. The payload slice never
/// includes the tag, and for length-delimited fields the length prefix is
/// already stripped.
#[derive(Debug, Clone, Copy)]
pub struct Field<'a> {
    wire_type: WireType,
    varint: u64,
    raw: &'a [u8],
}

impl<'a> Field<'a> {
    /// The "not found" sentinel; [`Field::exists`] returns `false` for it
    /// and every typed accessor returns its zero value.
    pub const INVALID: Self = Field {
        wire_type: WireType::Invalid,
        varint: 0,
        raw: &[],
    };

    /// Wraps a whole serialized message so field paths can be resolved
    /// against it.
    ///
    /// A message body and a length-delimited payload have the same layout,
    /// so the wrapper is typed [`WireType::Len`].
    pub fn message(pb: &'a [u8]) -> Field<'a> {
        Field {
            wire_type: WireType::Len,
            varint: 0,
            raw: pb,
        }
    }

    pub(crate) fn new(wire_type: WireType, varint: u64, raw: &'a [u8]) -> Field<'a> {
        Field {
            wire_type,
            varint,
            raw,
        }
    }

    /// Returns the wire type the field was encoded with
    pub fn wire_type(&self) -> WireType {
        self.wire_type
    }

    /// Returns the decoded varint value; zero unless the wire type is
    /// [`WireType::Varint`]
    pub fn varint(&self) -> u64 {
        self.varint
    }

    /// Returns the raw payload bytes, without tag or length prefix
    pub fn raw(&self) -> &'a [u8] {
        self.raw
    }

    /// Returns true if this is a valid field rather than the "not found"
    /// sentinel
    pub fn exists(&self) -> bool {
        self.wire_type != WireType::Invalid
    }

    /// Gets the first field matching the given field-number path inside this
    /// field's payload. See [`crate::get_one`].
    pub fn get_one(&self, path: &[u32]) -> Field<'a> {
        scanner::get_one(self.raw, path)
    }

    /// Gets every field matching the given field-number path inside this
    /// field's payload. See [`crate::get_all`].
    pub fn get_all(&self, path: &[u32]) -> Result<Vec<Field<'a>>> {
        scanner::get_all(self.raw, path)
    }

    /// Streams every field matching the given field-number path inside this
    /// field's payload into `sink`. See [`crate::get_iter`].
    pub fn get_iter(
        &self,
        path: &[u32],
        sink: &mut dyn FnMut(Field<'a>) -> bool,
    ) -> Result<()> {
        scanner::get_iter(self.raw, path, sink)
    }

    /// Scans this field's payload field-by-field, delivering occurrences of
    /// `number` to `sink`. See [`crate::scan_fields`].
    pub fn iter_fields(
        &self,
        number: u32,
        sink: &mut dyn FnMut(Field<'a>) -> bool,
    ) -> Result<usize> {
        scanner::scan_fields(self.raw, number, sink)
    }

    // Varints - plain

    /// Decodes the field as `int32` (low 32 bits, two's complement)
    pub fn as_int32(&self) -> i32 {
        if self.wire_type != WireType::Varint {
            return 0;
        }
        self.varint as i32
    }

    /// Decodes the field as `int64`
    pub fn as_int64(&self) -> i64 {
        if self.wire_type != WireType::Varint {
            return 0;
        }
        self.varint as i64
    }

    /// Decodes the field as `uint32` (low 32 bits)
    pub fn as_uint32(&self) -> u32 {
        if self.wire_type != WireType::Varint {
            return 0;
        }
        self.varint as u32
    }

    /// Decodes the field as `uint64`
    pub fn as_uint64(&self) -> u64 {
        if self.wire_type != WireType::Varint {
            return 0;
        }
        self.varint
    }

    /// Decodes the field as `bool`: any nonzero varint is `true`
    pub fn as_bool(&self) -> bool {
        if self.wire_type != WireType::Varint {
            return false;
        }
        wire::decode_bool(self.varint)
    }

    // Varints - zigzag (sint32 | sint64)

    /// Decodes the field as `sint32` (zigzag, truncated to 32 bits)
    pub fn as_sint32(&self) -> i32 {
        if self.wire_type != WireType::Varint {
            return 0;
        }
        wire::decode_zigzag(self.varint) as i32
    }

    /// Decodes the field as `sint64` (zigzag)
    pub fn as_sint64(&self) -> i64 {
        if self.wire_type != WireType::Varint {
            return 0;
        }
        wire::decode_zigzag(self.varint)
    }

    // Fixed 32-bit

    /// Decodes the field as `fixed32`. Returns 0 when the wire type is not
    /// [`WireType::Fixed32`].
    pub fn as_fixed32(&self) -> u32 {
        if self.wire_type != WireType::Fixed32 {
            return 0;
        }
        match wire::consume_fixed32(self.raw) {
            Ok((value, _)) => value,
            Err(_) => 0,
        }
    }

    /// Decodes the field as `sfixed32`
    pub fn as_sfixed32(&self) -> i32 {
        self.as_fixed32() as i32
    }

    /// Decodes the field as `float`, reinterpreting the 32-bit payload as an
    /// IEEE-754 single. NaN payloads survive the round trip.
    pub fn as_float(&self) -> f32 {
        f32::from_bits(self.as_fixed32())
    }

    // Fixed 64-bit

    /// Decodes the field as `fixed64`. Returns 0 when the wire type is not
    /// [`WireType::Fixed64`].
    pub fn as_fixed64(&self) -> u64 {
        if self.wire_type != WireType::Fixed64 {
            return 0;
        }
        match wire::consume_fixed64(self.raw) {
            Ok((value, _)) => value,
            Err(_) => 0,
        }
    }

    /// Decodes the field as `sfixed64`
    pub fn as_sfixed64(&self) -> i64 {
        self.as_fixed64() as i64
    }

    /// Decodes the field as `double`, reinterpreting the 64-bit payload as an
    /// IEEE-754 double. NaN payloads survive the round trip.
    pub fn as_double(&self) -> f64 {
        f64::from_bits(self.as_fixed64())
    }

    // Length-delimited

    /// Decodes the field as `string`. Returns an empty string when the wire
    /// type is not [`WireType::Len`].
    ///
    /// The wire format carries no UTF-8 guarantee, and Rust strings do, so
    /// invalid sequences are replaced; callers that need the exact bytes use
    /// [`Field::as_bytes`]. Borrows from the buffer when the payload is
    /// already valid UTF-8.
    pub fn as_string(&self) -> Cow<'a, str> {
        if self.wire_type != WireType::Len {
            return Cow::Borrowed("");
        }
        String::from_utf8_lossy(self.raw)
    }

    /// Returns the field payload as `bytes`. Returns an empty slice when the
    /// wire type is not [`WireType::Len`].
    pub fn as_bytes(&self) -> &'a [u8] {
        if self.wire_type != WireType::Len {
            return &[];
        }
        self.raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn varint_field(value: u64, raw: &[u8]) -> Field<'_> {
        Field::new(WireType::Varint, value, raw)
    }

    #[test]
    fn test_invalid_sentinel() {
        let field = Field::INVALID;
        assert!(!field.exists());
        assert_eq!(field.as_int32(), 0);
        assert_eq!(field.as_uint64(), 0);
        assert_eq!(field.as_string(), "");
        assert_eq!(field.as_bytes(), &[] as &[u8]);
        assert!(!field.as_bool());
    }

    #[test]
    fn test_varint_accessors() {
        // 150 encoded as [0x96, 0x01]
        let raw = [0x96, 0x01];
        let field = varint_field(150, &raw);
        assert_eq!(field.as_int32(), 150);
        assert_eq!(field.as_int64(), 150);
        assert_eq!(field.as_uint32(), 150);
        assert_eq!(field.as_uint64(), 150);
        assert!(field.as_bool());
        // sint reads the same varint through the zigzag lens: 150 -> 75
        assert_eq!(field.as_sint32(), 75);
    }

    #[test]
    fn test_negative_int32_truncation() {
        // -1 as int32 is encoded as the full 10-byte varint
        let raw = [0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x01];
        let field = varint_field(u64::MAX, &raw);
        assert_eq!(field.as_int32(), -1);
        assert_eq!(field.as_int64(), -1);
        assert_eq!(field.as_uint32(), u32::MAX);
        assert_eq!(field.as_uint64(), u64::MAX);
    }

    #[test]
    fn test_zigzag_accessors() {
        let raw = [0x3F];
        let field = varint_field(63, &raw);
        assert_eq!(field.as_sint32(), -32);
        assert_eq!(field.as_sint64(), -32);
    }

    #[test]
    fn test_fixed32_accessors() {
        let raw = 3232.0f32.to_le_bytes();
        let field = Field::new(WireType::Fixed32, 0, &raw);
        assert_eq!(field.as_float(), 3232.0);
        assert_eq!(field.as_fixed32(), 3232.0f32.to_bits());
        // wrong-type reads come back as zero
        assert_eq!(field.as_int32(), 0);
        assert_eq!(field.as_fixed64(), 0);
        assert_eq!(field.as_string(), "");
    }

    #[test]
    fn test_fixed64_accessors() {
        let raw = (-64i64).to_le_bytes();
        let field = Field::new(WireType::Fixed64, 0, &raw);
        assert_eq!(field.as_sfixed64(), -64);
        assert_eq!(field.as_fixed64(), (-64i64) as u64);
        assert_eq!(field.as_fixed32(), 0);
    }

    #[test]
    fn test_nan_payload_preserved() {
        // A quiet NaN with a nonzero payload bit
        let bits = 0x7FC0_0001u32;
        let raw = bits.to_le_bytes();
        let field = Field::new(WireType::Fixed32, 0, &raw);
        assert_eq!(field.as_float().to_bits(), bits);

        let bits = 0x7FF8_0000_0000_0001u64;
        let raw = bits.to_le_bytes();
        let field = Field::new(WireType::Fixed64, 0, &raw);
        assert_eq!(field.as_double().to_bits(), bits);
    }

    #[test]
    fn test_string_and_bytes() {
        let field = Field::new(WireType::Len, 0, b"testing");
        assert_eq!(field.as_string(), "testing");
        assert_eq!(field.as_bytes(), b"testing");
        assert!(matches!(field.as_string(), Cow::Borrowed(_)));
    }

    #[test]
    fn test_string_invalid_utf8_is_replaced() {
        let field = Field::new(WireType::Len, 0, &[0x68, 0x69, 0xFF]);
        assert_eq!(field.as_string(), "hi\u{FFFD}");
    }

    #[test]
    fn test_message_wrapper() {
        // field 1, varint, 150
        let pb = [0x08, 0x96, 0x01];
        let root = Field::message(&pb);
        assert_eq!(root.wire_type(), WireType::Len);
        assert_eq!(root.get_one(&[1]).as_int32(), 150);
    }
}
