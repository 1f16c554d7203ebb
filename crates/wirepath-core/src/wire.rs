//! Low-level protobuf wire format primitives.
//!
//! Stateless helpers that consume one tag or one scalar primitive from the
//! head of a byte slice, reporting the number of bytes consumed.
//!
//! ## Wire Format Overview
//!
//! Each protobuf field is encoded as:
//! - A varint "tag" containing the field number and wire type
//! - The field data (format depends on wire type)
//!
//! Wire types:
//! - 0: VARINT (int32, int64, uint32, uint64, sint32, sint64, bool, enum)
//! - 1: I64 (fixed64, sfixed64, double)
//! - 2: LEN (string, bytes, embedded messages, packed repeated fields)
//! - 3: SGROUP (deprecated group start, tag-only marker)
//! - 4: EGROUP (deprecated group end, tag-only marker)
//! - 5: I32 (fixed32, sfixed32, float)

use crate::error::{Error, Result};

/// Protobuf wire types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i8)]
pub enum WireType {
    /// Variable-length integer
    Varint = 0,
    /// 64-bit fixed-width
    Fixed64 = 1,
    /// Length-delimited (strings, bytes, embedded messages)
    Len = 2,
    /// Start group (deprecated)
    StartGroup = 3,
    /// End group (deprecated)
    EndGroup = 4,
    /// 32-bit fixed-width
    Fixed32 = 5,
    /// Sentinel for the "not found" field; never appears on the wire
    Invalid = -1,
}

impl TryFrom<u8> for WireType {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(WireType::Varint),
            1 => Ok(WireType::Fixed64),
            2 => Ok(WireType::Len),
            3 => Ok(WireType::StartGroup),
            4 => Ok(WireType::EndGroup),
            5 => Ok(WireType::Fixed32),
            _ => Err(Error::unknown_wire_type(value)),
        }
    }
}

/// Maximum valid protobuf field number (2^29 - 1)
pub const MAX_FIELD_NUMBER: u32 = 536_870_911;

/// Decode a varint from the given bytes.
///
/// Returns the decoded value and the number of bytes consumed.
pub fn decode_varint(data: &[u8]) -> Result<(u64, usize)> {
    let mut result: u64 = 0;
    let mut shift = 0;

    for (i, &byte) in data.iter().enumerate() {
        if i >= 10 {
            // Varints are at most 10 bytes for a 64-bit value
            return Err(Error::varint_decode(i));
        }

        result |= ((byte & 0x7F) as u64) << shift;
        shift += 7;

        if byte & 0x80 == 0 {
            return Ok((result, i + 1));
        }
    }

    Err(Error::varint_decode(data.len()))
}

/// Decode the leading tag of a field.
///
/// Returns the field number, the wire type, and the number of bytes consumed.
/// The field number is validated against `[1, MAX_FIELD_NUMBER]` and the wire
/// type against the six values known to the format.
pub fn consume_tag(data: &[u8]) -> Result<(u32, WireType, usize)> {
    let (tag, tag_len) = decode_varint(data)?;

    let wire_type = WireType::try_from((tag & 0x07) as u8)?;
    let number = tag >> 3;
    if number == 0 || number > u64::from(MAX_FIELD_NUMBER) {
        return Err(Error::invalid_field_number(number));
    }

    Ok((number as u32, wire_type, tag_len))
}

/// Decode a little-endian fixed 32-bit value.
///
/// Returns the value and the number of bytes consumed (always 4 on success).
pub fn consume_fixed32(data: &[u8]) -> Result<(u32, usize)> {
    match data.first_chunk::<4>() {
        Some(bytes) => Ok((u32::from_le_bytes(*bytes), 4)),
        None => Err(Error::invalid_length(0, "not enough bytes for fixed32")),
    }
}

/// Decode a little-endian fixed 64-bit value.
///
/// Returns the value and the number of bytes consumed (always 8 on success).
pub fn consume_fixed64(data: &[u8]) -> Result<(u64, usize)> {
    match data.first_chunk::<8>() {
        Some(bytes) => Ok((u64::from_le_bytes(*bytes), 8)),
        None => Err(Error::invalid_length(0, "not enough bytes for fixed64")),
    }
}

/// Decode a zigzag-encoded value (`sint32` / `sint64` on the wire).
pub fn decode_zigzag(value: u64) -> i64 {
    ((value >> 1) as i64) ^ -((value & 1) as i64)
}

/// Encode a signed value with zigzag encoding, the inverse of
/// [`decode_zigzag`].
pub fn encode_zigzag(value: i64) -> u64 {
    ((value << 1) ^ (value >> 63)) as u64
}

/// Decode a varint as a boolean: any nonzero value is `true`.
pub fn decode_bool(value: u64) -> bool {
    value != 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_varint_single_byte() {
        let data = [0x08]; // Value 8
        let (value, len) = decode_varint(&data).unwrap();
        assert_eq!(value, 8);
        assert_eq!(len, 1);
    }

    #[test]
    fn test_decode_varint_multi_byte() {
        let data = [0xAC, 0x02]; // Value 300
        let (value, len) = decode_varint(&data).unwrap();
        assert_eq!(value, 300);
        assert_eq!(len, 2);
    }

    #[test]
    fn test_decode_varint_max() {
        // Maximum 64-bit varint (all 1s)
        let data = [0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x01];
        let (value, len) = decode_varint(&data).unwrap();
        assert_eq!(value, u64::MAX);
        assert_eq!(len, 10);
    }

    #[test]
    fn test_decode_varint_truncated() {
        // Continuation bit set on the final byte
        let data = [0xFF, 0xFF];
        assert!(matches!(
            decode_varint(&data),
            Err(Error::VarintDecode { offset: 2 })
        ));
    }

    #[test]
    fn test_decode_varint_too_long() {
        let data = [0xFF; 11];
        assert!(decode_varint(&data).is_err());
    }

    #[test]
    fn test_wire_type_conversion() {
        assert_eq!(WireType::try_from(0).unwrap(), WireType::Varint);
        assert_eq!(WireType::try_from(1).unwrap(), WireType::Fixed64);
        assert_eq!(WireType::try_from(2).unwrap(), WireType::Len);
        assert_eq!(WireType::try_from(3).unwrap(), WireType::StartGroup);
        assert_eq!(WireType::try_from(4).unwrap(), WireType::EndGroup);
        assert_eq!(WireType::try_from(5).unwrap(), WireType::Fixed32);
        assert!(matches!(
            WireType::try_from(7),
            Err(Error::UnknownWireType { wire_type: 7 })
        ));
    }

    #[test]
    fn test_consume_tag() {
        // Field 1, wire type 0 (varint)
        let data = [0x08, 0x96, 0x01];
        let (number, wire_type, len) = consume_tag(&data).unwrap();
        assert_eq!(number, 1);
        assert_eq!(wire_type, WireType::Varint);
        assert_eq!(len, 1);
    }

    #[test]
    fn test_consume_tag_multi_byte() {
        // Field 70, wire type 3 (start group): (70 << 3) | 3 = 563
        let data = [0xB3, 0x04];
        let (number, wire_type, len) = consume_tag(&data).unwrap();
        assert_eq!(number, 70);
        assert_eq!(wire_type, WireType::StartGroup);
        assert_eq!(len, 2);
    }

    #[test]
    fn test_consume_tag_invalid_field_number() {
        // Field 0 is invalid
        let data = [0x00, 0x01];
        assert!(matches!(
            consume_tag(&data),
            Err(Error::InvalidFieldNumber { number: 0, .. })
        ));
    }

    #[test]
    fn test_consume_tag_unknown_wire_type() {
        // Field 1, wire type 7
        let data = [0x0F];
        assert!(matches!(
            consume_tag(&data),
            Err(Error::UnknownWireType { wire_type: 7 })
        ));
    }

    #[test]
    fn test_consume_fixed32() {
        let data = [0x01, 0x02, 0x03, 0x04, 0xFF];
        let (value, len) = consume_fixed32(&data).unwrap();
        assert_eq!(value, 0x04030201);
        assert_eq!(len, 4);
        assert!(consume_fixed32(&data[2..5]).is_err());
    }

    #[test]
    fn test_consume_fixed64() {
        let data = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08];
        let (value, len) = consume_fixed64(&data).unwrap();
        assert_eq!(value, 0x0807060504030201);
        assert_eq!(len, 8);
        assert!(consume_fixed64(&data[1..]).is_err());
    }

    #[test]
    fn test_zigzag_round_trip() {
        for value in [0i64, -1, 1, -2, 2, i32::MAX as i64, i32::MIN as i64, i64::MAX, i64::MIN] {
            assert_eq!(decode_zigzag(encode_zigzag(value)), value, "value {value}");
        }
        // Known pairs from the wire format documentation
        assert_eq!(encode_zigzag(0), 0);
        assert_eq!(encode_zigzag(-1), 1);
        assert_eq!(encode_zigzag(1), 2);
        assert_eq!(encode_zigzag(-2), 3);
    }

    #[test]
    fn test_decode_bool() {
        assert!(!decode_bool(0));
        assert!(decode_bool(1));
        assert!(decode_bool(2));
        assert!(decode_bool(u64::MAX));
    }
}
