//! Field-by-field scanning and path resolution over the wire format.
//!
//! This module implements the traversal engine: a streaming scanner that
//! walks a length-delimited region one field at a time, and a depth-first
//! path resolver that drives the scanner recursively along a sequence of
//! field numbers.
//!
//! ## Algorithm Overview
//!
//! 1. [`scan_fields`] consumes one tag, then the payload its wire type
//!    implies, and hands every occurrence of the requested field number to a
//!    sink callback
//! 2. [`get_iter`] descends into each match at every level of the path but
//!    the last, and forwards terminal matches to the caller's sink
//! 3. [`get_one`] and [`get_all`] are thin sinks over [`get_iter`]
//!
//! Sinks return `true` to continue and `false` to stop; the sink is a
//! `&mut dyn FnMut` so the resolver can hand the same walker to every level
//! of the recursion without allocating.
//!
//! Fields whose number does not match are consumed and discarded, which
//! keeps a single-field lookup linear in the message length no matter how
//! many siblings it skips over.

use tracing::trace;

use crate::error::{Error, Result};
use crate::field::Field;
use crate::wire::{self, WireType};

/// Scans `pb` from the start, delivering every field numbered `number` to
/// `sink` until the region is exhausted or the sink returns `false`.
///
/// Returns the number of bytes consumed. Fields with other numbers are
/// consumed and skipped. A group field is scanned recursively until its
/// closing tag; the delivered payload covers the inner fields, exclusive of
/// both group tags. End-group tags surface to the sink (group scans use them
/// to detect the end of the body) but their tag bytes never count towards
/// the total, so a group body length is exactly the bytes between the two
/// tags.
///
/// Errors abort the scan; the offset carried by the error is the number of
/// bytes consumed when the problem was found.
pub fn scan_fields<'a>(
    pb: &'a [u8],
    number: u32,
    sink: &mut dyn FnMut(Field<'a>) -> bool,
) -> Result<usize> {
    let mut buf = pb;
    let mut consumed = 0usize;

    // Fields are not required to arrive in number order, walk all of them
    while !buf.is_empty() {
        let (field_number, wire_type, tag_len) =
            wire::consume_tag(buf).map_err(|err| match err {
                Error::UnknownWireType { .. } | Error::InvalidFieldNumber { .. } => err,
                _ => Error::invalid_length(consumed, "failed to decode field tag"),
            })?;
        buf = &buf[tag_len..];
        consumed += tag_len;

        let field = match wire_type {
            WireType::Varint => {
                let (value, n) = wire::decode_varint(buf)
                    .map_err(|_| Error::invalid_length(consumed, "truncated varint value"))?;
                let field = Field::new(WireType::Varint, value, &buf[..n]);
                buf = &buf[n..];
                consumed += n;
                field
            }
            WireType::Fixed32 => {
                if buf.len() < 4 {
                    return Err(Error::invalid_length(
                        consumed,
                        "not enough bytes for fixed32",
                    ));
                }
                let field = Field::new(WireType::Fixed32, 0, &buf[..4]);
                buf = &buf[4..];
                consumed += 4;
                field
            }
            WireType::Fixed64 => {
                if buf.len() < 8 {
                    return Err(Error::invalid_length(
                        consumed,
                        "not enough bytes for fixed64",
                    ));
                }
                let field = Field::new(WireType::Fixed64, 0, &buf[..8]);
                buf = &buf[8..];
                consumed += 8;
                field
            }
            WireType::Len => {
                let (declared, n) = wire::decode_varint(buf)
                    .map_err(|_| Error::invalid_length(consumed, "truncated length prefix"))?;
                buf = &buf[n..];
                consumed += n;
                let len = usize::try_from(declared)
                    .ok()
                    .filter(|&len| len <= buf.len())
                    .ok_or_else(|| {
                        Error::invalid_length(
                            consumed,
                            format!(
                                "declared length {declared} exceeds remaining {}",
                                buf.len()
                            ),
                        )
                    })?;
                let field = Field::new(WireType::Len, 0, &buf[..len]);
                buf = &buf[len..];
                consumed += len;
                field
            }
            WireType::StartGroup => {
                trace!("scanning group field {} at offset {}", field_number, consumed);
                // Groups carry no length prefix: recover the body length by
                // scanning forward until the matching end-group tag shows up
                let mut closed = false;
                let body_len = scan_fields(buf, field_number, &mut |field| {
                    if field.wire_type() == WireType::EndGroup {
                        closed = true;
                        return false;
                    }
                    true
                })?;
                if !closed {
                    return Err(Error::end_group_not_found(field_number, consumed));
                }
                let field = Field::new(WireType::StartGroup, 0, &buf[..body_len]);
                buf = &buf[body_len..];
                consumed += body_len;
                // Skip the closing tag; the inner scan stopped right before
                // it and already verified its number and wire type
                let (_, _, end_len) = wire::consume_tag(buf).map_err(|_| {
                    Error::invalid_length(consumed, "failed to decode end group tag")
                })?;
                buf = &buf[end_len..];
                consumed += end_len;
                field
            }
            WireType::EndGroup => {
                // Surfaced to group scans so they can stop; the tag bytes do
                // not count towards the body length
                consumed -= tag_len;
                Field::new(WireType::EndGroup, 0, &[])
            }
            WireType::Invalid => {
                unreachable!("consume_tag never yields the invalid sentinel")
            }
        };

        if field_number != number {
            // Not the field we are after, keep walking
            continue;
        }
        if !sink(field) {
            return Ok(consumed);
        }
    }

    Ok(consumed)
}

/// Shared state of one path resolution, handed down the recursion by
/// mutable reference. `skip` is sticky: once the terminal sink asks to stop
/// or a scan fails, every remaining sibling at every level is skipped.
struct PathWalker<'a, 'p, 's> {
    path: &'p [u32],
    depth: usize,
    skip: bool,
    err: Option<Error>,
    sink: &'s mut dyn FnMut(Field<'a>) -> bool,
}

impl<'a> PathWalker<'a, '_, '_> {
    fn visit(&mut self, field: Field<'a>) -> bool {
        if self.skip {
            return false;
        }
        if self.depth == self.path.len() - 1 {
            if !(self.sink)(field) {
                self.skip = true;
                return false;
            }
            return true;
        }
        // Not terminal yet: descend into the payload with the next number
        self.depth += 1;
        let number = self.path[self.depth];
        let scanned = scan_fields(field.raw(), number, &mut |field| self.visit(field));
        self.depth -= 1;
        if let Err(err) = scanned {
            self.err = Some(err);
            self.skip = true;
            return false;
        }
        true
    }
}

/// Resolves `path` against a serialized message, streaming every terminal
/// match into `sink` in byte order.
///
/// The resolver descends depth-first: each match at a non-terminal level is
/// entered immediately, before the next sibling at its own level is
/// examined. `sink` returning `false` stops the whole traversal, including
/// siblings at every outer level (first-match semantics).
///
/// Returns the first error hit anywhere in the traversal. An empty path
/// yields no matches.
pub fn get_iter<'a>(
    pb: &'a [u8],
    path: &[u32],
    sink: &mut dyn FnMut(Field<'a>) -> bool,
) -> Result<()> {
    let Some(&first) = path.first() else {
        return Ok(());
    };
    trace!("resolving path of {} numbers over {} bytes", path.len(), pb.len());

    let mut walker = PathWalker {
        path,
        depth: 0,
        skip: false,
        err: None,
        sink,
    };
    let scanned = scan_fields(pb, first, &mut |field| walker.visit(field));
    match walker.err {
        Some(err) => Err(err),
        None => scanned.map(|_| ()),
    }
}

/// Gets the first field matching `path`, or [`Field::INVALID`] if there is
/// none.
///
/// Allocates nothing. Malformed input is treated as "not found": callers
/// that need strict parsing use [`get_iter`] or [`get_all`].
///
/// When the field is repeated, the first occurrence is returned; a packed
/// repeated field comes back as one length-delimited frame, to be split
/// with [`Field::unpack`].
pub fn get_one<'a>(pb: &'a [u8], path: &[u32]) -> Field<'a> {
    let mut found = Field::INVALID;
    let _ = get_iter(pb, path, &mut |field| {
        found = field;
        false
    });
    found
}

/// Gets every field matching `path`, in byte order.
///
/// Unlike [`get_one`] this surfaces scan errors, and a malformed message
/// yields `Err` rather than whatever prefix happened to parse.
pub fn get_all<'a>(pb: &'a [u8], path: &[u32]) -> Result<Vec<Field<'a>>> {
    let mut results = Vec::new();
    get_iter(pb, path, &mut |field| {
        results.push(field);
        true
    })?;
    Ok(results)
}
