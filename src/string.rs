//! Provides an implementation of the [HPACK string literal representation].
//!
//! A string literal shares one wire form regardless of its content:
//!
//! ```txt
//!   0   1   2   3   4   5   6   7
//! +---+---+---+---+---+---+---+---+
//! | H |    String Length (7+)     |
//! +---+---------------------------+
//! |  String Data (Length octets)  |
//! +-------------------------------+
//! ```
//!
//! The `H` bit signals whether the data is Huffman-coded. This crate always
//! emits `H = 0`: Huffman coding is out of scope (see the crate-level
//! documentation), but the bit is reserved in the representation so a
//! decoder that does support it keeps interoperating.
//!
//! [HPACK string literal representation]: https://tools.ietf.org/html/rfc7541#section-5.2

use std::convert::TryInto;

use crate::error::EncoderError;
use crate::integer::{encode_integer, encoded_len};

/// Returns the total wire size (length prefix included) of `value` encoded
/// as a plain length-prefixed string literal, without writing anything.
///
/// Exposed to [`crate::encoder`] so representations that combine a string
/// with other fields (an index, another string) can precompute the whole
/// representation's size before writing the first byte, keeping the
/// representation atomic end to end.
pub(crate) fn string_encoded_len(value: &[u8]) -> usize {
    encoded_len(value.len() as u32, 7) + value.len()
}

/// Rejects any byte `>= 0x80` in `value`, matching the enforcement
/// [`encode_string`] applies when `opts.only_ascii` is set. Exposed so
/// [`crate::encoder`] can validate a name up front, before a combined
/// representation's total length is computed.
pub(crate) fn validate_ascii(value: &[u8]) -> Result<(), EncoderError> {
    if value.iter().any(|&b| b & 0x80 != 0) {
        return Err(EncoderError::InvalidCharEncoding);
    }
    Ok(())
}

/// Returns the total wire size of `values` joined by a one-byte separator as
/// a single length-prefixed string literal, or
/// [`EncoderError::IntegerOverflow`] if the combined length does not fit a
/// `u32`.
pub(crate) fn multi_value_encoded_len(values: &[&[u8]]) -> Result<usize, EncoderError> {
    let separator_count = values.len().saturating_sub(1);
    let mut body_len: usize = 0;
    for value in values {
        body_len = body_len
            .checked_add(value.len())
            .ok_or(EncoderError::IntegerOverflow)?;
    }
    body_len = body_len
        .checked_add(separator_count)
        .ok_or(EncoderError::IntegerOverflow)?;
    let body_len_u32: u32 = body_len
        .try_into()
        .map_err(|_| EncoderError::IntegerOverflow)?;
    Ok(encoded_len(body_len_u32, 7) + body_len)
}

/// Options controlling how [`encode_string`] transcodes a character string.
///
/// Both flags are no-ops for byte spans that are already in their final wire
/// form (`lowercase: false, only_ascii: false` copies the span verbatim).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StringOptions {
    /// Fold ASCII `A..Z` to `a..z` while copying.
    pub lowercase: bool,
    /// Reject any byte `>= 0x80` with [`EncoderError::InvalidCharEncoding`].
    pub only_ascii: bool,
}

impl StringOptions {
    /// No transcoding: the value is copied into the destination unchanged.
    pub const NONE: StringOptions = StringOptions {
        lowercase: false,
        only_ascii: false,
    };

    /// Lower-case folding with ASCII enforcement, the combination the
    /// encoder applies to literal header names (RFC 7541 requires header
    /// names to be lower-case on the wire).
    pub const NAME: StringOptions = StringOptions {
        lowercase: true,
        only_ascii: true,
    };
}

/// Encodes `value` as a length-prefixed HPACK string literal into `dst`.
///
/// Returns `Ok((written, true))` on success. Returns `Ok((0, false))` if
/// `dst` is too small - in that case `dst` is left completely unmodified.
/// Returns `Err(EncoderError::InvalidCharEncoding)` if `opts.only_ascii` is
/// set and `value` contains a byte `>= 0x80`; in that case too, `dst` is left
/// unmodified, since validation happens before any write.
///
/// The leading flag octet is always written with `H = 0` (non-Huffman); the
/// length prefix uses a 7-bit width, per [RFC 7541 §5.2].
///
/// **Example:**
///
/// ```rust
/// use hpack_codec::string::{encode_string, StringOptions};
///
/// let mut dst = [0u8; 16];
/// let (written, ok) = encode_string(b"value", StringOptions::NONE, &mut dst).unwrap();
/// assert!(ok);
/// assert_eq!(&dst[..written], &[0x05, b'v', b'a', b'l', b'u', b'e']);
/// ```
///
/// [RFC 7541 §5.2]: https://tools.ietf.org/html/rfc7541#section-5.2
pub fn encode_string(
    value: &[u8],
    opts: StringOptions,
    dst: &mut [u8],
) -> Result<(usize, bool), EncoderError> {
    if opts.only_ascii {
        validate_ascii(value)?;
    }

    let prefix_len = encoded_len(value.len() as u32, 7);
    let total = prefix_len + value.len();
    if dst.len() < total {
        return Ok((0, false));
    }

    dst[0] = 0x00; // H = 0
    let (n, ok) = encode_integer(value.len() as u32, 7, &mut dst[..prefix_len]);
    debug_assert!(ok && n == prefix_len);

    let body = &mut dst[prefix_len..total];
    if opts.lowercase {
        for (out, &b) in body.iter_mut().zip(value) {
            *out = b.to_ascii_lowercase();
        }
    } else {
        body.copy_from_slice(value);
    }

    Ok((total, true))
}

/// Encodes a sequence of `values` as a *single* length-prefixed HPACK string
/// literal, joining them with a literal `separator` byte.
///
/// This is used to emit comma- or semicolon-joined multi-value header fields
/// (e.g. repeated `Cookie` crumbs) as one literal instead of one repetition
/// per value. The total length is computed with checked arithmetic before any
/// byte is written, so an overflow is reported as
/// [`EncoderError::IntegerOverflow`] rather than silently truncating.
///
/// Neither `lowercase` nor `only_ascii` folding applies to the joined values
/// themselves - they are passed through as-is, matching how header values
/// are otherwise left untouched by this crate. The `separator` itself must
/// be an ASCII byte (`< 0x80`), rejected otherwise with
/// [`EncoderError::InvalidCharEncoding`].
pub fn encode_multi_value_string(
    values: &[&[u8]],
    separator: u8,
    dst: &mut [u8],
) -> Result<(usize, bool), EncoderError> {
    if separator >= 0x80 {
        return Err(EncoderError::InvalidCharEncoding);
    }

    let total = multi_value_encoded_len(values)?;
    let separator_count = values.len().saturating_sub(1);
    let body_len: usize = values.iter().map(|v| v.len()).sum::<usize>() + separator_count;
    let body_len_u32 = body_len as u32;
    let prefix_len = total - body_len;
    if dst.len() < total {
        return Ok((0, false));
    }

    dst[0] = 0x00; // H = 0
    let (n, ok) = encode_integer(body_len_u32, 7, &mut dst[..prefix_len]);
    debug_assert!(ok && n == prefix_len);

    let mut pos = prefix_len;
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            dst[pos] = separator;
            pos += 1;
        }
        dst[pos..pos + value.len()].copy_from_slice(value);
        pos += value.len();
    }

    Ok((total, true))
}

#[cfg(test)]
mod test {
    use super::*;

    /// Should encode a plain string literal with its length prefix.
    #[test]
    fn encodes_plain_string() {
        let mut dst = [0u8; 16];
        let (written, ok) = encode_string(b"value", StringOptions::NONE, &mut dst).unwrap();
        assert!(ok);
        assert_eq!(&dst[..written], &[0x05, 0x76, 0x61, 0x6c, 0x75, 0x65]);
    }

    /// Should fold ASCII uppercase to lowercase when requested, leaving
    /// non-letter bytes untouched.
    #[test]
    fn lowercases_when_requested() {
        let mut dst = [0u8; 16];
        let (written, ok) = encode_string(b"X-Custom-1", StringOptions::NAME, &mut dst).unwrap();
        assert!(ok);
        assert_eq!(&dst[1..written], b"x-custom-1");
    }

    /// Should reject a non-ASCII byte when `only_ascii` is set, without
    /// writing anything.
    #[test]
    fn rejects_non_ascii_when_required() {
        let mut dst = [0x42u8; 16];
        let err = encode_string(b"na\xC3\xAFve", StringOptions::NAME, &mut dst).unwrap_err();
        assert_eq!(err, EncoderError::InvalidCharEncoding);
        assert_eq!(dst, [0x42u8; 16]); // untouched
    }

    /// Should fail atomically when the buffer is too small for the body.
    #[test]
    fn fails_atomically_on_short_buffer() {
        let mut dst = [0x42u8; 3];
        let (written, ok) = encode_string(b"value", StringOptions::NONE, &mut dst).unwrap();
        assert!(!ok);
        assert_eq!(written, 0);
        assert_eq!(dst, [0x42, 0x42, 0x42]);
    }

    /// Should join multiple values into a single length-prefixed literal.
    #[test]
    fn joins_multiple_values_with_a_separator() {
        let mut dst = [0u8; 32];
        let values: [&[u8]; 2] = [b"first", b"second"];
        let (written, ok) = encode_multi_value_string(&values, b';', &mut dst).unwrap();
        assert!(ok);
        assert_eq!(
            &dst[..written],
            &[
                0x0c, b'f', b'i', b'r', b's', b't', b';', b's', b'e', b'c', b'o', b'n', b'd'
            ]
        );
    }

    /// Should reject a non-ASCII separator at the API boundary.
    #[test]
    fn rejects_non_ascii_separator() {
        let mut dst = [0u8; 32];
        let values: [&[u8]; 2] = [b"a", b"b"];
        let err = encode_multi_value_string(&values, 0xFF, &mut dst).unwrap_err();
        assert_eq!(err, EncoderError::InvalidCharEncoding);
    }

    /// Should encode a single value with no separator bytes at all.
    #[test]
    fn encodes_single_value_without_separator() {
        let mut dst = [0u8; 16];
        let values: [&[u8]; 1] = [b"solo"];
        let (written, ok) = encode_multi_value_string(&values, b',', &mut dst).unwrap();
        assert!(ok);
        assert_eq!(&dst[..written], &[0x04, b's', b'o', b'l', b'o']);
    }
}
