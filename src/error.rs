//! Provides the error types returned by the encoder and its dynamic table.

use thiserror::Error;

/// Represents an error that can occur while encoding a header field or while
/// mutating the encoder's dynamic table.
///
/// None of these errors corrupt the encoder's state: every variant is
/// returned before any byte is committed to the destination buffer and before
/// any table mutation takes effect, except where the operation's own
/// documentation says otherwise (e.g. [`DynamicTable::insert`] never fails;
/// it silently empties the table per RFC 7541 §4.4 instead).
///
/// [`DynamicTable::insert`]: crate::DynamicTable::insert
#[derive(Error, Debug, PartialEq, Eq, Clone)]
#[non_exhaustive]
pub enum EncoderError {
    /// A character string contained a byte outside the ASCII range (`>= 0x80`)
    /// where the caller required `only_ascii` encoding.
    #[error("header string contains a non-ASCII byte")]
    InvalidCharEncoding,

    /// The caller set a dynamic table size greater than the maximum allowed
    /// by the encoder (RFC 7541 §6.3).
    #[error("dynamic table size update exceeds the encoder's configured maximum")]
    SizeUpdateExceedsMax,

    /// The destination buffer was too small to hold even a single header of a
    /// non-empty header list, and the caller asked to be notified rather than
    /// silently stall.
    #[error("destination buffer is too small to make any encoding progress")]
    EncodingFailure,

    /// A combined index (see [`crate::static_table`] and [`crate::DynamicTable`])
    /// did not resolve to a live static or dynamic table entry.
    #[error("index {0} does not resolve to a live table entry")]
    InvalidIndex(u32),

    /// The combined length of a multi-value string literal, including
    /// separators, overflows the length type used by the wire format.
    #[error("combined string length overflows the HPACK length prefix")]
    IntegerOverflow,
}
