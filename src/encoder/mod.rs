//! Provides an implementation of the [HPACK] encoder.
//!
//! The encoder performs the task of data compression. It converts header
//! pairs into an optimized octet sequence by applying the representations
//! defined in the [HPACK] specification.
//!
//! * [Integer representation] defines the rules for encoding integer numbers
//! (see [`crate::integer`]). Integers are used to represent name indexes,
//! header field indexes and character string lengths.
//!
//! * [String literal representation] defines the rules for encoding string
//! literals (see [`crate::string`]). This crate only ever emits the
//! non-Huffman form of a string literal.
//!
//! * [Indexed header field representation] represents fully indexed headers.
//! Since both the header name and value are stored in the indexing table,
//! only the index number is encoded.
//!
//! * [Literal header field representation] defines headers that are not or
//! only partially indexed. If the header field name matches an entry stored
//! in the static or dynamic table, the name can be represented by the index
//! of that entry; otherwise the name is represented as a string literal.
//! Header values are always represented as a string literal.
//!
//! * [Dynamic table size update] defines the rule for signaling changes in
//! the size of the dynamic table.
//!
//! Every function here follows a single contract: it returns `(written,
//! ok)`. When `ok` is `false`, `written` is always `0` and the destination
//! buffer and the encoder's own state are left completely untouched - the
//! caller is free to grow the buffer and retry without having to rewind
//! anything.
//!
//! [HPACK]: https://tools.ietf.org/html/rfc7541
//! [Integer representation]: https://tools.ietf.org/html/rfc7541#section-5.1
//! [String literal representation]: https://tools.ietf.org/html/rfc7541#section-5.2
//! [Indexed header field representation]: https://tools.ietf.org/html/rfc7541#section-6.1
//! [Literal header field representation]: https://tools.ietf.org/html/rfc7541#section-6.2
//! [Dynamic table size update]: https://tools.ietf.org/html/rfc7541#section-6.3

pub mod input;

pub use input::EncoderInput;

use crate::dynamic_table::DynamicTable;
use crate::error::EncoderError;
use crate::integer::{encode_integer, encoded_len};
use crate::static_table::{self, STATIC_TABLE_LEN};
use crate::status::{self, StatusRepresentation};
use crate::string::{
    encode_multi_value_string, encode_string, multi_value_encoded_len, string_encoded_len,
    validate_ascii, StringOptions,
};

/// Result of probing both the static and the dynamic table for a header
/// pair, as returned by [`Encoder::lookup`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Lookup {
    /// Combined index of an entry matching both name and value.
    pub exact: Option<u32>,
    /// Combined index of an entry matching the name with any value.
    pub name_only: Option<u32>,
}

/// Provides the encoding engine for HTTP/2 headers.
///
/// One encoder instance serves one HTTP/2 connection direction; it is not
/// safe to share a single instance across concurrent writers, since every
/// indexing representation mutates the dynamic table.
#[derive(Debug)]
pub struct Encoder {
    dynamic_table: DynamicTable,
    max_dynamic_table_size: u32,
    pending_size_update: Option<u32>,
}

impl Encoder {
    /// Returns a new encoder whose dynamic table is capped at
    /// `max_dynamic_table_size` RFC-cost units.
    pub fn new(max_dynamic_table_size: u32) -> Self {
        Self {
            dynamic_table: DynamicTable::new(max_dynamic_table_size),
            max_dynamic_table_size,
            pending_size_update: None,
        }
    }

    /// The encoder's configured maximum dynamic table size.
    pub fn max_dynamic_table_size(&self) -> u32 {
        self.max_dynamic_table_size
    }

    /// A read-only view of the dynamic table, for callers inspecting
    /// encoder state (e.g. tests, diagnostics).
    pub fn dynamic_table(&self) -> &DynamicTable {
        &self.dynamic_table
    }

    /// Looks up `name` (and, if present, `value`) across both the static and
    /// the dynamic table. Static hits are preferred over dynamic ones when
    /// both resolve an `exact` or `name_only` match, since static indexes
    /// never expire.
    pub fn lookup(&self, name: &[u8], value: Option<&[u8]>) -> Lookup {
        let static_hit = static_table::lookup(name, value);
        let dynamic_hit = self.dynamic_table.lookup(name, value);
        Lookup {
            exact: static_hit.exact.or(dynamic_hit.exact),
            name_only: static_hit.name_only.or(dynamic_hit.name_only),
        }
    }

    /// Returns the name stored at combined `index`, or `None` if the index
    /// does not currently resolve to a live static or dynamic entry.
    fn entry_name(&self, index: u32) -> Option<Vec<u8>> {
        if index == 0 {
            return None;
        }
        if index as usize <= STATIC_TABLE_LEN {
            static_table::get(index).map(|(name, _)| name.to_vec())
        } else {
            self.dynamic_table.get(index).map(|(name, _)| name.to_vec())
        }
    }

    /// Representation #1: [Indexed Header Field] (`1xxxxxxx`).
    ///
    /// ```txt
    ///   0   1   2   3   4   5   6   7
    /// +---+---+---+---+---+---+---+---+
    /// | 1 |        Index (7+)         |
    /// +---+---------------------------+
    /// ```
    ///
    /// Fails with [`EncoderError::InvalidIndex`] if `index` does not
    /// currently resolve to a static or dynamic table entry.
    ///
    /// [Indexed Header Field]: https://tools.ietf.org/html/rfc7541#section-6.1
    pub fn encode_indexed_header_field(
        &self,
        index: u32,
        dst: &mut [u8],
    ) -> Result<(usize, bool), EncoderError> {
        if self.entry_name(index).is_none() {
            return Err(EncoderError::InvalidIndex(index));
        }

        let total = encoded_len(index, 7);
        if dst.len() < total {
            return Ok((0, false));
        }

        dst[0] = 0x80;
        let (written, ok) = encode_integer(index, 7, &mut dst[..total]);
        debug_assert!(ok && written == total);
        Ok((total, true))
    }

    /// Representation #2 (private): [Literal Header Field with Incremental
    /// Indexing, Indexed Name] (`01xxxxxx`). On success, `(name_at(index),
    /// value)` is inserted into the dynamic table.
    ///
    /// ```txt
    ///   0   1   2   3   4   5   6   7
    /// +---+---+---+---+---+---+---+---+
    /// | 0 | 1 |      Index (6+)       |
    /// +---+---+-----------------------+
    /// | H |     Value Length (7+)     |
    /// +---+---------------------------+
    /// | Value String (Length octets)  |
    /// +-------------------------------+
    /// ```
    ///
    /// [Literal Header Field with Incremental Indexing, Indexed Name]: https://tools.ietf.org/html/rfc7541#section-6.2.1
    fn encode_literal_incremental_indexed_name(
        &mut self,
        index: u32,
        value: &[u8],
        dst: &mut [u8],
    ) -> Result<(usize, bool), EncoderError> {
        let name = self.entry_name(index).ok_or(EncoderError::InvalidIndex(index))?;

        let prefix_len = encoded_len(index, 6);
        let total = prefix_len + string_encoded_len(value);
        if dst.len() < total {
            return Ok((0, false));
        }

        dst[0] = 0x40;
        let (n, ok) = encode_integer(index, 6, &mut dst[..prefix_len]);
        debug_assert!(ok && n == prefix_len);
        let (n, ok) = encode_string(value, StringOptions::NONE, &mut dst[prefix_len..total])?;
        debug_assert!(ok && prefix_len + n == total);

        self.dynamic_table.insert(name, value.to_vec());
        Ok((total, true))
    }

    /// Representation #3 (private): [Literal Header Field with Incremental
    /// Indexing, New Name] (`01000000`). On success, `(name, value)` is
    /// inserted into the dynamic table.
    ///
    /// ```txt
    ///   0   1   2   3   4   5   6   7
    /// +---+---+---+---+---+---+---+---+
    /// | 0 | 1 |           0           |
    /// +---+---+-----------------------+
    /// | H |     Name Length (7+)      |
    /// +---+---------------------------+
    /// |  Name String (Length octets)  |
    /// +---+---------------------------+
    /// | H |     Value Length (7+)     |
    /// +---+---------------------------+
    /// | Value String (Length octets)  |
    /// +-------------------------------+
    /// ```
    ///
    /// [Literal Header Field with Incremental Indexing, New Name]: https://tools.ietf.org/html/rfc7541#section-6.2.1
    fn encode_literal_incremental_new_name(
        &mut self,
        name: &[u8],
        value: &[u8],
        dst: &mut [u8],
    ) -> Result<(usize, bool), EncoderError> {
        validate_ascii(name)?;

        let name_len = string_encoded_len(name);
        let value_len = string_encoded_len(value);
        let total = 1 + name_len + value_len;
        if dst.len() < total {
            return Ok((0, false));
        }

        dst[0] = 0x40;
        let (n, ok) = encode_string(name, StringOptions::NAME, &mut dst[1..1 + name_len])?;
        debug_assert!(ok && n == name_len);
        let value_start = 1 + name_len;
        let (n, ok) = encode_string(value, StringOptions::NONE, &mut dst[value_start..total])?;
        debug_assert!(ok && n == value_len);

        let stored_name = name.to_ascii_lowercase();
        self.dynamic_table.insert(stored_name, value.to_vec());
        Ok((total, true))
    }

    /// Representation #4: [Literal Header Field without Indexing, Indexed
    /// Name] (`0000xxxx`). The dynamic table is never touched.
    ///
    /// ```txt
    ///   0   1   2   3   4   5   6   7
    /// +---+---+---+---+---+---+---+---+
    /// | 0 | 0 | 0 | 0 |  Index (4+)   |
    /// +---+---+-----------------------+
    /// | H |     Value Length (7+)     |
    /// +---+---------------------------+
    /// | Value String (Length octets)  |
    /// +-------------------------------+
    /// ```
    ///
    /// [Literal Header Field without Indexing, Indexed Name]: https://tools.ietf.org/html/rfc7541#section-6.2.2
    pub fn encode_literal_header_field_without_indexing(
        &self,
        index: u32,
        value: &[u8],
        dst: &mut [u8],
    ) -> Result<(usize, bool), EncoderError> {
        if self.entry_name(index).is_none() {
            return Err(EncoderError::InvalidIndex(index));
        }

        let prefix_len = encoded_len(index, 4);
        let total = prefix_len + string_encoded_len(value);
        if dst.len() < total {
            return Ok((0, false));
        }

        dst[0] = 0x00;
        let (n, ok) = encode_integer(index, 4, &mut dst[..prefix_len]);
        debug_assert!(ok && n == prefix_len);
        let (n, ok) = encode_string(value, StringOptions::NONE, &mut dst[prefix_len..total])?;
        debug_assert!(ok && prefix_len + n == total);

        Ok((total, true))
    }

    /// Representation #5: [Literal Header Field without Indexing, New Name]
    /// (`00000000`), joining `values` into a single value string with
    /// `separator`. The dynamic table is never touched.
    ///
    /// ```txt
    ///   0   1   2   3   4   5   6   7
    /// +---+---+---+---+---+---+---+---+
    /// | 0 | 0 | 0 | 0 |       0       |
    /// +---+---+-----------------------+
    /// | H |     Name Length (7+)      |
    /// +---+---------------------------+
    /// |  Name String (Length octets)  |
    /// +---+---------------------------+
    /// | H |     Value Length (7+)     |
    /// +---+---------------------------+
    /// | Value String (Length octets)  |
    /// +-------------------------------+
    /// ```
    ///
    /// [Literal Header Field without Indexing, New Name]: https://tools.ietf.org/html/rfc7541#section-6.2.2
    pub fn encode_literal_header_field_without_indexing_new_name(
        &self,
        name: &[u8],
        values: &[&[u8]],
        separator: u8,
        dst: &mut [u8],
    ) -> Result<(usize, bool), EncoderError> {
        validate_ascii(name)?;

        let name_len = string_encoded_len(name);
        let value_len = multi_value_encoded_len(values)?;
        let total = 1 + name_len + value_len;
        if dst.len() < total {
            return Ok((0, false));
        }

        dst[0] = 0x00;
        let (n, ok) = encode_string(name, StringOptions::NAME, &mut dst[1..1 + name_len])?;
        debug_assert!(ok && n == name_len);
        let value_start = 1 + name_len;
        let (n, ok) =
            encode_multi_value_string(values, separator, &mut dst[value_start..total])?;
        debug_assert!(ok && n == value_len);

        Ok((total, true))
    }

    /// Dispatches a header pair to whichever of representations #1, #2 or #3
    /// fits the result of [`Encoder::lookup`]: `exact` hits are encoded as
    /// representation #1, `name_only` hits as #2 (with an insert), and a
    /// complete miss as #3 (with an insert).
    ///
    /// This is the primary entry point for headers that should participate
    /// in dynamic table indexing; sensitive or non-cacheable headers should
    /// instead call representation #4/#5 directly.
    pub fn encode_literal_field(
        &mut self,
        name: &[u8],
        value: &[u8],
        dst: &mut [u8],
    ) -> Result<(usize, bool), EncoderError> {
        let lookup = self.lookup(name, Some(value));
        match lookup {
            Lookup { exact: Some(index), .. } => self.encode_indexed_header_field(index, dst),
            Lookup { name_only: Some(index), .. } => {
                self.encode_literal_incremental_indexed_name(index, value, dst)
            }
            Lookup { exact: None, name_only: None } => {
                self.encode_literal_incremental_new_name(name, value, dst)
            }
        }
    }

    /// Sets the encoder's view of the dynamic table's maximum size, to be
    /// communicated to the peer via [`Encoder::write_headers_begin`].
    ///
    /// Fails with [`EncoderError::SizeUpdateExceedsMax`] if `new_size`
    /// exceeds the cap this encoder was constructed with. Multiple calls
    /// before the next flush collapse to the smallest value requested; an
    /// increase that follows a pending reduction is a no-op until a smaller
    /// value arrives, per [RFC 7541 §4.2].
    ///
    /// [RFC 7541 §4.2]: https://tools.ietf.org/html/rfc7541#section-4.2
    pub fn set_dynamic_header_table_size(&mut self, new_size: u32) -> Result<(), EncoderError> {
        if new_size > self.max_dynamic_table_size {
            return Err(EncoderError::SizeUpdateExceedsMax);
        }

        let should_update = match self.pending_size_update {
            None => true,
            Some(pending) => new_size < pending,
        };
        if should_update {
            self.pending_size_update = Some(new_size);
            self.dynamic_table.resize(new_size);
        }

        Ok(())
    }

    /// Representation #6: [Dynamic Table Size Update] (`001xxxxx`). Flushes
    /// a pending [`Encoder::set_dynamic_header_table_size`] call as the
    /// first bytes of a header block; a no-op (returns `(0, true)`) if
    /// nothing is pending.
    ///
    /// ```txt
    ///   0   1   2   3   4   5   6   7
    /// +---+---+---+---+---+---+---+---+
    /// | 0 | 0 | 1 |   Max size (5+)   |
    /// +---+---------------------------+
    /// ```
    ///
    /// [Dynamic Table Size Update]: https://tools.ietf.org/html/rfc7541#section-6.3
    pub fn write_headers_begin(&mut self, dst: &mut [u8]) -> Result<(usize, bool), EncoderError> {
        let size = match self.pending_size_update {
            None => return Ok((0, true)),
            Some(size) => size,
        };

        let total = encoded_len(size, 5);
        if dst.len() < total {
            return Ok((0, false));
        }

        dst[0] = 0x20;
        let (written, ok) = encode_integer(size, 5, &mut dst[..total]);
        debug_assert!(ok && written == total);

        self.pending_size_update = None;
        Ok((total, true))
    }

    /// Encodes a numeric HTTP `:status` response pseudo-header through the
    /// fast path of [`crate::status`]: one of the seven well-known codes is
    /// emitted as representation #1 against its dedicated static index;
    /// anything else is emitted as representation #4 against the `:status`
    /// name index (8), with the decimal digits as the value. Never touches
    /// the dynamic table.
    pub fn encode_status(&self, status: u16, dst: &mut [u8]) -> Result<(usize, bool), EncoderError> {
        match status::resolve(status) {
            StatusRepresentation::Indexed(index) => self.encode_indexed_header_field(index, dst),
            StatusRepresentation::Literal(name_index) => {
                let mut digits = [0u8; 5];
                let n = status::write_decimal(status, &mut digits);
                self.encode_literal_header_field_without_indexing(name_index, &digits[..n], dst)
            }
        }
    }

    /// Encodes a whole header block: flushes a pending size update via
    /// [`Encoder::write_headers_begin`], then writes as many of `headers` as
    /// fit into the rest of `dst`, stopping at the first one that doesn't.
    ///
    /// Returns the number of headers fully written. Fails with
    /// [`EncoderError::EncodingFailure`] if the prelude itself doesn't fit,
    /// or if `headers` is non-empty and not even its first entry fits after
    /// the prelude - the bounded-progress guarantee described for `Encode`'s
    /// resumable state machine. A caller that receives `Ok(n)` with `n <
    /// headers.len()` should provide a fresh buffer and call again with the
    /// remaining slice; the prelude is already flushed by then, so the retry
    /// is a pure body continuation.
    pub fn write_headers_begin_and_body(
        &mut self,
        headers: &[(&[u8], &[u8])],
        dst: &mut [u8],
    ) -> Result<usize, EncoderError> {
        let (prelude_written, ok) = self.write_headers_begin(dst)?;
        if !ok {
            return Err(EncoderError::EncodingFailure);
        }

        let mut pos = prelude_written;
        let mut count = 0;
        for (name, value) in headers {
            let (written, ok) = self.encode_literal_field(name, value, &mut dst[pos..])?;
            if !ok {
                if count == 0 {
                    return Err(EncoderError::EncodingFailure);
                }
                break;
            }
            pos += written;
            count += 1;
        }

        Ok(count)
    }

    /// Encodes a string literal through the same path representations #3/#5
    /// use for names and values, exposed directly for callers that just need
    /// a bare string (e.g. hand-assembling a representation this crate does
    /// not otherwise model).
    pub fn encode_string_literal(
        &self,
        value: &[u8],
        opts: StringOptions,
        dst: &mut [u8],
    ) -> Result<(usize, bool), EncoderError> {
        encode_string(value, opts, dst)
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new(crate::dynamic_table::DEFAULT_MAX_SIZE)
    }
}
