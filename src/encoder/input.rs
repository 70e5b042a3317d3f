//! Provides an ergonomic call-shape layered on top of [`super::Encoder`]'s
//! primary buffer-oriented methods, for callers that already hold owned or
//! borrowed `(name, value)` tuples and would rather not name a method
//! explicitly.
//!
//! This is sugar only: every variant here drives one of the primitives
//! [`super::Encoder`] exposes directly, and the `written`/`ok` buffer
//! contract is unchanged.

use crate::error::EncoderError;

use super::Encoder;

/// Input accepted by [`Encoder::encode`].
#[derive(Debug)]
pub enum EncoderInput<'a> {
    /// A fully indexed header field ([`Encoder::encode_indexed_header_field`]).
    Indexed(u32),

    /// A header whose name is represented by an index and whose value is
    /// supplied in bytes, encoded without touching the dynamic table
    /// ([`Encoder::encode_literal_header_field_without_indexing`]).
    IndexedValueOwned(u32, Vec<u8>),
    IndexedValueBorrowed(u32, &'a [u8]),

    /// A header whose name and value are both supplied in bytes, encoded
    /// through the full lookup-and-index dispatch
    /// ([`Encoder::encode_literal_field`]).
    LiteralOwned(Vec<u8>, Vec<u8>),
    LiteralBorrowed(&'a [u8], &'a [u8]),
}

impl<'a> From<u32> for EncoderInput<'a> {
    fn from(index: u32) -> Self {
        EncoderInput::Indexed(index)
    }
}

impl<'a> From<(u32, Vec<u8>)> for EncoderInput<'a> {
    fn from(field: (u32, Vec<u8>)) -> Self {
        EncoderInput::IndexedValueOwned(field.0, field.1)
    }
}

impl<'a> From<(u32, &'a [u8])> for EncoderInput<'a> {
    fn from(field: (u32, &'a [u8])) -> Self {
        EncoderInput::IndexedValueBorrowed(field.0, field.1)
    }
}

impl<'a> From<(Vec<u8>, Vec<u8>)> for EncoderInput<'a> {
    fn from(field: (Vec<u8>, Vec<u8>)) -> Self {
        EncoderInput::LiteralOwned(field.0, field.1)
    }
}

impl<'a> From<(&'a [u8], &'a [u8])> for EncoderInput<'a> {
    fn from(field: (&'a [u8], &'a [u8])) -> Self {
        EncoderInput::LiteralBorrowed(field.0, field.1)
    }
}

impl Encoder {
    /// Encodes any [`EncoderInput`]-convertible field into `dst`.
    ///
    /// **Example:**
    ///
    /// ```rust
    /// use hpack_codec::Encoder;
    ///
    /// let mut encoder = Encoder::default();
    /// let mut dst = [0u8; 32];
    /// let (written, ok) = encoder.encode((b":method".as_slice(), b"PATCH".as_slice()), &mut dst).unwrap();
    /// assert!(ok);
    /// assert!(written > 0);
    /// ```
    pub fn encode<'a, F>(&mut self, field: F, dst: &mut [u8]) -> Result<(usize, bool), EncoderError>
    where
        F: Into<EncoderInput<'a>>,
    {
        match field.into() {
            EncoderInput::Indexed(index) => self.encode_indexed_header_field(index, dst),
            EncoderInput::IndexedValueOwned(index, value) => {
                self.encode_literal_header_field_without_indexing(index, &value, dst)
            }
            EncoderInput::IndexedValueBorrowed(index, value) => {
                self.encode_literal_header_field_without_indexing(index, value, dst)
            }
            EncoderInput::LiteralOwned(name, value) => {
                self.encode_literal_field(&name, &value, dst)
            }
            EncoderInput::LiteralBorrowed(name, value) => self.encode_literal_field(name, value, dst),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    /// Should dispatch a bare index through the indexed representation.
    #[test]
    fn dispatches_indexed() {
        let mut encoder = Encoder::default();
        let mut dst = [0u8; 8];
        let (written, ok) = encoder.encode(2u32, &mut dst).unwrap();
        assert!(ok);
        assert_eq!(&dst[..written], &[0x80 | 2]);
    }

    /// Should dispatch an (index, value) tuple through the no-indexing
    /// representation, leaving the dynamic table untouched.
    #[test]
    fn dispatches_indexed_value_without_indexing() {
        let mut encoder = Encoder::default();
        let mut dst = [0u8; 16];
        let (written, ok) = encoder
            .encode((13u32, b"PATCH".to_vec()), &mut dst)
            .unwrap();
        assert!(ok);
        assert_eq!(dst[0], 13);
        assert_eq!(&dst[1..written], &[0x05, b'P', b'A', b'T', b'C', b'H']);
        assert_eq!(encoder.dynamic_table().len(), 0);
    }

    /// Should dispatch a (name, value) tuple through the full lookup path,
    /// inserting into the dynamic table on a miss.
    #[test]
    fn dispatches_literal_through_lookup() {
        let mut encoder = Encoder::default();
        let mut dst = [0u8; 32];
        let (written, ok) = encoder
            .encode((b"x-custom".to_vec(), b"value".to_vec()), &mut dst)
            .unwrap();
        assert!(ok);
        assert!(written > 0);
        assert_eq!(encoder.dynamic_table().len(), 1);
    }
}
