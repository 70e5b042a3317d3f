//! An implementation of [HPACK] (RFC 7541) header compression for HTTP/2.
//!
//! This crate provides the encoding half only: a stateful [`Encoder`] that
//! turns ordered `(name, value)` header pairs into the compact octet stream
//! HPACK defines, backed by the RFC's static table and a bounded, per
//! connection dynamic table.
//!
//! Every write returns `(written, ok)`. When `ok` is `false`, `written` is
//! always `0` and neither the destination buffer nor the encoder's state
//! changed - callers are free to grow the buffer and retry. No method here
//! allocates, with the single deliberate exception of [`alloc`].
//!
//! ```rust
//! use hpack_codec::Encoder;
//!
//! let mut encoder = Encoder::default();
//! let mut dst = [0u8; 32];
//!
//! let (written, ok) = encoder.encode_literal_field(b":method", b"GET", &mut dst).unwrap();
//! assert!(ok);
//! assert_eq!(&dst[..written], &[0x80 | 2]); // hits the static table
//! ```
//!
//! Decoding, Huffman coding, and HTTP/2 framing are out of scope; see the
//! crate's design notes for the reasoning.
//!
//! [HPACK]: https://tools.ietf.org/html/rfc7541

pub mod alloc;
pub mod dynamic_table;
pub mod encoder;
pub mod error;
pub mod header_field;
pub mod integer;
pub mod static_table;
pub mod status;
pub mod string;

pub use dynamic_table::DynamicTable;
pub use encoder::{Encoder, EncoderInput, Lookup};
pub use error::EncoderError;
pub use header_field::HeaderField;
pub use status::{resolve as resolve_status, StatusRepresentation};
