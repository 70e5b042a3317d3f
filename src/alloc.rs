//! Provides an allocating fallback for the rare literal that does not fit a
//! caller's stack scratch buffer (e.g. an unusually long header value).
//!
//! Every other primitive in this crate writes into a caller-supplied slice
//! and never allocates. This module is the one deliberate exception: it
//! retries encoding into an owned, exponentially growing [`Vec<u8>`] until
//! the representation fits, then trims the vector to the exact written
//! length. The growth strategy is only observable through allocation count,
//! never through the emitted bytes.

/// The smallest buffer [`encode_allocating`] starts with.
const MIN_CAPACITY: usize = 64;

/// Retries `encode` with a doubling buffer, starting at [`MIN_CAPACITY`],
/// until it reports success, then returns the written bytes trimmed to
/// their exact length.
///
/// `encode` must follow this crate's usual `(written, ok)` contract and must
/// not observe or depend on the buffer's capacity beyond its length.
///
/// **Example:**
///
/// ```rust
/// use hpack_codec::alloc::encode_allocating;
/// use hpack_codec::string::{encode_string, StringOptions};
///
/// let value = vec![b'a'; 1000];
/// let out = encode_allocating(|dst| encode_string(&value, StringOptions::NONE, dst)).unwrap();
/// assert_eq!(out.len(), 1 + 2 + 1000); // H+length prefix (2 octets) + payload
/// ```
pub fn encode_allocating<E, F>(mut encode: F) -> Result<Vec<u8>, E>
where
    F: FnMut(&mut [u8]) -> Result<(usize, bool), E>,
{
    let mut capacity = MIN_CAPACITY;
    loop {
        let mut buf = vec![0u8; capacity];
        let (written, ok) = encode(&mut buf)?;
        if ok {
            buf.truncate(written);
            return Ok(buf);
        }
        capacity = capacity
            .checked_mul(2)
            .expect("representation length cannot exceed usize::MAX");
    }
}
