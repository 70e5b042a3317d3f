//! Provides the immutable [RFC 7541 Appendix A] static table of well-known
//! header pairs.
//!
//! The static table never changes at runtime; it is compiled into the crate
//! and shared by every [`crate::Encoder`] instance. Indexes `1..=61` always
//! refer to it; indexes `62` and above fall through to the caller's
//! [`crate::DynamicTable`].
//!
//! [RFC 7541 Appendix A]: https://tools.ietf.org/html/rfc7541#appendix-A

use lazy_static::lazy_static;
use std::collections::HashMap;

/// The number of entries in the static table. Also the first combined index
/// ([`crate::DynamicTable`]'s entries start at `STATIC_TABLE_LEN + 1`).
pub const STATIC_TABLE_LEN: usize = 61;

/// The static table's 61 `(name, value)` pairs, in RFC 7541 Appendix A order
/// (1-based; `STATIC_TABLE[0]` is entry index `1`).
pub static STATIC_TABLE: [(&str, &str); STATIC_TABLE_LEN] = [
    (":authority", ""),
    (":method", "GET"),
    (":method", "POST"),
    (":path", "/"),
    (":path", "/index.html"),
    (":scheme", "http"),
    (":scheme", "https"),
    (":status", "200"),
    (":status", "204"),
    (":status", "206"),
    (":status", "304"),
    (":status", "400"),
    (":status", "404"),
    (":status", "500"),
    ("accept-charset", ""),
    ("accept-encoding", "gzip, deflate"),
    ("accept-language", ""),
    ("accept-ranges", ""),
    ("accept", ""),
    ("access-control-allow-origin", ""),
    ("age", ""),
    ("allow", ""),
    ("authorization", ""),
    ("cache-control", ""),
    ("content-disposition", ""),
    ("content-encoding", ""),
    ("content-language", ""),
    ("content-length", ""),
    ("content-location", ""),
    ("content-range", ""),
    ("content-type", ""),
    ("cookie", ""),
    ("date", ""),
    ("etag", ""),
    ("expect", ""),
    ("expires", ""),
    ("from", ""),
    ("host", ""),
    ("if-match", ""),
    ("if-modified-since", ""),
    ("if-none-match", ""),
    ("if-range", ""),
    ("if-unmodified-since", ""),
    ("last-modified", ""),
    ("link", ""),
    ("location", ""),
    ("max-forwards", ""),
    ("proxy-authenticate", ""),
    ("proxy-authorization", ""),
    ("range", ""),
    ("referer", ""),
    ("refresh", ""),
    ("retry-after", ""),
    ("server", ""),
    ("set-cookie", ""),
    ("strict-transport-security", ""),
    ("transfer-encoding", ""),
    ("user-agent", ""),
    ("vary", ""),
    ("via", ""),
    ("www-authenticate", ""),
];

/// Fast path mapping from a well-known numeric HTTP status code to its
/// `:status` static table index, used by [`crate::status`].
pub static STATUS_CODE_INDEX: [(u16, u32); 7] = [
    (200, 8),
    (204, 9),
    (206, 10),
    (304, 11),
    (400, 12),
    (404, 13),
    (500, 14),
];

/// The static table index of the `:status` name, used as the indexed-name
/// fallback when the status code is not one of the seven well-known values.
pub const STATUS_NAME_INDEX: u32 = 8;

lazy_static! {
    /// Inverted index from a lower-cased header name to the lowest static
    /// table index that carries it, used to resolve name-only hits.
    static ref NAME_INDEX: HashMap<&'static str, u32> = {
        let mut map = HashMap::with_capacity(STATIC_TABLE_LEN);
        for (i, (name, _)) in STATIC_TABLE.iter().enumerate() {
            map.entry(*name).or_insert((i + 1) as u32);
        }
        map
    };

    /// Inverted index from a lower-cased `(name, value)` pair to its exact
    /// static table index.
    static ref EXACT_INDEX: HashMap<(&'static str, &'static str), u32> = {
        let mut map = HashMap::with_capacity(STATIC_TABLE_LEN);
        for (i, (name, value)) in STATIC_TABLE.iter().enumerate() {
            map.insert((*name, *value), (i + 1) as u32);
        }
        map
    };
}

/// The result of probing the static table for a header pair.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StaticLookup {
    /// Index of an entry matching both name and value.
    pub exact: Option<u32>,
    /// Index of an entry matching the name with any value.
    pub name_only: Option<u32>,
}

/// Returns the `(name, value)` pair stored at the given 1-based static table
/// `index`, or `None` if the index is out of range.
pub fn get(index: u32) -> Option<(&'static [u8], &'static [u8])> {
    if index == 0 {
        return None;
    }
    STATIC_TABLE
        .get((index - 1) as usize)
        .map(|(name, value)| (name.as_bytes(), value.as_bytes()))
}

/// Looks up `name` (and, if present, `value`) in the static table.
///
/// `name` is matched case-sensitively against the static table's already
/// lower-case entries; callers that may hold mixed-case names should
/// lower-case before calling, the same way [`crate::Encoder`] does for
/// literal names it emits.
pub fn lookup(name: &[u8], value: Option<&[u8]>) -> StaticLookup {
    let name = match std::str::from_utf8(name) {
        Ok(name) => name,
        Err(_) => return StaticLookup::default(),
    };

    let mut result = StaticLookup {
        exact: None,
        name_only: NAME_INDEX.get(name).copied(),
    };

    if let Some(value) = value {
        if let Ok(value) = std::str::from_utf8(value) {
            result.exact = EXACT_INDEX.get(&(name, value)).copied();
        }
    }

    result
}

#[cfg(test)]
mod test {
    use super::*;

    /// Should resolve combined indexes 1 and 61 to the first and last static
    /// table entries.
    #[test]
    fn gets_entries_by_index() {
        assert_eq!(get(1), Some((b":authority".as_slice(), b"".as_slice())));
        assert_eq!(
            get(61),
            Some((b"www-authenticate".as_slice(), b"".as_slice()))
        );
    }

    /// Should reject index 0 and indexes beyond the table.
    #[test]
    fn rejects_out_of_range_index() {
        assert_eq!(get(0), None);
        assert_eq!(get(62), None);
    }

    /// Should find an exact match for a well-known pair.
    #[test]
    fn finds_exact_match() {
        let result = lookup(b":method", Some(b"GET"));
        assert_eq!(result.exact, Some(2));
        assert_eq!(result.name_only, Some(2));
    }

    /// Should find only a name-only match when the value differs, and should
    /// resolve to the first occurrence of that name.
    #[test]
    fn finds_name_only_match() {
        let result = lookup(b":method", Some(b"PATCH"));
        assert_eq!(result.exact, None);
        assert_eq!(result.name_only, Some(2));
    }

    /// Should find nothing for an unknown name.
    #[test]
    fn finds_nothing_for_unknown_name() {
        let result = lookup(b"x-custom", Some(b"value"));
        assert_eq!(result.exact, None);
        assert_eq!(result.name_only, None);
    }

    /// Should expose the seven well-known status fast-path indexes.
    #[test]
    fn status_code_index_matches_rfc_assignment() {
        assert_eq!(STATUS_CODE_INDEX.len(), 7);
        assert!(STATUS_CODE_INDEX.contains(&(200, 8)));
        assert!(STATUS_CODE_INDEX.contains(&(500, 14)));
    }
}
