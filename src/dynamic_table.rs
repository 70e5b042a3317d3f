//! Provides the per-connection [RFC 7541 §2.3.2] dynamic header table.
//!
//! The dynamic table is a bounded FIFO of recently seen header fields,
//! addressed alongside the static table through a single combined index
//! space: indexes `1..=61` name a [`crate::static_table`] entry, indexes
//! `62` and up name a dynamic table entry, with `62` always denoting the
//! most recently inserted one.
//!
//! Internally the table is a [`VecDeque`], which already behaves as the
//! growable ring buffer RFC 7541 implementations traditionally hand-roll:
//! newest entries are pushed to the front, and eviction pops from the back.
//! Exact- and name-only lookups are served in O(1) by a fingerprint index
//! keyed on monotonically increasing insertion ordinals (see
//! [`DynamicTable::lookup`] for how an ordinal is translated back to a live
//! combined index).
//!
//! [RFC 7541 §2.3.2]: https://tools.ietf.org/html/rfc7541#section-2.3.2

use std::collections::{HashMap, VecDeque};

use crate::header_field::HeaderField;
use crate::static_table::STATIC_TABLE_LEN;

/// The default maximum dynamic table size, in RFC-cost units, used when a
/// new [`crate::Encoder`] is not given an explicit value.
pub const DEFAULT_MAX_SIZE: u32 = 4096;

/// The first combined index handed out to dynamic table entries.
pub const DYNAMIC_TABLE_BASE_INDEX: u32 = STATIC_TABLE_LEN as u32 + 1;

/// Fingerprint key: a header name, optionally paired with a value. The
/// `None` value variant records a name-only insertion ordinal.
type FingerprintKey = (Vec<u8>, Option<Vec<u8>>);

/// The result of probing the dynamic table for a header pair.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DynamicLookup {
    /// Combined index of an entry matching both name and value.
    pub exact: Option<u32>,
    /// Combined index of an entry matching the name with any value.
    pub name_only: Option<u32>,
}

/// A bounded, per-connection FIFO of recently encoded header fields.
#[derive(Debug)]
pub struct DynamicTable {
    /// Newest entry at the front, oldest at the back.
    entries: VecDeque<HeaderField>,
    /// Sum of `HeaderField::len()` for every entry currently stored.
    size: usize,
    /// The configured cap, in RFC-cost units.
    max_size: u32,
    /// Fingerprint index from `(name, value?)` to insertion ordinal.
    fingerprints: HashMap<FingerprintKey, u64>,
    /// Total number of entries ever successfully inserted. The most recent
    /// entry, if any, carries ordinal `next_ordinal - 1`.
    next_ordinal: u64,
}

impl DynamicTable {
    /// Builds an empty dynamic table with the given maximum size.
    pub fn new(max_size: u32) -> Self {
        Self {
            entries: VecDeque::new(),
            size: 0,
            max_size,
            fingerprints: HashMap::new(),
            next_ordinal: 0,
        }
    }

    /// The number of entries currently stored.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table currently holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The sum of RFC-cost lengths of all entries currently stored.
    pub fn size(&self) -> usize {
        self.size
    }

    /// The configured maximum size, in RFC-cost units.
    pub fn max_size(&self) -> u32 {
        self.max_size
    }

    /// Returns the `(name, value)` pair stored at combined index `index`,
    /// which must be `>= 62`. Returns `None` if the index does not
    /// currently resolve to a live entry.
    pub fn get(&self, index: u32) -> Option<(&[u8], &[u8])> {
        if index < DYNAMIC_TABLE_BASE_INDEX {
            return None;
        }
        let offset = (index - DYNAMIC_TABLE_BASE_INDEX) as usize;
        self.entries
            .get(offset)
            .map(|entry| (entry.name.as_slice(), entry.value.as_slice()))
    }

    /// Looks up `name` (and, if present, `value`) among entries currently
    /// stored, using the O(1) fingerprint index.
    pub fn lookup(&self, name: &[u8], value: Option<&[u8]>) -> DynamicLookup {
        let name_key: FingerprintKey = (name.to_vec(), None);
        let name_only = self
            .fingerprints
            .get(&name_key)
            .and_then(|&ordinal| self.combined_index_for_ordinal(ordinal));

        let exact = value.and_then(|value| {
            let exact_key: FingerprintKey = (name.to_vec(), Some(value.to_vec()));
            self.fingerprints
                .get(&exact_key)
                .and_then(|&ordinal| self.combined_index_for_ordinal(ordinal))
        });

        DynamicLookup { exact, name_only }
    }

    /// Translates a fingerprint's insertion ordinal into its current combined
    /// index, or `None` if the entry it named has since been evicted.
    ///
    /// Ordinals are handed out sequentially to entries that are actually
    /// stored (a discarded too-large insert, see [`DynamicTable::insert`],
    /// never consumes one), so the most recent entry always carries ordinal
    /// `next_ordinal - 1` and sits at combined index 62; walking back one
    /// ordinal always walks back exactly one position.
    fn combined_index_for_ordinal(&self, ordinal: u64) -> Option<u32> {
        if self.entries.is_empty() {
            return None;
        }
        let newest_ordinal = self.next_ordinal - 1;
        let position = newest_ordinal.checked_sub(ordinal)?;
        if position as usize >= self.entries.len() {
            return None; // evicted
        }
        Some(DYNAMIC_TABLE_BASE_INDEX + position as u32)
    }

    /// Inserts `(name, value)` at the head of the table, evicting from the
    /// tail until there is room.
    ///
    /// If the entry's own RFC-cost exceeds `max_size`, the eviction loop ends
    /// up emptying the table entirely and the entry is discarded without
    /// being stored, per [RFC 7541 §4.4]. This never fails: there is no
    /// error to report for an entry that legitimately cannot fit.
    ///
    /// [RFC 7541 §4.4]: https://tools.ietf.org/html/rfc7541#section-4.4
    pub fn insert(&mut self, name: Vec<u8>, value: Vec<u8>) {
        let entry = HeaderField::new(name, value);
        let entry_len = entry.len();

        while self.size + entry_len > self.max_size as usize && !self.entries.is_empty() {
            self.evict_oldest();
        }

        if entry_len > self.max_size as usize {
            log::debug!(
                "discarding dynamic table entry of {} bytes; exceeds max_size {}",
                entry_len,
                self.max_size
            );
            return;
        }

        let ordinal = self.next_ordinal;
        self.fingerprints
            .insert((entry.name.clone(), Some(entry.value.clone())), ordinal);
        self.fingerprints.insert((entry.name.clone(), None), ordinal);
        self.size += entry_len;
        self.entries.push_front(entry);
        self.next_ordinal += 1;

        log::trace!(
            "inserted dynamic table entry ordinal={} size={} table_size={}",
            ordinal,
            entry_len,
            self.size
        );
    }

    /// Evicts the oldest (tail) entry, purging its fingerprints if they
    /// still point at it.
    fn evict_oldest(&mut self) {
        let len = self.entries.len();
        if len == 0 {
            return;
        }
        let newest_ordinal = self.next_ordinal - 1;
        let oldest_ordinal = newest_ordinal - (len as u64 - 1);

        let oldest = match self.entries.pop_back() {
            Some(entry) => entry,
            None => return,
        };
        self.size -= oldest.len();

        let exact_key: FingerprintKey = (oldest.name.clone(), Some(oldest.value.clone()));
        if self.fingerprints.get(&exact_key) == Some(&oldest_ordinal) {
            self.fingerprints.remove(&exact_key);
        }
        let name_key: FingerprintKey = (oldest.name.clone(), None);
        if self.fingerprints.get(&name_key) == Some(&oldest_ordinal) {
            self.fingerprints.remove(&name_key);
        }

        log::trace!(
            "evicted dynamic table entry ordinal={} size={}",
            oldest_ordinal,
            oldest.len()
        );
    }

    /// Changes the table's maximum size.
    ///
    /// Growing the cap reserves extra ring-buffer capacity up front (the RFC
    /// guideline is `new_max / 32` entries, assuming average-sized fields)
    /// but never evicts, since `size <= old_max_size <= new_max` already
    /// holds. Shrinking runs the ordinary eviction loop to restore
    /// `size <= new_max`.
    pub fn resize(&mut self, new_max: u32) {
        if new_max > self.max_size {
            let target_capacity = (new_max / HeaderField::ENTRY_OVERHEAD as u32) as usize;
            if target_capacity > self.entries.capacity() {
                self.entries.reserve(target_capacity - self.entries.capacity());
            }
        }

        self.max_size = new_max;
        while self.size > self.max_size as usize {
            self.evict_oldest();
        }

        log::debug!("resized dynamic table max_size={}", new_max);
    }
}

impl Default for DynamicTable {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SIZE)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    /// Should assign combined index 62 to the first insert, and keep 62
    /// pointed at the most recently inserted entry.
    #[test]
    fn newest_entry_is_always_index_62() {
        let mut table = DynamicTable::default();
        table.insert(b"a".to_vec(), b"1".to_vec());
        assert_eq!(table.lookup(b"a", Some(b"1")).exact, Some(62));

        table.insert(b"b".to_vec(), b"2".to_vec());
        assert_eq!(table.lookup(b"b", Some(b"2")).exact, Some(62));
        assert_eq!(table.lookup(b"a", Some(b"1")).exact, Some(63));
    }

    /// Should resolve a name-only lookup even when no value matches.
    #[test]
    fn resolves_name_only_lookup() {
        let mut table = DynamicTable::default();
        table.insert(b"x-custom".to_vec(), b"one".to_vec());
        let result = table.lookup(b"x-custom", Some(b"two"));
        assert_eq!(result.exact, None);
        assert_eq!(result.name_only, Some(62));
    }

    /// Should evict from the tail (oldest) first, and should keep the
    /// invariant `size <= max_size` after every insert.
    #[test]
    fn evicts_oldest_entries_first() {
        let mut table = DynamicTable::new(/* room for exactly two 33-byte entries + slack */ 76);
        table.insert(b"a".to_vec(), b"a".to_vec()); // 1+1+32 = 34
        table.insert(b"b".to_vec(), b"b".to_vec()); // +34 = 68 <= 76
        assert_eq!(table.len(), 2);

        table.insert(b"c".to_vec(), b"c".to_vec()); // needs 34, evict "a"
        assert_eq!(table.len(), 2);
        assert!(table.size() <= table.max_size() as usize);
        assert_eq!(table.lookup(b"a", Some(b"a")).exact, None); // evicted
        assert_eq!(table.lookup(b"b", Some(b"b")).exact, Some(63));
        assert_eq!(table.lookup(b"c", Some(b"c")).exact, Some(62));
    }

    /// An entry whose own cost exceeds `max_size` must empty the table and
    /// be discarded, per RFC 7541 §4.4.
    #[test]
    fn oversized_entry_empties_table_and_is_discarded() {
        let mut table = DynamicTable::new(64);
        table.insert(b"a".to_vec(), b"a".to_vec());
        assert_eq!(table.len(), 1);

        let huge_value = vec![0u8; 128];
        table.insert(b"big".to_vec(), huge_value);
        assert_eq!(table.len(), 0);
        assert_eq!(table.size(), 0);
    }

    /// A newer insert of the same name must not be invalidated when an
    /// older insert of that name is evicted (the conditional purge rule).
    #[test]
    fn newer_insert_survives_eviction_of_older_same_name_entry() {
        // Small table: only two ~35-byte entries fit.
        let mut table = DynamicTable::new(76);
        table.insert(b"foo".to_vec(), b"bar".to_vec()); // 3+3+32=38
        table.insert(b"bar".to_vec(), b"foo".to_vec()); // 38, total 76
        assert_eq!(table.len(), 2);

        // Evicts "foo"/"bar" (the oldest), while referencing "foo" by name.
        table.insert(b"foo".to_vec(), b"baz".to_vec());
        assert_eq!(table.len(), 2);
        assert_eq!(table.lookup(b"foo", Some(b"baz")).exact, Some(62));
        assert_eq!(table.lookup(b"foo", None).name_only, Some(62));
    }

    /// `Get` should translate a combined index back into the stored pair.
    #[test]
    fn gets_entry_by_combined_index() {
        let mut table = DynamicTable::default();
        table.insert(b"name".to_vec(), b"value".to_vec());
        assert_eq!(table.get(62), Some((b"name".as_slice(), b"value".as_slice())));
        assert_eq!(table.get(63), None);
        assert_eq!(table.get(0), None);
    }

    /// Shrinking the maximum size must evict down to the new cap.
    #[test]
    fn resize_down_evicts_to_fit() {
        let mut table = DynamicTable::new(4096);
        table.insert(b"a".to_vec(), b"a".to_vec());
        table.insert(b"b".to_vec(), b"b".to_vec());
        assert_eq!(table.len(), 2);

        table.resize(34); // room for exactly one entry
        assert_eq!(table.len(), 1);
        assert!(table.size() <= 34);
    }

    /// Growing the maximum size must not evict anything.
    #[test]
    fn resize_up_does_not_evict() {
        let mut table = DynamicTable::new(64);
        table.insert(b"a".to_vec(), b"a".to_vec());
        table.resize(4096);
        assert_eq!(table.len(), 1);
        assert_eq!(table.max_size(), 4096);
    }

    /// Resizing to zero must evict every entry.
    #[test]
    fn resize_to_zero_empties_table() {
        let mut table = DynamicTable::default();
        table.insert(b"a".to_vec(), b"a".to_vec());
        table.resize(0);
        assert_eq!(table.len(), 0);
        assert_eq!(table.size(), 0);
    }
}
