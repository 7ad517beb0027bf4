// src/merge/keyed.rs
//! The one dedup-and-sort path used for every keyed list in a report.

use std::cmp::Ordering;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

/// An entry in a usage-count table.
pub trait Counted: Clone {
    /// Name used to break ties between equal counts.
    fn label(&self) -> &str;
    fn count(&self) -> u64;
    fn add_count(&mut self, n: u64);
}

/// Merges two lists by key, combining entries that share a key, then sorts.
///
/// Entries are visited left first, then right. The first entry for a key is
/// cloned in; later entries with the same key are folded in with `combine`.
/// Neither input is modified.
pub fn merge_keyed_with<T, K, F, M, C>(
    left: &[T],
    right: &[T],
    key_of: F,
    mut combine: M,
    compare: C,
) -> Vec<T>
where
    T: Clone,
    K: Ord,
    F: Fn(&T) -> K,
    M: FnMut(&mut T, &T),
    C: Fn(&T, &T) -> Ordering,
{
    let mut merged: BTreeMap<K, T> = BTreeMap::new();
    for item in left.iter().chain(right) {
        match merged.entry(key_of(item)) {
            Entry::Occupied(mut slot) => combine(slot.get_mut(), item),
            Entry::Vacant(slot) => {
                slot.insert(item.clone());
            }
        }
    }
    let mut out: Vec<T> = merged.into_values().collect();
    out.sort_by(compare);
    out
}

/// Merges two lists by key; on collision the right-hand entry wins.
pub fn merge_keyed<T, K, F, C>(left: &[T], right: &[T], key_of: F, compare: C) -> Vec<T>
where
    T: Clone,
    K: Ord,
    F: Fn(&T) -> K,
    C: Fn(&T, &T) -> Ordering,
{
    merge_keyed_with(left, right, key_of, |existing, item| existing.clone_from(item), compare)
}

/// Merges count tables: counts for a shared key are summed, the result is
/// ordered by descending count then name, and truncated to `cap` if given.
pub fn merge_counted<T, K, F>(left: &[T], right: &[T], key_of: F, cap: Option<usize>) -> Vec<T>
where
    T: Counted,
    K: Ord,
    F: Fn(&T) -> K,
{
    let mut out = merge_keyed_with(
        left,
        right,
        key_of,
        |existing, item| existing.add_count(item.count()),
        |a, b| b.count().cmp(&a.count()).then_with(|| a.label().cmp(b.label())),
    );
    if let Some(cap) = cap {
        out.truncate(cap);
    }
    out
}
