//! Copy-on-write collection operations with no-op preservation.
//!
//! Every function here is pure: it takes the current contents of a
//! collection-typed field and returns `Some(new_contents)` only when the
//! operation would change observable content, and `None` otherwise. Callers
//! (generated setters) translate `None` into returning a structurally
//! shared clone of the receiver, which is the load-bearing invariant for
//! structural-sharing consumers.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

// =============================================================================
// Arrays
// =============================================================================

/// Append a value. Always changes content.
pub fn array_push<T: Clone>(items: &[T], value: T) -> Option<Vec<T>> {
    let mut next = items.to_vec();
    next.push(value);
    Some(next)
}

/// Remove the last element. No-op on an empty array.
pub fn array_pop<T: Clone>(items: &[T]) -> Option<Vec<T>> {
    if items.is_empty() {
        return None;
    }
    Some(items[..items.len() - 1].to_vec())
}

/// Remove the first element. No-op on an empty array.
pub fn array_shift<T: Clone>(items: &[T]) -> Option<Vec<T>> {
    if items.is_empty() {
        return None;
    }
    Some(items[1..].to_vec())
}

/// Prepend a value. Always changes content.
pub fn array_unshift<T: Clone>(items: &[T], value: T) -> Option<Vec<T>> {
    let mut next = Vec::with_capacity(items.len() + 1);
    next.push(value);
    next.extend_from_slice(items);
    Some(next)
}

/// Replace `delete_count` elements starting at `start` with `insert`.
///
/// `start` is clamped to the array length and `delete_count` to the
/// remaining tail. No-op when the removed segment equals the inserted one.
pub fn array_splice<T: Clone + PartialEq>(
    items: &[T],
    start: usize,
    delete_count: usize,
    insert: &[T],
) -> Option<Vec<T>> {
    let start = start.min(items.len());
    let delete_count = delete_count.min(items.len() - start);

    if items[start..start + delete_count] == *insert {
        return None;
    }

    let mut next = Vec::with_capacity(items.len() - delete_count + insert.len());
    next.extend_from_slice(&items[..start]);
    next.extend_from_slice(insert);
    next.extend_from_slice(&items[start + delete_count..]);
    Some(next)
}

/// Stable sort by a comparator. No-op when already sorted.
pub fn array_sort_by<T, F>(items: &[T], mut compare: F) -> Option<Vec<T>>
where
    T: Clone + PartialEq,
    F: FnMut(&T, &T) -> Ordering,
{
    let mut next = items.to_vec();
    next.sort_by(&mut compare);
    if next == items {
        return None;
    }
    Some(next)
}

/// Reverse the array. No-op when the reversal is indistinguishable.
pub fn array_reverse<T: Clone + PartialEq>(items: &[T]) -> Option<Vec<T>> {
    let mut next = items.to_vec();
    next.reverse();
    if next == items {
        return None;
    }
    Some(next)
}

/// Fill `[start, end)` with `value`, indices clamped to the array length.
/// No-op when every targeted slot already equals `value`.
pub fn array_fill<T: Clone + PartialEq>(
    items: &[T],
    value: &T,
    start: usize,
    end: usize,
) -> Option<Vec<T>> {
    let start = start.min(items.len());
    let end = end.min(items.len());
    if start >= end || items[start..end].iter().all(|item| item == value) {
        return None;
    }

    let mut next = items.to_vec();
    for slot in &mut next[start..end] {
        *slot = value.clone();
    }
    Some(next)
}

/// Copy `[src_start, src_end)` to `dest`, clamped, without growing the
/// array. No-op when the destination already holds the copied content.
pub fn array_copy_within<T: Clone + PartialEq>(
    items: &[T],
    dest: usize,
    src_start: usize,
    src_end: usize,
) -> Option<Vec<T>> {
    let len = items.len();
    let dest = dest.min(len);
    let src_start = src_start.min(len);
    let src_end = src_end.max(src_start).min(len);
    let count = (src_end - src_start).min(len - dest);

    if count == 0 || items[src_start..src_start + count] == items[dest..dest + count] {
        return None;
    }

    let mut next = items.to_vec();
    let segment: Vec<T> = items[src_start..src_start + count].to_vec();
    next[dest..dest + count].clone_from_slice(&segment);
    Some(next)
}

// =============================================================================
// Maps
// =============================================================================

/// Insert or replace an entry. No-op when the key already maps to an equal
/// value.
pub fn map_insert<K, V>(entries: &BTreeMap<K, V>, key: K, value: V) -> Option<BTreeMap<K, V>>
where
    K: Ord + Clone,
    V: Clone + PartialEq,
{
    if entries.get(&key) == Some(&value) {
        return None;
    }
    let mut next = entries.clone();
    next.insert(key, value);
    Some(next)
}

/// Remove an entry. No-op when the key is absent.
pub fn map_remove<K, V>(entries: &BTreeMap<K, V>, key: &K) -> Option<BTreeMap<K, V>>
where
    K: Ord + Clone,
    V: Clone,
{
    if !entries.contains_key(key) {
        return None;
    }
    let mut next = entries.clone();
    next.remove(key);
    Some(next)
}

/// Remove every entry. No-op on an empty map.
pub fn map_clear<K, V>(entries: &BTreeMap<K, V>) -> Option<BTreeMap<K, V>>
where
    K: Ord,
{
    if entries.is_empty() {
        return None;
    }
    Some(BTreeMap::new())
}

/// Keep only entries matching the predicate. No-op when nothing is removed.
pub fn map_retain<K, V, F>(entries: &BTreeMap<K, V>, mut keep: F) -> Option<BTreeMap<K, V>>
where
    K: Ord + Clone,
    V: Clone,
    F: FnMut(&K, &V) -> bool,
{
    let next: BTreeMap<K, V> = entries
        .iter()
        .filter(|(k, v)| keep(k, v))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    if next.len() == entries.len() {
        return None;
    }
    Some(next)
}

/// Transform every value. No-op when every transformed value equals the
/// original.
pub fn map_values<K, V, F>(entries: &BTreeMap<K, V>, mut transform: F) -> Option<BTreeMap<K, V>>
where
    K: Ord + Clone,
    V: Clone + PartialEq,
    F: FnMut(&K, &V) -> V,
{
    let mut changed = false;
    let next: BTreeMap<K, V> = entries
        .iter()
        .map(|(k, v)| {
            let mapped = transform(k, v);
            if mapped != *v {
                changed = true;
            }
            (k.clone(), mapped)
        })
        .collect();
    if !changed {
        return None;
    }
    Some(next)
}

/// Merge entries from `other`, with `other` winning on conflicts. No-op
/// when every incoming entry is already present with an equal value.
pub fn map_merge<K, V>(entries: &BTreeMap<K, V>, other: &BTreeMap<K, V>) -> Option<BTreeMap<K, V>>
where
    K: Ord + Clone,
    V: Clone + PartialEq,
{
    let changed = other
        .iter()
        .any(|(k, v)| entries.get(k) != Some(v));
    if !changed {
        return None;
    }

    let mut next = entries.clone();
    for (k, v) in other {
        next.insert(k.clone(), v.clone());
    }
    Some(next)
}

/// Apply a transform to the value under `key`. No-op when the key is absent
/// or the transform returns an equal value.
pub fn map_update<K, V, F>(entries: &BTreeMap<K, V>, key: &K, transform: F) -> Option<BTreeMap<K, V>>
where
    K: Ord + Clone,
    V: Clone + PartialEq,
    F: FnOnce(&V) -> V,
{
    let current = entries.get(key)?;
    let updated = transform(current);
    if updated == *current {
        return None;
    }
    let mut next = entries.clone();
    next.insert(key.clone(), updated);
    Some(next)
}

// =============================================================================
// Sets
// =============================================================================

/// Insert a member. No-op when already present.
pub fn set_insert<T: Ord + Clone>(members: &BTreeSet<T>, value: T) -> Option<BTreeSet<T>> {
    if members.contains(&value) {
        return None;
    }
    let mut next = members.clone();
    next.insert(value);
    Some(next)
}

/// Remove a member. No-op when absent.
pub fn set_remove<T: Ord + Clone>(members: &BTreeSet<T>, value: &T) -> Option<BTreeSet<T>> {
    if !members.contains(value) {
        return None;
    }
    let mut next = members.clone();
    next.remove(value);
    Some(next)
}

/// Remove every member. No-op on an empty set.
pub fn set_clear<T: Ord>(members: &BTreeSet<T>) -> Option<BTreeSet<T>> {
    if members.is_empty() {
        return None;
    }
    Some(BTreeSet::new())
}

/// Keep only members matching the predicate. No-op when nothing is removed.
pub fn set_retain<T, F>(members: &BTreeSet<T>, mut keep: F) -> Option<BTreeSet<T>>
where
    T: Ord + Clone,
    F: FnMut(&T) -> bool,
{
    let next: BTreeSet<T> = members.iter().filter(|m| keep(m)).cloned().collect();
    if next.len() == members.len() {
        return None;
    }
    Some(next)
}

/// Transform every member. No-op when the transformed set equals the
/// original (the result may be smaller if the transform collides).
pub fn set_map<T, F>(members: &BTreeSet<T>, transform: F) -> Option<BTreeSet<T>>
where
    T: Ord + Clone,
    F: FnMut(&T) -> T,
{
    let next: BTreeSet<T> = members.iter().map(transform).collect();
    if next == *members {
        return None;
    }
    Some(next)
}

/// Add every member of `other`. No-op when `other` is a subset.
pub fn set_merge<T: Ord + Clone>(members: &BTreeSet<T>, other: &BTreeSet<T>) -> Option<BTreeSet<T>> {
    if other.is_subset(members) {
        return None;
    }
    let mut next = members.clone();
    next.extend(other.iter().cloned());
    Some(next)
}
