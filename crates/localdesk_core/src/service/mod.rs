//! Widget components: in-memory record lists written through to storage.
//!
//! # Responsibility
//! - Own each widget's list, form state and view toggles.
//! - Apply every mutation to storage first and mirror it in memory only
//!   after the write commits.
//!
//! # Invariants
//! - A failed write leaves the list and form untouched and is returned to
//!   the caller.
//! - Components share no domain state; each instance owns its own.

use std::collections::BTreeMap;

pub mod contact_manager;
pub mod task_manager;

/// Differences between a component's memory and its record store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation<K> {
    /// Keys held in memory with no stored record.
    pub memory_only: Vec<K>,
    /// Keys stored but missing from memory.
    pub store_only: Vec<K>,
    /// Keys present in both layers whose fields differ.
    pub diverged: Vec<K>,
}

impl<K> Reconciliation<K> {
    /// Returns whether memory and storage held the same records.
    pub fn is_consistent(&self) -> bool {
        self.memory_only.is_empty() && self.store_only.is_empty() && self.diverged.is_empty()
    }
}

pub(crate) fn diff_records<T, K>(
    memory: &[T],
    stored: &[T],
    key_of: impl Fn(&T) -> K,
) -> Reconciliation<K>
where
    T: PartialEq,
    K: Ord + Copy,
{
    let stored_by_key: BTreeMap<K, &T> = stored.iter().map(|item| (key_of(item), item)).collect();
    let memory_by_key: BTreeMap<K, &T> = memory.iter().map(|item| (key_of(item), item)).collect();

    let mut memory_only = Vec::new();
    let mut diverged = Vec::new();
    for (key, item) in &memory_by_key {
        match stored_by_key.get(key) {
            None => memory_only.push(*key),
            Some(stored_item) if *stored_item != *item => diverged.push(*key),
            Some(_) => {}
        }
    }

    let store_only = stored_by_key
        .keys()
        .filter(|key| !memory_by_key.contains_key(*key))
        .copied()
        .collect();

    Reconciliation {
        memory_only,
        store_only,
        diverged,
    }
}
