//! Most-recent-first log with a fixed capacity.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Fixed-capacity, newest-first log.
///
/// [`push`](BoundedLog::push) inserts at the front and truncates to the
/// capacity on every write, so the oldest entries are evicted first and the
/// length never exceeds the capacity.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundedLog<T> {
    entries: VecDeque<T>,
    capacity: usize,
}

impl<T> BoundedLog<T> {
    /// Create an empty log. A zero capacity is bumped to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Rebuild a log from stored entries (newest first), dropping any
    /// overflow past the capacity.
    pub fn from_entries(entries: Vec<T>, capacity: usize) -> Self {
        let mut log = Self::new(capacity);
        log.entries = entries.into();
        log.entries.truncate(log.capacity);
        log
    }

    /// Insert `entry` as the newest element.
    pub fn push(&mut self, entry: T) {
        self.entries.push_front(entry);
        self.entries.truncate(self.capacity);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Entries, newest first.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }

    /// Consume the log into a newest-first vector.
    pub fn into_vec(self) -> Vec<T> {
        self.entries.into()
    }
}

impl<T: Serialize> Serialize for BoundedLog<T> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.entries.iter())
    }
}

impl<'de, T: Deserialize<'de>> BoundedLog<T> {
    /// Deserialize a stored newest-first array into a log of `capacity`.
    pub fn deserialize_with_capacity<D: serde::Deserializer<'de>>(
        deserializer: D,
        capacity: usize,
    ) -> Result<Self, D::Error> {
        let entries = Vec::<T>::deserialize(deserializer)?;
        Ok(Self::from_entries(entries, capacity))
    }
}
