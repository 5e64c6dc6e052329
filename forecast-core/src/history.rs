use std::collections::VecDeque;

pub const DEFAULT_HISTORY_CAPACITY: usize = 5;

/// Recently searched locations for one interactive session, newest first.
///
/// Only a location's first search inserts it at the front; searching an
/// entry that is already present leaves the order untouched.
#[derive(Debug, Clone)]
pub struct SearchHistory {
    entries: VecDeque<String>,
    capacity: usize,
}

impl Default for SearchHistory {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }
}

impl SearchHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Returns `true` if the location was newly inserted.
    pub fn add(&mut self, location: &str) -> bool {
        if self.capacity == 0 || self.contains(location) {
            return false;
        }

        self.entries.push_front(location.to_string());
        self.entries.truncate(self.capacity);
        true
    }

    pub fn contains(&self, location: &str) -> bool {
        self.entries.iter().any(|e| e == location)
    }

    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
