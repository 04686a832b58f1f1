//! Bounded history of executed user inputs with prev/next navigation.

use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct ExecutionHistory {
    entries: VecDeque<String>,
    capacity: usize,
    /// Index of the entry last returned; `entries.len()` means "past the newest".
    cursor: usize,
}

impl ExecutionHistory {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            cursor: 0,
        }
    }

    /// Append an input, evicting the oldest one beyond capacity.
    ///
    /// Resets navigation to just after the newest entry.
    pub fn add(&mut self, input: &str) {
        let input = input.trim();
        if !input.is_empty() {
            self.entries.push_back(input.to_string());
            while self.entries.len() > self.capacity {
                self.entries.pop_front();
            }
        }
        self.cursor = self.entries.len();
    }

    /// Step back to an older input. Stays on the oldest once reached.
    pub fn previous(&mut self) -> Option<&str> {
        if self.entries.is_empty() {
            return None;
        }
        self.cursor = self.cursor.saturating_sub(1);
        self.entries.get(self.cursor).map(String::as_str)
    }

    /// Step forward to a newer input; `None` once past the newest.
    pub fn next(&mut self) -> Option<&str> {
        if self.cursor + 1 < self.entries.len() {
            self.cursor += 1;
            self.entries.get(self.cursor).map(String::as_str)
        } else {
            self.cursor = self.entries.len();
            None
        }
    }

    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity.max(1);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
        self.cursor = self.entries.len();
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Oldest first.
    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ExecutionHistory {
    fn default() -> Self {
        Self::new(50)
    }
}
