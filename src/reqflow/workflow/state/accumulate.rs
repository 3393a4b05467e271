// SPDX-License-Identifier: MIT

//! Append-only sequences with an explicit reset

use serde::{Deserialize, Serialize};

/// How a partial update contributes to an append-merge field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Accumulate<T> {
    /// Add elements after the existing ones
    Append(Vec<T>),
    /// Replace the whole sequence, starting a sub-phase over
    Reset(Vec<T>),
}

/// Ordered sequence that only grows, unless explicitly reset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppendLog<T> {
    items: Vec<T>,
}

impl<T> AppendLog<T> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn apply(&mut self, op: Accumulate<T>) {
        match op {
            Accumulate::Append(items) => self.items.extend(items),
            Accumulate::Reset(items) => self.items = items,
        }
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T> Default for AppendLog<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> From<Vec<T>> for AppendLog<T> {
    fn from(items: Vec<T>) -> Self {
        Self { items }
    }
}

impl<'a, T> IntoIterator for &'a AppendLog<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_preserves_order_and_duplicates() {
        let mut log = AppendLog::new();
        log.apply(Accumulate::Append(vec![1, 2]));
        log.apply(Accumulate::Append(vec![2, 3]));
        assert_eq!(log.as_slice(), &[1, 2, 2, 3]);
    }

    #[test]
    fn test_reset_replaces() {
        let mut log = AppendLog::from(vec!["a", "b"]);
        log.apply(Accumulate::Reset(vec![]));
        assert!(log.is_empty());

        log.apply(Accumulate::Reset(vec!["c"]));
        log.apply(Accumulate::Append(vec!["d"]));
        assert_eq!(log.as_slice(), &["c", "d"]);
    }

    #[test]
    fn test_accumulate_json_shape() {
        let op: Accumulate<u32> = serde_json::from_str(r#"{"append": [1, 2]}"#).unwrap();
        assert_eq!(op, Accumulate::Append(vec![1, 2]));

        let op: Accumulate<u32> = serde_json::from_str(r#"{"reset": []}"#).unwrap();
        assert_eq!(op, Accumulate::Reset(vec![]));
    }
}
