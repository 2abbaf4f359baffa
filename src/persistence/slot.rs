// Copyright 2025 the Bikestem Authors
// SPDX-License-Identifier: Apache-2.0

//! The persisted-state slot: a single key holding an optional string.
//!
//! The reconciler only sees the `PersistedSlot` trait. `MemorySlot` keeps
//! the value in memory and records every write; it can also hold writes
//! back until `settle` to imitate a storage layer that applies them late.
//! `QueryStringSlot` stores the value in a query parameter of a `url::Url`
//! and keeps a back stack for pushed history entries.

use crate::settings::persistence::URL_STATE_KEY;
use serde::Deserialize;
use std::collections::VecDeque;
use thiserror::Error;
use url::Url;

/// How a write affects navigation history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryMode {
    /// Add a history entry
    Push,
    /// Overwrite the current history entry
    #[default]
    Replace,
}

/// Key-value slot holding the persisted payload.
///
/// Writes are fire-and-forget: an implementation may apply them later, and
/// callers must not assume `get` reflects a write immediately.
pub trait PersistedSlot {
    /// Current value of the slot
    fn get(&self) -> Option<String>;

    /// Write a value, or clear the slot with `None`
    fn set(&mut self, value: Option<String>, mode: HistoryMode);

    /// Write a value computed from the current one
    fn update<F>(&mut self, mode: HistoryMode, f: F)
    where
        F: FnOnce(Option<String>) -> Option<String>,
        Self: Sized,
    {
        let next = f(self.get());
        self.set(next, mode);
    }
}

#[derive(Debug, Error)]
pub enum SlotError {
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// A write observed by `MemorySlot`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotWrite {
    pub value: Option<String>,
    pub mode: HistoryMode,
}

/// In-memory slot that records writes
#[derive(Debug, Clone, Default)]
pub struct MemorySlot {
    value: Option<String>,
    deferred: bool,
    pending: VecDeque<SlotWrite>,
    writes: Vec<SlotWrite>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slot pre-filled with a value, as if loaded from a link
    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            ..Self::default()
        }
    }

    /// Queue writes until `settle` is called
    pub fn deferred(mut self) -> Self {
        self.deferred = true;
        self
    }

    /// Apply queued writes in order
    pub fn settle(&mut self) {
        while let Some(write) = self.pending.pop_front() {
            self.value = write.value;
        }
    }

    /// Apply only the oldest queued write. Returns `false` when none is
    /// queued.
    pub fn settle_next(&mut self) -> bool {
        match self.pending.pop_front() {
            Some(write) => {
                self.value = write.value;
                true
            }
            None => false,
        }
    }

    /// Replace the value from outside, like back/forward navigation
    pub fn navigate(&mut self, value: Option<String>) {
        self.value = value;
    }

    /// Every write requested so far, including unsettled ones
    pub fn writes(&self) -> &[SlotWrite] {
        &self.writes
    }
}

impl PersistedSlot for MemorySlot {
    fn get(&self) -> Option<String> {
        self.value.clone()
    }

    fn set(&mut self, value: Option<String>, mode: HistoryMode) {
        let write = SlotWrite { value, mode };
        self.writes.push(write.clone());
        if self.deferred {
            self.pending.push_back(write);
        } else {
            self.value = write.value;
        }
    }
}

/// Slot backed by a query parameter of a page URL
#[derive(Debug, Clone)]
pub struct QueryStringSlot {
    key: String,
    current: Url,
    back: Vec<Url>,
}

impl QueryStringSlot {
    /// Slot on the `urlstate` parameter of `url`
    pub fn new(url: Url) -> Self {
        Self::with_key(url, URL_STATE_KEY)
    }

    pub fn with_key(url: Url, key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            current: url,
            back: Vec::new(),
        }
    }

    pub fn parse(url: &str) -> Result<Self, SlotError> {
        Ok(Self::new(Url::parse(url)?))
    }

    /// The current page URL, ready to share
    pub fn url(&self) -> &Url {
        &self.current
    }

    /// Load a different URL, pushing the current one on the back stack
    pub fn navigate(&mut self, url: Url) {
        let previous = std::mem::replace(&mut self.current, url);
        self.back.push(previous);
    }

    /// Go back one history entry. Returns `false` at the start of history.
    pub fn back(&mut self) -> bool {
        match self.back.pop() {
            Some(previous) => {
                self.current = previous;
                true
            }
            None => false,
        }
    }

    pub fn history_len(&self) -> usize {
        self.back.len() + 1
    }
}

impl PersistedSlot for QueryStringSlot {
    fn get(&self) -> Option<String> {
        self.current
            .query_pairs()
            .find(|(key, _)| key == self.key.as_str())
            .map(|(_, value)| value.into_owned())
    }

    fn set(&mut self, value: Option<String>, mode: HistoryMode) {
        let mut next = self.current.clone();
        let mut pairs: Vec<(String, String)> = next
            .query_pairs()
            .filter(|(key, _)| key != self.key.as_str())
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();
        if let Some(value) = value {
            pairs.push((self.key.clone(), value));
        }

        if pairs.is_empty() {
            next.set_query(None);
        } else {
            next.query_pairs_mut().clear().extend_pairs(pairs);
        }

        match mode {
            HistoryMode::Push => self.navigate(next),
            HistoryMode::Replace => self.current = next,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_slot_applies_writes_immediately() {
        let mut slot = MemorySlot::new();
        assert_eq!(slot.get(), None);
        slot.set(Some("a".to_string()), HistoryMode::Replace);
        assert_eq!(slot.get().as_deref(), Some("a"));
        assert_eq!(slot.writes().len(), 1);
    }

    #[test]
    fn deferred_memory_slot_waits_for_settle() {
        let mut slot = MemorySlot::with_value("old").deferred();
        slot.set(Some("new".to_string()), HistoryMode::Replace);
        assert_eq!(slot.get().as_deref(), Some("old"));
        slot.settle();
        assert_eq!(slot.get().as_deref(), Some("new"));
    }

    #[test]
    fn deferred_writes_land_one_at_a_time() {
        let mut slot = MemorySlot::with_value("old").deferred();
        slot.set(Some("a".to_string()), HistoryMode::Replace);
        slot.set(Some("b".to_string()), HistoryMode::Replace);
        assert!(slot.settle_next());
        assert_eq!(slot.get().as_deref(), Some("a"));
        assert!(slot.settle_next());
        assert_eq!(slot.get().as_deref(), Some("b"));
        assert!(!slot.settle_next());
    }

    #[test]
    fn update_sees_current_value() {
        let mut slot = MemorySlot::with_value("1");
        slot.update(HistoryMode::Replace, |current| {
            current.map(|value| format!("{value}2"))
        });
        assert_eq!(slot.get().as_deref(), Some("12"));
    }

    #[test]
    fn query_slot_reads_encoded_payload() {
        let slot = QueryStringSlot::parse(
            "https://www.bikestem.fit/?urlstate=%7B%22spacer%22%3A62%2C%22name%22%3A%22%22%7D",
        )
        .unwrap();
        assert_eq!(slot.get().as_deref(), Some(r#"{"spacer":62,"name":""}"#));
    }

    #[test]
    fn query_slot_round_trips_and_keeps_other_params() {
        let mut slot = QueryStringSlot::parse("https://www.bikestem.fit/?ref=mail").unwrap();
        assert_eq!(slot.get(), None);

        let payload = r#"{"name":"My Bike Setup","spacer":40}"#.to_string();
        slot.set(Some(payload.clone()), HistoryMode::Replace);
        assert_eq!(slot.get(), Some(payload));
        assert!(slot.url().as_str().contains("ref=mail"));
        assert!(slot.url().as_str().contains("urlstate="));
        assert_eq!(slot.history_len(), 1);

        slot.set(None, HistoryMode::Replace);
        assert_eq!(slot.get(), None);
        assert_eq!(slot.url().query(), Some("ref=mail"));
    }

    #[test]
    fn query_slot_push_and_back() {
        let mut slot = QueryStringSlot::parse("https://www.bikestem.fit/").unwrap();
        slot.set(Some("first".to_string()), HistoryMode::Push);
        slot.set(Some("second".to_string()), HistoryMode::Push);
        assert_eq!(slot.history_len(), 3);

        assert!(slot.back());
        assert_eq!(slot.get().as_deref(), Some("first"));
        assert!(slot.back());
        assert_eq!(slot.get(), None);
        assert_eq!(slot.url().query(), None);
        assert!(!slot.back());
    }

    #[test]
    fn query_slot_rejects_bad_url() {
        assert!(matches!(
            QueryStringSlot::parse("not a url"),
            Err(SlotError::InvalidUrl(_))
        ));
    }
}
