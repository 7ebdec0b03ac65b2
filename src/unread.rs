//! Unread Indicators
//!
//! Remembers, per family and feature, when the user last opened that
//! feature. `new_activity` pushes newer than that light the nav dot.

use std::collections::BTreeMap;

use chrono::{NaiveDateTime, Utc};

use crate::events::parse_activity_timestamp;
use crate::models::Feature;

/// Timestamp for a visit, on the server's clock: `new_activity` is
/// stamped in naive UTC, so last-seen marks must be too
pub fn visit_time() -> NaiveDateTime {
    Utc::now().naive_utc()
}

/// Minimal string key-value storage
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

/// Browser `localStorage`; silently a no-op when storage is unavailable
pub struct LocalStore {
    storage: Option<web_sys::Storage>,
}

impl LocalStore {
    pub fn new() -> Self {
        let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten());
        Self { storage }
    }
}

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.as_ref()?.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) {
        if let Some(storage) = &self.storage {
            if storage.set_item(key, value).is_err() {
                log::warn!("[UNREAD] could not persist {}", key);
            }
        }
    }
}

/// In-memory store for tests
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryStore(BTreeMap<String, String>);

#[cfg(test)]
impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.0.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.0.insert(key.to_string(), value.to_string());
    }
}

pub struct UnreadTracker<S: KeyValueStore> {
    family_id: u32,
    store: S,
}

impl<S: KeyValueStore> UnreadTracker<S> {
    pub fn new(family_id: u32, store: S) -> Self {
        Self { family_id, store }
    }

    fn key(&self, feature: Feature) -> String {
        format!("hearth_last_seen_{}_{}", self.family_id, feature.key())
    }

    pub fn last_seen(&self, feature: Feature) -> Option<NaiveDateTime> {
        self.store
            .get(&self.key(feature))
            .and_then(|raw| parse_activity_timestamp(&raw))
    }

    /// Every feature with a recorded visit
    pub fn load(&self) -> BTreeMap<Feature, NaiveDateTime> {
        Feature::ALL
            .iter()
            .filter_map(|f| self.last_seen(*f).map(|t| (*f, t)))
            .collect()
    }

    pub fn mark_seen(&mut self, feature: Feature, at: NaiveDateTime) {
        let key = self.key(feature);
        self.store.set(&key, &at.format("%Y-%m-%dT%H:%M:%S%.6f").to_string());
    }
}
