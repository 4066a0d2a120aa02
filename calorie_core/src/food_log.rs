//! Food log: the ordered collection of logged entries.
//!
//! Entries are kept newest first. Every mutation rewrites the whole
//! collection under [`FOOD_LOGS_KEY`]; a failed write is logged and the
//! in-memory change is kept.

use crate::storage::{read_json, write_json, KeyValueStore, FOOD_LOGS_KEY};
use crate::{Error, FoodEntry, Result};
use chrono::{NaiveDate, TimeZone};
use std::collections::HashSet;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FoodLog {
    entries: Vec<FoodEntry>,
}

impl FoodLog {
    /// Load the log from storage
    ///
    /// Missing or unparsable data yields an empty log. When stored entries
    /// share an id only the first (newest) one is kept.
    pub fn load_all<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        let mut entries: Vec<FoodEntry> = read_json(store, FOOD_LOGS_KEY).unwrap_or_default();

        let mut seen = HashSet::new();
        entries.retain(|e| {
            let first = seen.insert(e.id.clone());
            if !first {
                tracing::warn!("Dropping stored food entry with duplicate id {}", e.id);
            }
            first
        });

        tracing::debug!("Loaded {} food entries", entries.len());
        Self { entries }
    }

    /// Prepend a new entry and persist the collection
    ///
    /// # Errors
    /// `Error::Validation` for an empty id or negative macros,
    /// `Error::DuplicateId` when the id is already logged. The log is
    /// unchanged in both cases.
    pub fn add_entry<S: KeyValueStore + ?Sized>(
        &mut self,
        entry: FoodEntry,
        store: &mut S,
    ) -> Result<&[FoodEntry]> {
        entry.validate()?;
        if self.get(&entry.id).is_some() {
            return Err(Error::DuplicateId(entry.id));
        }

        tracing::info!("Logged {} ({:.0} kcal)", entry.name, entry.calories);
        self.entries.insert(0, entry);
        self.persist(store);
        Ok(&self.entries)
    }

    /// Remove the entry with `id` if present and persist the collection
    pub fn delete_entry<S: KeyValueStore + ?Sized>(
        &mut self,
        id: &str,
        store: &mut S,
    ) -> &[FoodEntry] {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        if self.entries.len() == before {
            tracing::debug!("No food entry {} to delete", id);
        } else {
            tracing::info!("Deleted food entry {}", id);
        }
        self.persist(store);
        &self.entries
    }

    pub fn entries(&self) -> &[FoodEntry] {
        &self.entries
    }

    pub fn get(&self, id: &str) -> Option<&FoodEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries logged on `day` in the given timezone, newest first
    pub fn entries_on<'a, Tz: TimeZone + 'a>(
        &'a self,
        day: NaiveDate,
        tz: Tz,
    ) -> impl Iterator<Item = &'a FoodEntry> + 'a {
        self.entries.iter().filter(move |e| e.is_on(day, &tz))
    }

    fn persist<S: KeyValueStore + ?Sized>(&self, store: &mut S) {
        if let Err(e) = write_json(store, FOOD_LOGS_KEY, &self.entries) {
            tracing::warn!("Failed to persist food log: {}. Keeping in-memory state.", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use chrono::{Duration, Utc};

    fn entry(id: &str, calories: f64, timestamp: i64) -> FoodEntry {
        FoodEntry {
            id: id.into(),
            name: format!("food {}", id),
            calories,
            protein: 10.0,
            carbs: 20.0,
            fats: 5.0,
            description: String::new(),
            timestamp,
            image_url: None,
        }
    }

    /// Store whose writes always fail
    struct ReadOnlyStore;

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Ok(None)
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<()> {
            Err(Error::Storage("quota exceeded".into()))
        }
    }

    #[test]
    fn test_add_prepends_newest_first() {
        let mut store = MemoryStore::new();
        let mut log = FoodLog::default();

        log.add_entry(entry("a", 500.0, 1_000), &mut store).unwrap();
        let entries = log.add_entry(entry("b", 300.0, 2_000), &mut store).unwrap();

        let ids: Vec<_> = entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        for pair in entries.windows(2) {
            assert!(pair[0].timestamp >= pair[1].timestamp);
        }
    }

    #[test]
    fn test_add_persists_full_collection() {
        let mut store = MemoryStore::new();
        let mut log = FoodLog::default();
        log.add_entry(entry("a", 500.0, 1_000), &mut store).unwrap();
        log.add_entry(entry("b", 300.0, 2_000), &mut store).unwrap();

        let reloaded = FoodLog::load_all(&store);
        assert_eq!(reloaded, log);
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut store = MemoryStore::new();
        let mut log = FoodLog::default();
        log.add_entry(entry("a", 500.0, 1_000), &mut store).unwrap();

        let err = log.add_entry(entry("a", 100.0, 2_000), &mut store).unwrap_err();
        assert!(matches!(err, Error::DuplicateId(ref id) if id == "a"));
        assert_eq!(log.len(), 1);
        assert_eq!(log.entries()[0].calories, 500.0);
    }

    #[test]
    fn test_empty_id_rejected() {
        let mut store = MemoryStore::new();
        let mut log = FoodLog::default();

        let err = log.add_entry(entry("", 100.0, 1_000), &mut store).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(log.is_empty());
        assert_eq!(store.get(FOOD_LOGS_KEY).unwrap(), None);
    }

    #[test]
    fn test_add_then_delete_restores_log() {
        let mut store = MemoryStore::new();
        let mut log = FoodLog::default();
        log.add_entry(entry("a", 500.0, 1_000), &mut store).unwrap();
        log.add_entry(entry("b", 300.0, 2_000), &mut store).unwrap();
        let before = log.clone();

        log.add_entry(entry("c", 150.0, 3_000), &mut store).unwrap();
        log.delete_entry("c", &mut store);

        assert_eq!(log, before);
        assert_eq!(FoodLog::load_all(&store), before);
    }

    #[test]
    fn test_delete_missing_is_noop() {
        let mut store = MemoryStore::new();
        let mut log = FoodLog::default();
        log.add_entry(entry("a", 500.0, 1_000), &mut store).unwrap();
        let before = log.clone();

        let entries = log.delete_entry("zzz", &mut store).to_vec();
        assert_eq!(entries, before.entries().to_vec());

        log.delete_entry("a", &mut store);
        log.delete_entry("a", &mut store);
        assert!(log.is_empty());
    }

    #[test]
    fn test_load_missing_is_empty() {
        let store = MemoryStore::new();
        assert!(FoodLog::load_all(&store).is_empty());
    }

    #[test]
    fn test_load_corrupted_is_empty() {
        crate::logging::init_test();
        let mut store = MemoryStore::new();
        store.set(FOOD_LOGS_KEY, "[{ not json").unwrap();
        assert!(FoodLog::load_all(&store).is_empty());
    }

    #[test]
    fn test_load_drops_duplicate_ids() {
        let mut store = MemoryStore::new();
        let stored = vec![entry("a", 300.0, 3), entry("b", 200.0, 2), entry("a", 100.0, 1)];
        write_json(&mut store, FOOD_LOGS_KEY, &stored).unwrap();

        let log = FoodLog::load_all(&store);
        let ids: Vec<_> = log.entries().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(log.get("a").map(|e| e.calories), Some(300.0));
    }

    #[test]
    fn test_write_failure_keeps_memory_state() {
        let mut store = ReadOnlyStore;
        let mut log = FoodLog::default();

        let entries = log.add_entry(entry("a", 500.0, 1_000), &mut store).unwrap();
        assert_eq!(entries.len(), 1);

        assert!(log.delete_entry("a", &mut store).is_empty());
    }

    #[test]
    fn test_entries_on_filters_by_day() {
        let mut store = MemoryStore::new();
        let mut log = FoodLog::default();
        let now = Utc::now();
        let yesterday = now - Duration::days(1);

        log.add_entry(entry("old", 400.0, yesterday.timestamp_millis()), &mut store)
            .unwrap();
        log.add_entry(entry("new", 200.0, now.timestamp_millis()), &mut store)
            .unwrap();

        let today: Vec<_> = log
            .entries_on(now.date_naive(), Utc)
            .map(|e| e.id.as_str())
            .collect();
        assert_eq!(today, vec!["new"]);
    }
}
