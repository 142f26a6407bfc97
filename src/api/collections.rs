//! Named collections of API response records, plus change notifications.
//!
//! Collections hold opaque JSON records exactly as the server returned them;
//! typed views live in [`super::models`] and deserialize on read. The store
//! is constructed by the application root and passed by reference.

use std::collections::HashMap;
use std::fmt;
use std::sync::mpsc::{Receiver, Sender, channel};

use anyhow::{Context, Result};
use log::{debug, warn};
use serde_json::Value;

/// The collections a submission can affect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKey {
    EarnerBadges,
    EarnerBadgeCollections,
    EarnerNotifications,
    IssuerIssuers,
    IssuerBadgeClasses,
    IssuerBadges,
}

impl CollectionKey {
    pub const ALL: [CollectionKey; 6] = [
        CollectionKey::EarnerBadges,
        CollectionKey::EarnerBadgeCollections,
        CollectionKey::EarnerNotifications,
        CollectionKey::IssuerIssuers,
        CollectionKey::IssuerBadgeClasses,
        CollectionKey::IssuerBadges,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CollectionKey::EarnerBadges => "earner_badges",
            CollectionKey::EarnerBadgeCollections => "earner_badge_collections",
            CollectionKey::EarnerNotifications => "earner_notifications",
            CollectionKey::IssuerIssuers => "issuer_issuers",
            CollectionKey::IssuerBadgeClasses => "issuer_badgeclasses",
            CollectionKey::IssuerBadges => "issuer_badges",
        }
    }

    /// Stringly boundary for CLI arguments and bootstrap data; unknown names
    /// are `None`, never a panic.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.as_str() == name)
    }
}

impl fmt::Display for CollectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CollectionEvent {
    pub key: CollectionKey,
    pub len: usize,
}

/// Append-only-by-default record lists keyed by [`CollectionKey`].
pub struct CollectionStore {
    data: HashMap<CollectionKey, Vec<Value>>,
    watchers: HashMap<CollectionKey, Vec<Sender<CollectionEvent>>>,
}

impl CollectionStore {
    pub fn new() -> Self {
        let mut data = HashMap::new();
        for key in CollectionKey::ALL {
            data.insert(key, Vec::new());
        }
        Self {
            data,
            watchers: HashMap::new(),
        }
    }

    /// Seeds collections from a bootstrap document: an object mapping
    /// collection names to record arrays (or to strings containing JSON
    /// arrays, as server-rendered bootstrap payloads embed them). Unknown
    /// keys are skipped with a warning. Returns the number of records loaded.
    pub fn seed(&mut self, initial: &Value) -> Result<usize> {
        let object = initial
            .as_object()
            .context("bootstrap data must be a JSON object keyed by collection name")?;

        let mut loaded = 0;
        for (name, payload) in object {
            let Some(key) = CollectionKey::parse(name) else {
                warn!("skipping unknown collection '{name}' in bootstrap data");
                continue;
            };
            let records: Vec<Value> = match payload {
                Value::Array(items) => items.clone(),
                Value::String(embedded) => serde_json::from_str(embedded)
                    .with_context(|| format!("embedded records for '{name}' are not valid JSON"))?,
                other => {
                    anyhow::bail!("collection '{name}' must be an array, got {other}");
                }
            };
            loaded += records.len();
            debug!("seeded {} with {} records", key, records.len());
            *self.data.get_mut(&key).expect("all keys present") = records;
            self.emit(key);
        }
        Ok(loaded)
    }

    pub fn append(&mut self, key: CollectionKey, record: Value) {
        self.data.get_mut(&key).expect("all keys present").push(record);
        debug!("appended record to {key}");
        self.emit(key);
    }

    /// Replaces the record with the same `slug` (falling back to `id`), or
    /// appends when no match exists. Used for PUT-style updates.
    pub fn upsert(&mut self, key: CollectionKey, record: Value) {
        let records = self.data.get_mut(&key).expect("all keys present");
        let incoming = record_identity(&record);
        let existing = incoming.as_ref().and_then(|needle| {
            records
                .iter()
                .position(|r| record_identity(r).as_deref() == Some(needle))
        });
        match existing {
            Some(index) => {
                debug!("replacing record {:?} in {key}", incoming);
                records[index] = record;
            }
            None => records.push(record),
        }
        self.emit(key);
    }

    pub fn records(&self, key: CollectionKey) -> &[Value] {
        self.data.get(&key).expect("all keys present")
    }

    pub fn len(&self, key: CollectionKey) -> usize {
        self.records(key).len()
    }

    pub fn last(&self, key: CollectionKey) -> Option<&Value> {
        self.records(key).last()
    }

    /// Finds a record by its `slug` (or `id`) field.
    pub fn find(&self, key: CollectionKey, slug: &str) -> Option<&Value> {
        self.records(key)
            .iter()
            .find(|r| record_identity(r).as_deref() == Some(slug))
    }

    pub fn watch(&mut self, key: CollectionKey) -> Receiver<CollectionEvent> {
        let (tx, rx) = channel();
        self.watchers.entry(key).or_default().push(tx);
        rx
    }

    fn emit(&mut self, key: CollectionKey) {
        let len = self.len(key);
        if let Some(senders) = self.watchers.get_mut(&key) {
            let event = CollectionEvent { key, len };
            senders.retain(|tx| tx.send(event.clone()).is_ok());
        }
    }
}

impl Default for CollectionStore {
    fn default() -> Self {
        Self::new()
    }
}

fn record_identity(record: &Value) -> Option<String> {
    record
        .get("slug")
        .or_else(|| record.get("id"))
        .and_then(|v| match v {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_round_trips_every_key() {
        for key in CollectionKey::ALL {
            assert_eq!(CollectionKey::parse(key.as_str()), Some(key));
        }
        assert_eq!(CollectionKey::parse("consumer_badges"), None);
    }

    #[test]
    fn seed_accepts_arrays_and_embedded_json_strings() {
        let mut store = CollectionStore::new();
        let loaded = store
            .seed(&json!({
                "issuer_badgeclasses": [{"slug": "grandmaster", "name": "Grandmaster"}],
                "earner_badges": "[{\"slug\": \"b1\"}]",
                "not_a_collection": []
            }))
            .unwrap();

        assert_eq!(loaded, 2);
        assert_eq!(store.len(CollectionKey::IssuerBadgeClasses), 1);
        assert_eq!(store.len(CollectionKey::EarnerBadges), 1);
    }

    #[test]
    fn upsert_replaces_by_slug_and_appends_otherwise() {
        let mut store = CollectionStore::new();
        store.append(
            CollectionKey::IssuerIssuers,
            json!({"slug": "chess-club", "name": "Chess Club"}),
        );

        store.upsert(
            CollectionKey::IssuerIssuers,
            json!({"slug": "chess-club", "name": "Chess Society"}),
        );
        assert_eq!(store.len(CollectionKey::IssuerIssuers), 1);
        assert_eq!(
            store.find(CollectionKey::IssuerIssuers, "chess-club").unwrap()["name"],
            "Chess Society"
        );

        store.upsert(CollectionKey::IssuerIssuers, json!({"slug": "go-club"}));
        assert_eq!(store.len(CollectionKey::IssuerIssuers), 2);
    }

    #[test]
    fn watchers_observe_appends_with_new_length() {
        let mut store = CollectionStore::new();
        let rx = store.watch(CollectionKey::EarnerBadges);

        store.append(CollectionKey::EarnerBadges, json!({"slug": "b1"}));
        store.append(CollectionKey::EarnerBadges, json!({"slug": "b2"}));

        let lens: Vec<usize> = rx.try_iter().map(|e| e.len).collect();
        assert_eq!(lens, vec![1, 2]);
    }
}
