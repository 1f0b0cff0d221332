//! In-memory document store (primarily for tests and local runs).
//!
//! Honors the same push contract as the managed store: every mutation
//! republishes each subscriber's complete snapshot in that subscriber's
//! requested order.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::{Arc, Mutex};

use serde_json::Value;
use tokio::sync::watch;
use uuid::Uuid;

use super::{Document, DocumentStore, OrderSpec, SortDirection, Subscription};
use crate::error::{Error, Result};
use crate::models::RecordId;

/// In-process stand-in for the remote document store.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<HashMap<String, Collection>>>,
    fail_next_write: Arc<AtomicBool>,
}

#[derive(Default)]
struct Collection {
    docs: HashMap<RecordId, Value>,
    watchers: Vec<Watcher>,
}

struct Watcher {
    order: OrderSpec,
    sender: watch::Sender<Vec<Document>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next write fail, for exercising error paths in tests.
    pub fn fail_next_write(&self) {
        self.fail_next_write.store(true, AtomicOrdering::SeqCst);
    }

    fn check_write_fault(&self) -> Result<()> {
        if self.fail_next_write.swap(false, AtomicOrdering::SeqCst) {
            return Err(Error::Store("injected write failure".to_string()));
        }
        Ok(())
    }

    fn with_collection<T>(&self, name: &str, f: impl FnOnce(&mut Collection) -> T) -> Result<T> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| Error::Store("store lock poisoned".to_string()))?;
        Ok(f(inner.entry(name.to_string()).or_default()))
    }
}

impl Collection {
    fn snapshot(&self, order: OrderSpec) -> Vec<Document> {
        let mut docs: Vec<Document> = self
            .docs
            .iter()
            .map(|(id, fields)| Document {
                id: id.clone(),
                fields: fields.clone(),
            })
            .collect();
        docs.sort_by(|a, b| {
            let ordering = compare_field(&a.fields, &b.fields, order.field);
            match order.direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });
        docs
    }

    fn publish(&mut self) {
        // Drop watchers whose subscription went away.
        self.watchers.retain(|watcher| !watcher.sender.is_closed());
        for watcher in &self.watchers {
            let _ = watcher.sender.send(self.snapshot(watcher.order));
        }
    }
}

/// Orders two documents by one field the way the remote store would:
/// numbers numerically, strings lexicographically, absent fields first.
fn compare_field(a: &Value, b: &Value, field: &str) -> Ordering {
    match (a.get(field), b.get(field)) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .unwrap_or(0.0)
            .partial_cmp(&y.as_f64().unwrap_or(0.0))
            .unwrap_or(Ordering::Equal),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        _ => Ordering::Equal,
    }
}

/// Field-level merge: named fields replace, everything else survives.
fn merge_fields(existing: &mut Value, update: Value) {
    if let (Value::Object(existing), Value::Object(update)) = (existing, update) {
        for (key, value) in update {
            existing.insert(key, value);
        }
    }
}

impl DocumentStore for MemoryStore {
    fn subscribe(&self, collection: &str, order: OrderSpec) -> Result<Subscription> {
        self.with_collection(collection, |coll| {
            let (sender, mut receiver) = watch::channel(coll.snapshot(order));
            // The establishment snapshot counts as a delivery.
            receiver.mark_changed();
            coll.watchers.push(Watcher { order, sender });
            Subscription::new(collection, receiver)
        })
    }

    async fn insert(&self, collection: &str, fields: Value) -> Result<RecordId> {
        self.check_write_fault()?;
        let id = RecordId::new(Uuid::now_v7().to_string());
        self.with_collection(collection, |coll| {
            coll.docs.insert(id.clone(), fields);
            coll.publish();
        })?;
        Ok(id)
    }

    async fn update(&self, collection: &str, id: &RecordId, fields: Value) -> Result<()> {
        self.check_write_fault()?;
        self.with_collection(collection, |coll| {
            if let Some(existing) = coll.docs.get_mut(id) {
                merge_fields(existing, fields);
                coll.publish();
            }
            // Absent id: the document lost a race with a delete; the update
            // quietly has no effect, matching the remote store.
        })
    }

    async fn delete(&self, collection: &str, id: &RecordId) -> Result<()> {
        self.check_write_fault()?;
        self.with_collection(collection, |coll| {
            if coll.docs.remove(id).is_some() {
                coll.publish();
            }
        })
    }
}
