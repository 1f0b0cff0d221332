//! The remote document-store seam.
//!
//! The managed cloud store is a collaborator, not part of this crate. This
//! module fixes its contract (push-based ordered full snapshots plus
//! per-document CRUD) and hosts the in-memory implementation used by tests
//! and local runs. Store handles are injected where they are needed; there
//! is no global.

pub mod memory;

use serde_json::Value;
use tokio::sync::watch;

use crate::error::{Error, Result};
use crate::models::RecordId;

/// Collection holding food records, newest first.
pub const FOOD_COLLECTION: &str = "records";
/// Collection holding weight measurements, oldest first.
pub const WEIGHT_COLLECTION: &str = "weight_records";
/// Collection holding shopping items, newest first.
pub const SHOPPING_COLLECTION: &str = "shopping_list";

/// One document as delivered by a subscription.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: RecordId,
    /// JSON object of the document's fields, identity excluded.
    pub fields: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Store-native ordering for a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderSpec {
    pub field: &'static str,
    pub direction: SortDirection,
}

impl OrderSpec {
    #[must_use]
    pub const fn ascending(field: &'static str) -> Self {
        Self {
            field,
            direction: SortDirection::Ascending,
        }
    }

    #[must_use]
    pub const fn descending(field: &'static str) -> Self {
        Self {
            field,
            direction: SortDirection::Descending,
        }
    }
}

/// Live handle to one collection's snapshot feed.
///
/// Long-lived and scoped: dropping the subscription releases the remote
/// connection. Every delivery is the complete ordered collection, never a
/// diff.
#[derive(Debug)]
pub struct Subscription {
    collection: String,
    receiver: watch::Receiver<Vec<Document>>,
}

impl Subscription {
    /// Wraps a snapshot channel. The establishment snapshot must already be
    /// pending on the receiver so the first `changed()` resolves at once.
    #[must_use]
    pub fn new(collection: impl Into<String>, receiver: watch::Receiver<Vec<Document>>) -> Self {
        Self {
            collection: collection.into(),
            receiver,
        }
    }

    #[must_use]
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Waits for the next full snapshot.
    ///
    /// Once the store side goes away this returns `SubscriptionClosed` and
    /// never recovers; retry policy lives inside the store's own client.
    pub async fn changed(&mut self) -> Result<Vec<Document>> {
        self.receiver
            .changed()
            .await
            .map_err(|_| Error::SubscriptionClosed(self.collection.clone()))?;
        Ok(self.receiver.borrow_and_update().clone())
    }
}

/// Contract of the remote document store.
///
/// Field-level conflict resolution (last write wins) is the store's own
/// business; callers impose no extra ordering or merge logic on top.
#[allow(async_fn_in_trait)]
pub trait DocumentStore {
    /// Opens a long-lived ordered subscription on one collection. The
    /// current snapshot is delivered first, then one full snapshot per
    /// server-side change from any client.
    fn subscribe(&self, collection: &str, order: OrderSpec) -> Result<Subscription>;

    /// Inserts a document; the store assigns and returns its identity.
    async fn insert(&self, collection: &str, fields: Value) -> Result<RecordId>;

    /// Partially updates one document: only the named fields change.
    async fn update(&self, collection: &str, id: &RecordId, fields: Value) -> Result<()>;

    /// Deletes one document. Deleting an absent identity is a normal
    /// outcome, not an error.
    async fn delete(&self, collection: &str, id: &RecordId) -> Result<()>;
}
