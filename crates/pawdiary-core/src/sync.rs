//! Live collection synchronizers.
//!
//! Each synchronizer mirrors one remote collection and is the only writer of
//! its mirror; every other component reads it. Local mutations never touch
//! the mirror directly: they round-trip through the store and come back
//! here as a fresh snapshot, the same way any other client's edits do.

use crate::error::Result;
use crate::models::{FoodRecord, RecordId, ShoppingItem, WeightRecord};
use crate::store::{
    Document, DocumentStore, OrderSpec, Subscription, FOOD_COLLECTION, SHOPPING_COLLECTION,
    WEIGHT_COLLECTION,
};

/// A record kind living in one remote collection.
pub trait CollectionRecord: Sized {
    /// Collection name in the remote store.
    const COLLECTION: &'static str;

    /// Store-native subscription order.
    fn order() -> OrderSpec;

    /// Decodes one delivered document.
    fn from_document(document: &Document) -> Result<Self>;

    /// Identity within the collection.
    fn id(&self) -> &RecordId;
}

impl CollectionRecord for FoodRecord {
    const COLLECTION: &'static str = FOOD_COLLECTION;

    fn order() -> OrderSpec {
        OrderSpec::descending("timestamp")
    }

    fn from_document(document: &Document) -> Result<Self> {
        let mut record: Self = serde_json::from_value(document.fields.clone())?;
        record.id = document.id.clone();
        Ok(record)
    }

    fn id(&self) -> &RecordId {
        &self.id
    }
}

impl CollectionRecord for WeightRecord {
    const COLLECTION: &'static str = WEIGHT_COLLECTION;

    fn order() -> OrderSpec {
        OrderSpec::ascending("date")
    }

    fn from_document(document: &Document) -> Result<Self> {
        let mut record: Self = serde_json::from_value(document.fields.clone())?;
        record.id = document.id.clone();
        Ok(record)
    }

    fn id(&self) -> &RecordId {
        &self.id
    }
}

impl CollectionRecord for ShoppingItem {
    const COLLECTION: &'static str = SHOPPING_COLLECTION;

    fn order() -> OrderSpec {
        OrderSpec::descending("timestamp")
    }

    fn from_document(document: &Document) -> Result<Self> {
        let mut record: Self = serde_json::from_value(document.fields.clone())?;
        record.id = document.id.clone();
        Ok(record)
    }

    fn id(&self) -> &RecordId {
        &self.id
    }
}

/// Mirrors one collection: subscribes, owns the ordered snapshot, and
/// applies every delivered change.
pub struct CollectionSynchronizer<T> {
    subscription: Subscription,
    snapshot: Vec<T>,
}

pub type FoodSynchronizer = CollectionSynchronizer<FoodRecord>;
pub type WeightSynchronizer = CollectionSynchronizer<WeightRecord>;
pub type ShoppingSynchronizer = CollectionSynchronizer<ShoppingItem>;

impl<T: CollectionRecord> CollectionSynchronizer<T> {
    /// Subscribes to the record kind's collection and applies the
    /// establishment snapshot.
    pub async fn attach<S: DocumentStore>(store: &S) -> Result<Self> {
        let mut subscription = store.subscribe(T::COLLECTION, T::order())?;
        let snapshot = decode_all(&subscription.changed().await?)?;
        tracing::info!(
            collection = T::COLLECTION,
            records = snapshot.len(),
            "collection subscription established"
        );
        Ok(Self {
            subscription,
            snapshot,
        })
    }

    /// The current mirror of the remote collection, in store order.
    #[must_use]
    pub fn snapshot(&self) -> &[T] {
        &self.snapshot
    }

    /// Waits for the next remote change and applies the delivered snapshot.
    pub async fn changed(&mut self) -> Result<&[T]> {
        let documents = self.subscription.changed().await?;
        self.snapshot = decode_all(&documents)?;
        tracing::debug!(
            collection = T::COLLECTION,
            records = self.snapshot.len(),
            "applied remote snapshot"
        );
        Ok(&self.snapshot)
    }

    /// Whether a record with `id` is present in the current snapshot.
    #[must_use]
    pub fn contains(&self, id: &RecordId) -> bool {
        self.snapshot.iter().any(|record| record.id() == id)
    }
}

fn decode_all<T: CollectionRecord>(documents: &[Document]) -> Result<Vec<T>> {
    documents.iter().map(T::from_document).collect()
}
