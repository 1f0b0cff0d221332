//! End-to-end scenarios over the in-memory store: dispatcher, edit
//! session, and synchronizers closing the loop the way the live app does.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use pretty_assertions::assert_eq;
use serde_json::Value;
use tokio::sync::Notify;

use crate::dispatch::{submit_food, MutationDispatcher, UserNotifier};
use crate::models::{Category, FoodDraft, RecordId, ShoppingDraft, WeightDraft, WeightRecord};
use crate::session::EditSessionController;
use crate::store::memory::MemoryStore;
use crate::store::{DocumentStore, OrderSpec, Subscription, FOOD_COLLECTION};
use crate::sync::{FoodSynchronizer, ShoppingSynchronizer, WeightSynchronizer};
use crate::view;

#[derive(Clone, Default)]
struct TestNotifier {
    notices: Arc<Mutex<Vec<String>>>,
    confirm_answer: Arc<AtomicBool>,
}

impl TestNotifier {
    fn notices(&self) -> Vec<String> {
        self.notices.lock().unwrap().clone()
    }

    fn answer_confirmations(&self, yes: bool) {
        self.confirm_answer.store(yes, Ordering::SeqCst);
    }
}

impl UserNotifier for TestNotifier {
    fn notify(&self, message: &str) {
        self.notices.lock().unwrap().push(message.to_string());
    }

    fn confirm(&self, _message: &str) -> bool {
        self.confirm_answer.load(Ordering::SeqCst)
    }
}

fn valid_food_draft() -> FoodDraft {
    FoodDraft {
        category: Category::Dry,
        brand: "Orijen 渴望".to_string(),
        flavor: "雞肉".to_string(),
        rating: 5,
        notes: String::new(),
    }
}

#[tokio::test(flavor = "current_thread")]
async fn idle_submission_creates_record_with_generated_fields() {
    let store = MemoryStore::new();
    let notifier = TestNotifier::default();
    let dispatcher = MutationDispatcher::new(store.clone(), notifier.clone());
    let mut session = EditSessionController::new();
    *session.draft_mut() = valid_food_draft();

    submit_food(&dispatcher, &mut session).await.unwrap();

    let sync = FoodSynchronizer::attach(&store).await.unwrap();
    assert_eq!(sync.snapshot().len(), 1);
    let record = &sync.snapshot()[0];
    assert_eq!(record.category, Category::Dry);
    assert_eq!(record.brand, "Orijen 渴望");
    assert_eq!(record.flavor, "雞肉");
    assert_eq!(record.rating, 5);
    assert!(!record.date.is_empty());
    assert!(record.timestamp > 0);

    // Session stays idle and the form resets to its defaults.
    assert!(!session.is_editing());
    assert_eq!(session.draft().category, Category::Canned);
    assert_eq!(session.draft().rating, 0);
    assert!(!dispatcher.is_in_flight());
}

#[tokio::test(flavor = "current_thread")]
async fn invalid_food_draft_makes_no_remote_call() {
    let store = MemoryStore::new();
    let notifier = TestNotifier::default();
    let dispatcher = MutationDispatcher::new(store.clone(), notifier.clone());

    let mut zero_rating = valid_food_draft();
    zero_rating.rating = 0;
    let mut blank_brand = valid_food_draft();
    blank_brand.brand = String::new();

    for draft in [zero_rating, blank_brand] {
        assert!(dispatcher.create_food(&draft).await.is_err());
        assert!(!dispatcher.is_in_flight());
    }

    let sync = FoodSynchronizer::attach(&store).await.unwrap();
    assert!(sync.snapshot().is_empty());
    assert_eq!(notifier.notices().len(), 2);
}

#[tokio::test(flavor = "current_thread")]
async fn remote_write_failure_notifies_and_clears_flag() {
    let store = MemoryStore::new();
    let notifier = TestNotifier::default();
    let dispatcher = MutationDispatcher::new(store.clone(), notifier.clone());

    store.fail_next_write();
    assert!(dispatcher.create_food(&valid_food_draft()).await.is_err());

    assert!(!dispatcher.is_in_flight());
    assert_eq!(
        notifier.notices(),
        vec!["The operation failed. Please try again.".to_string()]
    );
    let sync = FoodSynchronizer::attach(&store).await.unwrap();
    assert!(sync.snapshot().is_empty());
}

#[tokio::test(flavor = "current_thread")]
async fn edit_session_aborts_when_another_client_deletes_the_record() {
    let store = MemoryStore::new();
    let notifier = TestNotifier::default();
    let dispatcher = MutationDispatcher::new(store.clone(), notifier.clone());
    dispatcher.create_food(&valid_food_draft()).await.unwrap();

    let mut sync = FoodSynchronizer::attach(&store).await.unwrap();
    let record = sync.snapshot()[0].clone();

    let mut session = EditSessionController::new();
    session.begin_edit(&record);
    assert!(session.is_editing());

    // Another client deletes the record out from under the edit.
    store.delete(FOOD_COLLECTION, &record.id).await.unwrap();
    sync.changed().await.unwrap();

    assert!(session.reconcile(sync.snapshot()));
    assert!(!session.is_editing());
    assert_eq!(session.draft(), &FoodDraft::default());
    // Silent reconciliation: no extra prompt or notice.
    assert!(notifier.notices().is_empty());
}

#[tokio::test(flavor = "current_thread")]
async fn editing_submission_updates_mutable_fields_only() {
    let store = MemoryStore::new();
    let notifier = TestNotifier::default();
    let dispatcher = MutationDispatcher::new(store.clone(), notifier.clone());
    dispatcher.create_food(&valid_food_draft()).await.unwrap();

    let mut sync = FoodSynchronizer::attach(&store).await.unwrap();
    let original = sync.snapshot()[0].clone();

    let mut session = EditSessionController::new();
    session.begin_edit(&original);
    session.draft_mut().rating = 3;
    session.draft_mut().notes = "太鹹".to_string();

    submit_food(&dispatcher, &mut session).await.unwrap();
    let snapshot = sync.changed().await.unwrap();

    let updated = &snapshot[0];
    assert_eq!(updated.id, original.id);
    assert_eq!(updated.rating, 3);
    assert_eq!(updated.notes, "太鹹");
    // Creation facts survive the edit.
    assert_eq!(updated.date, original.date);
    assert_eq!(updated.timestamp, original.timestamp);

    assert!(!session.is_editing());
    assert!(notifier.notices().contains(&"Record updated".to_string()));
}

#[tokio::test(flavor = "current_thread")]
async fn delete_requires_confirmation() {
    let store = MemoryStore::new();
    let notifier = TestNotifier::default();
    let dispatcher = MutationDispatcher::new(store.clone(), notifier.clone());
    dispatcher.create_food(&valid_food_draft()).await.unwrap();

    let mut sync = FoodSynchronizer::attach(&store).await.unwrap();
    let id = sync.snapshot()[0].id.clone();

    // Declined: no call reaches the store.
    dispatcher.delete_food(&id).await.unwrap();
    assert_eq!(sync.snapshot().len(), 1);

    notifier.answer_confirmations(true);
    dispatcher.delete_food(&id).await.unwrap();
    assert!(sync.changed().await.unwrap().is_empty());

    // Deleting again is a normal outcome, not a user-visible error.
    dispatcher.delete_food(&id).await.unwrap();
    assert!(notifier.notices().is_empty());
}

#[tokio::test(flavor = "current_thread")]
async fn toggle_bought_flips_exactly_that_field() {
    let store = MemoryStore::new();
    let notifier = TestNotifier::default();
    let dispatcher = MutationDispatcher::new(store.clone(), notifier.clone());
    dispatcher
        .create_shopping(&ShoppingDraft {
            category: Category::Litter,
            name: "豆腐砂".to_string(),
            note: "6L".to_string(),
        })
        .await
        .unwrap();

    let mut sync = ShoppingSynchronizer::attach(&store).await.unwrap();
    let item = sync.snapshot()[0].clone();
    assert!(!item.is_bought);

    dispatcher.toggle_bought(&item).await.unwrap();
    let snapshot = sync.changed().await.unwrap();

    assert!(snapshot[0].is_bought);
    assert_eq!(snapshot[0].name, item.name);
    assert_eq!(snapshot[0].note, item.note);
    assert_eq!(snapshot[0].timestamp, item.timestamp);
}

#[tokio::test(flavor = "current_thread")]
async fn weight_records_sort_by_date_with_derived_timestamps() {
    let store = MemoryStore::new();
    let notifier = TestNotifier::default();
    let dispatcher = MutationDispatcher::new(store.clone(), notifier.clone());

    for (weight, date) in [("1.4", "2025-05-06"), ("1.2", "2025-04-01")] {
        dispatcher
            .create_weight(&WeightDraft {
                weight: weight.to_string(),
                date: date.to_string(),
            })
            .await
            .unwrap();
    }

    let mut sync = WeightSynchronizer::attach(&store).await.unwrap();
    let snapshot = sync.snapshot();
    assert_eq!(snapshot[0].date, "2025-04-01");
    assert_eq!(snapshot[1].date, "2025-05-06");
    // Entered newest-first, yet timestamp order agrees with date order.
    assert!(snapshot[0].timestamp < snapshot[1].timestamp);
    assert_eq!(
        snapshot[0].timestamp,
        WeightRecord::timestamp_for(snapshot[0].parsed_date().unwrap())
    );

    let birth = snapshot[0].parsed_date().unwrap();
    let series = view::to_chart_series(snapshot, birth);
    assert_eq!(series[0].age_label, "0天");
    assert_eq!(series[1].age_label, "1個月5天");

    notifier.answer_confirmations(true);
    let first_id = snapshot[0].id.clone();
    dispatcher.delete_weight(&first_id).await.unwrap();
    let snapshot = sync.changed().await.unwrap();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].date, "2025-05-06");
}

/// Store wrapper that parks inserts until the test opens the gate, to hold
/// a submission in flight deterministically.
#[derive(Clone)]
struct GatedStore {
    inner: MemoryStore,
    gate: Arc<Notify>,
}

impl DocumentStore for GatedStore {
    fn subscribe(&self, collection: &str, order: OrderSpec) -> crate::Result<Subscription> {
        self.inner.subscribe(collection, order)
    }

    async fn insert(&self, collection: &str, fields: Value) -> crate::Result<RecordId> {
        self.gate.notified().await;
        self.inner.insert(collection, fields).await
    }

    async fn update(&self, collection: &str, id: &RecordId, fields: Value) -> crate::Result<()> {
        self.inner.update(collection, id, fields).await
    }

    async fn delete(&self, collection: &str, id: &RecordId) -> crate::Result<()> {
        self.inner.delete(collection, id).await
    }
}

#[tokio::test(flavor = "current_thread")]
async fn concurrent_duplicate_submission_is_suppressed() {
    let gate = Arc::new(Notify::new());
    let store = GatedStore {
        inner: MemoryStore::new(),
        gate: gate.clone(),
    };
    let notifier = TestNotifier::default();
    let dispatcher = Arc::new(MutationDispatcher::new(store.clone(), notifier.clone()));

    let background = tokio::spawn({
        let dispatcher = dispatcher.clone();
        async move { dispatcher.create_food(&valid_food_draft()).await }
    });
    while !dispatcher.is_in_flight() {
        tokio::task::yield_now().await;
    }

    // Second submission while the first is parked: silently dropped.
    dispatcher.create_food(&valid_food_draft()).await.unwrap();

    gate.notify_one();
    background.await.unwrap().unwrap();
    assert!(!dispatcher.is_in_flight());

    let sync = FoodSynchronizer::attach(&store.inner).await.unwrap();
    assert_eq!(sync.snapshot().len(), 1);
}
