//! Mutation dispatch against the remote store.
//!
//! Every write the app performs goes through here: local validation first,
//! then a single remote call. Nothing is applied optimistically. The UI
//! shows confirmed server state only, delivered back through the
//! synchronizers, so a failed write has nothing to roll back.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{Local, Utc};
use serde_json::{json, Map, Value};

use crate::error::Result;
use crate::models::{FoodDraft, RecordId, ShoppingDraft, ShoppingItem, WeightDraft, WeightRecord};
use crate::session::{EditSessionController, SubmitAction};
use crate::store::{DocumentStore, FOOD_COLLECTION, SHOPPING_COLLECTION, WEIGHT_COLLECTION};

/// Display format of a food record's creation date.
const FOOD_DATE_FORMAT: &str = "%Y/%m/%d";

/// User-facing signaling collaborator, implemented by the presentation
/// layer: blocking notices and delete-confirmation prompts.
pub trait UserNotifier {
    /// Shows a blocking notice.
    fn notify(&self, message: &str);

    /// Asks the user to confirm a destructive action.
    fn confirm(&self, message: &str) -> bool;
}

/// Issues create/update/delete/toggle operations for the three entity
/// kinds, with duplicate-submission suppression and user-facing error
/// signaling.
pub struct MutationDispatcher<S, N> {
    store: S,
    notifier: N,
    in_flight: AtomicBool,
}

/// Clears the in-flight flag when the submission finishes, however it
/// finishes.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl<S: DocumentStore, N: UserNotifier> MutationDispatcher<S, N> {
    pub fn new(store: S, notifier: N) -> Self {
        Self {
            store,
            notifier,
            in_flight: AtomicBool::new(false),
        }
    }

    /// True while a submission is in flight. The submit control should be
    /// disabled whenever this is true.
    #[must_use]
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Creates a food record from the staged draft.
    ///
    /// The display date and creation timestamp are generated here, once;
    /// later edits never rewrite them.
    pub async fn create_food(&self, draft: &FoodDraft) -> Result<()> {
        if let Err(error) = draft.validate() {
            self.notifier.notify(&error.to_string());
            return Err(error);
        }
        let Some(_guard) = self.begin_submission() else {
            return Ok(());
        };

        let now = Utc::now();
        let mut fields = food_fields(draft);
        fields.insert(
            "date".to_string(),
            Value::String(now.with_timezone(&Local).format(FOOD_DATE_FORMAT).to_string()),
        );
        fields.insert("timestamp".to_string(), Value::from(now.timestamp_millis()));

        self.run_write("create food record", self.store.insert(FOOD_COLLECTION, Value::Object(fields)))
            .await
            .map(drop)
    }

    /// Applies the staged draft to an existing record. Only the mutable
    /// fields travel.
    pub async fn update_food(&self, id: &RecordId, draft: &FoodDraft) -> Result<()> {
        if let Err(error) = draft.validate() {
            self.notifier.notify(&error.to_string());
            return Err(error);
        }
        let Some(_guard) = self.begin_submission() else {
            return Ok(());
        };

        let fields = Value::Object(food_fields(draft));
        self.run_write("update food record", self.store.update(FOOD_COLLECTION, id, fields))
            .await
    }

    pub async fn delete_food(&self, id: &RecordId) -> Result<()> {
        self.delete(FOOD_COLLECTION, id, "Delete this food record?")
            .await
    }

    /// Creates a weight record; its timestamp is derived from the chosen
    /// date, not the clock.
    pub async fn create_weight(&self, draft: &WeightDraft) -> Result<()> {
        let (weight, date) = match draft.validate() {
            Ok(parsed) => parsed,
            Err(error) => {
                self.notifier.notify(&error.to_string());
                return Err(error);
            }
        };
        let Some(_guard) = self.begin_submission() else {
            return Ok(());
        };

        let fields = json!({
            "weight": weight,
            "date": date.format(crate::models::WEIGHT_DATE_FORMAT).to_string(),
            "timestamp": WeightRecord::timestamp_for(date),
        });
        self.run_write("create weight record", self.store.insert(WEIGHT_COLLECTION, fields))
            .await
            .map(drop)
    }

    pub async fn delete_weight(&self, id: &RecordId) -> Result<()> {
        self.delete(WEIGHT_COLLECTION, id, "Delete this weight record?")
            .await
    }

    pub async fn create_shopping(&self, draft: &ShoppingDraft) -> Result<()> {
        if let Err(error) = draft.validate() {
            self.notifier.notify(&error.to_string());
            return Err(error);
        }
        let Some(_guard) = self.begin_submission() else {
            return Ok(());
        };

        let fields = json!({
            "category": draft.category,
            "name": draft.name.trim(),
            "note": draft.note,
            "isBought": false,
            "timestamp": Utc::now().timestamp_millis(),
        });
        self.run_write("create shopping item", self.store.insert(SHOPPING_COLLECTION, fields))
            .await
            .map(drop)
    }

    pub async fn delete_shopping(&self, id: &RecordId) -> Result<()> {
        self.delete(SHOPPING_COLLECTION, id, "Delete this shopping item?")
            .await
    }

    /// Flips exactly the `isBought` field of one shopping item.
    pub async fn toggle_bought(&self, item: &ShoppingItem) -> Result<()> {
        let fields = json!({ "isBought": !item.is_bought });
        self.run_write("toggle shopping item", self.store.update(SHOPPING_COLLECTION, &item.id, fields))
            .await
    }

    /// Sets the in-flight flag for the duration of one submission. A
    /// submission arriving while one is in flight is a UI race (the control
    /// is disabled); it is suppressed, not failed.
    fn begin_submission(&self) -> Option<InFlightGuard<'_>> {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            tracing::debug!("submission already in flight, suppressing duplicate");
            None
        } else {
            Some(InFlightGuard(&self.in_flight))
        }
    }

    async fn delete(&self, collection: &str, id: &RecordId, prompt: &str) -> Result<()> {
        if !self.notifier.confirm(prompt) {
            return Ok(());
        }
        self.run_write("delete record", self.store.delete(collection, id))
            .await
    }

    /// Runs one remote write; failures are logged, reported to the user
    /// with a generic notice, and never retried.
    async fn run_write<T>(&self, action: &str, write: impl Future<Output = Result<T>>) -> Result<T> {
        match write.await {
            Ok(value) => Ok(value),
            Err(error) => {
                tracing::error!(action, %error, "remote write failed");
                self.notifier
                    .notify("The operation failed. Please try again.");
                Err(error)
            }
        }
    }
}

/// Submits the food form, routed by edit-session state: create while idle,
/// update while editing. The session resets only after the store confirms.
pub async fn submit_food<S: DocumentStore, N: UserNotifier>(
    dispatcher: &MutationDispatcher<S, N>,
    session: &mut EditSessionController,
) -> Result<()> {
    // The disabled submit control makes this unreachable in practice; a
    // race that slips past it must not reset the live session.
    if dispatcher.is_in_flight() {
        return Ok(());
    }

    match session.submit_action() {
        SubmitAction::Create => {
            dispatcher.create_food(session.draft()).await?;
        }
        SubmitAction::Update(id) => {
            dispatcher.update_food(&id, session.draft()).await?;
            dispatcher.notifier().notify("Record updated");
        }
    }
    session.complete_submission();
    Ok(())
}

/// The mutable food fields as a wire object; creation fields are added by
/// the create path only.
fn food_fields(draft: &FoodDraft) -> Map<String, Value> {
    let mut fields = Map::new();
    fields.insert("category".to_string(), json!(draft.category));
    fields.insert(
        "brand".to_string(),
        Value::String(draft.brand.trim().to_string()),
    );
    fields.insert(
        "flavor".to_string(),
        Value::String(draft.flavor.trim().to_string()),
    );
    fields.insert("rating".to_string(), Value::from(draft.rating));
    fields.insert("notes".to_string(), Value::String(draft.notes.clone()));
    fields
}
