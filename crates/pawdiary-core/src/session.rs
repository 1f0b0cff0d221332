//! Edit-session state for the food form.
//!
//! The same form and the same submit action serve two purposes: creating a
//! new record while idle, and updating an existing one while editing. The
//! controller owns that distinction plus the staged copy of the mutable
//! fields, and it reconciles itself when the record under edit disappears
//! from the synchronized snapshot.

use crate::models::{FoodDraft, FoodRecord, RecordId};

/// Where a form submission should be routed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitAction {
    /// No active edit: submission creates a new record.
    Create,
    /// Submission updates the record being edited.
    Update(RecordId),
}

/// Client-local, never persisted; lives as long as the food view does.
#[derive(Debug, Default)]
pub struct EditSessionController {
    editing: Option<RecordId>,
    draft: FoodDraft,
}

impl EditSessionController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Identity under edit, if any.
    #[must_use]
    pub fn editing_id(&self) -> Option<&RecordId> {
        self.editing.as_ref()
    }

    #[must_use]
    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    /// The staged form fields.
    #[must_use]
    pub fn draft(&self) -> &FoodDraft {
        &self.draft
    }

    /// Mutable access for form bindings.
    pub fn draft_mut(&mut self) -> &mut FoodDraft {
        &mut self.draft
    }

    /// Stages an existing record's mutable fields for editing. Creation
    /// date and timestamp are not staged; they never change.
    pub fn begin_edit(&mut self, record: &FoodRecord) {
        self.editing = Some(record.id.clone());
        self.draft = record.draft();
    }

    /// Abandons the active edit and clears the staged fields.
    pub fn cancel(&mut self) {
        self.reset();
    }

    /// Routes the pending submission based on session state.
    #[must_use]
    pub fn submit_action(&self) -> SubmitAction {
        match &self.editing {
            Some(id) => SubmitAction::Update(id.clone()),
            None => SubmitAction::Create,
        }
    }

    /// Called once the store confirms a submission: back to idle, form
    /// reset to its defaults.
    pub fn complete_submission(&mut self) {
        self.reset();
    }

    /// Reconciles the session against the latest food snapshot.
    ///
    /// If the record under edit is gone (deleted by any client, this one
    /// included) the session silently falls back to idle. No prompt: a
    /// local delete was already confirmed, and a remote one is not this
    /// client's question to ask. Returns true when the session was aborted.
    pub fn reconcile(&mut self, snapshot: &[FoodRecord]) -> bool {
        let Some(id) = &self.editing else {
            return false;
        };
        if snapshot.iter().any(|record| &record.id == id) {
            return false;
        }
        tracing::info!(%id, "record under edit left the snapshot, aborting edit session");
        self.reset();
        true
    }

    fn reset(&mut self) {
        self.editing = None;
        self.draft = FoodDraft::default();
    }
}
