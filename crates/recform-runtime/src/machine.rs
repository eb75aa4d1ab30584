#![forbid(unsafe_code)]

//! The record lifecycle state machine.
//!
//! [`RecordMachine`] is pure: it never touches a store. Each call to
//! [`update`](RecordMachine::update) consumes one [`Msg`] and returns an
//! [`Update`] describing what happened and, optionally, the store request
//! the caller must run. The result of that request is fed back as the
//! matching completion message (`Loaded`, `Saved`, `Deleted`).
//!
//! # State machine
//!
//! ```text
//!  Unloaded ──Initialize──▶ Empty ◀──────────── Delete ───────┐
//!     │                      │                                │
//!     └──Initialize──▶ Locked ◀──Submit (valid, stored)── Editing
//!                      │  ▲                                 ▲
//!                      │  └──────────── Initialize ─────────┤
//!                      └────────────── EnableEdit ──────────┘
//! ```
//!
//! # Invariants
//!
//! 1. The draft always has exactly the schema's field set.
//! 2. Field changes are applied only in [`Phase::Editing`].
//! 3. While a store request is outstanding every mutating message is
//!    ignored with [`IgnoreReason::Busy`].
//! 4. `Submit` and `Delete` change phase only after the store confirms;
//!    a failed request leaves phase and draft as they were.
//! 5. A stored value that does not decode degrades to [`Phase::Empty`].

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use recform_core::{Choice, FormSchema, Record, RecordError, RecordKey, ValidationReport};
use recform_store::{RecordStore, StoreError, StoreResult};
use tracing::{debug, warn};

use crate::notification::Notification;
use crate::tracking::EditTracking;

// ─────────────────────────────────────────────────────────────────────────────
// Phase
// ─────────────────────────────────────────────────────────────────────────────

/// Lifecycle phase of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Initial load has not completed; nothing is editable.
    #[default]
    Unloaded,
    /// No persisted record; the draft holds default values.
    Empty,
    /// A persisted record is shown read-only.
    Locked,
    /// The edit lock is on; fields accept changes.
    Editing,
}

impl Phase {
    /// Stable lowercase name for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unloaded => "unloaded",
            Self::Empty => "empty",
            Self::Locked => "locked",
            Self::Editing => "editing",
        }
    }

    /// Whether the edit lock is on.
    #[must_use]
    pub const fn is_editing(self) -> bool {
        matches!(self, Self::Editing)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Messages, requests and outcomes
// ─────────────────────────────────────────────────────────────────────────────

/// Input to [`RecordMachine::update`].
#[derive(Debug)]
pub enum Msg {
    /// Read the record from the store.
    Initialize,
    /// Completion of the `Get` issued by `Initialize`.
    Loaded(StoreResult<Option<String>>),
    /// Turn the edit lock on.
    EnableEdit,
    /// Raw input for one field.
    FieldChanged {
        /// Field name.
        field: String,
        /// Unmasked input.
        raw: String,
    },
    /// Validate and store the draft.
    Submit,
    /// Completion of the `Set` issued by `Submit`.
    Saved(StoreResult<()>),
    /// Remove the record from the store.
    Delete,
    /// Completion of the `Remove` issued by `Delete`.
    Deleted(StoreResult<()>),
}

/// Kind of store operation currently outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOp {
    /// `Get` on behalf of `Initialize`.
    Load,
    /// `Set` on behalf of `Submit`.
    Save,
    /// `Remove` on behalf of `Delete`.
    Delete,
}

/// A store call the caller must perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreRequest {
    /// Read a key.
    Get {
        /// Record key.
        key: RecordKey,
    },
    /// Write a serialized record.
    Set {
        /// Record key.
        key: RecordKey,
        /// Serialized, normalized record.
        value: String,
    },
    /// Remove a key.
    Remove {
        /// Record key.
        key: RecordKey,
    },
}

impl StoreRequest {
    /// The key this request targets.
    #[must_use]
    pub fn key(&self) -> &RecordKey {
        match self {
            Self::Get { key } | Self::Set { key, .. } | Self::Remove { key } => key,
        }
    }

    /// Run the request against `store` and return the completion message.
    pub async fn run(self, store: &dyn RecordStore) -> Msg {
        match self {
            Self::Get { key } => Msg::Loaded(store.get(key.as_str()).await),
            Self::Set { key, value } => Msg::Saved(store.set(key.as_str(), value).await),
            Self::Remove { key } => Msg::Deleted(store.remove(key.as_str()).await),
        }
    }
}

/// Why a message had no effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The initial load has not completed.
    NotLoaded,
    /// The edit lock is off.
    NotEditing,
    /// The edit lock is already on.
    AlreadyEditing,
    /// A store request is outstanding.
    Busy,
    /// The schema has no field with this name.
    UnknownField(String),
    /// A completion arrived with no matching request.
    Unexpected,
}

/// What an [`Update`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A store request was issued; the transition completes on its result.
    Pending,
    /// The transition happened.
    Applied,
    /// Submit was rejected; the named fields failed validation.
    Invalid(Vec<String>),
    /// Nothing changed.
    Ignored(IgnoreReason),
    /// A store operation failed; state is unchanged.
    Failed(String),
}

impl Outcome {
    /// Whether the transition happened.
    #[must_use]
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Result of one [`RecordMachine::update`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Update {
    /// What happened.
    pub outcome: Outcome,
    /// Store call to perform, if any.
    pub request: Option<StoreRequest>,
}

impl Update {
    fn done(outcome: Outcome) -> Self {
        Self {
            outcome,
            request: None,
        }
    }

    fn ignored(reason: IgnoreReason) -> Self {
        Self::done(Outcome::Ignored(reason))
    }

    fn request(request: StoreRequest) -> Self {
        Self {
            outcome: Outcome::Pending,
            request: Some(request),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Field view
// ─────────────────────────────────────────────────────────────────────────────

/// Everything the presentation layer needs to render one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldView<'a> {
    /// Field name.
    pub name: &'a str,
    /// Display label.
    pub label: &'a str,
    /// Current masked value.
    pub value: &'a str,
    /// Validation message, only once the field has been touched.
    pub error: Option<String>,
    /// Whether the field accepts input.
    pub enabled: bool,
    /// Whether the value differs from the persisted copy.
    pub dirty: bool,
    /// Options of a select-style field.
    pub choices: &'a [Choice],
}

// ─────────────────────────────────────────────────────────────────────────────
// RecordMachine
// ─────────────────────────────────────────────────────────────────────────────

/// Lifecycle state of one record.
#[derive(Debug)]
pub struct RecordMachine {
    schema: Arc<FormSchema>,
    phase: Phase,
    pending: Option<StoreOp>,
    draft: Record,
    report: ValidationReport,
    tracking: EditTracking,
    notifications: VecDeque<Notification>,
}

impl RecordMachine {
    /// A machine in [`Phase::Unloaded`] with a default draft.
    #[must_use]
    pub fn new(schema: Arc<FormSchema>) -> Self {
        let draft = schema.default_record();
        let report = schema.validate(&draft);
        let tracking = EditTracking::new(&schema);
        Self {
            schema,
            phase: Phase::Unloaded,
            pending: None,
            draft,
            report,
            tracking,
            notifications: VecDeque::new(),
        }
    }

    /// Apply one message.
    pub fn update(&mut self, msg: Msg) -> Update {
        let before = self.phase;
        let update = match msg {
            Msg::Initialize => self.initialize(),
            Msg::Loaded(result) => self.loaded(result),
            Msg::EnableEdit => self.enable_edit(),
            Msg::FieldChanged { field, raw } => self.field_changed(&field, &raw),
            Msg::Submit => self.submit(),
            Msg::Saved(result) => self.saved(result),
            Msg::Delete => self.delete(),
            Msg::Deleted(result) => self.deleted(result),
        };
        if before != self.phase {
            debug!(
                key = %self.schema.key(),
                from = before.as_str(),
                phase = self.phase.as_str(),
                "record phase changed"
            );
        }
        update
    }

    fn initialize(&mut self) -> Update {
        if self.pending.is_some() {
            return Update::ignored(IgnoreReason::Busy);
        }
        self.pending = Some(StoreOp::Load);
        Update::request(StoreRequest::Get {
            key: self.schema.key().clone(),
        })
    }

    fn loaded(&mut self, result: StoreResult<Option<String>>) -> Update {
        if !self.complete(StoreOp::Load) {
            return Update::ignored(IgnoreReason::Unexpected);
        }
        match result {
            Ok(Some(json)) => match self.schema.decode(&json) {
                Ok(record) => self.settle(record, Phase::Locked),
                Err(RecordError::Malformed(reason)) | Err(RecordError::Encode(reason)) => {
                    warn!(
                        key = %self.schema.key(),
                        reason = %reason,
                        "stored record is malformed, starting empty"
                    );
                    self.settle(self.schema.default_record(), Phase::Empty);
                }
            },
            Ok(None) => self.settle(self.schema.default_record(), Phase::Empty),
            Err(e) => return self.fail(&self.schema.messages().load_failed.clone(), &e),
        }
        Update::done(Outcome::Applied)
    }

    fn enable_edit(&mut self) -> Update {
        if let Some(reason) = self.idle_check() {
            return Update::ignored(reason);
        }
        if self.phase.is_editing() {
            return Update::ignored(IgnoreReason::AlreadyEditing);
        }
        self.phase = Phase::Editing;
        Update::done(Outcome::Applied)
    }

    fn field_changed(&mut self, field: &str, raw: &str) -> Update {
        if let Some(reason) = self.idle_check() {
            return Update::ignored(reason);
        }
        if !self.phase.is_editing() {
            debug!(key = %self.schema.key(), field, "field change ignored while locked");
            return Update::ignored(IgnoreReason::NotEditing);
        }
        let Some(idx) = self.field_index(field) else {
            warn!(key = %self.schema.key(), field, "change for unknown field ignored");
            return Update::ignored(IgnoreReason::UnknownField(field.to_string()));
        };
        let masked = self.schema.fields()[idx].apply_mask(raw);
        self.draft.set(field, masked);
        self.tracking.mark_touched(idx);
        self.report = self.schema.validate(&self.draft);
        Update::done(Outcome::Applied)
    }

    fn submit(&mut self) -> Update {
        if let Some(reason) = self.idle_check() {
            return Update::ignored(reason);
        }
        if !self.phase.is_editing() {
            return Update::ignored(IgnoreReason::NotEditing);
        }
        self.report = self.schema.validate(&self.draft);
        if !self.report.is_valid() {
            self.tracking.touch_all();
            let failing: Vec<String> = self
                .report
                .failing_fields()
                .into_iter()
                .map(str::to_string)
                .collect();
            debug!(key = %self.schema.key(), fields = ?failing, "submit rejected by validation");
            return Update::done(Outcome::Invalid(failing));
        }
        match self.schema.encode(&self.draft) {
            Ok(value) => {
                self.pending = Some(StoreOp::Save);
                Update::request(StoreRequest::Set {
                    key: self.schema.key().clone(),
                    value,
                })
            }
            Err(e) => {
                let message = format!("{}: {e}", self.schema.messages().save_failed);
                self.notifications.push_back(Notification::error(&message));
                Update::done(Outcome::Failed(message))
            }
        }
    }

    fn saved(&mut self, result: StoreResult<()>) -> Update {
        if !self.complete(StoreOp::Save) {
            return Update::ignored(IgnoreReason::Unexpected);
        }
        if let Err(e) = result {
            return self.fail(&self.schema.messages().save_failed.clone(), &e);
        }
        let stored = self.draft.clone();
        self.settle(stored, Phase::Locked);
        self.notifications
            .push_back(Notification::success(&self.schema.messages().saved));
        Update::done(Outcome::Applied)
    }

    fn delete(&mut self) -> Update {
        if let Some(reason) = self.idle_check() {
            return Update::ignored(reason);
        }
        self.pending = Some(StoreOp::Delete);
        Update::request(StoreRequest::Remove {
            key: self.schema.key().clone(),
        })
    }

    fn deleted(&mut self, result: StoreResult<()>) -> Update {
        if !self.complete(StoreOp::Delete) {
            return Update::ignored(IgnoreReason::Unexpected);
        }
        if let Err(e) = result {
            return self.fail(&self.schema.messages().delete_failed.clone(), &e);
        }
        self.settle(self.schema.default_record(), Phase::Empty);
        self.notifications
            .push_back(Notification::success(&self.schema.messages().deleted));
        Update::done(Outcome::Applied)
    }

    /// `Some(reason)` if a user-initiated message cannot run now.
    fn idle_check(&self) -> Option<IgnoreReason> {
        if self.pending.is_some() {
            Some(IgnoreReason::Busy)
        } else if self.phase == Phase::Unloaded {
            Some(IgnoreReason::NotLoaded)
        } else {
            None
        }
    }

    /// Clear the pending marker if it matches `op`.
    fn complete(&mut self, op: StoreOp) -> bool {
        if self.pending == Some(op) {
            self.pending = None;
            true
        } else {
            warn!(
                key = %self.schema.key(),
                expected = ?op,
                pending = ?self.pending,
                "store completion without a matching request"
            );
            false
        }
    }

    /// Replace the draft with a persisted (or default) record.
    fn settle(&mut self, record: Record, phase: Phase) {
        self.tracking.reset(&record);
        self.draft = record;
        self.report = self.schema.validate(&self.draft);
        self.phase = phase;
    }

    fn fail(&mut self, prefix: &str, error: &StoreError) -> Update {
        warn!(
            key = %self.schema.key(),
            phase = self.phase.as_str(),
            error = %error,
            "store operation failed"
        );
        let message = format!("{prefix}: {error}");
        self.notifications.push_back(Notification::error(&message));
        Update::done(Outcome::Failed(message))
    }

    fn field_index(&self, field: &str) -> Option<usize> {
        self.schema.fields().iter().position(|f| f.name() == field)
    }

    // ── Queries ──────────────────────────────────────────────────────────────

    /// The schema driving this machine.
    #[must_use]
    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    /// Key of the record.
    #[must_use]
    pub fn key(&self) -> &RecordKey {
        self.schema.key()
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Outstanding store operation, if any.
    #[must_use]
    pub fn pending(&self) -> Option<StoreOp> {
        self.pending
    }

    /// Whether a store request is outstanding.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    /// Whether `EnableEdit` would be applied.
    #[must_use]
    pub fn can_edit(&self) -> bool {
        self.idle_check().is_none() && !self.phase.is_editing()
    }

    /// Whether `Submit` would be evaluated.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        !self.is_busy() && self.phase.is_editing()
    }

    /// Whether `Delete` would be issued.
    #[must_use]
    pub fn can_delete(&self) -> bool {
        self.idle_check().is_none()
    }

    /// Current draft.
    #[must_use]
    pub fn draft(&self) -> &Record {
        &self.draft
    }

    /// Validation report for the current draft.
    #[must_use]
    pub fn report(&self) -> &ValidationReport {
        &self.report
    }

    /// Whether a field has been touched.
    #[must_use]
    pub fn is_touched(&self, field: &str) -> bool {
        self.field_index(field)
            .is_some_and(|idx| self.tracking.is_touched(idx))
    }

    /// Whether any field differs from the persisted copy.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.tracking.any_dirty(&self.draft)
    }

    /// Visible error for a field: only once touched.
    #[must_use]
    pub fn visible_error(&self, field: &str) -> Option<String> {
        if self.is_touched(field) {
            self.report.message(field)
        } else {
            None
        }
    }

    /// Render-ready view of every field, in schema order.
    #[must_use]
    pub fn fields(&self) -> Vec<FieldView<'_>> {
        let enabled = self.can_submit();
        self.schema
            .fields()
            .iter()
            .enumerate()
            .map(|(idx, descriptor)| {
                let name = descriptor.name();
                FieldView {
                    name,
                    label: descriptor.label(),
                    value: self.draft.get(name).unwrap_or_default(),
                    error: if self.tracking.is_touched(idx) {
                        self.report.message(name)
                    } else {
                        None
                    },
                    enabled,
                    dirty: self.tracking.is_dirty(&self.draft, name),
                    choices: descriptor.choice_list(),
                }
            })
            .collect()
    }

    /// Drain queued notifications, oldest first.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        self.notifications.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recform_core::{FieldDescriptor, MaskKind};

    fn schema() -> Arc<FormSchema> {
        Arc::new(
            FormSchema::builder("pagamento", "Pagamento")
                .field(
                    FieldDescriptor::new("cvv", "CVV")
                        .mask(MaskKind::digits(3))
                        .required("CVV é obrigatório")
                        .exact_length(3, "CVV deve ter 3 dígitos"),
                )
                .field(
                    FieldDescriptor::new("nomeCartao", "Nome no Cartão")
                        .required("Nome no cartão é obrigatório"),
                )
                .build()
                .unwrap(),
        )
    }

    fn loaded_empty() -> RecordMachine {
        let mut m = RecordMachine::new(schema());
        let update = m.update(Msg::Initialize);
        assert_eq!(update.outcome, Outcome::Pending);
        assert_eq!(
            update.request,
            Some(StoreRequest::Get { key: "pagamento".into() })
        );
        assert_eq!(m.update(Msg::Loaded(Ok(None))).outcome, Outcome::Applied);
        m
    }

    fn editing() -> RecordMachine {
        let mut m = loaded_empty();
        assert!(m.update(Msg::EnableEdit).outcome.is_applied());
        m
    }

    fn change(m: &mut RecordMachine, field: &str, raw: &str) -> Outcome {
        m.update(Msg::FieldChanged {
            field: field.into(),
            raw: raw.into(),
        })
        .outcome
    }

    #[test]
    fn unloaded_rejects_everything_but_initialize() {
        let mut m = RecordMachine::new(schema());
        assert_eq!(m.phase(), Phase::Unloaded);
        assert_eq!(
            m.update(Msg::EnableEdit).outcome,
            Outcome::Ignored(IgnoreReason::NotLoaded)
        );
        assert_eq!(
            change(&mut m, "cvv", "1"),
            Outcome::Ignored(IgnoreReason::NotLoaded)
        );
        assert_eq!(
            m.update(Msg::Delete).outcome,
            Outcome::Ignored(IgnoreReason::NotLoaded)
        );
        assert!(!m.can_edit());
    }

    #[test]
    fn absent_record_enters_empty_with_defaults() {
        let m = loaded_empty();
        assert_eq!(m.phase(), Phase::Empty);
        assert_eq!(m.draft(), &m.schema().default_record());
        assert!(m.can_edit());
        assert!(!m.can_submit());
    }

    #[test]
    fn present_record_enters_locked() {
        let mut m = RecordMachine::new(schema());
        m.update(Msg::Initialize);
        m.update(Msg::Loaded(Ok(Some(
            r#"{"cvv":"123","nomeCartao":"Maria Silva"}"#.into(),
        ))));
        assert_eq!(m.phase(), Phase::Locked);
        assert_eq!(m.draft().get("nomeCartao"), Some("Maria Silva"));
        assert!(!m.is_dirty());
    }

    #[test]
    fn malformed_record_degrades_to_empty() {
        let mut m = RecordMachine::new(schema());
        m.update(Msg::Initialize);
        let outcome = m.update(Msg::Loaded(Ok(Some("{not json".into())))).outcome;
        assert_eq!(outcome, Outcome::Applied);
        assert_eq!(m.phase(), Phase::Empty);
        assert!(m.take_notifications().is_empty());
    }

    #[test]
    fn load_failure_keeps_phase_and_notifies() {
        let mut m = RecordMachine::new(schema());
        m.update(Msg::Initialize);
        let outcome = m
            .update(Msg::Loaded(Err(StoreError::Unavailable("offline".into()))))
            .outcome;
        assert!(matches!(outcome, Outcome::Failed(_)));
        assert_eq!(m.phase(), Phase::Unloaded);
        assert!(!m.is_busy());
        let notes = m.take_notifications();
        assert_eq!(notes.len(), 1);
        assert!(notes[0].is_error());
    }

    #[test]
    fn field_change_requires_edit_lock() {
        let mut m = loaded_empty();
        let before = m.draft().clone();
        assert_eq!(
            change(&mut m, "cvv", "123"),
            Outcome::Ignored(IgnoreReason::NotEditing)
        );
        assert_eq!(m.draft(), &before);
        assert!(!m.is_touched("cvv"));
    }

    #[test]
    fn field_change_masks_and_touches() {
        let mut m = editing();
        assert!(change(&mut m, "cvv", "1a2").is_applied());
        assert_eq!(m.draft().get("cvv"), Some("12"));
        assert!(m.is_touched("cvv"));
        assert!(!m.is_touched("nomeCartao"));
        let views = m.fields();
        assert!(views[0].dirty);
        assert!(!views[1].dirty);
        assert_eq!(m.visible_error("cvv").as_deref(), Some("CVV deve ter 3 dígitos"));
        assert_eq!(m.visible_error("nomeCartao"), None);
    }

    #[test]
    fn unknown_field_is_ignored() {
        let mut m = editing();
        assert_eq!(
            change(&mut m, "extra", "x"),
            Outcome::Ignored(IgnoreReason::UnknownField("extra".into()))
        );
        assert!(!m.draft().contains("extra"));
    }

    #[test]
    fn invalid_submit_touches_all_and_issues_no_request() {
        let mut m = editing();
        change(&mut m, "cvv", "12");
        let update = m.update(Msg::Submit);
        assert_eq!(
            update.outcome,
            Outcome::Invalid(vec!["cvv".into(), "nomeCartao".into()])
        );
        assert!(update.request.is_none());
        assert_eq!(m.phase(), Phase::Editing);
        assert!(m.is_touched("nomeCartao"));
        assert_eq!(m.draft().get("cvv"), Some("12"));
        let views = m.fields();
        assert_eq!(views[0].error.as_deref(), Some("CVV deve ter 3 dígitos"));
        assert_eq!(views[1].error.as_deref(), Some("Nome no cartão é obrigatório"));
    }

    #[test]
    fn valid_submit_waits_for_the_store() {
        let mut m = editing();
        change(&mut m, "cvv", "123");
        change(&mut m, "nomeCartao", "Maria Silva");
        let update = m.update(Msg::Submit);
        assert_eq!(update.outcome, Outcome::Pending);
        let Some(StoreRequest::Set { key, value }) = update.request else {
            panic!("expected a Set request");
        };
        assert_eq!(key.as_str(), "pagamento");
        assert_eq!(value, r#"{"cvv":"123","nomeCartao":"Maria Silva"}"#);
        assert_eq!(m.phase(), Phase::Editing);
        assert_eq!(m.pending(), Some(StoreOp::Save));

        assert!(m.update(Msg::Saved(Ok(()))).outcome.is_applied());
        assert_eq!(m.phase(), Phase::Locked);
        assert!(!m.is_dirty());
        assert!(!m.is_touched("cvv"));
        let notes = m.take_notifications();
        assert_eq!(notes, vec![Notification::success("Dados salvos!")]);
    }

    #[test]
    fn busy_machine_ignores_mutations() {
        let mut m = editing();
        change(&mut m, "cvv", "123");
        change(&mut m, "nomeCartao", "Maria Silva");
        m.update(Msg::Submit);
        assert!(m.is_busy());
        assert!(!m.can_submit());

        let before = m.draft().clone();
        for msg in [
            Msg::FieldChanged {
                field: "cvv".into(),
                raw: "999".into(),
            },
            Msg::Submit,
            Msg::Delete,
            Msg::EnableEdit,
            Msg::Initialize,
        ] {
            assert_eq!(m.update(msg).outcome, Outcome::Ignored(IgnoreReason::Busy));
        }
        assert_eq!(m.draft(), &before);
        assert!(m.fields().iter().all(|f| !f.enabled));
    }

    #[test]
    fn save_failure_stays_editing() {
        let mut m = editing();
        change(&mut m, "cvv", "123");
        change(&mut m, "nomeCartao", "Maria Silva");
        m.update(Msg::Submit);
        let outcome = m
            .update(Msg::Saved(Err(StoreError::Io(std::io::Error::other("disk full")))))
            .outcome;
        assert!(matches!(outcome, Outcome::Failed(msg) if msg.contains("disk full")));
        assert_eq!(m.phase(), Phase::Editing);
        assert_eq!(m.draft().get("cvv"), Some("123"));
        assert!(m.take_notifications()[0].is_error());
    }

    #[test]
    fn delete_resets_to_defaults() {
        let mut m = editing();
        change(&mut m, "cvv", "123");
        let update = m.update(Msg::Delete);
        assert_eq!(
            update.request,
            Some(StoreRequest::Remove { key: "pagamento".into() })
        );
        assert!(m.update(Msg::Deleted(Ok(()))).outcome.is_applied());
        assert_eq!(m.phase(), Phase::Empty);
        assert_eq!(m.draft(), &m.schema().default_record());
        assert!(!m.is_touched("cvv"));
        assert_eq!(
            m.take_notifications(),
            vec![Notification::success("Dados excluídos!")]
        );
    }

    #[test]
    fn enable_edit_twice_is_ignored() {
        let mut m = editing();
        assert!(!m.can_edit());
        assert!(m.can_submit());
        assert_eq!(
            m.update(Msg::EnableEdit).outcome,
            Outcome::Ignored(IgnoreReason::AlreadyEditing)
        );
        assert_eq!(m.phase(), Phase::Editing);
    }

    #[test]
    fn delete_from_empty_removes_and_stays_empty() {
        let mut m = loaded_empty();
        assert!(m.can_delete());
        let update = m.update(Msg::Delete);
        assert_eq!(update.outcome, Outcome::Pending);
        assert_eq!(
            update.request,
            Some(StoreRequest::Remove { key: "pagamento".into() })
        );
        assert!(!m.can_delete());
        assert!(m.update(Msg::Deleted(Ok(()))).outcome.is_applied());
        assert_eq!(m.phase(), Phase::Empty);
        assert_eq!(m.draft(), &m.schema().default_record());
        assert_eq!(
            m.take_notifications(),
            vec![Notification::success("Dados excluídos!")]
        );
    }

    #[test]
    fn reinitialize_while_editing_discards_draft() {
        let mut m = RecordMachine::new(schema());
        m.update(Msg::Initialize);
        let stored = r#"{"cvv":"123","nomeCartao":"Maria Silva"}"#;
        m.update(Msg::Loaded(Ok(Some(stored.into()))));
        m.update(Msg::EnableEdit);
        change(&mut m, "cvv", "9");
        assert!(m.is_dirty());

        let update = m.update(Msg::Initialize);
        assert_eq!(
            update.request,
            Some(StoreRequest::Get { key: "pagamento".into() })
        );
        assert!(m.update(Msg::Loaded(Ok(Some(stored.into())))).outcome.is_applied());
        assert_eq!(m.phase(), Phase::Locked);
        assert_eq!(m.draft().get("cvv"), Some("123"));
        assert!(!m.is_dirty());
        assert!(!m.is_touched("cvv"));
    }

    #[test]
    fn delete_failure_keeps_state() {
        let mut m = editing();
        change(&mut m, "cvv", "123");
        m.update(Msg::Delete);
        m.update(Msg::Deleted(Err(StoreError::Unavailable("offline".into()))));
        assert_eq!(m.phase(), Phase::Editing);
        assert_eq!(m.draft().get("cvv"), Some("123"));
    }

    #[test]
    fn stray_completion_is_ignored() {
        let mut m = editing();
        assert_eq!(
            m.update(Msg::Saved(Ok(()))).outcome,
            Outcome::Ignored(IgnoreReason::Unexpected)
        );
        assert_eq!(m.phase(), Phase::Editing);
    }

    #[test]
    fn phase_names() {
        assert_eq!(Phase::Locked.to_string(), "locked");
        assert!(Phase::Editing.is_editing());
        assert_eq!(Phase::default(), Phase::Unloaded);
    }
}
