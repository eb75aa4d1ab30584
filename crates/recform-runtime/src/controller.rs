#![forbid(unsafe_code)]

//! Async driver binding a [`RecordMachine`] to a [`RecordStore`].

use std::sync::Arc;

use recform_core::FormSchema;
use recform_store::RecordStore;

use crate::machine::{FieldView, Msg, Outcome, Phase, RecordMachine};
use crate::notification::Notification;

/// One record's lifecycle, executed against a store.
///
/// Every operation takes `&mut self` and awaits its store request before
/// returning, so transitions on one controller never interleave.
///
/// # Example
///
/// ```rust,ignore
/// let mut controller = RecordController::new(schema, store);
/// controller.initialize().await;
/// controller.enable_edit();
/// controller.change_field("cvv", "123");
/// controller.submit().await;
/// for note in controller.take_notifications() {
///     println!("{note}");
/// }
/// ```
pub struct RecordController {
    machine: RecordMachine,
    store: Arc<dyn RecordStore>,
}

impl RecordController {
    /// A controller for `schema`'s record in `store`, not yet initialized.
    #[must_use]
    pub fn new(schema: Arc<FormSchema>, store: Arc<dyn RecordStore>) -> Self {
        Self {
            machine: RecordMachine::new(schema),
            store,
        }
    }

    /// Load (or reload) the record from the store.
    pub async fn initialize(&mut self) -> Outcome {
        self.dispatch(Msg::Initialize).await
    }

    /// Turn the edit lock on.
    pub fn enable_edit(&mut self) -> Outcome {
        self.machine.update(Msg::EnableEdit).outcome
    }

    /// Apply raw input to a field.
    pub fn change_field(&mut self, field: &str, raw: &str) -> Outcome {
        self.machine
            .update(Msg::FieldChanged {
                field: field.to_string(),
                raw: raw.to_string(),
            })
            .outcome
    }

    /// Validate the draft and, if valid, store it.
    pub async fn submit(&mut self) -> Outcome {
        self.dispatch(Msg::Submit).await
    }

    /// Remove the record from the store.
    pub async fn delete(&mut self) -> Outcome {
        self.dispatch(Msg::Delete).await
    }

    async fn dispatch(&mut self, msg: Msg) -> Outcome {
        let update = self.machine.update(msg);
        match update.request {
            Some(request) => {
                tracing::debug!(
                    key = %request.key(),
                    backend = self.store.name(),
                    "running store request"
                );
                let completion = request.run(self.store.as_ref()).await;
                self.machine.update(completion).outcome
            }
            None => update.outcome,
        }
    }

    /// The underlying state machine.
    #[must_use]
    pub fn machine(&self) -> &RecordMachine {
        &self.machine
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.machine.phase()
    }

    /// Render-ready view of every field.
    #[must_use]
    pub fn fields(&self) -> Vec<FieldView<'_>> {
        self.machine.fields()
    }

    /// Drain queued notifications.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        self.machine.take_notifications()
    }
}

impl std::fmt::Debug for RecordController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordController")
            .field("key", self.machine.key())
            .field("phase", &self.machine.phase())
            .field("backend", &self.store.name())
            .finish()
    }
}
