#![forbid(unsafe_code)]

//! Record lifecycle runtime.
//!
//! The runtime has two layers:
//!
//! - [`RecordMachine`]: a pure state machine over [`Msg`]s. It validates,
//!   masks and tracks the draft, and emits [`StoreRequest`]s instead of
//!   performing I/O. A UI with its own event loop can drive it directly.
//! - [`RecordController`]: an async driver that runs each request against a
//!   [`RecordStore`](recform_store::RecordStore) and feeds the completion
//!   back before returning.
//!
//! Store failures never panic or propagate: they surface as an
//! [`Outcome::Failed`] plus an error [`Notification`], and the record stays
//! in the phase it had before the operation.

mod controller;
mod machine;
mod notification;
mod tracking;

pub use controller::RecordController;
pub use machine::{
    FieldView, IgnoreReason, Msg, Outcome, Phase, RecordMachine, StoreOp, StoreRequest, Update,
};
pub use notification::{Level, Notification};
