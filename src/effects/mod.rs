//! The effectful shell around the pure core.
//!
//! This module runs what [`crate::core`] only describes:
//!
//! - [`PassiveMachine`] owns the lifecycle and hands events to a queue
//! - a single worker task per machine drains that queue, resolving and
//!   executing one transition at a time
//! - [`ActionInvoker`] awaits entry, exit and transition actions in order
//! - [`MachineObserver`] implementations are told about every outcome
//!
//! Action failures never leave a half-applied transition behind: the active
//! path and history memory are replaced only after every action succeeded.

mod error;
mod invoker;
mod machine;
mod observer;
mod worker;

pub use error::{ActionFailure, ActionPhase, LifecycleError, MachineError};
pub use invoker::ActionInvoker;
pub use machine::{MachineSnapshot, PassiveMachine};
pub use observer::{MachineObserver, Notification, RecordingObserver, TransitionRecord};
