//! Builder API for declaring state graphs.
//!
//! The builders are a construction-time surface only: they validate the
//! declared hierarchy and emit an immutable [`StateGraph`](crate::core::StateGraph).
//! Nothing here is used once a machine is running.
//!
//! # Example
//!
//! ```
//! use statecraft::builder::{HierarchyBuilder, StateBuilder, StateGraphBuilder, TransitionBuilder};
//! use statecraft::core::{HistoryPolicy, StateGraph};
//!
//! let graph: StateGraph<&str, &str> = StateGraphBuilder::new()
//!     .hierarchy(
//!         HierarchyBuilder::on("On")
//!             .history(HistoryPolicy::Shallow)
//!             .initial("Idle")
//!             .substate("Working"),
//!     )
//!     .state(StateBuilder::new("Idle").transition(TransitionBuilder::on("work").goto("Working")))
//!     .state(StateBuilder::new("On").transition(TransitionBuilder::on("power").goto("Off")))
//!     .state(StateBuilder::new("Off").transition(TransitionBuilder::on("power").goto("On")))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(graph.roots(), &["On", "Off"]);
//! ```

pub mod error;
pub mod graph;
pub mod hierarchy;
pub mod state;
pub mod transition;
mod validation;

pub use error::{BuildError, ConfigError};
pub use graph::StateGraphBuilder;
pub use hierarchy::HierarchyBuilder;
pub use state::StateBuilder;
pub use transition::TransitionBuilder;
