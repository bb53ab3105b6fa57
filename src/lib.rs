//! Statecraft: a hierarchical state machine runtime
//!
//! Statecraft models statechart-style machines: states nest inside composite
//! states, transitions exit up to the least common ancestor of their source and
//! target and enter back down, and composite states can remember their last
//! active substate (shallow or deep history).
//!
//! The crate follows a "pure core, imperative shell" split:
//!
//! - [`core`]: the immutable state graph, history memory and the transition
//!   resolver. Pure functions, no I/O.
//! - [`builder`]: fluent construction and validation of state graphs.
//! - [`effects`]: the passive machine. Events are queued by `fire` and a single
//!   worker per machine runs each transition's async actions to completion
//!   before dequeuing the next event.
//!
//! # Example
//!
//! ```rust
//! use statecraft::builder::{HierarchyBuilder, StateBuilder, StateGraphBuilder, TransitionBuilder};
//! use statecraft::core::HistoryPolicy;
//! use statecraft::effects::PassiveMachine;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let graph = StateGraphBuilder::new()
//!     .hierarchy(
//!         HierarchyBuilder::on("Playing")
//!             .history(HistoryPolicy::Shallow)
//!             .initial("Intro")
//!             .substate("Chorus"),
//!     )
//!     .state(StateBuilder::new("Intro").transition(TransitionBuilder::on("next").goto("Chorus")))
//!     .state(StateBuilder::new("Playing").transition(TransitionBuilder::on("pause").goto("Paused")))
//!     .state(StateBuilder::new("Paused").transition(TransitionBuilder::on("play").goto("Playing")))
//!     .build()
//!     .unwrap();
//!
//! let mut player = PassiveMachine::new(graph);
//! player.initialize("Playing").unwrap();
//! player.start().await.unwrap();
//!
//! player.fire("next", ()).unwrap();
//! player.fire("pause", ()).unwrap();
//! player.fire("play", ()).unwrap();
//! player.wait_idle().await;
//!
//! // history brought the player back to where it was paused
//! assert_eq!(player.active_path(), vec!["Playing", "Chorus"]);
//! player.stop().await;
//! # }
//! ```

pub mod builder;
pub mod core;
pub mod effects;

// Re-export commonly used types
pub use builder::{BuildError, StateGraphBuilder};
pub use self::core::{EventId, HistoryPolicy, StateGraph, StateId, TransitionKind};
pub use effects::{LifecycleError, MachineError, MachineObserver, PassiveMachine};
