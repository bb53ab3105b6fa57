//! Key traits for state and event identities.
//!
//! States and events are opaque comparable keys. The graph stores them in
//! hash maps and the dispatcher moves them across tasks, so both need to be
//! hashable, cloneable and thread-safe.

use std::fmt::Debug;
use std::hash::Hash;

/// Identity of a state in a [`StateGraph`](crate::core::StateGraph).
///
/// Implemented automatically for every type meeting the bounds, so string
/// literals, integers and plain enums all work as state keys.
///
/// # Example
///
/// ```rust
/// use statecraft::core::StateId;
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug)]
/// enum Door {
///     Open,
///     Closed,
/// }
///
/// fn accepts_state<S: StateId>(_state: S) {}
///
/// accepts_state(Door::Open);
/// accepts_state("Closed");
/// ```
pub trait StateId: Clone + Eq + Hash + Debug + Send + Sync + 'static {}

impl<T> StateId for T where T: Clone + Eq + Hash + Debug + Send + Sync + 'static {}

/// Identity of a triggering event.
///
/// Same bounds as [`StateId`]; kept as a separate trait so signatures read
/// which key is which.
pub trait EventId: Clone + Eq + Hash + Debug + Send + Sync + 'static {}

impl<T> EventId for T where T: Clone + Eq + Hash + Debug + Send + Sync + 'static {}
