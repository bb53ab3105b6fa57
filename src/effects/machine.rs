//! Passive machine instance: lifecycle and the event queue handle.

use crate::core::{EventId, HistoryMemory, Resolver, StateGraph, StateId};
use crate::effects::error::{LifecycleError, MachineError};
use crate::effects::invoker::ActionInvoker;
use crate::effects::observer::MachineObserver;
use crate::effects::worker::{Command, Worker};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{info, warn};
use uuid::Uuid;

/// Point-in-time view of a machine, published after every committed transition.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MachineSnapshot<S: StateId> {
    pub id: Uuid,
    /// Root first, active leaf last. Empty before initialization.
    pub active_path: Vec<S>,
    /// Last active child per composite state.
    pub history: HashMap<S, S>,
    pub completed_transitions: u64,
}

impl<S: StateId> MachineSnapshot<S> {
    pub(crate) fn empty(id: Uuid) -> Self {
        Self {
            id,
            active_path: Vec::new(),
            history: HashMap::new(),
            completed_transitions: 0,
        }
    }

    pub fn current_state(&self) -> Option<&S> {
        self.active_path.last()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Lifecycle<S> {
    Uninitialized,
    Initialized(S),
    Started,
    Stopped,
}

/// A hierarchical state machine driven by a serialized event queue.
///
/// [`fire`](Self::fire) only enqueues; a single worker task dequeues events and
/// runs each transition to completion before looking at the next one. The
/// worker is spawned by [`start`](Self::start), which must be called from
/// within a Tokio runtime.
///
/// # Example
///
/// ```rust
/// use statecraft::builder::{StateBuilder, StateGraphBuilder, TransitionBuilder};
/// use statecraft::effects::PassiveMachine;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let graph = StateGraphBuilder::new()
///     .state(StateBuilder::new("Closed").transition(TransitionBuilder::on("open").goto("Open")))
///     .state(StateBuilder::new("Open").transition(TransitionBuilder::on("close").goto("Closed")))
///     .build()
///     .unwrap();
///
/// let mut door = PassiveMachine::new(graph);
/// door.initialize("Closed").unwrap();
/// door.start().await.unwrap();
///
/// door.fire("open", ()).unwrap();
/// door.wait_idle().await;
/// assert_eq!(door.current_state(), Some("Open"));
///
/// door.stop().await;
/// # }
/// ```
pub struct PassiveMachine<S: StateId, E: EventId, A = ()> {
    id: Uuid,
    graph: Arc<StateGraph<S, E, A>>,
    lifecycle: Lifecycle<S>,
    observers: Vec<Arc<dyn MachineObserver<S, E>>>,
    commands: Option<mpsc::UnboundedSender<Command<E, A>>>,
    worker: Option<JoinHandle<()>>,
    snapshots: watch::Receiver<MachineSnapshot<S>>,
    snapshot_tx: Option<watch::Sender<MachineSnapshot<S>>>,
}

impl<S: StateId, E: EventId, A: Send + Sync + 'static> PassiveMachine<S, E, A> {
    /// Create an uninitialized machine over a built graph.
    pub fn new(graph: impl Into<Arc<StateGraph<S, E, A>>>) -> Self {
        let id = Uuid::new_v4();
        let (snapshot_tx, snapshots) = watch::channel(MachineSnapshot::empty(id));
        Self {
            id,
            graph: graph.into(),
            lifecycle: Lifecycle::Uninitialized,
            observers: Vec::new(),
            commands: None,
            worker: None,
            snapshots,
            snapshot_tx: Some(snapshot_tx),
        }
    }

    /// Identifier used to correlate log lines and snapshots.
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn graph(&self) -> &StateGraph<S, E, A> {
        &self.graph
    }

    /// Register an observer. Only allowed before [`start`](Self::start).
    pub fn add_observer(&mut self, observer: Arc<dyn MachineObserver<S, E>>) -> Result<(), LifecycleError> {
        match self.lifecycle {
            Lifecycle::Started | Lifecycle::Stopped => Err(LifecycleError::AlreadyStarted),
            _ => {
                self.observers.push(observer);
                Ok(())
            }
        }
    }

    /// Set the state the machine starts in.
    ///
    /// The active path becomes the chain from the root down to `state`. Fails
    /// if called twice or with a state the graph does not contain.
    pub fn initialize(&mut self, state: S) -> Result<(), LifecycleError> {
        if self.lifecycle != Lifecycle::Uninitialized {
            return Err(LifecycleError::AlreadyInitialized);
        }
        if !self.graph.contains(&state) {
            return Err(LifecycleError::UnknownState(format!("{state:?}")));
        }

        if let Some(tx) = &self.snapshot_tx {
            tx.send_modify(|snapshot| snapshot.active_path = self.graph.path_from_root(&state));
        }
        info!(machine = %self.id, state = ?state, "machine initialized");
        self.lifecycle = Lifecycle::Initialized(state);
        Ok(())
    }

    /// Run entry actions for the initial path and spawn the processing loop.
    ///
    /// Entry actions run from the root down. If the initial state is
    /// composite, its initial substates are entered until a leaf is reached.
    /// When an entry action fails the error is returned and the machine stays
    /// initialized.
    pub async fn start(&mut self) -> Result<(), MachineError<S>> {
        let initial = match &self.lifecycle {
            Lifecycle::Uninitialized => return Err(LifecycleError::NotInitialized.into()),
            Lifecycle::Initialized(state) => state.clone(),
            Lifecycle::Started => return Err(LifecycleError::AlreadyStarted.into()),
            Lifecycle::Stopped => return Err(LifecycleError::Stopped.into()),
        };

        let history = HistoryMemory::new();
        let path = Resolver::new(&self.graph).initial_entry(&initial, &history);
        ActionInvoker::new(&self.graph).enter(&path).await?;

        let snapshot_tx = self
            .snapshot_tx
            .take()
            .ok_or(LifecycleError::AlreadyStarted)?;
        let worker = Worker::new(
            self.id,
            Arc::clone(&self.graph),
            path,
            history,
            self.observers.clone(),
            snapshot_tx,
        );
        worker.publish();

        let (commands, queue) = mpsc::unbounded_channel();
        self.worker = Some(tokio::spawn(worker.run(queue)));
        self.commands = Some(commands);
        self.lifecycle = Lifecycle::Started;

        info!(machine = %self.id, state = ?self.current_state(), "machine started");
        Ok(())
    }

    /// Enqueue an event and return immediately.
    ///
    /// The transition runs later on the worker; its outcome is reported to
    /// observers, not to the caller.
    pub fn fire(&self, event: E, payload: A) -> Result<(), LifecycleError> {
        match self.lifecycle {
            Lifecycle::Started => {}
            Lifecycle::Stopped => return Err(LifecycleError::Stopped),
            _ => return Err(LifecycleError::NotStarted),
        }
        let commands = self.commands.as_ref().ok_or(LifecycleError::Stopped)?;
        commands
            .send(Command::Fire { event, payload })
            .map_err(|_| {
                warn!(machine = %self.id, "event fired after the processing loop exited");
                LifecycleError::Stopped
            })
    }

    /// Wait until every event fired before this call has been processed.
    ///
    /// Returns immediately if the machine is not running.
    pub async fn wait_idle(&self) {
        let Some(commands) = &self.commands else {
            return;
        };
        let (done, barrier) = oneshot::channel();
        if commands.send(Command::Barrier(done)).is_ok() {
            let _ = barrier.await;
        }
    }

    /// Let queued events finish, then shut the worker down.
    ///
    /// Exit actions of the active states are not run.
    pub async fn stop(&mut self) {
        if let Some(commands) = self.commands.take() {
            let _ = commands.send(Command::Stop);
        }
        if let Some(worker) = self.worker.take() {
            if let Err(error) = worker.await {
                warn!(machine = %self.id, error = %error, "processing loop ended abnormally");
            }
        }
        if self.lifecycle == Lifecycle::Started {
            self.lifecycle = Lifecycle::Stopped;
            info!(machine = %self.id, "machine stopped");
        }
    }

    /// True while the processing loop is alive.
    pub fn is_running(&self) -> bool {
        self.lifecycle == Lifecycle::Started
            && self.worker.as_ref().is_some_and(|worker| !worker.is_finished())
    }

    /// The active leaf state, possibly stale while events are queued.
    pub fn current_state(&self) -> Option<S> {
        self.snapshots.borrow().current_state().cloned()
    }

    /// Active states from the root down to the leaf.
    pub fn active_path(&self) -> Vec<S> {
        self.snapshots.borrow().active_path.clone()
    }

    /// True if `state` is the active leaf or one of its active ancestors.
    pub fn is_in_state(&self, state: &S) -> bool {
        self.snapshots.borrow().active_path.contains(state)
    }

    pub fn snapshot(&self) -> MachineSnapshot<S> {
        self.snapshots.borrow().clone()
    }

    /// Receiver notified whenever a new snapshot is published.
    pub fn subscribe(&self) -> watch::Receiver<MachineSnapshot<S>> {
        self.snapshots.clone()
    }
}
