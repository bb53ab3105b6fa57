//! The processing loop behind a started machine.

use crate::core::{EventId, HistoryMemory, ResolvedTransition, Resolver, StateGraph, StateId};
use crate::effects::invoker::ActionInvoker;
use crate::effects::machine::MachineSnapshot;
use crate::effects::observer::{MachineObserver, TransitionRecord};
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, warn};
use uuid::Uuid;

/// Work items sent from a machine handle to its worker.
pub(crate) enum Command<E, A> {
    Fire { event: E, payload: A },
    /// Acknowledged once every command queued before it has been handled.
    Barrier(oneshot::Sender<()>),
    Stop,
}

/// Owns the active path and history memory of one started machine.
///
/// Only the worker mutates machine state; handles observe it through the
/// published snapshots.
pub(crate) struct Worker<S: StateId, E: EventId, A> {
    id: Uuid,
    graph: Arc<StateGraph<S, E, A>>,
    path: Vec<S>,
    history: HistoryMemory<S>,
    completed: u64,
    observers: Vec<Arc<dyn MachineObserver<S, E>>>,
    snapshots: watch::Sender<MachineSnapshot<S>>,
}

impl<S: StateId, E: EventId, A: Send + Sync + 'static> Worker<S, E, A> {
    pub(crate) fn new(
        id: Uuid,
        graph: Arc<StateGraph<S, E, A>>,
        path: Vec<S>,
        history: HistoryMemory<S>,
        observers: Vec<Arc<dyn MachineObserver<S, E>>>,
        snapshots: watch::Sender<MachineSnapshot<S>>,
    ) -> Self {
        Self {
            id,
            graph,
            path,
            history,
            completed: 0,
            observers,
            snapshots,
        }
    }

    pub(crate) fn snapshot(&self) -> MachineSnapshot<S> {
        MachineSnapshot {
            id: self.id,
            active_path: self.path.clone(),
            history: self.history.entries().clone(),
            completed_transitions: self.completed,
        }
    }

    pub(crate) fn publish(&self) {
        self.snapshots.send_replace(self.snapshot());
    }

    /// Drain commands one at a time until stopped or every sender is gone.
    pub(crate) async fn run(mut self, mut commands: mpsc::UnboundedReceiver<Command<E, A>>) {
        while let Some(command) = commands.recv().await {
            match command {
                Command::Fire { event, payload } => self.process(event, payload).await,
                Command::Barrier(done) => {
                    let _ = done.send(());
                }
                Command::Stop => break,
            }
        }
        debug!(machine = %self.id, "processing loop finished");
    }

    async fn process(&mut self, event: E, payload: A) {
        let Some(leaf) = self.path.last().cloned() else {
            return;
        };
        debug!(machine = %self.id, event = ?event, state = ?leaf, "event dequeued");

        let graph = Arc::clone(&self.graph);
        let Some(resolved) = Resolver::new(&graph).resolve(&self.path, &self.history, &event, &payload)
        else {
            debug!(machine = %self.id, event = ?event, state = ?leaf, "event declined");
            for observer in &self.observers {
                observer.transition_declined(&leaf, &event);
            }
            return;
        };

        debug!(
            machine = %self.id,
            source = ?resolved.source,
            target = ?resolved.target,
            exits = resolved.exit_chain.len(),
            entries = resolved.entry_chain.len(),
            "transition resolved"
        );
        for observer in &self.observers {
            observer.transition_begin(&leaf, &event);
        }

        match ActionInvoker::new(&graph).execute(&resolved, &payload).await {
            Ok(()) => self.commit(event, leaf, resolved),
            Err(failure) => {
                warn!(machine = %self.id, event = ?event, error = %failure, "transition failed");
                for observer in &self.observers {
                    observer.transition_failed(&failure, &event);
                }
            }
        }
    }

    fn commit(&mut self, event: E, from: S, resolved: ResolvedTransition<S, A>) {
        let ResolvedTransition {
            kind,
            exit_chain,
            entry_chain,
            next_path,
            next_history,
            ..
        } = resolved;

        self.path = next_path;
        self.history = next_history;
        self.completed += 1;
        self.publish();

        let to = self.path.last().cloned().unwrap_or_else(|| from.clone());
        debug!(machine = %self.id, from = ?from, to = ?to, "transition committed");

        let record = TransitionRecord {
            event,
            from,
            to,
            kind,
            exited: exit_chain,
            entered: entry_chain,
            timestamp: Utc::now(),
        };
        for observer in &self.observers {
            observer.transition_completed(&record);
        }
    }
}
