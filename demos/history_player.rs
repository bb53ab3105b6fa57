//! History Player
//!
//! This example demonstrates shallow and deep history on a media player.
//!
//! Key concepts:
//! - Composite states remembering their last active substate
//! - Shallow history restoring one level, then following initial substates
//! - Deep history restoring the whole nested configuration
//! - Effect-based actions and failure reporting through observers
//!
//! Run with: cargo run --example history_player

use statecraft::builder::{HierarchyBuilder, StateBuilder, StateGraphBuilder, TransitionBuilder};
use statecraft::core::{ActionError, HistoryPolicy, StateGraph};
use statecraft::effects::{PassiveMachine, RecordingObserver};
use std::sync::Arc;
use stillwater::prelude::*;

fn player(policy: HistoryPolicy) -> StateGraph<&'static str, &'static str, u32> {
    StateGraphBuilder::new()
        .hierarchy(
            HierarchyBuilder::on("Playing")
                .history(policy)
                .initial("Album")
                .substate("Radio"),
        )
        .hierarchy(
            HierarchyBuilder::on("Radio")
                .initial("News")
                .substate("Music"),
        )
        .state(StateBuilder::new("Album").transition(TransitionBuilder::on("radio").goto("Music")))
        .state(StateBuilder::new("Playing").transition(TransitionBuilder::on("pause").goto("Paused")))
        .state(
            StateBuilder::new("Paused")
                .transition(TransitionBuilder::on("play").goto("Playing"))
                // volume must stay at or below 11
                .transition(TransitionBuilder::on("volume").effect(|level: &u32| {
                    if *level <= 11 {
                        pure(()).boxed()
                    } else {
                        fail(ActionError::new(format!("volume {level} is too loud"))).boxed()
                    }
                })),
        )
        .build()
        .unwrap()
}

async fn run(policy: HistoryPolicy) {
    println!("--- {policy:?} history ---");

    let observer = Arc::new(RecordingObserver::<&str, &str>::new());
    let mut machine = PassiveMachine::new(player(policy));
    machine.add_observer(observer.clone()).unwrap();
    machine.initialize("Playing").unwrap();
    machine.start().await.unwrap();
    println!("Started:        {:?}", machine.active_path());

    machine.fire("radio", 0).unwrap();
    machine.wait_idle().await;
    println!("Radio music:    {:?}", machine.active_path());

    machine.fire("pause", 0).unwrap();
    machine.fire("volume", 5).unwrap();
    machine.fire("volume", 20).unwrap();
    machine.wait_idle().await;
    println!("Paused:         {:?}", machine.active_path());

    machine.fire("play", 0).unwrap();
    machine.wait_idle().await;
    println!("Resumed:        {:?}", machine.active_path());

    for (failure, event) in observer.failures() {
        println!("Rejected {event:?}: {failure}");
    }
    println!("Remembered:     {:?}\n", machine.snapshot().history);

    machine.stop().await;
}

#[tokio::main]
async fn main() {
    println!("=== History Player Example ===\n");

    run(HistoryPolicy::None).await;
    run(HistoryPolicy::Shallow).await;
    run(HistoryPolicy::Deep).await;

    println!("=== Example Complete ===");
}
