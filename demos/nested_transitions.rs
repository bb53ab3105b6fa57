//! Nested Transitions
//!
//! This example shows how exit and entry actions are ordered when a transition
//! crosses state hierarchies.
//!
//! Key concepts:
//! - Exiting from the active leaf up to the least common ancestor
//! - Entering from below the ancestor down to the target
//! - The common ancestor itself stays active
//! - Observers receive a record of every committed transition
//!
//! Run with: cargo run --example nested_transitions

use statecraft::builder::{HierarchyBuilder, StateBuilder, StateGraphBuilder, TransitionBuilder};
use statecraft::effects::{MachineObserver, PassiveMachine, TransitionRecord};
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum Room {
    House,
    Upstairs,
    Bedroom,
    Bathroom,
    Downstairs,
    Kitchen,
    Garden,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum Move {
    ToKitchen,
    ToBathroom,
    GoOutside,
}

struct Printer;

impl MachineObserver<Room, Move> for Printer {
    fn transition_completed(&self, record: &TransitionRecord<Room, Move>) {
        println!(
            "  {:?}: {:?} -> {:?} (exited {:?}, entered {:?})",
            record.event, record.from, record.to, record.exited, record.entered
        );
    }
}

fn announced(room: Room) -> StateBuilder<Room, Move, ()> {
    StateBuilder::new(room)
        .on_entry(move || async move {
            println!("    enter {room:?}");
            Ok(())
        })
        .on_exit(move || async move {
            println!("    exit {room:?}");
            Ok(())
        })
}

#[tokio::main]
async fn main() {
    println!("=== Nested Transitions Example ===\n");

    let graph = StateGraphBuilder::new()
        .hierarchy(
            HierarchyBuilder::on(Room::House)
                .initial(Room::Upstairs)
                .substate(Room::Downstairs),
        )
        .hierarchy(
            HierarchyBuilder::on(Room::Upstairs)
                .initial(Room::Bedroom)
                .substate(Room::Bathroom),
        )
        .hierarchy(HierarchyBuilder::on(Room::Downstairs).initial(Room::Kitchen))
        .states(
            [
                Room::House,
                Room::Upstairs,
                Room::Bedroom,
                Room::Bathroom,
                Room::Downstairs,
                Room::Kitchen,
                Room::Garden,
            ]
            .map(announced),
        )
        .state(
            StateBuilder::new(Room::Bedroom)
                .transition(TransitionBuilder::on(Move::ToBathroom).goto(Room::Bathroom))
                .transition(TransitionBuilder::on(Move::ToKitchen).goto(Room::Kitchen)),
        )
        .state(StateBuilder::new(Room::Bathroom).transition(TransitionBuilder::on(Move::ToKitchen).goto(Room::Kitchen)))
        .state(StateBuilder::new(Room::House).transition(TransitionBuilder::on(Move::GoOutside).goto(Room::Garden)))
        .build()
        .unwrap();

    let mut machine = PassiveMachine::new(graph);
    machine.add_observer(Arc::new(Printer)).unwrap();
    machine.initialize(Room::House).unwrap();

    println!("Starting:");
    machine.start().await.unwrap();
    println!("Active path: {:?}\n", machine.active_path());

    // Upstairs is the common ancestor and stays active
    println!("Bedroom -> Bathroom:");
    machine.fire(Move::ToBathroom, ()).unwrap();
    machine.wait_idle().await;

    // House is the common ancestor; Upstairs is exited, Downstairs entered
    println!("\nBathroom -> Kitchen:");
    machine.fire(Move::ToKitchen, ()).unwrap();
    machine.wait_idle().await;

    // Declared on House, so the exit starts at the active Kitchen
    println!("\nKitchen -> Garden:");
    machine.fire(Move::GoOutside, ()).unwrap();
    machine.wait_idle().await;

    println!("\nFinal path: {:?}", machine.active_path());
    machine.stop().await;

    println!("\n=== Example Complete ===");
}
