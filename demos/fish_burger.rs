//! Fish Burger Kitchen
//!
//! This example walks a small kitchen machine through sends, undo/redo, a
//! pause checkpoint and a forced override, with the observing history
//! counting every effective operation.
//!
//! Key concepts:
//! - Loading a machine definition from JSON
//! - Undo, redo and rewind-to-root
//! - Pause and resume as a checkpoint jump
//! - Atomic counters readable from another thread
//!
//! Run with: RUST_LOG=causality=debug cargo run --example fish_burger

use causality::core::{CausalHistory, CausalNode, EventKey, HistoryMetrics, ObservingHistory};
use causality::interpreter::Interpreter;
use causality::logging::init_logging;
use causality::machine::StateMachine;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::thread;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Order {
    burgers: u32,
    table: Option<u32>,
}

const KITCHEN: &str = r#"{
    "id": "fishBurger",
    "initial": "idle",
    "context": { "burgers": 0, "table": null },
    "states": {
        "idle": { "on": { "START": "cooking" } },
        "cooking": { "on": { "DONE": { "target": "completed", "actions": ["plate"] } } },
        "completed": { "on": { "RESET": "idle" } }
    }
}"#;

fn main() {
    init_logging();

    println!("=== Fish Burger Kitchen ===\n");

    let machine: StateMachine<Order> = match StateMachine::from_json(KITCHEN) {
        Ok(machine) => machine,
        Err(errors) => {
            eprintln!("{errors}");
            return;
        }
    };

    let root = CausalNode::root(machine.initial(), machine.initial_context().clone());
    let metrics = Arc::new(HistoryMetrics::new());
    let history =
        ObservingHistory::with_logging_and_metrics(CausalHistory::new(root), Arc::clone(&metrics));
    let mut service: Interpreter<Order, &str, _> = Interpreter::interpret_with(machine, history);

    println!("1. Cooking an order");
    service.send_assign("START", |order, _| Order {
        burgers: order.burgers + 1,
        table: Some(7),
    });
    service.send("DONE");
    println!("   State: {} ({:?})\n", service.value(), service.context());

    println!("2. Stepping back and forth");
    service.undo();
    println!("   After undo: {}", service.value());
    service.redo();
    println!("   After redo: {}\n", service.value());

    println!("3. Pause, keep going, resume");
    service.pause();
    service.send("RESET");
    println!("   Moved on to: {}", service.value());
    service.resume();
    println!("   Resumed at: {}\n", service.value());

    println!("4. Forcing a state");
    service.set_state("cooking");
    println!("   Forced to: {} by {:?}\n", service.value(), service.head().event());

    println!("5. Audit trail");
    for node in service.lineage() {
        println!("   {} <- {}", node.state_value(), node.event().event_key());
    }

    println!("\n6. Rewinding");
    service.undo_to_root();
    println!("   Back at: {} ({:?})\n", service.value(), service.context());

    let reader = Arc::clone(&metrics);
    let snapshot = thread::spawn(move || reader.snapshot()).join().unwrap_or_default();
    match serde_json::to_string_pretty(&snapshot) {
        Ok(json) => println!("Metrics:\n{json}"),
        Err(e) => eprintln!("Could not serialize metrics: {e}"),
    }
}
