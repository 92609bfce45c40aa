//! Traffic Light
//!
//! This demo drives a cyclic state machine from a fixed-step frame loop.
//!
//! Key concepts:
//! - Sibling transitions with `change_state`
//! - Timer conditions polled once per update at the active leaf
//! - Enter hooks resetting per-state data
//!
//! Run with: cargo run --example traffic_light

use stateflow::builder::change_to;
use stateflow::{StateError, StateNode, StateNodeBuilder, WeakStateNode};
use std::cell::Cell;
use std::rc::Rc;

const FRAME: f32 = 0.5;

/// A light that holds for `hold` seconds, then switches to `next`.
fn timed_light(
    machine: &WeakStateNode,
    color: &'static str,
    hold: f32,
    next: &str,
) -> Result<StateNode, StateError> {
    let elapsed = Rc::new(Cell::new(0.0f32));
    let (reset, tick, probe) = (elapsed.clone(), elapsed.clone(), elapsed);

    StateNodeBuilder::new()
        .on_enter(move || {
            reset.set(0.0);
            println!("  -> {color}");
        })
        .on_update(move |dt| tick.set(tick.get() + dt))
        .condition(move || probe.get() >= hold, change_to(machine, next))
        .build()
}

fn main() -> Result<(), StateError> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== Traffic Light ===\n");

    let root = StateNodeBuilder::new();
    let machine = root.handle();
    let root = root
        .child("Red", timed_light(&machine, "Red", 3.0, "Green")?)?
        .child("Green", timed_light(&machine, "Green", 2.5, "Yellow")?)?
        .child("Yellow", timed_light(&machine, "Yellow", 1.0, "Red")?)?
        .initial("Red")
        .build()?;

    for _ in 0..24 {
        root.update(FRAME)?;
    }

    println!("\nActive path: {:?}", root.active_path());
    println!("Transitions at root: {}", root.history().len());

    println!("\n=== Demo Complete ===");
    Ok(())
}
