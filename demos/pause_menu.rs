//! Pause Menu
//!
//! This demo nests a pause menu on top of gameplay without leaving it.
//!
//! Key concepts:
//! - `push_state` keeps the previous state on the stack, un-exited
//! - `pop_state` resumes whatever was underneath
//! - Events always reach the top of the stack
//!
//! Run with: cargo run --example pause_menu

use stateflow::builder::{pop_from, push_to};
use stateflow::{StateError, StateNodeBuilder};

fn main() -> Result<(), StateError> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== Pause Menu ===\n");

    let root = StateNodeBuilder::new();
    let machine = root.handle();

    let pause = push_to(&machine, "Paused");
    let gameplay = StateNodeBuilder::new()
        .on_enter(|| println!("Gameplay entered"))
        .on_exit(|| println!("Gameplay exited"))
        .on_update(|dt| println!("Simulating world ({dt:.3}s)"))
        .event("escape", move |_| pause())?
        .build()?;

    let resume = pop_from(&machine);
    let paused = StateNodeBuilder::new()
        .on_enter(|| println!("Pause menu opened"))
        .on_exit(|| println!("Pause menu closed"))
        .on_update(|_| println!("World frozen"))
        .event("escape", move |_| resume())?
        .build()?;

    let root = root
        .child("Gameplay", gameplay)?
        .child("Paused", paused)?
        .initial("Gameplay")
        .build()?;

    root.update(0.016)?;
    root.trigger_event("escape")?;
    println!("Stack: {:?}", root.stack_labels());
    root.update(0.016)?;
    root.trigger_event("escape")?;
    println!("Stack: {:?}", root.stack_labels());
    root.update(0.016)?;

    println!("\nReport:\n{}", root.report().to_json().unwrap_or_default());

    println!("\n=== Demo Complete ===");
    Ok(())
}
