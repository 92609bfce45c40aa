//! Character Controller
//!
//! This demo wires a small game character as a nested state tree:
//!
//! ```text
//! root
//! ├── Idle
//! ├── Moving
//! └── Combat
//!     ├── Attacking
//!     └── Blocking
//! ```
//!
//! Key concepts:
//! - Nested sub-machines: entering Combat selects its own child
//! - Typed event payloads
//! - Conditions reading shared host data
//!
//! Run with: cargo run --example character_controller

use stateflow::builder::change_to;
use stateflow::{StateError, StateNode, StateNodeBuilder};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[derive(Debug)]
struct Hit {
    damage: u32,
}

#[derive(Default)]
struct World {
    speed: Cell<f32>,
    enemy_near: Cell<bool>,
    health: Cell<u32>,
    log: RefCell<Vec<String>>,
}

impl World {
    fn note(&self, line: impl Into<String>) {
        self.log.borrow_mut().push(line.into());
    }
}

fn build(world: &Rc<World>) -> Result<StateNode, StateError> {
    let root = StateNodeBuilder::new();
    let machine = root.handle();

    let idle = {
        let (w1, w2, w3) = (world.clone(), world.clone(), world.clone());
        StateNodeBuilder::new()
            .on_enter(move || w1.note("idle"))
            .condition(move || w2.speed.get() > 0.0, change_to(&machine, "Moving"))
            .condition(move || w3.enemy_near.get(), change_to(&machine, "Combat"))
            .build()?
    };

    let moving = {
        let (w1, w2, w3) = (world.clone(), world.clone(), world.clone());
        StateNodeBuilder::new()
            .on_update(move |dt| w1.note(format!("moved {:.2}", w1.speed.get() * dt)))
            .condition(move || w2.speed.get() <= 0.0, change_to(&machine, "Idle"))
            .condition(move || w3.enemy_near.get(), change_to(&machine, "Combat"))
            .build()?
    };

    let combat = StateNodeBuilder::new();
    let stance = combat.handle();
    let attacking = {
        let (w1, w2, w3) = (world.clone(), world.clone(), world.clone());
        StateNodeBuilder::new()
            .on_update(move |_| w1.note("swing"))
            .condition(move || !w3.enemy_near.get(), change_to(&machine, "Idle"))
            .typed_event("hit", move |hit: &Hit| {
                w2.health.set(w2.health.get().saturating_sub(hit.damage));
                w2.note(format!("took {} while attacking", hit.damage));
                change_to(&stance, "Blocking")()
            })?
            .build()?
    };
    let blocking = {
        let (w1, w2) = (world.clone(), world.clone());
        StateNodeBuilder::new()
            .condition(move || !w2.enemy_near.get(), change_to(&machine, "Idle"))
            .typed_event("hit", move |hit: &Hit| {
                w1.note(format!("blocked {}", hit.damage));
                Ok(())
            })?
            .build()?
    };
    let combat = {
        let (w1, w2) = (world.clone(), world.clone());
        let enter_stance = change_to(&combat.handle(), "Attacking");
        combat
            .on_enter(move || {
                w1.note("combat");
                // Sub-machine always starts attacking.
                if let Err(error) = enter_stance() {
                    w1.note(format!("no stance: {error}"));
                }
            })
            .on_exit(move || w2.note("combat over"))
            .child("Attacking", attacking)?
            .child("Blocking", blocking)?
            .build()?
    };
    root.child("Idle", idle)?
        .child("Moving", moving)?
        .child("Combat", combat)?
        .initial("Idle")
        .build()
}

fn main() -> Result<(), StateError> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== Character Controller ===\n");

    let world = Rc::new(World::default());
    world.health.set(100);
    let root = build(&world)?;

    world.speed.set(2.0);
    root.update(0.1)?;
    root.update(0.1)?;
    println!("Path: {:?}", root.active_path());

    world.enemy_near.set(true);
    root.update(0.1)?;
    root.update(0.1)?;
    println!("Path: {:?}", root.active_path());

    root.trigger_event_with("hit", &Hit { damage: 12 })?;
    root.trigger_event_with("hit", &Hit { damage: 30 })?;
    println!("Path: {:?}", root.active_path());

    if let Err(error) = root.trigger_event_with("hit", &"not a hit") {
        println!("Rejected payload: {error}");
    }

    world.enemy_near.set(false);
    root.update(0.1)?;
    println!("Path: {:?}", root.active_path());

    println!("Health: {}", world.health.get());
    for line in world.log.borrow().iter() {
        println!("  {line}");
    }

    println!("\n=== Demo Complete ===");
    Ok(())
}
