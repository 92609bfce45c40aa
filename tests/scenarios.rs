//! End-to-end scenarios driving a state tree the way a host frame loop does.

use stateflow::builder::{change_to, pop_from, push_to};
use stateflow::core::{StateError, StateNode};
use stateflow::StateNodeBuilder;
use std::cell::RefCell;
use std::rc::Rc;

type Trace = Rc<RefCell<Vec<String>>>;

fn traced(trace: &Trace, name: &'static str) -> StateNode {
    let (on_enter, on_exit, on_update) = (trace.clone(), trace.clone(), trace.clone());
    StateNodeBuilder::new()
        .on_enter(move || on_enter.borrow_mut().push(format!("{name}.enter")))
        .on_exit(move || on_exit.borrow_mut().push(format!("{name}.exit")))
        .on_update(move |dt| on_update.borrow_mut().push(format!("{name}.update({dt})")))
        .build()
        .unwrap()
}

fn drain(trace: &Trace) -> Vec<String> {
    trace.borrow_mut().drain(..).collect()
}

#[test]
fn idle_to_moving() {
    let trace = Trace::default();
    let root = StateNode::new();
    root.add_child("Idle", traced(&trace, "Idle")).unwrap();
    root.add_child("Moving", traced(&trace, "Moving")).unwrap();

    root.push_state("Idle").unwrap();
    root.update(1.0).unwrap();
    assert_eq!(drain(&trace), vec!["Idle.enter", "Idle.update(1)"]);

    root.change_state("Moving").unwrap();
    assert_eq!(drain(&trace), vec!["Idle.exit", "Moving.enter"]);

    root.update(0.5).unwrap();
    root.update(0.5).unwrap();
    assert_eq!(
        drain(&trace),
        vec!["Moving.update(0.5)", "Moving.update(0.5)"]
    );
}

#[test]
fn events_route_through_nested_machine() {
    let handled = Trace::default();
    let root = StateNode::new();
    let combat = StateNode::new();
    let attacking = StateNode::new();
    root.add_child("Combat", combat.clone()).unwrap();
    combat.add_child("Attacking", attacking.clone()).unwrap();

    for (node, label) in [(&root, "root"), (&combat, "Combat"), (&attacking, "Attacking")] {
        let sink = handled.clone();
        node.set_event("parry", move |_| {
            sink.borrow_mut().push(label.to_string());
            Ok(())
        })
        .unwrap();
    }

    root.push_state("Combat").unwrap();
    combat.push_state("Attacking").unwrap();
    root.trigger_event("parry").unwrap();

    assert_eq!(drain(&handled), vec!["Attacking"]);
    assert_eq!(root.active_leaf(), attacking);
}

#[test]
fn pause_menu_nests_without_exiting_gameplay() {
    let trace = Trace::default();
    let root = StateNodeBuilder::new();
    let machine = root.handle();

    let gameplay = traced(&trace, "Gameplay");
    let pause = push_to(&machine, "Paused");
    gameplay.set_event("escape", move |_| pause()).unwrap();

    let paused = traced(&trace, "Paused");
    let resume = pop_from(&machine);
    paused.set_event("escape", move |_| resume()).unwrap();

    let root = root
        .child("Gameplay", gameplay)
        .unwrap()
        .child("Paused", paused)
        .unwrap()
        .initial("Gameplay")
        .build()
        .unwrap();

    root.trigger_event("escape").unwrap();
    root.update(0.25).unwrap();
    root.trigger_event("escape").unwrap();
    root.update(0.25).unwrap();

    assert_eq!(
        drain(&trace),
        vec![
            "Gameplay.enter",
            "Paused.enter",
            "Paused.update(0.25)",
            "Paused.exit",
            "Gameplay.update(0.25)",
        ]
    );
}

#[test]
fn conditions_take_effect_on_next_tick() {
    let trace = Trace::default();
    let root = StateNodeBuilder::new();
    let machine = root.handle();

    let idle = traced(&trace, "Idle");
    idle.add_condition(|| true, change_to(&machine, "Moving"));

    let root = root
        .child("Idle", idle)
        .unwrap()
        .child("Moving", traced(&trace, "Moving"))
        .unwrap()
        .initial("Idle")
        .build()
        .unwrap();
    drain(&trace);

    root.update(1.0).unwrap();
    assert_eq!(
        drain(&trace),
        vec!["Idle.update(1)", "Idle.exit", "Moving.enter"]
    );

    root.update(1.0).unwrap();
    assert_eq!(drain(&trace), vec!["Moving.update(1)"]);
}

#[test]
fn entering_sub_machine_selects_default_child() {
    let trace = Trace::default();
    let root = StateNode::new();
    let combat = traced(&trace, "Combat");
    combat.add_child("Attacking", traced(&trace, "Attacking")).unwrap();
    combat.add_child("Blocking", traced(&trace, "Blocking")).unwrap();

    let stance = change_to(&combat.downgrade(), "Attacking");
    let log = trace.clone();
    combat.set_enter_action(move || {
        log.borrow_mut().push("Combat.enter".to_string());
        stance().unwrap();
    });
    root.add_child("Combat", combat.clone()).unwrap();
    root.add_child("Idle", traced(&trace, "Idle")).unwrap();

    root.change_state("Combat").unwrap();
    combat.change_state("Blocking").unwrap();
    root.change_state("Idle").unwrap();
    root.change_state("Combat").unwrap();

    assert_eq!(
        drain(&trace),
        vec![
            "Combat.enter",
            "Attacking.enter",
            "Attacking.exit",
            "Blocking.enter",
            "Combat.exit",
            "Idle.enter",
            "Idle.exit",
            "Combat.enter",
            "Blocking.exit",
            "Attacking.enter",
        ]
    );
    assert_eq!(root.active_path(), vec!["root", "Combat", "Attacking"]);
}

#[test]
fn transition_errors_surface_from_update() {
    let root = StateNodeBuilder::new();
    let machine = root.handle();
    let root = root
        .condition(|| true, change_to(&machine, "Missing"))
        .build()
        .unwrap();

    let result = root.update(0.1);

    assert_eq!(
        result,
        Err(StateError::UnknownState {
            name: "Missing".to_string()
        })
    );
    assert_eq!(root.stack_depth(), 0);
}

#[test]
fn typed_payload_reaches_leaf_handler() {
    #[derive(Debug)]
    struct Hit {
        damage: u32,
    }

    let taken = Rc::new(RefCell::new(Vec::new()));
    let sink = taken.clone();
    let blocking = StateNodeBuilder::new()
        .typed_event("hit", move |hit: &Hit| {
            sink.borrow_mut().push(hit.damage);
            Ok(())
        })
        .unwrap()
        .build()
        .unwrap();
    let root = StateNodeBuilder::new()
        .child("Blocking", blocking)
        .unwrap()
        .initial("Blocking")
        .build()
        .unwrap();

    root.trigger_event_with("hit", &Hit { damage: 4 }).unwrap();
    let mismatch = root.trigger_event_with("hit", &4u32);

    assert_eq!(*taken.borrow(), vec![4]);
    assert!(matches!(mismatch, Err(StateError::PayloadMismatch { .. })));
}
