//! Property-based tests for state node behavior.
//!
//! These tests use proptest to check that registration, stack transitions,
//! update routing and condition ordering hold across many random inputs.

use proptest::prelude::*;
use stateflow::core::{StateError, StateNode, TransitionKind};
use std::cell::{Cell, RefCell};
use std::collections::BTreeSet;
use std::rc::Rc;

const CHILDREN: [&str; 4] = ["Idle", "Moving", "Combat", "Dead"];

#[derive(Clone, Copy, Debug)]
enum Op {
    Push(usize),
    Pop,
    PopNamed(usize),
    Change(usize),
}

prop_compose! {
    fn arbitrary_op()(kind in 0..4u8, index in 0..CHILDREN.len()) -> Op {
        match kind {
            0 => Op::Push(index),
            1 => Op::Pop,
            2 => Op::PopNamed(index),
            _ => Op::Change(index),
        }
    }
}

/// Root with one child per entry in `CHILDREN`, counting enters and exits.
fn counted_root() -> (StateNode, Rc<Cell<usize>>, Rc<Cell<usize>>) {
    let root = StateNode::new();
    let enters = Rc::new(Cell::new(0));
    let exits = Rc::new(Cell::new(0));
    for name in CHILDREN {
        let child = StateNode::new();
        let (on_enter, on_exit) = (Rc::clone(&enters), Rc::clone(&exits));
        child.set_enter_action(move || on_enter.set(on_enter.get() + 1));
        child.set_exit_action(move || on_exit.set(on_exit.get() + 1));
        root.add_child(name, child).unwrap();
    }
    (root, enters, exits)
}

proptest! {
    #[test]
    fn duplicate_names_always_fail(names in prop::collection::vec("[a-z]{1,3}", 1..20)) {
        let root = StateNode::new();
        let mut seen = BTreeSet::new();

        for name in &names {
            let result = root.add_child(name.clone(), StateNode::new());
            if seen.insert(name.clone()) {
                prop_assert!(result.is_ok());
            } else {
                let is_duplicate = matches!(result, Err(StateError::DuplicateName { .. }));
                prop_assert!(is_duplicate);
            }
        }

        let expected: Vec<String> = seen.into_iter().collect();
        prop_assert_eq!(root.child_names(), expected.clone());
        for name in &expected {
            prop_assert!(root.child(name).is_some());
        }
    }

    #[test]
    fn stack_matches_model(ops in prop::collection::vec(arbitrary_op(), 0..40)) {
        let (root, enters, exits) = counted_root();
        let mut model: Vec<&str> = Vec::new();
        let (mut expected_enters, mut expected_exits) = (0, 0);

        for op in ops {
            match op {
                Op::Push(i) => {
                    root.push_state(CHILDREN[i]).unwrap();
                    model.push(CHILDREN[i]);
                    expected_enters += 1;
                }
                Op::Pop | Op::PopNamed(_) => {
                    let result = match op {
                        Op::PopNamed(i) => root.pop_state_named(CHILDREN[i]),
                        _ => root.pop_state(),
                    };
                    if model.pop().is_some() {
                        prop_assert!(result.is_ok());
                        expected_exits += 1;
                    } else {
                        prop_assert_eq!(result, Err(StateError::EmptyStack));
                    }
                }
                Op::Change(i) => {
                    root.change_state(CHILDREN[i]).unwrap();
                    if model.pop().is_some() {
                        expected_exits += 1;
                    }
                    model.push(CHILDREN[i]);
                    expected_enters += 1;
                }
            }
            prop_assert_eq!(root.stack_labels(), model.clone());
        }

        prop_assert_eq!(enters.get(), expected_enters);
        prop_assert_eq!(exits.get(), expected_exits);
    }

    #[test]
    fn change_on_empty_stack_is_push(index in 0..CHILDREN.len()) {
        let (changed, change_enters, change_exits) = counted_root();
        let (pushed, push_enters, push_exits) = counted_root();

        changed.change_state(CHILDREN[index]).unwrap();
        pushed.push_state(CHILDREN[index]).unwrap();

        prop_assert_eq!(changed.stack_labels(), pushed.stack_labels());
        prop_assert_eq!(change_enters.get(), push_enters.get());
        prop_assert_eq!(change_exits.get(), 0);
        prop_assert_eq!(push_exits.get(), 0);
        prop_assert_eq!(changed.history().last().map(|t| t.kind), Some(TransitionKind::Change));
    }

    #[test]
    fn update_reaches_exactly_one_leaf(depth in 0..6usize, dt in 0.0f32..1.0) {
        let hits: Rc<RefCell<Vec<(usize, f32)>>> = Rc::new(RefCell::new(Vec::new()));
        let mut chain = Vec::new();
        for level in 0..=depth {
            let node = StateNode::new();
            let sink = Rc::clone(&hits);
            node.set_update_action(move |dt| sink.borrow_mut().push((level, dt)));
            chain.push(node);
        }
        for level in 0..depth {
            chain[level].add_child("next", chain[level + 1].clone()).unwrap();
            chain[level].push_state("next").unwrap();
        }

        chain[0].update(dt).unwrap();

        prop_assert_eq!(hits.borrow().clone(), vec![(depth, dt)]);
        prop_assert_eq!(chain[0].active_leaf(), chain[depth].clone());
        prop_assert_eq!(chain[0].active_path().len(), depth + 1);
    }

    #[test]
    fn true_conditions_fire_in_registration_order(outcomes in prop::collection::vec(any::<bool>(), 0..16)) {
        let node = StateNode::new();
        let fired = Rc::new(RefCell::new(Vec::new()));
        let polled = Rc::new(Cell::new(0));

        for (index, outcome) in outcomes.iter().copied().enumerate() {
            let sink = Rc::clone(&fired);
            let counter = Rc::clone(&polled);
            node.add_condition(
                move || {
                    counter.set(counter.get() + 1);
                    outcome
                },
                move || {
                    sink.borrow_mut().push(index);
                    Ok(())
                },
            );
        }

        node.update(0.0).unwrap();

        let expected: Vec<usize> = outcomes
            .iter()
            .enumerate()
            .filter_map(|(index, outcome)| outcome.then_some(index))
            .collect();
        prop_assert_eq!(fired.borrow().clone(), expected);
        prop_assert_eq!(polled.get(), outcomes.len());
    }

    #[test]
    fn unknown_event_has_no_side_effects(id in "[a-z]{1,8}") {
        let (root, enters, exits) = counted_root();
        root.push_state("Idle").unwrap();
        let handled = Rc::new(Cell::new(false));
        let flag = Rc::clone(&handled);
        root.set_event(id.clone(), move |_| {
            flag.set(true);
            Ok(())
        })
        .unwrap();

        let result = root.trigger_event(&id);

        prop_assert_eq!(result, Err(StateError::UnknownEvent { id }));
        prop_assert!(!handled.get());
        prop_assert_eq!(root.stack_labels(), vec!["Idle"]);
        prop_assert_eq!((enters.get(), exits.get()), (1, 0));
    }
}
