//! Property-based tests for the causal history laws.
//!
//! These tests use proptest to drive the history, the observing decorator
//! and the interpreter through random operation sequences.

use causality::core::{CausalHistory, CausalNode, HistoryOps, ObservingHistory, Trigger};
use causality::interpreter::Interpreter;
use causality::machine::{MachineConfig, StateMachine, StateNodeConfig};
use proptest::prelude::*;

type Node = CausalNode<u32, String>;

#[derive(Clone, Debug)]
enum Op {
    Write(u8),
    Undo,
    Redo,
    UndoToRoot,
    Pause,
    Resume,
    ClearPaused,
}

prop_compose! {
    fn arbitrary_state()(variant in 0..4u8) -> String {
        match variant {
            0 => "idle",
            1 => "cooking",
            2 => "completed",
            _ => "failed",
        }
        .to_string()
    }
}

fn arbitrary_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0..4u8).prop_map(Op::Write),
        2 => Just(Op::Undo),
        2 => Just(Op::Redo),
        1 => Just(Op::UndoToRoot),
        1 => Just(Op::Pause),
        1 => Just(Op::Resume),
        1 => Just(Op::ClearPaused),
    ]
}

fn root() -> Node {
    CausalNode::root("idle", 0)
}

fn write<H: HistoryOps<u32, String>>(history: &mut H, state: &str) {
    let parent = history.head_index();
    let ctx = *history.head().context() + 1;
    history.write(CausalNode::new(
        state,
        ctx,
        Trigger::Event(format!("TO_{state}")),
        Some(parent),
    ));
}

fn apply<H: HistoryOps<u32, String>>(history: &mut H, op: &Op) -> bool {
    match op {
        Op::Write(n) => {
            write(history, &format!("s{n}"));
            true
        }
        Op::Undo => history.undo(),
        Op::Redo => history.redo(),
        Op::UndoToRoot => history.undo_to_root(),
        Op::Pause => {
            history.pause();
            true
        }
        Op::Resume => history.resume(),
        Op::ClearPaused => {
            history.clear_paused();
            true
        }
    }
}

fn loop_machine() -> StateMachine<u32> {
    let config = MachineConfig::new("idle", 0)
        .with_state("idle", StateNodeConfig::new().on("START", "cooking"))
        .with_state("cooking", StateNodeConfig::new().on("DONE", "completed"))
        .with_state("completed", StateNodeConfig::new().on("RESET", "idle"));
    StateMachine::new(config).unwrap()
}

proptest! {
    #[test]
    fn write_enables_undo_and_clears_redo(
        ops in prop::collection::vec(arbitrary_op(), 0..30),
        state in arbitrary_state()
    ) {
        let mut history = CausalHistory::new(root());
        for op in &ops {
            apply(&mut history, op);
        }

        write(&mut history, &state);
        prop_assert!(history.can_undo());
        prop_assert!(!history.can_redo());
        prop_assert_eq!(history.redo_len(), 0);
    }

    #[test]
    fn undo_then_redo_restores_head(ops in prop::collection::vec(arbitrary_op(), 1..30)) {
        let mut history = CausalHistory::new(root());
        for op in &ops {
            apply(&mut history, op);
        }

        let before = history.head().clone();
        if history.undo() {
            prop_assert!(history.redo());
            prop_assert_eq!(history.head(), &before);
        }
    }

    #[test]
    fn redo_then_undo_restores_head(ops in prop::collection::vec(arbitrary_op(), 1..30)) {
        let mut history = CausalHistory::new(root());
        for op in &ops {
            apply(&mut history, op);
        }

        let before = history.head().clone();
        if history.redo() {
            prop_assert!(history.undo());
            prop_assert_eq!(history.head(), &before);
        }
    }

    #[test]
    fn write_after_undo_invalidates_redo(depth in 1..10usize, undos in 1..10usize) {
        let mut history = CausalHistory::new(root());
        for i in 0..depth {
            write(&mut history, &format!("s{i}"));
        }
        for _ in 0..undos.min(depth) {
            history.undo();
        }
        prop_assert!(history.can_redo());

        write(&mut history, "branch");
        prop_assert!(!history.can_redo());
    }

    #[test]
    fn undo_to_root_from_depth(depth in 0..20usize) {
        let mut history = CausalHistory::new(root());
        for i in 0..depth {
            write(&mut history, &format!("s{i}"));
        }
        let before = history.head().clone();

        let moved = history.undo_to_root();
        prop_assert_eq!(moved, depth > 0);
        prop_assert!(!history.can_undo());
        if depth > 0 {
            prop_assert!(history.can_redo());
            prop_assert_eq!(history.redo_len(), depth);
            prop_assert_eq!(history.head().state_value(), "idle");
        } else {
            prop_assert_eq!(history.head(), &before);
        }
    }

    #[test]
    fn pause_then_resume_restores_head(ops in prop::collection::vec(arbitrary_op(), 0..30)) {
        let mut history = CausalHistory::new(root());
        for op in &ops {
            apply(&mut history, op);
        }

        let before = history.head().clone();
        history.pause();
        prop_assert!(history.resume());
        prop_assert_eq!(history.head(), &before);
        prop_assert!(!history.is_paused());
    }

    #[test]
    fn stacks_match_capabilities(ops in prop::collection::vec(arbitrary_op(), 0..40)) {
        let mut history = CausalHistory::new(root());
        for op in &ops {
            apply(&mut history, op);
            prop_assert_eq!(history.can_undo(), history.past_len() > 0);
            prop_assert_eq!(history.can_redo(), history.redo_len() > 0);
        }
    }

    #[test]
    fn decorator_behaves_like_plain_history(ops in prop::collection::vec(arbitrary_op(), 0..40)) {
        let mut plain = CausalHistory::new(root());
        let mut observed = ObservingHistory::with_metrics(CausalHistory::new(root()));

        for op in &ops {
            let expected = apply(&mut plain, op);
            let actual = apply(&mut observed, op);
            prop_assert_eq!(expected, actual);
            prop_assert_eq!(plain.head().state_value(), observed.head().state_value());
            prop_assert_eq!(plain.head().context(), observed.head().context());
            prop_assert_eq!(plain.can_undo(), observed.can_undo());
            prop_assert_eq!(plain.can_redo(), observed.can_redo());
            prop_assert_eq!(plain.is_paused(), observed.is_paused());
        }
    }

    #[test]
    fn decorator_counts_only_effects(ops in prop::collection::vec(arbitrary_op(), 0..40)) {
        let mut observed = ObservingHistory::with_metrics(CausalHistory::new(root()));
        let mut writes = 0u64;
        let mut undos = 0u64;
        let mut redos = 0u64;
        let mut resumes = 0u64;

        for op in &ops {
            let effect = apply(&mut observed, op);
            match op {
                Op::Write(_) => writes += 1,
                Op::Undo if effect => undos += 1,
                Op::Redo if effect => redos += 1,
                Op::Resume if effect => resumes += 1,
                _ => {}
            }
        }

        let snapshot = observed.metrics().snapshot();
        prop_assert_eq!(snapshot.writes, writes);
        prop_assert_eq!(snapshot.undos, undos);
        prop_assert_eq!(snapshot.redos, redos);
        prop_assert_eq!(snapshot.resumes, resumes);
    }

    #[test]
    fn unknown_events_never_write(events in prop::collection::vec("[A-Z]{1,6}", 0..20)) {
        let mut service: Interpreter<u32, String> = Interpreter::interpret(loop_machine());
        for event in events {
            let before = service.history().len();
            let written = service.send(event);
            prop_assert_eq!(service.history().len(), before + usize::from(written));
        }
    }

    #[test]
    fn lineage_ends_at_root(ops in prop::collection::vec(arbitrary_op(), 0..30)) {
        let mut history = CausalHistory::new(root());
        for op in &ops {
            apply(&mut history, op);
        }

        let last = history.lineage().last().unwrap();
        prop_assert!(last.is_root());
        prop_assert_eq!(last.state_value(), "idle");
    }
}
