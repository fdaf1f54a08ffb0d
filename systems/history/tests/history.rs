use gridpack_system_history::{CommandHistory, CommandOutcome, ReversibleCommand};
use proptest::prelude::*;

/// Journal of everything the commands did, in order.
#[derive(Debug, Default)]
struct Journal {
    value: i64,
    entries: Vec<String>,
}

#[derive(Debug)]
struct Add {
    name: &'static str,
    amount: i64,
}

impl ReversibleCommand<Journal> for Add {
    fn execute(&mut self, target: &mut Journal) -> CommandOutcome {
        target.value += self.amount;
        target.entries.push(format!("execute {}", self.name));
        CommandOutcome::Applied
    }

    fn undo(&mut self, target: &mut Journal) {
        target.value -= self.amount;
        target.entries.push(format!("undo {}", self.name));
    }
}

#[derive(Debug)]
struct Refuse;

impl ReversibleCommand<Journal> for Refuse {
    fn execute(&mut self, target: &mut Journal) -> CommandOutcome {
        target.entries.push("execute refuse".to_owned());
        CommandOutcome::Skipped
    }

    fn undo(&mut self, target: &mut Journal) {
        target.entries.push("undo refuse".to_owned());
    }
}

fn add(name: &'static str, amount: i64) -> Box<dyn ReversibleCommand<Journal>> {
    Box::new(Add { name, amount })
}

#[test]
fn undo_runs_in_reverse_execution_order() {
    let mut journal = Journal::default();
    let mut history = CommandHistory::new();

    for (name, amount) in [("c1", 1), ("c2", 10), ("c3", 100)] {
        let outcome = history.execute_command(&mut journal, add(name, amount));
        assert!(outcome.is_applied());
    }
    assert_eq!(journal.value, 111);

    assert!(history.undo_last(&mut journal));
    assert!(history.undo_last(&mut journal));
    assert!(history.undo_last(&mut journal));
    assert!(
        !history.undo_last(&mut journal),
        "fourth undo must be a no-op on an empty history",
    );

    assert_eq!(
        journal.entries,
        vec![
            "execute c1",
            "execute c2",
            "execute c3",
            "undo c3",
            "undo c2",
            "undo c1",
        ],
    );
    assert_eq!(journal.value, 0);
}

#[test]
fn skipped_commands_still_occupy_an_undo_slot() {
    let mut journal = Journal::default();
    let mut history = CommandHistory::new();

    let _ = history.execute_command(&mut journal, add("c1", 5));
    let outcome = history.execute_command(&mut journal, Box::new(Refuse));

    assert_eq!(outcome, CommandOutcome::Skipped);
    assert_eq!(history.len(), 2);

    assert!(history.undo_last(&mut journal));
    assert_eq!(journal.entries.last().map(String::as_str), Some("undo refuse"));
    assert_eq!(journal.value, 5, "undoing the skipped command leaves c1 intact");
}

#[test]
fn clear_history_does_not_revert_commands() {
    let mut journal = Journal::default();
    let mut history = CommandHistory::new();

    let _ = history.execute_command(&mut journal, add("c1", 3));
    let _ = history.execute_command(&mut journal, add("c2", 4));
    history.clear_history();

    assert!(history.is_empty());
    assert_eq!(journal.value, 7);
    assert!(!history.undo_last(&mut journal));
    assert_eq!(journal.entries, vec!["execute c1", "execute c2"]);
}

proptest! {
    #[test]
    fn undoing_everything_restores_the_target(amounts in prop::collection::vec(-50i64..50, 0..20)) {
        let mut journal = Journal::default();
        let mut history = CommandHistory::new();

        let mut checkpoints = Vec::with_capacity(amounts.len());
        for amount in &amounts {
            checkpoints.push(journal.value);
            let _ = history.execute_command(&mut journal, add("step", *amount));
        }

        while let Some(expected) = checkpoints.pop() {
            prop_assert!(history.undo_last(&mut journal));
            prop_assert_eq!(journal.value, expected);
        }
        prop_assert!(history.is_empty());
        prop_assert!(!history.undo_last(&mut journal));
    }
}
