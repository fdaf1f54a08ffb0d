#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Last-in-first-out history of reversible commands.
//!
//! Commands never own the state they act upon. The caller hands the target to
//! [`CommandHistory::execute_command`] and [`CommandHistory::undo_last`], which
//! forward it to the command being executed or reverted.

use std::fmt;

use tracing::debug;

/// Result reported by a command after it was asked to execute.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CommandOutcome {
    /// The command mutated its target.
    Applied,
    /// The command declined to mutate its target.
    Skipped,
}

impl CommandOutcome {
    /// Reports whether the command mutated its target.
    #[must_use]
    pub const fn is_applied(self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Unit of work exposing a forward action and its inverse.
///
/// `undo` is only meaningful after `execute`. Implementations decide whether
/// to guard against an `undo` that follows a skipped execution.
pub trait ReversibleCommand<T: ?Sized>: fmt::Debug {
    /// Applies the command to the target.
    fn execute(&mut self, target: &mut T) -> CommandOutcome;

    /// Reverts the command's effect on the target.
    fn undo(&mut self, target: &mut T);
}

/// Ordered record of executed commands, most recent last.
pub struct CommandHistory<T: ?Sized> {
    entries: Vec<Box<dyn ReversibleCommand<T>>>,
}

impl<T: ?Sized> CommandHistory<T> {
    /// Creates an empty history.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Executes the command against the target and records it.
    ///
    /// The command is recorded whatever its outcome, so a skipped command
    /// still occupies an undo slot.
    pub fn execute_command(
        &mut self,
        target: &mut T,
        mut command: Box<dyn ReversibleCommand<T>>,
    ) -> CommandOutcome {
        let outcome = command.execute(target);
        debug!(?command, ?outcome, depth = self.entries.len() + 1, "command executed");
        self.entries.push(command);
        outcome
    }

    /// Reverts and discards the most recently executed command.
    ///
    /// Returns `false` without touching the target when the history is empty.
    pub fn undo_last(&mut self, target: &mut T) -> bool {
        let Some(mut command) = self.entries.pop() else {
            return false;
        };
        command.undo(target);
        debug!(?command, depth = self.entries.len(), "command undone");
        true
    }

    /// Forgets every recorded command without reverting any of them.
    pub fn clear_history(&mut self) {
        debug!(discarded = self.entries.len(), "history cleared");
        self.entries.clear();
    }

    /// Number of commands available for undo.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Reports whether there is nothing to undo.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: ?Sized> Default for CommandHistory<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> fmt::Debug for CommandHistory<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandHistory")
            .field("entries", &self.entries)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Push(u32);

    impl ReversibleCommand<Vec<u32>> for Push {
        fn execute(&mut self, target: &mut Vec<u32>) -> CommandOutcome {
            target.push(self.0);
            CommandOutcome::Applied
        }

        fn undo(&mut self, target: &mut Vec<u32>) {
            let _ = target.pop();
        }
    }

    #[test]
    fn new_history_is_empty() {
        let history = CommandHistory::<Vec<u32>>::new();
        assert!(history.is_empty());
        assert_eq!(history.len(), 0);
    }

    #[test]
    fn execute_records_command() {
        let mut target: Vec<u32> = Vec::new();
        let mut history = CommandHistory::<Vec<u32>>::new();

        let outcome = history.execute_command(&mut target, Box::new(Push(4)));

        assert_eq!(outcome, CommandOutcome::Applied);
        assert_eq!(target, vec![4]);
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn undo_on_empty_history_is_a_no_op() {
        let mut target = vec![1, 2];
        let mut history = CommandHistory::<Vec<u32>>::new();

        assert!(!history.undo_last(&mut target));
        assert_eq!(target, vec![1, 2]);
    }

    #[test]
    fn debug_lists_recorded_commands() {
        let mut target: Vec<u32> = Vec::new();
        let mut history = CommandHistory::<Vec<u32>>::new();
        let _ = history.execute_command(&mut target, Box::new(Push(9)));

        assert_eq!(
            format!("{history:?}"),
            "CommandHistory { entries: [Push(9)] }"
        );
    }
}
