//! Line-oriented placement scripts.

use gridpack_core::CellCoord;
use thiserror::Error;

/// Single step of a placement script.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Action {
    /// Holds the named catalog item.
    Pick(String),
    /// Places the held item with its footprint anchored at the cell.
    Place(CellCoord),
    /// Reverts the most recent placement.
    Undo,
    /// Forgets the undo history while keeping placed items.
    Forget,
    /// Empties the grid, the history and the score.
    Reset,
    /// Prints the grid.
    Show,
    /// Prints the score.
    Score,
}

/// Script lines that could not be understood.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub(crate) enum ScriptError {
    /// The first word is not a known action.
    #[error("line {line}: unknown action `{action}`")]
    UnknownAction { line: usize, action: String },
    /// The action expects more arguments than were given.
    #[error("line {line}: `{action}` expects {expected} argument(s)")]
    ArgumentCount {
        line: usize,
        action: &'static str,
        expected: usize,
    },
    /// A coordinate is not a signed integer.
    #[error("line {line}: `{value}` is not a valid coordinate")]
    InvalidCoordinate { line: usize, value: String },
}

/// Parses a whole script, skipping blank lines and `#` comments.
///
/// Returned actions carry their one-based line number.
pub(crate) fn parse(source: &str) -> Result<Vec<(usize, Action)>, ScriptError> {
    let mut actions = Vec::new();
    for (index, raw) in source.lines().enumerate() {
        let line = index + 1;
        let content = raw.split('#').next().unwrap_or_default().trim();
        if content.is_empty() {
            continue;
        }
        actions.push((line, parse_line(line, content)?));
    }
    Ok(actions)
}

fn parse_line(line: usize, content: &str) -> Result<Action, ScriptError> {
    let mut words = content.split_whitespace();
    let Some(keyword) = words.next() else {
        return Err(ScriptError::UnknownAction {
            line,
            action: String::new(),
        });
    };
    let arguments: Vec<&str> = words.collect();

    let expect = |action: &'static str, expected: usize| {
        if arguments.len() == expected {
            Ok(())
        } else {
            Err(ScriptError::ArgumentCount {
                line,
                action,
                expected,
            })
        }
    };

    match keyword {
        "pick" => {
            expect("pick", 1)?;
            Ok(Action::Pick(arguments[0].to_owned()))
        }
        "place" => {
            expect("place", 2)?;
            let x = parse_coordinate(line, arguments[0])?;
            let y = parse_coordinate(line, arguments[1])?;
            Ok(Action::Place(CellCoord::new(x, y)))
        }
        "undo" => expect("undo", 0).map(|()| Action::Undo),
        "forget" => expect("forget", 0).map(|()| Action::Forget),
        "reset" => expect("reset", 0).map(|()| Action::Reset),
        "show" => expect("show", 0).map(|()| Action::Show),
        "score" => expect("score", 0).map(|()| Action::Score),
        other => Err(ScriptError::UnknownAction {
            line,
            action: other.to_owned(),
        }),
    }
}

fn parse_coordinate(line: usize, value: &str) -> Result<i32, ScriptError> {
    value.parse().map_err(|_| ScriptError::InvalidCoordinate {
        line,
        value: value.to_owned(),
    })
}
