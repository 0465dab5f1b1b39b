//! This module defines the core data structures and types used throughout the Turing Machine
//! simulator, including the machine definition, transition rules, execution results, and error types.

use serde::{Deserialize, Serialize, Serializer};
use std::collections::TryReserveError;
use std::fmt;
use thiserror::Error;

use crate::parser::Rule as GrammarRule;
use crate::tape::Tape;

/// The blank symbol used to fill newly allocated tape cells.
pub const BLANK_SYMBOL: char = '-';
/// The wildcard symbol. As a rule's read symbol it matches anything,
/// as a rule's write symbol it leaves the cell unchanged.
pub const WILDCARD: char = '*';
/// The largest head offset (in either direction) a definition may request.
pub const MAX_HEAD_OFFSET: i64 = 1 << 20;

/// Identifier of a machine state.
pub type State = u32;

/// A Turing Machine definition as produced by the loader.
///
/// It holds everything the engine needs to start a run: the initial tape text,
/// the head offset relative to the first tape cell, the start and stop states,
/// and the raw (unsorted) list of transition rules.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Definition {
    /// The initial tape content. An empty string stands for a single blank cell.
    pub tape: String,
    /// The initial head offset. Negative offsets and offsets past the end of the
    /// tape grow the tape with blank cells.
    pub offset: i64,
    /// The state the machine starts in.
    pub start_state: State,
    /// The state whose reach halts the machine.
    pub stop_state: State,
    /// The transition rules, in the order they were defined.
    pub rules: Vec<Rule>,
}

impl Definition {
    /// Builds the initial `Tape`, growing it so that the head offset lands on a cell.
    ///
    /// Offsets beyond `MAX_HEAD_OFFSET` in either direction are rejected before any growth.
    pub fn tape(&self) -> Result<Tape, TuringMachineError> {
        if self.offset.unsigned_abs() > MAX_HEAD_OFFSET.unsigned_abs() {
            return Err(TuringMachineError::OffsetOutOfRange(self.offset));
        }
        Tape::with_offset(&self.tape, self.offset)
    }
}

/// A single transition rule of the action table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    /// The state this rule applies from.
    pub state: State,
    /// The symbol that must be under the head, or `WILDCARD` for any symbol.
    pub read: char,
    /// The symbol to write, or `WILDCARD` to keep the current one.
    pub write: char,
    /// The direction the head moves after writing.
    pub direction: Direction,
    /// The state the machine transitions to.
    pub next_state: State,
}

impl Rule {
    pub fn new(
        state: State,
        read: char,
        write: char,
        direction: Direction,
        next_state: State,
    ) -> Self {
        Self {
            state,
            read,
            write,
            direction,
            next_state,
        }
    }

    /// Returns `true` if this rule matches any symbol under the head.
    pub fn is_wildcard(&self) -> bool {
        self.read == WILDCARD
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {}",
            self.state, self.read, self.write, self.direction, self.next_state
        )
    }
}

/// Represents the possible directions the head can move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Move the head one position to the left.
    Left,
    /// Keep the head in the same position.
    Stay,
    /// Move the head one position to the right.
    Right,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Direction::Left => "L",
            Direction::Stay => "S",
            Direction::Right => "R",
        };
        f.write_str(symbol)
    }
}

/// Represents the outcome of a single execution step.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// The machine applied a rule and continues execution.
    Continue,
    /// The machine reached a terminal state.
    Halt(Halt),
}

/// The terminal outcome of a run.
#[derive(Debug, Clone, PartialEq)]
pub enum Halt {
    /// The machine reached its stop state.
    Ok,
    /// No rule matches the current state and symbol.
    Stuck { state: State, symbol: char },
}

impl Halt {
    /// Converts the outcome into a `Result`, reporting a stuck machine as
    /// `TuringMachineError::UndefinedTransition`.
    pub fn into_result(self) -> Result<(), TuringMachineError> {
        match self {
            Halt::Ok => Ok(()),
            Halt::Stuck { state, symbol } => {
                Err(TuringMachineError::UndefinedTransition(state, symbol))
            }
        }
    }
}

/// The execution status of a machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Running,
    Halted,
    Stuck,
}

/// A snapshot of the machine taken before each step of a run.
#[derive(Debug, Clone, Serialize)]
pub struct Trace<'a> {
    /// Number of rules applied so far.
    pub step: usize,
    /// The current state.
    pub state: State,
    /// The head position.
    pub head: usize,
    /// The full tape content.
    #[serde(serialize_with = "serialize_cells")]
    pub tape: &'a [char],
}

fn serialize_cells<S: Serializer>(cells: &&[char], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&cells.iter().collect::<String>())
}

impl fmt::Display for Trace<'_> {
    /// Renders the state and tape on one line and a caret under the head on the next:
    ///
    /// ```text
    ///    0 | 101
    ///         ^
    /// ```
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = format!("{:>4} | ", self.state);
        let tape: String = self.tape.iter().collect();

        writeln!(f, "{label}{tape}")?;
        write!(f, "{:>1$}", "^", label.len() + self.head + 1)
    }
}

/// Represents various errors that can occur while loading or running a machine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TuringMachineError {
    /// The definition file could not be opened or read.
    #[error("Can not open input file: {0}")]
    FileOpen(String),
    /// The initial tape line is missing or malformed.
    #[error("Unable to read initial tape: {0}")]
    TapeRead(Box<pest::error::Error<GrammarRule>>),
    /// The head offset line is missing or malformed.
    #[error("Invalid head offset: {0}")]
    OffsetParse(Box<pest::error::Error<GrammarRule>>),
    /// The start or stop state line is missing or malformed.
    #[error("Invalid state: {0}")]
    StateParse(Box<pest::error::Error<GrammarRule>>),
    /// A line of the action table is malformed.
    #[error("Invalid action table entry: {0}")]
    ActionTableParse(Box<pest::error::Error<GrammarRule>>),
    /// The head offset would require growing the tape beyond the supported range.
    #[error("Head offset {0} is outside the supported range of +/-{}", MAX_HEAD_OFFSET)]
    OffsetOutOfRange(i64),
    /// The action table has no rules.
    #[error("Action table is empty")]
    EmptyTable,
    /// The tape could not grow. This is fatal for the run.
    #[error("Tape allocation failed: {0}")]
    Allocation(#[from] TryReserveError),
    /// No rule is defined for the current state and symbol.
    #[error("No rule defined for state {0} and symbol '{1}'")]
    UndefinedTransition(State, char),
    /// No embedded demo program has the requested name or index.
    #[error("Program '{0}' not found")]
    ProgramNotFound(String),
}

impl TuringMachineError {
    /// Attaches a file path to parse errors so they point at the definition file.
    pub fn with_path(self, path: &str) -> Self {
        match self {
            Self::TapeRead(e) => Self::TapeRead(Box::new(e.with_path(path))),
            Self::OffsetParse(e) => Self::OffsetParse(Box::new(e.with_path(path))),
            Self::StateParse(e) => Self::StateParse(Box::new(e.with_path(path))),
            Self::ActionTableParse(e) => Self::ActionTableParse(Box::new(e.with_path(path))),
            other => other,
        }
    }

    /// Returns `true` for errors that must abort the whole run.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Allocation(_))
    }
}
