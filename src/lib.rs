//! This crate provides the core logic for a single-tape Turing Machine simulator.
//! It includes modules for loading machine definitions, the growable tape, the
//! wildcard-aware rule table, the execution engine, and a set of embedded demo programs.

pub mod analyzer;
pub mod loader;
pub mod machine;
pub mod parser;
pub mod programs;
pub mod table;
pub mod tape;
pub mod types;

/// Re-exports the `analyze` and `lint` functions from the analyzer module.
pub use analyzer::{analyze, lint, AnalysisError, Warning};
/// Re-exports the `ProgramLoader` struct from the loader module.
pub use loader::ProgramLoader;
/// Re-exports the `TuringMachine` struct from the machine module.
pub use machine::TuringMachine;
/// Re-exports the `parse` function from the parser module.
pub use parser::parse;
/// Re-exports `ProgramInfo`, `ProgramManager`, and `PROGRAMS` from the programs module.
pub use programs::{ProgramInfo, ProgramManager, PROGRAMS};
/// Re-exports the `RuleTable` struct from the table module.
pub use table::RuleTable;
/// Re-exports the `Tape` struct from the tape module.
pub use tape::Tape;
/// Re-exports the definition and execution types from the types module.
pub use types::{
    Definition, Direction, Halt, Rule, State, Status, Step, Trace, TuringMachineError,
    BLANK_SYMBOL, MAX_HEAD_OFFSET, WILDCARD,
};
