//! This module defines the `TuringMachine` struct, which simulates a single-tape Turing
//! Machine. It owns the tape and the rule table, and drives the step/run loop until the
//! machine reaches its stop state or gets stuck.

use log::{info, trace};

use crate::table::RuleTable;
use crate::tape::Tape;
use crate::types::{Definition, Halt, Rule, State, Status, Step, Trace, TuringMachineError};

/// Represents a single-tape Turing Machine.
///
/// This struct encapsulates the current state, the tape with its head, the stop state,
/// and the sorted rule table. The definition it was built from is kept for `reset`.
pub struct TuringMachine {
    state: State,
    stop_state: State,
    tape: Tape,
    table: RuleTable,
    status: Status,
    definition: Definition,
    step_count: usize,
}

impl TuringMachine {
    /// Creates a new `TuringMachine` from a `Definition`.
    ///
    /// # Returns
    ///
    /// * `Ok(TuringMachine)` primed to run from the start state.
    /// * `Err(TuringMachineError::EmptyTable)` if the definition has no rules.
    /// * `Err(TuringMachineError::OffsetOutOfRange)` if the head offset exceeds `MAX_HEAD_OFFSET`.
    /// * `Err(TuringMachineError::Allocation)` if the initial tape cannot be grown to the head offset.
    pub fn new(definition: Definition) -> Result<Self, TuringMachineError> {
        let table = RuleTable::build(definition.rules.iter().copied())?;
        let tape = definition.tape()?;

        Ok(Self {
            state: definition.start_state,
            stop_state: definition.stop_state,
            tape,
            table,
            status: initial_status(&definition),
            definition,
            step_count: 0,
        })
    }

    /// Executes a single step of the computation.
    ///
    /// # Returns
    ///
    /// * `Ok(Step::Continue)` if a rule was applied.
    /// * `Ok(Step::Halt(Halt::Ok))` if the machine is in its stop state.
    /// * `Ok(Step::Halt(Halt::Stuck { .. }))` if no rule matches the current state and symbol.
    /// * `Err(TuringMachineError::Allocation)` if the tape could not grow.
    pub fn step(&mut self) -> Result<Step, TuringMachineError> {
        if self.state == self.stop_state {
            self.status = Status::Halted;
            return Ok(Step::Halt(Halt::Ok));
        }

        let symbol = self.tape.read();
        let rule = match self.table.lookup(self.state, symbol) {
            Some(rule) => *rule,
            None => {
                self.status = Status::Stuck;
                return Ok(Step::Halt(Halt::Stuck {
                    state: self.state,
                    symbol,
                }));
            }
        };

        trace!("Applying rule {rule} at head {}", self.tape.head());

        self.tape.write(rule.write);
        self.tape.move_head(rule.direction)?;
        self.state = rule.next_state;
        self.step_count += 1;

        Ok(Step::Continue)
    }

    /// Runs the machine until it halts or gets stuck.
    ///
    /// There is no step limit: a machine that never reaches its stop state runs forever.
    pub fn run(&mut self) -> Result<Halt, TuringMachineError> {
        self.run_with(|_| {})
    }

    /// Runs the machine like `run`, passing a `Trace` of the machine to `observer`
    /// before every step, including the final one that detects the terminal state.
    pub fn run_with<F>(&mut self, mut observer: F) -> Result<Halt, TuringMachineError>
    where
        F: FnMut(&Trace),
    {
        loop {
            observer(&self.trace());

            if let Step::Halt(halt) = self.step()? {
                match &halt {
                    Halt::Ok => info!(
                        "Machine halted in state {} after {} steps",
                        self.state, self.step_count
                    ),
                    Halt::Stuck { state, symbol } => info!(
                        "Machine stuck in state {state} reading '{symbol}' after {} steps",
                        self.step_count
                    ),
                }
                return Ok(halt);
            }
        }
    }

    /// Returns a snapshot of the current configuration.
    pub fn trace(&self) -> Trace<'_> {
        Trace {
            step: self.step_count,
            state: self.state,
            head: self.tape.head(),
            tape: self.tape.cells(),
        }
    }

    /// Returns the current state.
    pub fn state(&self) -> State {
        self.state
    }

    /// Returns the stop state.
    pub fn stop_state(&self) -> State {
        self.stop_state
    }

    /// Returns the execution status.
    pub fn status(&self) -> Status {
        self.status
    }

    /// Checks whether the machine is in its stop state.
    pub fn is_halted(&self) -> bool {
        self.state == self.stop_state
    }

    /// Resets the machine to its initial configuration.
    pub fn reset(&mut self) -> Result<(), TuringMachineError> {
        self.tape = self.definition.tape()?;
        self.state = self.definition.start_state;
        self.status = initial_status(&self.definition);
        self.step_count = 0;
        Ok(())
    }

    /// Returns the number of rules applied so far.
    pub fn step_count(&self) -> usize {
        self.step_count
    }

    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    pub fn head(&self) -> usize {
        self.tape.head()
    }

    /// Returns the symbol under the head.
    pub fn symbol(&self) -> char {
        self.tape.read()
    }

    pub fn table(&self) -> &RuleTable {
        &self.table
    }

    /// Returns the rule that the next step would apply, if any.
    pub fn transition(&self) -> Option<&Rule> {
        self.table.lookup(self.state, self.tape.read())
    }
}

/// A machine that starts in its stop state is halted before its first step.
fn initial_status(definition: &Definition) -> Status {
    if definition.start_state == definition.stop_state {
        Status::Halted
    } else {
        Status::Running
    }
}
