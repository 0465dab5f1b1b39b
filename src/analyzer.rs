//! This module provides functions for analyzing machine definitions before execution.
//! `analyze` rejects definitions that can never run, while `lint` reports suspicious but
//! legal constructs as warnings.

use std::collections::HashSet;
use std::fmt;

use crate::types::{Definition, State, TuringMachineError, MAX_HEAD_OFFSET};

/// Represents the errors that make a definition unrunnable.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum AnalysisError {
    /// The action table has no rules.
    EmptyTable,
    /// The head offset is beyond the supported range.
    OffsetOutOfRange(i64),
}

impl From<AnalysisError> for TuringMachineError {
    /// Converts an `AnalysisError` into the matching `TuringMachineError`.
    fn from(error: AnalysisError) -> Self {
        match error {
            AnalysisError::EmptyTable => TuringMachineError::EmptyTable,
            AnalysisError::OffsetOutOfRange(offset) => {
                TuringMachineError::OffsetOutOfRange(offset)
            }
        }
    }
}

/// Non-fatal findings about a definition.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Warning {
    /// More than one rule reads the same symbol in the same state. The first one defined wins.
    DuplicateRule { state: State, read: char },
    /// The start state has no rules and is not the stop state, so the machine is stuck at once.
    StartStateWithoutRules(State),
    /// No rule leads to the stop state, so the machine can only halt if it starts there.
    UnreachableStopState(State),
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::DuplicateRule { state, read } => write!(
                f,
                "Duplicate rule for state {state} reading '{read}', the first one defined wins"
            ),
            Warning::StartStateWithoutRules(state) => {
                write!(f, "Start state {state} has no rules")
            }
            Warning::UnreachableStopState(state) => {
                write!(f, "No rule leads to stop state {state}")
            }
        }
    }
}

/// Analyzes a `Definition` for errors that prevent it from running.
///
/// # Returns
///
/// * `Ok(())` if no errors are found.
/// * `Err(TuringMachineError)` for the first failed check.
pub fn analyze(definition: &Definition) -> Result<(), TuringMachineError> {
    [check_rules, check_offset]
        .iter()
        .try_for_each(|check| check(definition))
        .map_err(TuringMachineError::from)
}

/// Collects the warnings for a `Definition`, in rule order.
pub fn lint(definition: &Definition) -> Vec<Warning> {
    let mut warnings = check_duplicates(definition);

    let start = definition.start_state;
    let stop = definition.stop_state;

    if start != stop && !definition.rules.iter().any(|rule| rule.state == start) {
        warnings.push(Warning::StartStateWithoutRules(start));
    }

    if start != stop && !definition.rules.iter().any(|rule| rule.next_state == stop) {
        warnings.push(Warning::UnreachableStopState(stop));
    }

    warnings
}

/// Checks that at least one rule is defined.
fn check_rules(definition: &Definition) -> Result<(), AnalysisError> {
    if definition.rules.is_empty() {
        return Err(AnalysisError::EmptyTable);
    }
    Ok(())
}

/// Checks that the head offset does not require pathological tape growth.
fn check_offset(definition: &Definition) -> Result<(), AnalysisError> {
    if definition.offset.unsigned_abs() > MAX_HEAD_OFFSET.unsigned_abs() {
        return Err(AnalysisError::OffsetOutOfRange(definition.offset));
    }
    Ok(())
}

/// Finds every `(state, read)` pair defined more than once, reported once each.
fn check_duplicates(definition: &Definition) -> Vec<Warning> {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();

    definition
        .rules
        .iter()
        .filter_map(|rule| {
            let key = (rule.state, rule.read);
            if !seen.insert(key) && reported.insert(key) {
                Some(Warning::DuplicateRule {
                    state: rule.state,
                    read: rule.read,
                })
            } else {
                None
            }
        })
        .collect()
}
