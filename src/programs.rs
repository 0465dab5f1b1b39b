use crate::types::{Definition, State, TuringMachineError};

// Embedded demo programs
const PROGRAM_TEXTS: [(&str, &str); 4] = [
    ("flip", include_str!("../demos/flip.tm")),
    ("binary-increment", include_str!("../demos/binary-increment.tm")),
    ("busy-beaver-2", include_str!("../demos/busy-beaver-2.tm")),
    ("unary-addition", include_str!("../demos/unary-addition.tm")),
];

lazy_static::lazy_static! {
    /// The embedded demo programs that parsed successfully, with their names.
    pub static ref PROGRAMS: Vec<(&'static str, Definition)> = PROGRAM_TEXTS
        .iter()
        .filter_map(|&(name, text)| match crate::parser::parse(text) {
            Ok(definition) => Some((name, definition)),
            Err(e) => {
                log::error!("Failed to parse demo program '{name}': {e}");
                None
            }
        })
        .collect();
}

pub struct ProgramManager;

impl ProgramManager {
    /// Get the number of available programs
    pub fn get_program_count() -> usize {
        PROGRAMS.len()
    }

    /// Get a program by its index
    pub fn get_program_by_index(index: usize) -> Result<Definition, TuringMachineError> {
        PROGRAMS
            .get(index)
            .map(|(_, definition)| definition.clone())
            .ok_or_else(|| TuringMachineError::ProgramNotFound(format!("#{index}")))
    }

    /// Get a program by its name
    pub fn get_program_by_name(name: &str) -> Result<Definition, TuringMachineError> {
        PROGRAMS
            .iter()
            .find(|(program_name, _)| *program_name == name)
            .map(|(_, definition)| definition.clone())
            .ok_or_else(|| TuringMachineError::ProgramNotFound(name.to_string()))
    }

    /// List all program names
    pub fn list_program_names() -> Vec<&'static str> {
        PROGRAMS.iter().map(|(name, _)| *name).collect()
    }

    /// Get information about a program by its index
    pub fn get_program_info(index: usize) -> Result<ProgramInfo, TuringMachineError> {
        let (name, definition) = PROGRAMS
            .get(index)
            .ok_or_else(|| TuringMachineError::ProgramNotFound(format!("#{index}")))?;

        let mut states: Vec<State> = definition.rules.iter().map(|rule| rule.state).collect();
        states.sort_unstable();
        states.dedup();

        Ok(ProgramInfo {
            index,
            name: *name,
            tape: definition.tape.clone(),
            start_state: definition.start_state,
            stop_state: definition.stop_state,
            state_count: states.len(),
            rule_count: definition.rules.len(),
        })
    }

    /// Get the original text of a program by its name
    pub fn get_program_text(name: &str) -> Result<&'static str, TuringMachineError> {
        PROGRAM_TEXTS
            .iter()
            .find(|(program_name, _)| *program_name == name)
            .map(|(_, text)| *text)
            .ok_or_else(|| TuringMachineError::ProgramNotFound(name.to_string()))
    }
}

#[derive(Debug, Clone)]
pub struct ProgramInfo {
    pub index: usize,
    pub name: &'static str,
    pub tape: String,
    pub start_state: State,
    pub stop_state: State,
    pub state_count: usize,
    pub rule_count: usize,
}
