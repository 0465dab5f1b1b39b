//! This module provides the `ProgramLoader` struct, responsible for loading machine
//! definitions from files and strings.

use crate::parser::{parse, unreadable_input};
use crate::types::{Definition, TuringMachineError};
use log::debug;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// `ProgramLoader` is a utility struct for loading machine definitions.
pub struct ProgramLoader;

impl ProgramLoader {
    /// Loads a machine definition from the specified file path.
    ///
    /// # Arguments
    ///
    /// * `path` - A reference to the `Path` of the definition file to load.
    ///
    /// # Returns
    ///
    /// * `Ok(Definition)` if the file is successfully read and parsed.
    /// * `Err(TuringMachineError::FileOpen)` if the file cannot be opened or read.
    /// * `Err(TuringMachineError::TapeRead)` if the file is not valid UTF-8.
    /// * Any parse or analysis error, with the file path attached to syntax errors.
    pub fn load_program(path: &Path) -> Result<Definition, TuringMachineError> {
        let content = fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::InvalidData => {
                unreadable_input(&e.to_string()).with_path(&path.display().to_string())
            }
            _ => TuringMachineError::FileOpen(format!("{}: {}", path.display(), e)),
        })?;
        debug!("Read {} bytes from {}", content.len(), path.display());

        parse(&content).map_err(|e| e.with_path(&path.display().to_string()))
    }

    /// Loads a machine definition from the provided string content.
    ///
    /// # Returns
    ///
    /// * `Ok(Definition)` if the content is successfully parsed.
    /// * Any parse or analysis error otherwise.
    pub fn load_program_from_string(content: &str) -> Result<Definition, TuringMachineError> {
        parse(content)
    }
}
