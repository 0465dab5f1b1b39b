//! This module defines the `Tape`, a contiguous buffer of single-character cells that
//! grows by one blank cell whenever the head moves past either end.

use serde::Serialize;
use std::fmt;

use crate::types::{Direction, TuringMachineError, BLANK_SYMBOL, WILDCARD};

/// The machine's tape together with its read/write head.
///
/// The head always points at an existing cell. Moving it past either end grows
/// the buffer by exactly one blank cell; existing content is never discarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tape {
    cells: Vec<char>,
    head: usize,
    blank: char,
}

impl Tape {
    /// Creates a tape from its initial content with the head on the first cell.
    /// An empty input yields a single blank cell.
    pub fn new(input: &str) -> Self {
        let mut cells: Vec<char> = input.chars().collect();
        if cells.is_empty() {
            cells.push(BLANK_SYMBOL);
        }

        Self {
            cells,
            head: 0,
            blank: BLANK_SYMBOL,
        }
    }

    /// Creates a tape and places the head at `offset`, relative to the first input cell.
    ///
    /// A negative offset prepends `-offset` blank cells and puts the head on cell 0.
    /// An offset past the end appends blank cells up to and including the head cell.
    /// The result is the same as moving the head there one cell at a time.
    pub fn with_offset(input: &str, offset: i64) -> Result<Self, TuringMachineError> {
        let mut tape = Self::new(input);

        if offset < 0 {
            let count = offset.unsigned_abs() as usize;
            let mut cells = Vec::new();
            cells.try_reserve(count.saturating_add(tape.cells.len()))?;
            cells.resize(count, tape.blank);
            cells.extend_from_slice(&tape.cells);
            tape.cells = cells;
        } else {
            let head = offset as usize;
            if head >= tape.cells.len() {
                tape.cells.try_reserve(head + 1 - tape.cells.len())?;
                tape.cells.resize(head + 1, tape.blank);
            }
            tape.head = head;
        }

        Ok(tape)
    }

    /// Returns the symbol under the head.
    pub fn read(&self) -> char {
        self.cells[self.head]
    }

    /// Writes `symbol` under the head. Writing the wildcard leaves the cell unchanged.
    pub fn write(&mut self, symbol: char) {
        if symbol != WILDCARD {
            self.cells[self.head] = symbol;
        }
    }

    /// Moves the head one cell in `direction`, growing the tape when it falls off an end.
    ///
    /// Fails only if the buffer cannot grow.
    pub fn move_head(&mut self, direction: Direction) -> Result<(), TuringMachineError> {
        match direction {
            Direction::Left => {
                if self.head == 0 {
                    self.cells.try_reserve(1)?;
                    self.cells.insert(0, self.blank);
                } else {
                    self.head -= 1;
                }
            }
            Direction::Right => {
                if self.head + 1 == self.cells.len() {
                    self.cells.try_reserve(1)?;
                    self.cells.push(self.blank);
                }
                self.head += 1;
            }
            Direction::Stay => {}
        }

        Ok(())
    }

    /// Returns the full tape content.
    pub fn cells(&self) -> &[char] {
        &self.cells
    }

    /// Returns the head position.
    pub fn head(&self) -> usize {
        self.head
    }

    /// Returns the blank symbol used for new cells.
    pub fn blank(&self) -> char {
        self.blank
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// A tape always holds at least one cell.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl fmt::Display for Tape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.cells.iter().try_for_each(|c| write!(f, "{c}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content(tape: &Tape) -> String {
        tape.to_string()
    }

    #[test]
    fn test_new_tape() {
        let tape = Tape::new("101");
        assert_eq!(tape.cells(), &['1', '0', '1']);
        assert_eq!(tape.head(), 0);
        assert_eq!(tape.read(), '1');
        assert_eq!(tape.blank(), BLANK_SYMBOL);
    }

    #[test]
    fn test_empty_input_is_padded_with_blank() {
        let tape = Tape::new("");
        assert_eq!(tape.cells(), &[BLANK_SYMBOL]);
        assert_eq!(tape.read(), BLANK_SYMBOL);
        assert!(!tape.is_empty());
    }

    #[test]
    fn test_move_within_bounds() {
        let mut tape = Tape::new("abc");
        tape.move_head(Direction::Right).unwrap();
        tape.move_head(Direction::Right).unwrap();
        assert_eq!(tape.head(), 2);
        assert_eq!(tape.read(), 'c');

        tape.move_head(Direction::Left).unwrap();
        assert_eq!(tape.head(), 1);
        assert_eq!(tape.len(), 3);

        tape.move_head(Direction::Stay).unwrap();
        assert_eq!(tape.head(), 1);
        assert_eq!(content(&tape), "abc");
    }

    #[test]
    fn test_grow_left_shifts_content() {
        let mut tape = Tape::new("abc");
        tape.move_head(Direction::Left).unwrap();

        assert_eq!(tape.len(), 4);
        assert_eq!(tape.head(), 0);
        assert_eq!(tape.read(), BLANK_SYMBOL);
        assert_eq!(content(&tape), "-abc");
    }

    #[test]
    fn test_grow_right_keeps_content() {
        let mut tape = Tape::new("abc");
        for _ in 0..3 {
            tape.move_head(Direction::Right).unwrap();
        }

        assert_eq!(tape.len(), 4);
        assert_eq!(tape.head(), 3);
        assert_eq!(tape.read(), BLANK_SYMBOL);
        assert_eq!(content(&tape), "abc-");
    }

    #[test]
    fn test_repeated_left_growth() {
        let mut tape = Tape::new("10");
        for _ in 0..3 {
            tape.move_head(Direction::Left).unwrap();
        }

        assert_eq!(tape.len(), 5);
        assert_eq!(tape.head(), 0);
        assert_eq!(content(&tape), "---10");
    }

    #[test]
    fn test_write() {
        let mut tape = Tape::new("abc");
        tape.move_head(Direction::Right).unwrap();
        tape.write('x');
        assert_eq!(content(&tape), "axc");
    }

    #[test]
    fn test_write_wildcard_is_noop() {
        let mut tape = Tape::new("abc");
        for _ in 0..3 {
            let before = tape.clone();
            tape.write(WILDCARD);
            assert_eq!(tape, before);
            tape.move_head(Direction::Right).unwrap();
        }
        assert_eq!(content(&tape), "abc-");
    }

    #[test]
    fn test_with_offset_inside() {
        let tape = Tape::with_offset("abc", 2).unwrap();
        assert_eq!(tape.head(), 2);
        assert_eq!(tape.read(), 'c');
        assert_eq!(content(&tape), "abc");
    }

    #[test]
    fn test_with_negative_offset() {
        let tape = Tape::with_offset("abc", -2).unwrap();
        assert_eq!(tape.head(), 0);
        assert_eq!(content(&tape), "--abc");
    }

    #[test]
    fn test_with_offset_past_end() {
        let tape = Tape::with_offset("ab", 4).unwrap();
        assert_eq!(tape.head(), 4);
        assert_eq!(content(&tape), "ab---");
    }

    #[test]
    fn test_with_offset_matches_single_moves() {
        let grown = Tape::with_offset("ab", -3).unwrap();

        let mut moved = Tape::new("ab");
        for _ in 0..3 {
            moved.move_head(Direction::Left).unwrap();
        }

        assert_eq!(grown, moved);
    }
}
