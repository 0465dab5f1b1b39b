//! This module provides the parser for machine definition files, utilizing the `pest` crate.
//! It defines the grammar for definition files and functions to parse the input into a
//! `Definition` struct.

use crate::{
    analyzer::{analyze, lint},
    types::{Definition, Direction, Rule as ActionRule, State, TuringMachineError, BLANK_SYMBOL},
};
use log::{debug, warn};
use pest::{
    error::{Error, ErrorVariant, LineColLocation},
    iterators::{Pair, Pairs},
    Parser as PestParser, Position, Span,
};
use pest_derive::Parser as PestParser;

/// Line holding the initial tape.
const TAPE_LINE: usize = 1;
/// Line holding the head offset.
const OFFSET_LINE: usize = 2;
/// Line holding the start state.
const START_LINE: usize = 3;
/// Line holding the stop state.
const STOP_LINE: usize = 4;

/// Derives a `PestParser` for the definition grammar in `grammar.pest`.
#[derive(PestParser)]
#[grammar = "grammar.pest"]
pub struct DefinitionParser;

/// Parses the given input string into a `Definition`.
///
/// This is the main entry point for parsing machine definitions. Syntax errors are
/// reported with the error kind of the section they occur in. The parsed definition
/// is analyzed before being returned, and lint findings are logged as warnings.
///
/// # Arguments
///
/// * `input` - A string slice containing the machine definition.
///
/// # Returns
///
/// * `Ok(Definition)` if the input is successfully parsed and analyzed.
/// * `Err(TuringMachineError::TapeRead)` if the tape line is malformed.
/// * `Err(TuringMachineError::OffsetParse)` if the offset line is malformed.
/// * `Err(TuringMachineError::StateParse)` if the start or stop state is malformed.
/// * `Err(TuringMachineError::ActionTableParse)` if a rule line is malformed.
/// * `Err(TuringMachineError::EmptyTable)` if no rules are defined.
/// * `Err(TuringMachineError::OffsetOutOfRange)` if the head offset is too large.
pub fn parse(input: &str) -> Result<Definition, TuringMachineError> {
    let root = DefinitionParser::parse(Rule::definition, input)
        .map_err(classify)?
        .next()
        .ok_or_else(|| {
            classify(Error::new_from_pos(
                ErrorVariant::CustomError {
                    message: "Empty definition".to_string(),
                },
                Position::from_start(input),
            ))
        })?;

    let definition = parse_definition(root)?;
    debug!(
        "Parsed definition: {} tape cells, offset {}, {} rules",
        definition.tape.chars().count(),
        definition.offset,
        definition.rules.len()
    );

    analyze(&definition)?;

    for warning in lint(&definition) {
        warn!("{warning}");
    }

    Ok(definition)
}

/// Parses the top-level structure of a definition from a `Pair<Rule::definition>`.
fn parse_definition(pair: Pair<Rule>) -> Result<Definition, TuringMachineError> {
    let mut definition = Definition {
        tape: String::new(),
        offset: 0,
        start_state: 0,
        stop_state: 0,
        rules: Vec::new(),
    };

    for p in pair.into_inner() {
        match p.as_rule() {
            Rule::tape => definition.tape = p.as_str().to_string(),
            Rule::offset => definition.offset = parse_offset(p)?,
            Rule::start => definition.start_state = parse_inner_state(p)?,
            Rule::stop => definition.stop_state = parse_inner_state(p)?,
            Rule::actions => definition.rules = parse_actions(p)?,
            _ => {} // EOI
        }
    }

    Ok(definition)
}

/// Parses the signed head offset.
fn parse_offset(pair: Pair<Rule>) -> Result<i64, TuringMachineError> {
    let span = pair.as_span();
    pair.as_str()
        .parse::<i64>()
        .map_err(|e| parse_error(&format!("Offset {} is not valid: {e}", span.as_str()), span))
}

/// Parses the state wrapped by a `start` or `stop` pair.
fn parse_inner_state(pair: Pair<Rule>) -> Result<State, TuringMachineError> {
    let span = pair.as_span();
    let mut pairs = pair.into_inner();
    parse_state(next_pair(&mut pairs, span)?)
}

/// Parses a state number, rejecting values that do not fit a `State`.
fn parse_state(pair: Pair<Rule>) -> Result<State, TuringMachineError> {
    let span = pair.as_span();
    pair.as_str()
        .parse::<State>()
        .map_err(|e| parse_error(&format!("State {} is not valid: {e}", span.as_str()), span))
}

/// Parses all rules of the action table, in the order they are written.
fn parse_actions(pair: Pair<Rule>) -> Result<Vec<ActionRule>, TuringMachineError> {
    pair.into_inner()
        .filter(|p| p.as_rule() == Rule::action)
        .map(parse_action)
        .collect()
}

/// Parses a single `state read write direction next` rule.
fn parse_action(pair: Pair<Rule>) -> Result<ActionRule, TuringMachineError> {
    let span = pair.as_span();
    let mut pairs = pair.into_inner();

    let state = parse_state(next_pair(&mut pairs, span)?)?;
    let read = parse_symbol(next_pair(&mut pairs, span)?);
    let write = parse_symbol(next_pair(&mut pairs, span)?);
    let direction = parse_direction(next_pair(&mut pairs, span)?)?;
    let next_state = parse_state(next_pair(&mut pairs, span)?)?;

    Ok(ActionRule::new(state, read, write, direction, next_state))
}

/// Parses a single direction from a `Pair<Rule::direction>`.
///
/// Supports `L` or `-1` for Left, `R`, `1` or `+1` for Right, and `S` or `0` for Stay.
fn parse_direction(pair: Pair<Rule>) -> Result<Direction, TuringMachineError> {
    let span = pair.as_span();
    let mut pairs = pair.into_inner();

    match next_pair(&mut pairs, span)?.as_rule() {
        Rule::left => Ok(Direction::Left),
        Rule::right => Ok(Direction::Right),
        Rule::stay => Ok(Direction::Stay),
        _ => Err(parse_error(
            &format!("Unsupported direction: {}", span.as_str()),
            span,
        )),
    }
}

/// Parses a single character symbol.
fn parse_symbol(pair: Pair<Rule>) -> char {
    pair.as_str().chars().next().unwrap_or(BLANK_SYMBOL)
}

/// Takes the next inner pair, reporting an incomplete entry at `span` if there is none.
fn next_pair<'i>(
    pairs: &mut Pairs<'i, Rule>,
    span: Span<'i>,
) -> Result<Pair<'i, Rule>, TuringMachineError> {
    pairs
        .next()
        .ok_or_else(|| parse_error(&format!("Incomplete entry: {}", span.as_str()), span))
}

/// Creates a classified parse error from a message and a `Span`.
fn parse_error(msg: &str, span: Span) -> TuringMachineError {
    classify(Error::new_from_span(
        ErrorVariant::CustomError {
            message: msg.to_string(),
        },
        span,
    ))
}

/// Reports input that cannot be read as text at all, pointing at the tape line.
pub(crate) fn unreadable_input(msg: &str) -> TuringMachineError {
    classify(Error::new_from_pos(
        ErrorVariant::CustomError {
            message: msg.to_string(),
        },
        Position::from_start(""),
    ))
}

/// Maps a pest error to the error kind of the definition section it points at.
fn classify(error: Error<Rule>) -> TuringMachineError {
    let line = match error.line_col {
        LineColLocation::Pos((line, _)) | LineColLocation::Span((line, _), _) => line,
    };

    let error = Box::new(error);
    match line {
        TAPE_LINE => TuringMachineError::TapeRead(error),
        OFFSET_LINE => TuringMachineError::OffsetParse(error),
        START_LINE | STOP_LINE => TuringMachineError::StateParse(error),
        _ => TuringMachineError::ActionTableParse(error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::WILDCARD;

    #[test]
    fn test_parse_simple_definition() {
        let input = "101\n0\n0\n9\n0 1 0 R 0\n0 0 1 S 9\n";

        let definition = parse(input).unwrap();
        assert_eq!(definition.tape, "101");
        assert_eq!(definition.offset, 0);
        assert_eq!(definition.start_state, 0);
        assert_eq!(definition.stop_state, 9);
        assert_eq!(
            definition.rules,
            vec![
                ActionRule::new(0, '1', '0', Direction::Right, 0),
                ActionRule::new(0, '0', '1', Direction::Stay, 9),
            ]
        );
    }

    #[test]
    fn test_parse_without_trailing_newline() {
        let definition = parse("1\n0\n0\n1\n0 1 1 S 1").unwrap();
        assert_eq!(definition.rules.len(), 1);
    }

    #[test]
    fn test_parse_numeric_directions() {
        let input = "1\n0\n0\n1\n0 a b -1 1\n0 b c 0 1\n0 c d 1 1\n0 d e +1 1\n";

        let directions: Vec<Direction> = parse(input)
            .unwrap()
            .rules
            .iter()
            .map(|r| r.direction)
            .collect();
        assert_eq!(
            directions,
            vec![
                Direction::Left,
                Direction::Stay,
                Direction::Right,
                Direction::Right
            ]
        );
    }

    #[test]
    fn test_parse_wildcards_comments_and_blank_lines() {
        let input = "ab\n-3\n1\n2\n# scan\n\n1 * * R 1   # keep going\n  1 - x L 2\n\n";

        let definition = parse(input).unwrap();
        assert_eq!(definition.offset, -3);
        assert_eq!(
            definition.rules,
            vec![
                ActionRule::new(1, WILDCARD, WILDCARD, Direction::Right, 1),
                ActionRule::new(1, '-', 'x', Direction::Left, 2),
            ]
        );
    }

    #[test]
    fn test_parse_empty_tape_line() {
        let definition = parse("\n+2\n0\n1\n0 - 1 S 1\n").unwrap();
        assert_eq!(definition.tape, "");
        assert_eq!(definition.offset, 2);
    }

    #[test]
    fn test_parse_crlf_and_trailing_whitespace() {
        let definition = parse("10 \r\n0\t\r\n0\r\n1 \r\n0 1 0 R 1\r\n").unwrap();
        assert_eq!(definition.tape, "10");
        assert_eq!(definition.stop_state, 1);
        assert_eq!(definition.rules.len(), 1);
    }

    #[test]
    fn test_parse_empty_input() {
        let error = parse("").unwrap_err();
        assert!(matches!(error, TuringMachineError::TapeRead(_)));
    }

    #[test]
    fn test_parse_tape_with_whitespace() {
        let error = parse("1 0\n0\n0\n1\n0 1 0 R 1\n").unwrap_err();
        assert!(matches!(error, TuringMachineError::TapeRead(_)));
    }

    #[test]
    fn test_parse_tape_with_wildcard() {
        let error = parse("1*0\n0\n0\n1\n0 1 0 R 1\n").unwrap_err();
        assert!(matches!(error, TuringMachineError::TapeRead(_)));
    }

    #[test]
    fn test_parse_invalid_offset() {
        let error = parse("1\nabc\n0\n1\n0 1 0 R 1\n").unwrap_err();
        assert!(matches!(error, TuringMachineError::OffsetParse(_)));
    }

    #[test]
    fn test_parse_overflowing_offset() {
        let error = parse("1\n99999999999999999999\n0\n1\n0 1 0 R 1\n").unwrap_err();
        assert!(matches!(error, TuringMachineError::OffsetParse(_)));
        assert!(error.to_string().contains("is not valid"));
    }

    #[test]
    fn test_parse_invalid_start_state() {
        let error = parse("1\n0\n-1\n1\n0 1 0 R 1\n").unwrap_err();
        assert!(matches!(error, TuringMachineError::StateParse(_)));
    }

    #[test]
    fn test_parse_missing_stop_state() {
        let error = parse("1\n0\n0\n").unwrap_err();
        assert!(matches!(error, TuringMachineError::StateParse(_)));
    }

    #[test]
    fn test_parse_overflowing_stop_state() {
        let error = parse("1\n0\n0\n4294967296\n0 1 0 R 1\n").unwrap_err();
        assert!(matches!(error, TuringMachineError::StateParse(_)));
    }

    #[test]
    fn test_parse_malformed_action() {
        let error = parse("1\n0\n0\n1\n0 1 0 R 1\n0 1 0\n").unwrap_err();
        assert!(matches!(error, TuringMachineError::ActionTableParse(_)));
        assert!(error.to_string().contains("6:"));
    }

    #[test]
    fn test_parse_unsupported_direction() {
        let error = parse("1\n0\n0\n1\n0 1 0 X 1\n").unwrap_err();
        assert!(matches!(error, TuringMachineError::ActionTableParse(_)));
    }

    #[test]
    fn test_parse_overflowing_rule_state() {
        let error = parse("1\n0\n0\n1\n0 1 0 R 4294967296\n").unwrap_err();
        assert!(matches!(error, TuringMachineError::ActionTableParse(_)));
    }

    #[test]
    fn test_parse_empty_action_table() {
        let error = parse("1\n0\n0\n1\n# nothing here\n").unwrap_err();
        assert_eq!(error, TuringMachineError::EmptyTable);

        let error = parse("1\n0\n0\n1").unwrap_err();
        assert_eq!(error, TuringMachineError::EmptyTable);
    }

    #[test]
    fn test_parse_offset_out_of_range() {
        let error = parse("1\n-2000000\n0\n1\n0 1 0 R 1\n").unwrap_err();
        assert_eq!(error, TuringMachineError::OffsetOutOfRange(-2_000_000));
    }
}
