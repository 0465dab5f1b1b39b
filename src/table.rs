//! This module defines the `RuleTable`, the sorted action table queried by the engine
//! on every step.

use log::debug;

use crate::types::{Rule, State, TuringMachineError};

/// An immutable, ordered collection of transition rules.
///
/// Rules are sorted by state and, within a state, specific-symbol rules come before
/// wildcard rules. The sort is stable, so among rules sharing the same state and read
/// symbol the one defined first wins.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleTable {
    rules: Vec<Rule>,
}

impl RuleTable {
    /// Builds a table from the given rules.
    ///
    /// # Returns
    ///
    /// * `Ok(RuleTable)` with the rules sorted for lookup.
    /// * `Err(TuringMachineError::EmptyTable)` if no rules were given.
    pub fn build<I>(rules: I) -> Result<Self, TuringMachineError>
    where
        I: IntoIterator<Item = Rule>,
    {
        let mut rules: Vec<Rule> = rules.into_iter().collect();
        if rules.is_empty() {
            return Err(TuringMachineError::EmptyTable);
        }

        rules.sort_by_key(|rule| (rule.state, rule.is_wildcard()));
        debug!("Built rule table with {} rules", rules.len());

        Ok(Self { rules })
    }

    /// Finds the rule for `state` and `symbol`.
    ///
    /// Within the rules of `state`, the first rule reading exactly `symbol` wins,
    /// otherwise the first wildcard rule, otherwise there is no match.
    pub fn lookup(&self, state: State, symbol: char) -> Option<&Rule> {
        self.rules_for(state)
            .iter()
            .find(|rule| rule.read == symbol || rule.is_wildcard())
    }

    /// Returns the contiguous run of rules for `state`.
    pub fn rules_for(&self, state: State) -> &[Rule] {
        let start = self.rules.partition_point(|rule| rule.state < state);
        let end = self.rules.partition_point(|rule| rule.state <= state);
        &self.rules[start..end]
    }

    /// Returns all rules in lookup order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// A built table always holds at least one rule.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Direction, WILDCARD};

    fn rule(state: State, read: char, next_state: State) -> Rule {
        Rule::new(state, read, read, Direction::Stay, next_state)
    }

    #[test]
    fn test_build_empty_table() {
        let result = RuleTable::build(Vec::new());
        assert_eq!(result, Err(TuringMachineError::EmptyTable));
    }

    #[test]
    fn test_build_sorts_by_state_then_wildcard() {
        let table = RuleTable::build(vec![
            rule(2, 'a', 0),
            rule(1, WILDCARD, 0),
            rule(1, 'b', 0),
            rule(0, 'c', 0),
            rule(1, 'a', 0),
        ])
        .unwrap();

        let order: Vec<(State, char)> = table.rules().iter().map(|r| (r.state, r.read)).collect();
        assert_eq!(
            order,
            vec![(0, 'c'), (1, 'b'), (1, 'a'), (1, WILDCARD), (2, 'a')]
        );
        assert_eq!(table.len(), 5);
    }

    #[test]
    fn test_lookup_specific_rule() {
        let table = RuleTable::build(vec![rule(0, '1', 1), rule(0, '0', 2)]).unwrap();

        assert_eq!(table.lookup(0, '0').map(|r| r.next_state), Some(2));
        assert_eq!(table.lookup(0, '1').map(|r| r.next_state), Some(1));
        assert_eq!(table.lookup(0, '-'), None);
        assert_eq!(table.lookup(5, '1'), None);
    }

    #[test]
    fn test_specific_rule_beats_wildcard_in_any_order() {
        let wildcard = rule(0, WILDCARD, 7);
        let specific = rule(0, 'x', 3);

        for rules in [vec![wildcard, specific], vec![specific, wildcard]] {
            let table = RuleTable::build(rules).unwrap();
            assert_eq!(table.lookup(0, 'x'), Some(&specific));
            assert_eq!(table.lookup(0, 'y'), Some(&wildcard));
        }
    }

    #[test]
    fn test_duplicate_rules_first_defined_wins() {
        let table = RuleTable::build(vec![
            rule(0, 'a', 1),
            rule(1, 'a', 9),
            rule(0, 'a', 2),
            rule(0, WILDCARD, 3),
            rule(0, WILDCARD, 4),
        ])
        .unwrap();

        assert_eq!(table.lookup(0, 'a').map(|r| r.next_state), Some(1));
        assert_eq!(table.lookup(0, 'b').map(|r| r.next_state), Some(3));
    }

    #[test]
    fn test_rules_for_state() {
        let table =
            RuleTable::build(vec![rule(3, 'a', 0), rule(1, 'a', 0), rule(3, 'b', 0)]).unwrap();

        assert_eq!(table.rules_for(3).len(), 2);
        assert_eq!(table.rules_for(1).len(), 1);
        assert!(table.rules_for(2).is_empty());
        assert!(table.rules_for(9).is_empty());
    }
}
