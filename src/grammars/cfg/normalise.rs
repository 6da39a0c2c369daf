//! Transformation of a grammar into Chomsky Normal Form.
//!
//! Six passes, applied in a fixed order by [`chomsky_normal_form`]. Every
//! pass is a pure function from one grammar value to a fresh one.

use std::collections::{BTreeSet, VecDeque};

use fnv::FnvHashMap;

use crate::grammars::cfg::{Grammar, Nonterminal, Rule, Symbol};

/// Composition of all six passes.
pub fn chomsky_normal_form(grammar: &Grammar) -> Grammar {
    let grammar = remove_long_rules(grammar);
    let grammar = remove_nullable_rules(&grammar);
    let grammar = update_start(&grammar);
    let grammar = remove_unit_rules(&grammar);
    let grammar = remove_useless_rules(&grammar);
    remove_terminal_rules(&grammar)
}

/// Folds every rule with more than two right-hand symbols into a chain of
/// binary rules, one fresh nonterminal per extra symbol.
pub fn remove_long_rules(grammar: &Grammar) -> Grammar {
    let mut used = BTreeSet::new();
    let mut new_rules = Vec::new();

    for rule in &grammar.rules {
        let mut left = rule.left.clone();
        let mut right = rule.right.clone();
        while right.len() > 2 {
            let fresh = grammar.fresh_nonterminal(&left.symbol, &used, None);
            used.insert(fresh.clone());
            let head = right.remove(0);
            new_rules.push(Rule::new(left, vec![head, Symbol::Nt(fresh.clone())]));
            left = fresh;
        }
        new_rules.push(Rule::new(left, right));
    }

    Grammar::new(grammar.start.clone(), new_rules)
}

/// The nonterminals that derive the empty string, by a counter/worklist
/// fixed point. A rule containing a terminal can never resolve; its counter
/// is pinned to -1.
pub fn nullable_nonterminals(grammar: &Grammar) -> BTreeSet<Nonterminal> {
    let mut concerned: FnvHashMap<&Nonterminal, Vec<usize>> = FnvHashMap::default();
    let mut counter: Vec<isize> = vec![0; grammar.rules.len()];
    let mut queue: VecDeque<Nonterminal> = VecDeque::new();
    let mut nullable = BTreeSet::new();

    for (idx, rule) in grammar.rules.iter().enumerate() {
        let mut contains_terminal = false;
        for symbol in &rule.right {
            match *symbol {
                Symbol::Nt(ref n) => {
                    concerned.entry(n).or_insert_with(Vec::new).push(idx);
                    counter[idx] += 1;
                }
                Symbol::T(_) => contains_terminal = true,
            }
        }
        if contains_terminal {
            counter[idx] = -1;
        }
        if rule.right.is_empty() {
            queue.push_back(rule.left.clone());
        }
    }

    while let Some(left) = queue.pop_front() {
        if !nullable.insert(left.clone()) {
            continue;
        }
        if let Some(indices) = concerned.get(&left) {
            for &idx in indices {
                counter[idx] -= 1;
                if counter[idx] == 0 {
                    queue.push_back(grammar.rules[idx].left.clone());
                }
            }
        }
    }

    nullable
}

/// Replaces every rule by all variants obtained by deleting subsets of its
/// nullable right-hand symbols, dropping fully-empty results. If the start
/// symbol is nullable, a fresh start with an epsilon rule keeps the empty
/// string in the language.
pub fn remove_nullable_rules(grammar: &Grammar) -> Grammar {
    let nullable = nullable_nonterminals(grammar);
    let mut new_rules: Vec<Rule> = Vec::new();

    for rule in &grammar.rules {
        let mut candidates: VecDeque<Vec<Symbol>> = VecDeque::new();
        candidates.push_back(rule.right.clone());

        while let Some(right) = candidates.pop_front() {
            let candidate = Rule::new(rule.left.clone(), right);
            if candidate.right.is_empty() || new_rules.contains(&candidate) {
                continue;
            }
            for (idx, symbol) in candidate.right.iter().enumerate() {
                if let Symbol::Nt(ref n) = *symbol {
                    if nullable.contains(n) {
                        let mut shorter = candidate.right.clone();
                        shorter.remove(idx);
                        candidates.push_back(shorter);
                    }
                }
            }
            new_rules.push(candidate);
        }
    }

    if nullable.contains(&grammar.start) {
        let new_start = grammar.fresh_nonterminal(&grammar.start.symbol, &BTreeSet::new(), None);
        new_rules.push(Rule::new(
            new_start.clone(),
            vec![Symbol::Nt(grammar.start.clone())],
        ));
        new_rules.push(Rule::new(new_start.clone(), Vec::new()));
        return Grammar::new(new_start, new_rules);
    }

    Grammar::new(grammar.start.clone(), new_rules)
}

/// Introduces a fresh start symbol if the current one appears on any
/// right-hand side.
pub fn update_start(grammar: &Grammar) -> Grammar {
    let start_on_rhs = grammar.rules.iter().any(|rule| {
        rule.right.iter().any(|symbol| match *symbol {
            Symbol::Nt(ref n) => *n == grammar.start,
            Symbol::T(_) => false,
        })
    });

    if !start_on_rhs {
        return grammar.clone();
    }

    let new_start = grammar.fresh_nonterminal(&grammar.start.symbol, &BTreeSet::new(), None);
    let mut new_rules = grammar.rules.clone();
    new_rules.push(Rule::new(
        new_start.clone(),
        vec![Symbol::Nt(grammar.start.clone())],
    ));
    Grammar::new(new_start, new_rules)
}

fn unit_target(rule: &Rule) -> Option<&Nonterminal> {
    match rule.right.as_slice() {
        [Symbol::Nt(ref n)] => Some(n),
        _ => None,
    }
}

/// Closes over chains of unit rules `A -> B` and splices the targets'
/// non-unit rules in under the original left-hand side. Self-referential
/// unit rules are dropped and never re-enqueued.
pub fn remove_unit_rules(grammar: &Grammar) -> Grammar {
    let mut concerned: FnvHashMap<&Nonterminal, BTreeSet<usize>> = FnvHashMap::default();
    let mut new_rules: Vec<Rule> = Vec::new();
    let mut queue: VecDeque<Rule> = VecDeque::new();
    let mut seen_unit: BTreeSet<Rule> = BTreeSet::new();

    for (idx, rule) in grammar.rules.iter().enumerate() {
        match unit_target(rule) {
            Some(target) if *target == rule.left => {} // self-loop, dropped
            Some(_) => {
                queue.push_back(rule.clone());
                seen_unit.insert(rule.clone());
                concerned.entry(&rule.left).or_insert_with(BTreeSet::new).insert(idx);
            }
            None => {
                new_rules.push(rule.clone());
                concerned.entry(&rule.left).or_insert_with(BTreeSet::new).insert(idx);
            }
        }
    }

    while let Some(unit) = queue.pop_front() {
        let target = match unit_target(&unit) {
            Some(target) => target.clone(),
            None => continue,
        };

        if let Some(indices) = concerned.get(&target) {
            for &idx in indices {
                let spliced = Rule::new(unit.left.clone(), grammar.rules[idx].right.clone());
                if seen_unit.contains(&spliced) {
                    continue;
                }
                match unit_target(&spliced) {
                    Some(n) => {
                        if *n != spliced.left {
                            seen_unit.insert(spliced.clone());
                            queue.push_back(spliced);
                        }
                    }
                    None => {
                        if !new_rules.contains(&spliced) {
                            new_rules.push(spliced);
                        }
                    }
                }
            }
        }
    }

    Grammar::new(grammar.start.clone(), new_rules)
}

/// The nonterminals that derive at least one terminal string, by the same
/// counter/worklist fixed point as [`nullable_nonterminals`], seeded by
/// rules without nonterminal occurrences.
pub fn generating_nonterminals(grammar: &Grammar) -> BTreeSet<Nonterminal> {
    let mut concerned: FnvHashMap<&Nonterminal, Vec<usize>> = FnvHashMap::default();
    let mut counter: Vec<isize> = vec![0; grammar.rules.len()];
    let mut queue: VecDeque<Nonterminal> = VecDeque::new();
    let mut generating = BTreeSet::new();

    for (idx, rule) in grammar.rules.iter().enumerate() {
        for symbol in &rule.right {
            if let Symbol::Nt(ref n) = *symbol {
                concerned.entry(n).or_insert_with(Vec::new).push(idx);
                counter[idx] += 1;
            }
        }
        if counter[idx] == 0 {
            queue.push_back(rule.left.clone());
        }
    }

    while let Some(left) = queue.pop_front() {
        if !generating.insert(left.clone()) {
            continue;
        }
        if let Some(indices) = concerned.get(&left) {
            for &idx in indices {
                counter[idx] -= 1;
                if counter[idx] == 0 {
                    queue.push_back(grammar.rules[idx].left.clone());
                }
            }
        }
    }

    generating
}

/// The nonterminals reachable from the start symbol, by an iterative
/// depth-first traversal over right-hand sides.
pub fn reachable_nonterminals(grammar: &Grammar) -> BTreeSet<Nonterminal> {
    let mut reachable = BTreeSet::new();
    reachable.insert(grammar.start.clone());
    let mut visited: BTreeSet<Nonterminal> = BTreeSet::new();
    let mut stack = vec![grammar.start.clone()];

    while let Some(nonterminal) = stack.pop() {
        if !visited.insert(nonterminal.clone()) {
            continue;
        }
        for rule in &grammar.rules {
            if rule.left != nonterminal {
                continue;
            }
            for symbol in &rule.right {
                if let Symbol::Nt(ref n) = *symbol {
                    reachable.insert(n.clone());
                    if !visited.contains(n) {
                        stack.push(n.clone());
                    }
                }
            }
        }
    }

    reachable
}

/// Keeps only rules whose left-hand side is both generating and reachable.
pub fn remove_useless_rules(grammar: &Grammar) -> Grammar {
    let generating = generating_nonterminals(grammar);
    let reachable = reachable_nonterminals(grammar);

    let new_rules = grammar
        .rules
        .iter()
        .filter(|rule| generating.contains(&rule.left) && reachable.contains(&rule.left))
        .cloned()
        .collect();

    Grammar::new(grammar.start.clone(), new_rules)
}

/// Replaces terminal operands of binary rules by fresh nonterminals with a
/// single lexical rule each, so length-2 right-hand sides consist solely of
/// nonterminals.
pub fn remove_terminal_rules(grammar: &Grammar) -> Grammar {
    let mut used = BTreeSet::new();
    let mut new_rules = Vec::new();

    for rule in &grammar.rules {
        if rule.right.len() == 2 {
            let mut right = Vec::with_capacity(2);
            for symbol in &rule.right {
                match *symbol {
                    Symbol::T(terminal) => {
                        let fresh =
                            grammar.fresh_nonterminal(&terminal.0.to_string(), &used, None);
                        used.insert(fresh.clone());
                        new_rules.push(Rule::new(fresh.clone(), vec![Symbol::T(terminal)]));
                        right.push(Symbol::Nt(fresh));
                    }
                    Symbol::Nt(_) => right.push(symbol.clone()),
                }
            }
            new_rules.push(Rule::new(rule.left.clone(), right));
        } else {
            new_rules.push(rule.clone());
        }
    }

    Grammar::new(grammar.start.clone(), new_rules)
}
