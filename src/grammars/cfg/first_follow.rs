//! k-bounded FIRST and FOLLOW sets.

use std::collections::BTreeSet;

use fnv::FnvHashMap;

use crate::grammars::cfg::{Grammar, Nonterminal, Rule, Symbol, Terminal};

/// Marks the end of the input in FOLLOW sets.
pub const END_MARKER: Terminal = Terminal('$');

/// A terminal string of bounded length, as found in FIRST and FOLLOW sets.
pub type TerminalString = Vec<Terminal>;

impl Grammar {
    /// The set of terminal strings of length at most `k` that are prefixes
    /// of strings derivable from `symbols`. `k = 0` yields the empty set;
    /// the empty sequence yields the set containing the empty string.
    pub fn first(&self, k: usize, symbols: &[Symbol]) -> BTreeSet<TerminalString> {
        let rules_by_lhs = self.rules_by_lhs();
        first_rec(k, symbols, &BTreeSet::new(), &rules_by_lhs)
    }

    /// The set of terminal strings of length at most `k` that can follow
    /// `nonterminal` in a derivation from the start symbol, computed over a
    /// copy of the rule sequence augmented with a synthetic accepting start
    /// and the `$` end marker. The grammar itself is never touched.
    pub fn follow(&self, k: usize, nonterminal: &Nonterminal) -> BTreeSet<TerminalString> {
        let accepting = self.fresh_nonterminal(&self.start.symbol, &BTreeSet::new(), None);
        let mut augmented = self.rules.clone();
        augmented.push(Rule::new(
            accepting.clone(),
            vec![Symbol::Nt(self.start.clone())],
        ));

        // a single visited set guards the entire query, not each branch
        let mut visited = BTreeSet::new();
        follow_rec(self, k, nonterminal, &accepting, &augmented, &mut visited)
    }
}

/// Pairwise concatenation of two prefix sets, truncated to `max_len`. An
/// empty operand passes the other operand through unchanged.
fn cartesian_product(
    set1: &BTreeSet<TerminalString>,
    set2: &BTreeSet<TerminalString>,
    max_len: usize,
) -> BTreeSet<TerminalString> {
    if set1.is_empty() {
        return set2.clone();
    }
    if set2.is_empty() {
        return set1.clone();
    }

    let mut product = BTreeSet::new();
    for a in set1 {
        for b in set2 {
            let mut word = a.clone();
            word.extend(b.iter().cloned());
            word.truncate(max_len);
            product.insert(word);
        }
    }
    product
}

fn first_rec(
    k: usize,
    symbols: &[Symbol],
    visited: &BTreeSet<Nonterminal>,
    rules_by_lhs: &FnvHashMap<&Nonterminal, Vec<&Rule>>,
) -> BTreeSet<TerminalString> {
    if k == 0 {
        return BTreeSet::new();
    }

    let (head, tail) = match symbols.split_first() {
        Some(split) => split,
        None => {
            let mut epsilon = BTreeSet::new();
            epsilon.insert(Vec::new());
            return epsilon;
        }
    };

    match *head {
        Symbol::T(terminal) => {
            let mut lead = BTreeSet::new();
            lead.insert(vec![terminal]);
            cartesian_product(&lead, &first_rec(k - 1, tail, visited, rules_by_lhs), k)
        }
        Symbol::Nt(ref nonterminal) => {
            // the visited set is copied per expansion branch
            let mut branch_visited = visited.clone();
            let mut first = BTreeSet::new();

            if let Some(rules) = rules_by_lhs.get(nonterminal) {
                for rule in rules {
                    let left_recursive = match rule.right.first() {
                        Some(&Symbol::Nt(ref n)) => n == nonterminal,
                        _ => false,
                    };

                    if left_recursive && branch_visited.contains(nonterminal) {
                        first.extend(cartesian_product(
                            &first_rec(k - 1, &rule.right, &branch_visited, rules_by_lhs),
                            &first_rec(k - 1, tail, &branch_visited, rules_by_lhs),
                            k,
                        ));
                    } else {
                        branch_visited.insert(nonterminal.clone());
                        let mut expanded = rule.right.clone();
                        expanded.extend(tail.iter().cloned());
                        first.extend(first_rec(k, &expanded, &branch_visited, rules_by_lhs));
                    }
                }
            }
            first
        }
    }
}

fn follow_rec(
    grammar: &Grammar,
    k: usize,
    nonterminal: &Nonterminal,
    accepting: &Nonterminal,
    rules: &[Rule],
    visited: &mut BTreeSet<Nonterminal>,
) -> BTreeSet<TerminalString> {
    if nonterminal == accepting {
        let mut end = BTreeSet::new();
        end.insert(vec![END_MARKER]);
        return end;
    }
    if !visited.insert(nonterminal.clone()) {
        return BTreeSet::new();
    }

    let mut follow = BTreeSet::new();
    for rule in rules {
        let position = rule.right.iter().position(|symbol| match *symbol {
            Symbol::Nt(ref n) => n == nonterminal,
            Symbol::T(_) => false,
        });
        if let Some(idx) = position {
            let suffix = &rule.right[idx + 1..];
            let following = follow_rec(grammar, k, &rule.left, accepting, rules, visited);
            if !following.is_empty() {
                for flw in &following {
                    let mut sequence: Vec<Symbol> = suffix.to_vec();
                    sequence.extend(flw.iter().map(|&t| Symbol::T(t)));
                    follow.extend(grammar.first(k, &sequence));
                }
            } else if !suffix.is_empty() {
                follow.extend(grammar.first(k, suffix));
            }
        }
    }
    follow
}
