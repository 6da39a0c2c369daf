//! Random grammars, bounded word enumeration, and an approximate
//! substitutability check. Testing and benchmarking tooling around the
//! learner; nothing in here is required for recognition or learning itself.

use std::collections::{BTreeMap, BTreeSet};
use std::time::{Duration, Instant};

use rand::seq::SliceRandom;
use rand::Rng;

use crate::grammars::cfg::{Grammar, Nonterminal, Rule, Symbol, Terminal};
use crate::learning::contexts;
use crate::recognisable::cyk::CykRecogniser;

const WORD_LIMIT: usize = 100_000;

/// Samples a small random grammar: an alphabet of 2 to 4 lowercase letters,
/// 1 to 5 nonterminals besides the start symbol, 1 to 3 rules per
/// nonterminal with right-hand sides of 1 to 3 sampled symbols, and one
/// terminal rule per non-start nonterminal so every one of them generates.
pub fn random_grammar<R: Rng>(rng: &mut R) -> Grammar {
    let letters: Vec<char> = (b'a'..=b'z').map(char::from).collect();

    let alphabet_size = rng.gen_range(2, 5);
    let terminals: Vec<Symbol> = letters
        .choose_multiple(rng, alphabet_size)
        .map(|&c| Symbol::T(Terminal(c)))
        .collect();

    let start = Nonterminal::new("S");
    let extra_count = rng.gen_range(1, 6);
    let mut nonterminals = vec![start.clone()];
    nonterminals.extend(
        letters
            .choose_multiple(rng, extra_count)
            .map(|c| Nonterminal::new(format!("[[{}]]", c))),
    );

    let samples: Vec<Symbol> = nonterminals[1..]
        .iter()
        .cloned()
        .map(Symbol::Nt)
        .chain(terminals.iter().cloned())
        .collect();

    let mut rules = Vec::new();
    for nonterminal in &nonterminals {
        for _ in 0..rng.gen_range(1, 4) {
            let len = std::cmp::min(rng.gen_range(1, 4), samples.len());
            let right: Vec<Symbol> = samples.choose_multiple(rng, len).cloned().collect();
            rules.push(Rule::new(nonterminal.clone(), right));
        }
    }
    for nonterminal in &nonterminals[1..] {
        let terminal = terminals
            .choose(rng)
            .expect("the alphabet is never empty")
            .clone();
        rules.push(Rule::new(nonterminal.clone(), vec![terminal]));
    }

    Grammar::new(start, rules)
}

/// Enumerates words of the grammar's language by bounded leftmost
/// derivation, up to `max_depth` expansions per word and capped at an
/// internal result limit. The output is sorted by length, then
/// lexicographically.
pub fn words(grammar: &Grammar, max_depth: usize) -> Vec<String> {
    let mut collected = BTreeSet::new();
    for depth in 2..=max_depth {
        derive(
            grammar,
            &[Symbol::Nt(grammar.start.clone())],
            depth,
            &mut collected,
        );
    }

    let mut words: Vec<String> = collected.into_iter().collect();
    words.sort_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));
    words
}

fn derive(grammar: &Grammar, form: &[Symbol], depth: usize, out: &mut BTreeSet<String>) {
    if out.len() >= WORD_LIMIT {
        return;
    }

    let position = form.iter().position(|symbol| match *symbol {
        Symbol::Nt(_) => true,
        Symbol::T(_) => false,
    });

    let pos = match position {
        None => {
            let word: String = form
                .iter()
                .filter_map(|symbol| match *symbol {
                    Symbol::T(Terminal(c)) => Some(c),
                    Symbol::Nt(_) => None,
                })
                .collect();
            out.insert(word);
            return;
        }
        Some(pos) => pos,
    };

    if depth == 0 {
        return;
    }
    let nonterminal = match form[pos] {
        Symbol::Nt(ref n) => n.clone(),
        Symbol::T(_) => return,
    };

    for rule in grammar.rules.iter().filter(|r| r.left == nonterminal) {
        let mut next: Vec<Symbol> = form[..pos].to_vec();
        next.extend(rule.right.iter().cloned());
        next.extend(form[pos + 1..].iter().cloned());
        derive(grammar, &next, depth - 1, out);
    }
}

/// Checks whether the language looks substitutable on a small sample: the
/// context sets of the first seven enumerated words, closed under CYK
/// acceptance, must be pairwise equal or disjoint. An exceeded wall-clock
/// budget reports the grammar as not substitutable, like any other failed
/// check.
pub fn check_approx_substitutability(grammar: &Grammar, budget: Option<Duration>) -> bool {
    let clock = Instant::now();
    let sample: Vec<String> = words(grammar, 8).into_iter().take(7).collect();

    let mut context_sets: BTreeMap<String, BTreeSet<(String, String)>> = BTreeMap::new();
    for word in &sample {
        for (left, middle, right) in contexts(&[word.as_str()]) {
            context_sets
                .entry(middle)
                .or_insert_with(BTreeSet::new)
                .insert((left, right));
        }
    }

    let recogniser = CykRecogniser::new(grammar.clone());
    let all_contexts: BTreeSet<(String, String)> =
        context_sets.values().flatten().cloned().collect();
    let middles: Vec<String> = context_sets.keys().cloned().collect();

    for (left, right) in &all_contexts {
        for middle in &middles {
            if recogniser.accepts(&format!("{}{}{}", left, middle, right)) {
                if let Some(budget) = budget {
                    if clock.elapsed() > budget {
                        return false;
                    }
                }
                context_sets
                    .get_mut(middle)
                    .expect("every middle has a context set")
                    .insert((left.clone(), right.clone()));
            }
        }
    }

    let sets: Vec<&BTreeSet<(String, String)>> = context_sets.values().collect();
    for a in &sets {
        for b in &sets {
            if a != b && !a.is_disjoint(b) {
                return false;
            }
        }
    }
    true
}
