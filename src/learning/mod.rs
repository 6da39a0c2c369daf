//! Distributional learning of context-free grammars from positive example
//! words, after A. Clark's strong learner for substitutable context-free
//! languages.

use std::collections::BTreeSet;

use fnv::FnvHashMap;

use crate::grammars::cfg::{CongruentClass, Grammar, Nonterminal, Rule, Symbol, Terminal};

mod congruence;

pub use self::congruence::{congruent_classes, is_prime, prime_decomposition};

/// All non-empty substrings of the given words.
pub(crate) fn substrings(words: &[&str]) -> BTreeSet<String> {
    let mut set = BTreeSet::new();
    for word in words {
        let chars: Vec<char> = word.chars().collect();
        for i in 0..chars.len() {
            for j in i + 1..=chars.len() {
                set.insert(chars[i..j].iter().collect());
            }
        }
    }
    set
}

/// All two-way splits of the given words into non-empty halves.
pub(crate) fn substring_pairs<'a, I>(words: I) -> BTreeSet<(String, String)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut set = BTreeSet::new();
    for word in words {
        let chars: Vec<char> = word.chars().collect();
        for i in 1..chars.len() {
            set.insert((chars[..i].iter().collect(), chars[i..].iter().collect()));
        }
    }
    set
}

/// All decompositions of the given words into (left context, non-empty
/// middle, right context).
pub(crate) fn contexts(words: &[&str]) -> BTreeSet<(String, String, String)> {
    let mut set = BTreeSet::new();
    for word in words {
        let chars: Vec<char> = word.chars().collect();
        for i in 0..chars.len() {
            for j in i + 1..=chars.len() {
                set.insert((
                    chars[..i].iter().collect(),
                    chars[i..j].iter().collect(),
                    chars[j..].iter().collect(),
                ));
            }
        }
    }
    set
}

fn substring_nonterminal(substring: &str) -> Nonterminal {
    Nonterminal::new(format!("[[{}]]", substring))
}

/// Learns a scaffold grammar that generates every example word but may
/// overgenerate: one nonterminal per distinct substring, with lexical,
/// branching, substitutability and start rules.
pub fn weak_learn<S: AsRef<str>>(words: &[S]) -> Grammar {
    let words: Vec<&str> = words.iter().map(|w| w.as_ref()).collect();
    let subs = substrings(&words);
    let start = Nonterminal::new("S");

    let mut rules = Vec::new();

    // one start rule per distinct example word
    for word in words.iter().collect::<BTreeSet<_>>() {
        if subs.contains(*word) {
            rules.push(Rule::new(
                start.clone(),
                vec![Symbol::Nt(substring_nonterminal(word))],
            ));
        }
    }

    // lexical rules for the single-character substrings
    for sub in subs.iter().filter(|s| s.chars().count() == 1) {
        let c = sub.chars().next().expect("single-character substring");
        rules.push(Rule::new(
            substring_nonterminal(sub),
            vec![Symbol::T(Terminal(c))],
        ));
    }

    // branching rules for every split into two known substrings
    for (left, right) in substring_pairs(subs.iter().map(|s| s.as_str())) {
        rules.push(Rule::new(
            substring_nonterminal(&format!("{}{}", left, right)),
            vec![
                Symbol::Nt(substring_nonterminal(&left)),
                Symbol::Nt(substring_nonterminal(&right)),
            ],
        ));
    }

    // symmetric unit rules for middles sharing a context
    let triples: Vec<(String, String, String)> = contexts(&words).into_iter().collect();
    for i in 0..triples.len() {
        for j in i + 1..triples.len() {
            if triples[i].0 == triples[j].0 && triples[i].2 == triples[j].2 {
                rules.push(Rule::new(
                    substring_nonterminal(&triples[i].1),
                    vec![Symbol::Nt(substring_nonterminal(&triples[j].1))],
                ));
                rules.push(Rule::new(
                    substring_nonterminal(&triples[j].1),
                    vec![Symbol::Nt(substring_nonterminal(&triples[i].1))],
                ));
            }
        }
    }

    Grammar::new(start, rules)
}

/// Clark's strong learner: weak-learn a scaffold, cluster substrings into
/// congruence classes, keep the prime ones, decompose every class into
/// primes, and synthesize the result grammar over one nonterminal per prime
/// class.
///
/// Classes without a prime decomposition are soft failures: their words are
/// left out of the start rules instead of aborting the synthesis.
pub fn strong_learn<S: AsRef<str>>(words: &[S]) -> Grammar {
    let words: Vec<&str> = words.iter().map(|w| w.as_ref()).collect();
    let scaffold = weak_learn(&words);
    let classes = congruent_classes(&words, &scaffold);
    let primes: Vec<CongruentClass> = classes
        .iter()
        .filter(|class| is_prime(class, &classes))
        .cloned()
        .collect();

    let mut decompositions: FnvHashMap<&str, Vec<CongruentClass>> = FnvHashMap::default();
    for class in &classes {
        if let Some(decomposition) = prime_decomposition(class, &primes) {
            decompositions.insert(&class.rep, decomposition);
        }
    }

    let start = Nonterminal::new("S");
    let mut rules = Vec::new();

    // start rules for the example words that name a decomposed representative
    for word in words.iter().collect::<BTreeSet<_>>() {
        if let Some(decomposition) = decompositions.get(*word) {
            rules.push(Rule::new(
                start.clone(),
                decomposition
                    .iter()
                    .map(|class| Symbol::Nt(substring_nonterminal(&class.rep)))
                    .collect(),
            ));
        }
    }

    // lexical rules for the single-character primes
    for class in &primes {
        let mut chars = class.rep.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            rules.push(Rule::new(
                substring_nonterminal(&class.rep),
                vec![Symbol::T(Terminal(c))],
            ));
        }
    }

    // branching rules N -> M Q..., where Q... is the prime decomposition of
    // some class and the concatenation of the representatives is an observed
    // member of N
    let prime_strings: BTreeSet<&str> = primes
        .iter()
        .flat_map(|class| class.words.iter().map(|w| w.as_str()))
        .collect();

    for n in &primes {
        for m in &primes {
            for q in &classes {
                let q_primes = match decompositions.get(q.rep.as_str()) {
                    Some(decomposition) => decomposition,
                    None => continue,
                };

                let mut concatenation = m.rep.clone();
                for class in q_primes {
                    concatenation.push_str(&class.rep);
                }
                if !n.words.contains(&concatenation) {
                    continue;
                }

                // a strict prefix that is itself a known prime string would
                // admit a competing derivation of the same member
                let mut prefix = m.rep.clone();
                let mut blocked = false;
                for class in &q_primes[..q_primes.len() - 1] {
                    prefix.push_str(&class.rep);
                    if prime_strings.contains(prefix.as_str()) {
                        blocked = true;
                        break;
                    }
                }
                if blocked {
                    continue;
                }

                let mut right = vec![Symbol::Nt(substring_nonterminal(&m.rep))];
                right.extend(
                    q_primes
                        .iter()
                        .map(|class| Symbol::Nt(substring_nonterminal(&class.rep))),
                );
                rules.push(Rule::new(substring_nonterminal(&n.rep), right));
            }
        }
    }

    Grammar::new(start, rules)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substrings_of_two_words() {
        let expected: BTreeSet<String> = vec!["a", "b", "c", "ab", "bc", "abc", "f", "cf", "bcf"]
            .into_iter()
            .map(String::from)
            .collect();
        assert_eq!(substrings(&["abc", "bcf"]), expected);

        assert!(substrings(&[""]).is_empty());
        assert!(substrings(&[]).is_empty());
    }

    #[test]
    fn substring_pairs_of_two_words() {
        let expected: BTreeSet<(String, String)> = vec![
            ("a", "bc"),
            ("ab", "c"),
            ("a", "bcde"),
            ("ab", "cde"),
            ("abc", "de"),
            ("abcd", "e"),
        ]
        .into_iter()
        .map(|(a, b)| (String::from(a), String::from(b)))
        .collect();
        assert_eq!(substring_pairs(vec!["abc", "abcde"]), expected);

        assert!(substring_pairs(vec![""]).is_empty());
    }

    #[test]
    fn contexts_of_one_word() {
        let expected: BTreeSet<(String, String, String)> = vec![
            ("", "a", "bc"),
            ("", "ab", "c"),
            ("", "abc", ""),
            ("a", "b", "c"),
            ("a", "bc", ""),
            ("ab", "c", ""),
        ]
        .into_iter()
        .map(|(l, m, r)| (String::from(l), String::from(m), String::from(r)))
        .collect();
        assert_eq!(contexts(&["abc"]), expected);

        assert!(contexts(&[""]).is_empty());
    }

    #[test]
    fn weak_learn_builds_the_scaffold() {
        let grammar = weak_learn(&["c", "acb"]);

        let nt = |s: &str| Nonterminal::new(s);
        let expected_nonterminals: BTreeSet<Nonterminal> =
            vec!["S", "[[a]]", "[[b]]", "[[c]]", "[[ac]]", "[[cb]]", "[[acb]]"]
                .into_iter()
                .map(nt)
                .collect();
        assert_eq!(grammar.nonterminals(), expected_nonterminals);

        let expected: Grammar = "S -> [[acb]]\n\
                                 S -> [[c]]\n\
                                 [[a]] -> a\n\
                                 [[b]] -> b\n\
                                 [[c]] -> c\n\
                                 [[ac]] -> [[a]] [[c]]\n\
                                 [[cb]] -> [[c]] [[b]]\n\
                                 [[acb]] -> [[ac]] [[b]]\n\
                                 [[acb]] -> [[a]] [[cb]]\n\
                                 [[c]] -> [[acb]]\n\
                                 [[acb]] -> [[c]]"
            .parse()
            .unwrap();
        assert_eq!(grammar, expected);
    }

    #[test]
    fn weak_learn_of_nothing_accepts_nothing() {
        let grammar = weak_learn::<&str>(&[]);
        assert!(grammar.rules.is_empty());
    }
}
