//! Membership recognition by the Cocke-Younger-Kasami dynamic program.

use integeriser::{HashIntegeriser, Integeriser};

use crate::grammars::cfg::normalise;
use crate::grammars::cfg::{Grammar, Symbol, Terminal};
use crate::recognisable::Recognisable;

/// Decides membership of words in the language of a grammar.
///
/// The grammar is brought into Chomsky Normal Form on every call; keeping
/// the recogniser free of cached state is deliberate and trades repeated
/// normalization for value-semantics simplicity.
#[derive(Debug, Clone)]
pub struct CykRecogniser {
    grammar: Grammar,
}

impl CykRecogniser {
    pub fn new(grammar: Grammar) -> Self {
        CykRecogniser { grammar }
    }

    pub fn accepts(&self, word: &str) -> bool {
        let grammar = normalise::chomsky_normal_form(&self.grammar);
        let chars: Vec<char> = word.chars().collect();

        // the table below degenerates for the empty word; in normal form the
        // empty word is in the language iff the start symbol has an epsilon
        // rule
        if chars.is_empty() {
            return grammar
                .rules
                .iter()
                .any(|rule| rule.left == grammar.start && rule.right.is_empty());
        }

        // dense nonterminal indices; the start symbol takes index 0
        let mut nonterminals = HashIntegeriser::new();
        nonterminals.integerise(grammar.start.clone());
        for nonterminal in grammar.nonterminals() {
            nonterminals.integerise(nonterminal);
        }

        let n = chars.len();
        // indexed by (span length - 1, span start, nonterminal)
        let mut table = vec![vec![vec![false; nonterminals.size()]; n]; n];

        for (pos, &c) in chars.iter().enumerate() {
            for rule in &grammar.rules {
                if let [Symbol::T(Terminal(t))] = rule.right.as_slice() {
                    if *t == c {
                        if let Some(left) = nonterminals.find_key(&rule.left) {
                            table[0][pos][left] = true;
                        }
                    }
                }
            }
        }

        for l in 1..n {
            for s in 0..n - l {
                for p in 0..l {
                    for rule in &grammar.rules {
                        if let [Symbol::Nt(fst), Symbol::Nt(snd)] = rule.right.as_slice() {
                            let (fst, snd) = match (
                                nonterminals.find_key(fst),
                                nonterminals.find_key(snd),
                            ) {
                                (Some(fst), Some(snd)) => (fst, snd),
                                _ => continue,
                            };
                            if table[p][s][fst] && table[l - p - 1][s + p + 1][snd] {
                                if let Some(left) = nonterminals.find_key(&rule.left) {
                                    table[l][s][left] = true;
                                }
                            }
                        }
                    }
                }
            }
        }

        table[n - 1][0][0]
    }
}

impl Recognisable for CykRecogniser {
    fn recognise(&self, word: &str) -> bool {
        self.accepts(word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammars::cfg::{Nonterminal, Rule};

    fn nt(symbol: &str) -> Nonterminal {
        Nonterminal::new(symbol)
    }

    fn recogniser(source: &str) -> CykRecogniser {
        CykRecogniser::new(source.parse().unwrap())
    }

    #[test]
    fn accepts_the_concatenation_but_not_its_reversal() {
        let recogniser = recogniser(
            "S -> [[a]] [[c]]\n\
             [[a]] -> a\n\
             [[c]] -> c",
        );

        assert!(recogniser.accepts("ac"));
        assert!(!recogniser.accepts("ca"));
        assert!(!recogniser.accepts("a"));
        assert!(!recogniser.accepts(""));
    }

    #[test]
    fn accepts_nested_brackets() {
        let s = nt("S");
        let grammar = Grammar::new(
            s.clone(),
            vec![
                Rule::new(
                    s.clone(),
                    vec![
                        Symbol::T(Terminal('a')),
                        Symbol::Nt(s.clone()),
                        Symbol::T(Terminal('b')),
                    ],
                ),
                Rule::new(s, Vec::new()),
            ],
        );
        let recogniser = CykRecogniser::new(grammar);

        assert!(recogniser.accepts(""));
        assert!(recogniser.accepts("ab"));
        assert!(recogniser.accepts("aaabbb"));
        assert!(!recogniser.accepts("a"));
        assert!(!recogniser.accepts("aab"));
        assert!(!recogniser.accepts("ba"));
    }

    #[test]
    fn empty_grammar_accepts_nothing() {
        let recogniser = CykRecogniser::new(Grammar::new(nt("S"), Vec::new()));

        assert!(!recogniser.accepts(""));
        assert!(!recogniser.accepts("a"));
    }

    #[test]
    fn recognise_is_the_membership_seam() {
        let recogniser = recogniser("S -> a");

        assert!(Recognisable::recognise(&recogniser, "a"));
        assert!(!Recognisable::recognise(&recogniser, "b"));
    }
}
