use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};

use fnv::FnvHashMap;

mod first_follow;
mod from_str;
pub mod normalise;

/// Terminal symbol of a CFG, a single character of the input alphabet.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash, Serialize, Deserialize)]
pub struct Terminal(pub char);

/// Nonterminal symbol of a CFG.
///
/// The optional `mark` points to another nonterminal and only serves to tell
/// freshly generated symbols apart. Equality considers symbol and mark;
/// hashing keys on the symbol alone, so two nonterminals that differ only in
/// their mark share a bucket but stay distinguishable.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Serialize, Deserialize)]
pub struct Nonterminal {
    pub symbol: String,
    pub mark: Option<Box<Nonterminal>>,
}

impl Nonterminal {
    pub fn new<S: Into<String>>(symbol: S) -> Self {
        Nonterminal {
            symbol: symbol.into(),
            mark: None,
        }
    }

    pub fn with_mark<S: Into<String>>(symbol: S, mark: Nonterminal) -> Self {
        Nonterminal {
            symbol: symbol.into(),
            mark: Some(Box::new(mark)),
        }
    }
}

impl Hash for Nonterminal {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.symbol.hash(state);
    }
}

/// Variable or terminal symbol on the right-hand side of a rule.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Hash, Serialize, Deserialize)]
pub enum Symbol {
    Nt(Nonterminal),
    T(Terminal),
}

impl Symbol {
    pub fn as_nonterminal(&self) -> Option<&Nonterminal> {
        match *self {
            Symbol::Nt(ref n) => Some(n),
            Symbol::T(_) => None,
        }
    }
}

/// A production rule. An empty right-hand side is an epsilon production.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Hash, Serialize, Deserialize)]
pub struct Rule {
    pub left: Nonterminal,
    pub right: Vec<Symbol>,
}

impl Rule {
    pub fn new(left: Nonterminal, right: Vec<Symbol>) -> Self {
        Rule { left, right }
    }
}

/// A context-free grammar: a start symbol and a sequence of rules.
///
/// Grammars are immutable once constructed; every transformation in this
/// crate returns a fresh value. The nonterminal set and the rules-per-left-
/// hand-side index are recomputed views, not stored state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grammar {
    pub start: Nonterminal,
    pub rules: Vec<Rule>,
}

impl Grammar {
    pub fn new(start: Nonterminal, rules: Vec<Rule>) -> Self {
        Grammar { start, rules }
    }

    /// Every nonterminal occurring on either side of a rule. The start
    /// symbol is only included if some rule mentions it.
    pub fn nonterminals(&self) -> BTreeSet<Nonterminal> {
        let mut nonterminals = BTreeSet::new();
        for rule in &self.rules {
            nonterminals.insert(rule.left.clone());
            for symbol in &rule.right {
                if let Symbol::Nt(ref n) = *symbol {
                    nonterminals.insert(n.clone());
                }
            }
        }
        nonterminals
    }

    /// Rules grouped by their left-hand side.
    pub fn rules_by_lhs(&self) -> FnvHashMap<&Nonterminal, Vec<&Rule>> {
        let mut map: FnvHashMap<&Nonterminal, Vec<&Rule>> = FnvHashMap::default();
        for rule in &self.rules {
            map.entry(&rule.left).or_insert_with(Vec::new).push(rule);
        }
        map
    }

    /// Returns a nonterminal named `uppercase(base)` plus the smallest
    /// numeric suffix that collides neither with this grammar's nonterminals
    /// nor with the caller-accumulated `used` set. Callers generating several
    /// names within one pass must add each result to `used` themselves.
    pub fn fresh_nonterminal(
        &self,
        base: &str,
        used: &BTreeSet<Nonterminal>,
        mark: Option<Nonterminal>,
    ) -> Nonterminal {
        let nonterminals = self.nonterminals();
        let base = base.to_uppercase();
        let mut suffix = 0usize;
        loop {
            let candidate = Nonterminal::new(format!("{}{}", base, suffix));
            if !nonterminals.contains(&candidate) && !used.contains(&candidate) {
                return match mark {
                    Some(mark) => Nonterminal::with_mark(candidate.symbol, mark),
                    None => candidate,
                };
            }
            suffix += 1;
        }
    }
}

impl PartialEq for Grammar {
    /// Rule collections compare as sets; the order rules were produced in
    /// carries no meaning.
    fn eq(&self, other: &Self) -> bool {
        self.start == other.start
            && self.rules.iter().collect::<BTreeSet<_>>()
                == other.rules.iter().collect::<BTreeSet<_>>()
    }
}

impl Eq for Grammar {}

/// A set of strings judged distributionally interchangeable, together with
/// the canonical representative: the shortest, then lexicographically
/// smallest member.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Serialize, Deserialize)]
pub struct CongruentClass {
    pub words: BTreeSet<String>,
    pub rep: String,
}

impl CongruentClass {
    pub fn new<I>(words: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let words: BTreeSet<String> = words.into_iter().map(Into::into).collect();
        let rep = words
            .iter()
            .min_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)))
            .cloned()
            .unwrap_or_default();
        CongruentClass { words, rep }
    }
}

impl Hash for CongruentClass {
    // keyed on the representative, like `Nonterminal` is keyed on its symbol
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rep.hash(state);
    }
}

impl fmt::Display for Terminal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for Nonterminal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.mark {
            Some(ref mark) => write!(f, "{}_{}", self.symbol, mark.symbol),
            None => write!(f, "{}", self.symbol),
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Symbol::Nt(ref n) => write!(f, "{}", n),
            Symbol::T(ref t) => write!(f, "{}", t),
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let right: Vec<String> = self.right.iter().map(|s| s.to_string()).collect();
        write!(f, "{} -> {}", self.left, right.join(" "))
    }
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Starting: {}", self.start)?;
        let nonterminals: Vec<String> =
            self.nonterminals().iter().map(|n| n.to_string()).collect();
        writeln!(f, "Nonterminals: {}", nonterminals.join(" "))?;
        writeln!(f)?;
        writeln!(f, "Rules:")?;
        writeln!(f)?;
        for rule in &self.rules {
            writeln!(f, "{}", rule)?;
        }
        Ok(())
    }
}

impl fmt::Display for CongruentClass {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let words: Vec<&str> = self.words.iter().map(|w| w.as_str()).collect();
        write!(f, "Representative: {}\nWords: {}", self.rep, words.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marked_nonterminals_are_distinguishable() {
        let plain = Nonterminal::new("A0");
        let marked = Nonterminal::with_mark("A0", Nonterminal::new("B"));

        assert_ne!(plain, marked);

        // both live in the same set despite hashing to the same bucket
        let mut set = std::collections::HashSet::new();
        set.insert(plain.clone());
        set.insert(marked.clone());
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn fresh_nonterminal_skips_existing_names() {
        let grammar = Grammar::new(
            Nonterminal::new("S"),
            vec![Rule::new(
                Nonterminal::new("S0"),
                vec![Symbol::Nt(Nonterminal::new("S1"))],
            )],
        );

        let mut used = BTreeSet::new();
        let first = grammar.fresh_nonterminal("s", &used, None);
        assert_eq!(first.symbol, "S2");
        used.insert(first);
        let second = grammar.fresh_nonterminal("s", &used, None);
        assert_eq!(second.symbol, "S3");
    }

    #[test]
    fn fresh_nonterminal_carries_the_mark() {
        let grammar = Grammar::new(Nonterminal::new("S"), Vec::new());
        let mark = Nonterminal::new("S");
        let fresh = grammar.fresh_nonterminal("x", &BTreeSet::new(), Some(mark.clone()));

        assert_eq!(fresh.symbol, "X0");
        assert_eq!(fresh.mark, Some(Box::new(mark)));
    }

    #[test]
    fn grammar_equality_ignores_rule_order() {
        let r0 = Rule::new(Nonterminal::new("S"), vec![Symbol::T(Terminal('a'))]);
        let r1 = Rule::new(Nonterminal::new("S"), vec![Symbol::T(Terminal('b'))]);

        let g0 = Grammar::new(Nonterminal::new("S"), vec![r0.clone(), r1.clone()]);
        let g1 = Grammar::new(Nonterminal::new("S"), vec![r1, r0]);
        assert_eq!(g0, g1);
    }

    #[test]
    fn congruent_class_representative() {
        let class = CongruentClass::new(vec!["acb", "c"]);
        assert_eq!(class.rep, "c");

        let tie = CongruentClass::new(vec!["b", "a"]);
        assert_eq!(tie.rep, "a");
    }

    #[test]
    fn grammar_display_lists_the_rules() {
        let grammar = Grammar::new(
            Nonterminal::new("S"),
            vec![Rule::new(Nonterminal::new("S"), vec![Symbol::T(Terminal('a'))])],
        );
        let printed = grammar.to_string();

        assert!(printed.starts_with("Starting: S\n"));
        assert!(printed.contains("Nonterminals: S"));
        assert!(printed.contains("S -> a"));
    }

    #[test]
    fn rule_display_roundtrips_symbols() {
        let rule = Rule::new(
            Nonterminal::new("[[acb]]"),
            vec![
                Symbol::Nt(Nonterminal::new("[[ac]]")),
                Symbol::Nt(Nonterminal::new("[[b]]")),
            ],
        );
        assert_eq!(rule.to_string(), "[[acb]] -> [[ac]] [[b]]");
    }
}
