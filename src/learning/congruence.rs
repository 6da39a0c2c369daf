//! Congruence classes over the substrings of the example words: discovery,
//! primality testing, and prime decomposition.

use std::collections::{BTreeMap, BTreeSet};

use fnv::FnvHashMap;

use crate::grammars::cfg::{CongruentClass, Grammar};
use crate::learning::{contexts, substring_pairs};
use crate::recognisable::cyk::CykRecogniser;
use crate::util::graph::Graph;

/// Clusters every substring occurring in a decomposition of an example word
/// into congruence classes, using the scaffold grammar as the
/// substitutability oracle: a substring joins the first known class whose
/// recorded context accepts it, and opens a class under its own context
/// otherwise.
///
/// The discovery is an online process; iteration is over ordered
/// collections, so the result only depends on the input words.
pub fn congruent_classes(words: &[&str], grammar: &Grammar) -> Vec<CongruentClass> {
    let recogniser = CykRecogniser::new(grammar.clone());
    let mut classes: BTreeMap<(String, String), BTreeSet<String>> = BTreeMap::new();

    for word in words {
        for (left, middle, right) in contexts(&[*word]) {
            let mut merged = false;
            for ((class_left, class_right), members) in classes.iter_mut() {
                if recogniser.accepts(&format!("{}{}{}", class_left, middle, class_right)) {
                    members.insert(middle.clone());
                    merged = true;
                    break;
                }
            }
            if !merged {
                classes
                    .entry((left, right))
                    .or_insert_with(BTreeSet::new)
                    .insert(middle);
            }
        }
    }

    classes
        .into_iter()
        .map(|(_, members)| CongruentClass::new(members))
        .collect()
}

/// A class is prime unless, for some two-way split of its representative,
/// every member is a concatenation of members of the two classes the halves
/// belong to.
pub fn is_prime(class: &CongruentClass, classes: &[CongruentClass]) -> bool {
    let mut class_of_word: FnvHashMap<&str, &BTreeSet<String>> = FnvHashMap::default();
    for other in classes {
        for word in &other.words {
            class_of_word.insert(word, &other.words);
        }
    }

    for (left, right) in substring_pairs(Some(class.rep.as_str())) {
        let (left_words, right_words) = match (
            class_of_word.get(left.as_str()),
            class_of_word.get(right.as_str()),
        ) {
            (Some(l), Some(r)) => (l, r),
            _ => continue,
        };

        let mut products = BTreeSet::new();
        for l in left_words.iter() {
            for r in right_words.iter() {
                products.insert(format!("{}{}", l, r));
            }
        }
        if class.words.iter().all(|word| products.contains(word)) {
            return false;
        }
    }

    true
}

/// Expresses the representative of `class` as a minimal-length sequence of
/// prime classes: vertices are the representative's character positions,
/// edges connect positions spanning a known prime string, and a shortest
/// path from position 0 to the end yields the decomposition. Returns `None`
/// when no such path exists; the caller treats that as a soft failure local
/// to the class.
pub fn prime_decomposition(
    class: &CongruentClass,
    primes: &[CongruentClass],
) -> Option<Vec<CongruentClass>> {
    if primes.contains(class) {
        return Some(vec![class.clone()]);
    }

    let mut prime_of_word: FnvHashMap<&str, &CongruentClass> = FnvHashMap::default();
    for prime in primes {
        for word in &prime.words {
            prime_of_word.insert(word, prime);
        }
    }

    let chars: Vec<char> = class.rep.chars().collect();
    let mut graph: Graph<usize, usize> = Graph::new();
    for i in 0..chars.len() {
        for j in i + 1..=chars.len() {
            let piece: String = chars[i..j].iter().collect();
            if prime_of_word.contains_key(piece.as_str()) {
                graph.add_edge(i, j, 1);
            }
        }
    }

    let path = graph.shortest_path(&0, &chars.len())?;
    let mut decomposition = Vec::with_capacity(path.len() - 1);
    for window in path.windows(2) {
        let piece: String = chars[window[0]..window[1]].iter().collect();
        decomposition.push((*prime_of_word.get(piece.as_str())?).clone());
    }
    Some(decomposition)
}
