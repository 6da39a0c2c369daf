use std::collections::BTreeSet;

use grammata::grammars::cfg::{CongruentClass, Grammar, Nonterminal};
use grammata::learning::{congruent_classes, strong_learn, weak_learn};
use grammata::recognisable::cyk::CykRecogniser;

fn nonterminals(names: &[&str]) -> BTreeSet<Nonterminal> {
    names.iter().map(|name| Nonterminal::new(*name)).collect()
}

#[test]
fn weak_learner_is_sound_on_its_examples() {
    for words in &[
        vec!["c", "acb"],
        vec!["ab"],
        vec!["ab", "ba"],
        vec!["c", "acb", "aacbb"],
    ] {
        let recogniser = CykRecogniser::new(weak_learn(words));
        for word in words {
            assert!(
                recogniser.accepts(word),
                "weak learner lost the example {:?}",
                word
            );
        }
    }
}

#[test]
fn weak_learner_overgenerates_but_not_arbitrarily() {
    let recogniser = CykRecogniser::new(weak_learn(&["c", "acb"]));

    // substitutability of c and acb pumps the bracket structure
    assert!(recogniser.accepts("aacbb"));
    // but unrelated strings stay out
    assert!(!recogniser.accepts("a"));
    assert!(!recogniser.accepts("ba"));
    assert!(!recogniser.accepts("cc"));
}

#[test]
fn strong_learner_reproduces_the_bracket_grammar() {
    let learned = strong_learn(&["c", "acb"]);

    let expected: Grammar = "S -> [[c]]\n\
                             [[a]] -> a\n\
                             [[b]] -> b\n\
                             [[c]] -> c\n\
                             [[c]] -> [[a]] [[c]] [[b]]"
        .parse()
        .unwrap();

    assert_eq!(learned, expected);
    assert_eq!(
        learned.nonterminals(),
        nonterminals(&["S", "[[a]]", "[[b]]", "[[c]]"])
    );
}

#[test]
fn strong_learner_generalizes_beyond_the_examples() {
    let learned = strong_learn(&["c", "acb"]);
    let recogniser = CykRecogniser::new(learned);

    assert!(recogniser.accepts("c"));
    assert!(recogniser.accepts("acb"));
    assert!(recogniser.accepts("aacbb"));
    assert!(recogniser.accepts("aaacbbb"));
    assert!(!recogniser.accepts("ac"));
    assert!(!recogniser.accepts("cb"));
    assert!(!recogniser.accepts(""));
}

#[test]
fn congruence_classes_do_not_depend_on_the_word_order() {
    let forwards = vec!["c", "acb"];
    let backwards = vec!["acb", "c"];

    let scaffold_f = weak_learn(&forwards);
    let scaffold_b = weak_learn(&backwards);

    let classes_f: BTreeSet<CongruentClass> =
        congruent_classes(&forwards, &scaffold_f).into_iter().collect();
    let classes_b: BTreeSet<CongruentClass> =
        congruent_classes(&backwards, &scaffold_b).into_iter().collect();

    assert_eq!(classes_f, classes_b);
}

#[test]
fn strong_learner_does_not_depend_on_the_word_order() {
    assert_eq!(
        strong_learn(&["c", "acb"]),
        strong_learn(&["acb", "c"])
    );
}

#[test]
fn strong_learner_on_the_two_letter_balanced_language() {
    let words = vec!["ab", "ba", "abab", "abba", "baba", "bbaa"];
    let learned = strong_learn(&words);

    assert_eq!(
        learned.nonterminals(),
        nonterminals(&["S", "[[a]]", "[[b]]", "[[ab]]"])
    );

    // the balanced class is the axis of the grammar
    for rule in &[
        "S -> [[ab]]",
        "[[ab]] -> [[a]] [[b]]",
        "[[ab]] -> [[b]] [[a]]",
        "[[ab]] -> [[ab]] [[ab]]",
        "[[a]] -> a",
        "[[b]] -> b",
    ] {
        assert!(
            learned.rules.contains(&rule.parse().unwrap()),
            "missing rule {:?}",
            rule
        );
    }

    let recogniser = CykRecogniser::new(learned);
    for word in &words {
        assert!(recogniser.accepts(word), "lost the example {:?}", word);
    }
    for word in &["aabb", "baab", "abbaab"] {
        assert!(recogniser.accepts(word), "rejected balanced {:?}", word);
    }
    for word in &["", "a", "b", "aab", "abb", "bab", "aba"] {
        assert!(!recogniser.accepts(word), "accepted unbalanced {:?}", word);
    }
}

#[test]
fn vacuous_input_learns_the_empty_language() {
    let learned = strong_learn::<&str>(&[]);
    assert!(learned.rules.is_empty());

    let recogniser = CykRecogniser::new(learned);
    assert!(!recogniser.accepts(""));
    assert!(!recogniser.accepts("a"));
}
