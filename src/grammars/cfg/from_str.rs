//! Textual grammar format: one rule per line, e.g.
//!
//! ```text
//! S -> [[c]]
//! [[c]] -> [[a]] [[c]] [[b]]
//! [[c]] -> c
//! ```
//!
//! Nonterminal tokens are bracket-delimited (the brackets belong to the
//! name), terminal tokens are single alphanumeric characters, and spaces
//! between symbols carry no meaning. A parsed grammar starts in `S`.

use nom::{is_space, IResult};
use std::str::{from_utf8, FromStr};

use crate::grammars::cfg::{Grammar, Nonterminal, Rule, Symbol, Terminal};

impl FromStr for Grammar {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut rules = Vec::new();
        for line in s.lines() {
            if line.trim().is_empty() {
                continue;
            }
            rules.push(line.trim().parse()?);
        }
        Ok(Grammar::new(Nonterminal::new("S"), rules))
    }
}

impl FromStr for Rule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match parse_rule(s.as_bytes()) {
            IResult::Done(_, rule) => Ok(rule),
            _ => Err(format!("Could not parse \'{}\'", s)),
        }
    }
}

fn parse_rule(input: &[u8]) -> IResult<&[u8], Rule> {
    do_parse!(
        input,
        take_while!(is_space)
            >> left: parse_left
            >> take_while!(is_space)
            >> alt!(tag!("→") | tag!("->"))
            >> right: many0!(complete!(preceded!(take_while!(is_space), parse_symbol)))
            >> take_while!(is_space)
            >> eof!()
            >> (Rule {
                left: left,
                right: right,
            })
    )
}

/// A bracket-delimited nonterminal name, brackets included.
fn parse_bracketed(input: &[u8]) -> IResult<&[u8], String> {
    do_parse!(
        input,
        name: map_res!(
            recognize!(delimited!(tag!("[["), take_until!("]]"), tag!("]]"))),
            from_utf8
        ) >> (String::from(name))
    )
}

fn parse_terminal(input: &[u8]) -> IResult<&[u8], Terminal> {
    do_parse!(
        input,
        c: map_res!(take!(1), from_utf8)
            >> terminal: expr_res!(match c.chars().next() {
                Some(c) if c.is_alphanumeric() => Ok(Terminal(c)),
                _ => Err(()),
            })
            >> (terminal)
    )
}

/// The left-hand side: a bracketed name or a bare single-character one.
fn parse_left(input: &[u8]) -> IResult<&[u8], Nonterminal> {
    alt!(
        input,
        map!(parse_bracketed, |name: String| Nonterminal::new(name))
            | map!(parse_terminal, |t: Terminal| Nonterminal::new(
                t.0.to_string()
            ))
    )
}

fn parse_symbol(input: &[u8]) -> IResult<&[u8], Symbol> {
    alt!(
        input,
        map!(parse_bracketed, |name: String| Symbol::Nt(Nonterminal::new(
            name
        ))) | map!(parse_terminal, Symbol::T)
    )
}
