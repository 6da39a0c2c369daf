//! Recognition and distributional learning of context-free languages.
//!
//! The crate models context-free grammars as immutable values
//! ([`grammars::cfg::Grammar`]), normalizes them to Chomsky Normal Form
//! ([`grammars::cfg::normalise`]), decides membership with a CYK recogniser
//! ([`recognisable::cyk`]), and induces grammars from positive example words
//! with Clark's learner for substitutable context-free languages
//! ([`learning`]).

#[macro_use]
extern crate nom;
#[macro_use]
extern crate serde_derive;

pub mod generate;
pub mod grammars;
pub mod learning;
pub mod recognisable;
pub mod util;
