//! Scoring domain - pluggable correctness predicates

mod predicate;

pub use predicate::{
    Contains, CorrectnessPredicate, ExactMatch, FnPredicate, NormalizedMatch, NumericTolerance,
    RegexMatch, ScorerKind,
};
