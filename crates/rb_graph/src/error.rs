use thiserror::Error;

use crate::ElementId;

/// Error type for structure parsing, graph construction and cofold
/// splitting. All variants are user-input-caused and fatal; construction
/// never returns a partially built graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructureError {
    /// A character outside `( ) . &` in dot-bracket input.
    #[error("invalid character {ch:?} at position {pos}")]
    InvalidCharacter { pos: usize, ch: char },

    /// A closing bracket with no open partner, or leftover open brackets.
    #[error("unbalanced bracket at position {pos}")]
    UnbalancedBracket { pos: usize },

    /// A `&` that does not separate two non-empty strands, or a cutpoint
    /// outside the structure.
    #[error("cutpoint after position {pos} does not separate two strands")]
    MisplacedCutpoint { pos: usize },

    /// An externally supplied pairing table that is not involutive.
    #[error("pairing table is not involutive at position {pos}")]
    ConflictingPair { pos: usize },

    /// An externally supplied pairing table with crossing pairs.
    #[error("crossing base pairs at position {pos}, pseudoknots are not supported")]
    CrossingPairs { pos: usize },

    /// No splittable connection between the elements flanking a cutpoint.
    #[error("cannot split at cutpoint {cutpoint}: no suitable connection between {left} and {right}")]
    MissingConnection {
        cutpoint: usize,
        left: ElementId,
        right: ElementId,
    },

    /// Two strands that are not held together by any base pair.
    #[error("found two sequences not connected by any base pair")]
    DisconnectedStrands,

    /// Malformed bulge graph text.
    #[error("cannot parse bulge graph text: {0}")]
    BgParse(String),

    /// An attached sequence whose length disagrees with the graph.
    #[error("sequence length {got} does not match graph length {expected}")]
    SequenceMismatch { expected: usize, got: usize },
}
