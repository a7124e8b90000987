use thiserror::Error;

use crate::ResidueId;

/// Error type for sequence indexing and slicing.
///
/// `OutOfRange` and `InvalidStep` are integer-addressing errors.
/// `UnknownResidue` means a syntactically valid residue identity that is
/// absent from the addressed view, so callers can tell "not present here"
/// apart from "out-of-range integer".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SequenceError {
    /// An integer position outside the valid closed range of the view.
    #[error("index {0} out of range for view of length {1}")]
    OutOfRange(isize, usize),

    /// A slice step other than 1 or -1 (including 0).
    #[error("invalid slice step {0}, only 1 and -1 are supported")]
    InvalidStep(isize),

    /// A residue identity not present in the addressed view.
    #[error("residue {0} not present in this view")]
    UnknownResidue(ResidueId),

    /// A residue string that cannot be parsed.
    #[error("cannot parse residue id {0:?}")]
    InvalidResidue(String),

    /// Input whose length disagrees with the observed sequence.
    #[error("input length {0} does not match {1} observed residues")]
    LengthMismatch(usize, usize),
}
