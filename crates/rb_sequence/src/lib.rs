//! The rb_sequence crate.
//!
//! Provides residue-level addressing over nucleotide sequences:
//!  - ResidueId: chain + number + insertion code identities.
//!  - Sequence: 1-based indexing and slicing over observed residues,
//!    with chain breaks emitted as `&` markers.
//!  - Views that interleave missing residues and overlay
//!    modified-residue display codes.
//!

mod error;
mod residue;
mod sequence;

pub use error::*;
pub use residue::*;
pub use sequence::*;
