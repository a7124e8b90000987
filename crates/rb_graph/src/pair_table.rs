//! 1-based pairing tables.
//!
//! A `PairTable` maps every backbone position to its partner position or
//! to unpaired. Valid tables are involutive and non-crossing; tables
//! supplied by external annotators must pass `validate` before graph
//! construction.

use crate::StructureError;
use crate::parse_dotbracket;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairTable {
    /// Partner per position; index 0 is unused.
    pairs: Vec<Option<usize>>,
}

impl PairTable {
    /// Create an all-unpaired table for a given sequence length.
    pub fn with_length(length: usize) -> Self {
        PairTable {
            pairs: vec![None; length + 1],
        }
    }

    /// Sequence length covered by the table.
    pub fn len(&self) -> usize {
        self.pairs.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Partner of a 1-based position, or None if unpaired.
    pub fn partner(&self, pos: usize) -> Option<usize> {
        assert!(pos >= 1 && pos <= self.len(), "position {pos} out of range");
        self.pairs[pos]
    }

    /// Record the pair (i, j) in both directions.
    pub fn set_pair(&mut self, i: usize, j: usize) {
        assert!(i >= 1 && j >= 1 && i != j && i <= self.len() && j <= self.len());
        self.pairs[i] = Some(j);
        self.pairs[j] = Some(i);
    }

    /// Iterate 1-based positions with their partners.
    pub fn iter(&self) -> impl Iterator<Item = (usize, Option<usize>)> + '_ {
        self.pairs.iter().enumerate().skip(1).map(|(i, &p)| (i, p))
    }

    /// Check involution and the non-crossing (no pseudoknot) invariant.
    pub fn validate(&self) -> Result<(), StructureError> {
        for (i, p) in self.iter() {
            if let Some(j) = p {
                if j == i || j > self.len() || self.pairs[j] != Some(i) {
                    return Err(StructureError::ConflictingPair { pos: i });
                }
            }
        }
        let mut stack: Vec<usize> = Vec::new();
        for (i, p) in self.iter() {
            if let Some(j) = p {
                if j > i {
                    stack.push(j);
                } else if stack.pop() != Some(i) {
                    return Err(StructureError::CrossingPairs { pos: i });
                }
            }
        }
        Ok(())
    }
}

/// Parse a plain dot-bracket string (no `&` strand separators).
impl TryFrom<&str> for PairTable {
    type Error = StructureError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let (pt, cutpoints) = parse_dotbracket(value)?;
        if let Some(&pos) = cutpoints.first() {
            return Err(StructureError::MisplacedCutpoint { pos });
        }
        Ok(pt)
    }
}
