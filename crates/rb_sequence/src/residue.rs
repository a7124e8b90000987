//! Residue identities.
//!
//! A `ResidueId` addresses one physical residue by chain label, sequence
//! number and optional insertion code. It stays valid across gaps in the
//! observed sequence, unlike a plain integer position.

use std::fmt;
use std::str::FromStr;

use crate::SequenceError;

/// Chain label, sequence number, optional insertion code.
///
/// Ordering follows biological numbering: residues without an insertion
/// code sort before inserted ones with the same number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResidueId {
    chain: String,
    number: i64,
    insertion: Option<char>,
}

impl ResidueId {
    pub fn new(chain: &str, number: i64, insertion: Option<char>) -> Self {
        ResidueId {
            chain: chain.to_string(),
            number,
            insertion,
        }
    }

    pub fn chain(&self) -> &str {
        &self.chain
    }

    pub fn number(&self) -> i64 {
        self.number
    }

    pub fn insertion(&self) -> Option<char> {
        self.insertion
    }
}

impl fmt::Display for ResidueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.chain, self.number)?;
        if let Some(ins) = self.insertion {
            write!(f, ".{}", ins)?;
        }
        Ok(())
    }
}

/// Parses `"14"`, `"15.A"`, `"B:200.A"`. A missing chain label defaults
/// to chain `A`.
impl FromStr for ResidueId {
    type Err = SequenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (chain, rest) = match s.split_once(':') {
            Some((c, r)) if !c.is_empty() && !r.is_empty() => (c, r),
            Some(_) => return Err(SequenceError::InvalidResidue(s.to_string())),
            None => ("A", s),
        };
        let (num, insertion) = match rest.split_once('.') {
            Some((n, i)) => {
                let mut chars = i.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => (n, Some(c)),
                    _ => return Err(SequenceError::InvalidResidue(s.to_string())),
                }
            }
            None => (rest, None),
        };
        let number = num
            .parse::<i64>()
            .map_err(|_| SequenceError::InvalidResidue(s.to_string()))?;
        Ok(ResidueId {
            chain: chain.to_string(),
            number,
            insertion,
        })
    }
}

/// A residue known from metadata but absent from the observed sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingResidue {
    pub id: ResidueId,
    pub name: String,
}

impl MissingResidue {
    pub fn new(id: ResidueId, name: &str) -> Self {
        MissingResidue {
            id,
            name: name.to_string(),
        }
    }
}
