//! Dot-bracket parsing.
//!
//! Stack-based bracket matching over `( ) . &`, where `&` marks a hard
//! strand boundary that occupies no backbone position. Nested brackets
//! only; pseudoknots are not representable.

use crate::PairTable;
use crate::StructureError;

/// Parse a dot-bracket string into a pairing table plus the cutpoints
/// (positions after which a new strand begins).
pub fn parse_dotbracket(input: &str) -> Result<(PairTable, Vec<usize>), StructureError> {
    let length = input.chars().filter(|&c| c != '&').count();
    let mut pt = PairTable::with_length(length);
    let mut stack: Vec<usize> = Vec::new();
    let mut cutpoints: Vec<usize> = Vec::new();
    let mut pos = 0usize;

    for ch in input.chars() {
        match ch {
            '(' => {
                pos += 1;
                stack.push(pos);
            }
            ')' => {
                pos += 1;
                let open = stack
                    .pop()
                    .ok_or(StructureError::UnbalancedBracket { pos })?;
                pt.set_pair(open, pos);
            }
            '.' => pos += 1,
            '&' => {
                if pos == 0 || cutpoints.last() == Some(&pos) {
                    return Err(StructureError::MisplacedCutpoint { pos });
                }
                cutpoints.push(pos);
            }
            _ => return Err(StructureError::InvalidCharacter { pos: pos + 1, ch }),
        }
    }
    if let Some(&open) = stack.last() {
        return Err(StructureError::UnbalancedBracket { pos: open });
    }
    if cutpoints.last() == Some(&length) {
        return Err(StructureError::MisplacedCutpoint { pos: length });
    }
    Ok((pt, cutpoints))
}

/// Render a pairing table back to dot-bracket text, reinserting `&` at
/// the given cutpoints.
pub fn to_dotbracket(pt: &PairTable, cutpoints: &[usize]) -> String {
    let mut out = String::with_capacity(pt.len() + cutpoints.len());
    for (i, partner) in pt.iter() {
        match partner {
            Some(j) if j > i => out.push('('),
            Some(_) => out.push(')'),
            None => out.push('.'),
        }
        if cutpoints.contains(&i) {
            out.push('&');
        }
    }
    out
}
