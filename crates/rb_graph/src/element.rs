//! Typed element identities.
//!
//! The element kind is an enum and the `s0`/`h1`/... letter-prefix names
//! exist only at the serialization boundary, via `Display` and `FromStr`.

use std::fmt;
use std::str::FromStr;

use crate::StructureError;

/// Structural element kinds. Variants are ordered by their one-letter
/// serialization tag, so sorting element ids matches the text form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementKind {
    /// 5' dangling end (`f`).
    Five,
    /// Hairpin loop (`h`).
    Hairpin,
    /// Interior loop (`i`).
    Interior,
    /// Multiloop segment or zero-length connector (`m`).
    Multiloop,
    /// Helical stem (`s`).
    Stem,
    /// 3' dangling end (`t`).
    Three,
}

impl ElementKind {
    pub fn tag(self) -> char {
        match self {
            ElementKind::Five => 'f',
            ElementKind::Hairpin => 'h',
            ElementKind::Interior => 'i',
            ElementKind::Multiloop => 'm',
            ElementKind::Stem => 's',
            ElementKind::Three => 't',
        }
    }

    pub fn from_tag(tag: char) -> Option<Self> {
        match tag {
            'f' => Some(ElementKind::Five),
            'h' => Some(ElementKind::Hairpin),
            'i' => Some(ElementKind::Interior),
            'm' => Some(ElementKind::Multiloop),
            's' => Some(ElementKind::Stem),
            't' => Some(ElementKind::Three),
            _ => None,
        }
    }
}

/// A typed element name: kind plus per-kind sequential index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId {
    pub kind: ElementKind,
    pub index: u32,
}

impl ElementId {
    pub fn new(kind: ElementKind, index: u32) -> Self {
        ElementId { kind, index }
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind.tag(), self.index)
    }
}

impl FromStr for ElementId {
    type Err = StructureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || StructureError::BgParse(format!("invalid element name {s:?}"));
        let mut chars = s.chars();
        let kind = chars.next().and_then(ElementKind::from_tag).ok_or_else(bad)?;
        let index = chars.as_str().parse::<u32>().map_err(|_| bad())?;
        Ok(ElementId { kind, index })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_parse_roundtrip() {
        for name in ["s0", "h12", "i3", "m0", "f1", "t2"] {
            let id: ElementId = name.parse().unwrap();
            assert_eq!(id.to_string(), name);
        }
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("x0".parse::<ElementId>().is_err());
        assert!("s".parse::<ElementId>().is_err());
        assert!("s-1".parse::<ElementId>().is_err());
        assert!("".parse::<ElementId>().is_err());
    }

    #[test]
    fn test_sort_order_matches_tags() {
        let mut ids: Vec<ElementId> = ["t0", "s1", "m0", "h0", "f0", "i0", "s0"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();
        ids.sort();
        let names: Vec<String> = ids.iter().map(|i| i.to_string()).collect();
        assert_eq!(names, ["f0", "h0", "i0", "m0", "s0", "s1", "t0"]);
    }
}
