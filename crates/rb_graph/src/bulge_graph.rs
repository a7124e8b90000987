//! The element graph.
//!
//! A `BulgeGraph` names every structural element (stem, hairpin loop,
//! interior loop, multiloop segment, dangling end), records its boundary
//! positions (`defines`) and its adjacencies (`edges`). Construction
//! always produces one connected backbone; cofold splitting then carves
//! true strand breaks out of it in place.

use std::fmt;

use ahash::{AHashMap, AHashSet};
use itertools::Itertools;

use rb_sequence::{ResidueId, Sequence};

use crate::ElementId;
use crate::ElementKind;
use crate::PairTable;
use crate::StructureError;
use crate::cofold::split_at_cofold_cutpoints;
use crate::construction;
use crate::parse_dotbracket;

#[derive(Debug, Clone)]
pub struct BulgeGraph {
    name: Option<String>,
    length: usize,
    pair_table: PairTable,
    defines: AHashMap<ElementId, Vec<usize>>,
    edges: AHashMap<ElementId, AHashSet<ElementId>>,
    sequence: Option<Sequence>,
}

impl BulgeGraph {
    /// Build the element graph of a dot-bracket string. Strand separators
    /// (`&`) are applied as cofold cutpoints after construction, and the
    /// result is checked to be a single connected component.
    pub fn from_dotbracket(input: &str) -> Result<Self, StructureError> {
        let (pt, cutpoints) = parse_dotbracket(input)?;
        let mut bg = Self::from_pair_table(pt)?;
        split_at_cofold_cutpoints(&mut bg, &cutpoints)?;
        Ok(bg)
    }

    /// Build the element graph of an externally supplied pairing table,
    /// as one connected backbone. The table is validated first.
    pub fn from_pair_table(pt: PairTable) -> Result<Self, StructureError> {
        pt.validate()?;
        Ok(construction::build(pt))
    }

    pub(crate) fn empty(pair_table: PairTable) -> Self {
        BulgeGraph {
            name: None,
            length: pair_table.len(),
            pair_table,
            defines: AHashMap::default(),
            edges: AHashMap::default(),
            sequence: None,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = Some(name.to_string());
    }

    /// Number of backbone positions covered by the graph.
    pub fn length(&self) -> usize {
        self.length
    }

    pub fn element_count(&self) -> usize {
        self.defines.len()
    }

    /// All element ids, sorted.
    pub fn elements(&self) -> Vec<ElementId> {
        self.defines.keys().copied().sorted().collect()
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.defines.contains_key(&id)
    }

    /// Boundary positions of an element (0, 2 or 4 entries; stems and
    /// two-strand interior loops carry 4).
    pub fn define(&self, id: ElementId) -> &[usize] {
        &self.defines[&id]
    }

    /// Neighbors of an element, sorted.
    pub fn neighbors(&self, id: ElementId) -> Vec<ElementId> {
        self.edges[&id].iter().copied().sorted().collect()
    }

    pub fn has_edge(&self, a: ElementId, b: ElementId) -> bool {
        self.edges.get(&a).is_some_and(|set| set.contains(&b))
    }

    /// The element owning a 1-based backbone position. Zero-length
    /// connectors own no position.
    pub fn element_at(&self, pos: usize) -> Option<ElementId> {
        if pos == 0 || pos > self.length {
            return None;
        }
        for (&id, define) in &self.defines {
            if define.chunks_exact(2).any(|span| span[0] <= pos && pos <= span[1]) {
                return Some(id);
            }
        }
        None
    }

    /// Partner of a position in the underlying pairing table.
    pub fn pairing_partner(&self, pos: usize) -> Option<usize> {
        self.pair_table.partner(pos)
    }

    /// Stem neighbors of an element, ordered by their 5' start.
    pub fn connections(&self, id: ElementId) -> Vec<ElementId> {
        self.edges[&id]
            .iter()
            .copied()
            .filter(|e| e.kind == ElementKind::Stem)
            .sorted_by_key(|e| self.defines[e][0])
            .collect()
    }

    /// The element's define extended by one position on each side; for a
    /// zero-length connector this is the two backbone positions it sits
    /// between, located via its two stems.
    pub fn define_a(&self, id: ElementId) -> Vec<usize> {
        let define = &self.defines[&id];
        if define.is_empty() {
            let site = self.zero_length_site(id);
            return vec![site[0], site[1]];
        }
        define
            .chunks_exact(2)
            .flat_map(|span| [span[0].saturating_sub(1).max(1), (span[1] + 1).min(self.length)])
            .collect()
    }

    /// Backbone positions adjacent to the element but owned by neighbors.
    pub fn flanking_nucleotides(&self, id: ElementId) -> Vec<usize> {
        let define = &self.defines[&id];
        if define.is_empty() {
            let site = self.zero_length_site(id);
            return vec![site[0], site[1]];
        }
        let mut out = Vec::new();
        for span in define.chunks_exact(2) {
            if span[0] > 1 {
                out.push(span[0] - 1);
            }
            if span[1] < self.length {
                out.push(span[1] + 1);
            }
        }
        out.sort_unstable();
        out.dedup();
        out
    }

    /// Locate a zero-length connector between its two stems: the smallest
    /// p where one stem's boundary p directly precedes the other's p+1.
    fn zero_length_site(&self, id: ElementId) -> [usize; 2] {
        let stems = self.connections(id);
        assert_eq!(stems.len(), 2, "zero-length element {id} must join two stems");
        let mut sites: Vec<usize> = Vec::new();
        for (a, b) in [(stems[0], stems[1]), (stems[1], stems[0])] {
            for &p in &self.defines[&a] {
                if self.defines[&b].contains(&(p + 1)) {
                    sites.push(p);
                }
            }
        }
        let p = sites.into_iter().min().unwrap_or_else(|| {
            unreachable!("zero-length element {id} has no adjacent stem boundaries")
        });
        [p, p + 1]
    }

    pub(crate) fn insert(&mut self, id: ElementId, define: Vec<usize>) {
        debug_assert!(!self.defines.contains_key(&id));
        self.defines.insert(id, define);
        self.edges.entry(id).or_default();
    }

    pub(crate) fn add_edge(&mut self, a: ElementId, b: ElementId) {
        self.edges.entry(a).or_default().insert(b);
        self.edges.entry(b).or_default().insert(a);
    }

    pub(crate) fn remove_edge(&mut self, a: ElementId, b: ElementId) {
        if let Some(set) = self.edges.get_mut(&a) {
            set.remove(&b);
        }
        if let Some(set) = self.edges.get_mut(&b) {
            set.remove(&a);
        }
    }

    /// Remove an element together with all of its edges.
    pub(crate) fn remove_vertex(&mut self, id: ElementId) {
        let neighbors = self.edges.remove(&id).unwrap_or_default();
        for n in neighbors {
            if let Some(set) = self.edges.get_mut(&n) {
                set.remove(&id);
            }
        }
        self.defines.remove(&id);
    }

    /// Move an element to a new name, rewriting all incident edges.
    pub(crate) fn relabel(&mut self, old: ElementId, new: ElementId) {
        assert!(!self.defines.contains_key(&new), "element {new} already exists");
        let define = self.defines.remove(&old).unwrap();
        self.defines.insert(new, define);
        let neighbors = self.edges.remove(&old).unwrap_or_default();
        for n in &neighbors {
            let set = self.edges.get_mut(n).unwrap();
            set.remove(&old);
            set.insert(new);
        }
        self.edges.insert(new, neighbors);
    }

    /// Smallest unused index for a kind.
    pub(crate) fn next_available(&self, kind: ElementKind) -> ElementId {
        let mut index = 0;
        loop {
            let id = ElementId::new(kind, index);
            if !self.defines.contains_key(&id) {
                return id;
            }
            index += 1;
        }
    }

    /// Attach the residue-level sequence backing this graph.
    pub fn attach_sequence(&mut self, sequence: Sequence) -> Result<(), StructureError> {
        if sequence.len() != self.length {
            return Err(StructureError::SequenceMismatch {
                expected: self.length,
                got: sequence.len(),
            });
        }
        self.sequence = Some(sequence);
        Ok(())
    }

    pub fn sequence(&self) -> Option<&Sequence> {
        self.sequence.as_ref()
    }

    /// Residue identities covered by an element, in define order.
    /// Requires an attached sequence.
    pub fn element_residues(&self, id: ElementId) -> Option<Vec<&ResidueId>> {
        let sequence = self.sequence.as_ref()?;
        let mut out = Vec::new();
        for span in self.defines[&id].chunks_exact(2) {
            for pos in span[0]..=span[1] {
                out.push(sequence.residue_id(pos)?);
            }
        }
        Some(out)
    }

    /// Number of residues in an element, measured through the attached
    /// sequence when present.
    pub fn element_length(&self, id: ElementId) -> usize {
        let define = &self.defines[&id];
        match &self.sequence {
            Some(sequence) => sequence.define_length(define),
            None => define.chunks_exact(2).map(|span| span[1] - span[0] + 1).sum(),
        }
    }

    /// Serialize to bg text: optional name line, length line, one define
    /// line per element and one connect line per stem.
    pub fn to_bg_string(&self) -> String {
        let mut out = String::new();
        if let Some(name) = &self.name {
            out.push_str(&format!("name {name}\n"));
        }
        out.push_str(&format!("length {}\n", self.length));
        for id in self.defines.keys().sorted() {
            out.push_str(&format!("define {id}"));
            for b in &self.defines[id] {
                out.push_str(&format!(" {b}"));
            }
            out.push('\n');
        }
        for id in self.defines.keys().sorted() {
            if id.kind != ElementKind::Stem {
                continue;
            }
            let neighbors = self.neighbors(*id);
            if neighbors.is_empty() {
                continue;
            }
            out.push_str(&format!("connect {id}"));
            for n in neighbors {
                out.push_str(&format!(" {n}"));
            }
            out.push('\n');
        }
        out
    }

    /// Parse bg text back into a graph. The pairing table is not part of
    /// the text form, so the result carries an all-unpaired table.
    pub fn from_bg_string(text: &str) -> Result<Self, StructureError> {
        let mut name: Option<String> = None;
        let mut length: Option<usize> = None;
        let mut defines: AHashMap<ElementId, Vec<usize>> = AHashMap::default();
        let mut connects: Vec<(ElementId, ElementId)> = Vec::new();

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let mut parts = line.split_whitespace();
            match parts.next() {
                Some("name") => {
                    name = Some(
                        parts
                            .next()
                            .ok_or_else(|| StructureError::BgParse("empty name line".into()))?
                            .to_string(),
                    );
                }
                Some("length") => {
                    let token = parts
                        .next()
                        .ok_or_else(|| StructureError::BgParse("empty length line".into()))?;
                    length = Some(token.parse::<usize>().map_err(|_| {
                        StructureError::BgParse(format!("invalid length {token:?}"))
                    })?);
                }
                Some("define") => {
                    let id: ElementId = parts
                        .next()
                        .ok_or_else(|| StructureError::BgParse("empty define line".into()))?
                        .parse()?;
                    let bounds: Vec<usize> = parts
                        .map(|t| {
                            t.parse::<usize>().map_err(|_| {
                                StructureError::BgParse(format!("invalid boundary {t:?}"))
                            })
                        })
                        .collect::<Result<_, _>>()?;
                    if bounds.len() % 2 != 0 || bounds.len() > 4 {
                        return Err(StructureError::BgParse(format!(
                            "element {id} has {} boundaries",
                            bounds.len()
                        )));
                    }
                    if id.kind == ElementKind::Stem && bounds.len() != 4 {
                        return Err(StructureError::BgParse(format!(
                            "stem {id} must have 4 boundaries"
                        )));
                    }
                    if defines.insert(id, bounds).is_some() {
                        return Err(StructureError::BgParse(format!("duplicate element {id}")));
                    }
                }
                Some("connect") => {
                    let first: ElementId = parts
                        .next()
                        .ok_or_else(|| StructureError::BgParse("empty connect line".into()))?
                        .parse()?;
                    for token in parts {
                        connects.push((first, token.parse()?));
                    }
                }
                Some(other) => {
                    return Err(StructureError::BgParse(format!("unknown keyword {other:?}")));
                }
                None => unreachable!(),
            }
        }

        let length = length.unwrap_or_else(|| {
            defines.values().flatten().copied().max().unwrap_or(0)
        });
        let mut bg = BulgeGraph::empty(PairTable::with_length(length));
        bg.name = name;
        for (id, bounds) in defines {
            bg.insert(id, bounds);
        }
        for (a, b) in connects {
            if !bg.contains(a) || !bg.contains(b) {
                return Err(StructureError::BgParse(format!(
                    "connect line references undefined element {a} or {b}"
                )));
            }
            bg.add_edge(a, b);
        }
        Ok(bg)
    }
}

/// Equality over the structural content: length, defines and edges.
/// The pairing table and any attached sequence are construction-time
/// context and do not survive the text form.
impl PartialEq for BulgeGraph {
    fn eq(&self, other: &Self) -> bool {
        self.length == other.length
            && self.defines == other.defines
            && self.edges == other.edges
    }
}

impl fmt::Display for BulgeGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_bg_string())
    }
}
