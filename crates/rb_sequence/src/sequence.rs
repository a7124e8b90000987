//! The Sequence abstraction.
//!
//! 1-based positive and negative indexing over *observed* residues,
//! inclusive slicing with step 1 or -1, and resid-based addressing.
//! Chain breaks are emitted as a single `&` whenever a slice crosses
//! them. Two composable views extend the base contract:
//!
//!  - `with_missing` interleaves missing-residue records into their
//!    numeric gaps and extends addressing to the full range.
//!  - `with_modifications` overlays resid -> display-code substitutions;
//!    since substituted codes may be multi-character, covered slices are
//!    returned as one list per chain span instead of a flat string.
//!
//! The views commute: `with_missing().with_modifications()` behaves the
//! same as `with_modifications().with_missing()`.

use ahash::AHashMap;

use crate::MissingResidue;
use crate::ResidueId;
use crate::SequenceError;

/// One entry of the full (observed + missing) residue ordering.
#[derive(Debug, Clone)]
struct FullItem {
    id: ResidueId,
    code: String,
    /// 1-based position in the observed sequence, None for missing residues.
    obs: Option<usize>,
    /// Chain span this residue belongs to; a break sits between spans.
    span: usize,
}

/// Slice bound, resolved against the active view.
#[derive(Clone, Copy)]
enum Bound<'a> {
    Open,
    Index(isize),
    Resid(&'a ResidueId),
}

/// An ordered nucleotide sequence with chain breaks, missing-residue
/// records and an optional modification overlay. Immutable once built.
#[derive(Debug, Clone)]
pub struct Sequence {
    codes: Vec<char>,
    ids: Vec<ResidueId>,
    breaks_after: Vec<usize>,
    missing: Vec<MissingResidue>,
    modifications: AHashMap<ResidueId, String>,
    full: Vec<FullItem>,
    /// Index into `full` for each observed position (1-based -> 0-based).
    obs_items: Vec<usize>,
    full_by_id: AHashMap<ResidueId, usize>,
    obs_by_id: AHashMap<ResidueId, usize>,
}

impl Sequence {
    /// Build a sequence from its observed codes (chain breaks written as
    /// `&`), the parallel residue ids of the observed residues, the
    /// missing-residue records, and the modification overlay.
    pub fn new(
        seq: &str,
        ids: Vec<ResidueId>,
        missing: Vec<MissingResidue>,
        modifications: AHashMap<ResidueId, String>,
    ) -> Result<Self, SequenceError> {
        let mut codes = Vec::new();
        let mut breaks_after = Vec::new();
        for ch in seq.chars() {
            if ch == '&' {
                if !codes.is_empty() && breaks_after.last() != Some(&codes.len()) {
                    breaks_after.push(codes.len());
                }
            } else {
                codes.push(ch);
            }
        }
        if codes.len() != ids.len() {
            return Err(SequenceError::LengthMismatch(ids.len(), codes.len()));
        }

        let mut seq = Sequence {
            codes,
            ids,
            breaks_after,
            missing,
            modifications,
            full: Vec::new(),
            obs_items: Vec::new(),
            full_by_id: AHashMap::default(),
            obs_by_id: AHashMap::default(),
        };
        seq.build_full_order();
        Ok(seq)
    }

    /// Interleave missing residues into the observed chain spans,
    /// ordered by residue id within each span.
    fn build_full_order(&mut self) {
        // Observed positions grouped into chain spans by the breaks.
        let mut spans: Vec<(String, Vec<usize>)> = Vec::new();
        let mut start = 1usize;
        for &b in self.breaks_after.iter().chain([self.codes.len()].iter()) {
            if start > b {
                continue;
            }
            let chain = self.ids[start - 1].chain().to_string();
            spans.push((chain, (start..=b).collect()));
            start = b + 1;
        }

        let mut by_chain: AHashMap<String, Vec<MissingResidue>> = AHashMap::default();
        for m in &self.missing {
            by_chain
                .entry(m.id.chain().to_string())
                .or_default()
                .push(m.clone());
        }
        for v in by_chain.values_mut() {
            v.sort_by(|a, b| a.id.cmp(&b.id));
        }

        for (span_ix, (chain, positions)) in spans.iter().enumerate() {
            let mut gaps = by_chain.remove(chain).unwrap_or_default().into_iter().peekable();
            for &p in positions {
                let oid = &self.ids[p - 1];
                while let Some(m) = gaps.peek() {
                    if m.id < *oid {
                        let m = gaps.next().unwrap();
                        self.full.push(FullItem {
                            id: m.id,
                            code: m.name,
                            obs: None,
                            span: span_ix,
                        });
                    } else {
                        break;
                    }
                }
                self.full.push(FullItem {
                    id: oid.clone(),
                    code: self.codes[p - 1].to_string(),
                    obs: Some(p),
                    span: span_ix,
                });
            }
            for m in gaps {
                self.full.push(FullItem {
                    id: m.id,
                    code: m.name,
                    obs: None,
                    span: span_ix,
                });
            }
        }

        // Missing residues on chains with no observed span go last,
        // each chain as its own span.
        let mut next_span = spans.len();
        for m in &self.missing {
            if let Some(rest) = by_chain.remove(m.id.chain()) {
                for m in rest {
                    self.full.push(FullItem {
                        id: m.id,
                        code: m.name,
                        obs: None,
                        span: next_span,
                    });
                }
                next_span += 1;
            }
        }

        for (ix, item) in self.full.iter().enumerate() {
            if let Some(p) = item.obs {
                debug_assert_eq!(self.obs_items.len(), p - 1);
                self.obs_items.push(ix);
                self.obs_by_id.insert(item.id.clone(), p);
            }
            self.full_by_id.insert(item.id.clone(), ix);
        }
    }

    /// Number of observed residues.
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Observed positions after which a chain break is recorded.
    pub fn breaks_after(&self) -> &[usize] {
        &self.breaks_after
    }

    pub fn missing_residues(&self) -> &[MissingResidue] {
        &self.missing
    }

    /// Residue identity at an observed 1-based position.
    pub fn residue_id(&self, pos: usize) -> Option<&ResidueId> {
        if pos == 0 || pos > self.ids.len() {
            None
        } else {
            Some(&self.ids[pos - 1])
        }
    }

    /// Observed 1-based position of a residue identity.
    pub fn position_of(&self, id: &ResidueId) -> Option<usize> {
        self.obs_by_id.get(id).copied()
    }

    pub fn at(&self, index: isize) -> Result<char, SequenceError> {
        let ix = self.resolve_single(false, index)?;
        Ok(self.full[ix].code.chars().next().unwrap())
    }

    pub fn at_resid(&self, id: &ResidueId) -> Result<char, SequenceError> {
        match self.obs_by_id.get(id) {
            Some(&p) => Ok(self.codes[p - 1]),
            None => Err(SequenceError::UnknownResidue(id.clone())),
        }
    }

    pub fn slice(
        &self,
        start: Option<isize>,
        stop: Option<isize>,
        step: isize,
    ) -> Result<String, SequenceError> {
        let items = self.slice_items(false, int_bound(start), int_bound(stop), step)?;
        Ok(self.render(&items))
    }

    pub fn slice_resid(
        &self,
        start: Option<&ResidueId>,
        stop: Option<&ResidueId>,
        step: isize,
    ) -> Result<String, SequenceError> {
        let items = self.slice_items(false, resid_bound(start), resid_bound(stop), step)?;
        Ok(self.render(&items))
    }

    /// Sum of `end - start + 1` over each (start, end) boundary pair,
    /// measured in observed positions. `[]` yields 0.
    pub fn define_length(&self, boundaries: &[usize]) -> usize {
        assert!(boundaries.len() % 2 == 0, "unpaired define boundaries");
        boundaries
            .chunks_exact(2)
            .map(|pair| {
                assert!(pair[0] >= 1 && pair[0] <= pair[1] && pair[1] <= self.len());
                pair[1] - pair[0] + 1
            })
            .sum()
    }

    pub fn with_missing(&self) -> WithMissing<'_> {
        WithMissing { seq: self }
    }

    pub fn with_modifications(&self) -> WithModifications<'_> {
        WithModifications {
            seq: self,
            missing: false,
        }
    }

    fn view_len(&self, missing: bool) -> usize {
        if missing { self.full.len() } else { self.codes.len() }
    }

    /// Map a 1-based view position to an index into `full`.
    fn view_item(&self, missing: bool, pos: usize) -> usize {
        if missing { pos - 1 } else { self.obs_items[pos - 1] }
    }

    /// Resolve a single integer index. Positive indices address observed
    /// residues; negative ones count from the end of the active view.
    fn resolve_single(&self, missing: bool, index: isize) -> Result<usize, SequenceError> {
        if index > 0 {
            let pos = index as usize;
            if pos > self.codes.len() {
                return Err(SequenceError::OutOfRange(index, self.codes.len()));
            }
            Ok(self.obs_items[pos - 1])
        } else {
            let len = self.view_len(missing);
            let pos = len as isize + index + 1;
            if index == 0 || pos < 1 {
                return Err(SequenceError::OutOfRange(index, len));
            }
            Ok(self.view_item(missing, pos as usize))
        }
    }

    /// 1-based view position of an observed position.
    fn obs_view_pos(&self, missing: bool, pos: usize) -> Result<usize, SequenceError> {
        if pos == 0 || pos > self.codes.len() {
            return Err(SequenceError::OutOfRange(pos as isize, self.codes.len()));
        }
        Ok(if missing { self.obs_items[pos - 1] + 1 } else { pos })
    }

    /// 1-based view position of a residue id.
    fn resid_view_pos(&self, missing: bool, id: &ResidueId) -> Result<usize, SequenceError> {
        if missing {
            match self.full_by_id.get(id) {
                Some(&ix) => Ok(ix + 1),
                None => Err(SequenceError::UnknownResidue(id.clone())),
            }
        } else {
            match self.obs_by_id.get(id) {
                Some(&p) => Ok(p),
                None => Err(SequenceError::UnknownResidue(id.clone())),
            }
        }
    }

    /// Resolve slice bounds and collect the traversed `full` indices.
    ///
    /// Bounds are inclusive. With step 1, a negative stop counts from the
    /// view end exclusively (`-k` keeps `len - k` items) and a negative
    /// start is rejected. With step -1 the roles swap, and a start more
    /// negative than the view bounds is rejected rather than clamped.
    fn slice_items(
        &self,
        missing: bool,
        start: Bound<'_>,
        stop: Bound<'_>,
        step: isize,
    ) -> Result<Vec<usize>, SequenceError> {
        if step != 1 && step != -1 {
            return Err(SequenceError::InvalidStep(step));
        }
        let len = self.view_len(missing);
        if len == 0 {
            return Ok(Vec::new());
        }

        let (start_pos, stop_pos) = if step == 1 {
            let s = match start {
                Bound::Open => 1,
                Bound::Index(i) if i > 0 => self.obs_view_pos(missing, i as usize)?,
                Bound::Index(i) => return Err(SequenceError::OutOfRange(i, len)),
                Bound::Resid(r) => self.resid_view_pos(missing, r)?,
            };
            let e = match stop {
                Bound::Open => len,
                Bound::Index(i) if i > 0 => self.obs_view_pos(missing, i as usize)?,
                Bound::Index(i) => {
                    let p = len as isize + i;
                    if p < 1 { 0 } else { p as usize }
                }
                Bound::Resid(r) => self.resid_view_pos(missing, r)?,
            };
            (s, e)
        } else {
            let s = match start {
                Bound::Open => len,
                Bound::Index(i) if i > 0 => self.obs_view_pos(missing, i as usize)?,
                Bound::Index(i) => {
                    let p = len as isize + i + 1;
                    if p < 1 {
                        return Err(SequenceError::OutOfRange(i, len));
                    }
                    p as usize
                }
                Bound::Resid(r) => self.resid_view_pos(missing, r)?,
            };
            let e = match stop {
                Bound::Open => 1,
                Bound::Index(i) if i > 0 => self.obs_view_pos(missing, i as usize)?,
                Bound::Index(i) => return Err(SequenceError::OutOfRange(i, len)),
                Bound::Resid(r) => self.resid_view_pos(missing, r)?,
            };
            (s, e)
        };

        let mut items = Vec::new();
        if step == 1 {
            for p in start_pos..=stop_pos.min(len) {
                items.push(self.view_item(missing, p));
            }
        } else if start_pos >= stop_pos {
            for p in (stop_pos..=start_pos).rev() {
                items.push(self.view_item(missing, p));
            }
        }
        Ok(items)
    }

    /// Render items as a string, inserting `&` at each crossed break.
    fn render(&self, items: &[usize]) -> String {
        let mut out = String::new();
        let mut prev_span = None;
        for &ix in items {
            let item = &self.full[ix];
            if let Some(span) = prev_span {
                if span != item.span {
                    out.push('&');
                }
            }
            out.push_str(&item.code);
            prev_span = Some(item.span);
        }
        out
    }

    /// Render items as one code list per chain span, applying the
    /// modification overlay.
    fn render_modified(&self, items: &[usize]) -> Vec<Vec<String>> {
        let mut out: Vec<Vec<String>> = Vec::new();
        let mut prev_span = None;
        for &ix in items {
            let item = &self.full[ix];
            if prev_span != Some(item.span) {
                out.push(Vec::new());
            }
            out.last_mut().unwrap().push(self.display_code(item));
            prev_span = Some(item.span);
        }
        out
    }

    fn display_code(&self, item: &FullItem) -> String {
        match self.modifications.get(&item.id) {
            Some(code) => code.clone(),
            None => item.code.clone(),
        }
    }
}

impl std::fmt::Display for Sequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (ix, c) in self.codes.iter().enumerate() {
            if ix > 0 && self.breaks_after.contains(&ix) {
                write!(f, "&")?;
            }
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}

fn int_bound<'a>(b: Option<isize>) -> Bound<'a> {
    match b {
        Some(i) => Bound::Index(i),
        None => Bound::Open,
    }
}

fn resid_bound(b: Option<&ResidueId>) -> Bound<'_> {
    match b {
        Some(r) => Bound::Resid(r),
        None => Bound::Open,
    }
}

/// View that interleaves missing residues into the observed sequence.
#[derive(Clone, Copy)]
pub struct WithMissing<'a> {
    seq: &'a Sequence,
}

impl<'a> WithMissing<'a> {
    /// Number of residues including missing ones.
    pub fn len(&self) -> usize {
        self.seq.full.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seq.full.is_empty()
    }

    pub fn at(&self, index: isize) -> Result<String, SequenceError> {
        let ix = self.seq.resolve_single(true, index)?;
        Ok(self.seq.full[ix].code.clone())
    }

    pub fn at_resid(&self, id: &ResidueId) -> Result<String, SequenceError> {
        match self.seq.full_by_id.get(id) {
            Some(&ix) => Ok(self.seq.full[ix].code.clone()),
            None => Err(SequenceError::UnknownResidue(id.clone())),
        }
    }

    pub fn slice(
        &self,
        start: Option<isize>,
        stop: Option<isize>,
        step: isize,
    ) -> Result<String, SequenceError> {
        let items = self.seq.slice_items(true, int_bound(start), int_bound(stop), step)?;
        Ok(self.seq.render(&items))
    }

    pub fn slice_resid(
        &self,
        start: Option<&ResidueId>,
        stop: Option<&ResidueId>,
        step: isize,
    ) -> Result<String, SequenceError> {
        let items = self.seq.slice_items(true, resid_bound(start), resid_bound(stop), step)?;
        Ok(self.seq.render(&items))
    }

    /// Like `Sequence::define_length`, but gap residues between the
    /// observed boundaries are counted too.
    pub fn define_length(&self, boundaries: &[usize]) -> usize {
        assert!(boundaries.len() % 2 == 0, "unpaired define boundaries");
        boundaries
            .chunks_exact(2)
            .map(|pair| {
                assert!(pair[0] >= 1 && pair[0] <= pair[1] && pair[1] <= self.seq.len());
                self.seq.obs_items[pair[1] - 1] - self.seq.obs_items[pair[0] - 1] + 1
            })
            .sum()
    }

    /// Spread a dot-bracket string over the full view: observed residues
    /// keep their bracket, missing residues become `-`, chain breaks `&`.
    pub fn update_dotbracket(&self, dotbracket: &str) -> Result<String, SequenceError> {
        let brackets: Vec<char> = dotbracket.chars().filter(|&c| c != '&').collect();
        if brackets.len() != self.seq.len() {
            return Err(SequenceError::LengthMismatch(brackets.len(), self.seq.len()));
        }
        let mut out = String::new();
        let mut prev_span = None;
        for item in &self.seq.full {
            if let Some(span) = prev_span {
                if span != item.span {
                    out.push('&');
                }
            }
            match item.obs {
                Some(p) => out.push(brackets[p - 1]),
                None => out.push('-'),
            }
            prev_span = Some(item.span);
        }
        Ok(out)
    }

    pub fn with_modifications(&self) -> WithModifications<'a> {
        WithModifications {
            seq: self.seq,
            missing: true,
        }
    }
}

/// View that substitutes modified-residue display codes.
#[derive(Clone, Copy)]
pub struct WithModifications<'a> {
    seq: &'a Sequence,
    missing: bool,
}

impl<'a> WithModifications<'a> {
    pub fn len(&self) -> usize {
        self.seq.view_len(self.missing)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn at(&self, index: isize) -> Result<String, SequenceError> {
        let ix = self.seq.resolve_single(self.missing, index)?;
        Ok(self.seq.display_code(&self.seq.full[ix]))
    }

    pub fn at_resid(&self, id: &ResidueId) -> Result<String, SequenceError> {
        let pos = self.seq.resid_view_pos(self.missing, id)?;
        let ix = self.seq.view_item(self.missing, pos);
        Ok(self.seq.display_code(&self.seq.full[ix]))
    }

    pub fn slice(
        &self,
        start: Option<isize>,
        stop: Option<isize>,
        step: isize,
    ) -> Result<Vec<Vec<String>>, SequenceError> {
        let items = self
            .seq
            .slice_items(self.missing, int_bound(start), int_bound(stop), step)?;
        Ok(self.seq.render_modified(&items))
    }

    pub fn slice_resid(
        &self,
        start: Option<&ResidueId>,
        stop: Option<&ResidueId>,
        step: isize,
    ) -> Result<Vec<Vec<String>>, SequenceError> {
        let items = self
            .seq
            .slice_items(self.missing, resid_bound(start), resid_bound(stop), step)?;
        Ok(self.seq.render_modified(&items))
    }

    pub fn with_missing(&self) -> WithModifications<'a> {
        WithModifications {
            seq: self.seq,
            missing: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rid(s: &str) -> ResidueId {
        s.parse().unwrap()
    }

    fn ids(s: &str) -> Vec<ResidueId> {
        s.split(',').map(|t| t.parse().unwrap()).collect()
    }

    fn missing(entries: &[(&str, &str)]) -> Vec<MissingResidue> {
        entries
            .iter()
            .map(|(id, name)| MissingResidue::new(rid(id), name))
            .collect()
    }

    fn plain(seq: &str, id_str: &str) -> Sequence {
        Sequence::new(seq, ids(id_str), vec![], AHashMap::default()).unwrap()
    }

    fn seq1() -> Sequence {
        plain("CAUAAUUUCCG", "14,15,15.A,16,18,19,20,21,22,23,A:24")
    }

    fn seq2() -> Sequence {
        plain("AAA&GGG", "A:14,A:15,A:15.A,B:16,B:18,B:19")
    }

    // Full seq1 with missing residues:
    // GGCAUACAUUCGUCCGG
    //   **** ***  ****
    fn seq1_missing() -> Sequence {
        Sequence::new(
            "CAUAAUUUCCG",
            ids("A:14,A:15,A:15.A,A:16,A:18,A:19,A:20,A:21,A:22,A:23,A:24"),
            missing(&[
                ("A:8", "G"),
                ("A:10.D", "G"),
                ("A:17", "C"),
                ("A:20.A", "C"),
                ("A:20.B", "G"),
                ("A:25", "G"),
            ]),
            AHashMap::default(),
        )
        .unwrap()
    }

    fn seq2_missing() -> Sequence {
        Sequence::new(
            "AAA&GGG",
            ids("A:14,A:15,A:15.A,B:12,B:13,B:200.A"),
            missing(&[("A:13", "G"), ("A:16.D", "G"), ("B:11", "C"), ("B:202.A", "C")]),
            AHashMap::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_indexing_with_positive_integer() {
        let seq = seq1();
        assert_eq!(seq.at(1).unwrap(), 'C');
        assert_eq!(seq.at(2).unwrap(), 'A');
        assert_eq!(seq.at(11).unwrap(), 'G');
        assert!(matches!(seq.at(0), Err(SequenceError::OutOfRange(0, _))));
        assert!(matches!(seq.at(12), Err(SequenceError::OutOfRange(12, _))));
    }

    #[test]
    fn test_indexing_with_negative_index() {
        let seq = seq1();
        assert_eq!(seq.at(-1).unwrap(), 'G');
        assert_eq!(seq.at(-5).unwrap(), 'U');
        assert_eq!(seq.at(-11).unwrap(), 'C');
        assert!(seq.at(-12).is_err());
    }

    #[test]
    fn test_indexing_with_resid() {
        let seq = seq1();
        assert_eq!(seq.at_resid(&rid("14")).unwrap(), 'C');
        assert_eq!(seq.at_resid(&rid("15")).unwrap(), 'A');
        assert_eq!(seq.at_resid(&rid("15.A")).unwrap(), 'U');
        assert_eq!(seq.at_resid(&rid("16")).unwrap(), 'A');
        assert_eq!(seq.at_resid(&rid("18")).unwrap(), 'A');
        assert_eq!(seq.at_resid(&rid("A:24")).unwrap(), 'G');
        assert!(matches!(
            seq.at_resid(&rid("B:24")),
            Err(SequenceError::UnknownResidue(_))
        ));
        assert!(matches!(
            seq.at_resid(&rid("15.C")),
            Err(SequenceError::UnknownResidue(_))
        ));
        assert!(matches!(
            seq.at_resid(&rid("13")),
            Err(SequenceError::UnknownResidue(_))
        ));
    }

    #[test]
    fn test_integer_slice_all_positive() {
        let seq = seq1();
        assert_eq!(seq.slice(Some(2), Some(5), 1).unwrap(), "AUAA");
        assert_eq!(seq.slice(None, Some(5), 1).unwrap(), "CAUAA");
        assert_eq!(seq.slice(Some(2), None, 1).unwrap(), "AUAAUUUCCG");
        assert!(matches!(
            seq.slice(Some(1), Some(4), 4),
            Err(SequenceError::InvalidStep(4))
        ));
        assert!(matches!(
            seq.slice(Some(1), Some(4), 0),
            Err(SequenceError::InvalidStep(0))
        ));
    }

    #[test]
    fn test_integer_slice_with_negative_start_stop() {
        let seq = seq1();
        // Negative start is rejected for a positive step.
        assert!(seq.slice(Some(-2), None, 1).is_err());
        // Negative stop is allowed for positive steps.
        assert_eq!(seq.slice(None, Some(-5), 1).unwrap(), "CAUAAU");
    }

    #[test]
    fn test_integer_slice_neg_step() {
        let seq = seq1();
        assert_eq!(seq.slice(Some(7), Some(3), -1).unwrap(), "UUAAU");
        assert_eq!(seq.slice(Some(8), None, -1).unwrap(), "UUUAAUAC");
        assert_eq!(seq.slice(None, Some(5), -1).unwrap(), "GCCUUUA");
        assert!(seq.slice(None, Some(-5), -1).is_err());
        // A start more negative than the bounds is not clamped.
        assert!(seq.slice(Some(-12), None, -1).is_err());
    }

    #[test]
    fn test_resid_slice_forward() {
        let seq = seq1();
        assert_eq!(
            seq.slice_resid(Some(&rid("15")), Some(&rid("18")), 1).unwrap(),
            "AUAA"
        );
        assert_eq!(seq.slice_resid(None, Some(&rid("18")), 1).unwrap(), "CAUAA");
        assert_eq!(
            seq.slice_resid(Some(&rid("15")), None, 1).unwrap(),
            "AUAAUUUCCG"
        );
    }

    #[test]
    fn test_resid_slice_backward() {
        let seq = seq1();
        assert_eq!(
            seq.slice_resid(Some(&rid("18")), Some(&rid("15")), -1).unwrap(),
            "AAUA"
        );
        assert_eq!(seq.slice_resid(Some(&rid("18")), None, -1).unwrap(), "AAUAC");
        assert_eq!(
            seq.slice_resid(None, Some(&rid("15")), -1).unwrap(),
            "GCCUUUAAUA"
        );
    }

    #[test]
    fn test_no_ampersand_after_seq() {
        let seq = seq2();
        assert_eq!(seq.slice(None, Some(3), 1).unwrap(), "AAA");
        assert_eq!(seq.slice(Some(4), None, 1).unwrap(), "GGG");
        assert_eq!(seq.slice(Some(3), None, -1).unwrap(), "AAA");
        assert_eq!(seq.slice(None, Some(3), -1).unwrap(), "GGG&A");
        assert_eq!(seq.slice(None, Some(4), -1).unwrap(), "GGG");
        assert_eq!(seq.slice(None, None, -1).unwrap(), "GGG&AAA");
    }

    #[test]
    fn test_breakpoint() {
        assert_eq!(seq1().breaks_after(), &[] as &[usize]);
        assert_eq!(seq2().breaks_after(), &[3]);
        assert_eq!(seq2().to_string(), "AAA&GGG");
    }

    #[test]
    fn test_len() {
        assert_eq!(seq1_missing().len(), 11);
        assert_eq!(seq2_missing().len(), 6);
        assert_eq!(seq1_missing().with_missing().len(), 17);
        assert_eq!(seq2_missing().with_missing().len(), 10);
    }

    #[test]
    fn test_indexing_with_resid_without_missing() {
        let seq = seq1_missing();
        assert_eq!(seq.at_resid(&rid("A:14")).unwrap(), 'C');
        assert!(seq.at_resid(&rid("A:8")).is_err());
    }

    #[test]
    fn test_missing_indexing_with_resid() {
        let seq = seq1_missing();
        assert_eq!(seq.with_missing().at_resid(&rid("A:14")).unwrap(), "C");
        assert_eq!(seq.with_missing().at_resid(&rid("A:8")).unwrap(), "G");
    }

    #[test]
    fn test_missing_integer_slice_all_positive() {
        let seq = seq1_missing();
        assert_eq!(seq.with_missing().slice(Some(2), Some(5), 1).unwrap(), "AUACA");
        assert_eq!(seq.with_missing().slice(None, Some(5), 1).unwrap(), "GGCAUACA");
        assert_eq!(
            seq.with_missing().slice(Some(2), None, 1).unwrap(),
            "AUACAUUCGUCCGG"
        );
        assert_eq!(
            seq2_missing().with_missing().slice(None, None, 1).unwrap(),
            "GAAAG&CGGGC"
        );
    }

    #[test]
    fn test_missing_integer_slice_with_negative_stop() {
        // Negative stop is allowed for positive steps and counts from the
        // end of the full view.
        assert_eq!(
            seq2_missing().with_missing().slice(None, Some(-3), 1).unwrap(),
            "GAAAG&CG"
        );
    }

    #[test]
    fn test_missing_integer_slice_neg_step() {
        let seq = seq1_missing();
        assert_eq!(seq.with_missing().slice(Some(7), Some(3), -1).unwrap(), "UUACAU");
        assert_eq!(
            seq.with_missing().slice(Some(8), None, -1).unwrap(),
            "UGCUUACAUACGG"
        );
        assert_eq!(
            seq.with_missing().slice(None, Some(5), -1).unwrap(),
            "GGCCUGCUUA"
        );
        assert!(seq.with_missing().slice(None, Some(-5), -1).is_err());
    }

    #[test]
    fn test_missing_resid_slice_key_in_seq() {
        let seq = seq2_missing();
        let wm = seq.with_missing();
        assert_eq!(
            wm.slice_resid(Some(&rid("A:15")), Some(&rid("B:13")), 1).unwrap(),
            "AAG&CGG"
        );
        assert_eq!(wm.slice_resid(Some(&rid("A:15")), None, 1).unwrap(), "AAG&CGGGC");
        assert_eq!(wm.slice_resid(None, Some(&rid("B:13")), 1).unwrap(), "GAAAG&CGG");
        assert_eq!(
            wm.slice_resid(Some(&rid("B:13")), Some(&rid("A:15")), -1).unwrap(),
            "GGC&GAA"
        );
        assert_eq!(wm.slice_resid(None, Some(&rid("A:15")), -1).unwrap(), "CGGGC&GAA");
        assert_eq!(wm.slice_resid(Some(&rid("B:13")), None, -1).unwrap(), "GGC&GAAAG");
    }

    #[test]
    fn test_missing_resid_slice_key_not_in_seq() {
        let seq = seq2_missing();
        let wm = seq.with_missing();
        // Forward
        assert_eq!(
            wm.slice_resid(Some(&rid("A:13")), Some(&rid("A:16.D")), 1).unwrap(),
            "GAAAG"
        );
        assert_eq!(wm.slice_resid(Some(&rid("B:11")), None, 1).unwrap(), "CGGGC");
        assert_eq!(wm.slice_resid(None, Some(&rid("B:11")), 1).unwrap(), "GAAAG&C");
        // Backwards
        assert_eq!(
            wm.slice_resid(Some(&rid("A:16.D")), Some(&rid("A:13")), -1).unwrap(),
            "GAAAG"
        );
        assert_eq!(wm.slice_resid(None, Some(&rid("B:11")), -1).unwrap(), "CGGGC");
        assert_eq!(wm.slice_resid(Some(&rid("B:11")), None, -1).unwrap(), "C&GAAAG");
        // Absent even from the full view
        assert!(matches!(
            wm.slice_resid(Some(&rid("C:1")), None, 1),
            Err(SequenceError::UnknownResidue(_))
        ));
    }

    fn seq_mods() -> Sequence {
        let mut mods = AHashMap::default();
        mods.insert(rid("A:14"), "I".to_string());
        mods.insert(rid("A:16"), "Some Free Text".to_string());
        Sequence::new(
            "AUGCA",
            ids("A:14,A:15,A:15.A,A:16,A:18"),
            vec![],
            mods,
        )
        .unwrap()
    }

    fn seq2_mods() -> Sequence {
        let mut mods = AHashMap::default();
        mods.insert(rid("A:13"), "I".to_string());
        mods.insert(rid("B:200.A"), "Hallo".to_string());
        Sequence::new(
            "AAA&GGG",
            ids("A:14,A:15,A:15.A,B:12,B:13,B:200.A"),
            missing(&[("A:13", "G"), ("A:16.D", "G"), ("B:11", "C"), ("B:202.A", "C")]),
            mods,
        )
        .unwrap()
    }

    #[test]
    fn test_modifications_indexing_integer() {
        let seq = seq_mods();
        assert_eq!(seq.at(1).unwrap(), 'A');
        assert_eq!(seq.with_modifications().at(1).unwrap(), "I");
        assert_eq!(seq.with_modifications().at(-2).unwrap(), "Some Free Text");
    }

    #[test]
    fn test_modifications_indexing_slice() {
        let strs = |v: &[&str]| v.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        assert_eq!(
            seq_mods().with_modifications().slice(None, None, 1).unwrap(),
            vec![strs(&["I", "U", "G", "Some Free Text", "A"])]
        );
        assert_eq!(
            seq2_mods().with_modifications().slice(None, None, 1).unwrap(),
            vec![strs(&["A", "A", "A"]), strs(&["G", "G", "Hallo"])]
        );
    }

    #[test]
    fn test_modifications_indexing_resid() {
        let strs = |v: &[&str]| v.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        assert_eq!(
            seq_mods().with_modifications().at_resid(&rid("A:14")).unwrap(),
            "I"
        );
        assert_eq!(
            seq2_mods()
                .with_modifications()
                .slice_resid(Some(&rid("A:14")), Some(&rid("B:200.A")), 1)
                .unwrap(),
            vec![strs(&["A", "A", "A"]), strs(&["G", "G", "Hallo"])]
        );
    }

    #[test]
    fn test_modifications_with_missing_commute() {
        let seq = seq2_mods();
        assert_eq!(
            seq.with_missing().with_modifications().at_resid(&rid("A:13")).unwrap(),
            "I"
        );
        assert_eq!(
            seq.with_modifications().with_missing().at_resid(&rid("A:13")).unwrap(),
            "I"
        );
        // Without the missing view the record is not addressable.
        assert!(seq.with_modifications().at_resid(&rid("A:13")).is_err());
    }

    #[test]
    fn test_update_dotbracket() {
        assert_eq!(
            seq1_missing()
                .with_missing()
                .update_dotbracket("((..))..(.)")
                .unwrap(),
            "--((..-)).--.(.)-"
        );
        assert_eq!(
            seq2_missing().with_missing().update_dotbracket("((()))").unwrap(),
            "-(((-&-)))-"
        );
        assert!(seq2_missing().with_missing().update_dotbracket("()").is_err());
    }

    #[test]
    fn test_define_length() {
        let seq = seq1_missing();
        assert_eq!(seq.define_length(&[4, 5]), 2);
        assert_eq!(seq.define_length(&[4, 5, 7, 7]), 3);
        assert_eq!(seq.define_length(&[]), 0);
        assert_eq!(seq.with_missing().define_length(&[4, 5]), 3);
        assert_eq!(seq.with_missing().define_length(&[4, 5, 7, 7]), 4);
        assert_eq!(seq.with_missing().define_length(&[]), 0);
    }

    #[test]
    fn test_position_translation() {
        let seq = seq2();
        assert_eq!(seq.residue_id(4), Some(&rid("B:16")));
        assert_eq!(seq.position_of(&rid("B:16")), Some(4));
        assert_eq!(seq.position_of(&rid("B:17")), None);
        assert_eq!(seq.residue_id(0), None);
        assert_eq!(seq.residue_id(7), None);
    }
}
