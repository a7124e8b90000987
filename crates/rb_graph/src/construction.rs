//! Graph construction from a validated pairing table.
//!
//! Stems are found as maximal helices, then every unpaired region is
//! classified by how many stems enclose it: none makes a hairpin, one
//! strand on each side of a single child makes an interior loop, and
//! everything else becomes a multiloop segment or a dangling end.

use log::debug;

use crate::BulgeGraph;
use crate::ElementId;
use crate::ElementKind;
use crate::PairTable;

struct LoopElem {
    kind: ElementKind,
    /// Sort key: the first backbone position the element would occupy.
    key: usize,
    define: Vec<usize>,
    stems: Vec<usize>,
}

/// Decompose a pairing table into a connected element graph.
pub(crate) fn build(pt: PairTable) -> BulgeGraph {
    let n = pt.len();

    // Maximal helices: consecutive nested pairs with no intervening
    // unpaired or differently paired position on either strand.
    let mut stems: Vec<[usize; 4]> = Vec::new();
    let mut stem_at: Vec<Option<usize>> = vec![None; n + 1];
    let mut i = 1;
    while i <= n {
        match pt.partner(i) {
            Some(j) if j > i && stem_at[i].is_none() => {
                let mut k = 0;
                while i + k + 1 < j - k - 1 && pt.partner(i + k + 1) == Some(j - k - 1) {
                    k += 1;
                }
                let idx = stems.len();
                stems.push([i, i + k, j - k, j]);
                for p in i..=i + k {
                    stem_at[p] = Some(idx);
                    stem_at[j - k + (i + k - p)] = Some(idx);
                }
                i += k + 1;
            }
            _ => i += 1,
        }
    }
    debug!("found {} stems over {} positions", stems.len(), n);

    let mut loops: Vec<LoopElem> = Vec::new();

    // Enclosed side of each stem: hairpin, interior loop or multiloop.
    for (idx, stem) in stems.iter().enumerate() {
        let (inner5, inner3) = (stem[1], stem[2]);
        // Direct children: stems whose outer pair sits immediately inside.
        let mut children: Vec<usize> = Vec::new();
        let mut p = inner5 + 1;
        while p < inner3 {
            match pt.partner(p) {
                Some(q) if q > p => {
                    children.push(stem_at[p].unwrap());
                    p = q + 1;
                }
                _ => p += 1,
            }
        }
        match children.len() {
            0 => {
                // A fully stacked helix closes on a zero-length hairpin.
                let define = if inner5 + 1 <= inner3 - 1 {
                    vec![inner5 + 1, inner3 - 1]
                } else {
                    vec![]
                };
                loops.push(LoopElem {
                    kind: ElementKind::Hairpin,
                    key: inner5 + 1,
                    define,
                    stems: vec![idx],
                });
            }
            1 => {
                let child = stems[children[0]];
                let mut define = Vec::new();
                if inner5 + 1 <= child[0] - 1 {
                    define.extend([inner5 + 1, child[0] - 1]);
                }
                if child[3] + 1 <= inner3 - 1 {
                    define.extend([child[3] + 1, inner3 - 1]);
                }
                loops.push(LoopElem {
                    kind: ElementKind::Interior,
                    key: inner5 + 1,
                    define,
                    stems: vec![idx, children[0]],
                });
            }
            _ => {
                // One multiloop segment per arc between consecutive pairs
                // of the cycle (enclosing stem, children, enclosing stem).
                let mut prev_end = inner5;
                let mut prev_stem = idx;
                for &child in &children {
                    let c = stems[child];
                    let define = if prev_end + 1 <= c[0] - 1 {
                        vec![prev_end + 1, c[0] - 1]
                    } else {
                        vec![]
                    };
                    loops.push(LoopElem {
                        kind: ElementKind::Multiloop,
                        key: prev_end + 1,
                        define,
                        stems: vec![prev_stem, child],
                    });
                    prev_end = c[3];
                    prev_stem = child;
                }
                let define = if prev_end + 1 <= inner3 - 1 {
                    vec![prev_end + 1, inner3 - 1]
                } else {
                    vec![]
                };
                loops.push(LoopElem {
                    kind: ElementKind::Multiloop,
                    key: prev_end + 1,
                    define,
                    stems: vec![prev_stem, idx],
                });
            }
        }
    }

    // Exterior walk: top-level stems in 5' to 3' order.
    let mut top: Vec<usize> = Vec::new();
    let mut p = 1;
    while p <= n {
        match pt.partner(p) {
            Some(q) if q > p => {
                top.push(stem_at[p].unwrap());
                p = q + 1;
            }
            _ => p += 1,
        }
    }

    if top.is_empty() {
        if n > 0 {
            loops.push(LoopElem {
                kind: ElementKind::Five,
                key: 1,
                define: vec![1, n],
                stems: vec![],
            });
        }
    } else {
        let first = stems[top[0]];
        if first[0] > 1 {
            loops.push(LoopElem {
                kind: ElementKind::Five,
                key: 1,
                define: vec![1, first[0] - 1],
                stems: vec![top[0]],
            });
        }
        for w in top.windows(2) {
            let (a, b) = (stems[w[0]], stems[w[1]]);
            let define = if a[3] + 1 <= b[0] - 1 {
                vec![a[3] + 1, b[0] - 1]
            } else {
                vec![]
            };
            loops.push(LoopElem {
                kind: ElementKind::Multiloop,
                key: a[3] + 1,
                define,
                stems: vec![w[0], w[1]],
            });
        }
        let last = stems[*top.last().unwrap()];
        if last[3] < n {
            loops.push(LoopElem {
                kind: ElementKind::Three,
                key: last[3] + 1,
                define: vec![last[3] + 1, n],
                stems: vec![*top.last().unwrap()],
            });
        }
    }

    let mut bg = BulgeGraph::empty(pt);
    let stem_ids: Vec<ElementId> = (0..stems.len() as u32)
        .map(|i| ElementId::new(ElementKind::Stem, i))
        .collect();
    for (idx, stem) in stems.iter().enumerate() {
        bg.insert(stem_ids[idx], stem.to_vec());
    }

    // Name loop elements in backbone order, per-kind counters.
    loops.sort_by_key(|l| (l.key, l.kind));
    let mut counters = [0u32; 5];
    for elem in loops {
        let slot = match elem.kind {
            ElementKind::Five => 0,
            ElementKind::Hairpin => 1,
            ElementKind::Interior => 2,
            ElementKind::Multiloop => 3,
            ElementKind::Three => 4,
            ElementKind::Stem => unreachable!("stems are not loop elements"),
        };
        let id = ElementId::new(elem.kind, counters[slot]);
        counters[slot] += 1;
        bg.insert(id, elem.define);
        for stem in elem.stems {
            bg.add_edge(id, stem_ids[stem]);
        }
    }
    bg
}
