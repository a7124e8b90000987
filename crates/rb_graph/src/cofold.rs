//! Cofold splitting.
//!
//! Construction treats `&`-separated strands as one backbone; this module
//! carves the resulting graph apart at each cutpoint. A cutpoint between
//! positions p and p+1 falls on a helix end, inside a stem, inside a loop,
//! or between two elements, and each case rewrites the local elements so
//! that no loop element spans the strand boundary. Afterwards the graph
//! must still be one component, otherwise the strands were never held
//! together by a base pair.

use log::{debug, error};

use crate::BulgeGraph;
use crate::ElementId;
use crate::ElementKind;
use crate::StructureError;
use crate::is_connected;

/// Apply all cutpoints to a freshly constructed graph.
pub fn split_at_cofold_cutpoints(
    bg: &mut BulgeGraph,
    cutpoints: &[usize],
) -> Result<(), StructureError> {
    for &cut in cutpoints {
        let (Some(left), Some(right)) = (bg.element_at(cut), bg.element_at(cut + 1)) else {
            error!("cutpoint {cut} does not fall between two backbone positions");
            return Err(StructureError::MisplacedCutpoint { pos: cut });
        };
        debug!("cutpoint {cut} between {left} and {right}");

        let dangling = |k: ElementKind| k == ElementKind::Five || k == ElementKind::Three;
        if dangling(left.kind) || dangling(right.kind) {
            // Only a cut that coincides with the dangling end's boundary
            // is already represented; a cut inside one means the strand
            // is not base-paired to the rest.
            let at_three_end = left.kind == ElementKind::Three
                && bg.define(left).last() == Some(&cut);
            let at_five_start = right.kind == ElementKind::Five
                && bg.define(right).first() == Some(&(cut + 1));
            if at_three_end || at_five_start {
                continue;
            }
            error!("strand boundary at {cut} touches dangling end {left} or {right}");
            return Err(StructureError::DisconnectedStrands);
        }

        if left.kind == ElementKind::Interior || right.kind == ElementKind::Interior {
            split_interior_loop(bg, cut, left, right);
        } else if left != right {
            split_between_elements(bg, cut, left, right)?;
        } else if left.kind == ElementKind::Stem {
            split_inside_stem(bg, cut, left);
        } else {
            split_inside_loop(bg, cut, left);
        }
    }

    if !is_connected(bg) {
        return Err(StructureError::DisconnectedStrands);
    }
    Ok(())
}

fn owner(bg: &BulgeGraph, pos: usize) -> ElementId {
    bg.element_at(pos)
        .unwrap_or_else(|| unreachable!("position {pos} owned by no element"))
}

/// The cutpoint sits between two distinct elements. A loop flank turns
/// into a dangling end; two directly adjacent stems must share a
/// zero-length connector (or an interior loop) that absorbs the break.
fn split_between_elements(
    bg: &mut BulgeGraph,
    cut: usize,
    left: ElementId,
    right: ElementId,
) -> Result<(), StructureError> {
    if matches!(left.kind, ElementKind::Multiloop | ElementKind::Hairpin) {
        let three = bg.next_available(ElementKind::Three);
        bg.relabel(left, three);
        if left.kind != ElementKind::Hairpin {
            bg.remove_edge(three, right);
        }
    } else if matches!(right.kind, ElementKind::Multiloop | ElementKind::Hairpin) {
        let five = bg.next_available(ElementKind::Five);
        bg.relabel(right, five);
        if right.kind != ElementKind::Hairpin {
            bg.remove_edge(five, left);
        }
    } else {
        assert!(left.kind == ElementKind::Stem && right.kind == ElementKind::Stem);
        let shared: Vec<ElementId> = bg
            .neighbors(left)
            .into_iter()
            .filter(|&e| bg.has_edge(e, right))
            .collect();
        let mut chosen = None;
        for conn in shared {
            if conn.kind == ElementKind::Interior {
                chosen = Some(conn);
                break;
            }
            if bg.define(conn).is_empty() && bg.define_a(conn)[0] == cut {
                chosen = Some(conn);
                break;
            }
        }
        let Some(conn) = chosen else {
            return Err(StructureError::MissingConnection {
                cutpoint: cut,
                left,
                right,
            });
        };
        if conn.kind == ElementKind::Multiloop {
            // The break replaces the zero-length connector entirely.
            bg.remove_vertex(conn);
        } else {
            // The interior loop's remaining strand sits on the other
            // side of the break and becomes a multiloop segment.
            let m = bg.next_available(ElementKind::Multiloop);
            bg.relabel(conn, m);
        }
    }
    Ok(())
}

/// The cutpoint is strictly inside a hairpin or multiloop segment, which
/// falls apart into a 3' and a 5' dangling end.
fn split_inside_loop(bg: &mut BulgeGraph, cut: usize, element: ElementId) {
    assert!(matches!(
        element.kind,
        ElementKind::Hairpin | ElementKind::Multiloop
    ));
    let d = bg.define(element).to_vec();
    let (from, to) = (d[0], d[1]);
    let stem_left = owner(bg, from - 1);
    let stem_right = owner(bg, to + 1);

    let three = bg.next_available(ElementKind::Three);
    let five = bg.next_available(ElementKind::Five);
    bg.insert(three, vec![from, cut]);
    bg.insert(five, vec![cut + 1, to]);
    bg.add_edge(stem_left, three);
    bg.add_edge(five, stem_right);
    bg.remove_vertex(element);
}

/// The cutpoint is inside a stem. The helix is cut into two stems joined
/// by a zero-length connector on the intact strand; a cut at the helix
/// end needs no rewrite at all.
fn split_inside_stem(bg: &mut BulgeGraph, cut: usize, element: ElementId) {
    assert_eq!(element.kind, ElementKind::Stem);
    debug!("splitting stem {element} at {cut}");
    let d = bg.define(element).to_vec();
    if cut == d[1] {
        debug!("cutpoint at helix end, nothing to do");
        return;
    }
    let partner = |p: usize| {
        bg.pairing_partner(p)
            .unwrap_or_else(|| unreachable!("position {p} inside stem {element} is unpaired"))
    };
    let (define1, define2) = if cut < d[1] {
        (
            [d[0], cut, partner(cut), d[3]],
            [cut + 1, d[1], d[2], partner(cut + 1)],
        )
    } else {
        (
            [d[0], partner(cut + 1), cut + 1, d[3]],
            [partner(cut), d[1], d[2], cut],
        )
    };

    // Redistribute the old stem's edges by which half their flanking
    // positions touch.
    let mut edges1 = Vec::new();
    let mut edges2 = Vec::new();
    for edge in bg.neighbors(element) {
        let flank = bg.flanking_nucleotides(edge);
        let (lo, hi) = (flank[0], flank[flank.len() - 1]);
        if hi == define1[0] || lo == define1[3] {
            edges1.push(edge);
        } else if hi == define2[2] || lo == define2[1] {
            edges2.push(edge);
        } else {
            error!(
                "edge {edge} with flanking positions {flank:?} touches neither \
                 half {define1:?} / {define2:?} of stem {element}"
            );
            unreachable!("stem neighbor not adjacent to either half");
        }
    }

    bg.remove_vertex(element);
    let stem1 = bg.next_available(ElementKind::Stem);
    bg.insert(stem1, define1.to_vec());
    let connector = bg.next_available(ElementKind::Multiloop);
    bg.insert(connector, vec![]);
    let stem2 = bg.next_available(ElementKind::Stem);
    bg.insert(stem2, define2.to_vec());

    for e in edges1 {
        bg.add_edge(e, stem1);
    }
    for e in edges2 {
        bg.add_edge(e, stem2);
    }
    bg.add_edge(stem1, connector);
    bg.add_edge(stem2, connector);
}

/// The cutpoint touches an interior loop. One strand of the loop is cut
/// into dangling ends, the other strand survives as a multiloop segment
/// (possibly zero-length) joining the two stems.
fn split_interior_loop(bg: &mut BulgeGraph, cut: usize, left: ElementId, right: ElementId) {
    let iloop = if left.kind == ElementKind::Interior {
        left
    } else {
        right
    };
    let c = bg.connections(iloop);
    let s1 = bg.define(c[0]).to_vec();
    let s2 = bg.define(c[1]).to_vec();
    let forward = [s1[1] + 1, s2[0] - 1];
    let back = [s2[3] + 1, s1[2] - 1];
    if forward[0] - 1 <= cut && cut <= forward[1] {
        split_interior_loop_at_side(bg, cut, forward, back, [c[0], c[1]]);
    } else if back[0] - 1 <= cut && cut <= back[1] {
        split_interior_loop_at_side(bg, cut, back, forward, [c[1], c[0]]);
    } else {
        unreachable!("cutpoint {cut} outside both strands of {iloop}");
    }
    bg.remove_vertex(iloop);
}

fn split_interior_loop_at_side(
    bg: &mut BulgeGraph,
    cut: usize,
    strand: [usize; 2],
    other_strand: [usize; 2],
    stems: [ElementId; 2],
) {
    let m = bg.next_available(ElementKind::Multiloop);
    let define = if other_strand[0] > other_strand[1] {
        vec![]
    } else {
        other_strand.to_vec()
    };
    bg.insert(m, define);
    bg.add_edge(m, stems[0]);
    bg.add_edge(m, stems[1]);

    if cut >= strand[0] {
        let three = bg.next_available(ElementKind::Three);
        bg.insert(three, vec![strand[0], cut]);
        bg.add_edge(three, stems[0]);
    }
    if cut < strand[1] {
        let five = bg.next_available(ElementKind::Five);
        bg.insert(five, vec![cut + 1, strand[1]]);
        bg.add_edge(five, stems[1]);
    }
}
