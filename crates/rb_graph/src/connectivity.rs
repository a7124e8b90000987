//! Graph connectivity.

use ahash::AHashSet;
use log::info;

use crate::BulgeGraph;
use crate::ElementId;

/// Whether all elements form a single connected component. The empty
/// graph counts as connected.
pub fn is_connected(bg: &BulgeGraph) -> bool {
    let elements = bg.elements();
    let Some(&start) = elements.first() else {
        return true;
    };
    let mut seen: AHashSet<ElementId> = AHashSet::default();
    let mut queue = vec![start];
    seen.insert(start);
    while let Some(id) = queue.pop() {
        for n in bg.neighbors(id) {
            if seen.insert(n) {
                queue.push(n);
            }
        }
    }
    info!(
        "component of {start} covers {} of {} elements",
        seen.len(),
        elements.len()
    );
    seen.len() == elements.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PairTable;

    #[test]
    fn test_connected_structures() {
        for s in ["((...))", ".((...)).", "((...))((...))", "..."] {
            let bg = BulgeGraph::from_dotbracket(s).unwrap();
            assert!(is_connected(&bg), "{s} should be connected");
        }
    }

    #[test]
    fn test_empty_graph_is_connected() {
        let bg = BulgeGraph::from_pair_table(PairTable::with_length(0)).unwrap();
        assert!(is_connected(&bg));
    }
}
