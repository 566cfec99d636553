//! Circular reference detection
//!
//! Runs before an edit is committed: the graph still holds the old edges and
//! the candidate's references are passed in separately, so nothing has to be
//! rolled back on rejection.

use crate::dependency::DependencyGraph;
use ahash::AHashSet;
use livesheet_core::Position;

/// Whether giving `origin` the outgoing edges `references` would close a
/// cycle through the existing graph.
///
/// Iterative depth-first search from `references` along precedent edges.
/// Cells without edges, set or not, are dead ends.
pub fn creates_cycle(graph: &DependencyGraph, origin: Position, references: &[Position]) -> bool {
    let mut visited = AHashSet::new();
    let mut stack: Vec<Position> = references.to_vec();

    while let Some(cell) = stack.pop() {
        if cell == origin {
            return true;
        }
        if !visited.insert(cell) {
            continue;
        }

        stack.extend(
            graph
                .precedents(cell)
                .iter()
                .copied()
                .filter(|p| !visited.contains(p)),
        );
    }

    false
}
