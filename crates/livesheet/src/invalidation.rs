//! Cache invalidation cascade

use crate::cell::Cell;
use crate::dependency::DependencyGraph;
use ahash::{AHashMap, AHashSet};
use livesheet_core::Position;

/// Mark `start` and every cell that transitively listens to it as stale
///
/// Only caches are dropped; values are recomputed on the next read.
/// Returns the number of caches that were actually cleared.
pub fn invalidate(
    cells: &mut AHashMap<Position, Cell>,
    graph: &DependencyGraph,
    start: Position,
) -> usize {
    let mut visited = AHashSet::new();
    let mut stack = vec![start];
    let mut cleared = 0;

    while let Some(pos) = stack.pop() {
        if !visited.insert(pos) {
            continue;
        }

        if let Some(cell) = cells.get_mut(&pos) {
            if cell.invalidate_cache() {
                cleared += 1;
            }
        }

        if graph.has_dependents(pos) {
            stack.extend(graph.dependents(pos).filter(|d| !visited.contains(d)));
        }
    }

    log::trace!(
        "invalidated {} cached values starting at {} ({} cells visited)",
        cleared,
        start,
        visited.len()
    );
    cleared
}

#[cfg(test)]
mod tests {
    use super::*;
    use livesheet_core::CellValue;

    fn pos(s: &str) -> Position {
        s.parse().unwrap()
    }

    /// Build a set of formula cells with warm caches and a matching graph
    fn warm(formulas: &[(&str, &str)]) -> (AHashMap<Position, Cell>, DependencyGraph) {
        let mut cells = AHashMap::new();
        let mut graph = DependencyGraph::new();
        let lookup = |_pos: Position| Some(CellValue::Number(1.0));

        for (at, input) in formulas {
            let cell = Cell::from_input(input).unwrap();
            graph.set_precedents(pos(at), cell.referenced_cells());
            cell.value(&lookup);
            cells.insert(pos(at), cell);
        }
        (cells, graph)
    }

    #[test]
    fn test_cascade_reaches_transitive_listeners() {
        let (mut cells, graph) = warm(&[("B1", "=A1"), ("C1", "=B1"), ("D1", "=Z9")]);

        let cleared = invalidate(&mut cells, &graph, pos("A1"));

        assert_eq!(cleared, 2);
        assert!(!cells[&pos("B1")].is_cached());
        assert!(!cells[&pos("C1")].is_cached());
        assert!(cells[&pos("D1")].is_cached());
    }

    #[test]
    fn test_diamond_visits_once() {
        let (mut cells, graph) = warm(&[
            ("B1", "=A1"),
            ("C1", "=A1"),
            ("D1", "=B1+C1"),
            ("E1", "=D1*D1"),
        ]);

        assert_eq!(invalidate(&mut cells, &graph, pos("A1")), 4);
        // Already stale: nothing left to clear.
        assert_eq!(invalidate(&mut cells, &graph, pos("A1")), 0);
    }

    #[test]
    fn test_start_cell_is_cleared() {
        let (mut cells, graph) = warm(&[("A1", "=1+1"), ("B1", "=A1")]);
        assert_eq!(invalidate(&mut cells, &graph, pos("A1")), 2);
    }
}
