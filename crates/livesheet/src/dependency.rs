//! Dependency tracking between cells
//!
//! Edges run from a formula cell (the dependent, or listener) to every cell
//! its formula names (the precedents). Both directions are indexed so the
//! sheet can walk listeners for invalidation and precedents for cycle
//! checks and evaluation order.

use ahash::{AHashMap, AHashSet};
use livesheet_core::Position;

/// Dependency graph for formula cells
///
/// The outgoing edges of a cell are owned by that cell's formula: replacing
/// or clearing the cell drops them, but the edges of *other* cells pointing
/// at it are left alone.
#[derive(Debug, Default)]
pub struct DependencyGraph {
    /// Cell → Cells that depend on it (dependents)
    dependents: AHashMap<Position, AHashSet<Position>>,
    /// Cell → Cells it depends on (precedents)
    precedents: AHashMap<Position, Vec<Position>>,
}

impl DependencyGraph {
    /// Create a new empty dependency graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the outgoing edges of `cell` with `precedents`
    pub fn set_precedents(&mut self, cell: Position, precedents: &[Position]) {
        self.remove_precedents(cell);
        if precedents.is_empty() {
            return;
        }

        for &precedent in precedents {
            self.dependents.entry(precedent).or_default().insert(cell);
        }
        self.precedents.insert(cell, precedents.to_vec());
    }

    /// Remove the outgoing edges of `cell`
    ///
    /// Cells that reference `cell` keep their edges.
    pub fn remove_precedents(&mut self, cell: Position) {
        let Some(precedents) = self.precedents.remove(&cell) else {
            return;
        };

        for precedent in precedents {
            if let Some(deps) = self.dependents.get_mut(&precedent) {
                deps.remove(&cell);
                if deps.is_empty() {
                    self.dependents.remove(&precedent);
                }
            }
        }
    }

    /// Get cells that depend on the given cell
    pub fn dependents(&self, cell: Position) -> impl Iterator<Item = Position> + '_ {
        self.dependents
            .get(&cell)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }

    /// Get cells that the given cell depends on
    pub fn precedents(&self, cell: Position) -> &[Position] {
        self.precedents
            .get(&cell)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Whether any cell depends on `cell`
    pub fn has_dependents(&self, cell: Position) -> bool {
        self.dependents.contains_key(&cell)
    }
}
