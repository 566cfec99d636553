//! The grid store
//!
//! A [`Sheet`] owns every cell record together with the dependency graph
//! derived from their formulas. Edits are validated before anything is
//! touched, so a rejected edit leaves the sheet exactly as it was.

use crate::cell::{Cell, CellKind};
use crate::cycle::creates_cycle;
use crate::dependency::DependencyGraph;
use crate::invalidation::invalidate;
use crate::options::SheetOptions;
use ahash::{AHashMap, AHashSet};
use livesheet_core::{CellError, CellValue, Error, Position, Result, Size};
use livesheet_formula::CellLookup;
use std::io::Write;

/// A sheet of cells with formulas that update on read
///
/// # Example
///
/// ```rust
/// use livesheet::{CellValue, Position, Sheet};
///
/// let mut sheet = Sheet::new();
/// let a1 = Position::new(0, 0);
/// let b1 = Position::new(0, 1);
///
/// sheet.set_cell(a1, "5").unwrap();
/// sheet.set_cell(b1, "=A1*2").unwrap();
/// assert_eq!(sheet.value(b1).unwrap(), CellValue::Number(10.0));
///
/// sheet.set_cell(a1, "7").unwrap();
/// assert_eq!(sheet.value(b1).unwrap(), CellValue::Number(14.0));
/// ```
#[derive(Debug, Default)]
pub struct Sheet {
    cells: AHashMap<Position, Cell>,
    graph: DependencyGraph,
    /// Tight bound of all non-empty cells
    size: Size,
    options: SheetOptions,
}

impl Sheet {
    /// Create an empty sheet spanning the full grid
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty sheet with custom options
    pub fn with_options(options: SheetOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn options(&self) -> &SheetOptions {
        &self.options
    }

    // === Edits ===

    /// Set the content of a cell from user input
    ///
    /// Input starting with `=` (and longer than that) is a formula, an empty
    /// string makes an empty cell, and everything else is text.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidPosition`] if `pos` is outside the sheet
    /// - [`Error::FormulaParse`] if the formula does not parse
    /// - [`Error::CircularDependency`] if the formula would reference itself
    ///   directly or through other cells
    ///
    /// The sheet is unchanged when an error is returned.
    pub fn set_cell(&mut self, pos: Position, text: &str) -> Result<()> {
        self.check_position(pos)?;

        let cell = Cell::from_input(text).map_err(|err| {
            log::debug!("rejected edit at {}: {}", pos, err);
            err
        })?;

        if creates_cycle(&self.graph, pos, cell.referenced_cells()) {
            log::debug!("rejected edit at {}: circular dependency", pos);
            return Err(Error::CircularDependency(pos));
        }

        self.graph.set_precedents(pos, cell.referenced_cells());

        let kind = cell.kind();
        let previous = self.cells.insert(pos, cell);
        invalidate(&mut self.cells, &self.graph, pos);

        let was_counted = previous.map_or(false, |c| c.kind() != CellKind::Empty);
        if kind != CellKind::Empty {
            self.size.include(pos);
        } else if was_counted && self.size.is_on_edge(pos) {
            self.recompute_size();
        }

        log::debug!("set {} to {:?} ({:?})", pos, text, kind);
        Ok(())
    }

    /// Remove a cell
    ///
    /// Formulas that reference the cell keep doing so and now read it as
    /// zero. Clearing a cell that was never set is a no-op.
    pub fn clear_cell(&mut self, pos: Position) -> Result<()> {
        self.check_position(pos)?;

        let Some(removed) = self.cells.remove(&pos) else {
            return Ok(());
        };

        self.graph.remove_precedents(pos);
        invalidate(&mut self.cells, &self.graph, pos);

        if removed.kind() != CellKind::Empty && self.size.is_on_edge(pos) {
            self.recompute_size();
        }

        log::debug!("cleared {}", pos);
        Ok(())
    }

    // === Reads ===

    /// Get a read-only view of a cell, `None` if it was never set or has
    /// been cleared
    pub fn cell(&self, pos: Position) -> Result<Option<CellView<'_>>> {
        self.check_position(pos)?;
        Ok(self.cells.get(&pos).map(|cell| CellView {
            sheet: self,
            pos,
            cell,
        }))
    }

    /// Value of a cell; absent cells read as `0`
    ///
    /// Text cells resolve to their text, even when it spells a number:
    /// input `"5"` yields `CellValue::String("5")`. Use
    /// [`CellValue::to_number`] for the numeric reading formulas apply.
    pub fn value(&self, pos: Position) -> Result<CellValue> {
        self.check_position(pos)?;
        Ok(self
            .cells
            .get(&pos)
            .map_or(CellValue::Number(0.0), |cell| self.resolve(pos, cell)))
    }

    /// Text of a cell; absent cells read as `""`
    pub fn text(&self, pos: Position) -> Result<String> {
        self.check_position(pos)?;
        Ok(self.cells.get(&pos).map(Cell::text).unwrap_or_default())
    }

    /// Cells whose formulas reference `pos` directly, in row-major order
    pub fn dependents(&self, pos: Position) -> Result<Vec<Position>> {
        self.check_position(pos)?;
        let mut dependents: Vec<_> = self.graph.dependents(pos).collect();
        dependents.sort_unstable();
        Ok(dependents)
    }

    /// Smallest rectangle anchored at A1 covering every non-empty cell
    pub fn printable_size(&self) -> Size {
        self.size
    }

    /// Number of stored cell records, empty ones included
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    // === Printing ===

    /// Write the values of the printable area, tab separated, one line per row
    pub fn print_values<W: Write>(&self, out: &mut W) -> Result<()> {
        self.print_with(out, |pos, cell| self.resolve(pos, cell).to_string())
    }

    /// Write the texts of the printable area, tab separated, one line per row
    pub fn print_texts<W: Write>(&self, out: &mut W) -> Result<()> {
        self.print_with(out, |_, cell| cell.text())
    }

    /// [`print_values`](Self::print_values) into a string
    pub fn values_to_string(&self) -> String {
        Self::collect_output(|buf| self.print_values(buf))
    }

    /// [`print_texts`](Self::print_texts) into a string
    pub fn texts_to_string(&self) -> String {
        Self::collect_output(|buf| self.print_texts(buf))
    }

    fn collect_output<F>(print: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> Result<()>,
    {
        let mut buf = Vec::new();
        // Writing into a Vec cannot fail.
        let _ = print(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }

    fn print_with<W, F>(&self, out: &mut W, render: F) -> Result<()>
    where
        W: Write,
        F: Fn(Position, &Cell) -> String,
    {
        for row in 0..self.size.rows {
            for col in 0..self.size.cols {
                if col > 0 {
                    out.write_all(b"\t")?;
                }
                let pos = Position::new(row, col);
                // Empty records print like absent cells.
                match self.cells.get(&pos) {
                    Some(cell) if cell.kind() != CellKind::Empty => {
                        out.write_all(render(pos, cell).as_bytes())?;
                    }
                    _ => {}
                }
            }
            out.write_all(b"\n")?;
        }
        Ok(())
    }

    // === Internals ===

    fn check_position(&self, pos: Position) -> Result<()> {
        if self.options.contains(pos) {
            Ok(())
        } else {
            Err(Error::InvalidPosition(pos))
        }
    }

    /// Resolve a cell's value
    ///
    /// Stale formula precedents are evaluated first, deepest first, so that
    /// evaluating `cell` itself only ever reads cached values.
    fn resolve(&self, pos: Position, cell: &Cell) -> CellValue {
        if !cell.is_cached() {
            self.warm_precedents(pos);
        }
        cell.value(self)
    }

    /// Evaluate stale formula cells below `root` in dependency order
    fn warm_precedents(&self, root: Position) {
        let mut order = Vec::new();
        let mut visited = AHashSet::new();
        // (position, children already pushed)
        let mut stack = vec![(root, false)];

        while let Some((pos, expanded)) = stack.pop() {
            if expanded {
                order.push(pos);
                continue;
            }
            if !visited.insert(pos) {
                continue;
            }
            let Some(cell) = self.cells.get(&pos) else {
                continue;
            };
            if cell.is_cached() {
                continue;
            }

            stack.push((pos, true));
            for &precedent in cell.referenced_cells() {
                if !visited.contains(&precedent) {
                    stack.push((precedent, false));
                }
            }
        }

        // The root is last in post-order; the caller evaluates it.
        order.pop();
        log::trace!("evaluating {} stale precedents of {}", order.len(), root);
        for pos in order {
            if let Some(cell) = self.cells.get(&pos) {
                cell.value(self);
            }
        }
    }

    fn recompute_size(&mut self) {
        let mut size = Size::default();
        for (&pos, cell) in &self.cells {
            if cell.kind() != CellKind::Empty {
                size.include(pos);
            }
        }
        log::trace!("printable size rescanned: {:?} -> {:?}", self.size, size);
        self.size = size;
    }
}

impl CellLookup for Sheet {
    fn cell_value(&self, pos: Position) -> Option<CellValue> {
        if !self.options.contains(pos) {
            return Some(CellValue::Error(CellError::Ref));
        }
        self.cells.get(&pos).map(|cell| cell.value(self))
    }
}

/// Read-only view of a stored cell
#[derive(Debug, Clone, Copy)]
pub struct CellView<'a> {
    sheet: &'a Sheet,
    pos: Position,
    cell: &'a Cell,
}

impl<'a> CellView<'a> {
    pub fn position(&self) -> Position {
        self.pos
    }

    pub fn kind(&self) -> CellKind {
        self.cell.kind()
    }

    /// Current value, recomputed if stale
    pub fn value(&self) -> CellValue {
        self.sheet.resolve(self.pos, self.cell)
    }

    /// Raw text for text cells, `=` plus the canonical expression for formulas
    pub fn text(&self) -> String {
        self.cell.text()
    }

    /// Cells the formula references, sorted and unique
    pub fn referenced_cells(&self) -> &'a [Position] {
        self.cell.referenced_cells()
    }

    /// Whether the value is available without evaluation
    pub fn is_cached(&self) -> bool {
        self.cell.is_cached()
    }

    pub fn is_escaped(&self) -> bool {
        self.cell.is_escaped()
    }

    /// The underlying record
    pub fn record(&self) -> &'a Cell {
        self.cell
    }
}
