use serde::{Deserialize, Serialize};

/// Cell coordinates on a fog grid. `x` is the column, `y` the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub x: u32,
    pub y: u32,
}

impl Cell {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// Row-major grid of reveal flags. `true` means revealed to players.
///
/// The declared `width`/`height` are authoritative. A freshly parsed document
/// may be sparse; missing cells read as hidden. Any write reshapes the rows
/// to exactly `height` x `width` first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FogGrid {
    cells: Vec<Vec<bool>>,
}

impl FogGrid {
    /// A fully hidden grid.
    pub fn new(width: u32, height: u32) -> Self {
        let cells = vec![vec![false; width as usize]; height as usize];
        Self { cells }
    }

    pub fn from_rows(cells: Vec<Vec<bool>>) -> Self {
        Self { cells }
    }

    pub fn rows(&self) -> &[Vec<bool>] {
        &self.cells
    }

    pub fn get_cell(&self, x: u32, y: u32) -> bool {
        self.cells
            .get(y as usize)
            .and_then(|row| row.get(x as usize))
            .copied()
            .unwrap_or(false)
    }

    pub fn has_shape(&self, width: u32, height: u32) -> bool {
        self.cells.len() == height as usize
            && self.cells.iter().all(|row| row.len() == width as usize)
    }

    /// Pads missing rows and cells with hidden and drops anything past the
    /// declared bounds.
    pub fn normalize(&mut self, width: u32, height: u32) {
        if self.has_shape(width, height) {
            return;
        }
        self.cells.resize_with(height as usize, Vec::new);
        for row in &mut self.cells {
            row.resize(width as usize, false);
        }
    }

    /// Writes a cell inside the declared bounds. Writes outside the bounds
    /// are dropped.
    pub fn set_cell(&mut self, width: u32, height: u32, x: u32, y: u32, revealed: bool) -> bool {
        if x >= width || y >= height {
            return false;
        }
        self.normalize(width, height);
        self.cells[y as usize][x as usize] = revealed;
        true
    }

    /// Flips a cell and returns its new value, or `None` when out of bounds.
    pub fn toggle_cell_at(
        &mut self,
        width: u32,
        height: u32,
        x: u32,
        y: u32,
    ) -> Option<bool> {
        if x >= width || y >= height {
            return None;
        }
        let next = !self.get_cell(x, y);
        self.set_cell(width, height, x, y, next);
        Some(next)
    }

    /// Sets every declared cell and drops anything outside the bounds.
    pub fn fill(&mut self, width: u32, height: u32, revealed: bool) {
        self.cells = vec![vec![revealed; width as usize]; height as usize];
    }

    pub fn revealed_count(&self, width: u32, height: u32) -> usize {
        self.cells
            .iter()
            .take(height as usize)
            .map(|row| row.iter().take(width as usize).filter(|c| **c).count())
            .sum()
    }
}
