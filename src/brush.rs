use crate::grid::Cell;

/// Square brush centered on the cursor cell.
///
/// Even sizes extend toward the lower-index side: a size 2 brush at `(x, y)`
/// covers `(x - 1..=x, y - 1..=y)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Brush {
    size: u32,
}

impl Brush {
    pub const MIN_SIZE: u32 = 1;

    pub fn new(size: u32) -> Self {
        Self { size: size.max(Self::MIN_SIZE) }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn set_size(&mut self, size: u32) {
        self.size = size.max(Self::MIN_SIZE);
    }

    pub fn footprint(&self, center: Cell, grid_width: u32, grid_height: u32) -> Vec<Cell> {
        footprint(center, self.size, grid_width, grid_height)
    }
}

impl Default for Brush {
    fn default() -> Self {
        Self::new(1)
    }
}

/// Cells covered by a brush of `size` at `center`, clipped to the grid, in
/// row-major order. Shared by the hover preview and the mutation path.
pub fn footprint(center: Cell, size: u32, grid_width: u32, grid_height: u32) -> Vec<Cell> {
    let offset = (size / 2) as i64;
    let mut cells = Vec::with_capacity((size as usize).saturating_mul(size as usize));

    for dy in 0..size as i64 {
        let y = center.y as i64 - offset + dy;
        if y < 0 || y >= grid_height as i64 {
            continue;
        }
        for dx in 0..size as i64 {
            let x = center.x as i64 - offset + dx;
            if x < 0 || x >= grid_width as i64 {
                continue;
            }
            cells.push(Cell::new(x as u32, y as u32));
        }
    }

    cells
}
