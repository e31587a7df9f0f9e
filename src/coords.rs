use crate::grid::Cell;

/// Where the canvas is drawn on screen, in displayed pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl CanvasRect {
    /// Where a canvas lands inside a window when scaled by whole multiples
    /// and centered, the way the pixels surface presents its buffer.
    pub fn fit(
        window_width: u32,
        window_height: u32,
        canvas_width: u32,
        canvas_height: u32,
    ) -> Self {
        let (ww, wh) = (window_width as f64, window_height as f64);
        let (cw, ch) = (canvas_width.max(1) as f64, canvas_height.max(1) as f64);

        let scale = (ww / cw).min(wh / ch).max(1.0).floor();
        let width = cw * scale;
        let height = ch * scale;

        Self {
            left: ((ww - width) / 2.0).floor(),
            top: ((wh - height) / 2.0).floor(),
            width,
            height,
        }
    }
}

/// Everything needed to turn a pointer position into a grid cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellMapping {
    pub rect: CanvasRect,
    /// Size of the canvas backing buffer in pixels.
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub cell_size: u32,
    pub grid_width: u32,
    pub grid_height: u32,
}

impl CellMapping {
    /// Maps a viewport position to a cell, accounting for the canvas being
    /// displayed at a different size than its backing buffer.
    pub fn cell_at(&self, pointer_x: f64, pointer_y: f64) -> Option<Cell> {
        if self.rect.width <= 0.0 || self.rect.height <= 0.0 || self.cell_size == 0 {
            return None;
        }

        let scale_x = self.canvas_width as f64 / self.rect.width;
        let scale_y = self.canvas_height as f64 / self.rect.height;

        let canvas_x = (pointer_x - self.rect.left) * scale_x;
        let canvas_y = (pointer_y - self.rect.top) * scale_y;

        let cell_x = (canvas_x / self.cell_size as f64).floor();
        let cell_y = (canvas_y / self.cell_size as f64).floor();

        if cell_x < 0.0 || cell_y < 0.0 || !cell_x.is_finite() || !cell_y.is_finite() {
            return None;
        }
        if cell_x >= self.grid_width as f64 || cell_y >= self.grid_height as f64 {
            return None;
        }

        Some(Cell::new(cell_x as u32, cell_y as u32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(rect: CanvasRect) -> CellMapping {
        CellMapping {
            rect,
            canvas_width: 100,
            canvas_height: 100,
            cell_size: 20,
            grid_width: 5,
            grid_height: 5,
        }
    }

    #[test]
    fn unscaled_canvas_maps_by_cell_size() {
        let m = mapping(CanvasRect { left: 0.0, top: 0.0, width: 100.0, height: 100.0 });
        assert_eq!(m.cell_at(0.0, 0.0), Some(Cell::new(0, 0)));
        assert_eq!(m.cell_at(19.9, 39.9), Some(Cell::new(0, 1)));
        assert_eq!(m.cell_at(20.0, 40.0), Some(Cell::new(1, 2)));
        assert_eq!(m.cell_at(99.9, 99.9), Some(Cell::new(4, 4)));
    }

    #[test]
    fn offset_and_scaled_canvas() {
        // Displayed at half size, shifted by (10, 30).
        let m = mapping(CanvasRect { left: 10.0, top: 30.0, width: 50.0, height: 50.0 });
        assert_eq!(m.cell_at(10.0, 30.0), Some(Cell::new(0, 0)));
        assert_eq!(m.cell_at(20.0, 40.0), Some(Cell::new(2, 2)));
        assert_eq!(m.cell_at(59.0, 79.0), Some(Cell::new(4, 4)));
    }

    #[test]
    fn positions_outside_the_grid_map_to_no_cell() {
        let m = mapping(CanvasRect { left: 10.0, top: 10.0, width: 100.0, height: 100.0 });
        assert_eq!(m.cell_at(5.0, 50.0), None);
        assert_eq!(m.cell_at(50.0, 5.0), None);
        assert_eq!(m.cell_at(110.0, 50.0), None);
        assert_eq!(m.cell_at(50.0, 110.0), None);
    }

    #[test]
    fn canvas_larger_than_grid_clips_to_grid() {
        let mut m = mapping(CanvasRect { left: 0.0, top: 0.0, width: 200.0, height: 200.0 });
        m.canvas_width = 200;
        m.canvas_height = 200;
        assert_eq!(m.cell_at(150.0, 10.0), None);
    }

    #[test]
    fn degenerate_rect_maps_to_no_cell() {
        let m = mapping(CanvasRect { left: 0.0, top: 0.0, width: 0.0, height: 100.0 });
        assert_eq!(m.cell_at(0.0, 0.0), None);
    }

    #[test]
    fn fit_scales_by_whole_multiples_and_centers() {
        let rect = CanvasRect::fit(500, 320, 100, 100);
        assert_eq!(rect, CanvasRect { left: 100.0, top: 10.0, width: 300.0, height: 300.0 });

        let small = CanvasRect::fit(50, 50, 100, 100);
        assert_eq!(small.width, 100.0);
        assert_eq!(small.left, -25.0);
    }

    #[test]
    fn fitted_rect_maps_window_positions() {
        let rect = CanvasRect::fit(500, 320, 100, 100);
        let m = mapping(rect);
        assert_eq!(m.cell_at(100.0, 10.0), Some(Cell::new(0, 0)));
        assert_eq!(m.cell_at(399.0, 309.0), Some(Cell::new(4, 4)));
        assert_eq!(m.cell_at(99.0, 100.0), None);
    }

    #[test]
    fn repeated_positions_map_to_the_same_cell() {
        let m = mapping(CanvasRect { left: 3.0, top: 7.0, width: 80.0, height: 120.0 });
        let first = m.cell_at(41.5, 66.25);
        for _ in 0..10 {
            assert_eq!(m.cell_at(41.5, 66.25), first);
        }
    }
}
