use pixels::{Pixels, SurfaceTexture};
use winit::window::Window;

use crate::gesture::Role;
use crate::grid::Cell;
use crate::map::BattleMap;

pub const FLOOR_COLOR: [u8; 4] = [146, 128, 100, 255];
pub const PLAYER_FOG_COLOR: [u8; 4] = [12, 12, 16, 255];
const DM_FOG_TINT: [u8; 4] = [48, 24, 80, 255];
const DM_FOG_ALPHA: f32 = 0.65;
const PREVIEW_TINT: [u8; 4] = [255, 220, 0, 255];
const PREVIEW_ALPHA: f32 = 0.45;
const GRID_LINE_COLOR: [u8; 4] = [64, 64, 64, 255];
// Below this cell size grid lines would swallow the cells.
const MIN_CELL_FOR_LINES: u32 = 4;

/// Owns the pixel surface. The frame buffer is exactly the map size at
/// `cell_size` pixels per cell; pixels scales it to the window.
pub struct GraphicsRenderer {
    pixels: Pixels,
    canvas_width: u32,
    canvas_height: u32,
}

impl GraphicsRenderer {
    pub fn new(
        window: &Window,
        canvas_width: u32,
        canvas_height: u32,
    ) -> Result<Self, pixels::Error> {
        let window_size = window.inner_size();
        let surface_texture = SurfaceTexture::new(window_size.width, window_size.height, window);
        let pixels = Pixels::new(canvas_width, canvas_height, surface_texture)?;

        Ok(Self {
            pixels,
            canvas_width,
            canvas_height,
        })
    }

    pub fn canvas_size(&self) -> (u32, u32) {
        (self.canvas_width, self.canvas_height)
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if let Err(err) = self.pixels.resize_surface(width, height) {
            log::error!("Failed to resize surface: {}", err);
        }
    }

    /// Matches the frame buffer to a map whose dimensions changed.
    pub fn set_canvas_size(&mut self, width: u32, height: u32) {
        if (width, height) == (self.canvas_width, self.canvas_height) {
            return;
        }
        match self.pixels.resize_buffer(width, height) {
            Ok(()) => {
                self.canvas_width = width;
                self.canvas_height = height;
            }
            Err(err) => log::error!("Failed to resize buffer: {}", err),
        }
    }

    pub fn render(&mut self, map: &BattleMap, role: Role, preview: &[Cell]) {
        let frame = self.pixels.frame_mut();
        render_fog(frame, self.canvas_width, self.canvas_height, map, role, preview);
    }

    pub fn present(&mut self) -> Result<(), pixels::Error> {
        self.pixels.render()
    }
}

/// Color of one cell before the preview overlay.
pub fn cell_color(revealed: bool, role: Role) -> [u8; 4] {
    match (revealed, role) {
        (true, _) => FLOOR_COLOR,
        (false, Role::Player) => PLAYER_FOG_COLOR,
        (false, Role::Dm) => blend(FLOOR_COLOR, DM_FOG_TINT, DM_FOG_ALPHA),
    }
}

pub fn preview_color(base: [u8; 4]) -> [u8; 4] {
    blend(base, PREVIEW_TINT, PREVIEW_ALPHA)
}

fn blend(base: [u8; 4], over: [u8; 4], alpha: f32) -> [u8; 4] {
    let mix = |b: u8, o: u8| (b as f32 * (1.0 - alpha) + o as f32 * alpha).round() as u8;
    [mix(base[0], over[0]), mix(base[1], over[1]), mix(base[2], over[2]), 255]
}

/// Full redraw of an RGBA8 frame of `width` x `height` pixels.
///
/// Cells are drawn row-major at `map.cell_size`. The preview is only drawn for
/// the DM.
pub fn render_fog(
    frame: &mut [u8],
    width: u32,
    height: u32,
    map: &BattleMap,
    role: Role,
    preview: &[Cell],
) {
    for pixel in frame.chunks_exact_mut(4) {
        pixel.copy_from_slice(&PLAYER_FOG_COLOR);
    }

    let tile_size = map.cell_size;
    for y in 0..map.grid_height {
        for x in 0..map.grid_width {
            let color = cell_color(map.is_revealed(Cell::new(x, y)), role);
            let (px, py) = (x.saturating_mul(tile_size), y.saturating_mul(tile_size));
            draw_cell_static(frame, px, py, color, width, height, tile_size);
        }
    }

    if role.can_edit() {
        for cell in preview.iter().filter(|c| map.in_bounds(c.x, c.y)) {
            let color = preview_color(cell_color(map.is_revealed(*cell), role));
            let (px, py) = (cell.x.saturating_mul(tile_size), cell.y.saturating_mul(tile_size));
            draw_cell_static(frame, px, py, color, width, height, tile_size);
        }
    }

    if tile_size >= MIN_CELL_FOR_LINES {
        draw_grid_lines_static(frame, map.grid_width, map.grid_height, width, height, tile_size);
    }
}

fn put_pixel(frame: &mut [u8], px: u32, py: u32, color: [u8; 4], width: u32, height: u32) {
    if px < width && py < height {
        let index = (py as usize * width as usize + px as usize) * 4;
        if index + 3 < frame.len() {
            frame[index..index + 4].copy_from_slice(&color);
        }
    }
}

fn draw_cell_static(
    frame: &mut [u8],
    x: u32,
    y: u32,
    color: [u8; 4],
    width: u32,
    height: u32,
    tile_size: u32,
) {
    // Only the part of the cell that lands inside the frame.
    for dy in 0..tile_size.min(height.saturating_sub(y)) {
        for dx in 0..tile_size.min(width.saturating_sub(x)) {
            put_pixel(frame, x + dx, y + dy, color, width, height);
        }
    }
}

fn draw_grid_lines_static(
    frame: &mut [u8],
    grid_width: u32,
    grid_height: u32,
    width: u32,
    height: u32,
    tile_size: u32,
) {
    let grid_pixel_width = grid_width.saturating_mul(tile_size).min(width);
    let grid_pixel_height = grid_height.saturating_mul(tile_size).min(height);

    // Interior lines only; the canvas edge is the map edge.
    for x in 1..grid_width {
        let line_x = x.saturating_mul(tile_size);
        if line_x >= width {
            break;
        }
        for py in 0..grid_pixel_height {
            put_pixel(frame, line_x, py, GRID_LINE_COLOR, width, height);
        }
    }
    for y in 1..grid_height {
        let line_y = y.saturating_mul(tile_size);
        if line_y >= height {
            break;
        }
        for px in 0..grid_pixel_width {
            put_pixel(frame, px, line_y, GRID_LINE_COLOR, width, height);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixel_at(frame: &[u8], width: u32, x: u32, y: u32) -> [u8; 4] {
        let i = ((y * width + x) * 4) as usize;
        [frame[i], frame[i + 1], frame[i + 2], frame[i + 3]]
    }

    fn frame_for(map: &BattleMap) -> (Vec<u8>, u32, u32) {
        let (w, h) = map.pixel_size();
        (vec![0; (w * h * 4) as usize], w, h)
    }

    fn sample_map() -> BattleMap {
        let mut map = BattleMap::new("render", 3, 2, 8).unwrap();
        map.toggle_cell(1, 0);
        map
    }

    #[test]
    fn players_see_opaque_fog() {
        let map = sample_map();
        let (mut frame, w, h) = frame_for(&map);
        render_fog(&mut frame, w, h, &map, Role::Player, &[]);

        // Cell centers avoid the grid lines.
        assert_eq!(pixel_at(&frame, w, 4, 4), PLAYER_FOG_COLOR);
        assert_eq!(pixel_at(&frame, w, 12, 4), FLOOR_COLOR);
        assert_eq!(pixel_at(&frame, w, 20, 12), PLAYER_FOG_COLOR);
    }

    #[test]
    fn dm_sees_tinted_fog() {
        let map = sample_map();
        let (mut frame, w, h) = frame_for(&map);
        render_fog(&mut frame, w, h, &map, Role::Dm, &[]);

        let hidden = pixel_at(&frame, w, 4, 4);
        assert_ne!(hidden, PLAYER_FOG_COLOR);
        assert_ne!(hidden, FLOOR_COLOR);
        assert_eq!(hidden, cell_color(false, Role::Dm));
        assert_eq!(pixel_at(&frame, w, 12, 4), FLOOR_COLOR);
    }

    #[test]
    fn preview_is_drawn_for_dm_only() {
        let map = sample_map();
        let preview = [Cell::new(2, 1)];

        let (mut frame, w, h) = frame_for(&map);
        render_fog(&mut frame, w, h, &map, Role::Dm, &preview);
        assert_eq!(pixel_at(&frame, w, 20, 12), preview_color(cell_color(false, Role::Dm)));

        render_fog(&mut frame, w, h, &map, Role::Player, &preview);
        assert_eq!(pixel_at(&frame, w, 20, 12), PLAYER_FOG_COLOR);
    }

    #[test]
    fn grid_lines_separate_cells() {
        let map = sample_map();
        let (mut frame, w, h) = frame_for(&map);
        render_fog(&mut frame, w, h, &map, Role::Dm, &[]);
        assert_eq!(pixel_at(&frame, w, 8, 3), GRID_LINE_COLOR);
        assert_eq!(pixel_at(&frame, w, 3, 8), GRID_LINE_COLOR);
    }

    #[test]
    fn undersized_frame_is_clipped() {
        let map = sample_map();
        let mut frame = vec![0; 10 * 10 * 4];
        render_fog(&mut frame, 10, 10, &map, Role::Dm, &[Cell::new(2, 1)]);
        assert_eq!(pixel_at(&frame, 10, 9, 9), cell_color(false, Role::Dm));
        assert_eq!(pixel_at(&frame, 10, 9, 4), FLOOR_COLOR);
    }
}
