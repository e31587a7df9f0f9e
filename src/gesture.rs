use serde::{Deserialize, Serialize};

use crate::brush::Brush;
use crate::grid::Cell;
use crate::map::BattleMap;

/// Session role. Only the DM may change what players can see.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Dm,
    Player,
}

impl Role {
    pub fn can_edit(&self) -> bool {
        matches!(self, Role::Dm)
    }
}

/// Receives one call per affected cell. Whoever implements this owns the
/// authoritative grid; the gesture never sees whether a call succeeded.
pub trait CellSink {
    fn on_cell_click(&mut self, x: u32, y: u32);
}

impl<F: FnMut(u32, u32)> CellSink for F {
    fn on_cell_click(&mut self, x: u32, y: u32) {
        self(x, y)
    }
}

/// Role and grid bounds for one pointer event, taken from the current
/// snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaintContext {
    pub role: Role,
    pub grid_width: u32,
    pub grid_height: u32,
}

impl PaintContext {
    pub fn for_map(role: Role, map: &BattleMap) -> Self {
        Self {
            role,
            grid_width: map.grid_width,
            grid_height: map.grid_height,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragState {
    Idle,
    Painting { last: Cell },
}

/// Pointer-down/move/up painting with per-cell deduplication.
#[derive(Debug, Clone)]
pub struct PaintGesture {
    state: DragState,
    hover: Option<Cell>,
    brush: Brush,
}

impl PaintGesture {
    pub fn new(brush: Brush) -> Self {
        Self {
            state: DragState::Idle,
            hover: None,
            brush,
        }
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_painting(&self) -> bool {
        matches!(self.state, DragState::Painting { .. })
    }

    pub fn hover(&self) -> Option<Cell> {
        self.hover
    }

    pub fn brush(&self) -> Brush {
        self.brush
    }

    pub fn set_brush_size(&mut self, size: u32) {
        self.brush.set_size(size);
    }

    /// Starts a stroke and paints once. Returns the number of sink calls.
    pub fn pointer_down(
        &mut self,
        cell: Option<Cell>,
        ctx: PaintContext,
        sink: &mut impl CellSink,
    ) -> usize {
        let Some(cell) = cell else {
            return 0;
        };
        self.hover = Some(cell);

        if !ctx.role.can_edit() {
            return 0;
        }

        self.state = DragState::Painting { last: cell };
        self.apply(cell, ctx, sink)
    }

    /// Tracks hover and, while painting, paints each newly entered cell once.
    pub fn pointer_move(
        &mut self,
        cell: Option<Cell>,
        ctx: PaintContext,
        sink: &mut impl CellSink,
    ) -> usize {
        self.hover = cell;

        let (DragState::Painting { last }, Some(cell)) = (self.state, cell) else {
            return 0;
        };
        if cell == last {
            return 0;
        }

        self.state = DragState::Painting { last: cell };
        self.apply(cell, ctx, sink)
    }

    pub fn pointer_up(&mut self) {
        self.state = DragState::Idle;
    }

    pub fn pointer_leave(&mut self) {
        self.state = DragState::Idle;
        self.hover = None;
    }

    /// Footprint shown under the cursor. Only the DM gets a preview.
    pub fn preview(&self, ctx: PaintContext) -> Vec<Cell> {
        match self.hover {
            Some(cell) if ctx.role.can_edit() => {
                self.brush.footprint(cell, ctx.grid_width, ctx.grid_height)
            }
            _ => Vec::new(),
        }
    }

    fn apply(&self, center: Cell, ctx: PaintContext, sink: &mut impl CellSink) -> usize {
        let cells = self.brush.footprint(center, ctx.grid_width, ctx.grid_height);
        for cell in &cells {
            sink.on_cell_click(cell.x, cell.y);
        }
        log::debug!(
            "Brush {} at ({}, {}) touched {} cells",
            self.brush.size(),
            center.x,
            center.y,
            cells.len()
        );
        cells.len()
    }
}

impl Default for PaintGesture {
    fn default() -> Self {
        Self::new(Brush::default())
    }
}
