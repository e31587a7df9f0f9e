use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::watch;

use crate::brush::Brush;
use crate::config::Config;
use crate::coords::{CanvasRect, CellMapping};
use crate::gesture::{PaintContext, PaintGesture, Role};
use crate::grid::Cell;
use crate::input::InputAction;
use crate::map::{BattleMap, MapError};
use crate::store::MapStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

/// Window-independent viewer state: routes input through the paint gesture
/// into the store and tracks when the frame must be redrawn.
pub struct Viewer {
    role: Role,
    store: MapStore,
    snapshots: watch::Receiver<Arc<BattleMap>>,
    snapshot: Arc<BattleMap>,
    gesture: PaintGesture,
    map_path: Option<PathBuf>,
    window_size: (u32, u32),
    needs_redraw: bool,
}

impl Viewer {
    pub fn new(config: &Config, map: BattleMap, map_path: Option<PathBuf>) -> Self {
        let store = MapStore::new(map);
        let mut snapshots = store.subscribe();
        let snapshot = snapshots.borrow_and_update().clone();
        let window_size = snapshot.pixel_size();

        log::info!(
            "Viewing map {} as {:?} ({} of {} cells revealed)",
            snapshot.id,
            config.role,
            snapshot.revealed_count(),
            u64::from(snapshot.grid_width) * u64::from(snapshot.grid_height)
        );

        Self {
            role: config.role,
            store,
            snapshots,
            snapshot,
            gesture: PaintGesture::new(Brush::new(config.brush_size)),
            map_path,
            window_size,
            needs_redraw: true,
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn snapshot(&self) -> &Arc<BattleMap> {
        &self.snapshot
    }

    pub fn gesture(&self) -> &PaintGesture {
        &self.gesture
    }

    pub fn map_path(&self) -> Option<&Path> {
        self.map_path.as_deref()
    }

    pub fn set_window_size(&mut self, width: u32, height: u32) {
        self.window_size = (width, height);
        self.needs_redraw = true;
    }

    pub fn preview(&self) -> Vec<Cell> {
        self.gesture.preview(self.context())
    }

    /// Picks up a newly published snapshot. Returns whether it changed.
    pub fn sync_snapshot(&mut self) -> bool {
        if !self.snapshots.has_changed().unwrap_or(false) {
            return false;
        }
        let next = self.snapshots.borrow_and_update().clone();
        if Arc::ptr_eq(&next, &self.snapshot) {
            return false;
        }
        self.snapshot = next;
        self.needs_redraw = true;
        true
    }

    /// Returns and clears the pending redraw flag.
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.needs_redraw)
    }

    fn context(&self) -> PaintContext {
        PaintContext::for_map(self.role, &self.snapshot)
    }

    fn cell_at(&self, x: f64, y: f64) -> Option<Cell> {
        let (canvas_width, canvas_height) = self.snapshot.pixel_size();
        let mapping = CellMapping {
            rect: CanvasRect::fit(
                self.window_size.0,
                self.window_size.1,
                canvas_width,
                canvas_height,
            ),
            canvas_width,
            canvas_height,
            cell_size: self.snapshot.cell_size,
            grid_width: self.snapshot.grid_width,
            grid_height: self.snapshot.grid_height,
        };
        mapping.cell_at(x, y)
    }

    pub fn handle(&mut self, action: InputAction) -> Control {
        let hover_before = self.gesture.hover();
        let ctx = self.context();

        match action {
            InputAction::None => {}
            InputAction::PointerDown { x, y } => {
                let cell = self.cell_at(x, y);
                self.gesture.pointer_down(cell, ctx, &mut self.store);
            }
            InputAction::PointerMoved { x, y } => {
                let cell = self.cell_at(x, y);
                self.gesture.pointer_move(cell, ctx, &mut self.store);
            }
            InputAction::PointerUp => self.gesture.pointer_up(),
            InputAction::PointerLeft => self.gesture.pointer_leave(),
            InputAction::SetBrushSize(size) => {
                self.gesture.set_brush_size(size);
                log::debug!("Brush size {}", self.gesture.brush().size());
                self.needs_redraw = true;
            }
            InputAction::RevealAll if self.role.can_edit() => self.store.reveal_all(),
            InputAction::HideAll if self.role.can_edit() => self.store.hide_all(),
            InputAction::RevealAll | InputAction::HideAll => {
                log::debug!("Ignoring fog reset from a player");
            }
            InputAction::Save => self.save(),
            InputAction::Open => self.open(),
            InputAction::Quit => return Control::Quit,
        }

        if self.gesture.hover() != hover_before && self.role.can_edit() {
            self.needs_redraw = true;
        }
        self.sync_snapshot();
        Control::Continue
    }

    /// Writes the current snapshot to `path` and remembers it for later saves.
    pub fn save_to(&mut self, path: PathBuf) -> Result<(), MapError> {
        self.snapshot.save(&path)?;
        self.map_path = Some(path);
        Ok(())
    }

    pub fn open_from(&mut self, path: PathBuf) -> Result<(), MapError> {
        let map = BattleMap::load(&path)?;
        self.gesture.pointer_leave();
        self.store.replace(map);
        self.map_path = Some(path);
        self.sync_snapshot();
        Ok(())
    }

    fn save(&mut self) {
        let path = match self.map_path.clone() {
            Some(path) => Some(path),
            None => rfd::FileDialog::new()
                .add_filter("Battle map", &["json"])
                .set_file_name(&format!("{}.json", self.snapshot.id))
                .save_file(),
        };
        let Some(path) = path else {
            return;
        };
        if let Err(err) = self.save_to(path) {
            log::warn!("Save failed: {}", err);
        }
    }

    fn open(&mut self) {
        let dialog = rfd::FileDialog::new().add_filter("Battle map", &["json"]);
        let Some(path) = dialog.pick_file() else {
            return;
        };
        if let Err(err) = self.open_from(path) {
            log::warn!("Open failed: {}", err);
        }
    }
}
