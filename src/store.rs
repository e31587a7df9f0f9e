use std::sync::Arc;

use tokio::sync::watch;

use crate::gesture::CellSink;
use crate::map::BattleMap;

/// Authoritative copy of one map.
///
/// Every accepted mutation publishes a fresh `Arc<BattleMap>` snapshot to
/// subscribers. Writers are not coordinated: the last write wins.
#[derive(Debug)]
pub struct MapStore {
    tx: watch::Sender<Arc<BattleMap>>,
}

impl MapStore {
    pub fn new(map: BattleMap) -> Self {
        let (tx, _rx) = watch::channel(Arc::new(map));
        Self { tx }
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<BattleMap>> {
        self.tx.subscribe()
    }

    pub fn snapshot(&self) -> Arc<BattleMap> {
        self.tx.borrow().clone()
    }

    /// Swaps in a different map, e.g. after opening a file.
    pub fn replace(&self, map: BattleMap) {
        log::info!("Switching to map {} ({}x{})", map.id, map.grid_width, map.grid_height);
        self.tx.send_replace(Arc::new(map));
    }

    pub fn toggle_cell(&self, x: u32, y: u32) -> Option<bool> {
        let mut result = None;
        self.tx.send_if_modified(|snapshot| {
            if !snapshot.in_bounds(x, y) {
                return false;
            }
            result = Arc::make_mut(snapshot).toggle_cell(x, y);
            result.is_some()
        });
        if result.is_none() {
            log::trace!("Ignoring toggle outside map at ({}, {})", x, y);
        }
        result
    }

    pub fn reveal_all(&self) {
        self.set_all(true);
    }

    pub fn hide_all(&self) {
        self.set_all(false);
    }

    fn set_all(&self, revealed: bool) {
        self.tx.send_modify(|snapshot| Arc::make_mut(snapshot).set_all(revealed));
        log::info!("{} every cell", if revealed { "Revealed" } else { "Hid" });
    }
}

impl CellSink for MapStore {
    fn on_cell_click(&mut self, x: u32, y: u32) {
        self.toggle_cell(x, y);
    }
}
