use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::grid::{Cell, FogGrid};

#[derive(Error, Debug)]
pub enum MapError {
    #[error("Map {id}: {field} must be greater than zero")]
    InvalidDimension { id: String, field: &'static str },
    #[error("Map {id}: {width}x{height} cells at {cell_size}px is too large to draw")]
    TooLarge {
        id: String,
        width: u32,
        height: u32,
        cell_size: u32,
    },
    #[error("Cannot access map file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed map document {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// A battle map and its fog of war, in the shared document layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleMap {
    pub id: String,
    pub grid_width: u32,
    pub grid_height: u32,
    pub cell_size: u32,
    #[serde(default)]
    pub fog_grid: FogGrid,
}

impl BattleMap {
    /// Creates a fully hidden map.
    pub fn new(
        id: impl Into<String>,
        grid_width: u32,
        grid_height: u32,
        cell_size: u32,
    ) -> Result<Self, MapError> {
        let mut map = Self {
            id: id.into(),
            grid_width,
            grid_height,
            cell_size,
            fog_grid: FogGrid::default(),
        };
        map.validate()?;
        map.fog_grid = FogGrid::new(grid_width, grid_height);
        Ok(map)
    }

    pub fn validate(&self) -> Result<(), MapError> {
        let zero = [
            ("gridWidth", self.grid_width),
            ("gridHeight", self.grid_height),
            ("cellSize", self.cell_size),
        ]
        .into_iter()
        .find(|(_, value)| *value == 0);

        if let Some((field, _)) = zero {
            return Err(MapError::InvalidDimension { id: self.id.clone(), field });
        }

        // The RGBA frame for the whole map must be addressable in u32 pixels.
        let frame_bytes = self
            .grid_width
            .checked_mul(self.cell_size)
            .zip(self.grid_height.checked_mul(self.cell_size))
            .and_then(|(w, h)| w.checked_mul(h))
            .and_then(|pixels| pixels.checked_mul(4));
        if frame_bytes.is_none() {
            return Err(MapError::TooLarge {
                id: self.id.clone(),
                width: self.grid_width,
                height: self.grid_height,
                cell_size: self.cell_size,
            });
        }
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, MapError> {
        let path = path.as_ref();
        let path_str = path.to_string_lossy().to_string();
        let text = fs::read_to_string(path)
            .map_err(|source| MapError::Io { path: path_str.clone(), source })?;
        let mut map: BattleMap = serde_json::from_str(&text)
            .map_err(|source| MapError::Json { path: path_str.clone(), source })?;
        map.validate()?;
        map.fog_grid.normalize(map.grid_width, map.grid_height);

        log::info!(
            "Loaded map {} ({}x{}, cell {}px) from {}",
            map.id,
            map.grid_width,
            map.grid_height,
            map.cell_size,
            path_str
        );
        Ok(map)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), MapError> {
        let path = path.as_ref();
        let path_str = path.to_string_lossy().to_string();
        let text = serde_json::to_string_pretty(self)
            .map_err(|source| MapError::Json { path: path_str.clone(), source })?;
        fs::write(path, text)
            .map_err(|source| MapError::Io { path: path_str.clone(), source })?;

        log::info!("Saved map {} to {}", self.id, path_str);
        Ok(())
    }

    pub fn in_bounds(&self, x: u32, y: u32) -> bool {
        x < self.grid_width && y < self.grid_height
    }

    pub fn is_revealed(&self, cell: Cell) -> bool {
        self.fog_grid.get_cell(cell.x, cell.y)
    }

    pub fn toggle_cell(&mut self, x: u32, y: u32) -> Option<bool> {
        self.fog_grid.toggle_cell_at(self.grid_width, self.grid_height, x, y)
    }

    pub fn set_all(&mut self, revealed: bool) {
        self.fog_grid.fill(self.grid_width, self.grid_height, revealed);
    }

    pub fn revealed_count(&self) -> usize {
        self.fog_grid.revealed_count(self.grid_width, self.grid_height)
    }

    /// Frame size in pixels when drawn at `cell_size`.
    pub fn pixel_size(&self) -> (u32, u32) {
        (
            self.grid_width.saturating_mul(self.cell_size),
            self.grid_height.saturating_mul(self.cell_size),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_zero_dimensions() {
        let err = BattleMap::new("m", 0, 4, 32).unwrap_err();
        assert!(matches!(err, MapError::InvalidDimension { field: "gridWidth", .. }));
        let err = BattleMap::new("m", 4, 4, 0).unwrap_err();
        assert!(matches!(err, MapError::InvalidDimension { field: "cellSize", .. }));
    }

    #[test]
    fn new_rejects_maps_too_large_to_draw() {
        let err = BattleMap::new("m", 70_000, 2, 70_000).unwrap_err();
        assert!(matches!(err, MapError::TooLarge { width: 70_000, .. }));
        // Each side fits in u32 but the frame does not.
        let err = BattleMap::new("m", 40_000, 40_000, 2).unwrap_err();
        assert!(matches!(err, MapError::TooLarge { .. }));
        assert!(BattleMap::new("m", 200, 200, 64).is_ok());
    }

    #[test]
    fn load_rejects_oversized_dimensions() {
        let path = std::env::temp_dir().join(format!("fogmap-huge-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"id":"huge","gridWidth":70000,"gridHeight":2,"cellSize":70000}"#)
            .unwrap();
        let err = BattleMap::load(&path).unwrap_err();
        let _ = std::fs::remove_file(&path);
        assert!(matches!(err, MapError::TooLarge { .. }));
    }

    #[test]
    fn load_reshapes_ragged_grid_to_declared_size() {
        let path = std::env::temp_dir().join(format!("fogmap-ragged-{}.json", std::process::id()));
        let doc = r#"{"id":"r","gridWidth":2,"gridHeight":1,"cellSize":8,
            "fogGrid":[[true,false,true,true],[true,true]]}"#;
        std::fs::write(&path, doc).unwrap();
        let mut map = BattleMap::load(&path).unwrap();
        assert_eq!(map.fog_grid.rows(), &[vec![true, false]]);

        map.toggle_cell(0, 0);
        map.save(&path).unwrap();
        let saved: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(saved["fogGrid"], serde_json::json!([[false, false]]));
    }

    #[test]
    fn load_pads_sparse_grid_to_declared_size() {
        let path = std::env::temp_dir().join(format!("fogmap-sparse-{}.json", std::process::id()));
        let doc = r#"{"id":"s","gridWidth":3,"gridHeight":2,"cellSize":8,"fogGrid":[[true]]}"#;
        std::fs::write(&path, doc).unwrap();
        let map = BattleMap::load(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(map.fog_grid.rows(), &[vec![true, false, false], vec![false, false, false]]);
    }

    #[test]
    fn parses_camel_case_sparse_document() {
        let doc = r#"{
            "id": "crypt",
            "gridWidth": 3,
            "gridHeight": 2,
            "cellSize": 16,
            "fogGrid": [[true, false]]
        }"#;
        let map: BattleMap = serde_json::from_str(doc).unwrap();
        map.validate().unwrap();
        assert!(map.is_revealed(Cell::new(0, 0)));
        assert!(!map.is_revealed(Cell::new(2, 0)));
        assert!(!map.is_revealed(Cell::new(1, 1)));
        assert_eq!(map.revealed_count(), 1);
    }

    #[test]
    fn missing_fog_grid_is_all_hidden() {
        let doc = r#"{"id": "x", "gridWidth": 2, "gridHeight": 2, "cellSize": 8}"#;
        let map: BattleMap = serde_json::from_str(doc).unwrap();
        assert_eq!(map.revealed_count(), 0);
    }

    #[test]
    fn save_and_load_keep_revealed_cells() {
        let mut map = BattleMap::new("vault", 4, 3, 24).unwrap();
        map.toggle_cell(1, 2);
        map.toggle_cell(3, 0);

        let path = std::env::temp_dir().join(format!("fogmap-map-{}.json", std::process::id()));
        map.save(&path).unwrap();
        let loaded = BattleMap::load(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded, map);
    }

    #[test]
    fn load_reports_malformed_documents() {
        let path = std::env::temp_dir().join(format!("fogmap-bad-{}.json", std::process::id()));
        std::fs::write(&path, "{ not json").unwrap();
        let err = BattleMap::load(&path).unwrap_err();
        let _ = std::fs::remove_file(&path);
        assert!(matches!(err, MapError::Json { .. }));
    }

    #[test]
    fn pixel_size_scales_by_cell() {
        let map = BattleMap::new("m", 5, 4, 10).unwrap();
        assert_eq!(map.pixel_size(), (50, 40));
    }
}
