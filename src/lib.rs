//! Fog-of-war battle map: a revealed/hidden grid per map, a brush that
//! paints it through an external cell sink, and a pixel renderer.

pub mod app;
pub mod brush;
pub mod config;
pub mod coords;
pub mod gesture;
pub mod graphics;
pub mod grid;
pub mod input;
pub mod map;
pub mod store;
