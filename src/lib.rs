// src/lib.rs
//! Gridlife
//!
//! Conway's Game of Life simulated entirely on the GPU: two ping-pong grid
//! textures advanced by a compute kernel and blitted to the window each frame.

pub mod app;
pub mod config;
pub mod gfx;
pub mod performance;
pub mod simulation;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::LifeApp;
pub use config::SimConfig;

/// Creates a default Gridlife application instance
pub fn default() -> LifeApp {
    LifeApp::new(SimConfig::default())
}
