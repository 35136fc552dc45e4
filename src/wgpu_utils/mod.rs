// src/wgpu_utils/mod.rs
//! WGPU utility functions and helpers
//!
//! Provides convenient wrappers for common wgpu binding declarations.

pub mod binding_types;

pub use binding_types::*;
