//! Vignette Core - Core types and utilities for the Vignette runtime
//!
//! This crate provides the foundational types used throughout the runtime:
//! - Mathematical primitives (re-exported from glam)
//! - Transform component for entity positioning
//! - Frame clock with delta clamping and time scaling

pub mod time;
pub mod types;

pub use glam::{Vec2, Vec3};
pub use time::{GameTime, TimeConfig};
pub use types::{Color, Transform};
