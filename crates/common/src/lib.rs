//! Shared types for the flyview demo.
//!
//! # Invariants
//! - Transforms are plain data; the renderer derives model matrices from them each frame.
//! - A loaded `AppConfig` has already been validated.

pub mod config;
pub mod scene;
pub mod transform;

pub use config::{AppConfig, CameraDefaults, ConfigError, ControlsConfig, WindowConfig};
pub use scene::{DEFAULT_CUBE_COUNT, MAX_CUBE_COUNT, Scene};
pub use transform::Transform;
