//! Camera model: projection and view matrices from camera state.
//!
//! # Invariants
//! - Projection kind matches the orthographic flag exactly.
//! - Reset touches only position, target, fov, near, far, orthographic and ortho size.

mod camera;

pub use camera::{Camera, Projection, WORLD_UP};
pub use flyview_common::CameraDefaults;
