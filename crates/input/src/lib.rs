//! Input handling: per-frame device state and the free-fly camera controller.
//!
//! # Invariants
//! - Pitch never leaves `[-89, 89]` degrees.
//! - Releasing the look button always re-arms the first-mouse seed.
//! - After a captured update, `target == position + forward`.

pub mod controls;
pub mod direction;
pub mod state;

pub use controls::{CameraControls, CursorMode, PITCH_LIMIT};
pub use direction::{Basis, MoveDirection, yaw_pitch_from_direction};
pub use state::InputState;
