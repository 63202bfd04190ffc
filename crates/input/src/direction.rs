use flyview_camera::WORLD_UP;
use glam::Vec3;

/// One of the six fly-camera movement directions.
///
/// Each maps to a signed axis of the camera [`Basis`]; held directions are
/// summed, so pressing forward and right together moves diagonally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveDirection {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
}

impl MoveDirection {
    pub const ALL: [MoveDirection; 6] = [
        MoveDirection::Forward,
        MoveDirection::Backward,
        MoveDirection::Left,
        MoveDirection::Right,
        MoveDirection::Up,
        MoveDirection::Down,
    ];

    pub(crate) fn index(self) -> usize {
        self as usize
    }

    /// Unit offset along the camera basis for this direction.
    pub fn offset(self, basis: &Basis) -> Vec3 {
        match self {
            MoveDirection::Forward => basis.forward,
            MoveDirection::Backward => -basis.forward,
            MoveDirection::Right => basis.right,
            MoveDirection::Left => -basis.right,
            MoveDirection::Up => basis.up,
            MoveDirection::Down => -basis.up,
        }
    }
}

/// Orthonormal camera frame derived from yaw and pitch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Basis {
    pub forward: Vec3,
    pub right: Vec3,
    pub up: Vec3,
}

impl Basis {
    /// Build the frame from yaw and pitch in degrees.
    ///
    /// Yaw of -90 with zero pitch looks down -Z. Pitch must stay short of
    /// +-90 or `right` degenerates.
    pub fn from_yaw_pitch(yaw: f32, pitch: f32) -> Self {
        let (yaw, pitch) = (yaw.to_radians(), pitch.to_radians());
        let forward = Vec3::new(
            yaw.cos() * pitch.cos(),
            pitch.sin(),
            yaw.sin() * pitch.cos(),
        )
        .normalize();
        let right = forward.cross(WORLD_UP).normalize();
        let up = right.cross(forward).normalize();
        Self { forward, right, up }
    }
}

/// Inverse of [`Basis::from_yaw_pitch`]: yaw and pitch in degrees for a unit direction.
pub fn yaw_pitch_from_direction(direction: Vec3) -> (f32, f32) {
    let pitch = direction.y.clamp(-1.0, 1.0).asin().to_degrees();
    let yaw = direction.z.atan2(direction.x).to_degrees();
    (yaw, pitch)
}
