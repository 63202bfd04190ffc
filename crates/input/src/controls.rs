use crate::direction::{Basis, yaw_pitch_from_direction};
use crate::state::InputState;
use flyview_camera::Camera;
use glam::DVec2;

/// Pitch limit in degrees; looking straight up or down would flip the basis.
pub const PITCH_LIMIT: f32 = 89.0;

/// What the window should do with the OS cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorMode {
    /// Visible and free; the settings panel can be used.
    #[default]
    Free,
    /// Hidden and locked to the window; motion drives mouse-look.
    Captured,
}

/// Free-fly controller: mouse-look while the look button is held, plus
/// six-direction movement relative to the look direction.
///
/// Owns only controller state. The camera is passed in each frame.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraControls {
    pub prev_cursor: DVec2,
    /// Set whenever capture is released; the next captured sample seeds
    /// `prev_cursor` instead of producing a delta.
    pub first_mouse: bool,
    /// World units per second.
    pub move_speed: f32,
    /// Degrees per unit of cursor motion.
    pub mouse_sensitivity: f32,
    /// Degrees around world-up.
    pub yaw: f32,
    /// Degrees, kept within `[-PITCH_LIMIT, PITCH_LIMIT]`.
    pub pitch: f32,
    mode: CursorMode,
}

impl Default for CameraControls {
    fn default() -> Self {
        Self::new(5.0, 0.5)
    }
}

impl CameraControls {
    pub fn new(move_speed: f32, mouse_sensitivity: f32) -> Self {
        Self {
            prev_cursor: DVec2::ZERO,
            first_mouse: true,
            move_speed,
            mouse_sensitivity,
            yaw: -90.0,
            pitch: 0.0,
            mode: CursorMode::Free,
        }
    }

    pub fn mode(&self) -> CursorMode {
        self.mode
    }

    pub fn basis(&self) -> Basis {
        Basis::from_yaw_pitch(self.yaw, self.pitch)
    }

    /// Advance the controller by one frame and return the cursor mode the
    /// window should apply.
    ///
    /// While the look button is up nothing moves and the first-mouse seed is
    /// re-armed. While it is held, cursor deltas turn the camera, held
    /// directions translate it by `move_speed * dt` each, and the target is
    /// placed one unit ahead of the position.
    pub fn update(&mut self, camera: &mut Camera, input: &InputState, dt: f32) -> CursorMode {
        if !input.look_held() {
            if self.mode == CursorMode::Captured {
                tracing::debug!("mouse-look released");
            }
            self.mode = CursorMode::Free;
            self.first_mouse = true;
            return self.mode;
        }

        if self.mode == CursorMode::Free {
            tracing::debug!("mouse-look captured");
            self.mode = CursorMode::Captured;
        }

        let cursor = input.cursor();
        if self.first_mouse {
            self.first_mouse = false;
            self.prev_cursor = cursor;
            // Pick up edits made through the panel while the cursor was free.
            if let Some(direction) = camera.look_direction() {
                let (yaw, pitch) = yaw_pitch_from_direction(direction);
                self.yaw = yaw;
                self.pitch = pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
            }
        }

        let delta_x = (cursor.x - self.prev_cursor.x) as f32 * self.mouse_sensitivity;
        let delta_y = (self.prev_cursor.y - cursor.y) as f32 * self.mouse_sensitivity;
        self.prev_cursor = cursor;

        self.yaw += delta_x;
        self.pitch = (self.pitch + delta_y).clamp(-PITCH_LIMIT, PITCH_LIMIT);

        let basis = self.basis();
        let step = self.move_speed * dt;
        for direction in input.held() {
            camera.position += direction.offset(&basis) * step;
        }
        camera.target = camera.position + basis.forward;

        self.mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::direction::MoveDirection;
    use glam::Vec3;

    fn looking(cursor: DVec2) -> InputState {
        let mut input = InputState::new();
        input.set_look_held(true);
        input.set_cursor(cursor);
        input
    }

    #[test]
    fn free_when_look_button_up() {
        let mut controls = CameraControls::default();
        let mut camera = Camera::default();
        let before = camera;
        let mut input = InputState::new();
        input.set_held(MoveDirection::Forward, true);

        let mode = controls.update(&mut camera, &input, 1.0);

        assert_eq!(mode, CursorMode::Free);
        assert!(controls.first_mouse);
        assert_eq!(camera, before);
    }

    #[test]
    fn first_sample_seeds_previous_cursor() {
        let mut controls = CameraControls::default();
        let mut camera = Camera::default();
        let input = looking(DVec2::new(640.0, 360.0));

        let mode = controls.update(&mut camera, &input, 0.016);

        assert_eq!(mode, CursorMode::Captured);
        assert!(!controls.first_mouse);
        assert_eq!(controls.prev_cursor, DVec2::new(640.0, 360.0));
        assert!((controls.yaw + 90.0).abs() < 1e-4);
        assert!(controls.pitch.abs() < 1e-4);
    }

    #[test]
    fn cursor_delta_turns_camera_with_inverted_y() {
        let mut controls = CameraControls::new(5.0, 0.5);
        let mut camera = Camera::default();
        let mut input = looking(DVec2::ZERO);
        controls.update(&mut camera, &input, 0.0);

        // Right 20, up 10 in screen space.
        input.set_cursor(DVec2::new(20.0, -10.0));
        controls.update(&mut camera, &input, 0.0);

        assert!((controls.yaw - (-90.0 + 10.0)).abs() < 1e-4);
        assert!((controls.pitch - 5.0).abs() < 1e-4);
    }

    #[test]
    fn pitch_is_clamped_under_any_accumulated_motion() {
        let mut controls = CameraControls::new(5.0, 1.0);
        let mut camera = Camera::default();
        let mut input = looking(DVec2::ZERO);
        controls.update(&mut camera, &input, 0.0);

        for step in 1..=50 {
            input.set_cursor(DVec2::new(0.0, -25.0 * step as f64));
            controls.update(&mut camera, &input, 0.0);
            assert!(controls.pitch <= PITCH_LIMIT);
        }
        assert_eq!(controls.pitch, PITCH_LIMIT);

        for step in 1..=100 {
            input.set_cursor(DVec2::new(0.0, -1250.0 + 40.0 * step as f64));
            controls.update(&mut camera, &input, 0.0);
            assert!(controls.pitch >= -PITCH_LIMIT);
        }
        assert_eq!(controls.pitch, -PITCH_LIMIT);
    }

    #[test]
    fn releasing_look_rearms_first_mouse() {
        let mut controls = CameraControls::default();
        let mut camera = Camera::default();
        let mut input = looking(DVec2::new(100.0, 100.0));
        controls.update(&mut camera, &input, 0.0);
        assert!(!controls.first_mouse);

        input.set_look_held(false);
        assert_eq!(controls.update(&mut camera, &input, 0.0), CursorMode::Free);
        assert!(controls.first_mouse);

        // The cursor wanders while free; re-capturing must not jump.
        input.set_cursor(DVec2::new(900.0, -400.0));
        input.set_look_held(true);
        let yaw = controls.yaw;
        let pitch = controls.pitch;
        controls.update(&mut camera, &input, 0.0);
        assert!((controls.yaw - yaw).abs() < 1e-4);
        assert!((controls.pitch - pitch).abs() < 1e-4);
    }

    #[test]
    fn target_is_position_plus_forward_after_update() {
        let mut controls = CameraControls::new(3.0, 0.25);
        let mut camera = Camera::default();
        let mut input = looking(DVec2::ZERO);
        input.set_held(MoveDirection::Forward, true);
        input.set_held(MoveDirection::Up, true);

        for i in 0..10 {
            input.set_cursor(DVec2::new(7.0 * i as f64, -3.0 * i as f64));
            controls.update(&mut camera, &input, 0.1);
            let forward = controls.basis().forward;
            assert!((camera.target - (camera.position + forward)).length() < 1e-5);
        }
    }

    #[test]
    fn simultaneous_keys_combine_additively() {
        let mut controls = CameraControls::new(2.0, 0.5);
        let mut camera = Camera::default();
        let start = camera.position;
        let mut input = looking(DVec2::ZERO);
        input.set_held(MoveDirection::Forward, true);
        input.set_held(MoveDirection::Right, true);

        controls.update(&mut camera, &input, 0.5);

        // Forward is -Z and right is +X; each contributes speed * dt = 1.
        let moved = camera.position - start;
        assert!(moved.abs_diff_eq(Vec3::new(1.0, 0.0, -1.0), 1e-5));
        assert!((moved.length() - 2.0_f32.sqrt()).abs() < 1e-5);
    }

    #[test]
    fn opposite_keys_cancel() {
        let mut controls = CameraControls::default();
        let mut camera = Camera::default();
        let start = camera.position;
        let mut input = looking(DVec2::ZERO);
        input.set_held(MoveDirection::Left, true);
        input.set_held(MoveDirection::Right, true);
        input.set_held(MoveDirection::Up, true);
        input.set_held(MoveDirection::Down, true);

        controls.update(&mut camera, &input, 1.0);
        assert!(camera.position.abs_diff_eq(start, 1e-5));
    }

    #[test]
    fn recapture_picks_up_panel_edits() {
        let mut controls = CameraControls::default();
        let mut camera = Camera::default();
        // Panel moved the target so the camera now looks along +X.
        camera.target = camera.position + Vec3::X;

        let input = looking(DVec2::ZERO);
        controls.update(&mut camera, &input, 0.0);

        assert!(controls.yaw.abs() < 1e-4);
        assert!((camera.target - camera.position).abs_diff_eq(Vec3::X, 1e-5));
    }
}
