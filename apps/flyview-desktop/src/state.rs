use flyview_camera::Camera;
use flyview_common::{AppConfig, CameraDefaults, Scene};
use flyview_input::{CameraControls, CursorMode, InputState, MoveDirection};
use std::time::Instant;
use winit::keyboard::KeyCode;

/// Longest frame step fed to the controller, so a stall does not teleport the camera.
const MAX_FRAME_DT: f32 = 0.1;

/// Movement binding for a physical key.
pub fn direction_for_key(key: KeyCode) -> Option<MoveDirection> {
    match key {
        KeyCode::KeyW => Some(MoveDirection::Forward),
        KeyCode::KeyS => Some(MoveDirection::Backward),
        KeyCode::KeyA => Some(MoveDirection::Left),
        KeyCode::KeyD => Some(MoveDirection::Right),
        KeyCode::KeyE => Some(MoveDirection::Up),
        KeyCode::KeyQ => Some(MoveDirection::Down),
        _ => None,
    }
}

/// Everything the frame loop mutates. Owned by the event loop thread.
pub struct AppState {
    pub camera: Camera,
    pub controls: CameraControls,
    pub scene: Scene,
    pub input: InputState,
    pub defaults: CameraDefaults,
    pub show_settings: bool,
    last_frame: Instant,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            camera: Camera::new(&config.camera, config.window.aspect()),
            controls: CameraControls::new(
                config.controls.move_speed,
                config.controls.mouse_sensitivity,
            ),
            scene: Scene::grid(config.cubes),
            input: InputState::new(),
            defaults: config.camera,
            show_settings: true,
            last_frame: Instant::now(),
        }
    }

    /// Seconds since the previous call, capped at `MAX_FRAME_DT`.
    pub fn frame_dt(&mut self) -> f32 {
        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32().min(MAX_FRAME_DT);
        self.last_frame = now;
        dt
    }

    /// Run the camera controller; orbit only while the cursor is free so the
    /// two never fight over the target.
    pub fn update(&mut self, dt: f32) -> CursorMode {
        let mode = self.controls.update(&mut self.camera, &self.input, dt);
        if mode == CursorMode::Free {
            self.camera.orbit(dt);
        }
        mode
    }

    pub fn handle_key(&mut self, key: KeyCode, pressed: bool) {
        if let Some(direction) = direction_for_key(key) {
            self.input.set_held(direction, pressed);
            return;
        }
        if pressed && key == KeyCode::F1 {
            self.show_settings = !self.show_settings;
        }
    }

    pub fn reset_camera(&mut self) {
        self.camera.reset(&self.defaults);
        tracing::info!("camera reset");
    }

    pub fn reset_cubes(&mut self) {
        self.scene.reset();
        tracing::info!("cube transforms reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{DVec2, Vec3};

    #[test]
    fn wasd_qe_bindings() {
        assert_eq!(direction_for_key(KeyCode::KeyW), Some(MoveDirection::Forward));
        assert_eq!(direction_for_key(KeyCode::KeyS), Some(MoveDirection::Backward));
        assert_eq!(direction_for_key(KeyCode::KeyA), Some(MoveDirection::Left));
        assert_eq!(direction_for_key(KeyCode::KeyD), Some(MoveDirection::Right));
        assert_eq!(direction_for_key(KeyCode::KeyE), Some(MoveDirection::Up));
        assert_eq!(direction_for_key(KeyCode::KeyQ), Some(MoveDirection::Down));
        assert_eq!(direction_for_key(KeyCode::Space), None);
    }

    #[test]
    fn state_from_config() {
        let mut config = AppConfig::default();
        config.cubes = 6;
        config.controls.move_speed = 9.0;
        let state = AppState::new(&config);
        assert_eq!(state.scene.len(), 6);
        assert_eq!(state.controls.move_speed, 9.0);
        assert_eq!(state.camera.position, config.camera.position);
        assert!((state.camera.aspect - 1080.0 / 720.0).abs() < 1e-6);
    }

    #[test]
    fn keys_drive_movement_while_looking() {
        let mut state = AppState::new(&AppConfig::default());
        let start = state.camera.position;
        state.handle_key(KeyCode::KeyW, true);
        state.input.set_look_held(true);

        assert_eq!(state.update(0.1), CursorMode::Captured);
        assert!(state.camera.position.z < start.z);

        state.handle_key(KeyCode::KeyW, false);
        let held = state.camera.position;
        state.update(0.1);
        assert_eq!(state.camera.position, held);
    }

    #[test]
    fn orbit_runs_only_when_free() {
        let mut state = AppState::new(&AppConfig::default());
        state.camera.orbiting = true;
        let start = state.camera.position;

        state.update(0.1);
        assert_ne!(state.camera.position, start);
        assert_eq!(state.camera.target, Vec3::ZERO);

        state.input.set_look_held(true);
        state.input.set_cursor(DVec2::new(5.0, 5.0));
        let before = state.camera.position;
        state.update(0.0);
        assert!(state.camera.position.abs_diff_eq(before, 1e-6));
    }

    #[test]
    fn reset_camera_keeps_orbit_settings() {
        let mut state = AppState::new(&AppConfig::default());
        state.camera.position = Vec3::splat(3.0);
        state.camera.orbiting = true;
        state.camera.orbit_speed = 2.0;
        state.reset_camera();
        assert_eq!(state.camera.position, state.defaults.position);
        assert!(state.camera.orbiting);
        assert_eq!(state.camera.orbit_speed, 2.0);
    }

    #[test]
    fn f1_toggles_settings() {
        let mut state = AppState::new(&AppConfig::default());
        assert!(state.show_settings);
        state.handle_key(KeyCode::F1, true);
        assert!(!state.show_settings);
        state.handle_key(KeyCode::F1, false);
        assert!(!state.show_settings);
    }
}
