use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::scene::{DEFAULT_CUBE_COUNT, MAX_CUBE_COUNT};

/// Errors from loading or validating the app configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Values the camera starts with and returns to on reset.
///
/// `orbit_speed` is only an initial value; reset never touches it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraDefaults {
    pub position: Vec3,
    pub target: Vec3,
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    pub orthographic: bool,
    /// Half the visible height of the orthographic view volume.
    pub ortho_size: f32,
    /// Radians per second.
    pub orbit_speed: f32,
}

impl Default for CameraDefaults {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 5.0),
            target: Vec3::ZERO,
            fov: 60.0,
            near: 0.1,
            far: 100.0,
            orthographic: false,
            ortho_size: 6.0,
            orbit_speed: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl WindowConfig {
    /// Width over height, guarding against a zero height.
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Camera".into(),
            width: 1080,
            height: 720,
        }
    }
}

/// Fly controller tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlsConfig {
    /// World units per second.
    pub move_speed: f32,
    /// Degrees of yaw/pitch per unit of cursor motion.
    pub mouse_sensitivity: f32,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            move_speed: 5.0,
            mouse_sensitivity: 0.5,
        }
    }
}

/// Top-level configuration, usually read from a YAML file.
///
/// Every field has a default so a partial file is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub window: WindowConfig,
    pub camera: CameraDefaults,
    pub controls: ControlsConfig,
    pub cubes: usize,
    /// WGSL file replacing the built-in cube shader.
    pub shader: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            camera: CameraDefaults::default(),
            controls: ControlsConfig::default(),
            cubes: DEFAULT_CUBE_COUNT,
            shader: None,
        }
    }
}

impl AppConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml(source: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        let config = Self::from_yaml(&source)?;
        tracing::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Write the config as YAML, e.g. to seed a file users can edit.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let file = std::fs::File::create(path)?;
        serde_yaml::to_writer(file, self)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let cam = &self.camera;
        if !(cam.near.is_finite() && cam.near > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "camera.near must be positive, got {}",
                cam.near
            )));
        }
        if !(cam.far.is_finite() && cam.near < cam.far) {
            return Err(ConfigError::Invalid(format!(
                "camera.near ({}) must be less than camera.far ({})",
                cam.near, cam.far
            )));
        }
        if !(cam.fov > 0.0 && cam.fov < 180.0) {
            return Err(ConfigError::Invalid(format!(
                "camera.fov must be within (0, 180), got {}",
                cam.fov
            )));
        }
        if !(cam.ortho_size.is_finite() && cam.ortho_size > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "camera.ortho_size must be positive, got {}",
                cam.ortho_size
            )));
        }
        if self.cubes == 0 || self.cubes > MAX_CUBE_COUNT {
            return Err(ConfigError::Invalid(format!(
                "cubes must be within 1..={MAX_CUBE_COUNT}, got {}",
                self.cubes
            )));
        }
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Invalid("window size must be non-zero".into()));
        }
        Ok(())
    }
}
