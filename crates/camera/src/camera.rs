use flyview_common::{CameraDefaults, WindowConfig};
use glam::{Mat4, Quat, Vec3};

/// World-up used by the look-at view and the fly controller.
pub const WORLD_UP: Vec3 = Vec3::Y;

/// Which projection a camera currently produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Projection {
    Perspective,
    Orthographic,
}

/// Look-at camera with switchable perspective/orthographic projection.
///
/// Matrices follow wgpu conventions: right-handed, depth in `[0, 1]`.
/// `near < far` and `near > 0` are the caller's responsibility; violating
/// them yields a meaningless projection, not an error. Likewise
/// `position == target` gives an undefined view direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub orthographic: bool,
    /// Half the visible height of the orthographic volume.
    pub ortho_size: f32,
    pub orbiting: bool,
    /// Radians per second around the target.
    pub orbit_speed: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(&CameraDefaults::default(), WindowConfig::default().aspect())
    }
}

impl Camera {
    pub fn new(defaults: &CameraDefaults, aspect: f32) -> Self {
        Self {
            position: defaults.position,
            target: defaults.target,
            fov: defaults.fov,
            aspect,
            near: defaults.near,
            far: defaults.far,
            orthographic: defaults.orthographic,
            ortho_size: defaults.ortho_size,
            orbiting: false,
            orbit_speed: defaults.orbit_speed,
        }
    }

    pub fn projection_kind(&self) -> Projection {
        if self.orthographic {
            Projection::Orthographic
        } else {
            Projection::Perspective
        }
    }

    pub fn projection_matrix(&self) -> Mat4 {
        match self.projection_kind() {
            Projection::Perspective => {
                Mat4::perspective_rh(self.fov.to_radians(), self.aspect, self.near, self.far)
            }
            Projection::Orthographic => {
                let top = self.ortho_size;
                let right = top * self.aspect;
                Mat4::orthographic_rh(-right, right, -top, top, self.near, self.far)
            }
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, WORLD_UP)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Unit vector from position toward target, `None` when they coincide.
    pub fn look_direction(&self) -> Option<Vec3> {
        (self.target - self.position).try_normalize()
    }

    /// Restore the resettable fields. Aspect and orbit settings are kept.
    pub fn reset(&mut self, defaults: &CameraDefaults) {
        self.position = defaults.position;
        self.target = defaults.target;
        self.fov = defaults.fov;
        self.near = defaults.near;
        self.far = defaults.far;
        self.orthographic = defaults.orthographic;
        self.ortho_size = defaults.ortho_size;
        tracing::debug!("camera reset to defaults");
    }

    /// Swing the position around the target about world-up.
    ///
    /// Radius and height relative to the target are preserved. Does nothing
    /// unless `orbiting` is set.
    pub fn orbit(&mut self, dt: f32) {
        if !self.orbiting {
            return;
        }
        let offset = self.position - self.target;
        let rotation = Quat::from_axis_angle(WORLD_UP, self.orbit_speed * dt);
        self.position = self.target + rotation * offset;
    }

    pub fn set_aspect_from_size(&mut self, width: u32, height: u32) {
        self.aspect = width.max(1) as f32 / height.max(1) as f32;
    }
}
