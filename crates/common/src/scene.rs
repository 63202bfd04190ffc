use crate::transform::Transform;
use glam::{Mat4, Vec3};

/// Number of cubes the demo spawns unless configured otherwise.
pub const DEFAULT_CUBE_COUNT: usize = 4;

/// Upper bound on the configured cube count.
pub const MAX_CUBE_COUNT: usize = 4096;

/// The fixed set of cube transforms drawn each frame.
///
/// There is no hierarchy: every cube is an independent transform that the
/// settings panel can edit in place.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    cubes: Vec<Transform>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::grid(DEFAULT_CUBE_COUNT)
    }
}

impl Scene {
    /// Lay `count` cubes out on a grid centred around the origin.
    ///
    /// With `columns = max(count / 2, 1)`, cube `i` sits at
    /// `((i % columns) - 0.5, (i / columns) - 0.5, 0)`.
    pub fn grid(count: usize) -> Self {
        let columns = (count / 2).max(1);
        let cubes = (0..count)
            .map(|i| {
                Transform::from_position(Vec3::new(
                    (i % columns) as f32 - 0.5,
                    (i / columns) as f32 - 0.5,
                    0.0,
                ))
            })
            .collect();
        Self { cubes }
    }

    pub fn len(&self) -> usize {
        self.cubes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cubes.is_empty()
    }

    pub fn cubes(&self) -> &[Transform] {
        &self.cubes
    }

    pub fn cubes_mut(&mut self) -> &mut [Transform] {
        &mut self.cubes
    }

    /// Restore the initial grid layout, keeping the cube count.
    pub fn reset(&mut self) {
        *self = Self::grid(self.cubes.len());
    }

    /// Model matrices in draw order.
    pub fn model_matrices(&self) -> impl Iterator<Item = Mat4> + '_ {
        self.cubes.iter().map(Transform::model_matrix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_scene_is_two_by_two() {
        let scene = Scene::default();
        let positions: Vec<Vec3> = scene.cubes().iter().map(|t| t.position).collect();
        assert_eq!(
            positions,
            vec![
                Vec3::new(-0.5, -0.5, 0.0),
                Vec3::new(0.5, -0.5, 0.0),
                Vec3::new(-0.5, 0.5, 0.0),
                Vec3::new(0.5, 0.5, 0.0),
            ]
        );
    }

    #[test]
    fn single_cube_uses_one_column() {
        let scene = Scene::grid(1);
        assert_eq!(scene.len(), 1);
        assert_eq!(scene.cubes()[0].position, Vec3::new(-0.5, -0.5, 0.0));
    }

    #[test]
    fn six_cubes_use_three_columns() {
        let scene = Scene::grid(6);
        assert_eq!(scene.cubes()[2].position, Vec3::new(1.5, -0.5, 0.0));
        assert_eq!(scene.cubes()[3].position, Vec3::new(-0.5, 0.5, 0.0));
    }

    #[test]
    fn reset_restores_layout() {
        let mut scene = Scene::grid(4);
        scene.cubes_mut()[1].position = Vec3::new(10.0, 0.0, 0.0);
        scene.cubes_mut()[2].rotation.y = 45.0;
        scene.reset();
        assert_eq!(scene, Scene::grid(4));
    }

    #[test]
    fn model_matrices_follow_cube_order() {
        let scene = Scene::grid(4);
        let translations: Vec<Vec3> = scene
            .model_matrices()
            .map(|m| m.w_axis.truncate())
            .collect();
        let positions: Vec<Vec3> = scene.cubes().iter().map(|t| t.position).collect();
        assert_eq!(translations, positions);
    }
}
