use glam::{Mat4, Vec3, Vec4};

/// Perspective camera supplied by the rendering host.
///
/// Projection follows the OpenGL convention (NDC depth in `[-1, 1]`), so a
/// depth of `0.5` passed to [`Camera::unproject`] lands at the same place a
/// WebGL host would put it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in radians.
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 30.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov: 20.0_f32.to_radians(),
            aspect: 1.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn looking_at(position: Vec3, target: Vec3) -> Self {
        Self {
            position,
            target,
            ..Self::default()
        }
    }

    pub fn with_fov_degrees(mut self, fov: f32) -> Self {
        self.fov = fov.to_radians();
        self
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize()
    }

    pub fn distance_from_origin(&self) -> f32 {
        self.position.length()
    }

    /// Maps an NDC point (x, y in `[-1, 1]`, z as NDC depth) to world space.
    pub fn unproject(&self, ndc: Vec3) -> Vec3 {
        let inv_view_proj = self.view_projection().inverse();
        let world = inv_view_proj * ndc.extend(1.0);
        world.truncate() / world.w
    }

    /// Maps a world point to NDC.
    pub fn project(&self, world: Vec3) -> Vec3 {
        let clip = self.view_projection() * Vec4::new(world.x, world.y, world.z, 1.0);
        clip.truncate() / clip.w
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_then_unproject_is_identity() {
        let camera = Camera::looking_at(Vec3::new(5.0, 0.0, 15.0), Vec3::ZERO);
        let world = Vec3::new(1.0, 2.0, -1.0);
        let ndc = camera.project(world);

        assert!(ndc.x.abs() <= 1.0 && ndc.y.abs() <= 1.0);
        assert!((camera.unproject(ndc) - world).length() < 1e-3);
    }

    #[test]
    fn screen_center_unprojects_onto_view_axis() {
        let camera = Camera::default();
        let point = camera.unproject(Vec3::new(0.0, 0.0, 0.5));

        assert!(point.x.abs() < 1e-4 && point.y.abs() < 1e-4);
        assert!(point.z < camera.position.z && point.z > camera.position.z - camera.far);
    }
}
