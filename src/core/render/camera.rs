//=========================================================================
// Camera
//=========================================================================
//
// The shared camera owned by the SceneManager, plus the per-scene camera
// configuration it is reset to and interpolated between.
//
// Scenes may move the camera during their own update() or while a
// transition interpolates toward them. They never replace it.
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::{Mat4, Vec3};

//=== Projection ==========================================================

/// Projection model of a camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    Perspective {
        /// Vertical field of view in degrees.
        fov_y_degrees: f32,
        near: f32,
        far: f32,
    },
    Orthographic {
        /// Half of the visible height in world units.
        half_height: f32,
        near: f32,
        far: f32,
    },
}

impl Default for Projection {
    fn default() -> Self {
        Self::Perspective {
            fov_y_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

//=== Viewpoint ===========================================================

/// Camera position and look-at target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewpoint {
    pub position: Vec3,
    pub target: Vec3,
}

impl Viewpoint {
    /// Linear blend toward `other`. `t` is not clamped so overshooting
    /// easings (back, elastic) carry through to the camera.
    pub fn lerp(&self, other: &Viewpoint, t: f32) -> Viewpoint {
        Viewpoint {
            position: self.position.lerp(other.position, t),
            target: self.target.lerp(other.target, t),
        }
    }
}

//=== CameraConfig ========================================================

/// A scene's preferred camera setup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraConfig {
    pub projection: Projection,
    pub position: Vec3,
    pub look_at: Vec3,
}

impl CameraConfig {
    pub fn perspective(position: Vec3, look_at: Vec3) -> Self {
        Self {
            projection: Projection::default(),
            position,
            look_at,
        }
    }

    pub fn orthographic(half_height: f32, position: Vec3, look_at: Vec3) -> Self {
        Self {
            projection: Projection::Orthographic {
                half_height,
                near: 0.1,
                far: 100.0,
            },
            position,
            look_at,
        }
    }

    pub fn viewpoint(&self) -> Viewpoint {
        Viewpoint {
            position: self.position,
            target: self.look_at,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self::perspective(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO)
    }
}

//=== Camera ==============================================================

/// The single camera shared by every scene.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub projection: Projection,
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    aspect: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(CameraConfig::default())
    }
}

impl Camera {
    pub fn new(config: CameraConfig) -> Self {
        Self {
            projection: config.projection,
            position: config.position,
            target: config.look_at,
            up: Vec3::Y,
            aspect: 16.0 / 9.0,
        }
    }

    /// Resets projection and viewpoint to a scene's configuration.
    pub fn apply(&mut self, config: &CameraConfig) {
        self.projection = config.projection;
        self.set_viewpoint(config.viewpoint());
    }

    pub fn viewpoint(&self) -> Viewpoint {
        Viewpoint {
            position: self.position,
            target: self.target,
        }
    }

    pub fn set_viewpoint(&mut self, viewpoint: Viewpoint) {
        self.position = viewpoint.position;
        self.target = viewpoint.target;
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Updates the aspect ratio. Degenerate sizes are ignored.
    pub fn set_viewport_size(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// Right-handed view matrix.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    /// Right-handed projection matrix with OpenGL depth range.
    pub fn projection_matrix(&self) -> Mat4 {
        match self.projection {
            Projection::Perspective { fov_y_degrees, near, far } => {
                Mat4::perspective_rh_gl(fov_y_degrees.to_radians(), self.aspect, near, far)
            }
            Projection::Orthographic { half_height, near, far } => {
                let half_width = half_height * self.aspect;
                Mat4::orthographic_rh_gl(-half_width, half_width, -half_height, half_height, near, far)
            }
        }
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn camera_starts_at_config() {
        let config = CameraConfig::perspective(Vec3::new(1.0, 2.0, 3.0), Vec3::ZERO);
        let camera = Camera::new(config);
        assert_eq!(camera.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(camera.target, Vec3::ZERO);
    }

    #[test]
    fn viewpoint_lerp_midpoint() {
        let a = Viewpoint { position: Vec3::ZERO, target: Vec3::ZERO };
        let b = Viewpoint { position: Vec3::new(10.0, 0.0, 0.0), target: Vec3::new(0.0, 4.0, 0.0) };
        let mid = a.lerp(&b, 0.5);
        assert_relative_eq!(mid.position.x, 5.0);
        assert_relative_eq!(mid.target.y, 2.0);
    }

    #[test]
    fn viewpoint_lerp_overshoots_without_clamping() {
        let a = Viewpoint { position: Vec3::ZERO, target: Vec3::ZERO };
        let b = Viewpoint { position: Vec3::X, target: Vec3::ZERO };
        assert_relative_eq!(a.lerp(&b, 1.1).position.x, 1.1);
    }

    #[test]
    fn viewport_size_updates_aspect_and_ignores_zero() {
        let mut camera = Camera::default();
        camera.set_viewport_size(800, 400);
        assert_relative_eq!(camera.aspect(), 2.0);
        camera.set_viewport_size(0, 400);
        assert_relative_eq!(camera.aspect(), 2.0);
    }

    #[test]
    fn apply_switches_projection() {
        let mut camera = Camera::default();
        camera.apply(&CameraConfig::orthographic(5.0, Vec3::Z, Vec3::ZERO));
        assert!(matches!(camera.projection, Projection::Orthographic { .. }));
        assert_eq!(camera.position, Vec3::Z);
    }

    #[test]
    fn view_matrix_maps_target_onto_negative_z() {
        let camera = Camera::new(CameraConfig::perspective(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO));
        let target_in_view = camera.view_matrix().transform_point3(Vec3::ZERO);
        assert_relative_eq!(target_in_view.z, -5.0, epsilon = 1e-5);
    }
}
