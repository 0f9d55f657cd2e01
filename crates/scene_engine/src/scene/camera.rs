//! # Scene Camera
//!
//! A perspective look-at camera. The scene owns one active camera; the
//! camera-follow component moves it and editor picking casts rays from it.
//!
//! ## Coordinate System
//! Right-handed, Y-up. Clip space follows the OpenGL convention (NDC depth
//! from -1 at the near plane to +1 at the far plane), which is what
//! `nalgebra`'s perspective matrix produces.

use crate::foundation::math::{utils, Mat4, Point3, Vec2, Vec3, Vec4};
use crate::physics::collision::Ray;

/// Perspective camera looking at a target point
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Camera position in world space
    pub position: Vec3,

    /// Point the camera is looking at in world space
    pub target: Vec3,

    /// Up vector for camera orientation (typically [0, 1, 0])
    pub up: Vec3,

    /// Vertical field of view in radians
    pub fov: f32,

    /// Aspect ratio (width / height)
    pub aspect: f32,

    /// Distance to near clipping plane
    pub near: f32,

    /// Distance to far clipping plane
    pub far: f32,
}

impl Camera {
    /// Create a perspective camera looking at the origin
    ///
    /// # Arguments
    /// * `position` - Camera position in world space
    /// * `fov_degrees` - Vertical field of view in degrees
    /// * `aspect` - Aspect ratio (width / height) of the viewport
    /// * `near` - Distance to near clipping plane (must be > 0)
    /// * `far` - Distance to far clipping plane (must be > near)
    pub fn perspective(position: Vec3, fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            position,
            target: Vec3::zeros(),
            up: Vec3::y(),
            fov: utils::deg_to_rad(fov_degrees),
            aspect,
            near,
            far,
        }
    }

    /// Point the camera at `target`, keeping the current up vector
    pub fn look_at(&mut self, target: Vec3) {
        self.target = target;
        log::trace!("Camera look_at updated - target: {:?}", target);
    }

    /// Update aspect ratio for viewport changes; non-positive ratios are ignored
    pub fn set_aspect_ratio(&mut self, aspect: f32) {
        if !(aspect.is_finite() && aspect > f32::EPSILON) {
            log::warn!("Camera: ignoring invalid aspect ratio {}", aspect);
            return;
        }
        if (self.aspect - aspect).abs() > 0.01 {
            log::debug!("Camera aspect ratio changed: {:.3} -> {:.3}", self.aspect, aspect);
        }
        self.aspect = aspect;
    }

    /// Unit vector from the camera towards its target (zero if they coincide)
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position)
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(Vec3::zeros)
    }

    /// World-to-camera transform
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(
            &Point3::from(self.position),
            &Point3::from(self.target),
            &self.up,
        )
    }

    /// Whether aspect, field of view and clip planes describe a usable frustum
    pub fn has_valid_projection(&self) -> bool {
        let finite = [self.aspect, self.fov, self.near, self.far].iter().all(|v| v.is_finite());
        finite
            && self.aspect.abs() > f32::EPSILON
            && self.fov > 0.0
            && self.fov < std::f32::consts::PI
            && self.near > 0.0
            && self.far - self.near > f32::EPSILON
    }

    /// Perspective projection, `None` for a degenerate frustum
    pub fn projection_matrix(&self) -> Option<Mat4> {
        self.has_valid_projection()
            .then(|| Mat4::new_perspective(self.aspect, self.fov, self.near, self.far))
    }

    /// Combined `projection * view`
    pub fn view_projection_matrix(&self) -> Option<Mat4> {
        Some(self.projection_matrix()? * self.view_matrix())
    }

    /// World-space ray through a cursor position
    ///
    /// `cursor` is in pixels with the origin at the top-left of a viewport of
    /// size `viewport`. Returns `None` for an empty viewport, a degenerate
    /// frustum or a view-projection matrix that cannot be inverted.
    pub fn screen_ray(&self, cursor: Vec2, viewport: Vec2) -> Option<Ray> {
        if viewport.x <= 0.0 || viewport.y <= 0.0 {
            return None;
        }

        let ndc_x = (cursor.x / viewport.x) * 2.0 - 1.0;
        let ndc_y = 1.0 - (cursor.y / viewport.y) * 2.0;

        let inverse = self.view_projection_matrix()?.try_inverse()?;
        let unproject = |depth: f32| {
            let h = inverse * Vec4::new(ndc_x, ndc_y, depth, 1.0);
            if h.w.abs() < f32::EPSILON {
                None
            } else {
                Some(h.xyz() / h.w)
            }
        };

        let near = unproject(-1.0)?;
        let far = unproject(1.0)?;
        Some(Ray::new(self.position, far - near))
    }
}

impl Default for Camera {
    /// Above and behind the origin, 45 degree FOV, 16:9
    fn default() -> Self {
        let mut camera = Self::perspective(Vec3::new(0.0, 5.0, 10.0), 45.0, 16.0 / 9.0, 0.1, 1000.0);
        camera.look_at(Vec3::zeros());
        camera
    }
}
