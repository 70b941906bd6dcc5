//! Perspective projection for the main camera
//!
//! Only the inverse direction is needed here: turning a pointer position
//! into a world-space ray.

use crate::Transform;
use keyhunt_math::{Ray, Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Perspective projection parameters
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    /// Vertical field of view in degrees
    pub fov: f32,
    /// Viewport size in pixels
    pub viewport: Vec2,
    pub near: f32,
    pub far: f32,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            fov: 60.0,
            viewport: Vec2::new(1280.0, 720.0),
            near: 0.3,
            far: 1000.0,
        }
    }
}

impl Projection {
    pub fn new(fov: f32, viewport: Vec2, near: f32, far: f32) -> Self {
        Self {
            fov,
            viewport,
            near,
            far,
        }
    }

    pub fn aspect(&self) -> f32 {
        if self.viewport.y > 0.0 {
            self.viewport.x / self.viewport.y
        } else {
            1.0
        }
    }

    /// Ray from the camera through a pixel
    ///
    /// `screen` is in pixels with the origin at the top-left of the viewport.
    /// The ray starts on the near plane.
    pub fn screen_point_to_ray(&self, camera: &Transform, screen: Vec2) -> Ray {
        let viewport = self.viewport.max(Vec2::ONE);
        let ndc_x = 2.0 * screen.x / viewport.x - 1.0;
        let ndc_y = 1.0 - 2.0 * screen.y / viewport.y;

        let half_height = (self.fov.to_radians() * 0.5).tan();
        let local = Vec3::new(ndc_x * half_height * self.aspect(), ndc_y * half_height, 1.0);

        let origin = camera.position + camera.rotation * (local * self.near);
        Ray::new(origin, camera.rotation * local)
    }
}
