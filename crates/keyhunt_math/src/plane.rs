//! Infinite plane with ray intersection

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::Ray;

/// An infinite plane defined by a unit normal and distance from origin
///
/// The plane equation is: normal · point = distance
/// Points with normal · point > distance are "above" the plane (positive side)
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    /// Unit normal vector pointing to the positive side
    pub normal: Vec3,
    /// Signed distance from origin along the normal
    pub distance: f32,
}

impl Plane {
    /// Create a plane from a normal (normalized here) and distance
    pub fn new(normal: Vec3, distance: f32) -> Self {
        Self {
            normal: normal.normalize_or_zero(),
            distance,
        }
    }

    /// Create a plane with the given normal passing through `point`
    pub fn from_normal_and_point(normal: Vec3, point: Vec3) -> Self {
        let normal = normal.normalize_or_zero();
        Self {
            normal,
            distance: normal.dot(point),
        }
    }

    /// Horizontal ground plane at height `y` (normal +Y)
    pub fn floor(y: f32) -> Self {
        Self {
            normal: Vec3::Y,
            distance: y,
        }
    }

    /// Signed distance from a point to the plane (positive = above)
    #[inline]
    pub fn signed_distance(&self, point: Vec3) -> f32 {
        self.normal.dot(point) - self.distance
    }

    /// Intersect a ray with the plane
    ///
    /// Returns the distance along the ray to the intersection, or `None` when
    /// the ray is parallel to the plane or the plane lies behind the origin.
    pub fn raycast(&self, ray: &Ray) -> Option<f32> {
        let denom = self.normal.dot(ray.direction);
        if denom.abs() < 1e-6 {
            return None;
        }

        let t = (self.distance - self.normal.dot(ray.origin)) / denom;
        if t < 0.0 {
            None
        } else {
            Some(t)
        }
    }
}
