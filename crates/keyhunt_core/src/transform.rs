//! Transform (position, rotation, scale)
//!
//! Axis convention: local +Z is forward, +X is right, +Y is up.

use keyhunt_math::{look_rotation, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// A transform with position, rotation, and uniform scale
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Position in world space
    pub position: Vec3,
    /// Orientation as a unit quaternion
    pub rotation: Quat,
    /// Uniform scale factor
    pub scale: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    /// Create an identity transform (no translation, rotation, or scale change)
    pub fn identity() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: 1.0,
        }
    }

    /// Create a transform with just a position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::identity()
        }
    }

    /// Create a transform with position and rotation
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            scale: 1.0,
        }
    }

    /// World-space forward axis (+Z rotated)
    #[inline]
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    /// World-space right axis (+X rotated)
    #[inline]
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    /// World-space up axis (+Y rotated)
    #[inline]
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Transform a point from local space to world space
    ///
    /// Applies scale, then rotation, then translation.
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        self.rotation * (p * self.scale) + self.position
    }

    /// Rotate a local direction into world space
    ///
    /// Neither position nor scale affect the result.
    pub fn transform_direction(&self, d: Vec3) -> Vec3 {
        self.rotation * d
    }

    /// Translate the transform by an offset
    pub fn translate(&mut self, offset: Vec3) {
        self.position += offset;
    }

    /// Apply a world-space rotation on top of the current one
    pub fn rotate(&mut self, rotation: Quat) {
        self.rotation = (rotation * self.rotation).normalize();
    }

    /// Turn to face `target`, keeping world +Y as up
    ///
    /// Leaves the rotation unchanged when `target` coincides with the
    /// position or lies straight above or below it.
    pub fn look_at(&mut self, target: Vec3) {
        if let Some(rotation) = look_rotation(target - self.position, Vec3::Y) {
            self.rotation = rotation;
        }
    }
}
