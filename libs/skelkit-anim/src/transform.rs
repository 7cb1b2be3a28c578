//! Position/rotation/scale transforms and the math shared by the loaders and
//! the pose evaluator

use glam::{Mat4, Quat, Vec3};

/// Trait for types that can be interpolated between two keyframes
pub trait Lerp: Clone {
    /// Interpolation between self and other, `t` in `[0, 1]`
    fn lerp(&self, other: &Self, t: f32) -> Self;
}

impl Lerp for f32 {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        self + (other - self) * t
    }
}

impl Lerp for Vec3 {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        Self::lerp(*self, *other, t)
    }
}

impl Lerp for Quat {
    /// Shortest-arc spherical interpolation
    fn lerp(&self, other: &Self, t: f32) -> Self {
        self.slerp(*other, t)
    }
}

/// Normalize a quaternion read from source data.
///
/// Degenerate input (zero length or non-finite) becomes the identity rotation.
pub fn normalize_rotation(q: Quat) -> Quat {
    let len = q.length();
    if len > 0.0 && len.is_finite() {
        q / len
    } else {
        Quat::IDENTITY
    }
}

/// A bone pose: translation, unit rotation and per-axis scale.
///
/// The same shape carries both local (parent-relative) and model-space poses;
/// which one a value holds depends on where it came from.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    /// Identity transform (no translation, rotation or scale)
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    /// Create a transform with unit scale
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            scale: Vec3::ONE,
        }
    }

    /// Create a transform from all three components
    pub const fn from_parts(position: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }

    /// Express a parent-relative transform in the parent's space.
    ///
    /// `rotation = parent.rotation * rotation`,
    /// `position = parent.rotation * position + parent.position`,
    /// `scale = parent.scale * scale` (componentwise).
    pub fn compose_onto(&self, parent: &Self) -> Self {
        Self {
            position: parent.rotation * self.position + parent.position,
            rotation: parent.rotation * self.rotation,
            scale: parent.scale * self.scale,
        }
    }

    /// Inverse of a model-space bind pose, in the form the skinning step uses:
    /// inverse rotation, negated translation rotated by the inverse rotation,
    /// and reciprocal scale.
    ///
    /// The translation is not divided by the scale, so this is an exact
    /// inverse only for unit-scale poses. Bind poses are always unit scale.
    pub fn inverse(&self) -> Self {
        let rotation = self.rotation.inverse();
        Self {
            position: rotation * -self.position,
            rotation,
            scale: Vec3::ONE / self.scale,
        }
    }

    /// Apply `inverse_bind` first, then this pose.
    ///
    /// Used to turn an animated model-space pose into a skinning transform.
    pub fn skin_with(&self, inverse_bind: &Self) -> Self {
        Self {
            position: self.rotation * (self.scale * inverse_bind.position) + self.position,
            rotation: self.rotation * inverse_bind.rotation,
            scale: self.scale * inverse_bind.scale,
        }
    }

    /// Interpolate between two poses: linear position and scale, spherical rotation
    pub fn interpolate(&self, other: &Self, t: f32) -> Self {
        Self {
            position: Lerp::lerp(&self.position, &other.position, t),
            rotation: Lerp::lerp(&self.rotation, &other.rotation, t),
            scale: Lerp::lerp(&self.scale, &other.scale, t),
        }
    }

    /// Build the `Translate * Rotate * Scale` matrix (column-major)
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// Approximate equality of all components
    pub fn abs_diff_eq(&self, other: &Self, max_abs_diff: f32) -> bool {
        self.position.abs_diff_eq(other.position, max_abs_diff)
            && self.scale.abs_diff_eq(other.scale, max_abs_diff)
            && (self.rotation.abs_diff_eq(other.rotation, max_abs_diff)
                || self.rotation.abs_diff_eq(-other.rotation, max_abs_diff))
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Lerp for Transform {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        self.interpolate(other, t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_vec3_lerp() {
        let a = Vec3::new(0.0, 0.0, 0.0);
        let b = Vec3::new(10.0, 20.0, 30.0);

        let mid = Lerp::lerp(&a, &b, 0.5);
        assert!((mid.x - 5.0).abs() < 0.001);
        assert!((mid.y - 10.0).abs() < 0.001);
        assert!((mid.z - 15.0).abs() < 0.001);
    }

    #[test]
    fn test_normalize_rotation() {
        let q = normalize_rotation(Quat::from_xyzw(1.0, 1.0, 1.0, 1.0));
        assert!((q.length() - 1.0).abs() < 0.001);

        assert_eq!(normalize_rotation(Quat::from_xyzw(0.0, 0.0, 0.0, 0.0)), Quat::IDENTITY);
        assert_eq!(
            normalize_rotation(Quat::from_xyzw(f32::NAN, 0.0, 0.0, 1.0)),
            Quat::IDENTITY
        );
    }

    #[test]
    fn test_compose_onto_rotated_parent() {
        let parent = Transform::new(Vec3::new(1.0, 0.0, 0.0), Quat::from_rotation_z(FRAC_PI_2));
        let child = Transform::new(Vec3::new(1.0, 0.0, 0.0), Quat::IDENTITY);

        let model = child.compose_onto(&parent);
        // +X rotated 90 degrees about Z is +Y
        assert!(model.position.abs_diff_eq(Vec3::new(1.0, 1.0, 0.0), 1e-5));
        assert!(model.rotation.abs_diff_eq(parent.rotation, 1e-5));
    }

    #[test]
    fn test_compose_multiplies_scale() {
        let parent = Transform::from_parts(Vec3::ZERO, Quat::IDENTITY, Vec3::new(2.0, 3.0, 4.0));
        let child = Transform::from_parts(Vec3::ZERO, Quat::IDENTITY, Vec3::new(0.5, 2.0, 1.0));
        assert_eq!(child.compose_onto(&parent).scale, Vec3::new(1.0, 6.0, 4.0));
    }

    #[test]
    fn test_skin_with_own_inverse_is_identity() {
        let pose = Transform::from_parts(
            Vec3::new(3.0, -2.0, 5.0),
            Quat::from_rotation_y(0.7) * Quat::from_rotation_x(-0.3),
            Vec3::ONE,
        );
        let skin = pose.skin_with(&pose.inverse());
        assert!(skin.abs_diff_eq(&Transform::IDENTITY, 1e-5));
        assert!(skin.to_matrix().abs_diff_eq(Mat4::IDENTITY, 1e-5));
    }

    #[test]
    fn test_interpolate_endpoints() {
        let a = Transform::new(Vec3::ZERO, Quat::IDENTITY);
        let b = Transform::from_parts(
            Vec3::new(2.0, 4.0, 6.0),
            Quat::from_rotation_y(1.0),
            Vec3::new(3.0, 3.0, 3.0),
        );

        assert!(a.interpolate(&b, 0.0).abs_diff_eq(&a, 1e-6));
        assert!(a.interpolate(&b, 1.0).abs_diff_eq(&b, 1e-5));

        let mid = a.interpolate(&b, 0.5);
        assert!(mid.position.abs_diff_eq(Vec3::new(1.0, 2.0, 3.0), 1e-5));
        assert!(mid.rotation.abs_diff_eq(Quat::from_rotation_y(0.5), 1e-5));
        assert!(mid.scale.abs_diff_eq(Vec3::splat(2.0), 1e-5));
    }

    #[test]
    fn test_slerp_takes_shortest_arc() {
        let a = Quat::from_rotation_z(0.2);
        let b = -Quat::from_rotation_z(0.4);
        let mid = Lerp::lerp(&a, &b, 0.5);
        let expected = Quat::from_rotation_z(0.3);
        assert!(mid.abs_diff_eq(expected, 1e-5) || mid.abs_diff_eq(-expected, 1e-5));
    }

    #[test]
    fn test_to_matrix_is_trs() {
        let t = Transform::from_parts(
            Vec3::new(1.0, 2.0, 3.0),
            Quat::from_rotation_z(FRAC_PI_2),
            Vec3::new(2.0, 1.0, 1.0),
        );
        let m = t.to_matrix();
        // Scale X by 2, rotate onto +Y, then translate
        let p = m.transform_point3(Vec3::X);
        assert!(p.abs_diff_eq(Vec3::new(1.0, 4.0, 3.0), 1e-5));
    }
}
