//! CPU vertex skinning against an evaluated bone palette
//!
//! The GPU does this in the vertex shader; the CPU version exists for tools
//! and for checking evaluated palettes. Palette matrices are stored
//! transposed (see `evaluate`), so they are transposed back before use.

use glam::{Mat4, Vec3};

/// Bone influences of one vertex (up to four)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Influences {
    pub joints: [u8; 4],
    pub weights: [f32; 4],
}

impl Influences {
    /// A vertex fully bound to one bone
    pub fn single(joint: u8) -> Self {
        Self {
            joints: [joint, 0, 0, 0],
            weights: [1.0, 0.0, 0.0, 0.0],
        }
    }

    /// Weights scaled to sum to one; all-zero weights stay zero
    pub fn normalized(&self) -> Self {
        let sum: f32 = self.weights.iter().sum();
        if sum <= 0.0 {
            return *self;
        }
        Self {
            joints: self.joints,
            weights: self.weights.map(|w| w / sum),
        }
    }
}

/// Blend the palette matrices referenced by `influences`.
///
/// Returns `None` when every weight is zero or every joint is out of range.
fn blended_matrix(palette: &[Mat4], influences: &Influences) -> Option<Mat4> {
    let influences = influences.normalized();
    let mut blended = Mat4::ZERO;
    let mut used = false;
    for (joint, weight) in influences.joints.iter().zip(influences.weights) {
        if weight <= 0.0 {
            continue;
        }
        if let Some(m) = palette.get(*joint as usize) {
            blended += m.transpose() * weight;
            used = true;
        }
    }
    used.then_some(blended)
}

/// Skin a bind-pose position; unbound vertices are returned unchanged
pub fn skin_position(palette: &[Mat4], position: Vec3, influences: &Influences) -> Vec3 {
    blended_matrix(palette, influences).map_or(position, |m| m.transform_point3(position))
}

/// Skin a bind-pose normal (renormalized); unbound normals are returned unchanged
pub fn skin_normal(palette: &[Mat4], normal: Vec3, influences: &Influences) -> Vec3 {
    blended_matrix(palette, influences)
        .map_or(normal, |m| m.transform_vector3(normal).normalize_or_zero())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;

    fn palette_entry(translation: Vec3, rotation: Quat) -> Mat4 {
        Mat4::from_rotation_translation(rotation, translation).transpose()
    }

    #[test]
    fn test_single_influence() {
        let palette = [palette_entry(Vec3::new(0.0, 0.5, 0.0), Quat::IDENTITY)];
        let p = skin_position(&palette, Vec3::new(1.0, 1.0, 0.0), &Influences::single(0));
        assert!(p.abs_diff_eq(Vec3::new(1.0, 1.5, 0.0), 1e-6));
    }

    #[test]
    fn test_blended_influences() {
        let palette = [
            palette_entry(Vec3::new(2.0, 0.0, 0.0), Quat::IDENTITY),
            palette_entry(Vec3::new(0.0, 2.0, 0.0), Quat::IDENTITY),
        ];
        // Unnormalized weights 1:1
        let influences = Influences {
            joints: [0, 1, 0, 0],
            weights: [2.0, 2.0, 0.0, 0.0],
        };
        let p = skin_position(&palette, Vec3::ZERO, &influences);
        assert!(p.abs_diff_eq(Vec3::new(1.0, 1.0, 0.0), 1e-6));
    }

    #[test]
    fn test_unbound_vertex_unchanged() {
        let palette = [palette_entry(Vec3::ONE, Quat::IDENTITY)];
        let influences = Influences {
            joints: [9, 9, 9, 9],
            weights: [1.0, 0.0, 0.0, 0.0],
        };
        assert_eq!(skin_position(&palette, Vec3::X, &influences), Vec3::X);
    }

    #[test]
    fn test_skin_normal_ignores_translation() {
        let palette = [palette_entry(
            Vec3::new(5.0, 5.0, 5.0),
            Quat::from_rotation_z(std::f32::consts::FRAC_PI_2),
        )];
        let n = skin_normal(&palette, Vec3::X, &Influences::single(0));
        assert!(n.abs_diff_eq(Vec3::Y, 1e-6));
    }
}
