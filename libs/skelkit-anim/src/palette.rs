//! Fixed-size bone matrix buffer for skinning uniform upload

use glam::Mat4;

use crate::error::{AnimError, Result};
use crate::options::MAX_BONES;

/// One skinning matrix per bone, sized for the shader's uniform array.
///
/// Starts out as identity, so bones a clip never writes (or a clip that can
/// never be evaluated) leave vertices in their bind pose.
#[derive(Debug, Clone, PartialEq)]
pub struct BonePalette {
    matrices: [Mat4; MAX_BONES],
}

impl BonePalette {
    /// Palette of identity matrices
    pub fn new() -> Self {
        Self {
            matrices: [Mat4::IDENTITY; MAX_BONES],
        }
    }

    /// All matrices, as written by the evaluator
    pub fn as_slice(&self) -> &[Mat4] {
        &self.matrices
    }

    /// Mutable access for `evaluate`
    pub fn as_mut_slice(&mut self) -> &mut [Mat4] {
        &mut self.matrices
    }

    /// Matrix for bone `index`
    pub fn get(&self, index: usize) -> Option<&Mat4> {
        self.matrices.get(index)
    }

    /// Reset every matrix to identity
    pub fn reset(&mut self) {
        self.matrices = [Mat4::IDENTITY; MAX_BONES];
    }

    /// First `count` matrices flattened for a uniform upload
    pub fn to_cols_array(&self, count: usize) -> Vec<f32> {
        self.matrices[..count.min(MAX_BONES)]
            .iter()
            .flat_map(Mat4::to_cols_array)
            .collect()
    }

    /// Check that the palette can hold `bone_count` matrices
    pub fn ensure_fits(bone_count: usize) -> Result<()> {
        if bone_count > MAX_BONES {
            return Err(AnimError::BufferTooSmall {
                needed: bone_count,
                len: MAX_BONES,
            });
        }
        Ok(())
    }
}

impl Default for BonePalette {
    fn default() -> Self {
        Self::new()
    }
}
