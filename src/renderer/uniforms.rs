use glam::Mat4;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
/// Per-object transform uniform, rewritten every frame.
pub struct ObjectUniform {
    /// Combined projection × view × model matrix.
    pub mvp: [[f32; 4]; 4],
    /// Model matrix, for world-space normals.
    pub model: [[f32; 4]; 4],
}

impl ObjectUniform {
    /// Build from the camera's view-projection and the object's model.
    #[must_use]
    pub fn new(view_proj: Mat4, model: Mat4) -> Self {
        Self {
            mvp: (view_proj * model).to_cols_array_2d(),
            model: model.to_cols_array_2d(),
        }
    }

    /// The MVP as a glam matrix.
    #[must_use]
    pub fn mvp(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.mvp)
    }
}

impl Default for ObjectUniform {
    fn default() -> Self {
        Self::new(Mat4::IDENTITY, Mat4::IDENTITY)
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, bytemuck::Pod, bytemuck::Zeroable)]
/// Object id written by the pick shader, padded to 16 bytes.
pub struct PickIdUniform {
    /// Raw object id.
    pub id: u32,
    /// Padding for uniform alignment.
    pub(crate) _pad: [u32; 3],
}

impl PickIdUniform {
    /// Uniform for `id`.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self { id, _pad: [0; 3] }
    }
}
