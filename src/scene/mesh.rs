use crate::error::ViewerError;

/// Floats per interleaved vertex: position xyz, normal xyz, uv.
pub const FLOATS_PER_VERTEX: usize = 8;

/// Interleaved vertex as uploaded to the GPU.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Object-space position.
    pub position: [f32; 3],
    /// Object-space normal.
    pub normal: [f32; 3],
    /// Texture coordinate.
    pub uv: [f32; 2],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];

    /// Vertex buffer layout matching `scene::object::VertexInput`.
    #[must_use]
    pub const fn buffer_layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }

    const fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            uv,
        }
    }
}

/// Non-indexed triangle list.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MeshData {
    /// Vertices, three per triangle.
    pub vertices: Vec<Vertex>,
}

impl MeshData {
    /// Build from a flat interleaved float slice.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::SceneLoad`] if the data is empty, not a whole
    /// number of vertices, or not a whole number of triangles.
    pub fn from_floats(floats: &[f32]) -> Result<Self, ViewerError> {
        if floats.is_empty() {
            return Err(ViewerError::SceneLoad("vertex data is empty".into()));
        }
        if floats.len() % FLOATS_PER_VERTEX != 0 {
            return Err(ViewerError::SceneLoad(format!(
                "{} floats is not a multiple of {FLOATS_PER_VERTEX}",
                floats.len()
            )));
        }
        let vertices: Vec<Vertex> = floats
            .chunks_exact(FLOATS_PER_VERTEX)
            .map(|c| {
                Vertex::new([c[0], c[1], c[2]], [c[3], c[4], c[5]], [c[6], c[7]])
            })
            .collect();
        if vertices.len() % 3 != 0 {
            return Err(ViewerError::SceneLoad(format!(
                "{} vertices do not form whole triangles",
                vertices.len()
            )));
        }
        Ok(Self { vertices })
    }

    /// Parse a JSON array of floats (8 per vertex).
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::SceneLoad`] if the JSON is not an array of
    /// numbers or fails [`from_floats`](Self::from_floats) validation.
    pub fn from_json(json: &str) -> Result<Self, ViewerError> {
        let floats: Vec<f32> = serde_json::from_str(json)
            .map_err(|e| ViewerError::SceneLoad(e.to_string()))?;
        Self::from_floats(&floats)
    }

    /// Vertex count as passed to `draw`.
    #[must_use]
    pub fn vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }

    /// Raw bytes for buffer upload.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Axis-aligned unit cube centered on the origin, outward normals.
    #[must_use]
    pub fn cube() -> Self {
        // (normal, tangent u, tangent v) per face
        const FACES: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
            ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
            ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
            ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
            ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
            ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
            ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ];
        const CORNERS: [[f32; 2]; 6] = [
            [0.0, 0.0],
            [1.0, 0.0],
            [1.0, 1.0],
            [0.0, 0.0],
            [1.0, 1.0],
            [0.0, 1.0],
        ];

        let vertices = FACES
            .iter()
            .flat_map(|&(n, u, v)| {
                CORNERS.iter().map(move |&[s, t]| {
                    let position = std::array::from_fn(|i| {
                        0.5 * n[i] + (s - 0.5) * u[i] + (t - 0.5) * v[i]
                    });
                    Vertex::new(position, n, [s, 1.0 - t])
                })
            })
            .collect();
        Self { vertices }
    }

    /// Unit quad in the XY plane facing +Z, spanning `[-1, 1]`.
    #[must_use]
    pub fn quad() -> Self {
        let corner = |x: f32, y: f32| {
            Vertex::new(
                [x, y, 0.0],
                [0.0, 0.0, 1.0],
                [(x + 1.0) * 0.5, (1.0 - y) * 0.5],
            )
        };
        Self {
            vertices: vec![
                corner(-1.0, -1.0),
                corner(1.0, -1.0),
                corner(1.0, 1.0),
                corner(-1.0, -1.0),
                corner(1.0, 1.0),
                corner(-1.0, 1.0),
            ],
        }
    }
}
