use std::fmt;

/// A per-object GPU handle that was absent at draw time.
///
/// The object is skipped for this frame; the frame itself continues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingResource {
    /// Color-pass render pipeline.
    ColorPipeline,
    /// Pick-pass render pipeline.
    PickPipeline,
    /// Vertex buffer (or a zero vertex count).
    VertexBuffer,
    /// Per-object uniform buffer.
    UniformBuffer,
    /// Color-pass bind group (uniform, texture, sampler).
    ColorBindGroup,
    /// Pick-pass bind group (uniform, object id).
    PickBindGroup,
}

impl fmt::Display for MissingResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ColorPipeline => "color pipeline",
            Self::PickPipeline => "pick pipeline",
            Self::VertexBuffer => "vertex buffer",
            Self::UniformBuffer => "uniform buffer",
            Self::ColorBindGroup => "color bind group",
            Self::PickBindGroup => "pick bind group",
        };
        write!(f, "missing {name}")
    }
}

impl std::error::Error for MissingResource {}

/// Why a frame could not start.
#[derive(Debug)]
pub enum FrameError {
    /// The swapchain image could not be acquired.
    Surface(wgpu::SurfaceError),
    /// The backend has no target to draw into.
    Unavailable,
}

impl FrameError {
    /// Whether reconfiguring the surface may fix this.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Surface(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)
        )
    }
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Surface(e) => write!(f, "surface error: {e}"),
            Self::Unavailable => f.write_str("render target unavailable"),
        }
    }
}

impl std::error::Error for FrameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Surface(e) => Some(e),
            Self::Unavailable => None,
        }
    }
}

impl From<wgpu::SurfaceError> for FrameError {
    fn from(e: wgpu::SurfaceError) -> Self {
        Self::Surface(e)
    }
}
