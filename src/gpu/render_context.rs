use std::fmt;

/// Why a window could not get a working device and surface.
#[derive(Debug)]
pub enum ContextError {
    /// The window handle could not back a surface.
    Surface(wgpu::CreateSurfaceError),
    /// No adapter can present to the surface.
    NoAdapter(wgpu::RequestAdapterError),
    /// The adapter refused the default limits.
    Device(wgpu::RequestDeviceError),
    /// The surface reports no texture formats for this adapter.
    IncompatibleSurface,
}

impl fmt::Display for ContextError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Surface(e) => write!(f, "cannot create window surface: {e}"),
            Self::NoAdapter(e) => write!(f, "no adapter for this window: {e}"),
            Self::Device(e) => write!(f, "cannot open device: {e}"),
            Self::IncompatibleSurface => {
                f.write_str("surface has no formats for the chosen adapter")
            }
        }
    }
}

impl std::error::Error for ContextError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Surface(e) => Some(e),
            Self::NoAdapter(e) => Some(e),
            Self::Device(e) => Some(e),
            Self::IncompatibleSurface => None,
        }
    }
}

/// First sRGB format in `formats`, else the first one listed.
fn preferred_format(
    formats: &[wgpu::TextureFormat],
) -> Option<wgpu::TextureFormat> {
    formats
        .iter()
        .copied()
        .find(wgpu::TextureFormat::is_srgb)
        .or_else(|| formats.first().copied())
}

/// Device, queue and the configured window surface.
pub struct RenderContext {
    /// Logical device.
    pub device: wgpu::Device,
    /// Submission queue.
    pub queue: wgpu::Queue,
    /// Window surface the color pass presents to.
    pub surface: wgpu::Surface<'static>,
    /// Live surface configuration; `resize` keeps its size current.
    pub config: wgpu::SurfaceConfiguration,
}

impl RenderContext {
    /// Open a device that can present to `window` and configure its surface
    /// at `(width, height)` physical pixels with vsync.
    ///
    /// # Errors
    ///
    /// Returns a [`ContextError`] naming the step that failed.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        (width, height): (u32, u32),
    ) -> Result<Self, ContextError> {
        let instance = wgpu::Instance::default();
        let surface = instance
            .create_surface(window)
            .map_err(ContextError::Surface)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                compatible_surface: Some(&surface),
                power_preference: wgpu::PowerPreference::HighPerformance,
                ..Default::default()
            })
            .await
            .map_err(ContextError::NoAdapter)?;
        let info = adapter.get_info();
        log::info!("adapter: {} ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("scenepick device"),
                ..Default::default()
            })
            .await
            .map_err(ContextError::Device)?;

        let caps = surface.get_capabilities(&adapter);
        let format = preferred_format(&caps.formats)
            .ok_or(ContextError::IncompatibleSurface)?;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            desired_maximum_frame_latency: 2,
            alpha_mode: caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: Vec::new(),
        };
        surface.configure(&device, &config);
        log::debug!("surface {format:?} {}x{}", config.width, config.height);

        Ok(Self {
            device,
            queue,
            surface,
            config,
        })
    }

    /// The surface texture format.
    #[must_use]
    pub fn format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Current surface size in physical pixels.
    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    /// Reconfigure the surface for the new window size. Ignores zero-sized
    /// dimensions.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.config.width = width;
            self.config.height = height;
            self.reconfigure();
        }
    }

    /// Reapply the current configuration, e.g. after the surface was lost.
    pub fn reconfigure(&self) {
        self.surface.configure(&self.device, &self.config);
    }

    /// Next surface texture to draw into.
    ///
    /// # Errors
    ///
    /// Passes through the [`wgpu::SurfaceError`] from acquisition; the
    /// backend maps it to a frame error.
    pub fn get_next_frame(
        &self,
    ) -> Result<wgpu::SurfaceTexture, wgpu::SurfaceError> {
        self.surface.get_current_texture()
    }

    /// Create a labelled command encoder.
    #[must_use]
    pub fn create_encoder(&self, label: &str) -> wgpu::CommandEncoder {
        self.device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some(label),
            })
    }

    /// Finish the encoders and submit their command buffers in order.
    pub fn submit(
        &self,
        encoders: impl IntoIterator<Item = wgpu::CommandEncoder>,
    ) {
        let _ = self
            .queue
            .submit(encoders.into_iter().map(wgpu::CommandEncoder::finish));
    }
}

#[cfg(test)]
mod tests {
    use wgpu::TextureFormat;

    use super::*;

    #[test]
    fn srgb_format_is_preferred() {
        let formats = [TextureFormat::Bgra8Unorm, TextureFormat::Bgra8UnormSrgb];
        assert_eq!(
            preferred_format(&formats),
            Some(TextureFormat::Bgra8UnormSrgb)
        );
        assert_eq!(
            preferred_format(&[TextureFormat::Rgba16Float]),
            Some(TextureFormat::Rgba16Float)
        );
        assert_eq!(preferred_format(&[]), None);
    }

    #[test]
    fn incompatible_surface_has_no_source() {
        let err = ContextError::IncompatibleSurface;
        assert_eq!(
            err.to_string(),
            "surface has no formats for the chosen adapter"
        );
        assert!(std::error::Error::source(&err).is_none());
    }
}
