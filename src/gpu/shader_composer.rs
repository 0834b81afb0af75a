use std::borrow::Cow;

use naga_oil::compose::{
    ComposableModuleDescriptor, Composer, NagaModuleDescriptor,
    ShaderLanguage, ShaderType,
};

use crate::error::ViewerError;

/// Shaders built by the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shader {
    /// Textured, diffuse-lit color pass.
    Color,
    /// Object-id pass writing into an `R32Uint` target.
    Picking,
}

impl Shader {
    /// All shaders, for exhaustive composition tests.
    pub const ALL: [Self; 2] = [Self::Color, Self::Picking];

    fn source(self) -> &'static str {
        match self {
            Self::Color => {
                include_str!("../../assets/shaders/raster/color.wgsl")
            }
            Self::Picking => {
                include_str!("../../assets/shaders/utility/picking.wgsl")
            }
        }
    }

    fn file_path(self) -> &'static str {
        match self {
            Self::Color => "raster/color.wgsl",
            Self::Picking => "utility/picking.wgsl",
        }
    }

    /// Debug label for the wgpu shader module.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Color => "Color Shader",
            Self::Picking => "Picking Shader",
        }
    }
}

/// Shared module definition: (source, file_path)
struct ModuleDef {
    source: &'static str,
    file_path: &'static str,
}

const MODULES: &[ModuleDef] = &[ModuleDef {
    source: include_str!("../../assets/shaders/modules/object.wgsl"),
    file_path: "modules/object.wgsl",
}];

/// Wraps `naga_oil::compose::Composer` to provide shader composition with
/// `#import` support.
///
/// Shared WGSL modules are registered at construction. Consuming shaders use
/// `#import scene::object::{...}`; composition produces `naga::Module` IR
/// directly, skipping a WGSL re-parse in wgpu.
pub struct ShaderComposer {
    composer: Composer,
}

impl ShaderComposer {
    /// Register all shared modules.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::Shader`] if a shared module fails to register.
    pub fn new() -> Result<Self, ViewerError> {
        let mut composer = Composer::default();
        for m in MODULES {
            let _ = composer
                .add_composable_module(ComposableModuleDescriptor {
                    source: m.source,
                    file_path: m.file_path,
                    language: ShaderLanguage::Wgsl,
                    ..Default::default()
                })
                .map_err(|e| {
                    ViewerError::Shader(format!("{}: {e}", m.file_path))
                })?;
        }
        Ok(Self { composer })
    }

    /// Compose `shader` into a `wgpu::ShaderModule` ready for pipeline
    /// creation.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::Shader`] if composition fails.
    pub fn compose(
        &mut self,
        device: &wgpu::Device,
        shader: Shader,
    ) -> Result<wgpu::ShaderModule, ViewerError> {
        let module = self.compose_naga(shader)?;
        Ok(device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(shader.label()),
            source: wgpu::ShaderSource::Naga(Cow::Owned(module)),
        }))
    }

    /// Compose `shader` into a `naga::Module` without a GPU device.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::Shader`] if composition fails.
    pub fn compose_naga(
        &mut self,
        shader: Shader,
    ) -> Result<naga::Module, ViewerError> {
        self.composer
            .make_naga_module(NagaModuleDescriptor {
                source: shader.source(),
                file_path: shader.file_path(),
                shader_type: ShaderType::Wgsl,
                ..Default::default()
            })
            .map_err(|e| {
                ViewerError::Shader(format!("{}: {e}", shader.file_path()))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_shaders_compose() {
        let mut composer = ShaderComposer::new().unwrap();
        for shader in Shader::ALL {
            let module = composer
                .compose_naga(shader)
                .unwrap_or_else(|e| panic!("{shader:?} failed: {e}"));
            let entry_points: Vec<_> =
                module.entry_points.iter().map(|e| e.name.as_str()).collect();
            assert!(entry_points.contains(&"vs_main"), "{shader:?}");
            assert!(entry_points.contains(&"fs_main"), "{shader:?}");
        }
    }
}
