//! Shader compilation with validated error reporting.
//!
//! wgpu compiles WGSL through the device, and a bad module normally surfaces
//! as an uncaptured validation error later. Wrapping module creation in an
//! error scope turns that into a synchronous, typed result: the driver's
//! diagnostic (line numbers, the offending expression) lands in
//! [`ShaderError::Compile`] instead of a panic, so hot-reload can keep the
//! previous pipeline and log what went wrong.

use std::path::Path;

use crate::gpu::GpuContext;

/// A shader failed to load or compile.
#[derive(Debug, thiserror::Error)]
pub enum ShaderError {
    #[error("failed to read shader '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// Validation failed; `log` carries the driver's diagnostic output.
    #[error("shader '{label}' failed to compile:\n{log}")]
    Compile { label: String, log: String },
}

/// A validated WGSL shader module.
pub struct Shader {
    pub(crate) module: wgpu::ShaderModule,
    pub(crate) label: String,
}

impl Shader {
    /// Compile WGSL source, capturing validation errors instead of letting
    /// them surface as uncaptured device errors.
    pub fn from_source(gpu: &GpuContext, label: &str, source: &str) -> Result<Self, ShaderError> {
        gpu.device.push_error_scope(wgpu::ErrorFilter::Validation);

        let module = gpu.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        });

        if let Some(err) = pollster::block_on(gpu.device.pop_error_scope()) {
            return Err(ShaderError::Compile {
                label: label.to_owned(),
                log: err.to_string(),
            });
        }

        Ok(Self {
            module,
            label: label.to_owned(),
        })
    }

    /// Read and compile a WGSL file. The file name becomes the label.
    pub fn from_file(gpu: &GpuContext, path: impl AsRef<Path>) -> Result<Self, ShaderError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ShaderError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_source(gpu, &path.display().to_string(), &source)
    }
}
