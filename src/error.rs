use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    #[error("Initialization failed: {0}")]
    Init(String),
    #[error("{stage} shader compile error: {log}")]
    ShaderCompile { stage: &'static str, log: String },
    #[error("Shader link error: {0}")]
    ShaderLink(String),
    #[error("Framebuffer '{label}' incomplete (status 0x{status:04x})")]
    FramebufferIncomplete { label: &'static str, status: u32 },
    #[error("Failed to load texture {}: {}", .path.display(), .source)]
    TextureLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("Failed to read config {}: {}", .path.display(), .source)]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config {}: {}", .path.display(), .source)]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
    #[error("Failed to serialize config: {0}")]
    ConfigSerialize(#[from] ron::Error),
}
