//! Startup configuration, read from a RON file.
//!
//! Every field has a default, so a config file only needs the values it
//! changes.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};

use crate::error::RenderError;
use crate::lighting::{LightRegistry, ShadowProjection};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Lighting".into(),
            width: 1080,
            height: 720,
            vsync: true,
        }
    }
}

/// Image paths, relative to the working directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextureConfig {
    pub floor: PathBuf,
    pub object: PathBuf,
    pub object_normal: PathBuf,
}

impl Default for TextureConfig {
    fn default() -> Self {
        Self {
            floor: "assets/textures/MetalPlates017A_2K_Color.png".into(),
            object: "assets/textures/Tiles084_2K_Color.png".into(),
            object_normal: "assets/textures/Tiles084_2K_NormalGL.png".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadowConfig {
    /// Edge length of each cubemap face in texels.
    pub resolution: u32,
    pub projection: ShadowProjection,
}

impl Default for ShadowConfig {
    fn default() -> Self {
        Self {
            resolution: 1024,
            projection: ShadowProjection::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub window: WindowConfig,
    pub textures: TextureConfig,
    pub shadow: ShadowConfig,
    pub lights: LightRegistry,
    pub background_color: Vec3,
    pub rotate_shapes: bool,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            textures: TextureConfig::default(),
            shadow: ShadowConfig::default(),
            lights: LightRegistry::default(),
            background_color: Vec3::ZERO,
            rotate_shapes: false,
        }
    }
}

impl DemoConfig {
    /// Parse a config file. Out-of-range light values are pulled back in
    /// and reported.
    pub fn load(path: &Path) -> Result<Self, RenderError> {
        let content = std::fs::read_to_string(path).map_err(|source| RenderError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Self = ron::from_str(&content).map_err(|source| RenderError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        config.sanitize();
        Ok(config)
    }

    /// Like `load`, but a missing file means defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, RenderError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        match Self::load(path) {
            Err(RenderError::ConfigIo { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                tracing::warn!(path = %path.display(), "config file not found, using defaults");
                Ok(Self::default())
            }
            other => other,
        }
    }

    pub fn to_ron(&self) -> Result<String, RenderError> {
        Ok(ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?)
    }

    fn sanitize(&mut self) {
        let fixed = self.lights.sanitize();
        if fixed > 0 {
            tracing::warn!(fixed, "light values out of range were clamped");
        }
        if self.shadow.projection.near <= 0.0 || self.shadow.projection.far <= self.shadow.projection.near {
            tracing::warn!(
                near = self.shadow.projection.near,
                far = self.shadow.projection.far,
                "invalid shadow depth range, using defaults"
            );
            self.shadow.projection = ShadowProjection::default();
        }
        self.shadow.resolution = self.shadow.resolution.clamp(16, 8192);
        self.window.width = self.window.width.max(1);
        self.window.height = self.window.height.max(1);
    }
}
