pub mod registry;
#[allow(dead_code)]
pub mod shading;
pub mod shadow;

pub use registry::{
    DirectionalLight, LightRegistry, Material, PointLight, ShadowBias, SpotLight, MAX_LIGHTS,
};
pub use shadow::{ShadowProjection, ShadowTransforms};
