use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Slots per light kind. Matches `MAX_LIGHTS` in `shaders/lit.frag`.
pub const MAX_LIGHTS: usize = 8;

/// Only this point light slot renders into the shadow cubemap.
pub const SHADOW_CASTER: usize = 0;

/// Point light with a radius-scaled distance falloff.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointLight {
    pub radius: f32,
    pub position: Vec3,
    pub color: Vec3,
    pub intensity: f32,
    pub is_on: bool,
}

impl PointLight {
    pub const OFF: Self = Self {
        radius: 0.0,
        position: Vec3::ZERO,
        color: Vec3::ONE,
        intensity: 0.0,
        is_on: false,
    };

    pub fn new(position: Vec3, color: Vec3, intensity: f32, radius: f32) -> Self {
        Self {
            radius,
            position,
            color,
            intensity,
            is_on: true,
        }
    }

    /// Color of the unlit marker sphere. Shading reads `is_on` directly.
    pub fn marker_color(&self) -> Vec3 {
        if self.is_on {
            self.color
        } else {
            Vec3::ZERO
        }
    }
}

impl Default for PointLight {
    fn default() -> Self {
        Self::OFF
    }
}

/// Sun-like light. `direction` points from the light into the scene and
/// does not have to be unit length.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DirectionalLight {
    pub direction: Vec3,
    pub intensity: f32,
    pub color: Vec3,
    pub is_on: bool,
}

impl DirectionalLight {
    pub const OFF: Self = Self {
        direction: Vec3::NEG_Y,
        intensity: 0.0,
        color: Vec3::ONE,
        is_on: false,
    };

    pub fn new(direction: Vec3, color: Vec3, intensity: f32) -> Self {
        Self {
            direction,
            intensity,
            color,
            is_on: true,
        }
    }

    /// Unit direction, or zero for a degenerate input.
    pub fn unit_direction(&self) -> Vec3 {
        self.direction.normalize_or_zero()
    }
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self::OFF
    }
}

/// Cone light. Angles are in degrees: full intensity inside `min_angle`,
/// nothing outside `max_angle`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpotLight {
    pub radius: f32,
    pub direction: Vec3,
    pub intensity: f32,
    pub color: Vec3,
    pub position: Vec3,
    pub min_angle: f32,
    pub max_angle: f32,
    pub is_on: bool,
}

impl SpotLight {
    pub const OFF: Self = Self {
        radius: 0.0,
        direction: Vec3::NEG_Y,
        intensity: 0.0,
        color: Vec3::ONE,
        position: Vec3::ZERO,
        min_angle: 0.0,
        max_angle: 0.0,
        is_on: false,
    };

    #[allow(clippy::too_many_arguments)]
    pub fn new(
        position: Vec3,
        direction: Vec3,
        color: Vec3,
        intensity: f32,
        min_deg: f32,
        max_deg: f32,
        radius: f32,
    ) -> Self {
        let mut light = Self {
            radius,
            direction,
            intensity,
            color,
            position,
            min_angle: 0.0,
            max_angle: 0.0,
            is_on: true,
        };
        light.set_angles(min_deg, max_deg);
        light
    }

    /// Set the cone, swapping the bounds if they arrive reversed.
    pub fn set_angles(&mut self, min_deg: f32, max_deg: f32) {
        self.min_angle = min_deg.min(max_deg);
        self.max_angle = min_deg.max(max_deg);
    }

    /// Cosines of the inner and outer cone. `inner >= outer`.
    pub fn cone_cosines(&self) -> (f32, f32) {
        let inner = self.min_angle.min(self.max_angle);
        let outer = self.min_angle.max(self.max_angle);
        (inner.to_radians().cos(), outer.to_radians().cos())
    }
}

impl Default for SpotLight {
    fn default() -> Self {
        Self::OFF
    }
}

/// Scene-wide surface response.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub color: Vec3,
    pub ambient_k: f32,
    pub diffuse_k: f32,
    pub specular_k: f32,
    pub shininess: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: Vec3::ONE,
            ambient_k: 0.2,
            diffuse_k: 0.7,
            specular_k: 0.1,
            shininess: 64.0,
        }
    }
}

/// Depth-comparison bias range for the point shadow. `min <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShadowBias {
    min: f32,
    max: f32,
}

impl ShadowBias {
    pub fn new(min: f32, max: f32) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    pub fn min(&self) -> f32 {
        self.min
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    /// Set the lower bound, never letting it pass the upper one.
    pub fn set_min(&mut self, value: f32) {
        self.min = value.min(self.max);
    }

    /// Set the upper bound, never letting it drop below the lower one.
    pub fn set_max(&mut self, value: f32) {
        self.max = value.max(self.min);
    }
}

impl Default for ShadowBias {
    fn default() -> Self {
        Self::new(0.005, 0.015)
    }
}

/// Every light, the material and the shadow tuning the passes read each
/// frame. Created once, edited between frames, read-only while rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightRegistry {
    pub point: [PointLight; MAX_LIGHTS],
    pub directional: [DirectionalLight; MAX_LIGHTS],
    pub spot: [SpotLight; MAX_LIGHTS],
    pub material: Material,
    pub bias: ShadowBias,
    /// 0 ignores the normal map, 1 uses it fully.
    pub normal_intensity: f32,
}

impl LightRegistry {
    /// All slots off, default material.
    pub fn empty() -> Self {
        Self {
            point: [PointLight::OFF; MAX_LIGHTS],
            directional: [DirectionalLight::OFF; MAX_LIGHTS],
            spot: [SpotLight::OFF; MAX_LIGHTS],
            material: Material::default(),
            bias: ShadowBias::default(),
            normal_intensity: 1.0,
        }
    }

    pub fn shadow_caster(&self) -> &PointLight {
        &self.point[SHADOW_CASTER]
    }

    pub fn shadow_caster_mut(&mut self) -> &mut PointLight {
        &mut self.point[SHADOW_CASTER]
    }

    pub fn enabled_count(&self) -> usize {
        self.point.iter().filter(|l| l.is_on).count()
            + self.directional.iter().filter(|l| l.is_on).count()
            + self.spot.iter().filter(|l| l.is_on).count()
    }

    /// Pull hand-edited values back inside their invariants.
    /// Returns how many fields were changed.
    pub fn sanitize(&mut self) -> usize {
        let mut fixed = 0;
        let mut clamp = |value: &mut f32, lo: f32, hi: f32| {
            let clamped = if value.is_nan() { lo } else { value.clamp(lo, hi) };
            if clamped != *value {
                *value = clamped;
                fixed += 1;
            }
        };

        for light in &mut self.point {
            clamp(&mut light.radius, 0.0, f32::MAX);
            clamp(&mut light.intensity, 0.0, f32::MAX);
        }
        for light in &mut self.directional {
            clamp(&mut light.intensity, 0.0, f32::MAX);
        }
        for light in &mut self.spot {
            clamp(&mut light.radius, 0.0, f32::MAX);
            clamp(&mut light.intensity, 0.0, f32::MAX);
            clamp(&mut light.min_angle, 0.0, 180.0);
            clamp(&mut light.max_angle, 0.0, 180.0);
        }
        clamp(&mut self.normal_intensity, 0.0, 1.0);
        clamp(&mut self.material.shininess, f32::EPSILON, f32::MAX);

        for light in &mut self.spot {
            if light.min_angle > light.max_angle {
                light.set_angles(light.min_angle, light.max_angle);
                fixed += 1;
            }
        }
        if self.bias.min > self.bias.max {
            self.bias = ShadowBias::new(self.bias.min, self.bias.max);
            fixed += 1;
        }
        fixed
    }
}

impl Default for LightRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.point[0] = PointLight::new(Vec3::ZERO, Vec3::ONE, 1.0, 15.0);

        let mut sun = DirectionalLight::new(Vec3::new(1.0, -1.0, 0.0), Vec3::ONE, 1.0);
        sun.is_on = false;
        registry.directional[0] = sun;

        let mut spot = SpotLight::new(
            Vec3::new(0.0, 5.0, 0.0),
            Vec3::NEG_Y,
            Vec3::ONE,
            1.0,
            15.0,
            45.0,
            8.0,
        );
        spot.is_on = false;
        registry.spot[0] = spot;
        registry
    }
}
