//! Per-fragment lighting model.
//!
//! Mirrors `shaders/lit.frag` line for line so the shading rules can be
//! checked without a GPU. Keep both in sync when changing either.

use glam::{Mat3, Vec3};

use super::registry::{
    DirectionalLight, LightRegistry, Material, PointLight, ShadowBias, SpotLight, SHADOW_CASTER,
};

/// Floor applied to a light radius before it is used as a divisor.
pub const RADIUS_EPSILON: f32 = 1e-4;

/// Distance falloff scaled by the light radius.
///
/// A smooth window that reaches zero at `radius`, divided by a soft
/// inverse-square term. Non-increasing in `distance`.
pub fn attenuation(distance: f32, radius: f32) -> f32 {
    let ratio = distance.max(0.0) / radius.max(RADIUS_EPSILON);
    let ratio2 = ratio * ratio;
    let window = (1.0 - ratio2 * ratio2).clamp(0.0, 1.0);
    window * window / (1.0 + ratio2)
}

/// Hermite interpolation, same as GLSL `smoothstep`.
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Angular cone factor for a spot light, from the cosine of the angle
/// between the spot axis and the light-to-fragment direction.
pub fn spot_falloff(cos_theta: f32, inner_cos: f32, outer_cos: f32) -> f32 {
    if cos_theta >= inner_cos {
        return 1.0;
    }
    if cos_theta <= outer_cos {
        return 0.0;
    }
    smoothstep(outer_cos, inner_cos, cos_theta)
}

/// Decode an RGB normal-map texel from [0,1] to [-1,1].
pub fn decode_normal(texel: Vec3) -> Vec3 {
    texel * 2.0 - Vec3::ONE
}

/// Tangent frame from the interpolated normal and tangent.
pub fn tangent_frame(normal: Vec3, tangent: Vec3) -> Mat3 {
    let n = normal.normalize_or_zero();
    let t = (tangent - n * tangent.dot(n)).normalize_or_zero();
    let b = n.cross(t);
    Mat3::from_cols(t, b, n)
}

/// Blend the mapped normal into the geometric one. `strength` 0 returns
/// the geometric normal unchanged.
pub fn blend_normal(geometric: Vec3, tbn: Mat3, mapped: Vec3, strength: f32) -> Vec3 {
    let geometric = geometric.normalize_or_zero();
    let strength = strength.clamp(0.0, 1.0);
    if strength <= 0.0 {
        return geometric;
    }
    let perturbed = (tbn * mapped).normalize_or_zero();
    geometric.lerp(perturbed, strength).normalize_or(geometric)
}

/// Comparison bias: `max` at grazing angles, `min` when the surface faces
/// the light head-on.
pub fn shadow_bias(bias: &ShadowBias, normal: Vec3, to_light: Vec3) -> f32 {
    let alignment = normal.dot(to_light).clamp(0.0, 1.0);
    bias.max() + (bias.min() - bias.max()) * alignment
}

/// Both depths are distance-to-light divided by the far plane.
pub fn in_shadow(current_depth: f32, closest_depth: f32, bias: f32) -> bool {
    current_depth - bias > closest_depth
}

/// Source of the stored cubemap depth for a light-to-fragment direction.
pub trait ShadowLookup {
    /// Normalized closest depth (distance / far) along `light_to_fragment`.
    fn closest_depth(&self, light_to_fragment: Vec3) -> f32;
}

/// A cubemap with nothing drawn into it.
pub struct Unoccluded;

impl ShadowLookup for Unoccluded {
    fn closest_depth(&self, _light_to_fragment: Vec3) -> f32 {
        1.0
    }
}

/// Point shadow inputs for one fragment.
pub struct ShadowInputs<'a> {
    pub lookup: &'a dyn ShadowLookup,
    pub far_plane: f32,
}

/// Everything the shader knows about the fragment being lit.
#[derive(Debug, Clone, Copy)]
pub struct SurfacePoint {
    pub position: Vec3,
    /// Final shading normal, after normal mapping.
    pub normal: Vec3,
    pub camera_position: Vec3,
}

/// Lighting split by source. All terms already carry the material color.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LightTerms {
    pub ambient: Vec3,
    pub directional: Vec3,
    pub point: Vec3,
    pub spot: Vec3,
}

impl LightTerms {
    pub fn total(&self) -> Vec3 {
        self.ambient + self.directional + self.point + self.spot
    }
}

struct Reflectance {
    diffuse: f32,
    specular: f32,
}

fn blinn_phong(material: &Material, normal: Vec3, to_light: Vec3, to_view: Vec3) -> Reflectance {
    let n_dot_l = normal.dot(to_light).max(0.0);
    let specular = if n_dot_l > 0.0 {
        let halfway = (to_light + to_view).normalize_or_zero();
        normal.dot(halfway).max(0.0).powf(material.shininess)
    } else {
        0.0
    };
    Reflectance {
        diffuse: material.diffuse_k * n_dot_l,
        specular: material.specular_k * specular,
    }
}

fn directional_term(light: &DirectionalLight, material: &Material, surface: &SurfacePoint) -> Vec3 {
    if !light.is_on {
        return Vec3::ZERO;
    }
    let to_light = -light.unit_direction();
    if to_light == Vec3::ZERO {
        return Vec3::ZERO;
    }
    let to_view = (surface.camera_position - surface.position).normalize_or_zero();
    let r = blinn_phong(material, surface.normal, to_light, to_view);
    light.color * light.intensity * (r.diffuse + r.specular)
}

fn point_term(
    light: &PointLight,
    material: &Material,
    surface: &SurfacePoint,
    shadow: Option<(&ShadowInputs, &ShadowBias)>,
) -> Vec3 {
    if !light.is_on {
        return Vec3::ZERO;
    }
    let offset = light.position - surface.position;
    let distance = offset.length();
    let to_light = offset.normalize_or_zero();

    if let Some((inputs, bias)) = shadow {
        let current = distance / inputs.far_plane;
        let closest = inputs.lookup.closest_depth(-offset);
        if in_shadow(current, closest, shadow_bias(bias, surface.normal, to_light)) {
            return Vec3::ZERO;
        }
    }

    let to_view = (surface.camera_position - surface.position).normalize_or_zero();
    let r = blinn_phong(material, surface.normal, to_light, to_view);
    light.color * light.intensity * (r.diffuse + r.specular) * attenuation(distance, light.radius)
}

fn spot_term(light: &SpotLight, material: &Material, surface: &SurfacePoint) -> Vec3 {
    if !light.is_on {
        return Vec3::ZERO;
    }
    let offset = light.position - surface.position;
    let distance = offset.length();
    let to_light = offset.normalize_or_zero();
    let (inner, outer) = light.cone_cosines();
    let cone = spot_falloff(light.direction.normalize_or_zero().dot(-to_light), inner, outer);
    if cone <= 0.0 {
        return Vec3::ZERO;
    }

    let to_view = (surface.camera_position - surface.position).normalize_or_zero();
    let r = blinn_phong(material, surface.normal, to_light, to_view);
    light.color
        * light.intensity
        * (r.diffuse + r.specular)
        * attenuation(distance, light.radius)
        * cone
}

/// Accumulate every enabled light. `shadow` is `None` when the cubemap is
/// unavailable, in which case nothing is occluded.
pub fn shade(
    registry: &LightRegistry,
    surface: &SurfacePoint,
    shadow: Option<&ShadowInputs>,
) -> LightTerms {
    let material = &registry.material;
    let mut terms = LightTerms {
        ambient: material.color * material.ambient_k,
        ..LightTerms::default()
    };

    for light in &registry.directional {
        terms.directional += directional_term(light, material, surface);
    }
    for (i, light) in registry.point.iter().enumerate() {
        let occlusion = if i == SHADOW_CASTER {
            shadow.map(|inputs| (inputs, &registry.bias))
        } else {
            None
        };
        terms.point += point_term(light, material, surface, occlusion);
    }
    for light in &registry.spot {
        terms.spot += spot_term(light, material, surface);
    }

    terms.directional *= material.color;
    terms.point *= material.color;
    terms.spot *= material.color;
    terms
}

/// Final fragment RGB for a surface with texture color `albedo`.
pub fn fragment_color(terms: &LightTerms, albedo: Vec3) -> Vec3 {
    terms.total() * albedo
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lighting::registry::MAX_LIGHTS;

    const EPS: f32 = 1e-5;

    fn surface_facing_up(position: Vec3) -> SurfacePoint {
        SurfacePoint {
            position,
            normal: Vec3::Y,
            camera_position: position + Vec3::new(0.0, 4.0, 4.0),
        }
    }

    fn single_point_light() -> LightRegistry {
        let mut registry = LightRegistry::empty();
        registry.point[0] = PointLight::new(Vec3::ZERO, Vec3::ONE, 1.0, 15.0);
        registry
    }

    /// Cubemap that records one occluder distance for every direction.
    struct Wall(f32);

    impl ShadowLookup for Wall {
        fn closest_depth(&self, _light_to_fragment: Vec3) -> f32 {
            self.0
        }
    }

    #[test]
    fn disabled_lights_contribute_exactly_zero_even_with_garbage() {
        let mut registry = LightRegistry::empty();
        for i in 0..MAX_LIGHTS {
            registry.point[i] = PointLight {
                radius: f32::NAN,
                position: Vec3::splat(f32::NAN),
                color: Vec3::splat(f32::INFINITY),
                intensity: f32::NAN,
                is_on: false,
            };
            registry.directional[i] = DirectionalLight {
                direction: Vec3::splat(f32::NAN),
                intensity: f32::INFINITY,
                color: Vec3::splat(f32::NAN),
                is_on: false,
            };
            registry.spot[i] = SpotLight {
                radius: 0.0,
                direction: Vec3::ZERO,
                intensity: f32::NAN,
                color: Vec3::splat(f32::NAN),
                position: Vec3::splat(f32::NAN),
                min_angle: f32::NAN,
                max_angle: f32::NAN,
                is_on: false,
            };
        }

        let surface = surface_facing_up(Vec3::new(1.0, -2.0, 0.5));
        let terms = shade(&registry, &surface, None);
        assert_eq!(terms.directional, Vec3::ZERO);
        assert_eq!(terms.point, Vec3::ZERO);
        assert_eq!(terms.spot, Vec3::ZERO);
        assert_eq!(terms.ambient, Vec3::splat(0.2));
        assert!(terms.total().is_finite());
    }

    #[test]
    fn attenuation_never_increases_with_distance() {
        for &radius in &[0.0, 1e-6, 0.5, 8.0, 15.0, 100.0] {
            let mut previous = attenuation(0.0, radius);
            for step in 1..=400 {
                let d = step as f32 * 0.05;
                let current = attenuation(d, radius);
                assert!(current.is_finite());
                assert!(current <= previous, "radius {radius}: {current} > {previous} at {d}");
                previous = current;
            }
        }
    }

    #[test]
    fn attenuation_is_bounded_and_reaches_zero_at_radius() {
        assert_eq!(attenuation(0.0, 15.0), 1.0);
        assert_eq!(attenuation(15.0, 15.0), 0.0);
        assert_eq!(attenuation(40.0, 15.0), 0.0);
        assert_eq!(attenuation(0.5, 0.0), 0.0);
        assert!(attenuation(0.0, 0.0).is_finite());
    }

    #[test]
    fn spot_falloff_hits_its_endpoints_exactly() {
        let (min_deg, max_deg) = (15.0_f32, 45.0_f32);
        let inner = min_deg.to_radians().cos();
        let outer = max_deg.to_radians().cos();

        assert_eq!(spot_falloff(min_deg.to_radians().cos(), inner, outer), 1.0);
        assert_eq!(spot_falloff(1.0, inner, outer), 1.0);
        assert_eq!(spot_falloff(max_deg.to_radians().cos(), inner, outer), 0.0);
        assert_eq!(spot_falloff(60.0_f32.to_radians().cos(), inner, outer), 0.0);
    }

    #[test]
    fn spot_falloff_is_monotonic_across_the_cone() {
        let inner = 15.0_f32.to_radians().cos();
        let outer = 45.0_f32.to_radians().cos();
        let mut previous = 1.0;
        for step in 0..=300 {
            let angle = 15.0 + step as f32 * 0.1;
            let value = spot_falloff(angle.to_radians().cos(), inner, outer);
            assert!((0.0..=1.0).contains(&value));
            assert!(value <= previous + EPS);
            previous = value;
        }
    }

    #[test]
    fn equal_cone_angles_give_a_hard_edge() {
        let c = 30.0_f32.to_radians().cos();
        assert_eq!(spot_falloff(c, c, c), 1.0);
        assert_eq!(spot_falloff(c - 0.01, c, c), 0.0);
    }

    #[test]
    fn bias_grows_at_grazing_angles() {
        let bias = ShadowBias::new(0.005, 0.015);
        assert!((shadow_bias(&bias, Vec3::Y, Vec3::Y) - 0.005).abs() < EPS);
        assert!((shadow_bias(&bias, Vec3::Y, Vec3::X) - 0.015).abs() < EPS);
        let oblique = Vec3::new(1.0, 1.0, 0.0).normalize();
        let mid = shadow_bias(&bias, Vec3::Y, oblique);
        assert!(mid > 0.005 && mid < 0.015);
    }

    #[test]
    fn shadow_test_classifies_around_the_bias_band() {
        let bias = 0.01;
        assert!(in_shadow(0.50, 0.40, bias));
        assert!(!in_shadow(0.30, 0.40, bias));
        assert!(!in_shadow(0.405, 0.40, bias));
    }

    #[test]
    fn lone_point_light_gives_positive_diffuse_proportional_to_n_dot_l() {
        let registry = single_point_light();
        let shadows = ShadowInputs {
            lookup: &Unoccluded,
            far_plane: 25.0,
        };

        // Floor fragments at increasing incidence, same distance from the light.
        let distance = 7.0_f32;
        let mut diffuse_values = Vec::new();
        for &angle_deg in &[0.0_f32, 30.0, 60.0] {
            let angle = angle_deg.to_radians();
            let position = Vec3::new(distance * angle.sin(), -distance * angle.cos(), 0.0);
            let surface = SurfacePoint {
                position,
                normal: Vec3::Y,
                // Camera far off to the side keeps the specular lobe out.
                camera_position: Vec3::new(-50.0, -distance, 0.0),
            };
            let terms = shade(&registry, &surface, Some(&shadows));
            assert!(terms.point.x > 0.0);
            assert_eq!(terms.point.x, terms.point.y);
            diffuse_values.push((angle.cos(), terms.point.x));
        }

        let (n_dot_l0, d0) = diffuse_values[0];
        for &(n_dot_l, d) in &diffuse_values[1..] {
            let expected = d0 * n_dot_l / n_dot_l0;
            assert!((d - expected).abs() < 1e-4, "{d} vs {expected}");
        }
    }

    #[test]
    fn occluder_removes_point_light_but_not_ambient() {
        let registry = single_point_light();
        let surface = surface_facing_up(Vec3::new(0.0, -7.0, 0.0));

        let open = ShadowInputs {
            lookup: &Unoccluded,
            far_plane: 25.0,
        };
        // Occluder 3 units from the light, target is 7 units away.
        let blocked_lookup = Wall(3.0 / 25.0);
        let blocked = ShadowInputs {
            lookup: &blocked_lookup,
            far_plane: 25.0,
        };

        let lit = shade(&registry, &surface, Some(&open));
        let shadowed = shade(&registry, &surface, Some(&blocked));
        assert!(lit.point.length() > 0.0);
        assert!(shadowed.point.length() < 1e-6);
        assert_eq!(lit.ambient, shadowed.ambient);
    }

    #[test]
    fn only_the_first_point_light_is_shadowed() {
        let mut registry = LightRegistry::empty();
        registry.point[1] = PointLight::new(Vec3::ZERO, Vec3::ONE, 1.0, 15.0);
        let surface = surface_facing_up(Vec3::new(0.0, -7.0, 0.0));
        let blocked_lookup = Wall(0.0);
        let blocked = ShadowInputs {
            lookup: &blocked_lookup,
            far_plane: 25.0,
        };
        let terms = shade(&registry, &surface, Some(&blocked));
        assert!(terms.point.length() > 0.0);
    }

    #[test]
    fn zero_normal_intensity_restores_geometric_normal() {
        let geometric = Vec3::new(0.0, 0.0, 1.0);
        let tbn = tangent_frame(geometric, Vec3::X);
        let mapped = decode_normal(Vec3::new(0.9, 0.2, 0.6)).normalize();

        let full = blend_normal(geometric, tbn, mapped, 1.0);
        assert!((full - mapped).length() < 1e-5);

        let mut previous_gap = f32::MAX;
        for step in (0..=10).rev() {
            let strength = step as f32 / 10.0;
            let gap = (blend_normal(geometric, tbn, mapped, strength) - geometric).length();
            assert!(gap <= previous_gap + EPS);
            previous_gap = gap;
        }
        assert_eq!(blend_normal(geometric, tbn, mapped, 0.0), geometric);
    }

    #[test]
    fn spot_light_only_reaches_inside_its_cone() {
        let mut registry = LightRegistry::empty();
        registry.spot[0] = SpotLight::new(
            Vec3::new(0.0, 5.0, 0.0),
            Vec3::NEG_Y,
            Vec3::ONE,
            1.0,
            15.0,
            45.0,
            8.0,
        );
        let below = shade(&registry, &surface_facing_up(Vec3::ZERO), None);
        let outside = shade(&registry, &surface_facing_up(Vec3::new(6.0, 0.0, 0.0)), None);
        assert!(below.spot.length() > 0.0);
        assert_eq!(outside.spot, Vec3::ZERO);
    }

    #[test]
    fn directional_light_ignores_distance() {
        let mut registry = LightRegistry::empty();
        registry.directional[0] = DirectionalLight::new(Vec3::new(0.0, -2.0, 0.0), Vec3::ONE, 1.0);
        let near = shade(&registry, &surface_facing_up(Vec3::ZERO), None);
        let far = shade(&registry, &surface_facing_up(Vec3::new(100.0, -50.0, 30.0)), None);
        assert!(near.directional.x > 0.0);
        assert!((near.directional - far.directional).length() < EPS);
    }
}
