use glam::{EulerRot, Mat3, Mat4, Quat, Vec3};

/// Spatial transform with position, rotation, and scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalTransform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl LocalTransform {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }

    /// Rotation from Euler angles in radians (`EulerRot::XYZ`).
    pub fn with_euler(mut self, euler: Vec3) -> Self {
        self.rotation = Quat::from_euler(EulerRot::XYZ, euler.x, euler.y, euler.z);
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = Vec3::splat(scale);
        self
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

/// World-space model matrix, refreshed by `transform_system`.
#[derive(Debug, Clone, Copy)]
pub struct GlobalTransform(pub Mat4);

impl Default for GlobalTransform {
    fn default() -> Self {
        Self(Mat4::IDENTITY)
    }
}

/// Index into the MeshStore resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshHandle(pub usize);

/// Which texture set a drawable samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceKind {
    /// Object texture plus normal map.
    Volumetric,
    /// Floor texture, no normal map.
    Surface,
}

/// Position in the fixed traversal order. Lower draws first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct DrawOrder(pub u32);

/// Circular motion of an entity's position around the world origin.
///
/// The position is recomputed from `anchor` and the accumulated `angle`
/// every step, so it never drifts off the orbit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orbit {
    pub anchor: Vec3,
    pub axis: Vec3,
    /// Radians per second.
    pub rate: f32,
    pub angle: f32,
}

impl Orbit {
    /// Build from a per-step rotation given as X/Y/Z Euler degrees, as a
    /// row vector times `Rx * Ry * Rz`, applied `steps_per_second` times.
    pub fn from_step_degrees(anchor: Vec3, step_degrees: Vec3, steps_per_second: f32) -> Self {
        let r = step_degrees * (std::f32::consts::PI / 180.0);
        let step = Mat3::from_rotation_x(r.x) * Mat3::from_rotation_y(r.y) * Mat3::from_rotation_z(r.z);
        let q = Quat::from_mat3(&step.transpose());
        let q = if q.w < 0.0 { -q } else { q };
        let v = q.xyz();
        let len = v.length();
        let (axis, angle) = if len > 0.0 {
            (v / len, 2.0 * len.atan2(q.w))
        } else {
            (Vec3::Y, 0.0)
        };
        Self {
            anchor,
            axis,
            rate: angle * steps_per_second,
            angle: 0.0,
        }
    }

    pub fn position(&self) -> Vec3 {
        Quat::from_axis_angle(self.axis, self.angle) * self.anchor
    }
}
