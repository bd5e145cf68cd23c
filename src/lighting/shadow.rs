use glam::{Mat4, Vec3, Vec4};
use serde::{Deserialize, Serialize};

/// Each cube face spans exactly a quarter turn.
pub const FACE_FOV_DEGREES: f32 = 90.0;

/// Look direction and up vector for one cubemap face, in GL face order
/// (+X, -X, +Y, -Y, +Z, -Z).
#[derive(Debug, Clone, Copy)]
pub struct CubeFace {
    pub direction: Vec3,
    pub up: Vec3,
}

pub const CUBE_FACES: [CubeFace; 6] = [
    CubeFace { direction: Vec3::X, up: Vec3::NEG_Y },
    CubeFace { direction: Vec3::NEG_X, up: Vec3::NEG_Y },
    CubeFace { direction: Vec3::Y, up: Vec3::Z },
    CubeFace { direction: Vec3::NEG_Y, up: Vec3::NEG_Z },
    CubeFace { direction: Vec3::Z, up: Vec3::NEG_Y },
    CubeFace { direction: Vec3::NEG_Z, up: Vec3::NEG_Y },
];

/// Depth range of the point-light shadow.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShadowProjection {
    pub near: f32,
    pub far: f32,
}

impl Default for ShadowProjection {
    fn default() -> Self {
        Self { near: 1.0, far: 25.0 }
    }
}

impl ShadowProjection {
    pub fn matrix(&self) -> Mat4 {
        Mat4::perspective_rh_gl(FACE_FOV_DEGREES.to_radians(), 1.0, self.near, self.far)
    }
}

/// View-projection per cube face for one light position. Rebuilt every
/// frame because the light can move.
#[derive(Debug, Clone)]
pub struct ShadowTransforms {
    pub light_position: Vec3,
    pub far: f32,
    pub matrices: [Mat4; 6],
}

impl ShadowTransforms {
    pub fn new(light_position: Vec3, projection: ShadowProjection) -> Self {
        let proj = projection.matrix();
        let matrices = CUBE_FACES.map(|face| {
            proj * Mat4::look_at_rh(light_position, light_position + face.direction, face.up)
        });
        Self {
            light_position,
            far: projection.far,
            matrices,
        }
    }

    /// Index of the first face whose frustum contains `point`.
    #[allow(dead_code)]
    pub fn face_containing(&self, point: Vec3) -> Option<usize> {
        self.matrices.iter().position(|m| {
            let clip = *m * Vec4::from((point, 1.0));
            if clip.w <= 0.0 {
                return false;
            }
            let ndc = clip.truncate() / clip.w;
            const SLACK: f32 = 1e-4;
            ndc.x.abs() <= 1.0 + SLACK && ndc.y.abs() <= 1.0 + SLACK && ndc.z.abs() <= 1.0 + SLACK
        })
    }
}
