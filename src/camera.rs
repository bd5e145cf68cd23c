use glam::{Mat4, Vec3};
use sdl2::keyboard::Scancode;

use crate::engine::input::InputState;

const HOME_POSITION: Vec3 = Vec3::new(0.0, 0.0, 5.0);
const HOME_YAW: f32 = -90.0;
const PITCH_LIMIT: f32 = 89.9;
const FOV_RANGE: (f32, f32) = (1.0, 120.0);
/// Degrees of fov per wheel notch.
const ZOOM_SPEED: f32 = 3.0;

/// Free-look fly camera.
pub struct Camera {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub speed: f32,
    pub sensitivity: f32,
    pub fov: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new() -> Self {
        Self {
            position: HOME_POSITION,
            yaw: HOME_YAW,
            pitch: 0.0,
            speed: 5.0,
            sensitivity: 0.1,
            fov: 60.0,
            near: 0.1,
            far: 100.0,
        }
    }

    /// Back to the starting pose. Fov is left alone.
    pub fn reset(&mut self) {
        self.position = HOME_POSITION;
        self.yaw = HOME_YAW;
        self.pitch = 0.0;
    }

    pub fn look(&mut self, mouse_dx: f32, mouse_dy: f32) {
        self.yaw += mouse_dx * self.sensitivity;
        self.pitch -= mouse_dy * self.sensitivity;
        self.pitch = self.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    pub fn zoom(&mut self, notches: f32) {
        self.fov = (self.fov - notches * ZOOM_SPEED).clamp(FOV_RANGE.0, FOV_RANGE.1);
    }

    /// WASD moves in the view plane, E and Q rise and sink.
    pub fn move_wasd(&mut self, input: &InputState, dt: f32) {
        let axes = Vec3::new(
            input.axis(Scancode::D, Scancode::A),
            input.axis(Scancode::E, Scancode::Q),
            input.axis(Scancode::W, Scancode::S),
        );
        self.fly(axes, dt);
    }

    /// `axes` is (right, up, forward) in camera space.
    pub fn fly(&mut self, axes: Vec3, dt: f32) {
        let forward = self.forward();
        let right = forward.cross(Vec3::Y).normalize();
        let up = right.cross(forward).normalize();
        let velocity = self.speed * dt;

        self.position += (right * axes.x + up * axes.y + forward * axes.z) * velocity;
    }

    pub fn forward(&self) -> Vec3 {
        let yaw_rad = self.yaw.to_radians();
        let pitch_rad = self.pitch.to_radians();
        Vec3::new(
            yaw_rad.cos() * pitch_rad.cos(),
            pitch_rad.sin(),
            yaw_rad.sin() * pitch_rad.cos(),
        )
        .normalize()
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.forward(), Vec3::Y)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov.to_radians(), aspect, self.near, self.far)
    }
}
