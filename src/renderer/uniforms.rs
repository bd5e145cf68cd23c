//! std140 image of the `LightBlock` uniform block in `shaders/lit.frag`.
//!
//! The whole registry goes up in one `glBufferSubData` per frame instead of
//! one `glUniform*` call per light field.

use bytemuck::{Pod, Zeroable};
use gl::types::*;
use glam::Vec3;
use std::ptr;

use crate::lighting::{DirectionalLight, LightRegistry, Material, PointLight, SpotLight, MAX_LIGHTS};

/// Binding point shared by the buffer and every program that reads it.
pub const LIGHT_BLOCK_BINDING: GLuint = 0;

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct GpuPointLight {
    pub position: [f32; 3],
    pub radius: f32,
    pub color: [f32; 3],
    pub intensity: f32,
    pub is_on: i32,
    pub _pad: [i32; 3],
}

impl From<&PointLight> for GpuPointLight {
    fn from(light: &PointLight) -> Self {
        Self {
            position: light.position.to_array(),
            radius: light.radius,
            color: light.color.to_array(),
            intensity: light.intensity,
            is_on: light.is_on as i32,
            _pad: [0; 3],
        }
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct GpuDirectionalLight {
    pub direction: [f32; 3],
    pub intensity: f32,
    pub color: [f32; 3],
    pub is_on: i32,
}

impl From<&DirectionalLight> for GpuDirectionalLight {
    fn from(light: &DirectionalLight) -> Self {
        Self {
            direction: light.direction.to_array(),
            intensity: light.intensity,
            color: light.color.to_array(),
            is_on: light.is_on as i32,
        }
    }
}

/// Cone angles travel as cosines so the shader never calls `cos`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct GpuSpotLight {
    pub position: [f32; 3],
    pub radius: f32,
    pub direction: [f32; 3],
    pub intensity: f32,
    pub color: [f32; 3],
    pub inner_cos: f32,
    pub outer_cos: f32,
    pub is_on: i32,
    pub _pad: [i32; 2],
}

impl From<&SpotLight> for GpuSpotLight {
    fn from(light: &SpotLight) -> Self {
        let (inner_cos, outer_cos) = light.cone_cosines();
        Self {
            position: light.position.to_array(),
            radius: light.radius,
            direction: light.direction.to_array(),
            intensity: light.intensity,
            color: light.color.to_array(),
            inner_cos,
            outer_cos,
            is_on: light.is_on as i32,
            _pad: [0; 2],
        }
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct GpuMaterial {
    pub color: [f32; 3],
    pub ambient_k: f32,
    pub diffuse_k: f32,
    pub specular_k: f32,
    pub shininess: f32,
    pub _pad: f32,
}

impl From<&Material> for GpuMaterial {
    fn from(material: &Material) -> Self {
        Self {
            color: material.color.to_array(),
            ambient_k: material.ambient_k,
            diffuse_k: material.diffuse_k,
            specular_k: material.specular_k,
            shininess: material.shininess,
            _pad: 0.0,
        }
    }
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct LightBlock {
    pub point: [GpuPointLight; MAX_LIGHTS],
    pub directional: [GpuDirectionalLight; MAX_LIGHTS],
    pub spot: [GpuSpotLight; MAX_LIGHTS],
    pub material: GpuMaterial,
    pub min_bias: f32,
    pub max_bias: f32,
    pub normal_intensity: f32,
    pub far_plane: f32,
    pub camera_position: [f32; 3],
    pub shadows_enabled: i32,
}

impl LightBlock {
    pub fn new(
        registry: &LightRegistry,
        far_plane: f32,
        camera_position: Vec3,
        shadows_enabled: bool,
    ) -> Self {
        Self {
            point: std::array::from_fn(|i| GpuPointLight::from(&registry.point[i])),
            directional: std::array::from_fn(|i| GpuDirectionalLight::from(&registry.directional[i])),
            spot: std::array::from_fn(|i| GpuSpotLight::from(&registry.spot[i])),
            material: GpuMaterial::from(&registry.material),
            min_bias: registry.bias.min(),
            max_bias: registry.bias.max(),
            normal_intensity: registry.normal_intensity.clamp(0.0, 1.0),
            far_plane,
            camera_position: camera_position.to_array(),
            shadows_enabled: shadows_enabled as i32,
        }
    }
}

/// GL uniform buffer attached to a fixed binding point.
pub struct UniformBuffer {
    id: GLuint,
    size: usize,
}

impl UniformBuffer {
    pub fn new(binding: GLuint, size: usize) -> Self {
        let mut id = 0;
        unsafe {
            gl::GenBuffers(1, &mut id);
            gl::BindBuffer(gl::UNIFORM_BUFFER, id);
            gl::BufferData(
                gl::UNIFORM_BUFFER,
                size as GLsizeiptr,
                ptr::null(),
                gl::DYNAMIC_DRAW,
            );
            gl::BindBufferBase(gl::UNIFORM_BUFFER, binding, id);
            gl::BindBuffer(gl::UNIFORM_BUFFER, 0);
        }
        Self { id, size }
    }

    pub fn upload<T: Pod>(&self, value: &T) {
        let bytes = bytemuck::bytes_of(value);
        debug_assert!(bytes.len() <= self.size);
        unsafe {
            gl::BindBuffer(gl::UNIFORM_BUFFER, self.id);
            gl::BufferSubData(
                gl::UNIFORM_BUFFER,
                0,
                bytes.len() as GLsizeiptr,
                bytes.as_ptr() as *const _,
            );
            gl::BindBuffer(gl::UNIFORM_BUFFER, 0);
        }
    }
}

impl Drop for UniformBuffer {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteBuffers(1, &self.id);
        }
    }
}
