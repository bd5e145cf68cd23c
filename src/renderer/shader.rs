use gl::types::*;
use glam::{Mat4, Vec3};
use std::collections::HashMap;
use std::ffi::CString;
use std::ptr;

use crate::error::RenderError;

pub struct ShaderProgram {
    pub id: GLuint,
    uniform_cache: HashMap<String, GLint>,
}

impl ShaderProgram {
    pub fn from_sources(vert_src: &str, frag_src: &str) -> Result<Self, RenderError> {
        Self::link(&[(vert_src, gl::VERTEX_SHADER), (frag_src, gl::FRAGMENT_SHADER)])
    }

    /// Program with a geometry stage between vertex and fragment.
    pub fn with_geometry(
        vert_src: &str,
        geom_src: &str,
        frag_src: &str,
    ) -> Result<Self, RenderError> {
        Self::link(&[
            (vert_src, gl::VERTEX_SHADER),
            (geom_src, gl::GEOMETRY_SHADER),
            (frag_src, gl::FRAGMENT_SHADER),
        ])
    }

    fn link(stages: &[(&str, GLenum)]) -> Result<Self, RenderError> {
        unsafe {
            let mut shaders = Vec::with_capacity(stages.len());
            for &(src, kind) in stages {
                match compile_shader(src, kind) {
                    Ok(shader) => shaders.push(shader),
                    Err(err) => {
                        for shader in shaders {
                            gl::DeleteShader(shader);
                        }
                        return Err(err);
                    }
                }
            }

            let program = gl::CreateProgram();
            for &shader in &shaders {
                gl::AttachShader(program, shader);
            }
            gl::LinkProgram(program);

            let mut success = 0;
            gl::GetProgramiv(program, gl::LINK_STATUS, &mut success);
            for &shader in &shaders {
                gl::DeleteShader(shader);
            }
            if success == 0 {
                let mut len = 0;
                gl::GetProgramiv(program, gl::INFO_LOG_LENGTH, &mut len);
                let mut buf = vec![0u8; len.max(1) as usize];
                gl::GetProgramInfoLog(program, len, ptr::null_mut(), buf.as_mut_ptr() as *mut _);
                buf.pop(); // remove null terminator
                let msg = String::from_utf8_lossy(&buf).to_string();
                gl::DeleteProgram(program);
                return Err(RenderError::ShaderLink(msg));
            }

            Ok(Self {
                id: program,
                uniform_cache: HashMap::new(),
            })
        }
    }

    pub fn bind(&self) {
        unsafe {
            gl::UseProgram(self.id);
        }
    }

    /// Attach the named uniform block to `binding`. Blocks the linker
    /// stripped are reported and skipped.
    pub fn bind_uniform_block(&self, block: &str, binding: GLuint) {
        let Ok(cname) = CString::new(block) else {
            return;
        };
        unsafe {
            let index = gl::GetUniformBlockIndex(self.id, cname.as_ptr());
            if index == gl::INVALID_INDEX {
                tracing::warn!(block, program = self.id, "uniform block not found");
                return;
            }
            gl::UniformBlockBinding(self.id, index, binding);
        }
    }

    fn get_uniform_location(&mut self, name: &str) -> GLint {
        if let Some(&loc) = self.uniform_cache.get(name) {
            return loc;
        }
        let loc = match CString::new(name) {
            Ok(cname) => unsafe { gl::GetUniformLocation(self.id, cname.as_ptr()) },
            Err(_) => -1,
        };
        self.uniform_cache.insert(name.to_string(), loc);
        loc
    }

    pub fn set_mat4(&mut self, name: &str, mat: &Mat4) {
        let loc = self.get_uniform_location(name);
        unsafe {
            gl::UniformMatrix4fv(loc, 1, gl::FALSE, mat.to_cols_array().as_ptr());
        }
    }

    /// Upload `mats` to a `mat4 name[N]` array starting at element 0.
    pub fn set_mat4_array(&mut self, name: &str, mats: &[Mat4]) {
        let loc = self.get_uniform_location(&format!("{name}[0]"));
        let flat: Vec<f32> = mats.iter().flat_map(|m| m.to_cols_array()).collect();
        unsafe {
            gl::UniformMatrix4fv(loc, mats.len() as GLsizei, gl::FALSE, flat.as_ptr());
        }
    }

    pub fn set_vec3(&mut self, name: &str, v: Vec3) {
        let loc = self.get_uniform_location(name);
        unsafe {
            gl::Uniform3f(loc, v.x, v.y, v.z);
        }
    }

    pub fn set_float(&mut self, name: &str, val: f32) {
        let loc = self.get_uniform_location(name);
        unsafe {
            gl::Uniform1f(loc, val);
        }
    }

    pub fn set_vec4(&mut self, name: &str, v: [f32; 4]) {
        let loc = self.get_uniform_location(name);
        unsafe {
            gl::Uniform4f(loc, v[0], v[1], v[2], v[3]);
        }
    }

    pub fn set_int(&mut self, name: &str, val: i32) {
        let loc = self.get_uniform_location(name);
        unsafe {
            gl::Uniform1i(loc, val);
        }
    }
}

impl Drop for ShaderProgram {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteProgram(self.id);
        }
    }
}

fn stage_name(shader_type: GLenum) -> &'static str {
    match shader_type {
        gl::VERTEX_SHADER => "vertex",
        gl::GEOMETRY_SHADER => "geometry",
        _ => "fragment",
    }
}

unsafe fn compile_shader(src: &str, shader_type: GLenum) -> Result<GLuint, RenderError> {
    let stage = stage_name(shader_type);
    let c_src = CString::new(src).map_err(|_| RenderError::ShaderCompile {
        stage,
        log: "source contains an interior NUL byte".into(),
    })?;
    let shader = gl::CreateShader(shader_type);
    gl::ShaderSource(shader, 1, &c_src.as_ptr(), ptr::null());
    gl::CompileShader(shader);

    let mut success = 0;
    gl::GetShaderiv(shader, gl::COMPILE_STATUS, &mut success);
    if success == 0 {
        let mut len = 0;
        gl::GetShaderiv(shader, gl::INFO_LOG_LENGTH, &mut len);
        let mut buf = vec![0u8; len.max(1) as usize];
        gl::GetShaderInfoLog(shader, len, ptr::null_mut(), buf.as_mut_ptr() as *mut _);
        buf.pop();
        let log = String::from_utf8_lossy(&buf).to_string();
        gl::DeleteShader(shader);
        return Err(RenderError::ShaderCompile { stage, log });
    }
    Ok(shader)
}
