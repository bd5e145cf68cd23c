use gl::types::*;
use std::ptr;

use super::shader::ShaderProgram;
use crate::error::RenderError;
use crate::lighting::ShadowTransforms;
use crate::scene::Scene;

const DEPTH_VERT_SRC: &str = include_str!("../../shaders/depth.vert");
const DEPTH_GEOM_SRC: &str = include_str!("../../shaders/depth.geom");
const DEPTH_FRAG_SRC: &str = include_str!("../../shaders/depth.frag");

/// Depth-only cubemap render target for one point light.
pub struct ShadowCubemap {
    fbo: GLuint,
    texture: GLuint,
    pub resolution: u32,
}

impl ShadowCubemap {
    pub fn new(resolution: u32) -> Result<Self, RenderError> {
        let size = resolution.max(1) as GLsizei;
        let mut texture = 0;
        let mut fbo = 0;
        let status = unsafe {
            gl::GenTextures(1, &mut texture);
            gl::BindTexture(gl::TEXTURE_CUBE_MAP, texture);
            for face in 0..6 {
                gl::TexImage2D(
                    gl::TEXTURE_CUBE_MAP_POSITIVE_X + face,
                    0,
                    gl::DEPTH_COMPONENT as GLint,
                    size,
                    size,
                    0,
                    gl::DEPTH_COMPONENT,
                    gl::FLOAT,
                    ptr::null(),
                );
            }
            gl::TexParameteri(gl::TEXTURE_CUBE_MAP, gl::TEXTURE_MAG_FILTER, gl::NEAREST as GLint);
            gl::TexParameteri(gl::TEXTURE_CUBE_MAP, gl::TEXTURE_MIN_FILTER, gl::NEAREST as GLint);
            for wrap in [gl::TEXTURE_WRAP_S, gl::TEXTURE_WRAP_T, gl::TEXTURE_WRAP_R] {
                gl::TexParameteri(gl::TEXTURE_CUBE_MAP, wrap, gl::CLAMP_TO_EDGE as GLint);
            }

            gl::GenFramebuffers(1, &mut fbo);
            gl::BindFramebuffer(gl::FRAMEBUFFER, fbo);
            gl::FramebufferTexture(gl::FRAMEBUFFER, gl::DEPTH_ATTACHMENT, texture, 0);
            gl::DrawBuffer(gl::NONE);
            gl::ReadBuffer(gl::NONE);
            let status = gl::CheckFramebufferStatus(gl::FRAMEBUFFER);
            gl::BindFramebuffer(gl::FRAMEBUFFER, 0);
            gl::BindTexture(gl::TEXTURE_CUBE_MAP, 0);
            status
        };

        let cubemap = Self {
            fbo,
            texture,
            resolution: size as u32,
        };
        if status != gl::FRAMEBUFFER_COMPLETE {
            // Dropping releases the texture and framebuffer.
            return Err(RenderError::FramebufferIncomplete {
                label: "shadow cubemap",
                status,
            });
        }
        Ok(cubemap)
    }

    fn bind_for_writing(&self) {
        unsafe {
            gl::BindFramebuffer(gl::FRAMEBUFFER, self.fbo);
            gl::Viewport(0, 0, self.resolution as GLsizei, self.resolution as GLsizei);
            gl::Clear(gl::DEPTH_BUFFER_BIT);
        }
    }

    pub fn bind_for_reading(&self, unit: u32) {
        unsafe {
            gl::ActiveTexture(gl::TEXTURE0 + unit);
            gl::BindTexture(gl::TEXTURE_CUBE_MAP, self.texture);
        }
    }
}

impl Drop for ShadowCubemap {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteFramebuffers(1, &self.fbo);
            gl::DeleteTextures(1, &self.texture);
        }
    }
}

/// Renders scene depth from point light 0 into all six cube faces in a
/// single draw per mesh.
pub struct ShadowPass {
    program: ShaderProgram,
    target: Option<ShadowCubemap>,
}

impl ShadowPass {
    /// A broken render target is not fatal: it is logged once and the pass
    /// stays disabled for the rest of the session.
    pub fn new(resolution: u32) -> Result<Self, RenderError> {
        let program = ShaderProgram::with_geometry(DEPTH_VERT_SRC, DEPTH_GEOM_SRC, DEPTH_FRAG_SRC)?;
        let target = match ShadowCubemap::new(resolution) {
            Ok(cubemap) => {
                tracing::info!(resolution = cubemap.resolution, "shadow cubemap ready");
                Some(cubemap)
            }
            Err(err) => {
                tracing::error!("{err}; point shadows disabled");
                None
            }
        };
        Ok(Self { program, target })
    }

    pub fn is_enabled(&self) -> bool {
        self.target.is_some()
    }

    /// Leaves the default framebuffer bound and back-face culling restored.
    pub fn render(&mut self, transforms: &ShadowTransforms, scene: &Scene) {
        let Some(target) = &self.target else {
            return;
        };
        target.bind_for_writing();
        unsafe {
            gl::CullFace(gl::FRONT);
        }

        self.program.bind();
        self.program.set_vec3("u_light_pos", transforms.light_position);
        self.program.set_float("u_far_plane", transforms.far);
        self.program
            .set_mat4_array("u_shadow_matrices", &transforms.matrices);
        scene.draw(&mut self.program);

        unsafe {
            gl::CullFace(gl::BACK);
            gl::BindFramebuffer(gl::FRAMEBUFFER, 0);
        }
    }

    pub fn bind_for_reading(&self, unit: u32) {
        if let Some(target) = &self.target {
            target.bind_for_reading(unit);
        }
    }
}
