pub mod mesh;
pub mod shader;
pub mod shadow;
pub mod texture;
pub mod uniforms;

use glam::{Mat4, Vec3};
use mesh::Mesh;
use shader::ShaderProgram;
use shadow::ShadowPass;
use texture::{Texture2D, FALLBACK_COLOR, FLAT_NORMAL};
use uniforms::{LightBlock, UniformBuffer, LIGHT_BLOCK_BINDING};

use crate::components::MeshHandle;
use crate::config::{DemoConfig, TextureConfig};
use crate::error::RenderError;
use crate::lighting::{LightRegistry, ShadowProjection, ShadowTransforms};
use crate::scene::Scene;

const LIT_VERT_SRC: &str = include_str!("../../shaders/lit.vert");
const LIT_FRAG_SRC: &str = include_str!("../../shaders/lit.frag");
const UNLIT_FRAG_SRC: &str = include_str!("../../shaders/unlit.frag");

const FLOOR_TEXTURE_UNIT: u32 = 0;
const OBJECT_TEXTURE_UNIT: u32 = 1;
const OBJECT_NORMAL_UNIT: u32 = 2;
const SHADOW_MAP_UNIT: u32 = 4;

/// Scale of the sphere drawn at the shadow-casting light.
const MARKER_SCALE: f32 = 0.5;

/// Holds all loaded meshes. Entities reference meshes by MeshHandle index.
pub struct MeshStore {
    meshes: Vec<Mesh>,
}

impl MeshStore {
    pub fn new() -> Self {
        Self { meshes: Vec::new() }
    }

    pub fn add(&mut self, mesh: Mesh) -> MeshHandle {
        let handle = MeshHandle(self.meshes.len());
        self.meshes.push(mesh);
        handle
    }

    pub fn get(&self, handle: MeshHandle) -> &Mesh {
        &self.meshes[handle.0]
    }
}

/// The three images the lit pass samples.
pub struct SceneTextures {
    floor: Texture2D,
    object: Texture2D,
    object_normal: Texture2D,
}

impl SceneTextures {
    pub fn load(paths: &TextureConfig) -> Self {
        Self {
            floor: Texture2D::load_or(&paths.floor, FALLBACK_COLOR),
            object: Texture2D::load_or(&paths.object, FALLBACK_COLOR),
            object_normal: Texture2D::load_or(&paths.object_normal, FLAT_NORMAL),
        }
    }

    fn bind(&self) {
        self.floor.bind(FLOOR_TEXTURE_UNIT);
        self.object.bind(OBJECT_TEXTURE_UNIT);
        self.object_normal.bind(OBJECT_NORMAL_UNIT);
    }
}

/// Camera state for one frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameView {
    pub view: Mat4,
    pub projection: Mat4,
    pub camera_position: Vec3,
}

pub struct Renderer {
    lit: ShaderProgram,
    unlit: ShaderProgram,
    light_block: UniformBuffer,
    shadow: ShadowPass,
    textures: SceneTextures,
    shadow_projection: ShadowProjection,
    background: Vec3,
    viewport: (u32, u32),
}

impl Renderer {
    pub fn init(config: &DemoConfig) -> Result<Self, RenderError> {
        unsafe {
            gl::Enable(gl::CULL_FACE);
            gl::CullFace(gl::BACK);
            gl::Enable(gl::BLEND);
            gl::BlendFunc(gl::SRC_ALPHA, gl::ONE_MINUS_SRC_ALPHA);
            gl::Enable(gl::DEPTH_TEST);
            gl::DepthFunc(gl::LESS);
        }

        let mut lit = ShaderProgram::from_sources(LIT_VERT_SRC, LIT_FRAG_SRC)?;
        lit.bind_uniform_block("LightBlock", LIGHT_BLOCK_BINDING);
        lit.bind();
        lit.set_int("u_floor_texture", FLOOR_TEXTURE_UNIT as i32);
        lit.set_int("u_object_texture", OBJECT_TEXTURE_UNIT as i32);
        lit.set_int("u_object_normal_map", OBJECT_NORMAL_UNIT as i32);
        lit.set_int("u_shadow_map", SHADOW_MAP_UNIT as i32);

        let unlit = ShaderProgram::from_sources(LIT_VERT_SRC, UNLIT_FRAG_SRC)?;
        let light_block = UniformBuffer::new(LIGHT_BLOCK_BINDING, std::mem::size_of::<LightBlock>());
        let shadow = ShadowPass::new(config.shadow.resolution)?;
        let textures = SceneTextures::load(&config.textures);

        tracing::info!(shadows = shadow.is_enabled(), "renderer initialized");

        Ok(Self {
            lit,
            unlit,
            light_block,
            shadow,
            textures,
            shadow_projection: config.shadow.projection,
            background: config.background_color,
            viewport: (config.window.width, config.window.height),
        })
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport = (width.max(1), height.max(1));
    }

    pub fn set_wireframe(&self, enabled: bool) {
        let mode = if enabled { gl::LINE } else { gl::FILL };
        unsafe {
            gl::PolygonMode(gl::FRONT_AND_BACK, mode);
        }
    }

    pub fn shadows_enabled(&self) -> bool {
        self.shadow.is_enabled()
    }

    /// Shadow pass, lit pass, then the marker for the shadow caster.
    /// `marker` is the mesh drawn at the light.
    pub fn render_frame(
        &mut self,
        registry: &LightRegistry,
        scene: &Scene,
        view: &FrameView,
        marker: MeshHandle,
    ) {
        let caster = registry.shadow_caster();
        let transforms = ShadowTransforms::new(caster.position, self.shadow_projection);
        let block = LightBlock::new(
            registry,
            transforms.far,
            view.camera_position,
            self.shadow.is_enabled(),
        );
        self.light_block.upload(&block);

        self.shadow.render(&transforms, scene);

        unsafe {
            gl::Viewport(0, 0, self.viewport.0 as i32, self.viewport.1 as i32);
            gl::ClearColor(self.background.x, self.background.y, self.background.z, 1.0);
            gl::Clear(gl::COLOR_BUFFER_BIT | gl::DEPTH_BUFFER_BIT);
        }

        self.lit.bind();
        self.lit.set_mat4("u_view", &view.view);
        self.lit.set_mat4("u_projection", &view.projection);
        self.textures.bind();
        self.shadow.bind_for_reading(SHADOW_MAP_UNIT);
        scene.draw(&mut self.lit);

        let model = Mat4::from_scale_rotation_translation(
            Vec3::splat(MARKER_SCALE),
            glam::Quat::IDENTITY,
            caster.position,
        );
        self.unlit.bind();
        self.unlit.set_mat4("u_view", &view.view);
        self.unlit.set_mat4("u_projection", &view.projection);
        self.unlit.set_mat4("u_model", &model);
        self.unlit.set_vec3("u_color", caster.marker_color());
        scene.meshes.get(marker).draw();
    }
}
