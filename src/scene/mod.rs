pub mod demo;

use glam::Mat4;
use hecs::World;

use crate::components::{DrawOrder, GlobalTransform, MeshHandle, SurfaceKind};
use crate::renderer::shader::ShaderProgram;
use crate::renderer::MeshStore;

/// One draw call in traversal order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawInstance {
    pub mesh: MeshHandle,
    pub model: Mat4,
    /// Cleared at the start of every traversal and latched on at the
    /// first surface.
    pub use_floor_texture: bool,
}

/// Drawable entities sorted by `DrawOrder`, with the floor-texture flag
/// resolved for each.
pub fn draw_instances(world: &World) -> Vec<DrawInstance> {
    let mut ordered: Vec<(DrawOrder, MeshHandle, Mat4, SurfaceKind)> = world
        .query::<(&DrawOrder, &MeshHandle, &GlobalTransform, &SurfaceKind)>()
        .iter()
        .map(|(_entity, (order, mesh, global, kind))| (*order, *mesh, global.0, *kind))
        .collect();
    ordered.sort_by_key(|(order, ..)| *order);

    let mut use_floor_texture = false;
    ordered
        .into_iter()
        .map(|(_, mesh, model, kind)| {
            use_floor_texture |= kind == SurfaceKind::Surface;
            DrawInstance {
                mesh,
                model,
                use_floor_texture,
            }
        })
        .collect()
}

/// The drawable world plus the GPU meshes it references.
pub struct Scene {
    pub world: World,
    pub meshes: MeshStore,
}

impl Scene {
    /// Issue every instance with whatever program is bound. Programs
    /// without `u_use_floor_texture` ignore the flag.
    pub fn draw(&self, program: &mut ShaderProgram) {
        let mut use_floor_texture = false;
        program.set_int("u_use_floor_texture", 0);
        for instance in draw_instances(&self.world) {
            if instance.use_floor_texture != use_floor_texture {
                use_floor_texture = instance.use_floor_texture;
                program.set_int("u_use_floor_texture", use_floor_texture as i32);
            }
            program.set_mat4("u_model", &instance.model);
            self.meshes.get(instance.mesh).draw();
        }
    }
}
