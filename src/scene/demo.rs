use glam::Vec3;
use hecs::{Entity, World};

use super::Scene;
use crate::components::{
    DrawOrder, GlobalTransform, LocalTransform, MeshHandle, Orbit, SurfaceKind,
};
use crate::renderer::mesh::{
    create_cube, create_cylinder, create_plane, create_quad, create_sphere, Mesh,
};
use crate::renderer::MeshStore;
use crate::systems::transform_system;

/// The orbit steps are tuned per frame at this rate.
pub const ORBIT_STEPS_PER_SECOND: f32 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Cube,
    Sphere,
    Cylinder,
    Plane,
    Quad,
}

impl Shape {
    pub fn kind(self) -> SurfaceKind {
        match self {
            Shape::Cube | Shape::Sphere | Shape::Cylinder => SurfaceKind::Volumetric,
            Shape::Plane | Shape::Quad => SurfaceKind::Surface,
        }
    }
}

/// Mesh handles for each primitive, shared by every instance of it.
#[derive(Debug, Clone, Copy)]
pub struct ShapeMeshes {
    pub cube: MeshHandle,
    pub sphere: MeshHandle,
    pub cylinder: MeshHandle,
    pub plane: MeshHandle,
    pub quad: MeshHandle,
}

impl ShapeMeshes {
    pub fn upload(store: &mut MeshStore) -> Self {
        Self {
            cube: store.add(Mesh::upload(&create_cube(1.0, 1.0, 1.0))),
            sphere: store.add(Mesh::upload(&create_sphere(0.5, 64, 64))),
            cylinder: store.add(Mesh::upload(&create_cylinder(1.0, 0.5, 64))),
            plane: store.add(Mesh::upload(&create_plane(1.0, 1.0))),
            quad: store.add(Mesh::upload(&create_quad(1.0, 1.0))),
        }
    }

    pub fn get(&self, shape: Shape) -> MeshHandle {
        match shape {
            Shape::Cube => self.cube,
            Shape::Sphere => self.sphere,
            Shape::Cylinder => self.cylinder,
            Shape::Plane => self.plane,
            Shape::Quad => self.quad,
        }
    }
}

struct Placement {
    shape: Shape,
    position: Vec3,
    /// Euler degrees.
    rotation: Vec3,
    scale: f32,
    /// Per-step orbit rotation in Euler degrees.
    orbit_step: Option<Vec3>,
}

const fn shape_at(shape: Shape, position: Vec3, orbit_step: Vec3) -> Placement {
    Placement {
        shape,
        position,
        rotation: Vec3::ZERO,
        scale: 1.0,
        orbit_step: Some(orbit_step),
    }
}

const fn wall(shape: Shape, position: Vec3, rotation: Vec3) -> Placement {
    Placement {
        shape,
        position,
        rotation,
        scale: 15.0,
        orbit_step: None,
    }
}

/// Shapes first, then the room around them. Each wall faces the origin.
const LAYOUT: [Placement; 12] = [
    shape_at(Shape::Cube, Vec3::new(-3.0, 0.0, 0.0), Vec3::new(0.0, 0.2, 0.0)),
    shape_at(Shape::Cube, Vec3::new(0.0, 3.0, 0.0), Vec3::new(0.1, 0.0, 0.0)),
    shape_at(Shape::Sphere, Vec3::new(0.0, 0.0, 3.0), Vec3::new(0.3, 0.3, 0.0)),
    shape_at(Shape::Sphere, Vec3::new(0.0, -3.0, 0.0), Vec3::new(0.1, 0.0, 0.0)),
    shape_at(Shape::Cylinder, Vec3::new(3.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 0.15)),
    shape_at(Shape::Cylinder, Vec3::new(0.0, 0.0, -3.0), Vec3::new(-0.25, 0.25, 0.0)),
    wall(Shape::Plane, Vec3::new(0.0, -7.0, 0.0), Vec3::ZERO),
    wall(Shape::Plane, Vec3::new(0.0, 7.0, 0.0), Vec3::new(180.0, 0.0, 0.0)),
    wall(Shape::Quad, Vec3::new(0.0, 0.0, -7.0), Vec3::ZERO),
    wall(Shape::Quad, Vec3::new(0.0, 0.0, 7.0), Vec3::new(0.0, 180.0, 0.0)),
    wall(Shape::Quad, Vec3::new(-7.0, 0.0, 0.0), Vec3::new(0.0, 90.0, 0.0)),
    wall(Shape::Quad, Vec3::new(7.0, 0.0, 0.0), Vec3::new(0.0, 270.0, 0.0)),
];

/// Spawn the fixed demo layout. Returns entities in draw order.
pub fn spawn_demo_layout(world: &mut World, meshes: &ShapeMeshes) -> Vec<Entity> {
    LAYOUT
        .iter()
        .enumerate()
        .map(|(order, placement)| {
            let euler = placement.rotation * (std::f32::consts::PI / 180.0);
            let local = LocalTransform::new(placement.position)
                .with_euler(euler)
                .with_scale(placement.scale);
            let entity = world.spawn((
                local,
                GlobalTransform(local.matrix()),
                meshes.get(placement.shape),
                placement.shape.kind(),
                DrawOrder(order as u32),
            ));
            if let Some(step) = placement.orbit_step {
                let orbit = Orbit::from_step_degrees(placement.position, step, ORBIT_STEPS_PER_SECOND);
                let _ = world.insert_one(entity, orbit);
            }
            entity
        })
        .collect()
}

/// Upload the primitive meshes and build the demo scene around them.
pub fn load_demo_scene() -> (Scene, ShapeMeshes) {
    let mut meshes = MeshStore::new();
    let shapes = ShapeMeshes::upload(&mut meshes);
    let mut world = World::new();
    let entities = spawn_demo_layout(&mut world, &shapes);
    transform_system(&mut world);
    tracing::info!(instances = entities.len(), "demo scene loaded");
    (Scene { world, meshes }, shapes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::draw_instances;

    fn fake_meshes() -> ShapeMeshes {
        ShapeMeshes {
            cube: MeshHandle(0),
            sphere: MeshHandle(1),
            cylinder: MeshHandle(2),
            plane: MeshHandle(3),
            quad: MeshHandle(4),
        }
    }

    fn demo_world() -> World {
        let mut world = World::new();
        spawn_demo_layout(&mut world, &fake_meshes());
        world
    }

    #[test]
    fn traversal_draws_shapes_then_room() {
        let world = demo_world();
        let meshes: Vec<usize> = draw_instances(&world).iter().map(|i| i.mesh.0).collect();
        assert_eq!(meshes, vec![0, 0, 1, 1, 2, 2, 3, 3, 4, 4, 4, 4]);
    }

    #[test]
    fn floor_texture_starts_at_the_first_plane() {
        let world = demo_world();
        let flags: Vec<bool> = draw_instances(&world)
            .iter()
            .map(|i| i.use_floor_texture)
            .collect();
        assert_eq!(flags[..6], [false; 6]);
        assert_eq!(flags[6..], [true; 6]);
    }

    #[test]
    fn every_wall_faces_the_origin() {
        let world = demo_world();
        for instance in draw_instances(&world).iter().skip(6) {
            let local_normal = if instance.mesh == fake_meshes().plane {
                Vec3::Y
            } else {
                Vec3::Z
            };
            let center = instance.model.transform_point3(Vec3::ZERO);
            let normal = instance.model.transform_vector3(local_normal).normalize();
            assert!((center.length() - 7.0).abs() < 1e-4);
            assert!(
                normal.dot(-center.normalize()) > 0.999,
                "wall at {center} faces {normal}"
            );
        }
    }

    #[test]
    fn walls_span_fifteen_units() {
        let world = demo_world();
        let floor = draw_instances(&world)[6];
        let corner = floor.model.transform_point3(Vec3::new(0.5, 0.0, 0.5));
        assert!((corner - Vec3::new(7.5, -7.0, 7.5)).length() < 1e-4);
    }

    #[test]
    fn only_the_shapes_orbit() {
        let world = demo_world();
        let mut orbiting: Vec<u32> = world
            .query::<(&Orbit, &DrawOrder)>()
            .iter()
            .map(|(_e, (_orbit, order))| order.0)
            .collect();
        orbiting.sort();
        assert_eq!(orbiting, vec![0, 1, 2, 3, 4, 5]);
    }
}
