use hecs::World;

use crate::components::{GlobalTransform, LocalTransform};

/// Copies every LocalTransform into its GlobalTransform. The demo scene is
/// flat, so each entity is its own root.
pub fn transform_system(world: &mut World) {
    for (_entity, (local, global)) in world
        .query_mut::<(&LocalTransform, &mut GlobalTransform)>()
    {
        global.0 = local.matrix();
    }
}
