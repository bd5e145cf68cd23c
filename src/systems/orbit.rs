use hecs::World;
use std::f32::consts::TAU;

use crate::components::{LocalTransform, Orbit};

/// Advance every orbiting entity by `dt` seconds.
pub fn orbit_system(world: &mut World, dt: f32) {
    for (_entity, (orbit, local)) in world.query_mut::<(&mut Orbit, &mut LocalTransform)>() {
        orbit.angle = (orbit.angle + orbit.rate * dt).rem_euclid(TAU);
        local.position = orbit.position();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Mat3, Vec3};

    fn spawn_orbiter(world: &mut World, anchor: Vec3, step: Vec3) -> hecs::Entity {
        world.spawn((
            Orbit::from_step_degrees(anchor, step, 60.0),
            LocalTransform::new(anchor),
        ))
    }

    #[test]
    fn one_sixtieth_second_matches_one_step() {
        let mut world = World::new();
        let anchor = Vec3::new(0.0, 0.0, 3.0);
        let step = Vec3::new(0.3, 0.3, 0.0);
        let e = spawn_orbiter(&mut world, anchor, step);

        orbit_system(&mut world, 1.0 / 60.0);

        let r = step * (std::f32::consts::PI / 180.0);
        let m = Mat3::from_rotation_x(r.x) * Mat3::from_rotation_y(r.y) * Mat3::from_rotation_z(r.z);
        let expected = m.transpose() * anchor;
        let pos = world.get::<&LocalTransform>(e).unwrap().position;
        assert!((pos - expected).length() < 1e-5, "{pos} vs {expected}");
    }

    #[test]
    fn long_runs_do_not_drift_off_the_orbit() {
        let mut world = World::new();
        let anchor = Vec3::new(0.0, -3.0, 0.0);
        let e = spawn_orbiter(&mut world, anchor, Vec3::new(0.1, 0.0, 0.0));

        for _ in 0..100_000 {
            orbit_system(&mut world, 1.0 / 60.0);
        }

        let orbit = *world.get::<&Orbit>(e).unwrap();
        let pos = world.get::<&LocalTransform>(e).unwrap().position;
        assert!((pos.length() - 3.0).abs() < 1e-4);
        // stays in the plane perpendicular to the axis
        assert!(pos.dot(orbit.axis).abs() < 1e-4);
        assert!(orbit.angle >= 0.0 && orbit.angle < TAU);
        assert_eq!(pos, orbit.position());
    }

    #[test]
    fn zero_dt_leaves_positions_alone() {
        let mut world = World::new();
        let anchor = Vec3::new(-3.0, 0.0, 0.0);
        let e = spawn_orbiter(&mut world, anchor, Vec3::new(0.0, 0.2, 0.0));
        orbit_system(&mut world, 0.0);
        let pos = world.get::<&LocalTransform>(e).unwrap().position;
        assert!((pos - anchor).length() < 1e-6);
    }
}
