mod orbit;
mod transform;

pub use orbit::orbit_system;
pub use transform::transform_system;
