use bytemuck::{Pod, Zeroable};
use gl::types::*;
use glam::Vec3;
use std::f32::consts::PI;
use std::mem;
use std::ptr;

/// Interleaved vertex as laid out in the GL buffer.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
    pub tangent: [f32; 3],
}

impl Vertex {
    fn new(position: Vec3, normal: Vec3, uv: [f32; 2], tangent: Vec3) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
            uv,
            tangent: tangent.to_array(),
        }
    }
}

/// CPU-side triangle list, counter-clockwise when seen from outside.
#[derive(Clone, Debug, Default)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Append a flat quad centred at `center`, spanning `u` and `v`
    /// (half extents). Faces `u × v`.
    fn push_quad(&mut self, center: Vec3, u: Vec3, v: Vec3) {
        let normal = u.cross(v).normalize();
        let tangent = u.normalize();
        let base = self.vertices.len() as u32;
        let corners = [
            (center - u - v, [0.0, 0.0]),
            (center + u - v, [1.0, 0.0]),
            (center + u + v, [1.0, 1.0]),
            (center - u + v, [0.0, 1.0]),
        ];
        for (position, uv) in corners {
            self.vertices.push(Vertex::new(position, normal, uv, tangent));
        }
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
}

pub struct Mesh {
    vao: GLuint,
    vbo: GLuint,
    ebo: GLuint,
    pub index_count: i32,
}

impl Mesh {
    pub fn upload(data: &MeshData) -> Self {
        let mut vao = 0;
        let mut vbo = 0;
        let mut ebo = 0;

        unsafe {
            gl::GenVertexArrays(1, &mut vao);
            gl::GenBuffers(1, &mut vbo);
            gl::GenBuffers(1, &mut ebo);

            gl::BindVertexArray(vao);

            let vertex_bytes: &[u8] = bytemuck::cast_slice(&data.vertices);
            gl::BindBuffer(gl::ARRAY_BUFFER, vbo);
            gl::BufferData(
                gl::ARRAY_BUFFER,
                vertex_bytes.len() as GLsizeiptr,
                vertex_bytes.as_ptr() as *const _,
                gl::STATIC_DRAW,
            );

            gl::BindBuffer(gl::ELEMENT_ARRAY_BUFFER, ebo);
            gl::BufferData(
                gl::ELEMENT_ARRAY_BUFFER,
                (data.indices.len() * mem::size_of::<u32>()) as GLsizeiptr,
                data.indices.as_ptr() as *const _,
                gl::STATIC_DRAW,
            );

            let stride = mem::size_of::<Vertex>() as GLsizei;
            let attributes: [(GLuint, GLint, usize); 4] = [
                (0, 3, mem::offset_of!(Vertex, position)),
                (1, 3, mem::offset_of!(Vertex, normal)),
                (2, 2, mem::offset_of!(Vertex, uv)),
                (3, 3, mem::offset_of!(Vertex, tangent)),
            ];
            for (location, components, offset) in attributes {
                gl::VertexAttribPointer(
                    location,
                    components,
                    gl::FLOAT,
                    gl::FALSE,
                    stride,
                    offset as *const _,
                );
                gl::EnableVertexAttribArray(location);
            }

            gl::BindVertexArray(0);
        }

        Self {
            vao,
            vbo,
            ebo,
            index_count: data.indices.len() as i32,
        }
    }

    pub fn draw(&self) {
        unsafe {
            gl::BindVertexArray(self.vao);
            gl::DrawElements(gl::TRIANGLES, self.index_count, gl::UNSIGNED_INT, ptr::null());
            gl::BindVertexArray(0);
        }
    }
}

impl Drop for Mesh {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteVertexArrays(1, &self.vao);
            gl::DeleteBuffers(1, &self.vbo);
            gl::DeleteBuffers(1, &self.ebo);
        }
    }
}

/// Axis-aligned box centred on the origin, one UV square per face.
pub fn create_cube(width: f32, height: f32, depth: f32) -> MeshData {
    let (hw, hh, hd) = (width * 0.5, height * 0.5, depth * 0.5);
    let mut data = MeshData::default();
    // (center, u, v) with u × v pointing out of the face
    let faces = [
        (Vec3::X * hw, Vec3::NEG_Z * hd, Vec3::Y * hh),
        (Vec3::NEG_X * hw, Vec3::Z * hd, Vec3::Y * hh),
        (Vec3::Y * hh, Vec3::X * hw, Vec3::NEG_Z * hd),
        (Vec3::NEG_Y * hh, Vec3::X * hw, Vec3::Z * hd),
        (Vec3::Z * hd, Vec3::X * hw, Vec3::Y * hh),
        (Vec3::NEG_Z * hd, Vec3::NEG_X * hw, Vec3::Y * hh),
    ];
    for (center, u, v) in faces {
        data.push_quad(center, u, v);
    }
    data
}

/// UV sphere. `stacks` rings from the north pole down, `sectors` slices
/// around Y. Tangents follow increasing U.
pub fn create_sphere(radius: f32, stacks: u32, sectors: u32) -> MeshData {
    let stacks = stacks.max(2);
    let sectors = sectors.max(3);
    let mut data = MeshData::default();

    for i in 0..=stacks {
        let phi = PI * i as f32 / stacks as f32;
        let (sin_phi, cos_phi) = phi.sin_cos();
        for j in 0..=sectors {
            let theta = 2.0 * PI * j as f32 / sectors as f32;
            let (sin_theta, cos_theta) = theta.sin_cos();

            let normal = Vec3::new(sin_phi * sin_theta, cos_phi, sin_phi * cos_theta).normalize();
            let tangent = Vec3::new(cos_theta, 0.0, -sin_theta);
            let uv = [j as f32 / sectors as f32, 1.0 - i as f32 / stacks as f32];
            data.vertices
                .push(Vertex::new(normal * radius, normal, uv, tangent));
        }
    }

    for i in 0..stacks {
        for j in 0..sectors {
            let first = i * (sectors + 1) + j;
            let second = first + sectors + 1;

            data.indices.push(first);
            data.indices.push(second);
            data.indices.push(first + 1);

            data.indices.push(first + 1);
            data.indices.push(second);
            data.indices.push(second + 1);
        }
    }

    data
}

/// Capped cylinder along Y, centred on the origin.
pub fn create_cylinder(height: f32, radius: f32, segments: u32) -> MeshData {
    let segments = segments.max(3);
    let half = height * 0.5;
    let mut data = MeshData::default();

    // Side: a bottom and a top ring with radial normals.
    for j in 0..=segments {
        let theta = 2.0 * PI * j as f32 / segments as f32;
        let (sin_theta, cos_theta) = theta.sin_cos();
        let normal = Vec3::new(sin_theta, 0.0, cos_theta);
        let tangent = Vec3::new(cos_theta, 0.0, -sin_theta);
        let u = j as f32 / segments as f32;
        for (y, v) in [(-half, 0.0), (half, 1.0)] {
            let position = Vec3::new(radius * sin_theta, y, radius * cos_theta);
            data.vertices.push(Vertex::new(position, normal, [u, v], tangent));
        }
    }
    for j in 0..segments {
        let bottom = 2 * j;
        let top = bottom + 1;
        let next_bottom = bottom + 2;
        let next_top = bottom + 3;
        data.indices
            .extend_from_slice(&[bottom, next_bottom, next_top, bottom, next_top, top]);
    }

    // Caps get their own vertices so the edge stays sharp.
    for (y, normal) in [(half, Vec3::Y), (-half, Vec3::NEG_Y)] {
        let center = data.vertices.len() as u32;
        data.vertices.push(Vertex::new(
            Vec3::new(0.0, y, 0.0),
            normal,
            [0.5, 0.5],
            Vec3::X,
        ));
        // bitangent is normal × X: -Z on the top cap, +Z on the bottom
        let v_sign = -normal.y;
        for j in 0..=segments {
            let theta = 2.0 * PI * j as f32 / segments as f32;
            let (sin_theta, cos_theta) = theta.sin_cos();
            let position = Vec3::new(radius * sin_theta, y, radius * cos_theta);
            let uv = [0.5 + 0.5 * sin_theta, 0.5 + 0.5 * v_sign * cos_theta];
            data.vertices.push(Vertex::new(position, normal, uv, Vec3::X));
        }
        for j in 0..segments {
            let a = center + 1 + j;
            let b = a + 1;
            if normal.y > 0.0 {
                data.indices.extend_from_slice(&[center, a, b]);
            } else {
                data.indices.extend_from_slice(&[center, b, a]);
            }
        }
    }

    data
}

/// Flat plane in XZ facing +Y.
pub fn create_plane(width: f32, depth: f32) -> MeshData {
    let mut data = MeshData::default();
    data.push_quad(Vec3::ZERO, Vec3::X * width * 0.5, Vec3::NEG_Z * depth * 0.5);
    data
}

/// Flat quad in XY facing +Z.
pub fn create_quad(width: f32, height: f32) -> MeshData {
    let mut data = MeshData::default();
    data.push_quad(Vec3::ZERO, Vec3::X * width * 0.5, Vec3::Y * height * 0.5);
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_shapes() -> Vec<(&'static str, MeshData)> {
        vec![
            ("cube", create_cube(1.0, 2.0, 3.0)),
            ("sphere", create_sphere(1.5, 12, 16)),
            ("cylinder", create_cylinder(2.0, 0.75, 10)),
            ("plane", create_plane(4.0, 2.0)),
            ("quad", create_quad(1.0, 1.0)),
        ]
    }

    #[test]
    fn vertex_layout_is_tightly_packed() {
        assert_eq!(mem::size_of::<Vertex>(), 44);
        assert_eq!(mem::offset_of!(Vertex, uv), 24);
        assert_eq!(mem::offset_of!(Vertex, tangent), 32);
    }

    #[test]
    fn normals_and_tangents_form_a_frame() {
        for (name, data) in all_shapes() {
            for v in &data.vertices {
                let n = Vec3::from(v.normal);
                let t = Vec3::from(v.tangent);
                assert!((n.length() - 1.0).abs() < 1e-4, "{name}: normal {n}");
                assert!((t.length() - 1.0).abs() < 1e-4, "{name}: tangent {t}");
                assert!(n.dot(t).abs() < 1e-4, "{name}: {n} not orthogonal to {t}");
            }
        }
    }

    #[test]
    fn indices_stay_in_range() {
        for (name, data) in all_shapes() {
            assert_eq!(data.indices.len() % 3, 0, "{name}");
            let count = data.vertices.len() as u32;
            assert!(data.indices.iter().all(|&i| i < count), "{name}");
        }
    }

    #[test]
    fn triangles_wind_counter_clockwise_from_outside() {
        for (name, data) in all_shapes() {
            for tri in data.indices.chunks(3) {
                let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| data.vertices[i as usize]);
                let (pa, pb, pc) = (Vec3::from(a.position), Vec3::from(b.position), Vec3::from(c.position));
                let face = (pb - pa).cross(pc - pa);
                if face.length() < 1e-6 {
                    // pole triangles collapse to a line
                    continue;
                }
                let outward = Vec3::from(a.normal) + Vec3::from(b.normal) + Vec3::from(c.normal);
                assert!(face.dot(outward) > 0.0, "{name}: triangle {tri:?} faces inward");
            }
        }
    }

    #[test]
    fn tangents_follow_increasing_u() {
        // Along a triangle edge, the change in position projected on the
        // tangent has the same sign as the change in U.
        for (name, data) in all_shapes() {
            for tri in data.indices.chunks(3) {
                let a = data.vertices[tri[0] as usize];
                let b = data.vertices[tri[1] as usize];
                let du = b.uv[0] - a.uv[0];
                let dp = Vec3::from(b.position) - Vec3::from(a.position);
                let along = dp.dot(Vec3::from(a.tangent));
                if du.abs() > 1e-3 && along.abs() > 1e-3 {
                    assert_eq!(du > 0.0, along > 0.0, "{name}: edge {tri:?}");
                }
            }
        }
    }

    #[test]
    fn cube_matches_requested_extents() {
        let data = create_cube(1.0, 2.0, 3.0);
        assert_eq!(data.vertices.len(), 24);
        assert_eq!(data.indices.len(), 36);
        let max = data
            .vertices
            .iter()
            .fold(Vec3::splat(f32::MIN), |m, v| m.max(Vec3::from(v.position)));
        assert_eq!(max, Vec3::new(0.5, 1.0, 1.5));
    }

    #[test]
    fn sphere_vertices_sit_on_the_radius() {
        let data = create_sphere(2.0, 8, 8);
        for v in &data.vertices {
            assert!((Vec3::from(v.position).length() - 2.0).abs() < 1e-4);
        }
    }

    #[test]
    fn flat_shapes_face_their_axis() {
        assert!(create_plane(1.0, 1.0).vertices.iter().all(|v| v.normal == [0.0, 1.0, 0.0]));
        assert!(create_quad(1.0, 1.0).vertices.iter().all(|v| v.normal == [0.0, 0.0, 1.0]));
    }
}
