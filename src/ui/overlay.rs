use gl::types::*;
use glam::Mat4;
use std::mem;

use crate::error::RenderError;
use crate::renderer::shader::ShaderProgram;
use crate::ui::light_panel::PanelRow;

const QUAD_VERT_SRC: &str = include_str!("../../shaders/quad.vert");
const QUAD_FRAG_SRC: &str = include_str!("../../shaders/quad.frag");

const MARGIN: f32 = 12.0;
const ROW_HEIGHT: f32 = 14.0;
const ROW_GAP: f32 = 4.0;
const BAR_WIDTH: f32 = 180.0;

const BACKGROUND: [f32; 4] = [0.0, 0.0, 0.0, 0.55];
const TRACK: [f32; 4] = [0.25, 0.25, 0.28, 0.9];
const FILL: [f32; 4] = [0.55, 0.6, 0.7, 0.95];
const FILL_SELECTED: [f32; 4] = [1.0, 0.9, 0.2, 1.0];

/// Screen-space rectangle in pixels, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

/// Background, track and fill rectangles for every panel row.
pub fn layout(rows: &[PanelRow]) -> Vec<(Rect, [f32; 4])> {
    let mut quads = Vec::with_capacity(rows.len() * 2 + 1);
    let height = rows.len() as f32 * (ROW_HEIGHT + ROW_GAP) - ROW_GAP + 2.0 * MARGIN;
    quads.push((
        Rect {
            x: MARGIN,
            y: MARGIN,
            w: BAR_WIDTH + 2.0 * MARGIN,
            h: height.max(0.0),
        },
        BACKGROUND,
    ));
    for (i, row) in rows.iter().enumerate() {
        let track = Rect {
            x: 2.0 * MARGIN,
            y: 2.0 * MARGIN + i as f32 * (ROW_HEIGHT + ROW_GAP),
            w: BAR_WIDTH,
            h: ROW_HEIGHT,
        };
        quads.push((track, TRACK));
        let fill = Rect {
            w: BAR_WIDTH * row.fill.clamp(0.0, 1.0),
            ..track
        };
        quads.push((fill, if row.selected { FILL_SELECTED } else { FILL }));
    }
    quads
}

/// Flat-colored 2D quads drawn over the finished frame.
pub struct Overlay {
    shader: ShaderProgram,
    vao: GLuint,
    vbo: GLuint,
}

impl Overlay {
    pub fn new() -> Result<Self, RenderError> {
        let shader = ShaderProgram::from_sources(QUAD_VERT_SRC, QUAD_FRAG_SRC)?;

        let mut vao: GLuint = 0;
        let mut vbo: GLuint = 0;

        unsafe {
            gl::GenVertexArrays(1, &mut vao);
            gl::GenBuffers(1, &mut vbo);

            gl::BindVertexArray(vao);
            gl::BindBuffer(gl::ARRAY_BUFFER, vbo);
            // One quad at a time (6 vertices * 2 floats)
            gl::BufferData(
                gl::ARRAY_BUFFER,
                (12 * mem::size_of::<f32>()) as GLsizeiptr,
                std::ptr::null(),
                gl::DYNAMIC_DRAW,
            );

            let stride = (2 * mem::size_of::<f32>()) as GLsizei;
            gl::EnableVertexAttribArray(0);
            gl::VertexAttribPointer(0, 2, gl::FLOAT, gl::FALSE, stride, std::ptr::null());

            gl::BindVertexArray(0);
        }

        Ok(Self { shader, vao, vbo })
    }

    pub fn draw_panel(&mut self, rows: &[PanelRow], width: u32, height: u32) {
        let projection =
            Mat4::orthographic_rh_gl(0.0, width as f32, height as f32, 0.0, -1.0, 1.0);

        // The y-flipped projection reverses winding, and the panel sits on
        // top of everything.
        unsafe {
            gl::Disable(gl::DEPTH_TEST);
            gl::Disable(gl::CULL_FACE);
        }

        self.shader.bind();
        self.shader.set_mat4("u_projection", &projection);
        for (rect, color) in layout(rows) {
            self.draw_quad(rect, color);
        }

        unsafe {
            gl::Enable(gl::CULL_FACE);
            gl::Enable(gl::DEPTH_TEST);
        }
    }

    fn draw_quad(&mut self, rect: Rect, color: [f32; 4]) {
        let Rect { x, y, w, h } = rect;
        #[rustfmt::skip]
        let vertices: [f32; 12] = [
            x,     y,
            x + w, y,
            x + w, y + h,
            x,     y,
            x + w, y + h,
            x,     y + h,
        ];

        self.shader.set_vec4("u_color", color);
        unsafe {
            gl::BindVertexArray(self.vao);
            gl::BindBuffer(gl::ARRAY_BUFFER, self.vbo);
            gl::BufferSubData(
                gl::ARRAY_BUFFER,
                0,
                mem::size_of_val(&vertices) as GLsizeiptr,
                vertices.as_ptr() as *const _,
            );

            gl::DrawArrays(gl::TRIANGLES, 0, 6);
            gl::BindVertexArray(0);
        }
    }
}

impl Drop for Overlay {
    fn drop(&mut self) {
        unsafe {
            gl::DeleteVertexArrays(1, &self.vao);
            gl::DeleteBuffers(1, &self.vbo);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lighting::LightRegistry;
    use crate::ui::light_panel::{DemoToggles, LightPanel};

    #[test]
    fn one_background_plus_two_quads_per_row() {
        let rows = LightPanel::new().rows(&LightRegistry::default(), &DemoToggles::default());
        let quads = layout(&rows);
        assert_eq!(quads.len(), 1 + 2 * rows.len());
    }

    #[test]
    fn fill_width_tracks_the_value() {
        let rows = LightPanel::new().rows(&LightRegistry::default(), &DemoToggles::default());
        let quads = layout(&rows);
        for (i, row) in rows.iter().enumerate() {
            let (track, _) = quads[1 + 2 * i];
            let (fill, color) = quads[2 + 2 * i];
            assert_eq!(fill.x, track.x);
            assert!((fill.w - track.w * row.fill).abs() < 1e-4);
            assert_eq!(color == FILL_SELECTED, row.selected);
        }
    }

    #[test]
    fn rows_stack_inside_the_background() {
        let rows = LightPanel::new().rows(&LightRegistry::default(), &DemoToggles::default());
        let quads = layout(&rows);
        let (background, _) = quads[0];
        let (last_track, _) = quads[quads.len() - 2];
        assert!(last_track.y + last_track.h <= background.y + background.h + 1e-3);
    }
}
