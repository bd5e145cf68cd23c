use crate::camera::Camera;
use crate::config::DemoConfig;
use crate::engine::input::{InputEvent, InputState};
use crate::engine::time::FrameTimer;
use crate::engine::window::GameWindow;
use crate::error::RenderError;
use crate::lighting::LightRegistry;
use crate::renderer::{FrameView, Renderer};
use crate::scene::demo::{load_demo_scene, ShapeMeshes};
use crate::scene::Scene;
use crate::systems::{orbit_system, transform_system};
use crate::ui::{DemoToggles, LightPanel, Overlay};
use sdl2::keyboard::Scancode;
use sdl2::mouse::MouseButton;
use sdl2::Sdl;

pub struct LightingApp {
    scene: Scene,
    shapes: ShapeMeshes,
    registry: LightRegistry,
    toggles: DemoToggles,
    camera: Camera,
    renderer: Renderer,
    panel: LightPanel,
    overlay: Overlay,
    wireframe: bool,
    mouse_captured: bool,
    base_title: String,
    title: String,
}

impl LightingApp {
    /// Needs a current GL context.
    pub fn new(config: &DemoConfig, window: &GameWindow) -> Result<Self, RenderError> {
        let mut renderer = Renderer::init(config)?;
        let (w, h) = window.size();
        renderer.set_viewport(w, h);

        let (scene, shapes) = load_demo_scene();
        let registry = config.lights.clone();
        tracing::info!(
            lights = registry.enabled_count(),
            shadows = renderer.shadows_enabled(),
            "lighting demo ready"
        );

        Ok(Self {
            scene,
            shapes,
            registry,
            toggles: DemoToggles {
                rotate_shapes: config.rotate_shapes,
            },
            camera: Camera::new(),
            renderer,
            panel: LightPanel::new(),
            overlay: Overlay::new()?,
            wireframe: false,
            mouse_captured: true,
            base_title: config.window.title.clone(),
            title: String::new(),
        })
    }

    pub fn run(&mut self, sdl: &Sdl, window: &mut GameWindow) -> Result<(), RenderError> {
        sdl.mouse().set_relative_mouse_mode(self.mouse_captured);
        let mut event_pump = sdl.event_pump().map_err(RenderError::Init)?;
        let mut input = InputState::new();
        let mut timer = FrameTimer::new();

        loop {
            timer.tick();
            input.update(&mut event_pump);

            if input.should_quit() {
                break;
            }

            self.handle_input(&input, sdl, window, timer.dt);
            self.update_systems(timer.dt);
            self.render(window);
            self.update_title(window);

            window.swap();
        }

        tracing::info!("shutting down");
        Ok(())
    }

    fn handle_input(&mut self, input: &InputState, sdl: &Sdl, window: &GameWindow, dt: f32) {
        for event in &input.events {
            match event {
                InputEvent::Resized(logical_w, logical_h) => {
                    // Drawable size differs from the logical size on HiDPI.
                    let (w, h) = window.size();
                    tracing::debug!(logical_w, logical_h, w, h, "window resized");
                    self.renderer.set_viewport(w, h);
                }
                InputEvent::MouseButtonPressed(MouseButton::Right) => {
                    self.mouse_captured = !self.mouse_captured;
                    sdl.mouse().set_relative_mouse_mode(self.mouse_captured);
                }
                InputEvent::KeyPressed(Scancode::R) => self.camera.reset(),
                InputEvent::KeyPressed(Scancode::Num1) => {
                    self.wireframe = !self.wireframe;
                    self.renderer.set_wireframe(self.wireframe);
                }
                _ => {}
            }
        }

        self.panel
            .handle_input(&input.events, &mut self.registry, &mut self.toggles);

        if self.mouse_captured {
            self.camera.look(input.mouse_dx, input.mouse_dy);
        }
        if input.scroll_dy != 0.0 {
            self.camera.zoom(input.scroll_dy);
        }
        self.camera.move_wasd(input, dt);
    }

    fn update_systems(&mut self, dt: f32) {
        if self.toggles.rotate_shapes {
            orbit_system(&mut self.scene.world, dt);
        }
        transform_system(&mut self.scene.world);
    }

    fn render(&mut self, window: &GameWindow) {
        let view = FrameView {
            view: self.camera.view_matrix(),
            projection: self.camera.projection_matrix(window.aspect_ratio()),
            camera_position: self.camera.position,
        };
        self.renderer
            .render_frame(&self.registry, &self.scene, &view, self.shapes.sphere);

        if self.panel.is_visible() {
            let (w, h) = window.size();
            let rows = self.panel.rows(&self.registry, &self.toggles);
            self.overlay.draw_panel(&rows, w, h);
        }
    }

    fn update_title(&mut self, window: &mut GameWindow) {
        let title = if self.panel.is_visible() {
            format!(
                "{} | {}",
                self.base_title,
                self.panel.status_line(&self.registry, &self.toggles)
            )
        } else {
            self.base_title.clone()
        };
        if title != self.title {
            window.set_title(&title);
            self.title = title;
        }
    }
}
