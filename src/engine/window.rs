use sdl2::video::{GLContext, GLProfile, SwapInterval, Window};
use sdl2::Sdl;

use crate::config::WindowConfig;
use crate::error::RenderError;

pub struct GameWindow {
    _gl_context: GLContext,
    window: Window,
}

impl GameWindow {
    pub fn new(sdl: &Sdl, config: &WindowConfig) -> Result<Self, RenderError> {
        let video = sdl.video().map_err(RenderError::Init)?;

        let gl_attr = video.gl_attr();
        gl_attr.set_context_profile(GLProfile::Core);
        gl_attr.set_context_version(3, 3);
        gl_attr.set_depth_size(24);

        let window = video
            .window(&config.title, config.width, config.height)
            .opengl()
            .resizable()
            .position_centered()
            .build()
            .map_err(|e| RenderError::Init(e.to_string()))?;

        let gl_context = window.gl_create_context().map_err(RenderError::Init)?;

        gl::load_with(|s| video.gl_get_proc_address(s) as *const _);

        let interval = if config.vsync {
            SwapInterval::VSync
        } else {
            SwapInterval::Immediate
        };
        if let Err(err) = video.gl_set_swap_interval(interval) {
            tracing::warn!("could not set swap interval: {err}");
        }

        tracing::info!(width = config.width, height = config.height, "window created");

        Ok(Self {
            _gl_context: gl_context,
            window,
        })
    }

    pub fn swap(&self) {
        self.window.gl_swap_window();
    }

    pub fn size(&self) -> (u32, u32) {
        self.window.drawable_size()
    }

    pub fn aspect_ratio(&self) -> f32 {
        let (w, h) = self.size();
        w as f32 / h.max(1) as f32
    }

    pub fn set_title(&mut self, title: &str) {
        if let Err(err) = self.window.set_title(title) {
            tracing::debug!("window title rejected: {err}");
        }
    }
}
