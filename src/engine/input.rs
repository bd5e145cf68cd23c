use sdl2::event::{Event, WindowEvent};
use sdl2::keyboard::Scancode;
use sdl2::mouse::MouseButton;
use sdl2::EventPump;
use std::collections::HashSet;

/// Discrete input that happened this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    KeyPressed(Scancode),
    /// Auto-repeat of a key that is held down.
    KeyRepeated(Scancode),
    MouseButtonPressed(MouseButton),
    Resized(u32, u32),
}

pub struct InputState {
    pub keys: HashSet<Scancode>,
    pub mouse_dx: f32,
    pub mouse_dy: f32,
    /// Wheel notches this frame, positive away from the user.
    pub scroll_dy: f32,
    pub events: Vec<InputEvent>,
    pub quit: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            keys: HashSet::new(),
            mouse_dx: 0.0,
            mouse_dy: 0.0,
            scroll_dy: 0.0,
            events: Vec::new(),
            quit: false,
        }
    }

    pub fn update(&mut self, event_pump: &mut EventPump) {
        self.begin_frame();

        for event in event_pump.poll_iter() {
            match event {
                Event::Quit { .. } => self.quit = true,
                Event::KeyDown {
                    scancode: Some(sc),
                    repeat,
                    ..
                } => self.key_down(sc, repeat),
                Event::KeyUp {
                    scancode: Some(sc), ..
                } => self.key_up(sc),
                Event::MouseMotion { xrel, yrel, .. } => {
                    self.mouse_dx += xrel as f32;
                    self.mouse_dy += yrel as f32;
                }
                Event::MouseWheel { y, .. } => self.scroll_dy += y as f32,
                Event::MouseButtonDown { mouse_btn, .. } => {
                    self.events.push(InputEvent::MouseButtonPressed(mouse_btn));
                }
                Event::Window {
                    win_event: WindowEvent::SizeChanged(w, h),
                    ..
                } => self
                    .events
                    .push(InputEvent::Resized(w.max(1) as u32, h.max(1) as u32)),
                _ => {}
            }
        }
    }

    fn begin_frame(&mut self) {
        self.mouse_dx = 0.0;
        self.mouse_dy = 0.0;
        self.scroll_dy = 0.0;
        self.events.clear();
    }

    fn key_down(&mut self, sc: Scancode, repeat: bool) {
        if sc == Scancode::Escape {
            self.quit = true;
            return;
        }
        self.keys.insert(sc);
        self.events.push(if repeat {
            InputEvent::KeyRepeated(sc)
        } else {
            InputEvent::KeyPressed(sc)
        });
    }

    fn key_up(&mut self, sc: Scancode) {
        self.keys.remove(&sc);
    }

    pub fn is_key_held(&self, sc: Scancode) -> bool {
        self.keys.contains(&sc)
    }

    /// -1, 0 or 1 depending on which of the two keys are held.
    pub fn axis(&self, positive: Scancode, negative: Scancode) -> f32 {
        let mut axis = 0.0;
        if self.is_key_held(positive) {
            axis += 1.0;
        }
        if self.is_key_held(negative) {
            axis -= 1.0;
        }
        axis
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }
}
