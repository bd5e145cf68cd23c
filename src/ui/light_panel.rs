//! Keyboard-driven editor for the lights.
//!
//! Up/Down pick a field, Left/Right change it, Tab hides the panel. Every
//! edit is clamped to the field's range before it reaches the registry.

use sdl2::keyboard::Scancode;

use crate::engine::input::InputEvent;
use crate::lighting::LightRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelField {
    ColorR,
    ColorG,
    ColorB,
    PositionX,
    PositionY,
    PositionZ,
    Intensity,
    Radius,
    LightOn,
    DirectionalOn,
    SpotOn,
    NormalIntensity,
    MinBias,
    MaxBias,
    RotateShapes,
}

impl PanelField {
    pub const ALL: [PanelField; 15] = [
        PanelField::ColorR,
        PanelField::ColorG,
        PanelField::ColorB,
        PanelField::PositionX,
        PanelField::PositionY,
        PanelField::PositionZ,
        PanelField::Intensity,
        PanelField::Radius,
        PanelField::LightOn,
        PanelField::DirectionalOn,
        PanelField::SpotOn,
        PanelField::NormalIntensity,
        PanelField::MinBias,
        PanelField::MaxBias,
        PanelField::RotateShapes,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PanelField::ColorR => "Light Color R",
            PanelField::ColorG => "Light Color G",
            PanelField::ColorB => "Light Color B",
            PanelField::PositionX => "Light Position X",
            PanelField::PositionY => "Light Position Y",
            PanelField::PositionZ => "Light Position Z",
            PanelField::Intensity => "Light Intensity",
            PanelField::Radius => "Light Radius",
            PanelField::LightOn => "Light On",
            PanelField::DirectionalOn => "Directional On",
            PanelField::SpotOn => "Spot On",
            PanelField::NormalIntensity => "Normal Intensity",
            PanelField::MinBias => "Min Bias",
            PanelField::MaxBias => "Max Bias",
            PanelField::RotateShapes => "Rotate Shapes",
        }
    }

    /// Range shown by the value bar. Positions are unbounded; the bar only
    /// covers the room.
    fn range(self) -> (f32, f32) {
        match self {
            PanelField::ColorR | PanelField::ColorG | PanelField::ColorB => (0.0, 1.0),
            PanelField::PositionX | PanelField::PositionY | PanelField::PositionZ => (-7.0, 7.0),
            PanelField::Intensity | PanelField::NormalIntensity => (0.0, 1.0),
            PanelField::Radius => (0.0, 15.0),
            PanelField::MinBias | PanelField::MaxBias => (0.0, 0.05),
            PanelField::LightOn
            | PanelField::DirectionalOn
            | PanelField::SpotOn
            | PanelField::RotateShapes => (0.0, 1.0),
        }
    }

    fn step(self) -> f32 {
        match self {
            PanelField::ColorR | PanelField::ColorG | PanelField::ColorB => 0.05,
            PanelField::PositionX | PanelField::PositionY | PanelField::PositionZ => 0.1,
            PanelField::Intensity | PanelField::NormalIntensity => 0.05,
            PanelField::Radius => 0.5,
            PanelField::MinBias | PanelField::MaxBias => 0.001,
            _ => 1.0,
        }
    }

    fn is_toggle(self) -> bool {
        matches!(
            self,
            PanelField::LightOn
                | PanelField::DirectionalOn
                | PanelField::SpotOn
                | PanelField::RotateShapes
        )
    }
}

/// State the panel edits besides the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DemoToggles {
    pub rotate_shapes: bool,
}

/// One line of the panel as the overlay draws it.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelRow {
    pub field: PanelField,
    /// Position of the value within the field's range, 0..=1.
    pub fill: f32,
    pub selected: bool,
}

pub struct LightPanel {
    selected: usize,
    visible: bool,
}

impl LightPanel {
    pub fn new() -> Self {
        Self {
            selected: 0,
            visible: true,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn selected(&self) -> PanelField {
        PanelField::ALL[self.selected]
    }

    /// Apply this frame's key events. Returns true if anything changed.
    pub fn handle_input(
        &mut self,
        events: &[InputEvent],
        registry: &mut LightRegistry,
        toggles: &mut DemoToggles,
    ) -> bool {
        let mut changed = false;
        for event in events {
            let (key, repeat) = match *event {
                InputEvent::KeyPressed(key) => (key, false),
                InputEvent::KeyRepeated(key) => (key, true),
                _ => continue,
            };
            match key {
                Scancode::Tab if !repeat => {
                    self.visible = !self.visible;
                    changed = true;
                }
                _ if !self.visible => {}
                Scancode::Up => {
                    self.selected = (self.selected + PanelField::ALL.len() - 1) % PanelField::ALL.len();
                    changed = true;
                }
                Scancode::Down => {
                    self.selected = (self.selected + 1) % PanelField::ALL.len();
                    changed = true;
                }
                Scancode::Left | Scancode::Right => {
                    let field = self.selected();
                    if field.is_toggle() && repeat {
                        continue;
                    }
                    let direction = if key == Scancode::Right { 1.0 } else { -1.0 };
                    adjust(field, direction, registry, toggles);
                    changed = true;
                }
                _ => {}
            }
        }
        changed
    }

    pub fn rows(&self, registry: &LightRegistry, toggles: &DemoToggles) -> Vec<PanelRow> {
        PanelField::ALL
            .iter()
            .enumerate()
            .map(|(i, &field)| {
                let value = read(field, registry, toggles);
                let (lo, hi) = field.range();
                PanelRow {
                    field,
                    fill: ((value - lo) / (hi - lo)).clamp(0.0, 1.0),
                    selected: i == self.selected,
                }
            })
            .collect()
    }

    /// Name and value of the selected field, for the window title.
    pub fn status_line(&self, registry: &LightRegistry, toggles: &DemoToggles) -> String {
        let field = self.selected();
        let value = read(field, registry, toggles);
        if field.is_toggle() {
            let state = if value > 0.5 { "on" } else { "off" };
            format!("{}: {}", field.label(), state)
        } else if matches!(field, PanelField::MinBias | PanelField::MaxBias) {
            format!("{}: {:.3}", field.label(), value)
        } else {
            format!("{}: {:.2}", field.label(), value)
        }
    }
}

fn read(field: PanelField, registry: &LightRegistry, toggles: &DemoToggles) -> f32 {
    let light = registry.shadow_caster();
    let flag = |b: bool| if b { 1.0 } else { 0.0 };
    match field {
        PanelField::ColorR => light.color.x,
        PanelField::ColorG => light.color.y,
        PanelField::ColorB => light.color.z,
        PanelField::PositionX => light.position.x,
        PanelField::PositionY => light.position.y,
        PanelField::PositionZ => light.position.z,
        PanelField::Intensity => light.intensity,
        PanelField::Radius => light.radius,
        PanelField::LightOn => flag(light.is_on),
        PanelField::DirectionalOn => flag(registry.directional[0].is_on),
        PanelField::SpotOn => flag(registry.spot[0].is_on),
        PanelField::NormalIntensity => registry.normal_intensity,
        PanelField::MinBias => registry.bias.min(),
        PanelField::MaxBias => registry.bias.max(),
        PanelField::RotateShapes => flag(toggles.rotate_shapes),
    }
}

fn adjust(field: PanelField, direction: f32, registry: &mut LightRegistry, toggles: &mut DemoToggles) {
    let (lo, hi) = field.range();
    let delta = field.step() * direction;
    let clamped = |v: f32| (v + delta).clamp(lo, hi);

    match field {
        PanelField::ColorR => {
            let light = registry.shadow_caster_mut();
            light.color.x = clamped(light.color.x);
        }
        PanelField::ColorG => {
            let light = registry.shadow_caster_mut();
            light.color.y = clamped(light.color.y);
        }
        PanelField::ColorB => {
            let light = registry.shadow_caster_mut();
            light.color.z = clamped(light.color.z);
        }
        // Unbounded, like a drag field.
        PanelField::PositionX => registry.shadow_caster_mut().position.x += delta,
        PanelField::PositionY => registry.shadow_caster_mut().position.y += delta,
        PanelField::PositionZ => registry.shadow_caster_mut().position.z += delta,
        PanelField::Intensity => {
            let light = registry.shadow_caster_mut();
            light.intensity = clamped(light.intensity);
        }
        PanelField::Radius => {
            let light = registry.shadow_caster_mut();
            light.radius = clamped(light.radius);
        }
        PanelField::LightOn => {
            let light = registry.shadow_caster_mut();
            light.is_on = !light.is_on;
        }
        PanelField::DirectionalOn => {
            registry.directional[0].is_on = !registry.directional[0].is_on;
        }
        PanelField::SpotOn => registry.spot[0].is_on = !registry.spot[0].is_on,
        PanelField::NormalIntensity => {
            registry.normal_intensity = clamped(registry.normal_intensity);
        }
        PanelField::MinBias => {
            let value = clamped(registry.bias.min());
            registry.bias.set_min(value);
        }
        PanelField::MaxBias => {
            let value = clamped(registry.bias.max());
            registry.bias.set_max(value);
        }
        PanelField::RotateShapes => toggles.rotate_shapes = !toggles.rotate_shapes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn select(panel: &mut LightPanel, field: PanelField) {
        panel.selected = PanelField::ALL.iter().position(|&f| f == field).unwrap();
    }

    fn press(panel: &mut LightPanel, key: Scancode, times: usize, registry: &mut LightRegistry, toggles: &mut DemoToggles) {
        let events = vec![InputEvent::KeyPressed(key); times];
        panel.handle_input(&events, registry, toggles);
    }

    #[test]
    fn selection_wraps_both_ways() {
        let mut panel = LightPanel::new();
        let mut registry = LightRegistry::default();
        let mut toggles = DemoToggles::default();
        press(&mut panel, Scancode::Up, 1, &mut registry, &mut toggles);
        assert_eq!(panel.selected(), PanelField::RotateShapes);
        press(&mut panel, Scancode::Down, 1, &mut registry, &mut toggles);
        assert_eq!(panel.selected(), PanelField::ColorR);
    }

    #[test]
    fn intensity_and_radius_stay_in_range() {
        let mut panel = LightPanel::new();
        let mut registry = LightRegistry::default();
        let mut toggles = DemoToggles::default();

        select(&mut panel, PanelField::Intensity);
        press(&mut panel, Scancode::Right, 5, &mut registry, &mut toggles);
        assert_eq!(registry.shadow_caster().intensity, 1.0);

        select(&mut panel, PanelField::Radius);
        press(&mut panel, Scancode::Right, 10, &mut registry, &mut toggles);
        assert_eq!(registry.shadow_caster().radius, 15.0);
        press(&mut panel, Scancode::Left, 100, &mut registry, &mut toggles);
        assert_eq!(registry.shadow_caster().radius, 0.0);
    }

    #[test]
    fn color_channels_clamp_to_unit_range() {
        let mut panel = LightPanel::new();
        let mut registry = LightRegistry::default();
        let mut toggles = DemoToggles::default();
        select(&mut panel, PanelField::ColorG);
        press(&mut panel, Scancode::Left, 40, &mut registry, &mut toggles);
        assert_eq!(registry.shadow_caster().color.y, 0.0);
        assert_eq!(registry.shadow_caster().color.x, 1.0);
    }

    #[test]
    fn min_bias_cannot_pass_max_bias() {
        let mut panel = LightPanel::new();
        let mut registry = LightRegistry::default();
        let mut toggles = DemoToggles::default();

        select(&mut panel, PanelField::MinBias);
        press(&mut panel, Scancode::Right, 30, &mut registry, &mut toggles);
        assert!(registry.bias.min() <= registry.bias.max());
        assert!((registry.bias.min() - registry.bias.max()).abs() < 1e-6);

        select(&mut panel, PanelField::MaxBias);
        press(&mut panel, Scancode::Left, 30, &mut registry, &mut toggles);
        assert!(registry.bias.min() <= registry.bias.max());

        press(&mut panel, Scancode::Right, 100, &mut registry, &mut toggles);
        assert!(registry.bias.max() <= 0.05 + 1e-6);
    }

    #[test]
    fn toggles_flip_once_per_press_and_ignore_repeats() {
        let mut panel = LightPanel::new();
        let mut registry = LightRegistry::default();
        let mut toggles = DemoToggles::default();

        select(&mut panel, PanelField::SpotOn);
        let events = [
            InputEvent::KeyPressed(Scancode::Right),
            InputEvent::KeyRepeated(Scancode::Right),
            InputEvent::KeyRepeated(Scancode::Right),
        ];
        panel.handle_input(&events, &mut registry, &mut toggles);
        assert!(registry.spot[0].is_on);

        select(&mut panel, PanelField::RotateShapes);
        press(&mut panel, Scancode::Left, 1, &mut registry, &mut toggles);
        assert!(toggles.rotate_shapes);
    }

    #[test]
    fn position_steps_are_unbounded() {
        let mut panel = LightPanel::new();
        let mut registry = LightRegistry::default();
        let mut toggles = DemoToggles::default();
        select(&mut panel, PanelField::PositionY);
        press(&mut panel, Scancode::Right, 100, &mut registry, &mut toggles);
        assert!((registry.shadow_caster().position.y - 10.0).abs() < 1e-3);
    }

    #[test]
    fn hidden_panel_ignores_edits() {
        let mut panel = LightPanel::new();
        let mut registry = LightRegistry::default();
        let mut toggles = DemoToggles::default();
        press(&mut panel, Scancode::Tab, 1, &mut registry, &mut toggles);
        assert!(!panel.is_visible());
        select(&mut panel, PanelField::LightOn);
        press(&mut panel, Scancode::Right, 1, &mut registry, &mut toggles);
        assert!(registry.shadow_caster().is_on);
        press(&mut panel, Scancode::Tab, 1, &mut registry, &mut toggles);
        assert!(panel.is_visible());
    }

    #[test]
    fn rows_report_fill_and_selection() {
        let mut panel = LightPanel::new();
        select(&mut panel, PanelField::Radius);
        let rows = panel.rows(&LightRegistry::default(), &DemoToggles::default());
        assert_eq!(rows.len(), PanelField::ALL.len());
        let radius = rows.iter().find(|r| r.field == PanelField::Radius).unwrap();
        assert!(radius.selected);
        assert_eq!(radius.fill, 1.0);
        assert_eq!(rows.iter().filter(|r| r.selected).count(), 1);
    }

    #[test]
    fn status_line_names_the_selected_field() {
        let mut panel = LightPanel::new();
        let registry = LightRegistry::default();
        let toggles = DemoToggles::default();
        select(&mut panel, PanelField::Radius);
        assert_eq!(panel.status_line(&registry, &toggles), "Light Radius: 15.00");
        select(&mut panel, PanelField::MinBias);
        assert_eq!(panel.status_line(&registry, &toggles), "Min Bias: 0.005");
        select(&mut panel, PanelField::DirectionalOn);
        assert_eq!(panel.status_line(&registry, &toggles), "Directional On: off");
    }
}
