pub mod light_panel;
pub mod overlay;

pub use light_panel::{DemoToggles, LightPanel};
pub use overlay::Overlay;
