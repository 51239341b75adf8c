pub mod overlay;

pub use overlay::{render_overlay, save_overlay, OverlayStyle};
