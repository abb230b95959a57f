pub mod renderer;
pub mod view;

pub use renderer::Renderer;
pub use view::{Overlay, TerminalView};
