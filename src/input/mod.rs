pub mod controller;
pub mod handler;

pub use controller::{swipe_direction, InputController, Intent};
pub use handler::{InputAction, InputHandler};
