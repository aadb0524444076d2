//! The planetarium's free-flight player camera.

mod input;
mod player_cam;

pub use input::{InputAction, InputAxis};
pub use player_cam::PlayerCam;
