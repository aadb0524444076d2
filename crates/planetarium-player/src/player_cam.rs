//! Free-flight camera with throttle-scaled movement and mouse-locked look.

use glam::{Quat, Vec2, Vec3};
use planetarium_config::CameraConfig;
use tracing::debug;

use crate::input::{InputAction, InputAxis};

/// The player's camera pawn.
///
/// Translation input accumulates over a frame along the camera's local axes
/// and is applied once in [`tick`](Self::tick). Rotation is applied
/// immediately. Pitch and yaw only respond while the camera is locked.
#[derive(Clone, Debug)]
pub struct PlayerCam {
    pub position: Vec3,
    pub rotation: Quat,
    /// Translation requested this frame, in world space.
    pub movement_input: Vec3,
    /// Exponent applied to `base_speed`.
    pub current_throttle: f32,
    pub base_speed: f32,
    pub camera_locked: bool,
    /// Cursor position captured when the camera was locked.
    pub mouse_pos: Vec2,
    pub cursor_visible: bool,
}

impl Default for PlayerCam {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            movement_input: Vec3::ZERO,
            current_throttle: 1.0,
            base_speed: 1.2,
            camera_locked: false,
            mouse_pos: Vec2::ZERO,
            cursor_visible: true,
        }
    }
}

impl PlayerCam {
    pub fn from_config(config: &CameraConfig) -> Self {
        Self {
            position: Vec3::from_array(config.start_position),
            base_speed: config.base_speed,
            ..Self::default()
        }
    }

    /// Distance moved per tick for one unit of input: `base_speed ^ throttle`.
    pub fn current_speed(&self) -> f32 {
        self.base_speed.powf(self.current_throttle)
    }

    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Rotate about a local axis by `degrees`.
    fn rotate_local(&mut self, axis: Vec3, degrees: f32) {
        if degrees == 0.0 {
            return;
        }
        self.rotation = (self.rotation * Quat::from_axis_angle(axis, degrees.to_radians())).normalize();
    }

    /// Feed one frame's value for `axis`. Rotation values are in degrees.
    pub fn handle_axis(&mut self, axis: InputAxis, value: f32) {
        match axis {
            InputAxis::TranslateForward => self.movement_input += self.forward() * value,
            InputAxis::TranslateRight => self.movement_input += self.right() * value,
            InputAxis::TranslateUp => self.movement_input += self.up() * value,
            InputAxis::Roll => self.rotate_local(Vec3::NEG_Z, value),
            InputAxis::Pitch if self.camera_locked => self.rotate_local(Vec3::X, value),
            InputAxis::Yaw if self.camera_locked => self.rotate_local(Vec3::Y, value),
            InputAxis::Pitch | InputAxis::Yaw => {}
            InputAxis::Throttle => self.current_throttle += value,
        }
    }

    /// Press or release an action. `mouse` is the cursor position at the time.
    pub fn handle_action(&mut self, action: InputAction, pressed: bool, mouse: Vec2) {
        match (action, pressed) {
            (InputAction::CamLock, true) => self.lock_camera(mouse),
            (InputAction::CamLock, false) => self.unlock_camera(),
        }
    }

    /// Hide the cursor and remember where it was.
    pub fn lock_camera(&mut self, mouse: Vec2) {
        self.camera_locked = true;
        self.cursor_visible = false;
        self.mouse_pos = mouse;
        debug!(x = mouse.x, y = mouse.y, "Camera locked");
    }

    pub fn unlock_camera(&mut self) {
        self.camera_locked = false;
        self.cursor_visible = true;
        debug!("Camera unlocked");
    }

    /// Apply this frame's movement and clear it.
    ///
    /// While locked, returns the cursor position to warp the mouse back to.
    pub fn tick(&mut self) -> Option<Vec2> {
        self.position += self.movement_input * self.current_speed();
        self.movement_input = Vec3::ZERO;
        self.camera_locked.then_some(self.mouse_pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn test_speed_is_base_to_throttle() {
        let mut cam = PlayerCam::default();
        assert!((cam.current_speed() - 1.2).abs() < 1e-6);
        cam.handle_axis(InputAxis::Throttle, 2.0);
        assert_eq!(cam.current_throttle, 3.0);
        assert!((cam.current_speed() - 1.728).abs() < 1e-5);
        cam.handle_axis(InputAxis::Throttle, -3.0);
        assert_eq!(cam.current_speed(), 1.0);
    }

    #[test]
    fn test_forward_input_moves_along_view() {
        let mut cam = PlayerCam::default();
        cam.handle_axis(InputAxis::TranslateForward, 1.0);
        let warp = cam.tick();
        assert!(approx(cam.position, Vec3::new(0.0, 0.0, -1.2)));
        assert_eq!(cam.movement_input, Vec3::ZERO, "input resets after tick");
        assert_eq!(warp, None);
    }

    #[test]
    fn test_translation_accumulates_within_frame() {
        let mut cam = PlayerCam {
            base_speed: 2.0,
            ..PlayerCam::default()
        };
        cam.handle_axis(InputAxis::TranslateRight, 1.0);
        cam.handle_axis(InputAxis::TranslateUp, 0.5);
        cam.handle_axis(InputAxis::TranslateRight, 1.0);
        cam.tick();
        assert!(approx(cam.position, Vec3::new(4.0, 1.0, 0.0)));
    }

    #[test]
    fn test_look_requires_lock() {
        let mut cam = PlayerCam::default();
        cam.handle_axis(InputAxis::Yaw, 90.0);
        cam.handle_axis(InputAxis::Pitch, 45.0);
        assert_eq!(cam.rotation, Quat::IDENTITY);

        cam.lock_camera(Vec2::new(320.0, 240.0));
        cam.handle_axis(InputAxis::Yaw, 90.0);
        assert!(approx(cam.forward(), Vec3::NEG_X), "forward {}", cam.forward());
    }

    #[test]
    fn test_roll_always_applies() {
        let mut cam = PlayerCam::default();
        cam.handle_axis(InputAxis::Roll, 90.0);
        assert!(approx(cam.forward(), Vec3::NEG_Z));
        assert!(approx(cam.up(), Vec3::X), "up {}", cam.up());
    }

    #[test]
    fn test_translation_follows_rotation() {
        let mut cam = PlayerCam::default();
        cam.lock_camera(Vec2::ZERO);
        cam.handle_axis(InputAxis::Pitch, 90.0);
        cam.handle_axis(InputAxis::TranslateForward, 1.0);
        cam.base_speed = 1.0;
        cam.tick();
        assert!(approx(cam.position, Vec3::Y), "pitched up, got {}", cam.position);
    }

    #[test]
    fn test_lock_hides_cursor_and_warps_back() {
        let mut cam = PlayerCam::default();
        cam.handle_action(InputAction::CamLock, true, Vec2::new(10.0, 20.0));
        assert!(cam.camera_locked);
        assert!(!cam.cursor_visible);
        assert_eq!(cam.tick(), Some(Vec2::new(10.0, 20.0)));

        cam.handle_action(InputAction::CamLock, false, Vec2::new(99.0, 99.0));
        assert!(cam.cursor_visible);
        assert_eq!(cam.tick(), None);
    }

    #[test]
    fn test_from_config() {
        let cam = PlayerCam::from_config(&CameraConfig::default());
        assert_eq!(cam.position, Vec3::new(0.0, -400_000.0, 0.0));
        assert_eq!(cam.base_speed, 1.2);
        assert_eq!(cam.current_throttle, 1.0);
    }
}
