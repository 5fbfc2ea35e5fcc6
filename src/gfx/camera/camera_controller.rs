use winit::{
    dpi::PhysicalPosition,
    event::{DeviceEvent, ElementState, KeyEvent, MouseButton, MouseScrollDelta},
    keyboard::{KeyCode, PhysicalKey},
};

use super::orbit_camera::OrbitCamera;

/// Turns raw pointer motion into orbit, pan and zoom on an [`OrbitCamera`].
///
/// Left drag orbits, right/middle drag (or shift + left drag) pans, the wheel zooms.
/// While [`set_suppressed`](Self::set_suppressed) is on, all pointer input is ignored so a
/// gizmo drag never moves the camera at the same time.
#[derive(Debug, Clone)]
pub struct CameraController {
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    /// Fraction of orbit velocity shed per 60 Hz frame; 0 disables damping.
    pub damping: f32,
    pub auto_rotate: bool,
    /// Auto-rotate yaw rate in radians per second.
    pub auto_rotate_speed: f32,
    is_shift_held: bool,
    is_orbit_pressed: bool,
    is_pan_pressed: bool,
    suppressed: bool,
    yaw_velocity: f32,
    pitch_velocity: f32,
}

impl CameraController {
    pub fn new(rotate_speed: f32, zoom_speed: f32) -> Self {
        Self {
            rotate_speed,
            zoom_speed,
            pan_speed: 0.01,
            damping: 0.0,
            auto_rotate: false,
            auto_rotate_speed: 0.6,
            is_shift_held: false,
            is_orbit_pressed: false,
            is_pan_pressed: false,
            suppressed: false,
            yaw_velocity: 0.0,
            pitch_velocity: 0.0,
        }
    }

    /// Track button state from window events.
    pub fn process_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        let pressed = state == ElementState::Pressed;
        match button {
            MouseButton::Left => self.is_orbit_pressed = pressed,
            MouseButton::Right | MouseButton::Middle => self.is_pan_pressed = pressed,
            _ => (),
        }
    }

    /// Apply raw device motion. Returns true when the camera moved.
    pub fn process_events(&mut self, event: &DeviceEvent, camera: &mut OrbitCamera) -> bool {
        if self.suppressed {
            return false;
        }

        match event {
            DeviceEvent::MouseWheel { delta } => {
                let scroll_amount = -match delta {
                    MouseScrollDelta::LineDelta(_, scroll) => *scroll,
                    MouseScrollDelta::PixelDelta(PhysicalPosition { y: scroll, .. }) => {
                        *scroll as f32 * 0.05
                    }
                };
                camera.add_distance(scroll_amount * self.zoom_speed);
                true
            }
            DeviceEvent::MouseMotion { delta } => {
                let (dx, dy) = (delta.0 as f32, delta.1 as f32);
                if self.is_pan_pressed || (self.is_orbit_pressed && self.is_shift_held) {
                    camera.pan((-dx * self.pan_speed, dy * self.pan_speed));
                    true
                } else if self.is_orbit_pressed {
                    let (yaw, pitch) = (-dx * self.rotate_speed, dy * self.rotate_speed);
                    if self.damping > 0.0 {
                        self.yaw_velocity += yaw;
                        self.pitch_velocity += pitch;
                    } else {
                        camera.add_yaw(yaw);
                        camera.add_pitch(pitch);
                    }
                    true
                } else {
                    false
                }
            }
            _ => false,
        }
    }

    pub fn process_keyed_events(&mut self, event: &KeyEvent) {
        if let PhysicalKey::Code(KeyCode::ShiftLeft | KeyCode::ShiftRight) = event.physical_key {
            self.is_shift_held = event.state == ElementState::Pressed;
        }
    }

    /// Advance time-based motion: auto-rotate and damped orbit velocity.
    pub fn update(&mut self, dt: f32, camera: &mut OrbitCamera) {
        if self.auto_rotate {
            camera.add_yaw(self.auto_rotate_speed * dt);
        }

        if self.damping > 0.0 && (self.yaw_velocity != 0.0 || self.pitch_velocity != 0.0) {
            let retain = (1.0 - self.damping.clamp(0.0, 1.0)).powf(dt * 60.0);
            let applied = 1.0 - retain;
            camera.add_yaw(self.yaw_velocity * applied);
            camera.add_pitch(self.pitch_velocity * applied);
            self.yaw_velocity *= retain;
            self.pitch_velocity *= retain;
            if self.yaw_velocity.abs() < 1e-5 && self.pitch_velocity.abs() < 1e-5 {
                self.yaw_velocity = 0.0;
                self.pitch_velocity = 0.0;
            }
        }
    }

    /// Block (or re-enable) pointer-driven camera motion. Pending damped motion is dropped.
    pub fn set_suppressed(&mut self, suppressed: bool) {
        self.suppressed = suppressed;
        if suppressed {
            self.yaw_velocity = 0.0;
            self.pitch_velocity = 0.0;
        }
    }

    pub fn is_suppressed(&self) -> bool {
        self.suppressed
    }

    /// Flip auto-rotate and return the new state.
    pub fn toggle_auto_rotate(&mut self) -> bool {
        self.auto_rotate = !self.auto_rotate;
        self.auto_rotate
    }

    /// Returns true if currently panning
    pub fn is_panning(&self) -> bool {
        self.is_pan_pressed || (self.is_orbit_pressed && self.is_shift_held)
    }

    /// Returns true if currently rotating
    pub fn is_rotating(&self) -> bool {
        self.is_orbit_pressed && !self.is_shift_held
    }
}
