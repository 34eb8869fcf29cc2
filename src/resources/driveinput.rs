//! Held-key state for drive mode.
//!
//! The host forwards raw key names; [`DriveInput`] keeps the four
//! directional signals the drive controller reads each frame. Keys are
//! matched case-insensitively, so `"W"` and `"w"` are the same signal.

use bevy_ecs::prelude::*;

/// Keys the drive controller understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriveKey {
    Forward,
    Backward,
    Left,
    Right,
    /// Leaves drive mode.
    Exit,
}

impl DriveKey {
    pub fn from_key_name(key: &str) -> Option<Self> {
        if key == "Escape" {
            return Some(DriveKey::Exit);
        }
        match key.to_ascii_lowercase().as_str() {
            "w" => Some(DriveKey::Forward),
            "s" => Some(DriveKey::Backward),
            "a" => Some(DriveKey::Left),
            "d" => Some(DriveKey::Right),
            _ => None,
        }
    }
}

/// Boolean key state with its binding.
#[derive(Debug, Clone, Copy)]
pub struct BoolState {
    /// Whether the key is currently held.
    pub active: bool,
    /// Pressed since the last frame.
    pub just_pressed: bool,
    /// Released since the last frame.
    pub just_released: bool,
    pub key_binding: DriveKey,
}

impl BoolState {
    fn new(key_binding: DriveKey) -> Self {
        Self {
            active: false,
            just_pressed: false,
            just_released: false,
            key_binding,
        }
    }

    fn set(&mut self, down: bool) {
        if down && !self.active {
            self.just_pressed = true;
        }
        if !down && self.active {
            self.just_released = true;
        }
        self.active = down;
    }
}

#[derive(Resource, Debug, Clone)]
pub struct DriveInput {
    pub forward: BoolState,
    pub backward: BoolState,
    pub left: BoolState,
    pub right: BoolState,
}

impl Default for DriveInput {
    fn default() -> Self {
        Self {
            forward: BoolState::new(DriveKey::Forward),
            backward: BoolState::new(DriveKey::Backward),
            left: BoolState::new(DriveKey::Left),
            right: BoolState::new(DriveKey::Right),
        }
    }
}

impl DriveInput {
    /// Record a key transition. [`DriveKey::Exit`] is not a held signal.
    pub fn apply(&mut self, key: DriveKey, down: bool) {
        let state = match key {
            DriveKey::Forward => &mut self.forward,
            DriveKey::Backward => &mut self.backward,
            DriveKey::Left => &mut self.left,
            DriveKey::Right => &mut self.right,
            DriveKey::Exit => return,
        };
        state.set(down);
    }

    /// Release every key.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Forget edge flags at the end of a frame.
    pub fn end_frame(&mut self) {
        for state in [
            &mut self.forward,
            &mut self.backward,
            &mut self.left,
            &mut self.right,
        ] {
            state.just_pressed = false;
            state.just_released = false;
        }
    }

    pub fn any_held(&self) -> bool {
        self.forward.active || self.backward.active || self.left.active || self.right.active
    }
}
