//! Input snapshot handed to each scene tick
//!
//! The window layer owns the real event loop; the scene only sees an
//! [`InputState`] describing which keys and buttons are held this frame.

use std::collections::HashSet;

use crate::foundation::math::{Vec2, Vec3};

/// Key codes the scene reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// W key (forward, -Z)
    W,
    /// A key (left, -X)
    A,
    /// S key (back, +Z)
    S,
    /// D key (right, +X)
    D,
    /// Space key
    Space,
    /// Escape key
    Escape,
    /// Delete key
    Delete,
}

/// Mouse buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Left mouse button
    Left,
    /// Right mouse button
    Right,
    /// Middle mouse button
    Middle,
}

/// Keys, buttons and cursor position for one frame
#[derive(Debug, Clone, Default)]
pub struct InputState {
    keys: HashSet<KeyCode>,
    buttons: HashSet<MouseButton>,
    /// Cursor position in window pixels, origin top-left
    pub cursor: Vec2,
}

impl InputState {
    /// Create an empty snapshot
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot with the given keys held
    pub fn with_keys(keys: &[KeyCode]) -> Self {
        Self {
            keys: keys.iter().copied().collect(),
            ..Self::default()
        }
    }

    /// Handle key input
    pub fn set_key(&mut self, key: KeyCode, pressed: bool) {
        if pressed {
            self.keys.insert(key);
        } else {
            self.keys.remove(&key);
        }
    }

    /// Handle mouse button input
    pub fn set_button(&mut self, button: MouseButton, pressed: bool) {
        if pressed {
            self.buttons.insert(button);
        } else {
            self.buttons.remove(&button);
        }
    }

    /// Whether a key is held
    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.keys.contains(&key)
    }

    /// Whether a mouse button is held
    pub fn is_button_down(&self, button: MouseButton) -> bool {
        self.buttons.contains(&button)
    }

    /// Release everything
    pub fn clear(&mut self) {
        self.keys.clear();
        self.buttons.clear();
    }

    /// Unit direction on the ground plane from WASD, zero when idle
    ///
    /// W and S map to -Z and +Z, A and D to -X and +X. Opposing keys cancel.
    pub fn ground_direction(&self) -> Vec3 {
        let mut direction = Vec3::zeros();
        if self.is_key_down(KeyCode::W) {
            direction.z -= 1.0;
        }
        if self.is_key_down(KeyCode::S) {
            direction.z += 1.0;
        }
        if self.is_key_down(KeyCode::A) {
            direction.x -= 1.0;
        }
        if self.is_key_down(KeyCode::D) {
            direction.x += 1.0;
        }
        direction.try_normalize(f32::EPSILON).unwrap_or_else(Vec3::zeros)
    }
}
