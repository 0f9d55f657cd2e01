//! Keyboard-driven movement controller
//!
//! Turns WASD input into a ground-plane displacement each frame and hands it
//! to the scene, which resolves it against the collider registry one axis at
//! a time before committing.

use crate::ecs::component::{Behaviour, UpdateContext};
use crate::ecs::inspector::Inspector;
use crate::foundation::math::Vec3;
use crate::scene::persistence::{FieldReader, FieldWriter, SceneFormatError};

/// Default speed in units per second
pub const DEFAULT_MOVE_SPEED: f32 = 5.0;

/// Moves its owner with WASD, blocked by solid colliders
#[derive(Debug, Clone, PartialEq)]
pub struct MovementController {
    /// Units per second
    pub move_speed: f32,
}

impl Default for MovementController {
    fn default() -> Self {
        Self {
            move_speed: DEFAULT_MOVE_SPEED,
        }
    }
}

impl MovementController {
    /// Create a controller with a custom speed
    pub fn new(move_speed: f32) -> Self {
        Self { move_speed }
    }
}

impl Behaviour for MovementController {
    fn type_name(&self) -> &'static str {
        "PlayerController"
    }

    fn display_name(&self) -> &'static str {
        "Player Controller"
    }

    fn update(&mut self, ctx: &mut UpdateContext<'_>) {
        let direction = ctx.input.ground_direction();
        if direction == Vec3::zeros() {
            return;
        }
        ctx.request_move(direction * self.move_speed * ctx.delta_time);
    }

    fn inspect(&mut self, ui: &mut dyn Inspector) {
        ui.drag_float("Move Speed", &mut self.move_speed, 0.1, 0.0, 100.0);
    }

    fn save(&self, out: &mut FieldWriter) {
        out.write_f32(self.move_speed);
    }

    fn load(&mut self, input: &mut FieldReader<'_>) -> Result<(), SceneFormatError> {
        self.move_speed = input.read_f32()?;
        Ok(())
    }
}
