//! Colour flash on collision

use crate::ecs::component::{Behaviour, Contact, Owner, UpdateContext};
use crate::ecs::inspector::Inspector;
use crate::foundation::math::Vec3;
use crate::scene::persistence::{FieldReader, FieldWriter, SceneFormatError};

/// Seconds the collision colour stays after the last contact
pub const FLASH_DURATION: f32 = 0.1;

/// Paints its owner while it is colliding
///
/// The owner's colour at start is remembered and restored once no collision
/// has been reported for [`FLASH_DURATION`] seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionReaction {
    /// Colour applied on collision
    pub collision_color: Vec3,
    original_color: Vec3,
    remaining: f32,
}

impl Default for CollisionReaction {
    fn default() -> Self {
        Self {
            collision_color: Vec3::new(1.0, 0.0, 0.0),
            original_color: Vec3::repeat(1.0),
            remaining: 0.0,
        }
    }
}

impl CollisionReaction {
    /// Create a reaction with a custom colour
    pub fn new(collision_color: Vec3) -> Self {
        Self {
            collision_color,
            ..Self::default()
        }
    }

    /// Colour captured when the component started
    pub fn original_color(&self) -> Vec3 {
        self.original_color
    }

    /// Whether the collision colour is currently applied
    pub fn is_flashing(&self) -> bool {
        self.remaining > 0.0
    }
}

impl Behaviour for CollisionReaction {
    fn type_name(&self) -> &'static str {
        "CollisionReaction"
    }

    fn display_name(&self) -> &'static str {
        "Collision Reaction"
    }

    fn start(&mut self, owner: &mut Owner<'_>) {
        self.original_color = owner.material.color;
    }

    fn update(&mut self, ctx: &mut UpdateContext<'_>) {
        if self.remaining > 0.0 {
            self.remaining -= ctx.delta_time;
            if self.remaining <= 0.0 {
                self.remaining = 0.0;
                ctx.owner.material.color = self.original_color;
            }
        }
    }

    fn on_collision(&mut self, owner: &mut Owner<'_>, other: &Contact) {
        log::trace!("CollisionReaction: {} touched {}", owner.name, other.name);
        owner.material.color = self.collision_color;
        self.remaining = FLASH_DURATION;
    }

    fn inspect(&mut self, ui: &mut dyn Inspector) {
        ui.color_edit("Collision Color", &mut self.collision_color);
    }

    fn save(&self, out: &mut FieldWriter) {
        out.write_vec3(self.collision_color);
    }

    fn load(&mut self, input: &mut FieldReader<'_>) -> Result<(), SceneFormatError> {
        self.collision_color = input.read_vec3()?;
        Ok(())
    }
}
