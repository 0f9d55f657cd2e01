//! Camera that trails its owner

use crate::ecs::component::{Behaviour, UpdateContext};
use crate::ecs::inspector::Inspector;
use crate::foundation::math::Vec3;
use crate::scene::persistence::{FieldReader, FieldWriter, SceneFormatError};

/// Moves the scene camera towards `owner + offset` every frame
///
/// `smooth_factor` is the fraction of the remaining distance covered per
/// 60 Hz frame; the step is rescaled for the actual frame time so the
/// motion does not depend on frame rate. A factor of 1 snaps.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraFollow {
    /// Camera position relative to the owner
    pub offset: Vec3,
    /// Fraction of the gap closed per 60 Hz frame, in `[0, 1]`
    pub smooth_factor: f32,
    /// Keep the camera aimed at the owner
    pub look_at_target: bool,
}

impl Default for CameraFollow {
    fn default() -> Self {
        Self {
            offset: Vec3::new(0.0, 5.0, 10.0),
            smooth_factor: 0.1,
            look_at_target: true,
        }
    }
}

impl CameraFollow {
    /// Interpolation weight for one frame of `delta_time` seconds
    pub fn follow_weight(&self, delta_time: f32) -> f32 {
        let smooth = self.smooth_factor.clamp(0.0, 1.0);
        let t = if smooth < 0.999 {
            1.0 - (1.0 - smooth).powf(delta_time * 60.0)
        } else {
            1.0
        };
        if t.is_nan() {
            return 1.0;
        }
        t.clamp(0.0, 1.0)
    }
}

impl Behaviour for CameraFollow {
    fn type_name(&self) -> &'static str {
        "CameraFollow"
    }

    fn display_name(&self) -> &'static str {
        "Camera Follow"
    }

    fn update(&mut self, ctx: &mut UpdateContext<'_>) {
        self.smooth_factor = self.smooth_factor.clamp(0.0, 1.0);

        let owner_position = ctx.owner.transform.position;
        let goal = owner_position + self.offset;
        let t = self.follow_weight(ctx.delta_time);

        let camera = &mut *ctx.camera;
        camera.position += (goal - camera.position) * t;
        if self.look_at_target {
            camera.look_at(owner_position);
        }
    }

    fn inspect(&mut self, ui: &mut dyn Inspector) {
        ui.label("Camera Follow");
        ui.drag_vec3("Offset", &mut self.offset, 0.1);
        ui.drag_float("Smooth Factor", &mut self.smooth_factor, 0.01, 0.01, 1.0);
        ui.checkbox("Look At Target", &mut self.look_at_target);
    }

    fn save(&self, out: &mut FieldWriter) {
        out.write_vec3(self.offset);
        out.write_f32(self.smooth_factor);
        out.write_bool(self.look_at_target);
    }

    fn load(&mut self, input: &mut FieldReader<'_>) -> Result<(), SceneFormatError> {
        self.offset = input.read_vec3()?;
        self.smooth_factor = input.read_f32()?.clamp(0.0, 1.0);
        self.look_at_target = input.read_bool()?;
        Ok(())
    }
}
