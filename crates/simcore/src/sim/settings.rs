use serde::{Deserialize, Serialize};

use super::geometry::lerp_scalar;

pub const PRECISION_RANGE: (f32, f32) = (0.0, 100.0);
pub const ARM_SPEED_RANGE: (f32, f32) = (0.1, 2.0);
pub const FEEDBACK_RANGE: (f32, f32) = (0.0, 100.0);
pub const PRECISION_STEP: f32 = 5.0;
pub const ARM_SPEED_STEP: f32 = 0.1;
const ARM_SPEED_STEPS_PER_UNIT: f32 = 10.0;
pub const FEEDBACK_STEP: f32 = 5.0;

/// Operator-adjustable knobs. Values outside their range are clamped on
/// every write.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionSettings {
    pub precision_target: f32,
    pub arm_speed: f32,
    pub feedback_intensity: f32,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            precision_target: 75.0,
            arm_speed: 1.2,
            feedback_intensity: 80.0,
        }
    }
}

impl SessionSettings {
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        Self {
            precision_target: clamp_or(
                self.precision_target,
                PRECISION_RANGE,
                defaults.precision_target,
            ),
            arm_speed: clamp_or(self.arm_speed, ARM_SPEED_RANGE, defaults.arm_speed),
            feedback_intensity: clamp_or(
                self.feedback_intensity,
                FEEDBACK_RANGE,
                defaults.feedback_intensity,
            ),
        }
    }

    pub fn set_precision_target(&mut self, value: f32) {
        self.precision_target = clamp_or(value, PRECISION_RANGE, self.precision_target);
    }

    pub fn set_arm_speed(&mut self, value: f32) {
        self.arm_speed = clamp_or(value, ARM_SPEED_RANGE, self.arm_speed);
    }

    pub fn set_feedback_intensity(&mut self, value: f32) {
        self.feedback_intensity = clamp_or(value, FEEDBACK_RANGE, self.feedback_intensity);
    }

    pub fn step_precision(&mut self, steps: i32) {
        self.set_precision_target(self.precision_target + steps as f32 * PRECISION_STEP);
    }

    pub fn step_arm_speed(&mut self, steps: i32) {
        // Counted in whole steps so the stored value stays exactly on the grid.
        let current_steps = (self.arm_speed / ARM_SPEED_STEP).round() as i32;
        let next_steps = current_steps.saturating_add(steps);
        self.set_arm_speed(next_steps as f32 / ARM_SPEED_STEPS_PER_UNIT);
    }

    pub fn step_feedback(&mut self, steps: i32) {
        self.set_feedback_intensity(self.feedback_intensity + steps as f32 * FEEDBACK_STEP);
    }

    pub fn target_opacity(&self) -> f32 {
        lerp_scalar(0.2, 0.55, self.feedback_intensity / 100.0)
    }

    pub fn danger_opacity(&self) -> f32 {
        lerp_scalar(0.15, 0.4, self.feedback_intensity / 100.0)
    }
}

fn clamp_or(value: f32, (min, max): (f32, f32), fallback: f32) -> f32 {
    if value.is_finite() {
        value.clamp(min, max)
    } else {
        fallback
    }
}
