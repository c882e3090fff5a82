use super::geometry::{Aabb, Vec3};

pub const TOOL_LIMITS: Aabb = Aabb::new(Vec3::new(-2.2, -1.6, -2.2), Vec3::new(2.2, 2.0, 2.2));
pub const TOOL_START: Vec3 = Vec3::new(0.0, 0.0, -1.2);
/// Fraction of the remaining gap closed each frame.
pub const FOLLOW_FACTOR: f32 = 0.2;
/// The pointer reaches a third of the visible extent from the view center.
pub const POINTER_REACH_DIVISOR: f32 = 3.0;
pub const DEPTH_RATE_SCALE: f32 = 2.0;

/// Pointer position in normalized device coordinates, both axes in [-1, 1]
/// with +y up.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerNdc {
    pub x: f32,
    pub y: f32,
}

/// Operator input sampled at a frame boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InstrumentDrive {
    pub pointer: Option<PointerNdc>,
    /// +1 pushes deeper (E), -1 pulls back (Q).
    pub depth_axis: f32,
    /// Visible width and height of the view in world units.
    pub view_extent: (f32, f32),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Instrument {
    position: Vec3,
    limits: Aabb,
    follow_factor: f32,
}

impl Default for Instrument {
    fn default() -> Self {
        Self::new(TOOL_START, TOOL_LIMITS)
    }
}

impl Instrument {
    /// `limits` may be given with swapped corners; non-finite limits fall
    /// back to [`TOOL_LIMITS`]. A non-finite start begins at the box center.
    pub fn new(start: Vec3, limits: Aabb) -> Self {
        let limits = if limits.min.is_finite() && limits.max.is_finite() {
            Aabb::from_points([limits.min, limits.max]).unwrap_or(TOOL_LIMITS)
        } else {
            TOOL_LIMITS
        };
        Self {
            position: if start.is_finite() {
                start.clamp(limits.min, limits.max)
            } else {
                limits.center()
            },
            limits,
            follow_factor: FOLLOW_FACTOR,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn limits(&self) -> Aabb {
        self.limits
    }

    /// Where the operator is asking the tip to go, before clamping.
    pub fn target_for(&self, drive: &InstrumentDrive, arm_speed: f32, dt_seconds: f32) -> Vec3 {
        let (view_width, view_height) = drive.view_extent;
        let (x, y) = match drive.pointer {
            Some(pointer) => (
                pointer.x * (view_width / POINTER_REACH_DIVISOR),
                pointer.y * (view_height / POINTER_REACH_DIVISOR),
            ),
            None => (self.position.x, self.position.y),
        };
        let depth_axis = drive.depth_axis.clamp(-1.0, 1.0);
        let z = self.position.z + depth_axis * arm_speed * dt_seconds * DEPTH_RATE_SCALE;
        Vec3::new(x, y, z)
    }

    /// Clamps `target` into the working limits, then eases toward it.
    pub fn follow(&mut self, target: Vec3) -> Vec3 {
        if !target.is_finite() {
            return self.position;
        }
        let clamped = target.clamp(self.limits.min, self.limits.max);
        self.position = self.position.lerp(clamped, self.follow_factor);
        self.position
    }

    pub fn step(&mut self, drive: &InstrumentDrive, arm_speed: f32, dt_seconds: f32) -> Vec3 {
        let target = self.target_for(drive, arm_speed, dt_seconds);
        self.follow(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drive(pointer: Option<PointerNdc>, depth_axis: f32) -> InstrumentDrive {
        InstrumentDrive {
            pointer,
            depth_axis,
            view_extent: (12.0, 9.0),
        }
    }

    #[test]
    fn pointer_maps_to_a_third_of_the_view() {
        let instrument = Instrument::default();
        let target = instrument.target_for(
            &drive(Some(PointerNdc { x: 0.5, y: -1.0 }), 0.0),
            1.2,
            0.016,
        );
        assert!((target.x - 2.0).abs() < 1e-6);
        assert!((target.y + 3.0).abs() < 1e-6);
        assert_eq!(target.z, TOOL_START.z);
    }

    #[test]
    fn missing_pointer_holds_current_plane_position() {
        let instrument = Instrument::new(Vec3::new(0.4, -0.3, 0.0), TOOL_LIMITS);
        let target = instrument.target_for(&drive(None, 0.0), 1.0, 0.016);
        assert_eq!(target, Vec3::new(0.4, -0.3, 0.0));
    }

    #[test]
    fn depth_keys_scale_with_speed_and_time() {
        let instrument = Instrument::default();
        let deeper = instrument.target_for(&drive(None, 1.0), 1.5, 0.1);
        let shallower = instrument.target_for(&drive(None, -1.0), 1.5, 0.1);
        assert!((deeper.z - (TOOL_START.z + 0.3)).abs() < 1e-6);
        assert!((shallower.z - (TOOL_START.z - 0.3)).abs() < 1e-6);
    }

    #[test]
    fn follow_eases_instead_of_snapping() {
        let mut instrument = Instrument::new(Vec3::ZERO, TOOL_LIMITS);
        let next = instrument.follow(Vec3::new(1.0, 1.0, 1.0));
        assert!((next.x - 0.2).abs() < 1e-6);
        assert!((next.y - 0.2).abs() < 1e-6);
        assert!((next.z - 0.2).abs() < 1e-6);
    }

    #[test]
    fn target_is_clamped_before_easing() {
        let mut instrument = Instrument::new(Vec3::ZERO, TOOL_LIMITS);
        let next = instrument.follow(Vec3::new(100.0, -100.0, 0.0));
        assert!((next.x - 2.2 * FOLLOW_FACTOR).abs() < 1e-6);
        assert!((next.y + 1.6 * FOLLOW_FACTOR).abs() < 1e-6);
    }

    #[test]
    fn position_never_leaves_limits() {
        let mut instrument = Instrument::default();
        for frame in 0..600 {
            let phase = frame as f32 * 0.05;
            let pointer = PointerNdc {
                x: phase.sin() * 3.0,
                y: phase.cos() * 3.0,
            };
            let position = instrument.step(&drive(Some(pointer), 1.0), 2.0, 0.1);
            assert!(TOOL_LIMITS.contains_point(position), "frame {frame}: {position:?}");
        }
    }

    #[test]
    fn swapped_limit_corners_are_reordered() {
        let swapped = Aabb::new(TOOL_LIMITS.max, TOOL_LIMITS.min);
        let mut instrument = Instrument::new(Vec3::new(9.0, 0.0, 0.0), swapped);

        assert_eq!(instrument.limits(), TOOL_LIMITS);
        assert_eq!(instrument.position(), Vec3::new(2.2, 0.0, 0.0));
        let next = instrument.follow(Vec3::new(-100.0, 0.0, 0.0));
        assert!(TOOL_LIMITS.contains_point(next));
    }

    #[test]
    fn non_finite_limits_fall_back_to_working_box() {
        let broken = Aabb::new(Vec3::new(f32::NAN, 0.0, 0.0), Vec3::ZERO);
        assert_eq!(Instrument::new(Vec3::ZERO, broken).limits(), TOOL_LIMITS);
    }

    #[test]
    fn non_finite_target_is_ignored() {
        let mut instrument = Instrument::default();
        let before = instrument.position();
        assert_eq!(instrument.follow(Vec3::new(f32::NAN, 0.0, 0.0)), before);
    }
}
