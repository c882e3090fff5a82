use super::geometry::{lerp_scalar, Aabb, Sphere, Vec3};

pub const TARGET_OFFSET: Vec3 = Vec3::new(0.6, 0.2, 0.2);
pub const TARGET_RADIUS_AT_MIN_PRECISION: f32 = 0.9;
pub const TARGET_RADIUS_AT_MAX_PRECISION: f32 = 0.3;
pub const DANGER_OFFSET: Vec3 = Vec3::new(-0.7, -0.1, -0.2);
pub const DANGER_RADIUS: f32 = 0.45;

/// Higher precision settings shrink the target.
pub fn target_zone(organ: &Aabb, precision_setting: f32) -> Sphere {
    let precision = if precision_setting.is_finite() {
        precision_setting.clamp(0.0, 100.0)
    } else {
        0.0
    };
    Sphere {
        center: organ.center() + TARGET_OFFSET,
        radius: lerp_scalar(
            TARGET_RADIUS_AT_MIN_PRECISION,
            TARGET_RADIUS_AT_MAX_PRECISION,
            precision / 100.0,
        ),
    }
}

pub fn danger_zone(organ: &Aabb) -> Sphere {
    Sphere {
        center: organ.center() + DANGER_OFFSET,
        radius: DANGER_RADIUS,
    }
}

/// Scoring geometry for one frame. Any part may be absent while the organ
/// model is still loading; the evaluator skips the matching step.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ZoneLayout {
    pub target: Option<Sphere>,
    pub danger: Option<Sphere>,
    pub collision: Option<Aabb>,
}

impl ZoneLayout {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_organ(organ: Option<Aabb>, precision_setting: f32) -> Self {
        match organ {
            Some(bounds) => Self {
                target: Some(target_zone(&bounds, precision_setting)),
                danger: Some(danger_zone(&bounds)),
                collision: Some(bounds),
            },
            None => Self::empty(),
        }
    }
}
