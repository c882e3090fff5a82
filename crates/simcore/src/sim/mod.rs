mod evaluator;
mod geometry;
mod instrument;
mod metrics;
mod organ;
mod session;
mod settings;
mod trail;
mod zones;

pub use evaluator::{evaluate_frame, FrameSample, TrackingState, ZoneEntries};
pub use geometry::{lerp_scalar, Aabb, Sphere, Vec3};
pub use instrument::{
    Instrument, InstrumentDrive, PointerNdc, DEPTH_RATE_SCALE, FOLLOW_FACTOR,
    POINTER_REACH_DIVISOR, TOOL_LIMITS, TOOL_START,
};
pub use metrics::{
    format_elapsed, precision_score, DistanceAverage, SessionMetrics, PRECISION_ZERO_DISTANCE,
};
pub use organ::{
    bounds_from_extents, normalize_model_bounds, normalize_model_vertices, ORGAN_LONGEST_AXIS,
};
pub use session::{Session, SessionEvent, SessionEventKind, SessionPhase};
pub use settings::{
    SessionSettings, ARM_SPEED_RANGE, ARM_SPEED_STEP, FEEDBACK_RANGE, FEEDBACK_STEP,
    PRECISION_RANGE, PRECISION_STEP,
};
pub use trail::{Trail, TRAIL_CAPACITY};
pub use zones::{danger_zone, target_zone, ZoneLayout, DANGER_OFFSET, DANGER_RADIUS, TARGET_OFFSET};
