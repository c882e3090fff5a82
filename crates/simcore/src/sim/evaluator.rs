use super::geometry::Vec3;
use super::metrics::{precision_score, DistanceAverage, SessionMetrics};
use super::trail::Trail;
use super::zones::ZoneLayout;

/// Everything the evaluator carries from one frame to the next. Owned by a
/// single session; reset on start, frozen on stop.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackingState {
    pub metrics: SessionMetrics,
    pub last_position: Option<Vec3>,
    pub in_danger: bool,
    pub in_collision: bool,
    pub target_distance: DistanceAverage,
    pub trail: Trail,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSample {
    pub position: Vec3,
    pub dt_seconds: f32,
}

/// Zone entries detected on this frame. Only outside-to-inside transitions
/// are reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ZoneEntries {
    pub danger: bool,
    pub collision: bool,
}

/// Folds one frame into the tracking state. Steps whose geometry is absent
/// are skipped and their occupancy flag is left untouched.
pub fn evaluate_frame(
    mut state: TrackingState,
    sample: FrameSample,
    zones: &ZoneLayout,
) -> (TrackingState, ZoneEntries) {
    let position = sample.position;
    let mut entries = ZoneEntries::default();

    state.metrics.elapsed_seconds += f64::from(sample.dt_seconds);

    if let Some(previous) = state.last_position {
        state.metrics.path_length += f64::from(previous.distance(position));
    }

    if let Some(target) = zones.target {
        let mean = state
            .target_distance
            .record(f64::from(position.distance(target.center)));
        state.metrics.precision_score = precision_score(mean);
    }

    if let Some(danger) = zones.danger {
        let inside = danger.contains_point(position);
        if inside && !state.in_danger {
            state.metrics.errors = state.metrics.errors.saturating_add(1);
            entries.danger = true;
        }
        state.in_danger = inside;
    }

    if let Some(collision) = zones.collision {
        let inside = collision.contains_point(position);
        if inside && !state.in_collision {
            state.metrics.collisions = state.metrics.collisions.saturating_add(1);
            entries.collision = true;
        }
        state.in_collision = inside;
    }

    state.trail.push(position);
    state.last_position = Some(position);

    (state, entries)
}
