use std::fmt;

use tracing::{debug, info};

use super::evaluator::{evaluate_frame, FrameSample, TrackingState, ZoneEntries};
use super::geometry::Vec3;
use super::metrics::SessionMetrics;
use super::trail::Trail;
use super::zones::ZoneLayout;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SessionPhase {
    #[default]
    Idle,
    Running,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEventKind {
    Started,
    Stopped,
    DangerEntered,
    CollisionEntered,
}

impl SessionEventKind {
    pub fn label(self) -> &'static str {
        match self {
            SessionEventKind::Started => "session started",
            SessionEventKind::Stopped => "session stopped",
            SessionEventKind::DangerEntered => "danger zone entered",
            SessionEventKind::CollisionEntered => "organ collision",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionEvent {
    pub kind: SessionEventKind,
    pub at_seconds: f64,
    pub position: Option<Vec3>,
}

impl fmt::Display for SessionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {:.1}s", self.kind.label(), self.at_seconds)
    }
}

/// One training run: Idle -> Running -> Idle, restartable forever.
///
/// Starting resets metrics, occupancy flags, the precision average, the
/// trail and the event log. Stopping freezes them so the last run stays
/// readable until the next start.
#[derive(Debug, Clone, Default)]
pub struct Session {
    phase: SessionPhase,
    tracking: TrackingState,
    events: Vec<SessionEvent>,
    runs_started: u32,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == SessionPhase::Running
    }

    pub fn runs_started(&self) -> u32 {
        self.runs_started
    }

    /// Returns `false` when a run is already in progress.
    pub fn start(&mut self) -> bool {
        if self.is_running() {
            return false;
        }
        self.tracking = TrackingState::default();
        self.events.clear();
        self.events.push(SessionEvent {
            kind: SessionEventKind::Started,
            at_seconds: 0.0,
            position: None,
        });
        self.phase = SessionPhase::Running;
        self.runs_started = self.runs_started.saturating_add(1);
        info!(run = self.runs_started, "session_started");
        true
    }

    /// Returns `false` when no run is in progress.
    pub fn stop(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        self.phase = SessionPhase::Idle;
        let metrics = self.tracking.metrics;
        self.events.push(SessionEvent {
            kind: SessionEventKind::Stopped,
            at_seconds: metrics.elapsed_seconds,
            position: self.tracking.last_position,
        });
        info!(
            run = self.runs_started,
            elapsed_seconds = metrics.elapsed_seconds,
            path_length = metrics.path_length,
            precision = metrics.precision_score,
            errors = metrics.errors,
            collisions = metrics.collisions,
            "session_stopped"
        );
        true
    }

    pub fn toggle(&mut self) -> SessionPhase {
        if self.is_running() {
            self.stop();
        } else {
            self.start();
        }
        self.phase
    }

    /// Feeds one frame to the evaluator. Idle sessions ignore samples.
    pub fn record_frame(
        &mut self,
        position: Vec3,
        dt_seconds: f32,
        zones: &ZoneLayout,
    ) -> Option<ZoneEntries> {
        if !self.is_running() {
            return None;
        }
        let tracking = std::mem::take(&mut self.tracking);
        let (tracking, entries) = evaluate_frame(
            tracking,
            FrameSample {
                position,
                dt_seconds,
            },
            zones,
        );
        self.tracking = tracking;

        let at_seconds = self.tracking.metrics.elapsed_seconds;
        if entries.danger {
            debug!(x = position.x, y = position.y, z = position.z, "danger_zone_entered");
            self.events.push(SessionEvent {
                kind: SessionEventKind::DangerEntered,
                at_seconds,
                position: Some(position),
            });
        }
        if entries.collision {
            debug!(x = position.x, y = position.y, z = position.z, "collision_entered");
            self.events.push(SessionEvent {
                kind: SessionEventKind::CollisionEntered,
                at_seconds,
                position: Some(position),
            });
        }
        Some(entries)
    }

    pub fn metrics(&self) -> SessionMetrics {
        self.tracking.metrics
    }

    pub fn trail(&self) -> &Trail {
        &self.tracking.trail
    }

    pub fn tracking(&self) -> &TrackingState {
        &self.tracking
    }

    pub fn events(&self) -> &[SessionEvent] {
        &self.events
    }

    pub fn last_event(&self) -> Option<&SessionEvent> {
        self.events.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::geometry::{Aabb, Sphere};

    fn zones() -> ZoneLayout {
        ZoneLayout {
            target: Some(Sphere {
                center: Vec3::new(0.0, 1.0, 0.0),
                radius: 0.4,
            }),
            danger: Some(Sphere {
                center: Vec3::new(-1.0, 0.0, 0.0),
                radius: 0.45,
            }),
            collision: Some(Aabb::new(
                Vec3::new(0.5, -0.5, -0.5),
                Vec3::new(1.5, 0.5, 0.5),
            )),
        }
    }

    #[test]
    fn idle_session_ignores_frames() {
        let mut session = Session::new();
        assert!(session
            .record_frame(Vec3::new(-1.0, 0.0, 0.0), 0.016, &zones())
            .is_none());
        assert_eq!(session.metrics(), SessionMetrics::default());
        assert!(session.trail().is_empty());
    }

    #[test]
    fn scenario_crossing_danger_then_box() {
        let path = [
            (Vec3::new(-2.0, 0.0, 0.0), 0.02f32),
            (Vec3::new(-1.0, 0.0, 0.0), 0.03),
            (Vec3::new(-1.1, 0.1, 0.0), 0.02),
            (Vec3::new(0.0, 0.0, 0.0), 0.05),
            (Vec3::new(1.0, 0.0, 0.0), 0.04),
            (Vec3::new(1.2, 0.1, 0.0), 0.01),
        ];
        let mut session = Session::new();
        assert!(session.start());
        for (position, dt) in path {
            session.record_frame(position, dt, &zones());
        }

        let metrics = session.metrics();
        let expected_time = path.iter().map(|(_, dt)| f64::from(*dt)).sum::<f64>();
        let expected_path = path
            .windows(2)
            .map(|pair| f64::from(pair[0].0.distance(pair[1].0)))
            .sum::<f64>();
        assert_eq!(metrics.errors, 1);
        assert_eq!(metrics.collisions, 1);
        assert!((metrics.elapsed_seconds - expected_time).abs() < 1e-9);
        assert!((metrics.path_length - expected_path).abs() < 1e-9);

        let kinds = session
            .events()
            .iter()
            .map(|event| event.kind)
            .collect::<Vec<_>>();
        assert_eq!(
            kinds,
            vec![
                SessionEventKind::Started,
                SessionEventKind::DangerEntered,
                SessionEventKind::CollisionEntered,
            ]
        );
    }

    #[test]
    fn stop_freezes_metrics_and_restart_resets_them() {
        let mut session = Session::new();
        session.start();
        session.record_frame(Vec3::new(-1.0, 0.0, 0.0), 0.5, &zones());
        session.record_frame(Vec3::new(1.0, 0.0, 0.0), 0.5, &zones());
        assert!(session.stop());

        let frozen = session.metrics();
        assert_eq!(frozen.errors, 1);
        assert_eq!(frozen.collisions, 1);
        session.record_frame(Vec3::new(-1.0, 0.0, 0.0), 0.5, &zones());
        assert_eq!(session.metrics(), frozen);
        assert_eq!(session.trail().len(), 2);
        assert_eq!(
            session.last_event().map(|event| event.kind),
            Some(SessionEventKind::Stopped)
        );

        assert!(session.start());
        assert_eq!(session.metrics(), SessionMetrics::default());
        assert!(session.trail().is_empty());
        assert_eq!(session.tracking(), &TrackingState::default());
        assert_eq!(session.events().len(), 1);
        assert_eq!(session.runs_started(), 2);
    }

    #[test]
    fn restart_does_not_carry_occupancy_into_new_run() {
        let mut session = Session::new();
        session.start();
        session.record_frame(Vec3::new(-1.0, 0.0, 0.0), 0.1, &zones());
        session.stop();
        session.start();
        session.record_frame(Vec3::new(-1.0, 0.0, 0.0), 0.1, &zones());
        assert_eq!(session.metrics().errors, 1);
    }

    #[test]
    fn double_start_and_double_stop_are_rejected() {
        let mut session = Session::new();
        assert!(!session.stop());
        assert!(session.start());
        assert!(!session.start());
        assert!(session.stop());
        assert!(!session.stop());
    }

    #[test]
    fn toggle_alternates_phases() {
        let mut session = Session::new();
        assert_eq!(session.toggle(), SessionPhase::Running);
        assert_eq!(session.toggle(), SessionPhase::Idle);
        assert_eq!(session.toggle(), SessionPhase::Running);
    }
}
