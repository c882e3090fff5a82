use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use simcore::content::{write_export, ExportError, MetricsExport, ScenarioCatalog};
use simcore::sim::{
    format_elapsed, Aabb, Instrument, InstrumentDrive, Session, SessionPhase, SessionSettings,
    ZoneLayout,
};
use simcore::{app::view_extent_world, InputSnapshot, Scene, SceneCommand, SceneView, Trigger};
use tracing::{debug, info, warn};

const DEFAULT_VIEW_EXTENT: (f32, f32) = (16.0, 9.0);

/// Everything the simulation needs at construction time.
#[derive(Debug, Clone)]
pub(crate) struct SimulationSetup {
    pub(crate) catalog: ScenarioCatalog,
    pub(crate) scenario_index: usize,
    pub(crate) settings: SessionSettings,
    pub(crate) organ: Option<Aabb>,
    pub(crate) export_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
enum ExportStatus {
    Written(PathBuf),
    Failed(String),
}

pub(crate) struct SimulationScene {
    session: Session,
    instrument: Instrument,
    settings: SessionSettings,
    catalog: ScenarioCatalog,
    scenario_index: usize,
    organ: Option<Aabb>,
    zones: ZoneLayout,
    export_dir: PathBuf,
    view_extent: (f32, f32),
    export_status: Option<ExportStatus>,
}

impl SimulationScene {
    pub(crate) fn new(setup: SimulationSetup) -> Self {
        let settings = setup.settings.sanitized();
        let scenario_index = if setup.scenario_index < setup.catalog.len() {
            setup.scenario_index
        } else {
            0
        };
        let mut scene = Self {
            session: Session::new(),
            instrument: Instrument::default(),
            settings,
            catalog: setup.catalog,
            scenario_index,
            organ: setup.organ,
            zones: ZoneLayout::from_organ(setup.organ, settings.precision_target),
            export_dir: setup.export_dir,
            view_extent: DEFAULT_VIEW_EXTENT,
            export_status: None,
        };
        scene.apply_scenario_preset();
        scene
    }

    pub(crate) fn session(&self) -> &Session {
        &self.session
    }

    pub(crate) fn settings(&self) -> SessionSettings {
        self.settings
    }

    pub(crate) fn zones(&self) -> &ZoneLayout {
        &self.zones
    }

    pub(crate) fn instrument(&self) -> &Instrument {
        &self.instrument
    }

    pub(crate) fn scenario_name(&self) -> &str {
        self.catalog
            .get(self.scenario_index)
            .map(|scenario| scenario.name.as_str())
            .unwrap_or("")
    }

    fn apply_scenario_preset(&mut self) {
        if let Some(scenario) = self.catalog.get(self.scenario_index) {
            scenario.preset.apply(&mut self.settings);
        }
        self.refresh_zones();
    }

    /// Re-derives the target radius from the current precision setting.
    /// Running metrics are left untouched.
    fn refresh_zones(&mut self) {
        self.zones = ZoneLayout::from_organ(self.organ, self.settings.precision_target);
    }

    fn select_next_scenario(&mut self) {
        self.scenario_index = self.catalog.next_index(self.scenario_index);
        self.apply_scenario_preset();
        info!(
            scenario = self.scenario_name(),
            precision_target = self.settings.precision_target,
            arm_speed = self.settings.arm_speed,
            feedback_intensity = self.settings.feedback_intensity,
            "scenario_selected"
        );
    }

    fn apply_setting_triggers(&mut self, input: &InputSnapshot) {
        let precision_steps = step_count(input, Trigger::PrecisionUp, Trigger::PrecisionDown);
        let speed_steps = step_count(input, Trigger::SpeedUp, Trigger::SpeedDown);
        let feedback_steps = step_count(input, Trigger::FeedbackUp, Trigger::FeedbackDown);
        if precision_steps == 0 && speed_steps == 0 && feedback_steps == 0 {
            return;
        }

        self.settings.step_precision(precision_steps);
        self.settings.step_arm_speed(speed_steps);
        self.settings.step_feedback(feedback_steps);
        if precision_steps != 0 {
            self.refresh_zones();
        }
        info!(
            precision_target = self.settings.precision_target,
            arm_speed = self.settings.arm_speed,
            feedback_intensity = self.settings.feedback_intensity,
            "settings_changed"
        );
    }

    fn advance_instrument(&mut self, frame_dt_seconds: f32, input: &InputSnapshot) {
        if !self.session.is_running() {
            return;
        }
        let drive = InstrumentDrive {
            pointer: input.pointer_ndc(),
            depth_axis: input.depth_axis(),
            view_extent: self.view_extent,
        };
        let position = self
            .instrument
            .step(&drive, self.settings.arm_speed, frame_dt_seconds);
        self.session
            .record_frame(position, frame_dt_seconds, &self.zones);
    }

    /// Exports on operator request. The outcome is logged and shown on the
    /// HUD by `export_at`.
    fn export(&mut self) {
        if let Err(error) = self.export_at(Utc::now()) {
            debug!(error = %error, "export_request_failed");
        }
    }

    /// Snapshots the current metrics into a timestamped file. Allowed in
    /// any phase.
    pub(crate) fn export_at(&mut self, now: DateTime<Utc>) -> Result<PathBuf, ExportError> {
        let export = MetricsExport::new(
            self.scenario_name(),
            self.session.metrics(),
            &self.settings,
            now,
        );
        let result = write_export(&self.export_dir, &export, now);
        match &result {
            Ok(path) => {
                info!(
                    path = %path.display(),
                    scenario = %export.scenario,
                    running = self.session.is_running(),
                    "metrics_exported"
                );
                self.export_status = Some(ExportStatus::Written(path.clone()));
            }
            Err(error) => {
                warn!(error = %error, "metrics_export_failed");
                self.export_status = Some(ExportStatus::Failed(error.to_string()));
            }
        }
        result
    }

    fn hud_lines(&self) -> Vec<String> {
        let metrics = self.session.metrics();
        let status = match self.session.phase() {
            SessionPhase::Running => "RUNNING",
            SessionPhase::Idle => "IDLE",
        };
        let position = self.instrument.position();
        let mut lines = vec![
            format!("Status: {status}"),
            format!("Scenario: {}", self.scenario_name()),
            format!("Time: {}", format_elapsed(metrics.elapsed_seconds)),
            format!("Path: {:.2}", metrics.path_length),
            format!("Precision: {:.1}%", metrics.precision_score),
            format!("Errors: {}", metrics.errors),
            format!("Collisions: {}", metrics.collisions),
            format!(
                "Settings: precision {:.0} speed {:.1} feedback {:.0}",
                self.settings.precision_target,
                self.settings.arm_speed,
                self.settings.feedback_intensity
            ),
            format!("Depth: {:.2}", position.z),
            match self.session.last_event() {
                Some(event) => format!("Last event: {event}"),
                None => "Last event: none".to_string(),
            },
        ];
        if let Some(status) = &self.export_status {
            lines.push(match status {
                ExportStatus::Written(path) => format!("Exported: {}", file_name_of(path)),
                ExportStatus::Failed(_) => "Export failed (see log)".to_string(),
            });
        }
        lines
    }
}

impl Scene for SimulationScene {
    fn load(&mut self) {
        info!(
            scenario = self.scenario_name(),
            scenarios = self.catalog.len(),
            organ_loaded = self.organ.is_some(),
            export_dir = %self.export_dir.display(),
            "simulation_loaded"
        );
    }

    fn update(&mut self, frame_dt_seconds: f32, input: &InputSnapshot) -> SceneCommand {
        if input.quit_requested() {
            return SceneCommand::Quit;
        }
        let (width, height) = input.window_size();
        if width > 0 && height > 0 {
            self.view_extent = view_extent_world(width, height);
        }

        // Movement first so a frame that stops the run is still counted and
        // a frame that starts it is not.
        self.advance_instrument(frame_dt_seconds, input);

        self.apply_setting_triggers(input);
        if input.pressed(Trigger::NextScenario) {
            self.select_next_scenario();
        }
        if input.pressed(Trigger::ToggleSession) {
            self.session.toggle();
        }
        if input.pressed(Trigger::Export) {
            self.export();
        }
        SceneCommand::None
    }

    fn view(&self) -> SceneView {
        SceneView {
            workspace: Some(self.instrument.limits()),
            organ: self.zones.collision,
            target: self.zones.target,
            danger: self.zones.danger,
            target_opacity: self.settings.target_opacity(),
            danger_opacity: self.settings.danger_opacity(),
            instrument: self.instrument.position(),
            trail: self.session.trail().to_vec(),
            running: self.session.is_running(),
            hud_lines: self.hud_lines(),
        }
    }

    fn unload(&mut self) {
        if self.session.is_running() {
            self.session.stop();
        }
        info!(runs = self.session.runs_started(), "simulation_unloaded");
    }

    fn title(&self) -> Option<String> {
        let status = if self.session.is_running() {
            "running"
        } else {
            "idle"
        };
        Some(format!("Surgical Trainer - {} ({status})", self.scenario_name()))
    }
}

fn step_count(input: &InputSnapshot, up: Trigger, down: Trigger) -> i32 {
    input.pressed(up) as i32 - input.pressed(down) as i32
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    include!("tests.rs");
}
