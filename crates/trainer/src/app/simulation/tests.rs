    use super::*;
    use chrono::TimeZone;
    use simcore::content::{ScenarioDef, SettingsPreset};
    use simcore::sim::{PointerNdc, Vec3, TOOL_START};
    use std::fs;
    use tempfile::TempDir;

    /// Organ placed so the danger sphere swallows the instrument's start
    /// position while the box itself stays clear of it.
    fn organ_around_start() -> Aabb {
        Aabb::new(Vec3::new(0.2, -0.4, -1.5), Vec3::new(1.2, 0.6, -0.5))
    }

    fn far_organ() -> Aabb {
        Aabb::new(Vec3::new(1.5, 1.0, 1.5), Vec3::new(2.0, 1.5, 2.0))
    }

    fn scene_with(
        organ: Option<Aabb>,
        catalog: ScenarioCatalog,
        export_dir: PathBuf,
    ) -> SimulationScene {
        SimulationScene::new(SimulationSetup {
            catalog,
            scenario_index: 0,
            settings: SessionSettings::default(),
            organ,
            export_dir,
        })
    }

    fn scene(organ: Option<Aabb>) -> SimulationScene {
        scene_with(organ, ScenarioCatalog::builtin(), PathBuf::from("unused-exports"))
    }

    fn press(trigger: Trigger) -> InputSnapshot {
        InputSnapshot::empty()
            .with_window_size(1280, 720)
            .with_pressed(trigger)
    }

    fn idle_frame() -> InputSnapshot {
        InputSnapshot::empty().with_window_size(1280, 720)
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.timestamp_millis_opt(1_700_000_000_000)
            .single()
            .expect("valid timestamp")
    }

    #[test]
    fn idle_scene_neither_moves_nor_measures() {
        let mut scene = scene(Some(far_organ()));
        let pointer = idle_frame().with_pointer_ndc(Some(PointerNdc { x: 1.0, y: 1.0 }));

        for _ in 0..10 {
            scene.update(0.1, &pointer);
        }

        assert_eq!(scene.instrument().position(), TOOL_START);
        assert_eq!(scene.session().metrics().elapsed_seconds, 0.0);
        assert!(scene.session().trail().is_empty());
    }

    #[test]
    fn starting_frame_is_not_measured() {
        let mut scene = scene(Some(far_organ()));

        scene.update(0.5, &press(Trigger::ToggleSession));
        assert!(scene.session().is_running());
        assert_eq!(scene.session().metrics().elapsed_seconds, 0.0);

        scene.update(0.25, &idle_frame());
        scene.update(0.25, &idle_frame());
        assert!((scene.session().metrics().elapsed_seconds - 0.5).abs() < 1e-9);
        assert_eq!(scene.session().trail().len(), 2);
    }

    #[test]
    fn pointer_pulls_the_instrument_while_running() {
        let mut scene = scene(Some(far_organ()));
        scene.update(0.016, &press(Trigger::ToggleSession));

        let toward_right = idle_frame().with_pointer_ndc(Some(PointerNdc { x: 1.0, y: 0.0 }));
        for _ in 0..5 {
            scene.update(0.016, &toward_right);
        }

        let position = scene.instrument().position();
        assert!(position.x > 0.0);
        assert!(position.x <= 2.2);
        assert!(scene.session().metrics().path_length > 0.0);
    }

    #[test]
    fn depth_keys_move_along_z_only_while_running() {
        let mut scene = scene(Some(far_organ()));
        let deeper = idle_frame().with_action_down(simcore::InputAction::DepthIn, true);

        scene.update(0.1, &deeper);
        assert_eq!(scene.instrument().position().z, TOOL_START.z);

        scene.update(0.1, &press(Trigger::ToggleSession));
        scene.update(0.1, &deeper);
        assert!(scene.instrument().position().z > TOOL_START.z);
    }

    #[test]
    fn dwelling_in_danger_counts_one_error() {
        let mut scene = scene(Some(organ_around_start()));
        let danger = scene.zones().danger.expect("danger zone");
        assert!(danger.contains_point(TOOL_START));

        scene.update(0.1, &press(Trigger::ToggleSession));
        for _ in 0..20 {
            scene.update(0.1, &idle_frame());
        }

        let metrics = scene.session().metrics();
        assert_eq!(metrics.errors, 1);
        assert_eq!(metrics.collisions, 0);
        let last = scene.session().last_event().expect("event");
        assert_eq!(last.kind, simcore::sim::SessionEventKind::DangerEntered);
    }

    #[test]
    fn restart_clears_previous_run() {
        let mut scene = scene(Some(organ_around_start()));
        scene.update(0.1, &press(Trigger::ToggleSession));
        scene.update(0.1, &idle_frame());
        scene.update(0.1, &press(Trigger::ToggleSession));
        assert!(!scene.session().is_running());
        assert_eq!(scene.session().metrics().errors, 1);

        scene.update(0.1, &press(Trigger::ToggleSession));
        assert!(scene.session().is_running());
        assert_eq!(scene.session().metrics().errors, 0);
        assert!(scene.session().trail().is_empty());
    }

    #[test]
    fn precision_step_resizes_target_without_resetting_metrics() {
        let mut scene = scene(Some(far_organ()));
        scene.update(0.1, &press(Trigger::ToggleSession));
        scene.update(0.1, &idle_frame());
        let before_radius = scene.zones().target.expect("target").radius;
        let before_time = scene.session().metrics().elapsed_seconds;

        scene.update(0.1, &press(Trigger::PrecisionUp));

        let after_radius = scene.zones().target.expect("target").radius;
        assert_eq!(scene.settings().precision_target, 80.0);
        assert!(after_radius < before_radius);
        assert!(scene.session().metrics().elapsed_seconds > before_time);
        assert!(scene.session().is_running());
    }

    #[test]
    fn speed_and_feedback_steps_stay_in_range() {
        let mut scene = scene(None);
        for _ in 0..30 {
            scene.update(0.016, &press(Trigger::SpeedUp));
            scene.update(0.016, &press(Trigger::FeedbackDown));
        }
        assert!((scene.settings().arm_speed - 2.0).abs() < 1e-5);
        assert_eq!(scene.settings().feedback_intensity, 0.0);
        assert!((scene.view().target_opacity - 0.2).abs() < 1e-6);
    }

    #[test]
    fn scenario_cycle_wraps_and_applies_presets() {
        let catalog = ScenarioCatalog::parse(
            Path::new("scenarios.xml"),
            "<Scenarios>\
               <Scenario><name>Warmup</name></Scenario>\
               <Scenario><name>Hard</name><precision>95</precision></Scenario>\
             </Scenarios>",
        )
        .expect("catalog");
        let mut scene = scene_with(Some(far_organ()), catalog, PathBuf::from("unused"));
        assert_eq!(scene.scenario_name(), "Warmup");

        scene.update(0.016, &press(Trigger::NextScenario));
        assert_eq!(scene.scenario_name(), "Hard");
        assert_eq!(scene.settings().precision_target, 95.0);

        scene.update(0.016, &press(Trigger::NextScenario));
        assert_eq!(scene.scenario_name(), "Warmup");
        assert_eq!(scene.settings().precision_target, 95.0);
    }

    #[test]
    fn initial_scenario_out_of_range_falls_back_to_first() {
        let scene = SimulationScene::new(SimulationSetup {
            catalog: ScenarioCatalog::builtin(),
            scenario_index: 42,
            settings: SessionSettings::default(),
            organ: None,
            export_dir: PathBuf::from("unused"),
        });
        assert_eq!(scene.scenario_name(), "Basic");
    }

    #[test]
    fn initial_scenario_preset_overrides_configured_settings() {
        let catalog = ScenarioCatalog::parse(
            Path::new("scenarios.xml"),
            "<Scenarios><Scenario><name>Fast</name><speed>1.8</speed></Scenario></Scenarios>",
        )
        .expect("catalog");
        let scene = scene_with(None, catalog, PathBuf::from("unused"));
        assert!((scene.settings().arm_speed - 1.8).abs() < 1e-6);
        assert_eq!(scene.settings().precision_target, 75.0);
        let expected = ScenarioDef {
            name: "Fast".to_string(),
            preset: SettingsPreset {
                arm_speed: Some(1.8),
                ..SettingsPreset::default()
            },
        };
        assert_eq!(scene.catalog.get(0), Some(&expected));
    }

    #[test]
    fn export_writes_snapshot_while_idle() {
        let temp = TempDir::new().expect("temp");
        let mut scene = scene_with(
            Some(organ_around_start()),
            ScenarioCatalog::builtin(),
            temp.path().join("exports"),
        );
        scene.update(0.1, &press(Trigger::NextScenario));
        scene.update(0.1, &press(Trigger::ToggleSession));
        scene.update(0.1, &idle_frame());
        scene.update(0.1, &press(Trigger::ToggleSession));

        let path = scene.export_at(fixed_now()).expect("export");

        assert_eq!(
            path.file_name().and_then(|name| name.to_str()),
            Some("surgical-metrics-1700000000000.json")
        );
        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).expect("read")).expect("json");
        assert_eq!(value["scenario"], "Intermediate");
        assert_eq!(value["metrics"]["errors"], 1);
        assert_eq!(value["precisionSetting"], 75.0);
        assert_eq!(value["timestamp"], "2023-11-14T22:13:20.000Z");
        assert!(scene
            .hud_lines()
            .iter()
            .any(|line| line == "Exported: surgical-metrics-1700000000000.json"));
    }

    #[test]
    fn export_key_writes_a_file_and_reports_it() {
        let temp = TempDir::new().expect("temp");
        let export_dir = temp.path().join("exports");
        let mut scene = scene_with(None, ScenarioCatalog::builtin(), export_dir.clone());

        assert_eq!(scene.update(0.1, &press(Trigger::Export)), SceneCommand::None);

        let written: Vec<_> = fs::read_dir(&export_dir)
            .expect("exports dir")
            .map(|entry| entry.expect("entry").file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(written.len(), 1);
        assert!(written[0].starts_with("surgical-metrics-"));
        assert!(scene
            .hud_lines()
            .iter()
            .any(|line| line == &format!("Exported: {}", written[0])));
    }

    #[test]
    fn export_key_failure_keeps_the_scene_running() {
        let temp = TempDir::new().expect("temp");
        let blocker = temp.path().join("blocker");
        fs::write(&blocker, "x").expect("write");
        let mut scene = scene_with(None, ScenarioCatalog::builtin(), blocker);

        assert_eq!(scene.update(0.1, &press(Trigger::Export)), SceneCommand::None);
        assert!(scene
            .hud_lines()
            .iter()
            .any(|line| line.starts_with("Export failed")));
    }

    #[test]
    fn export_failure_is_reported_and_survivable() {
        let temp = TempDir::new().expect("temp");
        let blocker = temp.path().join("blocker");
        fs::write(&blocker, "x").expect("write");
        let mut scene = scene_with(None, ScenarioCatalog::builtin(), blocker);

        assert!(scene.export_at(fixed_now()).is_err());
        assert!(scene
            .hud_lines()
            .iter()
            .any(|line| line.starts_with("Export failed")));
        assert_eq!(scene.update(0.1, &idle_frame()), SceneCommand::None);
    }

    #[test]
    fn hud_reports_formatted_metrics() {
        let scene = scene(Some(far_organ()));
        let lines = scene.hud_lines();
        assert_eq!(lines[0], "Status: IDLE");
        assert!(lines.contains(&"Scenario: Basic".to_string()));
        assert!(lines.contains(&"Time: 00:00".to_string()));
        assert!(lines.contains(&"Path: 0.00".to_string()));
        assert!(lines.contains(&"Precision: 0.0%".to_string()));
        assert!(lines.contains(&"Last event: none".to_string()));
    }

    #[test]
    fn view_mirrors_zones_and_feedback() {
        let scene = scene(Some(far_organ()));
        let view = scene.view();
        assert_eq!(view.organ, Some(far_organ()));
        assert_eq!(view.target, scene.zones().target);
        assert_eq!(view.danger, scene.zones().danger);
        assert!((view.target_opacity - 0.48).abs() < 1e-5);
        assert!((view.danger_opacity - 0.35).abs() < 1e-5);
        assert!(!view.running);
        assert_eq!(view.instrument, TOOL_START);
    }

    #[test]
    fn missing_organ_leaves_zones_absent_but_still_tracks_time() {
        let mut scene = scene(None);
        assert!(scene.view().target.is_none());
        scene.update(0.1, &press(Trigger::ToggleSession));
        scene.update(0.2, &idle_frame());
        let metrics = scene.session().metrics();
        assert!((metrics.elapsed_seconds - 0.2).abs() < 1e-6);
        assert_eq!(metrics.precision_score, 0.0);
        assert_eq!(metrics.errors + metrics.collisions, 0);
    }

    #[test]
    fn quit_request_ends_the_loop() {
        let mut scene = scene(None);
        assert_eq!(
            scene.update(0.1, &idle_frame().with_quit_requested()),
            SceneCommand::Quit
        );
        assert_eq!(
            scene.title().as_deref(),
            Some("Surgical Trainer - Basic (idle)")
        );
    }
