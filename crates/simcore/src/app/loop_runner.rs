use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use pixels::Error as PixelsError;
use thiserror::Error;
use tracing::{info, warn};
use winit::dpi::LogicalSize;
use winit::error::{EventLoopError, OsError};
use winit::event::{ElementState, Event, KeyEvent, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::WindowBuilder;

use super::input::{ActionStates, TriggerEdges};
use super::metrics::FrameStatsAccumulator;
use super::rendering::cursor_to_ndc;
use super::{InputAction, InputSnapshot, Renderer, Scene, SceneCommand, Trigger};

#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub window_title: String,
    pub window_width: u32,
    pub window_height: u32,
    pub max_frame_delta: Duration,
    pub stats_log_interval: Duration,
    pub max_render_fps: Option<u32>,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            window_title: "Surgical Trainer".to_string(),
            window_width: 1280,
            window_height: 720,
            max_frame_delta: Duration::from_millis(250),
            stats_log_interval: Duration::from_secs(1),
            max_render_fps: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to create event loop: {0}")]
    CreateEventLoop(#[source] EventLoopError),
    #[error("failed to create application window: {0}")]
    CreateWindow(#[source] OsError),
    #[error("failed to initialize renderer: {0}")]
    CreateRenderer(#[source] PixelsError),
    #[error("event loop failed: {0}")]
    EventLoopRun(#[source] EventLoopError),
}

/// Drives `scene` once per presented frame with the clamped wall-clock delta
/// until the window closes or the scene asks to quit.
pub fn run_app(config: LoopConfig, mut scene: Box<dyn Scene>) -> Result<(), AppError> {
    let event_loop = EventLoop::new().map_err(AppError::CreateEventLoop)?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(config.window_title.clone())
            .with_inner_size(LogicalSize::new(
                config.window_width as f64,
                config.window_height as f64,
            ))
            .build(&event_loop)
            .map_err(AppError::CreateWindow)?,
    );
    let mut renderer = Renderer::new(Arc::clone(&window)).map_err(AppError::CreateRenderer)?;

    event_loop.set_control_flow(ControlFlow::Poll);

    let max_frame_delta =
        normalize_non_zero_duration(config.max_frame_delta, Duration::from_millis(250));
    let stats_log_interval =
        normalize_non_zero_duration(config.stats_log_interval, Duration::from_secs(1));
    let effective_render_cap = normalize_render_fps_cap(config.max_render_fps);
    let render_frame_target = target_frame_duration(effective_render_cap);
    let initial_size = window.inner_size();
    let mut input_collector = InputCollector::new(initial_size.width, initial_size.height);

    scene.load();
    info!(
        max_frame_delta_ms = max_frame_delta.as_millis() as u64,
        stats_log_interval_ms = stats_log_interval.as_millis() as u64,
        render_fps_cap = %format_render_cap(effective_render_cap),
        "loop_config"
    );

    let mut last_frame_instant = Instant::now();
    let mut last_present_instant = Instant::now();
    let mut frame_stats = FrameStatsAccumulator::new(stats_log_interval, Instant::now());
    let mut latest_stats = None;
    let mut last_applied_title: Option<String> = None;

    event_loop
        .run(move |event, window_target| match event {
            Event::WindowEvent { window_id, event } if window_id == window.id() => match event {
                WindowEvent::CloseRequested => {
                    info!(reason = "window_close", "shutdown_requested");
                    window_target.exit();
                }
                WindowEvent::Resized(new_size) => {
                    input_collector.set_window_size(new_size.width, new_size.height);
                    if let Err(error) = renderer.resize(new_size.width, new_size.height) {
                        warn!(error = %error, "renderer_resize_failed");
                        window_target.exit();
                    }
                }
                WindowEvent::ScaleFactorChanged { .. } => {
                    let size = window.inner_size();
                    input_collector.set_window_size(size.width, size.height);
                    if let Err(error) = renderer.resize(size.width, size.height) {
                        warn!(error = %error, "renderer_resize_failed");
                        window_target.exit();
                    }
                }
                WindowEvent::Focused(false) => input_collector.release_held_actions(),
                WindowEvent::CursorMoved { position, .. } => {
                    input_collector.set_cursor_position_px(position.x as f32, position.y as f32);
                }
                WindowEvent::CursorLeft { .. } => input_collector.clear_cursor_position(),
                WindowEvent::KeyboardInput { event, .. } => {
                    input_collector.handle_keyboard_input(&event);
                    if input_collector.quit_requested {
                        info!(reason = "escape_key", "shutdown_requested");
                        window_target.exit();
                    }
                }
                WindowEvent::RedrawRequested => {
                    let now = Instant::now();
                    let raw_frame_dt = now.saturating_duration_since(last_frame_instant);
                    last_frame_instant = now;
                    let frame_dt = clamp_frame_delta(raw_frame_dt, max_frame_delta);
                    if frame_dt < raw_frame_dt {
                        warn!(
                            raw_frame_ms = raw_frame_dt.as_millis() as u64,
                            clamped_frame_ms = frame_dt.as_millis() as u64,
                            "frame_delta_clamped"
                        );
                    }

                    let snapshot = input_collector.snapshot_for_frame();
                    if scene.update(frame_dt.as_secs_f32(), &snapshot) == SceneCommand::Quit {
                        info!(reason = "scene_quit", "shutdown_requested");
                        window_target.exit();
                        return;
                    }

                    // Only sleep point for render pacing.
                    let elapsed_since_last_present =
                        Instant::now().saturating_duration_since(last_present_instant);
                    let cap_sleep =
                        compute_cap_sleep(elapsed_since_last_present, render_frame_target);
                    if cap_sleep > Duration::ZERO {
                        thread::sleep(cap_sleep);
                    }

                    let view = scene.view();
                    if let Err(error) = renderer.render(&view, latest_stats.as_ref()) {
                        warn!(error = %error, "renderer_draw_failed");
                        window_target.exit();
                    }
                    last_present_instant = Instant::now();

                    let next_title = scene.title();
                    if next_title != last_applied_title {
                        let title = next_title.as_deref().unwrap_or(config.window_title.as_str());
                        window.set_title(title);
                        last_applied_title = next_title;
                    }

                    frame_stats.record_frame(raw_frame_dt);
                    if let Some(stats) = frame_stats.maybe_snapshot(now) {
                        info!(
                            fps = stats.fps,
                            frame_time_ms = stats.frame_time_ms,
                            worst_frame_ms = stats.worst_frame_ms,
                            "frame_stats"
                        );
                        latest_stats = Some(stats);
                    }
                }
                _ => {}
            },
            Event::AboutToWait => window.request_redraw(),
            Event::LoopExiting => {
                scene.unload();
                info!("shutdown");
            }
            _ => {}
        })
        .map_err(AppError::EventLoopRun)
}

#[derive(Debug, Default)]
struct InputCollector {
    quit_requested: bool,
    action_states: ActionStates,
    trigger_edges: TriggerEdges<KeyCode>,
    cursor_position_px: Option<(f32, f32)>,
    window_width: u32,
    window_height: u32,
}

impl InputCollector {
    fn new(window_width: u32, window_height: u32) -> Self {
        Self {
            window_width,
            window_height,
            ..Self::default()
        }
    }

    fn handle_keyboard_input(&mut self, key_event: &KeyEvent) {
        let is_pressed = key_event.state == ElementState::Pressed;
        self.handle_physical_key(key_event.physical_key, is_pressed);
    }

    fn handle_physical_key(&mut self, key: PhysicalKey, is_pressed: bool) {
        let PhysicalKey::Code(code) = key else {
            return;
        };
        if let Some(action) = action_for_key(code) {
            self.action_states.set(action, is_pressed);
            if action == InputAction::Quit && is_pressed {
                self.quit_requested = true;
            }
        }
        if let Some(trigger) = trigger_for_key(code) {
            self.trigger_edges.handle(code, trigger, is_pressed);
        }
    }

    fn release_held_actions(&mut self) {
        self.action_states = ActionStates::default();
        self.trigger_edges.release_all();
    }

    fn snapshot_for_frame(&mut self) -> InputSnapshot {
        let pointer = self
            .cursor_position_px
            .and_then(|(x, y)| cursor_to_ndc(x, y, self.window_width, self.window_height));
        InputSnapshot::new(
            self.quit_requested,
            self.action_states,
            self.trigger_edges.take(),
            pointer,
            self.window_width,
            self.window_height,
        )
    }

    fn set_window_size(&mut self, width: u32, height: u32) {
        self.window_width = width;
        self.window_height = height;
    }

    fn set_cursor_position_px(&mut self, x: f32, y: f32) {
        self.cursor_position_px = Some((x, y));
    }

    fn clear_cursor_position(&mut self) {
        self.cursor_position_px = None;
    }
}

fn action_for_key(code: KeyCode) -> Option<InputAction> {
    match code {
        KeyCode::KeyE => Some(InputAction::DepthIn),
        KeyCode::KeyQ => Some(InputAction::DepthOut),
        KeyCode::Escape => Some(InputAction::Quit),
        _ => None,
    }
}

fn trigger_for_key(code: KeyCode) -> Option<Trigger> {
    match code {
        KeyCode::Space => Some(Trigger::ToggleSession),
        KeyCode::KeyX | KeyCode::F5 => Some(Trigger::Export),
        KeyCode::Tab => Some(Trigger::NextScenario),
        KeyCode::Digit1 => Some(Trigger::PrecisionDown),
        KeyCode::Digit2 => Some(Trigger::PrecisionUp),
        KeyCode::Digit3 => Some(Trigger::SpeedDown),
        KeyCode::Digit4 => Some(Trigger::SpeedUp),
        KeyCode::Digit5 => Some(Trigger::FeedbackDown),
        KeyCode::Digit6 => Some(Trigger::FeedbackUp),
        _ => None,
    }
}

fn clamp_frame_delta(frame_dt: Duration, max_frame_delta: Duration) -> Duration {
    frame_dt.min(max_frame_delta)
}

fn normalize_non_zero_duration(value: Duration, fallback: Duration) -> Duration {
    if value.is_zero() {
        fallback
    } else {
        value
    }
}

fn normalize_render_fps_cap(cap: Option<u32>) -> Option<u32> {
    cap.filter(|value| *value > 0)
}

fn target_frame_duration(max_render_fps: Option<u32>) -> Option<Duration> {
    max_render_fps.map(|fps| Duration::from_secs_f64(1.0 / fps as f64))
}

fn compute_cap_sleep(elapsed: Duration, target: Option<Duration>) -> Duration {
    match target {
        Some(frame_target) if elapsed < frame_target => frame_target - elapsed,
        _ => Duration::ZERO,
    }
}

fn format_render_cap(cap: Option<u32>) -> String {
    match cap {
        Some(value) => value.to_string(),
        None => "off".to_string(),
    }
}
