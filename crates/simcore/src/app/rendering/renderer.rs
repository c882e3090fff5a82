use std::sync::Arc;

use pixels::{Error, Pixels, SurfaceTexture};
use winit::window::Window;

use super::hud::{draw_footer, draw_hud_panel};
use super::raster::{Canvas, Rgb};
use super::transform::{world_length_px, world_to_screen, Viewport};
use crate::app::metrics::FrameStatsSnapshot;
use crate::app::SceneView;
use crate::sim::{Aabb, Sphere, Vec3};

const CLEAR_COLOR: Rgb = [18, 20, 26];
const WORKSPACE_COLOR: Rgb = [46, 52, 64];
const ORGAN_FILL_COLOR: Rgb = [184, 72, 72];
const ORGAN_FILL_ALPHA: f32 = 0.85;
const ORGAN_EDGE_COLOR: Rgb = [222, 112, 112];
const TARGET_COLOR: Rgb = [100, 242, 180];
const DANGER_COLOR: Rgb = [255, 107, 107];
const TRAIL_COLOR: Rgb = [100, 242, 180];
const SHAFT_COLOR: Rgb = [150, 160, 176];
const TIP_COLOR_RUNNING: Rgb = [216, 240, 255];
const TIP_COLOR_IDLE: Rgb = [120, 132, 150];
const SHAFT_LENGTH_WORLD: f32 = 2.5;
const TIP_RADIUS_WORLD: f32 = 0.08;
const CONTROLS_HINT: &str =
    "SPACE start/stop  X export  TAB scenario  1/2 precision  3/4 speed  5/6 feedback  Q/E depth";

pub struct Renderer {
    window: Arc<Window>,
    pixels: Pixels<'static>,
    viewport: Viewport,
}

impl Renderer {
    pub fn new(window: Arc<Window>) -> Result<Self, Error> {
        let size = window.inner_size();
        let pixels = Self::build_pixels(Arc::clone(&window), size.width, size.height)?;
        Ok(Self {
            window,
            pixels,
            viewport: Viewport {
                width: size.width,
                height: size.height,
            },
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), Error> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.pixels = Self::build_pixels(Arc::clone(&self.window), width, height)?;
        self.viewport = Viewport { width, height };
        Ok(())
    }

    fn build_pixels(
        window: Arc<Window>,
        width: u32,
        height: u32,
    ) -> Result<Pixels<'static>, Error> {
        let surface = SurfaceTexture::new(width, height, window);
        Pixels::new(width, height, surface)
    }

    pub fn render(
        &mut self,
        view: &SceneView,
        stats: Option<&FrameStatsSnapshot>,
    ) -> Result<(), Error> {
        if self.viewport.width == 0 || self.viewport.height == 0 {
            return Ok(());
        }
        let viewport = self.viewport;
        let mut canvas = Canvas::new(self.pixels.frame_mut(), viewport.width, viewport.height);
        draw_scene(&mut canvas, viewport, view, stats);
        self.pixels.render()
    }
}

pub(crate) fn draw_scene(
    canvas: &mut Canvas<'_>,
    viewport: Viewport,
    view: &SceneView,
    stats: Option<&FrameStatsSnapshot>,
) {
    canvas.clear(CLEAR_COLOR);

    if let Some(workspace) = view.workspace {
        draw_box_outline(canvas, viewport, &workspace, WORKSPACE_COLOR);
    }
    if let Some(organ) = view.organ {
        draw_organ(canvas, viewport, &organ);
    }
    if let Some(danger) = view.danger {
        draw_zone(canvas, viewport, &danger, DANGER_COLOR, view.danger_opacity);
    }
    if let Some(target) = view.target {
        draw_zone(canvas, viewport, &target, TARGET_COLOR, view.target_opacity);
    }
    draw_trail(canvas, viewport, &view.trail);
    draw_instrument(canvas, viewport, view.instrument, view.running);

    let mut lines = view.hud_lines.clone();
    if let Some(stats) = stats {
        lines.push(format!(
            "FPS: {:.0} ({:.1} ms)",
            stats.fps, stats.frame_time_ms
        ));
    }
    draw_hud_panel(canvas, &lines);
    draw_footer(canvas, CONTROLS_HINT);
}

fn box_screen_rect(viewport: Viewport, bounds: &Aabb) -> (i32, i32, i32, i32) {
    let (left, top) = world_to_screen(Vec3::new(bounds.min.x, bounds.max.y, 0.0), viewport);
    let (right, bottom) = world_to_screen(Vec3::new(bounds.max.x, bounds.min.y, 0.0), viewport);
    (left, top, (right - left).max(0) + 1, (bottom - top).max(0) + 1)
}

fn draw_box_outline(canvas: &mut Canvas<'_>, viewport: Viewport, bounds: &Aabb, color: Rgb) {
    let (x, y, w, h) = box_screen_rect(viewport, bounds);
    canvas.rect_outline(x, y, w, h, color);
}

fn draw_organ(canvas: &mut Canvas<'_>, viewport: Viewport, organ: &Aabb) {
    let (x, y, w, h) = box_screen_rect(viewport, organ);
    canvas.fill_rect(x, y, w, h, ORGAN_FILL_COLOR, ORGAN_FILL_ALPHA);
    canvas.rect_outline(x, y, w, h, ORGAN_EDGE_COLOR);
}

fn draw_zone(canvas: &mut Canvas<'_>, viewport: Viewport, zone: &Sphere, color: Rgb, alpha: f32) {
    let (cx, cy) = world_to_screen(zone.center, viewport);
    let radius = world_length_px(zone.radius, viewport);
    canvas.fill_circle(cx, cy, radius, color, alpha);
    canvas.circle_outline(cx, cy, radius, color);
}

fn draw_trail(canvas: &mut Canvas<'_>, viewport: Viewport, trail: &[Vec3]) {
    for pair in trail.windows(2) {
        let from = world_to_screen(pair[0], viewport);
        let to = world_to_screen(pair[1], viewport);
        canvas.line(from, to, TRAIL_COLOR);
    }
}

fn draw_instrument(canvas: &mut Canvas<'_>, viewport: Viewport, tip: Vec3, running: bool) {
    let (tip_x, tip_y) = world_to_screen(tip, viewport);
    let (top_x, top_y) = world_to_screen(tip + Vec3::new(0.0, SHAFT_LENGTH_WORLD, 0.0), viewport);
    for offset in -1..=1 {
        canvas.line((tip_x + offset, tip_y), (top_x + offset, top_y), SHAFT_COLOR);
    }
    let tip_color = if running {
        TIP_COLOR_RUNNING
    } else {
        TIP_COLOR_IDLE
    };
    let radius = world_length_px(TIP_RADIUS_WORLD, viewport).max(2);
    canvas.fill_circle(tip_x, tip_y, radius, tip_color, 1.0);
}
