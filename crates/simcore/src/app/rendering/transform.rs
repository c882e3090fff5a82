use crate::sim::{PointerNdc, Vec3};

/// World units visible from the bottom to the top of the window. The width
/// follows the window's aspect ratio.
pub const VIEW_HEIGHT_WORLD: f32 = 9.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn pixels_per_world(&self) -> f32 {
        if self.height == 0 {
            return 1.0;
        }
        self.height as f32 / VIEW_HEIGHT_WORLD
    }

    pub fn extent_world(&self) -> (f32, f32) {
        let scale = self.pixels_per_world();
        (self.width as f32 / scale, self.height as f32 / scale)
    }
}

pub fn view_extent_world(width: u32, height: u32) -> (f32, f32) {
    Viewport { width, height }.extent_world()
}

/// Front orthographic projection: x right, y up, depth discarded.
pub fn world_to_screen(world: Vec3, viewport: Viewport) -> (i32, i32) {
    let scale = viewport.pixels_per_world();
    let x = world.x * scale + viewport.width as f32 * 0.5;
    let y = viewport.height as f32 * 0.5 - world.y * scale;
    (x.round() as i32, y.round() as i32)
}

pub fn world_length_px(length: f32, viewport: Viewport) -> i32 {
    (length * viewport.pixels_per_world()).round() as i32
}

/// `None` for a zero-sized window.
pub fn cursor_to_ndc(cursor_x: f32, cursor_y: f32, width: u32, height: u32) -> Option<PointerNdc> {
    if width == 0 || height == 0 {
        return None;
    }
    Some(PointerNdc {
        x: cursor_x / width as f32 * 2.0 - 1.0,
        y: 1.0 - cursor_y / height as f32 * 2.0,
    })
}
