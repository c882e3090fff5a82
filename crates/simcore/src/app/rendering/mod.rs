mod hud;
mod raster;
mod renderer;
mod transform;

pub use renderer::Renderer;
pub use transform::{
    cursor_to_ndc, view_extent_world, world_length_px, world_to_screen, Viewport,
    VIEW_HEIGHT_WORLD,
};
