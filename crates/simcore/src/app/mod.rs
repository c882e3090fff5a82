mod input;
mod loop_runner;
mod metrics;
mod rendering;
mod scene;

pub use input::{InputAction, Trigger};
pub use loop_runner::{run_app, AppError, LoopConfig};
pub use metrics::FrameStatsSnapshot;
pub use rendering::{
    cursor_to_ndc, view_extent_world, world_length_px, world_to_screen, Renderer, Viewport,
    VIEW_HEIGHT_WORLD,
};
pub use scene::{InputSnapshot, Scene, SceneCommand, SceneView};
