use super::input::{ActionStates, InputAction, Trigger, TriggerSet};
use crate::sim::{Aabb, PointerNdc, Sphere, Vec3};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneCommand {
    None,
    Quit,
}

/// Everything a scene may read about the operator's input for one frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct InputSnapshot {
    quit_requested: bool,
    actions: ActionStates,
    triggers: TriggerSet,
    pointer_ndc: Option<PointerNdc>,
    window_width: u32,
    window_height: u32,
}

impl InputSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn new(
        quit_requested: bool,
        actions: ActionStates,
        triggers: TriggerSet,
        pointer_ndc: Option<PointerNdc>,
        window_width: u32,
        window_height: u32,
    ) -> Self {
        Self {
            quit_requested,
            actions,
            triggers,
            pointer_ndc,
            window_width,
            window_height,
        }
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub fn is_down(&self, action: InputAction) -> bool {
        self.actions.is_down(action)
    }

    pub fn pressed(&self, trigger: Trigger) -> bool {
        self.triggers.contains(trigger)
    }

    /// +1 while only the deepen key is held, -1 while only the withdraw key
    /// is held, 0 otherwise.
    pub fn depth_axis(&self) -> f32 {
        let deeper = self.is_down(InputAction::DepthIn) as i32;
        let shallower = self.is_down(InputAction::DepthOut) as i32;
        (deeper - shallower) as f32
    }

    pub fn pointer_ndc(&self) -> Option<PointerNdc> {
        self.pointer_ndc
    }

    pub fn window_size(&self) -> (u32, u32) {
        (self.window_width, self.window_height)
    }

    pub fn with_quit_requested(mut self) -> Self {
        self.quit_requested = true;
        self
    }

    pub fn with_action_down(mut self, action: InputAction, is_down: bool) -> Self {
        self.actions.set(action, is_down);
        self
    }

    pub fn with_pressed(mut self, trigger: Trigger) -> Self {
        self.triggers.set(trigger, true);
        self
    }

    pub fn with_pointer_ndc(mut self, pointer: Option<PointerNdc>) -> Self {
        self.pointer_ndc = pointer;
        self
    }

    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.window_width = width;
        self.window_height = height;
        self
    }
}

/// What the renderer draws for one frame. Built by the scene, consumed
/// read-only by the renderer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneView {
    pub workspace: Option<Aabb>,
    pub organ: Option<Aabb>,
    pub target: Option<Sphere>,
    pub danger: Option<Sphere>,
    pub target_opacity: f32,
    pub danger_opacity: f32,
    pub instrument: Vec3,
    pub trail: Vec<Vec3>,
    pub running: bool,
    pub hud_lines: Vec<String>,
}

pub trait Scene {
    fn load(&mut self);
    fn update(&mut self, frame_dt_seconds: f32, input: &InputSnapshot) -> SceneCommand;
    fn view(&self) -> SceneView;
    fn unload(&mut self);
    fn title(&self) -> Option<String> {
        None
    }
}
