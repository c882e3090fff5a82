use std::collections::HashSet;
use std::hash::Hash;

/// Held inputs, sampled as levels every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    DepthIn,
    DepthOut,
    Quit,
}

const ACTION_COUNT: usize = 3;

impl InputAction {
    const fn index(self) -> usize {
        match self {
            InputAction::DepthIn => 0,
            InputAction::DepthOut => 1,
            InputAction::Quit => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct ActionStates {
    down: [bool; ACTION_COUNT],
}

impl ActionStates {
    pub(crate) fn set(&mut self, action: InputAction, is_down: bool) {
        self.down[action.index()] = is_down;
    }

    pub(crate) fn is_down(&self, action: InputAction) -> bool {
        self.down[action.index()]
    }
}

/// Discrete commands that fire once per key press, never while held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    ToggleSession,
    Export,
    NextScenario,
    PrecisionDown,
    PrecisionUp,
    SpeedDown,
    SpeedUp,
    FeedbackDown,
    FeedbackUp,
}

const TRIGGER_COUNT: usize = 9;

impl Trigger {
    pub const ALL: [Trigger; TRIGGER_COUNT] = [
        Trigger::ToggleSession,
        Trigger::Export,
        Trigger::NextScenario,
        Trigger::PrecisionDown,
        Trigger::PrecisionUp,
        Trigger::SpeedDown,
        Trigger::SpeedUp,
        Trigger::FeedbackDown,
        Trigger::FeedbackUp,
    ];

    const fn index(self) -> usize {
        match self {
            Trigger::ToggleSession => 0,
            Trigger::Export => 1,
            Trigger::NextScenario => 2,
            Trigger::PrecisionDown => 3,
            Trigger::PrecisionUp => 4,
            Trigger::SpeedDown => 5,
            Trigger::SpeedUp => 6,
            Trigger::FeedbackDown => 7,
            Trigger::FeedbackUp => 8,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct TriggerSet {
    pressed: [bool; TRIGGER_COUNT],
}

impl TriggerSet {
    pub(crate) fn set(&mut self, trigger: Trigger, pressed: bool) {
        self.pressed[trigger.index()] = pressed;
    }

    pub(crate) fn contains(&self, trigger: Trigger) -> bool {
        self.pressed[trigger.index()]
    }
}

/// Turns raw key levels into single-frame press edges. Edges are tracked per
/// physical key so two keys bound to one trigger fire independently.
#[derive(Debug, Clone)]
pub(crate) struct TriggerEdges<K> {
    held: HashSet<K>,
    pending: TriggerSet,
}

impl<K> Default for TriggerEdges<K> {
    fn default() -> Self {
        Self {
            held: HashSet::new(),
            pending: TriggerSet::default(),
        }
    }
}

impl<K: Eq + Hash> TriggerEdges<K> {
    pub(crate) fn handle(&mut self, key: K, trigger: Trigger, is_pressed: bool) {
        if is_pressed {
            if self.held.insert(key) {
                self.pending.set(trigger, true);
            }
        } else {
            self.held.remove(&key);
        }
    }

    /// Forgets every held key so the next press after a lost release fires.
    pub(crate) fn release_all(&mut self) {
        self.held.clear();
    }

    pub(crate) fn take(&mut self) -> TriggerSet {
        std::mem::take(&mut self.pending)
    }
}
