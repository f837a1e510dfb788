//! Boolean control queries and per-tick sampling

use serde::{Deserialize, Serialize};

use crate::sim::TickInput;

/// Logical controls the host maps its devices onto
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Control {
    Left,
    Right,
    Up,
    Down,
    Fire,
    /// Interact (talk to NPCs, leave via the dock tile)
    Action,
    Start,
    Pause,
    Warp,
    Magwave,
    /// Touch zone held (treated as fire)
    TouchZone,
    /// Device tilted (treated as warp)
    Tilt,
}

/// Input collaborator. Polled, never calls back into the simulation.
pub trait Controls {
    fn is_active(&self, control: Control) -> bool;
}

/// Turns level-triggered control queries into one `TickInput` per tick.
///
/// Start and pause are edge-triggered so holding the key doesn't flip the
/// state machine every tick.
#[derive(Debug, Clone, Default)]
pub struct InputSampler {
    prev_start: bool,
    prev_pause: bool,
    prev_action: bool,
}

impl InputSampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take a snapshot of the controls for the coming tick
    pub fn sample(&mut self, controls: &dyn Controls) -> TickInput {
        let start = controls.is_active(Control::Start);
        let pause = controls.is_active(Control::Pause);
        let action = controls.is_active(Control::Action);

        let mut dx = 0.0;
        if controls.is_active(Control::Left) {
            dx -= 1.0;
        }
        if controls.is_active(Control::Right) {
            dx += 1.0;
        }
        let mut dy = 0.0;
        if controls.is_active(Control::Up) {
            dy -= 1.0;
        }
        if controls.is_active(Control::Down) {
            dy += 1.0;
        }

        let input = TickInput {
            dx,
            dy,
            fire: controls.is_active(Control::Fire) || controls.is_active(Control::TouchZone),
            warp: controls.is_active(Control::Warp) || controls.is_active(Control::Tilt),
            magwave: controls.is_active(Control::Magwave),
            start: start && !self.prev_start,
            pause: pause && !self.prev_pause,
            action: action && !self.prev_action,
        };

        self.prev_start = start;
        self.prev_pause = pause;
        self.prev_action = action;
        input
    }
}

/// Controls driven by a script of (first_tick, last_tick, control) spans.
///
/// Used by the headless binary and tests; the tick counter is advanced by the
/// caller.
#[derive(Debug, Clone, Default)]
pub struct ScriptedControls {
    spans: Vec<(u64, u64, Control)>,
    pub tick: u64,
}

impl ScriptedControls {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold `control` from `first` through `last` (inclusive)
    pub fn hold(mut self, control: Control, first: u64, last: u64) -> Self {
        self.spans.push((first, last, control));
        self
    }

    /// Press `control` for a single tick
    pub fn tap(self, control: Control, at: u64) -> Self {
        self.hold(control, at, at)
    }
}

impl Controls for ScriptedControls {
    fn is_active(&self, control: Control) -> bool {
        self.spans
            .iter()
            .any(|&(first, last, c)| c == control && (first..=last).contains(&self.tick))
    }
}
