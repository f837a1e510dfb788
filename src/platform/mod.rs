//! Platform abstraction layer
//!
//! Keyboard, touch and tilt capture live in the host. The simulation only asks
//! whether a named control is currently active.

pub mod input;

pub use input::{Control, Controls, InputSampler, ScriptedControls};
