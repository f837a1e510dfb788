//! Host-facing frame driver
//!
//! Glues the scheduler, input sampling, the simulation and the renderer
//! together. A host calls `frame` once per display refresh.

use crate::audio::AudioSink;
use crate::platform::{Controls, InputSampler};
use crate::renderer::{Surface, render_frame, scene::draw_fps};
use crate::sim::{FixedStepScheduler, FrameStats, Game, TickInput, tick};

pub struct Runner {
    pub game: Game,
    scheduler: FixedStepScheduler,
    sampler: InputSampler,
    /// Presses sampled on a frame that ran no ticks
    carried: TickInput,
    /// Smoothed frames per second
    fps: f32,
    frames: u64,
}

impl Runner {
    pub fn new(game: Game) -> Self {
        let scheduler =
            FixedStepScheduler::new(game.tuning.step_secs as f64, game.tuning.max_frame_delta);
        Self {
            game,
            scheduler,
            sampler: InputSampler::new(),
            carried: TickInput::default(),
            fps: 0.0,
            frames: 0,
        }
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Forget timing after a suspend so the next frame doesn't catch up
    pub fn resume(&mut self) {
        self.scheduler.reset();
    }

    /// Run one display frame at time `now` (seconds).
    ///
    /// Controls are sampled once per frame. Edge-triggered presses go to the
    /// first tick only (carried over if the frame runs none); held controls
    /// apply to every tick.
    pub fn frame(
        &mut self,
        now: f64,
        controls: &dyn Controls,
        audio: &mut dyn AudioSink,
        surface: &mut impl Surface,
    ) -> FrameStats {
        let mut input = self.sampler.sample(controls);
        input.start |= self.carried.start;
        input.pause |= self.carried.pause;
        input.action |= self.carried.action;
        let show_fps = self.game.settings.show_fps;
        let fps = self.fps;

        let stats = self.scheduler.advance(
            now,
            &mut self.game,
            |game, dt| {
                tick(game, &input, dt as f32);
                input.start = false;
                input.pause = false;
                input.action = false;
            },
            |game, alpha| {
                render_frame(game, alpha, surface);
                if show_fps {
                    draw_fps(surface, fps);
                }
            },
        );

        // Edges are cleared by the first tick, so whatever is left went unused
        self.carried = TickInput {
            start: input.start,
            pause: input.pause,
            action: input.action,
            ..Default::default()
        };

        self.game.drain_cues(audio);

        if stats.delta > 0.0 {
            let instant = (1.0 / stats.delta) as f32;
            self.fps = if self.fps == 0.0 {
                instant
            } else {
                self.fps * 0.9 + instant * 0.1
            };
        }
        self.frames += 1;
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::LogSink;
    use crate::platform::{Control, ScriptedControls};
    use crate::renderer::RecordingSurface;
    use crate::settings::Settings;
    use crate::sim::GamePhase;
    use crate::tuning::Tuning;

    #[test]
    fn test_start_pressed_once_per_frame() {
        let tuning = Tuning {
            step_secs: 1.0 / 64.0,
            ..Default::default()
        };
        let mut runner = Runner::new(Game::new(1, tuning, Settings::default()));
        let mut controls = ScriptedControls::new().tap(Control::Start, 1);
        let mut sink = LogSink::default();
        let mut surface = RecordingSurface::default();

        runner.frame(0.0, &controls, &mut sink, &mut surface);
        controls.tick = 1;
        // Four ticks this frame; start only reaches the first
        let stats = runner.frame(4.0 / 64.0, &controls, &mut sink, &mut surface);
        assert_eq!(stats.ticks, 4);
        assert_eq!(runner.game.phase(), GamePhase::Playing);
        assert_eq!(runner.game.session.time_ticks, 3);
        assert!(surface.has_text("SCORE"));
    }

    #[test]
    fn test_cues_drained_to_sink() {
        let tuning = Tuning {
            step_secs: 1.0 / 64.0,
            ..Default::default()
        };
        let mut runner = Runner::new(Game::new(1, tuning, Settings::default()));
        let mut controls = ScriptedControls::new()
            .tap(Control::Start, 0)
            .hold(Control::Fire, 1, 10);
        let mut sink = LogSink::default();
        let mut surface = RecordingSurface::default();

        runner.frame(0.0, &controls, &mut sink, &mut surface);
        for frame in 1..10 {
            controls.tick = frame;
            runner.frame(frame as f64 / 64.0, &controls, &mut sink, &mut surface);
        }
        assert!(sink.played > 0);
        assert!(runner.game.cues.is_empty());
    }
}
