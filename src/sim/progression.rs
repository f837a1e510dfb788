//! Score, experience and energy meters

use serde::{Deserialize, Serialize};

use crate::audio::{AudioCue, CueQueue};

/// XP needed to leave `level`
#[inline]
pub fn xp_threshold(level: u32) -> u64 {
    level as u64 * 100
}

/// A bounded resource that drains while active and recharges while idle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnergyMeter {
    pub value: f32,
    pub max: f32,
    pub recharge_per_sec: f32,
    pub drain_per_sec: f32,
    pub active: bool,
}

impl EnergyMeter {
    /// A full, idle meter
    pub fn new(max: f32, recharge_per_sec: f32, drain_per_sec: f32) -> Self {
        Self {
            value: max,
            max,
            recharge_per_sec,
            drain_per_sec,
            active: false,
        }
    }

    /// Drain or recharge for `dt` seconds, clamped to [0, max]
    pub fn update(&mut self, dt: f32) {
        let rate = if self.active {
            -self.drain_per_sec
        } else {
            self.recharge_per_sec
        };
        self.value = (self.value + rate * dt).clamp(0.0, self.max);
    }

    pub fn refill(&mut self) {
        self.value = self.max;
    }

    pub fn is_empty(&self) -> bool {
        self.value <= 0.0
    }

    /// Fill level in 0..=1, for meters on the HUD
    pub fn fraction(&self) -> f32 {
        if self.max <= 0.0 {
            0.0
        } else {
            self.value / self.max
        }
    }
}

/// Warp meter update for one tick. Returns true while warp is engaged.
///
/// Warp can only engage at or above `low_water`, and disengages in the same
/// tick the meter falls below it.
pub fn update_warp(
    meter: &mut EnergyMeter,
    wants_warp: bool,
    low_water: f32,
    dt: f32,
    cues: &mut CueQueue,
) -> bool {
    let was_active = meter.active;
    meter.active = wants_warp && meter.value >= low_water;
    meter.update(dt);
    if meter.active && meter.value < low_water {
        meter.active = false;
    }

    match (was_active, meter.active) {
        (false, true) => cues.push(AudioCue::WarpStart),
        (true, false) => cues.push(AudioCue::WarpStop),
        _ => {}
    }
    meter.active
}

/// Magwave meter update for one tick. Active while held and not empty.
pub fn update_magwave(meter: &mut EnergyMeter, wants_magwave: bool, dt: f32) -> bool {
    meter.active = wants_magwave && !meter.is_empty();
    meter.update(dt);
    meter.active
}

/// Score and level tracking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progression {
    pub score: u64,
    pub xp: u64,
    pub level: u32,
}

impl Default for Progression {
    fn default() -> Self {
        Self {
            score: 0,
            xp: 0,
            level: 1,
        }
    }
}

impl Progression {
    /// Record a scoring event. Points also count as XP.
    pub fn add_score(&mut self, points: u64) {
        self.score += points;
        self.xp += points;
    }

    /// Grant XP alone (no score) and level up right away
    pub fn add_xp(&mut self, amount: u64, cues: &mut CueQueue) -> u32 {
        self.xp += amount;
        self.resolve_levels(cues)
    }

    /// Spend XP on as many levels as it covers. One cue per level gained.
    pub fn resolve_levels(&mut self, cues: &mut CueQueue) -> u32 {
        let mut gained = 0;
        while self.xp >= xp_threshold(self.level) {
            self.xp -= xp_threshold(self.level);
            self.level += 1;
            gained += 1;
            cues.push(AudioCue::LevelUp);
        }
        if gained > 0 {
            log::info!("Level up x{} -> level {}", gained, self.level);
        }
        gained
    }

    /// XP progress toward the next level in 0..=1
    pub fn level_fraction(&self) -> f32 {
        self.xp as f32 / xp_threshold(self.level) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn test_add_xp_levels_immediately() {
        let mut progress = Progression::default();
        let mut cues = CueQueue::default();
        assert_eq!(progress.add_xp(250, &mut cues), 1);
        assert_eq!(progress.level, 2);
        assert_eq!(progress.xp, 150);
        assert_eq!(progress.score, 0);
        assert_eq!(cues.len(), 1);
    }

    #[test]
    fn test_multi_level_jump() {
        let mut progress = Progression {
            score: 0,
            xp: 250,
            level: 1,
        };
        let mut cues = CueQueue::default();
        let gained = progress.resolve_levels(&mut cues);
        assert_eq!(gained, 2);
        assert_eq!(progress.level, 3);
        assert_eq!(progress.xp, 50);
        assert_eq!(cues.len(), 2);
    }

    #[test]
    fn test_exact_threshold_levels() {
        let mut progress = Progression::default();
        progress.add_score(100);
        progress.resolve_levels(&mut CueQueue::default());
        assert_eq!(progress.level, 2);
        assert_eq!(progress.xp, 0);
        assert_eq!(progress.score, 100);
    }

    #[test]
    fn test_warp_drain_one_tick() {
        let mut meter = EnergyMeter::new(100.0, 10.0, 100.0);
        meter.value = 15.0;
        meter.active = true;
        let mut cues = CueQueue::default();

        let active = update_warp(&mut meter, true, 10.0 * DT, DT, &mut cues);
        assert!(active);
        assert!((meter.value - 13.333).abs() < 0.01);
        assert!(cues.is_empty());
    }

    #[test]
    fn test_warp_cuts_out_in_crossing_tick() {
        let mut meter = EnergyMeter::new(100.0, 10.0, 100.0);
        meter.value = 1.0;
        meter.active = true;
        let mut cues = CueQueue::default();

        let active = update_warp(&mut meter, true, 10.0 * DT, DT, &mut cues);
        assert!(!active);
        assert!(!meter.active);
        assert_eq!(meter.value, 0.0);
        assert!(cues.contains(AudioCue::WarpStop));
    }

    #[test]
    fn test_warp_cannot_start_when_low() {
        let mut meter = EnergyMeter::new(100.0, 10.0, 100.0);
        meter.value = 0.05;
        let mut cues = CueQueue::default();
        assert!(!update_warp(&mut meter, true, 10.0 * DT, DT, &mut cues));
        // Recharged instead
        assert!(meter.value > 0.05);
        assert!(cues.is_empty());
    }

    #[test]
    fn test_recharge_clamps_at_max() {
        let mut meter = EnergyMeter::new(50.0, 1000.0, 10.0);
        meter.value = 49.0;
        meter.update(1.0);
        assert_eq!(meter.value, 50.0);
    }

    #[test]
    fn test_magwave_stops_when_empty() {
        let mut meter = EnergyMeter::new(100.0, 15.0, 40.0);
        meter.value = 0.0;
        assert!(!update_magwave(&mut meter, true, DT));
    }
}
