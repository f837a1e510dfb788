//! Game settings and preferences
//!
//! Kept separate from balance tuning; these are choices the player makes.

use serde::{Deserialize, Serialize};

/// How horizontal input moves the hero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ControlMode {
    /// Left/right moves the hero's own x coordinate
    #[default]
    Direct,
    /// Left/right shifts the scenery instead; the hero stays put
    SceneryShift,
}

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Particles spawned per explosion
    pub fn burst_size(&self) -> usize {
        match self {
            QualityPreset::Low => 4,
            QualityPreset::Medium => 10,
            QualityPreset::High => 18,
        }
    }

    /// Most particles alive at once
    pub fn particle_cap(&self) -> usize {
        match self {
            QualityPreset::Low => 24,
            QualityPreset::Medium => 60,
            QualityPreset::High => 100,
        }
    }

    /// Whether the far star layer is drawn
    pub fn starfield_enabled(&self) -> bool {
        !matches!(self, QualityPreset::Low)
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Horizontal control scheme
    pub control_mode: ControlMode,
    /// Graphics quality preset
    pub quality: QualityPreset,
    /// Particle effects (explosions)
    pub particles: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Show the FPS / tick counter overlay
    pub show_fps: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            control_mode: ControlMode::Direct,
            quality: QualityPreset::Medium,
            particles: true,
            master_volume: 0.8,
            sfx_volume: 1.0,
            show_fps: false,
        }
    }
}

impl Settings {
    /// Parse settings from JSON (missing fields use defaults)
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Particles per explosion burst (0 when particles are off)
    pub fn burst_size(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.burst_size()
        }
    }

    /// Live particle limit (0 when particles are off)
    pub fn particle_cap(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.particle_cap()
        }
    }

    /// Effective cue volume
    pub fn effective_volume(&self) -> f32 {
        (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_particles_off_means_no_burst() {
        let settings = Settings {
            particles: false,
            ..Default::default()
        };
        assert_eq!(settings.burst_size(), 0);
    }

    #[test]
    fn test_particle_cap_follows_preset() {
        let low = Settings {
            quality: QualityPreset::Low,
            ..Default::default()
        };
        let high = Settings {
            quality: QualityPreset::High,
            ..Default::default()
        };
        assert!(low.particle_cap() < high.particle_cap());
        assert!(low.burst_size() <= low.particle_cap());
        let off = Settings {
            particles: false,
            ..high
        };
        assert_eq!(off.particle_cap(), 0);
    }

    #[test]
    fn test_parse_control_mode() {
        let settings = Settings::from_json(r#"{ "control_mode": "SceneryShift" }"#).unwrap();
        assert_eq!(settings.control_mode, ControlMode::SceneryShift);
        assert_eq!(settings.quality, QualityPreset::Medium);
    }

    #[test]
    fn test_preset_from_str() {
        assert_eq!(QualityPreset::from_str("MED"), Some(QualityPreset::Medium));
        assert_eq!(QualityPreset::from_str("ultra"), None);
    }
}
