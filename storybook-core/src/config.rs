use std::time::Duration;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    pub assets_path:  String,
    pub catalog_path: String,
    pub log_path:     String,
    pub log_level:    String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub sequence_interval_ms: u64,
    pub custom_pulse_ms: u64,
    pub replace_duration_ms: u64,
    pub video_ready_timeout_ms: u64,
    pub video_boost_rate: f32,
    pub fallback_width: u32,
    pub fallback_height: u32,
    pub mobile_breakpoint: u32,
    /// Worker threads decoding assets.
    pub loader_threads: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub fade_ms: u64,
    pub fade_steps: u32,
    pub max_volume: f32,
    pub effect_volume: f32,
}

/// Everything the core reads, bundled for writing a default `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CoreConfig {
    pub system: SystemConfig,
    pub engine: EngineConfig,
    pub audio: AudioConfig,
}

impl CoreConfig {
    pub fn from_global() -> Self {
        Self {
            system: storybook_shared::config::get("system"),
            engine: storybook_shared::config::get("engine"),
            audio: storybook_shared::config::get("audio"),
        }
    }
}

impl EngineConfig {
    pub fn sequence_interval(&self) -> Duration {
        Duration::from_millis(self.sequence_interval_ms.max(1))
    }

    pub fn custom_pulse(&self) -> Duration {
        Duration::from_millis(self.custom_pulse_ms)
    }

    pub fn replace_duration(&self) -> Duration {
        Duration::from_millis(self.replace_duration_ms)
    }

    pub fn video_ready_timeout(&self) -> Duration {
        Duration::from_millis(self.video_ready_timeout_ms)
    }

    pub fn fallback_size(&self) -> (u32, u32) {
        (self.fallback_width, self.fallback_height)
    }
}

impl AudioConfig {
    pub fn step_time(&self) -> Duration {
        let steps = self.fade_steps.max(1) as u64;
        Duration::from_millis((self.fade_ms / steps).max(1))
    }
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            assets_path:  "assets/".into(),
            catalog_path: "story/story.json".into(),
            log_path:     "logs/".into(),
            log_level:    "info".into(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sequence_interval_ms: 500,
            custom_pulse_ms: 5000,
            replace_duration_ms: 2000,
            video_ready_timeout_ms: 3000,
            video_boost_rate: 2.0,
            fallback_width: 1920,
            fallback_height: 1080,
            mobile_breakpoint: 768,
            loader_threads: 4,
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            fade_ms: 500,
            fade_steps: 20,
            max_volume: 1.0,
            effect_volume: 0.8,
        }
    }
}
