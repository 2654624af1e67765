//! Scenario authoring data: which scheduler to run and what it schedules.
//!
//! Scenarios are JSON documents. A few ship with the crate; others are read
//! from disk. Loading clamps configuration anomalies instead of rejecting
//! them, so a sloppy stream degrades to "produces nothing".

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use barrage_core::constants::{DEFAULT_INTER_LEVEL_DELAY_SECS, FIRST_LEVEL};
use barrage_core::enums::SchedulerMode;
use barrage_progression::stream::{StreamConfig, WaveTemplate};

use crate::finite::FiniteScheduler;
use crate::infinite::{InfiniteConfig, InfiniteScheduler};

pub const BUILTIN_ENDLESS: &str = include_str!("data/endless.json");
pub const BUILTIN_TRAINING: &str = include_str!("data/training.json");

/// Names accepted by [`ScenarioConfig::builtin`].
pub const BUILTIN_NAMES: [&str; 2] = ["endless", "training"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub mode: SchedulerMode,
    #[serde(default = "default_inter_level_delay")]
    pub inter_level_delay_secs: f64,
    #[serde(default = "default_start_level")]
    pub start_level: i32,
    /// Finite mode: ordered timeline. `null` entries are placeholders.
    #[serde(default)]
    pub mission: Vec<Option<WaveTemplate>>,
    /// Infinite mode: recurring streams in evaluation order.
    #[serde(default)]
    pub streams: Vec<StreamConfig>,
}

fn default_inter_level_delay() -> f64 {
    DEFAULT_INTER_LEVEL_DELAY_SECS
}

fn default_start_level() -> i32 {
    FIRST_LEVEL
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            mode: SchedulerMode::default(),
            inter_level_delay_secs: default_inter_level_delay(),
            start_level: default_start_level(),
            mission: Vec::new(),
            streams: Vec::new(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("failed to parse scenario: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read scenario from {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("unknown builtin scenario `{0}`")]
    UnknownBuiltin(String),
}

impl ScenarioConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ScenarioError> {
        let mut scenario: ScenarioConfig = serde_json::from_str(json)?;
        scenario.validate();
        Ok(scenario)
    }

    pub fn from_file(path: &Path) -> Result<Self, ScenarioError> {
        let contents = fs::read_to_string(path).map_err(|source| ScenarioError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let scenario = Self::from_json_str(&contents)?;
        tracing::info!(
            target: "barrage::scenario",
            path = %path.display(),
            name = %scenario.name,
            "scenario loaded"
        );
        Ok(scenario)
    }

    pub fn builtin(name: &str) -> Result<Self, ScenarioError> {
        let json = match name {
            "endless" => BUILTIN_ENDLESS,
            "training" => BUILTIN_TRAINING,
            other => return Err(ScenarioError::UnknownBuiltin(other.to_string())),
        };
        Self::from_json_str(json)
    }

    pub fn infinite_config(&self) -> InfiniteConfig {
        InfiniteConfig {
            inter_level_delay_secs: self.inter_level_delay_secs,
            start_level: self.start_level,
        }
    }

    pub fn build_infinite(&self) -> InfiniteScheduler {
        InfiniteScheduler::new(self.infinite_config(), self.streams.clone())
    }

    pub fn build_finite(&self) -> FiniteScheduler {
        FiniteScheduler::new(self.mission.clone())
    }

    /// Clamp anomalies in place. Per-stream clamping (period, upgrade
    /// percentages) happens when the stream is built.
    fn validate(&mut self) {
        if !self.inter_level_delay_secs.is_finite() || self.inter_level_delay_secs < 0.0 {
            tracing::warn!(
                target: "barrage::scenario",
                delay = self.inter_level_delay_secs,
                "invalid inter-level delay, using 0"
            );
            self.inter_level_delay_secs = 0.0;
        }
        if self.start_level < FIRST_LEVEL {
            tracing::warn!(
                target: "barrage::scenario",
                start_level = self.start_level,
                "start level below the first level, clamping"
            );
            self.start_level = FIRST_LEVEL;
        }
        match self.mode {
            SchedulerMode::Infinite if self.streams.is_empty() => tracing::warn!(
                target: "barrage::scenario",
                name = %self.name,
                "infinite scenario without streams"
            ),
            SchedulerMode::Finite if self.mission.is_empty() => tracing::warn!(
                target: "barrage::scenario",
                name = %self.name,
                "finite scenario without mission waves"
            ),
            _ => {}
        }
    }
}
