//! Configuration types for the automaton and its runner.

use crate::error::Result;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tunable transition constants.
///
/// Fields are deliberately unvalidated: callers may set anything, the
/// documented ranges are advisory (see [`RuleSet::out_of_range`]).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleSet {
    /// Fewest live neighbors a Basic cell needs to survive
    pub survival_min: u32,
    /// Most live neighbors a Basic cell tolerates
    pub survival_max: u32,
    /// Exact live-neighbor count that makes an empty cell come alive
    pub birth_count: u32,
    /// Multiplicative energy decay applied to predators each generation
    pub predator_hunger: f32,
    /// Multiplicative energy gain for plants next to open space
    pub plant_growth: f32,
    /// Chance per generation that a spore tries to spread
    pub spore_spread: f32,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self {
            survival_min: 2,
            survival_max: 3,
            birth_count: 3,
            predator_hunger: 0.95,
            plant_growth: 1.1,
            spore_spread: 0.3,
        }
    }
}

impl RuleSet {
    /// Draw a fresh rule set from the ranges the randomize control uses
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            survival_min: rng.gen_range(1..=3),
            survival_max: rng.gen_range(3..=5),
            birth_count: rng.gen_range(2..=5),
            predator_hunger: 0.85 + rng.gen::<f32>() * 0.15,
            plant_growth: 1.05 + rng.gen::<f32>() * 0.1,
            spore_spread: 0.2 + rng.gen::<f32>() * 0.3,
        }
    }

    /// Names of fields outside their documented ranges
    pub fn out_of_range(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.survival_min > 8 {
            fields.push("survival_min");
        }
        if self.survival_max > 8 {
            fields.push("survival_max");
        }
        if self.birth_count > 8 {
            fields.push("birth_count");
        }
        for (name, value) in [
            ("predator_hunger", self.predator_hunger),
            ("plant_growth", self.plant_growth),
            ("spore_spread", self.spore_spread),
        ] {
            if !(value > 0.0 && value < 2.0) {
                fields.push(name);
            }
        }
        fields
    }
}

/// Grid dimensions and randomness
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Width of the grid in cells
    pub width: i32,
    /// Height of the grid in cells
    pub height: i32,
    /// Seed for the simulation's random source
    pub seed: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 200,
            height: 150,
            seed: 0,
        }
    }
}

/// Generation pacing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    /// Minimum wall time between generations (milliseconds)
    pub update_interval_ms: f64,
    /// Start with the clock paused
    pub start_paused: bool,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            update_interval_ms: 100.0,
            start_paused: false,
        }
    }
}

/// Spawn gesture shape
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrushConfig {
    /// Euclidean radius around the gesture center
    pub radius: i32,
    /// Chance that each covered cell receives an organism
    pub fill_chance: f64,
}

impl Default for BrushConfig {
    fn default() -> Self {
        Self {
            radius: 3,
            fill_chance: 0.5,
        }
    }
}

/// Headless runner settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Frame cadence of the driving loop (milliseconds)
    pub frame_interval_ms: u64,
    /// Stop after this many generations (0 runs until interrupted)
    pub max_generations: u64,
    /// Log a census every N generations
    pub census_interval: u64,
    /// Number of spawn gestures applied before the first frame
    pub seed_strokes: usize,
    /// OpenTelemetry endpoint
    pub otel_endpoint: Option<String>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            frame_interval_ms: 16,
            max_generations: 0,
            census_interval: 50,
            seed_strokes: 40,
            otel_endpoint: None,
        }
    }
}

/// Everything needed to build and drive a simulation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SoupConfig {
    pub world: WorldConfig,
    pub rules: RuleSet,
    pub clock: ClockConfig,
    pub brush: BrushConfig,
    pub runner: RunnerConfig,
}

impl SoupConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }
}
