//! End-of-run summary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use soup_core::{Census, GenerationReport, RunId, RuleSet};
use soup_world::Simulation;
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: RunId,
    pub finished_at: DateTime<Utc>,
    pub width: i32,
    pub height: i32,
    pub rules: RuleSet,
    pub census: Census,
    pub totals: GenerationReport,
}

impl RunSummary {
    pub fn collect(run_id: RunId, sim: &Simulation) -> Self {
        Self {
            run_id,
            finished_at: Utc::now(),
            width: sim.width(),
            height: sim.height(),
            rules: *sim.rules(),
            census: sim.census(),
            totals: *sim.totals(),
        }
    }

    pub fn emit(&self) {
        info!(
            event = "run_summary",
            run_id = %self.run_id,
            generation = self.census.generation,
            live_cells = self.census.live_cells,
            species_present = self.census.species_present(),
            entropy = self.census.entropy(),
            births_total = self.totals.births,
            deaths_total = self.totals.deaths,
            reproduction_attempts_total = self.totals.reproduction_attempts,
            reproduction_success_rate = format!("{:.2}%", self.totals.reproduction_success_rate()),
            spores_spread_total = self.totals.spores_spread,
            "Run complete"
        );

        match serde_json::to_string(self) {
            Ok(json) => info!(event = "run_summary_json", summary = %json, "Run summary"),
            Err(e) => tracing::warn!("Failed to serialize run summary: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use soup_core::{Position, SoupConfig, Species};

    #[test]
    fn test_summary_reflects_simulation() {
        let mut sim = Simulation::new(&SoupConfig::default());
        sim.spawn_species(Position::new(20, 20), Species::Plant);
        sim.run(4);

        let summary = RunSummary::collect(RunId::new(), &sim);
        assert_eq!(summary.census.generation, 4);
        assert_eq!(summary.width, 200);
        assert_eq!(summary.totals, *sim.totals());

        let json = serde_json::to_string(&summary).unwrap();
        let back: RunSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(back.run_id, summary.run_id);
        assert_eq!(back.census, summary.census);
    }
}
