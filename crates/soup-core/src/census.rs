//! Population statistics for HUD-style summaries.

use crate::{Cell, Species};
use serde::{Deserialize, Serialize};

/// Point-in-time population summary of a grid
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Census {
    /// Generation the census was taken at
    pub generation: u64,
    /// Number of non-empty cells
    pub live_cells: usize,
    /// Live cells per species, indexed by species id (Empty stays 0)
    pub per_species: [usize; Species::COUNT],
    /// Sum of energy over live cells
    pub total_energy: f64,
}

impl Census {
    pub fn from_cells<'a>(generation: u64, cells: impl IntoIterator<Item = &'a Cell>) -> Self {
        let mut census = Self {
            generation,
            ..Default::default()
        };
        for cell in cells {
            if cell.is_empty() {
                continue;
            }
            census.live_cells += 1;
            census.per_species[cell.species().id()] += 1;
            census.total_energy += cell.energy() as f64;
        }
        census
    }

    pub fn count(&self, species: Species) -> usize {
        self.per_species[species.id()]
    }

    /// Number of living species with at least one cell
    pub fn species_present(&self) -> usize {
        Species::LIVING
            .iter()
            .filter(|s| self.count(**s) > 0)
            .count()
    }

    /// Mean energy per live cell scaled by ten, truncated. Zero for a dead grid.
    pub fn entropy(&self) -> u64 {
        if self.live_cells == 0 {
            return 0;
        }
        (self.total_energy / self.live_cells as f64 * 10.0).floor() as u64
    }

    pub fn average_energy(&self) -> f64 {
        if self.live_cells == 0 {
            0.0
        } else {
            self.total_energy / self.live_cells as f64
        }
    }
}

/// What happened during one generation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationReport {
    pub births: u64,
    pub deaths: u64,
    pub reproduction_attempts: u64,
    pub reproduction_successes: u64,
    pub spores_spread: u64,
}

impl GenerationReport {
    /// Fold another report into this one
    pub fn absorb(&mut self, other: &GenerationReport) {
        self.births += other.births;
        self.deaths += other.deaths;
        self.reproduction_attempts += other.reproduction_attempts;
        self.reproduction_successes += other.reproduction_successes;
        self.spores_spread += other.spores_spread;
    }

    pub fn reproduction_success_rate(&self) -> f64 {
        if self.reproduction_attempts == 0 {
            0.0
        } else {
            self.reproduction_successes as f64 / self.reproduction_attempts as f64 * 100.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Organism;

    #[test]
    fn test_empty_census() {
        let cells = vec![Cell::Empty { dna: 0.1 }; 4];
        let census = Census::from_cells(3, &cells);
        assert_eq!(census.generation, 3);
        assert_eq!(census.live_cells, 0);
        assert_eq!(census.species_present(), 0);
        assert_eq!(census.entropy(), 0);
    }

    #[test]
    fn test_census_counts_species_and_energy() {
        let cells = vec![
            Cell::Basic(Organism::new(3.0, 0.1)),
            Cell::Basic(Organism::new(3.0, 0.2)),
            Cell::Plant(Organism::new(2.5, 0.3)),
            Cell::Empty { dna: 0.4 },
        ];
        let census = Census::from_cells(0, &cells);
        assert_eq!(census.live_cells, 3);
        assert_eq!(census.count(Species::Basic), 2);
        assert_eq!(census.count(Species::Plant), 1);
        assert_eq!(census.count(Species::Empty), 0);
        assert_eq!(census.species_present(), 2);
        assert_eq!(census.total_energy, 8.5);
        // 8.5 / 3 * 10 = 28.33
        assert_eq!(census.entropy(), 28);
    }

    #[test]
    fn test_report_absorb() {
        let mut total = GenerationReport::default();
        let step = GenerationReport {
            births: 2,
            deaths: 1,
            reproduction_attempts: 4,
            reproduction_successes: 1,
            spores_spread: 3,
        };
        total.absorb(&step);
        total.absorb(&step);
        assert_eq!(total.births, 4);
        assert_eq!(total.spores_spread, 6);
        assert_eq!(total.reproduction_success_rate(), 25.0);
    }
}
