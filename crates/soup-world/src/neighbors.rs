//! Per-species tallies over the 8-neighborhood.

use crate::grid::Grid;
use soup_core::{Position, Species};

/// Count and summed energy for one species around a cell
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Tally {
    pub count: u32,
    pub energy: f32,
}

/// Neighborhood summary for a single coordinate. Out-of-bounds neighbors are
/// not counted as any species.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Neighborhood {
    tallies: [Tally; Species::COUNT],
}

impl Neighborhood {
    /// Scan the neighbors of `pos` in `grid`
    pub fn survey(grid: &Grid, pos: Position) -> Self {
        let mut neighborhood = Self::default();
        for neighbor in grid.neighbors(pos) {
            if let Some(cell) = grid.get(neighbor) {
                let tally = &mut neighborhood.tallies[cell.species().id()];
                tally.count += 1;
                tally.energy += cell.energy();
            }
        }
        neighborhood
    }

    pub fn tally(&self, species: Species) -> Tally {
        self.tallies[species.id()]
    }

    pub fn count(&self, species: Species) -> u32 {
        self.tallies[species.id()].count
    }

    /// Neighbors of any non-empty species
    pub fn live(&self) -> u32 {
        Species::LIVING.iter().map(|s| self.count(*s)).sum()
    }

    /// Neighbors that exist at all (at most 8, fewer on edges)
    pub fn total(&self) -> u32 {
        self.tallies.iter().map(|t| t.count).sum()
    }

    pub fn live_energy(&self) -> f32 {
        Species::LIVING.iter().map(|s| self.tally(*s).energy).sum()
    }

    pub fn any(&self, species: &[Species]) -> bool {
        species.iter().any(|s| self.count(*s) > 0)
    }

    /// Living species with the highest count, ties to the lowest id.
    /// Basic when there are no live neighbors at all.
    pub fn dominant(&self) -> Species {
        let mut best = Species::Basic;
        let mut best_count = 0;
        for species in Species::LIVING {
            let count = self.count(species);
            if count > best_count {
                best = species;
                best_count = count;
            }
        }
        best
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::grid_from_rows;
    use super::*;

    #[test]
    fn test_counts_by_species() {
        let grid = grid_from_rows(&[
            "BP.",
            "LBS",
            "..B",
        ]);
        let n = Neighborhood::survey(&grid, Position::new(1, 1));
        assert_eq!(n.count(Species::Basic), 2);
        assert_eq!(n.count(Species::Predator), 1);
        assert_eq!(n.count(Species::Plant), 1);
        assert_eq!(n.count(Species::Spore), 1);
        assert_eq!(n.count(Species::Empty), 3);
        assert_eq!(n.live(), 5);
        assert_eq!(n.total(), 8);
        assert_eq!(n.tally(Species::Basic).energy, 6.0);
        assert_eq!(n.live_energy(), 6.0 + 8.0 + 2.0 + 1.0);
    }

    #[test]
    fn test_corner_sees_at_most_three() {
        let grid = grid_from_rows(&[
            "BBB",
            "BBB",
            "BBB",
        ]);
        for corner in [(0, 0), (2, 0), (0, 2), (2, 2)] {
            let n = Neighborhood::survey(&grid, Position::new(corner.0, corner.1));
            assert_eq!(n.total(), 3);
            assert_eq!(n.live(), 3);
        }
        let edge = Neighborhood::survey(&grid, Position::new(1, 0));
        assert_eq!(edge.total(), 5);
    }

    #[test]
    fn test_dominant_prefers_highest_then_lowest_id() {
        let grid = grid_from_rows(&[
            "PP.",
            "L.L",
            "...",
        ]);
        // Predator and Plant tie at two; Predator has the lower id.
        let n = Neighborhood::survey(&grid, Position::new(1, 1));
        assert_eq!(n.dominant(), Species::Predator);

        let grid = grid_from_rows(&[
            "PSS",
            "...",
        ]);
        let n = Neighborhood::survey(&grid, Position::new(1, 1));
        assert_eq!(n.dominant(), Species::Spore);
    }

    #[test]
    fn test_dominant_without_live_neighbors_is_basic() {
        let grid = grid_from_rows(&["...", "...", "..."]);
        let n = Neighborhood::survey(&grid, Position::new(1, 1));
        assert_eq!(n.live(), 0);
        assert_eq!(n.dominant(), Species::Basic);
    }
}
