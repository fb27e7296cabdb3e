//! Spawn gestures: scatter organisms over a disc of cells.

use crate::grid::GridStore;
use rand::Rng;
use soup_core::{BrushConfig, Cell, Position, Species};

#[derive(Debug, Clone)]
pub struct Brush {
    radius: i32,
    fill_chance: f64,
}

impl Default for Brush {
    fn default() -> Self {
        Self::new(&BrushConfig::default())
    }
}

impl Brush {
    pub fn new(config: &BrushConfig) -> Self {
        Self {
            radius: config.radius.max(0),
            fill_chance: config.fill_chance,
        }
    }

    pub fn radius(&self) -> i32 {
        self.radius
    }

    /// Every position within the brush's Euclidean radius of `center`,
    /// bounds not checked
    pub fn footprint(&self, center: Position) -> impl Iterator<Item = Position> {
        let radius = self.radius;
        (-radius..=radius)
            .flat_map(move |dy| (-radius..=radius).map(move |dx| (dx, dy)))
            .filter(move |(dx, dy)| dx * dx + dy * dy <= radius * radius)
            .map(move |(dx, dy)| center.add(dx, dy))
    }

    /// Write fresh organisms of `species` into `current` under the brush.
    /// Returns how many cells were painted.
    pub fn paint<R: Rng + ?Sized>(
        &self,
        store: &mut GridStore,
        center: Position,
        species: Species,
        rng: &mut R,
    ) -> usize {
        let mut painted = 0;
        for pos in self.footprint(center) {
            if !store.current().contains(pos) {
                continue;
            }
            if rng.gen::<f64>() < self.fill_chance && store.set_cell(pos, Cell::spawn(species, rng)).is_ok() {
                painted += 1;
            }
        }
        painted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_footprint_is_a_disc() {
        let brush = Brush::default();
        let cells: Vec<_> = brush.footprint(Position::new(0, 0)).collect();
        // Lattice points with x^2 + y^2 <= 9
        assert_eq!(cells.len(), 29);
        assert!(cells.contains(&Position::new(3, 0)));
        assert!(cells.contains(&Position::new(2, 2)));
        assert!(!cells.contains(&Position::new(3, 1)));
    }

    #[test]
    fn test_full_brush_paints_every_in_bounds_cell() {
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let mut store = GridStore::new(10, 10, &mut rng);
        let brush = Brush::new(&BrushConfig {
            radius: 3,
            fill_chance: 1.0,
        });

        let painted = brush.paint(&mut store, Position::new(0, 0), Species::Plant, &mut rng);
        // Only the quarter disc at the corner is on the grid.
        let expected = brush
            .footprint(Position::new(0, 0))
            .filter(|p| store.current().contains(*p))
            .count();
        assert_eq!(painted, expected);
        assert_eq!(painted, 11);

        let plant = store.get(Position::new(1, 1)).unwrap();
        assert_eq!(plant.species(), Species::Plant);
        assert_eq!(plant.energy(), 2.0);
        assert_eq!(plant.age(), 0);
        assert!(store.get(Position::new(3, 1)).unwrap().is_empty());
    }

    #[test]
    fn test_empty_brush_paints_nothing() {
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let mut store = GridStore::new(10, 10, &mut rng);
        let brush = Brush::new(&BrushConfig {
            radius: 3,
            fill_chance: 0.0,
        });
        assert_eq!(brush.paint(&mut store, Position::new(5, 5), Species::Basic, &mut rng), 0);
        assert!(store.current().cells().iter().all(|c| c.is_empty()));
    }
}
