//! Core type definitions for the automaton.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a runner session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(pub Uuid);

impl RunId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 2D position on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn add(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    pub fn step(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.to_delta();
        self.add(dx, dy)
    }
}

/// One of the eight neighbor directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl Direction {
    pub fn to_delta(&self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::South => (0, 1),
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
            Direction::NorthEast => (1, -1),
            Direction::NorthWest => (-1, -1),
            Direction::SouthEast => (1, 1),
            Direction::SouthWest => (-1, 1),
        }
    }

    pub fn all() -> [Direction; 8] {
        [
            Direction::North,
            Direction::South,
            Direction::East,
            Direction::West,
            Direction::NorthEast,
            Direction::NorthWest,
            Direction::SouthEast,
            Direction::SouthWest,
        ]
    }

    /// Uniformly random direction
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::all()[rng.gen_range(0..8)]
    }
}

/// Energy and reproduction constants for a species
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeciesProfile {
    /// Energy given to a newly born or spawned organism
    pub base_energy: f32,
    /// Energy an organism must exceed before it tries to reproduce
    pub reproduce_threshold: f32,
}

/// The five cell categories. Discriminants double as species ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Species {
    Empty = 0,
    Basic = 1,
    Predator = 2,
    Plant = 3,
    Spore = 4,
}

impl Species {
    pub const COUNT: usize = 5;

    /// Every species that can occupy a cell, in id order
    pub const LIVING: [Species; 4] = [
        Species::Basic,
        Species::Predator,
        Species::Plant,
        Species::Spore,
    ];

    pub fn id(self) -> usize {
        self as usize
    }

    pub fn from_id(id: usize) -> Option<Self> {
        match id {
            0 => Some(Species::Empty),
            1 => Some(Species::Basic),
            2 => Some(Species::Predator),
            3 => Some(Species::Plant),
            4 => Some(Species::Spore),
            _ => None,
        }
    }

    pub fn is_living(self) -> bool {
        self != Species::Empty
    }

    pub fn name(self) -> &'static str {
        match self {
            Species::Empty => "Empty",
            Species::Basic => "Basic",
            Species::Predator => "Predator",
            Species::Plant => "Plant",
            Species::Spore => "Spore",
        }
    }

    pub fn profile(self) -> SpeciesProfile {
        let (base_energy, reproduce_threshold) = match self {
            Species::Empty => (0.0, 0.0),
            Species::Basic => (3.0, 5.0),
            Species::Predator => (8.0, 12.0),
            Species::Plant => (2.0, 4.0),
            Species::Spore => (1.0, 3.0),
        };
        SpeciesProfile {
            base_energy,
            reproduce_threshold,
        }
    }

    /// Uniformly random living species
    pub fn random_living<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::LIVING[rng.gen_range(0..Self::LIVING.len())]
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// State carried by every living cell
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Organism {
    pub energy: f32,
    pub age: u32,
    pub dna: f32,
}

impl Organism {
    pub fn new(energy: f32, dna: f32) -> Self {
        Self { energy, age: 0, dna }
    }

    /// Same organism one generation older
    pub fn aged(self) -> Self {
        Self {
            age: self.age.saturating_add(1),
            ..self
        }
    }
}

/// A single grid cell.
///
/// `Empty` only carries its dna marker, so an empty cell always reports
/// zero energy and zero age.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    Empty { dna: f32 },
    Basic(Organism),
    Predator(Organism),
    Plant(Organism),
    Spore(Organism),
}

impl Cell {
    /// Empty cell with a freshly sampled dna marker
    pub fn empty<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Cell::Empty { dna: rng.gen() }
    }

    /// Wrap an organism as the given species. `Species::Empty` drops the
    /// organism's energy and age and keeps only its dna.
    pub fn with_species(species: Species, organism: Organism) -> Self {
        match species {
            Species::Empty => Cell::Empty { dna: organism.dna },
            Species::Basic => Cell::Basic(organism),
            Species::Predator => Cell::Predator(organism),
            Species::Plant => Cell::Plant(organism),
            Species::Spore => Cell::Spore(organism),
        }
    }

    /// Fresh organism of `species` at its base energy, age 0, random dna
    pub fn spawn<R: Rng + ?Sized>(species: Species, rng: &mut R) -> Self {
        let organism = Organism::new(species.profile().base_energy, rng.gen());
        Self::with_species(species, organism)
    }

    pub fn species(&self) -> Species {
        match self {
            Cell::Empty { .. } => Species::Empty,
            Cell::Basic(_) => Species::Basic,
            Cell::Predator(_) => Species::Predator,
            Cell::Plant(_) => Species::Plant,
            Cell::Spore(_) => Species::Spore,
        }
    }

    pub fn organism(&self) -> Option<&Organism> {
        match self {
            Cell::Empty { .. } => None,
            Cell::Basic(o) | Cell::Predator(o) | Cell::Plant(o) | Cell::Spore(o) => Some(o),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty { .. })
    }

    pub fn energy(&self) -> f32 {
        self.organism().map_or(0.0, |o| o.energy)
    }

    pub fn age(&self) -> u32 {
        self.organism().map_or(0, |o| o.age)
    }

    pub fn dna(&self) -> f32 {
        match self {
            Cell::Empty { dna } => *dna,
            Cell::Basic(o) | Cell::Predator(o) | Cell::Plant(o) | Cell::Spore(o) => o.dna,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_direction_delta() {
        assert_eq!(Direction::North.to_delta(), (0, -1));
        assert_eq!(Direction::South.to_delta(), (0, 1));
        assert_eq!(Direction::East.to_delta(), (1, 0));
        assert_eq!(Direction::West.to_delta(), (-1, 0));
    }

    #[test]
    fn test_directions_cover_neighborhood() {
        let origin = Position::new(0, 0);
        let mut seen: Vec<Position> = Direction::all().iter().map(|d| origin.step(*d)).collect();
        seen.sort_by_key(|p| (p.y, p.x));
        seen.dedup();
        assert_eq!(seen.len(), 8);
        assert!(!seen.contains(&origin));
    }

    #[test]
    fn test_species_ids_round_trip() {
        for id in 0..Species::COUNT {
            assert_eq!(Species::from_id(id).map(Species::id), Some(id));
        }
        assert_eq!(Species::from_id(5), None);
    }

    #[test]
    fn test_profiles() {
        assert_eq!(Species::Basic.profile().base_energy, 3.0);
        assert_eq!(Species::Predator.profile().reproduce_threshold, 12.0);
        assert_eq!(Species::Plant.profile().reproduce_threshold, 4.0);
        assert_eq!(Species::Spore.profile().base_energy, 1.0);
    }

    #[test]
    fn test_empty_cell_has_no_energy_or_age() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let cell = Cell::empty(&mut rng);
        assert_eq!(cell.species(), Species::Empty);
        assert_eq!(cell.energy(), 0.0);
        assert_eq!(cell.age(), 0);
        assert!((0.0..1.0).contains(&cell.dna()));

        let demoted = Cell::with_species(Species::Empty, Organism { energy: 5.0, age: 9, dna: 0.25 });
        assert_eq!(demoted.energy(), 0.0);
        assert_eq!(demoted.age(), 0);
        assert_eq!(demoted.dna(), 0.25);
    }

    #[test]
    fn test_spawn_uses_base_energy() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let cell = Cell::spawn(Species::Predator, &mut rng);
        assert_eq!(cell.species(), Species::Predator);
        assert_eq!(cell.energy(), 8.0);
        assert_eq!(cell.age(), 0);
    }

    #[test]
    fn test_aged_keeps_energy() {
        let organism = Organism::new(4.5, 0.5).aged().aged();
        assert_eq!(organism.age, 2);
        assert_eq!(organism.energy, 4.5);
    }
}
