//! Per-species transition rules.
//!
//! Each rule looks at one cell from the pre-step snapshot plus its
//! [`Neighborhood`] and decides what the cell becomes and whether it tries to
//! seed a neighbor. Nothing here touches the grid; the engine applies the
//! [`Outcome`] to the `next` buffer.

use crate::neighbors::Neighborhood;
use rand::Rng;
use soup_core::{Cell, Organism, RuleSet, Species};

/// Energy a predator gains in a step where any prey is adjacent
pub const PREY_ENERGY: f32 = 2.0;
/// Predators below this energy starve
pub const PREDATOR_STARVATION: f32 = 1.0;
/// Plants never store more energy than this
pub const PLANT_ENERGY_CAP: f32 = 10.0;
/// Plants with more live neighbors than this are crowded out
pub const PLANT_CROWDING_LIMIT: u32 = 6;
/// Spores older than this wither
pub const SPORE_LIFESPAN: u32 = 10;

/// What happens to the cell itself
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transition {
    /// Leave `next` as copied from `current`
    Keep,
    /// Overwrite with a new cell state
    Become(Cell),
    /// Replace with an empty cell carrying fresh dna
    Die,
}

/// Side effect on a neighboring cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Seed one random neighbor with a new organism holding `energy`
    Reproduce { species: Species, energy: f32 },
    /// Copy a spore with the parent's dna to the cell at `(dx, dy)`
    Spread { dx: i32, dy: i32, dna: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Outcome {
    pub transition: Transition,
    pub action: Option<Action>,
}

impl Outcome {
    fn keep() -> Self {
        Self {
            transition: Transition::Keep,
            action: None,
        }
    }

    fn die() -> Self {
        Self {
            transition: Transition::Die,
            action: None,
        }
    }

    fn become_cell(cell: Cell) -> Self {
        Self {
            transition: Transition::Become(cell),
            action: None,
        }
    }

    fn with_action(self, action: Option<Action>) -> Self {
        Self { action, ..self }
    }
}

/// Decide the fate of `cell`. Every species is handled here.
pub fn decide<R: Rng + ?Sized>(
    cell: &Cell,
    neighborhood: &Neighborhood,
    rules: &RuleSet,
    mutation_chance: f64,
    rng: &mut R,
) -> Outcome {
    match cell {
        Cell::Empty { .. } => birth(neighborhood, rules, mutation_chance, rng),
        Cell::Basic(organism) => basic(organism, neighborhood, rules),
        Cell::Predator(organism) => predator(organism, neighborhood, rules),
        Cell::Plant(organism) => plant(organism, neighborhood, rules),
        Cell::Spore(organism) => spore(organism, rules, rng),
    }
}

/// Empty cell with exactly `birth_count` live neighbors comes alive as the
/// dominant neighbor species, occasionally mutated into a random one.
pub fn birth<R: Rng + ?Sized>(
    neighborhood: &Neighborhood,
    rules: &RuleSet,
    mutation_chance: f64,
    rng: &mut R,
) -> Outcome {
    if neighborhood.live() != rules.birth_count {
        return Outcome::keep();
    }

    let mut species = neighborhood.dominant();
    if rng.gen::<f64>() < mutation_chance {
        species = Species::random_living(rng);
    }

    Outcome::become_cell(Cell::spawn(species, rng))
}

/// Conway survival window on the total live-neighbor count
pub fn basic(organism: &Organism, neighborhood: &Neighborhood, rules: &RuleSet) -> Outcome {
    let live = neighborhood.live();
    if live < rules.survival_min || live > rules.survival_max {
        return Outcome::die();
    }
    Outcome::become_cell(Cell::Basic(organism.aged()))
}

/// Hunger decay, a flat meal when prey is adjacent, and reproduction only on
/// steps without a meal.
///
/// The meal does not drain the prey and several predators may feed off the
/// same cell in one generation.
pub fn predator(organism: &Organism, neighborhood: &Neighborhood, rules: &RuleSet) -> Outcome {
    let mut energy = organism.energy * rules.predator_hunger;

    let hunted = neighborhood.any(&[Species::Basic, Species::Plant]);
    if hunted {
        energy += PREY_ENERGY;
    }

    if energy < PREDATOR_STARVATION {
        return Outcome::die();
    }

    let survivor = Organism { energy, ..*organism }.aged();
    let action = (energy > Species::Predator.profile().reproduce_threshold && !hunted).then(|| {
        Action::Reproduce {
            species: Species::Predator,
            energy: energy / 2.0,
        }
    });

    Outcome::become_cell(Cell::Predator(survivor)).with_action(action)
}

/// Photosynthesis next to open space, capped storage, death by overcrowding
pub fn plant(organism: &Organism, neighborhood: &Neighborhood, rules: &RuleSet) -> Outcome {
    let mut energy = organism.energy;
    if neighborhood.count(Species::Empty) > 0 {
        energy *= rules.plant_growth;
    }
    energy = energy.min(PLANT_ENERGY_CAP);

    if neighborhood.live() > PLANT_CROWDING_LIMIT {
        return Outcome::die();
    }

    let survivor = Organism { energy, ..*organism }.aged();
    let action = (energy > Species::Plant.profile().reproduce_threshold).then(|| {
        Action::Reproduce {
            species: Species::Plant,
            energy: energy / 2.0,
        }
    });

    Outcome::become_cell(Cell::Plant(survivor)).with_action(action)
}

/// Random spread into the 3x3 block (the center is a wasted draw), then
/// withering once past its lifespan.
pub fn spore<R: Rng + ?Sized>(organism: &Organism, rules: &RuleSet, rng: &mut R) -> Outcome {
    let action = if rng.gen::<f32>() < rules.spore_spread {
        Some(Action::Spread {
            dx: rng.gen_range(-1..=1),
            dy: rng.gen_range(-1..=1),
            dna: organism.dna,
        })
    } else {
        None
    };

    let aged = organism.aged();
    let outcome = if aged.age > SPORE_LIFESPAN {
        Outcome::die()
    } else {
        Outcome::become_cell(Cell::Spore(aged))
    };
    outcome.with_action(action)
}
