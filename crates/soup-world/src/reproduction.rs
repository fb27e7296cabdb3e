//! Placement of offspring and spores into the `next` buffer.
//!
//! Placement is opportunistic: a single target is tried and an occupied or
//! off-grid target simply wastes the attempt.

use crate::grid::GridStore;
use rand::Rng;
use soup_core::{Cell, Direction, Organism, Position, Species};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Placed(Position),
    Blocked,
}

impl Placement {
    pub fn is_placed(&self) -> bool {
        matches!(self, Placement::Placed(_))
    }
}

/// Try to seed one uniformly chosen neighbor of `origin` with a fresh
/// organism of `species` holding `energy`.
pub fn try_reproduce<R: Rng + ?Sized>(
    store: &mut GridStore,
    origin: Position,
    species: Species,
    energy: f32,
    rng: &mut R,
) -> Placement {
    let target = origin.step(Direction::random(rng));
    place(store, target, || Cell::with_species(species, Organism::new(energy, rng.gen())))
}

/// Drop a spore carrying `dna` at `origin + (dx, dy)`
pub fn try_spread(store: &mut GridStore, origin: Position, dx: i32, dy: i32, dna: f32) -> Placement {
    place(store, origin.add(dx, dy), || {
        Cell::Spore(Organism::new(Species::Spore.profile().base_energy, dna))
    })
}

/// Fill `target` in `next` only if that slot exists and is empty
fn place(store: &mut GridStore, target: Position, make: impl FnOnce() -> Cell) -> Placement {
    match store.next_mut(target) {
        Some(slot) if slot.is_empty() => {
            *slot = make();
            Placement::Placed(target)
        }
        _ => Placement::Blocked,
    }
}
