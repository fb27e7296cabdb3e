//! One synchronous generation over the whole grid.

use crate::behavior::{self, Action, Outcome, Transition};
use crate::grid::GridStore;
use crate::neighbors::Neighborhood;
use crate::reproduction::{self, Placement};
use rand::Rng;
use soup_core::{Cell, GenerationReport, Position, RuleSet};
use tracing::trace;

/// Chance that a birth ignores the neighborhood majority
pub const MUTATION_CHANCE: f64 = 0.05;

/// Drives the per-cell rules over a [`GridStore`].
///
/// All neighborhood reads come from `current` and all writes land in `next`,
/// so the order cells are visited in does not change what they see.
#[derive(Debug, Clone)]
pub struct RuleEngine {
    mutation_chance: f64,
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self {
            mutation_chance: MUTATION_CHANCE,
        }
    }
}

impl RuleEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine with a custom birth mutation chance (0 makes births follow the
    /// neighborhood majority exactly)
    pub fn with_mutation_chance(mutation_chance: f64) -> Self {
        Self { mutation_chance }
    }

    pub fn mutation_chance(&self) -> f64 {
        self.mutation_chance
    }

    /// Copy `current` into `next`, sweep every cell row by row, then swap.
    pub fn step<R: Rng + ?Sized>(
        &self,
        store: &mut GridStore,
        rules: &RuleSet,
        rng: &mut R,
    ) -> GenerationReport {
        let (width, height) = (store.width(), store.height());
        let order = (0..height).flat_map(move |y| (0..width).map(move |x| Position::new(x, y)));
        self.step_in_order(store, rules, rng, order)
    }

    pub(crate) fn step_in_order<R: Rng + ?Sized>(
        &self,
        store: &mut GridStore,
        rules: &RuleSet,
        rng: &mut R,
        order: impl IntoIterator<Item = Position>,
    ) -> GenerationReport {
        store.prepare_next();

        let mut report = GenerationReport::default();
        for pos in order {
            let Some(cell) = store.get(pos).copied() else {
                continue;
            };
            let neighborhood = Neighborhood::survey(store.current(), pos);
            let outcome = behavior::decide(&cell, &neighborhood, rules, self.mutation_chance, rng);
            self.apply(store, pos, &cell, outcome, rng, &mut report);
        }

        store.swap();
        trace!(
            births = report.births,
            deaths = report.deaths,
            reproductions = report.reproduction_successes,
            spreads = report.spores_spread,
            "Generation swept"
        );
        report
    }

    fn apply<R: Rng + ?Sized>(
        &self,
        store: &mut GridStore,
        pos: Position,
        cell: &Cell,
        outcome: Outcome,
        rng: &mut R,
        report: &mut GenerationReport,
    ) {
        // Side effects go first: a spore spreading onto its own square must
        // still find the parent there, even if the parent dies this step.
        match outcome.action {
            Some(Action::Reproduce { species, energy }) => {
                report.reproduction_attempts += 1;
                if reproduction::try_reproduce(store, pos, species, energy, rng).is_placed() {
                    report.reproduction_successes += 1;
                }
            }
            Some(Action::Spread { dx, dy, dna }) => {
                if let Placement::Placed(_) = reproduction::try_spread(store, pos, dx, dy, dna) {
                    report.spores_spread += 1;
                }
            }
            None => {}
        }

        let next = match outcome.transition {
            Transition::Keep => return,
            Transition::Become(next) => {
                if cell.is_empty() {
                    report.births += 1;
                }
                next
            }
            Transition::Die => {
                report.deaths += 1;
                Cell::empty(rng)
            }
        };

        if let Some(slot) = store.next_mut(pos) {
            *slot = next;
        }
    }
}
