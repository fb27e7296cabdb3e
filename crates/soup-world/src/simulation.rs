//! Simulation context: the grid, rules, clock and random source for one soup.

use crate::brush::Brush;
use crate::clock::SimulationClock;
use crate::engine::RuleEngine;
use crate::grid::{Grid, GridStore};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use soup_core::{
    Cell, Census, Error, GenerationReport, Position, Result, RuleSet, SoupConfig, Species,
};
use tracing::{debug, event, info, instrument, trace, warn, Level};

/// Everything one running soup owns.
///
/// External edits (`set_cell`, `spawn`, `set_rules`, `clear`, `resize`) take
/// `&mut self`, so they can only happen between generations.
pub struct Simulation {
    store: GridStore,
    engine: RuleEngine,
    rules: RuleSet,
    clock: SimulationClock,
    brush: Brush,
    selected: Species,
    rng: ChaCha8Rng,
    generation: u64,
    totals: GenerationReport,
}

impl Simulation {
    pub fn new(config: &SoupConfig) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(config.world.seed);
        let store = GridStore::new(config.world.width, config.world.height, &mut rng);

        report_out_of_range(&config.rules);

        Self {
            store,
            engine: RuleEngine::new(),
            rules: config.rules,
            clock: SimulationClock::new(&config.clock),
            brush: Brush::new(&config.brush),
            selected: Species::Basic,
            rng,
            generation: 0,
            totals: GenerationReport::default(),
        }
    }

    /// Replace the rule engine (e.g. to change the birth mutation chance)
    pub fn with_engine(mut self, engine: RuleEngine) -> Self {
        self.engine = engine;
        self
    }

    /// Current grid, for renderers
    pub fn grid(&self) -> &Grid {
        self.store.current()
    }

    pub fn get(&self, pos: Position) -> Option<&Cell> {
        self.store.get(pos)
    }

    pub fn width(&self) -> i32 {
        self.store.width()
    }

    pub fn height(&self) -> i32 {
        self.store.height()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    /// Lifetime totals since creation or the last clear
    pub fn totals(&self) -> &GenerationReport {
        &self.totals
    }

    /// Per-frame entry point. Runs a generation if the clock says one is due.
    pub fn tick(&mut self, now: f64) -> Option<GenerationReport> {
        if self.clock.poll(now) {
            Some(self.step())
        } else {
            None
        }
    }

    /// Run exactly one generation, ignoring the clock
    pub fn step(&mut self) -> GenerationReport {
        let report = self.engine.step(&mut self.store, &self.rules, &mut self.rng);
        self.generation += 1;
        self.totals.absorb(&report);
        trace!(generation = self.generation, "Generation complete");
        report
    }

    /// Run `generations` steps back to back
    #[instrument(skip(self))]
    pub fn run(&mut self, generations: u64) -> GenerationReport {
        let mut report = GenerationReport::default();
        for _ in 0..generations {
            report.absorb(&self.step());
        }
        debug!(
            generation = self.generation,
            births = report.births,
            deaths = report.deaths,
            "Batch finished"
        );
        report
    }

    pub fn pause(&mut self) {
        self.clock.pause();
    }

    pub fn resume(&mut self) {
        self.clock.resume();
    }

    pub fn toggle_pause(&mut self) -> bool {
        let paused = self.clock.toggle_pause();
        debug!(paused, "Pause toggled");
        paused
    }

    pub fn is_paused(&self) -> bool {
        self.clock.is_paused()
    }

    /// Install new rules. Values outside their documented ranges are still
    /// accepted; the offending field names are logged and returned.
    pub fn set_rules(&mut self, rules: RuleSet) -> Vec<&'static str> {
        let out_of_range = report_out_of_range(&rules);
        debug!(?rules, "Rules replaced");
        self.rules = rules;
        out_of_range
    }

    /// Draw and install a random rule set
    pub fn randomize_rules(&mut self) -> RuleSet {
        let rules = RuleSet::random(&mut self.rng);
        self.set_rules(rules);
        rules
    }

    pub fn selected_species(&self) -> Species {
        self.selected
    }

    /// Choose the species future spawn gestures paint
    pub fn select_species(&mut self, species: Species) -> Result<()> {
        if !species.is_living() {
            return Err(Error::InvalidState(
                "spawn gestures need a living species".to_string(),
            ));
        }
        self.selected = species;
        Ok(())
    }

    /// Paint the selected species around `center`
    pub fn spawn(&mut self, center: Position) -> usize {
        self.spawn_species(center, self.selected)
    }

    pub fn spawn_species(&mut self, center: Position, species: Species) -> usize {
        let painted = self.brush.paint(&mut self.store, center, species, &mut self.rng);
        debug!(x = center.x, y = center.y, %species, painted, "Spawn gesture");
        painted
    }

    /// Place a fresh organism of `species` (or an empty cell) at `pos`
    pub fn set_cell(&mut self, pos: Position, species: Species) -> Result<()> {
        let cell = Cell::spawn(species, &mut self.rng);
        self.store.set_cell(pos, cell)
    }

    /// Empty the whole grid and restart the generation count
    #[instrument(skip(self), fields(generation = self.generation))]
    pub fn clear(&mut self) {
        self.store.clear(&mut self.rng);
        self.generation = 0;
        self.totals = GenerationReport::default();
        info!("Soup cleared");
    }

    /// Reallocate the grid. Same dimensions keep every cell; anything else
    /// discards all organisms.
    #[instrument(skip(self))]
    pub fn resize(&mut self, width: i32, height: i32) {
        if self.store.resize(width, height, &mut self.rng) {
            info!(
                width = self.store.width(),
                height = self.store.height(),
                "Grid reallocated"
            );
        }
    }

    pub fn census(&self) -> Census {
        Census::from_cells(self.generation, self.store.current().cells())
    }

    /// Emit the current census as structured events
    pub fn emit_population_metrics(&self) {
        let census = self.census();

        info!(
            event = "population_metrics",
            generation = census.generation,
            live_cells = census.live_cells,
            basic = census.count(Species::Basic),
            predator = census.count(Species::Predator),
            plant = census.count(Species::Plant),
            spore = census.count(Species::Spore),
            species_present = census.species_present(),
            entropy = census.entropy(),
            births_total = self.totals.births,
            deaths_total = self.totals.deaths,
            reproduction_success_rate = format!("{:.2}%", self.totals.reproduction_success_rate()),
            "Population snapshot"
        );

        event!(
            Level::INFO,
            gauge_name = "live_cells",
            gauge_value = census.live_cells,
            generation = census.generation,
            "Live cell gauge"
        );

        event!(
            Level::INFO,
            gauge_name = "average_energy",
            gauge_value = census.average_energy(),
            generation = census.generation,
            "Average energy"
        );
    }
}

fn report_out_of_range(rules: &RuleSet) -> Vec<&'static str> {
    let out_of_range = rules.out_of_range();
    if !out_of_range.is_empty() {
        warn!(fields = ?out_of_range, "Rule values outside their documented ranges");
    }
    out_of_range
}
