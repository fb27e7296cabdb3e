//! Double-buffered 2D grid of cells.

use rand::Rng;
use serde::{Deserialize, Serialize};
use soup_core::{Cell, Error, Position, Result};

/// A bounded (non-wrapping) rectangular grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    pub width: i32,
    pub height: i32,
    cells: Vec<Cell>,
}

impl Grid {
    /// Grid of empty cells with freshly sampled dna. Non-positive dimensions
    /// are clamped to 1.
    pub fn new<R: Rng + ?Sized>(width: i32, height: i32, rng: &mut R) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let size = (width as usize) * (height as usize);
        Self {
            width,
            height,
            cells: (0..size).map(|_| Cell::empty(rng)).collect(),
        }
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }

    /// Get cell at position, `None` when out of bounds
    pub fn get(&self, pos: Position) -> Option<&Cell> {
        self.index_of(pos).map(|index| &self.cells[index])
    }

    pub fn get_mut(&mut self, pos: Position) -> Option<&mut Cell> {
        self.index_of(pos).map(move |index| &mut self.cells[index])
    }

    /// Set cell at position
    pub fn set(&mut self, pos: Position, cell: Cell) -> Result<()> {
        match self.index_of(pos) {
            Some(index) => {
                self.cells[index] = cell;
                Ok(())
            }
            None => Err(Error::OutOfBounds {
                position: pos,
                width: self.width,
                height: self.height,
            }),
        }
    }

    /// In-bounds positions of the up-to-8 cells around `pos`
    pub fn neighbors(&self, pos: Position) -> impl Iterator<Item = Position> + '_ {
        (-1..=1)
            .flat_map(move |dy| (-1..=1).map(move |dx| (dx, dy)))
            .filter(|&(dx, dy)| dx != 0 || dy != 0)
            .map(move |(dx, dy)| pos.add(dx, dy))
            .filter(move |p| self.contains(*p))
    }

    /// Overwrite every cell with a fresh empty one
    pub fn reset<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for cell in &mut self.cells {
            *cell = Cell::empty(rng);
        }
    }

    fn index_of(&self, pos: Position) -> Option<usize> {
        if self.contains(pos) {
            Some((pos.y * self.width + pos.x) as usize)
        } else {
            None
        }
    }

    /// Get position from index
    pub fn index_to_pos(&self, index: usize) -> Position {
        let x = (index as i32) % self.width;
        let y = (index as i32) / self.width;
        Position::new(x, y)
    }

    /// Iterator over all positions, row by row
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.cells.len()).map(move |i| self.index_to_pos(i))
    }

    /// Iterator over all cells with positions
    pub fn iter(&self) -> impl Iterator<Item = (Position, &Cell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| (self.index_to_pos(i), cell))
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn same_shape(&self, other: &Grid) -> bool {
        self.width == other.width && self.height == other.height
    }
}

/// The `current` / `next` buffer pair.
///
/// Readers only ever see `current`. A generation writes into `next` and then
/// swaps.
#[derive(Debug, Clone)]
pub struct GridStore {
    current: Grid,
    next: Grid,
}

impl GridStore {
    pub fn new<R: Rng + ?Sized>(width: i32, height: i32, rng: &mut R) -> Self {
        let current = Grid::new(width, height, rng);
        let next = Grid::new(width, height, rng);
        Self { current, next }
    }

    /// Start from an existing grid; `next` begins as a copy
    pub fn from_grid(grid: Grid) -> Self {
        Self {
            next: grid.clone(),
            current: grid,
        }
    }

    pub fn width(&self) -> i32 {
        self.current.width
    }

    pub fn height(&self) -> i32 {
        self.current.height
    }

    pub fn current(&self) -> &Grid {
        &self.current
    }

    pub fn next(&self) -> &Grid {
        &self.next
    }

    /// Read from `current`
    pub fn get(&self, pos: Position) -> Option<&Cell> {
        self.current.get(pos)
    }

    /// Read from `next`, as written so far this generation
    pub fn get_next(&self, pos: Position) -> Option<&Cell> {
        self.next.get(pos)
    }

    /// External edit applied to `current` between generations
    pub fn set_cell(&mut self, pos: Position, cell: Cell) -> Result<()> {
        self.current.set(pos, cell)
    }

    pub fn set_next(&mut self, pos: Position, cell: Cell) -> Result<()> {
        self.next.set(pos, cell)
    }

    /// Mutable slot in `next` for writes made during a sweep
    pub(crate) fn next_mut(&mut self, pos: Position) -> Option<&mut Cell> {
        self.next.get_mut(pos)
    }

    /// Make `next` an independent copy of `current`
    pub fn prepare_next(&mut self) {
        self.next.clone_from(&self.current);
    }

    pub fn swap(&mut self) {
        assert!(
            self.current.same_shape(&self.next),
            "grid buffers diverged in shape"
        );
        std::mem::swap(&mut self.current, &mut self.next);
    }

    /// Reallocate both buffers. A no-op when the (clamped) dimensions match.
    /// Returns whether the grid was rebuilt.
    pub fn resize<R: Rng + ?Sized>(&mut self, width: i32, height: i32, rng: &mut R) -> bool {
        let (width, height) = (width.max(1), height.max(1));
        if width == self.width() && height == self.height() {
            return false;
        }
        *self = Self::new(width, height, rng);
        true
    }

    /// Empty every cell in both buffers, keeping dimensions
    pub fn clear<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.current.reset(rng);
        self.next.reset(rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use soup_core::{Organism, Species};

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(42)
    }

    #[test]
    fn test_grid_creation() {
        let grid = Grid::new(10, 10, &mut rng());
        assert_eq!(grid.width, 10);
        assert_eq!(grid.height, 10);
        assert_eq!(grid.cells.len(), 100);
        assert!(grid.cells.iter().all(|c| c.is_empty()));
    }

    #[test]
    fn test_non_positive_dimensions_clamp_to_one() {
        let grid = Grid::new(0, -4, &mut rng());
        assert_eq!((grid.width, grid.height), (1, 1));
        assert_eq!(grid.cells().len(), 1);
    }

    #[test]
    fn test_out_of_bounds_reads_are_absent() {
        let mut grid = Grid::new(10, 10, &mut rng());
        assert!(grid.get(Position::new(-1, 0)).is_none());
        assert!(grid.get(Position::new(10, 3)).is_none());
        assert!(grid.get(Position::new(9, 9)).is_some());

        let err = grid
            .set(Position::new(10, 10), Cell::Empty { dna: 0.0 })
            .unwrap_err();
        assert!(matches!(err, Error::OutOfBounds { .. }));
    }

    #[test]
    fn test_neighbors() {
        let grid = Grid::new(10, 10, &mut rng());
        assert_eq!(grid.neighbors(Position::new(5, 5)).count(), 8);
        assert_eq!(grid.neighbors(Position::new(0, 5)).count(), 5);
        assert_eq!(grid.neighbors(Position::new(0, 0)).count(), 3);
        assert_eq!(grid.neighbors(Position::new(9, 9)).count(), 3);
        assert!(grid
            .neighbors(Position::new(9, 0))
            .all(|p| grid.contains(p)));
    }

    #[test]
    fn test_positions_are_row_major() {
        let grid = Grid::new(3, 2, &mut rng());
        let positions: Vec<_> = grid.positions().collect();
        assert_eq!(positions[0], Position::new(0, 0));
        assert_eq!(positions[2], Position::new(2, 0));
        assert_eq!(positions[3], Position::new(0, 1));
        assert_eq!(positions.len(), 6);
    }

    #[test]
    fn test_store_swap_exchanges_buffers() {
        let mut store = GridStore::new(4, 4, &mut rng());
        let pos = Position::new(1, 2);
        store.prepare_next();
        store
            .set_next(pos, Cell::Basic(Organism::new(3.0, 0.5)))
            .unwrap();
        assert!(store.get(pos).unwrap().is_empty());

        store.swap();
        assert_eq!(store.get(pos).unwrap().species(), Species::Basic);
        assert!(store.get_next(pos).unwrap().is_empty());
    }

    #[test]
    fn test_next_mut_writes_only_next() {
        let mut store = GridStore::new(3, 3, &mut rng());
        store.prepare_next();
        let pos = Position::new(2, 0);
        *store.next_mut(pos).unwrap() = Cell::Predator(Organism::new(8.0, 0.2));

        assert_eq!(store.get_next(pos).unwrap().species(), Species::Predator);
        assert!(store.get(pos).unwrap().is_empty());
        assert!(store.next_mut(Position::new(3, 0)).is_none());
        assert!(store.next_mut(Position::new(0, -1)).is_none());
    }

    #[test]
    fn test_prepare_next_copies_current() {
        let mut store = GridStore::new(4, 4, &mut rng());
        store
            .set_cell(Position::new(3, 3), Cell::Plant(Organism::new(2.0, 0.1)))
            .unwrap();
        store.prepare_next();
        assert_eq!(store.current(), store.next());
    }

    #[test]
    fn test_resize_same_dimensions_is_noop() {
        let mut rng = rng();
        let mut store = GridStore::new(6, 5, &mut rng);
        store
            .set_cell(Position::new(2, 2), Cell::Spore(Organism::new(1.0, 0.7)))
            .unwrap();
        let before = store.current().clone();

        assert!(!store.resize(6, 5, &mut rng));
        assert_eq!(store.current(), &before);
    }

    #[test]
    fn test_resize_discards_organisms() {
        let mut rng = rng();
        let mut store = GridStore::new(6, 5, &mut rng);
        store
            .set_cell(Position::new(2, 2), Cell::Spore(Organism::new(1.0, 0.7)))
            .unwrap();

        assert!(store.resize(8, 3, &mut rng));
        assert_eq!((store.width(), store.height()), (8, 3));
        assert_eq!(store.next().cells().len(), 24);
        assert!(store.current().cells().iter().all(|c| c.is_empty()));

        assert!(store.resize(-2, 0, &mut rng));
        assert_eq!((store.width(), store.height()), (1, 1));
    }

    #[test]
    fn test_clear_keeps_dimensions() {
        let mut rng = rng();
        let mut store = GridStore::new(5, 5, &mut rng);
        store
            .set_cell(Position::new(0, 0), Cell::Basic(Organism::new(3.0, 0.2)))
            .unwrap();
        store.clear(&mut rng);
        assert_eq!(store.width(), 5);
        assert!(store.current().cells().iter().all(|c| c.is_empty()));
    }
}
