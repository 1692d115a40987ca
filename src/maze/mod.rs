pub mod cell;

pub use cell::{Cell, Direction};

use crate::error::MazeError;

/// A cell position as `(row, col)`.
pub type Coord = (usize, usize);

/// A `rows x cols` grid of cells. The maze owns every cell; callers address them by [`Coord`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Maze {
    cells: Box<[Cell]>,
    rows: usize,
    cols: usize,
}

impl Maze {
    /// Creates a maze with every wall standing and every mark cleared.
    pub fn new(rows: usize, cols: usize) -> Result<Self, MazeError> {
        if rows == 0 || cols == 0 {
            return Err(MazeError::InvalidDimension { rows, cols });
        }
        let cells = (0..rows)
            .flat_map(|r| (0..cols).map(move |c| Cell::new(r, c)))
            .collect::<Vec<_>>()
            .into_boxed_slice();
        Ok(Maze { cells, rows, cols })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Top-left cell, where the player starts and where both passes begin.
    pub fn entrance(&self) -> Coord {
        (0, 0)
    }

    /// Bottom-right cell.
    pub fn exit(&self) -> Coord {
        (self.rows - 1, self.cols - 1)
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Checks if the given coordinate is within the bounds of the maze.
    pub fn is_in_bounds(&self, coord: Coord) -> bool {
        coord.0 < self.rows && coord.1 < self.cols
    }

    fn ravel_index(&self, coord: Coord) -> usize {
        assert!(self.is_in_bounds(coord), "{:?} is out of bounds", coord);
        coord.0 * self.cols + coord.1
    }

    /// The in-bounds cell one step from `coord` in `direction`, if any.
    pub fn neighbor(&self, coord: Coord, direction: Direction) -> Option<Coord> {
        if !self.is_in_bounds(coord) {
            return None;
        }
        let (r, c) = coord;
        // Underflow wraps to usize::MAX and overflow saturates to usize::MAX; both fail the
        // bounds check since no dimension can reach usize::MAX cells.
        let next = match direction {
            Direction::Up => (r.wrapping_sub(1), c),
            Direction::Down => (r.saturating_add(1), c),
            Direction::Left => (r, c.wrapping_sub(1)),
            Direction::Right => (r, c.saturating_add(1)),
        };
        self.is_in_bounds(next).then_some(next)
    }

    /// Grid-adjacent cells of `coord` in [`Direction::CANONICAL`] order, paired with the
    /// direction leading to them. Narrow it with [`Iterator::filter`].
    pub fn neighbors(&self, coord: Coord) -> impl Iterator<Item = (Coord, Direction)> + '_ {
        Direction::CANONICAL
            .into_iter()
            .filter_map(move |dir| self.neighbor(coord, dir).map(|next| (next, dir)))
    }

    /// Neighbors reachable from `coord` without crossing a wall.
    pub fn open_neighbors(&self, coord: Coord) -> impl Iterator<Item = (Coord, Direction)> + '_ {
        self.neighbors(coord)
            .filter(move |&(_, dir)| !self[coord].has_wall(dir))
    }

    /// Whether a passage leads out of `coord` in `direction`. The outer boundary is never open.
    pub fn is_open(&self, coord: Coord, direction: Direction) -> bool {
        self.neighbor(coord, direction).is_some() && !self[coord].has_wall(direction)
    }

    /// Direction from `a` to `b` when they are exactly one step apart on exactly one axis.
    pub fn direction_between(a: Coord, b: Coord) -> Option<Direction> {
        match (b.0 as isize - a.0 as isize, b.1 as isize - a.1 as isize) {
            (-1, 0) => Some(Direction::Up),
            (1, 0) => Some(Direction::Down),
            (0, -1) => Some(Direction::Left),
            (0, 1) => Some(Direction::Right),
            _ => None,
        }
    }

    /// Knocks down the wall on the `direction` side of `from` together with the facing wall of
    /// the neighbor.
    ///
    /// # Returns
    /// `true` if a wall was removed, `false` if there was no neighbor or the passage was
    /// already open.
    pub fn open_wall(&mut self, from: Coord, direction: Direction) -> bool {
        let Some(to) = self.neighbor(from, direction) else {
            return false;
        };
        let from_idx = self.ravel_index(from);
        let to_idx = self.ravel_index(to);
        let was_standing = self.cells[from_idx].walls[direction.index()];
        self.cells[from_idx].walls[direction.index()] = false;
        self.cells[to_idx].walls[direction.opposite().index()] = false;
        was_standing
    }

    /// Clears the wall pair separating two grid-adjacent cells.
    pub fn remove_wall_between(&mut self, a: Coord, b: Coord) -> Result<(), MazeError> {
        match Maze::direction_between(a, b) {
            Some(direction) if self.is_in_bounds(a) && self.is_in_bounds(b) => {
                self.open_wall(a, direction);
                Ok(())
            }
            _ => Err(MazeError::NotAdjacent { a, b }),
        }
    }

    /// Resets the `visited` and `in_path` flags of every cell. Walls are left alone.
    pub fn clear_marks(&mut self) {
        self.cells.iter_mut().for_each(|cell| {
            cell.visited = false;
            cell.in_path = false;
        });
    }

    /// Stands every wall back up and clears every mark, as if freshly created.
    pub fn reset(&mut self) {
        self.cells
            .iter_mut()
            .for_each(|cell| *cell = Cell::new(cell.row, cell.col));
    }

    /// Number of open wall pairs. Each passage is counted once.
    pub fn open_passages(&self) -> usize {
        self.cells
            .iter()
            .map(|cell| {
                [Direction::Right, Direction::Down]
                    .into_iter()
                    .filter(|&dir| self.is_open(cell.coord(), dir))
                    .count()
            })
            .sum()
    }
}

impl std::ops::Index<Coord> for Maze {
    type Output = Cell;

    fn index(&self, index: Coord) -> &Self::Output {
        &self.cells[self.ravel_index(index)]
    }
}

impl std::ops::IndexMut<Coord> for Maze {
    fn index_mut(&mut self, index: Coord) -> &mut Self::Output {
        let idx = self.ravel_index(index);
        &mut self.cells[idx]
    }
}
