use crossterm::style::{Color, Stylize};

use std::fmt;

use crate::{
    maze::{Coord, Direction, Maze},
    player::Player,
};

/// Represents a cell in the raster grid, which can be either a path or a wall.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GridCell {
    Path(PathType),
    Wall,
}

impl GridCell {
    pub const EMPTY: GridCell = GridCell::Path(PathType::Empty);
    pub const WALL: GridCell = GridCell::Wall;
    pub const VISITED: GridCell = GridCell::Path(PathType::Visited);
    pub const ROUTE: GridCell = GridCell::Path(PathType::Route);
    pub const PLAYER: GridCell = GridCell::Path(PathType::Player);
    pub const GOAL: GridCell = GridCell::Path(PathType::Goal);
    /// The width of each cell when rendered, in character widths.
    pub const CELL_WIDTH: u16 = 2;
}

/// Represents different types of path cells in the maze.
#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub enum PathType {
    /// A carved cell or passage with no marks on it.
    #[default]
    Empty,
    /// Touched by the running pass but not on the current path.
    Visited,
    /// On the solver's candidate path.
    Route,
    /// Where the player stands.
    Player,
    /// The exit.
    Goal,
}

impl fmt::Display for GridCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let styled_symbol = match self {
            GridCell::Path(path) => match path {
                PathType::Empty => "  ".with(Color::Reset),
                PathType::Visited => "░░".with(Color::DarkYellow),
                PathType::Route => "🟦".with(Color::Blue),
                PathType::Player => "🟧".with(Color::DarkYellow),
                PathType::Goal => "🟪".with(Color::Magenta),
            },
            GridCell::Wall => "⬜".with(Color::White),
        };

        #[cfg(debug_assertions)]
        {
            use unicode_width::UnicodeWidthStr;
            assert_eq!(
                styled_symbol.content().width(),
                GridCell::CELL_WIDTH as usize,
                "Each cell must occupy exactly two character widths."
            );
        }

        write!(f, "{}", styled_symbol)
    }
}

/// Terminal raster of a maze: `(2 * cols + 1) x (2 * rows + 1)` cells, where walls and the
/// passages between maze cells get cells of their own.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    data: Box<[GridCell]>,
    width: usize,
    height: usize,
}

impl Grid {
    pub fn new(width: usize, height: usize, cell: GridCell) -> Self {
        let data = vec![cell; width * height].into_boxed_slice();
        Grid {
            data,
            width,
            height,
        }
    }

    /// Rasterizes the maze walls, the pass marks and the player.
    pub fn from_maze(maze: &Maze, player: &Player) -> Self {
        let mut grid = Grid::new(maze.cols() * 2 + 1, maze.rows() * 2 + 1, GridCell::WALL);
        let exit = maze.exit();
        for cell in maze.cells() {
            let coord = cell.coord();
            let shade = if coord == player.position {
                GridCell::PLAYER
            } else if coord == exit {
                GridCell::GOAL
            } else {
                mark(maze, &[coord])
            };
            grid.set(Grid::cell_coord(coord), shade);

            // Passages are drawn from the left or upper side only
            for direction in [Direction::Right, Direction::Down] {
                if let Some(next) = maze.neighbor(coord, direction)
                    && maze.is_open(coord, direction)
                {
                    let (x, y) = Grid::cell_coord(coord);
                    let passage = match direction {
                        Direction::Right => (x + 1, y),
                        _ => (x, y + 1),
                    };
                    grid.set(passage, mark(maze, &[coord, next]));
                }
            }
        }
        grid
    }

    /// Raster position `(x, y)` of a maze cell.
    pub fn cell_coord(coord: Coord) -> (usize, usize) {
        (coord.1 * 2 + 1, coord.0 * 2 + 1)
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    fn ravel_index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    pub fn set(&mut self, coord: (usize, usize), cell: GridCell) {
        let idx = self.ravel_index(coord.0, coord.1);
        self.data[idx] = cell;
    }

    /// Positions whose cell differs from `previous`. Every position when the sizes differ.
    pub fn changes<'a>(
        &'a self,
        previous: Option<&'a Grid>,
    ) -> impl Iterator<Item = ((usize, usize), GridCell)> + 'a {
        let previous = previous.filter(|p| p.width == self.width && p.height == self.height);
        self.data
            .iter()
            .enumerate()
            .filter(move |&(idx, cell)| previous.is_none_or(|p| p.data[idx] != *cell))
            .map(move |(idx, &cell)| ((idx % self.width, idx / self.width), cell))
    }
}

/// Shade shared by all the given cells: route beats visited beats empty.
fn mark(maze: &Maze, coords: &[Coord]) -> GridCell {
    if coords.iter().all(|&c| maze[c].in_path) {
        GridCell::ROUTE
    } else if coords.iter().all(|&c| maze[c].visited) {
        GridCell::VISITED
    } else {
        GridCell::EMPTY
    }
}

impl std::ops::Index<(usize, usize)> for Grid {
    type Output = GridCell;

    fn index(&self, index: (usize, usize)) -> &Self::Output {
        &self.data[self.ravel_index(index.0, index.1)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_maze_is_all_wall_around_cells() {
        let maze = Maze::new(2, 3).unwrap();
        let player = Player::at_entrance(&maze);
        let grid = Grid::from_maze(&maze, &player);
        assert_eq!((grid.width(), grid.height()), (7, 5));
        assert_eq!(grid[(1, 1)], GridCell::PLAYER);
        assert_eq!(grid[(5, 3)], GridCell::GOAL);
        assert_eq!(grid[(3, 1)], GridCell::EMPTY);
        assert_eq!(grid[(2, 1)], GridCell::WALL);
        assert_eq!(grid[(1, 2)], GridCell::WALL);
        assert_eq!(grid[(0, 0)], GridCell::WALL);
    }

    #[test]
    fn test_open_walls_become_passages() {
        let mut maze = Maze::new(2, 2).unwrap();
        maze.open_wall((0, 0), Direction::Right);
        maze.open_wall((0, 1), Direction::Down);
        let player = Player::at_entrance(&maze);
        let grid = Grid::from_maze(&maze, &player);
        assert_eq!(grid[(2, 1)], GridCell::EMPTY);
        assert_eq!(grid[(3, 2)], GridCell::EMPTY);
        assert_eq!(grid[(1, 2)], GridCell::WALL);
        assert_eq!(grid[(2, 3)], GridCell::WALL);
    }

    #[test]
    fn test_route_shading_needs_both_ends() {
        let mut maze = Maze::new(1, 3).unwrap();
        maze.open_wall((0, 0), Direction::Right);
        maze.open_wall((0, 1), Direction::Right);
        for c in 0..3 {
            maze[(0, c)].visited = true;
        }
        maze[(0, 0)].in_path = true;
        maze[(0, 1)].in_path = true;
        // Player parked on the exit so the entrance shows its mark
        let player = Player { position: (0, 2) };
        let grid = Grid::from_maze(&maze, &player);
        assert_eq!(grid[(1, 1)], GridCell::ROUTE);
        assert_eq!(grid[(2, 1)], GridCell::ROUTE);
        assert_eq!(grid[(3, 1)], GridCell::ROUTE);
        assert_eq!(grid[(4, 1)], GridCell::VISITED);
        assert_eq!(grid[(5, 1)], GridCell::PLAYER);
    }

    #[test]
    fn test_changes_against_previous() {
        let mut maze = Maze::new(2, 2).unwrap();
        let player = Player::at_entrance(&maze);
        let before = Grid::from_maze(&maze, &player);
        assert_eq!(before.changes(None).count(), 25);
        assert_eq!(before.changes(Some(&before)).count(), 0);

        maze.open_wall((0, 0), Direction::Down);
        let after = Grid::from_maze(&maze, &player);
        let changed = after.changes(Some(&before)).collect::<Vec<_>>();
        assert_eq!(changed, vec![((1, 2), GridCell::EMPTY)]);

        let bigger = Grid::from_maze(&Maze::new(3, 3).unwrap(), &player);
        assert_eq!(bigger.changes(Some(&before)).count(), 49);
    }

    #[test]
    fn test_every_cell_is_two_columns_wide() {
        for cell in [
            GridCell::EMPTY,
            GridCell::WALL,
            GridCell::VISITED,
            GridCell::ROUTE,
            GridCell::PLAYER,
            GridCell::GOAL,
        ] {
            // Display asserts the width in debug builds
            assert!(!cell.to_string().is_empty());
        }
    }
}
