use std::fmt;

/// One of the four cardinal directions. Doubles as the index of the wall on that side of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    /// Order in which neighbors are enumerated. Keeping this fixed makes a seeded run reproducible.
    pub const CANONICAL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Wall slot for this direction: TOP=0, RIGHT=1, BOTTOM=2, LEFT=3.
    pub const fn index(self) -> usize {
        match self {
            Direction::Up => 0,
            Direction::Right => 1,
            Direction::Down => 2,
            Direction::Left => 3,
        }
    }

    pub const fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Right => Direction::Left,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "up"),
            Direction::Right => write!(f, "right"),
            Direction::Down => write!(f, "down"),
            Direction::Left => write!(f, "left"),
        }
    }
}

/// A single maze cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
    /// `true` means the wall is standing. Indexed by [`Direction::index`].
    pub walls: [bool; 4],
    /// Scratch flag shared by the generator and the solver. Cleared between passes.
    pub visited: bool,
    /// Set while the cell sits on the solver's candidate path.
    pub in_path: bool,
}

impl Cell {
    pub fn new(row: usize, col: usize) -> Self {
        Cell {
            row,
            col,
            walls: [true; 4],
            visited: false,
            in_path: false,
        }
    }

    pub fn coord(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    pub fn has_wall(&self, direction: Direction) -> bool {
        self.walls[direction.index()]
    }

    /// Checks that every wall stands and no marks are set, i.e. the cell is as freshly allocated.
    pub fn is_pristine(&self) -> bool {
        self.walls.iter().all(|&w| w) && !self.visited && !self.in_path
    }
}
