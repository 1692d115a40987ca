use crate::maze::{Coord, Direction, Maze};

/// The single occupant of the maze.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Player {
    pub position: Coord,
}

impl Player {
    pub fn at_entrance(maze: &Maze) -> Self {
        Player {
            position: maze.entrance(),
        }
    }
}

/// Result of [`attempt_move`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Moved {
    pub player: Player,
    /// Set when the resulting position is the exit.
    pub reached_exit: bool,
}

impl Moved {
    /// Whether the position changed.
    pub fn accepted(&self, before: Player) -> bool {
        self.player != before
    }
}

/// Steps `player` one cell in `direction` if the wall on that side of its cell is open.
/// A blocked move, including one off the edge of the grid, leaves the position unchanged.
pub fn attempt_move(maze: &Maze, player: Player, direction: Direction) -> Moved {
    let position = if maze.is_open(player.position, direction) {
        maze.neighbor(player.position, direction)
            .unwrap_or(player.position)
    } else {
        player.position
    };
    Moved {
        player: Player { position },
        reached_exit: position == maze.exit(),
    }
}
