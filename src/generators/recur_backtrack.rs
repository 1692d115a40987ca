use rand::Rng;

use crate::maze::{Coord, Maze};

/// Progress of a carving pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationState {
    Running,
    Complete,
}

/// What a single [`RecursiveBacktracker::step`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenStep {
    /// A passage was carved from the top of the stack into a fresh neighbor.
    Carved { from: Coord, to: Coord },
    /// The top of the stack had nowhere left to go and was popped.
    Backtracked(Coord),
    /// The stack is empty; nothing happened.
    Complete,
}

/// Randomized depth-first carving with an explicit stack, advanced one step at a time.
///
/// The stack always holds the current path from the start cell. The pass owns no maze; the
/// caller hands it in on every step so it can redraw between steps.
#[derive(Debug, Clone)]
pub struct RecursiveBacktracker {
    stack: Vec<Coord>,
    steps: usize,
}

impl RecursiveBacktracker {
    /// Starts a pass at `start`, which is marked visited.
    ///
    /// # Panics
    /// If `start` is out of bounds.
    pub fn new(maze: &mut Maze, start: Coord) -> Self {
        maze[start].visited = true;
        tracing::debug!("[generate] carving from {:?}", start);
        RecursiveBacktracker {
            stack: vec![start],
            steps: 0,
        }
    }

    pub fn state(&self) -> GenerationState {
        if self.stack.is_empty() {
            GenerationState::Complete
        } else {
            GenerationState::Running
        }
    }

    pub fn is_complete(&self) -> bool {
        self.stack.is_empty()
    }

    /// Cells on the active path, start cell first.
    pub fn frontier(&self) -> &[Coord] {
        &self.stack
    }

    /// Number of steps that changed something.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Carves toward one random unvisited neighbor of the top cell, or backtracks if there is
    /// none. The step that empties the stack also clears every `visited` flag so the solver
    /// starts from a clean slate.
    pub fn step<R: Rng>(&mut self, maze: &mut Maze, rng: &mut R) -> GenStep {
        let Some(&current) = self.stack.last() else {
            return GenStep::Complete;
        };
        self.steps += 1;

        let candidates = maze
            .neighbors(current)
            .filter(|&(next, _)| !maze[next].visited)
            .collect::<Vec<_>>();

        if candidates.is_empty() {
            self.stack.pop();
            if self.stack.is_empty() {
                maze.clear_marks();
                tracing::debug!("[generate] complete after {} steps", self.steps);
            }
            return GenStep::Backtracked(current);
        }

        let (next, direction) = candidates[rng.random_range(0..candidates.len())];
        maze[next].visited = true;
        let opened = maze.open_wall(current, direction);
        debug_assert!(opened, "wall between {current:?} and {next:?} was already open");
        self.stack.push(next);
        GenStep::Carved {
            from: current,
            to: next,
        }
    }
}

/// Carves `maze` from its entrance to completion without pausing.
pub fn generate_instant<R: Rng>(maze: &mut Maze, rng: &mut R) -> usize {
    let start = maze.entrance();
    let mut pass = RecursiveBacktracker::new(maze, start);
    while pass.step(maze, rng) != GenStep::Complete {}
    pass.steps()
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::maze::testing;

    #[test]
    fn test_generates_perfect_maze_for_many_seeds() {
        for seed in 0..20 {
            for (rows, cols) in [(1, 1), (1, 7), (6, 1), (2, 2), (5, 8), (20, 20)] {
                let mut maze = Maze::new(rows, cols).unwrap();
                let mut rng = StdRng::seed_from_u64(seed);
                generate_instant(&mut maze, &mut rng);
                assert!(
                    testing::is_perfect(&maze),
                    "seed {seed} produced an imperfect {rows}x{cols} maze"
                );
            }
        }
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_out_of_bounds_start_panics() {
        let mut maze = Maze::new(3, 3).unwrap();
        RecursiveBacktracker::new(&mut maze, (0, 3));
    }

    #[test]
    fn test_two_by_two_has_three_passages() {
        for seed in 0..10 {
            let mut maze = Maze::new(2, 2).unwrap();
            generate_instant(&mut maze, &mut StdRng::seed_from_u64(seed));
            assert_eq!(maze.open_passages(), 3);
        }
    }

    #[test]
    fn test_every_cell_is_pushed_and_popped_once() {
        let mut maze = Maze::new(4, 6).unwrap();
        let steps = generate_instant(&mut maze, &mut StdRng::seed_from_u64(7));
        // 23 carves plus 24 backtracks
        assert_eq!(steps, 2 * 24 - 1);
    }

    #[test]
    fn test_walls_stay_symmetric_at_every_step() {
        let mut maze = Maze::new(6, 5).unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        let mut pass = RecursiveBacktracker::new(&mut maze, (0, 0));
        loop {
            let step = pass.step(&mut maze, &mut rng);
            assert!(testing::walls_are_symmetric(&maze));
            if step == GenStep::Complete {
                break;
            }
        }
    }

    #[test]
    fn test_frontier_is_a_connected_path() {
        let mut maze = Maze::new(5, 5).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let mut pass = RecursiveBacktracker::new(&mut maze, (0, 0));
        while !pass.is_complete() {
            pass.step(&mut maze, &mut rng);
            for pair in pass.frontier().windows(2) {
                let direction = Maze::direction_between(pair[0], pair[1]).unwrap();
                assert!(maze.is_open(pair[0], direction));
            }
        }
    }

    #[test]
    fn test_visited_flags_cleared_on_completion() {
        let mut maze = Maze::new(4, 4).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let mut pass = RecursiveBacktracker::new(&mut maze, (0, 0));
        assert_eq!(pass.state(), GenerationState::Running);
        assert!(maze[(0, 0)].visited);
        while pass.step(&mut maze, &mut rng) != GenStep::Complete {}
        assert_eq!(pass.state(), GenerationState::Complete);
        assert!(maze.cells().iter().all(|c| !c.visited && !c.in_path));
        // Stepping a finished pass is a no-op
        let before = maze.clone();
        assert_eq!(pass.step(&mut maze, &mut rng), GenStep::Complete);
        assert_eq!(maze, before);
    }

    #[test]
    fn test_same_seed_same_maze() {
        let mut a = Maze::new(10, 10).unwrap();
        let mut b = Maze::new(10, 10).unwrap();
        generate_instant(&mut a, &mut StdRng::seed_from_u64(99));
        generate_instant(&mut b, &mut StdRng::seed_from_u64(99));
        assert_eq!(a, b);
    }

    #[test]
    fn test_animated_and_instant_agree() {
        let mut instant = Maze::new(7, 9).unwrap();
        generate_instant(&mut instant, &mut StdRng::seed_from_u64(5));

        let mut stepped = Maze::new(7, 9).unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        let mut pass = RecursiveBacktracker::new(&mut stepped, (0, 0));
        let mut carves = 0;
        while let step @ (GenStep::Carved { .. } | GenStep::Backtracked(_)) =
            pass.step(&mut stepped, &mut rng)
        {
            if matches!(step, GenStep::Carved { .. }) {
                carves += 1;
            }
        }
        assert_eq!(carves, 7 * 9 - 1);
        assert_eq!(instant, stepped);
    }
}
