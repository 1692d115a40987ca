use rand::Rng;

use super::{SolvePolicy, SolveState};
use crate::maze::{Coord, Maze};

/// Depth-first search with backtracking over open passages, advanced one step at a time.
///
/// Walls are read, never written. The stack is the candidate path from the entrance; cells on
/// it carry `in_path` so a renderer can highlight them.
#[derive(Debug, Clone)]
pub struct DfsSolver {
    stack: Vec<Coord>,
    goal: Coord,
    policy: SolvePolicy,
    state: SolveState,
    steps: usize,
}

impl DfsSolver {
    /// Clears all marks, then marks `start` visited and in-path.
    ///
    /// # Panics
    /// If `start` is out of bounds.
    pub fn start(maze: &mut Maze, start: Coord, goal: Coord, policy: SolvePolicy) -> Self {
        maze.clear_marks();
        maze[start].visited = true;
        maze[start].in_path = true;
        tracing::debug!(
            "[solve] searching {:?} -> {:?} ({})",
            start,
            goal,
            policy
        );
        DfsSolver {
            stack: vec![start],
            goal,
            policy,
            state: SolveState::Running,
            steps: 0,
        }
    }

    pub fn state(&self) -> SolveState {
        self.state
    }

    pub fn policy(&self) -> SolvePolicy {
        self.policy
    }

    /// Current candidate path, entrance first. Once [`SolveState::Found`], a simple path from
    /// entrance to exit through open walls.
    pub fn path(&self) -> &[Coord] {
        &self.stack
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn step<R: Rng>(&mut self, maze: &mut Maze, rng: &mut R) -> SolveState {
        if self.state != SolveState::Running {
            return self.state;
        }
        let Some(&current) = self.stack.last() else {
            tracing::warn!("[solve] no path to {:?}", self.goal);
            self.state = SolveState::Exhausted;
            return self.state;
        };
        if current == self.goal {
            tracing::debug!(
                "[solve] reached {:?} in {} steps, path length {}",
                self.goal,
                self.steps,
                self.stack.len()
            );
            self.state = SolveState::Found;
            return self.state;
        }
        self.steps += 1;

        let chosen = {
            let mut candidates = maze
                .open_neighbors(current)
                .filter(|&(next, _)| !maze[next].visited)
                .map(|(next, _)| next);
            match self.policy {
                SolvePolicy::FirstOpen => candidates.next(),
                SolvePolicy::Random => {
                    let all = candidates.collect::<Vec<_>>();
                    match all.len() {
                        0 => None,
                        n => Some(all[rng.random_range(0..n)]),
                    }
                }
            }
        };

        match chosen {
            Some(next) => {
                maze[next].visited = true;
                maze[next].in_path = true;
                self.stack.push(next);
            }
            None => {
                // Dead end: drop it from the candidate path
                self.stack.pop();
                maze[current].in_path = false;
            }
        }
        self.state
    }
}

/// Runs a pass from the maze's entrance to its exit without pausing.
pub fn solve_instant<R: Rng>(maze: &mut Maze, policy: SolvePolicy, rng: &mut R) -> DfsSolver {
    let (start, goal) = (maze.entrance(), maze.exit());
    let mut solver = DfsSolver::start(maze, start, goal, policy);
    while solver.step(maze, rng) == SolveState::Running {}
    solver
}
