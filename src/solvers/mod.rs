pub mod dfs;

pub use dfs::{DfsSolver, solve_instant};

/// How the solver picks among several open, unvisited neighbors.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SolvePolicy {
    /// Uniformly at random, drawing from the shared random source.
    #[default]
    Random,
    /// The first one in canonical direction order (up, down, left, right).
    FirstOpen,
}

impl std::fmt::Display for SolvePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolvePolicy::Random => write!(f, "Random neighbor"),
            SolvePolicy::FirstOpen => write!(f, "First open neighbor"),
        }
    }
}

/// Progress of a solving pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveState {
    /// No pass has been started on the current maze.
    Idle,
    Running,
    /// The exit sits on top of the stack; the stack is the path.
    Found,
    /// The stack ran dry without reaching the exit.
    Exhausted,
}

impl SolveState {
    pub fn is_finished(self) -> bool {
        matches!(self, SolveState::Found | SolveState::Exhausted)
    }
}
