use rand::Rng;

use crate::{
    error::MazeError,
    generators::{GenStep, GenerationState, RecursiveBacktracker},
    maze::{Coord, Direction, Maze},
    player::{Player, attempt_move},
    solvers::{DfsSolver, SolvePolicy, SolveState},
};

/// Static settings the controller is created with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerConfig {
    pub rows: usize,
    pub cols: usize,
    pub solve_policy: SolvePolicy,
    /// Step the solver frame by frame instead of solving in one go.
    pub animate_solve: bool,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            rows: 20,
            cols: 20,
            solve_policy: SolvePolicy::default(),
            animate_solve: true,
        }
    }
}

/// Requests coming from the input side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Carve a new maze. Ignored while a pass is running.
    RequestNewMaze { animated: bool },
    /// Search for a path. Ignored unless carving is complete and no search has run yet.
    RequestSolve,
    /// Abandon whatever is running and carve a new maze.
    RequestReset { animated: bool },
    /// Step the player. Ignored while a pass is running.
    Move(Direction),
}

/// Outcomes the controller reports besides redraws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notification {
    Generated,
    Solved { length: usize },
    NoPath,
    Won,
}

/// Consumer of the controller's state. Called once per completed mutation.
pub trait Renderer {
    fn draw(&mut self, maze: &Maze, player: &Player) -> std::io::Result<()>;
    fn notify(&mut self, notification: Notification) -> std::io::Result<()>;
}

/// The pass currently driving the maze, if any.
#[derive(Debug)]
enum Pass {
    Idle,
    Generating(RecursiveBacktracker),
    Solving(DfsSolver),
}

/// Owns the maze, the player, the random source and the active pass.
///
/// Only one pass runs at a time. Animated passes advance through [`Controller::tick`];
/// instant ones finish inside [`Controller::handle`].
pub struct Controller<R> {
    config: ControllerConfig,
    maze: Maze,
    player: Player,
    rng: R,
    pass: Pass,
    solve_state: SolveState,
    solution: Vec<Coord>,
}

impl<R: Rng> Controller<R> {
    /// Builds a fresh, fully walled maze with a carving pass ready to run and nothing drawn yet.
    pub fn new(config: ControllerConfig, rng: R) -> Result<Self, MazeError> {
        let mut maze = Maze::new(config.rows, config.cols)?;
        let player = Player::at_entrance(&maze);
        let start = maze.entrance();
        let pass = Pass::Generating(RecursiveBacktracker::new(&mut maze, start));
        Ok(Controller {
            config,
            maze,
            player,
            rng,
            pass,
            solve_state: SolveState::Idle,
            solution: Vec::new(),
        })
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn generation_state(&self) -> GenerationState {
        match &self.pass {
            Pass::Generating(generator) => generator.state(),
            _ => GenerationState::Complete,
        }
    }

    pub fn solve_state(&self) -> SolveState {
        match &self.pass {
            Pass::Solving(solver) => solver.state(),
            _ => self.solve_state,
        }
    }

    /// Path found by the last finished search, entrance first. Empty otherwise.
    pub fn solution(&self) -> &[Coord] {
        &self.solution
    }

    /// Whether a generation or solving pass is in progress.
    pub fn is_busy(&self) -> bool {
        !matches!(self.pass, Pass::Idle)
    }

    /// Draws the current state without changing it.
    pub fn redraw(&self, renderer: &mut impl Renderer) -> std::io::Result<()> {
        renderer.draw(&self.maze, &self.player)
    }

    /// Applies an input event, ignoring it when it does not fit the current state.
    pub fn handle(
        &mut self,
        event: InputEvent,
        renderer: &mut impl Renderer,
    ) -> std::io::Result<()> {
        match event {
            InputEvent::RequestReset { animated } => self.setup(animated, renderer),
            InputEvent::RequestNewMaze { animated } => {
                if self.is_busy() {
                    tracing::debug!("[controller] new maze ignored, a pass is running");
                    return Ok(());
                }
                self.setup(animated, renderer)
            }
            InputEvent::RequestSolve => self.start_solve(renderer),
            InputEvent::Move(direction) => self.move_player(direction, renderer),
        }
    }

    /// Advances the running pass by one step and redraws.
    /// Returns `false` when there was nothing to advance.
    pub fn tick(&mut self, renderer: &mut impl Renderer) -> std::io::Result<bool> {
        match &mut self.pass {
            Pass::Idle => return Ok(false),
            Pass::Generating(generator) => {
                if generator.step(&mut self.maze, &mut self.rng) == GenStep::Complete {
                    self.finish_generation(renderer)?;
                    return Ok(true);
                }
            }
            Pass::Solving(solver) => {
                if solver.step(&mut self.maze, &mut self.rng).is_finished() {
                    self.finish_solve(renderer)?;
                    return Ok(true);
                }
            }
        }
        renderer.draw(&self.maze, &self.player)?;
        Ok(true)
    }

    /// Throws away the active pass, restores the fresh grid and the player, and starts carving.
    fn setup(&mut self, animated: bool, renderer: &mut impl Renderer) -> std::io::Result<()> {
        if self.is_busy() {
            tracing::debug!("[controller] abandoning running pass");
        }
        self.maze.reset();
        self.player = Player::at_entrance(&self.maze);
        self.solve_state = SolveState::Idle;
        self.solution.clear();
        let start = self.maze.entrance();
        self.pass = Pass::Generating(RecursiveBacktracker::new(&mut self.maze, start));
        tracing::info!(
            "[controller] carving {}x{} maze ({})",
            self.maze.rows(),
            self.maze.cols(),
            if animated { "animated" } else { "instant" }
        );
        renderer.draw(&self.maze, &self.player)?;

        if !animated {
            if let Pass::Generating(generator) = &mut self.pass {
                while generator.step(&mut self.maze, &mut self.rng) != GenStep::Complete {}
            }
            self.finish_generation(renderer)?;
        }
        Ok(())
    }

    fn finish_generation(&mut self, renderer: &mut impl Renderer) -> std::io::Result<()> {
        if let Pass::Generating(generator) = &self.pass {
            tracing::info!("[controller] maze carved in {} steps", generator.steps());
        }
        self.pass = Pass::Idle;
        renderer.draw(&self.maze, &self.player)?;
        renderer.notify(Notification::Generated)?;
        // Single-cell mazes put the player on the exit from the start
        if self.player.position == self.maze.exit() {
            tracing::info!("[controller] exit reached");
            renderer.notify(Notification::Won)?;
        }
        Ok(())
    }

    fn start_solve(&mut self, renderer: &mut impl Renderer) -> std::io::Result<()> {
        if self.is_busy() || self.solve_state != SolveState::Idle {
            tracing::debug!(
                "[controller] solve ignored (generation {:?}, solver {:?})",
                self.generation_state(),
                self.solve_state()
            );
            return Ok(());
        }
        let (start, goal) = (self.maze.entrance(), self.maze.exit());
        let mut solver = DfsSolver::start(&mut self.maze, start, goal, self.config.solve_policy);
        tracing::info!("[controller] solving with policy {}", solver.policy());

        if self.config.animate_solve {
            self.pass = Pass::Solving(solver);
            return renderer.draw(&self.maze, &self.player);
        }

        while !solver.step(&mut self.maze, &mut self.rng).is_finished() {}
        self.pass = Pass::Solving(solver);
        self.finish_solve(renderer)
    }

    fn finish_solve(&mut self, renderer: &mut impl Renderer) -> std::io::Result<()> {
        let Pass::Solving(solver) = std::mem::replace(&mut self.pass, Pass::Idle) else {
            return Ok(());
        };
        self.solve_state = solver.state();
        renderer.draw(&self.maze, &self.player)?;
        match solver.state() {
            SolveState::Found => {
                self.solution = solver.path().to_vec();
                tracing::info!(
                    "[controller] path of {} cells found in {} steps",
                    self.solution.len(),
                    solver.steps()
                );
                renderer.notify(Notification::Solved {
                    length: self.solution.len(),
                })
            }
            _ => {
                tracing::warn!("[controller] search exhausted without reaching the exit");
                renderer.notify(Notification::NoPath)
            }
        }
    }

    fn move_player(
        &mut self,
        direction: Direction,
        renderer: &mut impl Renderer,
    ) -> std::io::Result<()> {
        if self.is_busy() {
            tracing::debug!("[controller] move {} ignored, a pass is running", direction);
            return Ok(());
        }
        let before = self.player;
        let moved = attempt_move(&self.maze, before, direction);
        if !moved.accepted(before) {
            return Ok(());
        }
        self.player = moved.player;
        tracing::debug!("[controller] player moved to {:?}", self.player.position);
        renderer.draw(&self.maze, &self.player)?;
        if moved.reached_exit {
            tracing::info!("[controller] exit reached");
            renderer.notify(Notification::Won)?;
        }
        Ok(())
    }
}
