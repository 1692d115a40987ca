//! Command-line configuration for the terminal front-end

use std::{path::PathBuf, time::Duration};

use clap::Parser;

use crate::{controller::ControllerConfig, solvers::SolvePolicy};

pub const DEFAULT_ROWS: usize = 20;
pub const DEFAULT_COLS: usize = 20;
pub const DEFAULT_FRAME_MS: u64 = 16;
pub const DEFAULT_LOG_FILE: &str = "mazecarve.log";

#[derive(Parser, Debug)]
#[command(name = "mazecarve")]
#[command(
    author,
    version,
    about = "Carve, solve and walk random mazes in the terminal"
)]
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Number of maze rows
    #[arg(short, long, default_value_t = DEFAULT_ROWS)]
    pub rows: usize,

    /// Number of maze columns
    #[arg(short, long, default_value_t = DEFAULT_COLS)]
    pub cols: usize,

    /// Random seed for reproducible mazes
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Milliseconds between two animation steps
    #[arg(short, long, default_value_t = DEFAULT_FRAME_MS)]
    pub frame_ms: u64,

    /// Carve the first maze without animation
    #[arg(short, long)]
    pub instant: bool,

    /// Which open neighbor the solver tries first
    #[arg(long, value_enum, default_value_t = SolvePolicy::Random)]
    pub solve_policy: SolvePolicy,

    /// Solve in one go instead of step by step
    #[arg(long)]
    pub no_animate_solve: bool,

    /// Where to write the log. The terminal itself is taken by the maze.
    #[arg(long, default_value = DEFAULT_LOG_FILE)]
    pub log_file: PathBuf,
}

impl Cli {
    pub fn controller_config(&self) -> ControllerConfig {
        ControllerConfig {
            rows: self.rows,
            cols: self.cols,
            solve_policy: self.solve_policy,
            animate_solve: !self.no_animate_solve,
        }
    }

    pub const fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["mazecarve"]).unwrap();
        assert_eq!(cli.controller_config(), ControllerConfig::default());
        assert_eq!(cli.frame_interval(), Duration::from_millis(16));
        assert_eq!(cli.seed, None);
        assert!(!cli.instant);
        assert_eq!(cli.log_file, PathBuf::from("mazecarve.log"));
    }

    #[test]
    fn test_flags() {
        let cli = Cli::try_parse_from([
            "mazecarve",
            "--rows",
            "5",
            "-c",
            "7",
            "--seed",
            "42",
            "--solve-policy",
            "first-open",
            "--no-animate-solve",
            "--instant",
        ])
        .unwrap();
        let config = cli.controller_config();
        assert_eq!((config.rows, config.cols), (5, 7));
        assert_eq!(config.solve_policy, SolvePolicy::FirstOpen);
        assert!(!config.animate_solve);
        assert_eq!(cli.seed, Some(42));
        assert!(cli.instant);
    }

    #[test]
    fn test_rejects_malformed_values() {
        assert!(Cli::try_parse_from(["mazecarve", "--cols", "abc"]).is_err());
        assert!(Cli::try_parse_from(["mazecarve", "--solve-policy", "bfs"]).is_err());
    }

    #[test]
    fn test_zero_dimension_is_left_to_the_controller() {
        let cli = Cli::try_parse_from(["mazecarve", "--rows", "0"]).unwrap();
        let err = crate::controller::Controller::new(
            cli.controller_config(),
            crate::generators::get_rng(Some(1)),
        )
        .err();
        assert_eq!(
            err,
            Some(crate::error::MazeError::InvalidDimension { rows: 0, cols: 20 })
        );
    }
}
