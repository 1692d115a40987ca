use std::time::Instant;

use mazecarve::{
    generators::{generate_instant, get_rng},
    maze::Maze,
    solvers::{SolvePolicy, SolveState, solve_instant},
};

const ROWS: usize = u8::MAX as usize;
const COLS: usize = u8::MAX as usize;
const DEFAULT_ITERS: usize = 10;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args();
    args.next(); // Skip executable name
    let num_iters = args
        .next()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(DEFAULT_ITERS);
    let seed = args.next().and_then(|s| s.parse::<u64>().ok());

    let mut rng = get_rng(seed);
    let mut maze = Maze::new(ROWS, COLS)?;
    let (mut carve_total, mut solve_total) = (0.0, 0.0);
    for iter in 0..num_iters {
        maze.reset();
        let start = Instant::now();
        let carve_steps = generate_instant(&mut maze, &mut rng);
        let carve_time = start.elapsed().as_secs_f64();

        let start = Instant::now();
        let solver = solve_instant(&mut maze, SolvePolicy::Random, &mut rng);
        let solve_time = start.elapsed().as_secs_f64();
        if solver.state() != SolveState::Found {
            return Err(format!("iteration {}: no path found", iter).into());
        }

        println!(
            "#{:>3}: carved in {:.3}ms ({} steps), solved in {:.3}ms ({} steps, path {})",
            iter,
            carve_time * 1e3,
            carve_steps,
            solve_time * 1e3,
            solver.steps(),
            solver.path().len()
        );
        carve_total += carve_time;
        solve_total += solve_time;
    }
    if num_iters > 0 {
        println!(
            "{}x{} over {} iterations: carve avg {:.3}ms, solve avg {:.3}ms",
            ROWS,
            COLS,
            num_iters,
            carve_total * 1e3 / num_iters as f64,
            solve_total * 1e3 / num_iters as f64
        );
    }
    Ok(())
}
