use std::{error::Error, path::Path};

use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use mazecarve::{app::App, config::Cli, controller::Controller, generators::get_rng};

/// Log to a file, since the terminal is in raw mode while the maze is shown.
fn init_tracing(log_file: &Path) -> std::io::Result<WorkerGuard> {
    let directory = match log_file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = log_file.file_name().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("log file path has no file name: {}", log_file.display()),
        )
    })?;
    std::fs::create_dir_all(directory)?;

    let appender = tracing_appender::rolling::never(directory, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_thread_names(true)
        .with_writer(writer)
        .init();
    Ok(guard)
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let _guard = init_tracing(&cli.log_file)?;

    let controller = Controller::new(cli.controller_config(), get_rng(cli.seed))?;
    tracing::info!(
        "[main] {}x{} maze, seed {:?}, solver policy {}",
        cli.rows,
        cli.cols,
        cli.seed,
        cli.solve_policy
    );

    let mut app = App::new(cli.frame_interval(), cli.instant);
    let mut stdout = std::io::stdout();
    App::setup_terminal(&mut stdout)?;
    let result = app.run(controller, &mut stdout);
    App::restore_terminal(&mut stdout)?;
    if let Err(e) = &result {
        tracing::error!("[main] app failed: {}", e);
    }
    Ok(result?)
}
