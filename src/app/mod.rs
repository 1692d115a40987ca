pub mod grid;
pub mod renderer;

use std::{
    io::{Stdout, Write},
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
        mpsc::{RecvTimeoutError, Sender},
    },
    time::{Duration, Instant},
};

use crossterm::{
    cursor,
    event::{self, KeyCode, KeyEvent},
    queue,
    style::{self, Attribute, Color, Stylize},
    terminal::{self, ClearType},
};
use rand::Rng;

use crate::{
    app::renderer::{TerminalRenderer, required_size},
    controller::{Controller, InputEvent},
    maze::Direction,
};

/// Timeout for polling input events in the input thread, a.k.a.
/// how often to check for the stop flag
const USER_INPUT_EVENT_POLL_TIMEOUT: Duration = Duration::from_millis(100);
/// Fastest animation the speed keys allow
const MIN_FRAME_INTERVAL: Duration = Duration::from_millis(1);
/// Slowest animation the speed keys allow
const MAX_FRAME_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Debug)]
enum UserInputEvent {
    KeyPress(KeyEvent),
    Resize,
}

/// What a key press asks the app to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserAction {
    /// Forward to the controller
    Input(InputEvent),
    /// Increase animation speed
    SpeedUp,
    /// Decrease animation speed
    SlowDown,
    /// Leave the app
    Quit,
}

impl UserAction {
    /// Actions that draw nothing, so they stay live while the terminal is too small.
    pub fn runs_while_too_small(self) -> bool {
        !matches!(self, UserAction::Input(_))
    }
}

/// Maps a key to its action. Unbound keys map to `None`.
pub fn map_key(key: KeyEvent) -> Option<UserAction> {
    let action = match key.code {
        KeyCode::Up => UserAction::Input(InputEvent::Move(Direction::Up)),
        KeyCode::Down => UserAction::Input(InputEvent::Move(Direction::Down)),
        KeyCode::Left => UserAction::Input(InputEvent::Move(Direction::Left)),
        KeyCode::Right => UserAction::Input(InputEvent::Move(Direction::Right)),
        KeyCode::Char('s') => UserAction::Input(InputEvent::RequestSolve),
        KeyCode::Char('n') => UserAction::Input(InputEvent::RequestNewMaze { animated: true }),
        KeyCode::Char('N') => UserAction::Input(InputEvent::RequestNewMaze { animated: false }),
        KeyCode::Char('r') => UserAction::Input(InputEvent::RequestReset { animated: true }),
        KeyCode::Char('R') => UserAction::Input(InputEvent::RequestReset { animated: false }),
        KeyCode::Char('+') | KeyCode::Char('=') => UserAction::SpeedUp,
        KeyCode::Char('-') => UserAction::SlowDown,
        KeyCode::Esc | KeyCode::Char('q') => UserAction::Quit,
        _ => return None,
    };
    Some(action)
}

pub struct App {
    /// Time between two animation steps
    frame_interval: Duration,
    /// Carve the first maze without animation
    instant_start: bool,
}

impl App {
    pub fn new(frame_interval: Duration, instant_start: bool) -> Self {
        Self {
            frame_interval: frame_interval.clamp(MIN_FRAME_INTERVAL, MAX_FRAME_INTERVAL),
            instant_start,
        }
    }

    pub fn frame_interval(&self) -> Duration {
        self.frame_interval
    }

    /// Set a panic hook to restore terminal state on panic
    /// This ensures that the terminal is not left in raw mode or alternate screen on panic
    /// even if the panic occurs in a different thread
    fn set_panic_hook() {
        let hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            let _ = App::restore_terminal(&mut std::io::stdout()); // ignore any errors as we are already failing
            hook(panic_info);
        }));
    }

    /// Setup terminal in raw mode and enter alternate screen
    /// Also sets a panic hook to restore terminal on panic
    pub fn setup_terminal(stdout: &mut Stdout) -> std::io::Result<()> {
        terminal::enable_raw_mode()?;
        App::set_panic_hook();
        queue!(
            stdout,
            terminal::EnterAlternateScreen,
            terminal::Clear(ClearType::All),
            cursor::Hide,
            cursor::MoveTo(0, 0)
        )?;
        stdout.flush()?;
        Ok(())
    }

    /// Restore terminal to original state
    /// Leave alternate screen and disable raw mode
    pub fn restore_terminal(stdout: &mut Stdout) -> std::io::Result<()> {
        queue!(stdout, terminal::LeaveAlternateScreen, cursor::Show)?;
        stdout.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Speed up or slow down by a factor of two, within bounds.
    fn adjust_speed(&mut self, faster: bool) {
        self.frame_interval = if faster {
            self.frame_interval / 2
        } else {
            self.frame_interval * 2
        }
        .clamp(MIN_FRAME_INTERVAL, MAX_FRAME_INTERVAL);
        tracing::debug!("[app] frame interval now {:?}", self.frame_interval);
    }

    /// Main application loop: forwards key presses to the controller and ticks animated
    /// passes once per frame interval.
    pub fn run<R: Rng>(
        &mut self,
        mut controller: Controller<R>,
        stdout: &mut Stdout,
    ) -> std::io::Result<()> {
        let (rows, cols) = (controller.config().rows, controller.config().cols);
        if !App::check_size(stdout, rows, cols)? {
            App::wait_for_esc()?;
            return Ok(());
        }

        let should_stop = Arc::new(AtomicBool::new(false));
        let (user_input_event_tx, user_input_event_rx) =
            std::sync::mpsc::channel::<UserInputEvent>();
        let should_stop_for_input = should_stop.clone();
        let input_thread_handle = std::thread::spawn(move || -> std::io::Result<()> {
            listen_to_user_input(
                user_input_event_tx,
                USER_INPUT_EVENT_POLL_TIMEOUT,
                &should_stop_for_input,
            )
        });

        let mut renderer = TerminalRenderer::new(std::io::stdout());
        if self.instant_start {
            controller.handle(InputEvent::RequestReset { animated: false }, &mut renderer)?;
        } else {
            controller.redraw(&mut renderer)?;
        }

        tracing::info!("[app] started main loop with {}x{} maze", rows, cols);
        let mut last_tick = Instant::now();
        // Cleared while the terminal is too small; nothing is drawn until it fits again
        let mut size_ok = true;
        let result = loop {
            let timeout = self.frame_interval.saturating_sub(last_tick.elapsed());
            match user_input_event_rx.recv_timeout(timeout) {
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    // Input thread has exited
                    break Ok(());
                }
                Ok(UserInputEvent::Resize) => {
                    renderer.invalidate();
                    match App::check_size(stdout, rows, cols) {
                        Ok(fits) => size_ok = fits,
                        Err(e) => break Err(e),
                    }
                    if !size_ok {
                        tracing::warn!("[app] terminal too small, pausing");
                    } else if let Err(e) = controller.redraw(&mut renderer) {
                        break Err(e);
                    }
                }
                Ok(UserInputEvent::KeyPress(key)) => match map_key(key) {
                    Some(action) if !size_ok && !action.runs_while_too_small() => {
                        tracing::debug!("[app] {:?} ignored, terminal too small", action);
                    }
                    Some(UserAction::Quit) => {
                        tracing::debug!("[app] quit requested");
                        break Ok(());
                    }
                    Some(UserAction::SpeedUp) => self.adjust_speed(true),
                    Some(UserAction::SlowDown) => self.adjust_speed(false),
                    Some(UserAction::Input(event)) => {
                        tracing::debug!("[app] {:?}", event);
                        if let Err(e) = controller.handle(event, &mut renderer) {
                            break Err(e);
                        }
                    }
                    None => {}
                },
            }

            if last_tick.elapsed() >= self.frame_interval {
                last_tick = Instant::now();
                if size_ok && let Err(e) = controller.tick(&mut renderer) {
                    break Err(e);
                }
            }
        };

        // Tell the input thread to stop and wait for it
        should_stop.store(true, Ordering::Release);
        drop(user_input_event_rx);
        match input_thread_handle.join() {
            Ok(input_result) => input_result?,
            Err(_) => tracing::error!("[app] input thread panicked"),
        }
        tracing::info!("[app] exiting main loop");
        result
    }

    /// Check if the terminal is large enough for the maze.
    /// If not, display a message and return Ok(false)
    fn check_size(stdout: &mut Stdout, rows: usize, cols: usize) -> std::io::Result<bool> {
        let (need_width, need_height) = required_size(rows, cols);
        let (term_width, term_height) = terminal::size()?;
        if !fits_terminal((term_width, term_height), rows, cols) {
            let msg = format!(
                "Terminal size is too small ({}x{}) for a {}x{} maze, which needs {}x{}. Please resize the terminal.\r\n",
                term_width, term_height, rows, cols, need_width, need_height
            );
            queue!(
                stdout,
                terminal::Clear(ClearType::All),
                cursor::MoveTo(0, 0),
                style::PrintStyledContent(msg.with(Color::Yellow).attribute(Attribute::Bold)),
                style::PrintStyledContent(
                    "Press Esc to exit...\r\n"
                        .with(Color::Blue)
                        .attribute(Attribute::Bold)
                )
            )?;
            stdout.flush()?;
            return Ok(false);
        }
        Ok(true)
    }

    /// Wait for the user to press the Esc key
    /// This function blocks until Esc is pressed
    fn wait_for_esc() -> std::io::Result<()> {
        loop {
            if let event::Event::Key(KeyEvent { code, kind, .. }) = event::read()?
                && code == KeyCode::Esc
                && kind == event::KeyEventKind::Press
            {
                break;
            }
        }
        Ok(())
    }
}

/// Whether a terminal of `(columns, rows)` can show the maze and the lines below it.
fn fits_terminal(size: (u16, u16), rows: usize, cols: usize) -> bool {
    let (need_width, need_height) = required_size(rows, cols);
    size.0 as usize >= need_width && size.1 as usize >= need_height
}

/// Listen for user input events (key presses and resize)
/// This function runs in a separate thread, and is the only place where user input is read
fn listen_to_user_input(
    user_input_event_tx: Sender<UserInputEvent>,
    event_poll_timeout: Duration,
    should_stop: &AtomicBool,
) -> std::io::Result<()> {
    loop {
        // Check if we should stop
        if should_stop.load(Ordering::Acquire) {
            return Ok(());
        }

        // Poll for events with a timeout
        if !event::poll(event_poll_timeout)? {
            // No event available, continue loop to check flags again
            continue;
        }

        // We only care about key presses and resizes
        let input_event = match event::read()? {
            event::Event::Key(key_event) if key_event.kind == event::KeyEventKind::Press => {
                UserInputEvent::KeyPress(key_event)
            }
            event::Event::Resize(_, _) => UserInputEvent::Resize,
            _ => continue, // Ignore other events
        };

        // Should exit input thread on quit keys
        let should_exit = matches!(
            &input_event,
            UserInputEvent::KeyPress(key) if map_key(*key) == Some(UserAction::Quit)
        );

        // Send the input event to the main thread
        if user_input_event_tx.send(input_event).is_err() {
            // Receiver has been dropped, exit the thread
            return Ok(());
        }

        if should_exit {
            tracing::debug!("[input loop] quit key pressed, exiting");
            return Ok(());
        }
    }
}
