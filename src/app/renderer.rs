use std::io::Write;

use crossterm::{
    QueueableCommand, cursor, queue,
    style::{self, Attribute, Color, StyledContent, Stylize},
    terminal::{self, ClearType},
};

use crate::{
    app::grid::{Grid, GridCell},
    controller::{Notification, Renderer},
    maze::Maze,
    player::Player,
};

/// Number of terminal rows reserved below the maze: one status line, one help line.
pub const NUM_LOG_ROWS: u16 = 2;

const HELP: &str = "←/→/↑/↓ move  s solve  n/N new maze  r/R reset  +/- speed  Esc quit";

/// Terminal size `(columns, rows)` needed to show a maze with the given dimensions.
pub fn required_size(rows: usize, cols: usize) -> (usize, usize) {
    (
        (cols * 2 + 1) * GridCell::CELL_WIDTH as usize,
        rows * 2 + 1 + NUM_LOG_ROWS as usize,
    )
}

/// Draws the maze to a terminal, repainting only the raster cells that changed since the
/// previous frame.
pub struct TerminalRenderer<W: Write> {
    out: W,
    /// Last frame painted. `None` forces a full repaint.
    previous: Option<Grid>,
    /// Last status message, repainted after a full clear.
    last_status: Option<StyledContent<String>>,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            previous: None,
            last_status: None,
        }
    }

    /// Forget the last frame so the next draw repaints everything.
    pub fn invalidate(&mut self) {
        self.previous = None;
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn grid_height(&self) -> u16 {
        self.previous.as_ref().map_or(0, |g| g.height() as u16)
    }

    /// Replace the status line below the maze.
    fn status(&mut self, msg: StyledContent<String>) -> std::io::Result<()> {
        let row = self.grid_height();
        queue!(
            self.out,
            cursor::MoveTo(0, row),
            terminal::Clear(ClearType::CurrentLine),
            style::PrintStyledContent(msg.clone())
        )?;
        self.last_status = Some(msg);
        self.out.flush()
    }

    fn repaint_all(&mut self, grid: &Grid) -> std::io::Result<()> {
        queue!(
            self.out,
            terminal::Clear(ClearType::All),
            cursor::MoveTo(0, 0)
        )?;
        for y in 0..grid.height() {
            for x in 0..grid.width() {
                self.out.queue(style::Print(grid[(x, y)]))?;
            }
            self.out.queue(style::Print("\r\n"))?;
        }
        queue!(
            self.out,
            cursor::MoveTo(0, grid.height() as u16 + 1),
            style::PrintStyledContent(HELP.with(Color::Cyan))
        )?;
        if let Some(msg) = &self.last_status {
            queue!(
                self.out,
                cursor::MoveTo(0, grid.height() as u16),
                style::PrintStyledContent(msg.clone())
            )?;
        }
        Ok(())
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn draw(&mut self, maze: &Maze, player: &Player) -> std::io::Result<()> {
        let grid = Grid::from_maze(maze, player);
        let same_size = self
            .previous
            .as_ref()
            .is_some_and(|p| p.width() == grid.width() && p.height() == grid.height());
        if same_size {
            for ((x, y), cell) in grid.changes(self.previous.as_ref()) {
                queue!(
                    self.out,
                    cursor::MoveTo(x as u16 * GridCell::CELL_WIDTH, y as u16),
                    style::Print(cell)
                )?;
            }
        } else {
            self.repaint_all(&grid)?;
        }
        self.out.flush()?;
        self.previous = Some(grid);
        Ok(())
    }

    fn notify(&mut self, notification: Notification) -> std::io::Result<()> {
        let msg = match notification {
            Notification::Generated => "Maze ready. Walk it, or press s to solve."
                .to_string()
                .with(Color::Green),
            Notification::Solved { length } => format!("Path found: {} cells.", length)
                .with(Color::Blue)
                .attribute(Attribute::Bold),
            Notification::NoPath => "No path found.".to_string().with(Color::Red),
            Notification::Won => "You reached the exit! Press n for a new maze."
                .to_string()
                .with(Color::Green)
                .attribute(Attribute::Bold),
        };
        self.status(msg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::Direction;

    #[test]
    fn test_required_size() {
        assert_eq!(required_size(20, 20), (82, 43));
        assert_eq!(required_size(1, 3), (14, 5));
    }

    #[test]
    fn test_first_draw_repaints_everything() {
        let maze = Maze::new(2, 2).unwrap();
        let player = Player::at_entrance(&maze);
        let mut renderer = TerminalRenderer::new(Vec::new());
        renderer.draw(&maze, &player).unwrap();
        let out = String::from_utf8(renderer.into_inner()).unwrap();
        assert_eq!(out.matches('⬜').count(), 21);
        assert!(out.contains(HELP));
    }

    #[test]
    fn test_unchanged_frame_writes_nothing() {
        let maze = Maze::new(3, 3).unwrap();
        let player = Player::at_entrance(&maze);
        let mut renderer = TerminalRenderer::new(Vec::new());
        renderer.draw(&maze, &player).unwrap();
        let painted = renderer.out.len();
        renderer.draw(&maze, &player).unwrap();
        assert_eq!(renderer.out.len(), painted);
    }

    #[test]
    fn test_changed_cell_is_repainted_alone() {
        let mut maze = Maze::new(3, 3).unwrap();
        let player = Player::at_entrance(&maze);
        let mut renderer = TerminalRenderer::new(Vec::new());
        renderer.draw(&maze, &player).unwrap();
        let painted = renderer.out.len();

        maze.open_wall((1, 1), Direction::Right);
        renderer.draw(&maze, &player).unwrap();
        let delta = String::from_utf8(renderer.out[painted..].to_vec()).unwrap();
        assert!(!delta.contains('⬜'));
        assert!(!delta.contains(HELP));
        assert!(!delta.is_empty());
    }

    #[test]
    fn test_invalidate_forces_full_repaint() {
        let maze = Maze::new(2, 2).unwrap();
        let player = Player::at_entrance(&maze);
        let mut renderer = TerminalRenderer::new(Vec::new());
        renderer.draw(&maze, &player).unwrap();
        let painted = renderer.out.len();
        renderer.invalidate();
        renderer.draw(&maze, &player).unwrap();
        assert_eq!(renderer.out.len(), painted * 2);
    }

    #[test]
    fn test_full_repaint_keeps_status_line() {
        let maze = Maze::new(2, 2).unwrap();
        let player = Player::at_entrance(&maze);
        let mut renderer = TerminalRenderer::new(Vec::new());
        renderer.draw(&maze, &player).unwrap();
        renderer.notify(Notification::NoPath).unwrap();
        let before_repaint = renderer.out.len();

        renderer.invalidate();
        renderer.draw(&maze, &player).unwrap();
        let repaint = String::from_utf8(renderer.out[before_repaint..].to_vec()).unwrap();
        assert!(repaint.contains(HELP));
        assert!(repaint.contains("No path found."));

        // A newer message replaces the remembered one
        renderer.notify(Notification::Generated).unwrap();
        let before_repaint = renderer.out.len();
        renderer.invalidate();
        renderer.draw(&maze, &player).unwrap();
        let repaint = String::from_utf8(renderer.out[before_repaint..].to_vec()).unwrap();
        assert!(repaint.contains("Maze ready."));
        assert!(!repaint.contains("No path found."));
    }

    #[test]
    fn test_notification_lands_on_status_line() {
        let maze = Maze::new(2, 2).unwrap();
        let player = Player::at_entrance(&maze);
        let mut renderer = TerminalRenderer::new(Vec::new());
        renderer.draw(&maze, &player).unwrap();
        let painted = renderer.out.len();
        renderer.notify(Notification::Won).unwrap();
        let status = String::from_utf8(renderer.out[painted..].to_vec()).unwrap();
        assert!(status.contains("You reached the exit!"));
    }
}
