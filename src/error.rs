use thiserror::Error;

use crate::maze::Coord;

/// Errors raised by the grid model.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MazeError {
    /// A maze needs at least one row and one column.
    #[error("invalid maze dimensions {rows}x{cols}: rows and cols must be positive")]
    InvalidDimension { rows: usize, cols: usize },
    /// Walls can only be removed between cells exactly one step apart on one axis.
    #[error("cells {a:?} and {b:?} are not adjacent")]
    NotAdjacent { a: Coord, b: Coord },
}
