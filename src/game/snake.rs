use crate::consts;
use ratatui::layout::Position;
use std::collections::VecDeque;

/// The cells making up the snake
///
/// Cells are stored tail-first, so the head is always the most recently
/// appended cell.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Snake {
    cells: VecDeque<Position>,
}

impl Snake {
    /// Create a snake of length [`INITIAL_SNAKE_LENGTH`][consts::INITIAL_SNAKE_LENGTH]
    /// lying horizontally with its middle cell on `center` and its head on
    /// the east end
    pub(super) fn new(center: Position) -> Snake {
        let half = consts::INITIAL_SNAKE_LENGTH / 2;
        let start = center.x.saturating_sub(half);
        let cells = (0..consts::INITIAL_SNAKE_LENGTH)
            .map(|i| Position::new(start + i, center.y))
            .collect();
        Snake { cells }
    }

    /// Build a snake from its cells, tail first.  Returns `None` if `cells`
    /// is empty.
    #[cfg(test)]
    pub(super) fn from_cells<I: IntoIterator<Item = Position>>(cells: I) -> Option<Snake> {
        let cells = cells.into_iter().collect::<VecDeque<_>>();
        (!cells.is_empty()).then_some(Snake { cells })
    }

    /// Return the position of the snake's head
    pub(crate) fn head(&self) -> Position {
        *self
            .cells
            .back()
            .expect("snake should always have at least one cell")
    }

    /// Return the cells of the snake, tail first
    pub(crate) fn cells(&self) -> &VecDeque<Position> {
        &self.cells
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.cells.len()
    }

    /// Test whether any part of the snake is on `pos`
    pub(crate) fn occupies(&self, pos: Position) -> bool {
        self.cells.contains(&pos)
    }

    /// Move the head onto `new_head`.  Unless the snake `grew`, the tail cell
    /// is vacated, keeping the length unchanged.
    pub(super) fn advance(&mut self, new_head: Position, grew: bool) {
        self.cells.push_back(new_head);
        if !grew {
            let _ = self.cells.pop_front();
        }
    }
}
