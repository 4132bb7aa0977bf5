use super::grid::Bounds;
use ratatui::layout::Position;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// Return the cell one step from `pos` in this direction, or `None` if
    /// that step leaves a non-wraparound `bounds`
    pub(super) fn advance(self, pos: Position, bounds: Bounds) -> Option<Position> {
        let Position { mut x, mut y } = pos;
        match self {
            Direction::North => {
                y = decrement_in_bounds(y, bounds.size, bounds.wrap)?;
            }
            Direction::East => {
                x = increment_in_bounds(x, bounds.size, bounds.wrap)?;
            }
            Direction::South => {
                y = increment_in_bounds(y, bounds.size, bounds.wrap)?;
            }
            Direction::West => {
                x = decrement_in_bounds(x, bounds.size, bounds.wrap)?;
            }
        }
        Some(Position { x, y })
    }

    pub(crate) fn reverse(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }
}

fn decrement_in_bounds(x: u16, size: u16, wrap: bool) -> Option<u16> {
    if let Some(x2) = x.checked_sub(1) {
        Some(x2)
    } else if wrap {
        Some(size - 1)
    } else {
        None
    }
}

fn increment_in_bounds(x: u16, size: u16, wrap: bool) -> Option<u16> {
    if let Some(x2) = x.checked_add(1).filter(|&xx| xx < size) {
        Some(x2)
    } else if wrap {
        Some(0)
    } else {
        None
    }
}

/// The direction the snake is travelling in, plus at most one buffered turn
/// waiting for the next tick.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) struct Steering {
    committed: Direction,
    pending: Option<Direction>,
}

impl Steering {
    pub(super) fn new(direction: Direction) -> Steering {
        Steering {
            committed: direction,
            pending: None,
        }
    }

    /// The direction applied on the most recent tick
    #[cfg(test)]
    pub(super) fn committed(&self) -> Direction {
        self.committed
    }

    #[cfg(test)]
    pub(super) fn pending(&self) -> Option<Direction> {
        self.pending
    }

    /// Buffer a turn.  A request for the exact reverse of the committed
    /// direction is ignored and leaves any earlier request in place; anything
    /// else replaces the pending turn.  Returns whether the request was
    /// accepted.
    pub(super) fn request(&mut self, direction: Direction) -> bool {
        if direction == self.committed.reverse() {
            return false;
        }
        self.pending = Some(direction);
        true
    }

    /// Direction to use for the upcoming tick.  The pending turn, if any, is
    /// not consumed until [`Steering::commit()`] is called.
    pub(super) fn upcoming(&self) -> Direction {
        self.pending.unwrap_or(self.committed)
    }

    /// Apply the pending turn (if any) and return the direction for this tick
    pub(super) fn commit(&mut self) -> Direction {
        if let Some(d) = self.pending.take() {
            self.committed = d;
        }
        self.committed
    }
}
