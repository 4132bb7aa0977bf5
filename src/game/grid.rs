use super::direction::Direction;
use crate::consts;
use enum_map::Enum;
use ratatui::layout::{Position, Positions, Rect, Size};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ruleset variant deciding what happens at the edge of the board
#[derive(Clone, Copy, Debug, Default, Deserialize, Enum, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum GameMode {
    /// Leaving the board is fatal
    #[default]
    Classic,

    /// The board is a torus: leaving one edge enters at the opposite edge
    Wrap,

    /// As `Classic`, plus randomly-placed obstacles
    Obstacles,
}

impl GameMode {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            GameMode::Classic => "classic",
            GameMode::Wrap => "wrap",
            GameMode::Obstacles => "obstacles",
        }
    }

    /// The next mode in declaration order, looping around after the last
    pub(crate) fn cycle(self) -> GameMode {
        GameMode::from_usize((self.into_usize() + 1) % GameMode::LENGTH)
    }

    /// The previous mode in declaration order, looping around before the first
    pub(crate) fn cycle_back(self) -> GameMode {
        GameMode::from_usize((self.into_usize() + GameMode::LENGTH - 1) % GameMode::LENGTH)
    }

    pub(crate) fn has_obstacles(self) -> bool {
        self == GameMode::Obstacles
    }

    pub(super) fn bounds(self, size: GridSize) -> Bounds {
        Bounds {
            size: size.get(),
            wrap: self == GameMode::Wrap,
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GameMode::Classic => "Classic",
            GameMode::Wrap => "Wrap",
            GameMode::Obstacles => "Obstacles",
        };
        f.pad(name)
    }
}

impl std::str::FromStr for GameMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<GameMode, ParseModeError> {
        match s.to_ascii_lowercase().as_str() {
            "classic" => Ok(GameMode::Classic),
            "wrap" => Ok(GameMode::Wrap),
            "obstacles" => Ok(GameMode::Obstacles),
            _ => Err(ParseModeError),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
#[error("invalid game mode; expected \"classic\", \"wrap\", or \"obstacles\"")]
pub(crate) struct ParseModeError;

/// Side length of the (square) board, in cells
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(try_from = "u16", into = "u16")]
pub(crate) struct GridSize(u16);

impl GridSize {
    pub(crate) const MINIMUM: GridSize = GridSize(consts::MIN_GRID_SIZE);
    pub(crate) const MAXIMUM: GridSize = GridSize(consts::MAX_GRID_SIZE);

    /// Returns `None` if `size` is outside the permitted range
    pub(crate) fn new(size: u16) -> Option<GridSize> {
        (consts::MIN_GRID_SIZE..=consts::MAX_GRID_SIZE)
            .contains(&size)
            .then_some(GridSize(size))
    }

    /// Like [`GridSize::new()`], but out-of-range values are pulled to the
    /// nearest permitted size
    pub(crate) fn clamped(size: u16) -> GridSize {
        GridSize(size.clamp(consts::MIN_GRID_SIZE, consts::MAX_GRID_SIZE))
    }

    pub(crate) fn get(self) -> u16 {
        self.0
    }
}

impl Default for GridSize {
    fn default() -> GridSize {
        GridSize(consts::DEFAULT_GRID_SIZE)
    }
}

impl TryFrom<u16> for GridSize {
    type Error = OutOfRange;

    fn try_from(value: u16) -> Result<GridSize, OutOfRange> {
        GridSize::new(value).ok_or(OutOfRange {
            what: "grid size",
            min: consts::MIN_GRID_SIZE,
            max: consts::MAX_GRID_SIZE,
        })
    }
}

impl From<GridSize> for u16 {
    fn from(value: GridSize) -> u16 {
        value.0
    }
}

impl fmt::Display for GridSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&format!("{0}×{0}", self.0))
    }
}

/// Error for a numeric setting outside its permitted range
#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
#[error("{what} must be between {min} and {max}")]
pub(crate) struct OutOfRange {
    pub(crate) what: &'static str,
    pub(crate) min: u16,
    pub(crate) max: u16,
}

/// The board's extent together with its edge policy.  Computing where a move
/// lands is a pure function of the position, the direction, and this value;
/// see [`Bounds::step()`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Bounds {
    pub(super) size: u16,
    pub(super) wrap: bool,
}

impl Bounds {
    /// Where a head at `pos` ends up after moving one cell in `direction`:
    /// `None` means the snake left a non-wraparound board.
    pub(super) fn step(self, pos: Position, direction: Direction) -> Option<Position> {
        direction.advance(pos, self)
    }

    pub(super) fn cells(self) -> usize {
        usize::from(self.size) * usize::from(self.size)
    }

    #[cfg(test)]
    pub(super) fn contains(self, pos: Position) -> bool {
        pos.x < self.size && pos.y < self.size
    }

    pub(super) fn positions(self) -> Positions {
        Rect::from((Position::ORIGIN, Size::new(self.size, self.size))).positions()
    }
}
