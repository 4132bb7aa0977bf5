use crate::consts;
use crate::game::Direction;
use crate::settings::Adjustment;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::Position;

/// Something the player asked for, by whatever means
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Action {
    Turn(Direction),
    TogglePause,
    Pause,
    Reset,
    ToggleGrid,
    ObstaclesMode,
    /// Switch between wrap & classic mode
    ToggleWrap,
    CycleMode,
    CycleTheme,
    ToggleSound,
    ToggleHaptic,
    ClearScores,
    NextSetting,
    PrevSetting,
    Adjust(Adjustment),
    Quit,
}

impl Action {
    pub(crate) fn from_key_event(ev: KeyEvent) -> Option<Action> {
        if (ev.modifiers, ev.code) == (KeyModifiers::CONTROL, KeyCode::Char('c')) {
            return Some(Action::Quit);
        }
        let normal_modifiers = KeyModifiers::NONE | KeyModifiers::SHIFT;
        if !normal_modifiers.contains(ev.modifiers) {
            return None;
        }
        match ev.code {
            KeyCode::Up | KeyCode::Char('w') => Some(Action::Turn(Direction::North)),
            KeyCode::Down | KeyCode::Char('s') => Some(Action::Turn(Direction::South)),
            KeyCode::Left | KeyCode::Char('a') => Some(Action::Turn(Direction::West)),
            KeyCode::Right | KeyCode::Char('d') => Some(Action::Turn(Direction::East)),
            KeyCode::Char(' ' | 'p' | 'P') => Some(Action::TogglePause),
            KeyCode::Esc => Some(Action::Pause),
            KeyCode::Char('r' | 'R') => Some(Action::Reset),
            KeyCode::Char('g' | 'G') => Some(Action::ToggleGrid),
            KeyCode::Char('o' | 'O') => Some(Action::ObstaclesMode),
            KeyCode::Char('W') => Some(Action::ToggleWrap),
            KeyCode::Char('m' | 'M') => Some(Action::CycleMode),
            KeyCode::Char('t' | 'T') => Some(Action::CycleTheme),
            KeyCode::Char('b' | 'B') => Some(Action::ToggleSound),
            KeyCode::Char('v' | 'V') => Some(Action::ToggleHaptic),
            KeyCode::Char('C') => Some(Action::ClearScores),
            KeyCode::Tab => Some(Action::NextSetting),
            KeyCode::BackTab => Some(Action::PrevSetting),
            KeyCode::Char(']' | '+' | '=') => Some(Action::Adjust(Adjustment::Increase)),
            KeyCode::Char('[' | '-') => Some(Action::Adjust(Adjustment::Decrease)),
            KeyCode::Enter => Some(Action::Adjust(Adjustment::Toggle)),
            KeyCode::Char('q' | 'Q') => Some(Action::Quit),
            _ => None,
        }
    }
}

/// Tracks a mouse drag across the board and turns it into a single turn
/// once it has travelled far enough.
///
/// Terminal cells are about twice as tall as they are wide, so vertical
/// travel counts double.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct Swipe {
    start: Option<Position>,
}

impl Swipe {
    pub(crate) fn begin(&mut self, pos: Position) {
        self.start = Some(pos);
    }

    /// Report the pointer at `pos`.  Once the drag passes
    /// [`SWIPE_THRESHOLD`][consts::SWIPE_THRESHOLD], the gesture ends and the
    /// direction of its dominant axis is returned.
    pub(crate) fn drag(&mut self, pos: Position) -> Option<Direction> {
        let start = self.start?;
        let dx = i64::from(pos.x) - i64::from(start.x);
        let dy = (i64::from(pos.y) - i64::from(start.y)) * 2;
        let threshold = i64::from(consts::SWIPE_THRESHOLD);
        if dx * dx + dy * dy <= threshold * threshold {
            return None;
        }
        self.start = None;
        let direction = if dx.abs() > dy.abs() {
            if dx > 0 {
                Direction::East
            } else {
                Direction::West
            }
        } else if dy > 0 {
            Direction::South
        } else {
            Direction::North
        };
        Some(direction)
    }

    pub(crate) fn end(&mut self) {
        self.start = None;
    }
}
