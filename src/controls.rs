//! On-screen buttons for playing with just a mouse
use crate::game::Direction;
use crate::input::Action;
use crate::theme::{Element, Theme};
use ratatui::{
    buffer::Buffer,
    layout::{Position, Rect},
    text::Span,
    widgets::Widget,
};

/// Row of clickable buttons shown under the board, wrapping onto as many
/// lines as its area has
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct ControlBar {
    /// Whether the game is currently being played, deciding between a "Play"
    /// and a "Pause" button
    pub(crate) playing: bool,
    pub(crate) theme: Theme,
}

impl ControlBar {
    fn labels(self) -> [(&'static str, Action); 12] {
        [
            ("▲", Action::Turn(Direction::North)),
            ("◀", Action::Turn(Direction::West)),
            ("▼", Action::Turn(Direction::South)),
            ("▶", Action::Turn(Direction::East)),
            (
                if self.playing { "Pause" } else { "Play" },
                Action::TogglePause,
            ),
            ("Restart", Action::Reset),
            ("Mode", Action::CycleMode),
            ("Grid", Action::ToggleGrid),
            ("Theme", Action::CycleTheme),
            ("Sound", Action::ToggleSound),
            ("Haptic", Action::ToggleHaptic),
            ("Clear", Action::ClearScores),
        ]
    }

    /// Lay out the buttons within `area`, left to right and then top to
    /// bottom.  Buttons that don't fit are left out.
    pub(crate) fn buttons(self, area: Rect) -> Vec<Button> {
        let mut buttons = Vec::new();
        let mut x = area.x;
        let mut y = area.y;
        for (label, action) in self.labels() {
            let width = u16::try_from(label.chars().count())
                .unwrap_or(u16::MAX)
                .saturating_add(2);
            if x > area.x && x.saturating_add(width) > area.right() {
                x = area.x;
                y = y.saturating_add(1);
            }
            if y >= area.bottom() || x.saturating_add(width) > area.right() {
                break;
            }
            buttons.push(Button {
                area: Rect::new(x, y, width, 1),
                label,
                action,
            });
            x = x.saturating_add(width).saturating_add(1);
        }
        buttons
    }

    /// Return the action of the button at `pos`, if any
    pub(crate) fn hit(self, area: Rect, pos: Position) -> Option<Action> {
        self.buttons(area)
            .into_iter()
            .find(|b| b.area.contains(pos))
            .map(|b| b.action)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Button {
    pub(crate) area: Rect,
    pub(crate) label: &'static str,
    pub(crate) action: Action,
}

impl Widget for ControlBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let style = self.theme.palette()[Element::Button];
        for button in self.buttons(area) {
            Span::styled(format!(" {} ", button.label), style).render(button.area, buf);
        }
    }
}
