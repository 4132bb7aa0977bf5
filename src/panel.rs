use crate::consts;
use crate::game::{Game, RunState};
use crate::settings::{SettingKey, SettingValue, Settings};
use crate::theme::Element;
use ratatui::{
    buffer::Buffer,
    layout::{Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Widget},
};
use std::fmt;

/// Side panel showing the score badges above the settings menu
#[derive(Clone, Copy, Debug)]
pub(crate) struct Panel<'a, R> {
    game: &'a Game<R>,
    settings: &'a Settings,
    selection: Option<SettingKey>,
}

impl<'a, R> Panel<'a, R> {
    const BADGES_HEIGHT: u16 = 8;
    const LABEL_WIDTH: usize = 8;
    const VALUE_WIDTH: usize = 18;
    const POINTER_WIDTH: u16 = 2;
    const LABEL_VALUE_GUTTER: u16 = 2;

    pub(crate) fn new(
        game: &'a Game<R>,
        settings: &'a Settings,
        selection: Option<SettingKey>,
    ) -> Self {
        Panel {
            game,
            settings,
            selection,
        }
    }

    fn badge<T: fmt::Display>(label: &str, value: T, style: Style) -> Line<'static> {
        Line::from_iter([
            Span::raw(format!("{label:<width$}", width = Self::LABEL_WIDTH)),
            Span::styled(format!("{value:>width$}", width = Self::VALUE_WIDTH), style),
        ])
    }

    fn badges(&self) -> Vec<Line<'static>> {
        let style = self.settings.theme.palette()[Element::Badge];
        let state = self.game.state();
        let mut lines = vec![
            Self::badge("Score", self.game.score(), style),
            Self::badge("Best", self.game.best(), style),
            Self::badge("Mode", self.game.rules().mode, style),
            Self::badge("Speed", self.game.speed(), style),
            Self::badge("Status", state, style),
        ];
        if let RunState::GameOver(crash) = state {
            lines.push(Self::badge("Cause", crash.cause, style));
        }
        lines
    }
}

impl<R> Widget for Panel<'_, R> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [badges_area, settings_area] =
            Layout::vertical([Self::BADGES_HEIGHT, consts::PANEL_HEIGHT - Self::BADGES_HEIGHT])
                .areas(area);

        let block = Block::bordered().title(" Snakex ");
        let inner = block.inner(badges_area);
        block.render(badges_area, buf);
        for (line, row) in self.badges().into_iter().zip(inner.rows()) {
            line.render(row, buf);
        }

        let block = Block::bordered().title(" Settings ");
        let inner = block.inner(settings_area);
        block.render(settings_area, buf);
        for ((key, value), row) in SettingKey::iter()
            .map(|key| (key, self.settings.get(key)))
            .zip(inner.rows())
        {
            let selected = Some(key) == self.selection;
            let style = if selected {
                consts::MENU_SELECTION_STYLE
            } else {
                Style::new()
            };
            let s = format!(
                "{pointer:pwidth$}{key:lwidth$}{space:gutter$}{value:vwidth$}",
                pointer = if selected { "»" } else { "" },
                pwidth = usize::from(Self::POINTER_WIDTH),
                lwidth = usize::from(SettingKey::DISPLAY_WIDTH),
                space = "",
                gutter = usize::from(Self::LABEL_VALUE_GUTTER),
                vwidth = usize::from(SettingValue::DISPLAY_WIDTH),
            );
            Span::styled(s, style).render(row, buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Rules;
    use crate::highscores::MemoryStore;
    use crate::theme::Theme;
    use pretty_assertions::assert_eq;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;
    use ratatui::style::{Color, Modifier};

    fn game() -> Game<ChaCha12Rng> {
        Game::new_with_rng(
            Rules::default(),
            Box::new(MemoryStore::default()),
            ChaCha12Rng::seed_from_u64(0x0123456789ABCDEF),
        )
    }

    fn render(panel: Panel<'_, ChaCha12Rng>) -> Buffer {
        let area = Rect::new(0, 0, consts::PANEL_WIDTH, consts::PANEL_HEIGHT);
        let mut buffer = Buffer::empty(area);
        panel.render(area, &mut buffer);
        buffer
    }

    #[test]
    fn panel_width_fits() {
        assert_eq!(
            Panel::<'_, ChaCha12Rng>::POINTER_WIDTH
                + SettingKey::DISPLAY_WIDTH
                + Panel::<'_, ChaCha12Rng>::LABEL_VALUE_GUTTER
                + SettingValue::DISPLAY_WIDTH
                + 2,
            consts::PANEL_WIDTH
        );
    }

    #[test]
    fn draw_initial() {
        let game = game();
        let settings = Settings::default();
        let buffer = render(Panel::new(&game, &settings, None));
        let mut expected = Buffer::with_lines([
            "┌ Snakex ──────────────────┐",
            "│Score                    0│",
            "│Best                     0│",
            "│Mode               Classic│",
            "│Speed                   10│",
            "│Status               Ready│",
            "│                          │",
            "└──────────────────────────┘",
            "┌ Settings ────────────────┐",
            "│  Grid Size   ◀  24×24   ▶│",
            "│  Speed       ◀    10    ▶│",
            "│  Obstacles   ◀    8%    ▶│",
            "│  Mode        ◀ Classic  ▶│",
            "│  Sound           [✓]     │",
            "│  Haptic          [✓]     │",
            "│  Grid Lines      [✓]     │",
            "└──────────────────────────┘",
        ]);
        expected.set_style(
            Rect::new(9, 1, 18, 5),
            Style::new().add_modifier(Modifier::BOLD),
        );
        assert_eq!(buffer, expected);
    }

    #[test]
    fn selected_setting() {
        let game = game();
        let settings = Settings::default();
        let buffer = render(Panel::new(&game, &settings, Some(SettingKey::Speed)));
        let row = (0..consts::PANEL_WIDTH)
            .map(|x| buffer[(x, 10)].symbol())
            .collect::<String>();
        assert_eq!(row, "│» Speed       ◀    10    ▶│");
        assert!(buffer[(1, 10)].modifier.contains(Modifier::UNDERLINED));
        assert!(!buffer[(1, 9)].modifier.contains(Modifier::UNDERLINED));
    }

    #[test]
    fn badge_colours_follow_theme() {
        let game = game();
        let mut settings = Settings::default();
        let buffer = render(Panel::new(&game, &settings, None));
        assert_eq!(buffer[(26, 1)].fg, Color::Reset);
        settings.theme = Theme::Neon;
        let buffer = render(Panel::new(&game, &settings, None));
        assert_eq!(buffer[(26, 1)].fg, Color::LightCyan);
        assert_eq!(buffer[(1, 1)].fg, Color::Reset);
        settings.theme = Theme::Retro;
        let buffer = render(Panel::new(&game, &settings, None));
        assert_eq!(buffer[(26, 5)].fg, Color::Rgb(255, 176, 0));
    }

    #[test]
    fn game_over_shows_cause() {
        let mut game = game();
        game.start();
        for _ in 0..30 {
            game.tick(std::time::Instant::now());
        }
        let buffer = render(Panel::new(&game, &Settings::default(), None));
        let row = |y| {
            (0..consts::PANEL_WIDTH)
                .map(|x| buffer[(x, y)].symbol())
                .collect::<String>()
        };
        assert_eq!(row(5), "│Status           Game Over│");
        assert_eq!(row(6), "│Cause         Hit the wall│");
    }
}
