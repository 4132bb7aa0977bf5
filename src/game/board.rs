use super::{Game, GameMode, GridSize, RunState};
use crate::consts;
use crate::theme::{Element, Theme};
use crate::util::center_rect;
use ratatui::{
    buffer::Buffer,
    layout::{Margin, Position, Rect, Size},
    style::Style,
    text::Line,
    widgets::{Block, Clear, Widget},
};
use std::time::Instant;

/// Size of the board widget, border included, for a board of `grid_size`.
/// Every cell is two columns wide.
pub(crate) fn board_size(grid_size: GridSize) -> Size {
    let n = grid_size.get();
    Size::new(n.saturating_mul(2).saturating_add(2), n.saturating_add(2))
}

/// Widget drawing a snapshot of a [`Game`]
#[derive(Clone, Copy, Debug)]
pub(crate) struct Board<'a, R> {
    game: &'a Game<R>,
    now: Instant,
    show_grid: bool,
    flashing: bool,
    theme: Theme,
}

impl<'a, R> Board<'a, R> {
    pub(crate) fn new(game: &'a Game<R>, now: Instant) -> Self {
        Board {
            game,
            now,
            show_grid: false,
            flashing: false,
            theme: Theme::default(),
        }
    }

    /// Mark every empty cell with a faint dot
    pub(crate) fn show_grid(mut self, show_grid: bool) -> Self {
        self.show_grid = show_grid;
        self
    }

    /// Highlight the border
    pub(crate) fn flashing(mut self, flashing: bool) -> Self {
        self.flashing = flashing;
        self
    }

    pub(crate) fn theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    fn bonus_visible(&self) -> bool {
        let Some(bonus) = self.game.bonus() else {
            return false;
        };
        let remaining = bonus.remaining(self.now);
        remaining > consts::BONUS_BLINK_WINDOW
            || (remaining.as_millis() / consts::BONUS_BLINK_PERIOD.as_millis()) % 2 == 0
    }

    fn banner(&self) -> Option<&'static str> {
        match self.game.state() {
            RunState::Ready => Some("Press Space to start"),
            RunState::Playing => None,
            RunState::Paused => Some("Paused"),
            RunState::GameOver(_) => Some("Game over (r: reset)"),
        }
    }
}

impl<R> Widget for Board<'_, R> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let rules = self.game.rules();
        let palette = self.theme.palette();
        let border_style = if self.flashing {
            palette[Element::Flash]
        } else {
            Style::new()
        };
        let block_area = center_rect(area, board_size(rules.grid_size));
        if rules.mode == GameMode::Wrap {
            DottedBorder {
                style: border_style,
            }
            .render(block_area, buf);
        } else {
            Block::bordered()
                .border_style(border_style)
                .render(block_area, buf);
        }

        let board_area = block_area.inner(Margin::new(1, 1));
        let mut canvas = Canvas {
            area: board_area,
            buf,
        };
        if self.show_grid {
            for p in rules.bounds().positions() {
                canvas.draw_cell(p, consts::GRID_SYMBOL, palette[Element::Grid]);
            }
        }
        for &p in self.game.obstacles() {
            canvas.draw_cell(p, consts::OBSTACLE_SYMBOL, palette[Element::Obstacle]);
        }
        if let Some(food) = self.game.food() {
            canvas.draw_cell(food, consts::FOOD_SYMBOL, palette[Element::Food]);
        }
        if let Some(bonus) = self.game.bonus().filter(|_| self.bonus_visible()) {
            canvas.draw_cell(bonus.cell, consts::BONUS_SYMBOL, palette[Element::Bonus]);
        }
        let snake = self.game.snake();
        let head = snake.head();
        for &p in snake.cells().iter().rev().skip(1) {
            canvas.draw_cell(p, consts::SNAKE_BODY_SYMBOL, palette[Element::SnakeBody]);
        }
        // Draw the head last so that a collision overwrites whatever was hit
        if let RunState::GameOver(crash) = self.game.state() {
            if crash.cell != head {
                canvas.draw_cell(head, consts::SNAKE_HEAD_SYMBOL, palette[Element::SnakeHead]);
            }
            canvas.draw_cell(crash.cell, consts::COLLISION_SYMBOL, palette[Element::Collision]);
        } else {
            canvas.draw_cell(head, consts::SNAKE_HEAD_SYMBOL, palette[Element::SnakeHead]);
        }

        if let Some(msg) = self.banner() {
            let width = u16::try_from(msg.chars().count()).unwrap_or(u16::MAX);
            let row = Rect {
                y: board_area.y.saturating_add(board_area.height / 3),
                height: board_area.height.min(1),
                ..board_area
            };
            let banner_area = center_rect(row, Size::new(width, 1));
            Clear.render(banner_area, buf);
            Line::styled(msg, palette[Element::Banner])
                .centered()
                .render(banner_area, buf);
        }
    }
}

#[derive(Debug, Eq, PartialEq)]
struct Canvas<'a> {
    area: Rect,
    buf: &'a mut Buffer,
}

impl Canvas<'_> {
    fn draw_char(&mut self, pos: Position, symbol: char, style: Style) {
        let Some(x) = self.area.x.checked_add(pos.x) else {
            return;
        };
        let Some(y) = self.area.y.checked_add(pos.y) else {
            return;
        };
        if let Some(cell) = self.buf.cell_mut((x, y)) {
            cell.set_char(symbol);
            cell.set_style(style);
        }
    }

    /// Draw a two-column board cell, clipped to the canvas
    fn draw_cell(&mut self, pos: Position, symbol: &str, style: Style) {
        let Some(x) = pos.x.checked_mul(2).and_then(|x| self.area.x.checked_add(x)) else {
            return;
        };
        let Some(y) = self.area.y.checked_add(pos.y) else {
            return;
        };
        if y >= self.area.bottom() {
            return;
        }
        for (x, ch) in (x..self.area.right()).zip(symbol.chars()) {
            if let Some(cell) = self.buf.cell_mut((x, y)) {
                cell.set_char(ch);
                cell.set_style(Style::reset().patch(style));
            }
        }
    }
}

/// Border drawn around a board whose edges wrap around
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct DottedBorder {
    style: Style,
}

impl Widget for DottedBorder {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() {
            return;
        }
        let size = area.as_size();
        let max_x = size.width.saturating_sub(1);
        let max_y = size.height.saturating_sub(1);
        let style = self.style;
        let mut canvas = Canvas { area, buf };
        canvas.draw_char(Position::ORIGIN, '·', style);
        canvas.draw_char(Position::new(max_x, 0), '·', style);
        canvas.draw_char(Position::new(max_x, max_y), '·', style);
        canvas.draw_char(Position::new(0, max_y), '·', style);
        for x in 1..max_x {
            canvas.draw_char(Position::new(x, 0), '⋯', style);
            canvas.draw_char(Position::new(x, max_y), '⋯', style);
        }
        for y in 1..max_y {
            canvas.draw_char(Position::new(0, y), '⋮', style);
            canvas.draw_char(Position::new(max_x, y), '⋮', style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::{Bonus, Collision, Crash, Rules};
    use super::*;
    use crate::highscores::MemoryStore;
    use pretty_assertions::assert_eq;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;
    use ratatui::style::Color;
    use std::time::Duration;

    const RNG_SEED: u64 = 0x0123456789ABCDEF;

    /// A 10×10 game, snake at (4..=6, 5) heading east, food in the top-left
    /// corner
    fn small_game(mode: GameMode) -> Game<ChaCha12Rng> {
        let rules = Rules {
            mode,
            grid_size: GridSize::MINIMUM,
            ..Rules::default()
        };
        let mut game = Game::new_with_rng(
            rules,
            Box::new(MemoryStore::default()),
            ChaCha12Rng::seed_from_u64(RNG_SEED),
        );
        game.food = Some(Position::new(0, 0));
        game.obstacles.clear();
        game
    }

    fn render(board: Board<'_, ChaCha12Rng>) -> Buffer {
        let area = Rect::new(0, 0, 22, 12);
        let mut buffer = Buffer::empty(area);
        board.render(area, &mut buffer);
        buffer
    }

    fn row(buf: &Buffer, y: u16) -> String {
        (buf.area.x..buf.area.right())
            .map(|x| buf[(x, y)].symbol())
            .collect()
    }

    #[test]
    fn board_size_is_double_width() {
        assert_eq!(board_size(GridSize::MINIMUM), Size::new(22, 12));
        assert_eq!(board_size(GridSize::MAXIMUM), Size::new(82, 42));
    }

    #[test]
    fn playing_game() {
        let mut game = small_game(GameMode::Classic);
        game.start();
        let buf = render(Board::new(&game, Instant::now()));
        assert_eq!(row(&buf, 0), "┌────────────────────┐");
        assert_eq!(row(&buf, 1), "│()                  │");
        assert_eq!(row(&buf, 6), "│        ▓▓▓▓██      │");
        assert_eq!(row(&buf, 11), "└────────────────────┘");
        assert_eq!(buf[(13, 6)].fg, Color::LightGreen);
        assert_eq!(buf[(9, 6)].fg, Color::Green);
        assert_eq!(buf[(1, 1)].fg, Color::LightRed);
        assert_eq!(buf[(0, 0)].fg, Color::Reset);
    }

    #[test]
    fn wrap_border() {
        let mut game = small_game(GameMode::Wrap);
        game.start();
        let buf = render(Board::new(&game, Instant::now()));
        assert_eq!(row(&buf, 0), "·⋯⋯⋯⋯⋯⋯⋯⋯⋯⋯⋯⋯⋯⋯⋯⋯⋯⋯⋯⋯·");
        assert_eq!(row(&buf, 3), "⋮                    ⋮");
    }

    #[test]
    fn grid_overlay() {
        let mut game = small_game(GameMode::Classic);
        game.start();
        let buf = render(Board::new(&game, Instant::now()).show_grid(true));
        assert_eq!(row(&buf, 2), "│· · · · · · · · · · │");
        assert_eq!(row(&buf, 6), "│· · · · ▓▓▓▓██· · · │");
    }

    #[test]
    fn obstacles() {
        let mut game = small_game(GameMode::Obstacles);
        game.obstacles.insert(Position::new(9, 9));
        game.start();
        let buf = render(Board::new(&game, Instant::now()));
        assert_eq!(row(&buf, 10), "│                  ██│");
        assert_eq!(buf[(19, 10)].fg, Color::Red);
    }

    #[test]
    fn flashing_border() {
        let mut game = small_game(GameMode::Classic);
        game.start();
        let buf = render(Board::new(&game, Instant::now()).flashing(true));
        assert_eq!(buf[(0, 0)].fg, Color::Yellow);
        assert_eq!(buf[(21, 11)].fg, Color::Yellow);
    }

    #[test]
    fn ready_banner() {
        let game = small_game(GameMode::Classic);
        let buf = render(Board::new(&game, Instant::now()));
        assert_eq!(row(&buf, 4), "│Press Space to start│");
        assert_eq!(buf[(5, 4)].fg, Color::White);
    }

    #[test]
    fn paused_banner() {
        let mut game = small_game(GameMode::Classic);
        game.start();
        game.pause();
        let buf = render(Board::new(&game, Instant::now()));
        assert_eq!(row(&buf, 4), "│       Paused       │");
    }

    #[test]
    fn collision() {
        let mut game = small_game(GameMode::Classic);
        game.state = RunState::GameOver(Crash {
            cause: Collision::Snake,
            cell: Position::new(5, 5),
        });
        let buf = render(Board::new(&game, Instant::now()));
        assert_eq!(row(&buf, 4), "│Game over (r: reset)│");
        assert_eq!(row(&buf, 6), "│        ▓▓××██      │");
        assert_eq!(buf[(11, 6)].fg, Color::LightRed);
    }

    #[test]
    fn bonus_blinks_near_expiry() {
        let mut game = small_game(GameMode::Classic);
        game.start();
        let spawned_at = Instant::now();
        game.bonus = Some(Bonus::new(Position::new(2, 2), spawned_at));
        let shown = |at: Duration| {
            let buf = render(Board::new(&game, spawned_at + at));
            row(&buf, 3) == "│    <>              │"
        };
        assert!(shown(Duration::ZERO));
        assert!(shown(Duration::from_millis(5999)));
        // 1750ms left
        assert!(!shown(Duration::from_millis(6250)));
        // 1500ms left
        assert!(shown(Duration::from_millis(6500)));
    }

    #[test]
    fn themed_colours() {
        let mut game = small_game(GameMode::Classic);
        game.start();
        let now = Instant::now();
        let buf = render(Board::new(&game, now).theme(Theme::Neon));
        assert_eq!(row(&buf, 6), "│        ▓▓▓▓██      │");
        assert_eq!(buf[(13, 6)].fg, Color::LightCyan);
        assert_eq!(buf[(9, 6)].fg, Color::Cyan);
        assert_eq!(buf[(1, 1)].fg, Color::LightMagenta);
        let buf = render(Board::new(&game, now).theme(Theme::Retro));
        assert_eq!(buf[(13, 6)].fg, Color::Rgb(255, 176, 0));
        let buf = render(Board::new(&game, now).theme(Theme::Contrast));
        assert_eq!(buf[(13, 6)].fg, Color::White);
        assert_eq!(buf[(1, 1)].fg, Color::LightYellow);
    }

    #[test]
    fn tiny_area_does_not_panic() {
        let game = small_game(GameMode::Wrap);
        let area = Rect::new(0, 0, 5, 3);
        let mut buffer = Buffer::empty(area);
        Board::new(&game, Instant::now()).render(area, &mut buffer);
    }
}
