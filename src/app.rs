use crate::consts;
use crate::controls::ControlBar;
use crate::feedback::{FeedbackSink, Flash, Speaker};
use crate::game::{board_size, Board, Game, GameMode, RunState};
use crate::highscores::ScoreStore;
use crate::input::{Action, Swipe};
use crate::panel::Panel;
use crate::scheduler::Scheduler;
use crate::settings::{SettingKey, Settings};
use crate::util::Screen;
use crossterm::{
    event::{
        poll, read, DisableFocusChange, DisableMouseCapture, EnableFocusChange,
        EnableMouseCapture, Event, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
};
use rand::Rng;
use ratatui::{backend::Backend, layout::Position, Frame, Terminal};
use std::io::{self, Stdout, Write};
use std::time::{Duration, Instant};

/// The running program: a game plus everything around it that the player
/// interacts with
#[derive(Debug)]
pub(crate) struct App<R = rand::rngs::ThreadRng, W = Stdout> {
    game: Game<R>,
    settings: Settings,

    /// Setting currently highlighted in the side panel, if any
    selection: Option<SettingKey>,
    scheduler: Scheduler,
    swipe: Swipe,
    speaker: Speaker<W>,
    flash: Flash,

    /// Layout as of the last draw, used to map mouse events to widgets
    screen: Screen,
    quitting: bool,
}

impl App {
    pub(crate) fn new(settings: Settings, store: Box<dyn ScoreStore>) -> App {
        let speaker = Speaker::open(io::stdout(), settings.sound);
        App::with_parts(Game::new(settings.rules(), store), settings, speaker)
    }
}

impl<R: Rng, W: Write> App<R, W> {
    fn with_parts(game: Game<R>, settings: Settings, speaker: Speaker<W>) -> App<R, W> {
        App {
            game,
            settings,
            selection: None,
            scheduler: Scheduler::new(consts::MAX_FRAME_DELTA),
            swipe: Swipe::default(),
            speaker,
            flash: Flash::new(settings.haptic),
            screen: Screen::default(),
            quitting: false,
        }
    }

    pub(crate) fn run<B: Backend>(mut self, mut terminal: Terminal<B>) -> io::Result<()> {
        execute!(io::stdout(), EnableMouseCapture, EnableFocusChange)?;
        let r = self.main_loop(&mut terminal);
        let r2 = execute!(io::stdout(), DisableMouseCapture, DisableFocusChange);
        r.and(r2)
    }

    fn main_loop<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        while !self.quitting {
            let now = Instant::now();
            terminal.draw(|frame| self.draw(frame, now))?;
            let mut wait = consts::FRAME_PERIOD;
            while !self.quitting && poll(wait)? {
                self.handle_event(read()?);
                wait = Duration::ZERO;
            }
            self.frame(Instant::now());
        }
        Ok(())
    }

    /// Run whatever ticks are due at time `now` and pass on the feedback
    /// they produced
    fn frame(&mut self, now: Instant) {
        self.scheduler.frame(now, &mut self.game);
        for signal in self.game.drain_signals() {
            self.speaker.deliver(signal, now);
            self.flash.deliver(signal, now);
        }
    }

    fn draw(&mut self, frame: &mut Frame<'_>, now: Instant) {
        self.screen = Screen::new(frame.area(), board_size(self.game.rules().grid_size));
        frame.render_widget(
            Board::new(&self.game, now)
                .show_grid(self.settings.show_grid)
                .flashing(self.flash.active(now))
                .theme(self.settings.theme),
            self.screen.board,
        );
        frame.render_widget(
            Panel::new(&self.game, &self.settings, self.selection),
            self.screen.panel,
        );
        frame.render_widget(self.control_bar(), self.screen.controls);
    }

    fn control_bar(&self) -> ControlBar {
        ControlBar {
            playing: self.game.state() == RunState::Playing,
            theme: self.settings.theme,
        }
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(ev) if ev.is_press() => {
                if let Some(action) = Action::from_key_event(ev) {
                    self.perform(action);
                }
            }
            Event::Mouse(ev) => self.handle_mouse(ev),
            Event::FocusLost => self.game.pause(),
            _ => (),
        }
    }

    fn handle_mouse(&mut self, ev: MouseEvent) {
        let pos = Position::new(ev.column, ev.row);
        match ev.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if self.screen.board.contains(pos) {
                    self.swipe.begin(pos);
                } else if let Some(action) = self.control_bar().hit(self.screen.controls, pos) {
                    self.perform(action);
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if let Some(direction) = self.swipe.drag(pos) {
                    self.perform(Action::Turn(direction));
                }
            }
            MouseEventKind::Up(MouseButton::Left) => self.swipe.end(),
            _ => (),
        }
    }

    fn perform(&mut self, action: Action) {
        match action {
            Action::Turn(direction) => {
                if !self.game.turn(direction) {
                    log::trace!("Turn {direction:?} refused");
                }
            }
            Action::TogglePause => self.game.toggle_pause(),
            Action::Pause => self.game.pause(),
            Action::Reset => self.restart(),
            Action::ToggleGrid => self.settings.show_grid = !self.settings.show_grid,
            Action::ObstaclesMode => {
                if self.settings.mode == GameMode::Obstacles {
                    // Always a fresh layout, even without a change of mode
                    self.restart();
                } else {
                    self.settings.mode = GameMode::Obstacles;
                    self.apply_settings();
                }
            }
            Action::ToggleWrap => {
                self.settings.mode = if self.settings.mode == GameMode::Wrap {
                    GameMode::Classic
                } else {
                    GameMode::Wrap
                };
                self.apply_settings();
            }
            Action::CycleMode => {
                self.settings.mode = self.settings.mode.cycle();
                self.apply_settings();
            }
            Action::CycleTheme => {
                self.settings.theme = self.settings.theme.cycle();
                log::debug!("Switched to {} theme", self.settings.theme);
            }
            Action::ToggleSound => {
                self.settings.sound = !self.settings.sound;
                self.apply_settings();
            }
            Action::ToggleHaptic => {
                self.settings.haptic = !self.settings.haptic;
                self.apply_settings();
            }
            Action::ClearScores => self.game.clear_best_scores(),
            Action::NextSetting => {
                self.selection = Some(
                    self.selection
                        .map_or_else(SettingKey::default, SettingKey::next),
                );
            }
            Action::PrevSetting => {
                self.selection = Some(
                    self.selection
                        .map_or_else(|| SettingKey::default().prev(), SettingKey::prev),
                );
            }
            Action::Adjust(adjustment) => {
                if let Some(key) = self.selection {
                    self.settings.adjust(key, adjustment);
                    self.apply_settings();
                }
            }
            Action::Quit => self.quitting = true,
        }
    }

    fn restart(&mut self) {
        self.game.reset();
        self.scheduler.clear();
    }

    /// Push the current settings out to the game and the feedback sinks
    fn apply_settings(&mut self) {
        if self.game.update_rules(self.settings.rules()) {
            self.scheduler.clear();
        }
        self.speaker.set_enabled(self.settings.sound);
        self.flash.set_enabled(self.settings.haptic);
    }
}
