mod board;
mod direction;
mod grid;
mod snake;
mod spawner;
mod speed;
pub(crate) use self::board::{board_size, Board};
pub(crate) use self::direction::Direction;
use self::direction::Steering;
use self::grid::Bounds;
pub(crate) use self::grid::{GameMode, GridSize};
use self::snake::Snake;
pub(crate) use self::spawner::Density;
pub(crate) use self::speed::Speed;
use crate::consts;
use crate::feedback::Signal;
use crate::highscores::{BestKey, ScoreStore};
use crate::scheduler::Simulation;
use crate::util::error_chain;
use rand::Rng;
use ratatui::layout::Position;
use std::collections::HashSet;
use std::fmt;
use std::time::{Duration, Instant};

/// The settings that shape a game
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct Rules {
    pub(crate) mode: GameMode,
    pub(crate) grid_size: GridSize,
    pub(crate) obstacle_density: Density,

    /// Speed at the start of each game
    pub(crate) speed: Speed,
}

impl Rules {
    fn bounds(&self) -> Bounds {
        self.mode.bounds(self.grid_size)
    }

    fn best_key(&self) -> BestKey {
        BestKey {
            mode: self.mode,
            grid_size: self.grid_size,
        }
    }
}

/// A short-lived, high-value alternative to food
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Bonus {
    pub(crate) cell: Position,
    spawned_at: Instant,
}

impl Bonus {
    fn new(cell: Position, spawned_at: Instant) -> Bonus {
        Bonus { cell, spawned_at }
    }

    /// Test whether the bonus has outlived
    /// [`BONUS_LIFETIME`][consts::BONUS_LIFETIME] at time `now`
    pub(crate) fn expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.spawned_at) > consts::BONUS_LIFETIME
    }

    /// Time left before the bonus expires
    pub(crate) fn remaining(&self, now: Instant) -> Duration {
        consts::BONUS_LIFETIME.saturating_sub(now.saturating_duration_since(self.spawned_at))
    }
}

/// What the snake ran into
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Collision {
    Wall,
    Snake,
    Obstacle,
}

impl fmt::Display for Collision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Collision::Wall => "Hit the wall",
            Collision::Snake => "Bit itself",
            Collision::Obstacle => "Hit an obstacle",
        };
        f.pad(msg)
    }
}

/// How & where a game ended
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Crash {
    pub(crate) cause: Collision,

    /// The cell the snake tried to move into, or its head for a wall hit
    pub(crate) cell: Position,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) enum RunState {
    /// Freshly reset and waiting for the first start
    #[default]
    Ready,
    Playing,
    Paused,

    /// Terminal until the next reset
    GameOver(Crash),
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunState::Ready => "Ready",
            RunState::Playing => "Playing",
            RunState::Paused => "Paused",
            RunState::GameOver(_) => "Game Over",
        };
        f.pad(name)
    }
}

/// The game state machine: owns the board, the score, and the speed, and is
/// advanced one tick at a time by a [`Scheduler`][crate::scheduler::Scheduler]
#[derive(Debug)]
pub(crate) struct Game<R = rand::rngs::ThreadRng> {
    rng: R,
    rules: Rules,
    store: Box<dyn ScoreStore>,
    snake: Snake,
    steering: Steering,
    food: Option<Position>,
    bonus: Option<Bonus>,
    obstacles: HashSet<Position>,
    score: u32,
    best: u32,
    speed: Speed,
    state: RunState,

    /// Feedback waiting to be collected by the host
    signals: Vec<Signal>,
}

impl Game<rand::rngs::ThreadRng> {
    pub(crate) fn new(rules: Rules, store: Box<dyn ScoreStore>) -> Self {
        Game::new_with_rng(rules, store, rand::rng())
    }
}

impl<R: Rng> Game<R> {
    pub(crate) fn new_with_rng(rules: Rules, store: Box<dyn ScoreStore>, rng: R) -> Game<R> {
        let mut game = Game {
            rng,
            rules,
            store,
            snake: Snake::new(Position::ORIGIN),
            steering: Steering::new(Direction::East),
            food: None,
            bonus: None,
            obstacles: HashSet::new(),
            score: 0,
            best: 0,
            speed: rules.speed,
            state: RunState::Ready,
            signals: Vec::new(),
        };
        game.reset();
        game
    }

    /// Start a new game under the current rules.  The snake is put back in
    /// the middle of the board heading east, the obstacles & food are placed
    /// anew, and the best score is reloaded.
    pub(crate) fn reset(&mut self) {
        let mid = self.rules.grid_size.get() / 2;
        self.snake = Snake::new(Position::new(mid, mid));
        self.steering = Steering::new(Direction::East);
        self.bonus = None;
        self.food = None;
        self.score = 0;
        self.speed = self.rules.speed;
        self.state = RunState::Ready;
        self.place_obstacles();
        self.place_food();
        self.best = self.load_best();
        log::info!(
            "New {} game on a {} board (best: {})",
            self.rules.mode,
            self.rules.grid_size,
            self.best
        );
    }

    /// Replace the rules.  A change of mode or board size resets the game
    /// (and returns `true`); a change of speed takes effect immediately, and
    /// a change of obstacle density regenerates the obstacles in place.
    pub(crate) fn update_rules(&mut self, rules: Rules) -> bool {
        let old = std::mem::replace(&mut self.rules, rules);
        if old.mode != rules.mode || old.grid_size != rules.grid_size {
            if old.mode != rules.mode {
                log::info!("Switching from {} to {} mode", old.mode, rules.mode);
            }
            self.reset();
            return true;
        }
        if old.speed != rules.speed {
            self.speed = rules.speed;
        }
        if old.obstacle_density != rules.obstacle_density && rules.mode.has_obstacles() {
            log::debug!("Regenerating obstacles at {}", rules.obstacle_density);
            self.place_obstacles();
        }
        false
    }

    /// Forget every recorded best score, including the current one
    pub(crate) fn clear_best_scores(&mut self) {
        match self.store.clear_all() {
            Ok(()) => log::info!("Cleared all best scores"),
            Err(e) => log::warn!("Could not clear best scores: {}", error_chain(&e)),
        }
        self.best = self.load_best();
    }

    /// Run one step of the simulation.  Does nothing unless the game is
    /// being played.
    pub(crate) fn tick(&mut self, now: Instant) {
        if self.state != RunState::Playing {
            return;
        }
        let direction = self.steering.commit();
        let head = self.snake.head();
        let Some(next) = self.rules.bounds().step(head, direction) else {
            self.game_over(Collision::Wall, head);
            return;
        };
        // The tail is still in place at this point, so chasing it is fatal
        if self.snake.occupies(next) {
            self.game_over(Collision::Snake, next);
            return;
        }
        if self.obstacles.contains(&next) {
            self.game_over(Collision::Obstacle, next);
            return;
        }
        let before = self.score;
        let ate_food = self.food == Some(next);
        let ate_bonus = !ate_food
            && self
                .bonus
                .is_some_and(|b| b.cell == next && !b.expired(now));
        self.snake.advance(next, ate_food || ate_bonus);
        if ate_food {
            self.score = self.score.saturating_add(consts::FOOD_POINTS);
            self.place_food();
            self.roll_bonus(now);
            self.signals.push(Signal::Eat);
        } else if ate_bonus {
            self.score = self.score.saturating_add(consts::BONUS_POINTS);
            self.bonus = None;
            self.signals.push(Signal::Bonus);
        }
        if self.bonus.is_some_and(|b| b.expired(now)) {
            log::trace!("Bonus expired");
            self.bonus = None;
        }
        self.speed = self.speed.accelerate(before, self.score);
        if self.score > self.best {
            self.best = self.score;
            self.save_best();
        }
    }

    fn game_over(&mut self, cause: Collision, cell: Position) {
        log::info!("Game over: {cause} at {cell:?} with score {}", self.score);
        self.state = RunState::GameOver(Crash { cause, cell });
        self.signals.push(Signal::Defeat);
    }

    fn place_food(&mut self) {
        let snake = &self.snake;
        let obstacles = &self.obstacles;
        let bonus = self.bonus.map(|b| b.cell);
        self.food = spawner::spawn_cell(&mut self.rng, self.rules.bounds(), |p| {
            snake.occupies(p) || obstacles.contains(&p) || bonus == Some(p)
        });
        if self.food.is_none() {
            log::debug!("No room left for food");
        }
    }

    /// Only one bonus can be on the board at a time, so nothing is rolled
    /// while one is already present.
    fn roll_bonus(&mut self, now: Instant) {
        if self.bonus.is_some() {
            return;
        }
        let snake = &self.snake;
        let obstacles = &self.obstacles;
        let food = self.food;
        self.bonus = spawner::spawn_bonus(&mut self.rng, self.rules.bounds(), |p| {
            snake.occupies(p) || obstacles.contains(&p) || food == Some(p)
        })
        .map(|cell| Bonus::new(cell, now));
    }

    fn place_obstacles(&mut self) {
        if !self.rules.mode.has_obstacles() {
            self.obstacles.clear();
            return;
        }
        let clearance = self.clearance();
        let snake = &self.snake;
        let food = self.food;
        let bonus = self.bonus.map(|b| b.cell);
        self.obstacles = spawner::spawn_obstacles(
            &mut self.rng,
            self.rules.bounds(),
            self.rules.obstacle_density,
            |p| {
                snake.occupies(p)
                    || food == Some(p)
                    || bonus == Some(p)
                    || clearance.contains(&p)
            },
        );
    }
}

impl<R> Game<R> {
    /// Begin or resume play.  Has no effect once the game is over.
    pub(crate) fn start(&mut self) {
        if matches!(self.state, RunState::Ready | RunState::Paused) {
            self.state = RunState::Playing;
            self.signals.push(Signal::UiClick);
        }
    }

    pub(crate) fn pause(&mut self) {
        if self.state == RunState::Playing {
            self.state = RunState::Paused;
        }
    }

    pub(crate) fn toggle_pause(&mut self) {
        if self.state == RunState::Playing {
            self.pause();
        } else {
            self.start();
        }
    }

    /// Ask the snake to turn at the next tick.  Returns `false` if the turn
    /// was refused because it would reverse the snake onto itself or because
    /// the game is over.
    pub(crate) fn turn(&mut self, direction: Direction) -> bool {
        if matches!(self.state, RunState::GameOver(_)) {
            return false;
        }
        self.steering.request(direction)
    }

    /// Take all feedback signals queued since the last call
    pub(crate) fn drain_signals(&mut self) -> Vec<Signal> {
        std::mem::take(&mut self.signals)
    }

    pub(crate) fn rules(&self) -> Rules {
        self.rules
    }

    pub(crate) fn snake(&self) -> &Snake {
        &self.snake
    }

    pub(crate) fn food(&self) -> Option<Position> {
        self.food
    }

    pub(crate) fn bonus(&self) -> Option<Bonus> {
        self.bonus
    }

    pub(crate) fn obstacles(&self) -> &HashSet<Position> {
        &self.obstacles
    }

    pub(crate) fn score(&self) -> u32 {
        self.score
    }

    pub(crate) fn best(&self) -> u32 {
        self.best
    }

    pub(crate) fn speed(&self) -> Speed {
        self.speed
    }

    pub(crate) fn state(&self) -> RunState {
        self.state
    }

    /// The cells directly ahead of the snake's head that obstacles must not
    /// be placed on
    fn clearance(&self) -> Vec<Position> {
        let bounds = self.rules.bounds();
        let direction = self.steering.upcoming();
        std::iter::successors(Some(self.snake.head()), |&p| bounds.step(p, direction))
            .skip(1)
            .take(consts::FORWARDS_CLEARANCE)
            .collect()
    }

    fn load_best(&self) -> u32 {
        let key = self.rules.best_key();
        match self.store.load(key) {
            Ok(best) => best,
            Err(e) => {
                log::warn!("Could not load {key}: {}", error_chain(&e));
                0
            }
        }
    }

    fn save_best(&mut self) {
        let key = self.rules.best_key();
        match self.store.save(key, self.best) {
            Ok(()) => log::debug!("New best score {} saved as {key}", self.best),
            Err(e) => log::warn!("Could not save {key}: {}", error_chain(&e)),
        }
    }
}

impl<R: Rng> Simulation for Game<R> {
    fn playing(&self) -> bool {
        self.state == RunState::Playing
    }

    fn period(&self) -> Duration {
        self.speed.period()
    }

    fn tick(&mut self, now: Instant) {
        Game::tick(self, now);
    }
}
