//! Assorted constants & hard-coded configuration
use ratatui::style::{Modifier, Style};
use std::time::Duration;

/// Smallest permitted board side length, in cells
pub(crate) const MIN_GRID_SIZE: u16 = 10;

/// Largest permitted board side length, in cells
pub(crate) const MAX_GRID_SIZE: u16 = 40;

/// Board side length used when nothing else is configured
pub(crate) const DEFAULT_GRID_SIZE: u16 = 24;

/// Slowest permitted snake speed, in ticks per second
pub(crate) const MIN_SPEED: u16 = 5;

/// Fastest permitted snake speed, in ticks per second
pub(crate) const MAX_SPEED: u16 = 25;

/// Snake speed used when nothing else is configured, in ticks per second
pub(crate) const DEFAULT_SPEED: u16 = 10;

/// Amount, in tenths of a tick per second, by which the speed rises every
/// [`SPEEDUP_EVERY`] points
pub(crate) const SPEEDUP_DECIS: u16 = 2;

/// Number of points between speed increases
pub(crate) const SPEEDUP_EVERY: u32 = 10;

/// Percentage of the board covered by obstacles when nothing else is
/// configured
pub(crate) const DEFAULT_OBSTACLE_DENSITY: u8 = 8;

/// Amount by which the obstacle density setting moves per adjustment, in
/// percentage points
pub(crate) const DENSITY_STEP: u8 = 2;

/// Length of a freshly-reset snake
pub(crate) const INITIAL_SNAKE_LENGTH: u16 = 3;

/// Points awarded for eating food
pub(crate) const FOOD_POINTS: u32 = 1;

/// Points awarded for eating a bonus
pub(crate) const BONUS_POINTS: u32 = 5;

/// Chance of a bonus appearing each time food is eaten
pub(crate) const BONUS_PROBABILITY: f64 = 0.2;

/// How long a bonus stays on the board before vanishing
pub(crate) const BONUS_LIFETIME: Duration = Duration::from_millis(8000);

/// A bonus starts blinking once it has this little time left
pub(crate) const BONUS_BLINK_WINDOW: Duration = Duration::from_millis(2000);

/// Time a blinking bonus spends shown, and then hidden, per blink
pub(crate) const BONUS_BLINK_PERIOD: Duration = Duration::from_millis(250);

/// Number of uniformly random cells tried when placing something before
/// falling back to a scan of every free cell
pub(crate) const SPAWN_ATTEMPTS: usize = 64;

/// When generating obstacles, keep this many cells in front of the snake's
/// head clear.
pub(crate) const FORWARDS_CLEARANCE: usize = 4;

/// Upper bound on the wall-clock time fed into the scheduler from a single
/// frame, so that a long stall does not unleash a flood of ticks
pub(crate) const MAX_FRAME_DELTA: Duration = Duration::from_millis(250);

/// How long the host waits for input before drawing the next frame
pub(crate) const FRAME_PERIOD: Duration = Duration::from_millis(16);

/// How long the board border stays highlighted for a haptic pulse
pub(crate) const FLASH_PERIOD: Duration = Duration::from_millis(120);

/// Minimum drag distance, in weighted terminal cells, that counts as a swipe
pub(crate) const SWIPE_THRESHOLD: u32 = 3;

/// Width of the settings & score panel beside the board
pub(crate) const PANEL_WIDTH: u16 = 28;

/// Height of the settings & score panel beside the board
pub(crate) const PANEL_HEIGHT: u16 = 17;

/// Rows reserved for the on-screen buttons under the board
pub(crate) const CONTROLS_HEIGHT: u16 = 2;

/// Glyphs for the snake's head
pub(crate) const SNAKE_HEAD_SYMBOL: &str = "██";

/// Glyphs for the parts of the snake's body
pub(crate) const SNAKE_BODY_SYMBOL: &str = "▓▓";

/// Glyphs for food
pub(crate) const FOOD_SYMBOL: &str = "()";

/// Glyphs for a bonus
pub(crate) const BONUS_SYMBOL: &str = "<>";

/// Glyphs for obstacles
pub(crate) const OBSTACLE_SYMBOL: &str = "██";

/// Glyphs for an empty cell when the grid overlay is shown
pub(crate) const GRID_SYMBOL: &str = "· ";

/// Glyphs for the snake's head when it's collided with something
pub(crate) const COLLISION_SYMBOL: &str = "××";

/// Style for the currently-selected setting
pub(crate) const MENU_SELECTION_STYLE: Style = Style::new().add_modifier(Modifier::UNDERLINED);
