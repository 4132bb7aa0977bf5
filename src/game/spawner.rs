//! Random placement of food, bonuses, and obstacles.
//!
//! Every placement samples uniformly random cells a bounded number of times
//! and then falls back to a uniform choice among all remaining free cells, so
//! it always terminates, and only comes back empty-handed when the board is
//! genuinely full.
use super::grid::{Bounds, OutOfRange};
use crate::consts;
use rand::{seq::IteratorRandom, Rng};
use ratatui::layout::Position;
use serde::Deserialize;
use std::collections::HashSet;
use std::fmt;

/// Percentage of the board to cover with obstacles
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[serde(try_from = "u8")]
pub(crate) struct Density(u8);

impl Density {
    pub(crate) const MINIMUM: Density = Density(0);
    pub(crate) const MAXIMUM: Density = Density(100);

    /// Returns `None` if `percent` is over 100
    pub(crate) fn new(percent: u8) -> Option<Density> {
        (percent <= 100).then_some(Density(percent))
    }

    pub(crate) fn clamped(percent: u8) -> Density {
        Density(percent.min(100))
    }

    pub(crate) fn get(self) -> u8 {
        self.0
    }

    /// Number of obstacles wanted on a board with `cells` cells, rounded
    /// down
    pub(crate) fn target(self, cells: usize) -> usize {
        cells * usize::from(self.0) / 100
    }
}

impl Default for Density {
    fn default() -> Density {
        Density(consts::DEFAULT_OBSTACLE_DENSITY)
    }
}

impl TryFrom<u8> for Density {
    type Error = OutOfRange;

    fn try_from(percent: u8) -> Result<Density, OutOfRange> {
        Density::new(percent).ok_or(OutOfRange {
            what: "obstacle density",
            min: 0,
            max: 100,
        })
    }
}

impl fmt::Display for Density {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&format!("{}%", self.0))
    }
}

/// Pick a cell within `bounds` for which `blocked` returns `false`.  Returns
/// `None` if there is no such cell.
pub(super) fn spawn_cell<R, F>(rng: &mut R, bounds: Bounds, blocked: F) -> Option<Position>
where
    R: Rng,
    F: Fn(Position) -> bool,
{
    for _ in 0..consts::SPAWN_ATTEMPTS {
        let pos = random_cell(rng, bounds);
        if !blocked(pos) {
            return Some(pos);
        }
    }
    bounds.positions().filter(|&p| !blocked(p)).choose(rng)
}

/// Roll for a bonus, and, if the roll succeeds, pick a cell for it as with
/// [`spawn_cell()`]
pub(super) fn spawn_bonus<R, F>(rng: &mut R, bounds: Bounds, blocked: F) -> Option<Position>
where
    R: Rng,
    F: Fn(Position) -> bool,
{
    if rng.random_bool(consts::BONUS_PROBABILITY) {
        spawn_cell(rng, bounds, blocked)
    } else {
        None
    }
}

/// Choose `density` percent of the cells within `bounds` as obstacles,
/// skipping cells for which `blocked` returns `true`.  If there are fewer free
/// cells than wanted, every free cell becomes an obstacle.
pub(super) fn spawn_obstacles<R, F>(
    rng: &mut R,
    bounds: Bounds,
    density: Density,
    blocked: F,
) -> HashSet<Position>
where
    R: Rng,
    F: Fn(Position) -> bool,
{
    let target = density.target(bounds.cells());
    let mut obstacles = HashSet::with_capacity(target);
    let mut attempts = target.saturating_mul(consts::SPAWN_ATTEMPTS);
    while obstacles.len() < target && attempts > 0 {
        attempts -= 1;
        let pos = random_cell(rng, bounds);
        if !blocked(pos) {
            obstacles.insert(pos);
        }
    }
    if obstacles.len() < target {
        let wanted = target - obstacles.len();
        let rest = bounds
            .positions()
            .filter(|&p| !blocked(p) && !obstacles.contains(&p))
            .choose_multiple(rng, wanted);
        obstacles.extend(rest);
    }
    obstacles
}

fn random_cell<R: Rng>(rng: &mut R, bounds: Bounds) -> Position {
    Position::new(
        rng.random_range(0..bounds.size),
        rng.random_range(0..bounds.size),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::grid::{GameMode, GridSize};
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;
    use rstest::rstest;

    const RNG_SEED: u64 = 0x0123456789ABCDEF;

    fn bounds() -> Bounds {
        GameMode::Classic.bounds(GridSize::MINIMUM)
    }

    #[rstest]
    #[case(0, 0)]
    #[case(8, 8)]
    #[case(10, 10)]
    #[case(50, 50)]
    #[case(100, 100)]
    fn test_density_target(#[case] percent: u8, #[case] target: usize) {
        let density = Density::new(percent).unwrap();
        assert_eq!(density.target(bounds().cells()), target);
    }

    #[test]
    fn density_target_rounds_down() {
        // 24 * 24 * 8 / 100 = 46.08
        assert_eq!(Density::new(8).unwrap().target(24 * 24), 46);
    }

    #[test]
    fn density_range() {
        assert_eq!(Density::new(101), None);
        assert_eq!(Density::clamped(250), Density::MAXIMUM);
    }

    #[test]
    fn spawn_cell_avoids_blocked() {
        let mut rng = ChaCha12Rng::seed_from_u64(RNG_SEED);
        for _ in 0..200 {
            let pos = spawn_cell(&mut rng, bounds(), |p| p.x < 9).unwrap();
            assert_eq!(pos.x, 9);
        }
    }

    #[test]
    fn spawn_cell_finds_last_free_cell() {
        let mut rng = ChaCha12Rng::seed_from_u64(RNG_SEED);
        let free = Position::new(3, 7);
        assert_eq!(spawn_cell(&mut rng, bounds(), |p| p != free), Some(free));
    }

    #[test]
    fn spawn_cell_on_full_board() {
        let mut rng = ChaCha12Rng::seed_from_u64(RNG_SEED);
        assert_eq!(spawn_cell(&mut rng, bounds(), |_| true), None);
    }

    #[test]
    fn spawn_bonus_rate() {
        let mut rng = ChaCha12Rng::seed_from_u64(RNG_SEED);
        let hits = (0..1000)
            .filter(|_| spawn_bonus(&mut rng, bounds(), |_| false).is_some())
            .count();
        assert!((120..=280).contains(&hits), "{hits} bonuses in 1000 rolls");
    }

    #[test]
    fn spawn_obstacles_hits_target() {
        let mut rng = ChaCha12Rng::seed_from_u64(RNG_SEED);
        let blocked = |p: Position| p.y == 5;
        let obstacles = spawn_obstacles(&mut rng, bounds(), Density::new(30).unwrap(), blocked);
        assert_eq!(obstacles.len(), 30);
        assert!(obstacles.iter().all(|&p| !blocked(p)));
    }

    #[test]
    fn spawn_obstacles_full_density() {
        let mut rng = ChaCha12Rng::seed_from_u64(RNG_SEED);
        let blocked = |p: Position| p.y == 5;
        let obstacles = spawn_obstacles(&mut rng, bounds(), Density::MAXIMUM, blocked);
        assert_eq!(obstacles.len(), 90);
        assert!(obstacles.iter().all(|&p| !blocked(p)));
    }

    #[test]
    fn spawn_obstacles_zero_density() {
        let mut rng = ChaCha12Rng::seed_from_u64(RNG_SEED);
        let obstacles = spawn_obstacles(&mut rng, bounds(), Density::MINIMUM, |_| false);
        assert!(obstacles.is_empty());
    }
}
