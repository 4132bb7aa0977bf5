use super::grid::OutOfRange;
use crate::consts;
use serde::Deserialize;
use std::fmt;
use std::time::Duration;

/// Snake speed in ticks per second, held in tenths so that the 0.2 steps
/// stay exact
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[serde(try_from = "u16")]
pub(crate) struct Speed(u16);

impl Speed {
    pub(crate) const MINIMUM: Speed = Speed(consts::MIN_SPEED * 10);
    pub(crate) const MAXIMUM: Speed = Speed(consts::MAX_SPEED * 10);

    /// Returns `None` if `tps` ticks per second is outside the permitted
    /// range
    pub(crate) fn new(tps: u16) -> Option<Speed> {
        (consts::MIN_SPEED..=consts::MAX_SPEED)
            .contains(&tps)
            .then_some(Speed(tps * 10))
    }

    /// Speed of `tps` ticks per second, pulled into the permitted range
    #[cfg(test)]
    pub(crate) fn clamped(tps: u16) -> Speed {
        Speed::from_decis(tps.saturating_mul(10))
    }

    fn from_decis(decis: u16) -> Speed {
        Speed(decis.clamp(Speed::MINIMUM.0, Speed::MAXIMUM.0))
    }

    /// Speed in tenths of a tick per second
    #[cfg(test)]
    pub(crate) fn decis(self) -> u16 {
        self.0
    }

    /// Speed in whole ticks per second, rounded to nearest
    pub(crate) fn rounded(self) -> u16 {
        (self.0 + 5) / 10
    }

    /// Time between ticks
    pub(crate) fn period(self) -> Duration {
        Duration::from_nanos(10_000_000_000 / u64::from(self.0))
    }

    /// Speed up once per multiple of [`SPEEDUP_EVERY`][consts::SPEEDUP_EVERY]
    /// crossed going from score `before` to score `after`
    pub(crate) fn accelerate(self, before: u32, after: u32) -> Speed {
        let crossings =
            (after / consts::SPEEDUP_EVERY).saturating_sub(before / consts::SPEEDUP_EVERY);
        let boost = u16::try_from(crossings)
            .unwrap_or(u16::MAX)
            .saturating_mul(consts::SPEEDUP_DECIS);
        Speed::from_decis(self.0.saturating_add(boost))
    }

    /// One whole tick per second faster, within range
    pub(crate) fn faster(self) -> Speed {
        Speed::from_decis(self.0.saturating_add(10))
    }

    /// One whole tick per second slower, within range
    pub(crate) fn slower(self) -> Speed {
        Speed::from_decis(self.0.saturating_sub(10))
    }
}

impl Default for Speed {
    fn default() -> Speed {
        Speed(consts::DEFAULT_SPEED * 10)
    }
}

impl TryFrom<u16> for Speed {
    type Error = OutOfRange;

    fn try_from(tps: u16) -> Result<Speed, OutOfRange> {
        Speed::new(tps).ok_or(OutOfRange {
            what: "speed",
            min: consts::MIN_SPEED,
            max: consts::MAX_SPEED,
        })
    }
}

impl fmt::Display for Speed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.rounded().to_string())
    }
}
