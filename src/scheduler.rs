//! Fixed-timestep driving of the simulation, decoupled from the frame rate
use std::time::{Duration, Instant};

/// Something advanced in discrete, evenly-spaced ticks
pub(crate) trait Simulation {
    /// Whether ticks should currently be run at all
    fn playing(&self) -> bool;

    /// Time between consecutive ticks
    fn period(&self) -> Duration;

    fn tick(&mut self, now: Instant);
}

/// Accumulates wall-clock time between frames and spends it on whole ticks
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Scheduler {
    last_frame: Option<Instant>,
    accumulator: Duration,
    max_frame_delta: Duration,
}

impl Scheduler {
    /// Create a scheduler that credits at most `max_frame_delta` of elapsed
    /// time to any one frame
    pub(crate) fn new(max_frame_delta: Duration) -> Scheduler {
        Scheduler {
            last_frame: None,
            accumulator: Duration::ZERO,
            max_frame_delta,
        }
    }

    /// Account for a frame at time `now`, running as many ticks of `sim` as
    /// the time accumulated so far pays for.  The tick period is read again
    /// before every tick, so a speed change takes effect within the same
    /// frame.  Returns the number of ticks run.
    ///
    /// No time is banked while the simulation isn't playing, and anything
    /// left over when it stops is discarded.
    pub(crate) fn frame<S: Simulation>(&mut self, now: Instant, sim: &mut S) -> u32 {
        let delta = self
            .last_frame
            .map_or(Duration::ZERO, |last| now.saturating_duration_since(last))
            .min(self.max_frame_delta);
        self.last_frame = Some(now);
        if !sim.playing() {
            self.accumulator = Duration::ZERO;
            return 0;
        }
        self.accumulator += delta;
        let mut ticks = 0;
        while sim.playing() {
            let period = sim.period();
            if self.accumulator < period {
                break;
            }
            sim.tick(now);
            self.accumulator -= period;
            ticks += 1;
        }
        if !sim.playing() {
            self.accumulator = Duration::ZERO;
        }
        ticks
    }

    /// Discard any banked time
    pub(crate) fn clear(&mut self) {
        self.accumulator = Duration::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, Eq, PartialEq)]
    struct Counter {
        playing: bool,
        period: Duration,
        ticks: u32,
        stop_after: Option<u32>,
        speedup: Option<(u32, Duration)>,
    }

    impl Counter {
        fn new(millis: u64) -> Counter {
            Counter {
                playing: true,
                period: Duration::from_millis(millis),
                ticks: 0,
                stop_after: None,
                speedup: None,
            }
        }
    }

    impl Simulation for Counter {
        fn playing(&self) -> bool {
            self.playing
        }

        fn period(&self) -> Duration {
            self.period
        }

        fn tick(&mut self, _now: Instant) {
            self.ticks += 1;
            if self.stop_after == Some(self.ticks) {
                self.playing = false;
            }
            if let Some((after, period)) = self.speedup {
                if after == self.ticks {
                    self.period = period;
                }
            }
        }
    }

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    #[test]
    fn first_frame_runs_nothing() {
        let mut sched = Scheduler::new(ms(250));
        let mut sim = Counter::new(100);
        assert_eq!(sched.frame(Instant::now(), &mut sim), 0);
        assert_eq!(sim.ticks, 0);
    }

    #[test]
    fn ticks_follow_elapsed_time() {
        let mut sched = Scheduler::new(ms(250));
        let mut sim = Counter::new(100);
        let start = Instant::now();
        sched.frame(start, &mut sim);
        assert_eq!(sched.frame(start + ms(16), &mut sim), 0);
        assert_eq!(sched.frame(start + ms(99), &mut sim), 0);
        assert_eq!(sched.frame(start + ms(100), &mut sim), 1);
        assert_eq!(sched.frame(start + ms(150), &mut sim), 0);
        assert_eq!(sched.frame(start + ms(200), &mut sim), 1);
        assert_eq!(sim.ticks, 2);
    }

    #[test]
    fn catches_up_after_hitch() {
        let mut sched = Scheduler::new(ms(250));
        let mut sim = Counter::new(100);
        let start = Instant::now();
        sched.frame(start, &mut sim);
        assert_eq!(sched.frame(start + ms(230), &mut sim), 2);
        // The 30ms remainder carries over
        assert_eq!(sched.frame(start + ms(300), &mut sim), 1);
    }

    #[test]
    fn long_stall_is_clamped() {
        let mut sched = Scheduler::new(ms(250));
        let mut sim = Counter::new(100);
        let start = Instant::now();
        sched.frame(start, &mut sim);
        assert_eq!(sched.frame(start + Duration::from_secs(5), &mut sim), 2);
    }

    #[test]
    fn nothing_accumulates_while_stopped() {
        let mut sched = Scheduler::new(ms(250));
        let mut sim = Counter::new(100);
        sim.playing = false;
        let start = Instant::now();
        sched.frame(start, &mut sim);
        assert_eq!(sched.frame(start + ms(200), &mut sim), 0);
        sim.playing = true;
        assert_eq!(sched.frame(start + ms(210), &mut sim), 0);
        assert_eq!(sched.frame(start + ms(310), &mut sim), 1);
    }

    #[test]
    fn stops_mid_frame() {
        let mut sched = Scheduler::new(ms(250));
        let mut sim = Counter::new(50);
        sim.stop_after = Some(2);
        let start = Instant::now();
        sched.frame(start, &mut sim);
        assert_eq!(sched.frame(start + ms(240), &mut sim), 2);
        assert_eq!(
            sched,
            Scheduler {
                last_frame: Some(start + ms(240)),
                accumulator: Duration::ZERO,
                max_frame_delta: ms(250),
            }
        );
    }

    #[test]
    fn speedup_applies_within_frame() {
        let mut sched = Scheduler::new(ms(250));
        let mut sim = Counter::new(100);
        sim.speedup = Some((1, ms(50)));
        let start = Instant::now();
        sched.frame(start, &mut sim);
        // 100ms for the first tick, then 50ms each for the rest
        assert_eq!(sched.frame(start + ms(240), &mut sim), 3);
        assert_eq!(sched.accumulator, ms(40));
    }

    #[test]
    fn clear() {
        let mut sched = Scheduler::new(ms(250));
        let mut sim = Counter::new(100);
        let start = Instant::now();
        sched.frame(start, &mut sim);
        sched.frame(start + ms(90), &mut sim);
        sched.clear();
        assert_eq!(sched.frame(start + ms(100), &mut sim), 0);
    }
}
