//! Sound & haptic responses to things happening in the game.
//!
//! The game only queues [`Signal`]s; the host drains the queue once per frame
//! and hands each signal to every [`FeedbackSink`].
use crate::consts;
use std::io::Write;
use std::time::{Duration, Instant};
#[cfg(feature = "audio")]
use crate::util::error_chain;
#[cfg(feature = "audio")]
use rodio::{buffer::SamplesBuffer, OutputStream, OutputStreamHandle, Sink};
#[cfg(feature = "audio")]
use std::fmt;

/// Something the player should hear or feel
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Signal {
    /// Food was eaten
    Eat,

    /// A bonus was eaten
    Bonus,

    /// The snake died
    Defeat,

    /// Play started or resumed
    UiClick,
}

impl Signal {
    /// Suggested sound for the signal
    pub(crate) fn tone(self) -> Tone {
        match self {
            Signal::Eat => Tone::new(660, 60, Waveform::Square, 0.04),
            Signal::Bonus => Tone::new(880, 100, Waveform::Sawtooth, 0.05),
            Signal::Defeat => Tone::new(140, 180, Waveform::Triangle, 0.05),
            Signal::UiClick => Tone::new(520, 50, Waveform::Square, 0.03),
        }
    }

    /// Suggested vibration length, if the signal should be felt at all
    pub(crate) fn pulse(self) -> Option<Duration> {
        match self {
            Signal::Eat => Some(Duration::from_millis(8)),
            Signal::Bonus => Some(Duration::from_millis(12)),
            Signal::Defeat => Some(Duration::from_millis(20)),
            Signal::UiClick => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Waveform {
    Square,
    Sawtooth,
    Triangle,
}

impl Waveform {
    /// Value in `[-1, 1]` at `phase`, a fraction of one period
    #[cfg(any(test, feature = "audio"))]
    fn sample(self, phase: f32) -> f32 {
        match self {
            Waveform::Square => {
                if phase < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Sawtooth => phase.mul_add(2.0, -1.0),
            Waveform::Triangle => (phase - 0.5).abs().mul_add(-4.0, 1.0),
        }
    }
}

/// Parameters for a short synthesized beep
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Tone {
    pub(crate) frequency_hz: u16,
    pub(crate) duration: Duration,
    pub(crate) waveform: Waveform,
    pub(crate) gain: f32,
}

impl Tone {
    const fn new(frequency_hz: u16, millis: u64, waveform: Waveform, gain: f32) -> Tone {
        Tone {
            frequency_hz,
            duration: Duration::from_millis(millis),
            waveform,
            gain,
        }
    }

    /// Synthesize the tone as mono samples at `sample_rate` samples per
    /// second
    #[cfg(any(test, feature = "audio"))]
    pub(crate) fn render(self, sample_rate: u16) -> Vec<f32> {
        let count = self.duration.as_millis() * u128::from(sample_rate) / 1000;
        let count = usize::try_from(count).unwrap_or_default();
        let step = f32::from(self.frequency_hz) / f32::from(sample_rate);
        let mut phase = 0.0_f32;
        let mut samples = Vec::with_capacity(count);
        for _ in 0..count {
            samples.push(self.waveform.sample(phase) * self.gain);
            phase = (phase + step).fract();
        }
        samples
    }
}

pub(crate) trait FeedbackSink {
    fn deliver(&mut self, signal: Signal, now: Instant);

    fn set_enabled(&mut self, enabled: bool);
}

/// Whichever audio sink is available
#[derive(Debug)]
pub(crate) enum Speaker<W> {
    #[cfg(feature = "audio")]
    Synth(Synth),
    Bell(Bell<W>),
}

impl<W: Write> Speaker<W> {
    /// Open the default audio output device.  If there isn't one, the
    /// terminal bell is rung on `out` instead.
    #[cfg(feature = "audio")]
    pub(crate) fn open(out: W, enabled: bool) -> Speaker<W> {
        match Synth::open(enabled) {
            Ok(synth) => Speaker::Synth(synth),
            Err(e) => {
                log::warn!(
                    "No audio output available; falling back to terminal bell: {}",
                    error_chain(&e)
                );
                Speaker::Bell(Bell::new(out, enabled))
            }
        }
    }

    #[cfg(not(feature = "audio"))]
    pub(crate) fn open(out: W, enabled: bool) -> Speaker<W> {
        Speaker::Bell(Bell::new(out, enabled))
    }
}

impl<W: Write> FeedbackSink for Speaker<W> {
    fn deliver(&mut self, signal: Signal, now: Instant) {
        match self {
            #[cfg(feature = "audio")]
            Speaker::Synth(synth) => synth.deliver(signal, now),
            Speaker::Bell(bell) => bell.deliver(signal, now),
        }
    }

    fn set_enabled(&mut self, enabled: bool) {
        match self {
            #[cfg(feature = "audio")]
            Speaker::Synth(synth) => synth.set_enabled(enabled),
            Speaker::Bell(bell) => bell.set_enabled(enabled),
        }
    }
}

/// Audio sink that plays each signal's [`Tone`] on the default output device
#[cfg(feature = "audio")]
pub(crate) struct Synth {
    // Sound stops once the stream is dropped
    _stream: OutputStream,
    handle: OutputStreamHandle,
    enabled: bool,
}

#[cfg(feature = "audio")]
impl Synth {
    const SAMPLE_RATE: u16 = 44_100;

    pub(crate) fn open(enabled: bool) -> Result<Synth, rodio::StreamError> {
        let (stream, handle) = OutputStream::try_default()?;
        log::debug!("Opened audio output stream");
        Ok(Synth {
            _stream: stream,
            handle,
            enabled,
        })
    }

    fn play(&self, tone: Tone) {
        match Sink::try_new(&self.handle) {
            Ok(sink) => {
                sink.append(SamplesBuffer::new(
                    1,
                    u32::from(Self::SAMPLE_RATE),
                    tone.render(Self::SAMPLE_RATE),
                ));
                sink.detach();
            }
            Err(e) => log::debug!("Could not play {} Hz tone: {e}", tone.frequency_hz),
        }
    }
}

#[cfg(feature = "audio")]
impl fmt::Debug for Synth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Synth")
            .field("enabled", &self.enabled)
            .finish_non_exhaustive()
    }
}

#[cfg(feature = "audio")]
impl FeedbackSink for Synth {
    fn deliver(&mut self, signal: Signal, _now: Instant) {
        if self.enabled {
            self.play(signal.tone());
        }
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
}

/// Audio sink that rings the terminal bell, for when there is no audio
/// device.  A bell can't do pitch, so every [`Tone`] sounds alike.
#[derive(Debug)]
pub(crate) struct Bell<W> {
    out: W,
    enabled: bool,
}

impl<W: Write> Bell<W> {
    pub(crate) fn new(out: W, enabled: bool) -> Bell<W> {
        Bell { out, enabled }
    }

    fn ring(&mut self, tone: Tone) {
        log::trace!(
            "Bell for {} Hz {:?} tone ({:?}, gain {})",
            tone.frequency_hz,
            tone.waveform,
            tone.duration,
            tone.gain
        );
        if let Err(e) = self.out.write_all(b"\x07").and_then(|()| self.out.flush()) {
            log::debug!("Could not ring terminal bell: {e}");
        }
    }
}

impl<W: Write> FeedbackSink for Bell<W> {
    fn deliver(&mut self, signal: Signal, _now: Instant) {
        if self.enabled {
            self.ring(signal.tone());
        }
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
}

/// Haptic sink for a terminal: briefly highlights the board border
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Flash {
    until: Option<Instant>,
    enabled: bool,
}

impl Flash {
    pub(crate) fn new(enabled: bool) -> Flash {
        Flash {
            until: None,
            enabled,
        }
    }

    /// Test whether the highlight should be shown at time `now`
    pub(crate) fn active(&self, now: Instant) -> bool {
        self.until.is_some_and(|until| now < until)
    }
}

impl FeedbackSink for Flash {
    fn deliver(&mut self, signal: Signal, now: Instant) {
        if !self.enabled {
            return;
        }
        // Pulses of a few milliseconds would never survive to the next frame
        if let Some(pulse) = signal.pulse() {
            self.until = Some(now + pulse.max(consts::FLASH_PERIOD));
        }
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.until = None;
        }
    }
}
