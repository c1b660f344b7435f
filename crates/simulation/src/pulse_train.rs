//! Lazy single-carrier pulse train.

use crate::exponential;
use rand::Rng;
use snorp_types::{ModelParams, PulseGapEvent, RateRange};

/// Pull-based generator of (gap, pulse) pairs for one carrier.
///
/// Each step draws a detachment rate uniformly from the rate range, a gap
/// `Exp(rate)` and a pulse `Exp(capture_rate)`. The last pair is truncated so
/// the durations sum to exactly the requested duration: if the gap overruns,
/// it is cut to the remainder and the pulse forced to zero; otherwise an
/// overrunning pulse is cut to the remainder.
///
/// The train borrows its random stream; constructing a new train starts a new
/// realization.
pub struct PulseTrain<'a, R: Rng + ?Sized> {
    rng: &'a mut R,
    duration: f64,
    capture_rate: f64,
    rates: RateRange,
    elapsed: f64,
    finished: bool,
}

impl<'a, R: Rng + ?Sized> PulseTrain<'a, R> {
    /// Create a train covering `[0, duration]`.
    pub fn new(rng: &'a mut R, duration: f64, params: &ModelParams) -> Self {
        Self {
            rng,
            duration,
            capture_rate: params.capture_rate,
            rates: params.rates,
            elapsed: 0.0,
            finished: !(duration > 0.0),
        }
    }

    /// Time covered by the pairs yielded so far.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    fn draw_detachment_rate(&mut self) -> f64 {
        if self.rates.is_fixed() {
            self.rates.min()
        } else {
            self.rng.gen_range(self.rates.min()..=self.rates.max())
        }
    }
}

impl<R: Rng + ?Sized> Iterator for PulseTrain<'_, R> {
    type Item = PulseGapEvent;

    fn next(&mut self) -> Option<PulseGapEvent> {
        if self.finished {
            return None;
        }

        let detachment_rate = self.draw_detachment_rate();
        let mut gap = exponential(self.rng, detachment_rate);
        let mut pulse = exponential(self.rng, self.capture_rate);

        if self.elapsed + gap > self.duration {
            gap = (self.duration - self.elapsed).max(0.0);
            pulse = 0.0;
            self.finished = true;
        }
        self.elapsed += gap;

        if self.elapsed + pulse > self.duration {
            pulse = (self.duration - self.elapsed).max(0.0);
            self.finished = true;
        }
        self.elapsed += pulse;

        if self.elapsed >= self.duration {
            self.finished = true;
        }

        Some(PulseGapEvent::new(gap, pulse))
    }
}
