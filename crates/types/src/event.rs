/// One step of a single-carrier pulse train: a gap (captured, baseline)
/// followed by a pulse (free, elevated).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PulseGapEvent {
    /// Duration of the gap.
    pub gap: f64,
    /// Duration of the pulse following the gap. Zero when the train ended mid-gap.
    pub pulse: f64,
}

impl PulseGapEvent {
    /// Create an event.
    pub fn new(gap: f64, pulse: f64) -> Self {
        Self { gap, pulse }
    }

    /// Total time covered by this event.
    pub fn duration(&self) -> f64 {
        self.gap + self.pulse
    }

    /// Whether the pulse has non-zero length.
    pub fn has_pulse(&self) -> bool {
        self.pulse > 0.0
    }
}
