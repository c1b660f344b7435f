//! Sampling a pulse train into a time series.

use snorp_types::PulseGapEvent;

/// Sample a gap/pulse train on the grid `t_start, t_start + t_step, …` (below `t_end`).
///
/// Returns `(time, level)` pairs where level is `magnitude` strictly inside a
/// pulse and `0` otherwise. The train is assumed to start at time zero.
pub fn sample_pulse_train(
    events: impl IntoIterator<Item = PulseGapEvent>,
    t_start: f64,
    t_end: f64,
    t_step: f64,
    magnitude: f64,
) -> Vec<(f64, f64)> {
    if !(t_step > 0.0) || t_end <= t_start {
        return Vec::new();
    }

    // (start, end) of every pulse
    let mut pulses = Vec::new();
    let mut clock = 0.0;
    for event in events {
        clock += event.gap;
        if event.has_pulse() {
            pulses.push((clock, clock + event.pulse));
        }
        clock += event.pulse;
    }

    let n_samples = ((t_end - t_start) / t_step).ceil() as usize;
    let mut series = Vec::with_capacity(n_samples);
    let mut cursor = 0;
    for i in 0..n_samples {
        let t = t_start + i as f64 * t_step;
        while cursor < pulses.len() && pulses[cursor].1 <= t {
            cursor += 1;
        }
        let level = match pulses.get(cursor) {
            Some(&(start, _)) if start < t => magnitude,
            _ => 0.0,
        };
        series.push((t, level));
    }
    series
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sketch_train() -> Vec<PulseGapEvent> {
        // pulses start at 1, 3.5 and 5
        vec![
            PulseGapEvent::new(1.0, 1.0),
            PulseGapEvent::new(1.5, 0.5),
            PulseGapEvent::new(1.0, 1.0),
        ]
    }

    fn level_at(series: &[(f64, f64)], t: f64) -> f64 {
        series
            .iter()
            .find(|(time, _)| (time - t).abs() < 1e-9)
            .map(|(_, level)| *level)
            .unwrap()
    }

    #[test]
    fn test_levels_follow_pulses() {
        let series = sample_pulse_train(sketch_train(), 0.0, 5.0, 0.25, 1.0);
        assert_eq!(series.len(), 20);
        assert_eq!(level_at(&series, 0.5), 0.0);
        assert_eq!(level_at(&series, 1.5), 1.0);
        assert_eq!(level_at(&series, 3.0), 0.0);
        assert_eq!(level_at(&series, 3.75), 1.0);
        assert_eq!(level_at(&series, 4.25), 0.0);
        // pulse edges are excluded
        assert_eq!(level_at(&series, 1.0), 0.0);
    }

    #[test]
    fn test_magnitude_scales_levels() {
        let series = sample_pulse_train(sketch_train(), 0.0, 7.0, 0.5, 2.5);
        let max = series.iter().map(|(_, v)| *v).fold(0.0, f64::max);
        assert_eq!(max, 2.5);
    }

    #[test]
    fn test_invalid_grid_is_empty() {
        assert!(sample_pulse_train(sketch_train(), 0.0, 1.0, 0.0, 1.0).is_empty());
        assert!(sample_pulse_train(sketch_train(), 2.0, 1.0, 0.1, 1.0).is_empty());
    }
}
