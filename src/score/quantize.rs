//! Time quantization onto the musical grid.

use super::settings::QuantizeUnit;

/// Snap a time in seconds to the nearest grid slot.
///
/// The slot length is `(60 / bpm) * (4 / unit)`. Quantizing an already
/// quantized value returns it unchanged.
pub fn quantize_time(t: f64, bpm: f64, unit: QuantizeUnit) -> f64 {
    let beat = 60.0 / bpm;
    let step = beat * (4.0 / unit.denominator() as f64);
    (t / step).round() * step
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn snaps_to_eighth_grid_at_120_bpm() {
        // Eighth note at 120 BPM is 0.25 s.
        assert_approx_eq!(quantize_time(0.26, 120.0, QuantizeUnit::Eighth), 0.25, 1e-12);
        assert_approx_eq!(quantize_time(0.1, 120.0, QuantizeUnit::Eighth), 0.0, 1e-12);
        assert_approx_eq!(quantize_time(0.38, 120.0, QuantizeUnit::Eighth), 0.5, 1e-12);
    }

    #[test]
    fn unit_controls_the_step() {
        assert_approx_eq!(
            quantize_time(0.26, 120.0, QuantizeUnit::Sixteenth),
            0.25,
            1e-12
        );
        assert_approx_eq!(
            quantize_time(0.19, 120.0, QuantizeUnit::Sixteenth),
            0.25,
            1e-12
        );
        assert_approx_eq!(quantize_time(0.7, 120.0, QuantizeUnit::Quarter), 0.5, 1e-12);
    }

    #[test]
    fn idempotent_over_a_dense_sweep() {
        for unit in [
            QuantizeUnit::Quarter,
            QuantizeUnit::Eighth,
            QuantizeUnit::Sixteenth,
            QuantizeUnit::ThirtySecond,
        ] {
            for bpm in [60.0, 113.0, 120.0, 178.5] {
                for i in 0..500 {
                    let t = i as f64 * 0.017;
                    let once = quantize_time(t, bpm, unit);
                    let twice = quantize_time(once, bpm, unit);
                    assert_eq!(once, twice, "bpm={bpm} unit={unit:?} t={t}");
                }
            }
        }
    }

    #[test]
    fn quantized_values_are_slot_multiples() {
        let step = 0.25; // eighth at 120 BPM
        for i in 0..200 {
            let t = i as f64 * 0.031;
            let q = quantize_time(t, 120.0, QuantizeUnit::Eighth);
            let slots = q / step;
            assert_approx_eq!(slots, slots.round(), 1e-9);
        }
    }

    #[test]
    fn negative_times_snap_symmetrically() {
        assert_approx_eq!(
            quantize_time(-0.26, 120.0, QuantizeUnit::Eighth),
            -0.25,
            1e-12
        );
    }
}
