//! Random-walk primitives for the mock telemetry tick.
//!
//! Each metric moves by a uniform delta per tick and is clamped into a fixed
//! band: a biased random walk with hard reflecting boundaries. There is no
//! trend persistence beyond the previous tick and no cross-metric
//! correlation.

use rand::Rng;

/// One step of a bounded walk: add a uniform delta in `[-spread/2, +spread/2)`,
/// clamp into `[min, max]`, round to the nearest integer.
pub fn bounded_step<R: Rng + ?Sized>(
    rng: &mut R,
    value: i64,
    spread: f64,
    min: f64,
    max: f64,
) -> i64 {
    let half = spread / 2.0;
    let next = (value as f64 + rng.random_range(-half..half)).clamp(min, max);
    next.round() as i64
}

/// Monotonic creep for eco-score figures: add a uniform increment in
/// `[0, max_step)` and round to one decimal.
pub fn creep<R: Rng + ?Sized>(rng: &mut R, value: f64, max_step: f64) -> f64 {
    round_one_decimal(value + rng.random_range(0.0..max_step))
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn bounded_step_stays_in_band() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut battery = 84;
        let mut solar = 850;
        for _ in 0..1000 {
            battery = bounded_step(&mut rng, battery, 2.0, 80.0, 90.0);
            solar = bounded_step(&mut rng, solar, 100.0, 800.0, 900.0);
            assert!((80..=90).contains(&battery), "battery escaped: {battery}");
            assert!((800..=900).contains(&solar), "solar escaped: {solar}");
        }
    }

    #[test]
    fn bounded_step_reflects_at_edges() {
        let mut rng = StdRng::seed_from_u64(1);
        // Start outside the band on both sides; the first step must clamp in.
        assert!((80..=90).contains(&bounded_step(&mut rng, 200, 2.0, 80.0, 90.0)));
        assert!((80..=90).contains(&bounded_step(&mut rng, 0, 2.0, 80.0, 90.0)));
    }

    #[test]
    fn creep_never_decreases() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut value = 42.5;
        for _ in 0..1000 {
            let next = creep(&mut rng, value, 0.1);
            assert!(next >= value, "creep went backwards: {value} -> {next}");
            value = next;
        }
        assert!(value > 42.5);
    }

    #[test]
    fn creep_keeps_one_decimal() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut value = 28.3;
        for _ in 0..100 {
            value = creep(&mut rng, value, 0.05);
            let scaled = value * 10.0;
            assert!((scaled - scaled.round()).abs() < 1e-9, "not one decimal: {value}");
        }
    }
}
