// Stateless waveform building blocks. Everything takes a phase in radians;
// callers own phase accumulation and wrapping.

use rand::Rng;
use rand_pcg::Pcg32;

pub const TWO_PI: f32 = std::f32::consts::TAU;

pub fn sine(phase: f32) -> f32 {
    phase.sin()
}

// 50% duty, +-1, period 2pi
pub fn square(phase: f32) -> f32 {
    let wrapped = phase.rem_euclid(TWO_PI);
    if wrapped < std::f32::consts::PI { 1.0 } else { -1.0 }
}

// linear ramp -1..1 over one period
pub fn sawtooth(phase: f32) -> f32 {
    (2.0 * phase.rem_euclid(TWO_PI) / TWO_PI) - 1.0
}

// White noise in [-1, 1]. The generator is a seeded Pcg32 owned by the
// engine, so the noise stream is deterministic and never touches the OS
// inside the audio callback.
pub fn noise(rng: &mut Pcg32) -> f32 {
    rng.gen_range(-1.0f32..=1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn square_is_half_duty() {
        assert_eq!(square(0.1), 1.0);
        assert_eq!(square(std::f32::consts::PI + 0.1), -1.0);
        // wraps past one period
        assert_eq!(square(TWO_PI + 0.1), 1.0);
    }

    #[test]
    fn sawtooth_ramps_across_period() {
        assert!((sawtooth(0.0) - (-1.0)).abs() < 1e-6);
        assert!(sawtooth(std::f32::consts::PI).abs() < 1e-6);
        assert!(sawtooth(TWO_PI - 1e-3) > 0.99);
    }

    #[test]
    fn noise_stays_in_range() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..1000 {
            let n = noise(&mut rng);
            assert!((-1.0..=1.0).contains(&n));
        }
    }
}
