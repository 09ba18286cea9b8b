use rand_pcg::Pcg32;

use super::waveform::{self, TWO_PI};

pub const NUM_VOICES: usize = 4;

// fixed voice layout; the sequencer triggers by index
pub const KICK: usize = 0;
pub const SNARE: usize = 1;
pub const LEAD_MID: usize = 2;
pub const LEAD_HIGH: usize = 3;

/// What a voice slot sounds like. Roles are fixed at init; there is no
/// patch switching.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VoiceRole {
    #[default]
    Kick,
    Snare,
    LeadMid,
    LeadHigh,
}

impl VoiceRole {
    // per-sample geometric amplitude decay; every voice is percussive,
    // there is no sustain stage
    fn decay_rate(self) -> f32 {
        match self {
            VoiceRole::Kick => 0.998,
            VoiceRole::Snare => 0.992,
            VoiceRole::LeadMid | VoiceRole::LeadHigh => 0.9995,
        }
    }
}

/// One oscillator voice. `amplitude == 0.0` means idle; idle voices cost
/// nothing beyond the check.
#[derive(Clone, Copy, Debug, Default)]
pub struct Voice {
    pub role: VoiceRole,
    pub frequency: f32,
    pub amplitude: f32,
    pub phase: f32,
    pub phase_increment: f32,
}

// amplitudes below this snap to exactly zero so silence is exact
const SILENCE_FLOOR: f32 = 0.001;

impl Voice {
    pub fn new(role: VoiceRole) -> Self {
        Self {
            role,
            frequency: 440.0,
            amplitude: 0.0,
            phase: 0.0,
            phase_increment: 0.0,
        }
    }

    // unconditional retrigger: phase resets, no legato
    pub fn note_on(&mut self, frequency: f32, amplitude: f32) {
        self.frequency = frequency;
        self.amplitude = amplitude;
        self.phase = 0.0;
        self.phase_increment = frequency;
    }

    // hard mute, not a release envelope
    pub fn note_off(&mut self) {
        self.amplitude = 0.0;
    }

    pub fn is_active(&self) -> bool {
        self.amplitude > 0.0
    }

    /// Produce one sample, then advance phase and decay amplitude.
    pub fn sample(&mut self, dt: f32, rng: &mut Pcg32) -> f32 {
        if self.amplitude <= 0.0 {
            return 0.0;
        }

        let wave = match self.role {
            VoiceRole::Kick => {
                // pitch drop and amplitude decay are both baked into the
                // phase, no separate envelope generator
                waveform::sine(self.phase * 0.3) * (-self.phase * 3.0).exp()
            }
            VoiceRole::Snare => {
                waveform::noise(rng) * 0.5 + waveform::square(self.phase * 8.0) * 0.5
            }
            VoiceRole::LeadMid => {
                // fixed 3-voice unison detune
                let a = waveform::sawtooth(self.phase);
                let b = waveform::sawtooth(self.phase + 0.02);
                let c = waveform::sawtooth(self.phase - 0.02);
                (a + b + c) / 3.0
            }
            VoiceRole::LeadHigh => {
                // pulse with slowly wandering duty, blended with an octave sine
                let pw = 0.5 + 0.3 * waveform::sine(self.phase * 0.1);
                let pulse = if self.phase.rem_euclid(TWO_PI) < TWO_PI * pw {
                    1.0
                } else {
                    -1.0
                };
                pulse * 0.6 + waveform::sine(self.phase * 2.0) * 0.4
            }
        };

        let out = wave * self.amplitude;

        self.phase += TWO_PI * self.phase_increment * dt;
        if self.phase >= TWO_PI {
            self.phase -= TWO_PI;
        }

        self.amplitude *= self.role.decay_rate();
        if self.amplitude < SILENCE_FLOOR {
            self.amplitude = 0.0;
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(42)
    }

    #[test]
    fn decay_snaps_to_exact_zero() {
        let mut rng = rng();
        for role in [
            VoiceRole::Kick,
            VoiceRole::Snare,
            VoiceRole::LeadMid,
            VoiceRole::LeadHigh,
        ] {
            let mut v = Voice::new(role);
            v.note_on(220.0, 0.5);
            // just under the floor once decay is applied
            v.amplitude = SILENCE_FLOOR * 0.999;
            v.sample(1.0 / 44_100.0, &mut rng);
            assert_eq!(v.amplitude, 0.0, "{:?} did not snap", role);
            assert!(!v.is_active());
        }
    }

    #[test]
    fn note_off_silences_immediately() {
        let mut rng = rng();
        let mut v = Voice::new(VoiceRole::LeadMid);
        v.note_on(440.0, 0.5);
        v.sample(1.0 / 44_100.0, &mut rng); // accumulate some phase
        v.note_off();
        assert_eq!(v.amplitude, 0.0);
        assert_eq!(v.sample(1.0 / 44_100.0, &mut rng), 0.0);
    }

    #[test]
    fn note_on_resets_phase_and_retriggers() {
        let mut rng = rng();
        let mut v = Voice::new(VoiceRole::LeadHigh);
        v.note_on(440.0, 0.5);
        for _ in 0..100 {
            v.sample(1.0 / 44_100.0, &mut rng);
        }
        assert!(v.phase > 0.0);
        v.note_on(330.0, 0.3);
        assert_eq!(v.phase, 0.0);
        assert_eq!(v.frequency, 330.0);
        assert_eq!(v.phase_increment, 330.0);
        assert_eq!(v.amplitude, 0.3);
    }

    #[test]
    fn amplitude_only_decays_once_triggered() {
        let mut rng = rng();
        let mut v = Voice::new(VoiceRole::Kick);
        v.note_on(55.0, 0.8);
        let mut last = v.amplitude;
        for _ in 0..2000 {
            v.sample(1.0 / 44_100.0, &mut rng);
            assert!(v.amplitude <= last);
            last = v.amplitude;
        }
    }

    #[test]
    fn phase_stays_wrapped() {
        let mut rng = rng();
        let mut v = Voice::new(VoiceRole::LeadMid);
        v.note_on(880.0, 0.5);
        for _ in 0..10_000 {
            v.sample(1.0 / 44_100.0, &mut rng);
            assert!(v.phase >= 0.0 && v.phase < TWO_PI);
        }
    }
}
