use std::f32::consts::PI;

/// Two-pole resonant low-pass with persistent history. Coefficients are
/// recomputed on every sample on purpose: cutoff is modulated continuously
/// by the sequencer's scene signal, so caching them would buy nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct ResonantFilter {
    x1: f32,
    x2: f32,
    y1: f32,
    y2: f32,
}

impl ResonantFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Run one sample through the filter. `cutoff` is in Hz, `resonance`
    /// is the Q factor. Cutoff is clamped to a safe normalized range
    /// before use, so any reachable input is defined.
    pub fn process(&mut self, input: f32, cutoff: f32, resonance: f32, sample_rate: f32) -> f32 {
        let freq = (cutoff / sample_rate).clamp(0.001, 0.49);
        let q = resonance;

        let d = (PI * freq).tan();
        let c = 1.0 / (1.0 + d * q + d * d);

        let a0 = d * d * c;
        let a1 = 2.0 * a0;
        let a2 = a0;
        let b1 = 2.0 * (d * d - 1.0) * c;
        let b2 = (1.0 - d * q + d * d) * c;

        let output = a0 * input + a1 * self.x1 + a2 * self.x2 - b1 * self.y1 - b2 * self.y2;

        self.x2 = self.x1;
        self.x1 = input;
        self.y2 = self.y1;
        self.y1 = output;

        output
    }
}
