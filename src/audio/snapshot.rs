use super::voice::{NUM_VOICES, Voice};

/// Plain copy of engine state, published once per device callback. This is
/// the only channel from the audio thread to the rest of the program; the
/// consumer never holds a reference into engine-owned memory.
///
/// The energies are per-callback mean |sample| gated on which voice was
/// audible, a cheap stand-in for a spectral split. Good enough to drive
/// smoothed visuals, not analysis.
#[derive(Clone, Copy, Debug, Default)]
pub struct Snapshot {
    pub voices: [Voice; NUM_VOICES],
    pub current_pattern: u32,
    pub current_row: u32,
    pub bpm: f32,
    pub bass_energy: f32,
    pub mid_energy: f32,
    pub high_energy: f32,
}
