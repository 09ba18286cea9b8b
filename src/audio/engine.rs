use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::audio_api::AudioCommand;

use super::filter::ResonantFilter;
use super::scene;
use super::sequencer::Sequencer;
use super::snapshot::Snapshot;
use super::voice::{KICK, LEAD_HIGH, LEAD_MID, NUM_VOICES, Voice, VoiceRole};
use super::waveform;

// a voice quieter than this doesn't count towards its energy bucket
const ENERGY_GATE: f32 = 0.01;

/// The synth. Owns the four voices, the sequencer, the filter and the
/// master bus. Lives inside the audio callback closure and is only ever
/// touched from that thread.
pub struct AudioEngine {
    pub voices: [Voice; NUM_VOICES],
    pub sequencer: Sequencer,
    filter: ResonantFilter,
    rng: Pcg32,
    pub master_volume: f32,
    filter_cutoff: f32,
    filter_resonance: f32,
    filter_env: f32,
}

impl AudioEngine {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            voices: [
                Voice::new(VoiceRole::Kick),
                Voice::new(VoiceRole::Snare),
                Voice::new(VoiceRole::LeadMid),
                Voice::new(VoiceRole::LeadHigh),
            ],
            sequencer: Sequencer::new(sample_rate),
            filter: ResonantFilter::new(),
            // fixed seed; the noise stream is part of the composition
            rng: Pcg32::seed_from_u64(0x9e3779b97f4a7c15),
            master_volume: 0.5,
            filter_cutoff: 2000.0,
            filter_resonance: 0.5,
            filter_env: 0.0,
        }
    }

    pub fn handle_cmd(&mut self, cmd: AudioCommand) {
        match cmd {
            AudioCommand::SetMasterVolume(v) => self.master_volume = v.clamp(0.0, 1.0),
            AudioCommand::SetResonance(q) => self.filter_resonance = q.clamp(0.0, 2.0),
            AudioCommand::SetPlaying(p) => {
                self.sequencer.playing = p;
                if !p {
                    // hard stop: mute the voices and drop the filter tail
                    for v in &mut self.voices {
                        v.note_off();
                    }
                    self.filter.reset();
                }
            }
        }
    }

    /// One sample of the whole engine: advance the sequencer, then mix,
    /// filter, clip. Always returns a value in [-1, 1].
    pub fn next_sample(&mut self) -> f32 {
        let dt = 1.0 / self.sequencer.sample_rate;
        if let Some(tick) = self.sequencer.advance(dt, &mut self.voices) {
            self.filter_cutoff = tick.cutoff;
            self.filter_env = tick.filter_env;
        }

        let mut sample = 0.0;
        for v in &mut self.voices {
            sample += v.sample(dt, &mut self.rng);
        }

        // the per-row accent envelope rides on top of the scene cutoff
        let cutoff = self.filter_cutoff * (1.0 + self.filter_env * 0.5);
        sample = self.filter.process(
            sample,
            cutoff,
            self.filter_resonance,
            self.sequencer.sample_rate,
        );

        // hat substitute: a sliver of noise on odd rows once drums are in
        let spec = &scene::SCENES[self.sequencer.scene()];
        if spec.hat && self.sequencer.current_row % 2 == 1 {
            sample += waveform::noise(&mut self.rng) * 0.04 * self.filter_env;
        }

        sample *= self.master_volume * 0.8;
        sample = (sample * 1.2).tanh() * 0.7;
        sample.clamp(-1.0, 1.0)
    }

    /// Fill one device block with interleaved frames and build the
    /// snapshot for it. Energy buckets accumulate |sample| gated per
    /// sample on the instantaneous amplitude of voices 0/2/3.
    pub fn render_block(&mut self, data: &mut [f32], channels: usize) -> Snapshot {
        let frames = data.len() / channels;
        let mut bass_sum = 0.0;
        let mut mid_sum = 0.0;
        let mut high_sum = 0.0;

        for frame in data.chunks_exact_mut(channels) {
            let s = self.next_sample();
            frame.fill(s);

            let mag = s.abs();
            if self.voices[KICK].amplitude > ENERGY_GATE {
                bass_sum += mag;
            }
            if self.voices[LEAD_MID].amplitude > ENERGY_GATE {
                mid_sum += mag;
            }
            if self.voices[LEAD_HIGH].amplitude > ENERGY_GATE {
                high_sum += mag;
            }
        }

        let n = frames.max(1) as f32;
        Snapshot {
            voices: self.voices,
            current_pattern: self.sequencer.current_pattern,
            current_row: self.sequencer.current_row,
            bpm: self.sequencer.bpm,
            bass_energy: bass_sum / n,
            mid_energy: mid_sum / n,
            high_energy: high_sum / n,
        }
    }
}
