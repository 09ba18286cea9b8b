// Offline render: run the engine off the device and write the track to a
// WAV, so the composition can be checked without audio hardware.

use std::path::Path;

use anyhow::Context;

use crate::audio::engine::AudioEngine;
use crate::audio_api::AudioCommand;
use crate::config::Config;

const SAMPLE_RATE: u32 = 44_100;

pub fn render_wav(path: &Path, seconds: f32, config: &Config) -> anyhow::Result<()> {
    let spec = hound::WavSpec {
        channels: 2,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec)
        .with_context(|| format!("creating {}", path.display()))?;

    let mut engine = AudioEngine::new(SAMPLE_RATE as f32);
    engine.handle_cmd(AudioCommand::SetMasterVolume(config.master_volume));
    engine.handle_cmd(AudioCommand::SetResonance(config.resonance));

    let total = (seconds.max(0.0) * SAMPLE_RATE as f32) as usize;
    for _ in 0..total {
        let s = engine.next_sample();
        let q = (s * i16::MAX as f32) as i16;
        // same sample on both channels, like the live output
        writer.write_sample(q)?;
        writer.write_sample(q)?;
    }

    writer.finalize()?;
    Ok(())
}
