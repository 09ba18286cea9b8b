use anyhow::Context;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use crossbeam_channel::{Receiver, Sender};

use crate::audio_api::AudioCommand;

pub mod engine;
pub mod filter;
pub mod scene;
pub mod sequencer;
pub mod snapshot;
pub mod voice;
pub mod waveform;

use engine::AudioEngine;
pub use snapshot::Snapshot;

/// Handle owned by the consumer side. Dropping it tears down the stream.
pub struct AudioHandle {
    tx: Sender<AudioCommand>,
    snapshot_rx: Receiver<Snapshot>,
    _stream: cpal::Stream,
}

impl AudioHandle {
    pub fn send(&self, cmd: AudioCommand) {
        let _ = self.tx.try_send(cmd);
    }

    /// Most recent snapshot the callback has published, if any arrived
    /// since the last call. The channel is bounded and the producer drops
    /// on overflow, so a slow consumer only ever sees bounded staleness —
    /// it never blocks the audio thread.
    pub fn latest_snapshot(&self) -> Option<Snapshot> {
        let mut latest = None;
        while let Ok(snap) = self.snapshot_rx.try_recv() {
            latest = Some(snap);
        }
        latest
    }
}

pub fn start_audio(master_volume: f32, resonance: f32) -> anyhow::Result<AudioHandle> {
    let (tx, rx) = crossbeam_channel::bounded::<AudioCommand>(256);
    let (snapshot_tx, snapshot_rx) = crossbeam_channel::bounded::<Snapshot>(8);

    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .context("no default output device")?;
    let config = device
        .default_output_config()
        .context("no default output config")?;

    let channels = config.channels() as usize;

    match config.sample_format() {
        cpal::SampleFormat::F32 => {
            let stream = build_output_stream_f32(
                &device,
                &config.into(),
                rx,
                snapshot_tx,
                channels,
                master_volume,
                resonance,
            )?;
            stream.play().context("failed to play output stream")?;

            Ok(AudioHandle {
                tx,
                snapshot_rx,
                _stream: stream,
            })
        }
        other => anyhow::bail!("unsupported sample format {other:?} (only f32 for now)"),
    }
}

fn build_output_stream_f32(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    rx: Receiver<AudioCommand>,
    snapshot_tx: Sender<Snapshot>,
    channels: usize,
    master_volume: f32,
    resonance: f32,
) -> anyhow::Result<cpal::Stream> {
    let mut engine = AudioEngine::new(config.sample_rate as f32);
    engine.handle_cmd(AudioCommand::SetMasterVolume(master_volume));
    engine.handle_cmd(AudioCommand::SetResonance(resonance));

    let err_fn = |err| eprintln!("audio output stream error: {err}");

    let stream = device.build_output_stream(
        config,
        move |data: &mut [f32], _info| {
            while let Ok(cmd) = rx.try_recv() {
                engine.handle_cmd(cmd);
            }

            let snapshot = engine.render_block(data, channels);

            // dropped on overflow rather than blocking the callback
            let _ = snapshot_tx.try_send(snapshot);
        },
        err_fn,
        None,
    )?;

    Ok(stream)
}
