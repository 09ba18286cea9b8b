mod audio;
mod audio_api;
mod config;
mod render;
mod sync;
mod tui;

use std::path::PathBuf;
use std::time::Instant;

use crossterm::terminal;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use audio::Snapshot;
use audio::scene::{NUM_SCENES, SCENE_LEN_SECS};
use audio_api::AudioCommand;
use sync::SyncSystem;
use tui::input::InputEvent;
use tui::{ViewState, poll_input};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();

    // offline path: `pulsebox --render out.wav [seconds]`
    if args.get(1).map(String::as_str) == Some("--render") {
        let path = args
            .get(2)
            .map(PathBuf::from)
            .ok_or_else(|| anyhow::anyhow!("usage: pulsebox --render <out.wav> [seconds]"))?;
        let seconds: f32 = match args.get(3) {
            Some(s) => s.parse()?,
            None => SCENE_LEN_SECS * NUM_SCENES as f32, // one full scene cycle
        };
        let cfg = config::load_config(&work_dir()).unwrap_or_default();
        render::render_wav(&path, seconds, &cfg)?;
        println!("wrote {seconds}s to {}", path.display());
        return Ok(());
    }

    let dir = work_dir();
    let mut cfg = config::load_config(&dir).unwrap_or_default();

    // the engine lives inside the stream callback from here on; we only
    // talk to it through the handle
    let audio = audio::start_audio(cfg.master_volume, cfg.resonance)?;

    terminal::enable_raw_mode()?;
    let _guard = RawModeGuard; // auto drops when out of scope

    let backend = CrosstermBackend::new(std::io::stdout());
    let mut term = Terminal::new(backend)?;
    term.clear()?;

    let tick_rate = std::time::Duration::from_millis(16); // ~60fps
    let mut last_tick = Instant::now();

    let mut sync = SyncSystem::new();
    let mut last_snapshot: Option<Snapshot> = None;
    let mut playing = true;
    let mut view = ViewState {
        playing,
        master_volume: cfg.master_volume,
        resonance: cfg.resonance,
        ..ViewState::default()
    };

    loop {
        let dt = last_tick.elapsed().as_secs_f32();
        last_tick = Instant::now();

        if let Some(snap) = audio.latest_snapshot() {
            last_snapshot = Some(snap);
        }
        sync.update(last_snapshot.as_ref(), dt);

        // flashes snap to full on the trigger frame and fade out after
        for (name, flash) in [
            ("kick", &mut view.kick_flash),
            ("snare", &mut view.snare_flash),
            ("hihat", &mut view.hihat_flash),
        ] {
            if sync.get_trigger(name) {
                *flash = 1.0;
            } else {
                *flash = (*flash - dt * 4.0).max(0.0);
            }
        }

        view.playing = playing;
        view.intensity = sync.get_value("intensity");
        view.bass = sync.get_value("bass");
        view.mid = sync.get_value("mid");
        view.high = sync.get_value("high");
        view.beat_phase = sync.get_value("beat");
        view.bar = sync.get_value("bar") as i32;
        view.pattern = sync.get_value("pattern") as i32;
        view.row = sync.current().row;
        if let Some(snap) = &last_snapshot {
            for (level, voice) in view.voice_levels.iter_mut().zip(&snap.voices) {
                *level = voice.amplitude;
            }
        }
        // same scene formula the audio side uses, from our own clock
        view.scene = (sync.get_value("time") / SCENE_LEN_SECS) as usize % NUM_SCENES;

        term.draw(|frame| {
            tui::render(frame, frame.area(), &view);
        })?;

        for event in poll_input(tick_rate)? {
            match event {
                InputEvent::Quit => {
                    let _ = config::save_config(&dir, &cfg);
                    drop(term);
                    return Ok(());
                }
                InputEvent::TogglePlay => {
                    playing = !playing;
                    audio.send(AudioCommand::SetPlaying(playing));
                }
                InputEvent::Transition => sync.start_transition(2.0),
                InputEvent::MasterVolume(delta) => {
                    cfg.master_volume = (cfg.master_volume + delta).clamp(0.0, 1.0);
                    view.master_volume = cfg.master_volume;
                    audio.send(AudioCommand::SetMasterVolume(cfg.master_volume));
                }
                InputEvent::Resonance(delta) => {
                    cfg.resonance = (cfg.resonance + delta).clamp(0.0, 2.0);
                    view.resonance = cfg.resonance;
                    audio.send(AudioCommand::SetResonance(cfg.resonance));
                }
            }
        }
    }
}

fn work_dir() -> PathBuf {
    std::env::current_dir().unwrap_or_default()
}

struct RawModeGuard;
impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}
