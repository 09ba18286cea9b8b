use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};

// what the visualizer loop can ask for; resolved here so main just matches
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    Quit,
    TogglePlay,
    /// start a previous->current blend in the sync system
    Transition,
    MasterVolume(f32),
    Resonance(f32),
}

pub fn poll_input(timeout: Duration) -> anyhow::Result<Vec<InputEvent>> {
    if !event::poll(timeout)? {
        return Ok(vec![]);
    }

    if let Event::Key(key) = event::read()? {
        if key.kind != KeyEventKind::Press {
            return Ok(vec![]);
        }
        return Ok(handle_key(key.code));
    }
    Ok(vec![])
}

fn handle_key(code: KeyCode) -> Vec<InputEvent> {
    match code {
        KeyCode::Esc | KeyCode::Char('q') => vec![InputEvent::Quit],
        KeyCode::Char(' ') => vec![InputEvent::TogglePlay],
        KeyCode::Char('t') => vec![InputEvent::Transition],

        // knob-style nudges
        KeyCode::Char('[') => vec![InputEvent::MasterVolume(-0.05)],
        KeyCode::Char(']') => vec![InputEvent::MasterVolume(0.05)],
        KeyCode::Char('-') => vec![InputEvent::Resonance(-0.1)],
        KeyCode::Char('=') => vec![InputEvent::Resonance(0.1)],

        _ => vec![],
    }
}
