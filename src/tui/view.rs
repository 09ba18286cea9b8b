use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Gauge, Paragraph};

/// Everything the view needs for one frame; main fills this from the sync
/// system's value/trigger queries, the TUI just draws it.
#[derive(Clone, Debug, Default)]
pub struct ViewState {
    pub playing: bool,
    pub scene: usize,
    pub pattern: i32,
    pub row: i32,
    pub bar: i32,
    pub beat_phase: f32,
    pub intensity: f32,
    pub bass: f32,
    pub mid: f32,
    pub high: f32,
    // 1.0 on the trigger frame, decayed towards 0 by main
    pub kick_flash: f32,
    pub snare_flash: f32,
    pub hihat_flash: f32,
    // instantaneous voice amplitudes from the last snapshot
    pub voice_levels: [f32; 4],
    pub master_volume: f32,
    pub resonance: f32,
}

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // transport readout
            Constraint::Length(3), // intensity
            Constraint::Length(3), // bass
            Constraint::Length(3), // mid
            Constraint::Length(3), // high
            Constraint::Length(3), // percussive flashes
            Constraint::Min(1),    // help line
        ])
        .split(area);

    draw_transport(frame, sections[0], state);
    draw_band(frame, sections[1], "intensity", state.intensity, Color::White);
    draw_band(frame, sections[2], "bass", state.bass, Color::Red);
    draw_band(frame, sections[3], "mid", state.mid, Color::Yellow);
    draw_band(frame, sections[4], "high", state.high, Color::Cyan);
    draw_flashes(frame, sections[5], state);
    draw_help(frame, sections[6]);
}

fn draw_transport(frame: &mut Frame, area: Rect, state: &ViewState) {
    let status = if state.playing { "PLAYING" } else { "PAUSED" };
    let [kick, snare, mid, high] = state.voice_levels;
    let text = format!(
        "{status}   scene {}   pattern {}   row {:02}   bar {}   beat {:.2}\n\
         vol {:.2}   reso {:.2}\n\
         voices  kick {kick:.2}  snare {snare:.2}  mid {mid:.2}  high {high:.2}",
        state.scene, state.pattern, state.row, state.bar, state.beat_phase,
        state.master_volume, state.resonance,
    );
    let p = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title(" pulsebox "));
    frame.render_widget(p, area);
}

fn draw_band(frame: &mut Frame, area: Rect, label: &str, level: f32, color: Color) {
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(label.to_string()))
        .gauge_style(Style::default().fg(color))
        .ratio(level.clamp(0.0, 1.0) as f64);
    frame.render_widget(gauge, area);
}

fn draw_flashes(frame: &mut Frame, area: Rect, state: &ViewState) {
    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    draw_flash(frame, cells[0], "KICK", state.kick_flash);
    draw_flash(frame, cells[1], "SNARE", state.snare_flash);
    draw_flash(frame, cells[2], "HAT", state.hihat_flash);
}

fn draw_flash(frame: &mut Frame, area: Rect, label: &str, level: f32) {
    let style = if level > 0.5 {
        Style::default()
            .fg(Color::Black)
            .bg(Color::White)
            .add_modifier(Modifier::BOLD)
    } else if level > 0.05 {
        Style::default().fg(Color::Gray)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let p = Paragraph::new(label.to_string())
        .style(style)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(p, area);
}

fn draw_help(frame: &mut Frame, area: Rect) {
    let p = Paragraph::new("space play/pause   t transition   [/] volume   -/= resonance   q quit")
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(p, area);
}
