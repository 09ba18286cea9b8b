use super::scene::{self, CHORD_ROOTS, SCENE_LEN_SECS};
use super::voice::{KICK, NUM_VOICES, SNARE, Voice};

pub const ROWS_PER_PATTERN: u32 = 64;
pub const NUM_PATTERNS: u32 = 8;
pub const DEFAULT_BPM: f32 = 140.0;

/// Filter settings produced by a row transition; the engine holds them
/// until the next row.
#[derive(Clone, Copy, Debug)]
pub struct RowTick {
    pub cutoff: f32,
    /// 1.0 on every 4th row, 0.5 otherwise; a crude per-row accent
    pub filter_env: f32,
}

/// Musical time. A row is the indivisible scheduling unit; 64 rows make a
/// pattern, 8 patterns cycle. Scene selection runs on a second clock
/// (12 s wall-clock windows) that is independent of the row counters.
#[derive(Clone, Copy, Debug)]
pub struct Sequencer {
    pub sample_rate: f32,
    pub time: f32,
    pub bpm: f32,
    pub playing: bool,
    pub current_pattern: u32,
    pub current_row: u32,
    pub pattern_time: f32,
}

impl Sequencer {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            time: 0.0,
            bpm: DEFAULT_BPM,
            playing: true,
            current_pattern: 0,
            current_row: 0,
            pattern_time: 0.0,
        }
    }

    pub fn row_duration(&self) -> f32 {
        60.0 / (self.bpm * 4.0)
    }

    pub fn scene(&self) -> usize {
        (self.time / SCENE_LEN_SECS) as usize % scene::NUM_SCENES
    }

    pub fn scene_time(&self) -> f32 {
        self.time % SCENE_LEN_SECS
    }

    /// Advance musical time by `dt`. On a row boundary, fire the scene's
    /// notes into `voices` and return the new filter settings.
    pub fn advance(&mut self, dt: f32, voices: &mut [Voice; NUM_VOICES]) -> Option<RowTick> {
        if !self.playing {
            return None;
        }

        self.time += dt;
        self.pattern_time += dt;

        if self.pattern_time < self.row_duration() {
            return None;
        }
        self.pattern_time = 0.0;

        self.current_row += 1;
        if self.current_row >= ROWS_PER_PATTERN {
            self.current_row = 0;
            self.current_pattern = (self.current_pattern + 1) % NUM_PATTERNS;
        }

        Some(self.dispatch_row(voices))
    }

    /// Apply the active scene's rules for the current row. Pure table
    /// dispatch; exposed for tests so the arrangement can be checked
    /// without sample generation.
    pub fn dispatch_row(&self, voices: &mut [Voice; NUM_VOICES]) -> RowTick {
        let spec = &scene::SCENES[self.scene()];
        let row = self.current_row;
        let scene_time = self.scene_time();
        let progress = scene_time / SCENE_LEN_SECS;
        let root = CHORD_ROOTS[((row / 16) % 4) as usize];

        if let Some(hit) = spec.kick {
            if row % 4 == 0 {
                voices[KICK].note_on(hit.freq, hit.amp);
            }
        }
        if let Some(hit) = spec.snare {
            if row % 8 == 4 {
                voices[SNARE].note_on(hit.freq, hit.amp);
            }
        }

        for line in spec.lines {
            if let Some(idx) = line.gate.fire(row, line.notes.len()) {
                let freq = line.frequency(idx, root);
                let amp = line.amp.level(row, progress);
                voices[line.voice].note_on(freq, amp);
            }
        }

        RowTick {
            cutoff: spec.cutoff.value(scene_time, row),
            filter_env: if row % 4 == 0 { 1.0 } else { 0.5 },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::voice::{LEAD_HIGH, LEAD_MID, VoiceRole};

    fn voices() -> [Voice; NUM_VOICES] {
        [
            Voice::new(VoiceRole::Kick),
            Voice::new(VoiceRole::Snare),
            Voice::new(VoiceRole::LeadMid),
            Voice::new(VoiceRole::LeadHigh),
        ]
    }

    #[test]
    fn row_duration_at_140_bpm() {
        let seq = Sequencer::new(44_100.0);
        assert!((seq.row_duration() - 60.0 / 560.0).abs() < 1e-6);
    }

    #[test]
    fn one_row_duration_advances_one_row() {
        let mut seq = Sequencer::new(44_100.0);
        let mut v = voices();
        let tick = seq.advance(seq.row_duration(), &mut v);
        assert!(tick.is_some());
        assert_eq!(seq.current_row, 1);
        assert_eq!(seq.current_pattern, 0);
    }

    #[test]
    fn sixty_four_rows_flip_the_pattern() {
        let mut seq = Sequencer::new(44_100.0);
        let mut v = voices();
        let rd = seq.row_duration();
        for _ in 0..64 {
            seq.advance(rd, &mut v);
        }
        assert_eq!(seq.current_row, 0);
        assert_eq!(seq.current_pattern, 1);
        // and all the way around the 8-pattern cycle
        for _ in 0..64 * 7 {
            seq.advance(rd, &mut v);
        }
        assert_eq!(seq.current_pattern, 0);
    }

    #[test]
    fn paused_sequencer_freezes_time() {
        let mut seq = Sequencer::new(44_100.0);
        seq.playing = false;
        let mut v = voices();
        assert!(seq.advance(1.0, &mut v).is_none());
        assert_eq!(seq.time, 0.0);
        assert_eq!(seq.current_row, 0);
    }

    #[test]
    fn scene_windows_are_twelve_seconds() {
        let mut seq = Sequencer::new(44_100.0);
        assert_eq!(seq.scene(), 0);
        seq.time = 12.5;
        assert_eq!(seq.scene(), 1);
        seq.time = 59.0;
        assert_eq!(seq.scene(), 4);
        // wraps back around after all five
        seq.time = 61.0;
        assert_eq!(seq.scene(), 0);
    }

    #[test]
    fn intro_scene_has_no_drums() {
        let mut seq = Sequencer::new(44_100.0);
        let mut v = voices();
        seq.current_row = 0; // kick row in any drummed scene
        seq.dispatch_row(&mut v);
        assert!(!v[KICK].is_active());
        assert!(!v[SNARE].is_active());
        // but the arp fired
        assert!(v[LEAD_MID].is_active());
    }

    #[test]
    fn drummed_scene_triggers_kick_and_snare() {
        let mut seq = Sequencer::new(44_100.0);
        seq.time = 13.0; // scene 1
        let mut v = voices();
        seq.current_row = 0;
        seq.dispatch_row(&mut v);
        assert!(v[KICK].is_active());
        assert_eq!(v[KICK].frequency, 55.0);

        // snare rows are also kick rows by construction
        let mut v = voices();
        seq.current_row = 4;
        seq.dispatch_row(&mut v);
        assert!(v[KICK].is_active());
        assert!(v[SNARE].is_active());
        assert_eq!(v[SNARE].frequency, 200.0);

        // plain odd row triggers neither
        let mut v = voices();
        seq.current_row = 3;
        seq.dispatch_row(&mut v);
        assert!(!v[KICK].is_active());
        assert!(!v[SNARE].is_active());
    }

    #[test]
    fn scene0_arp_plays_even_rows_only() {
        let mut seq = Sequencer::new(44_100.0);
        let mut v = voices();
        seq.current_row = 0;
        seq.dispatch_row(&mut v);
        // root chord, unison offset -> arp lands on the chord root
        assert!((v[LEAD_MID].frequency - 220.0).abs() < 0.01);

        let mut v = voices();
        seq.current_row = 1;
        seq.dispatch_row(&mut v);
        assert!(!v[LEAD_MID].is_active());
    }

    #[test]
    fn scene0_low_pulse_lands_on_half_root() {
        let mut seq = Sequencer::new(44_100.0);
        let mut v = voices();
        seq.current_row = 32;
        seq.dispatch_row(&mut v);
        // row 32 -> chord index (32/16)%4 = 2
        let expect = CHORD_ROOTS[2] * 0.5;
        assert!((v[LEAD_HIGH].frequency - expect).abs() < 0.01);
        assert!((v[LEAD_HIGH].amplitude - 0.18).abs() < 1e-6);
    }

    #[test]
    fn scene3_arp_takes_over_after_row_32() {
        let mut seq = Sequencer::new(44_100.0);
        seq.time = 37.0; // scene 3
        let mut v = voices();
        seq.current_row = 33;
        seq.dispatch_row(&mut v);
        // arp offset table [0,3,7,12], row 33 -> idx 1 -> +3 semitones, two octaves up
        let expect = CHORD_ROOTS[2] * 2.0f32.powf(3.0 / 12.0) * 2.0;
        assert!((v[LEAD_HIGH].frequency - expect).abs() < 0.01);
        // amp ramps from 0.15 over the back half
        assert!((v[LEAD_HIGH].amplitude - (0.15 + (1.0 / 32.0) * 0.15)).abs() < 1e-5);
    }

    #[test]
    fn cutoff_recipes_follow_their_scene() {
        let mut seq = Sequencer::new(44_100.0);
        let mut v = voices();

        // scene 0 ramps with scene time
        seq.time = 6.0;
        seq.current_row = 1;
        let tick = seq.dispatch_row(&mut v);
        assert!((tick.cutoff - (400.0 + 6.0 * 200.0)).abs() < 0.5);

        // scene 2 is a plateau
        seq.time = 25.0;
        let tick = seq.dispatch_row(&mut v);
        assert_eq!(tick.cutoff, 2200.0);
    }

    #[test]
    fn filter_env_accents_every_fourth_row() {
        let mut seq = Sequencer::new(44_100.0);
        let mut v = voices();
        seq.current_row = 8;
        assert_eq!(seq.dispatch_row(&mut v).filter_env, 1.0);
        seq.current_row = 9;
        assert_eq!(seq.dispatch_row(&mut v).filter_env, 0.5);
    }
}
