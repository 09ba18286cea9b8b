// Render-side timing. Re-derives musical position from its own wall
// clock, blends in the audio snapshot's energies, and answers the named
// queries the visuals pull every frame.
//
// The row/pattern here is a second clock, computed from elapsed time with
// the same formula the sequencer uses — deliberately not a read of the
// sequencer's own counters. The two track closely but are not guaranteed
// bit-identical under jitter.

use crate::audio::Snapshot;
use crate::audio::sequencer::{DEFAULT_BPM, NUM_PATTERNS, ROWS_PER_PATTERN};
use crate::audio::scene::{NUM_SCENES, SCENE_LEN_SECS};

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + t * (b - a)
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SyncData {
    pub time: f32,
    pub beat: f32,
    pub bar: i32,
    pub pattern: i32,
    pub row: i32,
    pub intensity: f32,
    pub bass: f32,
    pub mid: f32,
    pub high: f32,
    pub kick: bool,
    pub snare: bool,
    pub hihat: bool,
}

// energy scaling into the 0..1 visual range, and how fast each band chases
// its target
const BASS_SCALE: f32 = 8.0;
const MID_SCALE: f32 = 5.0;
const HIGH_SCALE: f32 = 3.0;
const BASS_SMOOTH: f32 = 0.35;
const MID_SMOOTH: f32 = 0.45;
const HIGH_SMOOTH: f32 = 0.5;

/// Current/previous pair of sync frames. `previous` always holds the value
/// from the prior `update`, which is what makes the trigger queries
/// edge-detecting.
pub struct SyncSystem {
    current: SyncData,
    previous: SyncData,
    transition_active: bool,
    transition_time: f32,
    transition_duration: f32,
}

impl SyncSystem {
    pub fn new() -> Self {
        Self {
            current: SyncData::default(),
            previous: SyncData::default(),
            transition_active: false,
            transition_time: 0.0,
            transition_duration: 0.0,
        }
    }

    pub fn current(&self) -> &SyncData {
        &self.current
    }

    /// Advance by `dt` and fold in the latest snapshot if there is one.
    pub fn update(&mut self, snapshot: Option<&Snapshot>, dt: f32) {
        self.previous = self.current;
        self.current.time += dt;

        let beats_per_second = DEFAULT_BPM / 60.0;
        self.current.beat = self.current.time * beats_per_second;
        self.current.bar = (self.current.beat / 4.0) as i32;

        let row_duration = 60.0 / (DEFAULT_BPM * 4.0);
        let total_rows = (self.current.time / row_duration) as i32;
        self.current.row = total_rows % ROWS_PER_PATTERN as i32;
        self.current.pattern = (total_rows / ROWS_PER_PATTERN as i32) % NUM_PATTERNS as i32;

        let scene = (self.current.time / SCENE_LEN_SECS) as usize % NUM_SCENES;
        let scene_progress = (self.current.time % SCENE_LEN_SECS) / SCENE_LEN_SECS;
        self.current.intensity = 0.5 + scene_progress * 0.5;

        let audible = snapshot.is_some_and(|s| {
            s.bass_energy > 0.001 || s.mid_energy > 0.001 || s.high_energy > 0.001
        });

        if let (Some(snap), true) = (snapshot, audible) {
            self.current.bass =
                lerp(self.previous.bass, snap.bass_energy * BASS_SCALE, BASS_SMOOTH).min(1.0);
            self.current.mid =
                lerp(self.previous.mid, snap.mid_energy * MID_SCALE, MID_SMOOTH).min(1.0);
            self.current.high =
                lerp(self.previous.high, snap.high_energy * HIGH_SCALE, HIGH_SMOOTH).min(1.0);
        } else {
            // nothing audible yet: plausible placeholder levels per scene
            self.current.bass = if scene >= 1 { 0.6 } else { 0.3 };
            self.current.mid = if scene >= 2 { 0.5 } else { 0.2 };
            self.current.high = if scene >= 3 { 0.7 } else { 0.3 };
        }

        // percussive flags: timing rules OR'd with energy spikes from the
        // snapshot, so visuals still hit if the two clocks drift
        let prev_row = self.previous.row;
        let timing_kick = self.current.row % 4 == 0 && prev_row % 4 != 0;
        let timing_snare = self.current.row % 8 == 4 && prev_row % 8 != 4;

        let audio_kick = snapshot.is_some_and(|s| {
            s.bass_energy > 0.5 && s.bass_energy > self.previous.bass * 1.5
        });
        let audio_snare = snapshot.is_some_and(|s| {
            s.mid_energy > 0.4 && s.mid_energy > self.previous.mid * 1.3
        });

        self.current.kick = timing_kick || audio_kick;
        self.current.snare = timing_snare || audio_snare;
        // level-triggered on purpose: every odd row
        self.current.hihat = self.current.row % 2 == 1;

        if self.transition_active {
            self.transition_time -= dt;
            if self.transition_time <= 0.0 {
                self.transition_active = false;
                self.transition_time = 0.0;
            }
        }
    }

    /// Blend previous into current over `duration` seconds; smooths scene
    /// cuts for every value query.
    pub fn start_transition(&mut self, duration: f32) {
        if duration <= 0.0 {
            return;
        }
        self.transition_active = true;
        self.transition_time = duration;
        self.transition_duration = duration;
    }

    fn blended(&self, prev: f32, cur: f32) -> f32 {
        if self.transition_active {
            let t = 1.0 - self.transition_time / self.transition_duration;
            lerp(prev, cur, t)
        } else {
            cur
        }
    }

    /// Named parameter query. Unknown names are not an error, they return
    /// 0.0 — callers probe freely.
    pub fn get_value(&self, name: &str) -> f32 {
        match name {
            "intensity" => self.blended(self.previous.intensity, self.current.intensity),
            "bass" => self.blended(self.previous.bass, self.current.bass),
            "mid" => self.blended(self.previous.mid, self.current.mid),
            "high" => self.blended(self.previous.high, self.current.high),
            "beat" => self.current.beat.fract(),
            "bar" => self.current.bar as f32,
            "pattern" => self.current.pattern as f32,
            "time" => self.current.time,
            _ => {
                // synthetic always-available animations
                if name.contains("rotate") {
                    self.current.time * 0.5
                } else if name.contains("pulse") {
                    (self.current.time * 2.0).sin() * 0.5 + 0.5
                } else if name.contains("wave") {
                    (self.current.beat * 0.5).sin() * 0.5 + 0.5
                } else {
                    0.0
                }
            }
        }
    }

    /// One-shot trigger query: true only on the update where the
    /// underlying value changed. Unknown names return false.
    pub fn get_trigger(&self, name: &str) -> bool {
        match name {
            "kick" => self.current.kick && !self.previous.kick,
            "snare" => self.current.snare && !self.previous.snare,
            "hihat" => self.current.hihat && !self.previous.hihat,
            "beat" => self.current.beat as i32 != self.previous.beat as i32,
            "bar" => self.current.bar != self.previous.bar,
            "pattern" => self.current.pattern != self.previous.pattern,
            _ => false,
        }
    }
}

impl Default for SyncSystem {
    fn default() -> Self {
        Self::new()
    }
}
