// The whole "song" lives here: five scene descriptors consumed by the
// sequencer's per-row dispatcher. Scenes are data, not branches, so the
// arrangement can be tested without generating a single sample.

use super::voice::{LEAD_HIGH, LEAD_MID, NUM_VOICES};

pub const NUM_SCENES: usize = 5;
pub const SCENE_LEN_SECS: f32 = 12.0;

// chord progression roots, selected by (row / 16) % 4
pub const CHORD_ROOTS: [f32; 4] = [220.0, 174.61, 261.63, 196.0];

// A3; melody tables are semitone offsets from here
pub const A3: f32 = 220.0;

/// Which rows a line fires on, and how the fired row picks a note index.
/// Every index is reduced modulo the note table length, so a mismatched
/// table can detune but never read out of bounds.
#[derive(Clone, Copy, Debug)]
pub enum Gate {
    /// fires when `row % n == 0`, note index `(row / n) % len`
    EveryRows(u32),
    /// fires on exactly these rows, note index is the position in the list
    Rows(&'static [u32]),
    /// fires on every row from `start`, note index `row % len`
    FromRow { start: u32 },
    /// fires when `row < end && row % every == 0`, index `(row / every) % len`
    BeforeRowEvery { end: u32, every: u32 },
}

impl Gate {
    pub fn fire(&self, row: u32, len: usize) -> Option<usize> {
        match *self {
            Gate::EveryRows(n) => (row % n == 0).then(|| (row / n) as usize % len),
            Gate::Rows(rows) => rows.iter().position(|&r| r == row).map(|i| i % len),
            Gate::FromRow { start } => (row >= start).then(|| row as usize % len),
            Gate::BeforeRowEvery { end, every } => {
                (row < end && row % every == 0).then(|| (row / every) as usize % len)
            }
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub enum NoteBase {
    /// current chord root from CHORD_ROOTS
    ChordRoot,
    /// fixed reference pitch in Hz
    Fixed(f32),
}

#[derive(Clone, Copy, Debug)]
pub enum Amp {
    Fixed(f32),
    /// `base + scene_progress * span`, swells over the 12 s scene window
    SceneRamp { base: f32, span: f32 },
    /// `base + ((row - from) / div) * span`, builds across the pattern
    RowRamp { base: f32, from: u32, div: f32, span: f32 },
}

impl Amp {
    pub fn level(&self, row: u32, scene_progress: f32) -> f32 {
        match *self {
            Amp::Fixed(v) => v,
            Amp::SceneRamp { base, span } => base + scene_progress * span,
            Amp::RowRamp { base, from, div, span } => {
                base + (row.saturating_sub(from) as f32 / div) * span
            }
        }
    }
}

/// One melodic or bass line: which voice it drives, when it fires, and the
/// semitone offsets it walks through.
#[derive(Clone, Copy, Debug)]
pub struct LineSpec {
    pub voice: usize,
    pub gate: Gate,
    pub notes: &'static [i32],
    pub base: NoteBase,
    pub octave: f32,
    pub amp: Amp,
}

impl LineSpec {
    /// Frequency for a fired note: `base * 2^(semitone/12) * octave`.
    pub fn frequency(&self, idx: usize, chord_root: f32) -> f32 {
        let base = match self.base {
            NoteBase::ChordRoot => chord_root,
            NoteBase::Fixed(hz) => hz,
        };
        base * 2.0f32.powf(self.notes[idx % self.notes.len()] as f32 / 12.0) * self.octave
    }
}

/// Per-scene filter cutoff recipe, recomputed on every row transition.
#[derive(Clone, Copy, Debug)]
pub enum Cutoff {
    Fixed(f32),
    /// `base + scene_time * rate`
    SceneRamp { base: f32, rate: f32 },
    /// `base + sin(scene_time * rate) * depth`
    Wobble { base: f32, depth: f32, rate: f32 },
    /// flat until `from`, then `base + ((row - from) / div) * amount`
    Buildup { base: f32, from: u32, div: f32, amount: f32 },
    /// `base + (row / 64) * amount`
    RowRamp { base: f32, amount: f32 },
}

impl Cutoff {
    pub fn value(&self, scene_time: f32, row: u32) -> f32 {
        match *self {
            Cutoff::Fixed(v) => v,
            Cutoff::SceneRamp { base, rate } => base + scene_time * rate,
            Cutoff::Wobble { base, depth, rate } => base + (scene_time * rate).sin() * depth,
            Cutoff::Buildup { base, from, div, amount } => {
                let t = if row >= from {
                    (row - from) as f32 / div
                } else {
                    0.0
                };
                base + t * amount
            }
            Cutoff::RowRamp { base, amount } => base + (row as f32 / 64.0) * amount,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Hit {
    pub freq: f32,
    pub amp: f32,
}

/// Everything one scene does, declaratively. The dispatcher fires `kick`
/// on `row % 4 == 0`, `snare` on `row % 8 == 4`; `hat` injects noise on
/// odd rows at the master bus.
#[derive(Clone, Copy, Debug)]
pub struct SceneSpec {
    pub kick: Option<Hit>,
    pub snare: Option<Hit>,
    pub hat: bool,
    pub lines: &'static [LineSpec],
    pub cutoff: Cutoff,
}

const KICK_HIT: Hit = Hit { freq: 55.0, amp: 0.8 };
const SNARE_HIT: Hit = Hit { freq: 200.0, amp: 0.3 };

pub const SCENES: [SceneSpec; NUM_SCENES] = [
    // scene 0: intro. no drums, rising arp, sparse low pulses, opening filter
    SceneSpec {
        kick: None,
        snare: None,
        hat: false,
        lines: &[
            LineSpec {
                voice: LEAD_MID,
                gate: Gate::EveryRows(2),
                notes: &[0, 3, 7, 12, 15, 12, 7, 3],
                base: NoteBase::ChordRoot,
                octave: 1.0,
                amp: Amp::SceneRamp { base: 0.12, span: 0.08 },
            },
            LineSpec {
                voice: LEAD_HIGH,
                gate: Gate::Rows(&[0, 32]),
                notes: &[0],
                base: NoteBase::ChordRoot,
                octave: 0.5,
                amp: Amp::Fixed(0.18),
            },
            LineSpec {
                voice: LEAD_HIGH,
                gate: Gate::Rows(&[16]),
                notes: &[7],
                base: NoteBase::ChordRoot,
                octave: 0.5,
                amp: Amp::Fixed(0.15),
            },
        ],
        cutoff: Cutoff::SceneRamp { base: 400.0, rate: 200.0 },
    },
    // scene 1: drums in, offbeat bass, wandering melody, wobbling filter
    SceneSpec {
        kick: Some(KICK_HIT),
        snare: Some(SNARE_HIT),
        hat: true,
        lines: &[
            LineSpec {
                voice: LEAD_MID,
                gate: Gate::EveryRows(2),
                notes: &[0, 0, 7, 7, 3, 3, 10, 10],
                base: NoteBase::ChordRoot,
                octave: 0.5,
                amp: Amp::Fixed(0.38),
            },
            LineSpec {
                voice: LEAD_HIGH,
                gate: Gate::EveryRows(3),
                notes: &[12, 14, 15, 17, 19, 17, 15, 14, 12, 10, 12, 15],
                base: NoteBase::Fixed(A3),
                octave: 1.0,
                amp: Amp::Fixed(0.22),
            },
        ],
        cutoff: Cutoff::Wobble { base: 1400.0, depth: 300.0, rate: 2.0 },
    },
    // scene 2: lead melody on the mid voice, alternating low hits, open filter
    SceneSpec {
        kick: Some(KICK_HIT),
        snare: Some(SNARE_HIT),
        hat: true,
        lines: &[
            LineSpec {
                voice: LEAD_MID,
                gate: Gate::EveryRows(3),
                notes: &[19, 17, 15, 14, 12, 14, 15, 17, 19, 22, 19, 17],
                base: NoteBase::Fixed(A3),
                octave: 1.0,
                amp: Amp::Fixed(0.25),
            },
            LineSpec {
                voice: LEAD_HIGH,
                gate: Gate::Rows(&[0, 16, 32, 48]),
                notes: &[0],
                base: NoteBase::ChordRoot,
                octave: 0.5,
                amp: Amp::Fixed(0.22),
            },
            LineSpec {
                voice: LEAD_HIGH,
                gate: Gate::Rows(&[8, 24, 40, 56]),
                notes: &[5],
                base: NoteBase::ChordRoot,
                octave: 0.5,
                amp: Amp::Fixed(0.18),
            },
        ],
        cutoff: Cutoff::Fixed(2200.0),
    },
    // scene 3: breakdown into buildup. second half swaps the sparse pulse
    // for a 16th-note arp that swells with the opening filter
    SceneSpec {
        kick: Some(KICK_HIT),
        snare: Some(SNARE_HIT),
        hat: true,
        lines: &[
            LineSpec {
                voice: LEAD_MID,
                gate: Gate::EveryRows(2),
                notes: &[0, 0, 7, 7, 3, 3, 10, 7],
                base: NoteBase::ChordRoot,
                octave: 0.5,
                amp: Amp::Fixed(0.42),
            },
            LineSpec {
                voice: LEAD_HIGH,
                gate: Gate::BeforeRowEvery { end: 32, every: 8 },
                notes: &[0],
                base: NoteBase::ChordRoot,
                octave: 2.0,
                amp: Amp::Fixed(0.18),
            },
            LineSpec {
                voice: LEAD_HIGH,
                gate: Gate::FromRow { start: 32 },
                notes: &[0, 3, 7, 12],
                base: NoteBase::ChordRoot,
                octave: 2.0,
                amp: Amp::RowRamp { base: 0.15, from: 32, div: 32.0, span: 0.15 },
            },
        ],
        cutoff: Cutoff::Buildup { base: 900.0, from: 32, div: 32.0, amount: 1800.0 },
    },
    // scene 4: peak. driving bass, 16th-note lead, filter riding the pattern
    SceneSpec {
        kick: Some(KICK_HIT),
        snare: Some(SNARE_HIT),
        hat: true,
        lines: &[
            LineSpec {
                voice: LEAD_MID,
                gate: Gate::EveryRows(2),
                notes: &[0, 0, 7, 7, 3, 3, 10, 10],
                base: NoteBase::ChordRoot,
                octave: 0.5,
                amp: Amp::Fixed(0.48),
            },
            LineSpec {
                voice: LEAD_HIGH,
                gate: Gate::EveryRows(1),
                notes: &[24, 22, 19, 17, 24, 26, 24, 22, 19, 17, 19, 22, 24, 27, 24, 22],
                base: NoteBase::Fixed(A3),
                octave: 1.0,
                amp: Amp::RowRamp { base: 0.25, from: 0, div: 64.0, span: 0.15 },
            },
        ],
        cutoff: Cutoff::RowRamp { base: 2000.0, amount: 1500.0 },
    },
];

// every line must target a real voice and carry at least one note; checked
// at compile time so the modulo indexing above can never divide by zero
const _: () = {
    let mut s = 0;
    while s < SCENES.len() {
        let mut l = 0;
        while l < SCENES[s].lines.len() {
            assert!(SCENES[s].lines[l].voice < NUM_VOICES);
            assert!(SCENES[s].lines[l].notes.len() != 0);
            l += 1;
        }
        s += 1;
    }
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_rows_gate_indexes_by_step() {
        let g = Gate::EveryRows(2);
        assert_eq!(g.fire(0, 8), Some(0));
        assert_eq!(g.fire(1, 8), None);
        assert_eq!(g.fire(6, 8), Some(3));
        // wraps past the table
        assert_eq!(g.fire(16, 8), Some(0));
    }

    #[test]
    fn rows_gate_fires_only_on_listed_rows() {
        let g = Gate::Rows(&[0, 16, 32, 48]);
        assert_eq!(g.fire(0, 1), Some(0));
        assert_eq!(g.fire(16, 1), Some(0));
        assert_eq!(g.fire(17, 1), None);
    }

    #[test]
    fn from_row_gate_covers_second_half() {
        let g = Gate::FromRow { start: 32 };
        assert_eq!(g.fire(31, 4), None);
        assert_eq!(g.fire(32, 4), Some(0));
        assert_eq!(g.fire(35, 4), Some(3));
        assert_eq!(g.fire(36, 4), Some(0));
    }

    #[test]
    fn semitone_mapping_matches_equal_temperament() {
        let line = &SCENES[1].lines[1]; // melody line, fixed A3 base
        // offset 12 = one octave above A3
        let f = line.frequency(0, 0.0);
        assert!((f - 440.0).abs() < 0.01, "got {f}");
    }

    #[test]
    fn chord_root_lines_follow_the_progression() {
        let line = &SCENES[0].lines[0];
        // root position, unison note -> exactly the chord root
        let f = line.frequency(0, CHORD_ROOTS[1]);
        assert!((f - CHORD_ROOTS[1]).abs() < 0.001);
    }

    #[test]
    fn scene0_arp_swells_with_scene_progress() {
        let amp = SCENES[0].lines[0].amp;
        assert!((amp.level(0, 0.0) - 0.12).abs() < 1e-6);
        assert!((amp.level(0, 1.0) - 0.20).abs() < 1e-6);
    }

    #[test]
    fn scene3_buildup_opens_the_filter() {
        let c = SCENES[3].cutoff;
        assert_eq!(c.value(0.0, 0), 900.0);
        assert_eq!(c.value(0.0, 31), 900.0);
        assert_eq!(c.value(0.0, 48), 900.0 + 0.5 * 1800.0);
    }

    #[test]
    fn only_the_intro_is_drumless() {
        assert!(SCENES[0].kick.is_none() && SCENES[0].snare.is_none() && !SCENES[0].hat);
        for spec in &SCENES[1..] {
            assert!(spec.kick.is_some() && spec.snare.is_some() && spec.hat);
        }
    }
}
