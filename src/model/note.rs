//! Notes as extracted from the source MIDI file

use serde::{Deserialize, Serialize};

/// Pitch class names, indexed by `pitch % 12`
pub const PITCH_CLASSES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// A single note of one track
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// MIDI pitch (0-127)
    pub pitch: u8,
    /// Pitch name with octave, e.g. "C4"
    pub name: String,
    /// Onset time in ticks
    pub start: u32,
    /// Release time in ticks
    pub end: u32,
    /// MIDI velocity
    pub velocity: u8,
}

impl Note {
    /// Create a note, deriving its name from the pitch
    pub fn new(pitch: u8, start: u32, end: u32, velocity: u8) -> Self {
        Self {
            pitch,
            name: pitch_to_name(pitch),
            start,
            end,
            velocity,
        }
    }

    /// Length of the note in ticks
    pub fn duration(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }
}

/// A note together with its global 1-based identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberedNote {
    #[serde(flatten)]
    pub note: Note,
    pub note_id: u32,
}

/// Number every note across all tracks, continuing the count from one
/// track to the next so that `note_id` matches the annotated tokens.
pub fn number_notes(tracks: &[Vec<Note>]) -> Vec<Vec<NumberedNote>> {
    let mut next_id = 1u32;
    tracks
        .iter()
        .map(|track| {
            track
                .iter()
                .map(|note| {
                    let numbered = NumberedNote {
                        note: note.clone(),
                        note_id: next_id,
                    };
                    next_id += 1;
                    numbered
                })
                .collect()
        })
        .collect()
}

/// Name a MIDI pitch as `<pitch class><octave>`, with octave `pitch / 12 - 1`
pub fn pitch_to_name(pitch: u8) -> String {
    let octave = i32::from(pitch / 12) - 1;
    let class = PITCH_CLASSES[usize::from(pitch % 12)];
    format!("{}{}", class, octave)
}
