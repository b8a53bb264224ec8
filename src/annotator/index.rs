//! Global note index

use crate::model::Note;

/// Flattened, track-major enumeration of every note
///
/// Position `i` is the `i`-th note in the concatenation of all tracks.
/// Its identity is `note_id = i + 1` so that an unset id can never be
/// confused with the first note.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteIndex {
    notes_ids: Vec<u32>,
    note_to_track: Vec<u32>,
}

impl NoteIndex {
    pub fn build(tracks: &[Vec<Note>]) -> Self {
        let total = tracks.iter().map(Vec::len).sum();
        let mut notes_ids = Vec::with_capacity(total);
        let mut note_to_track = Vec::with_capacity(total);

        for (track_id, track) in tracks.iter().enumerate() {
            for _ in track {
                notes_ids.push(notes_ids.len() as u32);
                note_to_track.push(track_id as u32);
            }
        }

        Self {
            notes_ids,
            note_to_track,
        }
    }

    /// Flat positions `[0, 1, ..]`, one per note
    pub fn notes_ids(&self) -> &[u32] {
        &self.notes_ids
    }

    /// Track index of each flat position
    pub fn note_to_track(&self) -> &[u32] {
        &self.note_to_track
    }

    pub fn len(&self) -> usize {
        self.notes_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes_ids.is_empty()
    }

    /// 1-based identity of the note at flat position `pos`
    pub fn note_id(&self, pos: usize) -> Option<u32> {
        self.notes_ids.get(pos).map(|id| id + 1)
    }

    /// Track of the note at flat position `pos`
    pub fn track_of(&self, pos: usize) -> Option<u32> {
        self.note_to_track.get(pos).copied()
    }
}
