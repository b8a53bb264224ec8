//! Scan state shared by all annotators

use super::index::NoteIndex;
use crate::error::{Error, Result};
use crate::model::Token;

/// Note and track the scan is currently attributing tokens to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoteContext {
    /// Last onset's note id, `None` before the first onset or after a reset
    pub note_id: Option<u32>,
    /// Last known track, survives note resets
    pub track_id: Option<u32>,
}

impl NoteContext {
    /// Forget the current note but keep the track
    pub fn clear_note(&mut self) {
        self.note_id = None;
    }
}

/// Counters reported at the end of a scan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Onset markers consumed
    pub onsets: usize,
    /// Dependent tokens seen while no note was current
    pub orphaned: usize,
    /// Offset markers without a matching onset
    pub unmatched_offs: usize,
}

/// Cursor into the note index plus the current note context
#[derive(Debug)]
pub struct Scan<'a> {
    index: &'a NoteIndex,
    pub context: NoteContext,
    pub stats: ScanStats,
}

impl<'a> Scan<'a> {
    pub fn new(index: &'a NoteIndex) -> Self {
        Self {
            index,
            context: NoteContext::default(),
            stats: ScanStats::default(),
        }
    }

    /// Consume the next note of the index and stamp the onset marker with it
    pub fn onset(&mut self, token: &mut Token) -> Result<()> {
        let pos = self.stats.onsets;
        let (note_id, track_id) = match (self.index.note_id(pos), self.index.track_of(pos)) {
            (Some(note_id), Some(track_id)) => (note_id, track_id),
            _ => {
                tracing::warn!(
                    notes = self.index.len(),
                    onset = pos + 1,
                    "token stream has more onsets than notes"
                );
                return Err(Error::NoteTokenCountMismatch {
                    notes: self.index.len(),
                    onsets: pos + 1,
                });
            }
        };

        self.stats.onsets += 1;
        self.context = NoteContext {
            note_id: Some(note_id),
            track_id: Some(track_id),
        };
        self.stamp_current(token);
        Ok(())
    }

    /// Stamp a token describing the current note; left unset when no note is current
    pub fn dependent(&mut self, token: &mut Token) {
        if self.context.note_id.is_some() {
            self.stamp_current(token);
        } else {
            self.stats.orphaned += 1;
        }
    }

    /// Stamp a token that belongs to the current track but to no note
    pub fn structural(&self, token: &mut Token) {
        token.note_id = None;
        token.track_id = self.context.track_id;
    }

    fn stamp_current(&self, token: &mut Token) {
        token.note_id = self.context.note_id;
        token.track_id = self.context.track_id;
    }

    /// Check that every note was consumed
    pub fn finish(self) -> Result<ScanStats> {
        if self.stats.onsets != self.index.len() {
            tracing::warn!(
                notes = self.index.len(),
                onsets = self.stats.onsets,
                "token stream has fewer onsets than notes"
            );
            return Err(Error::NoteTokenCountMismatch {
                notes: self.index.len(),
                onsets: self.stats.onsets,
            });
        }
        Ok(self.stats)
    }
}
