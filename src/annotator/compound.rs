//! Annotation of compound-token streams (CPWord, Octuple)

use super::family::TokenizerFamily;
use super::index::NoteIndex;
use super::scan::Scan;
use super::Annotator;
use crate::error::{Error, Result};
use crate::model::{CompoundToken, TokenStream, TokenType};

/// How a compound token announces that it describes a note
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompoundKind {
    /// Lead element is a `Family` token whose value is "Note" (CPWord)
    Category,
    /// Lead element is the `Pitch`/`PitchDrum` token itself (Octuple)
    PitchLed,
}

impl CompoundKind {
    fn is_note(self, compound: &CompoundToken) -> bool {
        let Some(lead) = compound.first() else {
            return false;
        };
        match self {
            CompoundKind::Category => lead.value.as_text() == Some("Note"),
            CompoundKind::PitchLed => lead.kind.is_pitch(),
        }
    }

    /// Elements that describe the note of their compound token
    fn is_dependent(self, kind: &TokenType) -> bool {
        match self {
            CompoundKind::Category => matches!(kind, TokenType::Velocity | TokenType::Duration),
            CompoundKind::PitchLed => matches!(
                kind,
                TokenType::Velocity | TokenType::Duration | TokenType::Position | TokenType::Bar
            ),
        }
    }
}

/// Stream of compound tokens, each one beat slot
///
/// The current note is forgotten at the start of every track's stream.
#[derive(Debug, Clone, Copy)]
pub struct CompoundStreamAnnotator {
    family: TokenizerFamily,
    kind: CompoundKind,
}

impl CompoundStreamAnnotator {
    pub fn new(family: TokenizerFamily, kind: CompoundKind) -> Self {
        Self { family, kind }
    }

    fn annotate_track(&self, scan: &mut Scan, track: &mut [CompoundToken]) -> Result<()> {
        scan.context.clear_note();
        for compound in track.iter_mut() {
            if !self.kind.is_note(compound) {
                for token in compound.iter_mut() {
                    scan.structural(token);
                }
                continue;
            }
            for token in compound.iter_mut() {
                if token.kind.is_pitch() {
                    scan.onset(token)?;
                } else if self.kind.is_dependent(&token.kind) {
                    scan.dependent(token);
                } else {
                    scan.structural(token);
                }
            }
        }
        Ok(())
    }
}

impl Annotator for CompoundStreamAnnotator {
    fn family(&self) -> TokenizerFamily {
        self.family
    }

    fn annotate(&self, mut tokens: TokenStream, index: &NoteIndex) -> Result<TokenStream> {
        let mut scan = Scan::new(index);
        match &mut tokens {
            TokenStream::Compound(tracks) => {
                for track in tracks.iter_mut() {
                    self.annotate_track(&mut scan, track)?;
                }
            }
            TokenStream::FlatCompound(events) => self.annotate_track(&mut scan, events)?,
            other => {
                return Err(Error::ShapeMismatch {
                    family: self.family.to_string(),
                    expected: "compound or flat_compound",
                    found: other.shape_name(),
                })
            }
        }
        let stats = scan.finish()?;
        tracing::debug!(
            family = %self.family,
            onsets = stats.onsets,
            orphaned = stats.orphaned,
            "annotated compound stream"
        );
        Ok(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Note, Token};

    fn cp_note(pitch: i32, velocity: i32) -> CompoundToken {
        vec![
            Token::new("Family", "Note"),
            Token::new("Position", 0),
            Token::new("Pitch", pitch),
            Token::new("Velocity", velocity),
            Token::new("Duration", "1.0.8"),
        ]
    }

    fn cp_bar() -> CompoundToken {
        vec![
            Token::new("Family", "Metric"),
            Token::new("Bar", "None"),
            Token::new("Ignore", "None"),
        ]
    }

    fn octuple_note(pitch: i32, velocity: i32) -> CompoundToken {
        vec![
            Token::new("Pitch", pitch),
            Token::new("Velocity", velocity),
            Token::new("Duration", "1.0.8"),
            Token::new("Position", 0),
            Token::new("Bar", 0),
        ]
    }

    fn ids(compound: &CompoundToken) -> Vec<(Option<u32>, Option<u32>)> {
        compound.iter().map(|t| (t.note_id, t.track_id)).collect()
    }

    #[test]
    fn test_cpword_note_compound() {
        let index = NoteIndex::build(&[vec![Note::new(60, 0, 480, 100)], vec![Note::new(64, 0, 240, 90)]]);
        let stream = TokenStream::Compound(vec![
            vec![cp_bar(), cp_note(60, 100)],
            vec![cp_bar(), cp_note(64, 90)],
        ]);
        let annotator = CompoundStreamAnnotator::new(TokenizerFamily::CpWord, CompoundKind::Category);
        let TokenStream::Compound(tracks) = annotator.annotate(stream, &index).unwrap() else {
            panic!("shape changed");
        };

        assert_eq!(ids(&tracks[0][0]), [(None, None); 3]);
        // Family and Position precede the Pitch and are not note-specific
        assert_eq!(
            ids(&tracks[0][1]),
            [
                (None, None),
                (None, None),
                (Some(1), Some(0)),
                (Some(1), Some(0)),
                (Some(1), Some(0)),
            ]
        );
        // The bar of track 1 still sees the last known track
        assert_eq!(ids(&tracks[1][0]), [(None, Some(0)); 3]);
        assert_eq!(
            ids(&tracks[1][1]),
            [
                (None, Some(0)),
                (None, Some(0)),
                (Some(2), Some(1)),
                (Some(2), Some(1)),
                (Some(2), Some(1)),
            ]
        );
    }

    #[test]
    fn test_octuple_stamps_position_and_bar() {
        let index = NoteIndex::build(&[vec![Note::new(60, 0, 480, 100), Note::new(62, 480, 960, 90)]]);
        let stream = TokenStream::Compound(vec![vec![octuple_note(60, 100), octuple_note(62, 90)]]);
        let annotator = CompoundStreamAnnotator::new(TokenizerFamily::Octuple, CompoundKind::PitchLed);
        let TokenStream::Compound(tracks) = annotator.annotate(stream, &index).unwrap() else {
            panic!("shape changed");
        };
        assert_eq!(ids(&tracks[0][0]), [(Some(1), Some(0)); 5]);
        assert_eq!(ids(&tracks[0][1]), [(Some(2), Some(0)); 5]);
    }

    #[test]
    fn test_octuple_drum_pitch_is_an_onset() {
        let index = NoteIndex::build(&[vec![Note::new(36, 0, 120, 127)]]);
        let stream = TokenStream::FlatCompound(vec![vec![
            Token::new("PitchDrum", 36),
            Token::new("Velocity", 127),
            Token::new("Program", -1),
        ]]);
        let annotator = CompoundStreamAnnotator::new(TokenizerFamily::Octuple, CompoundKind::PitchLed);
        let TokenStream::FlatCompound(events) = annotator.annotate(stream, &index).unwrap() else {
            panic!("shape changed");
        };
        assert_eq!(
            ids(&events[0]),
            [(Some(1), Some(0)), (Some(1), Some(0)), (None, Some(0))]
        );
    }

    #[test]
    fn test_note_context_resets_per_track() {
        // A stray Velocity at the start of track 1 must not inherit note 1
        let index = NoteIndex::build(&[vec![Note::new(60, 0, 480, 100)], vec![Note::new(64, 0, 240, 90)]]);
        let stray = vec![Token::new("Family", "Note"), Token::new("Velocity", 90)];
        let stream = TokenStream::Compound(vec![vec![cp_note(60, 100)], vec![stray, cp_note(64, 90)]]);
        let annotator = CompoundStreamAnnotator::new(TokenizerFamily::CpWord, CompoundKind::Category);
        let TokenStream::Compound(tracks) = annotator.annotate(stream, &index).unwrap() else {
            panic!("shape changed");
        };
        assert_eq!(ids(&tracks[1][0]), [(None, Some(0)), (None, None)]);
    }

    #[test]
    fn test_empty_compound_is_not_a_note() {
        let index = NoteIndex::default();
        let stream = TokenStream::Compound(vec![vec![vec![]]]);
        let annotator = CompoundStreamAnnotator::new(TokenizerFamily::CpWord, CompoundKind::Category);
        assert!(annotator.annotate(stream, &index).is_ok());
    }

    #[test]
    fn test_rejects_event_stream() {
        let annotator = CompoundStreamAnnotator::new(TokenizerFamily::Octuple, CompoundKind::PitchLed);
        let result = annotator.annotate(TokenStream::Flat(vec![]), &NoteIndex::default());
        assert!(matches!(result, Err(Error::ShapeMismatch { found: "flat", .. })));
    }
}
