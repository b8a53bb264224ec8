//! Token-to-note annotation
//!
//! The tokenizer and the note extractor both walk the source file in the
//! same order: tracks in instrument order, notes chronologically within a
//! track. Annotation replays that walk over the tokens, consuming one note
//! of the [`NoteIndex`] per onset marker and stamping every token with the
//! note and track it belongs to.

pub mod compound;
pub mod event;
pub mod family;
pub mod index;
pub mod pairing;
pub mod scan;

pub use family::TokenizerFamily;
pub use index::NoteIndex;
pub use scan::{NoteContext, ScanStats};

use crate::error::{Error, Result};
use crate::model::{Note, TokenStream};

/// Stamps a family's token stream with note and track identities
///
/// The stream is taken by value: on error nothing partially annotated is
/// handed back.
pub trait Annotator {
    fn family(&self) -> TokenizerFamily;

    fn annotate(&self, tokens: TokenStream, index: &NoteIndex) -> Result<TokenStream>;
}

/// Annotate `tokens` produced by a `family` tokenizer from the file that
/// `notes` were extracted from.
///
/// With `use_programs` the tokenizer merged all tracks into one stream and
/// the stream must be single-stream; otherwise it must hold one stream per
/// track.
pub fn annotate(
    family: TokenizerFamily,
    use_programs: bool,
    tokens: TokenStream,
    notes: &[Vec<Note>],
) -> Result<TokenStream> {
    let annotator = family.annotator()?;

    if tokens.is_single_stream() != use_programs {
        return Err(Error::ShapeMismatch {
            family: family.to_string(),
            expected: if use_programs {
                "single-stream (program-aware)"
            } else {
                "per-track"
            },
            found: tokens.shape_name(),
        });
    }
    if tokens.is_annotated() {
        return Err(Error::AlreadyAnnotated);
    }

    let index = NoteIndex::build(notes);
    tracing::debug!(
        family = %family,
        use_programs,
        tracks = notes.len(),
        notes = index.len(),
        tokens = tokens.token_count(),
        "annotating token stream"
    );
    annotator.annotate(tokens, &index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Token;

    fn two_tracks() -> Vec<Vec<Note>> {
        vec![
            vec![Note::new(60, 0, 480, 100)],
            vec![Note::new(64, 0, 240, 90)],
        ]
    }

    #[test]
    fn test_program_aware_remi() {
        let stream = TokenStream::Flat(vec![
            Token::new("Program", 0),
            Token::new("Pitch", 60),
            Token::new("Velocity", 100),
            Token::new("Program", 33),
            Token::new("Pitch", 64),
            Token::new("Velocity", 90),
        ]);
        let annotated = annotate(TokenizerFamily::Remi, true, stream, &two_tracks()).unwrap();
        let ids: Vec<_> = annotated.iter_tokens().map(|t| (t.note_id, t.track_id)).collect();
        assert_eq!(
            ids,
            [
                (None, None),
                (Some(1), Some(0)),
                (Some(1), Some(0)),
                (None, Some(0)),
                (Some(2), Some(1)),
                (Some(2), Some(1)),
            ]
        );
    }

    #[test]
    fn test_mode_and_shape_must_agree() {
        let per_track = TokenStream::PerTrack(vec![vec![Token::new("Pitch", 60)], vec![Token::new("Pitch", 64)]]);
        assert!(matches!(
            annotate(TokenizerFamily::Remi, true, per_track, &two_tracks()),
            Err(Error::ShapeMismatch { found: "per_track", .. })
        ));

        let flat = TokenStream::Flat(vec![Token::new("Pitch", 60), Token::new("Pitch", 64)]);
        assert!(matches!(
            annotate(TokenizerFamily::Remi, false, flat, &two_tracks()),
            Err(Error::ShapeMismatch { found: "flat", .. })
        ));
    }

    #[test]
    fn test_rejects_annotated_stream() {
        let stream = TokenStream::PerTrack(vec![vec![Token::new("Pitch", 60)], vec![Token::new("Pitch", 64)]]);
        let annotated = annotate(TokenizerFamily::Tsd, false, stream, &two_tracks()).unwrap();
        assert!(matches!(
            annotate(TokenizerFamily::Tsd, false, annotated, &two_tracks()),
            Err(Error::AlreadyAnnotated)
        ));
    }

    #[test]
    fn test_unsupported_family_fails_first() {
        let stream = TokenStream::Flat(vec![]);
        assert!(matches!(
            annotate(TokenizerFamily::MuMidi, false, stream, &[]),
            Err(Error::UnsupportedTokenizerFamily(name)) if name == "MuMIDI"
        ));
    }

    #[test]
    fn test_fewer_onsets_than_notes() {
        let stream = TokenStream::PerTrack(vec![vec![Token::new("Pitch", 60)], vec![]]);
        assert!(matches!(
            annotate(TokenizerFamily::Remi, false, stream, &two_tracks()),
            Err(Error::NoteTokenCountMismatch { notes: 2, onsets: 1 })
        ));
    }
}
