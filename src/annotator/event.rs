//! Annotation of plain event streams (REMI, PerTok, Structured, TSD)

use super::family::TokenizerFamily;
use super::index::NoteIndex;
use super::scan::Scan;
use super::Annotator;
use crate::error::{Error, Result};
use crate::model::{Token, TokenStream, TokenType};

/// Stream where each note is a `Pitch` token followed by tokens describing it
///
/// The note context is never reset: a `Velocity` or `Duration` separated
/// from its `Pitch` by structural tokens still belongs to that note.
#[derive(Debug, Clone, Copy)]
pub struct EventStreamAnnotator {
    family: TokenizerFamily,
}

impl EventStreamAnnotator {
    pub fn new(family: TokenizerFamily) -> Self {
        Self { family }
    }

    fn visit(scan: &mut Scan, token: &mut Token) -> Result<()> {
        if token.kind.is_pitch() {
            scan.onset(token)?;
        } else if matches!(
            token.kind,
            TokenType::Velocity | TokenType::Duration | TokenType::MicroTiming
        ) {
            scan.dependent(token);
        } else {
            scan.structural(token);
        }
        Ok(())
    }
}

impl Annotator for EventStreamAnnotator {
    fn family(&self) -> TokenizerFamily {
        self.family
    }

    fn annotate(&self, mut tokens: TokenStream, index: &NoteIndex) -> Result<TokenStream> {
        let mut scan = Scan::new(index);
        match &mut tokens {
            TokenStream::Flat(events) => {
                for token in events.iter_mut() {
                    Self::visit(&mut scan, token)?;
                }
            }
            TokenStream::PerTrack(tracks) => {
                for token in tracks.iter_mut().flatten() {
                    Self::visit(&mut scan, token)?;
                }
            }
            other => {
                return Err(Error::ShapeMismatch {
                    family: self.family.to_string(),
                    expected: "flat or per_track",
                    found: other.shape_name(),
                })
            }
        }
        let stats = scan.finish()?;
        tracing::debug!(
            family = %self.family,
            onsets = stats.onsets,
            orphaned = stats.orphaned,
            "annotated event stream"
        );
        Ok(tokens)
    }
}
