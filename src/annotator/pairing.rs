//! Annotation of NoteOn/NoteOff streams (MIDILike)

use super::family::TokenizerFamily;
use super::index::NoteIndex;
use super::scan::{NoteContext, Scan};
use super::Annotator;
use crate::error::{Error, Result};
use crate::model::{Token, TokenStream, TokenType, TokenValue};
use std::collections::HashMap;

/// Stream where notes open with `NoteOn` and close with a `NoteOff` of the
/// same pitch value
#[derive(Debug, Clone, Copy)]
pub struct PairingAnnotator {
    family: TokenizerFamily,
}

/// Per-call pairing state
#[derive(Debug)]
struct Pairing<'a> {
    scan: Scan<'a>,
    /// Open notes by pitch value
    active_notes: HashMap<TokenValue, NoteContext>,
}

impl<'a> Pairing<'a> {
    fn new(index: &'a NoteIndex) -> Self {
        Self {
            scan: Scan::new(index),
            active_notes: HashMap::new(),
        }
    }

    fn visit(&mut self, token: &mut Token) -> Result<()> {
        if token.kind.is_note_on() {
            self.scan.onset(token)?;
            self.active_notes.insert(token.value.clone(), self.scan.context);
        } else if token.kind.is_note_off() {
            match self.active_notes.remove(&token.value) {
                Some(opened) => {
                    token.note_id = opened.note_id;
                    token.track_id = opened.track_id;
                    self.scan.context.clear_note();
                }
                None => {
                    tracing::warn!(value = %token.value, "note off without matching note on");
                    self.scan.stats.unmatched_offs += 1;
                    self.scan.structural(token);
                }
            }
        } else if token.kind == TokenType::Velocity {
            self.scan.dependent(token);
        } else {
            self.scan.structural(token);
        }
        Ok(())
    }
}

impl PairingAnnotator {
    pub fn new(family: TokenizerFamily) -> Self {
        Self { family }
    }
}

impl Annotator for PairingAnnotator {
    fn family(&self) -> TokenizerFamily {
        self.family
    }

    fn annotate(&self, mut tokens: TokenStream, index: &NoteIndex) -> Result<TokenStream> {
        let mut pairing = Pairing::new(index);
        match &mut tokens {
            TokenStream::Flat(events) => {
                for token in events.iter_mut() {
                    pairing.visit(token)?;
                }
            }
            TokenStream::PerTrack(tracks) => {
                for token in tracks.iter_mut().flatten() {
                    pairing.visit(token)?;
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
        let open = pairing.active_notes.len();
        let stats = pairing.scan.finish()?;
        tracing::debug!(
            family = %self.family,
            onsets = stats.onsets,
            orphaned = stats.orphaned,
            unmatched_offs = stats.unmatched_offs,
            open,
            "annotated note on/off stream"
        );
        Ok(tokens)
    }
}
