//! Tokenizer families and their annotators

use super::compound::{CompoundKind, CompoundStreamAnnotator};
use super::event::EventStreamAnnotator;
use super::pairing::PairingAnnotator;
use super::Annotator;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Tokenizer family, as declared by the tokenizer's name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TokenizerFamily {
    Remi,
    PerTok,
    Structured,
    Tsd,
    CpWord,
    MidiLike,
    Octuple,
    MuMidi,
    Mmm,
}

impl TokenizerFamily {
    pub const ALL: [TokenizerFamily; 9] = [
        TokenizerFamily::Remi,
        TokenizerFamily::PerTok,
        TokenizerFamily::Structured,
        TokenizerFamily::Tsd,
        TokenizerFamily::CpWord,
        TokenizerFamily::MidiLike,
        TokenizerFamily::Octuple,
        TokenizerFamily::MuMidi,
        TokenizerFamily::Mmm,
    ];

    /// Declared tokenizer name
    pub fn name(self) -> &'static str {
        match self {
            TokenizerFamily::Remi => "REMI",
            TokenizerFamily::PerTok => "PerTok",
            TokenizerFamily::Structured => "Structured",
            TokenizerFamily::Tsd => "TSD",
            TokenizerFamily::CpWord => "CPWord",
            TokenizerFamily::MidiLike => "MIDILike",
            TokenizerFamily::Octuple => "Octuple",
            TokenizerFamily::MuMidi => "MuMIDI",
            TokenizerFamily::Mmm => "MMM",
        }
    }

    /// Whether the families' token streams can be annotated
    pub fn is_supported(self) -> bool {
        !matches!(self, TokenizerFamily::MuMidi | TokenizerFamily::Mmm)
    }

    /// Whether the tokenizer emits compound tokens
    pub fn is_compound(self) -> bool {
        matches!(self, TokenizerFamily::CpWord | TokenizerFamily::Octuple)
    }

    /// Annotator for this family's token stream
    pub fn annotator(self) -> Result<Box<dyn Annotator>> {
        match self {
            TokenizerFamily::Remi
            | TokenizerFamily::PerTok
            | TokenizerFamily::Structured
            | TokenizerFamily::Tsd => Ok(Box::new(EventStreamAnnotator::new(self))),
            TokenizerFamily::CpWord => Ok(Box::new(CompoundStreamAnnotator::new(
                self,
                CompoundKind::Category,
            ))),
            TokenizerFamily::Octuple => Ok(Box::new(CompoundStreamAnnotator::new(
                self,
                CompoundKind::PitchLed,
            ))),
            TokenizerFamily::MidiLike => Ok(Box::new(PairingAnnotator::new(self))),
            TokenizerFamily::MuMidi | TokenizerFamily::Mmm => {
                Err(Error::UnsupportedTokenizerFamily(self.name().to_string()))
            }
        }
    }
}

impl FromStr for TokenizerFamily {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|family| family.name() == s)
            .ok_or_else(|| Error::UnsupportedTokenizerFamily(s.to_string()))
    }
}

impl TryFrom<String> for TokenizerFamily {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<TokenizerFamily> for String {
    fn from(family: TokenizerFamily) -> Self {
        family.name().to_string()
    }
}

impl fmt::Display for TokenizerFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
