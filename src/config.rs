//! Annotation configuration

use crate::annotator::TokenizerFamily;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Which tokenizer produced the tokens and how it laid them out
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Declared tokenizer name, e.g. "REMI" or "MIDILike"
    pub tokenizer: String,
    /// All tracks merged into one stream with program tokens
    pub use_programs: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tokenizer: TokenizerFamily::Remi.name().to_string(),
            use_programs: false,
        }
    }
}

impl Config {
    /// Resolve the tokenizer family, rejecting families that can't be annotated
    pub fn validate(&self) -> Result<TokenizerFamily> {
        let name = self.tokenizer.trim();
        if name.is_empty() {
            return Err(Error::InvalidConfig("tokenizer must not be empty".to_string()));
        }
        let family: TokenizerFamily = name.parse()?;
        if !family.is_supported() {
            return Err(Error::UnsupportedTokenizerFamily(family.name().to_string()));
        }
        Ok(family)
    }
}
