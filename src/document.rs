//! JSON documents exchanged with the tokenizer and the visualizer

use crate::annotator::annotate;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::model::{number_notes, Note, NumberedNote, TokenStream};
use flate2::read::GzDecoder;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Read;
use std::path::Path;

/// Gzip magic bytes
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Tokens and notes of one MIDI file, as handed over for annotation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationRequest {
    #[serde(flatten)]
    pub config: Config,
    /// Notes per track, in instrument order
    pub notes: Vec<Vec<Note>>,
    pub tokens: TokenStream,
}

impl AnnotationRequest {
    /// Parse a request from JSON, gunzipping first if the data is compressed
    pub fn from_slice(data: &[u8]) -> Result<Self> {
        if data.starts_with(&GZIP_MAGIC) {
            let mut decoder = GzDecoder::new(data);
            let mut json = Vec::new();
            decoder.read_to_end(&mut json)?;
            Ok(serde_json::from_slice(&json)?)
        } else {
            Ok(serde_json::from_slice(data)?)
        }
    }

    pub fn from_reader<R: Read>(mut input: R) -> Result<Self> {
        let mut data = Vec::new();
        input.read_to_end(&mut data)?;
        Self::from_slice(&data)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let data = fs::read(path).map_err(|e| {
            Error::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to open '{}': {}", path.display(), e),
            ))
        })?;
        Self::from_slice(&data)
    }
}

/// Annotated tokens plus the notes their ids refer to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotatedDocument {
    pub tokens: TokenStream,
    /// Notes per track, each carrying the `note_id` used by the tokens
    pub notes: Vec<Vec<NumberedNote>>,
}

/// Validate the request's config, annotate its tokens and number its notes
pub fn annotate_document(request: AnnotationRequest) -> Result<AnnotatedDocument> {
    let family = request.config.validate()?;
    let tokens = annotate(
        family,
        request.config.use_programs,
        request.tokens,
        &request.notes,
    )?;
    Ok(AnnotatedDocument {
        tokens,
        notes: number_notes(&request.notes),
    })
}

/// `{success, data, error}` response wrapper
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(error: &Error) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.to_string()),
        }
    }
}

impl<T> From<Result<T>> for Envelope<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(data) => Envelope::ok(data),
            Err(e) => Envelope::err(&e),
        }
    }
}
