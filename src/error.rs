use std::io;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unsupported tokenizer family: {0}")]
    UnsupportedTokenizerFamily(String),

    #[error("Token stream has {onsets} note onsets but {notes} notes were extracted")]
    NoteTokenCountMismatch { notes: usize, onsets: usize },

    #[error("{family} expects a {expected} token stream, got {found}")]
    ShapeMismatch {
        family: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Token stream is already annotated")]
    AlreadyAnnotated,

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
