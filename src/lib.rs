//! Stamps symbolic-music token streams with the note and track each token encodes

pub mod annotator;
pub mod config;
pub mod document;
pub mod error;
pub mod model;

pub use annotator::{annotate, Annotator, NoteIndex, TokenizerFamily};
pub use config::Config;
pub use document::{annotate_document, AnnotatedDocument, AnnotationRequest, Envelope};
pub use error::Error;
