use std::time::Duration;

use thiserror::Error;

use crate::{CatalogScene, Frame};

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    TemplatesLoaded(Result<Vec<(String, String)>, SubmissionError>),
    SceneLoaded {
        scene_id: String,
        result: Result<CatalogScene, LookupError>,
    },
    /// One decoded frame of the active fill stream.
    FillFrame(Frame),
    /// The active fill stream terminated.
    FillFinished(Result<(), StreamError>),
    SuggestionsSubmitted(Result<Option<String>, SubmissionError>),
    TorrentStarted(Result<(), SubmissionError>),
}

/// Failures of the fill stream.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StreamError {
    #[error("connection error: {0}")]
    Connection(String),
    #[error("malformed frame: {0}")]
    MalformedFrame(String),
    #[error("no data received within {0:?}")]
    Timeout(Duration),
    #[error("http status {0}")]
    HttpStatus(u16),
    #[error("unsupported content type {0}")]
    UnsupportedContentType(String),
}

/// Failures of the non-streaming backend calls (suggestions, templates, torrent start).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error("network error: {0}")]
    Network(String),
    #[error("request timed out")]
    Timeout,
    #[error("http status {0}")]
    HttpStatus(u16),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    /// The backend answered with an `error` envelope.
    #[error("{0}")]
    Rejected(String),
}

/// Failures of the catalog scene lookup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("network error: {0}")]
    Network(String),
    #[error("http status {0}")]
    HttpStatus(u16),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("scene {0} not found")]
    NotFound(String),
    #[error("scene {0} has no files")]
    NoFiles(String),
}
