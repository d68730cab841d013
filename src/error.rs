//! Error types for transmux.

use crate::engine::StatusCode;
use crate::format::{AudioCodec, MajorType};
use thiserror::Error;

/// Result type alias using transmux's Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for transmux operations.
#[derive(Error, Debug)]
pub enum Error {
    /// A null/empty URL or other unusable argument was supplied.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// The engine advertises no usable output formats for the requested codec.
    #[error("no candidate output formats for {codec}")]
    NoCandidateFormats {
        /// The codec that was requested.
        codec: AudioCodec,
    },

    /// A candidate's major type doesn't match the expected media kind.
    ///
    /// Defensive check against a misbehaving engine.
    #[error("unexpected major type: expected {expected}, found {found:?}")]
    UnexpectedMajorType {
        /// The media kind the negotiation expected.
        expected: MajorType,
        /// The major type actually advertised, if any.
        found: Option<MajorType>,
    },

    /// Construction of an attribute bag failed.
    #[error("attribute bag build failed: {0}")]
    AttributeBuild(String),

    /// The engine could not assemble a working graph for the given profile.
    #[error("topology build failed: {0}")]
    TopologyBuild(String),

    /// The session reported a failure status; carries the engine's
    /// original status code for diagnostics.
    #[error("session failed with status {0}")]
    Session(StatusCode),

    /// Teardown of the source or session failed.
    ///
    /// Reported but never escalated past object lifetime end.
    #[error("shutdown failed during {stage} teardown (status {status})")]
    Shutdown {
        /// Which teardown step failed ("source" or "session").
        stage: &'static str,
        /// The engine status carried by the failure.
        status: StatusCode,
    },

    /// I/O error (engine-side file finalization).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
