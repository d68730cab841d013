//! # Transmux
//!
//! A file-to-file media transcoding orchestrator.
//!
//! Transmux negotiates an output encoding profile against a pluggable
//! media engine, asks the engine to build a processing graph connecting
//! source → encoder → container writer, and drives the engine's session
//! event loop synchronously to completion. The engine (decoders,
//! encoders, muxers, URL resolution) lives behind the [`MediaEngine`]
//! trait; this crate implements no codecs.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use transmux::prelude::*;
//!
//! let mut transcoder = Transcoder::new(engine);
//! transcoder.open("input.mp3")?;
//! transcoder.configure_audio_output(AudioCodec::Aac)?;
//! transcoder.configure_container(ContainerType::Adts)?;
//! transcoder.encode_to_file("output.aac")?;
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐   ┌──────────────┐   ┌──────────────┐   ┌───────────────┐
//! │   Format    │──▶│   Profile    │──▶│   Topology   │──▶│    Session    │
//! │   Catalog   │   │  Negotiator  │   │   Builder    │   │    Driver     │
//! └─────────────┘   └──────────────┘   └──────────────┘   └───────────────┘
//!                          │                  │                   │
//!                          └─────────────── MediaEngine ──────────┘
//! ```
//!
//! The whole design is single-threaded and blocking: the session driver
//! pulls one lifecycle event at a time and the first failure anywhere
//! short-circuits the operation.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod attr;
pub mod catalog;
pub mod engine;
pub mod error;
pub mod format;
pub mod profile;
pub mod session;
pub mod topology;
pub mod transcoder;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::attr::{AttrKey, AttrValue, AttributeBag};
    pub use crate::engine::{MediaEngine, SessionEvent, SessionEventKind, StatusCode};
    pub use crate::error::{Error, Result};
    pub use crate::format::{AudioCodec, CandidateFormat, ContainerType, MajorType, Subtype};
    pub use crate::profile::{Negotiator, OutputProfile, SelectionPolicy};
    pub use crate::session::{SessionDriver, SessionState};
    pub use crate::transcoder::Transcoder;
}

pub use engine::MediaEngine;
pub use error::{Error, Result};
