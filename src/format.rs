//! Media format vocabulary for profile negotiation.
//!
//! This module provides the type-safe format descriptions used while
//! negotiating an output profile:
//!
//! - [`MajorType`], [`Subtype`]: the media kind and codec identity of a format
//! - [`AudioCodec`], [`VideoCodec`], [`ContainerType`]: the known codec and
//!   container identifiers
//! - [`Framerate`], [`FrameSize`]: small rational/pair value types
//! - [`CandidateFormat`]: one engine-advertised output format, a typed view
//!   over its attribute bag
//!
//! # Design Principles
//!
//! - **Type safety**: enums instead of stringly-typed identifiers
//! - **Zero-cost**: small, Copy types wherever possible
//! - **Explicit**: a format's identity lives in its attribute bag; the
//!   accessors here are just typed reads

use crate::attr::{AttrKey, AttrValue, AttributeBag};
use std::fmt;

// ============================================================================
// Media kinds and codec identifiers
// ============================================================================

/// The major media kind of a format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MajorType {
    /// Audio stream.
    Audio,
    /// Video stream.
    Video,
}

impl fmt::Display for MajorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MajorType::Audio => write!(f, "audio"),
            MajorType::Video => write!(f, "video"),
        }
    }
}

/// Audio codecs the encoder side can be asked to produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum AudioCodec {
    /// AAC (Advanced Audio Coding).
    Aac,
    /// MPEG-1 Layer III.
    Mp3,
    /// Windows Media Audio 9.
    Wma9,
    /// AMR narrow-band speech.
    AmrNb,
}

impl fmt::Display for AudioCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioCodec::Aac => write!(f, "aac"),
            AudioCodec::Mp3 => write!(f, "mp3"),
            AudioCodec::Wma9 => write!(f, "wma9"),
            AudioCodec::AmrNb => write!(f, "amr-nb"),
        }
    }
}

/// Video codecs the encoder side can be asked to produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum VideoCodec {
    /// H.264 / AVC.
    H264,
    /// H.265 / HEVC.
    H265,
}

impl fmt::Display for VideoCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VideoCodec::H264 => write!(f, "h264"),
            VideoCodec::H265 => write!(f, "h265"),
        }
    }
}

/// The codec identity of a format (audio or video).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Subtype {
    /// An audio codec.
    Audio(AudioCodec),
    /// A video codec.
    Video(VideoCodec),
}

impl fmt::Display for Subtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subtype::Audio(c) => write!(f, "{}", c),
            Subtype::Video(c) => write!(f, "{}", c),
        }
    }
}

/// Output container types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ContainerType {
    /// Raw AAC in an ADTS framing (audio only).
    Adts,
    /// MPEG-4 (audio plus video).
    Mpeg4,
    /// Bare MP3 stream (audio only).
    Mp3,
    /// Advanced Systems Format (audio plus video).
    Asf,
}

impl ContainerType {
    /// Whether this container carries a video stream.
    ///
    /// Containers that do require a video attribute set in the profile;
    /// the rest are audio only.
    pub const fn requires_video(&self) -> bool {
        matches!(self, ContainerType::Mpeg4 | ContainerType::Asf)
    }
}

impl fmt::Display for ContainerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContainerType::Adts => write!(f, "adts"),
            ContainerType::Mpeg4 => write!(f, "mp4"),
            ContainerType::Mp3 => write!(f, "mp3"),
            ContainerType::Asf => write!(f, "asf"),
        }
    }
}

// ============================================================================
// Small value types
// ============================================================================

/// Frame rate as numerator/denominator (8 bytes, Copy).
///
/// Using a fraction allows exact representation of common framerates
/// like 29.97 fps (29970/1000).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Framerate {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (time units).
    pub den: u32,
}

impl Framerate {
    /// Create a new framerate.
    pub const fn new(num: u32, den: u32) -> Self {
        Self { num, den }
    }

    /// Get the framerate as a floating-point value.
    #[inline]
    pub fn fps(&self) -> f64 {
        self.num as f64 / self.den.max(1) as f64
    }
}

impl fmt::Display for Framerate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.num, self.den)
    }
}

/// Frame dimensions in pixels (8 bytes, Copy).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl FrameSize {
    /// Create a new frame size.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl fmt::Display for FrameSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

// ============================================================================
// Candidate format
// ============================================================================

/// One engine-advertised output format.
///
/// A candidate is a typed view over an attribute bag: its media kind and
/// codec identity live in the bag under [`AttrKey::MajorType`] and
/// [`AttrKey::Subtype`], alongside whatever stream parameters the encoder
/// advertises. Candidates are immutable once obtained; negotiation clones
/// the bag before modifying anything.
#[derive(Clone, Debug, PartialEq)]
pub struct CandidateFormat {
    attrs: AttributeBag,
}

impl CandidateFormat {
    /// Wrap an attribute bag as a candidate format.
    pub fn new(attrs: AttributeBag) -> Self {
        Self { attrs }
    }

    /// Build an audio candidate: stamps the major type and subtype into
    /// `attrs` and wraps the result.
    ///
    /// Convenience for engine implementations and tests.
    pub fn audio(codec: AudioCodec, mut attrs: AttributeBag) -> crate::Result<Self> {
        attrs.set(AttrKey::MajorType, AttrValue::MajorType(MajorType::Audio))?;
        attrs.set(AttrKey::Subtype, AttrValue::Subtype(Subtype::Audio(codec)))?;
        Ok(Self { attrs })
    }

    /// The advertised major type, if the bag carries one.
    pub fn major_type(&self) -> Option<MajorType> {
        match self.attrs.get(AttrKey::MajorType) {
            Some(AttrValue::MajorType(m)) => Some(*m),
            _ => None,
        }
    }

    /// The advertised codec identity, if the bag carries one.
    pub fn subtype(&self) -> Option<Subtype> {
        match self.attrs.get(AttrKey::Subtype) {
            Some(AttrValue::Subtype(s)) => Some(*s),
            _ => None,
        }
    }

    /// The full advertised attribute set.
    pub fn attributes(&self) -> &AttributeBag {
        &self.attrs
    }

    /// Consume the candidate, yielding its attribute set.
    pub fn into_attributes(self) -> AttributeBag {
        self.attrs
    }
}
