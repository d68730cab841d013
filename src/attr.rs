//! Open attribute bags for codec and container parameters.
//!
//! An [`AttributeBag`] is the open, key-typed parameter set that profile
//! negotiation trades in: stream attributes advertised by the engine,
//! the negotiated audio/video attribute sets, and the container settings.
//! Keys are a closed enum; every key declares the value kind it expects,
//! and [`AttributeBag::set`] rejects mismatches so a half-built bag never
//! reaches a profile.

use crate::error::{Error, Result};
use crate::format::{ContainerType, FrameSize, Framerate, MajorType, Subtype};
use bytes::Bytes;
use smallvec::SmallVec;

// ============================================================================
// Keys and values
// ============================================================================

/// Attribute keys understood by negotiation and the engine boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AttrKey {
    /// The media kind of the format (audio/video).
    MajorType,
    /// The codec identity of the format.
    Subtype,
    /// Audio bits per sample.
    BitsPerSample,
    /// Audio samples per second.
    SampleRate,
    /// Audio channel count.
    ChannelCount,
    /// Average encoded bytes per second.
    AvgBytesPerSecond,
    /// Audio frame size in bytes.
    BlockAlignment,
    /// AAC payload framing (0 = raw).
    AacPayloadType,
    /// AAC audio profile and level indication.
    AacProfileLevel,
    /// Whether every sample is independently decodable (0/1).
    AllSamplesIndependent,
    /// Video codec profile identifier.
    VideoProfile,
    /// Video frame dimensions.
    FrameSize,
    /// Video frame rate.
    FrameRate,
    /// Average video bitrate in bits per second.
    AvgBitrate,
    /// The output container type.
    ContainerKind,
    /// Container policy: reconcile stream attributes against container
    /// constraints automatically (0 = default adjustment).
    AdjustProfile,
    /// Opaque codec configuration data.
    CodecData,
}

/// The value kind a key expects.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttrKind {
    /// Unsigned 32-bit integer.
    U32,
    /// Rational (numerator/denominator).
    Ratio,
    /// Width/height pair.
    Size,
    /// A [`MajorType`] value.
    MajorType,
    /// A [`Subtype`] value.
    Subtype,
    /// A [`ContainerType`] value.
    Container,
    /// Opaque bytes.
    Blob,
}

impl AttrKey {
    /// The value kind this key expects.
    pub const fn kind(&self) -> AttrKind {
        match self {
            AttrKey::MajorType => AttrKind::MajorType,
            AttrKey::Subtype => AttrKind::Subtype,
            AttrKey::FrameRate => AttrKind::Ratio,
            AttrKey::FrameSize => AttrKind::Size,
            AttrKey::ContainerKind => AttrKind::Container,
            AttrKey::CodecData => AttrKind::Blob,
            AttrKey::BitsPerSample
            | AttrKey::SampleRate
            | AttrKey::ChannelCount
            | AttrKey::AvgBytesPerSecond
            | AttrKey::BlockAlignment
            | AttrKey::AacPayloadType
            | AttrKey::AacProfileLevel
            | AttrKey::AllSamplesIndependent
            | AttrKey::VideoProfile
            | AttrKey::AvgBitrate
            | AttrKey::AdjustProfile => AttrKind::U32,
        }
    }
}

/// An attribute value: integer, rational, enum-valued, or byte blob.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AttrValue {
    /// Unsigned 32-bit integer.
    U32(u32),
    /// Rational value (frame rates).
    Ratio(Framerate),
    /// Width/height pair (frame sizes).
    Size(FrameSize),
    /// Media kind.
    MajorType(MajorType),
    /// Codec identity.
    Subtype(Subtype),
    /// Container type.
    Container(ContainerType),
    /// Opaque bytes (codec configuration).
    Blob(Bytes),
}

impl AttrValue {
    /// The kind of this value.
    pub const fn kind(&self) -> AttrKind {
        match self {
            AttrValue::U32(_) => AttrKind::U32,
            AttrValue::Ratio(_) => AttrKind::Ratio,
            AttrValue::Size(_) => AttrKind::Size,
            AttrValue::MajorType(_) => AttrKind::MajorType,
            AttrValue::Subtype(_) => AttrKind::Subtype,
            AttrValue::Container(_) => AttrKind::Container,
            AttrValue::Blob(_) => AttrKind::Blob,
        }
    }
}

// ============================================================================
// Attribute bag
// ============================================================================

/// An open set of codec/container parameters.
///
/// Insert-or-replace semantics keyed by [`AttrKey`]; attribute sets are
/// small (a negotiated audio set has around ten entries), so entries are
/// stored inline. Equality is set-wise: entry order does not matter.
#[derive(Clone, Debug, Default)]
pub struct AttributeBag {
    entries: SmallVec<[(AttrKey, AttrValue); 8]>,
}

impl AttributeBag {
    /// Create an empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an attribute, replacing any existing entry for the key.
    ///
    /// Fails with [`Error::AttributeBuild`] if the value kind does not
    /// match the key; the bag is left unchanged in that case.
    pub fn set(&mut self, key: AttrKey, value: AttrValue) -> Result<()> {
        if key.kind() != value.kind() {
            return Err(Error::AttributeBuild(format!(
                "{:?} expects a {:?} value, got {:?}",
                key,
                key.kind(),
                value.kind()
            )));
        }
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            entry.1 = value;
        } else {
            self.entries.push((key, value));
        }
        Ok(())
    }

    /// Look up an attribute.
    pub fn get(&self, key: AttrKey) -> Option<&AttrValue> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v)
    }

    /// Whether the bag has an entry for `key`.
    pub fn contains(&self, key: AttrKey) -> bool {
        self.get(key).is_some()
    }

    /// Read an integer attribute, resolving an absent entry (or an entry
    /// of another kind) to `default`.
    ///
    /// This is the pull-with-default read that negotiation relies on: a
    /// missing numeric attribute is never an error, it resolves to its
    /// documented default.
    pub fn get_u32(&self, key: AttrKey, default: u32) -> u32 {
        match self.get(key) {
            Some(AttrValue::U32(v)) => *v,
            _ => default,
        }
    }

    /// Number of entries in the bag.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the bag is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over the entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (AttrKey, &AttrValue)> {
        self.entries.iter().map(|(k, v)| (*k, v))
    }
}

impl PartialEq for AttributeBag {
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len()
            && self
                .entries
                .iter()
                .all(|(k, v)| other.get(*k) == Some(v))
    }
}

impl Eq for AttributeBag {}
