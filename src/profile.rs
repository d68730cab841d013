//! Output profile negotiation.
//!
//! The negotiator turns a target codec and container choice into the
//! concrete attribute sets the engine needs to build a transcode graph:
//!
//! 1. Audio is negotiated live: the engine enumerates the output formats
//!    its encoder supports, one candidate is selected by policy, and the
//!    final attribute set is derived from it.
//! 2. Video is preset-driven: attributes come straight from a
//!    [`VideoPreset`] catalog entry, with no engine enumeration. The
//!    asymmetry with audio is deliberate.
//! 3. The container set names the container type and tells the engine to
//!    reconcile stream attributes against container constraints itself.
//!
//! The three sets accumulate in an [`OutputProfile`], which moves into the
//! engine when the topology is built.

use crate::attr::{AttrKey, AttrValue, AttributeBag};
use crate::catalog::VideoPreset;
use crate::engine::MediaEngine;
use crate::error::{Error, Result};
use crate::format::{AudioCodec, CandidateFormat, ContainerType, MajorType, Subtype, VideoCodec};

/// Container adjustment policy: let the engine reconcile stream-level
/// attributes against container constraints automatically.
pub const ADJUST_PROFILE_DEFAULT: u32 = 0;

// ============================================================================
// Selection policy
// ============================================================================

/// How a candidate is chosen from the engine's enumeration.
///
/// An explicit policy value rather than an accident of iteration order, so
/// a best-fit policy can be added later without touching the negotiation
/// algorithm or the session driver.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SelectionPolicy {
    /// Pick the first advertised candidate. The engine is assumed to
    /// enumerate in a reasonable preference order.
    #[default]
    FirstFit,
}

impl SelectionPolicy {
    /// Select one candidate, or `None` if there is nothing to select.
    pub fn select<'a>(&self, candidates: &'a [CandidateFormat]) -> Option<&'a CandidateFormat> {
        match self {
            SelectionPolicy::FirstFit => candidates.first(),
        }
    }
}

// ============================================================================
// Required fields
// ============================================================================

/// The audio fields that must be present in a negotiated attribute set for
/// `codec`, with the default each resolves to when the candidate does not
/// advertise it.
///
/// One canonical list per target codec: AAC carries its payload framing,
/// profile-level, and independent-samples flags (bits-per-sample defaults
/// to 16); every other codec uses the basic rate/channels/bytes/alignment
/// set. A missing numeric attribute always resolves to its default here,
/// never to an error.
pub fn required_fields(codec: AudioCodec) -> &'static [(AttrKey, u32)] {
    match codec {
        AudioCodec::Aac => &[
            (AttrKey::BitsPerSample, 16),
            (AttrKey::SampleRate, 0),
            (AttrKey::ChannelCount, 0),
            (AttrKey::AvgBytesPerSecond, 0),
            (AttrKey::AacPayloadType, 0),
            (AttrKey::AacProfileLevel, 0),
            (AttrKey::BlockAlignment, 0),
            (AttrKey::AllSamplesIndependent, 0),
        ],
        _ => &[
            (AttrKey::SampleRate, 0),
            (AttrKey::ChannelCount, 0),
            (AttrKey::AvgBytesPerSecond, 0),
            (AttrKey::BlockAlignment, 0),
        ],
    }
}

// ============================================================================
// Negotiator
// ============================================================================

/// Negotiates the audio, video, and container attribute sets of an
/// [`OutputProfile`].
#[derive(Clone, Copy, Debug, Default)]
pub struct Negotiator {
    policy: SelectionPolicy,
}

impl Negotiator {
    /// Create a negotiator with the given selection policy.
    pub fn new(policy: SelectionPolicy) -> Self {
        Self { policy }
    }

    /// The active selection policy.
    pub fn policy(&self) -> SelectionPolicy {
        self.policy
    }

    /// Negotiate the audio attribute set for `target`.
    ///
    /// Enumerates the engine's supported output formats, selects one by
    /// policy, and derives the final set: an exact subtype match keeps the
    /// advertised values verbatim; otherwise the major type and subtype
    /// are overwritten to the target and every required field is pulled
    /// from the candidate with its documented default.
    ///
    /// Fails with [`Error::NoCandidateFormats`] when the enumeration is
    /// empty and [`Error::UnexpectedMajorType`] when the selected
    /// candidate is not audio.
    pub fn negotiate_audio<E: MediaEngine>(
        &self,
        engine: &mut E,
        target: AudioCodec,
    ) -> Result<AttributeBag> {
        let candidates = engine.enumerate_output_formats(target)?;
        let candidate = self
            .policy
            .select(&candidates)
            .ok_or(Error::NoCandidateFormats { codec: target })?;

        tracing::debug!(
            codec = %target,
            advertised = candidates.len(),
            "selected output format candidate"
        );

        // Work on a copy of the advertised attributes so nothing below can
        // touch the engine's own format object.
        let mut attrs = candidate.attributes().clone();

        match candidate.major_type() {
            Some(MajorType::Audio) => {}
            found => {
                return Err(Error::UnexpectedMajorType {
                    expected: MajorType::Audio,
                    found,
                })
            }
        }

        let target_subtype = Subtype::Audio(target);
        if candidate.subtype() == Some(target_subtype) {
            // Bit-exact codec match: the advertised values stand as-is.
            return Ok(attrs);
        }

        attrs.set(AttrKey::MajorType, AttrValue::MajorType(MajorType::Audio))?;
        attrs.set(AttrKey::Subtype, AttrValue::Subtype(target_subtype))?;
        for &(key, default) in required_fields(target) {
            let value = candidate.attributes().get_u32(key, default);
            attrs.set(key, AttrValue::U32(value))?;
        }
        Ok(attrs)
    }

    /// Build the video attribute set from a catalog preset.
    ///
    /// Profile, frame size, frame rate, and bitrate are copied verbatim;
    /// the subtype is fixed to H.264. No engine enumeration happens for
    /// video.
    pub fn negotiate_video(&self, preset: &VideoPreset) -> Result<AttributeBag> {
        let mut attrs = AttributeBag::new();
        attrs.set(
            AttrKey::Subtype,
            AttrValue::Subtype(Subtype::Video(VideoCodec::H264)),
        )?;
        attrs.set(AttrKey::VideoProfile, AttrValue::U32(preset.profile.id()))?;
        attrs.set(AttrKey::FrameSize, AttrValue::Size(preset.frame_size))?;
        attrs.set(AttrKey::FrameRate, AttrValue::Ratio(preset.fps))?;
        attrs.set(AttrKey::AvgBitrate, AttrValue::U32(preset.bitrate))?;
        Ok(attrs)
    }

    /// Build the container attribute set: the container type plus the
    /// adjust-profile-to-defaults policy flag.
    pub fn negotiate_container(&self, container: ContainerType) -> Result<AttributeBag> {
        let mut attrs = AttributeBag::new();
        attrs.set(AttrKey::ContainerKind, AttrValue::Container(container))?;
        attrs.set(
            AttrKey::AdjustProfile,
            AttrValue::U32(ADJUST_PROFILE_DEFAULT),
        )?;
        Ok(attrs)
    }
}

// ============================================================================
// Output profile
// ============================================================================

/// The negotiated result: an audio attribute set, an optional video
/// attribute set (only for containers that carry video), and a container
/// attribute set.
///
/// Built incrementally; moves by value into the engine when the topology
/// is built, at which point the graph owns it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OutputProfile {
    audio: Option<AttributeBag>,
    video: Option<AttributeBag>,
    container: Option<AttributeBag>,
}

impl OutputProfile {
    /// Create an empty profile.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the audio attribute set.
    pub fn set_audio_attributes(&mut self, attrs: AttributeBag) {
        self.audio = Some(attrs);
    }

    /// Attach the video attribute set.
    pub fn set_video_attributes(&mut self, attrs: AttributeBag) {
        self.video = Some(attrs);
    }

    /// Attach the container attribute set.
    pub fn set_container_attributes(&mut self, attrs: AttributeBag) {
        self.container = Some(attrs);
    }

    /// The audio attribute set, if attached.
    pub fn audio(&self) -> Option<&AttributeBag> {
        self.audio.as_ref()
    }

    /// The video attribute set, if attached.
    pub fn video(&self) -> Option<&AttributeBag> {
        self.video.as_ref()
    }

    /// The container attribute set, if attached.
    pub fn container(&self) -> Option<&AttributeBag> {
        self.container.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ScriptedEngine;

    fn advertised_aac(sample_rate: u32) -> CandidateFormat {
        let mut attrs = AttributeBag::new();
        attrs.set(AttrKey::SampleRate, AttrValue::U32(sample_rate)).unwrap();
        attrs.set(AttrKey::ChannelCount, AttrValue::U32(2)).unwrap();
        attrs
            .set(AttrKey::AvgBytesPerSecond, AttrValue::U32(24000))
            .unwrap();
        CandidateFormat::audio(AudioCodec::Aac, attrs).unwrap()
    }

    #[test]
    fn first_fit_selects_index_zero() {
        let candidates = vec![advertised_aac(96000), advertised_aac(44100)];
        let selected = SelectionPolicy::FirstFit.select(&candidates).unwrap();
        assert_eq!(selected, &candidates[0]);
    }

    #[test]
    fn exact_subtype_match_is_passthrough() {
        let candidate = advertised_aac(48000);
        let mut engine =
            ScriptedEngine::new().with_audio_formats(AudioCodec::Aac, vec![candidate.clone()]);

        let attrs = Negotiator::default()
            .negotiate_audio(&mut engine, AudioCodec::Aac)
            .unwrap();
        assert_eq!(&attrs, candidate.attributes());
    }

    #[test]
    fn subtype_mismatch_fills_every_required_field() {
        // The encoder advertises a WMA format while MP3 is wanted.
        let mut advertised = AttributeBag::new();
        advertised.set(AttrKey::SampleRate, AttrValue::U32(44100)).unwrap();
        let candidate = CandidateFormat::audio(AudioCodec::Wma9, advertised).unwrap();
        let mut engine =
            ScriptedEngine::new().with_audio_formats(AudioCodec::Mp3, vec![candidate]);

        let attrs = Negotiator::default()
            .negotiate_audio(&mut engine, AudioCodec::Mp3)
            .unwrap();

        assert_eq!(
            attrs.get(AttrKey::Subtype),
            Some(&AttrValue::Subtype(Subtype::Audio(AudioCodec::Mp3)))
        );
        for &(key, _) in required_fields(AudioCodec::Mp3) {
            assert!(attrs.contains(key), "missing required field {:?}", key);
        }
        // Advertised value kept, absent field defaulted.
        assert_eq!(attrs.get_u32(AttrKey::SampleRate, 0), 44100);
        assert_eq!(attrs.get_u32(AttrKey::ChannelCount, 99), 0);
    }

    #[test]
    fn aac_bits_per_sample_defaults_to_16() {
        let candidate = CandidateFormat::audio(AudioCodec::Mp3, AttributeBag::new()).unwrap();
        let mut engine =
            ScriptedEngine::new().with_audio_formats(AudioCodec::Aac, vec![candidate]);

        let attrs = Negotiator::default()
            .negotiate_audio(&mut engine, AudioCodec::Aac)
            .unwrap();
        assert_eq!(attrs.get_u32(AttrKey::BitsPerSample, 0), 16);
    }

    #[test]
    fn empty_enumeration_fails() {
        let mut engine = ScriptedEngine::new();
        let err = Negotiator::default()
            .negotiate_audio(&mut engine, AudioCodec::Aac)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::NoCandidateFormats {
                codec: AudioCodec::Aac
            }
        ));
    }

    #[test]
    fn video_candidate_is_rejected() {
        let mut attrs = AttributeBag::new();
        attrs
            .set(AttrKey::MajorType, AttrValue::MajorType(MajorType::Video))
            .unwrap();
        let mut engine = ScriptedEngine::new()
            .with_audio_formats(AudioCodec::Aac, vec![CandidateFormat::new(attrs)]);

        let err = Negotiator::default()
            .negotiate_audio(&mut engine, AudioCodec::Aac)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::UnexpectedMajorType {
                expected: MajorType::Audio,
                found: Some(MajorType::Video),
            }
        ));
    }

    #[test]
    fn video_attributes_copy_the_preset_verbatim() {
        let preset = &crate::catalog::H264_PRESETS[crate::catalog::DEFAULT_H264_PRESET];
        let attrs = Negotiator::default().negotiate_video(preset).unwrap();

        assert_eq!(
            attrs.get(AttrKey::Subtype),
            Some(&AttrValue::Subtype(Subtype::Video(VideoCodec::H264)))
        );
        assert_eq!(attrs.get_u32(AttrKey::VideoProfile, 0), preset.profile.id());
        assert_eq!(attrs.get(AttrKey::FrameSize), Some(&AttrValue::Size(preset.frame_size)));
        assert_eq!(attrs.get(AttrKey::FrameRate), Some(&AttrValue::Ratio(preset.fps)));
        assert_eq!(attrs.get_u32(AttrKey::AvgBitrate, 0), preset.bitrate);
    }

    #[test]
    fn container_attributes_carry_type_and_policy() {
        let attrs = Negotiator::default()
            .negotiate_container(ContainerType::Mpeg4)
            .unwrap();
        assert_eq!(
            attrs.get(AttrKey::ContainerKind),
            Some(&AttrValue::Container(ContainerType::Mpeg4))
        );
        assert_eq!(
            attrs.get_u32(AttrKey::AdjustProfile, 77),
            ADJUST_PROFILE_DEFAULT
        );
        assert_eq!(attrs.len(), 2);
    }
}
