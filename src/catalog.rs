//! Hand-tuned fallback encoding presets.
//!
//! Ordered, read-only parameter sets used when the live-negotiated format
//! does not already specify everything needed: audio presets for the AAC
//! profile family, and the H.264 presets that drive video configuration
//! (video parameters are preset-driven, not negotiated; see
//! [`crate::profile::Negotiator::negotiate_video`]).
//!
//! Pure data. Lookup is by position; the selection index is a compile-time
//! constant, so there is no runtime failure mode here.

use crate::format::{FrameSize, Framerate};

// ============================================================================
// Audio presets
// ============================================================================

/// One audio encoding preset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AudioPreset {
    /// Samples per second.
    pub sample_rate: u32,
    /// Channel count.
    pub channels: u32,
    /// Bits per sample.
    pub bits_per_sample: u32,
    /// Average encoded bytes per second.
    pub bytes_per_second: u32,
    /// Codec profile/level indication.
    pub profile_level: u32,
}

/// AAC presets, ordered from highest to lowest quality.
///
/// Profile-level 0x29 is AAC-LC, level 2.
pub const AAC_PRESETS: [AudioPreset; 4] = [
    AudioPreset {
        sample_rate: 96000,
        channels: 2,
        bits_per_sample: 16,
        bytes_per_second: 24000,
        profile_level: 0x29,
    },
    AudioPreset {
        sample_rate: 48000,
        channels: 2,
        bits_per_sample: 16,
        bytes_per_second: 24000,
        profile_level: 0x29,
    },
    AudioPreset {
        sample_rate: 44100,
        channels: 2,
        bits_per_sample: 16,
        bytes_per_second: 16000,
        profile_level: 0x29,
    },
    AudioPreset {
        sample_rate: 44100,
        channels: 2,
        bits_per_sample: 16,
        bytes_per_second: 12000,
        profile_level: 0x29,
    },
];

// ============================================================================
// Video presets
// ============================================================================

/// H.264 profile identifiers (ITU-T H.264 Annex A profile_idc values).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum H264Profile {
    /// Baseline profile.
    Base = 66,
    /// Main profile.
    Main = 77,
    /// Extended profile.
    Extended = 88,
    /// High profile.
    High = 100,
    /// High 10 profile.
    High10 = 110,
    /// High 4:2:2 profile.
    High422 = 122,
    /// High 4:4:4 profile.
    High444 = 144,
}

impl H264Profile {
    /// The numeric profile identifier.
    pub const fn id(&self) -> u32 {
        *self as u32
    }
}

/// One video encoding preset.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VideoPreset {
    /// H.264 profile.
    pub profile: H264Profile,
    /// Frames per second.
    pub fps: Framerate,
    /// Frame dimensions.
    pub frame_size: FrameSize,
    /// Average bitrate in bits per second.
    pub bitrate: u32,
}

/// H.264 presets, ordered roughly by resolution and bitrate.
pub const H264_PRESETS: [VideoPreset; 7] = [
    VideoPreset {
        profile: H264Profile::Base,
        fps: Framerate::new(15, 1),
        frame_size: FrameSize::new(176, 144),
        bitrate: 128_000,
    },
    VideoPreset {
        profile: H264Profile::Base,
        fps: Framerate::new(15, 1),
        frame_size: FrameSize::new(352, 288),
        bitrate: 384_000,
    },
    VideoPreset {
        profile: H264Profile::Base,
        fps: Framerate::new(30, 1),
        frame_size: FrameSize::new(352, 288),
        bitrate: 384_000,
    },
    VideoPreset {
        profile: H264Profile::Base,
        fps: Framerate::new(29970, 1000),
        frame_size: FrameSize::new(320, 240),
        bitrate: 528_560,
    },
    VideoPreset {
        profile: H264Profile::Base,
        fps: Framerate::new(15, 1),
        frame_size: FrameSize::new(720, 576),
        bitrate: 4_000_000,
    },
    VideoPreset {
        profile: H264Profile::Main,
        fps: Framerate::new(25, 1),
        frame_size: FrameSize::new(720, 576),
        bitrate: 10_000_000,
    },
    VideoPreset {
        profile: H264Profile::Main,
        fps: Framerate::new(30, 1),
        frame_size: FrameSize::new(352, 288),
        bitrate: 10_000_000,
    },
];

/// The video preset used when nothing selects one explicitly: NTSC-rate
/// 320x240 baseline.
pub const DEFAULT_H264_PRESET: usize = 3;
