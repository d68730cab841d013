//! The Media Engine boundary.
//!
//! The engine is the external collaborator that owns everything this crate
//! does not: URL resolution, demuxing, codecs, container writing, and the
//! processing graph itself. This module defines the seam:
//!
//! - [`MediaEngine`]: the trait the orchestrator drives
//! - [`SourceId`] / [`GraphId`] / [`SessionId`]: opaque engine handles
//! - [`SessionEvent`], [`SessionEventKind`], [`StatusCode`]: the lifecycle
//!   events the session driver pulls
//!
//! The crate ships one implementation, [`ScriptedEngine`], which replays
//! deterministic lifecycles for tests and demos. Production engines live
//! outside this crate.

mod scripted;

pub use scripted::{EngineCommand, ScriptedEngine, SessionFeed};

use crate::error::Result;
use crate::format::{AudioCodec, CandidateFormat};
use crate::profile::OutputProfile;
use std::fmt;

// ============================================================================
// Handles
// ============================================================================

/// Handle to an opened media source.
///
/// Opaque to the orchestrator; meaningful only to the engine that issued it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SourceId(pub u64);

/// Handle to a built processing graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GraphId(pub u64);

/// Handle to an engine session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SessionId(pub u64);

// ============================================================================
// Status and events
// ============================================================================

/// Engine status word carried by every session event.
///
/// Zero is success; any other value is a failure and is propagated verbatim
/// for diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StatusCode(pub u32);

impl StatusCode {
    /// Success.
    pub const OK: StatusCode = StatusCode(0);

    /// The engine reached a state it cannot account for (for example, an
    /// event stream that ends before the session closed).
    pub const E_UNEXPECTED: StatusCode = StatusCode(0x8000_FFFF);

    /// Whether this status is a success.
    pub const fn is_ok(&self) -> bool {
        self.0 == 0
    }

    /// Whether this status is a failure.
    pub const fn is_failure(&self) -> bool {
        self.0 != 0
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010X}", self.0)
    }
}

/// The kind of a session lifecycle event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SessionEventKind {
    /// The topology was accepted by the session.
    TopologySet,
    /// The session started processing.
    Started,
    /// The session reached the end of the source.
    Ended,
    /// The session closed; the output is finalized.
    Closed,
    /// Any other engine event. Unhandled kinds are accepted and skipped by
    /// the driver so newer engines remain usable.
    Other(u32),
}

impl fmt::Display for SessionEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionEventKind::TopologySet => write!(f, "topology-set"),
            SessionEventKind::Started => write!(f, "started"),
            SessionEventKind::Ended => write!(f, "ended"),
            SessionEventKind::Closed => write!(f, "closed"),
            SessionEventKind::Other(code) => write!(f, "other({})", code),
        }
    }
}

/// One session lifecycle event: a kind plus the status the engine attached
/// to it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionEvent {
    /// What happened.
    pub kind: SessionEventKind,
    /// The status carried by the event. Checked before the kind is
    /// dispatched; a failure status overrides the kind entirely.
    pub status: StatusCode,
}

impl SessionEvent {
    /// An event with a success status.
    pub const fn ok(kind: SessionEventKind) -> Self {
        Self {
            kind,
            status: StatusCode::OK,
        }
    }

    /// An event carrying a failure status.
    pub const fn failed(kind: SessionEventKind, status: StatusCode) -> Self {
        Self { kind, status }
    }
}

// ============================================================================
// The engine trait
// ============================================================================

/// The external media engine driven by the orchestrator.
///
/// Handles returned by one engine instance must only be passed back to that
/// instance. Every object handed to the engine by value (the output
/// profile) is owned by the engine from that point on.
pub trait MediaEngine {
    /// Resolve a URL into an open media source.
    ///
    /// Fails on an invalid or unreachable URL.
    fn open_source(&mut self, url: &str) -> Result<SourceId>;

    /// Enumerate the output formats the installed encoder supports for
    /// `codec`, in the engine's preference order.
    ///
    /// An empty list is not an error at this boundary; the negotiator
    /// decides what to do with it.
    fn enumerate_output_formats(&mut self, codec: AudioCodec) -> Result<Vec<CandidateFormat>>;

    /// Create a new session.
    fn create_session(&mut self) -> Result<SessionId>;

    /// Build a complete processing graph connecting `source` through the
    /// encoders described by `profile` to a container writer at
    /// `output_url`. The profile is owned by the graph from here on.
    fn build_transcode_graph(
        &mut self,
        source: SourceId,
        output_url: &str,
        profile: OutputProfile,
    ) -> Result<GraphId>;

    /// Bind a built graph to a session at the given topology slot.
    fn set_topology(&mut self, session: SessionId, slot: u32, graph: GraphId) -> Result<()>;

    /// Start the session from the beginning of the source.
    ///
    /// Fails if the session cannot be started (already running, or in an
    /// invalid state).
    fn start(&mut self, session: SessionId) -> Result<()>;

    /// Ask the session to close and finalize its output.
    fn close(&mut self, session: SessionId) -> Result<()>;

    /// Pull the next lifecycle event. Blocks the calling thread until an
    /// event is available.
    fn next_event(&mut self, session: SessionId) -> Result<SessionEvent>;

    /// Tear down an open source.
    fn shutdown_source(&mut self, source: SourceId) -> Result<()>;

    /// Tear down a session.
    fn shutdown_session(&mut self, session: SessionId) -> Result<()>;
}
