//! A deterministic media engine for tests and demos.
//!
//! [`ScriptedEngine`] implements [`MediaEngine`] without touching any real
//! codec: it advertises whatever candidate formats it was configured with,
//! emits session lifecycle events either automatically (in response to the
//! commands the orchestrator issues) or from a pre-loaded script, and
//! records every command it receives so tests can assert on exact command
//! sequences. Failure statuses can be injected at any point in the
//! lifecycle.
//!
//! Events travel through a channel, so `next_event` is a real blocking
//! pull: a [`SessionFeed`] handle can push events from another thread
//! while the driver blocks.

use crate::engine::{
    GraphId, MediaEngine, SessionEvent, SessionEventKind, SessionId, SourceId, StatusCode,
};
use crate::error::{Error, Result};
use crate::format::{AudioCodec, CandidateFormat};
use crate::profile::OutputProfile;
use std::collections::HashMap;

/// Placeholder artifact written when output finalization is enabled.
const STUB_OUTPUT: &[u8] = b"transmux scripted engine output\n";

/// One command received by the engine, recorded for test assertions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EngineCommand {
    /// `open_source` with the given URL.
    OpenSource(String),
    /// `enumerate_output_formats` for the given codec.
    EnumerateOutputFormats(AudioCodec),
    /// `create_session`.
    CreateSession,
    /// `build_transcode_graph` toward the given output URL.
    BuildGraph {
        /// The requested output location.
        output_url: String,
    },
    /// `set_topology` at the given slot.
    SetTopology {
        /// The topology slot the graph was bound at.
        slot: u32,
    },
    /// `start`.
    Start,
    /// `close`.
    Close,
    /// `shutdown_source`.
    ShutdownSource,
    /// `shutdown_session`.
    ShutdownSession,
}

/// Handle for feeding events into a [`ScriptedEngine`] from outside, e.g.
/// from another thread while the driver blocks on the pull.
#[derive(Clone)]
pub struct SessionFeed {
    tx: kanal::Sender<SessionEvent>,
}

impl SessionFeed {
    /// Push an event into the engine's queue.
    ///
    /// Silently dropped if the engine is gone.
    pub fn push(&self, event: SessionEvent) {
        let _ = self.tx.send(event);
    }
}

/// A scriptable [`MediaEngine`].
///
/// In auto-lifecycle mode (the default) the engine answers each command
/// with the matching success event: binding a topology emits
/// `TopologySet`, starting emits `Started` then `Ended`, closing emits
/// `Closed`. [`ScriptedEngine::scripted`] disables that and replays a
/// fixed event sequence instead, whatever commands arrive.
pub struct ScriptedEngine {
    formats: HashMap<AudioCodec, Vec<CandidateFormat>>,
    auto_lifecycle: bool,
    fail_event: Option<(SessionEventKind, StatusCode)>,
    fail_start: Option<StatusCode>,
    fail_topology: Option<String>,
    fail_source_shutdown: Option<StatusCode>,
    write_output: bool,
    commands: Vec<EngineCommand>,
    events_tx: Option<kanal::Sender<SessionEvent>>,
    events_rx: kanal::Receiver<SessionEvent>,
    output_url: Option<String>,
    built_profile: Option<OutputProfile>,
    next_handle: u64,
}

impl ScriptedEngine {
    /// Create an engine in auto-lifecycle mode with no advertised formats.
    pub fn new() -> Self {
        let (events_tx, events_rx) = kanal::unbounded();
        Self {
            formats: HashMap::new(),
            auto_lifecycle: true,
            fail_event: None,
            fail_start: None,
            fail_topology: None,
            fail_source_shutdown: None,
            write_output: false,
            commands: Vec::new(),
            events_tx: Some(events_tx),
            events_rx,
            output_url: None,
            built_profile: None,
            next_handle: 0,
        }
    }

    /// Create an engine that emits nothing on its own. Events arrive only
    /// through a [`SessionFeed`] handle, so `next_event` blocks until the
    /// feeder delivers one.
    pub fn manual() -> Self {
        let mut engine = Self::new();
        engine.auto_lifecycle = false;
        engine
    }

    /// Create an engine that replays `events` in order and emits nothing
    /// else. The queue is sealed: once drained, `next_event` reports
    /// [`StatusCode::E_UNEXPECTED`].
    pub fn scripted(events: impl IntoIterator<Item = SessionEvent>) -> Self {
        let mut engine = Self::manual();
        if let Some(tx) = &engine.events_tx {
            for event in events {
                let _ = tx.send(event);
            }
        }
        engine.seal();
        engine
    }

    /// Advertise `formats` (in preference order) for `codec`.
    pub fn with_audio_formats(mut self, codec: AudioCodec, formats: Vec<CandidateFormat>) -> Self {
        self.formats.insert(codec, formats);
        self
    }

    /// Attach a failure status to the auto-emitted event of the given
    /// kind. Later lifecycle events of the same command are suppressed.
    pub fn fail_event(mut self, kind: SessionEventKind, status: StatusCode) -> Self {
        self.fail_event = Some((kind, status));
        self
    }

    /// Make the start command itself fail with `status`.
    pub fn fail_start(mut self, status: StatusCode) -> Self {
        self.fail_start = Some(status);
        self
    }

    /// Make graph construction fail with the given diagnostic.
    pub fn fail_topology(mut self, message: impl Into<String>) -> Self {
        self.fail_topology = Some(message.into());
        self
    }

    /// Make source teardown fail with `status`.
    pub fn fail_source_shutdown(mut self, status: StatusCode) -> Self {
        self.fail_source_shutdown = Some(status);
        self
    }

    /// Write a stub artifact to the output URL when the session closes.
    pub fn write_output(mut self, enable: bool) -> Self {
        self.write_output = enable;
        self
    }

    /// A handle for pushing events from outside the engine.
    pub fn feed(&self) -> Option<SessionFeed> {
        self.events_tx.as_ref().map(|tx| SessionFeed {
            tx: tx.clone(),
        })
    }

    /// Seal the internal event queue: the engine emits nothing further,
    /// and `next_event` fails once the queue drains. External
    /// [`SessionFeed`] handles keep working until dropped.
    pub fn seal(&mut self) {
        self.events_tx = None;
    }

    /// The commands received so far, in order.
    pub fn commands(&self) -> &[EngineCommand] {
        &self.commands
    }

    /// The profile a built graph took ownership of, if any.
    pub fn built_profile(&self) -> Option<&OutputProfile> {
        self.built_profile.as_ref()
    }

    fn next_handle(&mut self) -> u64 {
        self.next_handle += 1;
        self.next_handle
    }

    /// Emit a lifecycle event, applying any injected failure status.
    /// Returns true if the emitted event carried a failure.
    fn emit(&mut self, kind: SessionEventKind) -> bool {
        let event = match self.fail_event {
            Some((k, status)) if k == kind => SessionEvent::failed(kind, status),
            _ => SessionEvent::ok(kind),
        };
        if let Some(tx) = &self.events_tx {
            let _ = tx.send(event);
        }
        event.status.is_failure()
    }
}

impl Default for ScriptedEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaEngine for ScriptedEngine {
    fn open_source(&mut self, url: &str) -> Result<SourceId> {
        self.commands.push(EngineCommand::OpenSource(url.to_string()));
        if url.is_empty() {
            return Err(Error::InvalidArgument("source URL must not be empty"));
        }
        Ok(SourceId(self.next_handle()))
    }

    fn enumerate_output_formats(&mut self, codec: AudioCodec) -> Result<Vec<CandidateFormat>> {
        self.commands
            .push(EngineCommand::EnumerateOutputFormats(codec));
        Ok(self.formats.get(&codec).cloned().unwrap_or_default())
    }

    fn create_session(&mut self) -> Result<SessionId> {
        self.commands.push(EngineCommand::CreateSession);
        Ok(SessionId(self.next_handle()))
    }

    fn build_transcode_graph(
        &mut self,
        _source: SourceId,
        output_url: &str,
        profile: OutputProfile,
    ) -> Result<GraphId> {
        self.commands.push(EngineCommand::BuildGraph {
            output_url: output_url.to_string(),
        });
        if let Some(message) = &self.fail_topology {
            return Err(Error::TopologyBuild(message.clone()));
        }
        self.output_url = Some(output_url.to_string());
        self.built_profile = Some(profile);
        Ok(GraphId(self.next_handle()))
    }

    fn set_topology(&mut self, _session: SessionId, slot: u32, _graph: GraphId) -> Result<()> {
        self.commands.push(EngineCommand::SetTopology { slot });
        if self.auto_lifecycle {
            self.emit(SessionEventKind::TopologySet);
        }
        Ok(())
    }

    fn start(&mut self, _session: SessionId) -> Result<()> {
        self.commands.push(EngineCommand::Start);
        if let Some(status) = self.fail_start {
            return Err(Error::Session(status));
        }
        if self.auto_lifecycle && !self.emit(SessionEventKind::Started) {
            // The whole processing run collapses into one step here; a
            // real engine emits Ended only after draining the source.
            self.emit(SessionEventKind::Ended);
        }
        Ok(())
    }

    fn close(&mut self, _session: SessionId) -> Result<()> {
        self.commands.push(EngineCommand::Close);
        if self.write_output {
            if let Some(url) = &self.output_url {
                std::fs::write(url, STUB_OUTPUT)?;
                tracing::debug!(url = url.as_str(), "stub output finalized");
            }
        }
        if self.auto_lifecycle {
            self.emit(SessionEventKind::Closed);
        }
        Ok(())
    }

    fn next_event(&mut self, _session: SessionId) -> Result<SessionEvent> {
        self.events_rx
            .recv()
            .map_err(|_| Error::Session(StatusCode::E_UNEXPECTED))
    }

    fn shutdown_source(&mut self, _source: SourceId) -> Result<()> {
        self.commands.push(EngineCommand::ShutdownSource);
        if let Some(status) = self.fail_source_shutdown {
            return Err(Error::Shutdown {
                stage: "source",
                status,
            });
        }
        Ok(())
    }

    fn shutdown_session(&mut self, _session: SessionId) -> Result<()> {
        self.commands.push(EngineCommand::ShutdownSession);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attr::AttributeBag;

    #[test]
    fn records_commands_in_order() {
        let mut engine = ScriptedEngine::new();
        let source = engine.open_source("input.mp3").unwrap();
        let session = engine.create_session().unwrap();
        engine.shutdown_source(source).unwrap();
        engine.shutdown_session(session).unwrap();

        assert_eq!(
            engine.commands(),
            &[
                EngineCommand::OpenSource("input.mp3".into()),
                EngineCommand::CreateSession,
                EngineCommand::ShutdownSource,
                EngineCommand::ShutdownSession,
            ]
        );
    }

    #[test]
    fn auto_lifecycle_emits_matching_events() {
        let mut engine = ScriptedEngine::new();
        let session = engine.create_session().unwrap();
        engine
            .set_topology(session, 0, GraphId(7))
            .unwrap();

        let event = engine.next_event(session).unwrap();
        assert_eq!(event, SessionEvent::ok(SessionEventKind::TopologySet));

        engine.start(session).unwrap();
        assert_eq!(
            engine.next_event(session).unwrap().kind,
            SessionEventKind::Started
        );
        assert_eq!(
            engine.next_event(session).unwrap().kind,
            SessionEventKind::Ended
        );
    }

    #[test]
    fn injected_failure_suppresses_later_events() {
        let mut engine =
            ScriptedEngine::new().fail_event(SessionEventKind::Started, StatusCode(0xC000_0001));
        let session = engine.create_session().unwrap();
        engine.start(session).unwrap();

        let event = engine.next_event(session).unwrap();
        assert_eq!(event.kind, SessionEventKind::Started);
        assert!(event.status.is_failure());

        // No Ended was queued after the failing Started.
        engine.seal();
        assert!(engine.next_event(session).is_err());
    }

    #[test]
    fn sealed_and_drained_queue_reports_unexpected() {
        let mut engine = ScriptedEngine::scripted([SessionEvent::ok(SessionEventKind::Started)]);
        let session = engine.create_session().unwrap();

        assert!(engine.next_event(session).is_ok());
        match engine.next_event(session) {
            Err(Error::Session(status)) => assert_eq!(status, StatusCode::E_UNEXPECTED),
            other => panic!("expected session failure, got {:?}", other),
        }
    }

    #[test]
    fn advertised_formats_come_back_in_order() {
        let first = CandidateFormat::audio(AudioCodec::Aac, AttributeBag::new()).unwrap();
        let second = CandidateFormat::audio(AudioCodec::Aac, AttributeBag::new()).unwrap();
        let mut engine = ScriptedEngine::new()
            .with_audio_formats(AudioCodec::Aac, vec![first.clone(), second.clone()]);

        let formats = engine.enumerate_output_formats(AudioCodec::Aac).unwrap();
        assert_eq!(formats, vec![first, second]);

        assert!(engine
            .enumerate_output_formats(AudioCodec::Mp3)
            .unwrap()
            .is_empty());
    }
}
