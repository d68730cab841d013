//! Transcode topology construction.
//!
//! Graph assembly is entirely the engine's job: given the open source, the
//! output location, and a finished profile, the engine connects decode,
//! encode, and mux nodes itself. This module only validates the inputs,
//! requests the build, and binds the result to the session.

use crate::engine::{GraphId, MediaEngine, SessionId, SourceId};
use crate::error::{Error, Result};
use crate::profile::OutputProfile;

/// The session's single topology slot. One concurrent topology per
/// session.
pub const TOPOLOGY_SLOT: u32 = 0;

/// Build the transcode graph for `profile` and bind it to `session`.
///
/// The profile moves into the engine; the graph owns it afterwards. Fails
/// with [`Error::InvalidArgument`] on an empty output URL, with
/// [`Error::TopologyBuild`] when the profile is missing its audio or
/// container set or when the engine cannot assemble a graph (for example,
/// no encoder installed for the negotiated subtype); the engine's
/// diagnostic is surfaced as-is.
pub fn build_transcode_topology<E: MediaEngine>(
    engine: &mut E,
    source: SourceId,
    output_url: &str,
    profile: OutputProfile,
    session: SessionId,
) -> Result<GraphId> {
    if output_url.is_empty() {
        return Err(Error::InvalidArgument("output URL must not be empty"));
    }
    if profile.audio().is_none() {
        return Err(Error::TopologyBuild(
            "profile has no audio attributes".into(),
        ));
    }
    if profile.container().is_none() {
        return Err(Error::TopologyBuild(
            "profile has no container attributes".into(),
        ));
    }

    let graph = engine.build_transcode_graph(source, output_url, profile)?;
    engine.set_topology(session, TOPOLOGY_SLOT, graph)?;
    tracing::debug!(output = output_url, "transcode topology bound");
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attr::AttributeBag;
    use crate::engine::{EngineCommand, ScriptedEngine};
    use crate::format::ContainerType;
    use crate::profile::Negotiator;

    fn minimal_profile() -> OutputProfile {
        let mut profile = OutputProfile::new();
        profile.set_audio_attributes(AttributeBag::new());
        profile.set_container_attributes(
            Negotiator::default()
                .negotiate_container(ContainerType::Adts)
                .unwrap(),
        );
        profile
    }

    #[test]
    fn binds_graph_at_slot_zero() {
        let mut engine = ScriptedEngine::new();
        let source = engine.open_source("in.wav").unwrap();
        let session = engine.create_session().unwrap();

        build_transcode_topology(&mut engine, source, "out.aac", minimal_profile(), session)
            .unwrap();

        assert!(engine
            .commands()
            .contains(&EngineCommand::SetTopology { slot: 0 }));
    }

    #[test]
    fn empty_output_url_is_rejected_before_the_engine_runs() {
        let mut engine = ScriptedEngine::new();
        let source = engine.open_source("in.wav").unwrap();
        let session = engine.create_session().unwrap();
        let commands_before = engine.commands().len();

        let err = build_transcode_topology(&mut engine, source, "", minimal_profile(), session)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        assert_eq!(engine.commands().len(), commands_before);
    }

    #[test]
    fn incomplete_profile_fails_the_build() {
        let mut engine = ScriptedEngine::new();
        let source = engine.open_source("in.wav").unwrap();
        let session = engine.create_session().unwrap();

        let err = build_transcode_topology(
            &mut engine,
            source,
            "out.aac",
            OutputProfile::new(),
            session,
        )
        .unwrap_err();
        assert!(matches!(err, Error::TopologyBuild(_)));
    }

    #[test]
    fn engine_build_failure_is_surfaced_as_is() {
        let mut engine = ScriptedEngine::new().fail_topology("no encoder installed for aac");
        let source = engine.open_source("in.wav").unwrap();
        let session = engine.create_session().unwrap();

        let err = build_transcode_topology(&mut engine, source, "out.aac", minimal_profile(), session)
            .unwrap_err();
        match err {
            Error::TopologyBuild(message) => assert_eq!(message, "no encoder installed for aac"),
            other => panic!("expected topology failure, got {:?}", other),
        }
    }
}
