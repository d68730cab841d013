//! The transcode operation facade.
//!
//! A [`Transcoder`] owns one engine and walks one file through the whole
//! operation: open the source, negotiate the profile piece by piece, build
//! and bind the topology, then drive the session to completion. Teardown
//! is owned by the value: dropping a transcoder shuts the source and
//! session down best-effort, reporting failures without ever propagating
//! them.

use crate::catalog::VideoPreset;
use crate::engine::{MediaEngine, SessionId, SourceId};
use crate::error::{Error, Result};
use crate::format::{AudioCodec, ContainerType};
use crate::profile::{Negotiator, OutputProfile, SelectionPolicy};
use crate::session::{self, SessionDriver};
use crate::topology::build_transcode_topology;

/// Orchestrates one file-to-file transcode over a media engine.
pub struct Transcoder<E: MediaEngine> {
    engine: E,
    negotiator: Negotiator,
    source: Option<SourceId>,
    session: Option<SessionId>,
    profile: Option<OutputProfile>,
}

impl<E: MediaEngine> Transcoder<E> {
    /// Create a transcoder with the default (first-fit) selection policy.
    pub fn new(engine: E) -> Self {
        Self::with_policy(engine, SelectionPolicy::default())
    }

    /// Create a transcoder with an explicit candidate selection policy.
    pub fn with_policy(engine: E, policy: SelectionPolicy) -> Self {
        Self {
            engine,
            negotiator: Negotiator::new(policy),
            source: None,
            session: None,
            profile: None,
        }
    }

    /// Open the input and prepare the operation: resolves the source,
    /// creates the session, and starts an empty profile.
    pub fn open(&mut self, input_url: &str) -> Result<()> {
        if input_url.is_empty() {
            return Err(Error::InvalidArgument("input URL must not be empty"));
        }
        let source = self.engine.open_source(input_url)?;
        self.source = Some(source);
        self.session = Some(self.engine.create_session()?);
        self.profile = Some(OutputProfile::new());
        tracing::debug!(url = input_url, "source opened");
        Ok(())
    }

    /// Negotiate the audio stream attributes for `target` and store them
    /// in the profile.
    pub fn configure_audio_output(&mut self, target: AudioCodec) -> Result<()> {
        let attrs = self.negotiator.negotiate_audio(&mut self.engine, target)?;
        self.profile_mut()?.set_audio_attributes(attrs);
        Ok(())
    }

    /// Build the video stream attributes from `preset` and store them in
    /// the profile. Only meaningful for containers that carry video.
    pub fn configure_video_output(&mut self, preset: &VideoPreset) -> Result<()> {
        let attrs = self.negotiator.negotiate_video(preset)?;
        self.profile_mut()?.set_video_attributes(attrs);
        Ok(())
    }

    /// Configure the output container and store its attributes in the
    /// profile.
    pub fn configure_container(&mut self, container: ContainerType) -> Result<()> {
        let attrs = self.negotiator.negotiate_container(container)?;
        self.profile_mut()?.set_container_attributes(attrs);
        Ok(())
    }

    /// Build the transcode topology toward `output_url` and run the
    /// session to completion. Blocks until the output is finalized or the
    /// first failure.
    ///
    /// Consumes the profile: the built graph owns it afterwards, so the
    /// configure steps must be repeated before another encode.
    pub fn encode_to_file(&mut self, output_url: &str) -> Result<()> {
        if output_url.is_empty() {
            return Err(Error::InvalidArgument("output URL must not be empty"));
        }
        let source = self
            .source
            .ok_or(Error::InvalidArgument("no open source; call open first"))?;
        let session = self
            .session
            .ok_or(Error::InvalidArgument("no session; call open first"))?;
        let profile = self
            .profile
            .take()
            .ok_or(Error::InvalidArgument("profile already consumed"))?;

        build_transcode_topology(&mut self.engine, source, output_url, profile, session)?;

        let mut driver = SessionDriver::new(session);
        driver.run_to_completion(&mut self.engine)
    }

    /// Tear down the source and session.
    ///
    /// Source first; the session is only shut down if the source teardown
    /// succeeded. Idempotent: a second call is a no-op.
    pub fn shutdown(&mut self) -> Result<()> {
        let source = self.source.take();
        let session = self.session.take();
        session::shutdown_all(&mut self.engine, source, session)
    }

    /// The underlying engine.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Mutable access to the underlying engine.
    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    fn profile_mut(&mut self) -> Result<&mut OutputProfile> {
        self.profile
            .as_mut()
            .ok_or(Error::InvalidArgument("no profile; call open first"))
    }
}

impl<E: MediaEngine> Drop for Transcoder<E> {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown() {
            // Teardown failures are reported, never propagated out of drop.
            tracing::warn!(error = %e, "transcoder teardown failed");
        }
    }
}
