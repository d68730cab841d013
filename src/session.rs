//! Session lifecycle driving.
//!
//! The session driver is a synchronous pull-loop over engine lifecycle
//! events. Each pulled event is checked for a carried failure status
//! first: a failure terminates the loop immediately with that status,
//! whatever the event kind. Only on a success status does the kind
//! dispatch apply:
//!
//! | Event       | Action                       |
//! |-------------|------------------------------|
//! | TopologySet | issue the start command      |
//! | Started     | observe                      |
//! | Ended       | issue the close command      |
//! | Closed      | loop terminates successfully |
//! | other       | accepted and skipped         |
//!
//! The observed state only ever moves forward through
//! Unbound → TopologySet → Started → Ended → Closed; events may be
//! skipped, the state never regresses.

use crate::engine::{MediaEngine, SessionEventKind, SessionId, SourceId};
use crate::error::{Error, Result};

/// The driver's view of how far the session has progressed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum SessionState {
    /// No topology bound yet.
    #[default]
    Unbound,
    /// The session accepted the topology.
    TopologySet,
    /// Processing is running.
    Started,
    /// The source is drained.
    Ended,
    /// The session closed and the output is finalized. Terminal.
    Closed,
}

/// Drives one session's event loop to completion.
#[derive(Debug)]
pub struct SessionDriver {
    session: SessionId,
    state: SessionState,
}

impl SessionDriver {
    /// Create a driver for `session`, starting in [`SessionState::Unbound`].
    pub fn new(session: SessionId) -> Self {
        Self {
            session,
            state: SessionState::Unbound,
        }
    }

    /// The session being driven.
    pub fn session(&self) -> SessionId {
        self.session
    }

    /// The last observed lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Run the session to completion, blocking the calling thread.
    ///
    /// Pulls one event at a time; the first event carrying a failure
    /// status terminates the loop with [`Error::Session`] carrying that
    /// status, overriding whatever kind the event had. The only successful
    /// exit is the `Closed` event.
    pub fn run_to_completion<E: MediaEngine>(&mut self, engine: &mut E) -> Result<()> {
        loop {
            let event = engine.next_event(self.session)?;

            // The status carried by the event wins over the event kind.
            if event.status.is_failure() {
                tracing::error!(
                    status = %event.status,
                    kind = %event.kind,
                    "session event carried a failure status"
                );
                return Err(Error::Session(event.status));
            }

            match event.kind {
                SessionEventKind::TopologySet => {
                    self.start(engine)?;
                    self.advance(SessionState::TopologySet);
                    tracing::info!("ready to start");
                }
                SessionEventKind::Started => {
                    self.advance(SessionState::Started);
                    tracing::info!("started encoding");
                }
                SessionEventKind::Ended => {
                    engine.close(self.session)?;
                    self.advance(SessionState::Ended);
                    tracing::info!("finished encoding");
                }
                SessionEventKind::Closed => {
                    self.advance(SessionState::Closed);
                    tracing::info!("output file created");
                    return Ok(());
                }
                SessionEventKind::Other(code) => {
                    tracing::trace!(code, "skipping unhandled session event");
                }
            }
        }
    }

    /// Issue the start command: start from the beginning of the source,
    /// no extra parameters.
    pub fn start<E: MediaEngine>(&mut self, engine: &mut E) -> Result<()> {
        match engine.start(self.session) {
            Ok(()) => Ok(()),
            Err(e) => {
                tracing::error!(error = %e, "failed to start the session");
                Err(e)
            }
        }
    }

    /// Advance the observed state. Monotone: a target at or behind the
    /// current state is ignored.
    fn advance(&mut self, to: SessionState) {
        if to > self.state {
            self.state = to;
        }
    }
}

/// Best-effort teardown: shut down the source first, then the session only
/// if the source teardown succeeded.
///
/// `None` handles are skipped. The first failure is returned for
/// reporting; callers in destructor position log it and move on.
pub fn shutdown_all<E: MediaEngine>(
    engine: &mut E,
    source: Option<SourceId>,
    session: Option<SessionId>,
) -> Result<()> {
    if let Some(source) = source {
        engine.shutdown_source(source)?;
    }
    if let Some(session) = session {
        engine.shutdown_session(session)?;
    }
    Ok(())
}
