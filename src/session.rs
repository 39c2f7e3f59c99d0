//! Session view-model: the mutable state behind the prompt.
//!
//! One `SessionView` lives for the whole program. Each submission runs as a
//! "flow" stamped with an epoch token; a newer submission invalidates the
//! older flow's ability to mutate the session, so a slow response can never
//! overwrite the result of a later one. The rendered chart is owned here as
//! a singular artifact: installing a new one removes the previous file
//! first, and dropping the session removes the last one.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

/// Status line shown while the second network call is in flight
pub const TRAINING_STATUS: &str =
    "Training ensemble models and generating 3-month predictions...";

/// Status line shown while the first network call is in flight
pub fn loading_status(ticker: &str) -> String {
    format!(
        "Fetching full history for {} and training ensemble models...",
        ticker
    )
}

/// What the prompt is currently showing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    Idle,
    Loading { status: String },
    Ready,
    Failed { message: String },
}

/// Inputs to the state machine
#[derive(Debug, Clone)]
pub enum ViewEvent {
    Submit { status: String },
    StatusUpdate { status: String },
    Loaded,
    Errored { message: String },
}

impl ViewState {
    /// The single transition function. A submission is accepted from any
    /// state (it resets whatever was shown before); the other events only
    /// apply while loading, and are ignored otherwise.
    pub fn transition(self, event: ViewEvent) -> ViewState {
        match (self, event) {
            (_, ViewEvent::Submit { status }) => ViewState::Loading { status },
            (ViewState::Loading { .. }, ViewEvent::StatusUpdate { status }) => {
                ViewState::Loading { status }
            }
            (ViewState::Loading { .. }, ViewEvent::Loaded) => ViewState::Ready,
            (ViewState::Loading { .. }, ViewEvent::Errored { message }) => {
                ViewState::Failed { message }
            }
            (state, event) => {
                debug!("ignoring {:?} in state {:?}", event, state);
                state
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading { .. })
    }
}

/// Epoch stamp handed out per submission; stale tokens mutate nothing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowToken {
    epoch: u64,
}

/// The rendered chart PNG on disk. Singular per session; the file is
/// removed when the artifact is replaced or dropped.
#[derive(Debug)]
pub struct ChartArtifact {
    path: PathBuf,
}

impl ChartArtifact {
    fn write(path: PathBuf, png: &[u8]) -> io::Result<Self> {
        fs::write(&path, png)?;
        Ok(ChartArtifact { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ChartArtifact {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            debug!("could not remove chart file {}: {}", self.path.display(), e);
        }
    }
}

pub struct SessionView {
    state: ViewState,
    epoch: u64,
    current_ticker: Option<String>,
    chart: Option<ChartArtifact>,
    chart_dir: PathBuf,
}

impl SessionView {
    pub fn new(chart_dir: impl Into<PathBuf>) -> Self {
        SessionView {
            state: ViewState::Idle,
            epoch: 0,
            current_ticker: None,
            chart: None,
            chart_dir: chart_dir.into(),
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn current_ticker(&self) -> Option<&str> {
        self.current_ticker.as_deref()
    }

    pub fn chart_path(&self) -> Option<&Path> {
        self.chart.as_ref().map(|c| c.path())
    }

    /// Start a new flow for `ticker`: bumps the epoch (invalidating any
    /// in-flight flow) and moves the view into the loading state.
    pub fn begin_flow(&mut self, ticker: &str) -> FlowToken {
        self.epoch += 1;
        self.current_ticker = Some(ticker.to_string());
        self.apply(ViewEvent::Submit {
            status: loading_status(ticker),
        });
        FlowToken { epoch: self.epoch }
    }

    /// Update the loading status line. Returns false for stale tokens.
    pub fn set_status(&mut self, token: &FlowToken, status: &str) -> bool {
        if self.is_stale(token) {
            return false;
        }
        self.apply(ViewEvent::StatusUpdate {
            status: status.to_string(),
        });
        true
    }

    /// Finish the flow successfully. Returns false for stale tokens.
    pub fn complete(&mut self, token: &FlowToken) -> bool {
        if self.is_stale(token) {
            return false;
        }
        self.apply(ViewEvent::Loaded);
        true
    }

    /// Finish the flow with an error message. Returns false for stale
    /// tokens. Any previously installed chart stays as it was.
    pub fn fail(&mut self, token: &FlowToken, message: impl Into<String>) -> bool {
        if self.is_stale(token) {
            return false;
        }
        self.apply(ViewEvent::Errored {
            message: message.into(),
        });
        true
    }

    /// Install the rendered chart for this flow, replacing (and deleting)
    /// the previous artifact. Stale tokens install nothing.
    pub fn install_chart(
        &mut self,
        token: &FlowToken,
        ticker: &str,
        png: &[u8],
    ) -> io::Result<Option<PathBuf>> {
        if self.is_stale(token) {
            return Ok(None);
        }

        fs::create_dir_all(&self.chart_dir)?;
        let path = self.chart_dir.join(format!("forecast_{}.png", ticker));

        // Release the prior artifact before the new one goes live, so there
        // is never more than one chart file at a time.
        self.chart = None;
        let artifact = ChartArtifact::write(path, png)?;
        let installed = artifact.path().to_path_buf();
        self.chart = Some(artifact);
        Ok(Some(installed))
    }

    fn is_stale(&self, token: &FlowToken) -> bool {
        if token.epoch != self.epoch {
            warn!(
                "discarding result from superseded flow (epoch {} < {})",
                token.epoch, self.epoch
            );
            true
        } else {
            false
        }
    }

    fn apply(&mut self, event: ViewEvent) {
        let state = std::mem::replace(&mut self.state, ViewState::Idle);
        self.state = state.transition(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("tickerscope_test_{}", name));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_transition_happy_path() {
        let state = ViewState::Idle;
        let state = state.transition(ViewEvent::Submit {
            status: "loading".into(),
        });
        assert!(state.is_loading());
        let state = state.transition(ViewEvent::StatusUpdate {
            status: "training".into(),
        });
        assert_eq!(
            state,
            ViewState::Loading {
                status: "training".into()
            }
        );
        assert_eq!(state.transition(ViewEvent::Loaded), ViewState::Ready);
    }

    #[test]
    fn test_transition_failure_path() {
        let state = ViewState::Loading {
            status: "loading".into(),
        };
        assert_eq!(
            state.transition(ViewEvent::Errored {
                message: "boom".into()
            }),
            ViewState::Failed {
                message: "boom".into()
            }
        );
    }

    #[test]
    fn test_transition_ignores_events_outside_loading() {
        assert_eq!(ViewState::Idle.transition(ViewEvent::Loaded), ViewState::Idle);
        assert_eq!(
            ViewState::Ready.transition(ViewEvent::Errored {
                message: "late".into()
            }),
            ViewState::Ready
        );
    }

    #[test]
    fn test_submission_resets_any_state() {
        let failed = ViewState::Failed {
            message: "old".into(),
        };
        assert!(failed
            .transition(ViewEvent::Submit {
                status: "retry".into()
            })
            .is_loading());
    }

    #[test]
    fn test_stale_token_cannot_mutate_session() {
        let mut session = SessionView::new(test_dir("stale"));
        let first = session.begin_flow("AAPL");
        let _second = session.begin_flow("MSFT");

        assert!(!session.complete(&first));
        assert!(session.state().is_loading());
        assert_eq!(session.current_ticker(), Some("MSFT"));

        assert!(!session.fail(&first, "too late"));
        assert!(session.state().is_loading());
    }

    #[test]
    fn test_failure_keeps_previous_chart() {
        let dir = test_dir("keep_chart");
        let mut session = SessionView::new(&dir);

        let token = session.begin_flow("AAPL");
        let path = session
            .install_chart(&token, "AAPL", b"png-bytes")
            .unwrap()
            .unwrap();
        assert!(session.complete(&token));
        assert!(path.exists());

        // Second flow fails after the first network call; the chart from
        // the previous success must survive untouched.
        let token = session.begin_flow("ZZZZ");
        assert!(session.fail(&token, "No data found for ticker ZZZZ"));
        assert_eq!(session.chart_path(), Some(path.as_path()));
        assert!(path.exists());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_chart_replacement_releases_prior_artifact() {
        let dir = test_dir("replace_chart");
        let mut session = SessionView::new(&dir);

        let token = session.begin_flow("AAPL");
        let first = session
            .install_chart(&token, "AAPL", b"first")
            .unwrap()
            .unwrap();
        session.complete(&token);

        let token = session.begin_flow("MSFT");
        let second = session
            .install_chart(&token, "MSFT", b"second")
            .unwrap()
            .unwrap();
        session.complete(&token);

        assert!(!first.exists());
        assert!(second.exists());
        assert_eq!(session.chart_path(), Some(second.as_path()));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_stale_token_installs_nothing() {
        let dir = test_dir("stale_install");
        let mut session = SessionView::new(&dir);

        let first = session.begin_flow("AAPL");
        let _second = session.begin_flow("MSFT");

        let installed = session.install_chart(&first, "AAPL", b"late").unwrap();
        assert!(installed.is_none());
        assert!(session.chart_path().is_none());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_dropping_session_removes_artifact() {
        let dir = test_dir("drop_session");
        let path = {
            let mut session = SessionView::new(&dir);
            let token = session.begin_flow("AAPL");
            session
                .install_chart(&token, "AAPL", b"png")
                .unwrap()
                .unwrap()
        };
        assert!(!path.exists());

        let _ = fs::remove_dir_all(&dir);
    }
}
