mod error;

pub use error::PollError;

use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::thread;
use std::time::{Duration, Instant};

use crate::api::ApiClient;
use crate::commands::{Command, CommandArgs};

/// Default wait between two assessment polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Lifecycle state of a remote scan as reported by the service. The local
/// process only observes these, it never advances them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ScanState {
    Pending,
    Starting,
    Running,
    Finished,
    Failed,
    Aborted,
}

impl ScanState {
    /// The service will not transition a scan out of any of these, so
    /// polling must stop on each of them, not only on `Finished`.
    pub fn is_terminal(self) -> bool {
        matches!(self, ScanState::Finished | ScanState::Failed | ScanState::Aborted)
    }
}

impl fmt::Display for ScanState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScanState::Pending => "PENDING",
            ScanState::Starting => "STARTING",
            ScanState::Running => "RUNNING",
            ScanState::Finished => "FINISHED",
            ScanState::Failed => "FAILED",
            ScanState::Aborted => "ABORTED",
        };
        f.write_str(name)
    }
}

/// The scan fields the poller cares about; grade, score, and test counts
/// are only populated once the scan has finished.
#[derive(Debug, Clone, Deserialize)]
pub struct ScanSnapshot {
    pub state: ScanState,
    pub scan_id: Option<u64>,
    pub grade: Option<String>,
    pub score: Option<i64>,
    pub tests_passed: Option<u32>,
    pub tests_failed: Option<u32>,
    pub tests_quantity: Option<u32>,
}

#[derive(Debug, Clone, Copy)]
pub struct ScanRequest<'a> {
    pub host: &'a str,
    pub rescan: bool,
    pub hidden: bool,
}

#[derive(Debug)]
pub struct PollOutcome {
    pub summary: ScanSnapshot,
    pub payload: Value,
    /// Number of read-only polls issued after the submission.
    pub polls: u32,
}

/// Drives the submit-then-poll-until-terminal workflow for one hostname.
/// Submission happens exactly once; afterwards the poller only reads the
/// current assessment until it observes a terminal state, the deadline
/// passes, or a call fails.
pub struct Poller<'a> {
    client: &'a dyn ApiClient,
    interval: Duration,
    deadline: Option<Duration>,
}

impl<'a> Poller<'a> {
    pub fn new(client: &'a dyn ApiClient) -> Self {
        Self {
            client,
            interval: DEFAULT_POLL_INTERVAL,
            deadline: None,
        }
    }

    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    #[must_use]
    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    /// Submit the assessment, then poll until a terminal state. The first
    /// observed state comes from the submission response itself, so a
    /// cached result returns without any poll.
    pub fn run(&self, request: &ScanRequest<'_>) -> Result<PollOutcome, PollError> {
        let mut payload = self.submit(request)?;
        let mut summary = snapshot(request.host, &payload)?;
        let started = Instant::now();
        let mut polls: u32 = 0;

        loop {
            tracing::debug!(
                host = request.host,
                state = %summary.state,
                polls,
                "observed scan state"
            );

            if summary.state.is_terminal() {
                tracing::info!(
                    host = request.host,
                    state = %summary.state,
                    grade = summary.grade.as_deref(),
                    score = summary.score,
                    "scan reached a terminal state"
                );
                return Ok(PollOutcome {
                    summary,
                    payload,
                    polls,
                });
            }

            if let Some(limit) = self.deadline {
                if started.elapsed() >= limit {
                    return Err(PollError::Cancelled {
                        host: request.host.to_string(),
                        seconds: limit.as_secs(),
                    });
                }
            }

            if polls > 0 {
                thread::sleep(self.interval);
            }

            payload = self.fetch(request.host)?;
            polls += 1;
            summary = snapshot(request.host, &payload)?;
        }
    }

    /// Invoke the assessment without waiting for it.
    pub fn submit(&self, request: &ScanRequest<'_>) -> Result<Value, PollError> {
        let mut args = CommandArgs::default();
        args.set("host", request.host);
        if request.rescan {
            args.set_flag("rescan");
        }
        if request.hidden {
            args.set_flag("hidden");
        }
        Ok(Command::InvokeAssessment.execute(self.client, &args)?)
    }

    /// Read the current assessment for `host` without side effects.
    pub fn fetch(&self, host: &str) -> Result<Value, PollError> {
        let mut args = CommandArgs::default();
        args.set("host", host);
        Ok(Command::RetrieveAssessment.execute(self.client, &args)?)
    }
}

fn snapshot(host: &str, payload: &Value) -> Result<ScanSnapshot, PollError> {
    if payload.get("state").is_none() {
        return Err(PollError::MissingState {
            host: host.to_string(),
        });
    }

    serde_json::from_value(payload.clone()).map_err(|source| PollError::InvalidState {
        host: host.to_string(),
        source,
    })
}
