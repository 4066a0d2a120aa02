//! Food image analysis.
//!
//! The analyzer itself is an external collaborator behind [`FoodAnalyzer`].
//! [`ScanSession`] tracks a single scanner interaction: at most one analysis
//! may be pending, and a finished analysis leaves either a pre-filled
//! [`FoodDraft`] for review, a "not food" outcome, or a failure message.

use crate::config::AnalysisConfig;
use crate::{AnalysisResult, Error, FoodDraft, Result};
use std::io::{Read, Write};
use std::process::{Command, Stdio};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

/// Environment variable carrying the optional free-text context
pub const CONTEXT_ENV: &str = "CALORIE_CONTEXT";

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Image-in, nutrition-guess-out collaborator
pub trait FoodAnalyzer {
    fn analyze(&self, image: &[u8], context: Option<&str>) -> Result<AnalysisResult>;
}

/// Runs an external program: image bytes on stdin, `AnalysisResult` JSON on stdout
#[derive(Clone, Debug)]
pub struct CommandAnalyzer {
    command: Vec<String>,
    timeout: Duration,
}

impl CommandAnalyzer {
    pub fn new(command: Vec<String>, timeout: Duration) -> Self {
        Self { command, timeout }
    }

    fn timed_out(&self, program: &str) -> Error {
        tracing::warn!("Analyzer {} timed out after {:?}", program, self.timeout);
        Error::Analysis(format!(
            "analysis timed out after {}s",
            self.timeout.as_secs()
        ))
    }

    /// Build from config; `None` when no command is configured
    pub fn from_config(config: &AnalysisConfig) -> Option<Self> {
        if config.command.is_empty() {
            return None;
        }
        Some(Self::new(
            config.command.clone(),
            Duration::from_secs(config.timeout_secs),
        ))
    }
}

impl FoodAnalyzer for CommandAnalyzer {
    fn analyze(&self, image: &[u8], context: Option<&str>) -> Result<AnalysisResult> {
        let (program, args) = self
            .command
            .split_first()
            .ok_or_else(|| Error::Analysis("no analyzer command configured".into()))?;

        let mut cmd = Command::new(program);
        cmd.args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit());
        if let Some(context) = context {
            cmd.env(CONTEXT_ENV, context);
        }

        let mut child = cmd
            .spawn()
            .map_err(|e| Error::Analysis(format!("failed to start {}: {}", program, e)))?;
        tracing::debug!("Started analyzer {} (pid {})", program, child.id());

        // Feed stdin and drain stdout on their own threads so neither pipe can
        // fill up while we wait on the child.
        let stdin = child.stdin.take();
        let image = image.to_vec();
        thread::spawn(move || {
            if let Some(mut stdin) = stdin {
                if let Err(e) = stdin.write_all(&image) {
                    tracing::debug!("Analyzer closed stdin early: {}", e);
                }
            }
        });

        let mut stdout = child
            .stdout
            .take()
            .ok_or_else(|| Error::Analysis("analyzer stdout unavailable".into()))?;
        // The read can outlive the child when a helper it spawned keeps the
        // pipe open, so the result comes back over a channel under the same
        // deadline.
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = tx.send(stdout.read_to_end(&mut buf).map(|_| buf));
        });

        let deadline = Instant::now() + self.timeout;
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => {}
                Err(e) => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(Error::Analysis(format!(
                        "failed to wait for analyzer: {}",
                        e
                    )));
                }
            }
            if Instant::now() >= deadline {
                let _ = child.kill();
                let _ = child.wait();
                return Err(self.timed_out(program));
            }
            thread::sleep(POLL_INTERVAL);
        };

        let remaining = deadline.saturating_duration_since(Instant::now());
        let output = match rx.recv_timeout(remaining) {
            Ok(read) => read?,
            Err(RecvTimeoutError::Timeout) => return Err(self.timed_out(program)),
            Err(RecvTimeoutError::Disconnected) => {
                return Err(Error::Analysis("analyzer output reader panicked".into()))
            }
        };

        if !status.success() {
            return Err(Error::Analysis(format!("analyzer exited with {}", status)));
        }

        serde_json::from_slice(&output)
            .map_err(|e| Error::Analysis(format!("invalid analyzer output: {}", e)))
    }
}

/// Where a scanner interaction currently stands
#[derive(Clone, Debug, Default, PartialEq)]
pub enum ScanState {
    #[default]
    Idle,
    Analyzing,
    /// Analysis succeeded; the draft awaits confirmation
    Review(FoodDraft),
    /// The image was not recognised as food
    NotFood,
    /// Analysis failed; the user may retry or enter the food manually
    Failed(String),
}

/// Result of a finished analysis
#[derive(Clone, Debug, PartialEq)]
pub enum ScanOutcome {
    Draft(FoodDraft),
    NotFood,
}

#[derive(Debug, Default)]
pub struct ScanSession {
    state: ScanState,
}

impl ScanSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ScanState {
        &self.state
    }

    pub fn is_pending(&self) -> bool {
        self.state == ScanState::Analyzing
    }

    /// Mark an analysis as outstanding
    ///
    /// # Errors
    /// `Error::AnalysisInProgress` if one is already pending.
    pub fn begin(&mut self) -> Result<()> {
        if self.is_pending() {
            return Err(Error::AnalysisInProgress);
        }
        self.state = ScanState::Analyzing;
        Ok(())
    }

    /// Resolve the outstanding analysis
    ///
    /// `image_url` is attached to the resulting draft. Failures move the
    /// session to `Failed` and are returned to the caller.
    pub fn finish(
        &mut self,
        result: Result<AnalysisResult>,
        image_url: Option<String>,
    ) -> Result<ScanOutcome> {
        if !self.is_pending() {
            return Err(Error::Analysis("no analysis in progress".into()));
        }

        match result {
            Ok(analysis) => match FoodDraft::from_analysis(&analysis) {
                Some(mut draft) => {
                    draft.image_url = image_url;
                    tracing::info!(
                        "Analysis recognised {} (~{:.0} kcal)",
                        draft.name,
                        draft.calories
                    );
                    self.state = ScanState::Review(draft.clone());
                    Ok(ScanOutcome::Draft(draft))
                }
                None => {
                    tracing::info!("Analysis did not recognise food");
                    self.state = ScanState::NotFood;
                    Ok(ScanOutcome::NotFood)
                }
            },
            Err(e) => {
                tracing::warn!("Food analysis failed: {}", e);
                self.state = ScanState::Failed(e.to_string());
                Err(e)
            }
        }
    }

    /// Run a complete analysis against `analyzer`
    pub fn analyze<A: FoodAnalyzer + ?Sized>(
        &mut self,
        analyzer: &A,
        image: &[u8],
        context: Option<&str>,
        image_url: Option<String>,
    ) -> Result<ScanOutcome> {
        self.begin()?;
        let result = analyzer.analyze(image, context);
        self.finish(result, image_url)
    }

    /// Take the reviewed draft for saving, returning the session to idle
    pub fn take_draft(&mut self) -> Option<FoodDraft> {
        match std::mem::take(&mut self.state) {
            ScanState::Review(draft) => Some(draft),
            other => {
                self.state = other;
                None
            }
        }
    }

    pub fn reset(&mut self) {
        self.state = ScanState::Idle;
    }
}
