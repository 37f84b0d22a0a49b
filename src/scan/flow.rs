//! Guided scan flow state machine.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::Local;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::config::ScanConfig;
use crate::models::{CompletedMove, FlowStep, MoveType, ScanRecord, field_label};

use super::collaborator::{CommitReceipt, MoveCommitter, ScanRequest, ScanValidator, Verdict};
use super::error::{FlowError, Result};

/// Default bound on a single validation or commit call.
pub const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(15);

/// Callback fired once per run when a move has been committed.
pub type CompletionHandler = Arc<dyn Fn(&CompletedMove) + Send + Sync>;

/// Outcome of the last scan or commit, shown to the operator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Feedback {
    #[default]
    None,
    Error(String),
    Success(String),
}

/// Point-in-time copy of the flow state for rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlowSnapshot {
    pub step: FlowStep,
    pub record: ScanRecord,
    pub feedback: Feedback,
    pub processing: bool,
}

impl FlowSnapshot {
    /// Label of the value expected at the current step.
    pub fn label(&self) -> &'static str {
        field_label(self.step, self.record.move_type)
    }

    /// Reset has nothing to discard only on a fresh run.
    pub fn can_reset(&self) -> bool {
        !(self.step == FlowStep::Current && self.record.current_location.is_empty())
    }

    pub fn can_select_move_type(&self) -> bool {
        self.step == FlowStep::Current && !self.processing
    }

    pub fn accepts_scans(&self) -> bool {
        self.step.is_capture() && !self.processing
    }
}

#[derive(Debug, Default)]
struct FlowState {
    step: FlowStep,
    record: ScanRecord,
    feedback: Feedback,
    processing: bool,
    /// Bumped on every reset; results from an older run never touch the current one.
    generation: u64,
}

/// Marks an in-flight validation or commit.
///
/// Dropping an armed guard (the caller cancelled the future) returns the
/// flow to idle, unless the run has since been reset.
struct PendingGuard {
    state: Arc<Mutex<FlowState>>,
    generation: u64,
    armed: bool,
}

impl PendingGuard {
    fn new(state: &Arc<Mutex<FlowState>>, generation: u64) -> Self {
        Self {
            state: state.clone(),
            generation,
            armed: true,
        }
    }

    /// The operation finished and its result is being applied.
    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.generation == self.generation {
            state.processing = false;
            debug!("Pending scan operation cancelled");
        }
    }
}

/// Scan flow handle.
///
/// Clones share one run. Validation and commit calls are made without
/// holding the state lock; while one is pending, other mutating calls are
/// rejected with [`FlowError::Busy`].
#[derive(Clone)]
pub struct ScanFlow {
    state: Arc<Mutex<FlowState>>,
    validator: Arc<dyn ScanValidator>,
    committer: Arc<dyn MoveCommitter>,
    on_complete: Option<CompletionHandler>,
    timeout: Duration,
}

impl ScanFlow {
    pub fn new(validator: Arc<dyn ScanValidator>, committer: Arc<dyn MoveCommitter>) -> Self {
        Self {
            state: Arc::new(Mutex::new(FlowState::default())),
            validator,
            committer,
            on_complete: None,
            timeout: DEFAULT_OPERATION_TIMEOUT,
        }
    }

    /// Build a flow using the scan settings from config.
    pub fn from_config(config: &ScanConfig, validator: Arc<dyn ScanValidator>, committer: Arc<dyn MoveCommitter>) -> Self {
        Self::new(validator, committer)
            .with_default_location(config.default_location.trim())
            .with_timeout(Duration::from_secs(config.operation_timeout_secs))
    }

    /// Pre-fill the source bin shown in the summary of the first run.
    ///
    /// The step-1 scan still has to be made and overwrites it; reset does
    /// not restore it.
    pub fn with_default_location(self, location: impl Into<String>) -> Self {
        self.lock().record = ScanRecord::with_location(location);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the completion handler.
    pub fn on_complete<F>(mut self, handler: F) -> Self
    where
        F: Fn(&CompletedMove) + Send + Sync + 'static,
    {
        self.on_complete = Some(Arc::new(handler));
        self
    }

    fn lock(&self) -> MutexGuard<'_, FlowState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> FlowSnapshot {
        let state = self.lock();
        FlowSnapshot {
            step: state.step,
            record: state.record.clone(),
            feedback: state.feedback.clone(),
            processing: state.processing,
        }
    }

    pub fn step(&self) -> FlowStep {
        self.lock().step
    }

    pub fn record(&self) -> ScanRecord {
        self.lock().record.clone()
    }

    pub fn is_processing(&self) -> bool {
        self.lock().processing
    }

    /// Choose the move type. Only allowed at the first step while idle.
    pub fn select_move_type(&self, move_type: MoveType) -> Result<()> {
        let mut state = self.lock();
        if state.step != FlowStep::Current {
            return Err(FlowError::WrongStep {
                operation: "change the move type",
                step: state.step,
            });
        }
        if state.processing {
            return Err(FlowError::Busy);
        }
        if state.record.move_type != move_type {
            debug!("Move type set to {}", move_type);
        }
        state.record.move_type = move_type;
        Ok(())
    }

    /// Submit a scanned value for the current step.
    ///
    /// On acceptance the value is stored and the flow advances; the new step
    /// is returned. Rejections leave the record and step untouched.
    pub async fn submit_scan(&self, raw: &str) -> Result<FlowStep> {
        let value = raw.trim();

        let (request, generation) = {
            let mut state = self.lock();
            if !state.step.is_capture() {
                return Err(FlowError::WrongStep {
                    operation: "submit a scan",
                    step: state.step,
                });
            }
            if state.processing {
                return Err(FlowError::Busy);
            }
            if value.is_empty() {
                let message = format!("Please scan a {}.", field_label(state.step, state.record.move_type));
                state.feedback = Feedback::Error(message.clone());
                return Err(FlowError::Validation(message));
            }

            state.feedback = Feedback::None;
            state.processing = true;
            let request = ScanRequest {
                step: state.step,
                value: value.to_string(),
                move_type: state.record.move_type,
            };
            (request, state.generation)
        };
        let mut pending = PendingGuard::new(&self.state, generation);

        debug!("Validating {} scan '{}'", request.step.as_str(), request.value);
        let verdict = match timeout(self.timeout, self.validator.validate(&request)).await {
            Ok(Ok(verdict)) => verdict,
            Ok(Err(e)) => Verdict::Reject(Some(e.to_string())),
            Err(_) => Verdict::Reject(Some(format!("Validation timed out after {:?}", self.timeout))),
        };

        pending.disarm();
        let mut state = self.lock();
        if state.generation != generation {
            debug!("Discarding scan result from a reset run");
            return Err(FlowError::Superseded);
        }
        state.processing = false;

        let label = field_label(request.step, request.move_type);
        match verdict {
            Verdict::Accept => {
                if let Some(field) = state.record.field_mut(request.step) {
                    *field = request.value.clone();
                }
                let next = request.step.next().unwrap_or(FlowStep::Complete);
                state.step = next;
                state.feedback = Feedback::Success(format!("Successfully scanned {label}."));
                info!("Scanned {label} '{}', now at step {}", request.value, next.as_str());
                Ok(next)
            }
            Verdict::Reject(reason) => {
                let message = reason.unwrap_or_else(|| format!("Invalid {label} scan. Please try again."));
                warn!("Rejected {label} scan '{}': {message}", request.value);
                state.feedback = Feedback::Error(message.clone());
                Err(FlowError::Validation(message))
            }
        }
    }

    /// Commit the reviewed move.
    ///
    /// On success the flow reaches `Complete` and the completion handler is
    /// called with the finalized record. On failure the flow stays at
    /// `Confirm` with the record intact.
    ///
    /// A commit that succeeds after a reset is still reported to the
    /// handler and returned, but leaves the new run untouched.
    pub async fn confirm_move(&self) -> Result<CompletedMove> {
        let (record, generation) = {
            let mut state = self.lock();
            if state.step != FlowStep::Confirm {
                return Err(FlowError::WrongStep {
                    operation: "confirm the move",
                    step: state.step,
                });
            }
            if state.processing {
                return Err(FlowError::Busy);
            }
            if !state.record.is_complete() {
                let message = "Scan record is incomplete".to_string();
                state.feedback = Feedback::Error(message.clone());
                return Err(FlowError::Validation(message));
            }
            state.feedback = Feedback::None;
            state.processing = true;
            (state.record.clone(), state.generation)
        };
        let mut pending = PendingGuard::new(&self.state, generation);

        debug!("Committing {} move of '{}'", record.move_type, record.asset_id);
        let outcome: std::result::Result<CommitReceipt, String> =
            match timeout(self.timeout, self.committer.commit(&record)).await {
                Ok(Ok(receipt)) => Ok(receipt),
                Ok(Err(e)) => Err(e.to_string()),
                Err(_) => Err(format!("Commit timed out after {:?}", self.timeout)),
            };

        pending.disarm();
        let completed = {
            let mut state = self.lock();
            let current_run = state.generation == generation;
            if current_run {
                state.processing = false;
            }

            match outcome {
                Ok(receipt) => {
                    if current_run {
                        state.step = FlowStep::Complete;
                    } else {
                        debug!("Move committed after the run was reset");
                    }
                    CompletedMove {
                        record,
                        reference: receipt.reference,
                        completed_at: Local::now(),
                    }
                }
                Err(_) if !current_run => {
                    debug!("Discarding commit failure from a reset run");
                    return Err(FlowError::Superseded);
                }
                Err(message) => {
                    warn!("Move commit failed: {message}");
                    state.feedback = Feedback::Error(message.clone());
                    return Err(FlowError::Commit(message));
                }
            }
        };

        info!("Move completed: {}", completed.summary());
        if let Some(handler) = &self.on_complete {
            handler(&completed);
        }
        Ok(completed)
    }

    /// Discard the current run and start over at the first step.
    pub fn reset(&self) {
        let mut state = self.lock();
        let generation = state.generation.wrapping_add(1);
        *state = FlowState {
            generation,
            ..FlowState::default()
        };
        debug!("Scan flow reset");
    }
}
