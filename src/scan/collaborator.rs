//! Validation and commit capabilities injected into the scan flow.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::models::{FlowStep, MoveType, ScanRecord};

/// A scanned value submitted for validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanRequest {
    pub step: FlowStep,
    pub value: String,
    pub move_type: MoveType,
}

/// Outcome of validating a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Accept,
    /// Rejected, with an optional reason for the operator.
    Reject(Option<String>),
}

/// Result of a committed move.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitReceipt {
    pub reference: Option<String>,
}

/// Checks a scanned identifier against the bin/asset/pallet registry.
#[async_trait]
pub trait ScanValidator: Send + Sync {
    async fn validate(&self, request: &ScanRequest) -> Result<Verdict>;
}

/// Performs the warehouse move transaction.
#[async_trait]
pub trait MoveCommitter: Send + Sync {
    async fn commit(&self, record: &ScanRecord) -> Result<CommitReceipt>;
}

/// Delay of [`MockValidator::default`].
pub const MOCK_VALIDATE_DELAY: Duration = Duration::from_millis(500);

/// Delay of [`MockCommitter::default`].
pub const MOCK_COMMIT_DELAY: Duration = Duration::from_millis(1000);

/// Accepts any non-empty value after a fixed delay.
#[derive(Debug, Clone)]
pub struct MockValidator {
    delay: Duration,
}

impl MockValidator {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for MockValidator {
    fn default() -> Self {
        Self::new(MOCK_VALIDATE_DELAY)
    }
}

#[async_trait]
impl ScanValidator for MockValidator {
    async fn validate(&self, request: &ScanRequest) -> Result<Verdict> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        debug!("Mock validation of {} '{}'", request.step.as_str(), request.value);

        if request.value.trim().is_empty() {
            Ok(Verdict::Reject(None))
        } else {
            Ok(Verdict::Accept)
        }
    }
}

/// Always commits successfully after a fixed delay.
#[derive(Debug, Clone)]
pub struct MockCommitter {
    delay: Duration,
}

impl MockCommitter {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for MockCommitter {
    fn default() -> Self {
        Self::new(MOCK_COMMIT_DELAY)
    }
}

#[async_trait]
impl MoveCommitter for MockCommitter {
    async fn commit(&self, record: &ScanRecord) -> Result<CommitReceipt> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        debug!(
            "Mock commit of {} {} -> {}",
            record.asset_id, record.current_location, record.destination_location
        );
        Ok(CommitReceipt::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(value: &str) -> ScanRequest {
        ScanRequest {
            step: FlowStep::Current,
            value: value.to_string(),
            move_type: MoveType::BinToBin,
        }
    }

    #[tokio::test]
    async fn test_mock_validator_accepts_non_empty() {
        let validator = MockValidator::new(Duration::ZERO);
        assert_eq!(validator.validate(&request("BIN-1")).await.unwrap(), Verdict::Accept);
    }

    #[tokio::test]
    async fn test_mock_validator_rejects_blank() {
        let validator = MockValidator::new(Duration::ZERO);
        assert_eq!(validator.validate(&request("  ")).await.unwrap(), Verdict::Reject(None));
    }

    #[test]
    fn test_mock_default_delays() {
        assert_eq!(MockValidator::default().delay, Duration::from_millis(500));
        assert_eq!(MockCommitter::default().delay, Duration::from_millis(1000));
    }

    #[tokio::test]
    async fn test_mock_committer_waits_for_delay() {
        let committer = MockCommitter::new(Duration::from_millis(20));
        let start = tokio::time::Instant::now();
        let receipt = committer.commit(&ScanRecord::default()).await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(20));
        assert_eq!(receipt, CommitReceipt::default());
    }
}
