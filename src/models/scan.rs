//! Scan run data: steps, the accumulated record, and completed moves.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use super::MoveType;

/// Position in the guided scan sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowStep {
    #[default]
    Current,
    Asset,
    Destination,
    Confirm,
    Complete,
}

/// Indicator state of one step relative to the active step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Done,
    Active,
    Pending,
}

impl FlowStep {
    /// Steps shown in the step indicator, in order.
    pub const VISIBLE: [FlowStep; 4] = [FlowStep::Current, FlowStep::Asset, FlowStep::Destination, FlowStep::Confirm];

    /// Following step. `Complete` is terminal.
    pub fn next(self) -> Option<FlowStep> {
        match self {
            FlowStep::Current => Some(FlowStep::Asset),
            FlowStep::Asset => Some(FlowStep::Destination),
            FlowStep::Destination => Some(FlowStep::Confirm),
            FlowStep::Confirm => Some(FlowStep::Complete),
            FlowStep::Complete => None,
        }
    }

    /// One-based step number shown to the operator.
    pub fn number(self) -> Option<u8> {
        match self {
            FlowStep::Current => Some(1),
            FlowStep::Asset => Some(2),
            FlowStep::Destination => Some(3),
            FlowStep::Confirm => Some(4),
            FlowStep::Complete => None,
        }
    }

    /// Whether this step captures a scanned value.
    pub fn is_capture(self) -> bool {
        matches!(self, FlowStep::Current | FlowStep::Asset | FlowStep::Destination)
    }

    /// Short title used by the step indicator.
    pub fn title(self, move_type: MoveType) -> &'static str {
        match self {
            FlowStep::Current => "Current Bin",
            FlowStep::Asset if move_type.scans_asset() => "Asset/Serial",
            FlowStep::Asset => "Pallet No.",
            FlowStep::Destination => "Destination Bin",
            FlowStep::Confirm => "Confirm",
            FlowStep::Complete => "Complete",
        }
    }

    /// Status of `self` in an indicator whose active step is `active`.
    pub fn status(self, active: FlowStep) -> StepStatus {
        if self == active {
            StepStatus::Active
        } else if self < active {
            StepStatus::Done
        } else {
            StepStatus::Pending
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FlowStep::Current => "current",
            FlowStep::Asset => "asset",
            FlowStep::Destination => "destination",
            FlowStep::Confirm => "confirm",
            FlowStep::Complete => "complete",
        }
    }
}

/// Human-readable name of the value captured at `step`.
pub fn field_label(step: FlowStep, move_type: MoveType) -> &'static str {
    match step {
        FlowStep::Current => "current bin location",
        FlowStep::Asset if move_type.scans_asset() => "asset/serial",
        FlowStep::Asset => "pallet number",
        FlowStep::Destination if move_type == MoveType::InitialBin => "initial bin location",
        FlowStep::Destination => "destination bin location",
        FlowStep::Confirm | FlowStep::Complete => "",
    }
}

/// Identifiers accumulated over one scan run.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanRecord {
    pub current_location: String,
    pub asset_id: String,
    pub destination_location: String,
    pub move_type: MoveType,
}

impl ScanRecord {
    /// Empty record with the source bin pre-filled.
    pub fn with_location(location: impl Into<String>) -> Self {
        Self {
            current_location: location.into(),
            ..Self::default()
        }
    }

    /// Field written by a scan at `step`, if any.
    pub fn field_mut(&mut self, step: FlowStep) -> Option<&mut String> {
        match step {
            FlowStep::Current => Some(&mut self.current_location),
            FlowStep::Asset => Some(&mut self.asset_id),
            FlowStep::Destination => Some(&mut self.destination_location),
            FlowStep::Confirm | FlowStep::Complete => None,
        }
    }

    /// Whether all three identifiers have been captured.
    pub fn is_complete(&self) -> bool {
        !self.current_location.is_empty() && !self.asset_id.is_empty() && !self.destination_location.is_empty()
    }
}

/// A committed move, handed to the completion handler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedMove {
    pub record: ScanRecord,
    /// Reference returned by the commit back end, if any.
    pub reference: Option<String>,
    pub completed_at: DateTime<Local>,
}

impl CompletedMove {
    /// One-line summary for logs and lists.
    pub fn summary(&self) -> String {
        format!(
            "{}: {} {} -> {}",
            self.record.move_type.display_name(),
            self.record.asset_id,
            self.record.current_location,
            self.record.destination_location
        )
    }
}
