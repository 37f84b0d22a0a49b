//! Data models for move types, scan steps, and scan records.

pub mod move_type;
pub mod scan;

pub use move_type::MoveType;
pub use scan::{CompletedMove, FlowStep, ScanRecord, StepStatus, field_label};
