//! Guided barcode scan flow for moving inventory between bins.
//!
//! The flow walks the operator through four steps (source bin, pallet or
//! asset, destination bin, confirm) and reports the finished move through a
//! completion handler. Validation and commit are delegated to injected
//! collaborators.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use warehouse_scan::scan::{MockCommitter, MockValidator, ScanFlow};
//!
//! let flow = ScanFlow::new(Arc::new(MockValidator::default()), Arc::new(MockCommitter::default()))
//!     .on_complete(|done| println!("{}", done.summary()));
//! flow.submit_scan("BIN-01").await?;
//! flow.submit_scan("PALLET-001").await?;
//! flow.submit_scan("BIN-42").await?;
//! flow.confirm_move().await?;
//! ```

mod collaborator;
mod error;
mod flow;


pub use collaborator::{
    CommitReceipt, MOCK_COMMIT_DELAY, MOCK_VALIDATE_DELAY, MockCommitter, MockValidator, MoveCommitter, ScanRequest,
    ScanValidator, Verdict,
};
pub use error::{FlowError, Result};
pub use flow::{CompletionHandler, DEFAULT_OPERATION_TIMEOUT, Feedback, FlowSnapshot, ScanFlow};
