//! Line-oriented scanning for keyboard-wedge scanners on headless stations.
//!
//! Each input line is a scan unless it starts with `:`:
//! `:type <move-type>`, `:confirm`, `:reset`, `:status`, `:help`, `:quit`.

use std::io::Write;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::models::{FlowStep, MoveType};
use crate::scan::{Feedback, FlowError, FlowSnapshot, ScanFlow};

/// A parsed console input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Scan(String),
    SelectType(MoveType),
    Confirm,
    Reset,
    Status,
    Help,
    Quit,
    /// Blank input line.
    Empty,
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Command {
        let line = line.trim();
        if line.is_empty() {
            return Command::Empty;
        }
        let Some(rest) = line.strip_prefix(':') else {
            return Command::Scan(line.to_string());
        };

        let mut parts = rest.split_whitespace();
        match (parts.next().map(str::to_ascii_lowercase).as_deref(), parts.next()) {
            (Some("type"), Some(tag)) => match tag.parse::<MoveType>() {
                Ok(move_type) => Command::SelectType(move_type),
                Err(_) => Command::Unknown(line.to_string()),
            },
            (Some("confirm"), None) => Command::Confirm,
            (Some("reset"), None) => Command::Reset,
            (Some("status"), None) => Command::Status,
            (Some("help"), None) => Command::Help,
            (Some("quit" | "exit"), None) => Command::Quit,
            _ => Command::Unknown(line.to_string()),
        }
    }
}

/// Prompt for the next input given the flow state.
pub fn prompt(snapshot: &FlowSnapshot) -> String {
    match snapshot.step {
        FlowStep::Confirm => "Step 4 - type :confirm to move, :reset to start over".to_string(),
        FlowStep::Complete => "Move complete - :reset to scan another item".to_string(),
        step => format!(
            "Step {} - scan {} [{}]",
            step.number().unwrap_or_default(),
            snapshot.label(),
            snapshot.record.move_type.display_name()
        ),
    }
}

/// Multi-line summary of the current record.
pub fn status(snapshot: &FlowSnapshot) -> String {
    let or_dash = |s: &str| if s.is_empty() { "-".to_string() } else { s.to_string() };
    format!(
        "Move type: {}\nFrom: {}\n{}: {}\nTo: {}",
        snapshot.record.move_type.display_name(),
        or_dash(&snapshot.record.current_location),
        FlowStep::Asset.title(snapshot.record.move_type),
        or_dash(&snapshot.record.asset_id),
        or_dash(&snapshot.record.destination_location)
    )
}

fn help() -> String {
    let types: Vec<&str> = MoveType::ALL.iter().map(|t| t.as_str()).collect();
    format!(
        "Scan a barcode and press Enter.\nCommands: :type <{}>, :confirm, :reset, :status, :quit",
        types.join("|")
    )
}

/// Run the console loop until `:quit` or end of input.
pub async fn run<R, W>(flow: &ScanFlow, input: R, out: &mut W) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    writeln!(out, "{}", help())?;
    writeln!(out, "{}", prompt(&flow.snapshot()))?;

    while let Some(line) = lines.next_line().await? {
        match Command::parse(&line) {
            Command::Quit => break,
            Command::Empty => {}
            Command::Help => writeln!(out, "{}", help())?,
            Command::Status => writeln!(out, "{}", status(&flow.snapshot()))?,
            Command::Unknown(text) => writeln!(out, "Unknown command '{text}'. Type :help for commands.")?,
            Command::SelectType(move_type) => match flow.select_move_type(move_type) {
                Ok(()) => writeln!(out, "Move type: {}", move_type.display_name())?,
                Err(e) => writeln!(out, "{e}")?,
            },
            Command::Reset => {
                flow.reset();
                writeln!(out, "Scan reset.")?;
            }
            Command::Scan(value) => match flow.submit_scan(&value).await {
                Ok(_) => {
                    if let Feedback::Success(message) = flow.snapshot().feedback {
                        writeln!(out, "{message}")?;
                    }
                    if flow.step() == FlowStep::Confirm {
                        writeln!(out, "{}", status(&flow.snapshot()))?;
                    }
                }
                Err(FlowError::Validation(message)) => writeln!(out, "{message}")?,
                Err(e) => writeln!(out, "{e}")?,
            },
            Command::Confirm => match flow.confirm_move().await {
                Ok(done) => {
                    writeln!(out, "Move Completed Successfully")?;
                    writeln!(out, "{}", done.record.move_type.completion_message())?;
                    if let Some(reference) = &done.reference {
                        writeln!(out, "Reference: {reference}")?;
                    }
                }
                Err(e) => writeln!(out, "{e}")?,
            },
        }
        writeln!(out, "{}", prompt(&flow.snapshot()))?;
    }

    Ok(())
}
