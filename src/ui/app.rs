//! Main application UI.

use std::collections::VecDeque;

use chrono::{DateTime, Local};
use eframe::egui::{self, Align, Layout};
use tokio::sync::mpsc;

use crate::client::{Collaborators, WarehouseApiClient};
use crate::config::{ApiMode, AppConfig};
use crate::models::{CompletedMove, FlowStep, MoveType};
use crate::scan::{FlowError, ScanFlow};

use super::components::colors;
use super::{moves_panel, scan_panel};

/// Current panel being displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Panel {
    #[default]
    Scan,
    Moves,
}

impl Panel {
    /// Get the display name for the panel.
    pub fn name(&self) -> &'static str {
        match self {
            Panel::Scan => "Scan",
            Panel::Moves => "Moves",
        }
    }
}

/// Warehouse API reachability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApiStatus {
    #[default]
    Unknown,
    Testing,
    Reachable,
    Error,
}

/// Messages from async tasks to UI.
pub enum UiMessage {
    // Scan flow
    ScanAccepted(FlowStep),
    ScanRejected(FlowError),
    MoveCompleted(CompletedMove),
    CommitFailed(FlowError),

    // Connection test
    ApiTestResult(Result<bool, String>),
}

/// Log level for UI messages.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Log entry for display in the UI.
#[derive(Clone)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub message: String,
    pub level: LogLevel,
}

/// Maximum number of activity log entries kept.
const LOG_LIMIT: usize = 100;

/// Main application state.
pub struct App {
    pub rt: tokio::runtime::Runtime,

    // Message channel for async communication
    pub tx: mpsc::UnboundedSender<UiMessage>,
    pub rx: mpsc::UnboundedReceiver<UiMessage>,

    // Navigation
    pub current_panel: Panel,

    // Scan flow
    pub flow: ScanFlow,
    pub scan_input: String,
    pub focus_scan_input: bool,

    // Completed moves this session, newest last
    pub moves: VecDeque<CompletedMove>,

    // Log messages
    pub log_messages: Vec<LogEntry>,

    // Configuration
    pub config: AppConfig,
    pub api_mode: ApiMode,
    pub api_status: ApiStatus,

    // Dialogs
    pub error_message: Option<String>,
}

impl App {
    pub fn new(
        config: AppConfig,
        collaborators: Collaborators,
        api_mode: ApiMode,
        rt: tokio::runtime::Runtime,
        initial_error: Option<String>,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        let completion_tx = tx.clone();
        let flow = ScanFlow::from_config(&config.scan, collaborators.validator, collaborators.committer)
            .on_complete(move |done| {
                let _ = completion_tx.send(UiMessage::MoveCompleted(done.clone()));
            });

        let mode_message = match api_mode {
            ApiMode::Mock => "Using mock warehouse API".to_string(),
            ApiMode::Http => format!("Using warehouse API at {}", config.api.base_url),
        };

        let mut app = Self {
            rt,
            tx,
            rx,
            current_panel: Panel::default(),
            flow,
            scan_input: String::new(),
            focus_scan_input: true,
            moves: VecDeque::new(),
            log_messages: Vec::new(),
            config,
            api_mode,
            api_status: ApiStatus::default(),
            error_message: initial_error,
        };

        app.log_info(mode_message);

        app
    }

    /// Log a message to the UI log.
    pub fn log(&mut self, level: LogLevel, message: impl Into<String>) {
        self.log_messages.push(LogEntry {
            timestamp: Local::now(),
            message: message.into(),
            level,
        });

        if self.log_messages.len() > LOG_LIMIT {
            self.log_messages.remove(0);
        }
    }

    /// Log an info message.
    pub fn log_info(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Info, message);
    }

    /// Log a success message.
    pub fn log_success(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Success, message);
    }

    /// Log a warning message.
    pub fn log_warning(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Warning, message);
    }

    /// Log an error message.
    pub fn log_error(&mut self, message: impl Into<String>) {
        self.log(LogLevel::Error, message);
    }

    /// Submit the scan input for the current step in the background.
    pub fn submit_scan(&mut self) {
        let value = std::mem::take(&mut self.scan_input);
        let flow = self.flow.clone();
        let tx = self.tx.clone();

        self.rt.spawn(async move {
            let message = match flow.submit_scan(&value).await {
                Ok(step) => UiMessage::ScanAccepted(step),
                Err(e) => UiMessage::ScanRejected(e),
            };
            let _ = tx.send(message);
        });
    }

    /// Commit the reviewed move in the background.
    pub fn confirm_move(&mut self) {
        self.log_info("Committing move...");
        let flow = self.flow.clone();
        let tx = self.tx.clone();

        self.rt.spawn(async move {
            // Success is reported by the completion handler
            if let Err(e) = flow.confirm_move().await {
                let _ = tx.send(UiMessage::CommitFailed(e));
            }
        });
    }

    /// Change the move type of the current run.
    pub fn select_move_type(&mut self, move_type: MoveType) {
        if let Err(e) = self.flow.select_move_type(move_type) {
            self.log_warning(e.to_string());
        }
    }

    /// Discard the current run and start over.
    pub fn reset_scan(&mut self) {
        self.flow.reset();
        self.scan_input.clear();
        self.focus_scan_input = true;
    }

    /// Add a completed move to the session list.
    pub fn record_move(&mut self, done: CompletedMove) {
        self.log_success(format!("Move completed: {}", done.summary()));
        self.moves.push_back(done);
        while self.moves.len() > self.config.ui.history_limit {
            self.moves.pop_front();
        }
    }

    /// Test warehouse API connection.
    pub fn test_api_connection(&mut self) {
        if self.api_mode == ApiMode::Mock {
            self.api_status = ApiStatus::Reachable;
            return;
        }

        self.log_info("Testing warehouse API connection...");
        self.api_status = ApiStatus::Testing;
        let api = self.config.api.clone();
        let tx = self.tx.clone();

        self.rt.spawn(async move {
            let result = match WarehouseApiClient::from_config(&api) {
                Ok(client) => client.test_connection().await.map_err(|e| e.to_string()),
                Err(e) => Err(e.to_string()),
            };
            let _ = tx.send(UiMessage::ApiTestResult(result));
        });
    }

    /// Poll async operation results.
    fn poll_async_results(&mut self) {
        while let Ok(msg) = self.rx.try_recv() {
            self.handle_message(msg);
        }
    }

    fn handle_message(&mut self, msg: UiMessage) {
        match msg {
            UiMessage::ScanAccepted(step) => {
                self.focus_scan_input = step.is_capture();
            }
            UiMessage::ScanRejected(FlowError::Validation(e)) => {
                self.log_warning(e);
                self.focus_scan_input = true;
            }
            UiMessage::ScanRejected(FlowError::Superseded) => {}
            UiMessage::ScanRejected(e) => self.log_warning(e.to_string()),
            UiMessage::MoveCompleted(done) => self.record_move(done),
            UiMessage::CommitFailed(FlowError::Superseded) => {}
            UiMessage::CommitFailed(e) => self.log_error(e.to_string()),
            UiMessage::ApiTestResult(Ok(true)) => {
                self.api_status = ApiStatus::Reachable;
                self.log_success("Warehouse API reachable");
            }
            UiMessage::ApiTestResult(Ok(false)) => {
                self.api_status = ApiStatus::Error;
                self.log_error("Warehouse API returned an error status");
            }
            UiMessage::ApiTestResult(Err(e)) => {
                self.api_status = ApiStatus::Error;
                self.log_error(format!("Warehouse API unreachable: {e}"));
            }
        }
    }

    /// Render menu bar.
    fn show_menu_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                ui.menu_button("View", |ui| {
                    for panel in [Panel::Scan, Panel::Moves] {
                        if ui
                            .selectable_label(self.current_panel == panel, panel.name())
                            .clicked()
                        {
                            self.current_panel = panel;
                            ui.close();
                        }
                    }
                });
                ui.menu_button("Tools", |ui| {
                    let testing = self.api_status == ApiStatus::Testing;
                    if ui
                        .add_enabled(!testing, egui::Button::new("Test API Connection"))
                        .clicked()
                    {
                        self.test_api_connection();
                        ui.close();
                    }
                });
            });
        });
    }

    /// Render status bar (display only, no interaction).
    fn show_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar")
            .min_height(28.0)
            .show(ctx, |ui| {
                ui.disable();
                ui.horizontal(|ui| {
                    let api_label = match self.api_mode {
                        ApiMode::Mock => "Mock".to_string(),
                        ApiMode::Http => self.config.api.base_url.clone(),
                    };
                    let (color, text) = match self.api_status {
                        ApiStatus::Unknown => (colors::NEUTRAL, "Not tested"),
                        ApiStatus::Testing => (colors::WARNING, "Testing..."),
                        ApiStatus::Reachable => (colors::SUCCESS, "Reachable"),
                        ApiStatus::Error => (colors::ERROR, "Unreachable"),
                    };

                    if self.api_status == ApiStatus::Testing {
                        ui.spinner();
                    }
                    ui.colored_label(color, format!("API: {api_label} ({text})"));

                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.label(format!("Moves this session: {}", self.moves.len()));
                        if self.flow.is_processing() {
                            ui.spinner();
                        }
                    });
                });
            });
    }

    /// Render modal error dialog.
    fn show_dialogs(&mut self, ctx: &egui::Context) {
        if let Some(ref error) = self.error_message.clone() {
            egui::Window::new("Error")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.colored_label(colors::ERROR, error);
                    ui.add_space(10.0);
                    if ui.button("OK").clicked() {
                        self.error_message = None;
                    }
                });
        }
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Poll async results
        self.poll_async_results();

        // Request repaint during async operations
        if self.flow.is_processing() || self.api_status == ApiStatus::Testing {
            ctx.request_repaint();
        }

        self.show_menu_bar(ctx);
        self.show_status_bar(ctx);
        self.show_dialogs(ctx);

        egui::CentralPanel::default().show(ctx, |ui| match self.current_panel {
            Panel::Scan => {
                if let Some(next) = scan_panel::show(self, ui) {
                    self.current_panel = next;
                }
            }
            Panel::Moves => {
                if moves_panel::show(self, ui) {
                    self.current_panel = Panel::Scan;
                }
            }
        });
    }
}
