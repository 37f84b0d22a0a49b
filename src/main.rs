//! Warehouse Scan - guided barcode scanning for inventory moves.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use eframe::egui;
use warehouse_scan as app;

use app::client::build_collaborators;
use app::config::{ApiMode, AppConfig, ConfigLoadResult};
use app::scan::ScanFlow;
use app::ui::App;

/// Warehouse scanning station for moving pallets and assets between bins.
#[derive(Parser)]
#[command(name = "warehouse-scan", version)]
struct Cli {
    /// Use config.toml from current directory (dev mode)
    #[arg(long)]
    dev: bool,

    /// Path to the config file
    #[arg(long, value_name = "PATH", conflicts_with = "dev")]
    config: Option<PathBuf>,

    /// Read scans from stdin instead of opening a window
    #[arg(long)]
    console: bool,

    /// Use mock validation and commit regardless of config
    #[arg(long)]
    mock: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Determine config path based on mode
    let config_path = match (&cli.config, cli.dev) {
        (Some(path), _) => path.clone(),
        (None, true) => PathBuf::from("config.toml"),
        (None, false) => AppConfig::default_path(),
    };

    let (config, config_error) = match AppConfig::try_load(&config_path) {
        ConfigLoadResult::Loaded(config) => (config, None),
        ConfigLoadResult::Missing => {
            let config = AppConfig::default();
            let error = config.save(&config_path).err().map(|e| format!("Failed to write default config: {e}"));
            (config, error)
        }
        ConfigLoadResult::Invalid(e) => (AppConfig::default(), Some(format!("Config invalid, using defaults: {e}"))),
    };

    // Initialize logging
    let _log_guard = app::logging::init(&config.log);

    tracing::info!("Warehouse Scan starting...");
    tracing::info!("Config path: {:?}", config_path);
    if let Some(e) = &config_error {
        tracing::warn!("{}", e);
    }

    let api_mode = if cli.mock { ApiMode::Mock } else { config.api.mode };
    let collaborators = build_collaborators(&config, cli.mock).context("Failed to set up warehouse API client")?;

    if cli.console {
        run_console(config, collaborators)
    } else {
        run_main_app(config, collaborators, api_mode, config_error)
    }
}

/// Run the line-oriented console mode.
fn run_console(config: AppConfig, collaborators: app::client::Collaborators) -> anyhow::Result<()> {
    let rt = tokio::runtime::Runtime::new().context("Failed to create tokio runtime")?;
    let flow = ScanFlow::from_config(&config.scan, collaborators.validator, collaborators.committer)
        .on_complete(|done| tracing::info!("Completed move: {}", done.summary()));

    rt.block_on(async {
        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        let mut stdout = std::io::stdout();
        app::console::run(&flow, stdin, &mut stdout).await
    })
    .context("Console session failed")?;

    tracing::info!("Console session ended");
    Ok(())
}

/// Run the main application.
fn run_main_app(
    config: AppConfig,
    collaborators: app::client::Collaborators,
    api_mode: ApiMode,
    initial_error: Option<String>,
) -> anyhow::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Warehouse Scan")
            .with_inner_size([1000.0, 760.0])
            .with_min_inner_size([760.0, 560.0]),
        ..Default::default()
    };

    // Create tokio runtime for async operations
    let rt = tokio::runtime::Runtime::new().context("Failed to create tokio runtime")?;

    eframe::run_native(
        "Warehouse Scan",
        options,
        Box::new(|cc| {
            egui_extras::install_image_loaders(&cc.egui_ctx);

            let mut fonts = egui::FontDefinitions::default();
            egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
            cc.egui_ctx.set_fonts(fonts);

            Ok(Box::new(App::new(config, collaborators, api_mode, rt, initial_error)))
        }),
    )
    .map_err(|e| anyhow::anyhow!("GUI error: {e}"))
}
