use std::path::PathBuf;

use clap::Parser;
use eframe::egui;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use cadence_clicker::app::ClickerApp;
use cadence_clicker::hotkeys::{Bindings, HotkeyListener};
use cadence_clicker::settings::Settings;
use cadence_clicker::theme::Theme;

#[derive(Parser)]
#[command(
    name = "cadence-clicker",
    about = "Periodic mouse clicker with global hotkeys",
    version
)]
struct Cli {
    /// Settings file to load and save (defaults to the per-user config dir).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the persisted theme for this run.
    #[arg(long, value_enum)]
    theme: Option<Theme>,
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let settings_path = cli.config.unwrap_or_else(Settings::default_path);
    let mut settings = match Settings::load(&settings_path) {
        Ok(settings) => settings,
        Err(err) => {
            warn!(%err, "falling back to default settings");
            Settings::default()
        }
    };
    if let Some(theme) = cli.theme {
        settings.theme = theme;
    }

    let bindings = match Bindings::from_settings(&settings) {
        Ok(bindings) => bindings,
        Err(err) => {
            warn!(%err, "resetting hotkeys to defaults");
            let defaults = Settings::default();
            settings.start_stop_key = defaults.start_stop_key;
            settings.pick_position_key = defaults.pick_position_key;
            settings.pause_resume_key = defaults.pause_resume_key;
            Bindings::default()
        }
    };
    let listener = HotkeyListener::spawn(bindings);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([500.0, 630.0])
            .with_resizable(false),
        centered: true,
        ..Default::default()
    };
    eframe::run_native(
        "Cadence Clicker",
        options,
        Box::new(|_cc| Box::new(ClickerApp::new(settings, settings_path, listener))),
    )
}
