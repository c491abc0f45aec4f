//! The egui window: tabbed form, status line, and the start/stop/pause glue
//! between the widgets, the global hotkeys, and the click worker.

use std::path::PathBuf;
use std::time::Duration;

use eframe::egui;
use tracing::{info, warn};

use crate::clicker::{ClickJob, EnigoDriver, Phase};
use crate::hotkeys::{HotkeyEvent, HotkeyListener, HotkeySlot, ListenerMode};
use crate::settings::{ClickButton, ClickKind, RepeatMode, Settings, SpeedUnit, TargetMode};
use crate::theme::Palette;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Tab {
    Settings,
    Hotkeys,
    Appearance,
}

pub struct ClickerApp {
    settings: Settings,
    settings_path: PathBuf,
    listener: HotkeyListener,
    tab: Tab,
    job: Option<ClickJob>,
    error: Option<String>,
    notice: Option<String>,
}

impl ClickerApp {
    pub fn new(settings: Settings, settings_path: PathBuf, listener: HotkeyListener) -> Self {
        Self {
            settings,
            settings_path,
            listener,
            tab: Tab::Settings,
            job: None,
            error: None,
            notice: None,
        }
    }

    fn start(&mut self) {
        if self.job.is_some() {
            return;
        }
        self.error = None;
        self.notice = None;
        if let Err(err) = self.settings.save(&self.settings_path) {
            warn!(%err, "could not persist settings");
        }
        match self.settings.click_plan() {
            Ok(plan) => {
                info!(
                    interval_ms = plan.interval.as_millis() as u64,
                    repeat = ?plan.repeat_limit,
                    "starting click loop"
                );
                self.job = Some(ClickJob::spawn(plan, EnigoDriver));
            }
            Err(err) => {
                warn!(%err, "refusing to start");
                self.error = Some(err.to_string());
            }
        }
    }

    fn stop(&mut self) {
        if let Some(job) = self.job.take() {
            job.stop();
            self.notice = Some("Stopped".to_string());
        }
    }

    fn toggle_clicking(&mut self) {
        if self.job.is_some() {
            self.stop();
        } else {
            self.start();
        }
    }

    fn begin_pick_position(&mut self) {
        if self.listener.mode() == ListenerMode::Normal {
            self.listener.set_mode(ListenerMode::PickPosition);
        }
    }

    fn handle_hotkey_events(&mut self) {
        for event in self.listener.poll() {
            match event {
                HotkeyEvent::Action(HotkeySlot::StartStop) => self.toggle_clicking(),
                HotkeyEvent::Action(HotkeySlot::PickPosition) => self.begin_pick_position(),
                HotkeyEvent::Action(HotkeySlot::PauseResume) => {
                    if let Some(job) = &self.job {
                        let paused = job.toggle_pause();
                        info!(paused, "pause toggled");
                    }
                }
                HotkeyEvent::Captured { slot, key_name } => {
                    let field = match slot {
                        HotkeySlot::StartStop => &mut self.settings.start_stop_key,
                        HotkeySlot::PickPosition => &mut self.settings.pick_position_key,
                        HotkeySlot::PauseResume => &mut self.settings.pause_resume_key,
                    };
                    *field = key_name.clone();
                    self.notice = Some(format!("Hotkey set to {key_name}"));
                }
                HotkeyEvent::PositionPicked { x, y } => {
                    self.settings.fixed_position = Some((x, y));
                    self.notice = Some("Fixed position saved".to_string());
                }
            }
        }
    }

    // A worker that ran out of repeats clears its own running flag.
    fn reap_finished_job(&mut self) {
        if self.job.as_ref().is_some_and(|job| !job.is_running()) {
            self.job = None;
            self.notice = Some("Stopped".to_string());
        }
    }

    fn settings_tab(&mut self, ui: &mut egui::Ui, palette: &Palette) {
        ui.horizontal(|ui| {
            ui.label("Click speed:");
            ui.add(
                egui::DragValue::new(&mut self.settings.speed_value)
                    .speed(0.1)
                    .clamp_range(0.0..=100_000.0),
            )
            .on_hover_text("Numeric value for the click speed.");
            egui::ComboBox::from_id_source("speed_unit")
                .selected_text(self.settings.speed_unit.label())
                .show_ui(ui, |ui| {
                    for unit in SpeedUnit::ALL {
                        ui.selectable_value(&mut self.settings.speed_unit, unit, unit.label());
                    }
                })
                .response
                .on_hover_text("Unit for the click speed.");
        });

        ui.add_space(6.0);
        ui.checkbox(&mut self.settings.randomize_interval, "Random interval")
            .on_hover_text("Vary the delay between clicks to mimic human behavior.");
        if self.settings.randomize_interval {
            ui.horizontal(|ui| {
                ui.label("Min delay:");
                ui.add(
                    egui::DragValue::new(&mut self.settings.random_min_secs)
                        .speed(0.05)
                        .clamp_range(0.0..=3600.0)
                        .suffix(" s"),
                )
                .on_hover_text("Minimum random delay in seconds.");
                ui.label("Max delay:");
                ui.add(
                    egui::DragValue::new(&mut self.settings.random_max_secs)
                        .speed(0.05)
                        .clamp_range(0.0..=3600.0)
                        .suffix(" s"),
                )
                .on_hover_text("Maximum random delay in seconds.");
            });
        }

        ui.add_space(6.0);
        ui.horizontal(|ui| {
            ui.label("Pre-start delay:");
            ui.add(
                egui::DragValue::new(&mut self.settings.pre_start_delay_secs)
                    .speed(0.1)
                    .clamp_range(0.0..=3600.0)
                    .suffix(" s"),
            )
            .on_hover_text("Delay before clicking starts, to let you move the cursor.");
        });

        ui.add_space(6.0);
        ui.horizontal(|ui| {
            ui.label("Click type:");
            ui.radio_value(&mut self.settings.click_kind, ClickKind::Single, "Single");
            ui.radio_value(&mut self.settings.click_kind, ClickKind::Double, "Double");
        });
        ui.horizontal(|ui| {
            ui.label("Mouse button:");
            ui.radio_value(&mut self.settings.click_button, ClickButton::Left, "Left");
            ui.radio_value(&mut self.settings.click_button, ClickButton::Right, "Right");
        });

        ui.add_space(6.0);
        ui.horizontal(|ui| {
            ui.label("Click location:");
            ui.radio_value(&mut self.settings.target, TargetMode::Cursor, "Current");
            ui.radio_value(&mut self.settings.target, TargetMode::Fixed, "Fixed");
            let position = match self.settings.fixed_position {
                Some((x, y)) => format!("({x}, {y})"),
                None => "(not set)".to_string(),
            };
            ui.colored_label(palette.fg_accent, position)
                .on_hover_text("Coordinates of the fixed location to click.");
            let pick = egui::Button::new(
                egui::RichText::new("Pick position").color(egui::Color32::WHITE),
            )
            .fill(palette.record_button);
            if ui
                .add(pick)
                .on_hover_text(format!(
                    "Click anywhere on screen to set the fixed location (hotkey: {}).",
                    self.settings.pick_position_key
                ))
                .clicked()
            {
                self.begin_pick_position();
            }
        });

        ui.add_space(6.0);
        ui.horizontal(|ui| {
            ui.label("Repeat:");
            ui.radio_value(&mut self.settings.repeat, RepeatMode::Forever, "Infinite");
            ui.radio_value(&mut self.settings.repeat, RepeatMode::Count, "Count:");
            ui.add(
                egui::DragValue::new(&mut self.settings.repeat_count)
                    .clamp_range(1..=999_999_999u64),
            )
            .on_hover_text("Number of clicks before stopping.");
        });
    }

    fn hotkeys_tab(&mut self, ui: &mut egui::Ui, palette: &Palette) {
        let mode = self.listener.mode();
        let rows = [
            (HotkeySlot::StartStop, self.settings.start_stop_key.clone()),
            (
                HotkeySlot::PickPosition,
                self.settings.pick_position_key.clone(),
            ),
            (
                HotkeySlot::PauseResume,
                self.settings.pause_resume_key.clone(),
            ),
        ];
        for (slot, key) in rows {
            let recording = mode == ListenerMode::Capture(slot);
            if hotkey_row(ui, palette, slot.label(), &key, recording) {
                self.listener.set_mode(ListenerMode::Capture(slot));
            }
            ui.add_space(4.0);
        }
    }

    fn appearance_tab(&mut self, ui: &mut egui::Ui) {
        let label = match self.settings.theme {
            crate::theme::Theme::Dark => "Switch to light mode",
            crate::theme::Theme::Light => "Switch to dark mode",
        };
        if ui
            .button(label)
            .on_hover_text("Toggle between the dark and light palette.")
            .clicked()
        {
            self.settings.theme = self.settings.theme.toggled();
        }
    }
}

fn hotkey_row(
    ui: &mut egui::Ui,
    palette: &Palette,
    label: &str,
    key: &str,
    recording: bool,
) -> bool {
    let mut clicked = false;
    ui.horizontal(|ui| {
        ui.label(format!("{label} hotkey:"));
        if recording {
            ui.colored_label(palette.fg_accent, "press a key...");
        } else {
            ui.colored_label(palette.fg_accent, key);
        }
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let button = egui::Button::new(
                egui::RichText::new("Record hotkey").color(egui::Color32::WHITE),
            )
            .fill(palette.record_button);
            clicked = ui
                .add_enabled(!recording, button)
                .on_hover_text("The next key you press becomes the new hotkey.")
                .clicked();
        });
    });
    clicked
}

fn status_text(
    mode: ListenerMode,
    job: Option<&ClickJob>,
    settings: &Settings,
    notice: Option<&str>,
) -> String {
    match mode {
        ListenerMode::Capture(slot) => {
            return format!("Press a key for the {} hotkey...", slot.label());
        }
        ListenerMode::PickPosition => return "Click the desired fixed position...".to_string(),
        ListenerMode::Normal => {}
    }
    if let Some(job) = job {
        if job.is_paused() {
            return format!("Paused (hotkey: {})", settings.pause_resume_key);
        }
        return match job.phase() {
            Phase::Countdown => format!("Starting in {}s...", settings.pre_start_delay_secs),
            Phase::Clicking => match job.measured_cps() {
                Some(cps) => format!("Clicking... (~{cps:.2} CPS)"),
                None => format!("Clicking... (hotkey: {})", settings.start_stop_key),
            },
        };
    }
    match notice {
        Some(notice) => format!("{notice} (hotkey: {})", settings.start_stop_key),
        None => format!("Ready (hotkey: {})", settings.start_stop_key),
    }
}

impl eframe::App for ClickerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_hotkey_events();
        self.reap_finished_job();

        let palette = Palette::for_theme(self.settings.theme);
        palette.apply(self.settings.theme, ctx);

        let status = status_text(
            self.listener.mode(),
            self.job.as_ref(),
            &self.settings,
            self.notice.as_deref(),
        );

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.vertical_centered(|ui| ui.heading("Cadence Clicker"));
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                ui.selectable_value(&mut self.tab, Tab::Settings, "Settings");
                ui.selectable_value(&mut self.tab, Tab::Hotkeys, "Hotkeys");
                ui.selectable_value(&mut self.tab, Tab::Appearance, "Appearance");
            });
            ui.add_space(2.0);
        });

        egui::TopBottomPanel::bottom("controls").show(ctx, |ui| {
            ui.add_space(6.0);
            if let Some(error) = self.error.clone() {
                ui.colored_label(palette.stop_button_active, error);
            }
            ui.colored_label(palette.fg_accent, &status);
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                let running = self.job.is_some();
                let start = egui::Button::new(
                    egui::RichText::new("Start clicking").color(egui::Color32::WHITE),
                )
                .fill(palette.start_button);
                if ui.add_enabled(!running, start).clicked() {
                    self.start();
                }
                let stop = egui::Button::new(
                    egui::RichText::new("Stop clicking").color(egui::Color32::WHITE),
                )
                .fill(palette.stop_button);
                if ui.add_enabled(running, stop).clicked() {
                    self.stop();
                }
            });
            ui.add_space(6.0);
        });

        egui::CentralPanel::default().show(ctx, |ui| match self.tab {
            Tab::Settings => self.settings_tab(ui, &palette),
            Tab::Hotkeys => self.hotkeys_tab(ui, &palette),
            Tab::Appearance => self.appearance_tab(ui),
        });

        // Keep the status line (countdown, CPS) moving without user input.
        ctx.request_repaint_after(Duration::from_millis(100));
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        if let Err(err) = self.settings.save(&self.settings_path) {
            warn!(%err, "could not persist settings on exit");
        }
        self.stop();
    }
}
