//! # Cadence Clicker
//!
//! A desktop auto-clicker: a timed background loop moves the pointer and
//! issues clicks at a configurable interval, location, and repeat count.
//! Global hotkeys toggle it from anywhere, settings persist as JSON, and the
//! egui window is themeable.
//!
//! The pieces:
//!
//! - [`settings`] — the flat settings record, its JSON persistence, and the
//!   validation that turns it into a [`settings::ClickPlan`].
//! - [`clicker`] — the background worker that runs the plan.
//! - [`hotkeys`] — the OS-global key listener, hotkey capture, and
//!   position picking.
//! - [`theme`] — dark/light palettes applied to egui.
//! - [`app`] — the window gluing it all together.

pub mod app;
pub mod clicker;
pub mod error;
pub mod hotkeys;
pub mod settings;
pub mod theme;

pub use app::ClickerApp;
pub use clicker::{ClickJob, EnigoDriver, PointerDriver};
pub use error::{ClickerError, Result};
pub use hotkeys::{Bindings, HotkeyListener};
pub use settings::Settings;
pub use theme::Theme;
