//! OS-global key listener, hotkey capture, and position picking.
//!
//! A single `rdev` hook thread feeds the GUI through a channel. The listener
//! runs in one of three modes: mapping key presses to actions, capturing the
//! next key press as a new binding, or waiting for a mouse click to pick a
//! fixed click position.

use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;
use std::thread;

use parking_lot::Mutex;
use rdev::{listen, EventType, Key};
use tracing::{debug, warn};

use crate::error::{ClickerError, Result};
use crate::settings::Settings;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum HotkeySlot {
    StartStop,
    PickPosition,
    PauseResume,
}

impl HotkeySlot {
    pub fn label(self) -> &'static str {
        match self {
            HotkeySlot::StartStop => "Start/Stop",
            HotkeySlot::PickPosition => "Pick position",
            HotkeySlot::PauseResume => "Pause/Resume",
        }
    }
}

#[derive(Clone, PartialEq, Debug)]
pub enum HotkeyEvent {
    Action(HotkeySlot),
    Captured { slot: HotkeySlot, key_name: String },
    PositionPicked { x: i32, y: i32 },
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ListenerMode {
    Normal,
    Capture(HotkeySlot),
    PickPosition,
}

/// The three bound keys.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Bindings {
    pub start_stop: Key,
    pub pick_position: Key,
    pub pause_resume: Key,
}

impl Default for Bindings {
    fn default() -> Self {
        Self {
            start_stop: Key::F6,
            pick_position: Key::F7,
            pause_resume: Key::F8,
        }
    }
}

impl Bindings {
    /// Parse the key names persisted in the settings record.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Ok(Self {
            start_stop: key_from_name(&settings.start_stop_key)?,
            pick_position: key_from_name(&settings.pick_position_key)?,
            pause_resume: key_from_name(&settings.pause_resume_key)?,
        })
    }

    pub fn set(&mut self, slot: HotkeySlot, key: Key) {
        match slot {
            HotkeySlot::StartStop => self.start_stop = key,
            HotkeySlot::PickPosition => self.pick_position = key,
            HotkeySlot::PauseResume => self.pause_resume = key,
        }
    }

    fn slot_for(&self, key: Key) -> Option<HotkeySlot> {
        if key == self.start_stop {
            Some(HotkeySlot::StartStop)
        } else if key == self.pick_position {
            Some(HotkeySlot::PickPosition)
        } else if key == self.pause_resume {
            Some(HotkeySlot::PauseResume)
        } else {
            None
        }
    }
}

struct ListenerState {
    mode: ListenerMode,
    bindings: Bindings,
    // Last pointer position seen in move events; rdev button events carry no
    // coordinates of their own.
    pointer: (f64, f64),
}

/// Handle to the hook thread. The GUI drains [`HotkeyListener::poll`] once
/// per frame and flips modes through [`HotkeyListener::set_mode`].
pub struct HotkeyListener {
    shared: Arc<Mutex<ListenerState>>,
    events: Receiver<HotkeyEvent>,
}

impl HotkeyListener {
    pub fn spawn(bindings: Bindings) -> Self {
        let shared = Arc::new(Mutex::new(ListenerState {
            mode: ListenerMode::Normal,
            bindings,
            pointer: (0.0, 0.0),
        }));
        let (tx, rx) = channel();

        let state = Arc::clone(&shared);
        thread::spawn(move || {
            let result = listen(move |event| {
                let outcome = process_event(&event.event_type, &mut state.lock());
                if let Some(out) = outcome {
                    debug!(?out, "hotkey event");
                    let _ = tx.send(out);
                }
            });
            if let Err(err) = result {
                warn!(?err, "global input listener failed; hotkeys are disabled");
            }
        });

        Self { shared, events: rx }
    }

    pub fn poll(&self) -> Vec<HotkeyEvent> {
        self.events.try_iter().collect()
    }

    pub fn mode(&self) -> ListenerMode {
        self.shared.lock().mode
    }

    pub fn set_mode(&self, mode: ListenerMode) {
        self.shared.lock().mode = mode;
    }
}

fn process_event(event: &EventType, state: &mut ListenerState) -> Option<HotkeyEvent> {
    match event {
        EventType::MouseMove { x, y } => {
            state.pointer = (*x, *y);
            None
        }
        EventType::KeyPress(key) => {
            let key = *key;
            match state.mode {
                ListenerMode::Capture(slot) => {
                    // Stay in capture mode until a nameable key arrives.
                    let key_name = key_name(key)?;
                    state.bindings.set(slot, key);
                    state.mode = ListenerMode::Normal;
                    Some(HotkeyEvent::Captured { slot, key_name })
                }
                ListenerMode::PickPosition => None,
                ListenerMode::Normal => state.bindings.slot_for(key).map(HotkeyEvent::Action),
            }
        }
        EventType::ButtonPress(_) if state.mode == ListenerMode::PickPosition => {
            state.mode = ListenerMode::Normal;
            let (x, y) = state.pointer;
            Some(HotkeyEvent::PositionPicked {
                x: x.round() as i32,
                y: y.round() as i32,
            })
        }
        _ => None,
    }
}

const KEY_NAMES: &[(&str, Key)] = &[
    ("F1", Key::F1),
    ("F2", Key::F2),
    ("F3", Key::F3),
    ("F4", Key::F4),
    ("F5", Key::F5),
    ("F6", Key::F6),
    ("F7", Key::F7),
    ("F8", Key::F8),
    ("F9", Key::F9),
    ("F10", Key::F10),
    ("F11", Key::F11),
    ("F12", Key::F12),
    ("A", Key::KeyA),
    ("B", Key::KeyB),
    ("C", Key::KeyC),
    ("D", Key::KeyD),
    ("E", Key::KeyE),
    ("F", Key::KeyF),
    ("G", Key::KeyG),
    ("H", Key::KeyH),
    ("I", Key::KeyI),
    ("J", Key::KeyJ),
    ("K", Key::KeyK),
    ("L", Key::KeyL),
    ("M", Key::KeyM),
    ("N", Key::KeyN),
    ("O", Key::KeyO),
    ("P", Key::KeyP),
    ("Q", Key::KeyQ),
    ("R", Key::KeyR),
    ("S", Key::KeyS),
    ("T", Key::KeyT),
    ("U", Key::KeyU),
    ("V", Key::KeyV),
    ("W", Key::KeyW),
    ("X", Key::KeyX),
    ("Y", Key::KeyY),
    ("Z", Key::KeyZ),
    ("0", Key::Num0),
    ("1", Key::Num1),
    ("2", Key::Num2),
    ("3", Key::Num3),
    ("4", Key::Num4),
    ("5", Key::Num5),
    ("6", Key::Num6),
    ("7", Key::Num7),
    ("8", Key::Num8),
    ("9", Key::Num9),
    ("Space", Key::Space),
    ("Enter", Key::Return),
    ("Tab", Key::Tab),
    ("Escape", Key::Escape),
    ("Backspace", Key::Backspace),
    ("Delete", Key::Delete),
    ("Insert", Key::Insert),
    ("Home", Key::Home),
    ("End", Key::End),
    ("PageUp", Key::PageUp),
    ("PageDown", Key::PageDown),
    ("Up", Key::UpArrow),
    ("Down", Key::DownArrow),
    ("Left", Key::LeftArrow),
    ("Right", Key::RightArrow),
    ("LeftShift", Key::ShiftLeft),
    ("RightShift", Key::ShiftRight),
    ("LeftCtrl", Key::ControlLeft),
    ("RightCtrl", Key::ControlRight),
    ("Alt", Key::Alt),
    ("CapsLock", Key::CapsLock),
];

/// Stable display name for a key, if it has one.
pub fn key_name(key: Key) -> Option<String> {
    KEY_NAMES
        .iter()
        .find(|(_, k)| *k == key)
        .map(|(name, _)| (*name).to_string())
}

/// Inverse of [`key_name`]; case-insensitive on the persisted string.
pub fn key_from_name(name: &str) -> Result<Key> {
    KEY_NAMES
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|(_, k)| *k)
        .ok_or_else(|| ClickerError::UnknownKey(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> ListenerState {
        ListenerState {
            mode: ListenerMode::Normal,
            bindings: Bindings::default(),
            pointer: (0.0, 0.0),
        }
    }

    #[test]
    fn test_key_names_round_trip() {
        for (name, key) in KEY_NAMES {
            assert_eq!(key_name(*key).as_deref(), Some(*name));
            assert_eq!(key_from_name(name).unwrap(), *key);
        }
        assert_eq!(key_from_name("f6").unwrap(), Key::F6);
        assert!(key_from_name("NoSuchKey").is_err());
        assert_eq!(key_name(Key::Unknown(255)), None);
    }

    #[test]
    fn test_bound_keys_map_to_actions() {
        let mut st = state();
        assert_eq!(
            process_event(&EventType::KeyPress(Key::F6), &mut st),
            Some(HotkeyEvent::Action(HotkeySlot::StartStop))
        );
        assert_eq!(
            process_event(&EventType::KeyPress(Key::F7), &mut st),
            Some(HotkeyEvent::Action(HotkeySlot::PickPosition))
        );
        assert_eq!(
            process_event(&EventType::KeyPress(Key::F8), &mut st),
            Some(HotkeyEvent::Action(HotkeySlot::PauseResume))
        );
        assert_eq!(process_event(&EventType::KeyPress(Key::KeyQ), &mut st), None);
    }

    #[test]
    fn test_capture_rebinds_and_returns_to_normal() {
        let mut st = state();
        st.mode = ListenerMode::Capture(HotkeySlot::PauseResume);

        assert_eq!(
            process_event(&EventType::KeyPress(Key::F9), &mut st),
            Some(HotkeyEvent::Captured {
                slot: HotkeySlot::PauseResume,
                key_name: "F9".to_string(),
            })
        );
        assert_eq!(st.mode, ListenerMode::Normal);
        assert_eq!(st.bindings.pause_resume, Key::F9);

        // The new binding fires; the old one no longer does.
        assert_eq!(
            process_event(&EventType::KeyPress(Key::F9), &mut st),
            Some(HotkeyEvent::Action(HotkeySlot::PauseResume))
        );
        assert_eq!(process_event(&EventType::KeyPress(Key::F8), &mut st), None);
    }

    #[test]
    fn test_capture_skips_unnameable_keys() {
        let mut st = state();
        st.mode = ListenerMode::Capture(HotkeySlot::StartStop);

        assert_eq!(
            process_event(&EventType::KeyPress(Key::Unknown(200)), &mut st),
            None
        );
        assert_eq!(st.mode, ListenerMode::Capture(HotkeySlot::StartStop));
        assert_eq!(st.bindings.start_stop, Key::F6);
    }

    #[test]
    fn test_no_actions_fire_while_capturing() {
        let mut st = state();
        st.mode = ListenerMode::Capture(HotkeySlot::PickPosition);

        // F6 is the start/stop binding, but capture consumes it as the new
        // pick-position key instead of starting the clicker.
        assert_eq!(
            process_event(&EventType::KeyPress(Key::F6), &mut st),
            Some(HotkeyEvent::Captured {
                slot: HotkeySlot::PickPosition,
                key_name: "F6".to_string(),
            })
        );
    }

    #[test]
    fn test_pick_position_uses_last_pointer_location() {
        let mut st = state();
        st.mode = ListenerMode::PickPosition;

        assert_eq!(
            process_event(&EventType::MouseMove { x: 812.4, y: 90.7 }, &mut st),
            None
        );
        assert_eq!(
            process_event(&EventType::KeyPress(Key::F6), &mut st),
            None,
            "keys are ignored while picking"
        );
        assert_eq!(
            process_event(&EventType::ButtonPress(rdev::Button::Left), &mut st),
            Some(HotkeyEvent::PositionPicked { x: 812, y: 91 })
        );
        assert_eq!(st.mode, ListenerMode::Normal);
    }

    #[test]
    fn test_bindings_parse_from_settings() {
        let mut settings = Settings::default();
        settings.start_stop_key = "space".to_string();
        let bindings = Bindings::from_settings(&settings).unwrap();
        assert_eq!(bindings.start_stop, Key::Space);
        assert_eq!(bindings.pick_position, Key::F7);

        settings.pause_resume_key = "F99".to_string();
        assert!(Bindings::from_settings(&settings).is_err());
    }
}
