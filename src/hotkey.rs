use rdev::{listen, Event, EventType, Key as RdevKey};
use tracing::{error, info};

use crate::keymap::{map_rdev_to_key, same_key};
use crate::queue::UiSender;
use crate::settings::{Hotkey, Key};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HotkeyCommand {
    Toggle,
    Stop,
}

/// Modifier state plus repeat suppression for the global key listener.
#[derive(Debug)]
pub struct HotkeyTracker {
    hotkey: Hotkey,
    stop_key: Key,
    ctrl: bool,
    alt: bool,
    shift: bool,
    meta: bool,
    toggled_for_combo: bool,
}

impl HotkeyTracker {
    pub fn new(hotkey: Hotkey, stop_key: Key) -> Self {
        Self { hotkey, stop_key, ctrl: false, alt: false, shift: false, meta: false, toggled_for_combo: false }
    }

    pub fn on_press(&mut self, key: RdevKey) -> Option<HotkeyCommand> {
        self.update_mods(key, true);
        let main_key = map_rdev_to_key(key)?;

        if self.hotkey.matches_combo(self.ctrl, self.alt, self.shift, self.meta, &main_key) {
            // Held keys auto-repeat; only the first press counts.
            if self.toggled_for_combo {
                return None;
            }
            self.toggled_for_combo = true;
            return Some(HotkeyCommand::Toggle);
        }
        if same_key(&self.stop_key, &main_key) {
            return Some(HotkeyCommand::Stop);
        }
        None
    }

    pub fn on_release(&mut self, key: RdevKey) {
        self.update_mods(key, false);

        if let Some(main_key) = map_rdev_to_key(key) {
            if same_key(&self.hotkey.key, &main_key) {
                self.toggled_for_combo = false;
            }
        }
        if !self.ctrl && !self.alt && !self.shift && !self.meta {
            self.toggled_for_combo = false;
        }
    }

    fn update_mods(&mut self, key: RdevKey, is_down: bool) {
        match key {
            RdevKey::ShiftLeft | RdevKey::ShiftRight => self.shift = is_down,
            RdevKey::ControlLeft | RdevKey::ControlRight => self.ctrl = is_down,
            RdevKey::Alt | RdevKey::AltGr => self.alt = is_down,
            RdevKey::MetaLeft | RdevKey::MetaRight => self.meta = is_down,
            _ => {}
        }
    }
}

/// Listens for global key events and posts commands to the UI thread.
pub fn start_hotkey_listener<M>(hotkey: Hotkey, stop_key: Key, commands: UiSender<M>)
where
    M: From<HotkeyCommand> + Send + 'static,
{
    std::thread::spawn(move || {
        let mut tracker = HotkeyTracker::new(hotkey, stop_key);

        let callback = move |event: Event| match event.event_type {
            EventType::KeyPress(key) => {
                if let Some(cmd) = tracker.on_press(key) {
                    info!("Hotkey pressed: {:?}", cmd);
                    commands.post(M::from(cmd));
                }
            }
            EventType::KeyRelease(key) => tracker.on_release(key),
            _ => {}
        };

        if let Err(e) = listen(callback) {
            error!("Global input listener failed: {:?}", e);
        }
    });
}
