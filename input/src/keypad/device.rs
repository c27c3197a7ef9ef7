use std::fmt::{Debug, Formatter};
use std::path::{Path, PathBuf};
use std::time::Instant;
use evdev::{Device, EventType, Key};
use log::{debug, info};
use crate::{InputError, InputResult, KeyCode, KeyDirection, KeyEvent, KeySource};

/// A keypad read through a Linux evdev device node (`/dev/input/eventN`).
pub struct EvdevKeypad {
    device: Device,
    path: PathBuf,
}

impl Debug for EvdevKeypad {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "EvdevKeypad({}, {:?})",
            self.path.display(),
            self.device.name().unwrap_or("unknown"),
        )
    }
}

impl EvdevKeypad {
    /// Opens the device at the given path.
    pub fn open(path: impl AsRef<Path>) -> InputResult<Self> {
        let path = path.as_ref().to_path_buf();
        let device = Device::open(&path)?;
        Ok(EvdevKeypad { device, path })
    }

    /// Finds the first input device that looks like a numeric keypad.
    ///
    /// A device qualifies if it reports both `KEY_KP0` and `KEY_NUMLOCK`.
    pub fn discover() -> InputResult<Self> {
        for (path, device) in evdev::enumerate() {
            let is_keypad = device
                .supported_keys()
                .map(|keys| keys.contains(Key::KEY_KP0) && keys.contains(Key::KEY_NUMLOCK))
                .unwrap_or(false);

            if is_keypad {
                info!("Found keypad {:?} at {}", device.name().unwrap_or("unknown"), path.display());
                return Ok(EvdevKeypad { device, path });
            }
            debug!("Skipping {}: not a keypad", path.display());
        }
        Err(InputError::NotFound)
    }

    /// Gets the path of the opened device node.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Grabs the device exclusively, so key presses stop reaching the console.
    pub fn grab(&mut self) -> InputResult<()> {
        self.device.grab()?;
        Ok(())
    }
}

impl KeySource for EvdevKeypad {
    fn next_events(&mut self) -> InputResult<Vec<KeyEvent>> {
        let events = self.device.fetch_events()?;
        let now = Instant::now();

        Ok(events
            .filter(|event| event.event_type() == EventType::KEY)
            .filter_map(|event| {
                let direction = KeyDirection::from_value(event.value())?;
                Some(KeyEvent::new(KeyCode(event.code()), direction, now))
            })
            .collect())
    }
}
