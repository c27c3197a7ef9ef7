use std::fmt::{Debug, Formatter};
use std::path::{Path, PathBuf};
use evdev::{Device, EventType, InputEvent, LedType};
use crate::{Indicator, InputError, InputResult};

/// Drives the num-lock LED of an evdev keyboard by writing `EV_LED` events to it.
///
/// Opens its own handle to the device, so it can be used next to a reader of the same node.
pub struct EvdevLed {
    device: Device,
    path: PathBuf,
}

impl Debug for EvdevLed {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "EvdevLed({})", self.path.display())
    }
}

impl EvdevLed {
    /// Opens the device and checks that it has a num-lock LED.
    pub fn open(path: impl AsRef<Path>) -> InputResult<Self> {
        let path = path.as_ref().to_path_buf();
        let device = Device::open(&path)?;

        let has_numlock = device
            .supported_leds()
            .map(|leds| leds.contains(LedType::LED_NUML))
            .unwrap_or(false);
        if !has_numlock {
            return Err(InputError::NotSupported);
        }

        Ok(EvdevLed { device, path })
    }
}

impl Indicator for EvdevLed {
    fn set(&mut self, on: bool) -> InputResult<()> {
        let event = InputEvent::new(EventType::LED, LedType::LED_NUML.0, on as i32);
        self.device.send_events(&[event])?;
        Ok(())
    }
}
