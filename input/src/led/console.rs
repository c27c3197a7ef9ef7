use std::fs::{File, OpenOptions};
use std::os::fd::AsRawFd;
use std::os::unix::fs::OpenOptionsExt;
use std::path::Path;
use nix::fcntl::OFlag;
use crate::{Indicator, InputResult};

/// `KDSETLED` from `linux/kd.h`.
const KDSETLED: u32 = 0x4B32;
const NUM_LED: i32 = 0x02;

nix::ioctl_write_int_bad!(kd_set_led, KDSETLED);

/// Drives the keyboard LEDs of a virtual console through the `KDSETLED` ioctl.
///
/// Needs write access to the console, which usually means running as root.
#[derive(Debug)]
pub struct ConsoleLed {
    console: File,
}

impl ConsoleLed {
    /// The default console device.
    pub const DEFAULT_PATH: &'static str = "/dev/console";

    pub fn open(path: impl AsRef<Path>) -> InputResult<Self> {
        let console = OpenOptions::new()
            .write(true)
            .custom_flags(OFlag::O_NOCTTY.bits())
            .open(path)?;
        Ok(ConsoleLed { console })
    }
}

impl Indicator for ConsoleLed {
    fn set(&mut self, on: bool) -> InputResult<()> {
        let leds = if on { NUM_LED } else { 0 };
        // SAFETY: the descriptor is owned by `self.console` and stays open for the call.
        unsafe { kd_set_led(self.console.as_raw_fd(), leds) }?;
        Ok(())
    }
}
