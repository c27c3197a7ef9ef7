use log::{info, warn};
use octonum_input::Indicator;

/// The num-lock state, mirrored to an indicator LED.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct NumLock {
    on: bool,
}

impl NumLock {
    pub fn new(on: bool) -> Self {
        NumLock { on }
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    /// Flips the state and shows it on the indicator. Returns the new state.
    pub fn toggle(&mut self, indicator: &mut dyn Indicator) -> bool {
        self.on = !self.on;
        info!("NumLock: {}", self.on);
        self.reflect(indicator);
        self.on
    }

    /// Writes the current state to the indicator. Failures are only logged.
    pub fn reflect(&self, indicator: &mut dyn Indicator) {
        if let Err(e) = indicator.set(self.on) {
            warn!("Cannot control num-lock LED {:?}: {}", indicator, e);
        }
    }
}
