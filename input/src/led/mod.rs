//! Num-lock indicator backends.

mod console;
mod device;

pub use console::*;
pub use device::*;
use crate::{Indicator, InputResult};

/// An indicator that does nothing, used when no LED can be controlled.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoIndicator;

impl Indicator for NoIndicator {
    fn is_available(&self) -> bool {
        false
    }

    fn set(&mut self, _on: bool) -> InputResult<()> {
        Ok(())
    }
}
