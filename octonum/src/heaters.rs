//! Heater toggles bound to the divide and multiply keys.

use std::time::Instant;
use log::info;
use octonum_printer::{PrinterApi, PrinterError, PrinterResult};
use crate::dispatch::Dispatcher;
use crate::error::DispatchError;

/// Targets within this distance of the "on" temperature count as on.
const TARGET_TOLERANCE: f64 = 0.5;

/// Picks the new target: off if the heater is currently set to `on_temperature`, otherwise on.
pub fn next_target(current: f64, on_temperature: f64) -> f64 {
    if (current - on_temperature).abs() < TARGET_TOLERANCE {
        0.0
    } else {
        on_temperature
    }
}

impl Dispatcher<'_> {
    /// Switches the bed heater between off and its configured temperature.
    /// Returns the new target.
    pub fn toggle_bed_temperature(&mut self, now: Instant) -> Result<f64, DispatchError> {
        self.require_heater_guards(now)?;

        let on_temperature = self.config().temperatures.bed_on;
        let target = toggle_bed(self.printer(), on_temperature)
            .map_err(|source| heater_failure("Toggle bed heater", source))?;
        info!("Bed target set to {}", target);
        Ok(target)
    }

    /// Switches the configured tool heater between off and its configured temperature.
    /// Returns the new target.
    pub fn toggle_tool_temperature(&mut self, now: Instant) -> Result<f64, DispatchError> {
        self.require_heater_guards(now)?;

        let temperatures = &self.config().temperatures;
        let (tool, on_temperature) = (temperatures.tool.clone(), temperatures.tool_on);
        let target = toggle_tool(self.printer(), &tool, on_temperature)
            .map_err(|source| heater_failure("Toggle tool heater", source))?;
        info!("{} target set to {}", tool, target);
        Ok(target)
    }

    fn require_heater_guards(&mut self, now: Instant) -> Result<(), DispatchError> {
        self.require_connected(now)?;
        if self.config().policy.heaters_require_operational {
            self.require_operational()?;
        }
        Ok(())
    }
}

fn toggle_bed(printer: &dyn PrinterApi, on_temperature: f64) -> PrinterResult<f64> {
    let target = next_target(printer.bed_target()?, on_temperature);
    printer.set_bed_target(target)?;
    Ok(target)
}

fn toggle_tool(printer: &dyn PrinterApi, tool: &str, on_temperature: f64) -> PrinterResult<f64> {
    let target = next_target(printer.tool_target(tool)?, on_temperature);
    printer.set_tool_target(tool, target)?;
    Ok(target)
}

fn heater_failure(name: &str, source: PrinterError) -> DispatchError {
    DispatchError::TaskFailure {
        name: name.to_string(),
        index: 0,
        source,
    }
}
