//! Turns a key press into printer requests.

use std::time::Instant;
use log::{debug, info};
use octonum_input::KeyCode;
use octonum_printer::{PrinterApi, Route, TaskDescriptor};
use crate::config::Config;
use crate::error::DispatchError;
use crate::guard::{ConnectivityGuard, is_operational};
use crate::registry::{Action, Callback, Registry};
use crate::utils::{axis_within, step_within};

/// What a successful dispatch did.
#[derive(Clone, Debug, PartialEq)]
pub enum Dispatched {
    /// All tasks of the action were accepted by the printer.
    Tasks { name: String, count: usize },
    Callback(Callback),
}

/// Resolves keys through the registry and runs the resulting actions behind the guards.
#[derive(Debug)]
pub struct Dispatcher<'a> {
    config: Config,
    registry: Registry,
    printer: &'a dyn PrinterApi,
    connectivity: ConnectivityGuard,
}

impl <'a> Dispatcher<'a> {
    pub fn new(config: Config, registry: Registry, printer: &'a dyn PrinterApi) -> Self {
        let connectivity = ConnectivityGuard::new(config.connect_retry());
        Dispatcher {
            config,
            registry,
            printer,
            connectivity,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub(crate) fn printer(&self) -> &'a dyn PrinterApi {
        self.printer
    }

    /// Runs the action bound to `code` under the given num-lock state.
    pub fn dispatch(&mut self, code: KeyCode, numlock: bool, now: Instant) -> Result<Dispatched, DispatchError> {
        let action = self
            .registry
            .get(code, numlock)
            .cloned()
            .ok_or(DispatchError::UnmappedKey { code, numlock })?;

        info!("Key {} (num lock {}): {}", code, numlock, action.name());

        match action {
            Action::Callback { callback, .. } => {
                self.run_callback(callback, now)?;
                Ok(Dispatched::Callback(callback))
            }
            Action::Tasks { name, route, tasks } => {
                self.run_tasks(&name, route, &tasks, now)?;
                Ok(Dispatched::Tasks { name, count: tasks.len() })
            }
        }
    }

    fn run_callback(&mut self, callback: Callback, now: Instant) -> Result<(), DispatchError> {
        match callback {
            Callback::ToggleBedTemperature => self.toggle_bed_temperature(now).map(|_| ()),
            Callback::ToggleToolTemperature => self.toggle_tool_temperature(now).map(|_| ()),
        }
    }

    fn run_tasks(
        &mut self,
        name: &str,
        route: Route,
        tasks: &[TaskDescriptor],
        now: Instant,
    ) -> Result<(), DispatchError> {
        self.require_connected(now)?;

        let motion = tasks.iter().any(TaskDescriptor::is_motion);
        if motion || self.config.policy.steppers_require_operational {
            self.require_operational()?;
        }

        for (index, task) in tasks.iter().enumerate() {
            if !self.in_bounds(task) {
                return Err(DispatchError::OutOfBounds {
                    name: name.to_string(),
                    index,
                    kind: task.kind(),
                });
            }
        }

        for (index, task) in tasks.iter().enumerate() {
            debug!("{} [{}/{}] -> {}: {:?}", name, index + 1, tasks.len(), route, task);
            self.printer
                .send(route, task)
                .map_err(|source| DispatchError::TaskFailure {
                    name: name.to_string(),
                    index,
                    source,
                })?;
        }
        Ok(())
    }

    pub(crate) fn require_connected(&mut self, now: Instant) -> Result<(), DispatchError> {
        if self.connectivity.ensure_connected(self.printer, now) {
            Ok(())
        } else {
            Err(DispatchError::NotConnected)
        }
    }

    pub(crate) fn require_operational(&self) -> Result<(), DispatchError> {
        if is_operational(self.printer) {
            Ok(())
        } else {
            Err(DispatchError::NotOperational)
        }
    }

    /// Checks absolute moves against the bed and, if enabled, relative moves against the step sizes.
    fn in_bounds(&self, task: &TaskDescriptor) -> bool {
        let bed = &self.config.bed;
        let check_relative = self.config.policy.check_relative_bounds;

        match *task {
            TaskDescriptor::Jog { absolute: true, x, y, z } => {
                axis_within(x, 0.0..=bed.width)
                    && axis_within(y, 0.0..=bed.depth)
                    && axis_within(z, 0.0..=bed.max_height)
            }
            TaskDescriptor::Jog { absolute: false, x, y, z } => {
                let step = &self.config.jog;
                !check_relative
                    || (step_within(x, step.x) && step_within(y, step.y) && step_within(z, step.z))
            }
            TaskDescriptor::Extrude { amount } => {
                !check_relative || step_within(Some(amount), self.config.extrude.amount)
            }
            TaskDescriptor::Home { .. } | TaskDescriptor::Gcode { .. } => true,
        }
    }
}
