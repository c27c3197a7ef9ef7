pub mod http;
pub mod model;
pub mod settings;
pub mod task;

use std::fmt::Debug;
use thiserror::Error;
pub use model::{ConnectionStatus, PrinterFlags, PrinterState};
pub use settings::{ConnectionSettings, SettingsError};
pub use task::{Axis, Route, TaskDescriptor};

#[derive(Debug, Error, Eq, PartialEq, Clone)]
pub enum PrinterError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("server answered {0}: {1}")]
    Status(u16, String),
    #[error("unexpected response: {0}")]
    Parse(String),
}

pub type PrinterResult<T> = Result<T, PrinterError>;

/// The subset of the OctoPrint REST API used to drive a printer.
///
/// All calls block until the server has answered.
pub trait PrinterApi: Debug {
    /// Gets the current state of the serial connection between OctoPrint and the printer.
    fn connection(&self) -> PrinterResult<ConnectionStatus>;

    /// Asks OctoPrint to connect to the printer.
    ///
    /// Returns as soon as the request is accepted; the connection may take a while to come up.
    fn connect(&self) -> PrinterResult<()>;

    /// Gets the printer state text and flags.
    fn printer_state(&self) -> PrinterResult<PrinterState>;

    /// Gets the target temperature of the heated bed, `0.0` if off.
    fn bed_target(&self) -> PrinterResult<f64>;

    fn set_bed_target(&self, target: f64) -> PrinterResult<()>;

    /// Gets the target temperature of the given tool (e.g. `tool0`), `0.0` if off.
    fn tool_target(&self, tool: &str) -> PrinterResult<f64>;

    fn set_tool_target(&self, tool: &str, target: f64) -> PrinterResult<()>;

    /// Sends a single task to the given route.
    fn send(&self, route: Route, task: &TaskDescriptor) -> PrinterResult<()>;
}
