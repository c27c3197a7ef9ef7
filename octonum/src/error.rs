use thiserror::Error;
use octonum_input::KeyCode;
use octonum_printer::PrinterError;

/// Why a key press did not (fully) reach the printer.
#[derive(Debug, Error, PartialEq, Clone)]
pub enum DispatchError {
    #[error("nothing to do for key {code} (num lock {numlock})")]
    UnmappedKey { code: KeyCode, numlock: bool },
    #[error("printer is not connected")]
    NotConnected,
    #[error("printer is not operational")]
    NotOperational,
    #[error("{name}: {kind} task {index} is out of bounds")]
    OutOfBounds { name: String, index: usize, kind: &'static str },
    #[error("{name}: task {index} failed: {source}")]
    TaskFailure {
        name: String,
        index: usize,
        source: PrinterError,
    },
}

impl DispatchError {
    /// Gets whether the error is expected during normal use and not worth a warning.
    pub fn is_benign(&self) -> bool {
        matches!(self, DispatchError::UnmappedKey { .. })
    }
}
