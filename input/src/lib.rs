pub mod debounce;
pub mod keypad;
pub mod led;

use std::fmt::{Debug, Display, Formatter};
use std::time::Instant;
use thiserror::Error;

#[derive(Debug, Error, Eq, PartialEq, Clone)]
pub enum InputError {
    #[error("no matching input device found")]
    NotFound,
    #[error("the feature is not supported on this device")]
    NotSupported,
    #[error("IO error: {0}")]
    Io(std::io::ErrorKind),
    #[error("error: {0}")]
    Other(String),
}

impl From<std::io::Error> for InputError {
    fn from(err: std::io::Error) -> Self {
        InputError::Io(err.kind())
    }
}

impl From<nix::Error> for InputError {
    fn from(err: nix::Error) -> Self {
        InputError::Io(std::io::Error::from(err).kind())
    }
}

pub type InputResult<T> = Result<T, InputError>;

/// A raw key code as reported by the kernel input layer.
///
/// The value is opaque to the rest of the program: it is only compared and hashed.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct KeyCode(pub u16);

impl Display for KeyCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The kind of transition a key event reports.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum KeyDirection {
    Up,
    Down,
    /// Auto-repeat generated by the kernel while a key is held.
    Repeat,
}

impl KeyDirection {
    /// Converts an evdev `EV_KEY` value into a direction.
    pub fn from_value(value: i32) -> Option<KeyDirection> {
        match value {
            0 => Some(KeyDirection::Up),
            1 => Some(KeyDirection::Down),
            2 => Some(KeyDirection::Repeat),
            _ => None,
        }
    }
}

/// A single key transition.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub direction: KeyDirection,
    /// When the event was read from the device.
    pub at: Instant,
}

impl KeyEvent {
    pub fn new(code: KeyCode, direction: KeyDirection, at: Instant) -> Self {
        KeyEvent { code, direction, at }
    }

    pub fn down(code: KeyCode, at: Instant) -> Self {
        Self::new(code, KeyDirection::Down, at)
    }

    pub fn up(code: KeyCode, at: Instant) -> Self {
        Self::new(code, KeyDirection::Up, at)
    }

    pub fn is_down(&self) -> bool {
        self.direction == KeyDirection::Down
    }
}

/// A blocking source of key events.
pub trait KeySource: Debug {
    /// Blocks until at least one event is available and returns everything that was read.
    ///
    /// May return an empty batch if the device only reported non-key events.
    fn next_events(&mut self) -> InputResult<Vec<KeyEvent>>;
}

/// An on/off indicator, such as the num-lock LED of a keyboard.
pub trait Indicator: Debug {
    /// Gets whether writing to the indicator has any effect.
    fn is_available(&self) -> bool {
        true
    }

    /// Turns the indicator on or off.
    fn set(&mut self, on: bool) -> InputResult<()>;
}
